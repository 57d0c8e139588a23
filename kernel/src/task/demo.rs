use super::registry::{Step, TaskRegistry};
use crate::error::KernelResult;
use crate::sync::{Mutex, SafeCell, SpinLock};
use alloc::boxed::Box;
use alloc::sync::Arc;

// 两个演示任务共享的计数器，修改时必须持有自旋锁
pub struct SharedCounter {
    lock: SpinLock,
    value: SafeCell<usize>,
}

impl SharedCounter {
    pub const fn new() -> Self {
        Self {
            lock: SpinLock::new(),
            value: SafeCell::new(0),
        }
    }

    // 临界区内增加计数并返回新值
    pub fn add(&self, n: usize) -> usize {
        self.lock.lock();
        let mut value = self.value.borrow();
        *value += n;
        let now = *value;
        drop(value);
        self.lock.unlock();
        return now;
    }

    pub fn get(&self) -> usize {
        self.lock.lock();
        let now = *self.value.borrow();
        self.lock.unlock();
        return now;
    }
}

pub struct CounterTask {
    label: &'static str,
    increment: usize,
    shared: Arc<SharedCounter>,
}

impl CounterTask {
    pub fn new(label: &'static str, increment: usize, shared: Arc<SharedCounter>) -> Self {
        return Self {
            label,
            increment,
            shared,
        };
    }
}

impl Step for CounterTask {
    fn step(&mut self) {
        let now = self.shared.add(self.increment);
        println!("[{}] counter = {}", self.label, now);
    }
}

// 启动时注册演示任务：counter1每次+1，counter2每次+2
pub fn register_demo_tasks(tasks: &mut TaskRegistry) -> KernelResult<Arc<SharedCounter>> {
    let shared = Arc::new(SharedCounter::new());
    tasks.add("counter1", Box::new(CounterTask::new("task1", 1, Arc::clone(&shared))))?;
    tasks.add("counter2", Box::new(CounterTask::new("task2", 2, Arc::clone(&shared))))?;
    return Ok(shared);
}
