use crate::config::MAX_TASKS;
use crate::error::{KernelError, KernelResult, Resource};
use alloc::boxed::Box;
use array_macro::array;

// 任务的一步，被调用时同步执行到结束
pub trait Step {
    fn step(&mut self);
}

impl<F: FnMut()> Step for F {
    fn step(&mut self) {
        self()
    }
}

struct TaskEntry {
    id: usize,
    name: &'static str,
    step: Box<dyn Step>,
    active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskInfo {
    pub id: usize,
    pub name: &'static str,
    pub active: bool,
}

// 固定容量的任务表，只追加不删除，id等于注册顺序
pub struct TaskRegistry {
    entries: [Option<TaskEntry>; MAX_TASKS],
    count: usize,
}

impl TaskRegistry {
    pub fn new() -> Self {
        return Self {
            entries: array![_ => None; MAX_TASKS],
            count: 0,
        };
    }

    pub fn add(&mut self, name: &'static str, step: Box<dyn Step>) -> KernelResult<usize> {
        if self.count >= MAX_TASKS {
            return Err(KernelError::ResourceExhausted(Resource::TaskRegistry));
        }
        let id = self.count;
        self.entries[id] = Some(TaskEntry {
            id,
            name,
            step,
            active: true,
        });
        self.count += 1;
        return Ok(id);
    }

    // 按注册顺序把每个活动任务执行一次
    pub fn run_once(&mut self) -> usize {
        let mut ran = 0;
        for entry in self.entries[..self.count].iter_mut().flatten() {
            if entry.active {
                entry.step.step();
                ran += 1;
            }
        }
        return ran;
    }

    // 按名字精确匹配并执行一次，找不到时不修改任何状态
    pub fn run(&mut self, name: &str) -> KernelResult<usize> {
        let entry = self.entries[..self.count]
            .iter_mut()
            .flatten()
            .find(|e| e.name == name)
            .ok_or(KernelError::NoSuchTask)?;
        entry.step.step();
        return Ok(entry.id);
    }

    pub fn set_active(&mut self, id: usize, active: bool) -> bool {
        match self.entries.get_mut(id) {
            Some(Some(entry)) => {
                entry.active = active;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = TaskInfo> + '_ {
        return self.entries[..self.count].iter().flatten().map(|e| TaskInfo {
            id: e.id,
            name: e.name,
            active: e.active,
        });
    }

    pub fn len(&self) -> usize {
        return self.count;
    }

    pub fn is_empty(&self) -> bool {
        return self.count == 0;
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
