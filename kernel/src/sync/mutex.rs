use core::hint::spin_loop;
use core::sync::atomic::{AtomicBool, Ordering};

pub trait Mutex: Sync + Send {
    fn lock(&self);
    fn unlock(&self);
}

// test-and-set自旋锁：lock置位直到之前为false，unlock清零
// 目前内核是单线程协作式的，这把锁只用来示范临界区
pub struct SpinLock {
    locked: AtomicBool,
}

impl SpinLock {
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    pub fn try_lock(&self) -> bool {
        return !self.locked.swap(true, Ordering::Acquire);
    }

    pub fn is_locked(&self) -> bool {
        return self.locked.load(Ordering::Relaxed);
    }
}

impl Mutex for SpinLock {
    fn lock(&self) {
        while self.locked.swap(true, Ordering::Acquire) {
            spin_loop();
        }
    }

    fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_set_then_clear() {
        let lock = SpinLock::new();
        lock.lock();
        assert!(lock.is_locked());
        assert!(!lock.try_lock());
        lock.unlock();
        assert!(lock.try_lock());
        lock.unlock();
        assert!(!lock.is_locked());
    }
}
