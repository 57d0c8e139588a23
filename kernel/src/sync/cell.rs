use core::cell::{RefCell, RefMut};

// 单线程内核中的共享可变数据，访问方负责用锁或执行顺序保证互斥
pub struct SafeCell<T> {
    inner: RefCell<T>,
}

unsafe impl<T> Sync for SafeCell<T> {}

impl<T> SafeCell<T> {
    pub const fn new(val: T) -> Self {
        return Self {
            inner: RefCell::new(val),
        };
    }
    pub fn borrow(&self) -> RefMut<'_, T> {
        return self.inner.borrow_mut();
    }
}
