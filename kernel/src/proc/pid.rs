// 进程id，0保留为“空闲”标记，永远不会分配给真实进程
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(pub usize);

impl Pid {
    pub const FREE: Pid = Pid(0);

    #[inline]
    pub fn is_free(&self) -> bool {
        return self.0 == 0;
    }
}

// pid单调递增分配，不回收
pub struct PidAllocator {
    next: usize,
    end: usize,
    exhausted: bool,
}

impl PidAllocator {
    pub const fn new(start: usize, end: usize) -> Self {
        return Self { next: start, end, exhausted: false };
    }

    pub fn alloc(&mut self) -> Option<Pid> {
        let pid = self.peek()?;
        match self.next.checked_add(1) {
            Some(next) => self.next = next,
            None => self.exhausted = true,
        }
        return Some(pid);
    }

    // 下一个将被分配的pid，不消耗
    pub fn peek(&self) -> Option<Pid> {
        if self.exhausted || self.next > self.end {
            return None;
        }
        return Some(Pid(self.next));
    }
}
