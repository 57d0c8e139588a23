use super::pid::Pid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessState {
    Runnable,
    Running,
    Stopped,
}

// 进程控制块，进程表中按值保存
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessControlBlock {
    pub pid: Pid,
    pub entry: u64,      // 用户程序入口
    pub sp: u64,         // 初始栈指针，栈槽位顶端
    pub stack_slot: usize,
    pub state: ProcessState,
}

impl ProcessControlBlock {
    // 加载并分配栈之后创建，pid在加入进程表时分配
    pub fn new(entry: u64, sp: u64, stack_slot: usize) -> Self {
        return Self {
            pid: Pid::FREE,
            entry,
            sp,
            stack_slot,
            state: ProcessState::Runnable,
        };
    }

    pub const fn empty() -> Self {
        return Self {
            pid: Pid::FREE,
            entry: 0,
            sp: 0,
            stack_slot: 0,
            state: ProcessState::Stopped,
        };
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        return self.pid.is_free();
    }
}
