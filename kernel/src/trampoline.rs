use rvload::proc::ControlTransfer;

extern "C" {
    // asm/enter_user.S
    fn __enter_user(entry: usize, sp: usize);
}

// 在同一特权级下切换到用户栈并调用入口，用户程序ret后回到这里
pub struct Trampoline;

impl ControlTransfer for Trampoline {
    fn transfer(&mut self, entry: u64, sp: u64) {
        unsafe { __enter_user(entry as usize, sp as usize) }
    }
}
