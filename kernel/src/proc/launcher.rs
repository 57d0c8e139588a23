use super::pcb::{ProcessControlBlock, ProcessState};
use super::pid::Pid;
use super::table::ProcessTable;

// 体系结构相关的控制转移原语
pub trait ControlTransfer {
    /// Runs user code at `entry` on the stack whose top is `sp`.
    ///
    /// Blocks until the user code returns on its own; nothing preempts it.
    fn transfer(&mut self, entry: u64, sp: u64);
}

// 启动进程：标记Running，转移控制，用户程序返回后释放进程表项
// 不检查返回时的机器状态，也不回收栈槽位
pub fn start<T: ControlTransfer + ?Sized>(
    transfer: &mut T,
    table: &mut ProcessTable,
    pcb: &ProcessControlBlock,
) {
    begin(table, pcb);
    transfer.transfer(pcb.entry, pcb.sp);
    finish(table, pcb.pid);
}

// pcb必须已经由ProcessTable::add放入表中
pub fn begin(table: &mut ProcessTable, pcb: &ProcessControlBlock) {
    let marked = table.set_state(pcb.pid, ProcessState::Running);
    debug_assert!(marked, "pid {} is not in the process table", pcb.pid.0);
    kernel!(
        "starting pid {} at {:#x}, sp={:#x}",
        pcb.pid.0,
        pcb.entry,
        pcb.sp
    );
}

pub fn finish(table: &mut ProcessTable, pid: Pid) {
    let released = table.release(pid);
    debug_assert!(released, "pid {} released twice", pid.0);
    kernel!("pid {} returned", pid.0);
}
