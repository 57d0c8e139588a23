use super::pcb::{ProcessControlBlock, ProcessState};
use super::pid::{Pid, PidAllocator};
use crate::config::MAX_PROCS;
use crate::error::{KernelError, KernelResult, Resource};

// 固定容量的进程表，pid为0的表项是空闲的
pub struct ProcessTable {
    entries: [ProcessControlBlock; MAX_PROCS],
    pids: PidAllocator,
}

impl ProcessTable {
    pub const fn new() -> Self {
        return Self {
            entries: [ProcessControlBlock::empty(); MAX_PROCS],
            pids: PidAllocator::new(1, usize::MAX),
        };
    }

    // 放入第一个空闲表项，分配下一个pid并返回
    pub fn add(&mut self, pcb: ProcessControlBlock) -> KernelResult<Pid> {
        let slot = self
            .entries
            .iter_mut()
            .find(|e| e.is_free())
            .ok_or(KernelError::ResourceExhausted(Resource::ProcessTable))?;
        let pid = self
            .pids
            .alloc()
            .ok_or(KernelError::ResourceExhausted(Resource::Pid))?;
        *slot = ProcessControlBlock { pid, ..pcb };
        return Ok(pid);
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessControlBlock> {
        if pid.is_free() {
            return None;
        }
        return self.entries.iter().find(|e| e.pid == pid);
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut ProcessControlBlock> {
        if pid.is_free() {
            return None;
        }
        return self.entries.iter_mut().find(|e| e.pid == pid);
    }

    pub fn set_state(&mut self, pid: Pid, state: ProcessState) -> bool {
        return self.get_mut(pid).map(|e| e.state = state).is_some();
    }

    // 释放pid对应的表项，表项可被立即复用；栈槽位不在这里回收
    pub fn release(&mut self, pid: Pid) -> bool {
        return self.get_mut(pid).map(|e| *e = ProcessControlBlock::empty()).is_some();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        return self.entries.iter().filter(|e| !e.is_free());
    }

    pub fn len(&self) -> usize {
        return self.iter().count();
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }
}
