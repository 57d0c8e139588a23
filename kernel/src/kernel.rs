//! Kernel context: owns every table the loader and the task driver touch.
//!
//! The bare-metal binary builds exactly one of these at boot; tests build as
//! many as they like against in-memory regions.

use crate::error::{KernelError, KernelResult};
use crate::fs::FileStore;
use crate::mem::{StackAllocator, UserRegion};
use crate::proc::loader::{self, LoadedImage};
use crate::proc::{self, ControlTransfer, Pid, ProcessControlBlock, ProcessTable};
use crate::task::{TaskInfo, TaskRegistry};

pub struct Kernel<'a, T: ControlTransfer> {
    files: &'a dyn FileStore,
    region: UserRegion<'a>,
    stacks: StackAllocator,
    procs: ProcessTable,
    tasks: TaskRegistry,
    transfer: T,
}

impl<'a, T: ControlTransfer> Kernel<'a, T> {
    pub fn new(files: &'a dyn FileStore, region: UserRegion<'a>, transfer: T) -> Self {
        return Self {
            files,
            region,
            stacks: StackAllocator::new(),
            procs: ProcessTable::new(),
            tasks: TaskRegistry::new(),
            transfer,
        };
    }

    // 查找文件、校验并放置段、分配用户栈，得到一个Runnable的PCB（尚未加入进程表）
    pub fn prepare(&mut self, path: &str) -> KernelResult<ProcessControlBlock> {
        let file = self.files.open(path)?;
        let LoadedImage { entry, segments } = loader::load_image(file.data, &mut self.region)?;
        let stack = self.stacks.allocate()?;
        if self.stacks.used() == self.stacks.capacity() {
            warn!("last user stack slot taken, further loads will fail");
        }
        kernel!(
            "loaded {}: {} segment(s), entry={:#x}, stack slot {}",
            path,
            segments,
            entry,
            stack.index
        );
        return Ok(ProcessControlBlock::new(entry, stack.top, stack.index));
    }

    // 加载并运行一个程序，用户程序返回后才返回，返回值为分配的pid
    pub fn load(&mut self, path: &str) -> KernelResult<Pid> {
        let result = self.spawn(path);
        if let Err(err) = &result {
            error!("loader: {}", err);
        }
        return result;
    }

    fn spawn(&mut self, path: &str) -> KernelResult<Pid> {
        let mut pcb = self.prepare(path)?;
        pcb.pid = self.procs.add(pcb)?;
        proc::start(&mut self.transfer, &mut self.procs, &pcb);
        return Ok(pcb.pid);
    }

    pub fn run(&mut self, name: &str) -> KernelResult<usize> {
        return self.tasks.run(name);
    }

    pub fn run_all(&mut self) -> usize {
        return self.tasks.run_once();
    }

    // 按名字启用或停用任务，停用的任务不参与run_once
    pub fn set_task_active(&mut self, name: &str, active: bool) -> KernelResult<usize> {
        let id = self
            .tasks
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.id)
            .ok_or(KernelError::NoSuchTask)?;
        self.tasks.set_active(id, active);
        return Ok(id);
    }

    pub fn tasks(&self) -> impl Iterator<Item = TaskInfo> + '_ {
        return self.tasks.iter();
    }

    pub fn processes(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        return self.procs.iter();
    }

    pub fn task_registry(&mut self) -> &mut TaskRegistry {
        return &mut self.tasks;
    }

    pub fn files(&self) -> &'a dyn FileStore {
        return self.files;
    }

    pub fn stacks(&self) -> &StackAllocator {
        return &self.stacks;
    }

    pub fn process_table(&mut self) -> &mut ProcessTable {
        return &mut self.procs;
    }

    pub fn region(&self) -> &UserRegion<'a> {
        return &self.region;
    }

    pub fn transfer(&self) -> &T {
        return &self.transfer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_USER_STACKS, USER_BASE, USER_STACK_BASE, USER_STACK_SIZE};
    use crate::error::Resource;
    use crate::fs::{builtin, FileBuffer, StaticFs};
    use crate::proc::ProcessState;

    #[derive(Default)]
    struct Recorder(Vec<(u64, u64)>);

    impl ControlTransfer for Recorder {
        fn transfer(&mut self, entry: u64, sp: u64) {
            self.0.push((entry, sp));
        }
    }

    static BROKEN: [FileBuffer; 1] = [FileBuffer::new("junk", b"definitely not an ELF image, just some text padding it out past 64 bytes")];

    #[test]
    fn load_hello_runs_and_frees_the_slot() {
        let fs = builtin();
        let mut mem = vec![0u8; 0x1000];
        let mut kernel = Kernel::new(&fs, UserRegion::new(USER_BASE, &mut mem), Recorder::default());
        let pid = kernel.load("hello").unwrap();
        assert_eq!(pid, Pid(1));
        assert_eq!(kernel.transfer().0, [(USER_BASE, USER_STACK_BASE + USER_STACK_SIZE)]);
        assert_eq!(kernel.processes().count(), 0);
        assert!(kernel.stacks().is_used(0));
        assert_eq!(kernel.region().read(USER_BASE, 4).unwrap(), &[0xb7, 0x02, 0x00, 0x10]);

        // 第二次加载：新pid，新的栈槽位，旧槽位不回收
        assert_eq!(kernel.load("hello"), Ok(Pid(2)));
        assert_eq!(kernel.transfer().0[1].1, USER_STACK_BASE + 2 * USER_STACK_SIZE);
        assert_eq!(kernel.stacks().used(), 2);
    }

    #[test]
    fn failures_report_and_leave_tables_alone() {
        let fs = StaticFs::new(&BROKEN);
        let mut mem = vec![0u8; 0x100];
        let mut kernel = Kernel::new(&fs, UserRegion::new(USER_BASE, &mut mem), Recorder::default());
        assert_eq!(kernel.load("missing"), Err(KernelError::NotFound));
        assert!(matches!(kernel.load("junk"), Err(KernelError::Format(_))));
        assert!(kernel.transfer().0.is_empty());
        assert_eq!(kernel.stacks().used(), 0);
        assert_eq!(kernel.processes().count(), 0);
    }

    #[test]
    fn stack_exhaustion_stops_loading() {
        let fs = builtin();
        let mut mem = vec![0u8; 0x1000];
        let mut kernel = Kernel::new(&fs, UserRegion::new(USER_BASE, &mut mem), Recorder::default());
        for _ in 0..MAX_USER_STACKS {
            kernel.load("hello").unwrap();
        }
        assert_eq!(
            kernel.load("hello"),
            Err(KernelError::ResourceExhausted(Resource::StackSlot))
        );
        assert_eq!(kernel.transfer().0.len(), MAX_USER_STACKS);
    }

    #[test]
    fn prepared_pcb_is_runnable_until_added() {
        let fs = builtin();
        let mut mem = vec![0u8; 0x1000];
        let mut kernel = Kernel::new(&fs, UserRegion::new(USER_BASE, &mut mem), Recorder::default());
        let pcb = kernel.prepare("hello").unwrap();
        assert_eq!(pcb.state, ProcessState::Runnable);
        assert!(pcb.pid.is_free());
        let pid = kernel.process_table().add(pcb).unwrap();
        assert_eq!(kernel.processes().next().unwrap().pid, pid);
    }

    #[test]
    fn disabled_tasks_are_skipped_by_run_all() {
        let fs = builtin();
        let mut mem = vec![0u8; 0x10];
        let mut kernel = Kernel::new(&fs, UserRegion::new(USER_BASE, &mut mem), Recorder::default());
        let counter = crate::task::demo::register_demo_tasks(kernel.task_registry()).unwrap();

        assert_eq!(kernel.set_task_active("counter1", false), Ok(0));
        assert_eq!(kernel.run_all(), 1);
        assert_eq!(counter.get(), 2);
        assert!(!kernel.tasks().next().unwrap().active);

        assert_eq!(kernel.set_task_active("nope", false), Err(KernelError::NoSuchTask));
        assert_eq!(kernel.set_task_active("counter1", true), Ok(0));
        assert_eq!(kernel.run_all(), 2);
        assert_eq!(counter.get(), 5);
    }
}
