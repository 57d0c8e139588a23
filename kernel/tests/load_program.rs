use std::cell::RefCell;
use std::rc::Rc;

use rvload::config::{MAX_USER_STACKS, USER_BASE, USER_STACK_BASE, USER_STACK_SIZE};
use rvload::fs::{FileBuffer, FileStore, StaticFs};
use rvload::mem::UserRegion;
use rvload::proc::{ControlTransfer, Pid};
use rvload::task::TaskRegistry;
use rvload::{Kernel, KernelError, Resource};

// 记录每次控制转移，代替真正跳到用户态
#[derive(Default)]
struct Recorder(Vec<(u64, u64)>);

impl ControlTransfer for Recorder {
    fn transfer(&mut self, entry: u64, sp: u64) {
        self.0.push((entry, sp));
    }
}

// 最小的 ELF64 小端 RISC-V 镜像，只有一个 PT_LOAD 段
fn image(entry: u64, offset: u64, vaddr: u64, filesz: u64, memsz: u64) -> Vec<u8> {
    let mut out = vec![0u8; 64 + 56];
    out[..4].copy_from_slice(b"\x7fELF");
    out[4] = 2; // ELFCLASS64
    out[5] = 1; // little endian
    out[6] = 1;
    out[16..18].copy_from_slice(&2u16.to_le_bytes()); // ET_EXEC
    out[18..20].copy_from_slice(&243u16.to_le_bytes()); // EM_RISCV
    out[20..24].copy_from_slice(&1u32.to_le_bytes());
    out[24..32].copy_from_slice(&entry.to_le_bytes());
    out[32..40].copy_from_slice(&64u64.to_le_bytes()); // e_phoff
    out[52..54].copy_from_slice(&64u16.to_le_bytes());
    out[54..56].copy_from_slice(&56u16.to_le_bytes());
    out[56..58].copy_from_slice(&1u16.to_le_bytes());

    let ph = &mut out[64..];
    ph[0..4].copy_from_slice(&1u32.to_le_bytes()); // PT_LOAD
    ph[4..8].copy_from_slice(&5u32.to_le_bytes());
    ph[8..16].copy_from_slice(&offset.to_le_bytes());
    ph[16..24].copy_from_slice(&vaddr.to_le_bytes());
    ph[24..32].copy_from_slice(&vaddr.to_le_bytes());
    ph[32..40].copy_from_slice(&filesz.to_le_bytes());
    ph[40..48].copy_from_slice(&memsz.to_le_bytes());
    ph[48..56].copy_from_slice(&8u64.to_le_bytes());
    return out;
}

fn store(files: Vec<FileBuffer>) -> StaticFs {
    return StaticFs::new(Box::leak(files.into_boxed_slice()));
}

fn leak(data: Vec<u8>) -> &'static [u8] {
    return Box::leak(data.into_boxed_slice());
}

#[test]
fn load_prog_copies_zero_fills_and_frees_the_slot() {
    let prog = leak(image(USER_BASE, 0, USER_BASE, 16, 32));
    let fs = store(vec![FileBuffer::new("prog", prog)]);
    let mut mem = vec![0xaau8; 0x100];
    let mut kernel = Kernel::new(&fs, UserRegion::new(USER_BASE, &mut mem), Recorder::default());

    let pid = kernel.load("prog").unwrap();
    assert!(pid.0 >= 1);
    assert_eq!(kernel.transfer().0, [(USER_BASE, USER_STACK_BASE + USER_STACK_SIZE)]);
    assert_eq!(kernel.region().read(USER_BASE, 16).unwrap(), &prog[..16]);
    assert!(kernel.region().read(USER_BASE + 16, 16).unwrap().iter().all(|b| *b == 0));
    // memsz之外的内存不动
    assert_eq!(kernel.region().read(USER_BASE + 32, 1).unwrap(), &[0xaa]);

    assert_eq!(kernel.processes().count(), 0);
    assert!(kernel.stacks().is_used(0));
}

#[test]
fn out_of_region_segment_is_rejected_before_any_write() {
    let below = leak(image(USER_BASE, 0, USER_BASE - 0x10, 16, 16));
    let fs = store(vec![FileBuffer::new("below", below)]);
    let mut mem = vec![0u8; 0x100];
    let mut kernel = Kernel::new(&fs, UserRegion::new(USER_BASE, &mut mem), Recorder::default());

    assert!(matches!(
        kernel.load("below"),
        Err(KernelError::RegionViolation { .. })
    ));
    assert!(kernel.transfer().0.is_empty());
    assert_eq!(kernel.stacks().used(), 0);
    assert!(kernel.region().read(USER_BASE, 0x100).unwrap().iter().all(|b| *b == 0));
}

#[test]
fn pids_stay_unique_and_stack_slots_are_never_reclaimed() {
    let prog = leak(image(USER_BASE, 0, USER_BASE, 16, 32));
    let fs = store(vec![FileBuffer::new("prog", prog)]);
    assert!(fs.open("prog").is_ok());
    let mut mem = vec![0u8; 0x100];
    let mut kernel = Kernel::new(&fs, UserRegion::new(USER_BASE, &mut mem), Recorder::default());

    let mut pids = Vec::new();
    for _ in 0..MAX_USER_STACKS {
        pids.push(kernel.load("prog").unwrap());
    }
    let expected: Vec<Pid> = (1..=MAX_USER_STACKS).map(Pid).collect();
    assert_eq!(pids, expected);
    assert_eq!(kernel.stacks().used(), MAX_USER_STACKS);

    let tops: Vec<u64> = kernel.transfer().0.iter().map(|(_, sp)| *sp).collect();
    for pair in tops.windows(2) {
        assert_eq!(pair[1] - pair[0], USER_STACK_SIZE);
    }

    assert_eq!(
        kernel.load("prog"),
        Err(KernelError::ResourceExhausted(Resource::StackSlot))
    );
}

#[test]
fn task_registry_runs_in_order_and_ignores_unknown_names() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut tasks = TaskRegistry::new();
    for name in ["first", "second", "third"] {
        let log = log.clone();
        tasks.add(name, Box::new(move || log.borrow_mut().push(name))).unwrap();
    }

    assert_eq!(tasks.run("missing"), Err(KernelError::NoSuchTask));
    assert_eq!(KernelError::NoSuchTask.to_string(), "No such task.");
    assert!(log.borrow().is_empty());

    assert_eq!(tasks.run_once(), 3);
    assert_eq!(*log.borrow(), ["first", "second", "third"]);

    assert_eq!(tasks.run("second"), Ok(1));
    assert_eq!(log.borrow().last(), Some(&"second"));
}
