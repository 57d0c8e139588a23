// 构建期常量，运行时不可修改

// 用户程序区域，ELF的LOAD段只能落在[USER_BASE, USER_BASE + USER_SIZE)
pub const USER_BASE: u64 = 0x8020_0000;
pub const USER_SIZE: u64 = 32 * 1024 * 1024;

// 用户栈区域紧挨用户程序区域之上，按固定大小切分成槽位
pub const USER_STACK_BASE: u64 = USER_BASE + USER_SIZE;
pub const USER_STACK_SIZE: u64 = 16 * 1024;
pub const MAX_USER_STACKS: usize = 8;

pub const MAX_PROCS: usize = 8;
pub const MAX_TASKS: usize = 8;

pub const KERNEL_HEAP_SIZE: usize = 0x0004_0000;

// 控制台输出级别，高于该级别的日志被丢弃
pub const LOG_LEVEL: crate::console::Level = crate::console::Level::Kernel;

// qemu virt 板级地址
pub const UART0: usize = 0x1000_0000;
pub const SHUTDOWN0: usize = 0x10_0000;

// 命令行一行的最大长度（含结尾）
pub const CMD_BUF_SIZE: usize = 64;

pub const fn user_stack_position(slot: usize) -> (u64, u64) {
    let bottom = USER_STACK_BASE + slot as u64 * USER_STACK_SIZE;
    let top = bottom + USER_STACK_SIZE;
    return (bottom, top);
}
