#![cfg_attr(board, no_std)]
#![cfg_attr(board, no_main)]

#[cfg(board)]
#[macro_use]
extern crate rvload;
#[cfg(board)]
extern crate alloc;

#[cfg(board)]
mod boot;
#[cfg(board)]
mod driver;
#[cfg(board)]
mod heap;
#[cfg(board)]
mod shutdown;
#[cfg(board)]
mod trampoline;

#[cfg(board)]
core::arch::global_asm!(include_str!("asm/entry.S"));
#[cfg(board)]
core::arch::global_asm!(include_str!("asm/enter_user.S"));

#[cfg(board)]
#[panic_handler]
fn panic_handler(info: &core::panic::PanicInfo) -> ! {
    error!("kernel panicked: {}", info);
    shutdown::shutdown(shutdown::FINISHER_FAIL)
}

#[cfg(not(board))]
fn main() {
    eprintln!("rvload is a bare-metal kernel, build it with --target riscv64gc-unknown-none-elf");
}
