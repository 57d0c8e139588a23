use rvload::config::SHUTDOWN0;

// qemu virt 的 sifive_test 设备，写入后虚拟机退出
pub const FINISHER_PASS: u32 = 0x5555;
pub const FINISHER_FAIL: u32 = 0x3333;

pub fn shutdown(code: u32) -> ! {
    unsafe {
        (SHUTDOWN0 as *mut u32).write_volatile(code);
    }
    // 设备不存在时停在这里
    loop {
        unsafe { riscv::asm::wfi() };
    }
}
