use crate::driver::uart::{self, Uart, UartWriter, UART_CONSOLE};
use crate::{heap, shutdown, trampoline::Trampoline};
use rvload::config::{USER_BASE, USER_SIZE};
use rvload::console;
use rvload::fs::{self, FileStore};
use rvload::mem::UserRegion;
use rvload::shell::{Edit, Flow, LineEditor, Shell, PROMPT};
use rvload::task::demo::register_demo_tasks;
use rvload::Kernel;
use riscv::register::mhartid;

// 清零.bss，启动栈放在sbss之前，不受影响
fn clear_bss() {
    extern "C" {
        fn sbss();
        fn ebss();
    }
    unsafe {
        let start = sbss as usize;
        let len = ebss as usize - start;
        core::slice::from_raw_parts_mut(start as *mut u8, len).fill(0);
    }
}

fn print_banner() {
    println!("Hello from minimal RISC-V kernel!");
    println!("Type 'help' for a list of commands.");
}

// entry.S在M模式下只放行hart0跳转到这里
#[no_mangle]
pub extern "C" fn rust_main() -> ! {
    clear_bss();
    Uart::init();
    console::init(&UART_CONSOLE);
    heap::init();
    kernel!("hart {} booted, kernel heap initialized", mhartid::read());

    let files = fs::builtin();
    // 用户区域是[USER_BASE, USER_BASE + USER_SIZE)的物理内存，只交给加载器使用
    let region = unsafe { UserRegion::from_raw(USER_BASE, USER_SIZE as usize) };
    let mut kernel = Kernel::new(&files, region, Trampoline);
    info!(
        "user region {:#x}..{:#x}, {} file(s) in catalogue",
        kernel.region().base(),
        kernel.region().end(),
        kernel.files().files().len()
    );
    match register_demo_tasks(kernel.task_registry()) {
        Ok(_) => kernel!("demo tasks registered"),
        Err(err) => error!("demo tasks: {}", err),
    }
    print_banner();
    shell_loop(&mut kernel);
    shutdown::shutdown(shutdown::FINISHER_PASS)
}

fn shell_loop(kernel: &mut Kernel<Trampoline>) {
    let mut shell = Shell::new();
    let mut editor = LineEditor::new();
    print!("{}", PROMPT);
    loop {
        let byte = match uart::get_char() {
            Some(byte) => byte,
            None => continue,
        };
        match editor.push(byte) {
            Edit::Echo(byte) => uart::put_char(byte),
            Edit::Erase => print!("\x08 \x08"),
            Edit::Ignore => {}
            Edit::Submit(line) => {
                println!("");
                if let Ok(Flow::Quit) = shell.execute(&line, kernel, &mut UartWriter) {
                    return;
                }
                print!("{}", PROMPT);
            }
        }
    }
}
