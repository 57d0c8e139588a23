use core::fmt::{self, Write};
use lazy_static::lazy_static;
use rvload::config::UART0;
use rvload::console::Console;
use spin::mutex::Mutex;

// uart 寄存器组，see：https://www.lammertbies.nl/comm/info/serial-uart
const RHR: usize = 0; // 读缓冲（8bit）
const THR: usize = 0; // 写缓冲
const IER: usize = 1; // Interupt Enable
const FCR: usize = 2; // FIFO control
const LCR: usize = 3; // line control
const LSR: usize = 5; // line status

const DLL: usize = 0; // DLL, divisor latch LSB
const DLM: usize = 1; // DLM, divisor latch LMB

const FCR_FIFO_ENABLE: u8 = 1 << 0;
const FCR_FIFO_CLEAR: u8 = 3 << 1;
const LCR_EIGHT_BITS: u8 = 3 << 0; // no parity
const LCR_BAUD_LATCH: u8 = 1 << 7; // DLAB, DLL DLM accessible

const LSR_RX_READY: u8 = 1 << 0;
const LSR_TX_IDLE: u8 = 1 << 5;

// 轮询方式的16550，没有中断，读写都直接访问寄存器
pub struct Uart {}

lazy_static! {
    pub static ref UART: Mutex<Uart> = Mutex::new(Uart {});
}

pub static UART_CONSOLE: UartConsole = UartConsole;

pub struct UartConsole;

impl Console for UartConsole {
    fn put_str(&self, s: &str) {
        let uart = UART.lock();
        for c in s.bytes() {
            if c == b'\n' {
                uart.put(b'\r');
            }
            uart.put(c);
        }
    }
}

// shell输出直接写串口
pub struct UartWriter;

impl Write for UartWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        UART_CONSOLE.put_str(s);
        Ok(())
    }
}

pub fn get_char() -> Option<u8> {
    return UART.lock().get();
}

pub fn put_char(ch: u8) {
    UART.lock().put(ch);
}

impl Uart {
    pub fn init() {
        // 关闭中断
        write_reg(IER, 0x0);
        // DLAB
        write_reg(LCR, LCR_BAUD_LATCH);
        // 38.4k baud rate
        write_reg(DLL, 0x03);
        write_reg(DLM, 0x00);
        // 8 bits payload，无奇偶校验
        write_reg(LCR, LCR_EIGHT_BITS);
        // 开启FIFO
        write_reg(FCR, FCR_FIFO_ENABLE | FCR_FIFO_CLEAR);
    }

    pub fn put(&self, ch: u8) {
        // 等待THR空闲
        while read_reg(LSR) & LSR_TX_IDLE == 0 {}
        write_reg(THR, ch);
    }

    pub fn get(&self) -> Option<u8> {
        // 判断RHR是否有数据
        if read_reg(LSR) & LSR_RX_READY != 0 {
            return Some(read_reg(RHR));
        }
        return None;
    }
}

fn reg_addr(reg: usize) -> usize {
    return UART0 + reg;
}

fn write_reg(reg: usize, val: u8) {
    let ptr = reg_addr(reg) as *mut u8;
    unsafe { ptr.write_volatile(val) }
}

fn read_reg(reg: usize) -> u8 {
    let ptr = reg_addr(reg) as *const u8;
    unsafe { ptr.read_volatile() }
}
