use crate::config::LOG_LEVEL;
use core::fmt::{self, Arguments, Write};
use spin::mutex::SpinMutex;

// 控制台输出端，启动时注册一次，未注册时输出被丢弃（宿主机测试即如此）
pub trait Console: Send + Sync {
    fn put_str(&self, s: &str);
}

static CONSOLE: SpinMutex<Option<&'static dyn Console>> = SpinMutex::new(None);

pub fn init(console: &'static dyn Console) {
    *CONSOLE.lock() = Some(console);
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Level {
    Error = 1,
    Warn,
    Info,
    Kernel,
    Debug,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Kernel => "kernel",
            Level::Debug => "DEBUG",
        }
    }

    // ANSI 颜色
    fn color(self) -> u8 {
        match self {
            Level::Error => 31,
            Level::Warn => 93,
            Level::Info => 34,
            Level::Kernel => 32,
            Level::Debug => 90,
        }
    }
}

struct Sink(&'static dyn Console);

impl Write for Sink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.put_str(s);
        Ok(())
    }
}

pub fn print(args: Arguments) {
    let console = *CONSOLE.lock();
    if let Some(console) = console {
        let _ = Sink(console).write_fmt(args);
    }
}

pub fn log(level: Level, args: Arguments) {
    if level > LOG_LEVEL {
        return;
    }
    print(format_args!(
        "\x1b[{}m[{}] {}\x1b[0m\n",
        level.color(),
        level.tag(),
        args
    ));
}

#[macro_export]
macro_rules! print {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::print(format_args!($fmt $(, $($arg)+)?));
    }
}

#[macro_export]
macro_rules! println {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::print(format_args!(concat!($fmt, "\n") $(, $($arg)+)?));
    }
}

#[macro_export]
macro_rules! error {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::log($crate::console::Level::Error, format_args!($fmt $(, $($arg)+)?));
    }
}

#[macro_export]
macro_rules! warn {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::log($crate::console::Level::Warn, format_args!($fmt $(, $($arg)+)?));
    }
}

#[macro_export]
macro_rules! info {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::log($crate::console::Level::Info, format_args!($fmt $(, $($arg)+)?));
    }
}

#[macro_export]
macro_rules! kernel {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::log($crate::console::Level::Kernel, format_args!($fmt $(, $($arg)+)?));
    }
}

#[macro_export]
macro_rules! debug {
    ($fmt: literal $(, $($arg: tt)+)?) => {
        $crate::console::log($crate::console::Level::Debug, format_args!($fmt $(, $($arg)+)?));
    }
}
