//! Line-oriented command interpreter driving the kernel from the console.

use crate::config::CMD_BUF_SIZE;
use crate::fs::FileStore;
use crate::kernel::Kernel;
use crate::proc::{ControlTransfer, ProcessState};
use alloc::string::String;
use core::fmt::{self, Write};

pub const PROMPT: &str = "> ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Empty,
    Help,
    Ls,
    Cat(&'a str),
    Tasks,
    Run(&'a str),
    RunAll,
    Enable(&'a str),
    Disable(&'a str),
    Load(&'a str),
    Ps,
    Clear,
    Repeat,
    Quit,
    Usage(&'static str),
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (line, ""),
        };
        match (word, arg) {
            ("", _) => Command::Empty,
            ("help", _) => Command::Help,
            ("ls", _) => Command::Ls,
            ("tasks", _) => Command::Tasks,
            ("runall", _) => Command::RunAll,
            ("ps", _) => Command::Ps,
            ("clear", _) => Command::Clear,
            ("!!", _) => Command::Repeat,
            ("quit", _) | ("exit", _) => Command::Quit,
            ("cat", "") => Command::Usage("usage: cat <file>"),
            ("cat", file) => Command::Cat(file),
            ("run", "") => Command::Usage("usage: run <task>"),
            ("run", task) => Command::Run(task),
            ("enable", "") => Command::Usage("usage: enable <task>"),
            ("enable", task) => Command::Enable(task),
            ("disable", "") => Command::Usage("usage: disable <task>"),
            ("disable", task) => Command::Disable(task),
            ("load", "") => Command::Usage("usage: load <file>"),
            ("load", file) => Command::Load(file),
            _ => Command::Unknown(line),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// 行编辑的结果，由调用者回显到终端
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    Echo(u8),
    Erase,
    Submit(String),
    Ignore,
}

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const BS: u8 = 0x8;
const DL: u8 = 0x7f;

pub struct LineEditor {
    buf: String,
}

impl LineEditor {
    pub fn new() -> Self {
        return Self { buf: String::new() };
    }

    pub fn push(&mut self, byte: u8) -> Edit {
        match byte {
            CR | LF => {
                let line = core::mem::take(&mut self.buf);
                return Edit::Submit(line);
            }
            BS | DL => {
                if self.buf.pop().is_some() {
                    return Edit::Erase;
                }
                return Edit::Ignore;
            }
            0x20..=0x7e => {
                // 超出一行容量的字符直接丢弃
                if self.buf.len() >= CMD_BUF_SIZE - 1 {
                    return Edit::Ignore;
                }
                self.buf.push(byte as char);
                return Edit::Echo(byte);
            }
            _ => return Edit::Ignore,
        }
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Shell {
    last: String,
}

impl Shell {
    pub fn new() -> Self {
        return Self { last: String::new() };
    }

    pub fn execute<T: ControlTransfer>(
        &mut self,
        line: &str,
        kernel: &mut Kernel<T>,
        out: &mut dyn Write,
    ) -> Result<Flow, fmt::Error> {
        let command = Command::parse(line);
        if command == Command::Repeat {
            if self.last.is_empty() {
                writeln!(out, "No previous command.")?;
                return Ok(Flow::Continue);
            }
            let last = self.last.clone();
            writeln!(out, "Repeating last command: {}", last)?;
            return self.dispatch(Command::parse(&last), kernel, out);
        }
        if command != Command::Empty {
            self.last.clear();
            self.last.push_str(line.trim());
        }
        return self.dispatch(command, kernel, out);
    }

    fn dispatch<T: ControlTransfer>(
        &mut self,
        command: Command,
        kernel: &mut Kernel<T>,
        out: &mut dyn Write,
    ) -> Result<Flow, fmt::Error> {
        match command {
            Command::Empty | Command::Repeat => {}
            Command::Help => help(out)?,
            Command::Ls => {
                writeln!(out, "Files:")?;
                for file in kernel.files().files() {
                    writeln!(out, "  {}", file.name)?;
                }
            }
            Command::Cat(name) => match kernel.files().lookup(name) {
                Some(file) => match core::str::from_utf8(file.data) {
                    Ok(text) => write!(out, "{}", text)?,
                    Err(_) => writeln!(out, "cat: {}: binary file ({} bytes)", name, file.len())?,
                },
                None => writeln!(out, "cat: {}: no such file", name)?,
            },
            Command::Tasks => {
                writeln!(out, "ID  Name      Active")?;
                for task in kernel.tasks() {
                    let active = if task.active { "yes" } else { "no" };
                    writeln!(out, "{:<3} {:<9} {}", task.id, task.name, active)?;
                }
            }
            Command::Run(name) => {
                if let Err(err) = kernel.run(name) {
                    writeln!(out, "{}", err)?;
                }
            }
            Command::RunAll => {
                let ran = kernel.run_all();
                writeln!(out, "ran {} task(s)", ran)?;
            }
            Command::Enable(name) | Command::Disable(name) => {
                let active = matches!(command, Command::Enable(_));
                if let Err(err) = kernel.set_task_active(name, active) {
                    writeln!(out, "{}", err)?;
                }
            }
            Command::Load(path) => {
                writeln!(out, "Attempting to load file: {}", path)?;
                match kernel.load(path) {
                    Ok(pid) => writeln!(out, "pid {} exited", pid.0)?,
                    Err(err) => writeln!(out, "load failed: {}", err)?,
                }
            }
            Command::Ps => {
                writeln!(out, "PID  Entry       SP          State")?;
                for pcb in kernel.processes() {
                    let state = match pcb.state {
                        ProcessState::Runnable => "runnable",
                        ProcessState::Running => "running",
                        ProcessState::Stopped => "stopped",
                    };
                    writeln!(out, "{:<4} {:#010x}  {:#010x}  {}", pcb.pid.0, pcb.entry, pcb.sp, state)?;
                }
            }
            Command::Clear => write!(out, "\x1b[2J\x1b[H")?,
            Command::Quit => {
                writeln!(out, "Exiting shell + halting CPU.")?;
                return Ok(Flow::Quit);
            }
            Command::Usage(usage) => writeln!(out, "{}", usage)?,
            Command::Unknown(_) => writeln!(out, "Unknown command. Type 'help'.")?,
        }
        return Ok(Flow::Continue);
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

fn help(out: &mut dyn Write) -> fmt::Result {
    writeln!(out, "Available commands:")?;
    writeln!(out, "  help           - Show this help message")?;
    writeln!(out, "  ls             - List files")?;
    writeln!(out, "  cat <file>     - Display file contents")?;
    writeln!(out, "  tasks          - List available tasks")?;
    writeln!(out, "  run <task>     - Run a demo task once")?;
    writeln!(out, "  runall         - Run every active task once")?;
    writeln!(out, "  enable <task>  - Let runall run a task again")?;
    writeln!(out, "  disable <task> - Skip a task in runall")?;
    writeln!(out, "  load <file>    - Load and start an ELF program from the file system")?;
    writeln!(out, "  ps             - List live processes")?;
    writeln!(out, "  clear          - Clear the screen")?;
    writeln!(out, "  !!             - Repeat the last command")?;
    writeln!(out, "  quit           - Exit the shell (halts the kernel)")?;
    return Ok(());
}
