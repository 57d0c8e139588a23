use core::fmt;

// 被耗尽的资源种类
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    StackSlot,
    ProcessTable,
    TaskRegistry,
    Pid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelError {
    /// File name absent from the file store.
    NotFound,
    /// Bad magic/class/endianness/machine, or a malformed header field.
    Format(&'static str),
    /// Header table or segment data reaches past the end of the buffer.
    Bounds(&'static str),
    /// Segment destination `[start, end)` leaves the user region.
    RegionViolation { start: u64, end: u64 },
    ResourceExhausted(Resource),
    NoSuchTask,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::StackSlot => "stack slots",
            Resource::ProcessTable => "process table slots",
            Resource::TaskRegistry => "task registry slots",
            Resource::Pid => "process ids",
        };
        f.write_str(name)
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::NotFound => f.write_str("file not found"),
            KernelError::Format(why) => write!(f, "bad ELF: {}", why),
            KernelError::Bounds(why) => write!(f, "out of bounds: {}", why),
            KernelError::RegionViolation { start, end } => write!(
                f,
                "segment [{:#x}, {:#x}) outside user region",
                start, end
            ),
            KernelError::ResourceExhausted(res) => write!(f, "out of {}", res),
            KernelError::NoSuchTask => f.write_str("No such task."),
        }
    }
}

pub type KernelResult<T> = Result<T, KernelError>;
