pub mod elf;
pub mod launcher;
pub mod loader;
pub mod pcb;
pub mod pid;
pub mod table;

pub use launcher::{start, ControlTransfer};
pub use pcb::{ProcessControlBlock, ProcessState};
pub use pid::Pid;
pub use table::ProcessTable;
