#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
pub mod console;
pub mod config;
pub mod error;
pub mod fs;
pub mod kernel;
pub mod mem;
pub mod proc;
pub mod shell;
pub mod sync;
pub mod task;

pub use error::{KernelError, Resource};
pub use kernel::Kernel;
