pub mod cell;
pub mod mutex;

pub use cell::SafeCell;
pub use mutex::{Mutex, SpinLock};
