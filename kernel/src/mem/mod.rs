pub mod region;
pub mod stack;

pub use region::UserRegion;
pub use stack::{StackAllocator, StackSlot};
