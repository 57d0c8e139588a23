pub mod demo;
pub mod registry;

pub use registry::{Step, TaskInfo, TaskRegistry};
