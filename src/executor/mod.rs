pub mod pointer;
pub mod trajectory;

pub use pointer::{EnigoPointer, PointerBackend, PointerController};
pub use trajectory::{MotionProfile, TrajectoryPlanner};
