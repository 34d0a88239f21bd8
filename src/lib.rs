pub mod config;
pub mod errors;
pub mod executor;
pub mod perception;
pub mod simulator;

pub use config::{DragConfig, SimulatorConfig};
pub use errors::{PixeltapError, PixeltapResult};
pub use executor::{MotionProfile, PointerBackend, PointerController, TrajectoryPlanner};
pub use perception::{MatchResult, ScreenCapture, TemplateLocator};
pub use simulator::ClickSimulator;
