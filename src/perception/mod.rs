pub mod locator;
pub mod screenshot;

pub use locator::{MatchResult, TemplateLocator};
pub use screenshot::{ScreenCapture, XcapScreenCapture};
