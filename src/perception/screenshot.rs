use image::RgbaImage;

use crate::errors::{PixeltapError, PixeltapResult};

/// Boundary trait for obtaining the current screen pixels.
/// The production backend reads the display via `xcap`; tests substitute a
/// fixed synthetic frame.
pub trait ScreenCapture {
    fn capture(&self) -> PixeltapResult<RgbaImage>;
}

/// Captures the primary monitor (first monitor as fallback).
pub struct XcapScreenCapture;

impl ScreenCapture for XcapScreenCapture {
    fn capture(&self) -> PixeltapResult<RgbaImage> {
        let monitors = xcap::Monitor::all()
            .map_err(|e| PixeltapError::Capture(format!("failed to enumerate monitors: {e}")))?;

        let mut primary = None;
        for monitor in &monitors {
            let is_primary = monitor
                .is_primary()
                .map_err(|e| PixeltapError::Capture(format!("failed to query monitor: {e}")))?;
            if is_primary {
                primary = Some(monitor);
                break;
            }
        }

        let monitor = primary
            .or_else(|| monitors.first())
            .ok_or_else(|| PixeltapError::Capture("no monitors found".into()))?;

        let frame = monitor
            .capture_image()
            .map_err(|e| PixeltapError::Capture(format!("screen capture failed: {e}")))?;

        tracing::debug!(width = frame.width(), height = frame.height(), "screen captured");
        Ok(frame)
    }
}
