use std::path::Path;
use std::time::Duration;

use image::RgbaImage;

use crate::config::SimulatorConfig;
use crate::errors::PixeltapResult;
use crate::executor::{EnigoPointer, PointerBackend, PointerController, TrajectoryPlanner};
use crate::perception::{ScreenCapture, TemplateLocator, XcapScreenCapture};

/// Composition root: captures the screen once up front, localizes templates
/// in that frame and drives the pointer at them. Holds a single-slot cache of
/// the last successfully located position.
///
/// Single-threaded by design; callers needing concurrency must add their own
/// synchronization around the whole instance.
pub struct ClickSimulator {
    config: SimulatorConfig,
    capture: Box<dyn ScreenCapture>,
    locator: TemplateLocator,
    planner: TrajectoryPlanner,
    pointer: PointerController,
    frame: RgbaImage,
    last_position: Option<(i32, i32)>,
}

impl ClickSimulator {
    /// Captures an initial frame through `capture`; fails when no display is
    /// reachable.
    pub fn new(
        capture: Box<dyn ScreenCapture>,
        pointer_backend: Box<dyn PointerBackend>,
        planner: TrajectoryPlanner,
        config: SimulatorConfig,
    ) -> PixeltapResult<Self> {
        let frame = capture.capture()?;
        Ok(Self {
            locator: TemplateLocator::new(config.match_threshold),
            planner,
            pointer: PointerController::new(pointer_backend),
            config,
            capture,
            frame,
            last_position: None,
        })
    }

    /// Production wiring: xcap capture, enigo pointer, randomized motion
    /// profile from the drag config.
    pub fn with_system_backends(config: SimulatorConfig) -> PixeltapResult<Self> {
        let planner = TrajectoryPlanner::new(config.drag.duration_secs, config.drag.steps);
        Self::new(
            Box::new(XcapScreenCapture),
            Box::new(EnigoPointer::new()?),
            planner,
            config,
        )
    }

    /// Replaces the held frame with a fresh capture. Never done implicitly;
    /// there is no staleness detection.
    pub fn refresh_frame(&mut self) -> PixeltapResult<()> {
        self.frame = self.capture.capture()?;
        Ok(())
    }

    pub fn last_position(&self) -> Option<(i32, i32)> {
        self.last_position
    }

    /// Localizes `template` in the current frame. On a hit the position cache
    /// is overwritten; the score is discarded. A miss is a normal `None`.
    pub fn locate_only(
        &mut self,
        template: &Path,
        threshold: Option<f32>,
    ) -> PixeltapResult<Option<(i32, i32)>> {
        let template_img = TemplateLocator::load_template(template)?;
        match self.locator.locate(&self.frame, &template_img, threshold) {
            Some(result) => {
                tracing::info!(
                    template = %template.display(),
                    x = result.center.0,
                    y = result.center.1,
                    score = result.score,
                    "target located"
                );
                self.last_position = Some(result.center);
                Ok(Some(result.center))
            }
            None => {
                tracing::info!(template = %template.display(), "target not found");
                Ok(None)
            }
        }
    }

    /// Localizes and clicks the target after a delay. Returns `false` when
    /// the template is simply not on screen; errors only when the operation
    /// itself cannot run (capture, decode or input failure).
    pub fn click_target(
        &mut self,
        template: &Path,
        threshold: Option<f32>,
        delay: Option<Duration>,
    ) -> PixeltapResult<bool> {
        let Some(position) = self.locate_only(template, threshold)? else {
            return Ok(false);
        };
        std::thread::sleep(self.resolve_delay(delay));
        self.pointer.click(position)?;
        tracing::info!(x = position.0, y = position.1, "click issued");
        Ok(true)
    }

    /// Clicks the cached position from the last successful localization.
    /// Returns `false` without touching the pointer when the cache is empty.
    pub fn repeat_last_click(&mut self, delay: Option<Duration>) -> PixeltapResult<bool> {
        let Some(position) = self.last_position else {
            tracing::info!("no cached position to repeat");
            return Ok(false);
        };
        std::thread::sleep(self.resolve_delay(delay));
        self.pointer.click(position)?;
        tracing::info!(x = position.0, y = position.1, "cached click repeated");
        Ok(true)
    }

    /// Drags from `start` to `end` along a planned trajectory, pacing steps
    /// by the planner's nominal interval.
    pub fn drag_to(&mut self, start: (i32, i32), end: (i32, i32)) -> PixeltapResult<()> {
        let points = self.planner.plan(start, end);
        self.pointer.drag_along(&points, self.planner.step_interval())
    }

    fn resolve_delay(&self, delay: Option<Duration>) -> Duration {
        delay.unwrap_or_else(|| Duration::from_secs_f64(self.config.click_delay_secs))
    }
}
