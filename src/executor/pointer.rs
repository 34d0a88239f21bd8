use std::time::Duration;

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use rand::Rng;

use crate::errors::{PixeltapError, PixeltapResult};

/// Boundary trait for the OS input subsystem: absolute pointer placement and
/// primary-button state. Tests substitute a backend that records events
/// instead of performing them.
pub trait PointerBackend {
    fn move_to(&mut self, x: i32, y: i32) -> PixeltapResult<()>;
    fn button_down(&mut self) -> PixeltapResult<()>;
    fn button_up(&mut self) -> PixeltapResult<()>;
}

/// Production backend over `enigo`.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> PixeltapResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| PixeltapError::InputInjection(format!("input subsystem unavailable: {e}")))?;
        Ok(Self { enigo })
    }
}

impl PointerBackend for EnigoPointer {
    fn move_to(&mut self, x: i32, y: i32) -> PixeltapResult<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| PixeltapError::InputInjection(format!("pointer move rejected: {e}")))
    }

    fn button_down(&mut self) -> PixeltapResult<()> {
        self.enigo
            .button(Button::Left, Direction::Press)
            .map_err(|e| PixeltapError::InputInjection(format!("button press rejected: {e}")))
    }

    fn button_up(&mut self) -> PixeltapResult<()> {
        self.enigo
            .button(Button::Left, Direction::Release)
            .map_err(|e| PixeltapError::InputInjection(format!("button release rejected: {e}")))
    }
}

/// Issues click and drag gestures through a pointer backend. Blocking; every
/// pause is an explicit sleep. Failures surface to the caller unretried.
pub struct PointerController {
    backend: Box<dyn PointerBackend>,
}

impl PointerController {
    pub fn new(backend: Box<dyn PointerBackend>) -> Self {
        Self { backend }
    }

    pub fn move_to(&mut self, point: (i32, i32)) -> PixeltapResult<()> {
        self.backend.move_to(point.0, point.1)
    }

    pub fn button_down(&mut self) -> PixeltapResult<()> {
        self.backend.button_down()
    }

    pub fn button_up(&mut self) -> PixeltapResult<()> {
        self.backend.button_up()
    }

    /// Move to a point and press-release the primary button there.
    pub fn click(&mut self, point: (i32, i32)) -> PixeltapResult<()> {
        self.move_to(point)?;
        self.button_down()?;
        self.button_up()
    }

    /// Press at the first point, walk the remaining points with a jittered
    /// pause before each move, release after the last. The jitter factor is
    /// drawn fresh per step from U[0.8, 1.2].
    pub fn drag_along(
        &mut self,
        points: &[(i32, i32)],
        per_step_delay: Duration,
    ) -> PixeltapResult<()> {
        let Some(&first) = points.first() else {
            return Ok(());
        };
        self.move_to(first)?;
        self.button_down()?;

        let mut rng = rand::thread_rng();
        for &point in &points[1..] {
            std::thread::sleep(per_step_delay.mul_f64(rng.gen_range(0.8..1.2)));
            self.move_to(point)?;
        }

        self.button_up()
    }
}
