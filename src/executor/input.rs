// Physical input simulation.
use std::time::Duration;

use async_trait::async_trait;
use enigo::{Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};

use crate::errors::{ProbeError, ProbeResult};
use crate::executor::keys::KeyInput;
use crate::perception::types::ScreenPoint;

/// Host-side input actions, in screen pixels.
#[async_trait]
pub trait InputDevice: Send + Sync {
    async fn tap(&self, at: ScreenPoint) -> ProbeResult<()>;

    /// Press at `from`, move to `to` over `steps` increments, release.
    async fn drag(&self, from: ScreenPoint, to: ScreenPoint, steps: u32) -> ProbeResult<()>;

    async fn press_key(&self, key: KeyInput) -> ProbeResult<()>;
}

/// Intermediate pointer positions for a drag, excluding `from` and including `to`.
pub fn drag_path(from: ScreenPoint, to: ScreenPoint, steps: u32) -> Vec<ScreenPoint> {
    let steps = steps.max(1);
    (1..=steps)
        .map(|i| {
            let t = f64::from(i) / f64::from(steps);
            let x = f64::from(from.x) + f64::from(to.x - from.x) * t;
            let y = f64::from(from.y) + f64::from(to.y - from.y) * t;
            ScreenPoint::new(x.round() as i32, y.round() as i32)
        })
        .collect()
}

/// Drives the real pointer and keyboard through enigo.
pub struct EnigoDevice {
    step_delay: Duration,
}

impl EnigoDevice {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    /// Runs `f` with a fresh enigo connection on a blocking thread.
    async fn with_enigo<F>(&self, f: F) -> ProbeResult<()>
    where
        F: FnOnce(&mut Enigo) -> Result<(), enigo::InputError> + Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            let mut enigo = Enigo::new(&Settings::default())
                .map_err(|e| ProbeError::Input(format!("connect: {e}")))?;
            f(&mut enigo).map_err(|e| ProbeError::Input(e.to_string()))
        })
        .await
        .map_err(|e| ProbeError::Input(format!("join: {e}")))?
    }
}

impl Default for EnigoDevice {
    fn default() -> Self {
        Self::new(Duration::from_millis(5))
    }
}

#[async_trait]
impl InputDevice for EnigoDevice {
    async fn tap(&self, at: ScreenPoint) -> ProbeResult<()> {
        tracing::debug!(x = at.x, y = at.y, "tap");
        self.with_enigo(move |enigo| {
            enigo.move_mouse(at.x, at.y, Coordinate::Abs)?;
            enigo.button(Button::Left, Direction::Click)
        })
        .await
    }

    async fn drag(&self, from: ScreenPoint, to: ScreenPoint, steps: u32) -> ProbeResult<()> {
        tracing::debug!(from = ?from, to = ?to, steps, "drag");
        let delay = self.step_delay;
        let path = drag_path(from, to, steps);
        self.with_enigo(move |enigo| {
            enigo.move_mouse(from.x, from.y, Coordinate::Abs)?;
            enigo.button(Button::Left, Direction::Press)?;
            for point in path {
                std::thread::sleep(delay);
                enigo.move_mouse(point.x, point.y, Coordinate::Abs)?;
            }
            enigo.button(Button::Left, Direction::Release)
        })
        .await
    }

    async fn press_key(&self, key: KeyInput) -> ProbeResult<()> {
        tracing::debug!(key = %key, "key press");
        self.with_enigo(move |enigo| enigo.key(key.to_enigo(), Direction::Click))
            .await
    }
}
