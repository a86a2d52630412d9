use std::sync::Arc;

use crate::errors::ProbeResult;
use crate::executor::dispatcher::dispatch;
use crate::executor::input::InputDevice;
use crate::perception::stability::TraceSynchronizer;
use crate::perception::trace::compare_trace;
use crate::perception::traits::SurfaceLocator;
use crate::perception::types::Canvas;
use crate::scenario::state::{Scenario, ScenarioReport, Step};

/// Runs scenarios against one launched player.
///
/// Each run waits for the player's startup output to settle, performs every
/// step, waits again for the resulting output to settle, and compares the
/// whole trace. The first error aborts the scenario; nothing is retried.
pub struct ScenarioRunner {
    canvas: Canvas,
    locator: Arc<dyn SurfaceLocator>,
    device: Arc<dyn InputDevice>,
    sync: TraceSynchronizer,
}

impl ScenarioRunner {
    pub fn new(
        canvas: Canvas,
        locator: Arc<dyn SurfaceLocator>,
        device: Arc<dyn InputDevice>,
        sync: TraceSynchronizer,
    ) -> Self {
        Self {
            canvas,
            locator,
            device,
            sync,
        }
    }

    pub async fn run(&mut self, scenario: &Scenario) -> ScenarioReport {
        let started_at = chrono::Utc::now();
        tracing::info!(scenario = %scenario.name, steps = scenario.steps.len(), "scenario started");

        match self.execute(scenario).await {
            Ok(trace) => {
                tracing::info!(scenario = %scenario.name, lines = trace.len(), "scenario passed");
                ScenarioReport::new(&scenario.name, Ok(()), trace, started_at)
            }
            Err(e) => {
                tracing::error!(scenario = %scenario.name, error = %e, "scenario failed");
                let trace = self.sync.source().read_lines().await.unwrap_or_default();
                ScenarioReport::new(&scenario.name, Err(&e), trace, started_at)
            }
        }
    }

    async fn execute(&mut self, scenario: &Scenario) -> ProbeResult<Vec<String>> {
        self.warn_off_canvas(scenario);

        self.sync.settle().await?;
        tracing::debug!(baseline = self.sync.last_observed(), "startup output settled");

        for step in &scenario.steps {
            dispatch(step, &self.canvas, self.locator.as_ref(), self.device.as_ref()).await?;
        }

        self.sync.settle().await?;

        let trace = self.sync.source().read_lines().await?;
        compare_trace(&scenario.expected_trace, &trace)?;
        Ok(trace)
    }

    fn warn_off_canvas(&self, scenario: &Scenario) {
        for step in &scenario.steps {
            let points = match step {
                Step::Tap { at } => vec![*at],
                Step::Drag { from, to, .. } => vec![*from, *to],
                Step::Key { .. } | Step::Pause { .. } => continue,
            };
            for point in points.into_iter().filter(|p| !self.canvas.contains(*p)) {
                tracing::warn!(scenario = %scenario.name, point = ?point, "step targets a point outside the canvas");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use crate::errors::ProbeError;
    use crate::executor::keys::KeyInput;
    use crate::perception::stability::SyncConfig;
    use crate::perception::traits::TraceSource;
    use crate::perception::types::{LogicalPoint, ScreenPoint, ScreenRect};
    use crate::scenario::builtin;

    /// Stand-in for the player: hit-tests input against two buttons on the
    /// canvas and traces events through a single in-order output queue.
    struct SimulatedPlayer {
        canvas: Canvas,
        bounds: ScreenRect,
        output: mpsc::UnboundedSender<String>,
        log: Arc<Mutex<Vec<String>>>,
        bounds_lookups: AtomicUsize,
    }

    impl SimulatedPlayer {
        fn spawn(bounds: ScreenRect, startup: bool) -> Arc<Self> {
            let (output, mut rx) = mpsc::unbounded_channel::<String>();
            let log = Arc::new(Mutex::new(Vec::new()));
            let sink = log.clone();
            tokio::spawn(async move {
                while let Some(line) = rx.recv().await {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    sink.lock().unwrap().push(line);
                }
            });
            if startup {
                let _ = output.send("Test started!".to_string());
            }
            Arc::new(Self {
                canvas: Canvas::new(550.0, 400.0).unwrap(),
                bounds,
                output,
                log,
                bounds_lookups: AtomicUsize::new(0),
            })
        }

        fn to_canvas(&self, at: ScreenPoint) -> LogicalPoint {
            let scale = (f64::from(self.bounds.width) / self.canvas.width())
                .min(f64::from(self.bounds.height) / self.canvas.height());
            let offset_x = (f64::from(self.bounds.width) - self.canvas.width() * scale) / 2.0;
            let offset_y = (f64::from(self.bounds.height) - self.canvas.height() * scale) / 2.0;
            LogicalPoint::new(
                (f64::from(at.x - self.bounds.left) - offset_x) / scale,
                (f64::from(at.y - self.bounds.top) - offset_y) / scale,
            )
        }

        fn button_at(&self, at: ScreenPoint) -> Option<&'static str> {
            let p = self.to_canvas(at);
            if (0.0..100.0).contains(&p.x) && (0.0..100.0).contains(&p.y) {
                Some("red")
            } else if (450.0..=550.0).contains(&p.x) && (300.0..=400.0).contains(&p.y) {
                Some("blue")
            } else {
                None
            }
        }

        fn trace(&self, line: String) {
            let _ = self.output.send(line);
        }

        /// Queues `line` on the player's own schedule, independent of input.
        fn trace_after(&self, delay: Duration, line: &str) {
            let output = self.output.clone();
            let line = line.to_string();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = output.send(line);
            });
        }
    }

    #[async_trait]
    impl InputDevice for SimulatedPlayer {
        async fn tap(&self, at: ScreenPoint) -> ProbeResult<()> {
            if let Some(button) = self.button_at(at) {
                for event in ["mouseDown", "mouseUp", "click"] {
                    self.trace(format!("{button} received {event}"));
                }
            }
            Ok(())
        }

        async fn drag(&self, from: ScreenPoint, to: ScreenPoint, _steps: u32) -> ProbeResult<()> {
            let down = self.button_at(from);
            let up = self.button_at(to);
            if let Some(button) = down {
                self.trace(format!("{button} received mouseDown"));
            }
            if let Some(button) = up {
                self.trace(format!("{button} received mouseUp"));
            }
            if down.is_some() && down == up {
                self.trace(format!("{} received click", down.unwrap_or_default()));
            }
            Ok(())
        }

        async fn press_key(&self, key: KeyInput) -> ProbeResult<()> {
            let KeyInput::Char(c) = key else {
                return Ok(());
            };
            let key_code = u32::from(c.to_ascii_uppercase());
            let char_code = u32::from(c);
            for event in ["keyDown", "keyUp"] {
                self.trace(format!("{event}: keyCode = {key_code}, charCode = {char_code}"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SurfaceLocator for SimulatedPlayer {
        async fn bounds(&self) -> ProbeResult<ScreenRect> {
            self.bounds_lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.bounds)
        }
    }

    #[async_trait]
    impl TraceSource for SimulatedPlayer {
        async fn len(&self) -> ProbeResult<u64> {
            let log = self.log.lock().unwrap();
            Ok(log.iter().map(|l| l.len() as u64 + 1).sum())
        }

        async fn read_lines(&self) -> ProbeResult<Vec<String>> {
            Ok(self.log.lock().unwrap().clone())
        }
    }

    fn runner_for(player: &Arc<SimulatedPlayer>) -> ScenarioRunner {
        ScenarioRunner::new(
            Canvas::new(550.0, 400.0).unwrap(),
            player.clone(),
            player.clone(),
            TraceSynchronizer::new(player.clone(), SyncConfig::default()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn click_events_pass_with_matching_bounds() {
        let player = SimulatedPlayer::spawn(ScreenRect::new(0, 0, 550, 400), true);
        let report = runner_for(&player).run(&builtin::click_events()).await;
        assert!(report.passed, "{:?}", report.error);
        assert_eq!(report.trace, builtin::click_events().expected_trace);
        // one lookup per tap and one for the drag
        assert_eq!(player.bounds_lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn click_events_pass_in_letterboxed_surface() {
        let player = SimulatedPlayer::spawn(ScreenRect::new(0, 63, 1080, 2337), true);
        let report = runner_for(&player).run(&builtin::click_events()).await;
        assert!(report.passed, "{:?}", report.error);
    }

    #[tokio::test(start_paused = true)]
    async fn key_events_pass() {
        let player = SimulatedPlayer::spawn(ScreenRect::new(200, 100, 1100, 800), true);
        let report = runner_for(&player).run(&builtin::key_events()).await;
        assert!(report.passed, "{:?}", report.error);
        assert_eq!(report.trace.len(), 5);
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test(start_paused = true)]
    async fn unexpected_trace_fails_the_scenario() {
        let player = SimulatedPlayer::spawn(ScreenRect::new(0, 0, 550, 400), true);
        let mut scenario = builtin::click_events();
        scenario.steps.truncate(1);
        let report = runner_for(&player).run(&scenario).await;
        assert!(!report.passed);
        let error = report.error.unwrap();
        assert!(error.contains("Trace mismatch at line 4"), "{error}");
        assert_eq!(report.trace.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_player_times_out() {
        let player = SimulatedPlayer::spawn(ScreenRect::new(0, 0, 550, 400), false);
        let report = runner_for(&player).run(&builtin::key_events()).await;
        assert!(!report.passed);
        assert_eq!(
            report.error.as_deref(),
            Some("No trace output was received within 10000 ms")
        );
        assert!(report.trace.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn collapsed_surface_aborts_before_input() {
        let player = SimulatedPlayer::spawn(ScreenRect::new(0, 0, 0, 400), true);
        let mut runner = runner_for(&player);
        let err = runner.execute(&builtin::click_events()).await.unwrap_err();
        assert!(matches!(err, ProbeError::InvalidBounds { width: 0, height: 400 }));
        assert_eq!(player.read_lines().await.unwrap(), vec!["Test started!".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_only_scenario_waits_for_late_output() {
        let player = SimulatedPlayer::spawn(ScreenRect::new(0, 0, 550, 400), true);
        player.trace_after(Duration::from_millis(2000), "late line");
        let scenario = Scenario {
            name: "late_output".to_string(),
            steps: vec![Step::Pause { ms: 500 }],
            expected_trace: vec!["Test started!".to_string(), "late line".to_string()],
        };

        let start = tokio::time::Instant::now();
        let report = runner_for(&player).run(&scenario).await;
        assert!(report.passed, "{:?}", report.error);
        assert!(start.elapsed() >= Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_without_new_output_times_out() {
        let player = SimulatedPlayer::spawn(ScreenRect::new(0, 0, 550, 400), true);
        let scenario = Scenario {
            name: "idle_start".to_string(),
            steps: Vec::new(),
            expected_trace: vec!["Test started!".to_string()],
        };
        let report = runner_for(&player).run(&scenario).await;
        assert!(!report.passed);
        assert_eq!(
            report.error.as_deref(),
            Some("No trace output was received within 10000 ms")
        );
        assert_eq!(report.trace, vec!["Test started!".to_string()]);
    }
}
