use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{ProbeError, ProbeResult};
use crate::perception::types::Canvas;
use crate::perception::window::SurfaceInsets;
use crate::scenario::state::Scenario;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    /// Extra scenarios run alongside the built-in ones.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Executable that hosts the content.
    pub command: String,
    /// Argument template. `{movie}` and `{trace}` are replaced with the
    /// content copy and the trace output path.
    pub args: Vec<String>,
    /// Regex matched against window titles to find the rendering surface.
    pub window_title: String,
    /// Content asset loaded for every scenario.
    pub content_path: PathBuf,
    pub surface_insets: SurfaceInsets,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: "ruffle".to_string(),
            args: default_player_args(),
            window_title: default_window_title(),
            content_path: PathBuf::from("assets/input_test.swf"),
            surface_insets: SurfaceInsets::default(),
        }
    }
}

fn default_player_args() -> Vec<String> {
    vec![
        "--trace-output".to_string(),
        "{trace}".to_string(),
        "{movie}".to_string(),
    ]
}

fn default_window_title() -> String {
    "Ruffle".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: f64,
    #[serde(default = "default_canvas_height")]
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

fn default_canvas_width() -> f64 {
    550.0
}

fn default_canvas_height() -> f64 {
    400.0
}

impl CanvasConfig {
    pub fn canvas(&self) -> ProbeResult<Canvas> {
        Canvas::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// How long the trace must stay the same size before it counts as idle.
    #[serde(default = "default_idle_window_ms")]
    pub idle_window_ms: u64,
    /// Shared deadline for one growth-then-idle wait.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,
    #[serde(default = "default_drag_step_delay_ms")]
    pub drag_step_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            idle_window_ms: default_idle_window_ms(),
            timeout_ms: default_timeout_ms(),
            launch_timeout_ms: default_launch_timeout_ms(),
            drag_step_delay_ms: default_drag_step_delay_ms(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_idle_window_ms() -> u64 {
    1000
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_launch_timeout_ms() -> u64 {
    5000
}

fn default_drag_step_delay_ms() -> u64 {
    5
}

impl TimingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_window_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }

    pub fn drag_step_delay(&self) -> Duration {
        Duration::from_millis(self.drag_step_delay_ms)
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Some(candidate);
            }
        }
    }

    let cwd = std::env::current_dir().ok()?;
    let candidate = cwd.join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Some(candidate);
    }

    None
}

/// Parses a config document and applies environment overrides.
pub fn parse_config(content: &str) -> ProbeResult<AppConfig> {
    let mut config: AppConfig = toml::from_str(content)?;
    if let Ok(command) = std::env::var("PLAYERPROBE_PLAYER_COMMAND") {
        tracing::debug!(command = %command, "player command overridden from environment");
        config.player.command = command;
    }
    config.canvas.canvas()?;
    if config.timing.poll_interval_ms == 0 || config.timing.idle_window_ms == 0 {
        return Err(ProbeError::Config(
            "poll_interval_ms and idle_window_ms must be non-zero".into(),
        ));
    }
    Ok(config)
}

/// Loads `config.toml`, or the defaults when no file exists.
pub fn load_config() -> ProbeResult<AppConfig> {
    let Some(path) = resolve_config_path() else {
        tracing::info!("no config.toml found; using defaults");
        return parse_config("");
    };
    let content = std::fs::read_to_string(&path)?;
    let config = parse_config(&content)?;
    tracing::info!(
        path = %path.display(),
        command = %config.player.command,
        scenarios = config.scenarios.len(),
        "config loaded"
    );
    Ok(config)
}
