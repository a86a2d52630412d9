/// Locates the player's rendering surface among the desktop's windows.
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::errors::{ProbeError, ProbeResult};
use crate::perception::traits::SurfaceLocator;
use crate::perception::types::ScreenRect;

/// Window decorations to strip from the window frame to get the content area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceInsets {
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub right: i32,
    #[serde(default)]
    pub bottom: i32,
}

impl SurfaceInsets {
    pub fn apply(&self, frame: ScreenRect) -> ScreenRect {
        ScreenRect::new(
            frame.left + self.left,
            frame.top + self.top,
            frame.width - self.left - self.right,
            frame.height - self.top - self.bottom,
        )
    }
}

/// Snapshot of one top-level window.
#[derive(Debug, Clone)]
pub struct WindowInfo {
    pub title: String,
    pub frame: ScreenRect,
    pub minimized: bool,
}

/// Picks the first visible window whose title matches `pattern`.
pub fn select_window<'a>(windows: &'a [WindowInfo], pattern: &Regex) -> Option<&'a WindowInfo> {
    windows
        .iter()
        .find(|w| !w.minimized && w.frame.width > 0 && w.frame.height > 0 && pattern.is_match(&w.title))
}

fn list_windows_sync() -> ProbeResult<Vec<WindowInfo>> {
    let windows = xcap::Window::all().map_err(|e| ProbeError::Surface(format!("list windows: {e}")))?;
    Ok(windows
        .iter()
        .map(|w| WindowInfo {
            title: w.title().to_string(),
            frame: ScreenRect::new(
                w.x(),
                w.y(),
                i32::try_from(w.width()).unwrap_or(i32::MAX),
                i32::try_from(w.height()).unwrap_or(i32::MAX),
            ),
            minimized: w.is_minimized(),
        })
        .collect())
}

/// Enumerates top-level windows on a blocking thread.
pub async fn list_windows() -> ProbeResult<Vec<WindowInfo>> {
    tokio::task::spawn_blocking(list_windows_sync)
        .await
        .map_err(|e| ProbeError::Surface(format!("join: {e}")))?
}

/// Finds the player by window title through the OS window list.
pub struct WindowLocator {
    pattern: Regex,
    insets: SurfaceInsets,
}

impl WindowLocator {
    pub fn new(title_pattern: &str, insets: SurfaceInsets) -> ProbeResult<Self> {
        Ok(Self {
            pattern: Regex::new(title_pattern)?,
            insets,
        })
    }

    async fn find(&self) -> ProbeResult<Option<WindowInfo>> {
        let windows = list_windows().await?;
        Ok(select_window(&windows, &self.pattern).cloned())
    }

    /// Polls until a matching window exists.
    pub async fn wait_until_visible(&self, timeout: Duration) -> ProbeResult<ScreenRect> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(window) = self.find().await? {
                tracing::info!(title = %window.title, frame = ?window.frame, "player window found");
                return Ok(self.insets.apply(window.frame));
            }
            if Instant::now() >= deadline {
                return Err(ProbeError::Timeout {
                    what: "Player window did not appear",
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }
}

#[async_trait]
impl SurfaceLocator for WindowLocator {
    async fn bounds(&self) -> ProbeResult<ScreenRect> {
        let window = self.find().await?.ok_or_else(|| {
            ProbeError::Surface(format!("no window matching '{}'", self.pattern.as_str()))
        })?;
        Ok(self.insets.apply(window.frame))
    }
}
