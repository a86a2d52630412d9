use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

use crate::config::AppConfig;
use crate::errors::{ProbeError, ProbeResult};
use crate::executor::input::InputDevice;
use crate::perception::stability::{SyncConfig, TraceSynchronizer};
use crate::perception::trace::{create_unique_file, scratch_dir, TraceFile};
use crate::perception::window::WindowLocator;
use crate::scenario::runner::ScenarioRunner;

/// Replaces `{movie}` and `{trace}` in each argument.
pub fn substitute_args(template: &[String], movie: &Path, trace: &Path) -> Vec<String> {
    let movie = movie.to_string_lossy();
    let trace = trace.to_string_lossy();
    template
        .iter()
        .map(|arg| arg.replace("{movie}", &movie).replace("{trace}", &trace))
        .collect()
}

/// A player process launched on a private copy of the content, writing to a
/// fresh trace file. Dropping the session kills the player.
pub struct PlayerSession {
    child: Child,
    trace: TraceFile,
    movie: PathBuf,
    locator: Arc<WindowLocator>,
}

impl PlayerSession {
    pub async fn launch(config: &AppConfig) -> ProbeResult<Self> {
        let dir = scratch_dir();
        let trace = TraceFile::create_in(&dir).await?;
        let movie = match copy_content(&config.player.content_path, &dir).await {
            Ok(movie) => movie,
            Err(e) => {
                let _ = trace.remove().await;
                return Err(e);
            }
        };

        let args = substitute_args(&config.player.args, &movie, trace.path());
        tracing::info!(command = %config.player.command, args = ?args, "launching player");
        let spawned = Command::new(&config.player.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                let _ = trace.remove().await;
                let _ = tokio::fs::remove_file(&movie).await;
                return Err(ProbeError::Launch(format!("{}: {e}", config.player.command)));
            }
        };
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_output(stdout, "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_output(stderr, "stderr"));
        }

        let locator = Arc::new(WindowLocator::new(
            &config.player.window_title,
            config.player.surface_insets,
        )?);

        let mut session = Self {
            child,
            trace,
            movie,
            locator,
        };
        if let Err(e) = session.wait_for_window(config).await {
            session.shutdown().await;
            return Err(e);
        }
        Ok(session)
    }

    async fn wait_for_window(&mut self, config: &AppConfig) -> ProbeResult<()> {
        let bounds = self
            .locator
            .wait_until_visible(config.timing.launch_timeout())
            .await?;
        if let Some(status) = self.child.try_wait()? {
            return Err(ProbeError::Launch(format!("player exited early with {status}")));
        }
        tracing::debug!(bounds = ?bounds, center = ?bounds.center(), "player surface visible");
        Ok(())
    }

    pub fn trace(&self) -> &TraceFile {
        &self.trace
    }

    /// Builds a runner wired to this session's window and trace.
    pub fn runner(&self, config: &AppConfig, device: Arc<dyn InputDevice>) -> ProbeResult<ScenarioRunner> {
        let sync = TraceSynchronizer::new(Arc::new(self.trace.clone()), SyncConfig::from(&config.timing));
        Ok(ScenarioRunner::new(
            config.canvas.canvas()?,
            self.locator.clone(),
            device,
            sync,
        ))
    }

    /// Kills the player and removes the scratch files.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::warn!(error = %e, "failed to stop player");
        }
        if let Err(e) = self.trace.remove().await {
            tracing::warn!(error = %e, "failed to remove trace file");
        }
        if let Err(e) = tokio::fs::remove_file(&self.movie).await {
            tracing::warn!(error = %e, "failed to remove content copy");
        }
    }
}

/// Relays player console output into the log so it never mixes with the
/// report on our own stdout. Returns the number of lines relayed.
async fn forward_output<R: AsyncRead + Unpin>(reader: R, stream: &'static str) -> usize {
    let mut lines = BufReader::new(reader).lines();
    let mut count = 0;
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                tracing::debug!(stream, line = %line, "player output");
                count += 1;
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(stream, error = %e, "player output closed");
                break;
            }
        }
    }
    count
}

async fn copy_content(source: &Path, dir: &Path) -> ProbeResult<PathBuf> {
    let suffix = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let target = create_unique_file(dir, "movie", &suffix).await?;
    if let Err(e) = tokio::fs::copy(source, &target).await {
        let _ = tokio::fs::remove_file(&target).await;
        return Err(ProbeError::Launch(format!("copy content {}: {e}", source.display())));
    }
    Ok(target)
}
