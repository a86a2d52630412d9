/// Trace output file handling and trace comparison.
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::{ProbeError, ProbeResult};
use crate::perception::traits::TraceSource;

/// Directory for per-scenario scratch files (trace output, content copies).
pub fn scratch_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("playerprobe"))
        .unwrap_or_else(|| std::env::temp_dir().join("playerprobe"))
}

/// Creates an empty file named `<prefix>-<uuid><suffix>` inside `dir`.
pub async fn create_unique_file(dir: &Path, prefix: &str, suffix: &str) -> ProbeResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{prefix}-{}{suffix}", uuid::Uuid::new_v4()));
    tokio::fs::File::create(&path).await?;
    Ok(path)
}

/// A trace output file the player appends to.
#[derive(Debug, Clone)]
pub struct TraceFile {
    path: PathBuf,
}

impl TraceFile {
    /// Creates a fresh, empty trace file in `dir`.
    pub async fn create_in(dir: &Path) -> ProbeResult<Self> {
        let path = create_unique_file(dir, "trace", ".txt").await?;
        tracing::debug!(path = %path.display(), "trace file created");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn remove(&self) -> ProbeResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl TraceSource for TraceFile {
    async fn len(&self) -> ProbeResult<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }

    async fn read_lines(&self) -> ProbeResult<Vec<String>> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(split_trace_lines(&String::from_utf8_lossy(&bytes)))
    }
}

/// Splits trace text on `\n`, `\r\n` or a lone `\r`. A trailing terminator
/// does not produce an empty last line.
pub fn split_trace_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Checks that `actual` is exactly `expected`, line for line.
pub fn compare_trace<E: AsRef<str>>(expected: &[E], actual: &[String]) -> ProbeResult<()> {
    let first_diff = (0..expected.len().max(actual.len())).find(|&i| {
        expected.get(i).map(|l| l.as_ref()) != actual.get(i).map(String::as_str)
    });

    let Some(index) = first_diff else {
        return Ok(());
    };
    Err(ProbeError::TraceMismatch {
        index,
        expected: expected
            .get(index)
            .map_or_else(|| "<missing>".to_string(), |l| l.as_ref().to_string()),
        actual: actual.get(index).cloned().unwrap_or_else(|| "<missing>".to_string()),
        expected_len: expected.len(),
        actual_len: actual.len(),
    })
}
