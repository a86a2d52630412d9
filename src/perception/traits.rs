use async_trait::async_trait;

use crate::errors::ProbeResult;
use crate::perception::types::ScreenRect;

/// Finds where the player currently renders its canvas on screen.
#[async_trait]
pub trait SurfaceLocator: Send + Sync {
    async fn bounds(&self) -> ProbeResult<ScreenRect>;
}

/// Append-only trace output written by the player.
///
/// Readers only ever look at the current byte length and, once the output has
/// settled, the full line sequence.
#[async_trait]
pub trait TraceSource: Send + Sync {
    async fn len(&self) -> ProbeResult<u64>;

    async fn read_lines(&self) -> ProbeResult<Vec<String>>;
}
