pub mod ffmpeg;
pub mod probe;

pub use ffmpeg::FfmpegEngine;
pub use probe::Dimensions;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// One transcode job failed before producing a usable output.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: i32,
        stderr: String,
    },
    #[error("{tool} timed out after {after:?}")]
    Timeout { tool: String, after: Duration },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Size and overlay settings for one compression variant. Codec and quality
/// are fixed engine policy, not negotiated per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressSpec {
    /// Target width; height follows the source aspect ratio.
    pub width: u32,
    /// Composite the configured watermark over the output.
    pub overlay: bool,
}

/// Call surface over the external transcode tool.
///
/// Each operation is one engine invocation resolving to success or an
/// [`EngineError`]; a timeout surfaces as an error like any other. The
/// probes deliberately never fail: unknown dimensions come back zeroed.
#[async_trait]
pub trait TranscodeEngine: Send + Sync {
    /// Width-preserving-aspect compress of `source` into `output`.
    async fn compress(
        &self,
        source: &str,
        output: &Path,
        spec: CompressSpec,
    ) -> Result<(), EngineError>;

    /// Extract a single frame of `source` at `timestamp` into `output`.
    async fn screenshot(
        &self,
        source: &str,
        output: &Path,
        timestamp: Duration,
    ) -> Result<(), EngineError>;

    /// Temporal concatenation of local files, strictly in `inputs` order.
    async fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> Result<(), EngineError>;

    /// Video stream dimensions, `{0, 0}` when undeterminable.
    async fn probe_video(&self, path: &Path) -> Dimensions;

    /// Image dimensions via header inspection, `{0, 0}` when undeterminable.
    async fn probe_image(&self, path: &Path) -> Dimensions;
}
