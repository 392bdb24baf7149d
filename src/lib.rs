//! Media transcode and merge orchestration.
//!
//! One logical request fans out to multiple concurrent ffmpeg invocations;
//! per-variant outcomes are tracked independently and the aggregate is
//! returned as data, never as a thrown error. The routing layer that feeds
//! requests in, and the single-step image resize path, live elsewhere.

pub mod common;
pub mod config;
pub mod infrastructure;
pub mod modules;

pub use common::upload::UploadContext;
pub use common::workspace::LocalWorkspace;
pub use config::AppConfig;
pub use infrastructure::engine::{
    CompressSpec, Dimensions, EngineError, FfmpegEngine, TranscodeEngine,
};
pub use infrastructure::storage::{
    ObjectMetadata, ObjectStore, PutRequest, S3ObjectStore, UploadBody,
};
pub use modules::compression::{
    CompressRequest, CompressResult, CompressedVariant, CompressionOrchestrator, VariantSpec,
};
pub use modules::merge::{MergeRequest, SegmentMergeOrchestrator, SegmentRef};
pub use modules::thumbnail::{
    ThumbnailArtifact, ThumbnailExtractor, ThumbnailRequest, ThumbnailResult, ThumbnailSpec,
};
