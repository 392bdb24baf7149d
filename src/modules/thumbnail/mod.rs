pub mod dto;
pub mod service;

pub use dto::{ThumbnailArtifact, ThumbnailRequest, ThumbnailResult, ThumbnailSpec};
pub use service::ThumbnailExtractor;
