use crate::common::upload::UploadContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailRequest {
    pub video_source_url: String,
    pub thumbnail: ThumbnailSpec,
    pub upload: UploadContext,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailSpec {
    /// Object key the thumbnail is uploaded under.
    pub file_path: String,
    /// Defaults from the file path, falling back to image/jpeg.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Public URL the thumbnail will be served from.
    pub s3_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailArtifact {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub size: u64,
}

/// Single-job outcome: exactly one of the two fields is populated.
#[derive(Debug, Default, Serialize)]
pub struct ThumbnailResult {
    pub thumbnail: Option<ThumbnailArtifact>,
    pub error: Option<String>,
}

impl ThumbnailResult {
    pub fn success(artifact: ThumbnailArtifact) -> Self {
        Self {
            thumbnail: Some(artifact),
            error: None,
        }
    }

    pub fn failure(detail: String) -> Self {
        Self {
            thumbnail: None,
            error: Some(detail),
        }
    }
}
