use crate::common::upload::UploadContext;
use serde::{Deserialize, Serialize};

/// Location of one video segment in the object store. A segment without an
/// explicit bucket lives in the request's upload bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRef {
    #[serde(default)]
    pub bucket: Option<String>,
    pub key: String,
}

/// Request to concatenate `segments` in list order and upload the result
/// at `merged_path` (extension normalized to mp4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    pub segments: Vec<SegmentRef>,
    pub merged_path: String,
    pub upload: UploadContext,
}
