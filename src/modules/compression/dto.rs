use crate::common::upload::UploadContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One compression request, fanned out to every entry in `variants`.
/// Keys are caller-defined labels like "144p" or "external".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressRequest {
    pub source_url: String,
    pub variants: HashMap<String, VariantSpec>,
    pub upload: UploadContext,
}

/// One requested output rendition of the source video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSpec {
    pub width: u32,
    pub height: Option<u32>,
    /// Object key the finished rendition is uploaded under.
    pub file_path: String,
    pub content_type: String,
    /// Public URL the rendition will be served from.
    pub s3_url: String,
    /// Composite the watermark over this rendition.
    #[serde(default)]
    pub overlay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedVariant {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub size: u64,
}

/// Aggregated outcome of one request. Every requested variant key lands in
/// exactly one of the two maps.
#[derive(Debug, Default, Serialize)]
pub struct CompressResult {
    pub compressed: HashMap<String, CompressedVariant>,
    pub errors: HashMap<String, String>,
}
