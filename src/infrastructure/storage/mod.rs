pub mod s3;

pub use s3::S3ObjectStore;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upload body: an in-memory buffer or a file streamed from disk.
#[derive(Debug, Clone)]
pub enum UploadBody {
    Bytes(Bytes),
    File(PathBuf),
}

/// Dimension metadata attached to an uploaded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub width: u32,
    pub height: u32,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PutRequest {
    pub bucket: String,
    pub key: String,
    pub body: UploadBody,
    pub content_type: String,
    pub acl: String,
    pub region: String,
    pub metadata: Option<ObjectMetadata>,
}

/// Narrow object-store surface the pipelines are written against.
/// No retries; one put or get, success or failure echoed back.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, request: PutRequest) -> anyhow::Result<()>;

    async fn get(&self, bucket: &str, key: &str, destination: &Path) -> anyhow::Result<()>;
}
