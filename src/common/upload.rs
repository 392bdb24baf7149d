use crate::infrastructure::storage::{ObjectMetadata, ObjectStore, PutRequest, UploadBody};
use anyhow::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upload details shared by every artifact of one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadContext {
    pub bucket: String,
    pub acl: String,
    pub region: String,
}

/// Stream a finished working file to the object store.
pub async fn upload_file(
    store: &dyn ObjectStore,
    ctx: &UploadContext,
    key: &str,
    content_type: &str,
    file: &Path,
    metadata: Option<ObjectMetadata>,
) -> Result<()> {
    store
        .put(PutRequest {
            bucket: ctx.bucket.clone(),
            key: key.to_string(),
            body: UploadBody::File(file.to_path_buf()),
            content_type: content_type.to_string(),
            acl: ctx.acl.clone(),
            region: ctx.region.clone(),
            metadata,
        })
        .await
}

/// Upload an in-memory body, e.g. a zero-byte error marker.
pub async fn upload_bytes(
    store: &dyn ObjectStore,
    ctx: &UploadContext,
    key: &str,
    content_type: &str,
    body: Bytes,
) -> Result<()> {
    store
        .put(PutRequest {
            bucket: ctx.bucket.clone(),
            key: key.to_string(),
            body: UploadBody::Bytes(body),
            content_type: content_type.to_string(),
            acl: ctx.acl.clone(),
            region: ctx.region.clone(),
            metadata: None,
        })
        .await
}
