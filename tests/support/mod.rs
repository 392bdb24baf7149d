#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use media_resizer::{
    CompressSpec, Dimensions, EngineError, ObjectMetadata, ObjectStore, PutRequest,
    TranscodeEngine, UploadBody, UploadContext,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Engine double: "transcoding" writes deterministic bytes so tests can
/// assert on uploaded content, and failures are injected per operation.
pub struct MockEngine {
    pub fail_widths: HashSet<u32>,
    pub fail_concat: bool,
    pub fail_screenshot: bool,
    /// Extra wall time for watermarked passes, so overlay pipelines finish
    /// after their plain same-width siblings.
    pub overlay_delay_ms: u64,
    pub video_dims: Dimensions,
    pub image_dims: Dimensions,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            fail_widths: HashSet::new(),
            fail_concat: false,
            fail_screenshot: false,
            overlay_delay_ms: 0,
            video_dims: Dimensions {
                width: 1024,
                height: 576,
            },
            image_dims: Dimensions {
                width: 320,
                height: 180,
            },
        }
    }
}

fn mock_failure(detail: &str) -> EngineError {
    EngineError::Failed {
        tool: "ffmpeg".to_string(),
        status: 1,
        stderr: detail.to_string(),
    }
}

#[async_trait]
impl TranscodeEngine for MockEngine {
    async fn compress(
        &self,
        _source: &str,
        output: &Path,
        spec: CompressSpec,
    ) -> Result<(), EngineError> {
        if self.fail_widths.contains(&spec.width) {
            return Err(mock_failure("unsupported codec"));
        }
        let body = if spec.overlay {
            format!("video-{}w-marked", spec.width)
        } else {
            format!("video-{}w", spec.width)
        };
        tokio::fs::write(output, body).await?;
        if spec.overlay && self.overlay_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.overlay_delay_ms)).await;
        }
        Ok(())
    }

    async fn screenshot(
        &self,
        _source: &str,
        output: &Path,
        _timestamp: Duration,
    ) -> Result<(), EngineError> {
        if self.fail_screenshot {
            return Err(mock_failure("no video stream"));
        }
        tokio::fs::write(output, b"frame").await?;
        Ok(())
    }

    async fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> Result<(), EngineError> {
        if self.fail_concat {
            return Err(mock_failure("mismatched segment formats"));
        }
        let mut merged = Vec::new();
        for input in inputs {
            merged.extend(tokio::fs::read(input).await?);
        }
        tokio::fs::write(output, merged).await?;
        Ok(())
    }

    async fn probe_video(&self, _path: &Path) -> Dimensions {
        self.video_dims
    }

    async fn probe_image(&self, _path: &Path) -> Dimensions {
        self.image_dims
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
    pub acl: String,
    pub metadata: Option<ObjectMetadata>,
}

/// In-memory object store. `seed` provides downloadable objects, with an
/// optional delay to make download completion order differ from request
/// order.
#[derive(Default)]
pub struct MockStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    seeded: Mutex<HashMap<String, (Bytes, u64)>>,
    puts: Mutex<Vec<String>>,
    pub fail_put_keys: HashSet<String>,
}

impl MockStore {
    pub fn seed(&self, bucket: &str, key: &str, body: &[u8], delay_ms: u64) {
        self.seeded.lock().unwrap().insert(
            format!("{bucket}/{key}"),
            (Bytes::copy_from_slice(body), delay_ms),
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{bucket}/{key}"))
            .cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn put_count(&self, key: &str) -> usize {
        self.puts
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.as_str() == key)
            .count()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn put(&self, request: PutRequest) -> anyhow::Result<()> {
        self.puts.lock().unwrap().push(request.key.clone());

        if self.fail_put_keys.contains(&request.key) {
            anyhow::bail!("mock upload refused for {}", request.key);
        }

        let body = match request.body {
            UploadBody::Bytes(bytes) => bytes,
            UploadBody::File(path) => Bytes::from(tokio::fs::read(&path).await?),
        };

        self.objects.lock().unwrap().insert(
            format!("{}/{}", request.bucket, request.key),
            StoredObject {
                body,
                content_type: request.content_type,
                acl: request.acl,
                metadata: request.metadata,
            },
        );
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str, destination: &Path) -> anyhow::Result<()> {
        let entry = self
            .seeded
            .lock()
            .unwrap()
            .get(&format!("{bucket}/{key}"))
            .cloned();

        let Some((body, delay_ms)) = entry else {
            anyhow::bail!("no such object {}/{}", bucket, key);
        };

        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        tokio::fs::write(destination, &body).await?;
        Ok(())
    }
}

/// Log output for failing tests; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env(),
        )
        .with_test_writer()
        .try_init();
}

pub fn upload_context() -> UploadContext {
    UploadContext {
        bucket: "media".to_string(),
        acl: "public-read".to_string(),
        region: "us-east-1".to_string(),
    }
}
