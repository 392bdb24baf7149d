use super::dto::{ThumbnailArtifact, ThumbnailRequest, ThumbnailResult};
use crate::common::upload;
use crate::common::workspace::LocalWorkspace;
use crate::infrastructure::engine::TranscodeEngine;
use crate::infrastructure::storage::{ObjectMetadata, ObjectStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

// Every thumbnail is the frame one second in.
const CAPTURE_OFFSET: Duration = Duration::from_secs(1);

/// Extracts a single poster frame from a source video and uploads it.
///
/// No fan-out: one job, one outcome. A failed dimension probe is tolerated
/// (the upload simply carries no metadata); a failed extraction or upload
/// is the job's failure.
pub struct ThumbnailExtractor {
    engine: Arc<dyn TranscodeEngine>,
    store: Arc<dyn ObjectStore>,
    workspace: LocalWorkspace,
}

impl ThumbnailExtractor {
    pub fn new(
        engine: Arc<dyn TranscodeEngine>,
        store: Arc<dyn ObjectStore>,
        workspace: LocalWorkspace,
    ) -> Self {
        Self {
            engine,
            store,
            workspace,
        }
    }

    pub async fn perform(&self, request: ThumbnailRequest) -> ThumbnailResult {
        let job_id = Uuid::new_v4();
        info!(%job_id, source = %request.video_source_url, "🎬 starting thumbnail extraction");

        let work = self.workspace.thumbnail_file(&request.video_source_url);
        let outcome = self.extract_and_upload(&request, work.path()).await;
        work.remove().await;

        match outcome {
            Ok(artifact) => {
                info!(%job_id, url = %artifact.url, "thumbnail uploaded");
                ThumbnailResult::success(artifact)
            }
            Err(err) => {
                error!(%job_id, error = %format!("{err:#}"), "thumbnail extraction failed");
                ThumbnailResult::failure(format!("{err:#}"))
            }
        }
    }

    async fn extract_and_upload(
        &self,
        request: &ThumbnailRequest,
        output: &std::path::Path,
    ) -> Result<ThumbnailArtifact> {
        self.engine
            .screenshot(&request.video_source_url, output, CAPTURE_OFFSET)
            .await
            .context("frame extraction failed")?;

        // Image probe, not video: the output is a still frame.
        let dimensions = self.engine.probe_image(output).await;
        let size = tokio::fs::metadata(output)
            .await
            .context("extracted frame missing")?
            .len();

        let content_type = request.thumbnail.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&request.thumbnail.file_path)
                .first_or(mime::IMAGE_JPEG)
                .to_string()
        });

        let metadata = dimensions.is_known().then(|| ObjectMetadata {
            width: dimensions.width,
            height: dimensions.height,
            duration: None,
        });

        upload::upload_file(
            self.store.as_ref(),
            &request.upload,
            &request.thumbnail.file_path,
            &content_type,
            output,
            metadata,
        )
        .await
        .with_context(|| format!("thumbnail upload failed for {}", request.thumbnail.file_path))?;

        Ok(ThumbnailArtifact {
            url: request.thumbnail.s3_url.clone(),
            width: dimensions.width,
            height: dimensions.height,
            size,
        })
    }
}
