use super::dto::{CompressRequest, CompressResult, CompressedVariant, VariantSpec};
use crate::common::upload::{self, UploadContext};
use crate::common::workspace::LocalWorkspace;
use crate::infrastructure::engine::{CompressSpec, TranscodeEngine};
use crate::infrastructure::storage::{ObjectMetadata, ObjectStore};
use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

/// Fans one source video out to N independent size variants.
///
/// Every variant runs its own transcode → probe → upload → cleanup pipeline
/// concurrently with its siblings; one variant failing never touches the
/// others, and the entry point itself never fails. Partial failure is data:
/// the caller inspects the `errors` map of the result.
#[derive(Clone)]
pub struct CompressionOrchestrator {
    engine: Arc<dyn TranscodeEngine>,
    store: Arc<dyn ObjectStore>,
    workspace: LocalWorkspace,
}

impl CompressionOrchestrator {
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

    pub async fn perform(&self, request: CompressRequest) -> CompressResult {
        let job_id = Uuid::new_v4();
        info!(
            %job_id,
            source = %request.source_url,
            variants = request.variants.len(),
            "🎬 starting compression request"
        );

        // One spawned task per variant so that even a panic inside a
        // pipeline is contained at this boundary.
        let mut pipelines: Vec<(String, JoinHandle<Result<CompressedVariant>>)> = Vec::new();
        for (key, spec) in &request.variants {
            let orchestrator = self.clone();
            let source = request.source_url.clone();
            let upload = request.upload.clone();
            let variant_key = key.clone();
            let spec = spec.clone();
            pipelines.push((
                key.clone(),
                tokio::spawn(async move {
                    orchestrator
                        .compress_variant(&source, &upload, &variant_key, &spec)
                        .await
                }),
            ));
        }

        let mut result = CompressResult::default();
        for (key, pipeline) in pipelines {
            let outcome = match pipeline.await {
                Ok(outcome) => outcome,
                Err(err) => Err(anyhow!("variant pipeline panicked: {err}")),
            };
            match outcome {
                Ok(variant) => {
                    info!(%job_id, variant = %key, url = %variant.url, "variant compressed");
                    result.compressed.insert(key, variant);
                }
                Err(err) => {
                    error!(%job_id, variant = %key, error = %format!("{err:#}"), "variant failed");
                    result.errors.insert(key, format!("{err:#}"));
                }
            }
        }

        info!(
            %job_id,
            compressed = result.compressed.len(),
            failed = result.errors.len(),
            "compression request settled"
        );
        result
    }

    async fn compress_variant(
        &self,
        source_url: &str,
        upload: &UploadContext,
        key: &str,
        spec: &VariantSpec,
    ) -> Result<CompressedVariant> {
        let work = self.workspace.variant_file(source_url, key, spec.width);
        let outcome = self.run_pipeline(source_url, upload, spec, work.path()).await;
        work.remove().await;
        outcome
    }

    async fn run_pipeline(
        &self,
        source_url: &str,
        upload: &UploadContext,
        spec: &VariantSpec,
        output: &std::path::Path,
    ) -> Result<CompressedVariant> {
        self.engine
            .compress(
                source_url,
                output,
                CompressSpec {
                    width: spec.width,
                    overlay: spec.overlay,
                },
            )
            .await
            .with_context(|| format!("compression failed for width {}", spec.width))?;

        let dimensions = self.engine.probe_video(output).await;
        let size = tokio::fs::metadata(output)
            .await
            .context("compressed output missing")?
            .len();

        let metadata = dimensions.is_known().then(|| ObjectMetadata {
            width: dimensions.width,
            height: dimensions.height,
            duration: None,
        });

        upload::upload_file(
            self.store.as_ref(),
            upload,
            &spec.file_path,
            &spec.content_type,
            output,
            metadata,
        )
        .await
        .with_context(|| format!("upload failed for {}", spec.file_path))?;

        Ok(CompressedVariant {
            url: spec.s3_url.clone(),
            width: dimensions.width,
            height: dimensions.height,
            size,
        })
    }
}
