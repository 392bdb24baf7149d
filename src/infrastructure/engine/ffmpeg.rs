use super::probe::{self, Dimensions};
use super::{CompressSpec, EngineError, TranscodeEngine};
use crate::config::AppConfig;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

// Fixed quality policy applied to every compression: H.264, first 30
// seconds only, fast-start for progressive playback.
const VIDEO_CODEC_ARGS: [&str; 6] = ["-c:v", "libx264", "-preset", "slow", "-crf", "28"];
const DURATION_WINDOW_ARGS: [&str; 4] = ["-ss", "00:00:00", "-t", "30"];
const FASTSTART_ARGS: [&str; 2] = ["-movflags", "faststart"];

// Watermark sits at a fixed inset from the top-right corner.
const WATERMARK_OVERLAY: &str = "overlay=main_w-overlay_w-16:16";

// Stderr lines kept for the error payload when ffmpeg fails.
const STDERR_TAIL_LINES: usize = 32;

/// Observer for raw engine progress lines. Purely informational; never part
/// of the control flow.
pub type ProgressObserver = Arc<dyn Fn(&str) + Send + Sync>;

/// [`TranscodeEngine`] backed by the ffmpeg and ffprobe binaries.
pub struct FfmpegEngine {
    ffmpeg_path: String,
    ffprobe_path: String,
    watermark_url: String,
    timeout: Duration,
    progress: Option<ProgressObserver>,
}

impl FfmpegEngine {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            ffprobe_path: config.ffprobe_path.clone(),
            watermark_url: config.watermark_url.clone(),
            timeout: config.engine_timeout(),
            progress: None,
        }
    }

    pub fn with_progress_observer(mut self, observer: ProgressObserver) -> Self {
        self.progress = Some(observer);
        self
    }

    /// Run one ffmpeg invocation to completion within the configured
    /// wall-clock budget. Timeout kills the child and reports like any
    /// other engine failure.
    async fn run_ffmpeg(&self, args: Vec<String>) -> Result<(), EngineError> {
        debug!(args = ?args, "spawning ffmpeg");

        let mut child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                tool: "ffmpeg".to_string(),
                source,
            })?;

        let stderr = child.stderr.take();
        let observer = self.progress.clone();
        let reader = tokio::spawn(async move {
            let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if let Some(observer) = &observer {
                        observer(&line);
                    }
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
            }
            tail.into_iter().collect::<Vec<_>>().join("\n")
        });

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                return Err(EngineError::Timeout {
                    tool: "ffmpeg".to_string(),
                    after: self.timeout,
                });
            }
        };

        let stderr_tail = reader.await.unwrap_or_default();

        if !status.success() {
            return Err(EngineError::Failed {
                tool: "ffmpeg".to_string(),
                status: status.code().unwrap_or(-1),
                stderr: stderr_tail,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl TranscodeEngine for FfmpegEngine {
    async fn compress(
        &self,
        source: &str,
        output: &Path,
        spec: CompressSpec,
    ) -> Result<(), EngineError> {
        let mut args: Vec<String> = vec!["-i".into(), source.into()];

        if spec.overlay {
            args.extend(["-i".to_string(), self.watermark_url.clone()]);
            args.extend([
                "-filter_complex".to_string(),
                format!("[0:v]scale={}:-2[base];[base][1:v]{}", spec.width, WATERMARK_OVERLAY),
            ]);
        } else {
            args.extend(["-vf".to_string(), format!("scale={}:-2", spec.width)]);
        }

        args.extend(VIDEO_CODEC_ARGS.map(String::from));
        args.extend(DURATION_WINDOW_ARGS.map(String::from));
        args.extend(FASTSTART_ARGS.map(String::from));
        args.extend(["-y".to_string(), output.to_string_lossy().into_owned()]);

        info!(source, width = spec.width, overlay = spec.overlay, "compression start");
        self.run_ffmpeg(args).await
    }

    async fn screenshot(
        &self,
        source: &str,
        output: &Path,
        timestamp: Duration,
    ) -> Result<(), EngineError> {
        let args: Vec<String> = vec![
            "-ss".into(),
            format_timestamp(timestamp),
            "-i".into(),
            source.into(),
            "-frames:v".into(),
            "1".into(),
            "-q:v".into(),
            "2".into(),
            "-y".into(),
            output.to_string_lossy().into_owned(),
        ];

        info!(source, "thumbnail extraction start");
        self.run_ffmpeg(args).await
    }

    async fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> Result<(), EngineError> {
        // Concat demuxer over a list file keeps the exact input order.
        let list_path = output.with_extension("segments.txt");
        let mut list = String::new();
        for input in inputs {
            list.push_str(&format!(
                "file '{}'\n",
                input.to_string_lossy().replace('\'', r"'\''")
            ));
        }
        tokio::fs::write(&list_path, list).await?;

        let mut args: Vec<String> = vec![
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            list_path.to_string_lossy().into_owned(),
        ];
        args.extend(VIDEO_CODEC_ARGS.map(String::from));
        args.extend(FASTSTART_ARGS.map(String::from));
        args.extend(["-y".to_string(), output.to_string_lossy().into_owned()]);

        info!(segments = inputs.len(), "merge start");
        let result = self.run_ffmpeg(args).await;
        let _ = tokio::fs::remove_file(&list_path).await;
        result
    }

    async fn probe_video(&self, path: &Path) -> Dimensions {
        probe::video_dimensions(&self.ffprobe_path, path).await
    }

    async fn probe_image(&self, path: &Path) -> Dimensions {
        probe::image_dimensions(path)
    }
}

fn format_timestamp(timestamp: Duration) -> String {
    let total = timestamp.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        total / 3600,
        (total % 3600) / 60,
        total % 60,
        timestamp.subsec_millis()
    )
}
