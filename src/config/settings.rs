use crate::config::env::{self, EnvKey};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// Same watermark asset for every overlay request; callers cannot pick their own.
const DEFAULT_WATERMARK_URL: &str = "https://d3attjoi5jlede.cloudfront.net/images/video-watermark.png";

// Per-job wall clock budget for one ffmpeg invocation, in seconds.
const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 240;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub temp_dir: PathBuf,
    pub watermark_url: String,
    pub engine_timeout_secs: u64,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            temp_dir: PathBuf::from(env::get_or(EnvKey::TempDir, "/tmp")),
            watermark_url: env::get_or(EnvKey::WatermarkUrl, DEFAULT_WATERMARK_URL),
            engine_timeout_secs: env::get_parsed(EnvKey::EngineTimeoutSecs, DEFAULT_ENGINE_TIMEOUT_SECS),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            ffprobe_path: env::get_or(EnvKey::FfprobePath, "ffprobe"),
            s3_endpoint: env::get(EnvKey::S3Endpoint).ok(),
            s3_region: env::get_or(EnvKey::S3Region, "us-east-1"),
            s3_access_key: env::get(EnvKey::S3AccessKey)?,
            s3_secret_key: env::get(EnvKey::S3SecretKey)?,
        })
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_timeout_secs)
    }
}
