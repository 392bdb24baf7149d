use std::env;
use std::str::FromStr;

pub enum EnvKey {
    TempDir,
    WatermarkUrl,
    EngineTimeoutSecs,
    FfmpegPath,
    FfprobePath,
    S3Endpoint,
    S3Region,
    S3AccessKey,
    S3SecretKey,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::TempDir => "RESIZER_TEMP_DIR",
            EnvKey::WatermarkUrl => "RESIZER_WATERMARK_URL",
            EnvKey::EngineTimeoutSecs => "RESIZER_ENGINE_TIMEOUT_SECS",
            EnvKey::FfmpegPath => "RESIZER_FFMPEG_PATH",
            EnvKey::FfprobePath => "RESIZER_FFPROBE_PATH",
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::S3Region => "AWS_REGION",
            EnvKey::S3AccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::S3SecretKey => "AWS_SECRET_ACCESS_KEY",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
