use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::process::Command;
use tracing::warn;

/// Pixel dimensions of a probed output. `{0, 0}` means "unknown" and is
/// never treated as a hard failure by callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Query ffprobe for the first video stream's dimensions.
pub async fn video_dimensions(ffprobe_path: &str, path: &Path) -> Dimensions {
    let output = Command::new(ffprobe_path)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "v:0",
        ])
        .arg(path)
        .output()
        .await;

    match output {
        Ok(out) if out.status.success() => parse_streams(&out.stdout),
        Ok(out) => {
            warn!(
                path = %path.display(),
                stderr = %String::from_utf8_lossy(&out.stderr),
                "ffprobe could not read file, reporting unknown dimensions"
            );
            Dimensions::default()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to run ffprobe");
            Dimensions::default()
        }
    }
}

fn parse_streams(raw: &[u8]) -> Dimensions {
    let parsed: FfprobeOutput = match serde_json::from_slice(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(error = %err, "unparseable ffprobe output");
            return Dimensions::default();
        }
    };

    match parsed.streams.first() {
        Some(stream) => Dimensions {
            width: stream.width.unwrap_or(0),
            height: stream.height.unwrap_or(0),
        },
        None => Dimensions::default(),
    }
}

/// Read image dimensions from the file header, without decoding pixels.
pub fn image_dimensions(path: &Path) -> Dimensions {
    match image::image_dimensions(path) {
        Ok((width, height)) => Dimensions { width, height },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not read image dimensions");
            Dimensions::default()
        }
    }
}
