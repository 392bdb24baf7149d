use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

/// Scoped allocation of working files under the configured temp directory.
///
/// Names are deterministic in the source reference plus the variant key or
/// requested width, so concurrent pipelines of one request never collide.
/// Collisions between concurrent *requests* for the same source and size
/// are possible and accepted.
#[derive(Clone, Debug)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output file for one compression variant: `{key}-{width}x-{source basename}`.
    /// The variant key keeps same-width siblings of one request apart.
    pub fn variant_file(&self, source_url: &str, key: &str, width: u32) -> WorkFile {
        WorkFile::new(
            self.root
                .join(format!("{}-{}x-{}", key, width, basename(source_url))),
        )
    }

    /// Output file for a merged video, named after the upload destination.
    pub fn merge_file(&self, merged_path: &str) -> WorkFile {
        WorkFile::new(self.root.join(basename(merged_path)))
    }

    /// Download target for one merge segment, indexed to keep input order.
    pub fn segment_file(&self, merged_path: &str, index: usize) -> WorkFile {
        WorkFile::new(
            self.root
                .join(format!("segment-{}-{}", index, basename(merged_path))),
        )
    }

    /// Output file for a single extracted thumbnail frame.
    pub fn thumbnail_file(&self, source_url: &str) -> WorkFile {
        WorkFile::new(self.root.join(format!("thumb-{}.jpg", stem(&basename(source_url)))))
    }
}

/// Last path segment of a URL or key, query string stripped.
fn basename(reference: &str) -> String {
    if let Ok(url) = Url::parse(reference) {
        if let Some(segments) = url.path_segments() {
            if let Some(last) = segments.filter(|s| !s.is_empty()).next_back() {
                return last.to_string();
            }
        }
    }

    reference
        .rsplit('/')
        .next()
        .unwrap_or(reference)
        .to_string()
}

fn stem(file_name: &str) -> &str {
    file_name.rsplit_once('.').map(|(s, _)| s).unwrap_or(file_name)
}

/// A working file owned by exactly one pipeline. Deleted explicitly via
/// [`WorkFile::remove`] on the normal paths; the `Drop` impl backstops the
/// error and panic paths so no run leaves files behind.
#[derive(Debug)]
pub struct WorkFile {
    path: PathBuf,
    removed: bool,
}

impl WorkFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn remove(mut self) {
        self.removed = true;
        if let Err(err) = tokio::fs::remove_file(&self.path).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "failed to remove working file");
            }
        }
    }
}

impl Drop for WorkFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %err, "failed to remove working file");
            }
        }
    }
}
