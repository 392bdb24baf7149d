//! Derived-path rules for merge artifacts.
//!
//! A failed merge never surfaces as an error to the caller; instead a
//! zero-byte marker object is uploaded at a path derived from the intended
//! destination. Downstream consumers poll for the marker's existence.

/// Marker path for a failed merge: extension swapped for `.txt`, `-error`
/// appended to the stem, relocated into a sibling `logs/` directory one
/// level up.
///
/// `a/b/videos/42-abc-576w.mov` becomes `a/b/logs/42-abc-576w-error.txt`.
pub fn marker_path(original: &str) -> String {
    let (dir, file) = original.rsplit_once('/').unwrap_or(("", original));
    let stem = file.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file);
    let marker = format!("{stem}-error.txt");

    match dir.rsplit_once('/') {
        Some((base, _)) => format!("{base}/logs/{marker}"),
        None => format!("logs/{marker}"),
    }
}

/// Swap the extension after the last dot, appending one when there is none.
/// Merged outputs are always mp4 regardless of the requested destination.
pub fn with_extension(path: &str, extension: &str) -> String {
    match path.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.{extension}"),
        None => format!("{path}.{extension}"),
    }
}
