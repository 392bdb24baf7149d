mod support;

use media_resizer::{LocalWorkspace, MergeRequest, SegmentMergeOrchestrator, SegmentRef};
use std::sync::Arc;
use support::{MockEngine, MockStore, upload_context};

fn segment(key: &str) -> SegmentRef {
    SegmentRef {
        bucket: None,
        key: key.to_string(),
    }
}

fn request(segments: Vec<SegmentRef>) -> MergeRequest {
    MergeRequest {
        segments,
        merged_path: "user/videos/42-abc-576w.mov".to_string(),
        upload: upload_context(),
    }
}

#[tokio::test]
async fn segments_merge_in_list_order_not_download_order() {
    support::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(MockEngine::default());
    let store = Arc::new(MockStore::default());
    // Reversed delays: C finishes downloading first, A last.
    store.seed("media", "user/segments/a.mp4", b"A", 60);
    store.seed("media", "user/segments/b.mp4", b"B", 30);
    store.seed("media", "user/segments/c.mp4", b"C", 0);

    let orchestrator = SegmentMergeOrchestrator::new(
        engine,
        store.clone(),
        LocalWorkspace::new(dir.path()),
    );
    orchestrator
        .perform(request(vec![
            segment("user/segments/a.mp4"),
            segment("user/segments/b.mp4"),
            segment("user/segments/c.mp4"),
        ]))
        .await;

    // Destination extension normalized to mp4.
    let merged = store.object("media", "user/videos/42-abc-576w.mp4").unwrap();
    assert_eq!(&merged.body[..], b"ABC");
    assert_eq!(merged.content_type, "video/mp4");
    assert_eq!(merged.metadata.unwrap().height, 576);
    assert!(store.object("media", "user/videos/42-abc-576w.mov").is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn engine_failure_uploads_marker_instead_of_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(MockEngine {
        fail_concat: true,
        ..Default::default()
    });
    let store = Arc::new(MockStore::default());
    store.seed("media", "user/segments/a.mp4", b"A", 0);

    let orchestrator = SegmentMergeOrchestrator::new(
        engine,
        store.clone(),
        LocalWorkspace::new(dir.path()),
    );
    orchestrator
        .perform(request(vec![segment("user/segments/a.mp4")]))
        .await;

    let marker = store
        .object("media", "user/logs/42-abc-576w-error.txt")
        .unwrap();
    assert!(marker.body.is_empty());
    assert_eq!(marker.content_type, "text/plain");
    assert!(store.object("media", "user/videos/42-abc-576w.mp4").is_none());
    assert!(store.object("media", "user/videos/42-abc-576w.mov").is_none());
    assert_eq!(store.object_count(), 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn upload_failure_also_uploads_marker() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(MockEngine::default());
    let mut store = MockStore::default();
    store
        .fail_put_keys
        .insert("user/videos/42-abc-576w.mp4".to_string());
    let store = Arc::new(store);
    store.seed("media", "user/segments/a.mp4", b"A", 0);

    let orchestrator = SegmentMergeOrchestrator::new(
        engine,
        store.clone(),
        LocalWorkspace::new(dir.path()),
    );
    orchestrator
        .perform(request(vec![segment("user/segments/a.mp4")]))
        .await;

    assert!(
        store
            .object("media", "user/logs/42-abc-576w-error.txt")
            .is_some()
    );
    assert!(store.object("media", "user/videos/42-abc-576w.mp4").is_none());
}

#[tokio::test]
async fn missing_segment_uploads_marker() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(MockEngine::default());
    let store = Arc::new(MockStore::default());
    store.seed("media", "user/segments/a.mp4", b"A", 0);
    // b.mp4 is never seeded, so its download fails.

    let orchestrator = SegmentMergeOrchestrator::new(
        engine,
        store.clone(),
        LocalWorkspace::new(dir.path()),
    );
    orchestrator
        .perform(request(vec![
            segment("user/segments/a.mp4"),
            segment("user/segments/b.mp4"),
        ]))
        .await;

    assert!(
        store
            .object("media", "user/logs/42-abc-576w-error.txt")
            .is_some()
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn segments_can_come_from_another_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(MockEngine::default());
    let store = Arc::new(MockStore::default());
    store.seed("ingest", "raw/a.mp4", b"A", 0);
    store.seed("media", "user/segments/b.mp4", b"B", 0);

    let orchestrator = SegmentMergeOrchestrator::new(
        engine,
        store.clone(),
        LocalWorkspace::new(dir.path()),
    );
    orchestrator
        .perform(request(vec![
            SegmentRef {
                bucket: Some("ingest".to_string()),
                key: "raw/a.mp4".to_string(),
            },
            segment("user/segments/b.mp4"),
        ]))
        .await;

    let merged = store.object("media", "user/videos/42-abc-576w.mp4").unwrap();
    assert_eq!(&merged.body[..], b"AB");
}
