use chrono::{TimeZone, Utc};
use s3translate::{
    run_batch, BatchRequest, RoundtripClient, RoundtripError, RoundtripRequest,
};
use s3translate_storage::{MemoryStore, PutObject};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const INPUT: &str = "lab-input";
const OUTPUT: &str = "lab-output";

fn write_source(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn request(source: &Path, download_to: &Path) -> RoundtripRequest {
    RoundtripRequest::new(source, INPUT, OUTPUT, "audit", download_to)
        .with_timing(Duration::from_secs(30), Duration::from_secs(5))
}

fn seed_translation(store: &MemoryStore, key: &str, body: &str, minute: u32) {
    store.insert_with_modified(
        OUTPUT,
        key,
        PutObject::text(body),
        Utc.with_ymd_and_hms(2026, 1, 2, 3, minute, 0).unwrap(),
    );
}

#[tokio::test(start_paused = true)]
async fn roundtrip_downloads_seeded_translation() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "incident.txt", "Service restored.");
    let dest = dir.path().join("results/nested/incident_translated.txt");

    let store = Arc::new(MemoryStore::new());
    seed_translation(
        &store,
        "audit/incident_translated_20260102_030400.txt",
        "サービスが復旧しました。",
        4,
    );

    let client = RoundtripClient::new(store.clone());
    let downloaded = client.roundtrip(&request(&source, &dest)).await.unwrap();

    assert_eq!(downloaded, dest);
    assert_eq!(fs::read_to_string(&dest).unwrap(), "サービスが復旧しました。");

    let uploaded = store.object(INPUT, "audit/incident.txt").unwrap();
    assert_eq!(uploaded.body.as_ref(), b"Service restored.");
    assert_eq!(
        uploaded.content_type.as_deref(),
        Some("text/plain; charset=utf-8")
    );
}

#[tokio::test(start_paused = true)]
async fn roundtrip_picks_most_recent_match_with_same_extension() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "incident.txt", "Service restored.");
    let dest = dir.path().join("out.txt");

    let store = Arc::new(MemoryStore::new());
    seed_translation(&store, "audit/incident_translated_20260102_030100.txt", "old", 1);
    seed_translation(&store, "audit/incident_translated_20260102_030500.txt", "new", 5);
    seed_translation(&store, "audit/incident_translated_20260102_030900.md", "other", 9);
    seed_translation(&store, "audit/other_translated_20260102_031000.txt", "unrelated", 10);

    let client = RoundtripClient::new(store);
    client.roundtrip(&request(&source, &dest)).await.unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
}

#[tokio::test(start_paused = true)]
async fn roundtrip_waits_for_translation_to_appear() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "incident.txt", "Service restored.");
    let dest = dir.path().join("out.txt");

    let store = Arc::new(MemoryStore::new());
    let writer = store.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(12)).await;
        seed_translation(&writer, "audit/incident_translated_20260102_030400.txt", "done", 4);
    });

    let started = Instant::now();
    let client = RoundtripClient::new(store.clone());
    client.roundtrip(&request(&source, &dest)).await.unwrap();

    // Polls at 0s, 5s, 10s and 15s
    assert_eq!(store.list_calls(), 4);
    assert_eq!(started.elapsed(), Duration::from_secs(15));
    assert_eq!(fs::read_to_string(&dest).unwrap(), "done");
}

#[tokio::test(start_paused = true)]
async fn listing_failures_are_retried_on_next_tick() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "incident.txt", "Service restored.");
    let dest = dir.path().join("out.txt");

    let store = Arc::new(MemoryStore::new());
    seed_translation(&store, "audit/incident_translated_20260102_030400.txt", "done", 4);
    store.fail_next_lists(2);

    let client = RoundtripClient::new(store.clone());
    client.roundtrip(&request(&source, &dest)).await.unwrap();

    assert_eq!(store.list_calls(), 3);
    assert_eq!(fs::read_to_string(&dest).unwrap(), "done");
}

#[tokio::test(start_paused = true)]
async fn roundtrip_times_out_without_downloading() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "incident.txt", "Service restored.");
    let dest = dir.path().join("out/incident_translated.txt");

    let store = Arc::new(MemoryStore::new());
    // Wrong extension never matches
    seed_translation(&store, "audit/incident_translated_20260102_030400.md", "nope", 4);

    let started = Instant::now();
    let client = RoundtripClient::new(store.clone());
    let err = client.roundtrip(&request(&source, &dest)).await.unwrap_err();

    assert!(err.is_timeout(), "unexpected error: {err}");
    assert_eq!(err.exit_code(), 1);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(30));
    assert!(elapsed <= Duration::from_secs(35));
    assert_eq!(store.list_calls(), 6);
    assert!(!dest.exists());
    assert!(!dest.parent().unwrap().exists());
}

#[tokio::test(start_paused = true)]
async fn missing_source_makes_no_calls() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let client = RoundtripClient::new(store.clone());

    let err = client
        .roundtrip(&request(&dir.path().join("absent.txt"), &dir.path().join("out.txt")))
        .await
        .unwrap_err();

    assert!(matches!(err, RoundtripError::MissingSource { .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(store.keys(INPUT).is_empty());
    assert_eq!(store.list_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn upload_failure_stops_before_polling() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "incident.txt", "Service restored.");
    let store = Arc::new(MemoryStore::new());
    store.fail_puts_under("audit/");

    let client = RoundtripClient::new(store.clone());
    let err = client
        .roundtrip(&request(&source, &dir.path().join("out.txt")))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "R002");
    assert_eq!(store.list_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn batch_runs_every_file_and_counts_failures() {
    let dir = tempfile::tempdir().unwrap();
    let source_dir = dir.path().join("Tokyo/audit");
    fs::create_dir_all(&source_dir).unwrap();
    write_source(&source_dir, "alpha.txt", "Alpha.");
    write_source(&source_dir, "bravo.txt", "Bravo.");
    write_source(&source_dir, "notes.md", "Skipped by the pattern.");

    let store = Arc::new(MemoryStore::new());
    // Only alpha gets a translation; bravo times out
    seed_translation(&store, "intake/alpha_translated_20260102_030400.txt", "アルファ", 4);

    let dest_dir = dir.path().join("results/translations");
    let request = BatchRequest {
        source_dir,
        pattern: "*.txt".to_string(),
        key_prefix: "intake".to_string(),
        dest_dir: dest_dir.clone(),
        input_bucket: INPUT.to_string(),
        output_bucket: OUTPUT.to_string(),
        timeout: Duration::from_secs(10),
        poll_interval: Duration::from_secs(5),
    };

    let client = RoundtripClient::new(store.clone());
    let summary = run_batch(&client, &request).await.unwrap();

    assert_eq!(summary.downloaded, vec![dest_dir.join("alpha_translated.txt")]);
    assert_eq!(summary.failure_count(), 1);
    assert!(summary.failures[0].1.is_timeout());
    assert_eq!(
        fs::read_to_string(dest_dir.join("alpha_translated.txt")).unwrap(),
        "アルファ"
    );
    assert_eq!(
        store.keys(INPUT),
        vec!["intake/alpha.txt".to_string(), "intake/bravo.txt".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn batch_without_matches_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "notes.md", "x");

    let request = BatchRequest {
        source_dir: dir.path().to_path_buf(),
        pattern: "*.txt".to_string(),
        key_prefix: "audit".to_string(),
        dest_dir: dir.path().join("out"),
        input_bucket: INPUT.to_string(),
        output_bucket: OUTPUT.to_string(),
        timeout: Duration::from_secs(10),
        poll_interval: Duration::from_secs(5),
    };

    let store = Arc::new(MemoryStore::new());
    let err = run_batch(&RoundtripClient::new(store), &request)
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 2);
    assert!(!dir.path().join("out").exists());
}
