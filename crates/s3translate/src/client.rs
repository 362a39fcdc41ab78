//! Upload, poll and download
//!
//! The client never calls the translator. It uploads the source document,
//! which fires the bucket notification, then polls the output bucket until a
//! translated object for that key shows up or the deadline passes.

use s3translate_core::{split_extension, translated_prefix, upload_key};
use s3translate_storage::{ObjectStore, ObjectSummary, PutObject, TEXT_CONTENT_TYPE};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::RoundtripError;

/// Everything needed for one round trip.
#[derive(Debug, Clone)]
pub struct RoundtripRequest {
    pub source_path: PathBuf,
    pub input_bucket: String,
    pub output_bucket: String,
    /// Key in the input bucket.
    pub key: String,
    pub download_to: PathBuf,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl RoundtripRequest {
    /// Request with the default key `{key_prefix}/{file name}`.
    pub fn new(
        source_path: impl Into<PathBuf>,
        input_bucket: impl Into<String>,
        output_bucket: impl Into<String>,
        key_prefix: &str,
        download_to: impl Into<PathBuf>,
    ) -> Self {
        let source_path = source_path.into();
        let file_name = source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            key: upload_key(key_prefix, &file_name),
            source_path,
            input_bucket: input_bucket.into(),
            output_bucket: output_bucket.into(),
            download_to: download_to.into(),
            timeout: Duration::from_secs(180),
            poll_interval: Duration::from_secs(5),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_timing(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }
}

/// Phases of a round trip, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundtripState {
    Uploading,
    Polling,
    Found,
    Downloading,
    Done,
    DeadlineExceeded,
    Failed,
}

pub struct RoundtripClient {
    store: Arc<dyn ObjectStore>,
}

impl RoundtripClient {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload the source, wait for its translation and download it.
    ///
    /// Returns the local path of the downloaded translation.
    pub async fn roundtrip(&self, request: &RoundtripRequest) -> Result<PathBuf, RoundtripError> {
        let body = read_source(&request.source_path)?;

        transition(RoundtripState::Uploading, request);
        println!(
            "[INFO] Uploading {} -> s3://{}/{}",
            request.source_path.display(),
            request.input_bucket,
            request.key
        );
        let mut upload = PutObject::new(body);
        upload.content_type = content_type_for(&request.key).map(str::to_string);
        self.store
            .put_object(&request.input_bucket, &request.key, upload)
            .await
            .map_err(|e| fail(request, RoundtripError::Upload(e)))?;

        transition(RoundtripState::Polling, request);
        let prefix = translated_prefix(&request.key);
        let (_, extension) = split_extension(&request.key);
        println!(
            "[INFO] Waiting for translated object in s3://{}/{}*{}",
            request.output_bucket, prefix, extension
        );

        let Some(found) = self.poll(request, &prefix, extension).await else {
            transition(RoundtripState::DeadlineExceeded, request);
            return Err(fail(
                request,
                RoundtripError::Timeout {
                    bucket: request.output_bucket.clone(),
                    prefix,
                    extension: extension.to_string(),
                    waited: request.timeout,
                },
            ));
        };
        transition(RoundtripState::Found, request);

        transition(RoundtripState::Downloading, request);
        println!(
            "[INFO] Downloading s3://{}/{} -> {}",
            request.output_bucket,
            found.key,
            request.download_to.display()
        );
        self.download(request, &found.key)
            .await
            .map_err(|e| fail(request, e))?;

        transition(RoundtripState::Done, request);
        println!("[OK] Translation roundtrip complete.");
        println!("[OK] Output object: s3://{}/{}", request.output_bucket, found.key);
        println!("[OK] Local file: {}", request.download_to.display());
        Ok(request.download_to.clone())
    }

    /// Poll until a match appears or the deadline passes.
    async fn poll(
        &self,
        request: &RoundtripRequest,
        prefix: &str,
        extension: &str,
    ) -> Option<ObjectSummary> {
        let deadline = Instant::now() + request.timeout;

        while Instant::now() < deadline {
            match self.store.list_objects(&request.output_bucket, prefix).await {
                Ok(objects) => {
                    if let Some(found) = latest_match(objects, extension) {
                        return Some(found);
                    }
                    debug!(bucket = %request.output_bucket, prefix, "no translated object yet");
                }
                Err(e) => {
                    warn!(
                        bucket = %request.output_bucket,
                        prefix,
                        error = %e,
                        "listing failed, retrying"
                    );
                }
            }
            sleep(request.poll_interval).await;
        }

        None
    }

    async fn download(&self, request: &RoundtripRequest, key: &str) -> Result<(), RoundtripError> {
        let object = self
            .store
            .get_object(&request.output_bucket, key)
            .await
            .map_err(RoundtripError::Download)?;

        let dest = &request.download_to;
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RoundtripError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(dest, &object.body).map_err(|source| RoundtripError::Io {
            path: dest.clone(),
            source,
        })
    }
}

fn read_source(path: &Path) -> Result<Vec<u8>, RoundtripError> {
    if !path.is_file() {
        return Err(RoundtripError::MissingSource {
            path: path.to_path_buf(),
        });
    }
    fs::read(path).map_err(|_| RoundtripError::MissingSource {
        path: path.to_path_buf(),
    })
}

fn transition(state: RoundtripState, request: &RoundtripRequest) {
    debug!(?state, key = %request.key, "roundtrip state");
}

fn fail(request: &RoundtripRequest, err: RoundtripError) -> RoundtripError {
    transition(RoundtripState::Failed, request);
    err
}

/// Most recently modified object whose key ends with `extension`.
///
/// Objects without a modification time sort first. Ties go to the later key,
/// which for timestamped keys is the newer one.
pub fn latest_match(objects: Vec<ObjectSummary>, extension: &str) -> Option<ObjectSummary> {
    objects
        .into_iter()
        .filter(|object| object.key.ends_with(extension))
        .max_by(|a, b| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.key.cmp(&b.key))
        })
}

/// `{stem}_translated{ext}`, defaulting the extension to `.txt`.
pub fn translated_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_else(|| ".txt".to_string());
    format!("{}_translated{}", stem, extension)
}

/// Where a single-file round trip downloads to when no path is given.
pub fn default_download_path(results_dir: impl AsRef<Path>, source: &Path) -> PathBuf {
    results_dir.as_ref().join(translated_file_name(source))
}

fn content_type_for(key: &str) -> Option<&'static str> {
    match split_extension(key).1.to_ascii_lowercase().as_str() {
        ".txt" | ".md" => Some(TEXT_CONTENT_TYPE),
        ".json" => Some("application/json"),
        _ => None,
    }
}
