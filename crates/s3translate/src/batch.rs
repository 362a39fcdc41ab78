//! Sequential batch translation of a local directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::error;

use crate::client::{translated_file_name, RoundtripClient, RoundtripRequest};
use crate::RoundtripError;

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub source_dir: PathBuf,
    pub pattern: String,
    pub key_prefix: String,
    pub dest_dir: PathBuf,
    pub input_bucket: String,
    pub output_bucket: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub downloaded: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, RoundtripError)>,
}

impl BatchSummary {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Files in `dir` whose names match `pattern`, sorted by path.
///
/// A missing or unreadable directory yields no files.
pub fn find_sources(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .map(|name| wildcard_match(pattern, &name.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Match `name` against a pattern where `*` matches any run of characters and
/// `?` matches exactly one.
///
/// Only those two wildcards are supported. Character classes such as `[abc]`
/// and recursive `**` are not; their characters match literally.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let (mut p, mut n) = (0, 0);
    // Position of the last `*` and the name index it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    n = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Run a round trip for every matching file, one at a time.
///
/// Per-file failures are collected; only an empty match set or an unusable
/// destination directory stops the batch.
pub async fn run_batch(
    client: &RoundtripClient,
    request: &BatchRequest,
) -> Result<BatchSummary, RoundtripError> {
    let files = find_sources(&request.source_dir, &request.pattern);
    if files.is_empty() {
        return Err(RoundtripError::NoSourceFiles {
            dir: request.source_dir.clone(),
            pattern: request.pattern.clone(),
        });
    }

    fs::create_dir_all(&request.dest_dir).map_err(|source| RoundtripError::Io {
        path: request.dest_dir.clone(),
        source,
    })?;

    let mut summary = BatchSummary::default();
    for file in files {
        let roundtrip = RoundtripRequest::new(
            &file,
            request.input_bucket.as_str(),
            request.output_bucket.as_str(),
            &request.key_prefix,
            request.dest_dir.join(translated_file_name(&file)),
        )
        .with_timing(request.timeout, request.poll_interval);

        println!("[INFO] Processing {}", file.display());
        match client.roundtrip(&roundtrip).await {
            Ok(path) => summary.downloaded.push(path),
            Err(e) => {
                error!(file = %file.display(), code = e.code(), error = %e, "roundtrip failed");
                eprintln!("[ERROR] {}", e);
                println!("[ERROR] Failed: {}", file.display());
                summary.failures.push((file, e));
            }
        }
    }

    Ok(summary)
}
