// s3translate - Round-trip client for the S3 translation workflow
//
// Uploads local documents to the input bucket (which triggers the translation
// Lambda), waits for the translated object to appear in the output bucket and
// downloads it. The batch driver repeats this for every matching file in a
// directory.

pub mod batch;
pub mod client;
mod error;
mod init;

pub use batch::{find_sources, run_batch, wildcard_match, BatchRequest, BatchSummary};
pub use client::{
    default_download_path, latest_match, translated_file_name, RoundtripClient, RoundtripRequest,
    RoundtripState,
};
pub use error::RoundtripError;
pub use init::init_tracing;
