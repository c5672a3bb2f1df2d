//! Upload progress port

/// Receives byte-level upload progress.
///
/// Passed explicitly into each upload; implementations must be cheap
/// because `advance` is called once per chunk read.
pub trait UploadProgress: Send + Sync {
    /// Called once with the file size before the first chunk
    fn start(&self, total_bytes: u64);

    /// Called with the size of each chunk read from disk
    fn advance(&self, bytes: u64);

    /// Called once after the service accepted the upload
    fn finish(&self);
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUploadProgress;

impl UploadProgress for NoopUploadProgress {
    fn start(&self, _total_bytes: u64) {}

    fn advance(&self, _bytes: u64) {}

    fn finish(&self) {}
}
