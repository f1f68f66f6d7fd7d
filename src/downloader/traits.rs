// Acquisition strategy trait definition

use async_trait::async_trait;
use std::path::Path;

use super::errors::EngineError;
use super::models::{CanonicalSource, MediaFormat};

/// One way of materialising a remote media file on disk
#[async_trait]
pub trait AcquisitionStrategy: Send + Sync {
    /// Name of the strategy (for logging)
    fn name(&self) -> &'static str;

    /// Fetch `source` in `format` into `destination`.
    ///
    /// `Ok(())` only means the engine reported success. Callers must still
    /// check that a non-empty file exists at `destination`.
    async fn attempt(
        &self,
        source: &CanonicalSource,
        format: MediaFormat,
        destination: &Path,
    ) -> Result<(), EngineError>;
}
