// Cleanup Sweeper - deletes artifacts older than the retention threshold

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use super::{ArtifactStore, StoreError};

/// Default retention used by `POST /cleanup`
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60 * 60);

/// Result of one sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub deleted_count: usize,
    /// Per-file failures; they never abort the sweep
    pub errors: Vec<String>,
}

pub struct CleanupSweeper {
    store: Arc<dyn ArtifactStore>,
}

impl CleanupSweeper {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Delete every artifact whose age exceeds `retention`.
    ///
    /// Fails only when the store cannot be listed at all.
    pub async fn sweep(&self, retention: Duration) -> Result<SweepReport, StoreError> {
        self.sweep_at(retention, SystemTime::now()).await
    }

    /// Same as [`sweep`](Self::sweep) with an explicit clock
    pub async fn sweep_at(
        &self,
        retention: Duration,
        now: SystemTime,
    ) -> Result<SweepReport, StoreError> {
        let artifacts = self.store.list_all().await?;
        let mut report = SweepReport::default();

        for artifact in artifacts {
            // Files stamped in the future count as brand new
            let age = now.duration_since(artifact.created_at).unwrap_or_default();
            if age <= retention {
                continue;
            }

            match self.store.delete(&artifact.path).await {
                Ok(()) => {
                    debug!(path = %artifact.path.display(), age_secs = age.as_secs(), "deleted stale artifact");
                    report.deleted_count += 1;
                }
                Err(e) => {
                    warn!("[Sweeper] {}", e);
                    report.errors.push(e.to_string());
                }
            }
        }

        info!(
            deleted = report.deleted_count,
            failed = report.errors.len(),
            retention_secs = retention.as_secs(),
            "cleanup sweep finished"
        );
        Ok(report)
    }

    /// Run a sweep every `interval` until the task is dropped
    pub async fn run_periodic(self: Arc<Self>, interval: Duration, retention: Duration) {
        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately; skip it so startup isn't a sweep
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep(retention).await {
                warn!("[Sweeper] periodic sweep failed: {}", e);
            }
        }
    }
}
