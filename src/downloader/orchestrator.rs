// Acquisition orchestrator - validation, ordered fallback, post-download checks

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

use super::diagnostics::matched_patterns;
use super::errors::{EngineError, ErrorCategory};
use super::models::{
    artifact_filename, CanonicalSource, ConversionRequest, ConversionResult, MediaFormat,
};
use super::traits::AcquisitionStrategy;
use super::validator::Locator;
use crate::store::{ArtifactStore, Fingerprint};

pub struct ConversionOrchestrator {
    strategies: Vec<Box<dyn AcquisitionStrategy>>,
    store: Arc<dyn ArtifactStore>,
    in_flight: KeyedLocks,
}

impl ConversionOrchestrator {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            strategies: Vec::new(),
            store,
            in_flight: KeyedLocks::default(),
        }
    }

    /// Append a strategy; strategies are tried in insertion order
    pub fn add_strategy(&mut self, strategy: Box<dyn AcquisitionStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn with_strategy(mut self, strategy: Box<dyn AcquisitionStrategy>) -> Self {
        self.add_strategy(strategy);
        self
    }

    pub async fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        let format = MediaFormat::normalize(request.format_hint.as_deref());

        if request.locator.is_empty() {
            return ConversionResult::failure(ErrorCategory::MissingInput, format);
        }

        let Some(locator) = Locator::parse(&request.locator) else {
            info!(locator = %request.locator, "rejected malformed locator");
            return ConversionResult::failure(ErrorCategory::InvalidFormat, format);
        };

        let source = CanonicalSource::from_locator(&locator);
        let filename = artifact_filename(&locator, format);
        let destination = self.store.path_for(&filename);

        // Identical requests take turns on the same file; different keys never wait
        let _guard = self.in_flight.lock(&filename).await;
        let previous = self.store.fingerprint(&destination).await;

        let outcome = match self.acquire(&source, format, &destination).await {
            Ok(()) => self.verify_output(&destination).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(size) => {
                info!(%locator, %format, bytes = size, "conversion succeeded");
                ConversionResult::success(&locator, format)
            }
            Err(e) => {
                let category = ErrorCategory::from(&e);
                warn!(
                    %locator,
                    %format,
                    ?category,
                    patterns = ?matched_patterns(&e.to_string()),
                    "conversion failed: {}",
                    e
                );
                self.discard_partial(&destination, previous).await;
                ConversionResult::failure(category, format)
            }
        }
    }

    /// Try each strategy in order, stopping at the first that reports success
    async fn acquire(
        &self,
        source: &CanonicalSource,
        format: MediaFormat,
        destination: &Path,
    ) -> Result<(), EngineError> {
        let mut last_error =
            EngineError::Unknown("no acquisition strategies configured".to_string());

        for strategy in &self.strategies {
            info!("[Orchestrator] Trying strategy: {}", strategy.name());

            match strategy.attempt(source, format, destination).await {
                Ok(()) => {
                    info!("[Orchestrator] {} reported success", strategy.name());
                    return Ok(());
                }
                Err(e) => {
                    warn!("[Orchestrator] {} failed: {}", strategy.name(), e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Strategies can claim success and still leave nothing behind
    async fn verify_output(&self, destination: &Path) -> Result<u64, EngineError> {
        if !self.store.exists(destination).await {
            return Err(EngineError::EmptyOutput(format!(
                "{} missing after download",
                destination.display()
            )));
        }

        match self.store.size_of(destination).await {
            Ok(0) => Err(EngineError::EmptyOutput(format!(
                "{} is empty",
                destination.display()
            ))),
            Ok(size) => Ok(size),
            Err(e) => Err(EngineError::EmptyOutput(e.to_string())),
        }
    }

    /// Remove output left by this request; an artifact it never touched stays
    async fn discard_partial(&self, destination: &Path, previous: Option<Fingerprint>) {
        let current = match self.store.fingerprint(destination).await {
            Some(current) => current,
            None => return,
        };
        if previous == Some(current) {
            debug!(path = %destination.display(), "keeping untouched artifact");
            return;
        }
        if let Err(e) = self.store.delete(destination).await {
            error!("[Orchestrator] could not remove partial output: {}", e);
        }
    }
}

/// Per-key async locks; entries vanish once nobody holds or waits on them
#[derive(Default)]
struct KeyedLocks {
    locks: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.retain(|_, weak| weak.strong_count() > 0);

            match locks.get(key).and_then(Weak::upgrade) {
                Some(existing) => existing,
                None => {
                    let created = Arc::new(AsyncMutex::new(()));
                    locks.insert(key.to_string(), Arc::downgrade(&created));
                    created
                }
            }
        };

        mutex.lock_owned().await
    }
}
