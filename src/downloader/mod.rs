// Downloader module - acquisition strategies and their orchestration

pub mod backends;
pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod tools;
pub mod traits;
pub mod utils;
pub mod validator;

pub use errors::{EngineError, ErrorCategory};
pub use models::{ConversionRequest, ConversionResult, EngineConfig, MediaFormat};
pub use orchestrator::ConversionOrchestrator;
pub use traits::AcquisitionStrategy;
