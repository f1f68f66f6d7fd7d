// Acquisition strategies, tried in this order by the orchestrator

pub mod stream;
pub mod ytdlp;

pub use stream::DirectStreamBackend;
pub use ytdlp::YtDlpBackend;
