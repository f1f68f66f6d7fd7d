// HTTP boundary

pub mod cleanup;
pub mod convert;
pub mod health;
pub mod view;

pub use cleanup::cleanup;
pub use convert::{convert, serve_index};
pub use health::health_routes;
