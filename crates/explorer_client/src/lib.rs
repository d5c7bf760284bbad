//! Explorer client: HTTP API calls and background effect execution.
mod api;
mod engine;
mod types;

pub use api::{ApiClient, ClientSettings, ManifestApi};
pub use engine::EngineHandle;
pub use explorer_core::make_data_url;
pub use types::{ClientEvent, EngineError, FailureKind, RequestError};
