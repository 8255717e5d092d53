pub mod api_client;
pub mod auth;
pub mod extractions;
pub mod metrics;

pub use api_client::{ApiClient, ApiError};
pub use auth::{AuthError, AuthOperation, AuthOutcome, AuthService};
pub use extractions::{CachedExtraction, ExtractionCache};
