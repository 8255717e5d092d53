//! portal-core: error type, logging setup and request tracing shared by the job portal crates.
pub mod error;
pub mod middleware;
pub mod observability;
