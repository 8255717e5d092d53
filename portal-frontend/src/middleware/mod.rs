pub mod guard;
pub mod metrics;

pub use guard::{section_guard, SectionGuard};
pub use metrics::metrics_middleware;
