//! Shared utilities for the axum-based HTTP surface: structured error
//! responses, custom extractors, a liveness endpoint and graceful shutdown.

pub mod errors;
pub mod extractors;
pub mod health;
pub mod shutdown;

pub use errors::{AppError, ErrorResponse};
pub use extractors::{UuidPath, ValidatedJson};
pub use health::{health_router, HealthResponse};
pub use shutdown::shutdown_signal;
