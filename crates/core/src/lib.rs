//! Pagechunk Core Library
//!
//! Foundational pieces shared by the chunking engine:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Application configuration (env + YAML file)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use logging::{init_logging, LogFormat, LogSettings};
