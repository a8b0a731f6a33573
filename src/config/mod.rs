//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment variables
//!     → loader.rs (parse, apply defaults)
//!     → CheckConfig (validated, immutable)
//!     → consumed by the checker for exactly one run
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; one config, one run
//! - Every field has a usable default
//! - A malformed threshold aborts startup; a missing deadline does not

pub mod loader;
pub mod schema;

pub use loader::ConfigError;
pub use schema::CheckConfig;
