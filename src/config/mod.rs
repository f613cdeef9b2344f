//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → GateConfig::to_options()
//!     → Middleware::new (applied once at startup)
//! ```
//!
//! # Design Decisions
//! - Config is read once at construction; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ErrorPolicy, GateConfig, KeySource, ObservabilityConfig};
pub use validation::{validate_config, ValidationError};
