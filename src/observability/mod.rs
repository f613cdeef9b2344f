//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware decisions produce:
//!     → logging.rs (structured tracing events: key, error)
//!     → metrics.rs (decision counters by outcome)
//!
//! Consumers:
//!     → Whatever tracing subscriber the host installs (or logging::init)
//!     → Whatever metrics recorder/exporter the host installs
//! ```
//!
//! # Design Decisions
//! - The crate emits events and counters but never installs an exporter
//! - Metrics are cheap (no-ops until a recorder is installed)

pub mod logging;
pub mod metrics;
