//! Decision metrics.
//!
//! # Metrics
//! - `rate_gate_requests_total` (counter): requests seen by the middleware,
//!   labelled by `outcome` (`excluded`, `allowed`, `limited`, `error`)

pub const REQUESTS_TOTAL: &str = "rate_gate_requests_total";

pub const EXCLUDED: &str = "excluded";
pub const ALLOWED: &str = "allowed";
pub const LIMITED: &str = "limited";
pub const ERROR: &str = "error";

/// Count one admission decision.
pub fn record_decision(outcome: &'static str) {
    ::metrics::counter!(REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}
