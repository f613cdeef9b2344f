//! Limiter failure type.

use thiserror::Error;

/// Raised by a [`Limiter`](super::Limiter) that could not reach a decision.
///
/// This is distinct from a denied request: a limiter that answers "limit
/// exceeded" returns `Ok(Decision::LimitExceeded(..))`, never an error.
#[derive(Error, Debug)]
pub enum LimiterError {
    /// The backing store could not be reached.
    #[error("Limiter unavailable: {0}")]
    Unavailable(String),

    /// The backing store answered with an error.
    #[error("Limiter backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Limiter error: {0}")]
    Other(String),
}

impl LimiterError {
    /// Wrap any backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LimiterError::Backend(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LimiterError::Unavailable("redis down".into());
        assert_eq!(err.to_string(), "Limiter unavailable: redis down");

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = LimiterError::backend(io);
        assert_eq!(err.to_string(), "Limiter backend error: refused");
        assert!(std::error::Error::source(&err).is_some());
    }
}
