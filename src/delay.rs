// Delay Gate Module
// Validates and applies the caller-requested pre-response latency.

use crate::errors::ApiError;
use std::time::Duration;
use tokio::time::sleep;

/// Validate `delay_ms` against the configured ceiling.
///
/// Runs before any tokenization or emission so an oversized delay aborts
/// the request without doing work.
pub fn validate_delay(delay_ms: u64, max_delay_ms: u64) -> Result<(), ApiError> {
    if delay_ms > max_delay_ms {
        return Err(ApiError::DelayTooLong);
    }
    Ok(())
}

/// Suspend the current request for `delay_ms` before producing any output,
/// including the first streamed byte. Cooperative: other in-flight requests
/// are unaffected.
pub async fn apply_delay(delay_ms: u64) {
    let delay = Duration::from_millis(delay_ms);
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_zero_delay_is_valid() {
        assert!(validate_delay(0, 10_000).is_ok());
    }

    #[test]
    fn test_delay_at_ceiling_is_valid() {
        assert!(validate_delay(10_000, 10_000).is_ok());
    }

    #[test]
    fn test_delay_over_ceiling_is_rejected() {
        let err = validate_delay(10_001, 10_000).unwrap_err();
        assert!(matches!(err, ApiError::DelayTooLong));
    }

    #[tokio::test]
    async fn test_apply_delay_zero_returns_immediately() {
        let start = Instant::now();
        apply_delay(0).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_apply_delay_waits() {
        let start = Instant::now();
        apply_delay(30).await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
