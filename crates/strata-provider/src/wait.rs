use std::time::{Duration, Instant};

use crate::error::ProviderError;

/// Bounded polling helper for adapters that need to wait on a remote
/// condition. Re-evaluates `predicate` until it returns `false` or
/// `timeout` elapses, sleeping `poll_interval` between checks.
///
/// There is no cooperative cancellation in the engine; this is the only
/// sanctioned way for an adapter to block on remote convergence.
pub fn wait_with_timeout(
    mut predicate: impl FnMut() -> bool,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), ProviderError> {
    let start = Instant::now();
    while predicate() {
        if start.elapsed() > timeout {
            return Err(ProviderError::Timeout);
        }
        std::thread::sleep(poll_interval);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_ok_once_predicate_turns_false() {
        let mut calls = 0;
        let result = wait_with_timeout(
            || {
                calls += 1;
                calls < 3
            },
            Duration::from_secs(1),
            Duration::from_millis(1),
        );
        assert!(result.is_ok());
        assert_eq!(calls, 3);
    }

    #[test]
    fn times_out_if_predicate_never_clears() {
        let result = wait_with_timeout(|| true, Duration::from_millis(5), Duration::from_millis(1));
        assert!(matches!(result, Err(ProviderError::Timeout)));
    }
}
