//! Time utilities over the ledger clock

use soroban_sdk::Env;

/// Time utility functions
///
/// The ledger timestamp is read once per check and treated as an externally
/// supplied monotonic clock.
pub struct TimeUtils;

impl TimeUtils {
    /// Get the current ledger timestamp
    pub fn now(e: &Env) -> u64 {
        e.ledger().timestamp()
    }

    /// Check if a deadline has passed (current time >= deadline)
    pub fn is_expired(e: &Env, deadline: u64) -> bool {
        Self::now(e) >= deadline
    }

    /// Check if a timestamp is strictly in the future
    pub fn is_future(e: &Env, timestamp: u64) -> bool {
        timestamp > Self::now(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Ledger;

    #[test]
    fn test_now() {
        let env = Env::default();
        env.ledger().with_mut(|l| {
            l.timestamp = 1000;
        });

        assert_eq!(TimeUtils::now(&env), 1000);
    }

    #[test]
    fn test_is_expired() {
        let env = Env::default();
        env.ledger().with_mut(|l| {
            l.timestamp = 1000;
        });

        assert!(TimeUtils::is_expired(&env, 500));
        assert!(TimeUtils::is_expired(&env, 1000));
        assert!(!TimeUtils::is_expired(&env, 2000));
    }

    #[test]
    fn test_is_future() {
        let env = Env::default();
        env.ledger().with_mut(|l| {
            l.timestamp = 1000;
        });

        assert!(TimeUtils::is_future(&env, 1001));
        assert!(!TimeUtils::is_future(&env, 1000));
        assert!(!TimeUtils::is_future(&env, 500));
    }
}
