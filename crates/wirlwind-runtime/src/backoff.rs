//! Reconnect backoff sequence (§4.7: "3s, 6s, 12s, … capped at 60s").

use std::time::Duration;

pub fn backoff_delay(attempt: u32) -> Duration {
    let secs = 3u64.saturating_mul(1u64 << attempt.min(10));
    Duration::from_secs(secs.min(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_matches_spec_example() {
        assert_eq!(backoff_delay(0), Duration::from_secs(3));
        assert_eq!(backoff_delay(1), Duration::from_secs(6));
        assert_eq!(backoff_delay(2), Duration::from_secs(12));
    }

    #[test]
    fn caps_at_sixty_seconds() {
        assert_eq!(backoff_delay(6), Duration::from_secs(60));
        assert_eq!(backoff_delay(20), Duration::from_secs(60));
    }
}
