use std::time::Duration;

const BASE: Duration = Duration::from_millis(500);
const CAP: Duration = Duration::from_secs(60);

/// Exponential backoff with a hard ceiling: `attempt` 0 is the first
/// retry delay. Pure so the growth curve can be tested without a
/// clock or a sleep.
#[must_use]
pub fn delay_for_attempt(attempt: u32) -> Duration {
    let factor = 1u32.checked_shl(attempt.min(16)).unwrap_or(u32::MAX);
    BASE.checked_mul(factor).unwrap_or(CAP).min(CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_exponentially_until_the_cap() {
        let first = delay_for_attempt(0);
        let second = delay_for_attempt(1);
        let third = delay_for_attempt(2);
        assert_eq!(first, BASE);
        assert_eq!(second, BASE * 2);
        assert_eq!(third, BASE * 4);
        assert!(second > first);
    }

    #[test]
    fn never_exceeds_the_cap() {
        assert_eq!(delay_for_attempt(1000), CAP);
    }
}
