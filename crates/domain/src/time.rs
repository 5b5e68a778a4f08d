//! Time and timestamp helpers.

use chrono::{DateTime, Local, Utc};

/// UTC timestamp used for `created_at`, activity logs, activation instants, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return the current wall-clock time in the host's local timezone.
///
/// Rules that depend on the hour of day read it from here rather than from
/// the UTC timestamp.
#[must_use]
pub fn local_now() -> DateTime<Local> {
    Local::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_return_local_time_matching_utc_instant() {
        let before = Utc::now();
        let local = local_now().with_timezone(&Utc);
        assert!(local >= before);
    }
}
