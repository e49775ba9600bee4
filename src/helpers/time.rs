use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// Absolute instant `lifetime_seconds` after `issued_at`.
/// Negative lifetimes clamp to `issued_at`, lifetimes past chrono's range clamp to `MAX_UTC`.
pub fn expires_at(issued_at: DateTime<Utc>, lifetime_seconds: i64) -> DateTime<Utc> {
    TimeDelta::try_seconds(lifetime_seconds.max(0))
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

pub fn get_instant() -> Instant {
    Instant::now()
}

#[cfg(test)]
mod test {
    use super::expires_at;
    use chrono::{DateTime, TimeZone, Utc};

    #[test]
    fn negative_lifetime_clamps() {
        let issued = Utc.timestamp_opt(50, 0).unwrap();
        assert_eq!(expires_at(issued, -10), issued);
    }

    #[test]
    fn huge_lifetime_clamps_to_max() {
        let issued = Utc.timestamp_opt(50, 0).unwrap();
        assert_eq!(expires_at(issued, 10_000_000_000_000), DateTime::<Utc>::MAX_UTC);
        assert_eq!(expires_at(issued, i64::MAX), DateTime::<Utc>::MAX_UTC);
    }
}
