//! Caller-side expiry evaluation.
//!
//! Verification proves who signed a claim, not that it is still current. The
//! service reports freshness next to a successful verification instead of
//! turning an expired claim into a failure.

use crate::proof::claim::Claim;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Fresh,
    Expired,
    /// `expiresAt` is neither RFC 3339 nor a bare date.
    Unparseable,
}

/// Interprets `expiresAt` as RFC 3339, or as a `YYYY-MM-DD` date that stays
/// valid until the end of that UTC day.
pub fn expiry_instant(expires_at: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(expires_at) {
        return Some(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(expires_at, "%Y-%m-%d").ok()?;
    let next_day = date.succ_opt()?;
    Some(next_day.and_hms_opt(0, 0, 0)?.and_utc())
}

pub fn evaluate(claim: &Claim, now: DateTime<Utc>) -> Freshness {
    match expiry_instant(&claim.expires_at) {
        Some(expires) if now < expires => Freshness::Fresh,
        Some(_) => Freshness::Expired,
        None => Freshness::Unparseable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::fixtures::alice;
    use chrono::TimeZone;

    #[test]
    fn test_before_and_after_expiry() {
        let claim = alice();
        let before = Utc.with_ymd_and_hms(2024, 1, 1, 0, 59, 59).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        assert_eq!(evaluate(&claim, before), Freshness::Fresh);
        assert_eq!(evaluate(&claim, at), Freshness::Expired);
    }

    #[test]
    fn test_millisecond_timestamps_and_offsets() {
        assert_eq!(
            expiry_instant("2024-01-01T01:00:00.000Z"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap())
        );
        assert_eq!(
            expiry_instant("2024-01-01T10:00:00+09:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_bare_date_lasts_the_whole_day() {
        let mut claim = alice();
        claim.expires_at = "2024-01-01".to_string();
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
        let next = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(evaluate(&claim, late), Freshness::Fresh);
        assert_eq!(evaluate(&claim, next), Freshness::Expired);
    }

    #[test]
    fn test_unparseable_expiry() {
        let mut claim = alice();
        claim.expires_at = "tomorrow".to_string();
        assert_eq!(evaluate(&claim, Utc::now()), Freshness::Unparseable);
    }
}
