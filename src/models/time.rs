use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// Julian Date representation.
/// JD 0 = 4713 BC January 1, 12:00 TT; J2000.0 = JD 2451545.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JulianDate(f64);

impl JulianDate {
    /// J2000.0 reference epoch (2000-01-01 12:00).
    pub const J2000: JulianDate = JulianDate(2451545.0);

    /// Create a new JD value.
    pub fn new(v: f64) -> Self {
        Self(v)
    }

    /// Raw JD value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn centuries_since_j2000(&self) -> f64 {
        (self.0 - Self::J2000.0) / 36525.0
    }

    /// Convert to Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn to_unix_timestamp(&self) -> f64 {
        (self.0 - 2440587.5) * 86400.0
    }

    /// Create from Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn from_unix_timestamp(timestamp: f64) -> Self {
        Self(timestamp / 86400.0 + 2440587.5)
    }

    /// Midnight (00:00 UTC) of a calendar date.
    ///
    /// Returns `None` for invalid calendar dates.
    pub fn from_calendar(year: i32, month: u32, day: u32) -> Option<Self> {
        let date = chrono::NaiveDate::from_ymd_opt(year, month, day)?;
        let dt = date.and_hms_opt(0, 0, 0)?.and_utc();
        Some(Self::from_datetime(dt))
    }

    /// Convert to chrono DateTime<Utc>.
    pub fn to_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        let secs = self.to_unix_timestamp();
        let secs_i64 = secs.floor() as i64;
        let nanos = ((secs - secs.floor()) * 1e9) as u32;
        chrono::DateTime::from_timestamp(secs_i64, nanos)
            .unwrap_or(chrono::DateTime::UNIX_EPOCH)
    }

    /// Create from chrono DateTime<Utc>.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self::from_unix_timestamp(dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9)
    }
}

impl From<f64> for JulianDate {
    fn from(v: f64) -> Self {
        JulianDate::new(v)
    }
}

impl Add<f64> for JulianDate {
    type Output = JulianDate;

    /// Offset a JD by a number of days.
    fn add(self, days: f64) -> JulianDate {
        JulianDate(self.0 + days)
    }
}

impl AddAssign<f64> for JulianDate {
    fn add_assign(&mut self, days: f64) {
        self.0 += days;
    }
}

impl Sub<JulianDate> for JulianDate {
    type Output = f64;

    /// Difference between two JDs, in days.
    fn sub(self, other: JulianDate) -> f64 {
        self.0 - other.0
    }
}

#[cfg(test)]
mod tests {
    use super::JulianDate;

    #[test]
    fn test_jd_new() {
        let jd = JulianDate::new(2460977.9827);
        assert_eq!(jd.value(), 2460977.9827);
    }

    #[test]
    fn test_jd_unix_epoch() {
        // JD 2440587.5 corresponds to the Unix epoch (1970-01-01 00:00 UTC)
        let jd = JulianDate::new(2440587.5);
        assert!(jd.to_unix_timestamp().abs() < 1.0);
    }

    #[test]
    fn test_jd_j2000_calendar() {
        // J2000.0 is 2000-01-01 12:00, so midnight of the same day is JD - 0.5
        let jd = JulianDate::from_calendar(2000, 1, 1).unwrap();
        assert!((jd.value() - 2451544.5).abs() < 1e-6);
    }

    #[test]
    fn test_jd_sampling_window_bounds() {
        let start = JulianDate::from_calendar(1910, 1, 1).unwrap();
        let end = JulianDate::from_calendar(2040, 1, 1).unwrap();
        assert!((start.value() - 2418672.5).abs() < 1e-6);
        assert!((end.value() - 2466154.5).abs() < 1e-6);
        assert!(start < end);
    }

    #[test]
    fn test_jd_arithmetic() {
        let jd = JulianDate::new(2451545.0);
        let later = jd + 10.0;
        assert_eq!(later.value(), 2451555.0);
        assert_eq!(later - jd, 10.0);
    }

    #[test]
    fn test_jd_roundtrip_datetime() {
        let original = JulianDate::new(2460000.25);
        let roundtrip = JulianDate::from_datetime(original.to_datetime());
        assert!((original.value() - roundtrip.value()).abs() < 1e-8);
    }

    #[test]
    fn test_jd_centuries_since_j2000() {
        let jd = JulianDate::new(2451545.0 + 36525.0);
        assert!((jd.centuries_since_j2000() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_jd_invalid_calendar_date() {
        assert!(JulianDate::from_calendar(2025, 2, 30).is_none());
    }
}
