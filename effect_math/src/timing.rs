//! Conversion of elapsed days into the month scale used by effect curves.

/// Average month length in days. Months are never calendar months here.
pub const AVG_DAYS_PER_MONTH: f64 = 30.44;

/// Convert a whole number of elapsed days into fractional months.
pub fn months_between_days(days: i64) -> f64 {
    days as f64 / AVG_DAYS_PER_MONTH
}
