use chrono::{DateTime, Utc};

/// Short UTC timestamp for lesson listings.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}
