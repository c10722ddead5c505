//! Token service configuration

use chrono::Duration;

/// Token service configuration, read once at construction
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Build a config from secrets plus duration strings ("15m", "7d", "900s").
    ///
    /// Unparseable TTL strings fall back to the defaults (15 minutes access,
    /// 7 days refresh).
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        access_ttl: &str,
        refresh_ttl: &str,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            access_ttl: parse_duration(access_ttl).unwrap_or_else(|| Duration::minutes(15)),
            refresh_ttl: parse_duration(refresh_ttl).unwrap_or_else(|| Duration::days(7)),
        }
    }
}

/// Parse a duration string of the form `<n>s|m|h|d`; a bare number is seconds.
pub(crate) fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let (value, unit) = match input.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => input.split_at(idx),
        None => (input, "s"),
    };

    let value: i64 = value.parse().ok()?;
    match unit {
        "s" => Some(Duration::seconds(value)),
        "m" => Some(Duration::minutes(value)),
        "h" => Some(Duration::hours(value)),
        "d" => Some(Duration::days(value)),
        _ => None,
    }
}
