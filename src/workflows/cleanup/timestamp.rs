//! Scan timestamp parsing.
//!
//! The server mostly emits RFC 3339 timestamps, but older releases use a
//! `+hhmm` offset or a bare `Z` suffix with a fractional part. Strategies are
//! tried in order and the first success wins. Timestamps without any zone
//! information are rejected so that no local-time assumption leaks in.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// ISO 8601 layouts tried after RFC 3339. `%#z` takes `Z`, `+hh`, `+hhmm`
/// and `+hh:mm`; `%.f` makes the fraction optional.
const ISO8601_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Ordered parsing strategies for `evaluationDate` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStrategy {
    /// RFC 3339, then the wider ISO 8601 layouts: minute precision, a space
    /// separator, and hour-only or colon-less offsets.
    Iso8601,
    /// `YYYY-MM-DDTHH:MM:SS[.ffffff]Z`, only consulted for `Z`-suffixed input.
    ZuluPattern,
}

impl TimestampStrategy {
    pub const fn ordered() -> [Self; 2] {
        [Self::Iso8601, Self::ZuluPattern]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Iso8601 => "iso-8601",
            Self::ZuluPattern => "zulu-pattern",
        }
    }

    fn applies_to(self, raw: &str) -> bool {
        match self {
            Self::Iso8601 => true,
            Self::ZuluPattern => raw.ends_with('Z'),
        }
    }

    pub fn parse(self, raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        match self {
            Self::Iso8601 => {
                let mut parsed = DateTime::parse_from_rfc3339(raw);
                for layout in ISO8601_LAYOUTS {
                    if parsed.is_ok() {
                        break;
                    }
                    parsed = DateTime::parse_from_str(raw, layout);
                }
                parsed.map(|parsed| parsed.with_timezone(&Utc))
            }
            Self::ZuluPattern => {
                let pattern = if raw.contains('.') {
                    "%Y-%m-%dT%H:%M:%S%.fZ"
                } else {
                    "%Y-%m-%dT%H:%M:%SZ"
                };
                NaiveDateTime::parse_from_str(raw, pattern)
                    .map(|naive| Utc.from_utc_datetime(&naive))
            }
        }
    }
}

/// Successfully parsed timestamp along with the strategy that accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    pub instant: DateTime<Utc>,
    pub strategy: TimestampStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized scan timestamp '{value}' (tried {})", attempted_labels(.attempted))]
pub struct TimestampError {
    pub value: String,
    pub attempted: Vec<TimestampStrategy>,
}

impl TimestampError {
    /// Whether the `Z` fallback was consulted before giving up.
    pub fn fallback_attempted(&self) -> bool {
        self.attempted.contains(&TimestampStrategy::ZuluPattern)
    }
}

fn attempted_labels(attempted: &[TimestampStrategy]) -> String {
    attempted
        .iter()
        .map(|strategy| strategy.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn parse_scan_timestamp(raw: &str) -> Result<ParsedTimestamp, TimestampError> {
    let trimmed = raw.trim();
    let mut attempted = Vec::new();

    for strategy in TimestampStrategy::ordered() {
        if !strategy.applies_to(trimmed) {
            continue;
        }
        attempted.push(strategy);
        if let Ok(instant) = strategy.parse(trimmed) {
            return Ok(ParsedTimestamp { instant, strategy });
        }
    }

    Err(TimestampError {
        value: raw.to_string(),
        attempted,
    })
}
