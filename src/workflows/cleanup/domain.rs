use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Internal identifier the server uses in report and delete paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application entry as returned by the applications collection endpoint.
///
/// Every field is optional because the server payload is not trusted: an
/// entry without an internal id is reported and skipped rather than failing
/// the whole listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub public_id: Option<String>,
}

impl Application {
    /// Decode one entry of the listing on its own so a malformed entry only
    /// costs that entry. Anything that is not an object decodes to an entry
    /// without an id, which the service then skips.
    pub fn from_listing_entry(index: usize, entry: Value) -> Self {
        match serde_json::from_value(entry) {
            Ok(application) => application,
            Err(err) => {
                warn!(index, error = %err, "application entry is not an object; treating it as missing an id");
                Self::default()
            }
        }
    }

    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("UnnamedApp_Idx{index}"))
    }

    pub fn display_public_id(&self) -> String {
        self.public_id
            .clone()
            .unwrap_or_else(|| "UnknownPublicId".to_string())
    }

    /// Resolve the entry into a processable application, or `None` when the
    /// internal id is missing.
    pub fn tracked(&self, index: usize) -> Option<TrackedApplication> {
        let id = self.id.clone()?;
        Some(TrackedApplication {
            id: ApplicationId(id),
            name: self.display_name(index),
            public_id: self.display_public_id(),
        })
    }
}

/// Application with a usable internal id and display labels filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedApplication {
    pub id: ApplicationId,
    pub name: String,
    pub public_id: String,
}

/// Single entry of an application's report history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    #[serde(default, deserialize_with = "lenient_string")]
    pub evaluation_date: Option<String>,
}

impl ScanReport {
    pub fn evaluated_at(raw: &str) -> Self {
        Self {
            evaluation_date: Some(raw.to_string()),
        }
    }
}

/// Stale application queued for confirmation and deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionCandidate {
    pub name: String,
    pub public_id: String,
    pub id: ApplicationId,
    pub latest_scan: NaiveDate,
}

impl DeletionCandidate {
    pub fn from_tracked(application: &TrackedApplication, latest_scan: NaiveDate) -> Self {
        Self {
            name: application.name.clone(),
            public_id: application.public_id.clone(),
            id: application.id.clone(),
            latest_scan,
        }
    }
}

/// Calendar date before which an application's latest scan counts as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff {
    date: NaiveDate,
}

impl Cutoff {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn parse(raw: &str) -> Result<Self, CutoffError> {
        NaiveDate::parse_from_str(raw.trim(), Self::FORMAT)
            .map(Self::from_date)
            .map_err(|source| CutoffError {
                value: raw.to_string(),
                source,
            })
    }

    pub const fn from_date(date: NaiveDate) -> Self {
        Self { date }
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Midnight UTC at the start of the cutoff date.
    pub fn instant(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.date.and_time(NaiveTime::MIN))
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format(Self::FORMAT))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid cutoff date '{value}', expected YYYY-MM-DD")]
pub struct CutoffError {
    pub value: String,
    #[source]
    pub source: chrono::ParseError,
}

/// Keep non-blank strings; any other JSON type reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) if !value.trim().is_empty() => Ok(Some(value)),
        _ => Ok(None),
    }
}
