use chrono::{DateTime, Utc};
use tracing::warn;

use super::domain::{Cutoff, DeletionCandidate, ScanReport, TrackedApplication};
use super::timestamp::{parse_scan_timestamp, ParsedTimestamp, TimestampError};

/// Outcome of comparing an application's latest scan with the cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Stale(DeletionCandidate),
    Retained { latest_scan: DateTime<Utc> },
    Indeterminate(IndeterminateReason),
}

impl Classification {
    pub fn candidate(&self) -> Option<&DeletionCandidate> {
        match self {
            Self::Stale(candidate) => Some(candidate),
            _ => None,
        }
    }
}

/// Why no usable latest-scan timestamp could be established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndeterminateReason {
    NoHistory,
    MissingEvaluationDate,
    UnparsableTimestamp(TimestampError),
}

impl IndeterminateReason {
    pub fn describe(&self) -> String {
        match self {
            Self::NoHistory => "no scan history found".to_string(),
            Self::MissingEvaluationDate => {
                "latest report carries no evaluation date".to_string()
            }
            Self::UnparsableTimestamp(err) if err.fallback_attempted() => {
                format!("{err}; the Z-suffix fallback also failed")
            }
            Self::UnparsableTimestamp(err) => {
                format!("{err}; no fallback exists for timestamps without a Z suffix")
            }
        }
    }
}

/// Pure decision rule: stale when the latest scan is strictly before the
/// cutoff instant.
#[derive(Debug, Clone, Copy)]
pub struct StalenessClassifier {
    cutoff: Cutoff,
}

impl StalenessClassifier {
    pub fn new(cutoff: Cutoff) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> Cutoff {
        self.cutoff
    }

    pub fn classify(
        &self,
        application: &TrackedApplication,
        history: &[ScanReport],
    ) -> Classification {
        let latest = match latest_scan(history) {
            Ok(latest) => latest,
            Err(reason) => return Classification::Indeterminate(reason),
        };

        if !history_is_newest_first(history, latest.instant) {
            warn!(
                application = %application.id,
                "scan history is not ordered newest first; using the first report anyway"
            );
        }

        if latest.instant < self.cutoff.instant() {
            Classification::Stale(DeletionCandidate::from_tracked(
                application,
                latest.instant.date_naive(),
            ))
        } else {
            Classification::Retained {
                latest_scan: latest.instant,
            }
        }
    }
}

/// Parse the evaluation date of the first (most recent) report.
pub fn latest_scan(history: &[ScanReport]) -> Result<ParsedTimestamp, IndeterminateReason> {
    let report = history.first().ok_or(IndeterminateReason::NoHistory)?;
    let raw = report
        .evaluation_date
        .as_deref()
        .ok_or(IndeterminateReason::MissingEvaluationDate)?;
    parse_scan_timestamp(raw).map_err(IndeterminateReason::UnparsableTimestamp)
}

fn history_is_newest_first(history: &[ScanReport], latest: DateTime<Utc>) -> bool {
    history
        .iter()
        .skip(1)
        .filter_map(|report| report.evaluation_date.as_deref())
        .filter_map(|raw| parse_scan_timestamp(raw).ok())
        .all(|parsed| parsed.instant <= latest)
}
