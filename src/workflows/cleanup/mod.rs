//! Stale application cleanup for IQ Server.
//!
//! One sequential pass: list applications, resolve each one's latest scan,
//! classify it against the cutoff, confirm with the operator, then delete.
//! Per-application failures are absorbed and reported; only an empty
//! application list aborts the run.

pub mod classifier;
pub mod confirmation;
pub mod domain;
pub mod executor;
pub mod gateway;
pub mod inventory;
pub mod iq_client;
pub mod service;
pub mod summary;
pub mod timestamp;

#[cfg(test)]
mod tests;

pub use classifier::{Classification, IndeterminateReason, StalenessClassifier};
pub use confirmation::{ConfirmationDecision, AFFIRMATIVE_TOKEN};
pub use domain::{
    Application, ApplicationId, Cutoff, CutoffError, DeletionCandidate, ScanReport,
    TrackedApplication,
};
pub use executor::{DeletionExecutor, DeletionFailure, DeletionTally};
pub use gateway::{GatewayError, IqGateway};
pub use inventory::{ApplicationLister, ScanHistoryResolver};
pub use iq_client::{IqConnection, IqServerClient};
pub use service::{CleanupError, CleanupService};
pub use summary::{CleanupPlan, CleanupSummary, RunOutcome};
pub use timestamp::{parse_scan_timestamp, ParsedTimestamp, TimestampError, TimestampStrategy};
