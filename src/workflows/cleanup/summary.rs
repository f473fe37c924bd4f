use super::domain::DeletionCandidate;
use super::executor::{DeletionFailure, DeletionTally};

/// Result of the listing and classification pass, before anything is deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    pub listed: usize,
    pub missing_id: usize,
    pub processed: usize,
    pub indeterminate: usize,
    pub retained: usize,
    pub candidates: Vec<DeletionCandidate>,
}

impl CleanupPlan {
    pub fn skipped(&self) -> usize {
        self.missing_id + self.indeterminate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The application list came back empty; nothing was classified.
    Aborted,
    NothingToDelete,
    DryRun,
    Cancelled,
    Completed,
}

impl RunOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aborted => "aborted",
            Self::NothingToDelete => "nothing to delete",
            Self::DryRun => "dry run",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupSummary {
    pub listed: usize,
    pub processed: usize,
    pub skipped: usize,
    pub retained: usize,
    pub marked: usize,
    pub deleted: usize,
    pub failed: usize,
    pub outcome: RunOutcome,
    pub failures: Vec<DeletionFailure>,
}

impl CleanupSummary {
    pub fn from_plan(plan: &CleanupPlan, outcome: RunOutcome) -> Self {
        Self {
            listed: plan.listed,
            processed: plan.processed,
            skipped: plan.skipped(),
            retained: plan.retained,
            marked: plan.candidates.len(),
            deleted: 0,
            failed: 0,
            outcome,
            failures: Vec::new(),
        }
    }

    pub fn with_tally(mut self, tally: DeletionTally) -> Self {
        self.deleted = tally.deleted;
        self.failed = tally.failed;
        self.failures = tally.failures;
        self
    }

    pub fn render(&self) -> String {
        format!(
            "Summary ({}): {} listed, {} processed, {} skipped, {} retained, {} marked, {} deleted, {} failed.",
            self.outcome.label(),
            self.listed,
            self.processed,
            self.skipped,
            self.retained,
            self.marked,
            self.deleted,
            self.failed
        )
    }
}
