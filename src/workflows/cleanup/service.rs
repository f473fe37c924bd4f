use std::sync::Arc;

use tracing::{debug, info};

use super::classifier::{Classification, StalenessClassifier};
use super::confirmation::{confirm_deletion, render_candidates, ConfirmationDecision};
use super::domain::Cutoff;
use super::executor::DeletionExecutor;
use super::gateway::IqGateway;
use super::inventory::{ApplicationLister, ScanHistoryResolver};
use super::summary::{CleanupPlan, CleanupSummary, RunOutcome};
use crate::console::Console;

/// Error that aborts a cleanup run.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("no applications found or the application list could not be retrieved")]
    EmptyInventory,
}

/// Service composing listing, classification, confirmation and deletion.
#[derive(Debug)]
pub struct CleanupService<G> {
    gateway: Arc<G>,
    classifier: StalenessClassifier,
    dry_run: bool,
}

impl<G> CleanupService<G>
where
    G: IqGateway + 'static,
{
    pub fn new(gateway: Arc<G>, cutoff: Cutoff) -> Self {
        Self {
            gateway,
            classifier: StalenessClassifier::new(cutoff),
            dry_run: false,
        }
    }

    /// Stop after showing the candidates; nothing is asked or deleted.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// List every application and classify it against the cutoff.
    pub fn plan(&self, console: &mut dyn Console) -> Result<CleanupPlan, CleanupError> {
        let gateway = self.gateway.as_ref();
        let cutoff = self.classifier.cutoff();

        console.say("");
        console.say("Fetching all applications from IQ Server...");
        let applications = ApplicationLister::new(gateway).list();
        if applications.is_empty() {
            console.say("No applications found or an error occurred.");
            return Err(CleanupError::EmptyInventory);
        }
        console.say(&format!("Found {} applications.", applications.len()));

        let resolver = ScanHistoryResolver::new(gateway);
        let mut plan = CleanupPlan {
            listed: applications.len(),
            ..CleanupPlan::default()
        };

        console.say("");
        console.say("Checking application scan histories...");
        for (index, application) in applications.iter().enumerate() {
            let Some(tracked) = application.tracked(index) else {
                console.say(&format!(
                    "Skipping application '{}' (Public ID: {}) as its 'id' field is missing or null.",
                    application.display_name(index),
                    application.display_public_id()
                ));
                plan.missing_id += 1;
                continue;
            };

            console.say("");
            console.say(&format!(
                "Processing application: {} (Public ID: {}, ID for API calls: {})",
                tracked.name, tracked.public_id, tracked.id
            ));
            plan.processed += 1;

            let history = resolver.resolve(&tracked);
            match self.classifier.classify(&tracked, &history) {
                Classification::Stale(candidate) => {
                    debug!(application = %tracked.id, latest_scan = %candidate.latest_scan, "marked stale");
                    console.say(&format!(
                        "  >> Marked for deletion: Latest scan ({}) is older than cutoff ({cutoff}).",
                        candidate.latest_scan.format("%Y-%m-%d")
                    ));
                    plan.candidates.push(candidate);
                }
                Classification::Retained { latest_scan } => {
                    debug!(application = %tracked.id, %latest_scan, "retained");
                    console.say(&format!(
                        "  Not marked for deletion: Latest scan ({}) is not older than cutoff ({cutoff}).",
                        latest_scan.format("%Y-%m-%d %H:%M:%S UTC")
                    ));
                    plan.retained += 1;
                }
                Classification::Indeterminate(reason) => {
                    info!(application = %tracked.id, reason = %reason.describe(), "skipped");
                    console.say(&format!(
                        "  Skipping {} (ID: {}): {}.",
                        tracked.name,
                        tracked.id,
                        reason.describe()
                    ));
                    plan.indeterminate += 1;
                }
            }
        }

        Ok(plan)
    }

    /// Run one full pass and print the final summary.
    pub fn run(&self, console: &mut dyn Console) -> Result<CleanupSummary, CleanupError> {
        let plan = match self.plan(console) {
            Ok(plan) => plan,
            Err(err) => {
                let summary =
                    CleanupSummary::from_plan(&CleanupPlan::default(), RunOutcome::Aborted);
                console.say(&summary.render());
                return Err(err);
            }
        };

        let summary = if plan.candidates.is_empty() {
            console.say("");
            console.say("No applications found meeting the deletion criteria (or all were skipped).");
            CleanupSummary::from_plan(&plan, RunOutcome::NothingToDelete)
        } else if self.dry_run {
            render_candidates(console, &plan.candidates);
            console.say("");
            console.say("Dry run: no applications were deleted.");
            CleanupSummary::from_plan(&plan, RunOutcome::DryRun)
        } else {
            match confirm_deletion(console, &plan.candidates) {
                ConfirmationDecision::Declined => {
                    console.say("");
                    console.say("Deletion cancelled by the user.");
                    CleanupSummary::from_plan(&plan, RunOutcome::Cancelled)
                }
                ConfirmationDecision::Confirmed => {
                    let tally =
                        DeletionExecutor::new(self.gateway.as_ref()).execute(console, &plan.candidates);
                    CleanupSummary::from_plan(&plan, RunOutcome::Completed).with_tally(tally)
                }
            }
        };

        info!(
            outcome = summary.outcome.label(),
            marked = summary.marked,
            deleted = summary.deleted,
            failed = summary.failed,
            "cleanup run finished"
        );
        console.say(&summary.render());
        Ok(summary)
    }
}
