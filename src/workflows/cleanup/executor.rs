use tracing::{info, warn};

use super::domain::{ApplicationId, DeletionCandidate};
use super::gateway::IqGateway;
use crate::console::Console;

/// Per-candidate failure kept for the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionFailure {
    pub id: ApplicationId,
    pub name: String,
    pub status: Option<u16>,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionTally {
    pub deleted: usize,
    pub failed: usize,
    pub failures: Vec<DeletionFailure>,
}

impl DeletionTally {
    pub fn attempted(&self) -> usize {
        self.deleted + self.failed
    }
}

/// Issues one delete per confirmed candidate, in order, without stopping on
/// failures.
#[derive(Debug)]
pub struct DeletionExecutor<'a, G: ?Sized> {
    gateway: &'a G,
}

impl<'a, G> DeletionExecutor<'a, G>
where
    G: IqGateway + ?Sized,
{
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    pub fn execute(
        &self,
        console: &mut dyn Console,
        candidates: &[DeletionCandidate],
    ) -> DeletionTally {
        let mut tally = DeletionTally::default();
        console.say("");
        console.say("--- Deleting Applications ---");

        for candidate in candidates {
            console.say(&format!(
                "Deleting application: {} (API ID: {})...",
                candidate.name, candidate.id
            ));

            match self.gateway.delete_application(&candidate.id) {
                Ok(()) => {
                    info!(application = %candidate.id, name = %candidate.name, "application deleted");
                    console.say(&format!(
                        "Successfully deleted application with ID: {}",
                        candidate.id
                    ));
                    tally.deleted += 1;
                }
                Err(err) => {
                    warn!(application = %candidate.id, error = %err, "delete failed");
                    console.say(&format!(
                        "Error deleting application with ID {}: {err}",
                        candidate.id
                    ));
                    if let Some(status) = err.status() {
                        console.say(&format!("Response status code: {status}"));
                    }
                    if let Some(body) = err.body() {
                        console.say(&format!("Response text: {body}"));
                    }
                    tally.failed += 1;
                    tally.failures.push(DeletionFailure {
                        id: candidate.id.clone(),
                        name: candidate.name.clone(),
                        status: err.status(),
                        detail: err.to_string(),
                    });
                }
            }
        }

        console.say("");
        console.say(&format!(
            "Deletion complete: {} deleted, {} failed.",
            tally.deleted, tally.failed
        ));
        tally
    }
}
