use tracing::warn;

use super::domain::DeletionCandidate;
use crate::console::Console;

/// The only answer that authorizes deletion (compared case-insensitively).
pub const AFFIRMATIVE_TOKEN: &str = "yes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationDecision {
    Confirmed,
    Declined,
}

pub fn is_affirmative(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(AFFIRMATIVE_TOKEN)
}

/// Print the numbered candidate list.
pub fn render_candidates(console: &mut dyn Console, candidates: &[DeletionCandidate]) {
    console.say("");
    console.say("--- Applications Marked for Deletion ---");
    for (index, candidate) in candidates.iter().enumerate() {
        console.say(&format!(
            "{}. Name: {}, Public ID: {}, API ID: {}, Latest Scan: {}",
            index + 1,
            candidate.name,
            candidate.public_id,
            candidate.id,
            candidate.latest_scan.format("%Y-%m-%d"),
        ));
    }
}

/// Show the candidates and block for the operator's answer. A failed read
/// counts as a refusal.
pub fn confirm_deletion(
    console: &mut dyn Console,
    candidates: &[DeletionCandidate],
) -> ConfirmationDecision {
    render_candidates(console, candidates);
    console.say("");
    console.say(
        "WARNING: Deleting an application is a destructive action that will permanently \
         remove the application and all data associated with it.",
    );

    let prompt = format!(
        "Are you sure you want to delete these {} applications? ({AFFIRMATIVE_TOKEN}/no): ",
        candidates.len()
    );
    match console.ask(&prompt) {
        Ok(answer) if is_affirmative(&answer) => ConfirmationDecision::Confirmed,
        Ok(_) => ConfirmationDecision::Declined,
        Err(err) => {
            warn!(error = %err, "could not read confirmation; treating as a refusal");
            ConfirmationDecision::Declined
        }
    }
}
