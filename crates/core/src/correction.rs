//! Review rules for user-submitted aircraft corrections.
//!
//! A correction never changes the aircraft it refers to. Reviewing only
//! moves its status and records operator notes; applying the suggested value
//! is a separate manual step.

use crate::choices::CorrectionStatus;
use crate::error::CoreError;

/// An operator decision on a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
    Implement,
}

impl ReviewAction {
    pub fn target_status(self) -> CorrectionStatus {
        match self {
            ReviewAction::Approve => CorrectionStatus::Approved,
            ReviewAction::Reject => CorrectionStatus::Rejected,
            ReviewAction::Implement => CorrectionStatus::Implemented,
        }
    }
}

/// New status and notes to persist after a review action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub status: CorrectionStatus,
    pub admin_notes: String,
}

/// Whether implementing a correction in `status` needs an explicit override.
pub fn needs_implement_override(status: CorrectionStatus) -> bool {
    status != CorrectionStatus::Approved
}

/// Apply `action` to a correction currently in `status` with `existing_notes`.
///
/// Approve and reject replace the notes when `notes` is non-empty. Implement
/// appends an `Implemented: ...` line and requires the correction to be
/// approved unless `force` is set.
pub fn review(
    status: CorrectionStatus,
    existing_notes: &str,
    action: ReviewAction,
    notes: Option<&str>,
    force: bool,
) -> Result<ReviewOutcome, CoreError> {
    let notes = notes.map(str::trim).filter(|n| !n.is_empty());

    let admin_notes = match action {
        ReviewAction::Approve | ReviewAction::Reject => notes
            .map(str::to_string)
            .unwrap_or_else(|| existing_notes.to_string()),
        ReviewAction::Implement => {
            if needs_implement_override(status) && !force {
                return Err(CoreError::Conflict(format!(
                    "Correction is not approved (current status: {status})"
                )));
            }
            match notes {
                Some(n) if existing_notes.is_empty() => format!("Implemented: {n}"),
                Some(n) => format!("{existing_notes}\nImplemented: {n}"),
                None => existing_notes.to_string(),
            }
        }
    };

    Ok(ReviewOutcome {
        status: action.target_status(),
        admin_notes,
    })
}
