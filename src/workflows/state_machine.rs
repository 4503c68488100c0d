// Request lifecycle rules - pure classification, no I/O
// The backend stays the source of truth; this only decides what to offer
// and what to refuse before a round-trip.

use std::collections::BTreeSet;
use thiserror::Error;

use super::types::{Action, Intent, Role, Status, Subject, Transition, Viewer};

/// Local, pre-network input failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A collaborator must be selected")]
    MissingCollaborator,
    #[error("A comment is required to {action}")]
    MissingComment { action: &'static str },
    #[error("A reason is required to reopen the request")]
    MissingReason,
    #[error("Rating must be a whole number from 1 to 5, got '{input}'")]
    InvalidScore { input: String },
    #[error("The comment cannot be empty")]
    EmptyComment,
    #[error("'{field}' is required")]
    MissingField { field: &'static str },
    #[error("'{id}' is not a request id")]
    InvalidId { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("'{action}' is not available for a request in status '{status}'")]
    NotPermitted { action: Action, status: Status },
    #[error("You are not a participant of this request")]
    NotParticipant,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Every action the viewer may take on the subject right now.
///
/// Each role contributes independently; a viewer holding several roles gets
/// the union.
pub fn legal_actions(subject: &Subject, viewer: &Viewer) -> BTreeSet<Action> {
    let mut actions = BTreeSet::new();
    let status = subject.status;

    if viewer.has_role(Role::AdministradorCpm) {
        if status.is_unassigned() {
            actions.insert(Action::Assign);
        }
        if status.awaits_review() {
            actions.extend([Action::Approve, Action::Reject, Action::ReturnForCorrection]);
        }
    }

    if viewer.has_role(Role::ColaboradorCpm) && subject.is_collaborator(viewer) {
        match status {
            Status::Assigned | Status::ReturnedForCorrection => {
                actions.insert(Action::MarkInProcess);
            }
            Status::InProcess => {
                actions.insert(Action::MarkResolved);
            }
            _ => {}
        }
    }

    if viewer.has_role(Role::Solicitante)
        && subject.is_requester(viewer)
        && status.is_closed_for_requester()
    {
        actions.insert(Action::Reopen);
        if !subject.rated {
            actions.insert(Action::Rate);
        }
    }

    actions
}

pub fn is_legal(subject: &Subject, viewer: &Viewer, action: Action) -> bool {
    legal_actions(subject, viewer).contains(&action)
}

/// Requester, assigned collaborator or any administrator may comment, in any status
pub fn can_comment(subject: &Subject, viewer: &Viewer) -> bool {
    subject.is_requester(viewer)
        || (viewer.has_role(Role::ColaboradorCpm) && subject.is_collaborator(viewer))
        || viewer.has_role(Role::AdministradorCpm)
}

/// Check that `intent` is legal for the viewer and that its input is
/// complete, producing the transition to send.
pub fn authorize(
    subject: &Subject,
    viewer: &Viewer,
    intent: Intent,
) -> Result<Transition, WorkflowError> {
    let action = intent.action();
    if !is_legal(subject, viewer, action) {
        return Err(WorkflowError::NotPermitted {
            action,
            status: subject.status,
        });
    }
    Ok(validate_intent(intent)?)
}

/// Input validation alone, without the legality check
pub fn validate_intent(intent: Intent) -> Result<Transition, ValidationError> {
    match intent {
        Intent::Assign { collaborator_id } => {
            let collaborator_id = required(collaborator_id).ok_or(ValidationError::MissingCollaborator)?;
            Ok(Transition::Assign { collaborator_id })
        }
        Intent::Approve { comment } => {
            let comment = required(comment).ok_or(ValidationError::MissingComment { action: "approve" })?;
            Ok(Transition::Approve { comment })
        }
        Intent::Reject { comment } => {
            let comment = required(comment).ok_or(ValidationError::MissingComment { action: "reject" })?;
            Ok(Transition::Reject { comment })
        }
        Intent::ReturnForCorrection { comment } => {
            let comment = required(comment).ok_or(ValidationError::MissingComment {
                action: "return for correction",
            })?;
            Ok(Transition::ReturnForCorrection { comment })
        }
        Intent::MarkInProcess => Ok(Transition::MarkInProcess),
        Intent::MarkResolved => Ok(Transition::MarkResolved),
        Intent::Reopen { reason } => {
            let reason = required(reason).ok_or(ValidationError::MissingReason)?;
            Ok(Transition::Reopen { reason })
        }
        Intent::Rate { score, comment } => Ok(Transition::Rate {
            score: parse_score(&score)?,
            comment: comment.trim().to_string(),
        }),
    }
}

/// Validate comment content for the comment thread
pub fn validate_comment(
    subject: &Subject,
    viewer: &Viewer,
    content: &str,
) -> Result<String, WorkflowError> {
    if !can_comment(subject, viewer) {
        return Err(WorkflowError::NotParticipant);
    }
    required(content.to_string()).ok_or(WorkflowError::Invalid(ValidationError::EmptyComment))
}

/// A request id usable as one URL path segment
pub fn validate_id(id: &str) -> Result<&str, ValidationError> {
    let trimmed = id.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return Err(ValidationError::InvalidId { id: id.to_string() });
    }
    Ok(trimmed)
}

/// Parse a raw rating into 1..=5
pub fn parse_score(input: &str) -> Result<u8, ValidationError> {
    match input.trim().parse::<u8>() {
        Ok(score @ 1..=5) => Ok(score),
        _ => Err(ValidationError::InvalidScore {
            input: input.to_string(),
        }),
    }
}

fn required(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
