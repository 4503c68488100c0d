// Request lifecycle: statuses, roles and the rules that connect them

pub mod state_machine;
pub mod types;

pub use state_machine::{
    authorize, can_comment, is_legal, legal_actions, parse_score, validate_comment,
    validate_id, validate_intent, ValidationError, WorkflowError,
};
pub use types::{Action, Intent, Role, Status, Subject, Transition, Viewer};
