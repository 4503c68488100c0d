use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Workflow status of a request ("estado")
///
/// Values travel over the wire as the backend's Spanish identifiers; the
/// English spellings are accepted on input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Recibida", alias = "Received")]
    Received,
    #[serde(rename = "Pendiente", alias = "Pending")]
    Pending,
    #[serde(rename = "Asignada", alias = "Assigned")]
    Assigned,
    #[serde(rename = "EnProceso", alias = "InProcess")]
    InProcess,
    #[serde(rename = "Resuelta", alias = "Resolved")]
    Resolved,
    #[serde(rename = "DevueltaParaCorreccion", alias = "ReturnedForCorrection")]
    ReturnedForCorrection,
    #[serde(rename = "Aprobada", alias = "Approved")]
    Approved,
    #[serde(rename = "Rechazada", alias = "Rejected")]
    Rejected,
    #[serde(rename = "Reabierta", alias = "Reopened")]
    Reopened,
}

impl Status {
    pub const ALL: [Status; 9] = [
        Status::Received,
        Status::Pending,
        Status::Assigned,
        Status::InProcess,
        Status::Resolved,
        Status::ReturnedForCorrection,
        Status::Approved,
        Status::Rejected,
        Status::Reopened,
    ];

    /// Entry states that are waiting for an administrator to assign them
    pub fn is_unassigned(self) -> bool {
        matches!(self, Status::Received | Status::Pending | Status::Reopened)
    }

    /// States an administrator reviews (approve, reject, return)
    pub fn awaits_review(self) -> bool {
        matches!(self, Status::Resolved | Status::ReturnedForCorrection)
    }

    /// States the requester may reopen or rate from
    pub fn is_closed_for_requester(self) -> bool {
        matches!(self, Status::Resolved | Status::Approved | Status::Rejected)
    }

    /// Identifier sent in `update-status` bodies
    pub fn wire_name(self) -> &'static str {
        match self {
            Status::Received => "Recibida",
            Status::Pending => "Pendiente",
            Status::Assigned => "Asignada",
            Status::InProcess => "EnProceso",
            Status::Resolved => "Resuelta",
            Status::ReturnedForCorrection => "DevueltaParaCorreccion",
            Status::Approved => "Aprobada",
            Status::Rejected => "Rechazada",
            Status::Reopened => "Reabierta",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Received => "Received",
            Status::Pending => "Pending",
            Status::Assigned => "Assigned",
            Status::InProcess => "In process",
            Status::Resolved => "Resolved",
            Status::ReturnedForCorrection => "Returned for correction",
            Status::Approved => "Approved",
            Status::Rejected => "Rejected",
            Status::Reopened => "Reopened",
        };
        write!(f, "{label}")
    }
}

/// Participant roles. A user may hold several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Solicitante,
    #[serde(rename = "ColaboradorCPM")]
    ColaboradorCpm,
    #[serde(rename = "AdministradorCPM")]
    AdministradorCpm,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Solicitante, Role::ColaboradorCpm, Role::AdministradorCpm];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Solicitante => "Solicitante",
            Role::ColaboradorCpm => "ColaboradorCPM",
            Role::AdministradorCpm => "AdministradorCPM",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Solicitante" => Ok(Role::Solicitante),
            "ColaboradorCPM" => Ok(Role::ColaboradorCpm),
            "AdministradorCPM" => Ok(Role::AdministradorCpm),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Workflow actions a viewer may be offered on a request.
///
/// Commenting is deliberately absent: it is legal in every status and is
/// answered by `can_comment` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Assign,
    Approve,
    Reject,
    ReturnForCorrection,
    MarkInProcess,
    MarkResolved,
    Reopen,
    Rate,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Assign,
        Action::Approve,
        Action::Reject,
        Action::ReturnForCorrection,
        Action::MarkInProcess,
        Action::MarkResolved,
        Action::Reopen,
        Action::Rate,
    ];

    /// CLI verb that triggers this action
    pub fn command_name(self) -> &'static str {
        match self {
            Action::Assign => "assign",
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::ReturnForCorrection => "return",
            Action::MarkInProcess => "start",
            Action::MarkResolved => "resolve",
            Action::Reopen => "reopen",
            Action::Rate => "rate",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Assign => "Assign collaborator",
            Action::Approve => "Approve",
            Action::Reject => "Reject",
            Action::ReturnForCorrection => "Return for correction",
            Action::MarkInProcess => "Mark in process",
            Action::MarkResolved => "Mark resolved",
            Action::Reopen => "Reopen",
            Action::Rate => "Rate service",
        };
        f.write_str(label)
    }
}

/// Who is looking at a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub roles: BTreeSet<Role>,
}

impl Viewer {
    pub fn new(user_id: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user_id: user_id.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// The facts about a request that authorization depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub status: Status,
    pub requester_id: String,
    pub collaborator_id: Option<String>,
    pub rated: bool,
}

impl Subject {
    pub fn is_requester(&self, viewer: &Viewer) -> bool {
        self.requester_id == viewer.user_id
    }

    pub fn is_collaborator(&self, viewer: &Viewer) -> bool {
        self.collaborator_id.as_deref() == Some(viewer.user_id.as_str())
    }
}

/// Raw user input for an attempted action, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Assign { collaborator_id: String },
    Approve { comment: String },
    Reject { comment: String },
    ReturnForCorrection { comment: String },
    MarkInProcess,
    MarkResolved,
    Reopen { reason: String },
    Rate { score: String, comment: String },
}

impl Intent {
    pub fn action(&self) -> Action {
        match self {
            Intent::Assign { .. } => Action::Assign,
            Intent::Approve { .. } => Action::Approve,
            Intent::Reject { .. } => Action::Reject,
            Intent::ReturnForCorrection { .. } => Action::ReturnForCorrection,
            Intent::MarkInProcess => Action::MarkInProcess,
            Intent::MarkResolved => Action::MarkResolved,
            Intent::Reopen { .. } => Action::Reopen,
            Intent::Rate { .. } => Action::Rate,
        }
    }
}

/// A validated, legal transition ready to be sent to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Assign { collaborator_id: String },
    Approve { comment: String },
    Reject { comment: String },
    ReturnForCorrection { comment: String },
    MarkInProcess,
    MarkResolved,
    Reopen { reason: String },
    Rate { score: u8, comment: String },
}

impl Transition {
    pub fn action(&self) -> Action {
        match self {
            Transition::Assign { .. } => Action::Assign,
            Transition::Approve { .. } => Action::Approve,
            Transition::Reject { .. } => Action::Reject,
            Transition::ReturnForCorrection { .. } => Action::ReturnForCorrection,
            Transition::MarkInProcess => Action::MarkInProcess,
            Transition::MarkResolved => Action::MarkResolved,
            Transition::Reopen { .. } => Action::Reopen,
            Transition::Rate { .. } => Action::Rate,
        }
    }

    /// Status the backend is expected to report afterwards. `None` for
    /// rating, which leaves the status alone. Used for logging only; the view
    /// always shows whatever the next fetch returns.
    pub fn expected_status(&self) -> Option<Status> {
        match self {
            Transition::Assign { .. } => Some(Status::Assigned),
            Transition::Approve { .. } => Some(Status::Approved),
            Transition::Reject { .. } => Some(Status::Rejected),
            Transition::ReturnForCorrection { .. } => Some(Status::ReturnedForCorrection),
            Transition::MarkInProcess => Some(Status::InProcess),
            Transition::MarkResolved => Some(Status::Resolved),
            Transition::Reopen { .. } => Some(Status::Reopened),
            Transition::Rate { .. } => None,
        }
    }
}
