// Which actions may be triggered from which view, and what gets redrawn after

use std::fmt;

use crate::views::ViewKind;
use crate::workflows::Action;

/// Anything a user can trigger that changes server state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    Workflow(Action),
    Comment,
    Submit,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Workflow(action) => write!(f, "{action}"),
            ActionKind::Comment => f.write_str("Add comment"),
            ActionKind::Submit => f.write_str("Submit request"),
        }
    }
}

/// What to re-fetch and redraw once the backend confirms a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Re-fetch the request and redraw its detail view
    DetailInPlace,
    /// Re-fetch and return to the given list
    List(ViewKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub view: ViewKind,
    pub action: ActionKind,
    pub refresh: Refresh,
}

const fn route(view: ViewKind, action: ActionKind, refresh: Refresh) -> Route {
    Route { view, action, refresh }
}

use ActionKind::{Comment, Submit, Workflow};
use ViewKind::{AdminDashboard, CollaboratorDashboard, Detail, MyRequests, NewRequest};

pub const ROUTES: &[Route] = &[
    route(Detail, Workflow(Action::Assign), Refresh::DetailInPlace),
    route(Detail, Workflow(Action::Approve), Refresh::DetailInPlace),
    route(Detail, Workflow(Action::Reject), Refresh::DetailInPlace),
    route(Detail, Workflow(Action::ReturnForCorrection), Refresh::DetailInPlace),
    route(Detail, Workflow(Action::MarkInProcess), Refresh::DetailInPlace),
    route(Detail, Workflow(Action::MarkResolved), Refresh::DetailInPlace),
    route(Detail, Workflow(Action::Reopen), Refresh::DetailInPlace),
    route(Detail, Workflow(Action::Rate), Refresh::DetailInPlace),
    route(Detail, Comment, Refresh::DetailInPlace),
    route(AdminDashboard, Workflow(Action::Assign), Refresh::List(AdminDashboard)),
    route(AdminDashboard, Workflow(Action::Approve), Refresh::List(AdminDashboard)),
    route(AdminDashboard, Workflow(Action::Reject), Refresh::List(AdminDashboard)),
    route(AdminDashboard, Workflow(Action::ReturnForCorrection), Refresh::List(AdminDashboard)),
    route(CollaboratorDashboard, Workflow(Action::MarkInProcess), Refresh::List(CollaboratorDashboard)),
    route(CollaboratorDashboard, Workflow(Action::MarkResolved), Refresh::List(CollaboratorDashboard)),
    route(MyRequests, Workflow(Action::Reopen), Refresh::List(MyRequests)),
    route(MyRequests, Workflow(Action::Rate), Refresh::List(MyRequests)),
    route(NewRequest, Submit, Refresh::List(MyRequests)),
];

pub fn lookup(view: ViewKind, action: ActionKind) -> Option<&'static Route> {
    ROUTES.iter().find(|r| r.view == view && r.action == action)
}
