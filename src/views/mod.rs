// Text views of the help desk: navigation, lists, dashboards and detail

pub mod navigation;
pub mod render;

pub use navigation::{home_view, nav_items, NavItem};
pub use render::{
    render_collaborators, render_created, render_detail, render_list, render_login, render_nav,
};

use std::fmt;
use std::str::FromStr;

use crate::api::Solicitud;
use crate::workflows::Viewer;

/// Screens of the client. Actions are dispatched from one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewKind {
    Login,
    MyRequests,
    AdminDashboard,
    CollaboratorDashboard,
    Detail,
    NewRequest,
}

impl ViewKind {
    pub fn is_list(self) -> bool {
        matches!(
            self,
            ViewKind::MyRequests | ViewKind::AdminDashboard | ViewKind::CollaboratorDashboard
        )
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Login => "Log in",
            ViewKind::MyRequests => "My requests",
            ViewKind::AdminDashboard => "Admin panel",
            ViewKind::CollaboratorDashboard => "My assignments",
            ViewKind::Detail => "Request detail",
            ViewKind::NewRequest => "New request",
        }
    }

    /// Which requests a list view shows. The backend already limits what the
    /// viewer can see; a user holding several roles still gets one list per role.
    pub fn includes(self, request: &Solicitud, viewer: &Viewer) -> bool {
        match self {
            ViewKind::MyRequests => request.requester_id == viewer.user_id,
            ViewKind::CollaboratorDashboard => {
                request.collaborator_id.as_deref() == Some(viewer.user_id.as_str())
            }
            ViewKind::AdminDashboard => true,
            _ => false,
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "detail" | "show" => Ok(ViewKind::Detail),
            "list" | "mine" | "my-requests" => Ok(ViewKind::MyRequests),
            "admin" => Ok(ViewKind::AdminDashboard),
            "assignments" | "collab" => Ok(ViewKind::CollaboratorDashboard),
            "new" => Ok(ViewKind::NewRequest),
            other => Err(format!(
                "unknown view '{other}', expected detail, list, admin or assignments"
            )),
        }
    }
}
