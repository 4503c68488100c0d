use crate::session::Session;
use crate::workflows::Role;

use super::ViewKind;

/// Header entry and the command that opens it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub command: &'static str,
}

/// Header entries for the current session, gated by role
pub fn nav_items(session: Option<&Session>) -> Vec<NavItem> {
    let Some(session) = session else {
        return vec![
            NavItem { label: "Log in", command: "login" },
            NavItem { label: "Register", command: "register" },
        ];
    };

    let mut items = Vec::new();
    if session.has_role(Role::Solicitante) {
        items.push(NavItem { label: "New request", command: "new" });
    }
    items.push(NavItem { label: "My requests", command: "list" });
    if session.has_role(Role::AdministradorCpm) {
        items.push(NavItem { label: "Admin panel", command: "admin" });
    }
    if session.has_role(Role::ColaboradorCpm) {
        items.push(NavItem { label: "My assignments", command: "assignments" });
    }
    items.push(NavItem { label: "Log out", command: "logout" });
    items
}

/// Landing view after login: administrators first, then collaborators
pub fn home_view(session: Option<&Session>) -> ViewKind {
    match session {
        None => ViewKind::Login,
        Some(s) if s.has_role(Role::AdministradorCpm) => ViewKind::AdminDashboard,
        Some(s) if s.has_role(Role::ColaboradorCpm) => ViewKind::CollaboratorDashboard,
        Some(_) => ViewKind::MyRequests,
    }
}
