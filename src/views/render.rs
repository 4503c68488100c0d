use crate::api::{Collaborator, Solicitud};
use crate::handlers::{lookup, ActionKind};
use crate::session::Session;
use crate::workflows::{can_comment, legal_actions, Action, Viewer};

use super::navigation::nav_items;
use super::ViewKind;

const RULE: &str = "──────────────────────────────────────────";

/// Header line for the current session
pub fn render_nav(session: Option<&Session>) -> String {
    let entries: Vec<String> = nav_items(session)
        .iter()
        .map(|item| format!("{} ({})", item.label, item.command))
        .collect();
    match session {
        Some(s) => format!("👤 Hello, {}  |  {}", s.display_name, entries.join("  ·  ")),
        None => format!("🔐 Not logged in  |  {}", entries.join("  ·  ")),
    }
}

pub fn render_login() -> String {
    [
        "🔐 Help desk - log in",
        RULE,
        "   → mesa-ayuda login --email <email> --password <password>",
        "   → No account yet? mesa-ayuda register --help",
    ]
    .join("\n")
}

/// One of the list views: my requests, admin panel or assignments
pub fn render_list(kind: ViewKind, requests: &[Solicitud], viewer: &Viewer) -> String {
    let mut lines = vec![format!("📋 {}", kind.title()), RULE.to_string()];

    let shown: Vec<&Solicitud> = requests.iter().filter(|r| kind.includes(r, viewer)).collect();
    if shown.is_empty() {
        lines.push("   No requests to show".to_string());
        return lines.join("\n");
    }

    for request in shown {
        lines.push(format!(
            "#{:<10} {:<24} {:<14} {}",
            request.reference(),
            truncate(&request.title, 40),
            request.status.to_string(),
            request.created_at.format("%Y-%m-%d"),
        ));
        // Only actions this list can dispatch; the rest stay in the detail view
        let verbs: Vec<&str> = legal_actions(&request.subject(), viewer)
            .into_iter()
            .filter(|a| lookup(kind, ActionKind::Workflow(*a)).is_some())
            .map(|a| a.command_name())
            .collect();
        if !verbs.is_empty() {
            lines.push(format!("            ↳ available: {}", verbs.join(", ")));
        }
    }
    lines.push(String::new());
    lines.push("💡 Open one with: mesa-ayuda show <id>".to_string());
    lines.join("\n")
}

/// Full detail of a request with the actions the viewer may take
pub fn render_detail(request: &Solicitud, viewer: &Viewer) -> String {
    let mut lines = vec![
        format!("🎫 Request #{}: {}", request.reference(), request.title),
        RULE.to_string(),
        format!("   Status:        {}", request.status),
        format!("   Format:        {}", request.format),
        format!("   Requested by:  {} <{}>", request.requester_name, request.requester_email),
        format!("   Department:    {}", request.department),
        format!("   Created:       {}", request.created_at.format("%Y-%m-%d %H:%M UTC")),
    ];

    if let Some(date) = &request.event_date {
        let time = request.event_time.as_deref().unwrap_or("");
        lines.push(format!("   Event:         {} {}", date, time).trim_end().to_string());
    }
    if let Some(place) = &request.event_place {
        lines.push(format!("   Place:         {place}"));
    }
    match (&request.collaborator_name, &request.collaborator_id) {
        (Some(name), _) => lines.push(format!("   Assigned to:   {name}")),
        (None, Some(id)) => lines.push(format!("   Assigned to:   {id}")),
        (None, None) => lines.push("   Assigned to:   (unassigned)".to_string()),
    }
    if let Some(rating) = request.rating {
        lines.push(format!("   Rating:        {}", "★".repeat(rating as usize)));
        if let Some(comment) = request.rating_comment.as_deref().filter(|c| !c.is_empty()) {
            lines.push(format!("   Rating note:   {comment}"));
        }
    }

    lines.push(String::new());
    lines.push(format!("📄 {}", request.description));

    lines.push(String::new());
    lines.push(format!("💬 Comments ({})", request.comments.len()));
    for comment in request.comments_in_order() {
        lines.push(format!(
            "   [{}] {}: {}",
            comment.created_at.format("%Y-%m-%d %H:%M"),
            comment.author_name,
            comment.content
        ));
    }

    let subject = request.subject();
    let actions = legal_actions(&subject, viewer);
    lines.push(String::new());
    if actions.is_empty() {
        lines.push("🎯 No workflow actions available to you in this status".to_string());
    } else {
        lines.push("🎯 Available actions:".to_string());
        for action in actions {
            lines.push(format!("   → {:<22} {}", action.to_string(), action_usage(action, &request.id)));
        }
    }
    if can_comment(&subject, viewer) {
        lines.push(format!(
            "   → {:<22} mesa-ayuda comment {} \"<text>\"",
            "Add comment", request.id
        ));
    }

    lines.join("\n")
}

/// Assignment candidates, shown as "name (email)"
pub fn render_collaborators(collaborators: &[Collaborator]) -> String {
    let mut lines = vec!["👥 Collaborators".to_string(), RULE.to_string()];
    if collaborators.is_empty() {
        lines.push("   No collaborators available".to_string());
    }
    for collaborator in collaborators {
        lines.push(format!(
            "   {:<38} {} ({})",
            collaborator.id, collaborator.display_name, collaborator.email
        ));
    }
    lines.join("\n")
}

pub fn render_created(request: Option<&Solicitud>) -> String {
    match request {
        Some(r) => format!("✅ Request #{} submitted: {}", r.reference(), r.title),
        None => "✅ Request submitted".to_string(),
    }
}

fn action_usage(action: Action, id: &str) -> String {
    let verb = action.command_name();
    match action {
        Action::Assign => format!("mesa-ayuda {verb} {id} <collaborator-id>   (see: mesa-ayuda collaborators)"),
        Action::Approve | Action::Reject | Action::ReturnForCorrection => {
            format!("mesa-ayuda {verb} {id} --comment \"<text>\"")
        }
        Action::MarkInProcess | Action::MarkResolved => format!("mesa-ayuda {verb} {id}"),
        Action::Reopen => format!("mesa-ayuda {verb} {id} --reason \"<text>\""),
        Action::Rate => format!("mesa-ayuda {verb} {id} <1-5> [--comment \"<text>\"]"),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
