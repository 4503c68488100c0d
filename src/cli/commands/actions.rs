use anyhow::Result;
use tracing::info;

use super::{confirm, App, Command};
use crate::handlers::{lookup, ActionKind};
use crate::views::ViewKind;
use crate::workflows::Intent;

/// One workflow action against one request
pub struct ActionCommand {
    pub id: String,
    pub from: ViewKind,
    pub intent: Intent,
    /// Skip the yes/no prompt for status updates
    pub assume_yes: bool,
}

impl ActionCommand {
    pub fn new(id: impl Into<String>, from: ViewKind, intent: Intent) -> Self {
        Self {
            id: id.into(),
            from,
            intent,
            assume_yes: true,
        }
    }

    pub fn with_confirmation(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    fn confirmation_question(&self) -> Option<String> {
        match self.intent {
            Intent::MarkInProcess => Some(format!("Start working on request {}?", self.id)),
            Intent::MarkResolved => Some(format!("Mark request {} as resolved?", self.id)),
            _ => None,
        }
    }
}

impl Command for ActionCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        let handlers = app.handlers();
        let session = handlers.current_session().await?;

        let routed = lookup(self.from, ActionKind::Workflow(self.intent.action())).is_some();
        if !self.assume_yes && routed {
            if let Some(question) = self.confirmation_question() {
                // Only ask about an action the request currently offers
                handlers
                    .check_legal(&session, &self.id, self.intent.action())
                    .await?;
                if !confirm(&question)? {
                    info!(request_id = %self.id, action = %self.intent.action(), "Cancelled at confirmation");
                    app.screen().notify("Cancelled, nothing was changed");
                    return Ok(());
                }
            }
        }

        handlers
            .perform(&session, self.from, &self.id, self.intent.clone())
            .await?;
        Ok(())
    }
}

pub struct CommentCommand {
    pub id: String,
    pub text: String,
}

impl Command for CommentCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        let handlers = app.handlers();
        let session = handlers.current_session().await?;
        handlers
            .comment(&session, ViewKind::Detail, &self.id, &self.text)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiGateway, ApiResult};
    use crate::config::MesaAyudaConfig;
    use crate::handlers::{HandlerError, RecordingScreen};
    use crate::session::{MemorySessionStore, Session};
    use crate::workflows::{Action, Role, Status, WorkflowError};
    use async_trait::async_trait;
    use reqwest::Method;
    use serde_json::{json, Value};
    use std::collections::BTreeSet;

    /// Serves one resolved request and fails the test on any mutation
    struct ResolvedOnly;

    #[async_trait]
    impl ApiGateway for ResolvedOnly {
        async fn request(
            &self,
            _session: Option<&Session>,
            method: Method,
            path: &str,
            _body: Option<Value>,
        ) -> ApiResult<Option<Value>> {
            assert_eq!(method, Method::GET, "unexpected {method} {path}");
            Ok(Some(json!({
                "id": "7",
                "titulo": "Fotos",
                "formatoRequerido": "Fotografia",
                "solicitanteId": "u-1",
                "estado": "Resuelta",
                "colaboradorAsignadoId": "u-2",
                "fechaCreacion": "2025-03-01T10:00:00"
            })))
        }
    }

    fn collaborator_app() -> App {
        let session = Session {
            token: "t".into(),
            user_id: "u-2".into(),
            roles: BTreeSet::from([Role::ColaboradorCpm]),
            display_name: "Beto".into(),
            default_department: None,
        };
        App::from_parts(
            MesaAyudaConfig::default(),
            Box::new(ResolvedOnly),
            Box::new(MemorySessionStore::with_session(session)),
            Box::new(RecordingScreen::new()),
        )
    }

    #[tokio::test]
    async fn test_illegal_status_update_is_refused_before_confirmation() {
        let app = collaborator_app();
        let command = ActionCommand::new("7", ViewKind::Detail, Intent::MarkResolved).with_confirmation(false);

        let err = command.execute(&app).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<HandlerError>(),
            Some(HandlerError::Workflow(WorkflowError::NotPermitted {
                action: Action::MarkResolved,
                status: Status::Resolved,
            }))
        ));
    }

    #[test]
    fn test_only_status_updates_ask_for_confirmation() {
        let start = ActionCommand::new("7", ViewKind::Detail, Intent::MarkInProcess);
        assert_eq!(start.confirmation_question().as_deref(), Some("Start working on request 7?"));
        let reopen = ActionCommand::new("7", ViewKind::Detail, Intent::Reopen { reason: "x".into() });
        assert!(reopen.confirmation_question().is_none());
    }
}
