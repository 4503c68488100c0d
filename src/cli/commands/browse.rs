use anyhow::Result;

use super::{App, Command};
use crate::views::ViewKind;

/// Open one of the list views; `None` picks the home view for the session's roles
pub struct ListCommand {
    pub view: Option<ViewKind>,
}

impl Command for ListCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        let handlers = app.handlers();
        let session = handlers.current_session().await?;
        match self.view {
            Some(view) => handlers.open_list(&session, view).await?,
            None => handlers.home(&session).await?,
        };
        Ok(())
    }
}

pub struct ShowCommand {
    pub id: String,
}

impl Command for ShowCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        let handlers = app.handlers();
        let session = handlers.current_session().await?;
        handlers.open_detail(&session, &self.id).await?;
        Ok(())
    }
}

pub struct CollaboratorsCommand;

impl Command for CollaboratorsCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        let handlers = app.handlers();
        let session = handlers.current_session().await?;
        handlers.list_collaborators(&session).await?;
        Ok(())
    }
}
