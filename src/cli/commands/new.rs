use anyhow::Result;
use chrono::NaiveDate;

use super::{App, Command};
use crate::api::{NewSolicitud, RequestFormat};
use crate::views::ViewKind;

pub struct NewCommand {
    pub title: String,
    pub description: String,
    pub format: RequestFormat,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_place: Option<String>,
    pub department: Option<String>,
}

impl Command for NewCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        let handlers = app.handlers();
        let session = handlers.current_session().await?;

        // Explicit flag, then the session's department, then the configured one
        let department = self
            .department
            .clone()
            .or_else(|| session.default_department.clone())
            .or_else(|| app.config.session.default_department.clone())
            .unwrap_or_default();

        let request = NewSolicitud {
            title: self.title.clone(),
            description: self.description.clone(),
            format: self.format,
            event_date: self.event_date,
            event_time: self.event_time.clone(),
            event_place: self.event_place.clone(),
            department,
        };

        handlers.submit(&session, ViewKind::NewRequest, &request).await?;
        Ok(())
    }
}
