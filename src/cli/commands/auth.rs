use anyhow::Result;

use super::{App, Command};
use crate::api::RegisterRequest;
use crate::views::{self, home_view};

pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl Command for LoginCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        let department = app.config.session.default_department.clone();
        app.handlers()
            .login(&self.email, &self.password, department)
            .await?;
        Ok(())
    }
}

pub struct RegisterCommand {
    pub request: RegisterRequest,
}

impl Command for RegisterCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        app.handlers().register(&self.request).await?;
        Ok(())
    }
}

pub struct LogoutCommand;

impl Command for LogoutCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        app.handlers().logout().await?;
        Ok(())
    }
}

pub struct WhoamiCommand;

impl Command for WhoamiCommand {
    async fn execute(&self, app: &App) -> Result<()> {
        let Some(session) = app.store().load().await? else {
            app.screen().notify("🔒 Not logged in");
            app.screen().show(&views::render_login());
            return Ok(());
        };

        let roles: Vec<&str> = session.roles.iter().map(|r| r.as_str()).collect();
        let mut out = String::new();
        out.push_str(&format!("👤 {} (id {})\n", session.display_name, session.user_id));
        out.push_str(&format!("   Roles: {}\n", if roles.is_empty() { "none".to_string() } else { roles.join(", ") }));
        if let Some(department) = &session.default_department {
            out.push_str(&format!("   Department: {department}\n"));
        }
        out.push_str(&format!("   Home: {}\n\n", home_view(Some(&session))));
        out.push_str(&views::render_nav(Some(&session)));
        app.screen().show(&out);
        Ok(())
    }
}
