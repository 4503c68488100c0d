use anyhow::Result;
use std::io::Write;

use crate::api::{ApiGateway, HttpGateway};
use crate::config::MesaAyudaConfig;
use crate::handlers::{ActionHandlers, Screen, TerminalScreen};
use crate::session::{FileSessionStore, SessionPersistence};

pub mod actions;
pub mod auth;
pub mod browse;
pub mod new;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self, app: &App) -> Result<()>;
}

/// Everything a command needs: configuration, backend, saved session and output
pub struct App {
    pub config: MesaAyudaConfig,
    gateway: Box<dyn ApiGateway>,
    store: Box<dyn SessionPersistence>,
    screen: Box<dyn Screen>,
}

impl App {
    /// Terminal output, HTTP backend and a session file, all from `config`
    pub fn from_config(config: MesaAyudaConfig) -> Self {
        let gateway = HttpGateway::new(config.api.base_url.clone());
        let store = FileSessionStore::new(config.session.path.clone());
        Self::from_parts(config, Box::new(gateway), Box::new(store), Box::new(TerminalScreen))
    }

    pub fn from_parts(
        config: MesaAyudaConfig,
        gateway: Box<dyn ApiGateway>,
        store: Box<dyn SessionPersistence>,
        screen: Box<dyn Screen>,
    ) -> Self {
        Self {
            config,
            gateway,
            store,
            screen,
        }
    }

    pub fn handlers(&self) -> ActionHandlers<'_> {
        ActionHandlers::new(self.gateway.as_ref(), self.store.as_ref(), self.screen.as_ref())
    }

    pub fn store(&self) -> &dyn SessionPersistence {
        self.store.as_ref()
    }

    pub fn screen(&self) -> &dyn Screen {
        self.screen.as_ref()
    }
}

/// Ask a yes/no question on the terminal; anything but "y" means no
pub fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn show_how_to_get_started() {
    println!("🎬 Mesa de Ayuda - Media service requests");
    println!();
    println!("To get started:");
    println!("  🔑 mesa-ayuda login --email <email> --password <password>");
    println!("  🏠 mesa-ayuda home          # Your default view");
    println!("  📝 mesa-ayuda new ...       # Submit a request");
    println!("  🔍 mesa-ayuda show <id>     # Detail and available actions");
    println!();
    println!("💡 Run 'mesa-ayuda --help' for every command.");
}
