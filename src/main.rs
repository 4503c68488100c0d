use anyhow::Result;
use clap::Parser;

use mesa_ayuda::api::RegisterRequest;
use mesa_ayuda::cli::commands::actions::{ActionCommand, CommentCommand};
use mesa_ayuda::cli::commands::auth::{LoginCommand, LogoutCommand, RegisterCommand, WhoamiCommand};
use mesa_ayuda::cli::commands::browse::{CollaboratorsCommand, ListCommand, ShowCommand};
use mesa_ayuda::cli::commands::new::NewCommand;
use mesa_ayuda::cli::commands::{show_how_to_get_started, App, Command};
use mesa_ayuda::cli::{Cli, Commands};
use mesa_ayuda::views::ViewKind;
use mesa_ayuda::workflows::Intent;
use mesa_ayuda::{api_metrics, init_telemetry, HandlerError, MesaAyudaConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        show_how_to_get_started();
        return Ok(());
    };

    MesaAyudaConfig::load_env_file()?;
    let config = MesaAyudaConfig::load(cli.config.as_deref())?;
    init_telemetry(&config.observability)?;

    let app = App::from_config(config);
    let outcome = tokio::runtime::Runtime::new()?.block_on(async { run(command, &app).await });
    api_metrics().log_stats();

    if let Err(e) = outcome {
        report(&e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands, app: &App) -> Result<()> {
    match command {
        Commands::Login { email, password } => LoginCommand { email, password }.execute(app).await,
        Commands::Register {
            email,
            password,
            name,
            id_number,
            phone,
            tdea_role,
            campus,
            department,
        } => {
            let request = RegisterRequest {
                email,
                password,
                nombre_completo: name,
                numero_identificacion: id_number,
                numero_celular: phone.unwrap_or_default(),
                rol_tdea: tdea_role.unwrap_or_default(),
                sede: campus.unwrap_or_default(),
                facultad_dependencia: department.unwrap_or_default(),
            };
            RegisterCommand { request }.execute(app).await
        }
        Commands::Logout => LogoutCommand.execute(app).await,
        Commands::Whoami => WhoamiCommand.execute(app).await,
        Commands::Home => ListCommand { view: None }.execute(app).await,
        Commands::List => ListCommand { view: Some(ViewKind::MyRequests) }.execute(app).await,
        Commands::Admin => ListCommand { view: Some(ViewKind::AdminDashboard) }.execute(app).await,
        Commands::Assignments => {
            ListCommand { view: Some(ViewKind::CollaboratorDashboard) }.execute(app).await
        }
        Commands::Show { id } => ShowCommand { id }.execute(app).await,
        Commands::New {
            title,
            description,
            format,
            event_date,
            event_time,
            event_place,
            department,
        } => {
            NewCommand {
                title,
                description,
                format,
                event_date,
                event_time,
                event_place,
                department,
            }
            .execute(app)
            .await
        }
        Commands::Collaborators => CollaboratorsCommand.execute(app).await,
        Commands::Assign { id, collaborator_id, from } => {
            ActionCommand::new(id, from.view, Intent::Assign { collaborator_id })
                .execute(app)
                .await
        }
        Commands::Start { id, yes, from } => {
            ActionCommand::new(id, from.view, Intent::MarkInProcess)
                .with_confirmation(yes)
                .execute(app)
                .await
        }
        Commands::Resolve { id, yes, from } => {
            ActionCommand::new(id, from.view, Intent::MarkResolved)
                .with_confirmation(yes)
                .execute(app)
                .await
        }
        Commands::Approve { id, comment, from } => {
            ActionCommand::new(id, from.view, Intent::Approve { comment })
                .execute(app)
                .await
        }
        Commands::Reject { id, comment, from } => {
            ActionCommand::new(id, from.view, Intent::Reject { comment })
                .execute(app)
                .await
        }
        Commands::Return { id, comment, from } => {
            ActionCommand::new(id, from.view, Intent::ReturnForCorrection { comment })
                .execute(app)
                .await
        }
        Commands::Reopen { id, reason, from } => {
            ActionCommand::new(id, from.view, Intent::Reopen { reason })
                .execute(app)
                .await
        }
        Commands::Rate { id, score, comment, from } => {
            ActionCommand::new(id, from.view, Intent::Rate { score, comment })
                .execute(app)
                .await
        }
        Commands::Comment { id, text } => CommentCommand { id, text }.execute(app).await,
    }
}

/// Handler failures were already shown on screen; add follow-up hints.
/// Anything else (config, terminal I/O) is printed here.
fn report(error: &anyhow::Error) {
    match error.downcast_ref::<HandlerError>() {
        Some(HandlerError::Api(api_error)) => {
            for hint in api_error.hints() {
                eprintln!("   💡 {hint}");
            }
        }
        Some(HandlerError::NotLoggedIn) => {
            eprintln!("   💡 Log in first: mesa-ayuda login --email <email> --password <password>");
        }
        Some(_) => {}
        None => eprintln!("❌ {error:#}"),
    }
}
