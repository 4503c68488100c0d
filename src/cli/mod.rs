use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::api::RequestFormat;
use crate::views::ViewKind;

pub mod commands;

#[derive(Parser)]
#[command(name = "mesa-ayuda")]
#[command(version)]
#[command(about = "Help-desk client for media service requests")]
#[command(long_about = "Submit media service requests, follow them through review, assignment and \
                       resolution, and act on them according to your roles. Start with \
                       'mesa-ayuda login' and then 'mesa-ayuda home'.")]
pub struct Cli {
    /// Configuration file (defaults to mesa-ayuda.toml or .mesa-ayuda-rc)
    #[arg(long, global = true, help = "Read configuration from this TOML file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and open your home view
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Full name
        #[arg(long)]
        name: String,
        /// National identification number
        #[arg(long)]
        id_number: String,
        #[arg(long)]
        phone: Option<String>,
        /// Institutional role (student, professor, staff...)
        #[arg(long)]
        tdea_role: Option<String>,
        #[arg(long)]
        campus: Option<String>,
        /// Faculty or department
        #[arg(long)]
        department: Option<String>,
    },
    /// Close the session and forget the token
    Logout,
    /// Show who is logged in and which views are available
    Whoami,
    /// Open the default view for your roles
    Home,
    /// Requests you submitted
    List,
    /// Every request, with review and assignment actions (administrators)
    Admin,
    /// Requests assigned to you (collaborators)
    Assignments,
    /// Full detail of one request, with the actions available to you
    Show { id: String },
    /// Submit a new request
    New {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Video, Photography, Broadcast, VirtualCourse, Animation or GraphicDesign
        #[arg(long)]
        format: RequestFormat,
        /// YYYY-MM-DD
        #[arg(long)]
        event_date: Option<NaiveDate>,
        #[arg(long)]
        event_time: Option<String>,
        #[arg(long)]
        event_place: Option<String>,
        /// Origin department (defaults to the one saved with the session)
        #[arg(long)]
        department: Option<String>,
    },
    /// Collaborators requests can be assigned to (administrators)
    Collaborators,
    /// Assign a request to a collaborator
    Assign {
        id: String,
        collaborator_id: String,
        #[command(flatten)]
        from: FromView,
    },
    /// Start working on an assigned request
    Start {
        id: String,
        #[arg(short = 'y', long, help = "Skip the confirmation prompt")]
        yes: bool,
        #[command(flatten)]
        from: FromView,
    },
    /// Mark a request in process as resolved
    Resolve {
        id: String,
        #[arg(short = 'y', long, help = "Skip the confirmation prompt")]
        yes: bool,
        #[command(flatten)]
        from: FromView,
    },
    /// Approve a request awaiting review
    Approve {
        id: String,
        #[arg(long)]
        comment: String,
        #[command(flatten)]
        from: FromView,
    },
    /// Reject a request awaiting review
    Reject {
        id: String,
        #[arg(long)]
        comment: String,
        #[command(flatten)]
        from: FromView,
    },
    /// Send a request back to its requester for corrections
    Return {
        id: String,
        #[arg(long)]
        comment: String,
        #[command(flatten)]
        from: FromView,
    },
    /// Reopen one of your resolved requests
    Reopen {
        id: String,
        #[arg(long)]
        reason: String,
        #[command(flatten)]
        from: FromView,
    },
    /// Rate the service on a resolved request (1-5)
    Rate {
        id: String,
        score: String,
        #[arg(long, default_value = "")]
        comment: String,
        #[command(flatten)]
        from: FromView,
    },
    /// Add a comment to a request
    Comment { id: String, text: String },
}

/// View an action is triggered from; decides what is redrawn afterwards
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct FromView {
    #[arg(long = "from", default_value = "detail", help = "View the action is dispatched from: detail, list, admin or assignments")]
    pub view: ViewKind,
}
