use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "prodtrack")]
#[command(version, about = "Mass production project tracking client")]
pub struct Cli {
    /// Debug logging to stderr (overridden by PRODTRACK_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Backend origin, e.g. http://localhost:5000
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token; takes precedence over the stored session
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Directory searched for .prodtrack/prodtrack.toml
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store an access token in the session file
    Login {
        /// Token to store; falls back to --token, then a prompt
        #[arg(value_name = "TOKEN")]
        access_token: Option<String>,
    },
    /// Remove the stored session
    Logout,
    /// Show whether a session token is stored
    Session,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Mass production projects
    Projects {
        #[command(subcommand)]
        command: ProjectsCommands,
    },
    /// Calls and their countdowns
    Calls {
        #[command(subcommand)]
        command: CallsCommands,
    },
    /// Generic access to any backend resource
    Resource {
        #[command(subcommand)]
        command: ResourceCommands,
    },
    /// User administration
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Show the product designations and users offered by the project form
    FormOptions,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default prodtrack.toml file
    Init,
}

#[derive(Subcommand, Clone)]
pub enum ProjectsCommands {
    /// List projects with their completion
    List {
        #[arg(long)]
        status: Option<String>,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one project with its stage report
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Delete a project
    Delete { id: String },
}

#[derive(Subcommand, Clone)]
pub enum CallsCommands {
    /// List calls with their remaining time
    List {
        /// pending, completed, expired
        #[arg(long)]
        status: Option<String>,
        /// Earliest call date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest call date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Mark a call as made
    Complete { id: String },
    /// Ask the backend to expire overdue calls
    CheckExpired,
    /// Download the call spreadsheet
    Export {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ResourceCommands {
    /// List every record of a resource
    List {
        kind: String,
        #[arg(long)]
        json: bool,
    },
    /// Fetch one record as JSON
    Get { kind: String, id: String },
    /// Delete one record
    Delete { kind: String, id: String },
    /// Create a record, or replace it when --id is given
    Push {
        kind: String,
        /// JSON file holding the record
        #[arg(short, long)]
        file: PathBuf,
        /// Replace this record instead of creating one
        #[arg(long)]
        id: Option<String>,
        /// File attachment as FIELD=PATH (repeatable)
        #[arg(long = "attach", value_name = "FIELD=PATH")]
        attachments: Vec<String>,
    },
}

#[derive(Subcommand, Clone)]
pub enum UsersCommands {
    /// List users
    List,
    /// Change a user's role
    Role { id: String, role: String },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "prodtrack=debug"
    } else {
        "prodtrack=warn"
    };
    let filter =
        EnvFilter::try_from_env("PRODTRACK_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let config = cmd::load_config(&cli, &project_dir)?;

    match &cli.command {
        Commands::Login { access_token } => {
            cmd::cmd_login(&config, access_token.clone().or_else(|| cli.token.clone()))?
        }
        Commands::Logout => cmd::cmd_logout(&config)?,
        Commands::Session => cmd::cmd_session(&config)?,
        Commands::Config { command } => cmd::cmd_config(&project_dir, &config, command.clone())?,
        Commands::Projects { command } => cmd::cmd_projects(&cli, &config, command.clone()).await?,
        Commands::Calls { command } => cmd::cmd_calls(&config, command.clone()).await?,
        Commands::Resource { command } => cmd::cmd_resource(&cli, &config, command.clone()).await?,
        Commands::Users { command } => cmd::cmd_users(&config, command.clone()).await?,
        Commands::FormOptions => cmd::cmd_form_options(&config).await?,
    }

    Ok(())
}
