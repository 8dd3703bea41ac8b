use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use triage::integrations::github::GithubClient;
use triage::integrations::QueryMode;
use triage::{commands, config, tui};

const LOG_FILE: &str = "triage.log";

#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(about = "Terminal dashboard for triaging issues across GitHub repositories")]
#[command(version)]
struct Args {
    /// Verbose logging, debug info on the status line and a dump of the issue list
    #[arg(long, global = true)]
    debug: bool,

    /// GitHub API token
    #[arg(long, env = "GITHUB_API_TOKEN", hide_env_values = true, global = true)]
    api_token: Option<String>,

    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the dashboard
    Ui {
        /// Search query appended to `is:open is:issue`
        target: Option<String>,

        /// List every open issue in an organization
        #[arg(long)]
        org: Option<String>,
    },
    /// Print the current/next/someday milestones of every configured project
    ShowMilestones,
    /// Print a project's labels as YAML
    ShowLabels { project: String },
    /// Create or recolor the configured priority and type labels
    SetLabels {
        /// `owner/repo`, a space separated list, or `all`
        target: String,
    },
    /// Print the repositories visible to you, or in an organization
    ShowProjects { org: Option<String> },
    /// Create the configured next and someday milestones where missing
    SetMilestones {
        /// `owner/repo`, a space separated list, or `all`
        target: String,
    },
    /// Create a dated milestone
    CreateMilestone {
        /// `owner/repo`, a space separated list, or `all`
        target: String,

        /// Milestone title (defaults to the due date's ISO week, YYYY-WW)
        #[arg(long)]
        title: Option<String>,

        /// Due date as YYYY-MM-DD (defaults to the Sunday at least five days out)
        #[arg(long)]
        due: Option<String>,
    },
    /// Print the version
    Version,
}

fn init_logging(debug: bool, to_file: bool) -> Result<()> {
    let directive = if debug { "triage=debug" } else { "triage=info" };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?);

    // The dashboard owns the terminal, so it logs to a file.
    if to_file {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(LOG_FILE)
            .with_context(|| format!("Failed to open {}", LOG_FILE))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(log_file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Ui {
        target: None,
        org: None,
    });

    if let Command::Version = command {
        println!("triage {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(args.debug, matches!(command, Command::Ui { .. }))?;

    let config = config::load(args.config.as_deref())?;
    let token = args
        .api_token
        .filter(|t| !t.is_empty())
        .context("No API token found, please set GITHUB_API_TOKEN or --api-token")?;
    let client = GithubClient::new(token);

    match command {
        Command::Ui { target, org } => {
            let mode = QueryMode::from_options(org.as_deref(), target.as_deref(), &config.projects);
            tui::run(config, Arc::new(client), mode, args.debug).await
        }
        Command::ShowMilestones => commands::show_milestones(&client, &config).await,
        Command::ShowLabels { project } => commands::show_labels(&client, &project).await,
        Command::SetLabels { target } => commands::set_labels(&client, &config, &target).await,
        Command::ShowProjects { org } => commands::show_projects(&client, org.as_deref()).await,
        Command::SetMilestones { target } => {
            commands::set_milestones(&client, &config, &target).await
        }
        Command::CreateMilestone { target, title, due } => {
            commands::create_milestone(&client, &config, &target, title.as_deref(), due.as_deref())
                .await
        }
        Command::Version => Ok(()),
    }
}
