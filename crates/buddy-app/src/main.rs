mod commands;
mod output;
mod state;

use anyhow::Context;
use buddy_config::ConfigManager;
use buddy_core::DraftStatus;
use clap::{Args, Parser, Subcommand};
use output::Output;
use state::AppState;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Drafts email replies in a chosen tone with a local Ollama model.
#[derive(Debug, Parser)]
#[command(name = "draftbuddy", version, about)]
pub struct Cli {
    /// Keep config and data under this directory instead of the platform defaults.
    #[arg(long, value_name = "DIR", global = true)]
    root: Option<PathBuf>,
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the model endpoint and summarize the draft queue.
    Status,
    /// Manage tone profiles.
    Tones {
        #[command(subcommand)]
        action: ToneCommand,
    },
    /// Generate three reply drafts for an email read from a file or stdin.
    Generate {
        /// Tone profile id or name.
        #[arg(long)]
        tone: String,
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Review the draft queue.
    Drafts {
        #[command(subcommand)]
        action: DraftCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ToneCommand {
    List,
    Show { id: String },
    Create(ToneArgs),
    Update {
        id: String,
        #[command(flatten)]
        fields: ToneArgs,
    },
    Delete { id: String },
}

#[derive(Debug, Default, Args)]
pub struct ToneArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub instructions: Option<String>,
    /// Repeat to add several keywords.
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,
    /// Repeat to add several sample phrases.
    #[arg(long = "phrase")]
    pub phrases: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    List {
        #[arg(long)]
        status: Option<DraftStatus>,
    },
    Show { id: String },
    Approve { id: String },
    Discard { id: String },
    /// Replace a draft's content with text from a file or stdin.
    Edit {
        id: String,
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    Delete { id: String },
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let manager = match &cli.root {
        Some(root) => ConfigManager::with_root(root),
        None => ConfigManager::new(),
    }
    .context("locate config directory")?;
    let config = manager.load().context("load config")?;
    init_tracing(&config.logging.filter);
    if manager.wrote_default() {
        tracing::info!(path = %manager.config_path().display(), "wrote default config");
    }
    tracing::debug!(path = %manager.config_path().display(), "loaded config");

    let state = AppState::initialize(&manager, config).await?;
    let out = Output::new(cli.json);

    match cli.command {
        Command::Status => commands::status(&state, &out).await,
        Command::Tones { action } => match action {
            ToneCommand::List => commands::list_tones(&state, &out).await,
            ToneCommand::Show { id } => commands::show_tone(&state, &out, &id).await,
            ToneCommand::Create(args) => commands::create_tone(&state, &out, args).await,
            ToneCommand::Update { id, fields } => {
                commands::update_tone(&state, &out, &id, fields).await
            }
            ToneCommand::Delete { id } => commands::delete_tone(&state, &out, &id).await,
        },
        Command::Generate { tone, file } => {
            commands::generate(&state, &out, &tone, file.as_deref()).await
        }
        Command::Drafts { action } => match action {
            DraftCommand::List { status } => commands::list_drafts(&state, &out, status).await,
            DraftCommand::Show { id } => commands::show_draft(&state, &out, &id).await,
            DraftCommand::Approve { id } => commands::approve_draft(&state, &out, &id).await,
            DraftCommand::Discard { id } => commands::discard_draft(&state, &out, &id).await,
            DraftCommand::Edit { id, file } => {
                commands::edit_draft(&state, &out, &id, file.as_deref()).await
            }
            DraftCommand::Delete { id } => commands::delete_draft(&state, &out, &id).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_with_global_flags() {
        let cli = Cli::try_parse_from([
            "draftbuddy",
            "generate",
            "--tone",
            "Direct",
            "--json",
            "--root",
            "/tmp/buddy",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/buddy")));
        assert!(matches!(
            cli.command,
            Command::Generate { ref tone, file: None } if tone == "Direct"
        ));
    }

    #[test]
    fn generate_requires_a_tone() {
        assert!(Cli::try_parse_from(["draftbuddy", "generate"]).is_err());
    }

    #[test]
    fn parses_draft_status_filter() {
        let cli =
            Cli::try_parse_from(["draftbuddy", "drafts", "list", "--status", "approved"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Drafts {
                action: DraftCommand::List {
                    status: Some(DraftStatus::Approved)
                }
            }
        ));

        assert!(Cli::try_parse_from(["draftbuddy", "drafts", "list", "--status", "sent"]).is_err());
    }

    #[test]
    fn repeated_tone_flags_collect() {
        let cli = Cli::try_parse_from([
            "draftbuddy",
            "tones",
            "update",
            "profile-1",
            "--keyword",
            "ahoy",
            "--keyword",
            "matey",
            "--phrase",
            "Arr.",
        ])
        .unwrap();

        let Command::Tones {
            action: ToneCommand::Update { id, fields },
        } = cli.command
        else {
            panic!("expected tones update");
        };
        assert_eq!(id, "profile-1");
        assert_eq!(fields.keywords, vec!["ahoy", "matey"]);
        assert_eq!(fields.phrases, vec!["Arr."]);
        assert_eq!(fields.name, None);
    }
}
