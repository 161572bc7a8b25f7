//! Seminar QA CLI - collect seminar questions and summarize them

use clap::{Parser, Subcommand};
use seminar_qa::auth::AdminSecret;
use seminar_qa::config::{self, SeminarConfig};
use seminar_qa::server::{self, AppState};
use seminar_qa::ui::{self, Icons};
use seminar_qa::{QuestionStore, SummaryRequester};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "seminar-qa")]
#[command(version)]
#[command(about = "Seminar question queue with AI-generated summaries")]
#[command(long_about = r#"
Seminar QA collects questions from attendees into a shared queue and lets
the host review, clear, or summarize them by topic.

Example usage:
  seminar-qa serve --port 8501
  seminar-qa submit "What is prompt engineering?"
  seminar-qa list --limit 5
  OPENAI_API_KEY=sk-... seminar-qa summarize
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default seminar-qa.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Port to listen on (defaults to the config file, then 8501)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Submit a question
    Submit {
        /// Question text
        text: String,
    },

    /// Show submitted questions, newest first
    List {
        /// Only show the most recent N questions
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show ids and submission times
        #[arg(short, long)]
        records: bool,
    },

    /// Delete every submitted question
    Clear,

    /// Generate a categorized summary of all questions
    Summarize {
        /// API key for the summary service (defaults to $OPENAI_API_KEY)
        #[arg(short = 'k', long)]
        api_key: Option<String>,
    },
}

fn open_store(config: &SeminarConfig, explicit: Option<&Path>) -> anyhow::Result<QuestionStore> {
    let database = config.database_path(explicit);
    config::ensure_db_dir(&database)?;
    Ok(QuestionStore::open(&database)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let settings = config::load_config(Some(config_path.as_path()))?.unwrap_or_default();

    match cli.command {
        Commands::Init { force } => {
            config::write_config(&config_path, &SeminarConfig::with_defaults(), force)?;
            ui::success(&format!("Wrote {}", config_path.display()));
            ui::info(
                "Secrets",
                &format!(
                    "set {} and {} in the environment",
                    config::ADMIN_SECRET_ENV,
                    config::API_KEY_ENV
                ),
            );
        }

        Commands::Serve { port } => {
            let store = open_store(&settings, cli.database.as_deref())?;
            let summarizer = SummaryRequester::new(
                settings.api_base_url(),
                settings.model(),
                settings.timeout(),
            )?;
            let secret = config::admin_secret_from_env();

            let state = AppState {
                store,
                summarizer,
                admin: AdminSecret::new(secret.as_deref()),
                default_api_key: config::api_key_from_env(),
            };
            server::start_server(port.unwrap_or_else(|| settings.port()), state).await?;
        }

        Commands::Submit { text } => {
            let store = open_store(&settings, cli.database.as_deref())?;
            if let Err(e) = store.add_question(&text) {
                ui::error(&e.to_string());
                std::process::exit(1);
            }
            ui::success("Your question has been submitted!");
        }

        Commands::List { limit, records } => {
            let store = open_store(&settings, cli.database.as_deref())?;
            let total = store.count()?;

            ui::header(Icons::INBOX, &format!("Submitted Questions ({})", total));
            if total == 0 {
                ui::empty_notice("No questions have been submitted yet.");
                return Ok(());
            }

            if records {
                let mut questions = store.list_records()?;
                if let Some(limit) = limit {
                    questions.truncate(limit);
                }
                println!("{}", ui::questions_table(&questions));
            } else {
                let questions = match limit {
                    Some(limit) => store.recent(limit)?,
                    None => store.list_questions()?,
                };
                for (i, question) in questions.iter().enumerate() {
                    ui::question_line(i + 1, question);
                }
            }

            let shown = limit.map_or(total, |l| l.min(total));
            if shown < total {
                ui::empty_notice(&format!("...and {} more.", total - shown));
            }
        }

        Commands::Clear => {
            let store = open_store(&settings, cli.database.as_deref())?;
            let removed = store.clear_all()?;
            ui::success(&format!("All questions have been cleared ({} removed).", removed));
        }

        Commands::Summarize { api_key } => {
            let store = open_store(&settings, cli.database.as_deref())?;
            let summarizer = SummaryRequester::new(
                settings.api_base_url(),
                settings.model(),
                settings.timeout(),
            )?;
            let api_key = api_key
                .or_else(config::api_key_from_env)
                .unwrap_or_default();

            let questions = store.list_questions()?;
            let spinner = ui::Spinner::new("AI is thinking...");
            let result = summarizer.summarize(&api_key, &questions).await;
            spinner.finish_and_clear();

            match result {
                Ok(summary) => {
                    ui::header(Icons::ROBOT, "AI Summary");
                    println!("{}", summary);
                }
                Err(e) => {
                    ui::error(&e.to_string());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
