use anyhow::Result;
use clap::{Parser, Subcommand};
use edumentor_core::completion::DEFAULT_QUIZ_QUESTIONS;
use edumentor_core::config::AppConfig;
use edumentor_core::CompletionClient;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "edumentor",
    about = "STEM tutoring and quiz backend with engagement tracking",
    version,
    author
)]
struct Cli {
    /// Path to config file (default: ~/.config/edumentor/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Try this model before the configured candidates
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Ask the tutor a single question
    Ask {
        question: String,
    },

    /// Generate a quiz on a topic
    Quiz {
        topic: String,
        /// Number of questions to request (at most 3 are returned)
        #[arg(short = 'n', long, default_value_t = DEFAULT_QUIZ_QUESTIONS)]
        count: usize,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize default configuration file
    Init,
    /// Print config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "edumentor=info,warn".into()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(_) => tracing::debug!("No .env file found, using process environment"),
    }

    // Load config.
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    if let Some(model) = &cli.model {
        config.provider.models.insert(0, model.clone());
    }

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(h) = host {
                config.server.host = h;
            }
            if let Some(p) = port {
                config.server.port = p;
            }
            edumentor_server::serve(config).await?;
        }
        Some(Commands::Ask { question }) => {
            let question = question.trim();
            if question.is_empty() {
                anyhow::bail!("Question cannot be empty.");
            }
            let client = CompletionClient::from_config(&config);
            let reply = client.tutor_completion(question).await;
            println!("{}", reply.answer);
            if !reply.follow_up_suggestions.is_empty() {
                println!();
                for suggestion in &reply.follow_up_suggestions {
                    println!("  - {}", suggestion);
                }
            }
        }
        Some(Commands::Quiz { topic, count }) => {
            let topic = topic.trim();
            if topic.is_empty() {
                anyhow::bail!("Topic cannot be empty.");
            }
            let client = CompletionClient::from_config(&config);
            let items = client.quiz_completion(topic, count).await;
            for (i, item) in items.iter().enumerate() {
                println!("Q{}: {}", i + 1, item.prompt);
                println!("A{}: {}", i + 1, item.answer);
            }
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, &config)?;
        }
        None => {
            edumentor_server::serve(config).await?;
        }
    }

    Ok(())
}

fn handle_config_command(action: Option<ConfigAction>, config: &AppConfig) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
        }
        Some(ConfigAction::Init) => {
            let path = AppConfig::default_path();
            if path.exists() {
                println!("Config already exists at: {}", path.display());
            } else {
                config.save()?;
                println!("Created default config at: {}", path.display());
            }
        }
        Some(ConfigAction::Path) => {
            println!("{}", AppConfig::default_path().display());
        }
    }
    Ok(())
}
