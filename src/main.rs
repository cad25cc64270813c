//! MockAI CLI - Mock LLM Provider APIs
//!
//! Usage:
//!   mockai serve [OPTIONS]    Start the HTTP server
//!
//! Examples:
//!   mockai serve --port 8080
//!   mockai serve --config config.yaml
//!   mockai serve --tokenizer regex --cadence-ms 50

use clap::{Parser, Subcommand};
use mockai::cli::{Config, ConfigError};

#[derive(Parser)]
#[command(name = "mockai")]
#[command(author, version, about = "Mock LLM provider APIs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MockAI HTTP server
    Serve {
        /// Configuration file path (YAML)
        #[arg(short, long)]
        config: Option<String>,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Tokenizer strategy (bpe, regex)
        #[arg(long)]
        tokenizer: Option<String>,

        /// Milliseconds between streamed tokens
        #[arg(long)]
        cadence_ms: Option<u64>,

        /// Maximum permitted request_delay in milliseconds
        #[arg(long)]
        max_request_delay_ms: Option<u64>,
    },
}

fn build_config(
    config_file: Option<String>,
    port: u16,
    host: String,
    tokenizer: Option<String>,
    cadence_ms: Option<u64>,
    max_request_delay_ms: Option<u64>,
) -> Result<Config, ConfigError> {
    let mut config = if let Some(path) = config_file {
        Config::from_file(&path)?
    } else {
        Config::default()
    };

    // Override with CLI arguments
    config.server.port = port;
    config.server.host = host;
    if let Some(strategy) = tokenizer {
        config.tokenizer.strategy = strategy;
    }
    if let Some(cadence) = cadence_ms {
        config.stream.cadence_ms = cadence;
    }
    if let Some(max_delay) = max_request_delay_ms {
        config.limits.max_request_delay_ms = max_delay;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            host,
            tokenizer,
            cadence_ms,
            max_request_delay_ms,
        } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive("mockai=info".parse().unwrap())
                        .add_directive("tower_http=debug".parse().unwrap()),
                )
                .init();

            let config =
                build_config(config, port, host, tokenizer, cadence_ms, max_request_delay_ms)?;
            mockai::cli::run_server(config).await?;
        }
    }

    Ok(())
}
