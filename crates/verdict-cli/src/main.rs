//! Verdict CLI
//!
//! - `serve`: run the web app
//! - `decide`: produce one verdict in the terminal
//! - `sign`: compute a payment signature for manual checks

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verdict_core::{DecisionType, SignatureVerifier, VerdictRequest};
use verdict_runtime::{RuntimeConfig, VerdictGenerator};
use verdict_server::{ServerConfig, DEFAULT_LISTEN_ADDR};

#[derive(Parser)]
#[command(name = "verdict")]
#[command(about = "Verdict - pay once, get a decision, move on", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "VERDICT_CONFIG")]
        config: Option<PathBuf>,

        /// Listen address
        #[arg(short, long, env = "VERDICT_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
        listen: String,
    },

    /// Generate one verdict and print it as JSON
    Decide {
        /// Decision type: yes-no, this-that or now-later (anything else is yes-no)
        #[arg(short = 't', long = "type")]
        decision_type: String,

        /// The situation, at most 200 characters
        #[arg(short, long)]
        input: String,

        /// Skip the model and use the deterministic fallback
        #[arg(long)]
        offline: bool,

        /// Configuration file path
        #[arg(short, long, env = "VERDICT_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the signature expected for an order and payment pair
    Sign {
        #[arg(long)]
        order_id: String,

        #[arg(long)]
        payment_id: String,

        /// Gateway key secret
        #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
        secret: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json);

    match cli.command {
        Commands::Serve { config, listen } => {
            let runtime = load_config(config.as_ref())?;
            let listen_addr: SocketAddr = listen
                .parse()
                .with_context(|| format!("Invalid listen address: {}", listen))?;

            verdict_server::serve(ServerConfig {
                listen_addr,
                runtime,
            })
            .await?;
        }
        Commands::Decide {
            decision_type,
            input,
            offline,
            config,
        } => {
            let decision_type = resolve_type(&decision_type);
            let request = VerdictRequest::new(decision_type, input)?;

            let generator = if offline {
                VerdictGenerator::offline()
            } else {
                load_config(config.as_ref())?.build_generator()
            };

            let generated = generator.generate(&request).await;
            println!("{}", serde_json::to_string_pretty(&generated)?);
        }
        Commands::Sign {
            order_id,
            payment_id,
            secret,
        } => {
            let signature =
                SignatureVerifier::new(secret).expected_signature(&order_id, &payment_id)?;
            println!("{}", signature);
        }
    }

    Ok(())
}

/// Unknown types resolve to yes-no, as they do over HTTP.
fn resolve_type(raw: &str) -> DecisionType {
    let resolved = DecisionType::parse_lenient(raw);
    if resolved.as_str() != raw {
        tracing::warn!(requested = %raw, resolved = %resolved, "Unknown decision type");
    }
    resolved
}

fn init_tracing(log_level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_level.into());

    // stdout carries command output
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RuntimeConfig> {
    let config = match path {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
