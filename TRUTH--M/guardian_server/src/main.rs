use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use truth_factcheck::{AnalysisError, FactCheckRuntime, GuardianConfig, LogStream, Verdict};

mod routes;

#[derive(Parser, Debug)]
#[command(
    name = "truth_guardian",
    version,
    about = "Checks claims against live web evidence"
)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serves `POST /analyze` and `GET /health`.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Analyzes one claim and prints the verdict as JSON.
    Check {
        /// Claim text.
        text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = GuardianConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;
    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });
    let runtime = Runtime::new()?;

    match command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let pipeline =
                FactCheckRuntime::from_config(&config).context("bootstrapping fact-check runtime")?;
            runtime.block_on(routes::run_server(
                &config.server,
                pipeline,
                shutdown_signal(),
            ))
        }
        Commands::Check { text } => {
            if config.logging.path.is_none() {
                config.logging.stream = LogStream::Stderr;
            }
            let pipeline =
                FactCheckRuntime::from_config(&config).context("bootstrapping fact-check runtime")?;
            let verdict = match runtime.block_on(pipeline.analyze(&text)) {
                Ok(verdict) => verdict,
                Err(AnalysisError::EmptyClaim) => bail!("No text provided"),
                Err(err) => Verdict::error(&err.to_string()),
            };
            println!("{}", serde_json::to_string_pretty(&verdict)?);
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(target: "truth-guardian", error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!(target: "truth-guardian", "shutting down gracefully");
}
