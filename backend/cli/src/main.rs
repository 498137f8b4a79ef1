mod extract_cmd;
mod status_cmd;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use ocrelay_config::{load_and_prepare, locate_config, redact_config, ConfigProvider, EnvSource, RelayConfig};
use ocrelay_extraction::Extractor;
use ocrelay_gateway::{start_server, GatewayState};
use ocrelay_logging::init_logger;

#[derive(Parser)]
#[command(name = "ocrelay")]
#[command(about = "ocrelay: invoice image to JSON relay backed by Gemini")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $OCRELAY_CONFIG or ~/.ocrelay/ocrelay.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Extract one local image and print the JSON result
    Extract {
        /// Image file to send
        image: PathBuf,
        /// MIME type (guessed from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,
        /// Skip forward-filling blank line-item cells
        #[arg(long)]
        no_fill: bool,
    },
    /// Query the health endpoint of a running gateway
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the effective configuration with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env: Arc<dyn ConfigProvider> = Arc::new(EnvSource);
    let config_path = locate_config(cli.config.as_deref(), env.as_ref());
    let config = load_and_prepare(&config_path, env.as_ref()).await?;

    let _log_guard = init_logger(
        config.logging.dir.as_deref(),
        &config.logging.level,
        config.logging.json,
    )?;

    match cli.command {
        Commands::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config, env).await?;
        }
        Commands::Extract { image, mime, no_fill } => {
            let mut config = config;
            if no_fill {
                config.extraction.forward_fill = false;
            }
            extract_cmd::run(&config, env, &image, mime.as_deref()).await?;
        }
        Commands::Status { port } => {
            status_cmd::run(port.unwrap_or(config.server.port)).await?;
        }
        Commands::Config => {
            println!("# {}", config_path.display());
            print!("{}", serde_yaml::to_string(&redact_config(&config))?);
        }
    }

    Ok(())
}

async fn run_server(config: RelayConfig, env: Arc<dyn ConfigProvider>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.server.bind, config.server.port))?;

    let extractor = Extractor::from_config(&config, env)?;
    info!(
        addr = %addr,
        model = extractor.model(),
        fill_fields = ?extractor.fill_fields(),
        "Starting ocrelay gateway"
    );

    let state = GatewayState::new(Arc::new(extractor));
    start_server(addr, state, &config.server).await
}
