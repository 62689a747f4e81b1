use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumina::auth::TokenKeys;
use lumina::client::commands::{self, ClientCommand};
use lumina::config::{ClientConfig, ServerConfig};
use lumina::api;

#[derive(Parser)]
#[command(name = "lumina")]
#[command(about = "Personal notes with a REST server and a terminal client")]
struct Cli {
    #[command(flatten)]
    client: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Lumina API server
    Serve(ServerConfig),

    #[command(flatten)]
    Client(ClientCommand),
}

/// Initialize tracing to stdout (server) or stderr (client, so stdout only
/// carries rendered output).
fn init_tracing(use_stderr: bool) {
    let default_filter = if use_stderr {
        "lumina=warn"
    } else {
        "lumina=debug,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    if use_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Lumina server on port {}", config.port);

    let db = config.connect_database();

    let tokens = TokenKeys::from_secret(config.jwt_secret.as_bytes());
    let app = api::create_router(db, tokens);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Lumina server listening on http://{}", address);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env is normal outside development.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let is_client = matches!(cli.command, Commands::Client(_));
    init_tracing(is_client);

    match cli.command {
        Commands::Serve(config) => {
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Client(command) => {
            if commands::run(command, &cli.client).await? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
