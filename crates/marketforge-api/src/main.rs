//! MarketForge CLI and REST API entry point.
//!
//! Binary name: `mforge`
//!
//! `mforge serve` wires the database and provider into the REST API;
//! `mforge apikey create` mints an API key for a user.

mod http;
mod state;

use clap::{Parser, Subcommand};

use state::AppState;

#[derive(Parser)]
#[command(name = "mforge", about = "Market research pipeline server", version)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server.
    Serve {
        /// Bind host; overrides config.toml.
        #[arg(long)]
        host: Option<String>,
        /// Bind port; overrides config.toml.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Manage API keys.
    Apikey {
        #[command(subcommand)]
        command: ApikeyCommands,
    },
}

#[derive(Subcommand)]
enum ApikeyCommands {
    /// Create a new API key for a user. The plaintext key is printed
    /// once and only its hash is stored.
    Create {
        /// Owner of the key; project ownership checks run against this id.
        #[arg(long)]
        user_id: String,
        /// Label for the key.
        #[arg(long, default_value = "default")]
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    marketforge_observe::tracing_setup::init_tracing(cli.json_logs)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState::init().await?;

            let bind_host = host.unwrap_or_else(|| state.config.host.clone());
            let bind_port = port.unwrap_or(state.config.port);
            let addr = format!("{bind_host}:{bind_port}");

            let router = http::router::build_router(state);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "listening");
            axum::serve(listener, router).await?;
        }

        Commands::Apikey { command } => match command {
            ApikeyCommands::Create { user_id, name } => {
                // Key creation only needs the database, not the provider.
                let data_dir = marketforge_infra::config::data_dir();
                tokio::fs::create_dir_all(&data_dir).await?;
                let url = marketforge_infra::config::database_url(&data_dir);
                let pool = marketforge_infra::sqlite::DatabasePool::new(&url).await?;

                let key = http::extractors::auth::create_api_key(&pool, &user_id, &name).await?;
                println!("API key for '{user_id}' (shown once, store it now):");
                println!("{key}");
            }
        },
    }

    Ok(())
}
