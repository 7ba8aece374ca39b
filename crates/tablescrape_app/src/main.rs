use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tablescrape_app::client::{run_interactive, ScrapeClient};
use tablescrape_app::config::AppConfig;
use tablescrape_app::{logging, server};
use tablescrape_engine::{FetchSettings, ScrapeService};
use tablescrape_logging::scrape_info;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "tablescrape", version, about = "Scrape the first HTML table of a page into JSON records")]
struct Cli {
    /// RON config file.
    #[arg(long, global = true, env = "TABLESCRAPE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, global = true, env = "TABLESCRAPE_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run only the HTTP endpoint.
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run only the interactive client against a running endpoint.
    Client {
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Run the endpoint in the background and the interactive client in front (default).
    Run {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    logging::initialize(config.level_filter()?, config.log_destination);

    let command = cli.command.unwrap_or(Command::Run {
        bind: None,
        endpoint: None,
    });
    match command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            let listener = bind_listener(&config).await?;
            server::serve(listener, build_router(&config), shutdown_signal()).await?;
        }
        Command::Client { endpoint } => {
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            run_interactive(&ScrapeClient::new(config.endpoint)).await?;
        }
        Command::Run { bind, endpoint } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            let listener = bind_listener(&config).await?;
            let host = tokio::spawn(server::serve(
                listener,
                build_router(&config),
                shutdown_signal(),
            ));

            let outcome = run_interactive(&ScrapeClient::new(config.endpoint)).await;
            host.abort();
            outcome?;
        }
    }

    scrape_info!("Shutting down");
    Ok(())
}

fn build_router(config: &AppConfig) -> axum::Router {
    let settings = FetchSettings::from(&config.fetch);
    server::router(Arc::new(ScrapeService::with_settings(settings)))
}

async fn bind_listener(config: &AppConfig) -> anyhow::Result<TcpListener> {
    TcpListener::bind(config.bind.as_str())
        .await
        .with_context(|| format!("failed to bind {}", config.bind))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
