mod browse;
mod interactive;
mod output;
mod store;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use storemap_app::{HeadlessView, LocatorApp};
use storemap_client::StoreMapClient;
use tracing_subscriber::EnvFilter;

use crate::store::StoreCommands;

type App = LocatorApp<HeadlessView>;

#[derive(Debug, Parser)]
#[command(name = "storemap")]
#[command(about = "Store locator command line client")]
struct Cli {
    /// Admin username; falls back to `STOREMAP_ADMIN_USERNAME`
    #[arg(long, global = true)]
    username: Option<String>,

    /// Admin password; falls back to `STOREMAP_ADMIN_PASSWORD`
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List stores, optionally filtered
    Stores {
        /// Case-insensitive name search
        #[arg(long)]
        query: Option<String>,
        /// Exact district name
        #[arg(long)]
        district: Option<String>,
        /// Also print the heat layer points
        #[arg(long)]
        heatmap: bool,
    },
    /// List districts
    Districts,
    /// Find the district containing a point
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Store count per district
    Stats,
    /// Create, update, move or delete a store (admin)
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
    /// Change the admin password
    ChangePassword {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
    /// Read commands and searches from stdin
    Interactive,
}

/// Admin credentials from flags, then config.
#[derive(Debug, Clone)]
pub(crate) struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    fn resolve(cli: &Cli, config: &storemap_core::AppConfig) -> Option<Self> {
        let username = cli
            .username
            .clone()
            .or_else(|| config.admin_username.clone())?;
        let password = cli
            .password
            .clone()
            .or_else(|| config.admin_password.clone())?;
        Some(Self { username, password })
    }
}

/// Logs in with the resolved credentials or fails with a hint.
pub(crate) async fn login(app: &App, credentials: Option<&Credentials>) -> anyhow::Result<()> {
    let credentials = credentials.ok_or_else(|| {
        anyhow::anyhow!(
            "admin credentials required; pass --username/--password or set \
             STOREMAP_ADMIN_USERNAME and STOREMAP_ADMIN_PASSWORD"
        )
    })?;
    app.login(&credentials.username, &credentials.password)
        .await
        .map_err(|e| anyhow::anyhow!("login failed: {}", e.user_message()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = storemap_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let credentials = Credentials::resolve(&cli, &config);

    let client = StoreMapClient::new(&config)?;
    let app: Arc<App> = Arc::new(LocatorApp::new(client, HeadlessView::new()));
    tracing::debug!(api_url = %config.api_url, env = %config.env, "client ready");

    match cli.command {
        Some(Commands::Stores {
            query,
            district,
            heatmap,
        }) => {
            browse::run_stores(
                &app,
                query.as_deref().unwrap_or_default(),
                district.as_deref().unwrap_or_default(),
                heatmap,
            )
            .await?;
        }
        Some(Commands::Districts) => browse::run_districts(&app).await?,
        Some(Commands::Locate { lat, lng }) => browse::run_locate(&app, lat, lng).await?,
        Some(Commands::Stats) => browse::run_stats(&app).await?,
        Some(Commands::Store { command }) => {
            store::run_store_command(&app, credentials.as_ref(), command).await?;
        }
        Some(Commands::ChangePassword { old, new }) => {
            login(&app, credentials.as_ref()).await?;
            let result = app.change_password(&old, &new).await;
            output::print_alerts(&app).await;
            result.map_err(|e| anyhow::anyhow!(e.user_message()))?;
        }
        Some(Commands::Interactive) => {
            interactive::run(&app, credentials.as_ref(), config.search_debounce()).await?;
        }
        None => browse::run_stores(&app, "", "", false).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
