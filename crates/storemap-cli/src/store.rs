//! Admin store commands.
//!
//! Each command logs in, loads the current store list so the app knows what is
//! on the map, then runs the matching [`storemap_app::LocatorApp`] mutation.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Subcommand};
use storemap_core::{LatLng, StoreDraft, StoreImage};

use crate::output::print_alerts;
use crate::{login, App, Credentials};

/// Sub-commands available under `store`.
#[derive(Debug, Subcommand)]
pub enum StoreCommands {
    /// Create a store
    Create(StoreFields),
    /// Replace a store's details
    Update {
        /// Current name of the store to update
        #[arg(long)]
        original: String,
        #[command(flatten)]
        fields: StoreFields,
    },
    /// Move a store to new coordinates
    Move {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Delete a store
    Delete {
        #[arg(long)]
        name: String,
    },
}

/// Form fields. Coordinates stay text so validation reports bad input.
#[derive(Debug, Args)]
pub struct StoreFields {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long = "hours", default_value = "")]
    pub open_hours: String,
    #[arg(long, default_value = "")]
    pub district: String,
    #[arg(long, allow_hyphen_values = true)]
    pub lat: String,
    #[arg(long, allow_hyphen_values = true)]
    pub lng: String,
    /// JPEG or PNG storefront photo
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl StoreFields {
    async fn into_draft(self) -> anyhow::Result<StoreDraft> {
        let image = match &self.image {
            Some(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("reading image {}", path.display()))?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Some(StoreImage::from_file_name(&file_name, bytes)?)
            }
            None => None,
        };
        Ok(StoreDraft {
            name: self.name,
            address: self.address,
            phone: self.phone,
            open_hours: self.open_hours,
            district: self.district,
            latitude: self.lat,
            longitude: self.lng,
            image,
        })
    }
}

/// # Errors
///
/// Returns an error if login fails, the input is invalid, or the server
/// rejects the change.
pub(crate) async fn run_store_command(
    app: &App,
    credentials: Option<&Credentials>,
    command: StoreCommands,
) -> anyhow::Result<()> {
    login(app, credentials).await?;
    print_alerts(app).await;

    let result = match command {
        StoreCommands::Create(fields) => app.create_store(fields.into_draft().await?).await,
        StoreCommands::Update { original, fields } => {
            let draft = fields.into_draft().await?;
            app.update_store(&original, draft).await
        }
        StoreCommands::Move { name, lat, lng } => {
            app.toggle_edit_mode().await?;
            if !app.on_marker_dragged(&name, LatLng::new(lat, lng)).await {
                anyhow::bail!("store '{name}' not found");
            }
            app.save_position(&name).await
        }
        StoreCommands::Delete { name } => app.delete_store(&name).await,
    };

    print_alerts(app).await;
    result.map_err(|e| anyhow::anyhow!(e.user_message()))?;
    Ok(())
}
