//! App Context

use freshharvest::{
    client::{HttpTrackingClient, TrackingError},
    products::{Catalog, CatalogError},
    storefront::Storefront,
};
use thiserror::Error;
use tracing::info;

use crate::{config::StorefrontConfig, store::FileUserIdStore};

/// Storefront as wired up by the CLI; `None` means tracking is disabled.
pub type AppStorefront = Storefront<Option<HttpTrackingClient>, FileUserIdStore>;

/// Application startup errors
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The catalog file could not be read or parsed.
    #[error("failed to load catalog")]
    Catalog(#[source] CatalogError),

    /// The endpoint is not an http(s) URL.
    #[error("invalid tracking endpoint configuration")]
    Endpoint(#[source] TrackingError),
}

/// Shared state for CLI commands
#[derive(Debug)]
pub struct AppContext {
    /// Products in default order
    pub catalog: Catalog,

    /// Storefront flow wired to the configured endpoint
    pub storefront: AppStorefront,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be loaded or the endpoint is
    /// not a valid URL.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, AppInitError> {
        let catalog = match &config.catalog {
            Some(path) => Catalog::from_path(path),
            None => Catalog::bundled(),
        }
        .map_err(AppInitError::Catalog)?;

        let client = config
            .endpoint()
            .map_err(AppInitError::Endpoint)?
            .map(HttpTrackingClient::new);

        match &client {
            Some(client) => info!(endpoint = %client.endpoint(), "tracking enabled"),
            None => info!("tracking endpoint not configured, tracking disabled"),
        }

        Ok(Self {
            catalog,
            storefront: Storefront::new(client, FileUserIdStore::new(&config.user_id_file)),
        })
    }
}
