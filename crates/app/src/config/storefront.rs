//! Storefront Config

use std::path::PathBuf;

use clap::Args;
use freshharvest::client::{TrackingEndpoint, TrackingError};

/// Where the storefront tracks to and keeps its state.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// Tracking endpoint URL; tracking is disabled when unset or empty
    #[arg(long, env = "FRESHHARVEST_API_ENDPOINT", global = true)]
    pub api_endpoint: Option<String>,

    /// File holding the visitor id between runs
    #[arg(
        long,
        env = "FRESHHARVEST_USER_ID_FILE",
        default_value = ".freshharvest-user-id",
        global = true
    )]
    pub user_id_file: PathBuf,

    /// Catalog YAML file; the bundled catalog is used when unset
    #[arg(long, env = "FRESHHARVEST_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,
}

impl StorefrontConfig {
    /// The configured endpoint, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is set but is not an http(s) URL.
    pub fn endpoint(&self) -> Result<Option<TrackingEndpoint>, TrackingError> {
        self.api_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::parse::<TrackingEndpoint>)
            .transpose()
    }
}
