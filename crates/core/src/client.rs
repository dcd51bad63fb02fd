//! Tracking endpoint client.

use std::{fmt, str::FromStr};

use reqwest::{Client, Response, Url, header::CONTENT_TYPE};
use thiserror::Error;
use tracing::{debug, info};

use crate::tracking::{PageViewEvent, ProductsResponse, PurchaseEvent, TrackingEvent};

/// The single URL every tracking call goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingEndpoint(Url);

impl TrackingEndpoint {
    /// Underlying URL.
    pub fn url(&self) -> &Url {
        &self.0
    }

    fn products_url(&self) -> Url {
        let mut url = self.0.clone();

        url.query_pairs_mut().append_pair("action", "getProducts");

        url
    }
}

impl FromStr for TrackingEndpoint {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s.trim())
            .map_err(|error| TrackingError::InvalidEndpoint(format!("{s}: {error}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TrackingError::InvalidEndpoint(format!(
                "{s}: expected an http or https URL"
            )));
        }

        Ok(Self(url))
    }
}

impl fmt::Display for TrackingEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Errors that can occur when talking to the tracking endpoint.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// No endpoint has been configured.
    #[error("tracking endpoint is not configured")]
    NotConfigured,

    /// The configured endpoint is not a usable URL.
    #[error("invalid tracking endpoint {0}")]
    InvalidEndpoint(String),

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("endpoint responded with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,

        /// Response body, possibly empty
        body: String,
    },
}

/// Calls the storefront makes against the tracking endpoint.
pub trait TrackingClient {
    /// Record a purchase.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    async fn track_purchase(&self, event: PurchaseEvent) -> Result<(), TrackingError>;

    /// Record a page view.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    async fn track_page_view(&self, event: PageViewEvent) -> Result<(), TrackingError>;

    /// Fetch per-product purchase totals.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx response or an
    /// unexpected body.
    async fn fetch_popularity(&self) -> Result<ProductsResponse, TrackingError>;
}

/// `None` stands for an unconfigured endpoint.
impl<C: TrackingClient> TrackingClient for Option<C> {
    async fn track_purchase(&self, event: PurchaseEvent) -> Result<(), TrackingError> {
        match self {
            Some(client) => client.track_purchase(event).await,
            None => Err(TrackingError::NotConfigured),
        }
    }

    async fn track_page_view(&self, event: PageViewEvent) -> Result<(), TrackingError> {
        match self {
            Some(client) => client.track_page_view(event).await,
            None => Err(TrackingError::NotConfigured),
        }
    }

    async fn fetch_popularity(&self) -> Result<ProductsResponse, TrackingError> {
        match self {
            Some(client) => client.fetch_popularity().await,
            None => Err(TrackingError::NotConfigured),
        }
    }
}

/// JSON-over-HTTP client for the tracking endpoint.
#[derive(Debug, Clone)]
pub struct HttpTrackingClient {
    endpoint: TrackingEndpoint,
    http: Client,
}

impl HttpTrackingClient {
    /// Create a new client for `endpoint`.
    #[must_use]
    pub fn new(endpoint: TrackingEndpoint) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    /// Create a client that reuses an existing `reqwest` client.
    #[must_use]
    pub fn with_client(endpoint: TrackingEndpoint, http: Client) -> Self {
        Self { endpoint, http }
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &TrackingEndpoint {
        &self.endpoint
    }

    async fn post(&self, event: &TrackingEvent) -> Result<Response, TrackingError> {
        debug!(endpoint = %self.endpoint, ?event, "posting tracking event");

        let response = self
            .http
            .post(self.endpoint.url().clone())
            .json(event)
            .send()
            .await?;

        ensure_success(response).await
    }
}

impl TrackingClient for HttpTrackingClient {
    async fn track_purchase(&self, event: PurchaseEvent) -> Result<(), TrackingError> {
        let response = self.post(&TrackingEvent::Purchase(event)).await?;
        let result: serde_json::Value = response.json().await?;

        info!(%result, "purchase tracked");

        Ok(())
    }

    async fn track_page_view(&self, event: PageViewEvent) -> Result<(), TrackingError> {
        self.post(&TrackingEvent::PageView(event)).await?;

        info!("page view tracked");

        Ok(())
    }

    async fn fetch_popularity(&self) -> Result<ProductsResponse, TrackingError> {
        debug!(endpoint = %self.endpoint, "loading product popularity");

        let response = self
            .http
            .get(self.endpoint.products_url())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let products: ProductsResponse = ensure_success(response).await?.json().await?;

        debug!(count = products.products.len(), "product popularity loaded");

        Ok(products)
    }
}

async fn ensure_success(response: Response) -> Result<Response, TrackingError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(TrackingError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn endpoint_parses_https_urls() -> TestResult {
        let endpoint: TrackingEndpoint =
            "https://abc.execute-api.ap-southeast-2.amazonaws.com/prod/products".parse()?;

        assert_eq!(endpoint.url().path(), "/prod/products");

        Ok(())
    }

    #[test]
    fn endpoint_rejects_garbage() {
        let result = "not a url".parse::<TrackingEndpoint>();

        assert!(matches!(result, Err(TrackingError::InvalidEndpoint(_))));
    }

    #[test]
    fn endpoint_rejects_non_http_schemes() {
        let result = "ftp://example.com/products".parse::<TrackingEndpoint>();

        assert!(matches!(result, Err(TrackingError::InvalidEndpoint(_))));
    }

    #[test]
    fn products_url_appends_action_query() -> TestResult {
        let endpoint: TrackingEndpoint = "https://example.com/prod/products".parse()?;

        assert_eq!(
            endpoint.products_url().as_str(),
            "https://example.com/prod/products?action=getProducts"
        );

        Ok(())
    }

    #[test]
    fn products_url_keeps_existing_query() -> TestResult {
        let endpoint: TrackingEndpoint = "https://example.com/products?stage=prod".parse()?;

        assert_eq!(
            endpoint.products_url().as_str(),
            "https://example.com/products?stage=prod&action=getProducts"
        );

        Ok(())
    }
}
