//! Application configuration module

pub mod observability;
pub mod storefront;

pub use observability::{LogFormat, LoggingConfig};
pub use storefront::StorefrontConfig;
