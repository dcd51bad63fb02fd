//! FreshHarvest storefront application: configuration, logging, visitor id
//! persistence and terminal rendering for the CLI.

pub mod config;
pub mod context;
pub mod logging;
pub mod render;
pub mod store;
