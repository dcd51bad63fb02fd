use clap::{Parser, Subcommand};
use freshharvest_app::{
    config::{LoggingConfig, StorefrontConfig},
    context::AppContext,
};

mod buy;
mod page_view;
mod products;
mod user_id;

#[derive(Debug, Parser)]
#[command(name = "freshharvest-app", about = "FreshHarvest storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    storefront: StorefrontConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the storefront and list products in display order
    Products,

    /// Buy a product
    Buy(buy::BuyArgs),

    /// Record a page view
    PageView,

    /// Print the visitor id, creating it on first use
    UserId,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.storefront)
            .map_err(|error| format!("{error}: {}", source_message(&error)))?;

        match self.command {
            Commands::Products => products::run(&context).await,
            Commands::Buy(args) => buy::run(&context, args).await,
            Commands::PageView => page_view::run(&context).await,
            Commands::UserId => {
                user_id::run(&context);
                Ok(())
            }
        }
    }
}

fn source_message(error: &dyn std::error::Error) -> String {
    error
        .source()
        .map_or_else(String::new, std::string::ToString::to_string)
}
