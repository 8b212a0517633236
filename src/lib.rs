pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Products {
        currency: Option<String>,
    },
    Currencies,
    Rates {
        codes: Vec<String>,
    },
    Cart {
        add: Vec<String>,
        remove: Vec<usize>,
        currency: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Storefront starting...");

    let config = match config_path {
        Some(path) => crate::core::config::AppConfig::load_from_path(path)?,
        None => crate::core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Products { currency } => cli::products::run(&config, currency.as_deref()).await,
        AppCommand::Currencies => cli::currencies::run(&config).await,
        AppCommand::Rates { codes } => cli::currencies::run_rates(&config, &codes).await,
        AppCommand::Cart {
            add,
            remove,
            currency,
        } => cli::cart::run(&config, &add, &remove, currency.as_deref()).await,
    }
}
