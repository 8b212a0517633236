use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use storefront::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List products with their prices
    Products {
        /// Show prices converted to this currency code
        #[arg(long)]
        currency: Option<String>,
    },
    /// List currencies supported by the rates service
    Currencies,
    /// Show live exchange rates for currency codes
    Rates {
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Build a cart and show its total
    Cart {
        /// Product name to add (repeatable)
        #[arg(short, long = "add")]
        add: Vec<String>,
        /// 1-based line position to remove after adding (repeatable)
        #[arg(short, long = "remove")]
        remove: Vec<usize>,
        /// Show prices converted to this currency code
        #[arg(long)]
        currency: Option<String>,
    },
}

impl From<Commands> for storefront::AppCommand {
    fn from(cmd: Commands) -> storefront::AppCommand {
        match cmd {
            Commands::Products { currency } => storefront::AppCommand::Products { currency },
            Commands::Currencies => storefront::AppCommand::Currencies,
            Commands::Rates { codes } => storefront::AppCommand::Rates { codes },
            Commands::Cart {
                add,
                remove,
                currency,
            } => storefront::AppCommand::Cart {
                add,
                remove,
                currency,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => storefront::cli::setup::setup_at_path(path),
            None => storefront::cli::setup::setup(),
        },
        Some(cmd) => storefront::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
