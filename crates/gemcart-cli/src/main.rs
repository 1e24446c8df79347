mod catalog;
mod storefront;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::FilterArgs;

#[derive(Debug, Parser)]
#[command(name = "gemcart-cli")]
#[command(about = "Gemcart storefront operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract gemstone attributes from product copy
    Parse {
        /// Description text; read from stdin when omitted
        text: Option<String>,
        /// Product title, searched first for the shape
        #[arg(long, default_value = "")]
        title: String,
        /// Treat the description as HTML
        #[arg(long)]
        html: bool,
    },
    /// Filter and sort a JSON array of catalog products
    Filter {
        /// Path to a product dump (as written by `fetch-collection`)
        products: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Download a collection's products from the Storefront API as JSON
    FetchCollection {
        /// Collection handle (e.g., lab-diamonds)
        handle: String,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a cart by id
    ShowCart {
        /// Cart GID (e.g., gid://shopify/Cart/...)
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Parse { text, title, html }) => {
            catalog::run_parse(text.as_deref(), &title, html)?;
        }
        Some(Commands::Filter { products, filters }) => {
            catalog::run_filter(&products, &filters)?;
        }
        Some(Commands::FetchCollection { handle, out }) => {
            let config = gemcart_core::load_app_config()?;
            storefront::run_fetch_collection(&config, &handle, out.as_deref()).await?;
        }
        Some(Commands::ShowCart { id }) => {
            let config = gemcart_core::load_app_config()?;
            storefront::run_show_cart(&config, &id).await?;
        }
        None => println!("gemcart-cli: run with --help for available commands"),
    }

    Ok(())
}
