mod config;
mod error;
mod store;

#[cfg(feature = "dashboard")]
mod dashboard;

use clap::{Parser, Subcommand};

use givd_core::{Category, StockDraft, StockItem, StockSyncController};
use givd_supabase::SupabaseClient;

use crate::config::{load_credentials, resolve_store_type};
use crate::error::GivdError;
use crate::store::{AnyStore, StoreType};

#[derive(Parser)]
#[command(name = "givd")]
#[command(about = "Givd household stock tools", long_about = None)]
struct Cli {
    /// Store backend: memory or supabase
    #[arg(long, global = true)]
    store_type: Option<StoreType>,

    /// Supabase project URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Supabase anon key
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[cfg(feature = "dashboard")]
    /// Open the interactive demo dashboard
    Dashboard,

    /// Fetch and print the stock list
    List,

    /// Add a product to the stock list
    Add {
        name: String,

        /// Category: food, household or hygiene
        #[arg(short, long, default_value = "food")]
        category: Category,

        #[arg(short, long, default_value = "1")]
        quantity: String,

        #[arg(short, long, default_value = "unit")]
        unit: String,

        #[arg(short, long, default_value = "2")]
        threshold: String,
    },

    /// Email a magic sign-in link
    Login { email: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store_type = resolve_store_type(cli.store_type);

    match cli.command {
        #[cfg(feature = "dashboard")]
        Command::Dashboard => {
            let store = AnyStore::open(store_type, cli.url, cli.key)?;
            let controller = StockSyncController::new(store);
            dashboard::run(controller).await?;
        }

        Command::List => {
            let store = AnyStore::open(store_type, cli.url, cli.key)?;
            let mut controller = StockSyncController::new(store);
            controller.refresh().await;
            for item in controller.items() {
                print_row(item);
            }
        }

        Command::Add {
            name,
            category,
            quantity,
            unit,
            threshold,
        } => {
            let store = AnyStore::open(store_type, cli.url, cli.key)?;
            let mut controller = StockSyncController::new(store);
            let draft = StockDraft {
                name,
                category,
                quantity,
                unit,
                threshold,
            };

            if let Err(error) = controller.submit(&draft).await {
                if let Some(alert) = controller.alert() {
                    eprintln!("{}", alert);
                }
                return Err(GivdError::Store(error).into());
            }
            for item in controller.items() {
                print_row(item);
            }
        }

        Command::Login { email } => {
            let (url, key) = load_credentials(cli.url, cli.key)?;
            let client = SupabaseClient::new(url, key);
            client
                .sign_in_with_otp(&email, None)
                .await
                .map_err(GivdError::Supabase)?;
            println!("Magic link sent to {}", email);
        }
    }

    Ok(())
}

fn print_row(item: &StockItem) {
    println!(
        "{:<8} {}  {} {} (seuil: {})",
        item.status.to_string(),
        item.name,
        item.quantity,
        item.unit,
        item.threshold
    );
}
