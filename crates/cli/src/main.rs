//! Lavender CLI - storefront and admin screens from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (signs in on success)
//! lavender register -u ana -e ana@example.com -p 's3cret'
//!
//! # Browse the catalog and add two mugs to the cart
//! lavender catalog list --search mug
//! lavender catalog add MUG-01 --qty 2
//!
//! # Review the cart and place the order
//! lavender cart show
//! lavender cart checkout --shipping "1 Main St" --billing "1 Main St"
//!
//! # Admin screens (requires the Admin role)
//! lavender admin products --status inactive
//! lavender admin dashboard
//! ```
//!
//! # Environment Variables
//!
//! - `LAVENDER_API_BASE_URL` - Store REST API base URL (required)
//! - `LAVENDER_STATE_DIR` - Where the token and cart are kept
//! - `RUST_LOG` - Log filter; logs go to stderr, views to stdout

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use lavender_core::ProductStatusFilter;
use lavender_storefront::config::StorefrontConfig;
use lavender_storefront::error::Result;
use lavender_storefront::state::AppState;
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_FILTER: &str = "lavender_cli=info,lavender_storefront=info,lavender_admin=info";

#[derive(Parser)]
#[command(name = "lavender")]
#[command(author, version, about = "Lavender storefront client")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with username and password
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Sign out and clear all local state, including the cart
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// View and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// List orders
    Orders {
        #[arg(short, long)]
        search: Option<String>,

        /// Status label (`Pending`, `Shipped`, ...) or `all`
        #[arg(long, default_value = "all")]
        status: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Admin screens
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List enabled products
    List {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Add units of a product to the cart
    Add {
        /// Product SKU
        sku: String,

        #[arg(short, long, default_value_t = 1)]
        qty: u32,

        /// Search used to find the product (defaults to the SKU)
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Raise a line's quantity by one
    Inc { product_id: String },
    /// Lower a line's quantity by one (never below one)
    Dec { product_id: String },
    /// Remove a line
    Remove { product_id: String },
    /// Place an order for the cart
    Checkout {
        #[arg(long)]
        shipping: String,

        #[arg(long)]
        billing: String,

        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List all products, including inactive ones
    Products {
        #[arg(short, long)]
        search: Option<String>,

        /// `all`, `active` or `inactive`
        #[arg(long, default_value = "all")]
        status: ProductStatusFilter,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show product and order totals
    Dashboard,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    if let Err(e) = run(cli.command).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config)?;

    match command {
        Commands::Login { username, password } => {
            commands::auth::login(&state, username, password).await?;
        }
        Commands::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let confirm = confirm_password.unwrap_or_else(|| password.clone());
            commands::auth::register(&state, username, email, password, confirm).await?;
        }
        Commands::Logout => commands::auth::logout(&state)?,
        Commands::Whoami => commands::auth::whoami(&state)?,
        Commands::Catalog { action } => match action {
            CatalogAction::List { search, page } => {
                commands::catalog::list(&state, search, page).await?;
            }
            CatalogAction::Add {
                sku,
                qty,
                search,
                page,
            } => commands::catalog::add(&state, sku, qty, search, page).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state)?,
            CartAction::Inc { product_id } => commands::cart::adjust(&state, &product_id, 1)?,
            CartAction::Dec { product_id } => commands::cart::adjust(&state, &product_id, -1)?,
            CartAction::Remove { product_id } => commands::cart::remove(&state, &product_id)?,
            CartAction::Checkout {
                shipping,
                billing,
                notes,
            } => commands::cart::checkout(&state, shipping, billing, notes).await?,
        },
        Commands::Orders {
            search,
            status,
            page,
            page_size,
        } => commands::orders::list(&state, search, &status, page, page_size).await?,
        Commands::Admin { action } => match action {
            AdminAction::Products {
                search,
                status,
                page,
            } => commands::admin::products(&state, search, status, page).await?,
            AdminAction::Dashboard => commands::admin::dashboard(&state).await?,
        },
    }
    Ok(())
}
