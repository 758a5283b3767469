//! Coffee Delivery CLI - Cart and checkout from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add two units of a coffee
//! coffee-cli cart add a1 --name "Expresso Tradicional" --price 9.90 --quantity 2
//!
//! # Show the cart
//! coffee-cli cart list
//!
//! # Change a quantity / remove a line
//! coffee-cli cart update a1 5
//! coffee-cli cart remove a1
//!
//! # Totals, postal code lookup, and order confirmation
//! coffee-cli checkout summary
//! coffee-cli checkout lookup 01001-000
//! coffee-cli checkout confirm --cep 01001000 --number 42 --payment cash
//! ```
//!
//! # Commands
//!
//! - `cart` - Inspect and edit the persisted cart
//! - `checkout` - Order summary, address lookup, and confirmation

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use coffee_delivery_cart::CartConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "coffee-cli")]
#[command(author, version, about = "Coffee Delivery cart and checkout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Review and confirm the order
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// List line items
    List,
    /// Add a product to the cart
    Add {
        /// Product identifier
        id: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Unit price (e.g. 9.90)
        #[arg(short, long)]
        price: String,

        /// Image reference
        #[arg(long, default_value = "")]
        image: String,

        /// Product description
        #[arg(long, default_value = "")]
        description: String,

        /// Catalog tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Units to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product identifier
        id: String,
    },
    /// Change the quantity of a product already in the cart
    Update {
        /// Product identifier
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line item
    Clear,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Show item total, delivery fee, and order total
    Summary,
    /// Resolve a postal code (CEP) to an address
    Lookup {
        /// 8-digit CEP, with or without '-'
        cep: String,
    },
    /// Validate delivery details and place the order
    Confirm {
        /// 8-digit CEP, with or without '-'
        #[arg(long)]
        cep: String,

        /// Street number
        #[arg(long, default_value = "")]
        number: String,

        /// Address complement (apartment, block, ...)
        #[arg(long, default_value = "")]
        complement: String,

        /// Street, if the postal code lookup fails or is wrong
        #[arg(long)]
        street: Option<String>,

        /// Neighborhood (bairro)
        #[arg(long)]
        neighborhood: Option<String>,

        /// City
        #[arg(long)]
        city: Option<String>,

        /// Two-letter state (UF)
        #[arg(long)]
        state: Option<String>,

        /// Payment method (`credit_card`, `debit_card`, `cash`)
        #[arg(long)]
        payment: String,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for the cart if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coffee_delivery_cart=info,coffee_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;

    match cli.command {
        Commands::Cart { action } => {
            let mut cart = commands::open_cart(&config)?;
            match action {
                CartAction::List => commands::cart::list(&cart, &config),
                CartAction::Add {
                    id,
                    name,
                    price,
                    image,
                    description,
                    tags,
                    quantity,
                } => {
                    let product = commands::cart::ProductArgs {
                        id,
                        name,
                        price,
                        image,
                        description,
                        tags,
                    };
                    commands::cart::add(&mut cart, product, quantity)?;
                }
                CartAction::Remove { id } => commands::cart::remove(&mut cart, &id)?,
                CartAction::Update { id, quantity } => {
                    commands::cart::update(&mut cart, &id, quantity)?;
                }
                CartAction::Clear => commands::cart::clear(&mut cart)?,
            }
        }
        Commands::Checkout { action } => match action {
            CheckoutAction::Summary => {
                let cart = commands::open_cart(&config)?;
                commands::checkout::summary(&cart, &config);
            }
            CheckoutAction::Lookup { cep } => commands::checkout::lookup(&config, &cep).await?,
            CheckoutAction::Confirm {
                cep,
                number,
                complement,
                street,
                neighborhood,
                city,
                state,
                payment,
            } => {
                let mut cart = commands::open_cart(&config)?;
                let details = commands::checkout::DeliveryArgs {
                    cep,
                    number,
                    complement,
                    street,
                    neighborhood,
                    city,
                    state,
                    payment,
                };
                commands::checkout::confirm(&mut cart, &config, details).await?;
            }
        },
    }
    Ok(())
}
