//! Bazaar CLI - Storefront client for the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and store the bearer token
//! bazaar signin -e shopper@example.com -p 'hunter2'
//!
//! # Open the admin dashboard (redirects when not an admin)
//! bazaar admin
//!
//! # Work with the cart
//! bazaar cart list
//! bazaar cart add 64f1c0ffee
//! bazaar cart remove SKU-001
//!
//! # Browse the catalogue
//! bazaar products show 64f1c0ffee
//! bazaar products related 64f1c0ffee
//! bazaar products recommended
//! ```
//!
//! # Environment Variables
//!
//! - `BAZAAR_API_URL` - Base URL of the storefront REST API (required)
//! - `BAZAAR_DATA_DIR` - Directory for durable storage (default: `.bazaar`)
//! - `BAZAAR_TOKEN_SCOPE` - `durable` or `session`
//! - `BAZAAR_TOKEN` - Bearer token for session scope
//! - `SENTRY_DSN` - Sentry DSN for error tracking (optional)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar_storefront::Storefront;
use bazaar_storefront::config::ClientConfig;

mod commands;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the bearer token
    Signin {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Remove the stored bearer token
    Signout,
    /// Open the admin dashboard
    Admin,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the catalogue
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Recover a forgotten password
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the items in the local cart
    List,
    /// Remove every item with this SKU from the local cart
    Remove {
        /// Item SKU
        sku: String,
    },
    /// Add a product to the account's cart
    Add {
        /// Product identifier
        product_id: String,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// Show one product
    Show {
        /// Product identifier
        id: String,
    },
    /// List products related to a product
    Related {
        /// Product identifier
        id: String,
    },
    /// List recommended products
    Recommended,
}

#[derive(Subcommand)]
enum PasswordAction {
    /// Email a password-reset link
    Forgot {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Set a new password from a reset token
    Reset {
        /// Token from the reset link
        #[arg(short, long)]
        token: String,

        /// New password
        #[arg(short, long)]
        password: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            commands::print_notice(&bazaar_storefront::ClientError::from(e).into_notice());
            return ExitCode::from(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_storefront=info,bazaar_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = match Storefront::new(config) {
        Ok(state) => state,
        Err(e) => {
            commands::print_notice(&e.into_notice());
            return ExitCode::from(2);
        }
    };

    match run(cli, &state).await {
        Ok(code) => code,
        Err(e) => {
            commands::print_notice(&e.into_notice());
            ExitCode::FAILURE
        }
    }
}

/// Run a command. A protected view that redirects exits with [`ExitCode::FAILURE`].
async fn run(cli: Cli, state: &Storefront) -> bazaar_storefront::Result<ExitCode> {
    match cli.command {
        Commands::Signin { email, password } => {
            commands::auth::sign_in(state, &email, password).await?;
        }
        Commands::Signout => commands::auth::sign_out(state)?,
        Commands::Admin => {
            if !commands::admin::dashboard(state) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(state),
            CartAction::Remove { sku } => commands::cart::remove(state, sku)?,
            CartAction::Add { product_id } => commands::cart::add(state, product_id).await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::Show { id } => commands::products::show(state, id).await?,
            ProductsAction::Related { id } => commands::products::related(state, id).await?,
            ProductsAction::Recommended => commands::products::recommended(state).await?,
        },
        Commands::Password { action } => match action {
            PasswordAction::Forgot { email } => {
                commands::password::forgot(state, &email).await?;
            }
            PasswordAction::Reset { token, password } => {
                commands::password::reset(state, token, password).await?;
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_cart_add() {
        let cli = Cli::try_parse_from(["bazaar", "cart", "add", "p-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Add { product_id }
            } if product_id == "p-1"
        ));
    }
}
