//! Aurum CLI - storefront and back-office for the Aurum jewelry shop.
//!
//! Commands:
//! - `aurum products`, `categories`, `collections`, `search` - browse the catalog
//! - `aurum cart` - manage the cart (works signed out too)
//! - `aurum checkout` - address, payment and summary
//! - `aurum login`, `register`, `logout`, `whoami` - account session
//! - `aurum profile` - profile, orders and saved addresses
//! - `aurum contact` - send a message to the shop
//! - `aurum admin` - back-office
//! - `aurum open` - resolve a page path with its access guard
//! - `aurum config` - manage configuration

mod commands;
mod context;
mod output;
mod prompts;

use anyhow::Result;
use aurum_storefront::logging::{init_logging, LogFormat};
use aurum_storefront::StorefrontError;
use clap::{Parser, Subcommand};

use commands::{
    AdminArgs, CartArgs, ConfigArgs, LoginArgs, OpenArgs, ProductsArgs, ProfileArgs, SearchArgs,
    TaxonomyArgs,
};

/// Aurum - jewelry storefront from the terminal
#[derive(Parser)]
#[command(name = "aurum")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products
    Products(ProductsArgs),

    /// List categories or show one
    Categories(TaxonomyArgs),

    /// List collections or show one
    Collections(TaxonomyArgs),

    /// Search the catalog
    Search(SearchArgs),

    /// Shopping cart
    Cart(CartArgs),

    /// Buy what is in the cart
    Checkout,

    /// Sign in
    Login(LoginArgs),

    /// Create an account
    Register,

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Account details, orders and addresses
    Profile(ProfileArgs),

    /// Send a message to the shop
    Contact,

    /// Back-office (administrators only)
    Admin(AdminArgs),

    /// Resolve a storefront page path
    Open(OpenArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    init_logging(cli.verbose, format);

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };
    ctx.output.debug(&format!("API: {}", ctx.config.api.base_url));

    let result = match cli.command {
        Commands::Products(args) => commands::catalog::products(args, &ctx).await,
        Commands::Categories(args) => commands::catalog::categories(args, &ctx).await,
        Commands::Collections(args) => commands::catalog::collections(args, &ctx).await,
        Commands::Search(args) => commands::catalog::search(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout => commands::checkout::run(&ctx).await,
        Commands::Login(args) => commands::account::login(args, &ctx).await,
        Commands::Register => commands::account::register(&ctx).await,
        Commands::Logout => commands::account::logout(&ctx).await,
        Commands::Whoami => commands::account::whoami(&ctx).await,
        Commands::Profile(args) => commands::profile::run(args, &ctx).await,
        Commands::Contact => commands::contact::run(&ctx).await,
        Commands::Admin(args) => commands::admin::run(args, &ctx).await,
        Commands::Open(args) => commands::open::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        if let Some(hint) = hint_for(&e) {
            ctx.output.info(hint);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Follow-up suggestion for errors the user can act on.
fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    let err = err.downcast_ref::<StorefrontError>()?;
    if err.requires_login() {
        return Some("Inicia sesión con: aurum login");
    }
    match err {
        StorefrontError::Api(api) if api.is_unavailable() => {
            Some("La tienda no responde. Revisa api.base_url con: aurum config show")
        }
        _ => None,
    }
}
