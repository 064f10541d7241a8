//! CLI command implementations.

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod contact;
pub mod open;
pub mod profile;

use aurum_commerce::checkout::OrderStatus;
use aurum_commerce::customer::Role;
use aurum_commerce::search::SortOption;
use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: Option<ProductsCommand>,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List the catalog.
    List(ListArgs),
    /// Show a product with related pieces.
    Show {
        /// Product ID.
        id: String,
    },
}

/// Filters shared by product listings.
#[derive(Args, Default)]
pub struct ListArgs {
    /// Only this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Only this collection.
    #[arg(long)]
    pub collection: Option<String>,

    /// featured, price_asc, price_desc, name_asc or newest.
    #[arg(short, long, default_value = "featured")]
    pub sort: SortOption,

    /// Minimum price (CLP).
    #[arg(long)]
    pub min: Option<i64>,

    /// Maximum price (CLP).
    #[arg(long)]
    pub max: Option<i64>,

    /// Hide sold out pieces.
    #[arg(long)]
    pub available: bool,

    #[arg(short, long, default_value = "1")]
    pub page: usize,
}

/// Arguments for the categories and collections commands.
#[derive(Args)]
pub struct TaxonomyArgs {
    /// Show the products of this category or collection.
    pub id: Option<String>,

    #[arg(short, long, default_value = "1")]
    pub page: usize,
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Text to search for. Prompts interactively when omitted.
    pub text: Vec<String>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart with totals.
    Show,
    /// Add a product.
    Add {
        id: String,
        #[arg(short, long, default_value = "1")]
        quantity: i64,
    },
    /// Take one unit out.
    Decrease { id: String },
    /// Set the quantity of a line (0 removes it).
    Set { id: String, quantity: i64 },
    /// Remove a line.
    Remove { id: String },
    /// Empty the cart.
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: Option<String>,
}

/// Arguments for the profile command.
#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: Option<ProfileCommand>,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show account details.
    Show,
    /// Change name or phone.
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Purchase history.
    Orders,
    /// Saved addresses.
    Addresses {
        #[command(subcommand)]
        command: Option<AddressCommand>,
    },
}

#[derive(Subcommand)]
pub enum AddressCommand {
    List,
    /// Add an address interactively.
    Add {
        /// Use it by default at checkout.
        #[arg(long)]
        default: bool,
    },
    /// Mark an address as the default.
    Default { id: String },
    Delete { id: String },
}

/// Arguments for the admin command.
#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Catalog and inbox figures.
    Dashboard,
    /// Manage products.
    Products {
        #[command(subcommand)]
        command: Option<AdminProductCommand>,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: Option<TaxonomyCommand>,
    },
    /// Manage collections.
    Collections {
        #[command(subcommand)]
        command: Option<TaxonomyCommand>,
    },
    /// Manage customer accounts.
    Users {
        #[command(subcommand)]
        command: Option<UserCommand>,
    },
    /// Contact inbox.
    Messages {
        #[command(subcommand)]
        command: Option<MessageCommand>,
    },
    /// Orders placed through the API.
    Orders {
        #[command(subcommand)]
        command: Option<OrderCommand>,
    },
}

#[derive(Subcommand)]
pub enum AdminProductCommand {
    /// All products, inactive included.
    List,
    Create,
    Edit { id: String },
    /// Show or hide a product in the storefront.
    Toggle { id: String },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TaxonomyCommand {
    List,
    Create,
    Edit { id: String },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    List,
    /// Change the role of an account (customer or admin).
    Role { id: String, role: Role },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum MessageCommand {
    List,
    /// Read a message and mark it as read.
    Read { id: String },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum OrderCommand {
    List {
        /// pending, paid, shipped, delivered or cancelled.
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    Show { id: String },
    /// Change the status of an order.
    Status { id: String, status: OrderStatus },
}

/// Arguments for the open command.
#[derive(Args)]
pub struct OpenArgs {
    /// Page path, e.g. `/productos/3` or `/buscar?q=plata`.
    #[arg(default_value = "/")]
    pub path: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a value in the config file.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
