//! Site Tracker CLI - Import and data management tools.
//!
//! # Usage
//!
//! ```bash
//! # Merge a spreadsheet export into the tracker
//! st-cli import commandes.csv
//!
//! # Create a user
//! st-cli users create -n "Jean Dupont" -e jean@chantier.fr -r Editor -p
//!
//! # Record a door order and mark it sent
//! st-cli orders add -c <customer> -s <site> -t doors -n P-001 -u <user>
//! st-cli orders mark-sent -c <customer> -s <site> -o <order>
//! ```
//!
//! # Commands
//!
//! - `import` - Merge a CSV export
//! - `users` - List, create and delete users
//! - `customers` / `sites` - Manage customers and their construction sites
//! - `orders` - Add, mark sent and delete part orders
//! - `options` - List and create special options
//! - `files` - Attach and detach files on sites and options
//!
//! Data lives under `SITE_TRACKER_DATA_DIR` (default `./data`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use site_tracker_core::{CustomerId, FileId, OrderId, PartType, SiteId, UserId};

mod commands;

const DEFAULT_LOG_FILTER: &str = "site_tracker=info,st_cli=info";

#[derive(Parser)]
#[command(name = "st-cli")]
#[command(author, version, about = "Site Tracker CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a CSV export into the tracker
    Import {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage customers
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Manage construction sites
    Sites {
        #[command(subcommand)]
        action: SiteAction,
    },
    /// Manage part orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage special options
    Options {
        #[command(subcommand)]
        action: OptionAction,
    },
    /// Manage file attachments
    Files {
        #[command(subcommand)]
        action: FileAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,
    /// Create a user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Role (`Admin`, `Editor`, `Viewer`)
        #[arg(short, long, default_value = "Viewer")]
        role: String,

        /// Read a password from `SITE_TRACKER_USER_PASSWORD`
        #[arg(short, long)]
        password: bool,
    },
    /// Delete a user
    Delete {
        #[arg(long)]
        id: UserId,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// List customers with their sites
    List,
    /// Create a customer
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Delete a customer, its sites and their attachments
    Delete {
        #[arg(long)]
        id: CustomerId,
    },
}

#[derive(Subcommand)]
enum SiteAction {
    /// Create a site under a customer
    Create {
        #[arg(short, long)]
        customer: CustomerId,

        #[arg(short, long)]
        name: String,

        /// General information (address, access...)
        #[arg(long, default_value = "")]
        info: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Add an order to a site
    Add {
        #[arg(short, long)]
        customer: CustomerId,

        #[arg(short, long)]
        site: SiteId,

        /// Part type (`frames`/`huisseries`, `doors`/`portes`)
        #[arg(short = 't', long = "part")]
        part_type: PartType,

        /// Part number, unique per site and part type
        #[arg(short, long)]
        number: String,

        /// Assigned user
        #[arg(short, long)]
        user: UserId,

        /// Already sent to the supplier
        #[arg(long)]
        sent: bool,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Mark an order as sent
    MarkSent {
        #[arg(short, long)]
        customer: CustomerId,

        #[arg(short, long)]
        site: SiteId,

        #[arg(short, long)]
        order: OrderId,
    },
    /// Delete an order
    Delete {
        #[arg(short, long)]
        customer: CustomerId,

        #[arg(short, long)]
        site: SiteId,

        #[arg(short, long)]
        order: OrderId,
    },
}

#[derive(Subcommand)]
enum OptionAction {
    /// List special options
    List,
    /// Create a special option
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(long, default_value = "")]
        details: String,
    },
}

#[derive(Subcommand)]
enum FileAction {
    /// Attach a file to a site or a special option
    Attach {
        /// File to upload
        path: PathBuf,

        #[command(flatten)]
        target: commands::files::Target,
    },
    /// Detach a file and delete its payload
    Detach {
        #[arg(long)]
        file: FileId,

        #[command(flatten)]
        target: commands::files::Target,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Import { file } => commands::import::run(&file).await?,
        Commands::Users { action } => match action {
            UserAction::List => commands::users::list()?,
            UserAction::Create {
                name,
                email,
                role,
                password,
            } => commands::users::create(&name, &email, &role, password)?,
            UserAction::Delete { id } => commands::users::delete(id)?,
        },
        Commands::Customers { action } => match action {
            CustomerAction::List => commands::customers::list()?,
            CustomerAction::Create { name, notes } => commands::customers::create(&name, &notes)?,
            CustomerAction::Delete { id } => commands::customers::delete(id)?,
        },
        Commands::Sites { action } => match action {
            SiteAction::Create {
                customer,
                name,
                info,
            } => commands::customers::create_site(customer, &name, &info)?,
        },
        Commands::Orders { action } => match action {
            OrderAction::Add {
                customer,
                site,
                part_type,
                number,
                user,
                sent,
                notes,
            } => {
                let order = commands::orders::NewOrderArgs {
                    part_type,
                    number,
                    user,
                    sent,
                    notes,
                };
                commands::orders::add(customer, site, order)?;
            }
            OrderAction::MarkSent {
                customer,
                site,
                order,
            } => commands::orders::mark_sent(customer, site, order)?,
            OrderAction::Delete {
                customer,
                site,
                order,
            } => commands::orders::delete(customer, site, order)?,
        },
        Commands::Options { action } => match action {
            OptionAction::List => commands::options::list()?,
            OptionAction::Create { name, details } => commands::options::create(&name, &details)?,
        },
        Commands::Files { action } => match action {
            FileAction::Attach { path, target } => commands::files::attach(&path, &target).await?,
            FileAction::Detach { file, target } => commands::files::detach(file, &target)?,
        },
    }
    Ok(())
}
