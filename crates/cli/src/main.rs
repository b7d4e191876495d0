//! `lightbnb` CLI entry-point.
//!
//! Available sub-commands:
//! - `user`          - look up a user by email or id.
//! - `signup`        - create a user.
//! - `reservations`  - list a guest's reservations.
//! - `search`        - search properties with optional filters.
//! - `add-property`  - insert a property described by a JSON file.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use db::models::{NewProperty, NewUser};
use db::repository::{properties, reservations, users};
use db::{PgStore, PropertyFilters, DEFAULT_LIMIT};

#[derive(Parser)]
#[command(
    name = "lightbnb",
    about = "Query and update the LightBnB property-rental database",
    version
)]
struct Cli {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DatabaseArgs {
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long, env = "LIGHTBNB_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a single user.
    User {
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        email: Option<String>,
        #[arg(long)]
        id: Option<i32>,
    },
    /// Create a user.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List a guest's reservations, earliest first.
    Reservations {
        #[arg(long)]
        guest_id: i32,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Search properties, cheapest first.
    Search {
        /// Case-insensitive substring of the city name.
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        owner_id: Option<i32>,
        /// Minimum nightly price in dollars.
        #[arg(long)]
        min_price: Option<f64>,
        /// Maximum nightly price in dollars.
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        min_rating: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },
    /// Insert a property from a JSON file (nightly price in dollars).
    AddProperty {
        path: std::path::PathBuf,
    },
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let pool = db::pool::create_pool(&cli.database.database_url, cli.database.max_connections)
        .await
        .context("failed to connect to database")?;
    let store = PgStore::new(pool);

    let output = run(&store, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(store: &PgStore, command: Command) -> Result<Value> {
    let output = match command {
        Command::User { email, id } => {
            let user = match (email, id) {
                (Some(email), _) => users::get_user_with_email(store, &email).await?,
                (None, Some(id)) => users::get_user_with_id(store, id).await?,
                (None, None) => bail!("either --email or --id is required"),
            };
            serde_json::to_value(user)?
        }
        Command::Signup { name, email, password } => {
            let user = users::add_user(store, &NewUser { name, email, password }).await?;
            info!(user_id = user.id, "signed up");
            serde_json::to_value(user)?
        }
        Command::Reservations { guest_id, limit } => {
            let rows = reservations::get_all_reservations(store, guest_id, limit).await?;
            debug!(count = rows.len(), "reservations fetched");
            serde_json::to_value(rows)?
        }
        Command::Search { city, owner_id, min_price, max_price, min_rating, limit } => {
            let filters = PropertyFilters {
                city,
                owner_id,
                minimum_price_per_night: min_price,
                maximum_price_per_night: max_price,
                minimum_rating: min_rating,
            };
            let listings = properties::get_all_properties(store, &filters, limit).await?;
            debug!(count = listings.len(), "properties fetched");
            serde_json::to_value(listings)?
        }
        Command::AddProperty { path } => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read file {}", path.display()))?;
            let property: NewProperty = serde_json::from_str(&content)
                .with_context(|| format!("invalid property JSON in {}", path.display()))?;
            let created = properties::add_property(store, &property).await?;
            info!(property_id = created.id, "property added");
            serde_json::to_value(created)?
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_flags_parse_into_filters() {
        let cli = Cli::try_parse_from([
            "lightbnb",
            "--database-url",
            "postgres://localhost/lightbnb",
            "search",
            "--city",
            "Van",
            "--min-rating",
            "4",
            "--limit",
            "5",
        ])
        .unwrap();

        match cli.command {
            Command::Search { city, min_rating, limit, owner_id, .. } => {
                assert_eq!(city.as_deref(), Some("Van"));
                assert_eq!(min_rating, Some(4.0));
                assert_eq!(limit, 5);
                assert_eq!(owner_id, None);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn limit_defaults_to_ten() {
        let cli = Cli::try_parse_from([
            "lightbnb",
            "--database-url",
            "postgres://localhost/lightbnb",
            "reservations",
            "--guest-id",
            "3",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Reservations { guest_id: 3, limit: 10 }));
    }

    #[test]
    fn user_lookup_needs_email_or_id() {
        let result = Cli::try_parse_from([
            "lightbnb",
            "--database-url",
            "postgres://localhost/lightbnb",
            "user",
        ]);
        assert!(result.is_err());
    }
}
