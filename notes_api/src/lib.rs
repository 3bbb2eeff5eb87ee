use ctrlc::set_handler;
use diesel::{Connection, PgConnection};
use diesel_async::{AsyncPgConnection, pooled_connection::AsyncDieselConnectionManager};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing_subscriber::EnvFilter;

pub mod models;
pub mod routes;
pub mod schema;
mod utils;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Runtime configuration assembled from the process environment.
///
/// `dotenvy::var` also reads a `.env` file when one is present, so local
/// setups can keep database credentials out of the shell environment.
pub struct NotesConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: String,
    /// Postgres connection URL composed from the `DB_*` variables.
    pub database_url: String,
    /// The single origin allowed to make cross-origin requests.
    pub allowed_origin: String,
}

impl NotesConfig {
    pub fn from_env() -> Result<Self, dotenvy::Error> {
        let username = dotenvy::var("DB_USERNAME")?;
        let password = dotenvy::var("DB_PASSWORD")?;
        let host = dotenvy::var("DB_HOST")?;
        let port = dotenvy::var("DB_PORT")?;
        let database = dotenvy::var("DB_DATABASE")?;
        let database_url = format!("postgres://{username}:{password}@{host}:{port}/{database}");
        let bind_addr = dotenvy::var("BIND_ADDR").unwrap_or_else(|_| utils::default_bind_addr());
        let allowed_origin =
            dotenvy::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| utils::default_allowed_origin());
        Ok(Self {
            bind_addr,
            database_url,
            allowed_origin,
        })
    }
}

pub async fn init() -> Result<(NotesConfig, utils::Pool), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    // All configuration comes from environment variables.
    let config = NotesConfig::from_env()?;

    // Get a connection and run migrations at startup so the notes table
    // always matches the current model shape. Failing here is fatal.
    let mut conn = PgConnection::establish(&config.database_url)?;
    conn.run_pending_migrations(MIGRATIONS)
        .expect("failed to run migrations");

    // Shared state is just the pool used for interacting with the database.
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
    let pool = bb8::Pool::builder().build(manager).await?;
    Ok((config, pool))
}
