//! # roster: read-only user roster over PostgreSQL
//!
//! `roster` is a small HTTP backend that exposes a table of user records kept in PostgreSQL.
//! It answers three read-only JSON endpoints: a liveness check, a database connectivity check,
//! and a listing of every stored user ordered by ID.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! [SQLx](https://github.com/launchbadge/sqlx) for PostgreSQL access. A single connection pool
//! lives in [`AppState`] and is handed to every handler; there are no globals.
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) holds the route handlers and the JSON shapes they answer with.
//!
//! The **database layer** ([`db`]) uses the repository pattern to keep every statement in one
//! place and maps driver failures onto a small set of stable error categories.
//!
//! The **dashboard** ([`dashboard`]) is the client side: a poller that fetches both data
//! endpoints with bounded retries, driven by the `roster-watch` binary.
//!
//! ### Startup
//!
//! [`Application::new`] performs a strictly ordered bootstrap before anything is served:
//!
//! 1. Build the connection pool and connect
//! 2. Probe the database with a trivial query
//! 3. Create the `users` table if it is missing
//! 4. Insert the baseline users if the table is empty
//!
//! Any failure here is fatal. Schema creation and seeding each run inside a transaction holding
//! a PostgreSQL advisory lock, so several instances booting against one database at once still
//! seed exactly once.
//!
//! ## Quick Start
//!
//! ```no_run
//! use roster::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let app = Application::new(config).await?;
//!
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.ok();
//!     })
//!     .await
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod telemetry;
#[cfg(test)]
mod test_utils;
pub mod types;

use anyhow::Context;
use axum::{Json, Router, http::HeaderValue, routing::get};
use bon::Builder;
pub use config::Config;
use config::CorsOrigin;
use db::{
    errors::DbError,
    handlers::{Repository, System, Users},
    models::users::UserCreateDBRequest,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;

pub use types::UserId;

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Users inserted into an empty table at startup, in insertion order.
pub const BASELINE_USERS: [&str; 4] = ["Jabril", "Platform Engineer", "Go Developer", "Kubernetes Master"];

/// Advisory lock key serializing schema creation and seeding across instances ("ROSTERSE").
const BOOTSTRAP_LOCK_KEY: i64 = 0x524F_5354_4552_5345;

async fn lock_bootstrap(conn: &mut sqlx::PgConnection) -> db::errors::Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(BOOTSTRAP_LOCK_KEY)
        .execute(conn)
        .await?;
    Ok(())
}

/// Create the `users` table if it does not exist.
#[instrument(skip_all, err)]
pub async fn ensure_schema(pool: &PgPool) -> db::errors::Result<()> {
    let mut tx = pool.begin().await?;
    lock_bootstrap(&mut tx).await?;

    System::new(&mut tx).ensure_users_table().await?;

    tx.commit().await?;
    Ok(())
}

/// Insert [`BASELINE_USERS`] if the table is empty.
///
/// Returns how many rows were inserted: 4 on a fresh table, 0 otherwise.
#[instrument(skip_all, err)]
pub async fn seed_database(pool: &PgPool) -> db::errors::Result<usize> {
    let mut tx = pool.begin().await?;
    lock_bootstrap(&mut tx).await?;

    let mut users = Users::new(&mut tx);
    if users.count().await? > 0 {
        debug!("Users table already populated, skipping seed");
        return Ok(0);
    }

    let requests: Vec<UserCreateDBRequest> = BASELINE_USERS.iter().map(|name| UserCreateDBRequest::new(*name)).collect();
    let inserted = users.create_bulk(&requests).await?;

    tx.commit().await?;
    info!(count = inserted.len(), "Sample data inserted");
    Ok(inserted.len())
}

/// Probe the database, ensure the schema and seed it.
pub async fn bootstrap(pool: &PgPool) -> db::errors::Result<()> {
    let mut conn = pool.acquire().await.map_err(DbError::from)?;
    let now = System::new(&mut conn).now().await?;
    drop(conn);
    info!(database_time = %now, "Connected to database");

    ensure_schema(pool).await?;
    seed_database(pool).await?;
    Ok(())
}

/// Build the connection pool and open the first connection.
pub async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let options = config.database.connect_options().context("invalid database settings")?;

    let pool = PgPoolOptions::new()
        .acquire_timeout(config.database.acquire_timeout)
        .connect_with(options)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Build the CORS layer, or `None` when no origins are configured.
fn create_cors_layer(config: &Config) -> anyhow::Result<Option<CorsLayer>> {
    let origins = &config.cors.allowed_origins;
    if origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if origins.contains(&CorsOrigin::Wildcard) {
        AllowOrigin::any()
    } else {
        let mut values = Vec::with_capacity(origins.len());
        for origin in origins {
            if let CorsOrigin::Url(url) = origin {
                // Browsers send the bare origin, never a path or trailing slash
                values.push(url.origin().ascii_serialization().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(values)
    };

    Ok(Some(CorsLayer::new().allow_origin(allow_origin).allow_methods([axum::http::Method::GET])))
}

/// Build the application router with all endpoints and middleware.
///
/// # Errors
///
/// Returns an error if a configured CORS origin is not a valid header value.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = create_cors_layer(&state.config)?;

    let api_routes = Router::new()
        .route("/test-db", get(api::handlers::health::test_db))
        .route("/users", get(api::handlers::users::list_users));

    let mut router = Router::new()
        .route("/health", get(api::handlers::health::health))
        .route("/api-docs/openapi.json", get(|| async { Json(openapi::ApiDoc::openapi()) }))
        .nest("/api", api_routes)
        .with_state(state);

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// A bootstrapped server, ready to bind and serve.
///
/// ```text
/// 1. Create: [`Application::new`] connects, probes, ensures the schema and seeds
/// 2. Serve: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. Shutdown: when the shutdown future resolves, in-flight requests drain and the pool closes
/// ```
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application, reusing `pool` instead of connecting when one is given
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting roster with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => pool,
            None => setup_database(&config).await?,
        };

        bootstrap(&pool).await.context("database bootstrap failed")?;

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
    }

    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind {bind_addr}"))?;
        info!("Server starting on {}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
