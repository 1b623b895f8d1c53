//! Test utilities for integration testing.

use crate::config::{Config, DatabaseConfig};
use crate::{AppState, Application, build_router};
use axum_test::TestServer;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig {
            // Will get overridden by the pool sqlx::test hands us
            url: Some("postgres://localhost/roster_test".to_string()),
            acquire_timeout: Duration::from_secs(1),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Full application over `pool`, bootstrapped (schema plus baseline users) like a real start.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let config = create_test_config();

    Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application")
        .into_test_server()
}

/// Router over `pool` with no bootstrap, for tests that need the store in a specific state.
pub fn create_test_server(pool: PgPool) -> TestServer {
    let state = AppState::builder().db(pool).config(create_test_config()).build();
    let router = build_router(state).expect("Failed to build router");
    TestServer::new(router.into_make_service()).expect("Failed to create test server")
}

/// A pool pointing at a port nothing listens on. Every acquire fails quickly.
pub fn unreachable_pool() -> PgPool {
    let options = PgConnectOptions::new().host("127.0.0.1").port(1).username("nobody").database("nothing");
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy_with(options)
}

/// Router over a store that cannot be reached.
pub fn create_unreachable_app() -> TestServer {
    let state = AppState::builder().db(unreachable_pool()).config(create_test_config()).build();
    let router = build_router(state).expect("Failed to build router");
    TestServer::new(router.into_make_service()).expect("Failed to create test server")
}

/// Records the message of every WARN event emitted under the subscriber from [`Self::subscriber`].
#[derive(Clone, Default)]
pub struct WarningCollector {
    messages: Arc<Mutex<Vec<String>>>,
}

impl WarningCollector {
    /// Attach with `tracing::instrument::WithSubscriber` so it follows the future across threads
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(self.clone())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.messages().iter().filter(|m| m.contains(needle)).count()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for WarningCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.messages.lock().unwrap().push(visitor.0);
        }
    }
}
