//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test; each test gets its own
//! freshly migrated database so reminder counts never leak between tests.

use anyhow::{Context, Result};
use job_alerts_core::kernel::test_dependencies::TestDependencies;
use job_alerts_core::kernel::MIGRATOR;
use job_alerts_core::{
    Config, DatabaseConfig, FeedSource, NotifyConfig, Pipeline, Priority, ReminderPolicy,
};
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Executor, PgConnection, PgPool, Postgres as PgDb};
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    host: String,
    port: u16,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?.to_string();
        let port = postgres.get_host_port_ipv4(5432).await?;

        Ok(Self {
            host,
            port,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }

    fn database(&self, name: &str) -> DatabaseConfig {
        DatabaseConfig {
            name: name.to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            host: self.host.clone(),
            port: self.port,
        }
    }
}

/// Per-test database plus mock infrastructure.
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let mut conn = ctx.conn().await;
/// }
/// ```
pub struct TestHarness {
    pub database: DatabaseConfig,
    /// Pool for fixtures and assertions
    pub db_pool: PgPool,
    pub test_deps: TestDependencies,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    /// Create a fresh database on the shared container and migrate it.
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let name = format!("job_alerts_{}", Uuid::new_v4().simple());
        let mut admin = PgConnection::connect_with(&infra.database("postgres").connect_options())
            .await
            .context("Failed to connect to admin database")?;
        admin
            .execute(format!("CREATE DATABASE {}", name).as_str())
            .await
            .context("Failed to create test database")?;
        admin.close().await?;

        let database = infra.database(&name);
        let db_pool = PgPoolOptions::new()
            .max_connections(4)
            .connect_with(database.connect_options())
            .await
            .context("Failed to connect to test database")?;

        MIGRATOR
            .run(&db_pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            database,
            db_pool,
            test_deps: TestDependencies::new(),
        })
    }

    pub async fn conn(&self) -> PoolConnection<PgDb> {
        self.db_pool
            .acquire()
            .await
            .expect("Failed to acquire connection")
    }

    /// Config pointing at this test's database and the given feed.
    pub fn config(&self, feed_url: &str) -> Config {
        Config {
            database: self.database.clone(),
            notify: NotifyConfig {
                base_url: "http://ntfy.invalid".to_string(),
                topic: "job-alerts-test".to_string(),
                access_token: None,
                priority: Priority::HIGH,
            },
            reminders: ReminderPolicy::default(),
            feed: FeedSource::new(feed_url),
        }
    }

    /// Pipeline wired to this harness's mocks.
    pub fn pipeline(&self, feed_url: &str) -> Pipeline {
        Pipeline::new(self.config(feed_url), self.test_deps.deps())
    }
}
