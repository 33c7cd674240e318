use once_cell::sync::Lazy;
use reqwest::Response;
use secrecy::Secret;
use sqlx::{migrate, Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use csrr_mailing_list::{
    config::{get_configuration, DatabaseSettings},
    startup::{get_connection_db_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};

pub const ADMIN_TOKEN: &str = "test-admin-token";

// Logs are swallowed unless TEST_LOG is set, e.g. `TEST_LOG=true cargo test`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = String::from("debug");
    let subscriber_name = String::from("test");

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

impl TestApp {
    /// Spawns the application with the admin routes guarded by `ADMIN_TOKEN`.
    pub async fn spawn_app() -> TestApp {
        Self::spawn_app_with_admin_token(Some(ADMIN_TOKEN)).await
    }

    pub async fn spawn_app_with_admin_token(admin_token: Option<&str>) -> TestApp {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Missing configuration file.");
        let db_test_name = format!("db_{}", Uuid::new_v4().to_string().replace('-', "_"));

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        config.set_admin_token(admin_token.map(|token| Secret::new(token.to_string())));

        let db_pool = configure_db(&mut config.database, db_test_name).await;

        let application = Application::build(config)
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp { address, db_pool }
    }

    pub async fn post_subscription(&self, body: serde_json::Value) -> Response {
        reqwest::Client::new()
            .post(&format!("{}/subscriptions", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_subscribers(&self, token: Option<&str>) -> Response {
        self.get_admin("/admin/subscribers", token).await
    }

    pub async fn get_subscribers_export(&self, token: Option<&str>) -> Response {
        self.get_admin("/admin/subscribers/export", token).await
    }

    async fn get_admin(&self, path: &str, token: Option<&str>) -> Response {
        let mut request = reqwest::Client::new().get(&format!("{}{}", self.address, path));

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send().await.expect("Failed to execute request.")
    }

    /// Creates a subscriber through the API, failing the test if it is rejected.
    pub async fn subscribe(&self, email: &str, first_name: &str, last_name: &str) {
        let response = self
            .post_subscription(serde_json::json!({
                "email": email,
                "first_name": first_name,
                "last_name": last_name,
            }))
            .await;

        assert_eq!(201, response.status().as_u16());
    }
}

async fn configure_db(db_config: &mut DatabaseSettings, db_test_name: String) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect_with(&db_config.get_instance_options())
        .await
        .expect("Failed to connect to Postgres.");

    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, db_test_name))
        .await
        .expect("Failed to create database.");

    connection
        .close()
        .await
        .expect("Failed to close connection.");

    // Execute migrations
    db_config.set_name(db_test_name);

    let db_pool = get_connection_db_pool(db_config);

    migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run migrations.");

    db_pool
}
