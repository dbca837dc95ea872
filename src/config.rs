use std::env;

/// Runtime configuration, read once at startup and passed explicitly into
/// `AppState::init`. Every value has a development default so `cargo run`
/// works against a local SurrealDB without any environment setup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_url: String,
    pub db_user: Option<String>,
    pub db_pass: Option<String>,
    pub db_ns: String,
    pub db_name: String,
    pub jwt_secret: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3587".to_string(),
            db_url: "ws://localhost:8050".to_string(),
            db_user: Some("root".to_string()),
            db_pass: Some("secret".to_string()),
            db_ns: "eventhub".to_string(),
            db_name: "eventhub".to_string(),
            jwt_secret: "secret".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("EVENTHUB_BIND").unwrap_or(defaults.bind_addr),
            db_url: env::var("EVENTHUB_DB_URL").unwrap_or(defaults.db_url),
            db_user: env::var("EVENTHUB_DB_USER").ok().or(defaults.db_user),
            db_pass: env::var("EVENTHUB_DB_PASS").ok().or(defaults.db_pass),
            db_ns: env::var("EVENTHUB_DB_NS").unwrap_or(defaults.db_ns),
            db_name: env::var("EVENTHUB_DB_NAME").unwrap_or(defaults.db_name),
            jwt_secret: env::var("EVENTHUB_JWT_SECRET").unwrap_or(defaults.jwt_secret),
        }
    }

    /// Configuration for tests: in-memory database, fixed JWT secret.
    pub fn for_tests() -> Self {
        Self {
            db_url: "mem://".to_string(),
            db_user: None,
            db_pass: None,
            jwt_secret: "test-secret".to_string(),
            ..Self::default()
        }
    }
}
