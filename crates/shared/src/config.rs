//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
///
/// Every section has defaults so a bare checkout runs without any config
/// file. Values are layered from `config/default`, `config/{RUN_MODE}` and
/// `SLEEPDASH__*` environment variables, in that order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// JWT configuration.
    #[serde(default)]
    pub jwt: JwtSettings,
    /// Operator account accepted by the admin login endpoint.
    #[serde(default)]
    pub admin: AdminSettings,
    /// Dashboard client configuration.
    #[serde(default)]
    pub client: ClientConfig,
    /// Fixture generation for the in-memory store.
    #[serde(default)]
    pub fixtures: FixtureConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    #[serde(default = "default_jwt_secret")]
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            access_token_expiry_secs: default_access_token_expiry(),
        }
    }
}

fn default_jwt_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_access_token_expiry() -> u64 {
    28_800 // 8 hours
}

/// Operator credentials for `POST /api/admin/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSettings {
    /// Login email.
    #[serde(default = "default_admin_email")]
    pub email: String,
    /// Plaintext password, hashed once at startup.
    #[serde(default = "default_admin_password")]
    pub password: String,
    /// Display name returned in the admin profile.
    #[serde(default = "default_admin_name")]
    pub name: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            email: default_admin_email(),
            password: default_admin_password(),
            name: default_admin_name(),
        }
    }
}

fn default_admin_email() -> String {
    "admin@admin.com".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

/// Dashboard client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API, including the `/api` prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Upper bound for a single request in the fetch cycle.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Period between refresh ticks while the dashboard is active.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Where the admin session is persisted between runs.
    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,
    /// Log in with the configured admin account when no session is stored.
    #[serde(default)]
    pub auto_login: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_ms: default_request_timeout_ms(),
            refresh_interval_secs: default_refresh_interval_secs(),
            session_path: default_session_path(),
            auto_login: false,
        }
    }
}

fn default_api_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

fn default_request_timeout_ms() -> u64 {
    3_000
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_session_path() -> PathBuf {
    PathBuf::from(".sleepdash/session.json")
}

/// Fixture generation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConfig {
    /// RNG seed; the same seed always yields the same data set.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Number of users seeded into the store.
    #[serde(default = "default_user_count")]
    pub user_count: usize,
    /// Number of sounds in the library.
    #[serde(default = "default_sound_count")]
    pub sound_count: usize,
    /// Number of gift codes issued.
    #[serde(default = "default_gift_code_count")]
    pub gift_code_count: usize,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            user_count: default_user_count(),
            sound_count: default_sound_count(),
            gift_code_count: default_gift_code_count(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_user_count() -> usize {
    50
}

fn default_sound_count() -> usize {
    24
}

fn default_gift_code_count() -> usize {
    50
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, or if a client
    /// period or timeout is zero.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SLEEPDASH").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.client.refresh_interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "client.refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.client.request_timeout_ms == 0 {
            return Err(config::ConfigError::Message(
                "client.request_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Request timeout for the fetch cycle.
    #[must_use]
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.client.request_timeout_ms)
    }

    /// Period of the dashboard refresher.
    #[must_use]
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.client.refresh_interval_secs)
    }
}
