//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Expense submission policy.
    #[serde(default)]
    pub expenses: ExpenseSettings,
    /// Transition notification fan-out.
    #[serde(default)]
    pub notifications: NotificationSettings,
    /// Administrator created at startup, if any.
    #[serde(default)]
    pub bootstrap: Option<BootstrapSettings>,
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
    3000
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// Expense submission policy.
///
/// Categories are matched case-insensitively at submission time.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseSettings {
    /// Allowed expense categories.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Minimum title length in characters (after trimming).
    #[serde(default = "default_min_title_len")]
    pub min_title_len: usize,
    /// Minimum description length in characters (after trimming).
    #[serde(default = "default_min_description_len")]
    pub min_description_len: usize,
}

impl Default for ExpenseSettings {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            min_title_len: default_min_title_len(),
            min_description_len: default_min_description_len(),
        }
    }
}

fn default_categories() -> Vec<String> {
    [
        "Travel",
        "Meals",
        "Office Supplies",
        "Software",
        "Training",
        "Marketing",
        "Utilities",
        "Other",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_min_title_len() -> usize {
    3
}

fn default_min_description_len() -> usize {
    10
}

/// Notification fan-out configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    /// Buffered events per subscriber before lagging subscribers drop events.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    256
}

/// First administrator, created when the user store is empty.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapSettings {
    /// Display name.
    pub admin_name: String,
    /// Email address.
    pub admin_email: String,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `EXPENSA__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("EXPENSA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_env() {
        temp_env::with_vars(
            [
                ("EXPENSA__JWT__SECRET", Some("env-secret")),
                ("EXPENSA__SERVER__PORT", Some("8088")),
                ("RUN_MODE", Some("config-test-missing")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.jwt.secret, "env-secret");
                assert_eq!(config.server.port, 8088);
                assert_eq!(config.jwt.access_token_expiry_secs, 3600);
                assert!(config.bootstrap.is_none());
            },
        );
    }

    #[test]
    fn test_load_bootstrap_admin_from_env() {
        temp_env::with_vars(
            [
                ("EXPENSA__JWT__SECRET", Some("env-secret")),
                ("EXPENSA__BOOTSTRAP__ADMIN_NAME", Some("Root Admin")),
                ("EXPENSA__BOOTSTRAP__ADMIN_EMAIL", Some("root@example.com")),
                ("RUN_MODE", Some("config-test-missing")),
            ],
            || {
                let bootstrap = AppConfig::load().unwrap().bootstrap.unwrap();
                assert_eq!(bootstrap.admin_name, "Root Admin");
                assert_eq!(bootstrap.admin_email, "root@example.com");
            },
        );
    }

    #[test]
    fn test_load_without_secret_fails() {
        temp_env::with_vars(
            [
                ("EXPENSA__JWT__SECRET", None::<&str>),
                ("RUN_MODE", Some("config-test-missing")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_expense_settings_defaults() {
        let settings = ExpenseSettings::default();
        assert_eq!(settings.categories.len(), 8);
        assert!(settings.categories.iter().any(|c| c == "Travel"));
        assert_eq!(settings.min_title_len, 3);
        assert_eq!(settings.min_description_len, 10);
    }

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3000);
        assert_eq!(NotificationSettings::default().channel_capacity, 256);
    }
}
