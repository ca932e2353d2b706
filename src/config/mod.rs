//! Configuration for the commerce backend.
//!
//! Everything is resolved once at startup from an [`EnvSnapshot`] and a
//! working directory, then handed to the framework bootstrap as an
//! immutable [`Config`].

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

pub mod admin;
pub mod cors;
pub mod env;
pub mod secret;
pub mod setting;

pub use admin::{extend_allowed_hosts, AdminConfig, DevServerConfig, EXTRA_ALLOWED_HOSTS};
pub use cors::{CorsOrigin, CorsRule};
pub use env::EnvSnapshot;
pub use secret::{Secret, PLACEHOLDER_SECRET};
pub use setting::Setting;

use crate::utils::error::Result;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const STORE_CORS: &str = "STORE_CORS";
pub const ADMIN_CORS: &str = "ADMIN_CORS";
pub const AUTH_CORS: &str = "AUTH_CORS";
pub const JWT_SECRET: &str = "JWT_SECRET";
pub const COOKIE_SECRET: &str = "COOKIE_SECRET";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    store_cors: Setting<CorsRule>,
    admin_cors: Setting<CorsRule>,
    auth_cors: Setting<CorsRule>,
    jwt_secret: Secret,
    cookie_secret: Secret,
}

impl HttpConfig {
    fn from_env(env: &EnvSnapshot) -> Self {
        Self {
            store_cors: cors_rule(env, STORE_CORS),
            admin_cors: cors_rule(env, ADMIN_CORS),
            auth_cors: cors_rule(env, AUTH_CORS),
            jwt_secret: secret_or_placeholder(env, JWT_SECRET),
            cookie_secret: secret_or_placeholder(env, COOKIE_SECRET),
        }
    }

    pub fn store_cors(&self) -> &Setting<CorsRule> {
        &self.store_cors
    }

    pub fn admin_cors(&self) -> &Setting<CorsRule> {
        &self.admin_cors
    }

    pub fn auth_cors(&self) -> &Setting<CorsRule> {
        &self.auth_cors
    }

    pub fn jwt_secret(&self) -> &Secret {
        &self.jwt_secret
    }

    pub fn cookie_secret(&self) -> &Secret {
        &self.cookie_secret
    }
}

/// Options passed through to the database driver. Fixed for this deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseDriverOptions {
    pub ssl: bool,
    pub sslmode: &'static str,
}

impl Default for DatabaseDriverOptions {
    fn default() -> Self {
        Self {
            ssl: false,
            sslmode: "disable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    database_url: Setting<String>,
    http: HttpConfig,
    database_driver_options: DatabaseDriverOptions,
}

impl ProjectConfig {
    fn from_env(env: &EnvSnapshot) -> Self {
        let database_url = env.get(DATABASE_URL).map(str::to_string);
        if !database_url.is_present() {
            info!("Config: {} not set, deferring to framework default", DATABASE_URL);
        }

        Self {
            database_url,
            http: HttpConfig::from_env(env),
            database_driver_options: DatabaseDriverOptions::default(),
        }
    }

    pub fn database_url(&self) -> Setting<&str> {
        self.database_url.as_ref().map(String::as_str)
    }

    pub fn http(&self) -> &HttpConfig {
        &self.http
    }

    pub fn database_driver_options(&self) -> &DatabaseDriverOptions {
        &self.database_driver_options
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    project_config: ProjectConfig,
    admin: AdminConfig,
}

impl Config {
    /// Builds the configuration from an already overlaid snapshot.
    pub fn from_snapshot(env: &EnvSnapshot, dev_server: DevServerConfig) -> Self {
        Self {
            project_config: ProjectConfig::from_env(env),
            admin: AdminConfig::from_dev_server(dev_server),
        }
    }

    pub fn project_config(&self) -> &ProjectConfig {
        &self.project_config
    }

    pub fn admin(&self) -> &AdminConfig {
        &self.admin
    }
}

/// Resolves the configuration, starting from an empty dev-server allow-list.
pub fn load(env: &EnvSnapshot, cwd: &Path) -> Result<Config> {
    load_with_dev_server(env, cwd, DevServerConfig::default())
}

/// Resolves the configuration on top of the admin build tool's current
/// dev-server settings.
pub fn load_with_dev_server(
    env: &EnvSnapshot,
    cwd: &Path,
    dev_server: DevServerConfig,
) -> Result<Config> {
    let environment = env.environment_name();
    info!("Config: loading for environment '{}'", environment);

    let overlaid = env.overlay(cwd, environment)?;
    Ok(Config::from_snapshot(&overlaid, dev_server))
}

fn cors_rule(env: &EnvSnapshot, name: &'static str) -> Setting<CorsRule> {
    let rule = env.get(name).map(CorsRule::parse);
    if !rule.is_present() {
        warn!("Config: {} is not set", name);
    }
    rule
}

fn secret_or_placeholder(env: &EnvSnapshot, name: &'static str) -> Secret {
    match env.get_non_empty(name) {
        Setting::Present(value) => Secret::new(value),
        Setting::Absent => {
            warn!("Config: {} not set, using placeholder secret", name);
            Secret::placeholder()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_secrets_default_to_placeholder() {
        let config = Config::from_snapshot(&EnvSnapshot::default(), DevServerConfig::default());
        let http = config.project_config().http();
        assert_eq!(http.jwt_secret().expose(), "supersecret");
        assert_eq!(http.cookie_secret().expose(), "supersecret");
    }

    #[test]
    fn test_secrets_read_from_env() {
        let env = snapshot(&[("JWT_SECRET", "jwt"), ("COOKIE_SECRET", "cookie")]);
        let config = Config::from_snapshot(&env, DevServerConfig::default());
        let http = config.project_config().http();
        assert_eq!(http.jwt_secret().expose(), "jwt");
        assert_eq!(http.cookie_secret().expose(), "cookie");
    }

    #[test]
    fn test_empty_secrets_fall_back_to_placeholder() {
        let env = snapshot(&[("JWT_SECRET", ""), ("COOKIE_SECRET", "")]);
        let config = Config::from_snapshot(&env, DevServerConfig::default());
        let http = config.project_config().http();
        assert_eq!(http.jwt_secret().expose(), "supersecret");
        assert_eq!(http.cookie_secret().expose(), "supersecret");
    }

    #[test]
    fn test_database_url_passthrough() {
        let env = snapshot(&[("DATABASE_URL", "X")]);
        let config = Config::from_snapshot(&env, DevServerConfig::default());
        assert_eq!(config.project_config().database_url(), Setting::Present("X"));

        let config = Config::from_snapshot(&EnvSnapshot::default(), DevServerConfig::default());
        assert_eq!(config.project_config().database_url(), Setting::Absent);
    }

    #[test]
    fn test_driver_options_are_fixed() {
        let env = snapshot(&[("DATABASE_URL", "postgres://db?sslmode=require")]);
        let config = Config::from_snapshot(&env, DevServerConfig::default());
        assert_eq!(
            config.project_config().database_driver_options(),
            &DatabaseDriverOptions {
                ssl: false,
                sslmode: "disable",
            }
        );
    }

    #[test]
    fn test_absent_cors_is_deferred() {
        let config = Config::from_snapshot(&EnvSnapshot::default(), DevServerConfig::default());
        let http = config.project_config().http();
        assert_eq!(http.store_cors(), &Setting::Absent);
        assert!(http.admin_cors().require(ADMIN_CORS).is_err());
    }

    #[test]
    fn test_serializes_framework_shape() {
        let env = snapshot(&[("STORE_CORS", "http://a"), ("DATABASE_URL", "postgres://db")]);
        let config = Config::from_snapshot(&env, DevServerConfig::default());
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["projectConfig"]["databaseUrl"], "postgres://db");
        assert_eq!(json["projectConfig"]["http"]["storeCors"], "http://a");
        assert!(json["projectConfig"]["http"]["adminCors"].is_null());
        assert_eq!(json["projectConfig"]["http"]["jwtSecret"], "[redacted]");
        assert_eq!(json["projectConfig"]["databaseDriverOptions"]["sslmode"], "disable");
        assert_eq!(json["admin"]["devServer"]["allowedHosts"][0], "lx-dev");
    }
}
