use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize as _;

use crate::db::Backend;
use crate::Result;

pub static CONFIG_FILE: &'static str = "keepsake.toml";

/// Prefix for environment variables overriding config values, e.g.
/// `KEEPSAKE__AUTH__PASSWORD`.
pub static ENV_PREFIX: &'static str = "KEEPSAKE";

/// Application configuration.
///
/// Using the *struct update syntax* one can initialize a new `Config`, making
/// a few changes right in the definition.
///
/// ```ignore
/// let cfg = Config {
///     auth: Auth {
///         password: "open sesame".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// }
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub name: String,

    /// Address on which to serve the application. Defaults to
    /// `127.0.0.1:8001`.
    pub address: SocketAddr,
    /// Path prefix all api routes are nested under. Defaults to `/api`.
    pub prefix: String,

    pub auth: Auth,
    pub db: Db,
    pub cors: Cors,
    pub limits: Limits,
    pub tracing: Tracing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            address: SocketAddr::from(([127, 0, 0, 1], 8001)),
            prefix: "/api".to_string(),
            auth: Auth::default(),
            db: Db::default(),
            cors: Cors::default(),
            limits: Limits::default(),
            tracing: Tracing::default(),
        }
    }
}

/// Loads application config from toml file at default location, overlaid
/// with environment variables.
pub fn load<T: DeserializeOwned>() -> Result<T> {
    load_from(CONFIG_FILE)
}

/// Loads application config from toml file at standard path using provided
/// name.
///
/// For example for `name` == `keepsake.toml` we will load both
/// `keepsake.toml` and `secret.keepsake.toml`. Neither file is required, the
/// whole configuration can come from the environment.
pub fn load_from<T: DeserializeOwned>(name: impl AsRef<str>) -> Result<T> {
    let path = Path::new(name.as_ref());
    let secret = match path.file_name() {
        Some(file) => path.with_file_name(format!("secret.{}", file.to_string_lossy())),
        None => PathBuf::from(format!("secret.{}", name.as_ref())),
    };

    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::File::from(secret.as_path()).required(false))
        .add_source(environment())
        .build()?;

    let config: T = config.try_deserialize()?;

    Ok(config)
}

/// Environment overrides. Values are kept as strings, so secrets such as
/// `007` are never reinterpreted as numbers.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator("__")
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Auth {
    /// Shared secret unlocking the vault. There is no default; the server
    /// refuses to start while it's empty.
    pub password: String,
    /// Session token handed out on successful login. Constant for as long as
    /// the configuration doesn't change.
    pub token: String,
    /// Require the session token on all resource routes.
    pub guard: bool,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            password: String::new(),
            token: crate::auth::DEFAULT_SESSION_TOKEN.to_string(),
            guard: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Db {
    pub backend: Backend,
    /// Location of the database files, relative to current working
    /// directory. Ignored by the memory backend.
    pub path: String,
}

impl Default for Db {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: "db".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Cors {
    /// Allowed origins. A single `*` entry allows any origin. Also accepts a
    /// single comma separated string, as set through the environment.
    #[serde(deserialize_with = "comma_separated")]
    pub origins: Vec<String>,
}

impl Default for Cors {
    fn default() -> Self {
        Self {
            origins: vec!["*".to_string()],
        }
    }
}

impl Cors {
    pub fn allows_any(&self) -> bool {
        self.origins.iter().any(|o| o.trim() == "*")
    }
}

fn comma_separated<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Origins {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Origins::deserialize(deserializer)? {
        Origins::List(list) => list,
        Origins::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum accepted request body size. Images travel inline as encoded
    /// strings, so this needs to be generous.
    pub body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            body_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Tracing {
    pub enabled: bool,

    pub mode: crate::tracing::Mode,
    pub level: crate::tracing::Level,

    /// Loki push endpoint used in production mode. Basic auth credentials
    /// can be embedded in the url.
    pub loki_address: String,
}

impl Default for Tracing {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: crate::tracing::Mode::default(),
            level: crate::tracing::Level::default(),
            loki_address: "".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.prefix, "/api");
        assert_eq!(config.address.port(), 8001);
        assert!(config.auth.password.is_empty());
        assert!(!config.auth.guard);
        assert_eq!(config.auth.token, crate::auth::DEFAULT_SESSION_TOKEN);
        assert!(config.cors.allows_any());
        assert_eq!(config.limits.body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                prefix = "/vault"

                [auth]
                password = "hunter2"

                [db]
                backend = "memory"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.prefix, "/vault");
        assert_eq!(config.auth.password, "hunter2");
        assert_eq!(config.auth.token, crate::auth::DEFAULT_SESSION_TOKEN);
        assert_eq!(config.db.backend, Backend::Memory);
        assert_eq!(config.db.path, "db");
        assert_eq!(config.cors.origins, vec!["*".to_string()]);
    }

    fn from_env(vars: &[(&str, &str)]) -> Config {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        config::Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn secrets_from_env_are_kept_verbatim() {
        let config = from_env(&[
            ("KEEPSAKE__AUTH__PASSWORD", "007"),
            ("KEEPSAKE__AUTH__TOKEN", "0123"),
        ]);
        assert_eq!(config.auth.password, "007");
        assert_eq!(config.auth.token, "0123");

        let config = from_env(&[("KEEPSAKE__AUTH__PASSWORD", "TRUE")]);
        assert_eq!(config.auth.password, "TRUE");
    }

    #[test]
    fn typed_values_from_env() {
        let config = from_env(&[
            ("KEEPSAKE__AUTH__GUARD", "true"),
            ("KEEPSAKE__LIMITS__BODY_BYTES", "1024"),
            ("KEEPSAKE__ADDRESS", "0.0.0.0:9000"),
            ("KEEPSAKE__DB__BACKEND", "memory"),
            (
                "KEEPSAKE__CORS__ORIGINS",
                "https://a.example.com, https://b.example.com",
            ),
        ]);
        assert!(config.auth.guard);
        assert_eq!(config.limits.body_bytes, 1024);
        assert_eq!(config.address.port(), 9000);
        assert_eq!(config.db.backend, Backend::Memory);
        assert_eq!(
            config.cors.origins,
            vec![
                "https://a.example.com".to_string(),
                "https://b.example.com".to_string()
            ]
        );
    }

    #[test]
    fn explicit_origins_disable_wildcard() {
        let cors = Cors {
            origins: vec!["https://example.com".to_string()],
        };
        assert!(!cors.allows_any());
    }
}
