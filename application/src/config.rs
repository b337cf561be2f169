//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use rust_decimal::Decimal;
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Loads the [`Config`] from the file at `path` (when present), merges
    /// `CONF`-prefixed environment variables over it, and falls back to
    /// defaults for whatever remains unset.
    ///
    /// # Errors
    ///
    /// If the resulting configuration fails to deserialize.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host the server binds to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port the server binds to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// Origins allowed to call the API.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [JWT] secret.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    #[default("secret".to_owned())]
    pub jwt_secret: String,

    /// Scoring heuristic configuration.
    pub scoring: Scoring,

    /// Service tasks configuration.
    pub tasks: Tasks,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            jwt_secret,
            scoring,
            tasks: Tasks {
                release_stale_reservations,
            },
        } = value;
        Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            scoring: scoring.into(),
            release_stale_reservations:
                service::task::release_stale_reservations::Config {
                    interval: release_stale_reservations.interval,
                    timeout: release_stale_reservations.timeout,
                },
        }
    }
}

/// Scoring heuristic configuration.
///
/// The scoring constants are empirical, so every one of them is
/// overridable here; omitted fields fall back to the service defaults.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Scoring {
    /// Weight of the projected return component.
    #[default(Decimal::new(45, 2))]
    pub roi_weight: Decimal,

    /// Weight of the price-position component.
    #[default(Decimal::new(35, 2))]
    pub price_weight: Decimal,

    /// Weight of the planning-stage component.
    #[default(Decimal::new(2, 1))]
    pub stage_weight: Decimal,

    /// ROI (in percent) at which the return component saturates.
    #[default(Decimal::new(60, 0))]
    pub roi_cap: Decimal,
}

impl From<Scoring> for service::analysis::score::Config {
    fn from(value: Scoring) -> Self {
        let Scoring {
            roi_weight,
            price_weight,
            stage_weight,
            roi_cap,
        } = value;
        Self {
            roi_weight,
            price_weight,
            stage_weight,
            roi_cap,
            ..Self::default()
        }
    }
}

/// Service tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// `ReleaseStaleReservations` task configuration.
    pub release_stale_reservations: Task,
}

/// Service task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Task {
    /// Task execution interval.
    #[default(time::Duration::from_secs(60 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,

    /// Timeout after which the entities will be considered stale.
    #[default(time::Duration::from_secs(60 * 60 * 24 * 7))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

/// Postgres configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host the database listens on.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port the database listens on.
    #[default(5432)]
    pub port: u16,

    /// User to authenticate as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to authenticate with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Name of the database to use.
    #[default("postgres".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Verbosity threshold of logging.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Extremely verbose tracing information.
    Trace,

    /// Information useful while debugging.
    Debug,

    /// Regular operational information.
    #[default]
    Info,

    /// Suspicious situations worth attention.
    Warn,

    /// Outright failures.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
