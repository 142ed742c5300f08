//! Logging setup.
//!
//! Binaries install one global `fmt` subscriber at startup. A single
//! invocation may ask for its own verbosity through `QueryParams.log_level`;
//! that builds a separate [`Dispatch`] which the caller attaches to the
//! invocation future, leaving the global subscriber untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{Dispatch, Level};

/// Install the process subscriber (`RUST_LOG`, default `info`).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// Build a dispatcher scoped to one invocation, capped at `level`.
pub fn invocation_dispatch(level: LogLevel) -> Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.0)
        .with_target(false)
        .finish();
    Dispatch::new(subscriber)
}

/// Log verbosity requested by a caller.
///
/// Accepts level names (`"debug"`) and the numeric levels used by older
/// clients (10 = debug, 20 = info, 30 = warning, 40/50 = error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(pub Level);

impl LogLevel {
    fn from_numeric(n: i64) -> Self {
        let level = match n {
            i64::MIN..=9 => Level::TRACE,
            10..=19 => Level::DEBUG,
            20..=29 => Level::INFO,
            30..=39 => Level::WARN,
            _ => Level::ERROR,
        };
        LogLevel(level)
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel(Level::INFO)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(LogLevel::from_numeric(n));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel(Level::TRACE)),
            "debug" => Ok(LogLevel(Level::DEBUG)),
            "info" => Ok(LogLevel(Level::INFO)),
            "warn" | "warning" => Ok(LogLevel(Level::WARN)),
            "error" | "critical" => Ok(LogLevel(Level::ERROR)),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string().to_lowercase())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(LogLevel::from_numeric(n)),
            Raw::Name(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
