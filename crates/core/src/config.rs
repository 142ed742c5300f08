use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub builder: BuilderConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `NETBUILDER_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("NETBUILDER_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            source: SourceConfig::from_env_profiled(p),
            builder: BuilderConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:   {}:{}, cors={}", self.server.host, self.server.port, self.server.cors_origin);
        tracing::info!("  source:   timeout={}s, user_agent={}", self.source.timeout_seconds, self.source.user_agent);
        tracing::info!(
            "  builder:  max_depth={}, trim_rounds={}, damping={}, metrics_timeout={}s",
            self.builder.ego_max_depth,
            self.builder.trim_max_rounds,
            self.builder.pagerank_damping,
            self.builder.metrics_timeout_seconds
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_parse(p, "PORT", 5000),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            cors_origin: "*".into(),
        }
    }
}

// ── Record source (SPARQL over HTTP) ──────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl SourceConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            timeout_seconds: profiled_env_parse(p, "SPARQL_TIMEOUT_SECONDS", 60),
            user_agent: profiled_env_or(p, "SPARQL_USER_AGENT", default_user_agent()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_user_agent() -> &'static str {
    concat!("netbuilder/", env!("CARGO_PKG_VERSION"))
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            user_agent: default_user_agent().to_string(),
        }
    }
}

// ── Graph building ────────────────────────────────────────────

/// Hard ceiling on degree-trim rounds; larger configured values are clamped.
pub const MAX_TRIM_ROUNDS: usize = 20;

/// Tuning knobs of the pipeline that are fixed per deployment rather than
/// per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Maximum breadth-first expansion rounds in egocentric mode.
    pub ego_max_depth: usize,
    /// Maximum degree-trim rounds during densification.
    pub trim_max_rounds: usize,
    pub pagerank_damping: f64,
    pub pagerank_max_iterations: usize,
    pub pagerank_tolerance: f64,
    /// Upper bound on the metrics join in seconds (0 = wait indefinitely).
    pub metrics_timeout_seconds: u64,
}

impl BuilderConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        let mut trim_max_rounds = profiled_env_parse(p, "TRIM_MAX_ROUNDS", d.trim_max_rounds);
        if trim_max_rounds > MAX_TRIM_ROUNDS {
            tracing::warn!(
                "TRIM_MAX_ROUNDS={} exceeds the limit, using {}",
                trim_max_rounds,
                MAX_TRIM_ROUNDS
            );
            trim_max_rounds = MAX_TRIM_ROUNDS;
        }
        Self {
            ego_max_depth: profiled_env_parse(p, "EGO_MAX_DEPTH", d.ego_max_depth),
            trim_max_rounds,
            pagerank_damping: profiled_env_parse(p, "PAGERANK_DAMPING", d.pagerank_damping),
            pagerank_max_iterations: profiled_env_parse(p, "PAGERANK_MAX_ITERATIONS", d.pagerank_max_iterations),
            pagerank_tolerance: profiled_env_parse(p, "PAGERANK_TOLERANCE", d.pagerank_tolerance),
            metrics_timeout_seconds: profiled_env_parse(p, "METRICS_TIMEOUT_SECONDS", d.metrics_timeout_seconds),
        }
    }

    pub fn metrics_timeout(&self) -> Option<Duration> {
        (self.metrics_timeout_seconds > 0).then(|| Duration::from_secs(self.metrics_timeout_seconds))
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            ego_max_depth: 30,
            trim_max_rounds: MAX_TRIM_ROUNDS,
            pagerank_damping: 0.85,
            pagerank_max_iterations: 100,
            pagerank_tolerance: 1e-6,
            metrics_timeout_seconds: 0,
        }
    }
}
