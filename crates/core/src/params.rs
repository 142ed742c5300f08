//! Per-invocation query parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{BuilderError, BuilderResult};
use crate::logging::LogLevel;

/// Placeholder in the link template replaced by the current frontier.
pub const ID_PLACEHOLDER: &str = "<ID>";

/// Placeholder in the node template replaced by the final node id set.
pub const ID_SET_PLACEHOLDER: &str = "<ID_SET>";

const DEFAULT_LIMIT: usize = 1000;
const DEFAULT_OPTIMIZE: f64 = 1.0;

/// Output encoding of a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Node-link JSON with embedded metrics, readable by cytoscape.js.
    #[default]
    Cytoscape,
    /// GraphML markup without a separate metrics block.
    Graphml,
}

/// Everything one network query needs. Built once per invocation and not
/// mutated afterwards.
///
/// Field names on the wire follow the historical HTTP API
/// (`removeMultipleLinks`, `customHttpHeaders`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParams {
    /// Query endpoint URL.
    pub endpoint: String,
    /// Node attribute query; must contain `<ID_SET>`.
    pub nodes: String,
    /// Link query; contains `<ID>` in egocentric mode, nothing otherwise.
    pub links: String,
    /// Text prepended to every query (prefix declarations).
    #[serde(default)]
    pub prefixes: String,
    /// Target node count after densification.
    #[serde(default = "default_limit", deserialize_with = "lenient::usize")]
    pub limit: usize,
    /// Space-separated seed ids; presence selects egocentric mode.
    #[serde(default, deserialize_with = "lenient::non_blank")]
    pub id: Option<String>,
    /// Over-fetch multiplier applied before densification.
    #[serde(default = "default_optimize", deserialize_with = "lenient::f64")]
    pub optimize: f64,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub log_level: Option<LogLevel>,
    /// Collapse reciprocal edges (first-seen direction wins).
    #[serde(
        rename = "removeMultipleLinks",
        default = "default_true",
        deserialize_with = "lenient::bool"
    )]
    pub remove_multiple_links: bool,
    /// Opaque headers forwarded to the record source.
    #[serde(rename = "customHttpHeaders", default)]
    pub custom_http_headers: Option<BTreeMap<String, String>>,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_optimize() -> f64 {
    DEFAULT_OPTIMIZE
}

fn default_true() -> bool {
    true
}

impl QueryParams {
    pub fn new(endpoint: &str, nodes: &str, links: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            nodes: nodes.to_string(),
            links: links.to_string(),
            prefixes: String::new(),
            limit: DEFAULT_LIMIT,
            id: None,
            optimize: DEFAULT_OPTIMIZE,
            format: OutputFormat::default(),
            log_level: None,
            remove_multiple_links: true,
            custom_http_headers: None,
        }
    }

    pub fn with_prefixes(mut self, prefixes: &str) -> Self {
        self.prefixes = prefixes.to_string();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string()).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_optimize(mut self, optimize: f64) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_remove_multiple_links(mut self, enabled: bool) -> Self {
        self.remove_multiple_links = enabled;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.custom_http_headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Seed ids for egocentric expansion (empty in sociocentric mode).
    pub fn seed_ids(&self) -> Vec<String> {
        self.id
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn is_egocentric(&self) -> bool {
        !self.seed_ids().is_empty()
    }

    /// Over-fetch size: `floor(limit * optimize)`.
    pub fn fetch_limit(&self) -> usize {
        (self.limit as f64 * self.optimize).floor() as usize
    }

    /// Prepend the configured prefixes to a query body.
    pub fn query_text(&self, body: &str) -> String {
        format!("{} {}", self.prefixes, body)
    }

    pub fn headers(&self) -> BTreeMap<String, String> {
        self.custom_http_headers.clone().unwrap_or_default()
    }

    /// Reject parameter sets that would fail deep inside expansion.
    pub fn validate(&self) -> BuilderResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(BuilderError::Config("endpoint is empty".into()));
        }
        if self.limit == 0 {
            return Err(BuilderError::Config("limit must be positive".into()));
        }
        if !(self.optimize.is_finite() && self.optimize > 0.0) {
            return Err(BuilderError::Config(format!(
                "optimize must be a positive number, got {}",
                self.optimize
            )));
        }
        if !self.nodes.contains(ID_SET_PLACEHOLDER) {
            return Err(BuilderError::Config(format!(
                "node query is missing the {} placeholder",
                ID_SET_PLACEHOLDER
            )));
        }
        let has_id_slot = self.links.contains(ID_PLACEHOLDER);
        if self.is_egocentric() && !has_id_slot {
            return Err(BuilderError::Config(format!(
                "link query is missing the {} placeholder required with an id",
                ID_PLACEHOLDER
            )));
        }
        if !self.is_egocentric() && has_id_slot {
            return Err(BuilderError::Config(format!(
                "link query contains {} but no id was given",
                ID_PLACEHOLDER
            )));
        }
        Ok(())
    }
}

/// Render ids as space-separated IRIs for template substitution.
pub fn iri_list<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .map(|id| format!("<{}>", id))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deserializers for options that arrive either typed (JSON body) or as
/// strings (query string, older clients).
mod lenient {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(u64),
        Float(f64),
        Text(String),
    }

    pub fn usize<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Int(n) => Ok(n as usize),
            Raw::Float(f) if f >= 0.0 => Ok(f as usize),
            Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
            _ => Err(serde::de::Error::custom("expected a non-negative integer")),
        }
    }

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Int(n) => Ok(n as f64),
            Raw::Float(f) => Ok(f),
            Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
            Raw::Bool(_) => Err(serde::de::Error::custom("expected a number")),
        }
    }

    pub fn bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Bool(b) => Ok(b),
            Raw::Int(n) => Ok(n != 0),
            Raw::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                other => Err(serde::de::Error::custom(format!("invalid boolean '{}'", other))),
            },
            Raw::Float(_) => Err(serde::de::Error::custom("expected a boolean")),
        }
    }

    pub fn non_blank<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(d)?;
        Ok(value.filter(|s| !s.trim().is_empty()))
    }
}
