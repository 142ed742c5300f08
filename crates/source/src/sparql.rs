//! SPARQL-over-HTTP record source.
//!
//! Queries are sent as form-encoded POST bodies and answered in the SPARQL
//! JSON results format. There is no retry: any failure is returned to the
//! caller, which treats it as fatal for the whole invocation.

use std::time::Instant;

use async_trait::async_trait;
use netbuilder_core::config::SourceConfig;
use netbuilder_core::Record;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use tracing::{debug, warn};

use crate::parsing::parse_sparql_results;
use crate::source::{RecordSource, SourceError, SourceHeaders};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Longest slice of an error body kept in [`SourceError::Status`].
const MAX_ERROR_BODY: usize = 512;

pub struct SparqlClient {
    http: reqwest::Client,
}

impl SparqlClient {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(Self { http })
    }

    fn header_map(headers: &SourceHeaders) -> Result<HeaderMap, SourceError> {
        let mut map = HeaderMap::new();
        map.insert(ACCEPT, HeaderValue::from_static(SPARQL_RESULTS_JSON));
        for (name, value) in headers {
            let name_h = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| SourceError::InvalidHeader(name.clone()))?;
            let value_h =
                HeaderValue::from_str(value).map_err(|_| SourceError::InvalidHeader(name.clone()))?;
            map.insert(name_h, value_h);
        }
        Ok(map)
    }
}

#[async_trait]
impl RecordSource for SparqlClient {
    async fn query(
        &self,
        text: &str,
        endpoint: &str,
        headers: &SourceHeaders,
    ) -> Result<Vec<Record>, SourceError> {
        let start = Instant::now();
        debug!(endpoint, query = %text, "sending query");

        let response = self
            .http
            .post(endpoint)
            .headers(Self::header_map(headers)?)
            .form(&[("query", text)])
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "query rejected");
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let records = parse_sparql_results(&body)?;
        debug!(
            endpoint,
            rows = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "query answered"
        );
        Ok(records)
    }
}
