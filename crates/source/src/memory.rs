//! In-memory record source for tests and offline runs.

use std::sync::Mutex;

use async_trait::async_trait;
use netbuilder_core::Record;

use crate::source::{RecordSource, SourceError, SourceHeaders};

struct Rule {
    needle: String,
    outcome: Result<Vec<Record>, String>,
}

/// Answers queries from scripted rules.
///
/// The first rule whose needle occurs in the query text wins; queries that
/// match no rule return no rows. Every query text is recorded.
#[derive(Default)]
pub struct MemorySource {
    rules: Vec<Rule>,
    seen: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries containing `needle` with `records`.
    pub fn respond(mut self, needle: &str, records: Vec<Record>) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            outcome: Ok(records),
        });
        self
    }

    /// Fail queries containing `needle`.
    pub fn fail(mut self, needle: &str, message: &str) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            outcome: Err(message.to_string()),
        });
        self
    }

    /// Query texts received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.seen.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn query(
        &self,
        text: &str,
        _endpoint: &str,
        _headers: &SourceHeaders,
    ) -> Result<Vec<Record>, SourceError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(text.to_string());
        }
        match self.rules.iter().find(|r| text.contains(&r.needle)) {
            Some(Rule { outcome: Ok(rows), .. }) => Ok(rows.clone()),
            Some(Rule { outcome: Err(msg), .. }) => Err(SourceError::Http(msg.clone())),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use netbuilder_core::record;

    use super::*;

    #[tokio::test]
    async fn first_matching_rule_answers() {
        let src = MemorySource::new()
            .respond("LINKS", vec![record([("source", "a"), ("target", "b")])])
            .fail("BROKEN", "boom");

        let headers = SourceHeaders::new();
        let rows = src.query("SELECT LINKS", "http://x", &headers).await.unwrap();
        assert_eq!(rows.len(), 1);

        assert!(src.query("BROKEN", "http://x", &headers).await.is_err());
        assert!(src.query("other", "http://x", &headers).await.unwrap().is_empty());
        assert_eq!(src.queries().len(), 3);
    }
}
