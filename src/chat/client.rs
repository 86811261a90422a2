//! Blocking HTTP suggestion client.
//!
//! Posts the question and the current table schemas as JSON and recovers the
//! reply through the defensive response parser. No retries, no streaming.

use crate::chat::suggestion::{parse_suggestion, Suggestion};
use crate::chat::{SuggestionError, SuggestionService, TableSchema};
use std::time::Duration;

/// Suggestion service client (blocking).
#[derive(Clone)]
pub struct HttpSuggestionService {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpSuggestionService {
    /// Creates a client for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("gridquery/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");
        HttpSuggestionService {
            http,
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Attaches a bearer token to every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl SuggestionService for HttpSuggestionService {
    fn suggest(
        &self,
        question: &str,
        tables: &[TableSchema],
    ) -> Result<Suggestion, SuggestionError> {
        let payload = serde_json::json!({
            "question": question,
            "tables": tables,
        });
        let mut request = self.http.post(&self.endpoint).json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }
        let response = request.send()?.error_for_status()?;
        let text = response.text()?;
        Ok(parse_suggestion(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::suggest_or_degraded;

    #[test]
    fn unreachable_endpoint_degrades() {
        // Port 9 (discard) is not listening; the request fails immediately
        let service = HttpSuggestionService::new("http://127.0.0.1:9/suggest");
        let suggestion = suggest_or_degraded(&service, "anything?", &[]);
        assert_eq!(suggestion.query, "");
        assert!(suggestion.explanation.contains("unavailable"));
    }
}
