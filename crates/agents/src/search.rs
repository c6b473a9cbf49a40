//! Web search tool backed by the Serper Google Search API.

use crate::error::{AgentError, Result};
use contentpack_core::SearchConfig;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

const SERVICE: &str = "Serper";

/// One organic search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// A tool that agents can use to look things up on the web.
pub trait SearchTool {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}

/// Serper (google.serper.dev) search client.
pub struct SerperSearch {
    http: Client,
    url: String,
    api_key: String,
    max_results: usize,
}

impl SerperSearch {
    /// Build the tool from configuration; fails when no API key is set.
    pub fn new(config: &SearchConfig, timeout: Duration) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AgentError::MissingCredential("SERPER_API_KEY"))?;

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            url: config.url.clone(),
            api_key,
            max_results: config.max_results,
        })
    }
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SearchResult>,
}

impl SearchTool for SerperSearch {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        log::info!("Searching the web for: {}", query);

        let response = self
            .http
            .post(&self.url)
            .header("X-API-KEY", self.api_key.as_str())
            .json(&SerperRequest {
                q: query,
                num: self.max_results,
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::ApiError {
                service: SERVICE,
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let body: SerperResponse = response.json()?;
        let mut results = body.organic;
        results.truncate(self.max_results);
        log::debug!("Search returned {} results", results.len());
        Ok(results)
    }
}

/// Render search results as a numbered list for a prompt.
pub fn format_results(results: &[SearchResult]) -> String {
    let mut out = String::new();
    for (idx, result) in results.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", idx + 1, result.title.trim());
        if !result.link.is_empty() {
            let _ = writeln!(out, "   Source: {}", result.link.trim());
        }
        if !result.snippet.is_empty() {
            let _ = writeln!(out, "   {}", result.snippet.trim());
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_organic_results() {
        let response: SerperResponse = serde_json::from_value(json!({
            "searchParameters": {"q": "agentic ai"},
            "organic": [
                {"title": "What is agentic AI?", "link": "https://example.com/a", "snippet": "An intro.", "position": 1},
                {"title": "No snippet", "link": "https://example.com/b"}
            ]
        }))
        .unwrap();

        assert_eq!(response.organic.len(), 2);
        assert_eq!(response.organic[1].snippet, "");
    }

    #[test]
    fn test_missing_organic_is_empty() {
        let response: SerperResponse = serde_json::from_value(json!({"answerBox": {}})).unwrap();
        assert!(response.organic.is_empty());
    }

    #[test]
    fn test_format_results() {
        let results = vec![
            SearchResult {
                title: "Agents in production".to_string(),
                link: "https://example.com/a".to_string(),
                snippet: "Teams ship agents.".to_string(),
            },
            SearchResult {
                title: "Bare title".to_string(),
                link: String::new(),
                snippet: String::new(),
            },
        ];

        assert_eq!(
            format_results(&results),
            "1. Agents in production\n   Source: https://example.com/a\n   Teams ship agents.\n2. Bare title"
        );
    }

    #[test]
    fn test_missing_api_key() {
        let err = SerperSearch::new(&SearchConfig::default(), Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::MissingCredential("SERPER_API_KEY")));
    }
}
