//! IBM watsonx.ai text-generation client.
//!
//! Authenticates by exchanging the API key for an IAM bearer token, then calls
//! the `/ml/v1/text/generation` endpoint. The token is fetched once per client.

use crate::error::{AgentError, Result};
use crate::llm::TextGenerator;
use contentpack_core::{ModelProfile, WatsonxConfig};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::time::Duration;

const SERVICE: &str = "watsonx.ai";
const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Blocking watsonx.ai client.
///
/// Does not derive Debug: it holds the API key and bearer token.
pub struct WatsonxClient {
    http: Client,
    config: WatsonxConfig,
    api_key: String,
    token: OnceCell<String>,
}

impl WatsonxClient {
    /// Build a client from configuration.
    ///
    /// Fails when no API key is configured. With `verify_tls = false` the
    /// client accepts invalid certificates.
    pub fn new(config: WatsonxConfig, timeout: Duration) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AgentError::MissingCredential("WATSONX_APIKEY"))?;

        if !config.verify_tls {
            log::warn!("TLS certificate verification is disabled for watsonx.ai");
        }

        let http = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            config,
            api_key,
            token: OnceCell::new(),
        })
    }

    fn generation_url(&self) -> String {
        format!(
            "{}/ml/v1/text/generation?version={}",
            self.config.url.trim_end_matches('/'),
            self.config.api_version
        )
    }

    fn bearer_token(&self) -> Result<&str> {
        if let Some(token) = self.token.get() {
            return Ok(token.as_str());
        }

        log::debug!("Requesting IAM token from {}", self.config.iam_url);
        let response = self
            .http
            .post(&self.config.iam_url)
            .header("Accept", "application/json")
            .form(&[("grant_type", IAM_GRANT_TYPE), ("apikey", self.api_key.as_str())])
            .send()?;

        let body: IamTokenResponse = check_status(response)?.json()?;
        Ok(self.token.get_or_init(|| body.access_token).as_str())
    }
}

impl TextGenerator for WatsonxClient {
    fn name(&self) -> &str {
        SERVICE
    }

    fn generate(&self, profile: &ModelProfile, prompt: &str) -> Result<String> {
        let token = self.bearer_token()?;
        let request = GenerationRequest::new(profile, prompt, &self.config.project_id);

        log::debug!(
            "Generating with {} (max {} tokens)",
            profile.model_id,
            profile.max_new_tokens
        );
        let response = self
            .http
            .post(self.generation_url())
            .bearer_auth(token)
            .json(&request)
            .send()?;

        let body: GenerationResponse = check_status(response)?.json()?;
        body.into_text()
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(AgentError::ApiError {
        service: SERVICE,
        status: status.as_u16(),
        body,
    })
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model_id: &'a str,
    input: &'a str,
    project_id: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    decoding_method: &'static str,
    max_new_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl<'a> GenerationRequest<'a> {
    fn new(profile: &'a ModelProfile, input: &'a str, project_id: &'a str) -> Self {
        Self {
            model_id: &profile.model_id,
            input,
            project_id,
            parameters: GenerationParameters {
                decoding_method: profile.decoding_method.as_str(),
                max_new_tokens: profile.max_new_tokens,
                temperature: profile.temperature,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    results: Vec<GenerationResult>,
}

#[derive(Debug, Deserialize)]
struct GenerationResult {
    generated_text: String,
}

impl GenerationResponse {
    fn into_text(self) -> Result<String> {
        self.results
            .into_iter()
            .next()
            .map(|r| r.generated_text)
            .ok_or_else(|| AgentError::MalformedResponse {
                service: SERVICE,
                message: "response contained no results".to_string(),
            })
    }
}
