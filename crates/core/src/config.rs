//! Pipeline configuration.
//!
//! Every setting the generation step needs is carried in [`PipelineConfig`]
//! and passed explicitly; nothing is read from or written to the process
//! environment here. The CLI layers environment variables and flags on top.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default output directory for all generated artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "content_output";

const DEFAULT_WATSONX_URL: &str = "https://eu-de.ml.cloud.ibm.com";
const DEFAULT_API_VERSION: &str = "2023-05-29";
const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";
const DEFAULT_SERPER_URL: &str = "https://google.serper.dev/search";

const LLAMA_70B: &str = "meta-llama/llama-3-3-70b-instruct";
const MISTRAL_SMALL: &str = "mistralai/mistral-small-3-1-24b-instruct-2503";

/// How the model picks tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodingMethod {
    /// Deterministic output.
    Greedy,
    Sample,
}

impl DecodingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Sample => "sample",
        }
    }
}

/// Model id plus decoding parameters for one class of LLM call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelProfile {
    pub model_id: String,

    #[serde(default = "default_decoding")]
    pub decoding_method: DecodingMethod,

    /// Upper bound on generated tokens.
    pub max_new_tokens: u32,

    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_decoding() -> DecodingMethod {
    DecodingMethod::Greedy
}

impl ModelProfile {
    pub fn new(model_id: impl Into<String>, max_new_tokens: u32) -> Self {
        Self {
            model_id: model_id.into(),
            decoding_method: DecodingMethod::Greedy,
            max_new_tokens,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Connection settings for IBM watsonx.ai.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct WatsonxConfig {
    pub url: String,
    pub api_version: String,
    pub iam_url: String,
    pub project_id: String,

    /// When false, invalid TLS certificates are accepted.
    pub verify_tls: bool,

    pub api_key: Option<String>,
}

impl Default for WatsonxConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WATSONX_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            iam_url: DEFAULT_IAM_URL.to_string(),
            project_id: String::new(),
            verify_tls: false,
            api_key: None,
        }
    }
}

impl fmt::Debug for WatsonxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatsonxConfig")
            .field("url", &self.url)
            .field("api_version", &self.api_version)
            .field("iam_url", &self.iam_url)
            .field("project_id", &self.project_id)
            .field("verify_tls", &self.verify_tls)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Web search tool settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub url: String,
    pub api_key: Option<String>,

    /// Number of organic results fed to the researcher.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERPER_URL.to_string(),
            api_key: None,
            max_results: 8,
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_results", &self.max_results)
            .finish()
    }
}

/// Everything the content pipeline needs to run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,

    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,

    pub watsonx: WatsonxConfig,
    pub search: SearchConfig,

    /// Research and core writing.
    pub main_model: ModelProfile,

    /// Tool planning; kept near-deterministic.
    pub function_calling_model: ModelProfile,

    /// Formatting and editing, with a larger token budget.
    pub formatter_model: ModelProfile,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            request_timeout_secs: 300,
            watsonx: WatsonxConfig::default(),
            search: SearchConfig::default(),
            main_model: ModelProfile::new(LLAMA_70B, 500),
            function_calling_model: ModelProfile::new(MISTRAL_SMALL, 500).with_temperature(0.1),
            formatter_model: ModelProfile::new(LLAMA_70B, 1500),
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Path of a named artifact inside the output directory.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
