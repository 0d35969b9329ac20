//! HTTP embedding provider
//!
//! Talks to any OpenAI-compatible `/embeddings` endpoint (OpenAI, Ollama,
//! vLLM, LM Studio). Failures are reported as encoding errors and are not
//! retried.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::EmbeddingConfig;
use crate::error::{DsError, Result};
use crate::search::embeddings::{Embedder, ensure_encodable};

const USER_AGENT: &str = concat!("dvds/", env!("CARGO_PKG_VERSION"));

/// Blocking client for an OpenAI-compatible embeddings endpoint.
pub struct ApiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dims: usize,
    api_key: Option<String>,
}

impl std::fmt::Debug for ApiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEmbedder")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("dims", &self.dims)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

impl ApiEmbedder {
    /// Create a client for `{base_url}/embeddings`.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        dims: usize,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(DsError::Config("embedding.api_model is empty".to_string()));
        }
        if base_url.trim().is_empty() {
            return Err(DsError::Config("embedding.api_url is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| DsError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model,
            dims,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Create a client from the `[embedding]` config section.
    ///
    /// The API key is read from the environment variable named by
    /// `api_key_env`; a missing variable means no `Authorization` header.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());
        if api_key.is_none() {
            tracing::debug!(
                api_key_env = ?config.api_key_env,
                "no embedding API key set; sending unauthenticated requests"
            );
        }

        Self::new(
            &config.api_url,
            config.api_model.clone(),
            config.dims as usize,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Endpoint URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Embedder for ApiEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        ensure_encodable(text)?;

        let body = EmbeddingRequest {
            model: &self.model,
            input: [text],
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|err| DsError::Encoding(format!("embedding request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(DsError::Encoding(format!(
                "embedding endpoint returned HTTP {status}: {}",
                detail.chars().take(200).collect::<String>()
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|err| DsError::Encoding(format!("invalid embedding response: {err}")))?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|datum| datum.embedding)
            .ok_or_else(|| DsError::Encoding("embedding response had no data".to_string()))?;

        if embedding.len() != self.dims {
            return Err(DsError::Encoding(format!(
                "model {} returned {} dims, expected {}",
                self.model,
                embedding.len(),
                self.dims
            )));
        }

        Ok(embedding)
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "api"
    }
}
