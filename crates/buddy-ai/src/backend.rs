use crate::AiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// A text-generation service reachable over the network.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Runs one prompt to completion and returns the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;

    /// Reachability check. Never errors: any failure reads as `false`.
    async fn probe(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct OllamaRuntime {
    pub base_url: Url,
    pub model: String,
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Clone)]
pub struct OllamaBackend {
    http: reqwest::Client,
    generate_url: Url,
    tags_url: Url,
    model: String,
    probe_timeout: Duration,
}

impl OllamaBackend {
    pub fn new(runtime: &OllamaRuntime) -> Result<Self, AiError> {
        Ok(Self {
            http: reqwest::Client::new(),
            generate_url: endpoint(&runtime.base_url, "api/generate")?,
            tags_url: endpoint(&runtime.base_url, "api/tags")?,
            model: runtime.model.clone(),
            probe_timeout: runtime.probe_timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Names of the models the server has pulled locally.
    pub async fn available_models(&self) -> Result<Vec<String>, AiError> {
        let response = self
            .http
            .get(self.tags_url.clone())
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(classify_send_error)?;
        let response = ensure_success(response)?;

        let tags: TagsResponse = response.json().await?;
        let mut models: Vec<String> = tags.models.into_iter().map(|entry| entry.name).collect();
        models.sort();
        Ok(models)
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "requesting generation");

        let response = self
            .http
            .post(self.generate_url.clone())
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(classify_send_error)?;
        let response = ensure_success(response)?;

        let body: GenerateResponse = response.json().await?;
        Ok(body.response.unwrap_or_default())
    }

    async fn probe(&self) -> bool {
        match self
            .http
            .get(self.tags_url.clone())
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "generation endpoint probe rejected");
                false
            }
            Err(err) => {
                tracing::warn!("generation endpoint probe failed: {err}");
                false
            }
        }
    }
}

fn endpoint(base: &Url, path: &str) -> Result<Url, AiError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|err| AiError::Config(format!("cannot build `{path}` endpoint: {err}")))
}

fn classify_send_error(err: reqwest::Error) -> AiError {
    if err.is_connect() {
        AiError::Unreachable(err.to_string())
    } else {
        AiError::Http(err)
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(AiError::Remote {
        status: status.as_u16(),
        message: status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    })
}
