use std::time::Duration;

use futures_util::StreamExt;
use ghost_logging::{ghost_debug, ghost_info, ghost_warn};
use ghostwriter_core::{GenerationRequest, UploadPart};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::{FailureKind, GenerationError};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Generation is slow; the whole request may take minutes.
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
            max_response_bytes: 8 * 1024 * 1024,
        }
    }
}

/// What `GET /info` reports about the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    #[serde(default)]
    pub available_models: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: serde_json::Value,
}

#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// Sends every file plus the model id in one request and returns the generated Markdown.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGenerationService {
    settings: ServiceSettings,
}

impl ReqwestGenerationService {
    pub fn new(settings: ServiceSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Health probe against `GET /info`.
    pub async fn info(&self) -> Result<ServiceInfo, GenerationError> {
        let url = self.endpoint("info")?;
        let client = self.build_client()?;
        let response = client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = self.read_body(response).await?;
        if !status.is_success() {
            return Err(GenerationError::new(
                FailureKind::HttpStatus(status.as_u16()),
                error_detail(&body),
            ));
        }
        serde_json::from_slice(&body)
            .map_err(|err| GenerationError::new(FailureKind::InvalidResponse, err.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, GenerationError> {
        let base = self.settings.base_url.trim_end_matches('/');
        reqwest::Url::parse(&format!("{base}/{path}"))
            .map_err(|err| GenerationError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn build_client(&self) -> Result<reqwest::Client, GenerationError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| GenerationError::new(FailureKind::Network, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, GenerationError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(GenerationError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(GenerationError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl GenerationService for ReqwestGenerationService {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        if request.files.is_empty() {
            return Err(GenerationError::new(
                FailureKind::InvalidRequest,
                "no files to send",
            ));
        }
        let url = self.endpoint("generate")?;
        let client = self.build_client()?;
        let form = build_form(request)?;

        ghost_info!(
            "POST {} submission={} files={} model={}",
            url,
            request.submission,
            request.files.len(),
            request.model_id
        );
        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = self.read_body(response).await?;
        if !status.is_success() {
            let detail = error_detail(&body);
            ghost_warn!(
                "Generation service returned {} for submission {}: {}",
                status,
                request.submission,
                detail
            );
            return Err(GenerationError::new(
                FailureKind::HttpStatus(status.as_u16()),
                detail,
            ));
        }

        let parsed: GenerateResponse = serde_json::from_slice(&body)
            .map_err(|err| GenerationError::new(FailureKind::InvalidResponse, err.to_string()))?;
        ghost_debug!(
            "Submission {} produced {} bytes of markdown",
            request.submission,
            parsed.result.len()
        );
        Ok(parsed.result)
    }
}

fn build_form(request: &GenerationRequest) -> Result<Form, GenerationError> {
    let mut form = Form::new();
    for file in &request.files {
        form = form.part("files", build_part(file)?);
    }
    Ok(form.text("model", request.model_id.clone()))
}

fn build_part(file: &UploadPart) -> Result<Part, GenerationError> {
    let part = Part::bytes(file.data.to_vec()).file_name(file.name.clone());
    match file.media_type.as_deref() {
        Some(media_type) => part
            .mime_str(media_type)
            .map_err(|err| GenerationError::new(FailureKind::InvalidRequest, err.to_string())),
        None => Ok(part),
    }
}

/// Best-effort human readable error text from a failed response body.
fn error_detail(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(ErrorResponse { detail }) => detail.to_string(),
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        return GenerationError::new(FailureKind::Timeout, err.to_string());
    }
    GenerationError::new(FailureKind::Network, err.to_string())
}
