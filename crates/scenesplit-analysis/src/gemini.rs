//! Gemini Files API client for scene cut detection.
//!
//! The source video is uploaded with the resumable upload protocol, polled
//! until the file is `ACTIVE`, then referenced from a `generateContent` call
//! that is constrained to a JSON schema holding a list of cut times.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use scenesplit_models::{AnalysisJob, AnalysisState, CutTimestamp, RemoteHandle};

use crate::error::{AnalysisError, AnalysisResult};
use crate::service::AnalysisService;

/// Default Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used for scene analysis.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Instructions sent alongside the video.
pub const DEFAULT_INSTRUCTIONS: &str = "\
Analyze this video. Return a list of timestamps (in seconds) where a cut should happen.
A cut must happen when:
- The main subject or person in the frame changes.
- The background or location changes (e.g., indoor to outdoor).
- There is a sudden, significant visual change.";

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key, sent as `x-goog-api-key`
    pub api_key: String,
    /// Model name for `generateContent`
    pub model: String,
    /// Endpoint root, without trailing slash
    pub base_url: String,
    /// Request timeout (uploads included)
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> AnalysisResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AnalysisError::config("GEMINI_API_KEY environment variable not set"))?;

        if api_key.trim().is_empty() {
            return Err(AnalysisError::config("GEMINI_API_KEY cannot be empty"));
        }

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config = config.with_model(model);
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        config.timeout = Duration::from_secs(
            std::env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
        );
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileResource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<FileError>,
}

#[derive(Debug, Deserialize)]
struct FileError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Structured answer requested from the model.
#[derive(Debug, Deserialize)]
struct SceneCuts {
    cut_timestamps_seconds: Vec<f64>,
}

/// Response schema matching [`SceneCuts`].
fn scene_cuts_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "cut_timestamps_seconds": {
                "type": "ARRAY",
                "items": { "type": "NUMBER" }
            }
        },
        "required": ["cut_timestamps_seconds"]
    })
}

// =============================================================================
// Client
// =============================================================================

/// Gemini Files API client.
#[derive(Clone)]
pub struct GeminiFilesClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiFilesClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> AnalysisResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("scenesplit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalysisError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/v1beta/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn fetch_file(&self, handle: &RemoteHandle) -> AnalysisResult<FileResource> {
        let response = self
            .http
            .get(self.api_url(handle.as_str()))
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| AnalysisError::transport(format!("File status request failed: {}", e)))?;

        let response = ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|e| AnalysisError::invalid_response(format!("Failed to parse file status: {}", e)))
    }
}

#[async_trait]
impl AnalysisService for GeminiFilesClient {
    async fn upload(&self, path: &Path) -> AnalysisResult<AnalysisJob> {
        let size = tokio::fs::metadata(path).await?.len();
        let mime_type = mime_type_for(path);
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string());

        info!(
            path = %path.display(),
            size_mb = size as f64 / (1024.0 * 1024.0),
            "Uploading video to Gemini"
        );

        let start_url = format!(
            "{}/upload/v1beta/files",
            self.config.base_url.trim_end_matches('/')
        );
        let start = self
            .http
            .post(&start_url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&json!({ "file": { "display_name": display_name } }))
            .send()
            .await
            .map_err(|e| AnalysisError::upload(format!("Upload session request failed: {}", e)))?;

        let start = ensure_success(start)
            .await
            .map_err(|e| AnalysisError::upload(e.to_string()))?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| AnalysisError::upload("Upload session returned no upload URL"))?;

        // Stream the file instead of buffering it.
        let file = tokio::fs::File::open(path).await?;

        let finalize = self
            .http
            .post(&upload_url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header(CONTENT_LENGTH, size)
            .body(Body::from(file))
            .send()
            .await
            .map_err(|e| AnalysisError::upload(format!("Upload failed: {}", e)))?;

        let finalize = ensure_success(finalize)
            .await
            .map_err(|e| AnalysisError::upload(e.to_string()))?;

        let uploaded: UploadResponse = finalize
            .json()
            .await
            .map_err(|e| AnalysisError::upload(format!("Failed to parse upload response: {}", e)))?;

        let file = uploaded.file;
        let state = map_file_state(file.state.as_deref());
        info!(handle = %file.name, state = %state, "Video uploaded");

        Ok(AnalysisJob::new(
            RemoteHandle::new(file.name),
            file.uri,
            file.mime_type.unwrap_or_else(|| mime_type.to_string()),
            state,
        ))
    }

    async fn get_status(&self, job: &AnalysisJob) -> AnalysisResult<AnalysisState> {
        let file = self.fetch_file(&job.handle).await?;
        let state = map_file_state(file.state.as_deref());
        if state == AnalysisState::Failed {
            if let Some(error) = file.error {
                warn!(handle = %job.handle, "Gemini reported file failure: {}", error.message);
            }
        }
        Ok(state)
    }

    async fn analyze(
        &self,
        job: &AnalysisJob,
        instructions: &str,
    ) -> AnalysisResult<Vec<CutTimestamp>> {
        let url = self.api_url(&format!("models/{}:generateContent", self.config.model));

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        file_data: Some(FileData {
                            mime_type: job.mime_type.clone(),
                            file_uri: job.file_uri.clone(),
                        }),
                        text: None,
                    },
                    Part {
                        file_data: None,
                        text: Some(instructions.to_string()),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: scene_cuts_schema(),
            },
        };

        info!(handle = %job.handle, model = %self.config.model, "Requesting scene cuts");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::transport(format!("Gemini API request failed: {}", e)))?;

        let response = ensure_success(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::transport(format!("Failed to read Gemini response: {}", e)))?;

        let text = match serde_json::from_str::<GenerateResponse>(&body) {
            Ok(parsed) => parsed
                .candidates
                .into_iter()
                .filter_map(|c| c.content)
                .flat_map(|c| c.parts)
                .find_map(|p| p.text),
            Err(e) => {
                warn!("Malformed Gemini response envelope: {}", e);
                None
            }
        };

        match text {
            Some(text) => Ok(parse_cut_timestamps(&text)),
            None => {
                warn!(handle = %job.handle, "Gemini response had no content");
                Ok(Vec::new())
            }
        }
    }

    async fn release(&self, job: &AnalysisJob) -> AnalysisResult<()> {
        let response = self
            .http
            .delete(self.api_url(job.handle.as_str()))
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| AnalysisError::transport(format!("Delete request failed: {}", e)))?;

        ensure_success(response).await?;
        debug!(handle = %job.handle, "Deleted remote file");
        Ok(())
    }
}

/// Turn a non-success response into a transport error.
async fn ensure_success(response: Response) -> AnalysisResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AnalysisError::from_http_status(status.as_u16(), &body))
}

/// Map a Files API state string onto the job state machine.
fn map_file_state(state: Option<&str>) -> AnalysisState {
    match state {
        Some("PROCESSING") => AnalysisState::Processing,
        Some("ACTIVE") => AnalysisState::Ready,
        Some("FAILED") => AnalysisState::Failed,
        _ => AnalysisState::Uploaded,
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        _ => "video/mp4",
    }
}

/// Parse the model's structured answer into raw cut candidates.
///
/// Parsing is strict: anything that is not an object with a numeric
/// `cut_timestamps_seconds` array yields an empty list.
pub fn parse_cut_timestamps(text: &str) -> Vec<CutTimestamp> {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text).trim();

    if text.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<SceneCuts>(text) {
        Ok(cuts) => cuts.cut_timestamps_seconds,
        Err(e) => {
            warn!("Malformed scene cut payload, treating as no scenes: {}", e);
            Vec::new()
        }
    }
}
