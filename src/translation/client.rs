use crate::catalog::language_name;
use crate::translation::endpoint::Endpoint;
use crate::translation::response::{error_from_body, normalize};
use crate::translation::stream::{consume, StreamObserver, StreamOutcome};
use crate::translation::types::{AsyncResult, SubmittedTask, TranslationRequest, UploadedFile};
use crate::translation::upload::UploadPayload;
use crate::utils::{short_id, ApiConfig, ApiError, TranslatorError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Field names the task creation response has used for the task id, in lookup order.
pub const TASK_ID_FIELDS: [&str; 4] = ["async_id", "asyncId", "id", "task_id"];

pub struct TranslationClient {
    client: Client,
    config: ApiConfig,
}

impl TranslationClient {
    pub fn new(config: ApiConfig) -> Result<Self, TranslatorError> {
        // Idle limits only; a total deadline would cut long streams short.
        let limit = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .connect_timeout(limit)
            .read_timeout(limit)
            .build()
            .map_err(|e| TranslatorError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// One-shot call, bounded as a whole by `timeout_seconds`.
    fn post(&self, endpoint: Endpoint, credential: &str) -> reqwest::RequestBuilder {
        self.post_open(endpoint, credential)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
    }

    /// No total deadline; the client's read timeout still applies between chunks.
    fn post_open(&self, endpoint: Endpoint, credential: &str) -> reqwest::RequestBuilder {
        let url = endpoint.url(&self.config);
        debug!(url = %url, ?endpoint, "Sending request");
        endpoint.authorize(self.client.post(url), credential)
    }

    /// Uploads one file for later reference by id. Size and type limits are
    /// the caller's business.
    pub async fn upload_file(
        &self,
        payload: UploadPayload,
        credential: &str,
    ) -> Result<UploadedFile, ApiError> {
        let file_name = payload.name.clone();
        let size = payload.bytes.len();
        let form = Form::new()
            .part("file", Part::bytes(payload.bytes).file_name(payload.name))
            .text("purpose", self.config.upload_purpose.clone());

        let response = self
            .post(Endpoint::Files, credential)
            .multipart(form)
            .send()
            .await?;

        let uploaded: UploadedFile = decode(normalize(response).await?)?;
        info!(
            file_id = %short_id(&uploaded.id),
            file_name = %file_name,
            bytes = size,
            "File uploaded"
        );
        Ok(uploaded)
    }

    /// Creates a document translation task for an uploaded file.
    ///
    /// Language codes are sent as their display names, which is what the
    /// document agent expects.
    pub async fn submit_document_task(
        &self,
        file_id: &str,
        source_lang: &str,
        target_lang: &str,
        credential: &str,
        translate_images: bool,
    ) -> Result<SubmittedTask, ApiError> {
        let body = json!({
            "agent_id": self.config.doc_agent_id,
            "messages": [{
                "role": "user",
                "content": [{ "type": "file_id", "file_id": file_id }]
            }],
            "custom_variables": {
                "from_lang": language_name(source_lang),
                "to_lang": language_name(target_lang),
                "should_translate_image": translate_images
            }
        });

        let response = self
            .post(Endpoint::DocAgent, credential)
            .json(&body)
            .send()
            .await?;

        let result = normalize(response).await?;
        let submitted = submitted_task(&result)?;
        info!(
            async_id = %submitted.remote_async_id,
            status = ?submitted.initial_status,
            "Document translation task created"
        );
        Ok(submitted)
    }

    /// One status query for a document task.
    pub async fn query_result(&self, async_id: &str, credential: &str) -> Result<AsyncResult, ApiError> {
        let response = self
            .post(Endpoint::AsyncResult, credential)
            .json(&json!({
                "async_id": async_id,
                "agent_id": self.config.doc_agent_id,
            }))
            .send()
            .await?;

        decode(normalize(response).await?)
    }

    /// Streams an inline translation into `observer`.
    ///
    /// Every failure, including building or sending the request, ends up in
    /// `observer.on_error`; nothing is returned as an error.
    pub async fn stream_translation<O>(&self, request: &TranslationRequest, observer: &mut O) -> StreamOutcome
    where
        O: StreamObserver + ?Sized,
    {
        let response = match self.open_stream(request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(error = %error, "Streaming translation request failed");
                observer.on_error(error);
                return StreamOutcome::Failed;
            }
        };

        consume(response.bytes_stream(), observer).await
    }

    async fn open_stream(&self, request: &TranslationRequest) -> Result<reqwest::Response, ApiError> {
        if !request.has_input() {
            return Err(ApiError::validation("translation request needs text or a file id"));
        }

        let response = self
            .post_open(Endpoint::StreamAgent, &request.credential)
            .json(&self.stream_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error = match serde_json::from_str::<JsonValue>(&text) {
                Ok(data) => error_from_body(status, &data),
                Err(_) => ApiError::new(
                    i64::from(status.as_u16()),
                    status.canonical_reason().unwrap_or("translation request failed"),
                ),
            };
            return Err(error);
        }

        Ok(response)
    }

    fn stream_body(&self, request: &TranslationRequest) -> JsonValue {
        let mut content = Vec::new();
        if let Some(text) = request.text.as_deref().filter(|t| !t.is_empty()) {
            content.push(json!({ "type": "text", "text": text }));
        }
        if let Some(file_id) = request.file_id.as_deref().filter(|f| !f.is_empty()) {
            content.push(json!({ "type": "file", "file_id": file_id }));
        }

        json!({
            "agent_id": self.config.stream_agent_id,
            "stream": true,
            "messages": [{ "role": "user", "content": content }],
            "custom_variables": {
                "source_lang": request.source_lang,
                "target_lang": request.target_lang,
                "strategy": request.strategy.id()
            }
        })
    }
}

/// Status queries the poll loop depends on.
#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn query_result(&self, async_id: &str, credential: &str) -> Result<AsyncResult, ApiError>;
}

#[async_trait]
impl ResultSource for TranslationClient {
    async fn query_result(&self, async_id: &str, credential: &str) -> Result<AsyncResult, ApiError> {
        TranslationClient::query_result(self, async_id, credential).await
    }
}

fn decode<T: DeserializeOwned>(value: JsonValue) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::validation(format!("unexpected response shape: {}", e)))
}

/// Reads the task id from `data` when present, otherwise from the top level.
pub fn submitted_task(result: &JsonValue) -> Result<SubmittedTask, ApiError> {
    let task = result
        .get("data")
        .filter(|data| data.is_object())
        .unwrap_or(result);

    let remote_async_id = TASK_ID_FIELDS
        .iter()
        .filter_map(|field| task.get(*field))
        .find_map(|value| match value {
            JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| {
            ApiError::validation(format!(
                "failed to create translation task: no task id in response: {}",
                result
            ))
        })?;

    let initial_status = task
        .get("status")
        .and_then(JsonValue::as_str)
        .map(str::to_string);

    Ok(SubmittedTask {
        remote_async_id,
        initial_status,
    })
}
