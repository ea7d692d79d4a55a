use crate::catalog::Strategy;
use crate::state::{Artifact, ArtifactKind, TaskStatus};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// The result endpoint sends `null` for lists it has nothing for yet.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Input for one inline (streaming) translation.
///
/// At least one of `text` and `file_id` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: Option<String>,
    pub file_id: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub strategy: Strategy,
    #[serde(skip_serializing, default)]
    pub credential: String,
}

impl TranslationRequest {
    pub fn text(text: impl Into<String>, source_lang: &str, target_lang: &str, credential: &str) -> Self {
        Self {
            text: Some(text.into()),
            file_id: None,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            strategy: Strategy::General,
            credential: credential.to_string(),
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn has_input(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().map(|s| !s.is_empty()).unwrap_or(false);
        present(&self.text) || present(&self.file_id)
    }
}

/// Handle for a file accepted by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    #[serde(rename = "filename", default)]
    pub name: String,
    #[serde(rename = "bytes", default)]
    pub byte_size: u64,
}

/// Result of creating a document translation task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTask {
    pub remote_async_id: String,
    pub initial_status: Option<String>,
}

/// Body of `agents/async-result`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AsyncResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<ResultChoice>,
    #[serde(default)]
    pub error: Option<RemoteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultChoice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<ResultMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub item_type: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub tag_cn: Option<String>,
    #[serde(default)]
    pub tag_en: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteError {
    #[serde(default)]
    pub code: Option<JsonValue>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AsyncResult {
    pub fn task_status(&self) -> TaskStatus {
        TaskStatus::from_remote(&self.status)
    }

    /// Download artifacts from the first message of the first choice, in order.
    pub fn artifacts(&self) -> Vec<Artifact> {
        let Some(message) = self.choices.first().and_then(|c| c.messages.first()) else {
            return Vec::new();
        };

        message
            .content
            .iter()
            .filter(|item| item.item_type == "file_url")
            .map(|item| Artifact {
                url: item.file_url.clone().unwrap_or_default(),
                kind: ArtifactKind::from_tag(item.tag_en.as_deref().unwrap_or_default()),
                label: item.tag_cn.clone().unwrap_or_default(),
            })
            .collect()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.message.as_deref())
            .filter(|m| !m.is_empty())
    }
}
