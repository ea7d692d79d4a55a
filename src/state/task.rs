use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Success,
    Failed,
}

impl TaskStatus {
    /// Maps a remote status string; anything unrecognised is still in progress.
    pub fn from_remote(status: &str) -> Self {
        let status = status.trim();
        if status.eq_ignore_ascii_case("pending") {
            TaskStatus::Pending
        } else if status.eq_ignore_ascii_case("success") {
            TaskStatus::Success
        } else if status.eq_ignore_ascii_case("failed") {
            TaskStatus::Failed
        } else {
            TaskStatus::Processing
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Processing => write!(f, "processing"),
            TaskStatus::Success => write!(f, "success"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Original,
    Translated,
    Bilingual,
}

impl ArtifactKind {
    /// Total over all tags: anything other than the two known tags is bilingual.
    pub fn from_tag(tag_en: &str) -> Self {
        match tag_en {
            "originalFileUrl" => ArtifactKind::Original,
            "translatedFileUrl" => ArtifactKind::Translated,
            _ => ArtifactKind::Bilingual,
        }
    }
}

/// A downloadable file produced by a finished document task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub url: String,
    pub kind: ArtifactKind,
    pub label: String,
}

/// Local view of one document translation job.
///
/// Once `status` is terminal the task no longer accepts transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocTask {
    pub id: String,
    pub remote_async_id: String,
    pub file_name: String,
    pub status: TaskStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub artifacts: Vec<Artifact>,
    pub error_message: Option<String>,
}

impl DocTask {
    pub fn new(remote_async_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            remote_async_id: remote_async_id.into(),
            file_name: file_name.into(),
            status: TaskStatus::Pending,
            started_at: Utc::now(),
            ended_at: None,
            artifacts: Vec::new(),
            error_message: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Records an in-progress status. Terminal statuses go through
    /// [`DocTask::complete`] and [`DocTask::fail`] so they carry their payload.
    pub fn observe(&mut self, status: TaskStatus) -> bool {
        if self.is_terminal() || status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }

    pub fn complete(&mut self, artifacts: Vec<Artifact>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Success;
        self.artifacts = artifacts;
        self.ended_at = Some(Utc::now());
        true
    }

    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Failed;
        self.error_message = Some(message.into());
        self.ended_at = Some(Utc::now());
        true
    }

    pub fn elapsed_seconds(&self) -> i64 {
        let end = self.ended_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_seconds()
    }
}
