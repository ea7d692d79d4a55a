use crate::state::{Artifact, TaskStatus};
use crate::translation::client::ResultSource;
use crate::translation::types::AsyncResult;
use crate::utils::{errors::TASK_FAILED_CODE, short_id, ApiError, PollingConfig};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self::new(config.max_attempts, config.interval())
    }
}

/// A task that reached `success`.
#[derive(Debug, Clone)]
pub struct CompletedTask {
    pub result: AsyncResult,
    pub artifacts: Vec<Artifact>,
    pub attempts: u32,
}

/// Queries `async_id` until it succeeds, fails or the attempt budget runs out.
///
/// `on_status` sees every observed status in order, repeats included. Queries
/// are strictly sequential with `policy.interval` between them; no sleep
/// follows the last attempt.
pub async fn poll<S, F>(
    source: &S,
    async_id: &str,
    credential: &str,
    mut on_status: F,
    policy: PollPolicy,
) -> Result<CompletedTask, ApiError>
where
    S: ResultSource + ?Sized,
    F: FnMut(TaskStatus, &AsyncResult),
{
    if async_id.trim().is_empty() || async_id == "undefined" {
        return Err(ApiError::validation(
            "invalid async task id, cannot query translation result",
        ));
    }
    if credential.trim().is_empty() {
        return Err(ApiError::validation("API key must not be empty"));
    }

    info!(
        async_id = %short_id(async_id),
        max_attempts = policy.max_attempts,
        interval_ms = policy.interval.as_millis() as u64,
        "Polling document translation"
    );

    for attempt in 1..=policy.max_attempts {
        let result = source.query_result(async_id, credential).await?;
        let status = result.task_status();
        debug!(async_id = %short_id(async_id), attempt, raw_status = %result.status, %status, "Poll attempt");

        on_status(status, &result);

        match status {
            TaskStatus::Success => {
                let artifacts = result.artifacts();
                info!(async_id = %short_id(async_id), attempt, artifacts = artifacts.len(), "Document translation finished");
                return Ok(CompletedTask {
                    result,
                    artifacts,
                    attempts: attempt,
                });
            }
            TaskStatus::Failed => {
                let message = result
                    .error_message()
                    .unwrap_or("document translation task failed")
                    .to_string();
                warn!(async_id = %short_id(async_id), attempt, error = %message, "Document translation failed");
                return Err(ApiError::new(TASK_FAILED_CODE, message));
            }
            TaskStatus::Pending | TaskStatus::Processing => {
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.interval).await;
                }
            }
        }
    }

    warn!(async_id = %short_id(async_id), attempts = policy.max_attempts, "Polling budget exhausted");
    Err(ApiError::poll_timeout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ArtifactKind;
    use crate::utils::ErrorCategory;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays canned results and counts queries.
    struct Scripted {
        results: Mutex<VecDeque<Result<AsyncResult, ApiError>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn statuses(statuses: &[&str]) -> Self {
            let results = statuses
                .iter()
                .map(|s| Ok(result(json!({ "status": s }))))
                .collect();
            Self {
                results: Mutex::new(results),
                calls: AtomicUsize::new(0),
            }
        }

        fn push(&self, item: Result<AsyncResult, ApiError>) {
            self.results.lock().unwrap().push_back(item);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ResultSource for Scripted {
        async fn query_result(&self, _async_id: &str, _credential: &str) -> Result<AsyncResult, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::new(599, "script exhausted")))
        }
    }

    fn result(value: serde_json::Value) -> AsyncResult {
        serde_json::from_value(value).unwrap()
    }

    fn fast(max_attempts: u32) -> PollPolicy {
        PollPolicy::new(max_attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn stops_at_success_without_spending_budget() {
        let source = Scripted::statuses(&["pending", "processing"]);
        source.push(Ok(result(json!({
            "status": "success",
            "choices": [{ "messages": [{ "content": [
                { "type": "file_url", "file_url": "https://cdn/o", "tag_cn": "原文", "tag_en": "originalFileUrl" },
                { "type": "file_url", "file_url": "https://cdn/t", "tag_cn": "译文", "tag_en": "translatedFileUrl" }
            ] }] }]
        }))));

        let mut seen = Vec::new();
        let done = poll(&source, "async-1", "key", |s, _| seen.push(s), fast(3))
            .await
            .unwrap();

        assert_eq!(seen, vec![TaskStatus::Pending, TaskStatus::Processing, TaskStatus::Success]);
        assert_eq!(source.calls(), 3);
        assert_eq!(done.attempts, 3);
        assert_eq!(done.artifacts.len(), 2);
        assert_eq!(done.artifacts[1].kind, ArtifactKind::Translated);
    }

    #[tokio::test]
    async fn exhausted_budget_is_a_timeout() {
        let source = Scripted::statuses(&["pending", "pending", "pending"]);
        let mut seen = 0;
        let err = poll(&source, "async-1", "key", |_, _| seen += 1, fast(2))
            .await
            .unwrap_err();

        assert_eq!(seen, 2);
        assert_eq!(source.calls(), 2);
        assert_eq!(err.category(), ErrorCategory::Timeout);
        assert_ne!(err.category(), ErrorCategory::ServerError);
    }

    #[tokio::test]
    async fn repeated_statuses_are_all_reported() {
        let source = Scripted::statuses(&["processing", "processing", "processing", "success"]);
        let mut seen = Vec::new();
        poll(&source, "async-1", "key", |s, _| seen.push(s), fast(10))
            .await
            .unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn failed_status_uses_server_message() {
        let source = Scripted::statuses(&["pending"]);
        source.push(Ok(result(json!({ "status": "failed", "error": { "message": "unsupported layout" } }))));

        let err = poll(&source, "async-1", "key", |_, _| {}, fast(5)).await.unwrap_err();
        assert_eq!(err.message(), "unsupported layout");
        assert_eq!(err.category(), ErrorCategory::ServerError);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn failed_status_without_message_gets_generic_text() {
        let source = Scripted::statuses(&["failed"]);
        let err = poll(&source, "async-1", "key", |_, _| {}, fast(5)).await.unwrap_err();
        assert_eq!(err.message(), "document translation task failed");
    }

    #[tokio::test]
    async fn invalid_arguments_fail_before_any_query() {
        let source = Scripted::statuses(&["success"]);
        let mut called = false;

        for (id, key) in [("", "key"), ("undefined", "key"), ("async-1", "")] {
            let err = poll(&source, id, key, |_, _| called = true, fast(3)).await.unwrap_err();
            assert_eq!(err.code(), 400);
        }

        assert!(!called);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn query_error_ends_polling() {
        let source = Scripted::statuses(&["pending"]);
        source.push(Err(ApiError::new(401, "expired key")));

        let mut seen = 0;
        let err = poll(&source, "async-1", "key", |_, _| seen += 1, fast(5)).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert_eq!(seen, 1);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_status_counts_as_in_progress() {
        let source = Scripted::statuses(&["queued", "success"]);
        let mut seen = Vec::new();
        poll(&source, "async-1", "key", |s, r| seen.push((s, r.status.clone())), fast(2))
            .await
            .unwrap();
        assert_eq!(seen[0], (TaskStatus::Processing, "queued".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_between_attempts_but_not_after_the_last() {
        let source = Scripted::statuses(&["pending", "pending", "pending"]);
        let started = tokio::time::Instant::now();
        let err = poll(
            &source,
            "async-1",
            "key",
            |_, _| {},
            PollPolicy::new(3, Duration::from_secs(5)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Timeout);
        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }

    #[test]
    fn default_policy_matches_config_defaults() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 60);
        assert_eq!(policy.interval, Duration::from_secs(5));
    }
}
