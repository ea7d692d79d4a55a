use crate::state::DocTask;
use crate::translation::client::TranslationClient;
use crate::translation::poller::{poll, PollPolicy};
use crate::translation::upload::UploadPayload;
use crate::utils::ApiError;
use tracing::info;

/// Languages and options for one document job.
#[derive(Debug, Clone)]
pub struct DocumentJob {
    pub source_lang: String,
    pub target_lang: String,
    pub translate_images: bool,
}

/// Upload, submit and poll for a single document.
pub struct DocumentTranslator<'a> {
    client: &'a TranslationClient,
    policy: PollPolicy,
}

impl<'a> DocumentTranslator<'a> {
    pub fn new(client: &'a TranslationClient, policy: PollPolicy) -> Self {
        Self { client, policy }
    }

    /// Runs the whole job. `on_update` receives the task after every change,
    /// starting with the freshly submitted `Pending` task and ending with the
    /// terminal one, so a caller can keep its own task list.
    ///
    /// Upload and submission failures happen before a task exists and are
    /// only returned. Polling failures are recorded on the task first.
    pub async fn translate<F>(
        &self,
        payload: UploadPayload,
        job: &DocumentJob,
        credential: &str,
        mut on_update: F,
    ) -> Result<DocTask, ApiError>
    where
        F: FnMut(&DocTask),
    {
        let file_name = payload.name.clone();
        let uploaded = self.client.upload_file(payload, credential).await?;

        let submitted = self
            .client
            .submit_document_task(
                &uploaded.id,
                &job.source_lang,
                &job.target_lang,
                credential,
                job.translate_images,
            )
            .await?;

        let async_id = submitted.remote_async_id.clone();
        let mut task = DocTask::new(submitted.remote_async_id, file_name);
        on_update(&task);

        let outcome = poll(
            self.client,
            &async_id,
            credential,
            |status, _| {
                if task.observe(status) {
                    on_update(&task);
                }
            },
            self.policy,
        )
        .await;

        match outcome {
            Ok(done) => {
                task.complete(done.artifacts);
                on_update(&task);
                info!(task_id = %task.id, elapsed_seconds = task.elapsed_seconds(), "Document task succeeded");
                Ok(task)
            }
            Err(error) => {
                task.fail(error.message());
                on_update(&task);
                Err(error)
            }
        }
    }
}
