pub mod client;
pub mod document;
pub mod endpoint;
pub mod poller;
pub mod response;
pub mod stream;
pub mod types;
pub mod upload;

pub use client::{ResultSource, TranslationClient, TASK_ID_FIELDS};
pub use document::{DocumentJob, DocumentTranslator};
pub use endpoint::{AuthScheme, Endpoint};
pub use poller::{poll, CompletedTask, PollPolicy};
pub use response::{normalize, normalize_body};
pub use stream::{consume, CollectedStream, StreamObserver, StreamOutcome};
pub use types::{AsyncResult, SubmittedTask, TranslationRequest, UploadedFile};
pub use upload::UploadPayload;
