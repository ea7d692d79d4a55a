pub mod catalog;
pub mod state;
pub mod translation;
pub mod utils;

pub use catalog::{language_name, Strategy};
pub use state::{Artifact, ArtifactKind, DocTask, TaskStatus};
pub use translation::{
    poll, CollectedStream, DocumentJob, DocumentTranslator, PollPolicy, StreamObserver,
    TranslationClient, TranslationRequest, UploadPayload, UploadedFile,
};
pub use utils::{ApiError, AppConfig, ErrorCategory, Result, TranslatorError};
