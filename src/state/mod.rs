pub mod task;

pub use task::{Artifact, ArtifactKind, DocTask, TaskStatus};
