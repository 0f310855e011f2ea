// Translation job model and worker

pub mod jobs;
pub mod workers;

pub use jobs::{JobStatus, StatusUpdate, TranslationInputs, TranslationJob};
pub use workers::TranslationWorker;
