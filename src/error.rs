use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Worker thread for label '{label}' panicked before reporting its instance")]
    WorkerPanicked { label: String },

    #[error("Race needs at least one label to construct the singleton with")]
    EmptyRace,
}

impl PatternError {
    pub fn worker_panicked(label: impl Into<String>) -> Self {
        Self::WorkerPanicked {
            label: label.into(),
        }
    }
}
