use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {operation} while {state}")]
    StateConflict {
        operation: &'static str,
        state: String,
    },

    #[error("class {class_id} is out of range for {num_classes} configured classes")]
    InvalidClass { class_id: usize, num_classes: usize },

    #[error("no samples gathered for: {}", missing.join(", "))]
    InsufficientData { missing: Vec<String> },

    #[error("no trained model to export")]
    NotTrained,

    #[error("invalid model name: {0:?}")]
    InvalidModelName(String),

    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("frame capture failed: {0}")]
    Capture(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("feature extraction failed: {0}")]
    Extract(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("training failed: {0}")]
    Fit(String),

    #[error("export failed: {0}")]
    Export(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("display failed: {0}")]
    Display(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ndarray::ShapeError> for SessionError {
    fn from(error: ndarray::ShapeError) -> Self {
        SessionError::Fit(error.to_string())
    }
}
