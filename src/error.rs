use thiserror::Error;

/// Errors raised by the trainer, its networks and the export boundary.
#[derive(Debug, Error)]
pub enum DdpgError {
    #[error("{0} optimizer not implemented")]
    UnsupportedOptimizer(String),

    #[error("invalid layer schema {layers:?} for {network} network: at least 3 entries required")]
    InvalidLayerSchema {
        network: &'static str,
        layers: Vec<usize>,
    },

    #[error("{network} network needs {expected} activations, got {actual}")]
    ActivationCount {
        network: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown activation `{0}`")]
    UnknownActivation(String),

    #[error("{name} must lie in (0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f32 },

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("an evaluator and episode values must be supplied together")]
    EvaluatorMismatch,

    #[error("tensor data error: {0}")]
    TensorData(String),

    #[error("record error: {0}")]
    Record(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DdpgError {
    /// Whether this error comes from a malformed configuration. These are
    /// only ever raised while a network or trainer is being built.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOptimizer(_)
                | Self::InvalidLayerSchema { .. }
                | Self::ActivationCount { .. }
                | Self::UnknownActivation(_)
                | Self::OutOfRange { .. }
        )
    }
}

pub type Result<T, E = DdpgError> = std::result::Result<T, E>;
