use std::path::PathBuf;

use steprail_core::InvalidStepResult;
use thiserror::Error;

/// Error raised by a step implementation.
pub type StepFault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fault that aborts a pipeline call instead of producing an outcome.
///
/// Business failures never appear here; they travel as failure outcomes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// A plain step returned something that is neither an outcome nor a
    /// tagged tuple.
    #[error("step '{step}' returned an invalid result")]
    InvalidStepResult {
        step: String,
        #[source]
        source: InvalidStepResult,
    },

    /// The receiver has no step by this name.
    #[error("receiver has no step named '{step}'")]
    UnknownStep { step: String },

    /// A step raised a fault.
    #[error("step '{step}' failed")]
    Step {
        step: String,
        #[source]
        source: StepFault,
    },

    #[error("no pipeline named '{name}' is registered")]
    UnknownPipeline { name: String },

    /// The transactional resource failed on its own account.
    #[error("transactional resource failed")]
    Resource {
        #[source]
        source: StepFault,
    },
}

impl PipelineError {
    /// Message that safe mode turns into a failure payload.
    ///
    /// Faults raised by a step or a resource contribute their own message,
    /// so a step failing with `"Boom"` yields `"Boom"`.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidStepResult { source, .. } => source.to_string(),
            Self::Step { source, .. } | Self::Resource { source } => source.to_string(),
            Self::UnknownStep { .. } | Self::UnknownPipeline { .. } => self.to_string(),
        }
    }
}

/// Error loading pipeline definitions from TOML.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read pipeline config '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pipeline config")]
    Parse(#[from] toml::de::Error),

    #[error("pipeline name cannot be empty")]
    EmptyPipelineName,

    #[error("pipeline '{0}' is defined more than once")]
    DuplicatePipeline(String),

    #[error("pipeline '{0}' has no steps")]
    EmptyPipeline(String),

    #[error("pipeline '{pipeline}' has a step with an empty name")]
    EmptyStepName { pipeline: String },
}
