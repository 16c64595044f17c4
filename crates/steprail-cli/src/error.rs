use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load pipeline configuration")]
    Config(#[from] steprail_pipeline::ConfigError),

    #[error("pipeline run failed")]
    Pipeline(#[from] steprail_pipeline::PipelineError),

    #[error("failed to write output")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use steprail_pipeline::{ConfigError, PipelineError};

    use super::CliError;

    #[test]
    fn config_error_converts_via_from() {
        let cli_err: CliError = ConfigError::EmptyPipelineName.into();

        assert!(matches!(cli_err, CliError::Config(_)));
    }

    #[test]
    fn pipeline_error_has_source_chain() {
        let cli_err: CliError = PipelineError::UnknownPipeline {
            name: String::from("brew"),
        }
        .into();

        let source = std::error::Error::source(&cli_err).expect("has a source");

        assert!(source.to_string().contains("brew"));
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");

        let cli_err: CliError = io_err.into();

        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
