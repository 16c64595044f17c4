use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::PipelineBuilder;
use crate::error::ConfigError;
use crate::pipeline::Pipeline;
use crate::registry::Registry;
use crate::step::{StepDecl, StepSpec};
use crate::transaction::TransactionBoundary;

/// Pipeline definitions read from TOML.
///
/// ```toml
/// [[pipeline]]
/// name = "brew"
/// transactional = true
/// steps = ["grind_beans", { name = "describe", transform = true }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default, rename = "pipeline")]
    pub pipelines: Vec<PipelineEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineEntry {
    pub name: String,
    #[serde(default)]
    pub transactional: bool,
    #[serde(default)]
    pub safe: bool,
    pub steps: Vec<StepEntry>,
}

/// A step is written either as a bare name or as a `{ name, transform }`
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepEntry {
    Name(String),
    Record(StepSpec),
}

impl StepEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Record(spec) => &spec.name,
        }
    }

    #[must_use]
    pub fn is_transform(&self) -> bool {
        matches!(self, Self::Record(StepSpec { transform: true, .. }))
    }
}

impl From<StepEntry> for StepDecl {
    fn from(entry: StepEntry) -> Self {
        match entry {
            StepEntry::Name(name) => Self::Name(name),
            StepEntry::Record(spec) => Self::Record(spec),
        }
    }
}

impl PipelineEntry {
    #[must_use]
    pub fn build(&self) -> Pipeline {
        self.steps
            .iter()
            .cloned()
            .fold(
                PipelineBuilder::new(self.name.clone())
                    .transactional(self.transactional)
                    .safe(self.safe),
                |builder, step| builder.step(step),
            )
            .build()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyPipelineName);
        }
        if self.steps.is_empty() {
            return Err(ConfigError::EmptyPipeline(self.name.clone()));
        }
        if self.steps.iter().any(|step| step.name().trim().is_empty()) {
            return Err(ConfigError::EmptyStepName {
                pipeline: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// a validation error for empty names, empty step lists or a pipeline
    /// name used twice.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// # Errors
    ///
    /// Returns the first problem found, in document order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.pipelines {
            entry.validate()?;
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::DuplicatePipeline(entry.name.clone()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn build_pipelines(&self) -> Vec<Pipeline> {
        self.pipelines.iter().map(PipelineEntry::build).collect()
    }

    #[must_use]
    pub fn into_registry(self, boundary: TransactionBoundary) -> Registry {
        let mut registry = Registry::with_boundary(boundary);
        for pipeline in self.build_pipelines() {
            registry.register(pipeline);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BREW: &str = r#"
[[pipeline]]
name = "brew"
transactional = true
steps = ["grind_beans", "brew_coffee", { name = "describe", transform = true }]

[[pipeline]]
name = "shout"
safe = true
steps = [{ name = "upcase" }]
"#;

    #[test]
    fn parses_names_and_records() {
        let config = PipelineConfig::from_toml_str(BREW).expect("valid config");

        assert_eq!(config.pipelines.len(), 2);
        let brew = &config.pipelines[0];
        assert!(brew.transactional);
        assert!(!brew.safe);
        assert_eq!(brew.steps[0], StepEntry::Name(String::from("grind_beans")));
        assert_eq!(
            brew.steps[2],
            StepEntry::Record(StepSpec::new("describe", true))
        );
        assert!(!config.pipelines[1].steps[0].is_transform());
    }

    #[test]
    fn builds_pipelines_with_flags_and_transform_steps() {
        let pipelines = PipelineConfig::from_toml_str(BREW)
            .expect("valid config")
            .build_pipelines();

        let brew = &pipelines[0];
        assert_eq!(brew.name(), "brew");
        assert!(brew.is_transactional());
        let transforms: Vec<_> = brew.steps().iter().map(|s| s.is_transform_only()).collect();
        assert_eq!(transforms, vec![false, false, true]);
        assert!(pipelines[1].is_safe());
    }

    #[test]
    fn registry_keeps_document_order() {
        let registry = PipelineConfig::from_toml_str(BREW)
            .expect("valid config")
            .into_registry(TransactionBoundary::none());

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["brew", "shout"]);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = PipelineConfig::from_toml_str(
            r#"
[[pipeline]]
name = "x"
steps = ["a"]
retries = 3
"#,
        )
        .expect_err("unknown key");

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_duplicate_pipeline_names() {
        let err = PipelineConfig::from_toml_str(
            r#"
[[pipeline]]
name = "x"
steps = ["a"]

[[pipeline]]
name = "x"
steps = ["b"]
"#,
        )
        .expect_err("duplicate name");

        assert!(matches!(err, ConfigError::DuplicatePipeline(ref name) if name == "x"));
    }

    #[test]
    fn rejects_empty_step_lists_and_names() {
        let empty = PipelineConfig::from_toml_str("[[pipeline]]\nname = \"x\"\nsteps = []\n")
            .expect_err("no steps");
        let blank = PipelineConfig::from_toml_str("[[pipeline]]\nname = \"x\"\nsteps = [\" \"]\n")
            .expect_err("blank step");
        let unnamed = PipelineConfig::from_toml_str("[[pipeline]]\nname = \"\"\nsteps = [\"a\"]\n")
            .expect_err("blank pipeline name");

        assert!(matches!(empty, ConfigError::EmptyPipeline(_)));
        assert!(matches!(blank, ConfigError::EmptyStepName { .. }));
        assert!(matches!(unnamed, ConfigError::EmptyPipelineName));
    }

    #[test]
    fn empty_document_is_an_empty_config() {
        let config = PipelineConfig::from_toml_str("").expect("empty is valid");

        assert!(config.pipelines.is_empty());
    }
}
