use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use steprail_core::{StepOutput, Value};

use crate::error::StepFault;

/// What a step implementation hands back: an output to normalize, or a
/// fault.
pub type StepResult = Result<StepOutput, StepFault>;

/// A step function held directly by the pipeline instead of being looked
/// up on the receiver.
#[derive(Clone)]
pub struct Callable(Arc<dyn Fn(Value) -> StepResult + Send + Sync>);

impl Callable {
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(Value) -> Result<R, StepFault> + Send + Sync + 'static,
        R: Into<StepOutput>,
    {
        Self(Arc::new(move |value: Value| -> StepResult {
            f(value).map(Into::into)
        }))
    }

    /// # Errors
    ///
    /// Returns whatever fault the wrapped function raises.
    pub fn call(&self, value: Value) -> StepResult {
        (self.0)(value)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable(..)")
    }
}

#[derive(Debug, Clone)]
pub enum DispatchTarget {
    /// Looked up on the receiver by name at call time.
    Named(String),
    Callable(Callable),
}

/// A normalized pipeline step.
#[derive(Debug, Clone)]
pub struct StepDescriptor {
    target: DispatchTarget,
    transform_only: bool,
}

impl StepDescriptor {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            target: DispatchTarget::Named(name.into()),
            transform_only: false,
        }
    }

    #[must_use]
    pub fn callable(callable: Callable) -> Self {
        Self {
            target: DispatchTarget::Callable(callable),
            transform_only: false,
        }
    }

    /// Mark the step as transform-only: its return value is always wrapped
    /// as a success and never inspected for an outcome shape.
    #[must_use]
    pub fn transform(mut self) -> Self {
        self.transform_only = true;
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform_only: bool) -> Self {
        self.transform_only = transform_only;
        self
    }

    #[must_use]
    pub fn target(&self) -> &DispatchTarget {
        &self.target
    }

    #[must_use]
    pub fn is_transform_only(&self) -> bool {
        self.transform_only
    }

    /// Name used in logs and errors.
    #[must_use]
    pub fn label(&self) -> &str {
        match &self.target {
            DispatchTarget::Named(name) => name,
            DispatchTarget::Callable(_) => "<callable>",
        }
    }
}

/// Record form of a step declaration, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepSpec {
    pub name: String,
    #[serde(default)]
    pub transform: bool,
}

impl StepSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, transform: bool) -> Self {
        Self {
            name: name.into(),
            transform,
        }
    }
}

/// Every shape a step can be declared in.
#[derive(Debug, Clone)]
pub enum StepDecl {
    Name(String),
    Record(StepSpec),
    Descriptor(StepDescriptor),
    /// Fallback shape: anything that is not a name, a record or a
    /// descriptor is called directly.
    Callable(Callable),
}

impl From<&str> for StepDecl {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for StepDecl {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<StepSpec> for StepDecl {
    fn from(spec: StepSpec) -> Self {
        Self::Record(spec)
    }
}

impl From<StepDescriptor> for StepDecl {
    fn from(descriptor: StepDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

impl From<Callable> for StepDecl {
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}

/// Turn any step declaration into a descriptor. Never fails.
pub fn normalize(decl: impl Into<StepDecl>) -> StepDescriptor {
    match decl.into() {
        StepDecl::Name(name) => StepDescriptor::named(name),
        StepDecl::Record(StepSpec { name, transform }) => {
            StepDescriptor::named(name).with_transform(transform)
        }
        StepDecl::Descriptor(descriptor) => descriptor,
        StepDecl::Callable(callable) => StepDescriptor::callable(callable),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use steprail_core::Outcome;

    use super::*;

    #[test]
    fn bare_name_becomes_plain_named_step() {
        let step = normalize("grind_beans");

        assert!(matches!(step.target(), DispatchTarget::Named(name) if name == "grind_beans"));
        assert!(!step.is_transform_only());
    }

    #[test]
    fn record_keeps_transform_flag() {
        let step = normalize(StepSpec::new("upcase_val", true));

        assert_eq!(step.label(), "upcase_val");
        assert!(step.is_transform_only());
    }

    #[test]
    fn descriptor_passes_through_unchanged() {
        let step = normalize(StepDescriptor::named("serve").transform());

        assert_eq!(step.label(), "serve");
        assert!(step.is_transform_only());
    }

    #[test]
    fn callable_is_held_directly() {
        let step = normalize(Callable::new(|v| {
            Ok(Outcome::<Value, Value>::succeed(json!(v.as_i64().unwrap_or_default() + 1)))
        }));

        assert_eq!(step.label(), "<callable>");
        let DispatchTarget::Callable(callable) = step.target() else {
            panic!("expected a callable target");
        };
        let output = callable.call(json!(1)).expect("callable succeeds");
        assert_eq!(output, StepOutput::Outcome(Outcome::succeed(json!(2))));
    }

    #[test]
    fn record_deserializes_with_default_transform() {
        let spec: StepSpec = toml::from_str(r#"name = "serve""#).expect("parse step");

        assert_eq!(spec, StepSpec::new("serve", false));
    }
}
