use indexmap::IndexMap;
use steprail_core::{StepOutput, Value};

use crate::error::StepFault;
use crate::step::{Callable, StepResult};

/// Supplies named step implementations to a pipeline.
///
/// Steps take one value and return an outcome, a `[tag, value]` tuple, or
/// for transform steps any value at all. Lookup happens at call time, so a
/// receiver can be a unit struct, a stateful service or a [`StepTable`].
///
/// ```
/// use serde_json::json;
/// use steprail_core::{DynOutcome, Value};
/// use steprail_pipeline::{Receiver, StepResult};
///
/// struct Doubler;
///
/// impl Receiver for Doubler {
///     fn invoke(&self, step: &str, value: Value) -> Option<StepResult> {
///         match step {
///             "double" => {
///                 let doubled = value.as_i64().unwrap_or_default() * 2;
///                 Some(Ok(DynOutcome::succeed(json!(doubled)).into()))
///             }
///             _ => None,
///         }
///     }
/// }
///
/// assert!(Doubler.invoke("halve", json!(1)).is_none());
/// ```
pub trait Receiver {
    /// Run the step called `step`. Returns `None` when no such step exists.
    fn invoke(&self, step: &str, value: Value) -> Option<StepResult>;
}

impl<R: Receiver + ?Sized> Receiver for &R {
    fn invoke(&self, step: &str, value: Value) -> Option<StepResult> {
        (**self).invoke(step, value)
    }
}

/// A receiver backed by a lookup table of closures.
#[derive(Debug, Clone, Default)]
pub struct StepTable {
    steps: IndexMap<String, Callable>,
}

impl StepTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` under `name`, replacing any earlier step of that name.
    pub fn insert<F, R>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Value) -> Result<R, StepFault> + Send + Sync + 'static,
        R: Into<StepOutput>,
    {
        self.steps.insert(name.into(), Callable::new(f));
        self
    }

    #[must_use]
    pub fn with<F, R>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<R, StepFault> + Send + Sync + 'static,
        R: Into<StepOutput>,
    {
        self.insert(name, f);
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }
}

impl Receiver for StepTable {
    fn invoke(&self, step: &str, value: Value) -> Option<StepResult> {
        self.steps.get(step).map(|callable| callable.call(value))
    }
}
