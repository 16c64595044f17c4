use steprail_core::{StepOutput, Value};

use crate::error::StepFault;
use crate::pipeline::Pipeline;
use crate::step::{Callable, StepDecl, StepDescriptor, normalize};

/// Ordered step declarations collected while defining a pipeline.
#[derive(Debug, Clone, Default)]
pub struct StepList {
    steps: Vec<StepDescriptor>,
}

impl StepList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step whose return value is an outcome or a tagged tuple.
    ///
    /// A record or descriptor keeps its own transform flag.
    pub fn step(&mut self, decl: impl Into<StepDecl>) -> &mut Self {
        self.steps.push(normalize(decl));
        self
    }

    /// Add a step whose return value is always wrapped as a success.
    pub fn transform_step(&mut self, decl: impl Into<StepDecl>) -> &mut Self {
        self.steps.push(normalize(decl).transform());
        self
    }

    pub fn step_fn<F, R>(&mut self, f: F) -> &mut Self
    where
        F: Fn(Value) -> Result<R, StepFault> + Send + Sync + 'static,
        R: Into<StepOutput>,
    {
        self.step(Callable::new(f))
    }

    pub fn transform_fn<F, R>(&mut self, f: F) -> &mut Self
    where
        F: Fn(Value) -> Result<R, StepFault> + Send + Sync + 'static,
        R: Into<StepOutput>,
    {
        self.transform_step(Callable::new(f))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn into_steps(self) -> Vec<StepDescriptor> {
        self.steps
    }
}

/// Builder for a [`Pipeline`].
///
/// Steps can be chained on the builder or declared in a block with
/// [`define`](Self::define); both append in order.
///
/// ```
/// use steprail_pipeline::Pipeline;
///
/// let pipeline = Pipeline::builder("brew")
///     .transactional(true)
///     .define(|steps| {
///         steps.step("grind_beans").step("brew_coffee");
///         steps.transform_step("describe");
///     })
///     .build();
///
/// assert_eq!(pipeline.steps().len(), 3);
/// assert!(pipeline.steps()[2].is_transform_only());
/// ```
#[derive(Debug)]
#[must_use]
pub struct PipelineBuilder {
    name: String,
    steps: StepList,
    transactional: bool,
    safe: bool,
}

impl PipelineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: StepList::new(),
            transactional: false,
            safe: false,
        }
    }

    /// Run every call inside the transaction boundary it is called with.
    pub fn transactional(mut self, transactional: bool) -> Self {
        self.transactional = transactional;
        self
    }

    /// Convert faults raised during a call into failure outcomes.
    pub fn safe(mut self, safe: bool) -> Self {
        self.safe = safe;
        self
    }

    pub fn step(mut self, decl: impl Into<StepDecl>) -> Self {
        self.steps.step(decl);
        self
    }

    pub fn transform_step(mut self, decl: impl Into<StepDecl>) -> Self {
        self.steps.transform_step(decl);
        self
    }

    pub fn step_fn<F, R>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<R, StepFault> + Send + Sync + 'static,
        R: Into<StepOutput>,
    {
        self.steps.step_fn(f);
        self
    }

    pub fn transform_fn<F, R>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<R, StepFault> + Send + Sync + 'static,
        R: Into<StepOutput>,
    {
        self.steps.transform_fn(f);
        self
    }

    /// Declare steps in a block. The block runs once, right away.
    pub fn define(mut self, block: impl FnOnce(&mut StepList)) -> Self {
        block(&mut self.steps);
        self
    }

    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline::from_parts(
            self.name,
            self.steps.into_steps(),
            self.transactional,
            self.safe,
        )
    }
}
