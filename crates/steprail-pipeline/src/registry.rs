use std::sync::Arc;

use indexmap::IndexMap;
use steprail_core::{DynOutcome, Handler, Matcher, Value};
use tracing::debug;

use crate::builder::PipelineBuilder;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::receiver::Receiver;
use crate::transaction::TransactionBoundary;

/// Named pipeline entry points sharing one transaction boundary.
///
/// Registering a pipeline under an existing name replaces the earlier
/// definition; steps never accumulate across definitions.
#[derive(Debug, Default)]
pub struct Registry {
    pipelines: IndexMap<String, Arc<Pipeline>>,
    boundary: TransactionBoundary,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_boundary(boundary: TransactionBoundary) -> Self {
        Self {
            pipelines: IndexMap::new(),
            boundary,
        }
    }

    #[must_use]
    pub fn boundary(&self) -> &TransactionBoundary {
        &self.boundary
    }

    pub fn set_boundary(&mut self, boundary: TransactionBoundary) {
        self.boundary = boundary;
    }

    /// Register `pipeline`, returning the definition it replaced.
    pub fn register(&mut self, pipeline: Pipeline) -> Option<Arc<Pipeline>> {
        let name = pipeline.name().to_string();
        let previous = self.pipelines.insert(name, Arc::new(pipeline));
        if let Some(previous) = &previous {
            debug!(pipeline = previous.name(), "replaced pipeline definition");
        }
        previous
    }

    /// Build a pipeline named `name` from `configure` and register it.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        configure: impl FnOnce(PipelineBuilder) -> PipelineBuilder,
    ) -> Option<Arc<Pipeline>> {
        let pipeline = configure(PipelineBuilder::new(name)).build();
        self.register(pipeline)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Pipeline>> {
        self.pipelines.get(name)
    }

    /// Names in the order they were first registered.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pipelines.keys().map(String::as_str)
    }

    pub fn pipelines(&self) -> impl Iterator<Item = &Pipeline> {
        self.pipelines.values().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Call the pipeline registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownPipeline`] for an unregistered name,
    /// otherwise whatever the pipeline call returns.
    pub fn call<R>(
        &self,
        name: &str,
        receiver: &R,
        input: Value,
    ) -> Result<DynOutcome, PipelineError>
    where
        R: Receiver + ?Sized,
    {
        self.lookup(name)?.call_in(&self.boundary, receiver, input)
    }

    /// # Errors
    ///
    /// As [`call`](Self::call).
    pub fn call_matching<R, Out, S, F>(
        &self,
        name: &str,
        receiver: &R,
        input: Value,
        matcher: Matcher<S, F>,
    ) -> Result<Out, PipelineError>
    where
        R: Receiver + ?Sized,
        S: Handler<Value, Out>,
        F: Handler<Value, Out>,
    {
        self.lookup(name)?
            .call_matching(&self.boundary, receiver, input, matcher)
    }

    fn lookup(&self, name: &str) -> Result<&Pipeline, PipelineError> {
        self.pipelines
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| PipelineError::UnknownPipeline {
                name: name.to_string(),
            })
    }
}
