use steprail_core::{DynOutcome, Handler, Matcher, Outcome, Value};
use tracing::debug;

use crate::builder::PipelineBuilder;
use crate::error::PipelineError;
use crate::executor::execute;
use crate::receiver::Receiver;
use crate::step::StepDescriptor;
use crate::transaction::TransactionBoundary;

/// A named, reusable entry point over an ordered list of steps.
///
/// Steps and flags are fixed when the pipeline is built; every call folds
/// the same steps over a fresh outcome.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    steps: Vec<StepDescriptor>,
    transactional: bool,
    safe: bool,
}

impl Pipeline {
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(name)
    }

    pub(crate) fn from_parts(
        name: String,
        steps: Vec<StepDescriptor>,
        transactional: bool,
        safe: bool,
    ) -> Self {
        Self {
            name,
            steps,
            transactional,
            safe,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    #[must_use]
    pub fn is_transactional(&self) -> bool {
        self.transactional
    }

    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.safe
    }

    /// Run the pipeline with no transactional resource.
    ///
    /// # Errors
    ///
    /// See [`call_in`](Self::call_in).
    pub fn call<R>(&self, receiver: &R, input: Value) -> Result<DynOutcome, PipelineError>
    where
        R: Receiver + ?Sized,
    {
        self.call_in(&TransactionBoundary::none(), receiver, input)
    }

    /// Run the pipeline against `receiver`.
    ///
    /// A transactional pipeline runs inside `boundary`, which rolls its
    /// resource back when the pipeline ends in a failure. A safe pipeline
    /// turns faults into `fail(message)` before they reach the boundary.
    ///
    /// # Errors
    ///
    /// Returns the [`PipelineError`] raised by a step, unless the pipeline is
    /// safe. Resource failures are returned even in safe mode.
    pub fn call_in<R>(
        &self,
        boundary: &TransactionBoundary,
        receiver: &R,
        input: Value,
    ) -> Result<DynOutcome, PipelineError>
    where
        R: Receiver + ?Sized,
    {
        debug!(
            pipeline = %self.name,
            transactional = self.transactional,
            safe = self.safe,
            "calling pipeline"
        );
        let thunk = move || self.run_steps(receiver, input);

        if self.transactional {
            boundary.run_outcome(thunk)
        } else {
            thunk()
        }
    }

    /// Run the pipeline and hand the outcome to `matcher`.
    ///
    /// # Errors
    ///
    /// See [`call_in`](Self::call_in).
    pub fn call_matching<R, Out, S, F>(
        &self,
        boundary: &TransactionBoundary,
        receiver: &R,
        input: Value,
        matcher: Matcher<S, F>,
    ) -> Result<Out, PipelineError>
    where
        R: Receiver + ?Sized,
        S: Handler<Value, Out>,
        F: Handler<Value, Out>,
    {
        Ok(self.call_in(boundary, receiver, input)?.match_with(matcher))
    }

    fn run_steps<R>(&self, receiver: &R, input: Value) -> Result<DynOutcome, PipelineError>
    where
        R: Receiver + ?Sized,
    {
        match execute(receiver, input, &self.steps) {
            Err(fault) if self.safe => {
                debug!(pipeline = %self.name, error = %fault, "safe mode captured fault");
                Ok(Outcome::fail(Value::String(fault.message())))
            }
            result => result,
        }
    }
}
