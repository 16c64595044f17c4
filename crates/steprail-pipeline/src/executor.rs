use steprail_core::{DynOutcome, Outcome, Value};
use tracing::debug;

use crate::error::PipelineError;
use crate::receiver::Receiver;
use crate::step::{DispatchTarget, StepDescriptor};

/// Fold `steps` over `succeed(input)`, left to right.
///
/// Each step receives the previous success payload. The first failure
/// outcome ends the fold and is returned as is; no later step runs.
///
/// # Errors
///
/// Returns a [`PipelineError`] when a step raises a fault, names a step the
/// receiver does not have, or returns a value that has no outcome shape.
pub fn execute<R>(
    receiver: &R,
    input: Value,
    steps: &[StepDescriptor],
) -> Result<DynOutcome, PipelineError>
where
    R: Receiver + ?Sized,
{
    let mut current = Outcome::succeed(input);

    for (index, step) in steps.iter().enumerate() {
        let value = match current {
            Outcome::Success(value) => value,
            Outcome::Failure(_) => {
                debug!(
                    skipped = steps.len() - index,
                    "pipeline short-circuited on failure"
                );
                return Ok(current);
            }
        };

        debug!(
            step = step.label(),
            transform = step.is_transform_only(),
            "dispatching step"
        );
        current = invoke(receiver, step, value)?;
    }

    Ok(current)
}

fn invoke<R>(receiver: &R, step: &StepDescriptor, value: Value) -> Result<DynOutcome, PipelineError>
where
    R: Receiver + ?Sized,
{
    let result = match step.target() {
        DispatchTarget::Named(name) => {
            receiver
                .invoke(name, value)
                .ok_or_else(|| PipelineError::UnknownStep { step: name.clone() })?
        }
        DispatchTarget::Callable(callable) => callable.call(value),
    };

    let output = result.map_err(|source| PipelineError::Step {
        step: step.label().to_string(),
        source,
    })?;

    if step.is_transform_only() {
        return Ok(output.into_success());
    }

    output
        .normalize()
        .map_err(|source| PipelineError::InvalidStepResult {
            step: step.label().to_string(),
            source,
        })
}
