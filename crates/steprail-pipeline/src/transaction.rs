use std::fmt;
use std::sync::Arc;

use steprail_core::{DynOutcome, StepOutput};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{PipelineError, StepFault};

/// Work handed to a [`TransactionalResource`] to run inside its scope.
pub type ScopeBlock<'a> = Box<dyn FnOnce() -> Result<StepOutput, ScopeError> + 'a>;

/// An external resource that can commit or abort the effects of a block,
/// such as a database transaction manager.
pub trait TransactionalResource: Send + Sync {
    /// Run `block` inside a transactional scope.
    ///
    /// Commit when the block returns `Ok`. When it returns `Err`, abort the
    /// scope and return that same error unchanged; it carries the rollback
    /// request the boundary is waiting for.
    ///
    /// # Errors
    ///
    /// Returns the block's error, or [`ScopeError::resource`] when the
    /// resource itself fails to begin, commit or abort.
    fn run_in_scope(&self, block: ScopeBlock<'_>) -> Result<StepOutput, ScopeError>;
}

/// Raised inside a scope to abort it because the work produced a failure
/// outcome. Never leaves [`TransactionBoundary::run`].
#[derive(Debug, Error)]
#[error("rollback requested by failure outcome")]
struct RollbackSignal {
    outcome: DynOutcome,
}

#[derive(Debug, Error)]
enum ScopeExit {
    #[error(transparent)]
    Rollback(RollbackSignal),
    #[error(transparent)]
    Fault(PipelineError),
}

/// Error leaving a transactional scope. Resources only pass it through.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ScopeError(ScopeExit);

impl ScopeError {
    /// The resource failed on its own account.
    pub fn resource(source: impl Into<StepFault>) -> Self {
        Self(ScopeExit::Fault(PipelineError::Resource {
            source: source.into(),
        }))
    }

    /// Whether this error asks the scope to roll back a failure outcome, as
    /// opposed to an unexpected fault.
    #[must_use]
    pub fn is_rollback(&self) -> bool {
        matches!(self.0, ScopeExit::Rollback(_))
    }

    fn rollback(outcome: DynOutcome) -> Self {
        Self(ScopeExit::Rollback(RollbackSignal { outcome }))
    }

    fn fault(fault: PipelineError) -> Self {
        Self(ScopeExit::Fault(fault))
    }
}

/// Runs work inside an optional transactional resource, rolling the
/// resource back when the work ends in a failure outcome.
///
/// The caller never sees the rollback as an error: a failure outcome that
/// aborted the scope is handed back as that same failure outcome. Only
/// faults come back as `Err`.
#[derive(Clone, Default)]
pub struct TransactionBoundary {
    resource: Option<Arc<dyn TransactionalResource>>,
}

impl TransactionBoundary {
    /// A boundary with no resource; work runs directly.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_resource(resource: Arc<dyn TransactionalResource>) -> Self {
        Self {
            resource: Some(resource),
        }
    }

    #[must_use]
    pub fn has_resource(&self) -> bool {
        self.resource.is_some()
    }

    /// Run `thunk` inside the resource's scope, or directly when no resource
    /// is configured.
    ///
    /// A failure outcome, or a raw tuple tagged `error` / `failure`, aborts
    /// the scope and is returned as a failure outcome. Anything else commits
    /// and is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the thunk's fault, or a [`PipelineError::Resource`] raised by
    /// the resource. Either way the scope has been aborted.
    pub fn run<F, O>(&self, thunk: F) -> Result<StepOutput, PipelineError>
    where
        F: FnOnce() -> Result<O, PipelineError>,
        O: Into<StepOutput>,
    {
        let Some(resource) = &self.resource else {
            warn!(
                "transaction requested but no transactional resource is configured, \
                 running without a transaction"
            );
            return thunk().map(Into::into);
        };

        let block: ScopeBlock<'_> = Box::new(move || {
            let output: StepOutput = thunk().map_err(ScopeError::fault)?.into();
            match output.into_failure() {
                Ok(failure) => Err(ScopeError::rollback(failure)),
                Err(output) => Ok(output),
            }
        });

        match resource.run_in_scope(block) {
            Ok(output) => {
                debug!("transaction committed");
                Ok(output)
            }
            Err(ScopeError(ScopeExit::Rollback(signal))) => {
                debug!("transaction rolled back on failure outcome");
                Ok(StepOutput::Outcome(signal.outcome))
            }
            Err(ScopeError(ScopeExit::Fault(fault))) => {
                debug!(error = %fault, "transaction aborted by fault");
                Err(fault)
            }
        }
    }

    /// [`run`](Self::run) for work that already yields an outcome.
    ///
    /// # Errors
    ///
    /// As [`run`](Self::run).
    pub fn run_outcome<F>(&self, thunk: F) -> Result<DynOutcome, PipelineError>
    where
        F: FnOnce() -> Result<DynOutcome, PipelineError>,
    {
        self.run(thunk)?
            .normalize()
            .map_err(|source| PipelineError::InvalidStepResult {
                step: String::from("<transaction>"),
                source,
            })
    }
}

impl fmt::Debug for TransactionBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionBoundary")
            .field("has_resource", &self.has_resource())
            .finish()
    }
}
