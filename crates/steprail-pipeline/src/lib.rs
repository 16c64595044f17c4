//! Declarative step pipelines over [`Outcome`](steprail_core::Outcome)
//! values.
//!
//! A [`Pipeline`] is an ordered list of steps with two flags fixed at
//! definition time:
//!
//! - `safe`: faults raised while running the steps become failure outcomes
//!   carrying the fault message instead of propagating.
//! - `transactional`: the call runs inside a [`TransactionBoundary`], which
//!   aborts its resource when the call ends in a failure outcome and still
//!   hands that failure back as a value.
//!
//! Steps are looked up by name on a [`Receiver`] or held directly as
//! [`Callable`]s. Execution stops at the first failure.

mod builder;
mod config;
mod error;
mod executor;
mod pipeline;
mod receiver;
mod registry;
mod step;
mod transaction;

pub use builder::{PipelineBuilder, StepList};
pub use config::{PipelineConfig, PipelineEntry, StepEntry};
pub use error::{ConfigError, PipelineError, StepFault};
pub use executor::execute;
pub use pipeline::Pipeline;
pub use receiver::{Receiver, StepTable};
pub use registry::Registry;
pub use step::{
    Callable, DispatchTarget, StepDecl, StepDescriptor, StepResult, StepSpec, normalize,
};
pub use transaction::{ScopeBlock, ScopeError, TransactionBoundary, TransactionalResource};
