//! Success/failure outcome values.
//!
//! An [`Outcome`] is either a success or a failure payload. Chaining
//! operations short-circuit on the first failure, and steps may also
//! answer with `(tag, value)` tuples, which are normalized into outcomes.
//! Pipelines built on top of this crate carry dynamic [`Value`] payloads
//! through [`DynOutcome`].

mod error;
mod matcher;
mod outcome;
mod output;
mod tag;

pub use error::{InvalidStepResult, UnknownTag, UnwrapError};
pub use matcher::{Handler, Identity, Matcher};
pub use outcome::{Outcome, fail, start, succeed};
pub use output::{DynOutcome, IntoOutcome, StepOutput, tag_of};
pub use serde_json::Value;
pub use tag::{Kind, Tag};
