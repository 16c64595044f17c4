use serde_json::Value;

use crate::error::InvalidStepResult;
use crate::outcome::Outcome;
use crate::tag::{Kind, Tag};

/// Outcome whose payloads are dynamic JSON values, as carried by pipelines.
pub type DynOutcome = Outcome<Value, Value>;

/// Anything a step may hand back before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutput {
    /// An already-built outcome.
    Outcome(DynOutcome),
    /// A raw value: a `[tag, value]` tuple for plain steps, any value for
    /// transform steps.
    Raw(Value),
}

impl StepOutput {
    /// Interpret the output of a plain step.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStepResult`] when a raw value is not a tagged tuple.
    pub fn normalize(self) -> Result<DynOutcome, InvalidStepResult> {
        match self {
            Self::Outcome(outcome) => Ok(outcome),
            Self::Raw(value) => DynOutcome::from_value(value),
        }
    }

    /// Interpret the output of a transform step: always a success, and the
    /// value is never inspected for a tag.
    pub fn into_success(self) -> DynOutcome {
        match self {
            Self::Outcome(outcome) => Outcome::Success(outcome.into_value()),
            Self::Raw(value) => Outcome::Success(value),
        }
    }

    /// Kind of this output if it has one. Raw values that are not tagged
    /// tuples have none.
    #[must_use]
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Self::Outcome(outcome) => Some(outcome.kind()),
            Self::Raw(value) => tag_of(value).map(Tag::kind),
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.kind() == Some(Kind::Failure)
    }

    /// Split off a failure, normalizing a failure-tagged tuple on the way.
    ///
    /// # Errors
    ///
    /// Hands `self` back untouched when it is not a failure.
    pub fn into_failure(self) -> Result<DynOutcome, Self> {
        match self {
            Self::Outcome(outcome) if outcome.is_failure() => Ok(outcome),
            Self::Raw(value) if tag_of(&value).map(Tag::kind) == Some(Kind::Failure) => {
                match value {
                    Value::Array(mut items) => Ok(Outcome::Failure(items.swap_remove(1))),
                    other => Err(Self::Raw(other)),
                }
            }
            other => Err(other),
        }
    }
}

impl From<DynOutcome> for StepOutput {
    fn from(outcome: DynOutcome) -> Self {
        Self::Outcome(outcome)
    }
}

impl From<Value> for StepOutput {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

impl From<(Tag, Value)> for StepOutput {
    fn from(tuple: (Tag, Value)) -> Self {
        Self::Outcome(Outcome::from_tuple(tuple))
    }
}

/// Returns the tag of a `[tag, value]` array, if `value` is one.
#[must_use]
pub fn tag_of(value: &Value) -> Option<Tag> {
    match value {
        Value::Array(items) if items.len() == 2 => items[0].as_str().and_then(Tag::parse),
        _ => None,
    }
}

impl DynOutcome {
    /// Parse a `["ok" | "error" | "failure", value]` array.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStepResult`] for any other shape.
    pub fn from_value(value: Value) -> Result<Self, InvalidStepResult> {
        let Some(tag) = tag_of(&value) else {
            return Err(InvalidStepResult::new(&value));
        };
        match value {
            Value::Array(mut items) => {
                let payload = items.swap_remove(1);
                Ok(Self::from_tuple((tag, payload)))
            }
            other => Err(InvalidStepResult::new(&other)),
        }
    }

    /// The `[tag, value]` array form. Failures use the `error` tag.
    #[must_use]
    pub fn into_value(self) -> Value {
        let (tag, payload) = self.into_tuple();
        Value::Array(vec![Value::String(tag.as_str().to_string()), payload])
    }
}

/// Conversion of a closure's return value into an [`Outcome`].
///
/// Used by [`Outcome::then`] to accept the different shapes a step may
/// return.
pub trait IntoOutcome<T, E> {
    /// # Errors
    ///
    /// Returns [`InvalidStepResult`] when the value has no outcome shape.
    fn into_outcome(self) -> Result<Outcome<T, E>, InvalidStepResult>;
}

impl<T, E> IntoOutcome<T, E> for Outcome<T, E> {
    fn into_outcome(self) -> Result<Outcome<T, E>, InvalidStepResult> {
        Ok(self)
    }
}

impl<T> IntoOutcome<T, T> for (Tag, T) {
    fn into_outcome(self) -> Result<Outcome<T, T>, InvalidStepResult> {
        Ok(Outcome::from_tuple(self))
    }
}

impl IntoOutcome<Value, Value> for Value {
    fn into_outcome(self) -> Result<DynOutcome, InvalidStepResult> {
        DynOutcome::from_value(self)
    }
}

impl IntoOutcome<Value, Value> for StepOutput {
    fn into_outcome(self) -> Result<DynOutcome, InvalidStepResult> {
        self.normalize()
    }
}
