use thiserror::Error;

/// A step or closure returned a value that is neither an outcome nor a
/// recognized `[tag, value]` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid step result: {found}; expected an outcome or an \
     [\"ok\" | \"error\" | \"failure\", value] tuple"
)]
pub struct InvalidStepResult {
    /// Rendering of the rejected value.
    pub found: String,
}

impl InvalidStepResult {
    #[must_use]
    pub fn new(found: &serde_json::Value) -> Self {
        Self {
            found: found.to_string(),
        }
    }
}

/// Returned by [`Outcome::unwrap_strict`](crate::Outcome::unwrap_strict)
/// when the outcome is a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("called unwrap_strict on a failure outcome: {payload:?}")]
pub struct UnwrapError<E> {
    /// The failure payload that was found instead of a success.
    pub payload: E,
}

impl<E> UnwrapError<E> {
    #[must_use]
    pub fn into_payload(self) -> E {
        self.payload
    }
}

/// A tuple tag string was not one of `ok`, `error` or `failure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown outcome tag '{0}'")]
pub struct UnknownTag(pub String);
