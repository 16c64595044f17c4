use serde::{Deserialize, Serialize};

use crate::error::{InvalidStepResult, UnwrapError};
use crate::matcher::{Handler, Matcher};
use crate::output::IntoOutcome;
use crate::tag::{Kind, Tag};

/// Either a success payload or a failure payload.
///
/// Business failures are values: every chaining operation consumes the
/// outcome and returns a new one, and a failure passes through `then`,
/// `map` and `and_then` untouched.
///
/// Serializes as `{"type": "ok" | "error", "value": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
#[must_use]
pub enum Outcome<T, E> {
    #[serde(rename = "ok")]
    Success(T),
    #[serde(rename = "error", alias = "failure")]
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    pub const fn succeed(value: T) -> Self {
        Self::Success(value)
    }

    pub const fn fail(error: E) -> Self {
        Self::Failure(error)
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Success(_) => Kind::Success,
            Self::Failure(_) => Kind::Failure,
        }
    }

    /// Pipe the success payload into `f` and normalize what it returns.
    ///
    /// A failure is returned unchanged and `f` is not called. `f` may return
    /// an [`Outcome`], a `(Tag, value)` tuple, a [`StepOutput`](crate::StepOutput)
    /// or a [`Value`](crate::Value) in `["ok" | "error" | "failure", value]`
    /// form.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStepResult`] when `f` returns a dynamic value that
    /// is not in one of the accepted shapes.
    pub fn then<U, R, F>(self, f: F) -> Result<Outcome<U, E>, InvalidStepResult>
    where
        F: FnOnce(T) -> R,
        R: IntoOutcome<U, E>,
    {
        match self {
            Self::Success(value) => f(value).into_outcome(),
            Self::Failure(error) => Ok(Outcome::Failure(error)),
        }
    }

    /// Statically typed bind. A failure is returned unchanged.
    pub fn and_then<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Outcome<U, E>,
    {
        match self {
            Self::Success(value) => f(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Wrap `f(payload)` as a success. `f` is never called on a failure.
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    pub fn map_failure<E2, F>(self, f: F) -> Outcome<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Failure(f(error)),
        }
    }

    pub fn on_success<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Self::Success(value) = &self {
            f(value);
        }
        self
    }

    pub fn tap_ok<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        self.on_success(f)
    }

    pub fn on_failure<F>(self, f: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Self::Failure(error) = &self {
            f(error);
        }
        self
    }

    /// Run exactly one of the matcher's handlers and return its output.
    pub fn match_with<R, S, F>(self, matcher: Matcher<S, F>) -> R
    where
        S: Handler<T, R>,
        F: Handler<E, R>,
    {
        match self {
            Self::Success(value) => matcher.on_success(value),
            Self::Failure(error) => matcher.on_failure(error),
        }
    }

    pub fn fold<R>(self, on_success: impl FnOnce(T) -> R, on_failure: impl FnOnce(E) -> R) -> R {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(error) => on_failure(error),
        }
    }

    /// Return the success payload.
    ///
    /// # Errors
    ///
    /// Returns [`UnwrapError`] carrying the failure payload when called on a
    /// failure.
    pub fn unwrap_strict(self) -> Result<T, UnwrapError<E>> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(payload) => Err(UnwrapError { payload }),
        }
    }

    #[must_use]
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn failure(self) -> Option<E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    pub const fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Split into the kind and the payload on its side. Never fails, and
    /// unlike [`into_tuple`](Outcome::into_tuple) it works when the two
    /// payload types differ.
    pub fn into_parts(self) -> (Kind, Result<T, E>) {
        (self.kind(), self.into_result())
    }

    /// # Errors
    ///
    /// Returns the failure payload as `Err`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }
}

impl<T> Outcome<T, T> {
    /// Build an outcome from a `(tag, value)` pair.
    pub fn from_tuple((tag, value): (Tag, T)) -> Self {
        match tag.kind() {
            Kind::Success => Self::Success(value),
            Kind::Failure => Self::Failure(value),
        }
    }

    /// Split into `(Tag::Ok, value)` or `(Tag::Error, error)`. Never fails.
    /// For outcomes whose payload types differ, see
    /// [`into_parts`](Outcome::into_parts).
    #[must_use]
    pub fn into_tuple(self) -> (Tag, T) {
        match self {
            Self::Success(value) => (Tag::Ok, value),
            Self::Failure(error) => (Tag::Error, error),
        }
    }

    /// The payload regardless of side.
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Success(value) | Self::Failure(value) => value,
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T> From<(Tag, T)> for Outcome<T, T> {
    fn from(tuple: (Tag, T)) -> Self {
        Self::from_tuple(tuple)
    }
}

/// Start a chain from a success value.
pub const fn succeed<T, E>(value: T) -> Outcome<T, E> {
    Outcome::Success(value)
}

pub const fn fail<T, E>(error: E) -> Outcome<T, E> {
    Outcome::Failure(error)
}

/// Alias of [`succeed`] that reads better at the head of a chain.
pub const fn start<T, E>(value: T) -> Outcome<T, E> {
    Outcome::Success(value)
}
