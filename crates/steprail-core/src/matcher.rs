/// A branch handler for [`Matcher`].
///
/// Implemented for every `FnOnce(In) -> R` closure and for [`Identity`],
/// which hands the payload back unchanged.
pub trait Handler<In, R> {
    fn handle(self, input: In) -> R;
}

impl<In, R, F> Handler<In, R> for F
where
    F: FnOnce(In) -> R,
{
    fn handle(self, input: In) -> R {
        self(input)
    }
}

/// Handler used for a branch that was never set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<In> Handler<In, In> for Identity {
    fn handle(self, input: In) -> In {
        input
    }
}

/// Pair of branch handlers consumed by
/// [`Outcome::match_with`](crate::Outcome::match_with).
///
/// Exactly one handler runs per match. A branch left unset falls back to
/// [`Identity`], so it only type-checks when that payload already has the
/// match's return type.
///
/// ```
/// use steprail_core::{Matcher, Outcome};
///
/// let outcome: Outcome<i32, String> = Outcome::succeed(2);
/// let rendered = outcome.match_with(
///     Matcher::new()
///         .success(|v: i32| format!("got {v}"))
///         .failure(|e: String| format!("failed: {e}")),
/// );
/// assert_eq!(rendered, "got 2");
///
/// let failed: Outcome<String, String> = Outcome::fail("oops".into());
/// let message = failed.match_with(Matcher::new().success(|v: String| v.to_uppercase()));
/// assert_eq!(message, "oops");
/// ```
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct Matcher<S = Identity, F = Identity> {
    success: S,
    failure: F,
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            success: Identity,
            failure: Identity,
        }
    }
}

impl<S, F> Matcher<S, F> {
    pub fn success<S2>(self, handler: S2) -> Matcher<S2, F> {
        Matcher {
            success: handler,
            failure: self.failure,
        }
    }

    pub fn failure<F2>(self, handler: F2) -> Matcher<S, F2> {
        Matcher {
            success: self.success,
            failure: handler,
        }
    }

    pub(crate) fn on_success<T, R>(self, value: T) -> R
    where
        S: Handler<T, R>,
    {
        self.success.handle(value)
    }

    pub(crate) fn on_failure<E, R>(self, error: E) -> R
    where
        F: Handler<E, R>,
    {
        self.failure.handle(error)
    }
}
