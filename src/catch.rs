//! Catching abort signals.
//!
//! [`catch`] is the only place that actually intercepts an unwind. The other
//! shapes are thin adapters over it, so they all normalize payloads the same
//! way.

use std::panic::{self, AssertUnwindSafe};

use crate::error::NormalizedError;

/// Run `body`, turning an abort into `Err`.
///
/// Only aborts raised while `body` runs are intercepted. Whatever `body`
/// mutated before aborting stays mutated.
///
/// # Examples
///
/// ```
/// use must_try::catch;
///
/// assert_eq!(catch(|| 42).unwrap(), 42);
///
/// let err = catch(|| -> i32 { panic!("boom") }).unwrap_err();
/// assert_eq!(err.message(), "Try failed: boom");
/// ```
#[inline]
pub fn catch<T, F>(body: F) -> Result<T, NormalizedError>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(body)).map_err(NormalizedError::from_panic)
}

/// Run `body` and return the error it aborted with, if any.
#[inline]
pub fn abort_on_err<F>(body: F) -> Option<NormalizedError>
where
    F: FnOnce(),
{
    catch(body).err()
}

/// Run `body`; if it aborts, call `handler` with the error.
///
/// The handler runs after the unwind has finished and before this function
/// returns. It is not protected: an abort inside the handler propagates to the
/// next catcher out.
///
/// # Examples
///
/// ```
/// use must_try::try_catch;
/// use std::cell::Cell;
///
/// let x = Cell::new(0);
/// try_catch(
///     || {
///         x.set(1);
///         panic!("boom");
///     },
///     |err| {
///         assert_eq!(err.message(), "Try failed: boom");
///         x.set(10);
///     },
/// );
/// assert_eq!(x.get(), 10);
/// ```
#[inline]
pub fn try_catch<F, H>(body: F, handler: H)
where
    F: FnOnce(),
    H: FnOnce(NormalizedError),
{
    if let Err(err) = catch(body) {
        handler(err)
    }
}

/// Run `body` now and decide what to do with its error later.
///
/// Since `body` has already finished when this returns, the body and the
/// handler may borrow the same state mutably.
///
/// # Examples
///
/// ```
/// use must_try::try_deferred;
///
/// let mut x = 0;
/// try_deferred(|| {
///     x = 1;
///     panic!("boom");
/// })
/// .catch(|_| x = 10);
/// assert_eq!(x, 10);
/// ```
#[inline]
pub fn try_deferred<F>(body: F) -> Caught
where
    F: FnOnce(),
{
    Caught {
        error: abort_on_err(body),
    }
}

/// Outcome of [`try_deferred`], waiting for a handler.
#[must_use = "the body's error is lost unless a handler is supplied"]
#[derive(Debug)]
pub struct Caught {
    error: Option<NormalizedError>,
}

impl Caught {
    /// Hand the error to `handler`. Does nothing if the body completed.
    pub fn catch<H>(self, handler: H)
    where
        H: FnOnce(NormalizedError),
    {
        if let Some(err) = self.error {
            handler(err)
        }
    }

    /// Whether the body completed without aborting.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Whether the body aborted.
    #[inline]
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// The captured error, if any.
    pub fn error(&self) -> Option<&NormalizedError> {
        self.error.as_ref()
    }

    /// Take the captured error without a handler.
    pub fn into_error(self) -> Option<NormalizedError> {
        self.error
    }
}

impl From<Caught> for Result<(), NormalizedError> {
    fn from(caught: Caught) -> Self {
        match caught.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{must_nil, raise, rethrow};
    use std::io;

    #[test]
    fn completed_body_gives_value() {
        assert_eq!(catch(|| "done").unwrap(), "done");
        assert!(abort_on_err(|| {}).is_none());
    }

    #[test]
    fn handler_skipped_when_body_completes() {
        let mut x = 0;
        let mut called = false;
        try_deferred(|| x = 1).catch(|_| called = true);
        assert_eq!(x, 1);
        assert!(!called);
    }

    #[test]
    fn nested_catchers_only_see_their_own_signal() {
        let mut inner = None;
        let outer = abort_on_err(|| {
            inner = abort_on_err(|| raise("inner"));
            raise("outer");
        });
        assert_eq!(inner.unwrap().message(), "Try failed: inner");
        assert_eq!(outer.unwrap().message(), "Try failed: outer");
    }

    #[test]
    fn rethrow_keeps_coerced_message() {
        let err = abort_on_err(|| {
            let inner = abort_on_err(|| raise(3)).unwrap();
            rethrow(inner);
        })
        .unwrap();
        assert!(err.is_coerced());
        assert_eq!(err.message(), "Try failed: 3");
    }

    #[test]
    fn rethrow_keeps_passthrough_type() {
        let err = abort_on_err(|| {
            let inner = abort_on_err(|| {
                must_nil(Some(io::Error::new(io::ErrorKind::TimedOut, "slow")))
            })
            .unwrap();
            rethrow(inner);
        })
        .unwrap();
        let io = err.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn caught_reports_outcome() {
        let caught = try_deferred(|| raise("late"));
        assert!(caught.is_err());
        assert!(!caught.is_ok());
        assert_eq!(caught.into_error().unwrap().message(), "Try failed: late");

        assert!(!try_deferred(|| {}).is_err());
    }

    #[test]
    fn caught_converts_to_result() {
        let res: Result<(), NormalizedError> = try_deferred(|| raise(())).into();
        assert_eq!(res.unwrap_err().message(), "Try failed: nil");
    }
}
