//! Turning errors into abort signals.

use std::panic;

use crate::error::{Error, Location, NormalizedError};
use crate::payload::{IntoPayload, Payload, Signal};

/// Return `value` if `err` is `None`, otherwise abort with `err`.
///
/// The abort payload is the error itself, so a surrounding catcher hands
/// back the very same error (see [`Origin::Passthrough`](crate::Origin)).
///
/// # Examples
///
/// ```
/// use must_try::{abort_on_err, must};
/// use std::io;
///
/// assert_eq!(must("hello", None::<io::Error>), "hello");
///
/// let err = abort_on_err(|| {
///     must("hello", Some(io::Error::new(io::ErrorKind::Other, "some error")));
///     unreachable!();
/// });
/// assert_eq!(err.unwrap().message(), "some error");
/// ```
#[track_caller]
#[inline]
pub fn must<T, E: Into<Error>>(value: T, err: Option<E>) -> T {
    match err {
        None => value,
        Some(e) => throw(e),
    }
}

/// Abort if `err` is `Some`. For operations that only report success or failure.
#[track_caller]
#[inline]
pub fn must_nil<E: Into<Error>>(err: Option<E>) {
    if let Some(e) = err {
        throw(e)
    }
}

/// [`must`] for a `Result`.
#[track_caller]
#[inline]
pub fn must_ok<T, E: Into<Error>>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => throw(e),
    }
}

/// Abort with an error payload.
///
/// The unwind payload is the error itself as an [`Error`], so a plain
/// `std::panic::catch_unwind` can downcast it back out too.
///
/// ```
/// use must_try::{throw, Error};
/// use std::io;
///
/// let payload = std::panic::catch_unwind(|| {
///     throw(io::Error::new(io::ErrorKind::Other, "some error"));
/// })
/// .unwrap_err();
/// let err = payload.downcast::<Error>().unwrap();
/// assert!(err.is::<io::Error>());
/// ```
#[cold]
#[track_caller]
pub fn throw<E: Into<Error>>(err: E) -> ! {
    panic::panic_any(err.into())
}

/// Abort with any payload.
///
/// Errors raised this way pass through unchanged; everything else reaches the
/// handler as a [`CoercedError`](crate::CoercedError) that remembers where it
/// was raised.
#[cold]
#[track_caller]
pub fn raise<P: IntoPayload>(payload: P) -> ! {
    match payload.into_payload() {
        Payload::Error(e) => panic::panic_any(e),
        other => panic::panic_any(Signal::new(other, Location::caller())),
    }
}

/// Abort again with an error a catcher already intercepted.
///
/// An outer catcher receives an equivalent error: passthrough errors are
/// raised again as themselves, coerced errors re-raise their original payload
/// so the message is rebuilt identically rather than prefixed twice. A
/// coerced error keeps its original raise location.
#[cold]
#[track_caller]
pub fn rethrow(err: NormalizedError) -> ! {
    match err.into_parts() {
        (Payload::Error(e), _) => panic::resume_unwind(Box::new(e)),
        (other, location) => {
            let location = match location {
                Some(location) => location,
                None => Location::caller(),
            };
            panic::resume_unwind(Box::new(Signal::new(other, location)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn io_err(msg: &str) -> io::Error {
        io::Error::new(io::ErrorKind::Other, msg)
    }

    #[test]
    fn must_returns_value_without_error() {
        assert_eq!(must(5, None::<io::Error>), 5);
        assert_eq!(must_ok(Ok::<_, io::Error>("hello")), "hello");
        must_nil(None::<io::Error>);
    }

    #[test]
    fn must_raises_the_error_itself() {
        let payload = catch_unwind(|| must(5, Some(io_err("some error")))).unwrap_err();
        let err = payload.downcast::<Error>().unwrap();
        assert_eq!(err.to_string(), "some error");
        assert_eq!(err.downcast::<io::Error>().unwrap().kind(), io::ErrorKind::Other);
    }

    #[test]
    fn raise_with_error_payload_raises_the_error() {
        let payload = catch_unwind(|| raise(Payload::error(io_err("direct")))).unwrap_err();
        assert!(payload.downcast::<Error>().unwrap().is::<io::Error>());
    }

    #[test]
    fn raise_records_caller_location() {
        let line = line!() + 1;
        let payload = catch_unwind(|| raise("x")).unwrap_err();
        let signal = payload.downcast::<Signal>().unwrap();
        assert_eq!(signal.location.file(), file!());
        assert_eq!(signal.location.line(), line);
    }

    #[test]
    fn code_after_must_is_skipped() {
        let mut reached = false;
        let _ = catch_unwind(AssertUnwindSafe(|| {
            must_ok(Err::<(), _>(io_err("stop")));
            reached = true;
        }));
        assert!(!reached);
    }

    #[test]
    fn raise_carries_plain_values() {
        let payload = catch_unwind(|| raise(7u8)).unwrap_err();
        let signal = payload.downcast::<Signal>().unwrap();
        assert_eq!(signal.payload, 7u64);
    }
}
