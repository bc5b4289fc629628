//! Extension trait for Result types.

use crate::error::Error;
use crate::must::must_ok;

/// Extension trait for aborting on `Err`.
pub trait MustExt<T> {
    /// Return the `Ok` value, or abort with the error.
    ///
    /// ```
    /// use must_try::{abort_on_err, MustExt};
    ///
    /// let n: i32 = "42".parse::<i32>().must();
    /// assert_eq!(n, 42);
    ///
    /// let err = abort_on_err(|| {
    ///     "x".parse::<i32>().must();
    /// });
    /// assert!(err.unwrap().is_passthrough());
    /// ```
    fn must(self) -> T;
}

impl<T, E> MustExt<T> for Result<T, E>
where
    E: Into<Error>,
{
    #[track_caller]
    #[inline]
    fn must(self) -> T {
        must_ok(self)
    }
}
