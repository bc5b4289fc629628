//! The `raise!` macro.

/// Abort with a payload.
///
/// - `raise!()` aborts with no payload (reported as `nil`).
/// - `raise!("fmt {}", args..)` aborts with a formatted string.
/// - `raise!(expr)` aborts with any [`IntoPayload`](crate::IntoPayload) value,
///   as-is. A lone string literal is not treated as a format string.
///
/// ```
/// use must_try::{abort_on_err, raise};
///
/// let err = abort_on_err(|| raise!()).unwrap();
/// assert_eq!(err.message(), "Try failed: nil");
///
/// let err = abort_on_err(|| raise!("code {}", 7)).unwrap();
/// assert_eq!(err.message(), "Try failed: code 7");
///
/// let err = abort_on_err(|| raise!(404u16)).unwrap();
/// assert_eq!(err.message(), "Try failed: 404");
/// ```
#[macro_export]
macro_rules! raise {
    () => {
        $crate::raise(())
    };
    ($fmt:literal, $($arg:tt)+) => {
        $crate::raise(::std::format!($fmt, $($arg)+))
    };
    ($payload:expr $(,)?) => {
        $crate::raise($payload)
    };
}
