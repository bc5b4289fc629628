//! The `try_catch!` macro.

/// Block syntax over [`try_deferred`](crate::try_deferred) and
/// [`abort_on_err`](crate::abort_on_err).
///
/// Values produced by either block are discarded. Because the body finishes
/// before the handler starts, both blocks may mutate the same locals.
///
/// ```
/// use must_try::{raise, try_catch};
///
/// let mut x = 0;
/// try_catch! {
///     try {
///         x = 1;
///         raise!("boom");
///     } catch e {
///         assert_eq!(e.message(), "Try failed: boom");
///         x = 10;
///     }
/// }
/// assert_eq!(x, 10);
///
/// // Without a handler the error is returned.
/// let err = try_catch! { try { raise!(1) } };
/// assert!(err.is_some());
/// ```
#[macro_export]
macro_rules! try_catch {
    (try $body:block catch _ $handler:block) => {
        $crate::try_deferred(|| {
            let _ = $body;
        })
        .catch(|_| {
            let _ = $handler;
        })
    };
    (try $body:block catch $err:ident $handler:block) => {
        $crate::try_deferred(|| {
            let _ = $body;
        })
        .catch(|$err: $crate::NormalizedError| {
            let _ = $handler;
        })
    };
    (try $body:block) => {
        $crate::abort_on_err(|| {
            let _ = $body;
        })
    };
}
