//! must-try - convert between `Result` errors and unwinding aborts
//!
//! # Overview
//!
//! Two primitives, no shared state:
//!
//! - **must**: take a value and an optional error; return the value, or abort
//!   (panic) with the error as payload.
//! - **catch**: run a body; if it aborts, normalize the payload into a
//!   [`NormalizedError`] and hand it back instead of letting the unwind
//!   continue.
//!
//! # Quick Start
//!
//! ```
//! use must_try::{abort_on_err, must_ok};
//!
//! fn parse_all(items: &[&str]) -> Vec<u32> {
//!     items.iter().map(|s| must_ok(s.parse::<u32>())).collect()
//! }
//!
//! let err = abort_on_err(|| {
//!     parse_all(&["1", "x"]);
//! });
//! assert_eq!(err.unwrap().message(), "invalid digit found in string");
//! ```
//!
//! # Normalization
//!
//! | Abort payload | Handler receives |
//! |---------------|------------------|
//! | an error (via `must`, `throw`, `io::Error`, `Box<dyn Error>`, ...) | that error, unchanged |
//! | `"boom"` / `String` | `Try failed: boom` |
//! | `42` | `Try failed: 42` |
//! | `Payload::structured(&v)` | `Try failed: <v's Debug text>` |
//! | `()` / `None` / `raise!()` | `Try failed: nil` |
//! | anything else | `Try failed: Box<dyn Any>` |
//!
//! # Catcher shapes
//!
//! | Function | Shape |
//! |----------|-------|
//! | [`catch`] | `Result<T, NormalizedError>` |
//! | [`abort_on_err`] | `Option<NormalizedError>` |
//! | [`try_catch`] | body + handler callback |
//! | [`try_deferred`] | body now, handler later |
//!
//! # Cargo features
//!
//! - `anyhow`: `anyhow::Error` payloads pass through as errors.
//! - `eyre`: `eyre::Report` payloads pass through as errors.
//! - `serde`: `Serialize` for [`NormalizedError`] and [`Payload`].

// ============================================================
// Modules
// ============================================================

mod catch;
mod error;
mod ext;
mod must;
mod payload;
mod macros;

// ============================================================
// Re-exports
// ============================================================

pub use catch::{abort_on_err, catch, try_catch, try_deferred, Caught};
pub use error::{CoercedError, Error, Location, NormalizedError, Origin, TRY_FAILED_PREFIX};
pub use ext::MustExt;
pub use must::{must, must_nil, must_ok, raise, rethrow, throw};
pub use payload::{IntoPayload, Payload};

// ============================================================
// Type aliases
// ============================================================

/// Result type alias.
///
/// - `Result<T>` = `core::result::Result<T, NormalizedError>`
/// - `Result<T, E>` = any other error type
///
/// ```
/// use must_try::{catch, must_ok, Result};
///
/// fn parse(s: &str) -> Result<u8> {
///     catch(|| must_ok(s.parse::<u8>()))
/// }
///
/// assert_eq!(parse("7").unwrap(), 7);
/// assert!(parse("x").unwrap_err().is_passthrough());
/// ```
pub type Result<T, E = NormalizedError> = core::result::Result<T, E>;
