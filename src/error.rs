//! Error types handed to catch handlers.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::OnceLock;

use crate::payload::{classify, Payload};

/// Prefix of every error built from a non-error payload.
pub const TRY_FAILED_PREFIX: &str = "Try failed: ";

// ============================================================
// Error - type-erased error value
// ============================================================

/// Type-erased error wrapper.
///
/// This is a newtype around `Box<dyn StdError>`. It does NOT implement
/// `Error` itself (so the blanket `From` impl below does not conflict with
/// `From<T> for T`), but provides access to the inner error.
#[derive(Debug)]
pub struct Error(Box<dyn StdError + Send + Sync + 'static>);

impl Error {
    /// Create from any error type.
    #[inline]
    pub fn new<E: StdError + Send + Sync + 'static>(e: E) -> Self {
        Self(Box::new(e))
    }

    /// Create from a boxed error.
    #[inline]
    pub fn from_box(e: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self(e)
    }

    /// Get the inner error as a trait object reference.
    #[inline]
    pub fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Whether the inner error is of type `T`.
    #[inline]
    pub fn is<T: StdError + 'static>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Try to downcast to a specific error type.
    #[inline]
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Try to downcast and consume the error.
    #[inline]
    pub fn downcast<T: StdError + 'static>(self) -> Result<T, Self> {
        match self.0.downcast::<T>() {
            Ok(e) => Ok(*e),
            Err(e) => Err(Self(e)),
        }
    }

    /// Get the inner boxed error.
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.0
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// Enables must(value, Some(err)) for any concrete error type
impl<E: StdError + Send + Sync + 'static> From<E> for Error {
    fn from(e: E) -> Self {
        Error::new(e)
    }
}

// ============================================================
// Location
// ============================================================

/// Source location an abort signal was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub(crate) file: &'static str,
    pub(crate) line: u32,
    pub(crate) col: u32,
}

impl Location {
    /// Location of the caller, following `#[track_caller]` frames.
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        core::panic::Location::caller().into()
    }

    /// Source file path.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Line number, starting at 1.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column number, starting at 1.
    pub fn column(&self) -> u32 {
        self.col
    }
}

impl From<&'static core::panic::Location<'static>> for Location {
    fn from(loc: &'static core::panic::Location<'static>) -> Self {
        Self {
            file: loc.file(),
            line: loc.line(),
            col: loc.column(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

// ============================================================
// CoercedError
// ============================================================

/// Error built from a payload that was not an error.
///
/// The message is the payload's text with [`TRY_FAILED_PREFIX`] in front.
#[derive(Debug)]
pub struct CoercedError {
    message: String,
    payload: Payload,
}

impl CoercedError {
    pub(crate) fn new(payload: Payload) -> Self {
        Self {
            message: format!("{}{}", TRY_FAILED_PREFIX, payload),
            payload,
        }
    }

    /// The full message, prefix included.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The payload this error was built from.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Take back the payload this error was built from.
    pub fn into_payload(self) -> Payload {
        self.payload
    }
}

impl fmt::Display for CoercedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for CoercedError {}

// ============================================================
// NormalizedError
// ============================================================

/// Where a [`NormalizedError`] came from.
#[derive(Debug)]
pub enum Origin {
    /// The abort payload already was an error; this is it, untouched.
    Passthrough(Error),
    /// The abort payload was some other value.
    Coerced(CoercedError),
}

/// The error a catcher hands to its handler.
///
/// Built exactly once per intercepted abort. If the abort payload was an
/// error, this is that error unchanged (same message, same concrete type for
/// downcasting). Otherwise it is a [`CoercedError`] whose message is
/// `"Try failed: "` followed by the payload's text.
///
/// # Examples
///
/// ```
/// use must_try::abort_on_err;
///
/// let err = abort_on_err(|| panic!("boom")).unwrap();
/// assert_eq!(err.message(), "Try failed: boom");
/// assert!(err.is_coerced());
/// ```
#[derive(Debug)]
pub struct NormalizedError {
    pub(crate) origin: Origin,
    /// Lazy message - passthrough errors only format themselves on demand.
    pub(crate) message: OnceLock<String>,
    /// Set when a non-error payload was raised through this crate.
    pub(crate) location: Option<Location>,
}

impl NormalizedError {
    /// Normalize a raw unwind payload.
    ///
    /// This is the one normalization routine every catcher goes through.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let (payload, location) = classify(payload);
        Self::from_payload(payload, location)
    }

    pub(crate) fn from_payload(payload: Payload, location: Option<Location>) -> Self {
        let origin = match payload {
            Payload::Error(e) => Origin::Passthrough(e),
            other => Origin::Coerced(CoercedError::new(other)),
        };
        Self {
            origin,
            message: OnceLock::new(),
            location,
        }
    }

    /// Get the error message (computed lazily and cached).
    pub fn message(&self) -> &str {
        match &self.origin {
            Origin::Passthrough(e) => self.message.get_or_init(|| e.to_string()),
            Origin::Coerced(c) => c.message(),
        }
    }

    /// Whether this error passed through or was coerced.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Consume into the passthrough error or the coerced error.
    pub fn into_origin(self) -> Origin {
        self.origin
    }

    /// Whether the abort payload was an error and passed through as-is.
    #[inline]
    pub fn is_passthrough(&self) -> bool {
        matches!(self.origin, Origin::Passthrough(_))
    }

    /// Whether the abort payload was coerced into a new error.
    #[inline]
    pub fn is_coerced(&self) -> bool {
        matches!(self.origin, Origin::Coerced(_))
    }

    /// The original non-error payload, for coerced errors.
    pub fn payload(&self) -> Option<&Payload> {
        match &self.origin {
            Origin::Passthrough(_) => None,
            Origin::Coerced(c) => Some(c.payload()),
        }
    }

    /// Where the abort was raised, for non-error payloads raised with
    /// [`raise`](crate::raise) or `raise!`.
    ///
    /// Errors raised by [`must`](crate::must) or [`throw`](crate::throw)
    /// travel as the bare error and carry no location.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// The error as a trait object.
    pub fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match &self.origin {
            Origin::Passthrough(e) => e.as_error(),
            Origin::Coerced(c) => c,
        }
    }

    /// Downcast a passthrough error to its concrete type.
    ///
    /// Coerced errors never match; inspect them through [`payload`](Self::payload).
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        match &self.origin {
            Origin::Passthrough(e) => e.downcast_ref::<T>(),
            Origin::Coerced(_) => None,
        }
    }

    /// Downcast and consume a passthrough error.
    pub fn downcast<T: StdError + 'static>(self) -> Result<T, Self> {
        let Self {
            origin,
            message,
            location,
        } = self;
        match origin {
            Origin::Passthrough(e) => e.downcast::<T>().map_err(|e| Self {
                origin: Origin::Passthrough(e),
                message,
                location,
            }),
            origin @ Origin::Coerced(_) => Err(Self {
                origin,
                message,
                location,
            }),
        }
    }

    /// Split back into the payload this error was normalized from.
    pub(crate) fn into_parts(self) -> (Payload, Option<Location>) {
        let payload = match self.origin {
            Origin::Passthrough(e) => Payload::Error(e),
            Origin::Coerced(c) => c.into_payload(),
        };
        (payload, self.location)
    }

    /// Convert into a type-erased [`Error`].
    ///
    /// A passthrough error is returned as the original error, not wrapped.
    pub fn into_error(self) -> Error {
        match self.origin {
            Origin::Passthrough(e) => e,
            Origin::Coerced(c) => Error::new(c),
        }
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// The passthrough error is this error, so its causes are ours.
impl StdError for NormalizedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.origin {
            Origin::Passthrough(e) => e.as_error().source(),
            Origin::Coerced(_) => None,
        }
    }
}

// ============================================================
// Serde support
// ============================================================

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Serialize, Serializer};

    #[derive(Serialize)]
    #[serde(rename_all = "lowercase")]
    enum Kind {
        Passthrough,
        Coerced,
    }

    #[derive(Serialize)]
    struct SerializedError<'a> {
        kind: Kind,
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<&'a Payload>,
        #[serde(skip_serializing_if = "Option::is_none")]
        location: Option<Location>,
    }

    impl Serialize for Location {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            use serde::ser::SerializeStruct;
            let mut state = serializer.serialize_struct("Location", 3)?;
            state.serialize_field("file", self.file)?;
            state.serialize_field("line", &self.line)?;
            state.serialize_field("col", &self.col)?;
            state.end()
        }
    }

    impl Serialize for NormalizedError {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            SerializedError {
                kind: if self.is_passthrough() {
                    Kind::Passthrough
                } else {
                    Kind::Coerced
                },
                message: self.message(),
                payload: self.payload(),
                location: self.location,
            }
            .serialize(serializer)
        }
    }
}
