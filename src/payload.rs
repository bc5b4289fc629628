//! Abort signal payloads.

use std::any::Any;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use crate::error::{Error, Location, NormalizedError};

// ============================================================
// Payload
// ============================================================

/// The value carried by an abort signal.
///
/// Every unwind payload is classified into exactly one of these variants
/// before it reaches a handler, so normalization never depends on guessing
/// at an opaque `Box<dyn Any>`.
#[derive(Debug)]
pub enum Payload {
    /// Already an error - passed through untouched.
    Error(Error),
    /// String value
    String(String),
    /// Signed integer (i8, i16, i32, i64, isize)
    Int(i64),
    /// Unsigned integer (u8, u16, u32, u64, usize)
    Uint(u64),
    /// Floating point (f32, f64)
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Any other value, captured as its `Debug` text.
    Structured(String),
    /// No payload at all.
    Absent,
}

/// Text used for payloads that could not be classified.
///
/// Matches what the standard panic handler prints for the same values.
pub(crate) const OPAQUE: &str = "Box<dyn Any>";

/// Text used for the absent payload.
pub(crate) const ABSENT: &str = "nil";

impl Payload {
    /// Create a Payload from any supported type.
    pub fn from<T: IntoPayload>(v: T) -> Self {
        v.into_payload()
    }

    /// Wrap an error value.
    pub fn error<E: StdError + Send + Sync + 'static>(e: E) -> Self {
        Payload::Error(Error::new(e))
    }

    /// Capture an arbitrary value by its `Debug` representation.
    pub fn structured<T: fmt::Debug + ?Sized>(v: &T) -> Self {
        Payload::Structured(format!("{:?}", v))
    }

    /// Classify a raw unwind payload, as returned by `std::panic::catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        classify(payload).0
    }

    /// Whether this payload already is an error.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Payload::Error(_))
    }

    /// Whether this is the absent payload.
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Payload::Absent)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Error(e) => write!(f, "{}", e),
            Payload::String(s) => write!(f, "{}", s),
            Payload::Int(n) => write!(f, "{}", n),
            Payload::Uint(n) => write!(f, "{}", n),
            Payload::Float(n) => write!(f, "{}", n),
            Payload::Bool(b) => write!(f, "{}", b),
            Payload::Structured(s) => f.write_str(s),
            Payload::Absent => f.write_str(ABSENT),
        }
    }
}

// Allow comparing Payload with plain values for convenience in tests
impl PartialEq<str> for Payload {
    fn eq(&self, other: &str) -> bool {
        match self {
            Payload::String(s) => s == other,
            _ => false,
        }
    }
}

impl PartialEq<&str> for Payload {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<i64> for Payload {
    fn eq(&self, other: &i64) -> bool {
        match self {
            Payload::Int(n) => n == other,
            _ => false,
        }
    }
}

impl PartialEq<u64> for Payload {
    fn eq(&self, other: &u64) -> bool {
        match self {
            Payload::Uint(n) => n == other,
            _ => false,
        }
    }
}

impl PartialEq<bool> for Payload {
    fn eq(&self, other: &bool) -> bool {
        match self {
            Payload::Bool(b) => b == other,
            _ => false,
        }
    }
}

// ============================================================
// IntoPayload
// ============================================================

/// Trait for values that can be raised as an abort signal.
///
/// Errors are not covered by a blanket impl (it would overlap with the
/// string impls); raise them with [`throw`](crate::throw) or
/// [`Payload::error`].
pub trait IntoPayload {
    fn into_payload(self) -> Payload;
}

impl IntoPayload for Payload {
    fn into_payload(self) -> Payload {
        self
    }
}

impl IntoPayload for Error {
    fn into_payload(self) -> Payload {
        Payload::Error(self)
    }
}

impl IntoPayload for String {
    fn into_payload(self) -> Payload {
        Payload::String(self)
    }
}

impl IntoPayload for &str {
    fn into_payload(self) -> Payload {
        Payload::String(self.to_string())
    }
}

impl<'a> IntoPayload for Cow<'a, str> {
    fn into_payload(self) -> Payload {
        Payload::String(self.into_owned())
    }
}

impl IntoPayload for char {
    fn into_payload(self) -> Payload {
        Payload::String(self.to_string())
    }
}

impl IntoPayload for bool {
    fn into_payload(self) -> Payload {
        Payload::Bool(self)
    }
}

impl IntoPayload for () {
    fn into_payload(self) -> Payload {
        Payload::Absent
    }
}

macro_rules! impl_into_payload {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl IntoPayload for $t {
                fn into_payload(self) -> Payload {
                    Payload::$variant(self as $wide)
                }
            }
        )*
    };
}

impl_into_payload!(Int as i64: i8, i16, i32, i64, isize);
impl_into_payload!(Uint as u64: u8, u16, u32, u64, usize);
impl_into_payload!(Float as f64: f32, f64);

impl IntoPayload for i128 {
    fn into_payload(self) -> Payload {
        i64::try_from(self)
            .map(Payload::Int)
            .unwrap_or_else(|_| Payload::Structured(self.to_string()))
    }
}

impl IntoPayload for u128 {
    fn into_payload(self) -> Payload {
        u64::try_from(self)
            .map(Payload::Uint)
            .unwrap_or_else(|_| Payload::Structured(self.to_string()))
    }
}

impl<T: IntoPayload> IntoPayload for Option<T> {
    fn into_payload(self) -> Payload {
        match self {
            Some(v) => v.into_payload(),
            None => Payload::Absent,
        }
    }
}

// ============================================================
// Signal - what actually travels up the stack
// ============================================================

/// Unwind payload raised by this crate.
///
/// Carries the location of the raise so handlers can report it.
#[derive(Debug)]
pub(crate) struct Signal {
    pub(crate) payload: Payload,
    pub(crate) location: Location,
}

impl Signal {
    #[inline]
    pub(crate) fn new(payload: Payload, location: Location) -> Self {
        Self { payload, location }
    }
}

/// Try each type in turn, returning as soon as one matches.
macro_rules! downcast_chain {
    ($payload:ident; $($t:ty => |$v:ident| $make:expr;)*) => {
        $(
            let $payload = match $payload.downcast::<$t>() {
                Ok($v) => return ($make, None),
                Err(p) => p,
            };
        )*
    };
}

/// Classify a raw unwind payload.
///
/// Returns the raise location too when the signal came from this crate.
pub(crate) fn classify(payload: Box<dyn Any + Send>) -> (Payload, Option<Location>) {
    let payload = match payload.downcast::<Signal>() {
        Ok(signal) => return (signal.payload, Some(signal.location)),
        Err(p) => p,
    };
    let payload = match payload.downcast::<NormalizedError>() {
        Ok(err) => return (*err).into_parts(),
        Err(p) => p,
    };

    downcast_chain! { payload;
        Payload => |v| *v;
        Error => |v| Payload::Error(*v);
        Box<dyn StdError + Send + Sync + 'static> => |v| Payload::Error(Error::from_box(*v));
        std::io::Error => |v| Payload::Error(Error::new(*v));
        String => |v| Payload::String(*v);
        &'static str => |v| Payload::String(v.to_string());
        Cow<'static, str> => |v| Payload::String((*v).into_owned());
        i8 => |v| (*v).into_payload();
        i16 => |v| (*v).into_payload();
        i32 => |v| (*v).into_payload();
        i64 => |v| (*v).into_payload();
        i128 => |v| (*v).into_payload();
        isize => |v| (*v).into_payload();
        u8 => |v| (*v).into_payload();
        u16 => |v| (*v).into_payload();
        u32 => |v| (*v).into_payload();
        u64 => |v| (*v).into_payload();
        u128 => |v| (*v).into_payload();
        usize => |v| (*v).into_payload();
        f32 => |v| (*v).into_payload();
        f64 => |v| (*v).into_payload();
        bool => |v| Payload::Bool(*v);
        char => |v| (*v).into_payload();
        () => |_v| Payload::Absent;
    }

    #[cfg(feature = "anyhow")]
    let payload = match payload.downcast::<anyhow::Error>() {
        Ok(v) => return (Payload::Error(Error::from_box((*v).into())), None),
        Err(p) => p,
    };

    #[cfg(feature = "eyre")]
    let payload = match payload.downcast::<eyre::Report>() {
        Ok(v) => return (Payload::Error(Error::from_box((*v).into())), None),
        Err(p) => p,
    };

    drop(payload);
    (Payload::Structured(OPAQUE.to_string()), None)
}

// ============================================================
// Serde support
// ============================================================

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    // Scalars keep their JSON type; errors serialize as their message.
    impl Serialize for Payload {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Payload::Error(e) => serializer.collect_str(e),
                Payload::String(s) => serializer.serialize_str(s),
                Payload::Int(n) => serializer.serialize_i64(*n),
                Payload::Uint(n) => serializer.serialize_u64(*n),
                Payload::Float(n) => serializer.serialize_f64(*n),
                Payload::Bool(b) => serializer.serialize_bool(*b),
                Payload::Structured(s) => serializer.serialize_str(s),
                Payload::Absent => serializer.serialize_none(),
            }
        }
    }

    impl<'de> Deserialize<'de> for Payload {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            use serde::de::{self, Visitor};

            struct PayloadVisitor;

            impl<'de> Visitor<'de> for PayloadVisitor {
                type Value = Payload;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a string, number, boolean, or null")
                }

                fn visit_bool<E: de::Error>(self, v: bool) -> Result<Payload, E> {
                    Ok(Payload::Bool(v))
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<Payload, E> {
                    Ok(Payload::Int(v))
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<Payload, E> {
                    Ok(Payload::Uint(v))
                }

                fn visit_f64<E: de::Error>(self, v: f64) -> Result<Payload, E> {
                    Ok(Payload::Float(v))
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Payload, E> {
                    Ok(Payload::String(v.to_string()))
                }

                fn visit_string<E: de::Error>(self, v: String) -> Result<Payload, E> {
                    Ok(Payload::String(v))
                }

                fn visit_none<E: de::Error>(self) -> Result<Payload, E> {
                    Ok(Payload::Absent)
                }

                fn visit_unit<E: de::Error>(self) -> Result<Payload, E> {
                    Ok(Payload::Absent)
                }
            }

            deserializer.deserialize_any(PayloadVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed<T: Any + Send>(v: T) -> Box<dyn Any + Send> {
        Box::new(v)
    }

    #[test]
    fn classifies_strings() {
        assert_eq!(Payload::from_panic(boxed("boom")), "boom");
        assert_eq!(Payload::from_panic(boxed(String::from("boom"))), "boom");
        assert_eq!(Payload::from_panic(boxed(Cow::<'static, str>::Borrowed("boom"))), "boom");
    }

    #[test]
    fn classifies_numbers() {
        assert_eq!(Payload::from_panic(boxed(-7i32)), -7i64);
        assert_eq!(Payload::from_panic(boxed(7usize)), 7u64);
        assert_eq!(Payload::from_panic(boxed(1.5f64)).to_string(), "1.5");
        assert_eq!(Payload::from_panic(boxed(u128::MAX)).to_string(), u128::MAX.to_string());
    }

    #[test]
    fn classifies_unit_as_absent() {
        let payload = Payload::from_panic(boxed(()));
        assert!(payload.is_absent());
        assert_eq!(payload.to_string(), "nil");
    }

    #[test]
    fn classifies_io_error_as_error() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let payload = Payload::from_panic(boxed(err));
        assert!(payload.is_error());
        assert_eq!(payload.to_string(), "disk");
    }

    #[test]
    fn unknown_types_are_opaque() {
        struct Opaque;
        let payload = Payload::from_panic(boxed(Opaque));
        assert!(matches!(payload, Payload::Structured(ref s) if s == OPAQUE));
    }

    #[test]
    fn structured_uses_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Point {
            x: i32,
            y: i32,
        }
        let payload = Payload::structured(&Point { x: 1, y: 2 });
        assert_eq!(payload.to_string(), "Point { x: 1, y: 2 }");
    }

    #[test]
    fn from_uses_into_payload() {
        assert_eq!(Payload::from("boom"), "boom");
        assert_eq!(Payload::from(-1i8), -1i64);
        assert!(Payload::from(()).is_absent());
    }

    #[test]
    fn option_none_is_absent() {
        assert!(None::<i32>.into_payload().is_absent());
        assert_eq!(Some(3u8).into_payload(), 3u64);
    }
}
