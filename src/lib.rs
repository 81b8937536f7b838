//! Deserialize JSON text into a strongly-typed [`Record`], or fail with a classified [`Error`]
//!
//! ```
//! use record_json::{ErrorKind, Parse, Record, RecordParser};
//!
//! let parser = RecordParser::new();
//!
//! let record = parser.parse(r#"{ "name": "John", "age": 30, "extra": "x" }"#).unwrap();
//! assert_eq!(record, Record::new("John", 30));
//!
//! let err = parser.parse("invalid_json").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Syntax);
//!
//! let err = parser.parse(r#"{ "name": "John", "age": 30.5 }"#).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::TypeMapping);
//! ```
//!
//! # Current features
//!
//! - Failures are values: every error carries an [`ErrorKind`], a message naming the offending
//!   token, field or value, and the byte offset at which it was detected.
//! - Malformed JSON is always reported as [`ErrorKind::Syntax`], even when a type mismatch was
//!   found earlier in the text.
//! - Required fields are enforced: a missing field is [`ErrorKind::MissingField`], never a
//!   silently defaulted value.
//! - Unknown fields are skipped, whatever their value, as long as it is well-formed JSON.
//! - Integers are parsed directly into the requested width; fractional, exponent and
//!   out-of-range numbers are [`ErrorKind::TypeMapping`] errors instead of being truncated.
//! - The generic [`from_str`] and [`from_slice`] deserialize:
//!   - `bool`
//!   - Integers and floats
//!   - `str` (zero copy; a string containing escapes needs `String` and fails as `&str`)
//!   - `String`
//!   - `Option`
//!   - Arrays, tuples and `Vec`s
//!   - Structs and maps
//!
//! # Cargo features
//!
//! - `test-util`: exposes [`testing::FaultInjector`], a [`Parse`] double that always fails.
//! - `defmt`: implements `defmt::Format` for [`Error`] and [`ErrorKind`].
//!
//! # Non-features
//!
//! This is explicitly out of scope
//!
//! - Serialization back into JSON text
//! - Enums, nested record types and streaming input
#![deny(missing_docs)]

pub mod de;
mod record;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
mod unescape;

#[doc(inline)]
pub use self::de::{from_slice, from_str, Error, ErrorKind, Result};
pub use self::record::{Parse, Record, RecordParser};
