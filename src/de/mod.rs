//! Deserialize JSON text into a Rust data structure

use core::fmt::Write as _;
use core::str;
use std::{error, fmt};

use serde::de::{self, Unexpected, Visitor};

use self::map::MapAccess;
use self::seq::SeqAccess;
use crate::unescape;

mod map;
mod seq;

/// Deserialization result
pub type Result<T> = core::result::Result<T, Error>;

/// Capacity, in bytes, of the message carried by an [`Error`]
pub const MESSAGE_CAPACITY: usize = 128;

/// Maximum nesting of arrays and objects, ignored values included
pub const RECURSION_LIMIT: u8 = 128;

/// The class of a deserialization failure
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// The input is not well-formed JSON.
    Syntax,

    /// A value is well-formed JSON but cannot be converted into the declared type.
    TypeMapping,

    /// A required field is absent from the input object.
    MissingField,

    /// A type-mapping failure synthesized on purpose by a test double.
    ForcedTypeMapping,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::TypeMapping => "type-mapping error",
            ErrorKind::MissingField => "missing field",
            ErrorKind::ForcedTypeMapping => "forced type-mapping error",
        })
    }
}

/// This type represents all possible errors that can occur when deserializing JSON data
///
/// The [`kind`](Error::kind) is the machine-readable classification; the
/// [`message`](Error::message) names the token, field or value that triggered it.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Error {
    kind: ErrorKind,
    message: heapless::String<MESSAGE_CAPACITY>,
    offset: Option<usize>,
}

impl Error {
    pub(crate) fn new<M>(kind: ErrorKind, message: M) -> Self
    where
        M: fmt::Display,
    {
        let mut buf: heapless::String<MESSAGE_CAPACITY> = heapless::String::new();
        let _ = write!(
            Truncate {
                buf: &mut buf,
                full: false,
            },
            "{}",
            message
        );

        Error {
            kind,
            message: buf,
            offset: None,
        }
    }

    /// Records where in the input the failure was detected, unless already known.
    pub(crate) fn at(mut self, offset: usize) -> Self {
        if self.offset.is_none() {
            self.offset = Some(offset);
        }
        self
    }

    fn out_of_range(number: &str, ty: &str) -> Self {
        Error::new(
            ErrorKind::TypeMapping,
            format_args!("integer `{}` is out of range for {}", number, ty),
        )
    }

    /// The classification of this failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable cause, without position information.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Byte offset into the input at which the failure was detected.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())?;
        if let Some(offset) = self.offset {
            write!(f, " (offset: {})", offset)?;
        }
        Ok(())
    }
}

impl de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Error::new(ErrorKind::TypeMapping, msg)
    }

    fn missing_field(field: &'static str) -> Self {
        Error::new(
            ErrorKind::MissingField,
            format_args!("missing field `{}`", field),
        )
    }
}

// Keeps the leading part of a message that outgrows the buffer.
struct Truncate<'a> {
    buf: &'a mut heapless::String<MESSAGE_CAPACITY>,
    full: bool,
}

impl fmt::Write for Truncate<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.full || self.buf.push(c).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}

/// What made the input malformed
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Cause {
    EofWhileParsingList,
    EofWhileParsingObject,
    EofWhileParsingString,
    EofWhileParsingValue,
    ExpectedColon,
    ExpectedListCommaOrEnd,
    ExpectedObjectCommaOrEnd,
    ExpectedSomeIdent,
    ExpectedSomeValue,
    InvalidNumber,
    InvalidEscape,
    ControlCharacterInString,
    InvalidUnicodeCodePoint,
    KeyMustBeAString,
    TrailingCharacters,
    TrailingComma,
    RecursionLimitExceeded,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cause::EofWhileParsingList => "EOF while parsing a list.",
            Cause::EofWhileParsingObject => "EOF while parsing an object.",
            Cause::EofWhileParsingString => "EOF while parsing a string.",
            Cause::EofWhileParsingValue => "EOF while parsing a JSON value.",
            Cause::ExpectedColon => "Expected this character to be a `':'`.",
            Cause::ExpectedListCommaOrEnd => {
                "Expected this character to be either a `','` or a `']'`."
            }
            Cause::ExpectedObjectCommaOrEnd => {
                "Expected this character to be either a `','` or a `'}'`."
            }
            Cause::ExpectedSomeIdent => "Expected to parse either a `true`, `false`, or a `null`.",
            Cause::ExpectedSomeValue => "Expected this character to start a JSON value.",
            Cause::InvalidNumber => "Invalid number.",
            Cause::InvalidEscape => "Invalid escape sequence in string.",
            Cause::ControlCharacterInString => "Control character in string.",
            Cause::InvalidUnicodeCodePoint => "Invalid unicode code point.",
            Cause::KeyMustBeAString => "Object key is not a string.",
            Cause::TrailingCharacters => {
                "JSON has non-whitespace trailing characters after the value."
            }
            Cause::TrailingComma => "JSON has a comma after the last value in an array or map.",
            Cause::RecursionLimitExceeded => "Recursion limit exceeded.",
        })
    }
}

/// A string read from the input, borrowed unless it had escapes to decode
enum Str<'a> {
    Borrowed(&'a str),
    Owned(String),
}

impl Str<'_> {
    fn as_str(&self) -> &str {
        match self {
            Str::Borrowed(s) => *s,
            Str::Owned(s) => s.as_str(),
        }
    }
}

/// The text of a well-formed JSON number
struct Number<'a> {
    text: &'a str,
    integral: bool,
}

enum Parsed {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl<'a> Number<'a> {
    fn parsed(&self) -> Parsed {
        if self.integral {
            if self.text.starts_with('-') {
                if let Ok(v) = self.text.parse() {
                    return Parsed::Signed(v);
                }
            } else if let Ok(v) = self.text.parse() {
                return Parsed::Unsigned(v);
            }
        }

        // the grammar was checked by `parse_number`; too large magnitudes parse as infinity
        match self.text.parse() {
            Ok(v) => Parsed::Float(v),
            Err(_) => Parsed::Float(f64::NAN),
        }
    }

    fn invalid_type(&self, exp: &dyn de::Expected) -> Error {
        let unexpected = match self.parsed() {
            Parsed::Unsigned(v) => Unexpected::Unsigned(v),
            Parsed::Signed(v) => Unexpected::Signed(v),
            // quote the literal; the parsed float may be rounded or infinite
            Parsed::Float(_) => {
                let what = if self.integral {
                    "integer"
                } else {
                    "floating point"
                };
                let literal = format!("{} `{}`", what, self.text);
                return de::Error::invalid_type(Unexpected::Other(&literal), exp);
            }
        };
        de::Error::invalid_type(unexpected, exp)
    }
}

pub(crate) struct Deserializer<'b> {
    slice: &'b [u8],
    index: usize,
    remaining_depth: u8,
}

impl<'a> Deserializer<'a> {
    fn new(slice: &'a [u8]) -> Deserializer<'a> {
        Deserializer {
            slice,
            index: 0,
            remaining_depth: RECURSION_LIMIT,
        }
    }

    fn eat_char(&mut self) {
        self.index += 1;
    }

    /// A syntax error at the current position, quoting the offending character
    pub(crate) fn error(&self, cause: Cause) -> Error {
        self.error_at(cause, self.index)
    }

    fn error_at(&self, cause: Cause, index: usize) -> Error {
        let err = match self.slice.get(index) {
            Some(&c) if c.is_ascii() => Error::new(
                ErrorKind::Syntax,
                format_args!("{} Found `{}`.", cause, char::from(c).escape_default()),
            ),
            Some(&c) => Error::new(
                ErrorKind::Syntax,
                format_args!("{} Found byte `{:#04x}`.", cause, c),
            ),
            None => Error::new(ErrorKind::Syntax, cause),
        };
        err.at(index)
    }

    fn end(&mut self) -> Result<()> {
        match self.parse_whitespace() {
            Some(_) => Err(self.error(Cause::TrailingCharacters)),
            None => Ok(()),
        }
    }

    fn end_seq(&mut self) -> Result<()> {
        match self.parse_whitespace() {
            Some(b']') => {
                self.eat_char();
                Ok(())
            }
            Some(b',') => {
                self.eat_char();
                match self.parse_whitespace() {
                    Some(b']') => Err(self.error(Cause::TrailingComma)),
                    _ => Err(self.error(Cause::TrailingCharacters)),
                }
            }
            Some(_) => Err(self.error(Cause::TrailingCharacters)),
            None => Err(self.error(Cause::EofWhileParsingList)),
        }
    }

    fn end_map(&mut self) -> Result<()> {
        match self.parse_whitespace() {
            Some(b'}') => {
                self.eat_char();
                Ok(())
            }
            Some(b',') => Err(self.error(Cause::TrailingComma)),
            Some(_) => Err(self.error(Cause::TrailingCharacters)),
            None => Err(self.error(Cause::EofWhileParsingObject)),
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.remaining_depth == 0 {
            return Err(self.error(Cause::RecursionLimitExceeded));
        }
        self.remaining_depth -= 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.remaining_depth += 1;
    }

    fn parse_ident(&mut self, ident: &[u8]) -> Result<()> {
        for &c in ident {
            match self.peek() {
                Some(p) if p == c => self.eat_char(),
                Some(_) => return Err(self.error(Cause::ExpectedSomeIdent)),
                None => return Err(self.error(Cause::EofWhileParsingValue)),
            }
        }

        Ok(())
    }

    fn parse_object_colon(&mut self) -> Result<()> {
        match self.parse_whitespace() {
            Some(b':') => {
                self.eat_char();
                Ok(())
            }
            Some(_) => Err(self.error(Cause::ExpectedColon)),
            None => Err(self.error(Cause::EofWhileParsingObject)),
        }
    }

    /// Parses the rest of a string whose opening quote has been consumed
    fn parse_str(&mut self) -> Result<Str<'a>> {
        let slice = self.slice;
        let start = self.index;
        let mut escaped = false;
        loop {
            match self.peek() {
                Some(b'"') => {
                    let end = self.index;
                    self.eat_char();
                    let raw = str::from_utf8(&slice[start..end]).map_err(|e| {
                        self.error_at(Cause::InvalidUnicodeCodePoint, start + e.valid_up_to())
                    })?;
                    if !escaped {
                        return Ok(Str::Borrowed(raw));
                    }
                    return unescape::unescape(raw)
                        .map(Str::Owned)
                        .map_err(|_| self.error_at(Cause::InvalidEscape, start));
                }
                Some(b'\\') => {
                    escaped = true;
                    self.eat_char();
                    if self.peek().is_some() {
                        self.eat_char();
                    }
                }
                Some(c) if c < 0x20 => return Err(self.error(Cause::ControlCharacterInString)),
                Some(_) => self.eat_char(),
                None => return Err(self.error(Cause::EofWhileParsingString)),
            }
        }
    }

    fn eat_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.eat_char();
        }
    }

    fn parse_number(&mut self) -> Result<Number<'a>> {
        let slice = self.slice;
        let start = self.index;

        if self.peek() == Some(b'-') {
            self.eat_char();
        }

        match self.peek() {
            Some(b'0') => self.eat_char(),
            Some(b'1'..=b'9') => self.eat_digits(),
            Some(_) => return Err(self.error(Cause::InvalidNumber)),
            None => return Err(self.error(Cause::EofWhileParsingValue)),
        }

        let mut integral = true;

        if self.peek() == Some(b'.') {
            integral = false;
            self.eat_char();
            match self.peek() {
                Some(b'0'..=b'9') => self.eat_digits(),
                _ => return Err(self.error(Cause::InvalidNumber)),
            }
        }

        if let Some(b'e') | Some(b'E') = self.peek() {
            integral = false;
            self.eat_char();
            if let Some(b'+') | Some(b'-') = self.peek() {
                self.eat_char();
            }
            match self.peek() {
                Some(b'0'..=b'9') => self.eat_digits(),
                _ => return Err(self.error(Cause::InvalidNumber)),
            }
        }

        let text = str::from_utf8(&slice[start..self.index])
            .map_err(|_| self.error_at(Cause::InvalidNumber, start))?;

        Ok(Number { text, integral })
    }

    /// Consumes all the whitespace characters and returns a peek into the next character
    fn parse_whitespace(&mut self) -> Option<u8> {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\n') | Some(b'\t') | Some(b'\r') => {
                    self.eat_char();
                }
                other => {
                    return other;
                }
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.slice.get(self.index).cloned()
    }

    /// Reads the upcoming value only to describe it in a type-mapping error
    ///
    /// Syntax errors found on the way win over the type mismatch.
    fn peek_invalid_type(&mut self, exp: &dyn de::Expected) -> Error {
        let peek = match self.parse_whitespace() {
            Some(c) => c,
            None => return self.error(Cause::EofWhileParsingValue),
        };
        let start = self.index;

        let err: Error = match peek {
            b'n' => match self.parse_ident(b"null") {
                Ok(()) => de::Error::invalid_type(Unexpected::Unit, exp),
                Err(err) => return err,
            },
            b't' => match self.parse_ident(b"true") {
                Ok(()) => de::Error::invalid_type(Unexpected::Bool(true), exp),
                Err(err) => return err,
            },
            b'f' => match self.parse_ident(b"false") {
                Ok(()) => de::Error::invalid_type(Unexpected::Bool(false), exp),
                Err(err) => return err,
            },
            b'-' | b'0'..=b'9' => match self.parse_number() {
                Ok(number) => number.invalid_type(exp),
                Err(err) => return err,
            },
            b'"' => {
                self.eat_char();
                match self.parse_str() {
                    Ok(s) => de::Error::invalid_type(Unexpected::Str(s.as_str()), exp),
                    Err(err) => return err,
                }
            }
            b'[' => de::Error::invalid_type(Unexpected::Seq, exp),
            b'{' => de::Error::invalid_type(Unexpected::Map, exp),
            _ => return self.error(Cause::ExpectedSomeValue),
        };

        err.at(start)
    }
}

// NOTE(deserialize_*signed) we avoid parsing into u64 and then casting to a smaller integer;
// digits are folded directly into the requested type so overflow is caught at that width
macro_rules! deserialize_unsigned {
    ($self:ident, $visitor:ident, $uxx:ident, $visit_uxx:ident) => {{
        match $self.parse_whitespace() {
            Some(b'-') | Some(b'0'..=b'9') => {
                let start = $self.index;
                let number = $self.parse_number()?;
                if !number.integral {
                    return Err(number.invalid_type(&$visitor).at(start));
                }

                let (negative, digits) = match number.text.strip_prefix('-') {
                    Some(digits) => (true, digits),
                    None => (false, number.text),
                };

                let mut value: $uxx = 0;
                for c in digits.bytes() {
                    value = match value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add((c - b'0') as $uxx))
                    {
                        Some(v) => v,
                        None => {
                            return Err(Error::out_of_range(number.text, stringify!($uxx)).at(start))
                        }
                    };
                }

                if negative && value != 0 {
                    return Err(Error::out_of_range(number.text, stringify!($uxx)).at(start));
                }

                $visitor.$visit_uxx(value)
            }
            Some(_) => Err($self.peek_invalid_type(&$visitor)),
            None => Err($self.error(Cause::EofWhileParsingValue)),
        }
    }};
}

macro_rules! deserialize_signed {
    ($self:ident, $visitor:ident, $ixx:ident, $visit_ixx:ident) => {{
        match $self.parse_whitespace() {
            Some(b'-') | Some(b'0'..=b'9') => {
                let start = $self.index;
                let number = $self.parse_number()?;
                if !number.integral {
                    return Err(number.invalid_type(&$visitor).at(start));
                }

                let (negative, digits) = match number.text.strip_prefix('-') {
                    Some(digits) => (true, digits),
                    None => (false, number.text),
                };

                let mut value: $ixx = 0;
                for c in digits.bytes() {
                    let digit = (c - b'0') as $ixx;
                    value = match value.checked_mul(10).and_then(|v| {
                        if negative {
                            v.checked_sub(digit)
                        } else {
                            v.checked_add(digit)
                        }
                    }) {
                        Some(v) => v,
                        None => {
                            return Err(Error::out_of_range(number.text, stringify!($ixx)).at(start))
                        }
                    };
                }

                $visitor.$visit_ixx(value)
            }
            Some(_) => Err($self.peek_invalid_type(&$visitor)),
            None => Err($self.error(Cause::EofWhileParsingValue)),
        }
    }};
}

impl<'a, 'de> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.parse_whitespace() {
            Some(b'n') => {
                self.parse_ident(b"null")?;
                visitor.visit_unit()
            }
            Some(b't') | Some(b'f') => self.deserialize_bool(visitor),
            Some(b'-') | Some(b'0'..=b'9') => match self.parse_number()?.parsed() {
                Parsed::Unsigned(v) => visitor.visit_u64(v),
                Parsed::Signed(v) => visitor.visit_i64(v),
                Parsed::Float(v) => visitor.visit_f64(v),
            },
            Some(b'"') => self.deserialize_str(visitor),
            Some(b'[') => self.deserialize_seq(visitor),
            Some(b'{') => self.deserialize_map(visitor),
            Some(_) => Err(self.error(Cause::ExpectedSomeValue)),
            None => Err(self.error(Cause::EofWhileParsingValue)),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.parse_whitespace() {
            Some(b't') => {
                self.parse_ident(b"true")?;
                visitor.visit_bool(true)
            }
            Some(b'f') => {
                self.parse_ident(b"false")?;
                visitor.visit_bool(false)
            }
            Some(_) => Err(self.peek_invalid_type(&visitor)),
            None => Err(self.error(Cause::EofWhileParsingValue)),
        }
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        deserialize_signed!(self, visitor, i8, visit_i8)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        deserialize_signed!(self, visitor, i16, visit_i16)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        deserialize_signed!(self, visitor, i32, visit_i32)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        deserialize_signed!(self, visitor, i64, visit_i64)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        deserialize_unsigned!(self, visitor, u8, visit_u8)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        deserialize_unsigned!(self, visitor, u16, visit_u16)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        deserialize_unsigned!(self, visitor, u32, visit_u32)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        deserialize_unsigned!(self, visitor, u64, visit_u64)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.parse_whitespace() {
            Some(b'-') | Some(b'0'..=b'9') => match self.parse_number()?.parsed() {
                Parsed::Unsigned(v) => visitor.visit_f64(v as f64),
                Parsed::Signed(v) => visitor.visit_f64(v as f64),
                Parsed::Float(v) => visitor.visit_f64(v),
            },
            Some(_) => Err(self.peek_invalid_type(&visitor)),
            None => Err(self.error(Cause::EofWhileParsingValue)),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.parse_whitespace() {
            Some(b'"') => {
                self.eat_char();
                match self.parse_str()? {
                    Str::Borrowed(s) => visitor.visit_borrowed_str(s),
                    Str::Owned(s) => visitor.visit_string(s),
                }
            }
            Some(_) => Err(self.peek_invalid_type(&visitor)),
            None => Err(self.error(Cause::EofWhileParsingValue)),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.parse_whitespace() {
            Some(b'n') => {
                self.parse_ident(b"null")?;
                visitor.visit_none()
            }
            Some(_) => visitor.visit_some(self),
            None => Err(self.error(Cause::EofWhileParsingValue)),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.parse_whitespace() {
            Some(b'n') => {
                self.parse_ident(b"null")?;
                visitor.visit_unit()
            }
            Some(_) => Err(self.peek_invalid_type(&visitor)),
            None => Err(self.error(Cause::EofWhileParsingValue)),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.parse_whitespace() {
            Some(b'[') => {
                self.enter()?;
                self.eat_char();
                let ret = visitor.visit_seq(SeqAccess::new(self));
                self.leave();
                let ret = ret?;

                self.end_seq()?;

                Ok(ret)
            }
            Some(_) => Err(self.peek_invalid_type(&visitor)),
            None => Err(self.error(Cause::EofWhileParsingValue)),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.parse_whitespace() {
            Some(b'{') => {
                self.enter()?;
                self.eat_char();
                let ret = visitor.visit_map(MapAccess::new(self));
                self.leave();
                let ret = ret?;

                self.end_map()?;

                Ok(ret)
            }
            Some(_) => Err(self.peek_invalid_type(&visitor)),
            None => Err(self.error(Cause::EofWhileParsingValue)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::new(
            ErrorKind::TypeMapping,
            format_args!("enum `{}` is not supported", name),
        )
        .at(self.index))
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }
}

/// Checks that `v` is a single well-formed JSON value
fn validate(v: &[u8]) -> Result<()> {
    let mut de = Deserializer::new(v);
    let _: de::IgnoredAny = de::Deserialize::deserialize(&mut de)?;
    de.end()
}

/// Deserializes an instance of type `T` from bytes of JSON text
///
/// Malformed input always fails with [`ErrorKind::Syntax`], even when a type
/// mismatch or a missing field would have been detected earlier in the text.
pub fn from_slice<'a, T>(v: &'a [u8]) -> Result<T>
where
    T: de::Deserialize<'a>,
{
    let mut de = Deserializer::new(v);
    let value: Result<T> = de::Deserialize::deserialize(&mut de).and_then(|value| {
        de.end()?;
        Ok(value)
    });
    let offset = de.index;

    value.map_err(|err| {
        let err = err.at(offset);
        if err.kind() == ErrorKind::Syntax {
            return err;
        }
        match validate(v) {
            Err(syntax) => syntax,
            Ok(()) => err,
        }
    })
}

/// Deserializes an instance of type T from a string of JSON text
pub fn from_str<'a, T>(s: &'a str) -> Result<T>
where
    T: de::Deserialize<'a>,
{
    from_slice(s.as_bytes())
}
