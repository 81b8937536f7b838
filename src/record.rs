//! The typed record produced from JSON text, and the parsers that produce it

use serde::Deserialize;

use crate::de::{self, Result};

/// A person-like record with a name and an age
///
/// A `Record` only comes into existence fully populated: parsing either
/// yields every field or fails, and the fields cannot be changed afterwards.
///
/// Both fields are required. Unknown fields in the input are ignored.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
pub struct Record {
    name: String,
    age: i32,
}

impl Record {
    /// Builds a record directly, e.g. as the expected value in a comparison.
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Record {
            name: name.into(),
            age,
        }
    }

    /// The `name` field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `age` field.
    pub fn age(&self) -> i32 {
        self.age
    }
}

/// The capability of turning JSON text into a [`Record`]
///
/// Code that needs records takes a `Parse` implementation instead of calling
/// [`RecordParser`] directly, so tests can substitute a double.
pub trait Parse {
    /// Parses `text` into a record, or reports why it could not.
    fn parse(&self, text: &str) -> Result<Record>;
}

impl<P> Parse for &P
where
    P: Parse + ?Sized,
{
    fn parse(&self, text: &str) -> Result<Record> {
        (**self).parse(text)
    }
}

/// Parses JSON objects into [`Record`]s
///
/// Holds no state; one value can be shared by any number of threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordParser {
    _private: (),
}

impl RecordParser {
    /// Creates a parser.
    pub const fn new() -> Self {
        RecordParser { _private: () }
    }

    /// Parses UTF-8 encoded JSON bytes into a record.
    pub fn parse_slice(&self, bytes: &[u8]) -> Result<Record> {
        de::from_slice(bytes)
    }
}

impl Parse for RecordParser {
    fn parse(&self, text: &str) -> Result<Record> {
        self.parse_slice(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::{Parse, Record, RecordParser};
    use crate::ErrorKind;

    fn parse(text: &str) -> crate::Result<Record> {
        RecordParser::new().parse(text)
    }

    #[test]
    fn valid() {
        assert_eq!(
            parse(r#"{"name": "John", "age": 30}"#),
            Ok(Record::new("John", 30))
        );

        let record = parse(r#" { "age" : -4 , "name" : "" } "#).unwrap();
        assert_eq!(record.name(), "");
        assert_eq!(record.age(), -4);
    }

    #[test]
    fn escaped_name() {
        assert_eq!(
            parse(r#"{"name": "Jo\"hné", "age": 1}"#),
            Ok(Record::new("Jo\"hné", 1))
        );
        assert_eq!(
            parse(r#"{"name": "J\u006fhn", "age": 1}"#),
            Ok(Record::new("John", 1))
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        assert_eq!(
            parse(r#"{"name":"John","age":30,"extra":"x"}"#),
            Ok(Record::new("John", 30))
        );
        assert_eq!(
            parse(r#"{"tags":[1,{"a":null}],"name":"John","nested":{"age":99},"age":30}"#),
            Ok(Record::new("John", 30))
        );
    }

    #[test]
    fn invalid_json() {
        let err = parse("invalid_json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.offset(), Some(0));
        assert!(err.message().contains("Found `i`"), "{}", err);

        for text in &[
            "",
            "   ",
            "{",
            r#"{"name": "John", "age": 30"#,
            r#"{"name": "John" "age": 30}"#,
            r#"{"name": "John", "age": 30,}"#,
            r#"{"name": "John", "age": 30}}"#,
            r#"{"name": John, "age": 30}"#,
            r#"{'name': "John", "age": 30}"#,
        ] {
            assert_eq!(parse(text).unwrap_err().kind(), ErrorKind::Syntax, "{:?}", text);
        }
    }

    #[test]
    fn age_must_be_an_integer() {
        for text in &[
            r#"{"name": "John", "age": "thirty"}"#,
            r#"{"name": "John", "age": "30"}"#,
            r#"{"name": "John", "age": 30.5}"#,
            r#"{"name": "John", "age": 30.0}"#,
            r#"{"name": "John", "age": 3e1}"#,
            r#"{"name": "John", "age": 2147483648}"#,
            r#"{"name": "John", "age": -2147483649}"#,
            r#"{"name": "John", "age": true}"#,
            r#"{"name": "John", "age": null}"#,
            r#"{"name": "John", "age": [30]}"#,
        ] {
            assert_eq!(
                parse(text).unwrap_err().kind(),
                ErrorKind::TypeMapping,
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn type_mapping_message_names_the_value() {
        let err = parse(r#"{"name": "John", "age": "thirty"}"#).unwrap_err();
        assert_eq!(
            err.message(),
            r#"invalid type: string "thirty", expected i32"#
        );
        assert_eq!(err.offset(), Some(24));

        let err = parse(r#"{"name": "John", "age": 30.5}"#).unwrap_err();
        assert_eq!(
            err.message(),
            "invalid type: floating point `30.5`, expected i32"
        );

        let err = parse(r#"{"name": 7, "age": 30}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMapping);
        assert_eq!(
            err.message(),
            "invalid type: integer `7`, expected a string"
        );
    }

    #[test]
    fn fractional_age_message_keeps_the_literal() {
        for literal in &["1e400", "1.50", "0.10000000000000000001", "-2E-3"] {
            let text = format!(r#"{{"name":"a","age":{}}}"#, literal);
            let err = parse(&text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeMapping);
            assert_eq!(
                err.message(),
                format!("invalid type: floating point `{}`, expected i32", literal)
            );
        }
    }

    #[test]
    fn missing_fields_are_errors() {
        let err = parse(r#"{"name": "John", "ag": 30}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.message(), "missing field `age`");

        let err = parse(r#"{"age": 30}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.message(), "missing field `name`");
    }

    #[test]
    fn not_an_object() {
        for text in &[r#""John""#, "30", "[]", "null", "true"] {
            assert_eq!(
                parse(text).unwrap_err().kind(),
                ErrorKind::TypeMapping,
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn duplicate_field() {
        let err = parse(r#"{"name": "John", "name": "Jane", "age": 30}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMapping);
        assert_eq!(err.message(), "duplicate field `name`");
    }

    #[test]
    fn parse_is_repeatable() {
        let parser = RecordParser::new();
        for text in &[
            r#"{"name": "John", "age": 30}"#,
            "invalid_json",
            r#"{"name": "John", "age": "x"}"#,
        ] {
            assert_eq!(parser.parse(text), parser.parse(text));
        }
    }

    #[test]
    fn parse_slice_rejects_invalid_utf8() {
        let err = RecordParser::new()
            .parse_slice(b"{\"name\": \"J\xc3\x28\", \"age\": 30}")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn parse_through_a_reference() {
        fn first_age<P: Parse>(parser: P, text: &str) -> crate::Result<i32> {
            parser.parse(text).map(|record| record.age())
        }

        let parser = RecordParser::new();
        assert_eq!(first_age(&parser, r#"{"name":"a","age":5}"#), Ok(5));
        let dynamic: &dyn Parse = &parser;
        assert_eq!(first_age(dynamic, r#"{"name":"a","age":6}"#), Ok(6));
    }
}
