//! Test doubles for code that depends on [`Parse`]
//!
//! Only compiled for this crate's own tests, or when the `test-util` feature
//! is enabled by a downstream test suite.

use crate::de::{Error, ErrorKind, Result};
use crate::record::{Parse, Record};

/// Message carried by every failure from [`FaultInjector`].
pub const FORCED_FAILURE_MESSAGE: &str = "Forced type-mapping failure.";

/// A [`Parse`] implementation that never succeeds
///
/// Every call fails with [`ErrorKind::ForcedTypeMapping`] and
/// [`FORCED_FAILURE_MESSAGE`], whatever the input. Swap it in for a real
/// parser to check that callers surface failures instead of masking them.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaultInjector;

impl FaultInjector {
    /// Fails with the forced type-mapping error.
    pub fn force_type_mapping_failure(&self) -> Result<Record> {
        Err(Error::new(
            ErrorKind::ForcedTypeMapping,
            FORCED_FAILURE_MESSAGE,
        ))
    }
}

impl Parse for FaultInjector {
    fn parse(&self, _text: &str) -> Result<Record> {
        self.force_type_mapping_failure()
    }
}

#[cfg(test)]
mod tests {
    use super::{FaultInjector, FORCED_FAILURE_MESSAGE};
    use crate::{ErrorKind, Parse, Record, RecordParser};

    #[test]
    fn always_fails_with_the_same_error() {
        let injector = FaultInjector;
        let first = injector.force_type_mapping_failure().unwrap_err();
        let second = injector.force_type_mapping_failure().unwrap_err();

        assert_eq!(first.kind(), ErrorKind::ForcedTypeMapping);
        assert_eq!(first.message(), "Forced type-mapping failure.");
        assert_eq!(first.to_string(), FORCED_FAILURE_MESSAGE);
        assert_eq!(first.offset(), None);
        assert_eq!(first, second);
    }

    #[test]
    fn ignores_the_input() {
        let injector = FaultInjector;
        for text in &[r#"{"name": "John", "age": 30}"#, "invalid_json", ""] {
            let err = injector.parse(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ForcedTypeMapping);
            assert_eq!(err.message(), FORCED_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn stands_in_for_a_real_parser() {
        fn names(parser: &dyn Parse, texts: &[&str]) -> crate::Result<Vec<String>> {
            texts
                .iter()
                .map(|text| parser.parse(text).map(|record| record.name().to_owned()))
                .collect()
        }

        let texts = [r#"{"name": "John", "age": 30}"#, r#"{"name": "Jane", "age": 31}"#];

        assert_eq!(
            names(&RecordParser::new(), &texts),
            Ok(vec![String::from("John"), String::from("Jane")])
        );

        // the failure reaches the caller instead of turning into an empty result
        let err = names(&FaultInjector, &texts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ForcedTypeMapping);
        assert_eq!(err.message(), FORCED_FAILURE_MESSAGE);
    }

    #[test]
    fn the_real_parser_succeeds_where_the_double_fails() {
        let text = r#"{"name": "John", "age": 30}"#;
        assert_eq!(RecordParser::new().parse(text), Ok(Record::new("John", 30)));
        assert!(FaultInjector.parse(text).is_err());
    }
}
