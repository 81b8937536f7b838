//! Fault injection through the `Parse` seam; needs the `test-util` feature.

use record_json::testing::{FaultInjector, FORCED_FAILURE_MESSAGE};
use record_json::{ErrorKind, Parse};

fn load_age(parser: &dyn Parse) -> record_json::Result<i32> {
    let record = parser.parse(r#"{"name": "John", "age": 30}"#)?;
    Ok(record.age())
}

#[test]
fn forced_failure_reaches_the_caller() {
    let err = load_age(&FaultInjector).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ForcedTypeMapping);
    assert_eq!(err.message(), FORCED_FAILURE_MESSAGE);
}

#[test]
fn forced_failure_is_deterministic() {
    for _ in 0..3 {
        let err = FaultInjector.force_type_mapping_failure().unwrap_err();
        assert_eq!(err.message(), "Forced type-mapping failure.");
    }
}
