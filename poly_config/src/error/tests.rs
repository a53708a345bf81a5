//! Unit tests for error classification and aggregation behaviour.

use rstest::rstest;

use super::{DecodeResult, ErrorKind, ErrorReport, PolyError, ValidationError, ValidationLevel};
use crate::path::CanonicalPath;

fn entry(path: &str, kind: ErrorKind) -> ValidationError {
    ValidationError::new(CanonicalPath::parse(path), kind, "test")
}

fn missing_optional(component: &str, default: Option<&str>) -> ErrorKind {
    ErrorKind::MissingOptionalValue {
        schema: "TowerConfig".into(),
        component: component.into(),
        default: default.map(str::to_owned),
    }
}

#[rstest]
#[case(ErrorKind::NullValue, ValidationLevel::Error)]
#[case(ErrorKind::DuplicateKey, ValidationLevel::Error)]
#[case(ErrorKind::MissingValue, ValidationLevel::MissingRequiredValue)]
#[case(
    ErrorKind::MissingRequiredValue { schema: "S".into(), component: "c".into() },
    ValidationLevel::MissingRequiredValue
)]
#[case(missing_optional("mitosis", Some("true")), ValidationLevel::MissingOptionalValueUsingDefault)]
fn kinds_map_to_levels(#[case] kind: ErrorKind, #[case] expected: ValidationLevel) {
    assert_eq!(kind.level(), expected);
}

#[rstest]
fn only_default_notices_are_informational() {
    assert!(ValidationLevel::Error.is_blocking());
    assert!(ValidationLevel::MissingRequiredValue.is_blocking());
    assert!(!ValidationLevel::MissingOptionalValueUsingDefault.is_blocking());
}

#[rstest]
fn display_includes_level_path_and_source() {
    let error = entry(
        "health-multiplier",
        ErrorKind::InvalidValue {
            value: "fast".into(),
            target: "float".into(),
        },
    );
    assert_eq!(
        error.to_string(),
        "[error] health-multiplier: unable to parse `fast` as float (from test)"
    );
}

#[rstest]
fn missing_optional_mentions_default_text() {
    let error = entry("health-multiplier", missing_optional("health_multiplier", Some("1.03")));
    assert!(error.description().contains("using default `1.03`"));
    let bare = entry("buildable-on-path", missing_optional("buildable_on_path", None));
    assert!(!bare.description().contains("default"));
}

#[rstest]
fn report_numbers_every_entry() {
    let report = ErrorReport::new(vec![
        entry("a", ErrorKind::NullValue),
        entry("b", ErrorKind::DuplicateKey),
    ]);
    let rendered = report.to_string();
    assert!(rendered.starts_with("1: [error] a"), "{rendered}");
    assert!(rendered.contains("\n2: [error] b"), "{rendered}");
}

#[rstest]
fn report_separates_blocking_from_informational() {
    let report = ErrorReport::new(vec![
        entry("mitosis", missing_optional("mitosis", Some("true"))),
        entry("drops", ErrorKind::MissingValue),
    ]);
    assert!(report.is_blocking());
    assert_eq!(report.blocking().count(), 1);
    assert_eq!(
        report
            .at_level(ValidationLevel::MissingOptionalValueUsingDefault)
            .count(),
        1
    );

    let informational = ErrorReport::new(vec![entry(
        "mitosis",
        missing_optional("mitosis", Some("true")),
    )]);
    assert!(!informational.is_blocking());
}

#[rstest]
fn decode_result_keeps_errors_through_map() {
    let mut result = DecodeResult::ok(2_i64);
    result.push_error(entry("x", missing_optional("x", Some("2"))));
    let mapped = result.map(|value| value * 10);
    assert_eq!(mapped.value(), Some(&20));
    assert_eq!(mapped.errors().len(), 1);
    assert!(!mapped.has_blocking_errors());
    assert_eq!(
        mapped
            .errors_not_level(ValidationLevel::MissingOptionalValueUsingDefault)
            .count(),
        0
    );
}

#[rstest]
fn failed_result_has_no_value() {
    let result: DecodeResult<bool> =
        DecodeResult::failed(&CanonicalPath::parse("mitosis"), ErrorKind::NullValue, "Bool");
    assert!(!result.has_value());
    assert!(result.has_blocking_errors());
    let (value, errors) = result.into_parts();
    assert!(value.is_none());
    assert_eq!(errors[0].raised_by(), "Bool");
}

#[rstest]
fn poly_error_exposes_rejected_report() {
    let report = ErrorReport::new(vec![entry("drops", ErrorKind::MissingValue)]);
    let err = PolyError::Rejected(Box::new(report));
    assert_eq!(err.report().map(ErrorReport::len), Some(1));
    assert!(err.to_string().starts_with("configuration reload rejected"));
    assert!(PolyError::NotLoaded.report().is_none());
}
