#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use chrono::{NaiveDate, Timelike};

use jobtrack_core::error::ErrorCode;
use jobtrack_core::value::{format_timestamp, parse_timestamp};
use jobtrack_core::{MetricValue, StoreValue};

#[test]
fn timestamps_written_by_us_parse_back() {
    let ts = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_nano_opt(10, 15, 30, 123_000_000)
        .unwrap();
    let raw = format_timestamp(ts);
    assert_eq!(raw, "2024-05-01T10:15:30.123");
    assert_eq!(parse_timestamp("k", &raw).unwrap(), ts);
}

#[test]
fn nanosecond_and_minute_precision_are_accepted() {
    let ts = parse_timestamp("k", "2024-05-01T10:15:30.123456789").unwrap();
    assert_eq!(ts.nanosecond(), 123_456_789);

    let ts = parse_timestamp("k", "2024-05-01T10:15").unwrap();
    assert_eq!(ts.second(), 0);
    assert_eq!(ts.minute(), 15);
}

#[test]
fn garbage_timestamp_is_an_error() {
    let err = parse_timestamp("job.firstExecuted", "yesterday").unwrap_err();
    assert_eq!(err.code(), ErrorCode::MalformedTimestamp);
    assert_eq!(err.code().as_str(), "MALFORMED_TIMESTAMP");
    assert!(err.to_string().contains("job.firstExecuted"));
}

#[test]
fn only_numbers_are_metrics() {
    assert_eq!(StoreValue::Int(3).as_metric(), Some(MetricValue::Int(3)));
    assert_eq!(StoreValue::Float(1.5).as_metric(), Some(MetricValue::Float(1.5)));
    assert_eq!(StoreValue::Bool(true).as_metric(), None);
    assert_eq!(StoreValue::from("12").as_metric(), None);
}

#[test]
fn only_boolean_true_is_true() {
    assert!(StoreValue::Bool(true).is_true());
    assert!(!StoreValue::Bool(false).is_true());
    assert!(!StoreValue::from("true").is_true());
    assert!(!StoreValue::Int(1).is_true());
}

#[test]
fn metric_values_serialize_as_plain_numbers() {
    let v = serde_json::to_string(&[MetricValue::Int(2), MetricValue::Float(100.0)]).unwrap();
    assert_eq!(v, "[2,100.0]");
}
