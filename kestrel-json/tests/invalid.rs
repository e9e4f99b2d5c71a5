use std::collections::HashMap;

use kestrel::Reflect;
use kestrel_json::{Any, Config, JsonError, JsonErrorKind, ValueType, api, path};

#[derive(Reflect, Default, Debug)]
struct Metric {
    metric: String,
    tags: HashMap<String, String>,
}

#[derive(Reflect, Default, Debug)]
struct Nothing {}

fn assert_real_error(err: &JsonError) {
    assert!(!err.is_eof(), "expected a real error, got {err}");
}

#[test]
fn missing_closers() {
    kestrel_testhelpers::setup();
    let err = kestrel_json::from_str::<Metric>(r#"{"metric": "sys.777","tags": {"a":"123"}"#)
        .unwrap_err();
    assert!(matches!(err.kind, JsonErrorKind::UnexpectedEof { .. }));
    assert_eq!(err.path[0], kestrel_json::Frame::Type("Metric"));

    let err = kestrel_json::from_str::<Vec<i32>>("[1,2,3").unwrap_err();
    assert!(matches!(err.kind, JsonErrorKind::UnexpectedEof { .. }));
}

#[test]
fn malformed_numbers_are_not_end_of_input() {
    kestrel_testhelpers::setup();
    for input in ["--2", "01", ","] {
        assert_real_error(&kestrel_json::from_str::<f64>(input).unwrap_err());
        assert_real_error(&kestrel_json::from_str::<f32>(input).unwrap_err());
        assert_real_error(&kestrel_json::from_str::<i64>(input).unwrap_err());
        assert_real_error(&kestrel_json::from_str::<Any>(input).unwrap_err());

        let mut reader = api().borrow_reader(input.as_bytes());
        assert!(reader.skip().is_err());
        let err = reader.take_error().unwrap_or_else(|| panic!("{input}: no sticky error"));
        assert_real_error(&err);
    }
    // a leading zero fails however the number ends
    let mut reader = api().borrow_reader(b"01,");
    assert!(reader.skip().is_err());

    for input in ["-2", "0", "0.5", "-0.0e-3"] {
        kestrel_json::from_str::<f64>(input).unwrap();
    }
}

#[test]
fn wrong_containers() {
    kestrel_testhelpers::setup();
    assert!(kestrel_json::from_slice::<Nothing>(&[54, 141, 30]).is_err());
    assert!(kestrel_json::from_slice::<Vec<String>>(b"]").is_err());
    assert!(kestrel_json::from_slice::<[String; 0]>(b"]").is_err());
    assert!(kestrel_json::from_str::<Vec<u8>>(r#"{"a":1}"#).is_err());
    assert!(kestrel_json::from_str::<HashMap<String, u8>>("[1]").is_err());

    let err = kestrel_json::from_str::<HashMap<u8, u8>>(r#"{"x":1}"#).unwrap_err();
    assert!(matches!(
        err.kind,
        JsonErrorKind::InvalidMapKey { ref key, key_type: "u8" } if key == "x"
    ));
}

#[test]
fn bad_strings() {
    kestrel_testhelpers::setup();
    for input in [r#""\x""#, r#""\u12""#, "\"raw\ncontrol\"", "\"unterminated"] {
        assert_real_error(&kestrel_json::from_str::<String>(input).unwrap_err());
    }
    assert!(kestrel_json::from_slice::<String>(b"\"\xff\"").is_err());
}

#[test]
fn trailing_garbage() {
    kestrel_testhelpers::setup();
    let err = kestrel_json::from_str::<Vec<u8>>("[1] x").unwrap_err();
    assert_eq!(err.kind, JsonErrorKind::TrailingCharacters);
    assert!(kestrel_json::read_any(b"{} {}").is_err());
}

#[test]
fn invalid_any_coerces_to_zero_values() {
    kestrel_testhelpers::setup();
    let any = kestrel_json::get(b"[]", path![3]);
    assert_eq!(any.value_type(), ValueType::Invalid);
    assert!(!any.to_bool());
    assert_eq!(any.to_i32(), 0);
    assert_eq!(any.to_i64(), 0);
    assert_eq!(any.to_u32(), 0);
    assert_eq!(any.to_u64(), 0);
    assert_eq!(any.to_f32(), 0.0);
    assert_eq!(any.to_f64(), 0.0);
    assert_eq!(any.to_string(), "");
    assert!(any.get_object().is_empty());
    assert!(any.get_array().is_empty());
    assert_eq!(any.size(), 0);
    assert!(matches!(
        any.last_error().map(|err| &err.kind),
        Some(JsonErrorKind::PathNotFound { .. })
    ));
    // navigating further stays invalid and keeps the first failure
    let further = any.get(path![1, "x"]);
    assert_eq!(further.value_type(), ValueType::Invalid);
    assert_eq!(further.failed_path(), any.failed_path());

    let mut target = 5u8;
    assert!(any.decode_into(&mut target).is_err());
    assert_eq!(target, 5);
}

#[test]
fn unknown_fields_when_disallowed() {
    kestrel_testhelpers::setup();
    let strict = Config::new().disallow_unknown_fields(true).freeze();
    let err = strict
        .from_str::<Metric>(r#"{"metric":"m","tagz":{}}"#)
        .unwrap_err();
    match &err.kind {
        JsonErrorKind::UnknownField {
            field,
            expected,
            suggestion,
        } => {
            assert_eq!(field, "tagz");
            assert_eq!(expected, &["metric", "tags"]);
            assert_eq!(*suggestion, Some("tags"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn strict_records_without_fields() {
    kestrel_testhelpers::setup();
    let strict = Config::new().disallow_unknown_fields(true).freeze();
    strict.from_str::<Nothing>("{}").unwrap();
    strict.from_str::<Nothing>("null").unwrap();
    let err = strict
        .from_str::<Nothing>(r#"{"surprise":1}"#)
        .unwrap_err();
    match &err.kind {
        JsonErrorKind::UnknownField {
            field,
            expected,
            suggestion,
        } => {
            assert_eq!(field, "surprise");
            assert!(expected.is_empty());
            assert_eq!(*suggestion, None);
        }
        other => panic!("unexpected {other:?}"),
    }
    // lenient parsing still skips everything
    api().from_str::<Nothing>(r#"{"surprise":1}"#).unwrap();
}
