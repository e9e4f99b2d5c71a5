use std::collections::HashMap;

use kestrel::Reflect;
use kestrel_json::{Any, PathSegment, ValueType, api, path};

const USERS: &[u8] = br#"{
    "users": [
        {"name": "ann", "age": 41, "tags": ["a", "b"]},
        {"name": "bob", "age": "29"},
        {"nick": "c"}
    ],
    "count": 3
}"#;

#[derive(Reflect, Default, Debug, PartialEq)]
struct User {
    name: String,
    age: u32,
    tags: Vec<String>,
}

#[test]
fn navigates_lazily() {
    kestrel_testhelpers::setup();
    let doc = kestrel_json::read_any(USERS).unwrap();
    assert_eq!(doc.value_type(), ValueType::Object);
    assert_eq!(doc.keys(), vec!["users", "count"]);
    assert_eq!(doc.get(path!["count"]).to_i32(), 3);
    assert_eq!(doc.get(path!["users", 0, "tags", 1]).to_string(), "b");
    assert_eq!(doc.get(path!["users"]).size(), 3);
    // an empty path is the value itself
    assert_eq!(doc.get(path![]).size(), 2);
}

#[test]
fn wildcard_skips_children_that_miss() {
    kestrel_testhelpers::setup();
    let names = kestrel_json::get(USERS, path!["users", '*', "name"]);
    assert_eq!(names.value_type(), ValueType::Object);
    assert_eq!(names.to_string(), r#"{"0":"ann","1":"bob"}"#);

    let ages = kestrel_json::get(USERS, path!["users", '*', "age"]);
    assert_eq!(ages.get(path!["1"]).to_u32(), 29);

    let nothing = kestrel_json::get(USERS, path!["users", '*', "missing"]);
    assert_eq!(nothing.size(), 0);
}

#[test]
fn failures_name_the_path_walked() {
    kestrel_testhelpers::setup();
    let doc = kestrel_json::read_any(USERS).unwrap();
    let missing = doc.get(path!["users", 5, "name"]);
    assert!(missing.is_invalid());
    assert_eq!(
        missing.failed_path(),
        Some(&[PathSegment::Key("users".into()), PathSegment::Index(5)][..])
    );
    let wrong_kind = doc.get(path!["count", "x"]);
    assert!(wrong_kind.is_invalid());
    assert!(wrong_kind.last_error().is_some());
}

#[test]
fn write_to_copies_unparsed_bytes() {
    kestrel_testhelpers::setup();
    let doc = kestrel_json::read_any(br#"  {"a" : [1, 2.50]}  "#).unwrap();
    let mut writer = api().borrow_writer();
    doc.write_to(&mut writer).unwrap();
    assert_eq!(writer.buffered(), br#"{"a" : [1, 2.50]}"#);

    // parsed values are written compactly
    assert_eq!(doc.materialize().to_string(), r#"{"a":[1,2.5]}"#);
    assert_eq!(doc.get(path!["a", 1]).to_string(), "2.50");
}

#[test]
fn built_values() {
    kestrel_testhelpers::setup();
    let value = Any::from(vec![Any::from(1i64), Any::from("two"), Any::null(), Any::from(true)]);
    assert_eq!(value.to_string(), r#"[1,"two",null,true]"#);
    assert_eq!(value.get(path![1]).to_string(), "two");
    assert_eq!(kestrel_json::to_string(&value).unwrap(), r#"[1,"two",null,true]"#);
}

#[test]
fn decodes_into_records() {
    kestrel_testhelpers::setup();
    let ann: User = kestrel_json::get(USERS, path!["users", 0]).decode().unwrap();
    assert_eq!(
        ann,
        User {
            name: "ann".into(),
            age: 41,
            tags: vec!["a".into(), "b".into()],
        }
    );
    // a quoted number is not a u32
    assert!(kestrel_json::get(USERS, path!["users", 1]).decode::<User>().is_err());
}

#[test]
fn wrapped_records_answer_like_parsed_ones() {
    kestrel_testhelpers::setup();
    let user = User {
        name: "cy".into(),
        age: 7,
        tags: vec!["x".into()],
    };
    let any = Any::wrap(user);
    assert_eq!(any.value_type(), ValueType::Object);
    assert_eq!(any.keys(), vec!["name", "age", "tags"]);
    assert_eq!(any.get(path!["tags", 0]).to_string(), "x");
    assert_eq!(any.get(path!["age"]).to_i64(), 7);
    assert_eq!(any.to_string(), r#"{"name":"cy","age":7,"tags":["x"]}"#);
    assert!(any.get(path!["nope"]).is_invalid());

    let back: User = any.decode().unwrap();
    assert_eq!(back.name, "cy");
}

#[test]
fn coercions() {
    kestrel_testhelpers::setup();
    let doc = kestrel_json::read_any(
        br#"{"s":"12px","neg":"-3.5e1","f":2.9,"big":1e30,"t":true,"e":"","z":"0","o":{}}"#,
    )
    .unwrap();
    assert_eq!(doc.get(path!["s"]).to_i64(), 12);
    assert_eq!(doc.get(path!["neg"]).to_f64(), -35.0);
    assert_eq!(doc.get(path!["neg"]).to_u64(), 0);
    assert_eq!(doc.get(path!["f"]).to_i32(), 2);
    assert_eq!(doc.get(path!["big"]).to_i64(), i64::MAX);
    assert_eq!(doc.get(path!["t"]).to_f64(), 1.0);
    assert!(!doc.get(path!["e"]).to_bool());
    assert!(!doc.get(path!["z"]).to_bool());
    assert!(!doc.get(path!["o"]).to_bool());
    assert!(doc.get(path!["s"]).to_bool());
}

#[test]
fn containers_coerce_to_one_or_zero() {
    kestrel_testhelpers::setup();
    let doc = kestrel_json::read_any(br#"{"a":[5,6,7],"o":{"x":9,"y":2},"e":[],"n":{}}"#).unwrap();
    for repr in [doc.clone(), doc.materialize()] {
        let a = repr.get(path!["a"]);
        assert_eq!(a.to_i64(), 1);
        assert_eq!(a.to_u64(), 1);
        assert_eq!(a.to_i32(), 1);
        assert_eq!(repr.get(path!["o"]).to_f64(), 1.0);
        assert_eq!(repr.get(path!["o"]).to_u32(), 1);
        assert_eq!(repr.get(path!["e"]).to_i64(), 0);
        assert_eq!(repr.get(path!["n"]).to_f64(), 0.0);
        assert_eq!(repr.to_i64(), 1);
    }

    assert_eq!(Any::wrap(vec![5, 6, 7]).to_i64(), 1);
    assert_eq!(Any::wrap(vec![5u8]).to_f64(), 1.0);
    assert_eq!(Any::wrap(Vec::<i32>::new()).to_u64(), 0);
    assert_eq!(Any::wrap(HashMap::from([("x".to_string(), 9)])).to_f64(), 1.0);
    assert_eq!(Any::wrap(HashMap::<String, i32>::new()).to_i64(), 0);
}
