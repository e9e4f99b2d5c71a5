use std::collections::HashMap;

use kestrel::{Bytes, Reflect};
use kestrel_json::{Any, Config, Frame, JsonErrorKind, RawJson, api};

#[derive(Reflect, Default, Debug, PartialEq)]
struct Address {
    street: String,
    zip: Option<u32>,
}

#[derive(Reflect, Default, Debug, PartialEq)]
struct Person {
    name: String,
    age: u8,
    #[kestrel(rename = "e-mail", alias = "email")]
    email: String,
    address: Option<Box<Address>>,
    scores: Vec<f64>,
    pair: [String; 2],
}

#[derive(Reflect, Default, Debug, PartialEq)]
struct Tree {
    label: String,
    children: Vec<Tree>,
}

#[test]
fn nested_records() {
    kestrel_testhelpers::setup();
    let input = r#"{
        "name": "Ann",
        "age": 41,
        "e-mail": "ann@example.com",
        "address": {"street": "Main St", "zip": 12345},
        "scores": [1.5, -2, 3e2],
        "pair": ["left", "right"]
    }"#;
    let person: Person = kestrel_json::from_str(input).unwrap();
    assert_eq!(
        person,
        Person {
            name: "Ann".into(),
            age: 41,
            email: "ann@example.com".into(),
            address: Some(Box::new(Address {
                street: "Main St".into(),
                zip: Some(12345),
            })),
            scores: vec![1.5, -2.0, 300.0],
            pair: ["left".into(), "right".into()],
        }
    );
}

#[test]
fn aliases_and_unknown_fields() {
    kestrel_testhelpers::setup();
    let person: Person =
        kestrel_json::from_str(r#"{"extra":{"deep":[1,{"x":null}]},"email":"a@b.c","age":3}"#)
            .unwrap();
    assert_eq!(person.email, "a@b.c");
    assert_eq!(person.age, 3);
}

#[test]
fn missing_fields_keep_their_values() {
    kestrel_testhelpers::setup();
    let mut person = Person {
        name: "kept".into(),
        scores: vec![9.0],
        ..Person::default()
    };
    kestrel_json::from_slice_into(br#"{"age":7}"#, &mut person).unwrap();
    assert_eq!(person.name, "kept");
    assert_eq!(person.age, 7);
    assert_eq!(person.scores, vec![9.0]);
}

#[test]
fn null_handling() {
    kestrel_testhelpers::setup();
    let mut person = Person {
        name: "kept".into(),
        age: 5,
        address: Some(Box::default()),
        scores: vec![1.0],
        ..Person::default()
    };
    kestrel_json::from_slice_into(
        br#"{"name":null,"age":null,"address":null,"scores":null}"#,
        &mut person,
    )
    .unwrap();
    // scalars stay, options empty, sequences clear
    assert_eq!(person.name, "kept");
    assert_eq!(person.age, 5);
    assert_eq!(person.address, None);
    assert!(person.scores.is_empty());

    // a null record is left alone
    let mut address = Address {
        street: "x".into(),
        zip: None,
    };
    kestrel_json::from_slice_into(b"null", &mut address).unwrap();
    assert_eq!(address.street, "x");
}

#[test]
fn sequences_replace_their_contents() {
    kestrel_testhelpers::setup();
    let mut scores = vec![1.0, 2.0, 3.0];
    kestrel_json::from_slice_into(b"[4]", &mut scores).unwrap();
    assert_eq!(scores, vec![4.0]);
}

#[test]
fn fixed_arrays_ignore_extras_and_keep_missing_slots() {
    kestrel_testhelpers::setup();
    let long: [u8; 2] = kestrel_json::from_str("[1, 2, 3, [4]]").unwrap();
    assert_eq!(long, [1, 2]);

    let mut short = [7u8, 8, 9];
    kestrel_json::from_slice_into(b"[1]", &mut short).unwrap();
    assert_eq!(short, [1, 8, 9]);

    let empty: [String; 0] = kestrel_json::from_str("[\"ignored\"]").unwrap();
    assert_eq!(empty.len(), 0);
}

#[test]
fn recursive_records() {
    kestrel_testhelpers::setup();
    let tree: Tree = kestrel_json::from_str(
        r#"{"label":"root","children":[{"label":"a","children":[]},{"label":"b","children":[{"label":"c"}]}]}"#,
    )
    .unwrap();
    assert_eq!(tree.children.len(), 2);
    assert_eq!(tree.children[1].children[0].label, "c");
}

#[test]
fn unicode_strings() {
    kestrel_testhelpers::setup();
    let s: String = kestrel_json::from_str(r#""café 😀 \"q\" \\ \/""#).unwrap();
    assert_eq!(s, "café 😀 \"q\" \\ /");
    let c: char = kestrel_json::from_str(r#""é""#).unwrap();
    assert_eq!(c, 'é');
}

#[test]
fn bytes_fields_are_base64() {
    kestrel_testhelpers::setup();
    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Blob {
        data: Bytes,
        raw: Vec<u8>,
    }
    let blob: Blob = kestrel_json::from_str(r#"{"data":"YWJj","raw":[97,98]}"#).unwrap();
    assert_eq!(blob.data, Bytes::new(b"abc".to_vec()));
    assert_eq!(blob.raw, b"ab");
    assert_eq!(
        kestrel_json::to_string(&blob).unwrap(),
        r#"{"data":"YWJj","raw":[97,98]}"#
    );

    let err = kestrel_json::from_str::<Blob>(r#"{"data":"not base64!"}"#).unwrap_err();
    assert!(matches!(err.kind, JsonErrorKind::InvalidBase64(_)));
    assert_eq!(err.path_display(), "Blob.data");
}

#[test]
fn any_and_raw_fields_capture_values() {
    kestrel_testhelpers::setup();
    #[derive(Reflect, Default)]
    struct Envelope {
        kind: String,
        payload: Any,
        raw: RawJson,
    }
    let input = r#"{"kind":"point","payload":{"x":1,"y":[2,3]},"raw":[true, null]}"#;
    let envelope: Envelope = kestrel_json::from_str(input).unwrap();
    assert_eq!(envelope.kind, "point");
    assert_eq!(envelope.payload.get(kestrel_json::path!["y", 1]).to_i64(), 3);
    assert_eq!(envelope.raw.as_bytes(), b"[true, null]");
    assert_eq!(
        kestrel_json::to_string(&envelope).unwrap(),
        r#"{"kind":"point","payload":{"x":1,"y":[2,3]},"raw":[true, null]}"#
    );
}

#[test]
fn errors_carry_their_path() {
    kestrel_testhelpers::setup();
    let err = kestrel_json::from_str::<Person>(r#"{"scores":[1, "two"]}"#).unwrap_err();
    assert_eq!(
        err.path,
        vec![
            Frame::Type("Person"),
            Frame::Field("scores"),
            Frame::Index(1)
        ]
    );
    assert!(err.offset.is_some());

    let err =
        kestrel_json::from_str::<HashMap<String, u8>>(r#"{"ok":1,"big":300}"#).unwrap_err();
    assert!(matches!(err.kind, JsonErrorKind::NumberOutOfRange { .. }));
    assert_eq!(err.path_display(), r#"HashMap["big"]"#);
}

#[test]
fn readers_stream_from_io() {
    kestrel_testhelpers::setup();
    let input = br#"{"label":"streamed","children":[{"label":"leaf","children":[]}]}"#;
    let tree: Tree = api().from_reader(&input[..]).unwrap();
    assert_eq!(tree.children[0].label, "leaf");
}

#[test]
fn depth_limit_applies_to_records() {
    kestrel_testhelpers::setup();
    let api = Config::new().max_depth(3).freeze();
    let ok = r#"{"label":"a","children":[{"label":"b"}]}"#;
    assert!(api.from_str::<Tree>(ok).is_ok());
    let deep = r#"{"children":[{"children":[{"children":[]}]}]}"#;
    let err = api.from_str::<Tree>(deep).unwrap_err();
    assert!(matches!(err.kind, JsonErrorKind::DepthLimitExceeded { limit: 3 }));
}
