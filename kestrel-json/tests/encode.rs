use std::collections::{BTreeMap, HashMap};

use kestrel::Reflect;
use kestrel_json::{Config, JsonErrorKind, RawJson};

#[derive(Reflect, Default)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Reflect, Default)]
struct Polygon {
    name: String,
    #[kestrel(rename = "pts")]
    points: Vec<Point>,
    origin: Option<Point>,
    #[kestrel(omit_empty)]
    label: String,
    #[kestrel(omit_empty)]
    weights: Vec<f32>,
    #[kestrel(omit_empty)]
    anchor: Option<Box<Point>>,
    #[kestrel(skip)]
    #[allow(dead_code)]
    cached_area: f64,
}

#[derive(Reflect, Default)]
struct AllOmitted {
    #[kestrel(omit_empty)]
    a: u32,
    #[kestrel(omit_empty)]
    b: Option<String>,
}

#[derive(Reflect, Default)]
struct Empty {}

#[test]
fn records() {
    kestrel_testhelpers::setup();
    let shape = Polygon {
        name: "tri".into(),
        points: vec![Point { x: 0, y: 0 }, Point { x: 3, y: -4 }],
        origin: None,
        cached_area: 6.0,
        ..Polygon::default()
    };
    insta::assert_snapshot!(
        kestrel_json::to_string(&shape).unwrap(),
        @r#"{"name":"tri","pts":[{"x":0,"y":0},{"x":3,"y":-4}],"origin":null}"#
    );

    let shape = Polygon {
        name: "line".into(),
        label: "L".into(),
        weights: vec![0.5],
        anchor: Some(Box::new(Point { x: 1, y: 1 })),
        ..Polygon::default()
    };
    insta::assert_snapshot!(
        kestrel_json::to_string(&shape).unwrap(),
        @r#"{"name":"line","pts":[],"origin":null,"label":"L","weights":[0.5],"anchor":{"x":1,"y":1}}"#
    );
}

#[test]
fn omitted_fields_take_their_separator_along() {
    kestrel_testhelpers::setup();
    assert_eq!(kestrel_json::to_string(&AllOmitted::default()).unwrap(), "{}");
    let partly = AllOmitted {
        a: 0,
        b: Some(String::new()),
    };
    assert_eq!(kestrel_json::to_string(&partly).unwrap(), r#"{"b":""}"#);
    assert_eq!(kestrel_json::to_string(&Empty {}).unwrap(), "{}");
}

#[test]
fn scalars() {
    kestrel_testhelpers::setup();
    assert_eq!(kestrel_json::to_string(&u64::MAX).unwrap(), "18446744073709551615");
    assert_eq!(kestrel_json::to_string(&i8::MIN).unwrap(), "-128");
    assert_eq!(kestrel_json::to_string(&0.1f64).unwrap(), "0.1");
    assert_eq!(kestrel_json::to_string(&1e21f64).unwrap(), "1e21");
    assert_eq!(kestrel_json::to_string(&'\n').unwrap(), r#""\n""#);
    assert_eq!(
        kestrel_json::to_string(&"tab\tquote\"\u{1}".to_string()).unwrap(),
        r#""tab\tquote\"\u0001""#
    );
    assert_eq!(kestrel_json::to_string(&Some(true)).unwrap(), "true");
    assert_eq!(kestrel_json::to_string(&None::<bool>).unwrap(), "null");
}

#[test]
fn non_finite_floats_fail_with_a_path() {
    kestrel_testhelpers::setup();
    let err = kestrel_json::to_string(&vec![1.0, f64::INFINITY]).unwrap_err();
    assert!(matches!(err.kind, JsonErrorKind::UnsupportedValue(_)));
    assert_eq!(err.path_display(), "Vec[1]");
}

#[test]
fn maps() {
    kestrel_testhelpers::setup();
    let mut ordered = BTreeMap::new();
    ordered.insert(10u32, "ten".to_string());
    ordered.insert(2u32, "two".to_string());
    insta::assert_snapshot!(
        kestrel_json::to_string(&ordered).unwrap(),
        @r#"{"2":"two","10":"ten"}"#
    );

    let empty: HashMap<String, u8> = HashMap::new();
    assert_eq!(kestrel_json::to_string(&empty).unwrap(), "{}");

    let nested: Vec<HashMap<String, String>> =
        vec![HashMap::from([("1".to_string(), "2".to_string())])];
    assert_eq!(kestrel_json::to_string(&nested).unwrap(), r#"[{"1":"2"}]"#);
}

#[test]
fn pretty_records() {
    kestrel_testhelpers::setup();
    let api = Config::new().indent(2).freeze();
    let shape = Polygon {
        name: "dot".into(),
        points: vec![Point { x: 1, y: 2 }],
        ..Polygon::default()
    };
    insta::assert_snapshot!(api.to_string(&shape).unwrap(), @r#"
    {
      "name": "dot",
      "pts": [
        {
          "x": 1,
          "y": 2
        }
      ],
      "origin": null
    }
    "#);
}

#[test]
fn raw_json_is_copied_verbatim() {
    kestrel_testhelpers::setup();
    let raw = RawJson::from(r#"{"a" : [1,2]}"#);
    assert_eq!(kestrel_json::to_string(&raw).unwrap(), r#"{"a" : [1,2]}"#);
    assert_eq!(kestrel_json::to_string(&RawJson::default()).unwrap(), "null");

    let strict = Config::new().validate_raw_json(true).freeze();
    assert_eq!(strict.to_string(&raw).unwrap(), r#"{"a" : [1,2]}"#);
    for bad in ["{", "[1,]", "1 2", "  "] {
        assert!(strict.to_string(&RawJson::from(bad)).is_err(), "{bad:?}");
    }
}

#[test]
fn to_writer_streams_into_a_sink() {
    kestrel_testhelpers::setup();
    let values: Vec<String> = (0..2000).map(|i| format!("value number {i}")).collect();
    let mut sink = Vec::new();
    kestrel_json::to_writer(&mut sink, &values).unwrap();
    assert_eq!(sink, kestrel_json::to_vec(&values).unwrap());
    let back: Vec<String> = kestrel_json::from_slice(&sink).unwrap();
    assert_eq!(back, values);
}
