use std::collections::HashMap;

use kestrel::Reflect;
use kestrel_json::{Config, api};

#[derive(Reflect, Default, Debug, PartialEq)]
struct Login {
    #[kestrel(rename = "userName")]
    user_name: String,
    remember: bool,
}

#[test]
fn case_insensitive_fields() {
    kestrel_testhelpers::setup();
    let input = r#"{"USERNAME":"ann","Remember":true}"#;
    let loose = Config::new().case_insensitive(true).freeze();
    let login: Login = loose.from_str(input).unwrap();
    assert_eq!(login.user_name, "ann");
    assert!(login.remember);

    // exact matching ignores the differently cased keys
    let strict: Login = kestrel_json::from_str(input).unwrap();
    assert_eq!(strict, Login::default());
}

#[test]
fn html_escaping() {
    kestrel_testhelpers::setup();
    let text = "<a href=\"x\">&</a>".to_string();
    assert_eq!(
        kestrel_json::to_string(&text).unwrap(),
        r#""<a href=\"x\">&</a>""#
    );
    let html = Config::new().escape_html(true).freeze();
    let esc = |hex: &str| format!("{}u{hex}", '\\');
    assert_eq!(
        html.to_string(&text).unwrap(),
        format!(
            r#""{}a href=\"x\"{}{}{}/a{}""#,
            esc("003c"),
            esc("003e"),
            esc("0026"),
            esc("003c"),
            esc("003e")
        )
    );
    assert_eq!(
        html.to_string(&"a\u{2028}b".to_string()).unwrap(),
        format!(r#""a{}b""#, esc("2028"))
    );
}

#[test]
fn float_precision() {
    kestrel_testhelpers::setup();
    let api = Config::fastest().freeze();
    assert_eq!(api.to_string(&1.234_567_89f64).unwrap(), "1.234568");
    assert_eq!(api.to_string(&0.5f32).unwrap(), "0.5");
    assert_eq!(api.to_string(&3.0f64).unwrap(), "3");
    assert_eq!(api.to_string(&-0.000_000_1f64).unwrap(), "0");

    let two = Config::new().float_precision(2).freeze();
    assert_eq!(two.to_string(&vec![1.005f64, 2.1]).unwrap(), "[1,2.1]");
}

#[test]
fn indentation_of_maps_and_empty_containers() {
    kestrel_testhelpers::setup();
    let api = Config::new().indent(4).sort_map_keys(true).freeze();
    let map = HashMap::from([
        ("b".to_string(), Vec::<u8>::new()),
        ("a".to_string(), vec![1]),
    ]);
    insta::assert_snapshot!(api.to_string(&map).unwrap(), @r#"
    {
        "a": [
            1
        ],
        "b": []
    }
    "#);
}

#[test]
fn apis_keep_their_own_caches() {
    kestrel_testhelpers::setup();
    let a = Config::new().freeze();
    let b = Config::new().freeze();
    assert!(!a.same_as(&b));
    assert!(a.same_as(&a.clone()));
    assert!(api().same_as(api()));
    assert_eq!(a.config(), b.config());
}
