use kestrel::{Def, Reflect, ScalarType};

#[derive(Reflect, Default, Debug, PartialEq)]
struct Tags {
    #[kestrel(rename = "k", alias = "key", alias = "KEY")]
    key: String,
    #[kestrel(omit_empty)]
    values: Vec<u32>,
    #[kestrel(skip)]
    started: Option<std::time::Instant>,
}

#[derive(Reflect, Default)]
struct Unit;

#[derive(Reflect, Default)]
struct Tree {
    label: String,
    children: Vec<Tree>,
    parent: Option<Box<Tree>>,
}

#[derive(Reflect, Default)]
struct Wrapper<T> {
    inner: T,
}

#[derive(Reflect, Default)]
struct Keywords {
    r#type: u8,
}

fn fields_of<T: Reflect>() -> &'static [kestrel::Field] {
    match T::SHAPE.def {
        Def::Struct(def) => def.fields,
        other => panic!("expected a struct, got {}", other.kind_name()),
    }
}

#[test]
fn attributes_land_in_fields() {
    kestrel_testhelpers::setup();
    let fields = fields_of::<Tags>();
    assert_eq!(fields.len(), 2, "skipped fields are left out");
    assert_eq!(fields[0].name, "key");
    assert_eq!(fields[0].wire_name(), "k");
    assert_eq!(fields[0].aliases, ["key", "KEY"]);
    assert!(!fields[0].omit_empty);
    assert!(fields[1].omit_empty);
    assert_eq!(fields[1].wire_name(), "values");
    assert_eq!(Tags::SHAPE.type_identifier, "Tags");
}

#[test]
fn accessors_reach_the_field() {
    let mut tags = Tags::default();
    let fields = fields_of::<Tags>();
    (fields[0].get_mut)(&mut tags)
        .and_then(|v| v.downcast_mut::<String>())
        .unwrap()
        .push_str("env");
    assert_eq!(tags.key, "env");
    let values = (fields[1].get)(&tags).unwrap();
    assert_eq!(values.downcast_ref::<Vec<u32>>(), Some(&vec![]));
}

#[test]
fn unit_struct_has_no_fields() {
    assert!(fields_of::<Unit>().is_empty());
}

#[test]
fn recursive_types_resolve_lazily() {
    let fields = fields_of::<Tree>();
    let Def::List(children) = fields[1].shape().def else {
        panic!("expected a list");
    };
    assert_eq!(children.t, Tree::SHAPE);
    assert!(matches!(fields[2].shape().def, Def::Option(_)));
}

#[test]
fn generic_records_get_bounds() {
    let fields = fields_of::<Wrapper<i16>>();
    assert_eq!(fields[0].shape().scalar_type(), Some(ScalarType::I16));
    assert_ne!(Wrapper::<i16>::SHAPE, Wrapper::<u16>::SHAPE);
}

#[test]
fn raw_identifiers_are_unraw() {
    assert_eq!(fields_of::<Keywords>()[0].wire_name(), "type");
}
