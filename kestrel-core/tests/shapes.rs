use core::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

use kestrel_core::{Def, Field, Reflect, ScalarType, Shape, StructDef, shape_of};

#[derive(Default, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

impl Reflect for Point {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: TypeId::of::<Self>,
            type_identifier: "Point",
            type_name: core::any::type_name::<Self>,
            def: Def::Struct(StructDef::new(&const {
                [
                    Field::new(
                        "x",
                        shape_of::<i32>,
                        |v| Some(&v.downcast_ref::<Point>()?.x as &dyn Any),
                        |v| Some(&mut v.downcast_mut::<Point>()?.x as &mut dyn Any),
                    ),
                    Field::new(
                        "y",
                        shape_of::<i32>,
                        |v| Some(&v.downcast_ref::<Point>()?.y as &dyn Any),
                        |v| Some(&mut v.downcast_mut::<Point>()?.y as &mut dyn Any),
                    )
                    .rename("Y")
                    .aliases(&["why"]),
                ]
            })),
        }
    };
}

#[test]
fn scalar_shapes() {
    kestrel_testhelpers::setup();
    assert_eq!(u32::SHAPE.scalar_type(), Some(ScalarType::U32));
    assert_eq!(String::SHAPE.scalar_type(), Some(ScalarType::String));
    assert!(f64::SHAPE.scalar_type().is_some_and(ScalarType::is_numeric));
    assert!(!bool::SHAPE.scalar_type().is_some_and(ScalarType::is_numeric));
    assert!(u8::SHAPE.is_type::<u8>());
}

#[test]
fn list_vtable_pushes_and_reads() {
    let Def::List(def) = Vec::<i32>::SHAPE.def else {
        panic!("expected a list def");
    };
    assert_eq!(def.t(), i32::SHAPE);

    let mut list: Vec<i32> = vec![1];
    let slot = (def.vtable.push_default)(&mut list).unwrap();
    *slot.downcast_mut::<i32>().unwrap() = 7;
    assert_eq!(list, vec![1, 7]);
    assert_eq!((def.vtable.len)(&list), 2);
    let second = (def.vtable.get)(&list, 1).unwrap();
    assert_eq!(second.downcast_ref::<i32>(), Some(&7));

    (def.vtable.clear)(&mut list);
    assert!(list.is_empty());

    // the wrong type is ignored rather than misread
    assert_eq!((def.vtable.len)(&"nope".to_string()), 0);
}

#[test]
fn map_vtable_replaces_existing_values() {
    let Def::Map(def) = HashMap::<u32, Vec<i32>>::SHAPE.def else {
        panic!("expected a map def");
    };
    let mut map = HashMap::from([(1u32, vec![1, 2, 3])]);
    let slot = (def.vtable.insert_default)(&mut map, "1").unwrap();
    assert_eq!(slot.downcast_ref::<Vec<i32>>(), Some(&vec![]));
    assert!((def.vtable.insert_default)(&mut map, "one").is_none());

    let mut keys = Vec::new();
    (def.vtable.for_each)(&map, &mut |key, _| keys.push(key.to_owned()));
    assert_eq!(keys, ["1"]);
}

#[test]
fn btree_map_iterates_in_key_order() {
    let Def::Map(def) = BTreeMap::<String, bool>::SHAPE.def else {
        panic!("expected a map def");
    };
    let map = BTreeMap::from([("b".to_string(), true), ("a".to_string(), false)]);
    let mut seen = Vec::new();
    (def.vtable.for_each)(&map, &mut |key, value| {
        seen.push((key.to_owned(), *value.downcast_ref::<bool>().unwrap()));
    });
    assert_eq!(seen, [("a".to_string(), false), ("b".to_string(), true)]);
    assert!((def.vtable.get)(&map, "b").is_some());
    assert!((def.vtable.get)(&map, "c").is_none());
}

#[test]
fn option_vtable_inserts_default() {
    let Def::Option(def) = Option::<String>::SHAPE.def else {
        panic!("expected an option def");
    };
    let mut value: Option<String> = None;
    assert!(!(def.vtable.is_some)(&value));
    let inner = (def.vtable.get_or_insert_default)(&mut value).unwrap();
    inner.downcast_mut::<String>().unwrap().push_str("hi");
    assert_eq!(value.as_deref(), Some("hi"));
    (def.vtable.set_none)(&mut value);
    assert_eq!(value, None);
}

#[test]
fn array_vtable_is_bounded() {
    let Def::Array(def) = <[u8; 2]>::SHAPE.def else {
        panic!("expected an array def");
    };
    assert_eq!(def.n, 2);
    let mut array = [1u8, 2];
    assert!((def.vtable.get_mut)(&mut array, 2).is_none());
    *(def.vtable.get_mut)(&mut array, 1)
        .unwrap()
        .downcast_mut::<u8>()
        .unwrap() = 9;
    assert_eq!(array, [1, 9]);
}

#[test]
fn record_fields_resolve_names() {
    let Def::Struct(def) = Point::SHAPE.def else {
        panic!("expected a struct def");
    };
    let y = def.field("y").unwrap();
    assert_eq!(y.wire_name(), "Y");
    assert_eq!(y.decode_names().collect::<Vec<_>>(), ["Y", "why"]);
    assert_eq!(y.shape(), i32::SHAPE);

    let mut point = Point { x: 1, y: 2 };
    *(y.get_mut)(&mut point).unwrap().downcast_mut::<i32>().unwrap() = 5;
    assert_eq!(point, Point { x: 1, y: 5 });
    assert!((y.get)(&1u8).is_none());
}

#[test]
fn boxed_pointer_borrows_pointee() {
    let Def::Pointer(def) = Box::<i64>::SHAPE.def else {
        panic!("expected a pointer def");
    };
    let boxed = Box::new(3i64);
    assert_eq!(
        (def.vtable.borrow)(&boxed).and_then(|v| v.downcast_ref::<i64>()),
        Some(&3)
    );
}
