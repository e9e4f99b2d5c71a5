//! [`Any`] views into native values.
//!
//! A view keeps the wrapped root alive and records how to reach the viewed
//! value from it; the value is re-borrowed through those steps whenever it
//! is needed. Scalars are converted on the spot, so only containers stay
//! views.

use std::any::Any as StdAny;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use kestrel_core::{Bytes, Def, Reflect, ScalarType, Shape};

use super::lazy::Num;
use super::{Any, Array, Object, Repr};
use crate::codec::wrong_target_named;
use crate::error::Result;
use crate::{Api, Writer};

type GetFn = for<'a> fn(&'a dyn StdAny) -> Option<&'a dyn StdAny>;
type AtFn = for<'a> fn(&'a dyn StdAny, usize) -> Option<&'a dyn StdAny>;
type KeyFn = for<'a> fn(&'a dyn StdAny, &str) -> Option<&'a dyn StdAny>;

#[derive(Clone)]
enum Step {
    Get(GetFn),
    At(AtFn, usize),
    Key(KeyFn, String),
}

#[derive(Clone)]
pub(crate) struct Native {
    root: Arc<dyn StdAny + Send + Sync>,
    steps: Vec<Step>,
    pub(crate) shape: &'static Shape,
    pub(crate) api: Api,
}

/// View a whole value.
pub(crate) fn wrap<T: Reflect>(api: &Api, value: T) -> Any {
    view(Native {
        root: Arc::new(value),
        steps: Vec::new(),
        shape: T::SHAPE,
        api: api.clone(),
    })
}

fn view(native: Native) -> Any {
    let Some(value) = native.value() else {
        return native.lost();
    };
    let def = native.shape.def;
    match def {
        Def::Scalar(scalar) => match scalar_any(scalar, value) {
            Some(any) => any,
            None => native.lost(),
        },
        Def::Option(def) => {
            if (def.vtable.is_some)(value) {
                native.step(Step::Get(def.vtable.get_value), def.t)
            } else {
                Any::null()
            }
        }
        Def::Pointer(def) => native.step(Step::Get(def.vtable.borrow), def.pointee),
        Def::List(_) | Def::Array(_) => Any::from_repr(Repr::Array(Array::Native(native))),
        Def::Map(_) | Def::Struct(_) => Any::from_repr(Repr::Object(Object::Native(native))),
        Def::Opaque => {
            if let Some(any) = value.downcast_ref::<Any>() {
                return any.clone();
            }
            // no structure to look into: go through the encoded form
            let mut writer = Writer::new(&native.api);
            let encoded = native
                .api
                .encoder_for(native.shape)
                .and_then(|encoder| encoder.encode(value, &mut writer))
                .and_then(|()| writer.check());
            match encoded {
                Ok(()) => Any::from_bytes(&native.api, writer.to_vec()),
                Err(err) => Any::invalid(Vec::new(), err),
            }
        }
    }
}

fn scalar_any(scalar: ScalarType, value: &dyn StdAny) -> Option<Any> {
    fn num<T: Copy + 'static>(value: &dyn StdAny, to_num: impl Fn(T) -> Num) -> Option<Any> {
        value.downcast_ref::<T>().map(|v| Any::from_num(to_num(*v)))
    }

    match scalar {
        ScalarType::Bool => value.downcast_ref::<bool>().map(|b| Any::from_bool(*b)),
        ScalarType::Char => value.downcast_ref::<char>().map(|c| Any::from_string(*c)),
        ScalarType::String => value.downcast_ref::<String>().map(Any::from_string),
        ScalarType::Bytes => value
            .downcast_ref::<Bytes>()
            .map(|bytes| Any::from_string(STANDARD.encode(&bytes.0))),
        ScalarType::F32 => num(value, |v: f32| Num::Float(f64::from(v))),
        ScalarType::F64 => num(value, Num::Float),
        ScalarType::U8 => num(value, |v: u8| Num::Uint(u64::from(v))),
        ScalarType::U16 => num(value, |v: u16| Num::Uint(u64::from(v))),
        ScalarType::U32 => num(value, |v: u32| Num::Uint(u64::from(v))),
        ScalarType::U64 => num(value, Num::Uint),
        ScalarType::USize => num(value, |v: usize| {
            Num::Uint(u64::try_from(v).unwrap_or(u64::MAX))
        }),
        ScalarType::I8 => num(value, |v: i8| Num::Int(i64::from(v))),
        ScalarType::I16 => num(value, |v: i16| Num::Int(i64::from(v))),
        ScalarType::I32 => num(value, |v: i32| Num::Int(i64::from(v))),
        ScalarType::I64 => num(value, Num::Int),
        ScalarType::ISize => num(value, |v: isize| {
            Num::Int(i64::try_from(v).unwrap_or(i64::MAX))
        }),
    }
}

impl Native {
    /// Borrow the viewed value from the root.
    pub(crate) fn value(&self) -> Option<&dyn StdAny> {
        let mut value: &dyn StdAny = &*self.root;
        for step in &self.steps {
            value = match step {
                Step::Get(get) => get(value)?,
                Step::At(at, index) => at(value, *index)?,
                Step::Key(get, key) => get(value, key)?,
            };
        }
        Some(value)
    }

    fn step(&self, step: Step, shape: &'static Shape) -> Any {
        let mut steps = self.steps.clone();
        steps.push(step);
        view(Native {
            root: Arc::clone(&self.root),
            steps,
            shape,
            api: self.api.clone(),
        })
    }

    fn lost(&self) -> Any {
        Any::invalid(Vec::new(), wrong_target_named(self.shape.type_identifier))
    }

    pub(crate) fn member(&self, key: &str) -> Option<Any> {
        let value = self.value()?;
        match self.shape.def {
            Def::Map(def) => {
                (def.vtable.get)(value, key)?;
                Some(self.step(Step::Key(def.vtable.get, key.to_owned()), def.v))
            }
            Def::Struct(def) => {
                let field = def
                    .fields
                    .iter()
                    .find(|field| !field.skip && field.wire_name() == key)?;
                Some(self.step(Step::Get(field.get), field.shape()))
            }
            _ => None,
        }
    }

    pub(crate) fn element(&self, index: usize) -> Option<Any> {
        let value = self.value()?;
        let (get, element_shape): (AtFn, _) = match self.shape.def {
            Def::List(def) => (def.vtable.get, def.t),
            Def::Array(def) => (def.vtable.get, def.t),
            _ => return None,
        };
        get(value, index)?;
        Some(self.step(Step::At(get, index), element_shape))
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        let Some(value) = self.value() else {
            return Vec::new();
        };
        match self.shape.def {
            Def::Map(def) => {
                let mut keys = Vec::with_capacity((def.vtable.len)(value));
                (def.vtable.for_each)(value, &mut |key, _| keys.push(key.to_owned()));
                keys
            }
            Def::Struct(def) => def
                .fields
                .iter()
                .filter(|field| !field.skip)
                .map(|field| field.wire_name().to_owned())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn members(&self) -> Vec<(String, Any)> {
        self.keys()
            .into_iter()
            .filter_map(|key| {
                let member = self.member(&key)?;
                Some((key, member))
            })
            .collect()
    }

    pub(crate) fn elements(&self) -> Vec<Any> {
        (0..self.len())
            .filter_map(|index| self.element(index))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        let Some(value) = self.value() else {
            return 0;
        };
        match self.shape.def {
            Def::List(def) => (def.vtable.len)(value),
            Def::Array(def) => def.n,
            Def::Map(def) => (def.vtable.len)(value),
            Def::Struct(def) => def.fields.iter().filter(|field| !field.skip).count(),
            _ => 0,
        }
    }

    pub(crate) fn write_to(&self, writer: &mut Writer<'_>) -> Result<()> {
        let encoder = self.api.encoder_for(self.shape)?;
        let value = self
            .value()
            .ok_or_else(|| wrong_target_named(self.shape.type_identifier))?;
        encoder.encode(value, writer)
    }
}
