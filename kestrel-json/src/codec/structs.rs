//! Record codecs.
//!
//! Decoding picks one of three strategies per record type, by the number of
//! names a record accepts:
//!
//! - no names: the object is read and discarded,
//! - 1 to 10 names: [`SpecializedStructDecoder`] compares the key hash
//!   against each known hash in turn, without looking at the key itself,
//! - otherwise, or when two names hash alike, or when unknown keys must be
//!   rejected: [`GeneralStructDecoder`] looks keys up by name.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use kestrel_core::Field;

use super::{ValDecoder, ValEncoder, wrong_target_named};
use crate::error::{JsonError, JsonErrorKind, Result};
use crate::hash::field_hash;
use crate::{Config, Reader, Writer};

/// Largest name count decoded by [`SpecializedStructDecoder`].
pub(crate) const MAX_SPECIALIZED: usize = 10;

/// Suggestions below this similarity are not offered.
const SIMILARITY_THRESHOLD: f64 = 0.6;

/// A record field together with the codec for its type.
pub(crate) struct FieldBinding<C: ?Sized> {
    pub(crate) field: &'static Field,
    pub(crate) codec: Arc<C>,
}

impl<C: ?Sized> Clone for FieldBinding<C> {
    fn clone(&self) -> Self {
        FieldBinding {
            field: self.field,
            codec: Arc::clone(&self.codec),
        }
    }
}

impl FieldBinding<dyn ValDecoder> {
    #[inline]
    fn decode(
        &self,
        record: &mut dyn Any,
        reader: &mut Reader<'_>,
        type_name: &'static str,
    ) -> Result<()> {
        let Some(value) = (self.field.get_mut)(record) else {
            return Err(wrong_target_named(type_name));
        };
        self.codec
            .decode(value, reader)
            .map_err(|err| err.in_field(self.field.name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    Skip,
    Specialized,
    General,
}

/// Picks the decode strategy for a record accepting names with `hashes`.
/// Hash 0 counts as taken from the start.
pub(crate) fn choose_strategy(hashes: &[u32], disallow_unknown: bool) -> Strategy {
    if disallow_unknown {
        return Strategy::General;
    }
    if hashes.is_empty() {
        return Strategy::Skip;
    }
    if hashes.len() > MAX_SPECIALIZED {
        return Strategy::General;
    }
    let mut taken = HashSet::with_capacity(hashes.len() + 1);
    taken.insert(0);
    if hashes.iter().all(|hash| taken.insert(*hash)) {
        Strategy::Specialized
    } else {
        Strategy::General
    }
}

macro_rules! by_arity {
    ($type_name:ident, $slots:ident; $($n:literal)+) => {
        match $slots.len() {
            $($n => specialized::<$n>($type_name, $slots),)+
            _ => None,
        }
    };
}

/// Builds the decoder for a record with `fields`.
pub(crate) fn decoder(
    type_name: &'static str,
    fields: Vec<FieldBinding<dyn ValDecoder>>,
    config: &Config,
) -> Result<Arc<dyn ValDecoder>> {
    // every distinct name, with the binding that claims it
    let mut names: Vec<(&'static str, usize)> = Vec::new();
    for (index, binding) in fields.iter().enumerate() {
        for name in binding.field.decode_names() {
            match names.iter().find(|(claimed, _)| *claimed == name) {
                Some((_, owner)) if *owner == index => {}
                Some(_) => {
                    return Err(JsonError::new(JsonErrorKind::DuplicateField {
                        type_name,
                        name,
                    }));
                }
                None => names.push((name, index)),
            }
        }
    }

    let fold_case = config.case_insensitive;
    let hashes: Vec<u32> = names
        .iter()
        .map(|(name, _)| field_hash(name.as_bytes(), fold_case))
        .collect();
    let strategy = choose_strategy(&hashes, config.disallow_unknown_fields);
    debug!(
        record = type_name,
        names = names.len(),
        ?strategy,
        "compiled record decoder"
    );

    let general = |fields: Vec<FieldBinding<dyn ValDecoder>>| -> Arc<dyn ValDecoder> {
        Arc::new(GeneralStructDecoder::new(type_name, fields, &names, config))
    };
    Ok(match strategy {
        Strategy::Skip => Arc::new(SkipStructDecoder),
        Strategy::General => general(fields),
        Strategy::Specialized => {
            let slots: Vec<FieldSlot> = names
                .iter()
                .zip(&hashes)
                .map(|((_, index), hash)| FieldSlot {
                    hash: *hash,
                    binding: fields[*index].clone(),
                })
                .collect();
            match by_arity!(type_name, slots; 1 2 3 4 5 6 7 8 9 10) {
                Some(decoder) => decoder,
                None => general(fields),
            }
        }
    })
}

fn specialized<const N: usize>(
    type_name: &'static str,
    slots: Vec<FieldSlot>,
) -> Option<Arc<dyn ValDecoder>> {
    let slots: [FieldSlot; N] = slots.try_into().ok()?;
    Some(Arc::new(SpecializedStructDecoder { type_name, slots }))
}

/// Reads and discards an object, for records without decodable fields.
pub(crate) struct SkipStructDecoder;

impl ValDecoder for SkipStructDecoder {
    fn decode(&self, _target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        if reader.read_null()? || !reader.read_object_start()? {
            return Ok(());
        }
        loop {
            reader.read_field_name()?;
            reader.skip()?;
            if !reader.read_object_more()? {
                return Ok(());
            }
        }
    }
}

pub(crate) struct FieldSlot {
    hash: u32,
    binding: FieldBinding<dyn ValDecoder>,
}

/// Dispatches on the key hash alone. Only built when no two names of the
/// record hash alike.
pub(crate) struct SpecializedStructDecoder<const N: usize> {
    type_name: &'static str,
    slots: [FieldSlot; N],
}

impl<const N: usize> ValDecoder for SpecializedStructDecoder<N> {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        if reader.read_null()? || !reader.read_object_start()? {
            return Ok(());
        }
        loop {
            let hash = reader.read_field_hash()?;
            match self.slots.iter().find(|slot| slot.hash == hash) {
                Some(slot) => slot.binding.decode(target, reader, self.type_name)?,
                None => reader.skip()?,
            }
            if !reader.read_object_more()? {
                return Ok(());
            }
        }
    }
}

/// Looks keys up by name: exactly first, then ignoring ASCII case when
/// configured to.
pub(crate) struct GeneralStructDecoder {
    type_name: &'static str,
    fields: Vec<FieldBinding<dyn ValDecoder>>,
    exact: HashMap<&'static str, usize>,
    folded: Option<HashMap<String, usize>>,
    disallow_unknown: bool,
    expected: Vec<&'static str>,
}

impl GeneralStructDecoder {
    fn new(
        type_name: &'static str,
        fields: Vec<FieldBinding<dyn ValDecoder>>,
        names: &[(&'static str, usize)],
        config: &Config,
    ) -> Self {
        let exact: HashMap<_, _> = names.iter().copied().collect();
        let folded = config.case_insensitive.then(|| {
            let mut folded = HashMap::with_capacity(names.len());
            for (name, index) in names {
                // first declared wins among names that differ only in case
                folded.entry(name.to_ascii_lowercase()).or_insert(*index);
            }
            folded
        });
        GeneralStructDecoder {
            type_name,
            fields,
            exact,
            folded,
            disallow_unknown: config.disallow_unknown_fields,
            expected: names.iter().map(|(name, _)| *name).collect(),
        }
    }

    fn lookup(&self, key: &str) -> Option<usize> {
        if let Some(index) = self.exact.get(key) {
            return Some(*index);
        }
        let folded = self.folded.as_ref()?;
        folded.get(&key.to_ascii_lowercase()).copied()
    }

    fn suggest(&self, key: &str) -> Option<&'static str> {
        let mut best: Option<(&'static str, f64)> = None;
        for name in &self.expected {
            let score = strsim::jaro_winkler(key, name);
            if score >= SIMILARITY_THRESHOLD && best.is_none_or(|(_, top)| score > top) {
                best = Some((name, score));
            }
        }
        best.map(|(name, _)| name)
    }
}

impl ValDecoder for GeneralStructDecoder {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        if reader.read_null()? || !reader.read_object_start()? {
            return Ok(());
        }
        loop {
            let key = reader.read_field_name()?;
            match self.lookup(key) {
                Some(index) => self.fields[index].decode(target, reader, self.type_name)?,
                None if self.disallow_unknown => {
                    let field = key.to_owned();
                    let suggestion = self.suggest(&field);
                    return Err(reader.report(JsonErrorKind::UnknownField {
                        field,
                        expected: self.expected.clone(),
                        suggestion,
                    }));
                }
                None => reader.skip()?,
            }
            if !reader.read_object_more()? {
                return Ok(());
            }
        }
    }
}

/// Writes fields in declaration order, leaving out empty `omit_empty`
/// fields together with their separators.
pub(crate) struct StructEncoder {
    type_name: &'static str,
    fields: Vec<FieldBinding<dyn ValEncoder>>,
}

impl StructEncoder {
    pub(crate) fn new(type_name: &'static str, fields: Vec<FieldBinding<dyn ValEncoder>>) -> Self {
        StructEncoder { type_name, fields }
    }
}

impl ValEncoder for StructEncoder {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        let mut open = false;
        for binding in &self.fields {
            let field = binding.field;
            let Some(field_value) = (field.get)(value) else {
                return Err(wrong_target_named(self.type_name));
            };
            if field.omit_empty && binding.codec.is_empty(field_value) {
                continue;
            }
            if open {
                writer.write_more();
            } else {
                writer.write_object_start();
                open = true;
            }
            writer.write_object_field(field.wire_name());
            binding
                .codec
                .encode(field_value, writer)
                .map_err(|err| err.in_field(field.name))?;
        }
        if open {
            writer.write_object_end();
        } else {
            writer.write_empty_object();
        }
        Ok(())
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        self.fields.iter().all(|binding| {
            (binding.field.get)(value).is_some_and(|field| binding.codec.is_empty(field))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_names_skips_unless_strict() {
        assert_eq!(choose_strategy(&[], false), Strategy::Skip);
        // strict records still look at every key
        assert_eq!(choose_strategy(&[], true), Strategy::General);
    }

    #[test]
    fn up_to_ten_names_are_specialized() {
        let hashes: Vec<u32> = (1..=10).collect();
        for n in 1..=10 {
            assert_eq!(choose_strategy(&hashes[..n], false), Strategy::Specialized);
        }
        let eleven: Vec<u32> = (1..=11).collect();
        assert_eq!(choose_strategy(&eleven, false), Strategy::General);
    }

    #[test]
    fn collisions_fall_back() {
        assert_eq!(choose_strategy(&[7, 9, 7], false), Strategy::General);
        // zero is reserved
        assert_eq!(choose_strategy(&[0], false), Strategy::General);
    }

    #[test]
    fn rejecting_unknown_fields_needs_names() {
        assert_eq!(choose_strategy(&[1, 2], true), Strategy::General);
    }
}
