//! Fixed-size text slots with sparse JSON encoding.
//!
//! Stored shape is a JSON object keyed by decimal strings (`{"1": "..."}`),
//! so records written with open-ended maps keep decoding. Absent keys read as
//! empty text; only non-empty slots are written back.

use super::RecordValidationError;
use log::debug;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Formatter;
use std::marker::PhantomData;

/// `LEN` text slots addressed by `FIRST..FIRST + LEN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedTexts<const FIRST: u32, const LEN: usize> {
    slots: [String; LEN],
}

/// Day-of-month texts, keys `1..=31`.
pub type DayTexts = IndexedTexts<1, 31>;
/// Month texts, keys `0..=11`.
pub type MonthTexts = IndexedTexts<0, 12>;

impl<const FIRST: u32, const LEN: usize> IndexedTexts<FIRST, LEN> {
    /// Lowest valid key.
    pub const MIN_KEY: u32 = FIRST;
    /// Highest valid key.
    pub const MAX_KEY: u32 = FIRST + LEN as u32 - 1;

    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| String::new()),
        }
    }

    /// Returns the text for `key`, or `""` when unset or out of range.
    pub fn get(&self, key: u32) -> &str {
        self.position(key)
            .map(|index| self.slots[index].as_str())
            .unwrap_or("")
    }

    /// Replaces the text for `key`.
    pub fn set(
        &mut self,
        key: u32,
        text: impl Into<String>,
        field: &'static str,
    ) -> Result<(), RecordValidationError> {
        let index = self
            .position(key)
            .ok_or(RecordValidationError::IndexOutOfRange {
                field,
                index: key,
                min: Self::MIN_KEY,
                max: Self::MAX_KEY,
            })?;
        self.slots[index] = text.into();
        Ok(())
    }

    /// Iterates `(key, text)` for every non-empty slot, ascending by key.
    pub fn filled(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(index, text)| (FIRST + index as u32, text.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(String::is_empty)
    }

    fn position(&self, key: u32) -> Option<usize> {
        key.checked_sub(FIRST)
            .map(|offset| offset as usize)
            .filter(|offset| *offset < LEN)
    }
}

impl<const FIRST: u32, const LEN: usize> Default for IndexedTexts<FIRST, LEN> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const FIRST: u32, const LEN: usize> Serialize for IndexedTexts<FIRST, LEN> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let filled = self.filled().collect::<Vec<_>>();
        let mut map = serializer.serialize_map(Some(filled.len()))?;
        for (key, text) in filled {
            map.serialize_entry(&key.to_string(), text)?;
        }
        map.end()
    }
}

impl<'de, const FIRST: u32, const LEN: usize> Deserialize<'de> for IndexedTexts<FIRST, LEN> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(IndexedTextsVisitor(PhantomData))
    }
}

struct IndexedTextsVisitor<const FIRST: u32, const LEN: usize>(
    PhantomData<IndexedTexts<FIRST, LEN>>,
);

impl<'de, const FIRST: u32, const LEN: usize> Visitor<'de> for IndexedTextsVisitor<FIRST, LEN> {
    type Value = IndexedTexts<FIRST, LEN>;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "an object keyed by integers {FIRST}..{}", FIRST as usize + LEN)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut texts = IndexedTexts::new();
        while let Some((key, text)) = access.next_entry::<String, Option<String>>()? {
            let parsed = key.trim().parse::<u32>().ok();
            let Some(index) = parsed.and_then(|value| texts.position(value)) else {
                debug!("event=slot_key_skipped module=model status=ok key_len={}", key.len());
                continue;
            };
            texts.slots[index] = text.unwrap_or_default();
        }
        Ok(texts)
    }
}
