//! Deduplicating store mapping strings to dense indices.

use hashbrown::HashMap;

use crate::WordType;

/// Result of a [`Dictionary::add`]: the operand index for the string and
/// whether the string was already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub operand: WordType,
    pub exists: bool,
}

/// Interning dictionary used by the constant pools.
///
/// Adding a string returns a dense index; adding the same string again
/// returns the same index. The original string is retrievable by index in
/// insertion order.
#[derive(Debug, Default)]
pub struct Dictionary {
    key_map: HashMap<String, WordType>,
    keys: Vec<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, string: &str) -> DictionaryEntry {
        if let Some(&operand) = self.key_map.get(string) {
            return DictionaryEntry {
                operand,
                exists: true,
            };
        }
        let operand = self.keys.len() as WordType;
        self.key_map.insert(string.to_string(), operand);
        self.keys.push(string.to_string());
        DictionaryEntry {
            operand,
            exists: false,
        }
    }

    pub fn get(&self, index: WordType) -> &str {
        &self.keys[index as usize]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
