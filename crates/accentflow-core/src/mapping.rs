// AccentFlow Mapping Table
// Base character to ordered accent variants

use indexmap::IndexMap;

use crate::key::key_to_base;
use crate::Key;

/// One configured base character and its variants, in cycling order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub base: char,
    pub variants: Vec<String>,
}

impl MappingEntry {
    pub fn new(base: char, variants: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            base,
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}

/// Immutable lookup table the router borrows while the pipeline runs.
///
/// Insertion order is kept so listings and the default config stay stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: IndexMap<char, Vec<String>>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the variants for `base`. Returns the previous list.
    pub fn insert(&mut self, base: char, variants: Vec<String>) -> Option<Vec<String>> {
        if variants.is_empty() {
            log::warn!("Mapping for '{}' has no variants and will be ignored", base);
        }
        self.entries.insert(base, variants)
    }

    /// Build a table, rejecting a base that appears twice.
    pub fn from_entries(entries: impl IntoIterator<Item = MappingEntry>) -> Result<Self, char> {
        let mut table = Self::new();
        for entry in entries {
            if table.entries.contains_key(&entry.base) {
                return Err(entry.base);
            }
            table.insert(entry.base, entry.variants);
        }
        Ok(table)
    }

    /// Variants offered for `base`. Entries without variants report `None`.
    pub fn variants_for(&self, base: char) -> Option<&[String]> {
        self.entries
            .get(&base)
            .map(Vec::as_slice)
            .filter(|variants| !variants.is_empty())
    }

    /// Base character a physical key stands for.
    pub fn base_for(&self, key: Key) -> Option<char> {
        key_to_base(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &[String])> {
        self.entries.iter().map(|(base, v)| (*base, v.as_slice()))
    }
}

/// `variants[index mod len]`, or `None` for an empty list.
pub fn select(variants: &[String], index: usize) -> Option<&str> {
    if variants.is_empty() {
        return None;
    }
    Some(variants[index % variants.len()].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e_table() -> MappingTable {
        MappingTable::from_entries([MappingEntry::new('e', ["é", "è", "ê"])]).unwrap()
    }

    #[test]
    fn test_variants_for() {
        let table = e_table();
        assert_eq!(
            table.variants_for('e'),
            Some(&["é".to_string(), "è".to_string(), "ê".to_string()][..])
        );
        assert_eq!(table.variants_for('a'), None);
    }

    #[test]
    fn test_empty_variants_are_hidden() {
        let mut table = e_table();
        table.insert('a', Vec::new());
        assert_eq!(table.len(), 2);
        assert_eq!(table.variants_for('a'), None);
    }

    #[test]
    fn test_duplicate_base_rejected() {
        let result = MappingTable::from_entries([
            MappingEntry::new('o', ["ó"]),
            MappingEntry::new('o', ["ò"]),
        ]);
        assert_eq!(result, Err('o'));
    }

    #[test]
    fn test_base_for() {
        let table = e_table();
        assert_eq!(table.base_for(Key::E), Some('e'));
        assert_eq!(table.base_for(Key::from(41)), Some('`'));
        assert_eq!(table.base_for(Key::LEFT_SHIFT), None);
        assert_eq!(table.base_for(Key::KEY_1), None);
    }

    #[test]
    fn test_select_wraps() {
        let variants: Vec<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
        for index in 0..10 {
            assert_eq!(select(&variants, index), Some(variants[index % 3].as_str()));
        }
        assert_eq!(select(&variants, usize::MAX), Some("x"));
    }

    #[test]
    fn test_select_empty() {
        assert_eq!(select(&[], 0), None);
        assert_eq!(select(&[], 7), None);
    }

    #[test]
    fn test_iter_preserves_order() {
        let table = MappingTable::from_entries([
            MappingEntry::new('u', ["ù"]),
            MappingEntry::new('a', ["à"]),
        ])
        .unwrap();
        let bases: Vec<char> = table.iter().map(|(b, _)| b).collect();
        assert_eq!(bases, vec!['u', 'a']);
    }
}
