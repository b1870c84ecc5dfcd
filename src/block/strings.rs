//! The encode-side string intern table.

use std::collections::{BTreeSet, HashMap};

/// Collects every string a block's entities reference before the table is
/// laid out.
#[derive(Debug, Default)]
pub struct StringSet {
    set: BTreeSet<String>,
}

impl StringSet {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a referenced string.
    pub fn add(&mut self, value: &str) {
        if !self.set.contains(value) {
            self.set.insert(value.to_string());
        }
    }

    /// Lays out the table: the reserved empty string first, the rest in
    /// lexicographic order, each string's index its sorted position.
    pub fn build(mut self) -> StringTableIndex {
        // The empty string sorts first, pinning the reserved index 0 that
        // dense tag runs use as their terminator.
        self.set.insert(String::new());

        let strings: Vec<String> = self.set.into_iter().collect();
        let index = strings
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i as u32))
            .collect();

        StringTableIndex { index, strings }
    }
}

/// The laid-out table mapping strings to their block-local indices.
#[derive(Debug)]
pub struct StringTableIndex {
    index: HashMap<String, u32>,
    strings: Vec<String>,
}

impl StringTableIndex {
    /// The index of a previously collected string.
    ///
    /// Every string an entity references must have been added to the
    /// [`StringSet`] before the table was built; a miss is a bug in the
    /// collection pass.
    pub fn index_of(&self, value: &str) -> u32 {
        self.index[value]
    }

    /// The number of entries, the reserved slot included.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the table holds only the reserved slot.
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }

    /// Consumes the table into the wire-order string array.
    pub fn into_strings(self) -> Vec<String> {
        self.strings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_index_zero() {
        let mut set = StringSet::new();
        set.add("highway");

        let table = set.build();
        assert_eq!(table.index_of(""), 0);
        assert_eq!(table.index_of("highway"), 1);
    }

    #[test]
    fn test_sorted_assignment() {
        let mut set = StringSet::new();
        for s in ["f", "b", "d", "a", "c", "e"] {
            set.add(s);
        }

        let table = set.build();
        assert_eq!(table.index_of("a"), 1);
        assert_eq!(table.index_of("b"), 2);
        assert_eq!(table.index_of("f"), 6);

        let strings = table.into_strings();
        assert_eq!(strings, vec!["", "a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut set = StringSet::new();
        set.add("name");
        set.add("name");
        set.add("name");

        let table = set.build();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_set_still_reserves_slot() {
        let table = StringSet::new().build();
        assert!(table.is_empty());
        assert_eq!(table.into_strings(), vec![String::new()]);
    }
}
