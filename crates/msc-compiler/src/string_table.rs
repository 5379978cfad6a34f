//! Deduplicated string literal table.

use indexmap::IndexSet;

/// Decoded string literals in first-occurrence order.
///
/// The index of a string is stable once interned and is what `pushShort`
/// references at run time.
#[derive(Clone, Debug, Default)]
pub struct StringTable {
    strings: IndexSet<String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `s`, appending it on first sight.
    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(index) = self.strings.get_index_of(s) {
            return index as u32;
        }
        let (index, _) = self.strings.insert_full(s.to_string());
        index as u32
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get_index(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.strings.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_deduplicates() {
        let mut table = StringTable::new();
        assert_eq!(table.intern("hi"), 0);
        assert_eq!(table.intern("there"), 1);
        assert_eq!(table.intern("hi"), 0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Some("there"));
        assert_eq!(table.into_vec(), vec!["hi", "there"]);
    }
}
