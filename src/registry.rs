//! The category registry: a dictionary of distinct category names.
//!
//! This is dictionary encoding applied to a single text column. Every distinct
//! name gets a sequential identifier the first time it is seen, starting at 1,
//! and the data itself is rewritten to carry only the identifier.

use hashbrown::HashMap;

/// Maps category names to identifiers assigned in first-seen order.
///
/// Entries are exposed in assignment order, so the `k`-th name returned by
/// [`CategoryRegistry::iter`] always has identifier `k`.
#[derive(Debug, Default, Clone)]
pub struct CategoryRegistry {
    ids: HashMap<String, u64>,
    // names[i] holds the name with identifier i + 1.
    names: Vec<String>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identifier for `name`, assigning the next one if it is new.
    pub fn get_or_assign(&mut self, name: &str) -> u64 {
        let names = &mut self.names;
        *self.ids.entry_ref(name).or_insert_with(|| {
            names.push(name.to_owned());
            let id = names.len() as u64;
            log::debug!("New category {:?} -> {}", name, id);
            id
        })
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.ids.get(name).copied()
    }

    /// Reverse lookup, used to join fact rows back to their names.
    pub fn name_of(&self, id: u64) -> Option<&str> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates `(name, id)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index as u64 + 1))
    }
}
