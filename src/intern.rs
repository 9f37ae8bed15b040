//! String interning for link targets and anchor names.
use std::collections::HashMap;

/// Index of a string in a [`StringTable`].
pub type StringId = u32;

/// Interns repeated strings so page records can refer to them by index.
/// Serializes as the plain list of strings, in index order.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(transparent)]
pub struct StringTable {
    /// Index lookup for already-interned strings.
    #[serde(skip)]
    ids: HashMap<String, StringId>,
    /// Interned strings in insertion order.
    strings: Vec<String>,
}

impl StringTable {
    /// Resolve an index back to its string.
    pub fn get(&self, id: StringId) -> Option<&str> {
        let index = usize::try_from(id).ok()?;
        return self.strings.get(index).map(String::as_str);
    }

    /// Return the index of `s`, adding it to the table on first use.
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.ids.get(s) {
            return id;
        }
        let id = StringId::try_from(self.strings.len()).unwrap_or(StringId::MAX);
        self.strings.push(s.to_string());
        self.ids.insert(s.to_string(), id);
        return id;
    }

    /// Whether nothing has been interned.
    pub fn is_empty(&self) -> bool {
        return self.strings.is_empty();
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        return self.strings.len();
    }
}
