use derive_more::{Display, From};

/// Name of one array literal in the source document, e.g. `map_types`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct ArrayName(String);

impl ArrayName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArrayName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// One `<key> => '<value>'` line.
///
/// `value` holds the unescaped text, not the source literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: i32,
    pub value: String,
}

impl Entry {
    pub fn new(key: i32, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
    pub name: ArrayName,
    pub entries: Vec<Entry>,
}

/// Arrays in first-commit order.
///
/// Keys inside one array are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayTable {
    arrays: Vec<Array>,
}

impl ArrayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `entries` under `name`.
    ///
    /// Committing a name twice replaces its entries but keeps the position of
    /// the first commit. Returns the replaced entries, if any.
    pub fn commit(&mut self, name: ArrayName, entries: Vec<Entry>) -> Option<Vec<Entry>> {
        match self.arrays.iter_mut().find(|array| array.name == name) {
            Some(array) => Some(std::mem::replace(&mut array.entries, entries)),
            None => {
                self.arrays.push(Array { name, entries });
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Entry]> {
        self.arrays
            .iter()
            .find(|array| array.name.as_str() == name)
            .map(|array| array.entries.as_slice())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Array> {
        self.arrays.iter()
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.arrays.iter().map(|array| array.entries.len()).sum()
    }
}

impl<'a> IntoIterator for &'a ArrayTable {
    type Item = &'a Array;
    type IntoIter = std::slice::Iter<'a, Array>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
