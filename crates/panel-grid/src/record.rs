//! Row access for grid records.

use serde_json::{Map, Value};

/// A row that can be displayed in a grid.
///
/// Columns address record fields by name; a missing field reads as `None`
/// and is treated as `null` by filtering and sorting.
pub trait Record {
    /// Return the value of the named field.
    fn field(&self, name: &str) -> Option<Value>;
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<Value> {
        match self {
            Self::Object(map) => map.get(name).cloned(),
            _ => None,
        }
    }
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}
