//! Form-encoded input: an ordered key/value multimap of string entries.

use serde_json::{Map, Value};

/// A form payload, mirroring the browser API of the same name.
///
/// Entries keep insertion order and a key may appear more than once;
/// [`FormData::into_object`] flattens the entries into a JSON object in
/// which the last entry for a key wins. Values are plain strings and no
/// numeric coercion is ever applied — a schema expecting a number rejects
/// a form string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        FormData::default()
    }

    /// Adds an entry, keeping any existing entries for the same key.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Replaces every entry for `name` with a single new entry.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, value.into()));
    }

    /// The first value for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `name`, in insertion order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns true if at least one entry exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    /// Number of entries (not distinct keys).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the form has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Flattens the form into a JSON object, later duplicates winning.
    #[must_use]
    pub fn into_object(self) -> Value {
        let mut object = Map::new();
        for (name, value) in self.entries {
            object.insert(name, Value::String(value));
        }
        Value::Object(object)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (name, value) in iter {
            form.append(name, value);
        }
        form
    }
}

/// Builds a [`FormData`] from `name => value` pairs.
///
/// ```
/// use enact::form_data;
///
/// let form = form_data! { "name" => "John", "role" => "admin" };
/// assert_eq!(form.get("name"), Some("John"));
/// ```
#[macro_export]
macro_rules! form_data {
    () => { $crate::FormData::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut form = $crate::FormData::new();
        $(form.append($name, $value);)+
        form
    }};
}
