// src/args/map.rs

use super::value::OptionValue;

/// Insertion-ordered mapping from option name to value.
///
/// Re-inserting an existing name overwrites the value in place, so the
/// emission order is the order in which names were first seen. Option sets
/// are small (tens of entries) so lookups are linear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMap {
    entries: Vec<(String, OptionValue)>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite, returning the previous value if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Copy every entry of `other` into `self`; `other` wins on collision.
    pub fn extend_from(&mut self, other: &OptionMap) {
        for (k, v) in other.iter() {
            self.insert(k, v.clone());
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OptionMap
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OptionMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for OptionMap {
    type Item = (String, OptionValue);
    type IntoIter = std::vec::IntoIter<(String, OptionValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_position() {
        let mut map = OptionMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        let prev = map.insert("a", 3);

        assert_eq!(prev, Some(OptionValue::Number(1.0)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&OptionValue::Number(3.0)));
    }

    #[test]
    fn remove_drops_entry() {
        let mut map: OptionMap = [("x", "1"), ("y", "2")].into_iter().collect();
        assert!(map.remove("x").is_some());
        assert!(map.remove("x").is_none());
        assert_eq!(map.len(), 1);
    }
}
