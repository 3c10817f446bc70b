use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Ordered, dynamically shaped attribute map.
///
/// Accessors are soft: an absent key or a value of the wrong shape yields `None`
/// (or `false` for mutations) instead of an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Removes the value at `path`, descending through nested objects.
    ///
    /// Returns `false` when any segment is missing or not an object.
    pub fn safe_delete(&mut self, path: &[&str]) -> bool {
        let Some((last, parents)) = path.split_last() else {
            return false;
        };
        let Some((first, rest)) = parents.split_first() else {
            return self.0.shift_remove(*last).is_some();
        };

        let mut current = match self.0.get_mut(*first) {
            Some(value) => value,
            None => return false,
        };
        for segment in rest {
            current = match current.get_mut(*segment) {
                Some(value) => value,
                None => return false,
            };
        }

        current
            .as_object_mut()
            .is_some_and(|map| map.remove(*last).is_some())
    }

    /// Sets the value at `path`, creating intermediate objects as needed.
    ///
    /// Returns `false` when an existing intermediate value is not an object.
    pub fn safe_set(&mut self, path: &[&str], value: impl Into<Value>) -> bool {
        let Some((last, parents)) = path.split_last() else {
            return false;
        };
        let Some((first, rest)) = parents.split_first() else {
            self.0.insert((*last).to_string(), value.into());
            return true;
        };

        let mut current = self
            .0
            .entry((*first).to_string())
            .or_insert_with(|| Value::Object(Default::default()));
        for segment in rest {
            let Some(map) = current.as_object_mut() else {
                return false;
            };
            current = map
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Default::default()));
        }

        match current.as_object_mut() {
            Some(map) => {
                map.insert((*last).to_string(), value.into());
                true
            }
            None => false,
        }
    }

    /// Drops `null` values, recursively, so absent and null compare equal.
    pub fn sanitize_defaults(&mut self) {
        self.0.retain(|_, value| !value.is_null());
        for value in self.0.values_mut() {
            strip_nulls(value);
        }
    }
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Map<String, Value>> for Attributes {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }
}
