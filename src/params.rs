//! Ordered name/value pairs captured from a path or a query string.

use std::ops::Index;

/// A single name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Param {
    pub key: String,
    pub value: String,
}

/// Parameters bound by a successful match, or parsed from a query string.
///
/// Pairs keep the order in which they were captured. There are two ways to
/// retrieve the value of a parameter:
///
/// ```rust
/// # use ligero::Params;
/// let mut params = Params::default();
/// params.insert("category", "rust");
/// params.insert("post", "request-routers");
///
/// // by the name of the parameter
/// assert_eq!(params.get("post"), Some("request-routers"));
///
/// // by its index, which also gives you the name
/// assert_eq!(params[0].key, "category");
/// assert_eq!(params[0].value, "rust");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: Vec<Param>,
}

impl Params {
    /// Returns the value of the parameter with the given name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value.as_str())
    }

    /// Sets a parameter. An existing value under the same name is replaced
    /// in place, so the last value inserted for a name wins.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.inner.iter_mut().find(|param| param.key == key) {
            Some(param) => param.value = value,
            None => self.inner.push(Param { key, value }),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.iter().any(|param| param.key == key)
    }

    /// Iterates over the `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .map(|param| (param.key.as_str(), param.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Index<usize> for Params {
    type Output = Param;

    fn index(&self, i: usize) -> &Param {
        &self.inner[i]
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::default();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
