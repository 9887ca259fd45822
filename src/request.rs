use std::collections::btree_map::{BTreeMap, Iter};
use std::fmt::Display;
use std::iter::FromIterator;

use serde::Serialize;

use crate::ACCESS_TOKEN_KEY;

/// Request parameters, kept sorted by key.
///
/// Values are stored in their final string form: anything `Display` is
/// formatted on insertion and lists are joined with `,`. Inserting an existing
/// key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Parameters {
    inner: BTreeMap<String, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Default::default()
    }

    /// Start with an `access_token` entry.
    pub fn with_access_token<T: Display>(token: T) -> Self {
        Parameters::new().param(ACCESS_TOKEN_KEY, token)
    }

    /// Add a parameter, builder style.
    pub fn param<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Display,
    {
        self.insert(key, value);
        self
    }

    /// Add a list parameter, builder style.
    pub fn list<K, I>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator,
        I::Item: Display,
    {
        self.insert_list(key, values);
        self
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Display,
    {
        self.inner.insert(key.into(), value.to_string())
    }

    pub fn insert_list<K, I>(&mut self, key: K, values: I) -> Option<String>
    where
        K: Into<String>,
        I: IntoIterator,
        I::Item: Display,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.inner.insert(key.into(), joined)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.inner.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.get(ACCESS_TOKEN_KEY)
    }

    /// A copy of these parameters without `key`.
    pub fn without(&self, key: &str) -> Parameters {
        let mut copied = self.clone();
        copied.remove(key);
        copied
    }

    /// Iterate in ascending byte order of keys.
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
