//! Ordered multi-value header map shared by requests and responses.
//!
//! Headers are stored in an `IndexMap` so iteration follows first-insertion
//! order. Each name maps to every value it was given, in order, so repeated
//! headers such as `Set-Cookie` keep all of their values. Names keep the case
//! they were inserted with; lookups ignore case.
//!
//! Lines of a raw header block that carry no `name: value` pair are kept
//! separately as anonymous entries. They are reported as-is and take no part
//! in lookups.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    named: IndexMap<String, Vec<String>>,
    anonymous: Vec<String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the values of `name`.
    ///
    /// An existing entry whose name matches case-insensitively is reused, so
    /// its original spelling is kept.
    pub fn append(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(idx) => self.named[idx].push(value.to_string()),
            None => {
                self.named.insert(name.to_string(), vec![value.to_string()]);
            }
        }
    }

    /// Replace every value of `name` with `value`.
    pub fn insert(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(idx) => self.named[idx] = vec![value.to_string()],
            None => {
                self.named.insert(name.to_string(), vec![value.to_string()]);
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let idx = self.position(name)?;
        self.named.shift_remove_index(idx).map(|(_, values)| values)
    }

    pub fn push_anonymous(&mut self, line: &str) {
        self.anonymous.push(line.to_string());
    }

    /// All values of `name`, in order of appearance.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|idx| self.named[idx].as_slice())
    }

    /// First value of `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.named
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn anonymous(&self) -> &[String] {
        &self.anonymous
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.anonymous.is_empty()
    }

    /// One `Name: value` line per value. Anonymous entries are not rendered.
    pub fn lines(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(name, values)| values.iter().map(move |v| format!("{name}: {v}")))
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        if let Some(idx) = self.named.get_index_of(name) {
            return Some(idx);
        }
        self.named
            .keys()
            .position(|key| key.eq_ignore_ascii_case(name))
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in iter {
            headers.append(name.as_ref(), value.as_ref());
        }
        headers
    }
}
