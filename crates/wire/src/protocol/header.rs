//! Header storage shared by requests and responses.
//!
//! Header names are matched as exact text: `Content-Length` and
//! `content-length` are two different headers. Entries are kept ordered by
//! name, so iteration and serialization are always ascending by name no
//! matter in which order the headers were set.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use bytes::{BufMut, BytesMut};

/// The two bytes terminating every line of an HTTP/1.x head.
pub const CRLF: &str = "\r\n";

/// The byte separating a header name from its value.
pub const HEADER_DELIMITER: u8 = b':';

/// A case-sensitive name to value header bag.
///
/// Setting a name that is already present overwrites the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderStore {
    fields: BTreeMap<String, String>,
}

impl HeaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the header, replacing any value stored under the same name.
    pub fn set<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.fields.insert(name.into(), value.into());
    }

    /// Looks up a header by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrowing iterator over `(name, value)`, ascending by name.
    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.fields.iter() }
    }

    /// Returns an owned snapshot of all entries, ascending by name.
    ///
    /// Later changes to the store are not reflected in the returned vector.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.fields.iter().map(|(name, value)| (name.clone(), value.clone())).collect()
    }

    /// Renders every entry as `name: value\r\n` followed by the bare `\r\n`
    /// that marks the end of the header block.
    pub fn serialize(&self) -> String {
        let capacity = self.fields.iter().map(|(name, value)| name.len() + value.len() + 4).sum::<usize>() + CRLF.len();
        let mut out = String::with_capacity(capacity);
        self.write_to(&mut out);
        out
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        for (name, value) in &self.fields {
            out.push_str(name);
            out.push(HEADER_DELIMITER as char);
            out.push(' ');
            out.push_str(value);
            out.push_str(CRLF);
        }
        out.push_str(CRLF);
    }

    pub(crate) fn write_bytes(&self, dst: &mut BytesMut) {
        for (name, value) in &self.fields {
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(CRLF.as_bytes());
        }
        dst.put_slice(CRLF.as_bytes());
    }
}

impl fmt::Display for HeaderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl<N, V> Extend<(N, V)> for HeaderStore
where
    N: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderStore
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut store = HeaderStore::new();
        store.extend(iter);
        store
    }
}

impl<'a> IntoIterator for &'a HeaderStore {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`HeaderStore::iter`].
#[derive(Debug)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
