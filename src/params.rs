use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

use smallvec::SmallVec;

/// Path parameters bound by the entry currently being invoked.
///
/// Keys appear in capture-group order. A group that did not take part in
/// the match has no key at all.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Params {
    buf: SmallVec<[(Arc<str>, String); 8]>,
}

impl Params {
    pub fn new() -> Self {
        Self {
            buf: SmallVec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.buf
            .iter()
            .find_map(|(k, v)| if &**k == name { Some(v.as_str()) } else { None })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.buf.iter().any(|(k, _)| &**k == name)
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.buf.iter().map(|(k, v)| (&**k, v.as_str()))
    }

    /// Binds `name`, replacing the value of an earlier binding of the same name.
    pub(crate) fn push(&mut self, name: Arc<str>, value: &str) {
        match self.buf.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => {
                v.clear();
                v.push_str(value);
            }
            None => self.buf.push((name, value.to_owned())),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.buf.clear()
    }
}

impl Deref for Params {
    type Target = [(Arc<str>, String)];
    fn deref(&self) -> &Self::Target {
        &*self.buf
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl IntoIterator for Params {
    type Item = (Arc<str>, String);
    type IntoIter = smallvec::IntoIter<[(Arc<str>, String); 8]>;
    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}
