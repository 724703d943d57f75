//! Domain primitives for search dispatch and the trending collection.
//!
//! Newtypes keep request sequence numbers and remote document identities from
//! being mixed up with plain integers and strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number of one dispatched search.
///
/// Issued monotonically by the search controller; a completion is only
/// accepted when its id matches the most recently issued one.
///
/// # Examples
///
/// ```rust
/// use marquee::domain::RequestId;
///
/// let first = RequestId::new(1);
/// assert!(first.next() > first);
/// assert_eq!(first.to_string(), "#1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl RequestId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Identity of a document in the remote search-count collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_ordering() {
        let a = RequestId::new(3);
        let b = a.next();
        assert!(b > a);
        assert_eq!(b.value(), 4);
        assert_eq!(RequestId::from(4), b);
    }

    #[test]
    fn document_id_serialization() {
        let id = DocumentId::new("65f1c0ffee");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"65f1c0ffee\"");
        let back: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert_eq!(back.to_string(), "65f1c0ffee");
    }
}
