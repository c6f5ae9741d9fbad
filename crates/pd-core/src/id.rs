use crate::error::ElementError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Textual prefix of every element id (`element-0`, `element-1`, ...).
const PREFIX: &str = "element-";

/// Stable identity of an element for the lifetime of a session.
/// Internally a plain counter value: 8 bytes, Copy, Eq, Hash, Ord.
///
/// Ids are handed out by [`IdAllocator`] and never derived from an
/// element's position in the collection.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw counter value.
    pub const fn from_raw(n: u64) -> Self {
        ElementId(n)
    }

    /// The raw counter value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.0)
    }
}

impl FromStr for ElementId {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(PREFIX)
            .and_then(|n| n.parse::<u64>().ok())
            .map(ElementId)
            .ok_or_else(|| ElementError::InvalidId(s.to_string()))
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Monotonic id source owned by the element store.
///
/// Never rewinds: clearing or removing elements does not make their ids
/// available again.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next id.
    pub fn allocate(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        id
    }

    /// Make sure future ids are strictly greater than `seen`.
    /// Used when elements with existing ids are imported.
    pub fn observe(&mut self, seen: ElementId) {
        if seen.0 >= self.next {
            self.next = seen.0 + 1;
        }
    }

    /// The id that the next `allocate` call will return.
    pub fn peek(&self) -> ElementId {
        ElementId(self.next)
    }
}
