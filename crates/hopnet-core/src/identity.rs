//! Node and link identities
//!
//! Both are plain integer newtypes. Node ids are chosen by the caller (or
//! allocated monotonically by the topology); link ids are always allocated
//! by the topology that owns the link.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

/// Unique identifier of a node, stable for the node's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying integer
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Generate ids `0..count`
    pub fn range(count: u64) -> Vec<Self> {
        (0..count).map(Self).collect()
    }

    /// Parse a canonical unsigned decimal: no sign, no leading zeros, no
    /// whitespace. Formatting the result reproduces `text` exactly.
    pub fn parse_canonical(text: &str) -> Option<Self> {
        parse_canonical_u64(text).map(Self)
    }
}

fn parse_canonical_u64(text: &str) -> Option<u64> {
    let canonical = !text.is_empty()
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'));
    if !canonical {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for NodeId {
    type Err = IdentityError;

    /// Parse user-supplied text into a node id.
    ///
    /// Surrounding whitespace is ignored; what remains must be a canonical
    /// unsigned decimal, the same form message senders use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Missing);
        }
        Self::parse_canonical(trimmed)
            .ok_or_else(|| IdentityError::InvalidFormat(trimmed.to_string()))
    }
}

/// Identifier of a link, unique within one topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub u64);

impl LinkId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl FromStr for LinkId {
    type Err = IdentityError;

    /// Accepts both `"7"` and `"L7"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Missing);
        }
        let digits = trimmed
            .strip_prefix('L')
            .or_else(|| trimmed.strip_prefix('l'))
            .unwrap_or(trimmed);
        parse_canonical_u64(digits)
            .map(Self)
            .ok_or_else(|| IdentityError::InvalidFormat(trimmed.to_string()))
    }
}
