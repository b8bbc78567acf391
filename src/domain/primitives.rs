//! Domain primitives: block/time scalars, Address, PairIndex, Side.

use serde::{Deserialize, Serialize};

/// Block number on the chain the mirrored protocol lives on.
pub type BlockNumber = u64;

/// Unix timestamp in seconds.
pub type TimestampS = i64;

/// Trader wallet address (hex string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create an Address from a string.
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into())
    }

    /// Get the address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the address is empty or the all-zero address.
    ///
    /// The protocol's trade storage marks a closed slot by zeroing the
    /// trader address, so "unset" means "slot not actually open".
    pub fn is_unset(&self) -> bool {
        let hex = self.0.trim().trim_start_matches("0x");
        hex.is_empty() || hex.chars().all(|c| c == '0')
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a trading pair in the protocol's pair registry.
///
/// Per-pair snapshot collections are addressed by this index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairIndex(pub u32);

impl PairIndex {
    pub fn new(index: u32) -> Self {
        PairIndex(index)
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PairIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Long (buy) side.
    Long,
    /// Short (sell) side.
    Short,
}

impl Side {
    pub fn is_long(&self) -> bool {
        matches!(self, Side::Long)
    }

    /// Get the signed multiplier for this side (+1 for Long, -1 for Short).
    pub fn sign(&self) -> i32 {
        match self {
            Side::Long => 1,
            Side::Short => -1,
        }
    }

    /// The economically opposite direction.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}
