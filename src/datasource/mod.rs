//! Collaborator seams for fetching protocol state and open positions.
//!
//! The engine itself is pure; implementations of these traits own RPC
//! connections, batching/multicall, retries and rate limiting, and must
//! return fields that are internally consistent as of a single block;
//! the engine performs no cross-validation.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::domain::{BlockNumber, PairIndex, PositionEnvelope, ProtocolSnapshot};

pub mod mock;

pub use mock::MockSource;

/// Block to pin a snapshot to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Number(BlockNumber),
}

/// Error type for snapshot/position source operations.
#[derive(Debug, Clone, Error)]
pub enum SnapshotError {
    /// Network error (e.g., connection timeout, DNS failure)
    #[error("network error: {0}")]
    Network(String),
    /// RPC-level error from the node
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// Malformed or undecodable on-chain response
    #[error("decode error: {0}")]
    Decode(String),
    /// Rate limit exceeded (caller should implement backoff)
    #[error("rate limited")]
    RateLimited,
    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Source of protocol-state snapshots (per-pair and per-group accrual
/// state, OI, depth, fee parameters), consistent as of one block.
#[async_trait]
pub trait StateSource: Send + Sync + fmt::Debug {
    async fn fetch_snapshot(&self, block_tag: BlockTag)
        -> Result<ProtocolSnapshot, SnapshotError>;
}

/// Source of open positions, already filtered to genuinely open slots
/// (a slot is open iff its recorded trader address is non-zero).
#[async_trait]
pub trait PositionSource: Send + Sync + fmt::Debug {
    async fn fetch_open_positions(
        &self,
        pair_index: PairIndex,
        block_tag: BlockTag,
    ) -> Result<Vec<PositionEnvelope>, SnapshotError>;
}
