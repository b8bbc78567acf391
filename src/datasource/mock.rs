//! Mock state/position source for testing without network calls.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{PairIndex, PositionEnvelope, ProtocolSnapshot};

use super::{BlockTag, PositionSource, SnapshotError, StateSource};

/// Mock source serving a fixed snapshot and raw trade slots.
///
/// Slots are stored unfiltered, the way trade storage returns them: slots
/// whose trader address is unset are dropped on fetch, mirroring the
/// on-chain "open iff trader is non-zero" rule. `BlockTag` is accepted but
/// ignored; the mock serves its one snapshot for any tag.
#[derive(Debug, Clone)]
pub struct MockSource {
    snapshot: ProtocolSnapshot,
    slots: Vec<PositionEnvelope>,
}

impl MockSource {
    /// Create a mock source around a snapshot, with no position slots.
    pub fn new(snapshot: ProtocolSnapshot) -> Self {
        Self {
            snapshot,
            slots: Vec::new(),
        }
    }

    /// Add one raw trade slot.
    pub fn with_slot(mut self, slot: PositionEnvelope) -> Self {
        self.slots.push(slot);
        self
    }

    /// Add multiple raw trade slots.
    pub fn with_slots(mut self, slots: Vec<PositionEnvelope>) -> Self {
        self.slots.extend(slots);
        self
    }
}

#[async_trait]
impl StateSource for MockSource {
    async fn fetch_snapshot(
        &self,
        _block_tag: BlockTag,
    ) -> Result<ProtocolSnapshot, SnapshotError> {
        Ok(self.snapshot.clone())
    }
}

#[async_trait]
impl PositionSource for MockSource {
    async fn fetch_open_positions(
        &self,
        pair_index: PairIndex,
        _block_tag: BlockTag,
    ) -> Result<Vec<PositionEnvelope>, SnapshotError> {
        let open: Vec<PositionEnvelope> = self
            .slots
            .iter()
            .filter(|slot| {
                slot.trade.pair_index == pair_index && !slot.trade.trader.is_unset()
            })
            .cloned()
            .collect();

        debug!(
            pair = %pair_index,
            open = open.len(),
            slots = self.slots.len(),
            "served open positions from mock source"
        );

        Ok(open)
    }
}
