//! One node of the arena: a lazily allocated array of lazily allocated
//! blocks.
//!
//! Every "absent" state is an explicit `Option`; a missing slot array and a
//! missing block are first-class states the read path can observe, not
//! null-pointer conventions.

use super::error::{AllocKind, StoreError};

/// One quantum-sized byte buffer, zero-filled at allocation.
pub(crate) type Block = Box<[u8]>;

/// A fixed-capacity set of block slots.
///
/// The slot array appears on the first write addressing the node; each block
/// appears on the first write addressing its slot. Releasing the node's
/// contents drops the blocks, then the array itself.
#[derive(Debug, Default)]
pub(crate) struct QuantumSet {
    slots: Option<Vec<Option<Block>>>,
}

impl QuantumSet {
    /// A fresh node with nothing allocated.
    pub(crate) fn new() -> Self {
        Self { slots: None }
    }

    /// Whether the slot array has been allocated.
    pub(crate) fn has_slots(&self) -> bool {
        self.slots.is_some()
    }

    /// Number of allocated blocks in this node.
    pub(crate) fn allocated_blocks(&self) -> usize {
        self.slots
            .as_ref()
            .map_or(0, |slots| slots.iter().filter(|slot| slot.is_some()).count())
    }

    /// Shared view of the block at `slot`, if the slot array and the block
    /// both exist.
    pub(crate) fn block(&self, slot: usize) -> Option<&[u8]> {
        self.slots
            .as_ref()
            .and_then(|slots| slots.get(slot))
            .and_then(|entry| entry.as_deref())
    }

    /// Make sure the slot array exists and return it.
    pub(crate) fn ensure_slots(
        &mut self,
        qset: usize,
    ) -> Result<&mut Vec<Option<Block>>, StoreError> {
        let slots = match self.slots.take() {
            Some(slots) => slots,
            None => {
                let mut slots: Vec<Option<Block>> = Vec::new();
                slots.try_reserve_exact(qset).map_err(|source| StoreError::Alloc {
                    kind: AllocKind::SlotArray,
                    source,
                })?;
                slots.resize_with(qset, || None);
                slots
            }
        };
        Ok(self.slots.insert(slots))
    }

    /// Make sure the block at `slot` exists and return it, allocating the
    /// slot array first when the node has never been written.
    pub(crate) fn ensure_block(
        &mut self,
        slot: usize,
        qset: usize,
        quantum: usize,
    ) -> Result<&mut [u8], StoreError> {
        let slots = self.ensure_slots(qset)?;
        let entry = &mut slots[slot];
        let block = match entry.take() {
            Some(block) => block,
            None => {
                let mut buf: Vec<u8> = Vec::new();
                buf.try_reserve_exact(quantum).map_err(|source| StoreError::Alloc {
                    kind: AllocKind::Block,
                    source,
                })?;
                buf.resize(quantum, 0);
                buf.into_boxed_slice()
            }
        };
        let block = entry.insert(block);
        Ok(&mut block[..])
    }

    /// Drop every allocated block, then the slot array itself.
    pub(crate) fn release_contents(&mut self) {
        self.slots = None;
    }
}
