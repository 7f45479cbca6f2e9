//! Geometry and offset translation.
//!
//! - Fixed-size quantum/qset partitioning of a linear byte space.
//! - Helpers to compute (node_index, slot_index, intra_offset) from absolute
//!   byte offsets.
//! - `Geometry` for custom sizes with validated construction and reference
//!   defaults.

use super::error::StoreError;

/// Default block size in bytes (the "quantum").
pub const DEFAULT_QUANTUM: usize = 4000;
/// Default number of block slots per node (the "qset").
pub const DEFAULT_QSET: usize = 1000;

/// Validated layout parameters for a sparse store.
///
/// Construction rejects zero sizes and node spans that do not fit `usize`,
/// so every instance in circulation can do its arithmetic unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    quantum: usize,
    qset: usize,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            qset: DEFAULT_QSET,
        }
    }
}

impl Geometry {
    /// Validate and build a layout.
    pub fn new(quantum: usize, qset: usize) -> Result<Self, StoreError> {
        if quantum == 0 || qset == 0 || quantum.checked_mul(qset).is_none() {
            return Err(StoreError::InvalidGeometry { quantum, qset });
        }
        Ok(Self { quantum, qset })
    }

    /// Block size in bytes.
    #[inline]
    pub fn quantum(&self) -> usize {
        self.quantum
    }

    /// Block slots per node.
    #[inline]
    pub fn qset(&self) -> usize {
        self.qset
    }

    /// Bytes covered by one node: `quantum * qset`.
    #[inline]
    pub fn node_span(&self) -> usize {
        self.quantum * self.qset
    }

    /// Zero-based node index for an absolute byte offset.
    #[inline]
    pub fn node_index_of(&self, offset: usize) -> usize {
        offset / self.node_span()
    }

    /// Offset of an absolute byte offset within its node.
    #[inline]
    pub fn within_node_offset(&self, offset: usize) -> usize {
        offset % self.node_span()
    }

    /// Slot index for an intra-node offset.
    #[inline]
    pub fn slot_index_of(&self, offset_in_node: usize) -> usize {
        offset_in_node / self.quantum
    }

    /// Offset within the block for an intra-node offset.
    #[inline]
    pub fn within_quantum_offset(&self, offset_in_node: usize) -> usize {
        offset_in_node % self.quantum
    }

    /// Translate an absolute byte offset into backing coordinates.
    ///
    /// Pure integer arithmetic with no side effects; the read and write
    /// paths both go through here so the same offset always addresses the
    /// same byte.
    #[inline]
    pub fn locate(&self, offset: usize) -> BlockAddr {
        let rest = self.within_node_offset(offset);
        BlockAddr {
            node: self.node_index_of(offset),
            slot: self.slot_index_of(rest),
            offset: self.within_quantum_offset(rest),
        }
    }

    /// Absolute byte range [start, end) covered by a node index (end exclusive).
    #[inline]
    pub fn node_byte_range(&self, node_index: usize) -> (usize, usize) {
        let start = node_index * self.node_span();
        (start, start + self.node_span())
    }
}

/// Backing coordinates of one byte: the node, the slot within the node, and
/// the byte offset within the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockAddr {
    pub node: usize,
    pub slot: usize,
    pub offset: usize,
}
