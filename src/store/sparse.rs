//! The sparse store: a lazily grown arena of quantum-set nodes behind a
//! linear byte-offset read/write surface.
//!
//! Chain position is arena index, so node `i` always covers the byte range
//! `[i * node_span, (i + 1) * node_span)`. Single transfers never cross a
//! block boundary; callers advance their own cursor by the reported count
//! and re-issue for the remainder.

use std::io::{Read, Write};

use tracing::{debug, trace};

use super::error::{AllocKind, StoreError};
use super::layout::Geometry;
use super::node::QuantumSet;

/// Allocation snapshot of one store. Holes are observable here: an
/// unwritten range shows up as missing nodes, arrays, or blocks, never as
/// zero-filled memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// High-water mark of bytes addressed by successful writes.
    pub size: usize,
    /// Nodes in the arena.
    pub nodes: usize,
    /// Nodes whose slot array has been allocated.
    pub slot_arrays: usize,
    /// Blocks allocated across all nodes.
    pub blocks: usize,
    /// Bytes held by allocated blocks.
    pub block_bytes: usize,
}

/// One logical unit of sparse, byte-addressable storage.
///
/// The store keeps no cursor; every call takes an absolute offset. Exclusive
/// access for the duration of a call is the whole concurrency story, which
/// `&self`/`&mut self` already enforce.
#[derive(Debug)]
pub struct SparseStore {
    nodes: Vec<QuantumSet>,
    geometry: Geometry,
    defaults: Geometry,
    size: usize,
}

impl Default for SparseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseStore {
    /// A store with the reference default geometry.
    pub fn new() -> Self {
        Self::with_geometry(Geometry::default())
    }

    /// A store whose configured default geometry is `geometry`.
    pub fn with_geometry(geometry: Geometry) -> Self {
        Self {
            nodes: Vec::new(),
            geometry,
            defaults: geometry,
            size: 0,
        }
    }

    /// High-water mark of bytes addressed by successful writes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The geometry existing nodes were written with.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The geometry the next `reset` will switch to.
    pub fn default_geometry(&self) -> Geometry {
        self.defaults
    }

    /// Replace the configured default geometry. The active geometry is left
    /// alone so existing nodes keep the layout they were written with; the
    /// next `reset` switches over.
    pub fn set_default_geometry(&mut self, geometry: Geometry) {
        self.defaults = geometry;
    }

    /// Whether the store has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn follow(&self, node_index: usize) -> Option<&QuantumSet> {
        self.nodes.get(node_index)
    }

    /// Walk to `node_index`, growing the arena through every missing
    /// intermediate node. Nodes created before a failed reservation stay in
    /// place; a failed extension is not rolled back.
    fn follow_or_grow(&mut self, node_index: usize) -> Result<&mut QuantumSet, StoreError> {
        if self.nodes.len() <= node_index {
            let from = self.nodes.len();
            while self.nodes.len() <= node_index {
                self.nodes.try_reserve(1).map_err(|source| StoreError::Alloc {
                    kind: AllocKind::Node,
                    source,
                })?;
                self.nodes.push(QuantumSet::new());
            }
            trace!(from, to = node_index + 1, "grew node arena");
        }
        Ok(&mut self.nodes[node_index])
    }

    /// Transfer up to `count` bytes at `offset` into `dest`.
    ///
    /// The transfer never crosses a block boundary: the reported count is
    /// clamped to the end of the block the offset falls in. A hole (missing
    /// node, slot array, or block) transfers zero bytes; absence of data is
    /// an answer here, not an error, and nothing is allocated to satisfy a
    /// read.
    #[tracing::instrument(name = "SparseStore.read_to", level = "trace", skip(self, dest))]
    pub fn read_to<W: Write>(
        &self,
        offset: usize,
        count: usize,
        dest: &mut W,
    ) -> Result<usize, StoreError> {
        let addr = self.geometry.locate(offset);
        let Some(block) = self.follow(addr.node).and_then(|node| node.block(addr.slot)) else {
            return Ok(0);
        };

        let count = count.min(self.geometry.quantum() - addr.offset);
        dest.write_all(&block[addr.offset..addr.offset + count])
            .map_err(StoreError::CopyFault)?;
        Ok(count)
    }

    /// Transfer up to `count` bytes from `src` into the store at `offset`,
    /// allocating whatever part of the backing structure is missing.
    ///
    /// Clamped exactly like `read_to`. On a source fault the call fails and
    /// `size` stays put, but structure grown to host the write is kept; a
    /// retry at the same offset reuses it without reallocating.
    #[tracing::instrument(name = "SparseStore.write_from", level = "trace", skip(self, src))]
    pub fn write_from<R: Read>(
        &mut self,
        offset: usize,
        count: usize,
        src: &mut R,
    ) -> Result<usize, StoreError> {
        let geometry = self.geometry;
        let addr = geometry.locate(offset);

        let node = self.follow_or_grow(addr.node)?;
        let block = node.ensure_block(addr.slot, geometry.qset(), geometry.quantum())?;

        let count = count.min(geometry.quantum() - addr.offset);
        src.read_exact(&mut block[addr.offset..addr.offset + count])
            .map_err(StoreError::CopyFault)?;

        self.size = self.size.max(offset + count);
        Ok(count)
    }

    /// Release every block, every slot array, and every node, returning the
    /// store to its never-written state with the configured default geometry
    /// applied.
    ///
    /// Idempotent: resetting an empty store is a no-op.
    pub fn reset(&mut self) {
        let released = self.nodes.len();
        for node in &mut self.nodes {
            node.release_contents();
        }
        self.nodes = Vec::new();
        self.size = 0;
        self.geometry = self.defaults;
        debug!(nodes = released, "store reset");
    }

    /// Allocation snapshot, the observable side of lazy growth.
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats {
            size: self.size,
            nodes: self.nodes.len(),
            ..StoreStats::default()
        };
        for node in &self.nodes {
            if node.has_slots() {
                stats.slot_arrays += 1;
            }
            let blocks = node.allocated_blocks();
            stats.blocks += blocks;
            stats.block_bytes += blocks * self.geometry.quantum();
        }
        stats
    }
}
