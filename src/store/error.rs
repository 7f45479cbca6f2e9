//! Typed failures for the sparse store.
//!
//! Zero bytes transferred is a valid result, never an error, so a hole stays
//! distinguishable from a fault at the type level. Every failure is local to
//! the call that raised it; the store remains usable afterwards.

use std::collections::TryReserveError;
use std::fmt;
use std::io;

use thiserror::Error;

/// What the store was trying to reserve when the allocator refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocKind {
    /// A node of the arena.
    Node,
    /// A node's array of block slots.
    SlotArray,
    /// One quantum-sized block.
    Block,
    /// The host-owned array of device instances.
    DeviceTable,
}

impl fmt::Display for AllocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AllocKind::Node => "node",
            AllocKind::SlotArray => "slot array",
            AllocKind::Block => "block",
            AllocKind::DeviceTable => "device table",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// A memory reservation for part of the backing structure failed.
    /// Growth committed before the failure stays in place; there is no
    /// rollback and no retry at this layer.
    #[error("failed to allocate {kind}")]
    Alloc {
        kind: AllocKind,
        #[source]
        source: TryReserveError,
    },

    /// The caller-side byte transfer reported a failure mid-operation.
    #[error("byte transfer faulted")]
    CopyFault(#[source] io::Error),

    /// Zero or unaddressable quantum/qset supplied at construction.
    #[error("geometry must be positive and addressable (quantum={quantum}, qset={qset})")]
    InvalidGeometry { quantum: usize, qset: usize },
}

impl From<StoreError> for io::Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Alloc { .. } => io::Error::new(io::ErrorKind::OutOfMemory, value),
            StoreError::CopyFault(inner) => inner,
            StoreError::InvalidGeometry { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, value)
            }
        }
    }
}
