//! Sparse storage core.
//!
//! Design notes:
//! - A linear byte space is cut into fixed-size nodes of `qset` block slots,
//!   each slot holding one lazily allocated `quantum`-sized block.
//! - Nothing is allocated until a write addresses it; reads over unwritten
//!   ranges transfer zero bytes instead of fabricating zero-filled data.
//! - `reset` releases blocks, then slot arrays, then nodes, and applies the
//!   configured default geometry for whatever is written next.
//!
//! This module exposes:
//! - `Geometry` and `BlockAddr` for translating absolute offsets into
//!   backing coordinates.
//! - `SparseStore`, the offset-addressed store itself.
//! - `StoreError`, the typed failure surface, and `StoreStats`, the
//!   allocation snapshot that makes lazy growth observable.

pub mod error;
pub mod layout;
pub(crate) mod node;
pub mod sparse;

pub use error::{AllocKind, StoreError};
pub use layout::{BlockAddr, DEFAULT_QSET, DEFAULT_QUANTUM, Geometry};
pub use sparse::{SparseStore, StoreStats};
