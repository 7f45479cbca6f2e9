// Library crate for gruyere: a sparse, lazily allocated in-memory byte
// store with a block-device-like read/write surface.

pub mod host;
pub mod store;

// Public surface for embedding hosts.
pub use crate::host::{
    AccessMode, ConfigError, DEFAULT_DEVICE_COUNT, DeviceConfig, DeviceHandle, DeviceTable,
};
pub use crate::store::{
    AllocKind, BlockAddr, DEFAULT_QSET, DEFAULT_QUANTUM, Geometry, SparseStore, StoreError,
    StoreStats,
};
