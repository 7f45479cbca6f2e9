//! The device table: an explicitly owned collection of stores.
//!
//! Replaces the process-wide device array of classic driver code; hosts hold
//! a table, hand out handles by index, and tear the whole thing down in one
//! place.

use std::io;

use tracing::info;

use crate::store::{AllocKind, Geometry, SparseStore, StoreError, StoreStats};

use super::config::DeviceConfig;
use super::handle::{AccessMode, DeviceHandle};

/// All device instances owned by one host.
pub struct DeviceTable {
    devices: Vec<SparseStore>,
}

impl DeviceTable {
    /// Build `count` empty stores sharing one configured geometry.
    pub fn initialize(count: usize, geometry: Geometry) -> Result<Self, StoreError> {
        let mut devices = Vec::new();
        devices.try_reserve_exact(count).map_err(|source| StoreError::Alloc {
            kind: AllocKind::DeviceTable,
            source,
        })?;
        devices.resize_with(count, || SparseStore::with_geometry(geometry));

        info!(
            count,
            quantum = geometry.quantum(),
            qset = geometry.qset(),
            "device table initialized"
        );
        Ok(Self { devices })
    }

    /// Build a table from host configuration, validating the geometry before
    /// anything is allocated.
    pub fn from_config(config: &DeviceConfig) -> Result<Self, StoreError> {
        Self::initialize(config.devices, config.geometry()?)
    }

    /// Number of devices in the table.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Shared view of one device.
    pub fn get(&self, index: usize) -> Option<&SparseStore> {
        self.devices.get(index)
    }

    /// Exclusive view of one device.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut SparseStore> {
        self.devices.get_mut(index)
    }

    /// Open a cursor over one device. Write-only opens truncate.
    pub fn open(&mut self, index: usize, mode: AccessMode) -> io::Result<DeviceHandle<'_>> {
        let device = self.devices.get_mut(index).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no device at index {index}"))
        })?;
        Ok(DeviceHandle::open(device, mode))
    }

    /// Per-device allocation snapshots.
    pub fn stats(&self) -> Vec<StoreStats> {
        self.devices.iter().map(SparseStore::stats).collect()
    }

    /// Reset every device, then release the table itself.
    pub fn teardown(mut self) {
        for device in &mut self.devices {
            device.reset();
        }
        info!(count = self.devices.len(), "device table torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read as _, Seek as _, SeekFrom, Write as _};

    fn tiny() -> Geometry {
        Geometry::new(4, 2).unwrap()
    }

    #[test]
    fn devices_are_independent() {
        let mut table = DeviceTable::initialize(2, tiny()).unwrap();

        table
            .open(0, AccessMode::ReadWrite)
            .unwrap()
            .write_all(b"zero")
            .unwrap();

        assert_eq!(table.get(0).unwrap().size(), 4);
        assert_eq!(table.get(1).unwrap().size(), 0);
        assert!(table.get(1).unwrap().is_empty());
    }

    #[test]
    fn open_out_of_range_is_not_found() {
        let mut table = DeviceTable::initialize(1, tiny()).unwrap();
        let err = table.open(5, AccessMode::ReadOnly).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn reopening_keeps_data_until_a_write_only_open() {
        let mut table = DeviceTable::initialize(1, tiny()).unwrap();
        table
            .open(0, AccessMode::ReadWrite)
            .unwrap()
            .write_all(b"abc")
            .unwrap();

        {
            let mut handle = table.open(0, AccessMode::ReadWrite).unwrap();
            handle.seek(SeekFrom::Start(0)).unwrap();
            let mut out = [0u8; 3];
            handle.read_exact(&mut out).unwrap();
            assert_eq!(&out, b"abc");
        }

        table.open(0, AccessMode::WriteOnly).unwrap();
        assert_eq!(table.get(0).unwrap().size(), 0);
    }

    #[test]
    fn get_mut_reaches_the_underlying_store() {
        let mut table = DeviceTable::initialize(1, tiny()).unwrap();
        let wider = Geometry::new(16, 4).unwrap();
        table.get_mut(0).unwrap().set_default_geometry(wider);
        table.get_mut(0).unwrap().reset();
        assert_eq!(table.get(0).unwrap().geometry(), wider);
    }

    #[test]
    fn from_config_validates_geometry_first() {
        let bad = DeviceConfig { devices: 2, quantum: 0, qset: 8 };
        assert!(matches!(
            DeviceTable::from_config(&bad),
            Err(StoreError::InvalidGeometry { .. })
        ));

        let good = DeviceConfig { devices: 2, quantum: 8, qset: 2 };
        let table = DeviceTable::from_config(&good).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn teardown_resets_every_device() {
        let mut table = DeviceTable::initialize(3, tiny()).unwrap();
        for index in 0..3 {
            table
                .open(index, AccessMode::ReadWrite)
                .unwrap()
                .write_all(b"x")
                .unwrap();
        }
        // teardown consumes the table; resetting each device on the way out
        // is observable only through the absence of leaks, so exercise the
        // same walk through stats first
        assert!(table.stats().iter().all(|s| s.blocks == 1));
        table.teardown();
    }
}
