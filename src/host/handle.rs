//! A caller-owned cursor over one store, speaking `std::io`.
//!
//! The store itself never moves a cursor; the handle owns the position and
//! advances it by exactly the transfer counts the store reports. Transfers
//! that span block boundaries are re-issued here, one clamped call at a
//! time.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::store::SparseStore;

/// How a handle may touch its device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    fn readable(self) -> bool {
        !matches!(self, AccessMode::WriteOnly)
    }

    fn writable(self) -> bool {
        !matches!(self, AccessMode::ReadOnly)
    }
}

/// An open cursor over one device.
#[derive(Debug)]
pub struct DeviceHandle<'a> {
    device: &'a mut SparseStore,
    mode: AccessMode,
    pos: u64,
}

impl<'a> DeviceHandle<'a> {
    /// Open a cursor at offset zero. A write-only open empties the device
    /// first, the classic truncate-on-open contract; closing a handle
    /// (dropping it) touches nothing.
    pub fn open(device: &'a mut SparseStore, mode: AccessMode) -> Self {
        if mode == AccessMode::WriteOnly {
            device.reset();
        }
        Self { device, mode, pos: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// The mode this handle was opened with.
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Shared view of the underlying device.
    pub fn device(&self) -> &SparseStore {
        self.device
    }

    fn offset(&self) -> io::Result<usize> {
        usize::try_from(self.pos).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "cursor beyond the addressable range",
            )
        })
    }
}

impl Read for DeviceHandle<'_> {
    /// Reads until `buf` is full or a hole is reached. A hole reads as end
    /// of data, the way the unwritten tail of a character device does.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.mode.readable() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "device opened write-only",
            ));
        }
        let mut filled = 0;
        while filled < buf.len() {
            let offset = self.offset()?;
            let want = buf.len() - filled;
            let mut dest = &mut buf[filled..];
            let n = self.device.read_to(offset, want, &mut dest)?;
            if n == 0 {
                break;
            }
            filled += n;
            self.pos += n as u64;
        }
        Ok(filled)
    }
}

impl Write for DeviceHandle<'_> {
    /// Writes the whole buffer, re-issuing block-clamped transfers until it
    /// is consumed.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.mode.writable() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "device opened read-only",
            ));
        }
        let mut written = 0;
        while written < buf.len() {
            let offset = self.offset()?;
            let mut src = &buf[written..];
            let n = self.device.write_from(offset, buf.len() - written, &mut src)?;
            written += n;
            self.pos += n as u64;
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for DeviceHandle<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let next = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => (self.device.size() as u64).checked_add_signed(delta),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
        };
        match next {
            Some(next) => {
                self.pos = next;
                Ok(next)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek to a negative or overflowing position",
            )),
        }
    }
}
