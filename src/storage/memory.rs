//! RAM-backed persistent bytes for host tests and simulation.

use crate::config::ERASE_BYTE;
use crate::error::Error;
use crate::storage::PersistentBytes;

/// `N` bytes of simulated EEPROM, starting out erased like a fresh part.
#[derive(Clone, Debug)]
pub struct MemoryBytes<const N: usize> {
    data: [u8; N],
    writes: usize,
}

impl<const N: usize> MemoryBytes<N> {
    pub const fn new() -> Self {
        Self {
            data: [ERASE_BYTE; N],
            writes: 0,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Direct access, e.g. to inject corruption.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Number of write operations (`put` or `write`) performed.
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn range(address: usize, len: usize) -> Result<core::ops::Range<usize>, Error> {
        let end = address.checked_add(len).ok_or(Error::OutOfRange)?;
        if end > N {
            return Err(Error::OutOfRange);
        }
        Ok(address..end)
    }
}

impl<const N: usize> Default for MemoryBytes<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PersistentBytes for MemoryBytes<N> {
    fn get(&mut self, address: usize, buf: &mut [u8]) -> Result<(), Error> {
        let range = Self::range(address, buf.len())?;
        buf.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn put(&mut self, address: usize, data: &[u8]) -> Result<(), Error> {
        let range = Self::range(address, data.len())?;
        self.data[range].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }

    fn write(&mut self, address: usize, byte: u8) -> Result<(), Error> {
        let range = Self::range(address, 1)?;
        self.data[range.start] = byte;
        self.writes += 1;
        Ok(())
    }
}
