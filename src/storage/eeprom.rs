//! 24x64 I²C EEPROM backend.
//!
//! Writes are split on 32-byte page boundaries. After every page the chip
//! is busy for up to `EEPROM_WRITE_CYCLE_MS` and NACKs its address, so
//! each transfer waits out the write cycle and is retried a few times.

use eeprom24x::{addr_size, page_size, unique_serial, Eeprom24x, SlaveAddr};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::PersistentBytes;
use crate::config::{EEPROM_PAGE_SIZE, EEPROM_SIZE, EEPROM_WRITE_CYCLE_MS};
use crate::error::Error;

/// Attempts per transfer before giving up.
const RETRIES: u8 = 3;

type Device<I2C> = Eeprom24x<I2C, page_size::B32, addr_size::TwoBytes, unique_serial::No>;

pub struct EepromBytes<I2C, D> {
    eeprom: Device<I2C>,
    delay: D,
}

impl<I2C, D, E> EepromBytes<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// EEPROM at the default address (A0..A2 tied low).
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            eeprom: Eeprom24x::new_24x64(i2c, SlaveAddr::default()),
            delay,
        }
    }

    fn check_range(address: usize, len: usize) -> Result<(), Error> {
        match address.checked_add(len) {
            Some(end) if end <= EEPROM_SIZE => Ok(()),
            _ => Err(Error::OutOfRange),
        }
    }

    fn write_chunk(&mut self, address: usize, chunk: &[u8]) -> Result<(), Error> {
        for _attempt in 0..RETRIES {
            let result = self.eeprom.write_page(address as u32, chunk);
            self.delay.delay_ms(EEPROM_WRITE_CYCLE_MS);
            if result.is_ok() {
                return Ok(());
            }
            #[cfg(feature = "defmt")]
            defmt::debug!("Retry EEPROM write at {}", address);
        }
        #[cfg(feature = "defmt")]
        defmt::error!("EEPROM write failed at {}", address);
        Err(Error::Storage)
    }
}

impl<I2C, D, E> PersistentBytes for EepromBytes<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    fn get(&mut self, address: usize, buf: &mut [u8]) -> Result<(), Error> {
        Self::check_range(address, buf.len())?;
        for _attempt in 0..RETRIES {
            if self.eeprom.read_data(address as u32, buf).is_ok() {
                return Ok(());
            }
            #[cfg(feature = "defmt")]
            defmt::debug!("Retry EEPROM read at {}", address);
            self.delay.delay_ms(EEPROM_WRITE_CYCLE_MS);
        }
        Err(Error::Storage)
    }

    fn put(&mut self, address: usize, data: &[u8]) -> Result<(), Error> {
        Self::check_range(address, data.len())?;
        let mut address = address;
        let mut rest = data;
        while !rest.is_empty() {
            let room = EEPROM_PAGE_SIZE - address % EEPROM_PAGE_SIZE;
            let (chunk, tail) = rest.split_at(room.min(rest.len()));
            self.write_chunk(address, chunk)?;
            address += chunk.len();
            rest = tail;
        }
        Ok(())
    }

    fn write(&mut self, address: usize, byte: u8) -> Result<(), Error> {
        Self::check_range(address, 1)?;
        for _attempt in 0..RETRIES {
            let result = self.eeprom.write_byte(address as u32, byte);
            self.delay.delay_ms(EEPROM_WRITE_CYCLE_MS);
            if result.is_ok() {
                return Ok(());
            }
        }
        Err(Error::Storage)
    }
}
