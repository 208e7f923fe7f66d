//! Persistent storage for named signal slots.
//!
//! Every slot is persisted independently in a byte-addressable store
//! (an I²C EEPROM on target) so a torn write can only damage one slot.
//!
//! Storage layout:
//!   - Slot `i` lives at `i * SLOT_STORAGE_SIZE`.
//!   - A slot is its raw record immediately followed by one CRC-8 byte
//!     computed over the record bytes.
//!
//! ```text
//! Byte  0..17: name, UTF-8, NUL padded (always NUL terminated)
//! Byte 17..25: signal (see `signal` module)
//! Byte 25    : CRC-8/SMBUS over bytes 0..25
//! ```
//!
//! A slot whose checksum does not match is reset to its default name and
//! the empty signal, and written back immediately.

pub mod memory;

#[cfg(feature = "embedded")]
pub mod eeprom;

use crc::{Crc, CRC_8_SMBUS};
use heapless::String;

use crate::config::{ERASE_BYTE, SIGNAL_POLICY, SLOT_COUNT, SLOT_NAME_LENGTH_MAX};
use crate::error::Error;
use crate::signal::{Signal, SIGNAL_SIZE};
use crate::ui::menu::LabelSource;

/// Name field size, including the terminating NUL.
pub const NAME_FIELD_SIZE: usize = SLOT_NAME_LENGTH_MAX + 1;

/// Raw record size (name field + signal).
pub const RECORD_SIZE: usize = NAME_FIELD_SIZE + SIGNAL_SIZE;

/// Stored size of one slot (record + checksum byte).
pub const SLOT_STORAGE_SIZE: usize = RECORD_SIZE + 1;

/// Size of the whole slot region.
pub const REGION_SIZE: usize = SLOT_COUNT * SLOT_STORAGE_SIZE;

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// CRC-8 (poly 0x07, init 0x00) over `data`.
pub fn checksum(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

/// Storage address of a slot.
pub const fn slot_address(slot: usize) -> usize {
    slot * SLOT_STORAGE_SIZE
}

/// Byte-addressable persistent memory.
pub trait PersistentBytes {
    /// Read `buf.len()` bytes starting at `address`.
    fn get(&mut self, address: usize, buf: &mut [u8]) -> Result<(), Error>;

    /// Write `data` starting at `address`.
    fn put(&mut self, address: usize, data: &[u8]) -> Result<(), Error>;

    /// Write a single byte.
    fn write(&mut self, address: usize, byte: u8) -> Result<(), Error> {
        self.put(address, &[byte])
    }
}

/// How `set_signal` treats a slot that already holds a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalPolicy {
    /// Always replace the stored signal.
    Overwrite,
    /// Only fill empty slots; used for factory-provisioned stores.
    FillEmpty,
}

pub type SlotName = String<SLOT_NAME_LENGTH_MAX>;

/// Clip `name` to whole characters fitting in `SLOT_NAME_LENGTH_MAX` bytes.
/// A NUL ends the name.
pub fn truncate_name(name: &str) -> SlotName {
    let mut clipped = SlotName::new();
    for c in name.chars() {
        if c == '\0' || clipped.push(c).is_err() {
            break;
        }
    }
    clipped
}

/// One named signal record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub name: SlotName,
    pub signal: Signal,
}

impl Slot {
    /// Default contents of slot `index`: `"Slot NN"` (1-based) and no signal.
    pub fn default_for(index: usize) -> Self {
        use core::fmt::Write;

        let mut name = SlotName::new();
        let _ = write!(name, "Slot {:02}", index + 1);
        Self {
            name,
            signal: Signal::INVALID,
        }
    }

    /// Serialise into the fixed record layout.
    fn serialize(&self, buf: &mut [u8; RECORD_SIZE]) {
        buf.fill(0);
        let name = self.name.as_bytes();
        buf[..name.len()].copy_from_slice(name);
        self.signal.serialize(&mut buf[NAME_FIELD_SIZE..]);
    }

    /// Parse a record. Rejects a name field without terminator or with
    /// invalid UTF-8.
    fn deserialize(data: &[u8]) -> Option<Self> {
        if data.len() < RECORD_SIZE {
            return None;
        }
        let field = &data[..NAME_FIELD_SIZE];
        let end = field.iter().position(|&b| b == 0)?;
        let text = core::str::from_utf8(&field[..end]).ok()?;
        let signal = Signal::from_bytes(&data[NAME_FIELD_SIZE..RECORD_SIZE])?;
        Some(Self {
            name: truncate_name(text),
            signal,
        })
    }

    /// Record bytes followed by their checksum.
    fn encode(&self) -> [u8; SLOT_STORAGE_SIZE] {
        let mut record = [0u8; RECORD_SIZE];
        self.serialize(&mut record);
        let mut out = [0u8; SLOT_STORAGE_SIZE];
        out[..RECORD_SIZE].copy_from_slice(&record);
        out[RECORD_SIZE] = checksum(&record);
        out
    }

    /// Verify the checksum and parse.
    fn decode(data: &[u8; SLOT_STORAGE_SIZE]) -> Option<Self> {
        let (record, crc) = data.split_at(RECORD_SIZE);
        if checksum(record) != crc[0] {
            return None;
        }
        Self::deserialize(record)
    }
}

/// In-memory slot array, synced slot by slot with persistent storage.
///
/// Out-of-range slot indices never fault: setters ignore them and getters
/// return the empty signal or an empty name.
pub struct SlotStore<P> {
    bytes: P,
    slots: [Slot; SLOT_COUNT],
    policy: SignalPolicy,
}

impl<P: PersistentBytes> SlotStore<P> {
    /// Store using the deployment's `SIGNAL_POLICY`. Call [`load`](Self::load)
    /// before use.
    pub fn new(bytes: P) -> Self {
        Self::with_policy(bytes, SIGNAL_POLICY)
    }

    pub fn with_policy(bytes: P, policy: SignalPolicy) -> Self {
        Self {
            bytes,
            slots: core::array::from_fn(Slot::default_for),
            policy,
        }
    }

    pub fn policy(&self) -> SignalPolicy {
        self.policy
    }

    pub fn slot_count(&self) -> usize {
        SLOT_COUNT
    }

    pub fn bytes(&self) -> &P {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut P {
        &mut self.bytes
    }

    pub fn get_signal(&self, slot: usize) -> Signal {
        self.slots.get(slot).map_or(Signal::INVALID, |s| s.signal)
    }

    /// Store `signal` in `slot` and persist it. With `FillEmpty`, a slot
    /// that already holds a signal is left untouched.
    pub fn set_signal(&mut self, slot: usize, signal: Signal) {
        let policy = self.policy;
        let Some(entry) = self.slots.get_mut(slot) else {
            return;
        };
        if policy == SignalPolicy::FillEmpty && entry.signal.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::debug!("Slot {}: already filled, signal ignored", slot);
            return;
        }
        entry.signal = signal;
        self.persist(slot);
    }

    pub fn get_name(&self, slot: usize) -> &str {
        self.slots.get(slot).map_or("", |s| s.name.as_str())
    }

    /// Rename `slot` (clipped to `SLOT_NAME_LENGTH_MAX` bytes) and persist it.
    pub fn set_name(&mut self, slot: usize, name: &str) {
        let Some(entry) = self.slots.get_mut(slot) else {
            return;
        };
        entry.name = truncate_name(name);
        self.persist(slot);
    }

    /// Restore the default name, drop the signal and persist.
    pub fn reset(&mut self, slot: usize) {
        let Some(entry) = self.slots.get_mut(slot) else {
            return;
        };
        *entry = Slot::default_for(slot);
        self.persist(slot);
    }

    pub fn is_filled(&self, slot: usize) -> bool {
        self.get_signal(slot).is_valid()
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.signal.is_valid()).count()
    }

    /// Write one slot (record + checksum) in a single store operation.
    pub fn save(&mut self, slot: usize) -> Result<(), Error> {
        let Some(entry) = self.slots.get(slot) else {
            return Ok(());
        };
        let encoded = entry.encode();
        self.bytes.put(slot_address(slot), &encoded)
    }

    /// Load every slot, repairing the ones that fail verification.
    /// Returns the number of slots holding a signal.
    pub fn load(&mut self) -> usize {
        for slot in 0..SLOT_COUNT {
            let mut raw = [0u8; SLOT_STORAGE_SIZE];
            let loaded = match self.bytes.get(slot_address(slot), &mut raw) {
                Ok(()) => Slot::decode(&raw),
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Slot {}: read failed: {}", slot, _e);
                    None
                }
            };

            match loaded {
                Some(entry) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Slot {}: \"{}\" {}", slot, entry.name.as_str(), entry.signal);
                    self.slots[slot] = entry;
                }
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Slot {}: checksum mismatch - resetting", slot);
                    self.slots[slot] = Slot::default_for(slot);
                    self.persist(slot);
                }
            }
        }

        let filled = self.filled_count();
        #[cfg(feature = "defmt")]
        defmt::info!("Loaded slots: {} of {} filled", filled, SLOT_COUNT);
        filled
    }

    /// Overwrite the whole slot region with `ERASE_BYTE`. In-memory slots
    /// are untouched; the next [`load`](Self::load) rebuilds every slot.
    pub fn erase_all(&mut self) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::info!("Erasing {} bytes of slot storage", REGION_SIZE);
        for address in 0..REGION_SIZE {
            self.bytes.write(address, ERASE_BYTE)?;
        }
        Ok(())
    }

    fn persist(&mut self, slot: usize) {
        match self.save(slot) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Slot {}: saved", slot);
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Slot {}: write failed: {}", slot, _e);
            }
        }
    }
}

impl<P: PersistentBytes> LabelSource for SlotStore<P> {
    fn slot_name(&self, slot: u8) -> &str {
        self.get_name(slot as usize)
    }
}
