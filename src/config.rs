//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and storage layout
//! constants live here so they can be tuned in one place.

use crate::storage::SignalPolicy;

// Buttons
//
// These are logical names; actual `embassy_nrf::peripherals::*` pins are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button UP      → P0.11
//   Button DOWN    → P0.12
//   Button LEFT    → P0.24
//   Button RIGHT   → P0.25
//   I²C SDA        → P0.26  (display + EEPROM)
//   I²C SCL        → P0.27
//
// All buttons are wired to GND with the internal pull-up enabled (active-low).

/// Minimum stable-active time before a press is accepted (ms).
pub const DEBOUNCE_TIME_MS: u32 = 20;

/// Time a press must be sustained before it turns into a hold (ms).
pub const HOLD_START_TIME_MS: u32 = 1000;

/// Interval between repeated hold events while a button stays held (ms).
pub const HOLD_REPEAT_TIME_MS: u32 = 200;

/// Main loop poll period (ms). Must stay well below `DEBOUNCE_TIME_MS`.
pub const POLL_INTERVAL_MS: u64 = 5;

// Menu / display

/// Number of menu rows visible on one page.
pub const PAGE_ITEM_COUNT: usize = 5;

/// Header shown while the current node sits at the top level.
pub const ROOT_HEADER: &str = "Pocket Key";

/// Characters that fit in the large (header) font.
pub const HEADER_LENGTH_MAX: usize = 16;

/// Characters that fit in a small-font menu row, excluding the selection marker.
pub const ROW_LENGTH_MAX: usize = 20;

/// Capacity of the static menu arena.
pub const MENU_NODE_COUNT_MAX: usize = 32;

// Signal slots

/// Number of persisted signal slots.
pub const SLOT_COUNT: usize = 20;

/// Maximum slot name length in bytes (excluding the terminating NUL).
pub const SLOT_NAME_LENGTH_MAX: usize = 16;

/// Byte written over the slot region by an erase.
pub const ERASE_BYTE: u8 = 0xFF;

/// `set_signal` policy for this deployment.
pub const SIGNAL_POLICY: SignalPolicy = SignalPolicy::Overwrite;

// EEPROM (24C64 on the shared I²C bus)

/// Total EEPROM size in bytes.
pub const EEPROM_SIZE: usize = 8192;

/// EEPROM write page size in bytes.
pub const EEPROM_PAGE_SIZE: usize = 32;

/// Worst-case EEPROM internal write cycle (ms).
pub const EEPROM_WRITE_CYCLE_MS: u32 = 5;
