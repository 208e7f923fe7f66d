//! Host-testable core of the pocketkey remote firmware.
//!
//! Four buttons drive a paged menu on a 128×64 OLED. The menu picks one of
//! twenty named signal slots to send, record into, rename or reset. Slots
//! are persisted one record at a time in an I²C EEPROM with a CRC-8 per
//! record.
//!
//! Everything in this crate except `ui::buttons`, `ui::display` and
//! `storage::eeprom` is plain `no_std` logic and runs under `cargo test`
//! on the host. The embedded binary (`src/main.rs`) needs the `embedded`
//! feature.
//!
//! Usage: `cargo test` or `cargo test --lib`

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod config;
pub mod error;
pub mod signal;
pub mod storage;
pub mod ui;

pub use app::{Controller, Request};
pub use error::Error;
pub use signal::Signal;
pub use storage::{PersistentBytes, SlotStore};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::config::*;
    use super::storage::{REGION_SIZE, SLOT_STORAGE_SIZE};

    // ════════════════════════════════════════════════════════════════════════
    // Configuration sanity
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn slot_region_fits_eeprom() {
        assert!(REGION_SIZE <= EEPROM_SIZE);
        assert_eq!(REGION_SIZE, SLOT_COUNT * SLOT_STORAGE_SIZE);
    }

    #[test]
    fn slot_indices_fit_labels() {
        assert!(SLOT_COUNT <= u8::MAX as usize);
    }

    #[test]
    fn hold_thresholds_are_ordered() {
        assert!(DEBOUNCE_TIME_MS < HOLD_REPEAT_TIME_MS);
        assert!(HOLD_REPEAT_TIME_MS < HOLD_START_TIME_MS);
        assert!((POLL_INTERVAL_MS as u32) < DEBOUNCE_TIME_MS);
    }

    #[test]
    fn root_header_fits_header_line() {
        assert!(ROOT_HEADER.len() <= HEADER_LENGTH_MAX);
        assert!(SLOT_NAME_LENGTH_MAX <= HEADER_LENGTH_MAX);
    }

    #[test]
    fn page_fits_panel() {
        use super::ui::render::{Line, ROW_HEIGHT_PX};
        let bottom = Line::Navigation.y() as usize + ROW_HEIGHT_PX as usize;
        assert!(bottom <= 64);
        assert!(PAGE_ITEM_COUNT >= 1);
    }
}
