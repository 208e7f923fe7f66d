//! Unified error type for pocketkey.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (with the `defmt` feature) for efficient
//! on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// The persistent byte primitive failed to read or write.
    Storage,

    /// Address range falls outside the persistent storage region.
    OutOfRange,

    // UI / Display
    /// I²C transaction to the display failed.
    Display,

    // Generic
    /// A bounded buffer (menu arena, text line) is full.
    BufferOverflow,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Error::Storage => "storage access failed",
            Error::OutOfRange => "address out of range",
            Error::Display => "display access failed",
            Error::BufferOverflow => "buffer full",
        };
        f.write_str(text)
    }
}
