//! User interface subsystem - four buttons, menu tree and OLED.
//!
//! ## Components
//!
//! - **Input**: debounce and hold detection over sampled pin levels
//! - **Menu**: arena menu tree and the navigator that walks it
//! - **Render**: text line primitive the menu draws through
//! - **Buttons** (target only): nRF52840 GPIO inputs with pull-ups
//! - **Display** (target only): SSD1306 128×64 OLED via I²C

pub mod input;
pub mod menu;
pub mod render;

#[cfg(feature = "embedded")]
pub mod buttons;
#[cfg(feature = "embedded")]
pub mod display;

pub use input::{ButtonId, Event, InputEventDetector, LevelSource};
pub use menu::{MenuNavigator, MenuTree, NavAction};
pub use render::{TextRenderer, TextScreen};
