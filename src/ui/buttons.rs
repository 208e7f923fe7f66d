//! GPIO button inputs.
//!
//! Four tactile switches, active-low with the internal pull-up enabled:
//!   - UP    - previous item
//!   - DOWN  - next item
//!   - LEFT  - back / exit
//!   - RIGHT - enter / confirm
//!
//! Pins are only sampled here; debouncing happens in the input detector.

use embassy_nrf::gpio::{AnyPin, Input, Pull};

use crate::ui::input::{ButtonId, LevelSource};

pub struct ButtonPins {
    up: Input<'static>,
    down: Input<'static>,
    left: Input<'static>,
    right: Input<'static>,
}

impl ButtonPins {
    pub fn new(up: AnyPin, down: AnyPin, left: AnyPin, right: AnyPin) -> Self {
        Self {
            up: Input::new(up, Pull::Up),
            down: Input::new(down, Pull::Up),
            left: Input::new(left, Pull::Up),
            right: Input::new(right, Pull::Up),
        }
    }
}

impl LevelSource for ButtonPins {
    fn is_high(&mut self, id: ButtonId) -> bool {
        match id {
            ButtonId::Up => self.up.is_high(),
            ButtonId::Down => self.down.is_high(),
            ButtonId::Left => self.left.is_high(),
            ButtonId::Right => self.right.is_high(),
        }
    }
}
