//! Debounced button event detection.
//!
//! Every button is a small state machine (`Released → Pressed → Held`)
//! fed with raw pin levels once per poll tick. A tick reports at most one
//! event across all buttons: channels are evaluated in priority order and
//! evaluation stops at the first one that produced something. The remaining
//! channels simply catch up on the next tick.
//!
//! Timing uses a wrapping `u32` millisecond clock. All comparisons are made
//! on `now - last_edge` so a clock overflow never stalls a button.

use crate::config::{DEBOUNCE_TIME_MS, HOLD_REPEAT_TIME_MS, HOLD_START_TIME_MS};

/// Physical buttons, in poll priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Up,
    Down,
    Left,
    Right,
}

impl ButtonId {
    pub const ALL: [ButtonId; 4] = [ButtonId::Up, ButtonId::Down, ButtonId::Left, ButtonId::Right];
}

/// Electrical level that means "pressed".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Button pulls the pin to GND (internal pull-up).
    ActiveLow,
    /// Button drives the pin high (external pull-down).
    ActiveHigh,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Released,
    Pressed,
    Held,
}

/// Debounced button event, produced on a state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    PressStart,
    PressEnd,
    HoldStart,
    /// Repeats every hold-repeat interval while the button stays held.
    HoldContinue,
    HoldEnd,
}

/// Source of raw pin levels, one per button.
pub trait LevelSource {
    fn is_high(&mut self, id: ButtonId) -> bool;
}

/// Detector thresholds in milliseconds. Each one must be strictly exceeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub debounce_ms: u32,
    pub hold_start_ms: u32,
    pub hold_repeat_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_TIME_MS,
            hold_start_ms: HOLD_START_TIME_MS,
            hold_repeat_ms: HOLD_REPEAT_TIME_MS,
        }
    }
}

/// Debounce/hold state of one button.
#[derive(Clone, Copy, Debug)]
pub struct Channel {
    id: ButtonId,
    polarity: Polarity,
    state: State,
    event: Option<Event>,
    /// Time of the last accepted transition (or first active sample).
    last_edge_ms: u32,
    /// Raw level was active on the previous evaluation.
    is_active: bool,
}

impl Channel {
    pub const fn new(id: ButtonId, polarity: Polarity) -> Self {
        Self {
            id,
            polarity,
            state: State::Released,
            event: None,
            last_edge_ms: 0,
            is_active: false,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Event produced on the last tick this channel was evaluated.
    pub fn event(&self) -> Option<Event> {
        self.event
    }

    fn update(&mut self, is_high: bool, now_ms: u32, timing: &Timing) -> Option<Event> {
        let active = match self.polarity {
            Polarity::ActiveLow => !is_high,
            Polarity::ActiveHigh => is_high,
        };
        let elapsed = now_ms.wrapping_sub(self.last_edge_ms);

        let event = if active {
            if !self.is_active {
                // First active sample: start the debounce window.
                self.is_active = true;
                self.last_edge_ms = now_ms;
                None
            } else {
                let fired = match self.state {
                    State::Released if elapsed > timing.debounce_ms => {
                        self.state = State::Pressed;
                        Some(Event::PressStart)
                    }
                    State::Pressed if elapsed > timing.hold_start_ms => {
                        self.state = State::Held;
                        Some(Event::HoldStart)
                    }
                    State::Held if elapsed > timing.hold_repeat_ms => Some(Event::HoldContinue),
                    _ => None,
                };
                if fired.is_some() {
                    self.last_edge_ms = now_ms;
                }
                fired
            }
        } else if self.is_active {
            self.is_active = false;
            let released = match self.state {
                State::Released => None,
                State::Pressed => Some(Event::PressEnd),
                State::Held => Some(Event::HoldEnd),
            };
            self.state = State::Released;
            released
        } else {
            None
        };

        self.event = event;
        event
    }
}

/// Polls a fixed set of button channels and reports debounced events.
pub struct InputEventDetector<const N: usize> {
    channels: [Channel; N],
    timing: Timing,
}

impl<const N: usize> InputEventDetector<N> {
    /// `channels` order is the poll priority order.
    pub const fn new(channels: [Channel; N], timing: Timing) -> Self {
        Self { channels, timing }
    }

    /// Run one poll tick. Returns the first channel (in priority order)
    /// that produced an event.
    pub fn poll<L: LevelSource>(&mut self, levels: &mut L, now_ms: u32) -> Option<(ButtonId, Event)> {
        for channel in self.channels.iter_mut() {
            channel.event = None;
        }

        for channel in self.channels.iter_mut() {
            let is_high = levels.is_high(channel.id);
            if let Some(event) = channel.update(is_high, now_ms, &self.timing) {
                #[cfg(feature = "defmt")]
                defmt::debug!("Button {}: {}", channel.id, event);
                return Some((channel.id, event));
            }
        }
        None
    }

    /// Current state of a button (`Released` if the id is not polled).
    pub fn state(&self, id: ButtonId) -> State {
        self.channel(id).map_or(State::Released, Channel::state)
    }

    /// Event a button produced on the last tick, if any.
    pub fn event(&self, id: ButtonId) -> Option<Event> {
        self.channel(id).and_then(Channel::event)
    }

    fn channel(&self, id: ButtonId) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }
}
