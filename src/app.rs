//! Device controller: buttons in, menu moves and slot operations out.
//!
//! The controller owns the input detector, the menu navigator and the slot
//! store. The main loop feeds it the clock and raw pin levels; everything
//! that needs the radio comes back as a [`Request`].
//!
//! Menu layout:
//!
//! ```text
//! Send ─┐
//! Record┼─> Slot 01 .. Slot 20 ─> Reset slot
//! Slots ┘
//! Settings ─> Erase all
//! ```
//!
//! The slot list is one sibling list shared by Send, Record and Slots. The
//! slot handler looks at the node the user came from to decide what Enter
//! means there.

use crate::config::{MENU_NODE_COUNT_MAX, SLOT_COUNT};
use crate::error::Error;
use crate::signal::Signal;
use crate::storage::{PersistentBytes, SlotStore};
use crate::ui::input::{ButtonId, Channel, Event, InputEventDetector, LevelSource, Polarity, Timing};
use crate::ui::menu::{
    ActionContext, ActionState, Dispatch, Label, MenuNavigator, MenuTree, NavAction, NodeAction,
    NodeId, Trigger,
};
use crate::ui::render::{Line, Size, Style, TextRenderer};

/// Shown on the navigation line while "Erase all" waits for confirmation.
pub const ERASE_PROMPT: &str = "Right: erase all";

/// Node handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// A slot was picked; the parameter is the slot index.
    PickSlot,
    /// Reset the slot the options menu was entered from.
    ResetSlot,
    EraseAll,
}

/// Work for the RF collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    Transmit { slot: u8, signal: Signal },
    Capture { slot: u8 },
}

/// Map a button event to a menu action. Up and Down auto-repeat while held.
pub fn nav_action(button: ButtonId, event: Event) -> Option<NavAction> {
    match (button, event) {
        (ButtonId::Up, Event::PressStart | Event::HoldContinue) => Some(NavAction::Prev),
        (ButtonId::Down, Event::PressStart | Event::HoldContinue) => Some(NavAction::Next),
        (ButtonId::Right, Event::PressStart) => Some(NavAction::Enter),
        (ButtonId::Left, Event::PressStart) => Some(NavAction::Exit),
        _ => None,
    }
}

/// Nodes the handlers need to recognise.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub send: NodeId,
    pub record: NodeId,
    pub slots: NodeId,
    pub settings: NodeId,
    pub first_slot: NodeId,
    pub reset: NodeId,
    pub erase: NodeId,
}

pub type Menu = MenuTree<Command, MENU_NODE_COUNT_MAX>;

/// Build the device menu.
pub fn build_menu() -> Result<(Menu, Layout), Error> {
    let mut tree = Menu::new();

    let send = tree.add(Label::Text("Send"), NodeAction::None)?;
    let record = tree.add(Label::Text("Record"), NodeAction::None)?;
    let slots = tree.add(Label::Text("Slots"), NodeAction::None)?;
    let settings = tree.add(Label::Text("Settings"), NodeAction::None)?;
    tree.chain(&[send, record, slots, settings]);

    let mut slot_nodes = [send; SLOT_COUNT];
    for (index, node) in slot_nodes.iter_mut().enumerate() {
        *node = tree.add(
            Label::Slot(index as u8),
            NodeAction::OnEnter(Command::PickSlot, index as i32),
        )?;
    }
    tree.chain(&slot_nodes);
    let first_slot = slot_nodes[0];
    tree.set_child(send, first_slot);
    tree.set_child(record, first_slot);
    tree.set_child(slots, first_slot);

    let reset = tree.add(Label::Text("Reset slot"), NodeAction::OnEnter(Command::ResetSlot, 0))?;
    for &node in slot_nodes.iter() {
        tree.set_child(node, reset);
    }

    let erase = tree.add(Label::Text("Erase all"), NodeAction::Editable(Command::EraseAll, 0))?;
    tree.set_child(settings, erase);

    Ok((
        tree,
        Layout {
            send,
            record,
            slots,
            settings,
            first_slot,
            reset,
            erase,
        },
    ))
}

/// Handler side of one navigation action.
struct Handlers<'a, P> {
    store: &'a mut SlotStore<P>,
    layout: &'a Layout,
    erase_armed: &'a mut bool,
    request: Option<Request>,
    refresh: bool,
}

impl<P: PersistentBytes> Handlers<'_, P> {
    fn pick_slot(&mut self, ctx: ActionContext) -> ActionState {
        let slot = ctx.param as u8;
        if ctx.parent == Some(self.layout.send) {
            let signal = self.store.get_signal(slot as usize);
            if !signal.is_valid() {
                #[cfg(feature = "defmt")]
                defmt::info!("Slot {}: empty, nothing to send", slot);
            } else if !signal.has_known_protocol() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Slot {}: unknown protocol {}", slot, signal.protocol);
            } else {
                self.request = Some(Request::Transmit { slot, signal });
            }
            ActionState::Active
        } else if ctx.parent == Some(self.layout.record) {
            self.request = Some(Request::Capture { slot });
            ActionState::Active
        } else {
            ActionState::Inactive
        }
    }

    fn reset_slot(&mut self, ctx: ActionContext) -> ActionState {
        let Some(Label::Slot(slot)) = ctx.parent_label else {
            return ActionState::Inactive;
        };
        #[cfg(feature = "defmt")]
        defmt::info!("Slot {}: reset", slot);
        self.store.reset(slot as usize);
        self.refresh = true;
        ActionState::Active
    }

    fn erase_all(&mut self, trigger: Trigger) -> ActionState {
        match (trigger, *self.erase_armed) {
            (Trigger::Enter, false) => {
                *self.erase_armed = true;
                self.refresh = true;
                ActionState::Active
            }
            (Trigger::Enter, true) => {
                *self.erase_armed = false;
                if let Err(_e) = self.store.erase_all() {
                    #[cfg(feature = "defmt")]
                    defmt::error!("Erase failed: {}", _e);
                }
                self.store.load();
                self.refresh = true;
                ActionState::Active
            }
            (Trigger::Exit, true) => {
                *self.erase_armed = false;
                self.refresh = true;
                ActionState::Active
            }
            (Trigger::Exit, false) => ActionState::Inactive,
        }
    }
}

impl<P: PersistentBytes> Dispatch<Command> for Handlers<'_, P> {
    fn dispatch(&mut self, handler: Command, ctx: ActionContext) -> ActionState {
        match handler {
            Command::PickSlot => self.pick_slot(ctx),
            Command::ResetSlot => self.reset_slot(ctx),
            Command::EraseAll => self.erase_all(ctx.trigger),
        }
    }
}

/// Four-button device controller.
pub struct Controller<P> {
    detector: InputEventDetector<4>,
    navigator: MenuNavigator<Command, MENU_NODE_COUNT_MAX>,
    layout: Layout,
    store: SlotStore<P>,
    erase_armed: bool,
}

impl<P: PersistentBytes> Controller<P> {
    /// Controller with active-low buttons and the default timing.
    pub fn new(bytes: P) -> Result<Self, Error> {
        Self::with_timing(bytes, Timing::default())
    }

    pub fn with_timing(bytes: P, timing: Timing) -> Result<Self, Error> {
        let (tree, layout) = build_menu()?;
        let channels = ButtonId::ALL.map(|id| Channel::new(id, Polarity::ActiveLow));
        Ok(Self {
            detector: InputEventDetector::new(channels, timing),
            navigator: MenuNavigator::new(tree),
            layout,
            store: SlotStore::new(bytes),
            erase_armed: false,
        })
    }

    /// Load the slots and show the root menu. Returns the filled slot count.
    pub fn start<R: TextRenderer>(&mut self, out: &mut R) -> usize {
        let filled = self.store.load();
        self.navigator.show(self.layout.send);
        self.render(out);
        filled
    }

    /// One poll cycle: sample the buttons, apply the resulting menu action
    /// and redraw if anything changed.
    pub fn tick<L, R>(&mut self, now_ms: u32, levels: &mut L, out: &mut R) -> Option<Request>
    where
        L: LevelSource,
        R: TextRenderer,
    {
        let (button, event) = self.detector.poll(levels, now_ms)?;
        let action = nav_action(button, event)?;
        self.navigate(action, out)
    }

    /// Apply a menu action directly.
    pub fn navigate<R: TextRenderer>(&mut self, action: NavAction, out: &mut R) -> Option<Request> {
        let mut handlers = Handlers {
            store: &mut self.store,
            layout: &self.layout,
            erase_armed: &mut self.erase_armed,
            request: None,
            refresh: false,
        };
        let moved = self.navigator.process(action, &mut handlers);
        let Handlers {
            request, refresh, ..
        } = handlers;

        if moved.is_some() {
            self.erase_armed = false;
        }
        if moved.is_some() || refresh {
            self.render(out);
        }

        if let Some(_request) = request {
            #[cfg(feature = "defmt")]
            defmt::info!("Request: {}", _request);
        }
        request
    }

    /// Store a signal captured for `slot` and redraw.
    pub fn capture_complete<R: TextRenderer>(&mut self, slot: u8, signal: Signal, out: &mut R) {
        self.store.set_signal(slot as usize, signal);
        self.render(out);
    }

    pub fn render<R: TextRenderer>(&self, out: &mut R) {
        self.navigator.render(out, &self.store);
        if self.erase_armed {
            out.print(0, Line::Navigation, ERASE_PROMPT, Style::Italic, Size::Small);
            out.flush();
        }
    }

    pub fn is_erase_armed(&self) -> bool {
        self.erase_armed
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn navigator(&self) -> &MenuNavigator<Command, MENU_NODE_COUNT_MAX> {
        &self.navigator
    }

    pub fn store(&self) -> &SlotStore<P> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SlotStore<P> {
        &mut self.store
    }
}
