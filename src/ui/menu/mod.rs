//! Hierarchical menu navigation.
//!
//! The menu is a static tree stored in an arena ([`MenuTree`]). Siblings
//! are doubly linked through `prev`/`next`, and each node may point at the
//! first node of a child list. Links are fixed once the tree is built.
//!
//! The only mutable link is `parent`: it is written every time the
//! navigator moves onto a node and always names the node the user came
//! from. A child list can therefore be shared by several parents and
//! `Exit` still returns along the path that was actually taken.
//!
//! Node actions are a closed set of tagged variants ([`NodeAction`]) over
//! an application-defined handler type `H`, dispatched through [`Dispatch`].

#[cfg(test)]
mod tests;

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{HEADER_LENGTH_MAX, PAGE_ITEM_COUNT, ROOT_HEADER, ROW_LENGTH_MAX};
use crate::error::Error;
use crate::ui::render::{Line, Size, Style, TextRenderer, LINE_CAPACITY};

/// Stable index of a node inside its [`MenuTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId(u8);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Navigation requests produced from button events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavAction {
    Prev,
    Next,
    Enter,
    Exit,
}

/// Which navigation action invoked a node handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    Enter,
    Exit,
}

/// Handler verdict. `Active` consumes the action and suppresses the
/// default tree navigation for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionState {
    Active,
    Inactive,
}

/// Node display text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Label {
    Text(&'static str),
    /// Name of a signal slot, looked up when the node is drawn.
    Slot(u8),
}

impl Label {
    pub fn resolve<'a, L: LabelSource + ?Sized>(&self, labels: &'a L) -> &'a str {
        match *self {
            Label::Text(text) => text,
            Label::Slot(slot) => labels.slot_name(slot),
        }
    }
}

/// Supplies the text of dynamic labels.
pub trait LabelSource {
    fn slot_name(&self, slot: u8) -> &str;
}

/// Per-node action, each carrying a handler tag and an integer parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeAction<H> {
    None,
    /// Called on `Enter`.
    OnEnter(H, i32),
    /// Called on `Exit`.
    OnExit(H, i32),
    /// In-place editable value: called on both `Enter` and `Exit`.
    Editable(H, i32),
}

impl<H: Copy> NodeAction<H> {
    fn handler_for(&self, trigger: Trigger) -> Option<(H, i32)> {
        match (*self, trigger) {
            (NodeAction::OnEnter(h, p), Trigger::Enter)
            | (NodeAction::OnExit(h, p), Trigger::Exit)
            | (NodeAction::Editable(h, p), _) => Some((h, p)),
            _ => None,
        }
    }
}

/// What a handler gets to know about the invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionContext {
    pub trigger: Trigger,
    pub param: i32,
    pub node: NodeId,
    /// The node the user reached `node` from, if any.
    pub parent: Option<NodeId>,
    pub parent_label: Option<Label>,
}

/// Runs node handlers.
pub trait Dispatch<H> {
    fn dispatch(&mut self, handler: H, ctx: ActionContext) -> ActionState;
}

/// One entry of the menu tree.
#[derive(Clone, Copy, Debug)]
pub struct MenuNode<H> {
    label: Label,
    action: NodeAction<H>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    child: Option<NodeId>,
    parent: Option<NodeId>,
}

impl<H> MenuNode<H> {
    pub fn label(&self) -> Label {
        self.label
    }

    pub fn action(&self) -> &NodeAction<H> {
        &self.action
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub fn child(&self) -> Option<NodeId> {
        self.child
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Fixed-capacity node arena.
pub struct MenuTree<H, const N: usize> {
    nodes: Vec<MenuNode<H>, N>,
}

impl<H: Copy, const N: usize> MenuTree<H, N> {
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append an unlinked node.
    pub fn add(&mut self, label: Label, action: NodeAction<H>) -> Result<NodeId, Error> {
        let index = u8::try_from(self.nodes.len()).map_err(|_| Error::BufferOverflow)?;
        self.nodes
            .push(MenuNode {
                label,
                action,
                prev: None,
                next: None,
                child: None,
                parent: None,
            })
            .map_err(|_| Error::BufferOverflow)?;
        Ok(NodeId(index))
    }

    /// Link `ids` into one sibling list, in order.
    pub fn chain(&mut self, ids: &[NodeId]) {
        for pair in ids.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if self.node(a).is_none() || self.node(b).is_none() || a == b {
                continue;
            }
            self.nodes[a.index()].next = Some(b);
            self.nodes[b.index()].prev = Some(a);
        }
    }

    /// Make `child` the first entry `Enter` descends to from `parent`.
    pub fn set_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(child).is_some() {
            if let Some(node) = self.nodes.get_mut(parent.index()) {
                node.child = Some(child);
            }
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&MenuNode<H>> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.parent = parent;
        }
    }

    /// Walk `prev` (or `next`) links from `id`, counting steps. Bounded by
    /// the arena size so a malformed chain cannot loop forever.
    fn count_links(&self, id: NodeId, backwards: bool) -> usize {
        let step = |node: &MenuNode<H>| if backwards { node.prev } else { node.next };
        let mut count = 0;
        let mut cursor = self.node(id).and_then(step);
        while let Some(next) = cursor {
            if count >= self.nodes.len() {
                break;
            }
            count += 1;
            cursor = self.node(next).and_then(step);
        }
        count
    }
}

impl<H: Copy, const N: usize> Default for MenuTree<H, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks the current node and turns navigation actions into moves.
pub struct MenuNavigator<H, const N: usize> {
    tree: MenuTree<H, N>,
    current: Option<NodeId>,
}

impl<H: Copy, const N: usize> MenuNavigator<H, N> {
    pub fn new(tree: MenuTree<H, N>) -> Self {
        Self {
            tree,
            current: None,
        }
    }

    pub fn tree(&self) -> &MenuTree<H, N> {
        &self.tree
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Make `id` the current node without touching any links.
    pub fn show(&mut self, id: NodeId) -> bool {
        if self.tree.node(id).is_none() {
            return false;
        }
        self.current = Some(id);
        true
    }

    /// Apply one navigation action. Returns the new current node if it changed.
    pub fn process<D: Dispatch<H>>(
        &mut self,
        action: NavAction,
        dispatcher: &mut D,
    ) -> Option<NodeId> {
        let current = self.current?;
        let node = *self.tree.node(current)?;

        let target = match action {
            NavAction::Prev => self.step(node.prev, node.parent),
            NavAction::Next => self.step(node.next, node.parent),
            NavAction::Enter => match self.invoke(current, &node, Trigger::Enter, dispatcher) {
                ActionState::Active => None,
                ActionState::Inactive => self.step(node.child, Some(current)),
            },
            NavAction::Exit => match self.invoke(current, &node, Trigger::Exit, dispatcher) {
                ActionState::Active => None,
                ActionState::Inactive => node.parent,
            },
        };

        match target {
            Some(id) if id != current => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Menu: {} {} -> {}", action, current, id);
                self.current = Some(id);
                Some(id)
            }
            _ => None,
        }
    }

    /// Zero-based index of the current node among its siblings, and the
    /// sibling count.
    pub fn position(&self) -> Option<(usize, usize)> {
        let current = self.current?;
        let before = self.tree.count_links(current, true);
        let after = self.tree.count_links(current, false);
        Some((before, before + 1 + after))
    }

    /// Draw the current page: parent header, up to `PAGE_ITEM_COUNT`
    /// sibling rows with the current one marked, and the position line.
    pub fn render<R, L>(&self, out: &mut R, labels: &L)
    where
        R: TextRenderer,
        L: LabelSource + ?Sized,
    {
        let Some(current) = self.current else {
            return;
        };
        let Some(node) = self.tree.node(current) else {
            return;
        };
        let Some((index, total)) = self.position() else {
            return;
        };

        let header = node
            .parent
            .and_then(|id| self.tree.node(id))
            .map_or(ROOT_HEADER, |parent| parent.label.resolve(labels));

        let mut line: String<LINE_CAPACITY> = String::new();
        fill_padded(&mut line, "", header, HEADER_LENGTH_MAX);
        out.print(0, Line::Header, &line, Style::Bold, Size::Large);

        // First sibling shown on the current page.
        let mut first = current;
        for _ in 0..index % PAGE_ITEM_COUNT {
            match self.tree.node(first).and_then(|n| n.prev) {
                Some(prev) => first = prev,
                None => break,
            }
        }

        let mut cursor = Some(first);
        for row in 0..PAGE_ITEM_COUNT {
            let entry = cursor.and_then(|id| self.tree.node(id).map(|n| (id, n)));
            match entry {
                Some((id, entry)) => {
                    let selected = id == current;
                    let (marker, style) = if selected {
                        (">", Style::Bold)
                    } else {
                        (" ", Style::Normal)
                    };
                    fill_padded(&mut line, marker, entry.label.resolve(labels), ROW_LENGTH_MAX);
                    out.print(0, Line::Row(row as u8), &line, style, Size::Small);
                    cursor = entry.next;
                }
                None => {
                    fill_padded(&mut line, " ", "", ROW_LENGTH_MAX);
                    out.print(0, Line::Row(row as u8), &line, Style::Normal, Size::Small);
                }
            }
        }

        line.clear();
        let _ = write!(line, "{:>2}/{:<2}", index + 1, total);
        out.print(0, Line::Navigation, &line, Style::Normal, Size::Small);

        out.flush();
    }

    fn step(&mut self, target: Option<NodeId>, parent: Option<NodeId>) -> Option<NodeId> {
        let target = target?;
        self.tree.set_parent(target, parent);
        Some(target)
    }

    fn invoke<D: Dispatch<H>>(
        &self,
        id: NodeId,
        node: &MenuNode<H>,
        trigger: Trigger,
        dispatcher: &mut D,
    ) -> ActionState {
        let Some((handler, param)) = node.action.handler_for(trigger) else {
            return ActionState::Inactive;
        };
        let ctx = ActionContext {
            trigger,
            param,
            node: id,
            parent: node.parent,
            parent_label: node.parent.and_then(|p| self.tree.node(p)).map(|p| p.label),
        };
        dispatcher.dispatch(handler, ctx)
    }
}

/// Replace `line` with `prefix` followed by `text` clipped or space-padded
/// to exactly `width` characters.
fn fill_padded(line: &mut String<LINE_CAPACITY>, prefix: &str, text: &str, width: usize) {
    line.clear();
    let _ = line.push_str(prefix);
    let mut used = 0;
    for c in text.chars().take(width) {
        if line.push(c).is_err() {
            break;
        }
        used += 1;
    }
    for _ in used..width {
        if line.push(' ').is_err() {
            break;
        }
    }
}
