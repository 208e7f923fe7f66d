//! Unit tests for menu navigation and page rendering.
//!
//! These tests run on the host (not embedded) and drive the navigator
//! with a recording dispatcher and the in-memory text screen.

use super::*;
use crate::ui::render::TextScreen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Handler {
    Pick,
    Edit,
    Leave,
}

/// Records every dispatch and answers with a fixed verdict per handler.
struct Recorder {
    calls: std::vec::Vec<(Handler, ActionContext)>,
    pick: ActionState,
    edit: ActionState,
}

impl Recorder {
    fn new() -> Self {
        Self {
            calls: std::vec::Vec::new(),
            pick: ActionState::Inactive,
            edit: ActionState::Inactive,
        }
    }
}

impl Dispatch<Handler> for Recorder {
    fn dispatch(&mut self, handler: Handler, ctx: ActionContext) -> ActionState {
        self.calls.push((handler, ctx));
        match handler {
            Handler::Pick => self.pick,
            Handler::Edit => self.edit,
            Handler::Leave => ActionState::Inactive,
        }
    }
}

struct Names;

impl LabelSource for Names {
    fn slot_name(&self, slot: u8) -> &str {
        match slot {
            0 => "Garage",
            1 => "Gate",
            _ => "Slot ??",
        }
    }
}

const ITEM_LABELS: [&str; 10] = [
    "Item 0", "Item 1", "Item 2", "Item 3", "Item 4", "Item 5", "Item 6", "Item 7", "Item 8",
    "Item 9",
];

type Tree = MenuTree<Handler, 32>;

/// Root list of ten items; items 0 and 1 share the same two-entry child list.
fn build() -> (MenuNavigator<Handler, 32>, [NodeId; 10], [NodeId; 2]) {
    let mut tree = Tree::new();
    let mut items = [NodeId(0); 10];
    for (i, &label) in ITEM_LABELS.iter().enumerate() {
        items[i] = tree.add(Label::Text(label), NodeAction::None).unwrap();
    }
    tree.chain(&items);

    let garage = tree
        .add(Label::Slot(0), NodeAction::OnEnter(Handler::Pick, 0))
        .unwrap();
    let gate = tree
        .add(Label::Slot(1), NodeAction::OnEnter(Handler::Pick, 1))
        .unwrap();
    tree.chain(&[garage, gate]);
    tree.set_child(items[0], garage);
    tree.set_child(items[1], garage);

    let mut nav = MenuNavigator::new(tree);
    assert!(nav.show(items[0]));
    (nav, items, [garage, gate])
}

// ═══════════════════════════════════════════════════════════════════════════
// Tree construction
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn add_fails_when_arena_is_full() {
    let mut tree: MenuTree<Handler, 2> = MenuTree::new();
    assert!(tree.add(Label::Text("a"), NodeAction::None).is_ok());
    assert!(tree.add(Label::Text("b"), NodeAction::None).is_ok());
    assert_eq!(
        tree.add(Label::Text("c"), NodeAction::None),
        Err(Error::BufferOverflow)
    );
    assert_eq!(tree.len(), 2);
}

#[test]
fn chain_links_siblings_both_ways() {
    let (nav, items, _) = build();
    let tree = nav.tree();
    assert_eq!(tree.node(items[0]).unwrap().prev(), None);
    assert_eq!(tree.node(items[0]).unwrap().next(), Some(items[1]));
    assert_eq!(tree.node(items[5]).unwrap().prev(), Some(items[4]));
    assert_eq!(tree.node(items[9]).unwrap().next(), None);
}

#[test]
fn show_rejects_unknown_node() {
    let (mut nav, items, _) = build();
    assert!(!nav.show(NodeId(200)));
    assert_eq!(nav.current(), Some(items[0]));
}

// ═══════════════════════════════════════════════════════════════════════════
// Navigation
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn next_then_prev_returns_to_start() {
    let (mut nav, items, _) = build();
    let mut d = Recorder::new();
    nav.show(items[4]);

    assert_eq!(nav.process(NavAction::Next, &mut d), Some(items[5]));
    assert_eq!(nav.process(NavAction::Prev, &mut d), Some(items[4]));
    assert_eq!(nav.process(NavAction::Prev, &mut d), Some(items[3]));
    assert_eq!(nav.process(NavAction::Next, &mut d), Some(items[4]));
}

#[test]
fn moving_past_list_ends_is_ignored() {
    let (mut nav, items, _) = build();
    let mut d = Recorder::new();

    assert_eq!(nav.process(NavAction::Prev, &mut d), None);
    assert_eq!(nav.current(), Some(items[0]));

    nav.show(items[9]);
    assert_eq!(nav.process(NavAction::Next, &mut d), None);
    assert_eq!(nav.current(), Some(items[9]));
}

#[test]
fn enter_then_exit_restores_original_node() {
    let (mut nav, items, [garage, gate]) = build();
    let mut d = Recorder::new();
    nav.show(items[1]);

    assert_eq!(nav.process(NavAction::Enter, &mut d), Some(garage));
    assert_eq!(nav.process(NavAction::Next, &mut d), Some(gate));
    assert_eq!(nav.tree().node(gate).unwrap().parent(), Some(items[1]));
    assert_eq!(nav.process(NavAction::Exit, &mut d), Some(items[1]));
}

#[test]
fn shared_child_list_returns_along_latest_path() {
    let (mut nav, items, [garage, _]) = build();
    let mut d = Recorder::new();

    nav.process(NavAction::Enter, &mut d);
    assert_eq!(nav.process(NavAction::Exit, &mut d), Some(items[0]));

    nav.process(NavAction::Next, &mut d);
    assert_eq!(nav.process(NavAction::Enter, &mut d), Some(garage));
    assert_eq!(nav.tree().node(garage).unwrap().parent(), Some(items[1]));
    assert_eq!(nav.process(NavAction::Exit, &mut d), Some(items[1]));
}

#[test]
fn enter_without_child_or_handler_stays() {
    let (mut nav, items, _) = build();
    let mut d = Recorder::new();
    nav.show(items[7]);
    assert_eq!(nav.process(NavAction::Enter, &mut d), None);
    assert_eq!(nav.current(), Some(items[7]));
    assert!(d.calls.is_empty());
}

#[test]
fn exit_at_top_level_stays() {
    let (mut nav, items, _) = build();
    let mut d = Recorder::new();
    assert_eq!(nav.process(NavAction::Exit, &mut d), None);
    assert_eq!(nav.current(), Some(items[0]));
}

#[test]
fn enter_handler_receives_param_and_parent() {
    let (mut nav, items, [_, gate]) = build();
    let mut d = Recorder::new();
    nav.process(NavAction::Enter, &mut d);
    nav.process(NavAction::Next, &mut d);
    nav.process(NavAction::Enter, &mut d);

    assert_eq!(d.calls.len(), 1);
    let (handler, ctx) = d.calls[0];
    assert_eq!(handler, Handler::Pick);
    assert_eq!(ctx.trigger, Trigger::Enter);
    assert_eq!(ctx.param, 1);
    assert_eq!(ctx.node, gate);
    assert_eq!(ctx.parent, Some(items[0]));
    assert_eq!(ctx.parent_label, Some(Label::Text("Item 0")));
}

#[test]
fn active_handler_suppresses_descent() {
    let mut tree = Tree::new();
    let edit = tree
        .add(Label::Text("Edit"), NodeAction::Editable(Handler::Edit, 7))
        .unwrap();
    let inner = tree.add(Label::Text("Inner"), NodeAction::None).unwrap();
    tree.set_child(edit, inner);
    let mut nav = MenuNavigator::new(tree);
    nav.show(edit);

    let mut d = Recorder::new();
    d.edit = ActionState::Active;
    assert_eq!(nav.process(NavAction::Enter, &mut d), None);
    assert_eq!(nav.current(), Some(edit));

    d.edit = ActionState::Inactive;
    assert_eq!(nav.process(NavAction::Enter, &mut d), Some(inner));
}

#[test]
fn active_exit_handler_suppresses_ascent() {
    let mut tree = Tree::new();
    let top = tree.add(Label::Text("Top"), NodeAction::None).unwrap();
    let edit = tree
        .add(Label::Text("Edit"), NodeAction::Editable(Handler::Edit, 0))
        .unwrap();
    tree.set_child(top, edit);
    let mut nav = MenuNavigator::new(tree);
    nav.show(top);

    let mut d = Recorder::new();
    nav.process(NavAction::Enter, &mut d);
    d.edit = ActionState::Active;
    assert_eq!(nav.process(NavAction::Exit, &mut d), None);
    assert_eq!(d.calls.last().unwrap().1.trigger, Trigger::Exit);

    d.edit = ActionState::Inactive;
    assert_eq!(nav.process(NavAction::Exit, &mut d), Some(top));
}

#[test]
fn exit_handler_runs_only_on_exit() {
    let mut tree = Tree::new();
    let top = tree.add(Label::Text("Top"), NodeAction::None).unwrap();
    let leaf = tree
        .add(Label::Text("Leaf"), NodeAction::OnExit(Handler::Leave, 3))
        .unwrap();
    tree.set_child(top, leaf);
    let mut nav = MenuNavigator::new(tree);
    nav.show(top);

    let mut d = Recorder::new();
    nav.process(NavAction::Enter, &mut d);
    nav.process(NavAction::Enter, &mut d);
    assert!(d.calls.is_empty());

    assert_eq!(nav.process(NavAction::Exit, &mut d), Some(top));
    assert_eq!(d.calls.len(), 1);
    assert_eq!(d.calls[0].0, Handler::Leave);
    assert_eq!(d.calls[0].1.param, 3);
}

#[test]
fn process_without_current_node_does_nothing() {
    let mut tree = Tree::new();
    tree.add(Label::Text("Only"), NodeAction::None).unwrap();
    let mut nav = MenuNavigator::new(tree);
    let mut d = Recorder::new();
    assert_eq!(nav.process(NavAction::Next, &mut d), None);
    assert_eq!(nav.position(), None);
}

// ═══════════════════════════════════════════════════════════════════════════
// Position and rendering
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn position_counts_siblings_at_every_index() {
    let (mut nav, items, _) = build();
    for (i, id) in items.iter().enumerate() {
        nav.show(*id);
        assert_eq!(nav.position(), Some((i, 10)));
    }
}

#[test]
fn render_first_page_marks_current_row() {
    let (mut nav, items, _) = build();
    nav.show(items[2]);
    let mut screen = TextScreen::new();
    nav.render(&mut screen, &Names);

    assert_eq!(screen.text(Line::Header), "Pocket Key      ");
    assert_eq!(screen.style(Line::Header), (Style::Bold, Size::Large));
    assert_eq!(screen.text(Line::Row(0)), " Item 0              ");
    assert_eq!(screen.text(Line::Row(2)), ">Item 2              ");
    assert_eq!(screen.style(Line::Row(2)), (Style::Bold, Size::Small));
    assert_eq!(screen.style(Line::Row(3)), (Style::Normal, Size::Small));
    assert_eq!(screen.text(Line::Row(4)), " Item 4              ");
    assert_eq!(screen.text(Line::Navigation), " 3/10");
    assert_eq!(screen.flushes(), 1);
}

#[test]
fn render_second_page_starts_at_page_boundary() {
    let (mut nav, items, _) = build();
    nav.show(items[7]);
    let mut screen = TextScreen::new();
    nav.render(&mut screen, &Names);

    assert_eq!(screen.text(Line::Row(0)), " Item 5              ");
    assert_eq!(screen.text(Line::Row(2)), ">Item 7              ");
    assert_eq!(screen.text(Line::Row(4)), " Item 9              ");
    assert_eq!(screen.text(Line::Navigation), " 8/10");
}

#[test]
fn render_blanks_rows_after_last_sibling() {
    let (mut nav, _, [garage, gate]) = build();
    let mut d = Recorder::new();
    nav.process(NavAction::Enter, &mut d);
    assert_eq!(nav.current(), Some(garage));
    nav.process(NavAction::Next, &mut d);
    assert_eq!(nav.current(), Some(gate));

    let mut screen = TextScreen::new();
    nav.render(&mut screen, &Names);
    assert_eq!(screen.text(Line::Header), "Item 0          ");
    assert_eq!(screen.text(Line::Row(0)), " Garage              ");
    assert_eq!(screen.text(Line::Row(1)), ">Gate                ");
    assert_eq!(screen.text(Line::Row(2)), "                     ");
    assert_eq!(screen.text(Line::Row(4)), "                     ");
    assert_eq!(screen.text(Line::Navigation), " 2/2 ");
}

#[test]
fn render_clips_long_labels() {
    let mut tree = Tree::new();
    let long = tree
        .add(
            Label::Text("A label that is far too long for one row"),
            NodeAction::None,
        )
        .unwrap();
    let mut nav = MenuNavigator::new(tree);
    nav.show(long);
    let mut screen = TextScreen::new();
    nav.render(&mut screen, &Names);
    assert_eq!(screen.text(Line::Row(0)), ">A label that is far ");
    assert_eq!(screen.text(Line::Navigation), " 1/1 ");
}

#[test]
fn render_without_current_node_draws_nothing() {
    let nav: MenuNavigator<Handler, 4> = MenuNavigator::new(MenuTree::new());
    let mut screen = TextScreen::new();
    nav.render(&mut screen, &Names);
    assert_eq!(screen.flushes(), 0);
}
