//! Text output primitive used by the menu.
//!
//! The screen is a fixed grid of text lines: one large header line, the
//! menu rows, and a navigation line at the bottom. Positions are given in
//! characters for x and as a [`Line`] for y; the renderer implementation
//! maps them to pixels.
//!
//! ```text
//! y = 0   Header      (16 px, large font)
//! y = 16  Row 0       (8 px each, small font)
//! ...
//! y = 48  Row 4
//! y = 56  Navigation
//! ```

use heapless::String;

use crate::config::PAGE_ITEM_COUNT;

/// Height of the header line in pixels.
pub const HEADER_HEIGHT_PX: u8 = 16;

/// Height of a small-font line in pixels.
pub const ROW_HEIGHT_PX: u8 = 8;

/// Capacity of one rendered text line in bytes.
pub const LINE_CAPACITY: usize = 48;

/// Number of addressable lines (header + rows + navigation).
pub const LINE_COUNT: usize = PAGE_ITEM_COUNT + 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    Header,
    /// Menu row, `0..PAGE_ITEM_COUNT`.
    Row(u8),
    Navigation,
}

impl Line {
    /// Top edge of the line in pixels.
    pub fn y(&self) -> u8 {
        match self {
            Line::Header => 0,
            Line::Row(row) => HEADER_HEIGHT_PX.saturating_add(row.saturating_mul(ROW_HEIGHT_PX)),
            Line::Navigation => HEADER_HEIGHT_PX + PAGE_ITEM_COUNT as u8 * ROW_HEIGHT_PX,
        }
    }

    pub fn height(&self) -> u8 {
        match self {
            Line::Header => HEADER_HEIGHT_PX,
            _ => ROW_HEIGHT_PX,
        }
    }

    /// Sequential index, header first.
    pub fn index(&self) -> usize {
        match self {
            Line::Header => 0,
            Line::Row(row) if (*row as usize) < PAGE_ITEM_COUNT => 1 + *row as usize,
            // Rows past the page map outside the screen.
            Line::Row(_) => LINE_COUNT,
            Line::Navigation => LINE_COUNT - 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Style {
    #[default]
    Normal,
    Bold,
    Italic,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Size {
    #[default]
    Small,
    Large,
}

/// Draws text lines on the display.
pub trait TextRenderer {
    /// Print `text` at character column `x` of `line`. The text replaces
    /// whatever the covered area showed before.
    fn print(&mut self, x: u8, line: Line, text: &str, style: Style, size: Size);

    /// Push buffered output to the panel.
    fn flush(&mut self) {}
}

/// In-memory text screen.
///
/// Keeps the last text printed on every line together with its style.
/// Used for host simulation and tests.
#[derive(Clone, Debug, Default)]
pub struct TextScreen {
    lines: [String<LINE_CAPACITY>; LINE_COUNT],
    styles: [(Style, Size); LINE_COUNT],
    flushes: usize,
}

impl TextScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently shown on `line`.
    pub fn text(&self, line: Line) -> &str {
        self.lines
            .get(line.index())
            .map_or("", |text| text.as_str())
    }

    pub fn style(&self, line: Line) -> (Style, Size) {
        self.styles.get(line.index()).copied().unwrap_or_default()
    }

    /// Number of completed frames.
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl TextRenderer for TextScreen {
    fn print(&mut self, x: u8, line: Line, text: &str, style: Style, size: Size) {
        let index = line.index();
        if index >= LINE_COUNT {
            return;
        }
        let target = &mut self.lines[index];
        target.clear();
        for _ in 0..x {
            if target.push(' ').is_err() {
                break;
            }
        }
        for c in text.chars() {
            if target.push(c).is_err() {
                break;
            }
        }
        self.styles[index] = (style, size);
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_offsets_match_panel_layout() {
        assert_eq!(Line::Header.y(), 0);
        assert_eq!(Line::Row(0).y(), 16);
        assert_eq!(Line::Row(4).y(), 48);
        assert_eq!(Line::Navigation.y(), 56);
        assert_eq!(Line::Header.height(), 16);
        assert_eq!(Line::Row(2).height(), 8);
    }

    #[test]
    fn text_screen_replaces_line_contents() {
        let mut screen = TextScreen::new();
        screen.print(0, Line::Row(1), "first", Style::Normal, Size::Small);
        screen.print(2, Line::Row(1), "second", Style::Bold, Size::Small);
        assert_eq!(screen.text(Line::Row(1)), "  second");
        assert_eq!(screen.style(Line::Row(1)), (Style::Bold, Size::Small));
        assert_eq!(screen.text(Line::Row(0)), "");
    }

    #[test]
    fn text_screen_ignores_rows_past_the_page() {
        let mut screen = TextScreen::new();
        screen.print(0, Line::Row(9), "lost", Style::Normal, Size::Small);
        assert_eq!(screen.text(Line::Row(9)), "");
        assert_eq!(screen.text(Line::Navigation), "");
    }
}
