use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Stylize},
    widgets::{Block, Paragraph, Widget},
};

/// Mark of a single letter. Variants are ordered by priority, the smaller
/// the value the stronger the information (used when colouring keys).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum TileState {
    Correct,
    Present,
    Absent,
    Unused,
    /// Letter typed into the active row but not submitted yet.
    Pending,
}

impl TileState {
    pub fn get_color(&self) -> Color {
        match self {
            TileState::Correct => Color::Green,
            TileState::Present => Color::Yellow,
            TileState::Absent => Color::DarkGray,
            TileState::Unused => Color::Rgb(65, 65, 65), // very dark gray
            TileState::Pending => Color::Rgb(90, 90, 110),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub letter: char,
    pub state: TileState,
}

impl Tile {
    pub fn empty() -> Self {
        Tile {
            letter: ' ',
            state: TileState::Unused,
        }
    }

    pub fn pending(letter: char) -> Self {
        Tile {
            letter,
            state: TileState::Pending,
        }
    }
}

impl Widget for Tile {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::new().bg(self.state.get_color()).render(area, buf);
        Paragraph::new(format!("{}", self.letter)).bold().render(
            area.centered(Constraint::Length(1), Constraint::Length(1)),
            buf,
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn priority_order_test() {
        assert!(TileState::Correct < TileState::Present);
        assert!(TileState::Present < TileState::Absent);
        assert!(TileState::Absent < TileState::Unused);
    }

    #[test]
    fn render_letter_test() {
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        Tile {
            letter: 'Q',
            state: TileState::Correct,
        }
        .render(area, &mut buf);

        assert_eq!(buf[(2, 1)].symbol(), "Q");
        assert_eq!(buf[(0, 0)].bg, Color::Green);
    }
}
