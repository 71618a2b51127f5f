use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Widget},
};

use super::game_state::GameStatus;
use super::stats::GameResult;
use super::tile::{Tile, TileState};
use super::word::{MAX_GUESSES, keyboard_states};
use super::wordle::{MessageKind, Wordle};

const TILE_WIDTH: u16 = 5;
const TILE_HEIGHT: u16 = 3;
const TILE_GAP_X: u16 = 2;
const TILE_GAP_Y: u16 = 1;
/// Widest bar of the distribution chart, in cells.
const BAR_CELLS: u32 = 30;

#[derive(Debug, PartialEq)]
pub enum InputState {
    EditingGuess,
    Submit,
    Restart,
    FetchDaily,
    ToggleMode,
    Quit,
    None,
}

impl Wordle {
    pub fn handle_input(&mut self, key: KeyEvent) -> InputState {
        if key.kind != KeyEventKind::Press {
            return InputState::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => InputState::Quit,
                KeyCode::Char('d') => InputState::FetchDaily,
                KeyCode::Char('l') => InputState::ToggleMode,
                KeyCode::Char('s') => {
                    self.show_stats = !self.show_stats;
                    InputState::None
                }
                _ => InputState::None,
            };
        }

        if self.show_stats {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.show_stats = false;
            }
            return InputState::None;
        }

        match key.code {
            KeyCode::Esc => InputState::Quit,
            KeyCode::Tab => InputState::Restart,
            KeyCode::Char('\'') if !self.game.is_over() => {
                self.cycle_last_accent();
                InputState::EditingGuess
            }
            KeyCode::Char(ch) if !self.game.is_over() => {
                self.type_letter(ch);
                InputState::EditingGuess
            }
            KeyCode::Backspace if !self.game.is_over() => {
                self.backspace();
                InputState::EditingGuess
            }
            KeyCode::Enter if !self.game.is_over() => InputState::Submit,
            _ => InputState::None,
        }
    }

    pub fn render_terminal(&self, frame: &mut Frame) {
        let [outer_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(60)])
            .margin(1)
            .areas(
                frame
                    .area()
                    .centered(Constraint::Length(60), Constraint::Length(42)),
            );

        let [inner_area] = Layout::vertical([Constraint::Fill(1)])
            .margin(1)
            .areas(outer_area);

        let [msg_area, top_area, bottom_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(2),
                Constraint::Length(27),
                Constraint::Length(7),
            ])
            .margin(1)
            .areas(inner_area);

        self.render_border(outer_area, frame.buffer_mut());
        if self.show_stats {
            self.render_stats_panel(inner_area, frame.buffer_mut());
        } else {
            self.render_system_message(msg_area, frame.buffer_mut());
            self.render_game_board(top_area, frame.buffer_mut());
            self.render_keyboard(bottom_area, frame.buffer_mut());
        }
    }

    fn render_border(&self, area: Rect, buf: &mut Buffer) {
        let instructions = Line::from(vec![
            " Submit ".into(),
            "<Enter>".blue().bold(),
            " New ".into(),
            "<Tab>".blue().bold(),
            " Daily ".into(),
            "<^D>".blue().bold(),
            " 5/7 ".into(),
            "<^L>".blue().bold(),
            " Stats ".into(),
            "<^S>".blue().bold(),
            " Quit ".into(),
            "<Esc>".blue().bold(),
        ]);

        let mut title = format!("Wordle ({} letters)", self.word_len());
        if self.is_daily {
            title.push_str(" - Word of the Day");
        }
        Block::bordered()
            .title(title)
            .title_bottom(instructions.right_aligned())
            .border_type(BorderType::Rounded)
            .render(area, buf);
    }

    fn render_system_message(&self, area: Rect, buf: &mut Buffer) {
        let mut lines = Vec::new();
        if let Some(message) = &self.message {
            let color = match message.kind {
                MessageKind::Info => Color::White,
                MessageKind::Error => Color::Red,
            };
            lines.push(Line::from(Span::styled(
                message.text.clone(),
                Style::default().fg(color),
            )));
        }

        let answer = self.game.target().unwrap_or_default();
        match self.game.status() {
            GameStatus::Won => lines.push(Line::from(vec![
                Span::raw("You won! The answer is: ").fg(Color::Green),
                Span::raw(answer).bold().fg(Color::White),
            ])),
            GameStatus::Lost => lines.push(Line::from(vec![
                Span::raw("You lost! The answer is: ").fg(Color::LightYellow),
                Span::raw(answer).bold().fg(Color::White),
            ])),
            GameStatus::NotStarted | GameStatus::InProgress => {
                if self.daily.is_pending() && self.message.is_none() {
                    lines.push(Line::from("Fetching Word of the Day...").fg(Color::Gray));
                }
            }
        }
        Paragraph::new(lines).render(area, buf);
    }

    fn render_game_board(&self, area: Rect, buf: &mut Buffer) {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .render(area, buf);
        let [game_board_area] = Layout::vertical([Constraint::Fill(1)])
            .margin(1)
            .areas(area);

        let center_x = (game_board_area.left() + game_board_area.right()) / 2;
        let base_y = game_board_area.y + 1;
        let word_len = self.game.word_len();
        let guesses = self.game.scored_guesses();

        for row in 0..MAX_GUESSES {
            for col in 0..word_len {
                let tile = match guesses.get(row) {
                    Some(word) => word.letters[col],
                    None if row == guesses.len() && !self.game.is_over() => self
                        .current_guess
                        .chars()
                        .nth(col)
                        .map(Tile::pending)
                        .unwrap_or_else(Tile::empty),
                    None => Tile::empty(),
                };
                let area = tile_area(center_x, base_y, word_len, row, col);
                tile.render(area.intersection(game_board_area), buf);
            }
        }
    }

    fn render_keyboard(&self, area: Rect, buf: &mut Buffer) {
        let qwerty = [
            "Q W E R T Y U I O P",
            " A S D F G H J K L ",
            "  Z X C V B N M    ",
        ];
        Block::bordered()
            .title_bottom(Line::from(" ' cycles accents ").right_aligned())
            .border_type(BorderType::Rounded)
            .render(area, buf);
        let [keyboard_area] = Layout::vertical([Constraint::Fill(1)])
            .margin(1)
            .areas(area);

        let used_chars = keyboard_states(&self.game.scored_guesses());
        let mut lines = Vec::new();
        for row in qwerty {
            let spans: Vec<Span> = row
                .chars()
                .map(|ch| {
                    if ch == ' ' {
                        Span::raw(" ")
                    } else {
                        let color = match used_chars.get(&ch) {
                            Some(TileState::Correct) => Color::Green,
                            Some(TileState::Present) => Color::Yellow,
                            Some(TileState::Absent) => Color::DarkGray,
                            _ => Color::Black,
                        };
                        Span::raw(format!(" {ch} ")).bg(color).bold()
                    }
                })
                .collect();
            lines.push(Line::from(spans));
            lines.push(Line::from(vec![]));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(keyboard_area, buf);
    }

    fn render_stats_panel(&self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let stats = self.stats.stats();

        let mut lines = vec![
            Line::from("Statistics").bold(),
            Line::from(vec![
                Span::raw(format!("Played {}   ", stats.games_played)),
                Span::raw(format!("Win % {}   ", stats.win_percentage())),
                Span::raw(format!("Streak {}   ", stats.current_streak)),
                Span::raw(format!("Max {}", stats.max_streak)),
            ]),
            Line::from(""),
            Line::from("Guess distribution").bold(),
        ];

        for row in stats.distribution_rows() {
            let cells = (row.width * BAR_CELLS / 100).max(1) as usize;
            let label = format!("{:>w$}", row.count, w = cells);
            let bar_color = if row.count > 0 {
                Color::Green
            } else {
                Color::DarkGray
            };
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", row.guesses)),
                Span::raw(label).bg(bar_color).bold(),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from("History").bold());
        let room = area.height.saturating_sub(lines.len() as u16 + 3) as usize;
        for entry in stats.recent_history().take(room) {
            let color = match entry.result {
                GameResult::Won => Color::Green,
                GameResult::Lost => Color::Red,
            };
            lines.push(Line::from(vec![
                Span::raw(format!("{:<12}", format_date(entry.timestamp))),
                Span::raw(format!("{:<9}", entry.word)),
                Span::raw(format!("{:<6}", result_label(entry.result))).fg(color),
                Span::raw(entry.attempts.to_string()),
            ]));
        }

        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title_bottom(Line::from(" Close <Esc> ").right_aligned())
                    .border_type(BorderType::Rounded),
            )
            .render(area, buf);
    }
}

fn tile_area(center_x: u16, base_y: u16, word_len: usize, row: usize, col: usize) -> Rect {
    let offset = col as i32 - (word_len as i32 / 2);
    let x = center_x as i32 - (TILE_WIDTH as i32 / 2) + offset * (TILE_WIDTH + TILE_GAP_X) as i32;
    let y = base_y as i32 + row as i32 * (TILE_HEIGHT + TILE_GAP_Y) as i32;

    Rect {
        x: x.max(0) as u16,
        y: y.max(0) as u16,
        width: TILE_WIDTH,
        height: TILE_HEIGHT,
    }
}

pub fn result_label(result: GameResult) -> &'static str {
    match result {
        GameResult::Won => "WON",
        GameResult::Lost => "LOST",
    }
}

/// Local date of a millisecond timestamp.
pub fn format_date(timestamp: i64) -> String {
    DateTime::from_timestamp_millis(timestamp)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
