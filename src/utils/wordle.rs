use anyhow::Result;
use chrono::Utc;
use crossterm::event;
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

use super::daily::{DailyFetcher, FetchError, fetch_word_of_the_day};
use super::game_state::{GameState, GameStatus, Rejection, Snapshot};
use super::settings::Settings;
use super::stats::StatsStore;
use super::storage::{KeyValueStore, load_json, save_json};
use super::ui::InputState;
use super::word::{cycle_accent, is_valid_letter};
use super::word_list::{WordList, WordLists, WordMode};

pub const STATE_KEY: &str = "wordleState";
const MESSAGE_TTL: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MessageKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
    shown_at: Instant,
}

impl Message {
    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() > MESSAGE_TTL
    }
}

/// The game session. Owns the active game, stats, settings and everything
/// the screen is drawn from.
pub struct Wordle {
    word_lists: WordLists,
    state_store: Box<dyn KeyValueStore>,
    pub settings: Settings,
    pub game: GameState,
    pub stats: StatsStore,
    pub current_guess: String,
    pub message: Option<Message>,
    pub daily: DailyFetcher,

    /* control flow flags */
    pub is_daily: bool,
    pub show_stats: bool,
}

impl Wordle {
    /// Builds the session and resumes the saved game when it is still valid.
    /// `state_store` holds the game snapshot and settings, `stats_store` the
    /// stats.
    pub fn new(
        word_lists: WordLists,
        state_store: Box<dyn KeyValueStore>,
        stats_store: Box<dyn KeyValueStore>,
        mode: Option<WordMode>,
    ) -> Self {
        let mut settings = Settings::load(state_store.as_ref());
        if let Some(mode) = mode {
            settings.word_mode = mode;
        }

        let mut wordle = Wordle {
            word_lists,
            state_store,
            settings,
            game: GameState::new(),
            stats: StatsStore::load(stats_store),
            current_guess: String::new(),
            message: None,
            daily: DailyFetcher::new(),
            is_daily: false,
            show_stats: false,
        };
        wordle.save_settings();
        wordle.init_game();
        wordle
    }

    pub fn mode(&self) -> WordMode {
        self.settings.word_mode
    }

    pub fn word_list(&self) -> &WordList {
        self.word_lists.get(self.mode())
    }

    pub fn word_len(&self) -> usize {
        self.mode().word_len()
    }

    fn init_game(&mut self) {
        match load_json::<Snapshot>(self.state_store.as_ref(), STATE_KEY) {
            Ok(Some(snapshot)) => match GameState::resume(&snapshot, self.word_list()) {
                Some(game) => {
                    info!("restored saved game with {} guesses", game.attempts());
                    self.game = game;
                    self.is_daily = snapshot.is_daily;
                    if self.game.is_over() && !snapshot.stats_recorded {
                        info!("saved game finished without stats, recording it now");
                        if self.record_stats() {
                            self.save_state(true);
                        }
                    }
                }
                None => {
                    info!("saved game is no longer valid, starting new game");
                    self.discard_saved_game();
                    self.start_new_game();
                }
            },
            Ok(None) => {
                info!("no saved game, starting new game");
                self.start_new_game();
            }
            Err(e) => {
                warn!("{e:#}, starting new game");
                self.discard_saved_game();
                self.start_new_game();
            }
        }

        if self.game.target().is_none() {
            error!("target word is missing after init");
            self.start_new_game();
        }
    }

    fn discard_saved_game(&mut self) {
        if let Err(e) = self.state_store.remove(STATE_KEY) {
            warn!("failed to discard saved game: {e:#}");
        }
    }

    pub fn start_new_game(&mut self) {
        match self.word_list().draw_word() {
            Some(word) => self.start_game(&word),
            None => error!("{} word list is empty", self.mode()),
        }
    }

    /// Replaces the current game with a fresh one for `word`. Pending word of
    /// the day requests become stale.
    pub fn start_game(&mut self, word: &str) {
        self.begin_game(word, false);
    }

    fn begin_game(&mut self, word: &str, is_daily: bool) {
        self.daily.invalidate();
        self.game.start(word);
        self.is_daily = is_daily;
        self.current_guess.clear();
        self.message = None;
        self.save_state(true);
        debug!("new target word: {word}");
    }

    fn start_daily_game(&mut self, word: &str) {
        if self.mode() != WordMode::Classic {
            self.settings.word_mode = WordMode::Classic;
            self.save_settings();
        }
        self.begin_game(word, true);
        self.set_message("Playing Word of the Day!", MessageKind::Info);
    }

    pub fn toggle_mode(&mut self) {
        self.settings.word_mode = self.mode().toggled();
        self.save_settings();
        info!("switched to {} mode", self.mode());
        self.start_new_game();
    }

    pub fn request_daily(&mut self) {
        self.set_message("Fetching Word of the Day...", MessageKind::Info);
        self.daily.request(fetch_word_of_the_day);
    }

    /// Applies a finished word of the day request, if any.
    pub fn poll_daily(&mut self) {
        if let Some(outcome) = self.daily.poll() {
            self.apply_daily(outcome);
        }
    }

    fn apply_daily(&mut self, outcome: Result<String, FetchError>) {
        match outcome {
            Ok(word) => self.start_daily_game(&word),
            Err(e) => {
                warn!("word of the day failed: {e}");
                self.set_message(&format!("Error: {e}"), MessageKind::Error);
            }
        }
    }

    pub fn type_letter(&mut self, ch: char) {
        if self.game.is_over() {
            return;
        }
        let Some(letter) = ch.to_uppercase().next() else {
            return;
        };
        if is_valid_letter(letter) && self.current_guess.chars().count() < self.word_len() {
            self.current_guess.push(letter);
        }
    }

    pub fn backspace(&mut self) {
        if !self.game.is_over() {
            self.current_guess.pop();
        }
    }

    pub fn cycle_last_accent(&mut self) {
        if let Some(last) = self.current_guess.pop() {
            self.current_guess.push(cycle_accent(last));
        }
    }

    /// Submits the typed guess. Rejections leave the game untouched and are
    /// shown as a transient message.
    pub fn submit(&mut self) -> Result<(), Rejection> {
        let result = self.check_and_submit();
        if let Err(rejection) = result {
            self.set_message(&rejection.to_string(), MessageKind::Error);
        }
        result
    }

    fn check_and_submit(&mut self) -> Result<(), Rejection> {
        if self.game.status() != GameStatus::InProgress {
            return Err(Rejection::NotInProgress);
        }

        let guess = self.current_guess.clone();
        let expected = self.game.word_len();
        let actual = guess.chars().count();
        if actual != expected {
            return Err(Rejection::WrongLength { expected, actual });
        }

        // the word of the day may be missing from the local list
        if !self.word_list().contains(&guess) && self.game.target() != Some(guess.as_str()) {
            return Err(Rejection::NotInWordList);
        }

        self.game.submit_guess(&guess)?;
        self.current_guess.clear();
        self.message = None;

        if self.game.is_over() {
            self.finish_game();
        } else {
            self.save_state(true);
        }
        Ok(())
    }

    fn finish_game(&mut self) {
        self.save_state(false);
        if self.record_stats() {
            self.save_state(true);
        }
        match self.game.status() {
            GameStatus::Won => self.set_message("Splendid!", MessageKind::Info),
            _ => {
                let target = self.game.target().unwrap_or_default().to_string();
                self.set_message(&target, MessageKind::Info);
            }
        }
    }

    fn record_stats(&mut self) -> bool {
        let Some(target) = self.game.target().map(str::to_string) else {
            return false;
        };
        let won = self.game.status() == GameStatus::Won;
        let attempts = self.game.attempts() as u8;
        match self.stats.record_result(&target, won, attempts) {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to update stats: {e:#}");
                self.set_message("Could not save stats", MessageKind::Error);
                false
            }
        }
    }

    fn save_state(&mut self, stats_recorded: bool) {
        let mut snapshot = self.game.snapshot(Utc::now().timestamp_millis());
        snapshot.stats_recorded = stats_recorded;
        snapshot.is_daily = self.is_daily;
        if let Err(e) = save_json(self.state_store.as_mut(), STATE_KEY, &snapshot) {
            warn!("failed to save game: {e:#}");
            self.set_message("Could not save game", MessageKind::Error);
        }
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.settings.save(self.state_store.as_mut()) {
            warn!("failed to save settings: {e:#}");
        }
    }

    pub fn set_message(&mut self, text: &str, kind: MessageKind) {
        self.message = Some(Message {
            text: text.to_string(),
            kind,
            shown_at: Instant::now(),
        });
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();

        let result: Result<()> = loop {
            self.poll_daily();
            if self.message.as_ref().is_some_and(Message::is_expired) {
                self.message = None;
            }

            // render terminal output
            if let Err(e) = terminal.draw(|frame| {
                self.render_terminal(frame);
            }) {
                break Err(e.into());
            }

            let key = match event::poll(POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(event::Event::Key(key)) => key,
                    Ok(_) => continue,
                    Err(e) => break Err(e.into()),
                },
                Ok(false) => continue,
                Err(e) => break Err(e.into()),
            };

            match self.handle_input(key) {
                InputState::Submit => {
                    let _ = self.submit();
                }
                InputState::Restart => self.start_new_game(),
                InputState::FetchDaily => self.request_daily(),
                InputState::ToggleMode => self.toggle_mode(),
                InputState::Quit => break Ok(()),
                InputState::EditingGuess | InputState::None => {}
            }
        };
        ratatui::restore();

        result
    }
}
