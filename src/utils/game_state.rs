use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::tile::TileState;
use super::word::{MAX_GUESSES, Word, evaluate};
use super::word_list::WordList;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

/// Why a guess was refused. None of these change the game.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Rejection {
    NotInProgress,
    WrongLength { expected: usize, actual: usize },
    NotInWordList,
    AlreadyGuessed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejection::NotInProgress => write!(f, "Game is over"),
            Rejection::WrongLength { expected, actual } if actual < expected => {
                write!(f, "Not enough letters")
            }
            Rejection::WrongLength { .. } => write!(f, "Too many letters"),
            Rejection::NotInWordList => write!(f, "Not in word list"),
            Rejection::AlreadyGuessed => write!(f, "Already guessed"),
        }
    }
}

/// Persisted form of a game, stored as JSON under a single key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub target_word: String,
    #[serde(default)]
    pub guesses: Vec<String>,
    #[serde(default)]
    pub is_game_over: bool,
    #[serde(default)]
    pub timestamp: i64,
    /// False between the terminal save and the stats update.
    #[serde(default = "default_true")]
    pub stats_recorded: bool,
    #[serde(default)]
    pub is_daily: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    target: String,
    guesses: Vec<String>,
    status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            target: String::new(),
            guesses: Vec::new(),
            status: GameStatus::NotStarted,
        }
    }

    pub fn start(&mut self, word: &str) {
        self.target = word.to_string();
        self.guesses.clear();
        self.status = GameStatus::InProgress;
    }

    /// Records `guess` and returns its marks. Dictionary membership is the
    /// caller's job; only length and repetition are checked here.
    pub fn submit_guess(&mut self, guess: &str) -> Result<Vec<TileState>, Rejection> {
        if self.status != GameStatus::InProgress {
            return Err(Rejection::NotInProgress);
        }

        let expected = self.word_len();
        let actual = guess.chars().count();
        if actual != expected {
            return Err(Rejection::WrongLength { expected, actual });
        }

        if self.guesses.iter().any(|g| g == guess) {
            return Err(Rejection::AlreadyGuessed);
        }

        let marks = evaluate(guess, &self.target);
        self.guesses.push(guess.to_string());

        if guess == self.target {
            self.status = GameStatus::Won;
        } else if self.guesses.len() == MAX_GUESSES {
            self.status = GameStatus::Lost;
        }
        Ok(marks)
    }

    pub fn target(&self) -> Option<&str> {
        if self.target.is_empty() {
            None
        } else {
            Some(&self.target)
        }
    }

    pub fn word_len(&self) -> usize {
        self.target.chars().count()
    }

    pub fn guesses(&self) -> &[String] {
        &self.guesses
    }

    pub fn attempts(&self) -> usize {
        self.guesses().len()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Won | GameStatus::Lost)
    }

    pub fn scored_guesses(&self) -> Vec<Word> {
        self.guesses
            .iter()
            .map(|guess| Word::scored(guess, &self.target))
            .collect()
    }

    pub fn snapshot(&self, timestamp: i64) -> Snapshot {
        Snapshot {
            target_word: self.target.clone(),
            guesses: self.guesses.clone(),
            is_game_over: self.is_over(),
            timestamp,
            stats_recorded: true,
            is_daily: false,
        }
    }

    /// Rebuilds a game from `snapshot`, or `None` when its target is not in
    /// `word_list` or its guesses do not describe a reachable game.
    pub fn resume(snapshot: &Snapshot, word_list: &WordList) -> Option<Self> {
        let target = snapshot.target_word.as_str();
        if !word_list.contains(target) {
            info!("saved target word is not in the {} list", word_list.mode());
            return None;
        }

        let mut game = GameState::new();
        game.start(target);
        for guess in &snapshot.guesses {
            if let Err(rejection) = game.submit_guess(guess) {
                warn!("discarding saved game: guess '{guess}' rejected ({rejection:?})");
                return None;
            }
        }

        if game.is_over() != snapshot.is_game_over {
            warn!(
                "saved game over flag {} disagrees with its guesses, using {}",
                snapshot.is_game_over,
                game.is_over()
            );
        }
        Some(game)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::word_list::WordMode;

    fn word_list() -> WordList {
        WordList::parse(
            WordMode::Classic,
            "house\nsmile\nhorse\ncrane\nslate\nirate\nadieu\nbagel\nround\nmount",
        )
        .expect("words expected")
    }

    fn started(target: &str) -> GameState {
        let mut game = GameState::new();
        game.start(target);
        game
    }

    #[test]
    fn new_game_test() {
        let game = GameState::new();
        assert_eq!(game.status(), GameStatus::NotStarted);
        assert_eq!(game.target(), None);
        assert!(!game.is_over());

        let game = started("HOUSE");
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.target(), Some("HOUSE"));
        assert_eq!(game.attempts(), 0);
    }

    #[test]
    fn submit_before_start_test() {
        let mut game = GameState::new();
        assert_eq!(game.submit_guess("HOUSE"), Err(Rejection::NotInProgress));
        assert!(game.guesses().is_empty());
    }

    #[test]
    fn won_in_three_test() {
        let mut game = started("HOUSE");

        game.submit_guess("SMILE").expect("accepted");
        assert_eq!(game.status(), GameStatus::InProgress);

        let marks = game.submit_guess("HORSE").expect("accepted");
        assert_eq!(
            marks,
            [
                TileState::Correct,
                TileState::Correct,
                TileState::Absent,
                TileState::Correct,
                TileState::Correct,
            ]
        );
        assert_eq!(game.status(), GameStatus::InProgress);

        let marks = game.submit_guess("HOUSE").expect("accepted");
        assert!(marks.iter().all(|s| *s == TileState::Correct));
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.attempts(), 3);
        assert!(game.is_over());

        // terminal: nothing more is accepted
        assert_eq!(game.submit_guess("CRANE"), Err(Rejection::NotInProgress));
        assert_eq!(game.attempts(), 3);
    }

    #[test]
    fn lost_after_six_test() {
        let mut game = started("HOUSE");
        for (i, guess) in ["CRANE", "SLATE", "IRATE", "ADIEU", "BAGEL"]
            .iter()
            .enumerate()
        {
            game.submit_guess(guess).expect("accepted");
            assert_eq!(game.attempts(), i + 1);
            assert_eq!(game.status(), GameStatus::InProgress);
        }
        game.submit_guess("ROUND").expect("accepted");
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.attempts(), MAX_GUESSES);
    }

    #[test]
    fn win_on_last_guess_test() {
        let mut game = started("HOUSE");
        for guess in ["CRANE", "SLATE", "IRATE", "ADIEU", "BAGEL", "HOUSE"] {
            game.submit_guess(guess).expect("accepted");
        }
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn rejections_test() {
        let mut game = started("HOUSE");
        assert_eq!(
            game.submit_guess("HOUS"),
            Err(Rejection::WrongLength {
                expected: 5,
                actual: 4
            })
        );
        assert_eq!(
            game.submit_guess("HOUSES"),
            Err(Rejection::WrongLength {
                expected: 5,
                actual: 6
            })
        );

        game.submit_guess("CRANE").expect("accepted");
        assert_eq!(game.submit_guess("CRANE"), Err(Rejection::AlreadyGuessed));
        assert_eq!(game.guesses(), ["CRANE"]);
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn rejection_message_test() {
        let short = Rejection::WrongLength {
            expected: 5,
            actual: 3,
        };
        assert_eq!(short.to_string(), "Not enough letters");
        assert_eq!(Rejection::NotInWordList.to_string(), "Not in word list");
        assert_eq!(Rejection::AlreadyGuessed.to_string(), "Already guessed");
    }

    #[test]
    fn accented_length_test() {
        let mut game = started("ÉCLAT");
        assert_eq!(game.word_len(), 5);
        assert!(game.submit_guess("ÉCLAT").is_ok());
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn start_resets_test() {
        let mut game = started("HOUSE");
        game.submit_guess("HOUSE").expect("accepted");
        assert!(game.is_over());

        game.start("CRANE");
        assert!(!game.is_over());
        assert!(game.guesses().is_empty());
        assert_eq!(game.target(), Some("CRANE"));
    }

    #[test]
    fn snapshot_resume_test() {
        let mut game = started("HOUSE");
        game.submit_guess("SMILE").expect("accepted");
        game.submit_guess("HORSE").expect("accepted");

        let snapshot = game.snapshot(1_700_000_000_000);
        assert_eq!(snapshot.target_word, "HOUSE");
        assert!(!snapshot.is_game_over);

        let resumed = GameState::resume(&snapshot, &word_list()).expect("resumed");
        assert_eq!(resumed, game);
    }

    #[test]
    fn snapshot_json_test() {
        let json = r#"{"targetWord":"HOUSE","guesses":["SMILE"],"isGameOver":false,"timestamp":5}"#;
        let snapshot: Snapshot = serde_json::from_str(json).expect("snapshot");
        assert_eq!(snapshot.guesses, ["SMILE"]);
        assert!(snapshot.stats_recorded);
        assert!(!snapshot.is_daily);

        let out = serde_json::to_string(&snapshot).expect("json");
        assert!(out.contains("\"targetWord\":\"HOUSE\""));
        assert!(out.contains("\"isGameOver\":false"));
        assert!(out.contains("\"isDaily\":false"));
    }

    #[test]
    fn resume_unknown_target_test() {
        let snapshot = Snapshot {
            target_word: "ZEBRA".to_string(),
            guesses: vec![],
            is_game_over: false,
            timestamp: 0,
            stats_recorded: true,
            is_daily: false,
        };
        assert!(GameState::resume(&snapshot, &word_list()).is_none());
    }

    #[test]
    fn resume_inconsistent_guesses_test() {
        let mut snapshot = started("HOUSE").snapshot(0);

        snapshot.guesses = vec!["CRANE".to_string(), "CRANE".to_string()];
        assert!(GameState::resume(&snapshot, &word_list()).is_none());

        snapshot.guesses = vec!["CRANES".to_string()];
        assert!(GameState::resume(&snapshot, &word_list()).is_none());

        snapshot.guesses = vec!["HOUSE".to_string(), "CRANE".to_string()];
        assert!(GameState::resume(&snapshot, &word_list()).is_none());
    }

    #[test]
    fn resume_finished_game_test() {
        let mut game = started("HOUSE");
        game.submit_guess("HOUSE").expect("accepted");
        let mut snapshot = game.snapshot(0);
        // the stored flag is not trusted over the guesses
        snapshot.is_game_over = false;

        let resumed = GameState::resume(&snapshot, &word_list()).expect("resumed");
        assert_eq!(resumed.status(), GameStatus::Won);
    }
}
