use anyhow::{Context, Result, bail};
use log::{debug, info};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

const WORDS_5: &str = include_str!("../../words5.txt");
const WORDS_7: &str = include_str!("../../words7.txt");

/// Singular words that end in a single `S` and would otherwise be dropped
/// as plurals.
const ALLOWED_S_WORDS_5: [&str; 25] = [
    "AEGIS", "ALIAS", "ATLAS", "BASIS", "BOGUS", "BONUS", "CHAOS", "CORPS", "ETHOS", "FOCUS",
    "HUMUS", "KUDOS", "LOCUS", "LOTUS", "LUPUS", "MINUS", "MUCUS", "NEXUS", "OASIS", "PENIS",
    "REBUS", "SINUS", "TORUS", "VIRUS", "ADIOS",
];

const ALLOWED_S_WORDS_7: [&str; 47] = [
    "ANXIOUS", "BILIOUS", "CALLOUS", "CELSIUS", "COPIOUS", "CUMULUS", "CURIOUS", "DEVIOUS",
    "DUBIOUS", "ENVIOUS", "FATUOUS", "FERROUS", "FIBROUS", "FURIOUS", "GASEOUS", "HABITUS",
    "HEINOUS", "IGNEOUS", "JEALOUS", "MARQUIS", "NEMESIS", "NERVOUS", "NUCLEUS", "OBVIOUS",
    "OMINOUS", "OMNIBUS", "ONEROUS", "PAPYRUS", "PITEOUS", "POMPOUS", "QUIETUS", "RAUCOUS",
    "RIOTOUS", "SERIOUS", "SINUOUS", "SURPLUS", "TEDIOUS", "TENUOUS", "TETANUS", "TRICEPS",
    "TUMULUS", "UPWARDS", "VACUOUS", "VARIOUS", "VICIOUS", "VISCOUS", "ZEALOUS",
];

/// Word length of a game: 5 letters in classic mode, 7 in long mode.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordMode {
    #[default]
    Classic,
    Long,
}

impl WordMode {
    pub fn word_len(&self) -> usize {
        match self {
            WordMode::Classic => 5,
            WordMode::Long => 7,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            WordMode::Classic => WordMode::Long,
            WordMode::Long => WordMode::Classic,
        }
    }

    fn allowed_s_words(&self) -> &'static [&'static str] {
        match self {
            WordMode::Classic => &ALLOWED_S_WORDS_5,
            WordMode::Long => &ALLOWED_S_WORDS_7,
        }
    }
}

impl fmt::Display for WordMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WordMode::Classic => write!(f, "classic"),
            WordMode::Long => write!(f, "long"),
        }
    }
}

/// Playable words of one length. Used both to draw targets and to accept
/// guesses.
#[derive(Debug, Clone)]
pub struct WordList {
    mode: WordMode,
    words: Vec<String>,
    lookup: HashSet<String>,
}

impl WordList {
    pub fn embedded(mode: WordMode) -> Result<Self> {
        let raw = match mode {
            WordMode::Classic => WORDS_5,
            WordMode::Long => WORDS_7,
        };
        Self::parse(mode, raw)
    }

    pub fn load_from_file<P: AsRef<Path>>(mode: WordMode, path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read word list {}", path.display()))?;
        Self::parse(mode, &raw)
    }

    pub fn parse(mode: WordMode, raw: &str) -> Result<Self> {
        let mut lookup = HashSet::new();
        let mut skipped = 0;
        for line in raw.lines() {
            let word = line.trim().to_uppercase();
            if word.is_empty() {
                continue;
            }
            if word.chars().count() != mode.word_len() || !word.chars().all(char::is_alphabetic) {
                skipped += 1;
                continue;
            }
            if is_game_word(mode, &word) {
                lookup.insert(word);
            }
        }

        if lookup.is_empty() {
            bail!("no playable {}-letter words", mode.word_len());
        }
        if skipped > 0 {
            debug!("skipped {skipped} malformed entries in {mode} word list");
        }

        let mut words: Vec<String> = lookup.iter().cloned().collect();
        words.sort();
        info!("loaded {} {mode} words", words.len());
        Ok(WordList {
            mode,
            words,
            lookup,
        })
    }

    pub fn mode(&self) -> WordMode {
        self.mode
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup.contains(word)
    }

    pub fn draw_word(&self) -> Option<String> {
        let mut rng = rand::rng();
        self.words.choose(&mut rng).cloned()
    }
}

/// Plural filter: words ending in a single `S` are dropped unless they are
/// on the allow-list. Words ending in `SS` stay.
fn is_game_word(mode: WordMode, word: &str) -> bool {
    !word.ends_with('S') || word.ends_with("SS") || mode.allowed_s_words().contains(&word)
}

/// Both lists, one per mode.
#[derive(Debug, Clone)]
pub struct WordLists {
    classic: WordList,
    long: WordList,
}

impl WordLists {
    pub fn new(classic: WordList, long: WordList) -> Self {
        WordLists { classic, long }
    }

    pub fn embedded() -> Result<Self> {
        Ok(WordLists {
            classic: WordList::embedded(WordMode::Classic)?,
            long: WordList::embedded(WordMode::Long)?,
        })
    }

    pub fn get(&self, mode: WordMode) -> &WordList {
        match mode {
            WordMode::Classic => &self.classic,
            WordMode::Long => &self.long,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn embedded_lists_test() {
        for mode in [WordMode::Classic, WordMode::Long] {
            let list = WordList::embedded(mode).expect("words expected");
            assert!(list.words.len() > 100);
            for word in &list.words {
                assert_eq!(word.chars().count(), mode.word_len());
                assert!(word.chars().all(|ch| ch.is_ascii_uppercase()));
            }
        }
    }

    #[test]
    fn plural_filter_test() {
        let raw = "crane\nbooks\nglass\nfocus\nvirus\ntrees\n";
        let list = WordList::parse(WordMode::Classic, raw).expect("words expected");
        assert!(list.contains("CRANE"));
        assert!(list.contains("GLASS"));
        assert!(list.contains("FOCUS"));
        assert!(list.contains("VIRUS"));
        assert!(!list.contains("BOOKS"));
        assert!(!list.contains("TREES"));
        assert_eq!(list.words.len(), 4);
    }

    #[test]
    fn long_plural_filter_test() {
        let raw = "serious\nplayers\naddress\nbalance\n";
        let list = WordList::parse(WordMode::Long, raw).expect("words expected");
        assert!(list.contains("SERIOUS"));
        assert!(list.contains("ADDRESS"));
        assert!(list.contains("BALANCE"));
        assert!(!list.contains("PLAYERS"));
    }

    #[test]
    fn parse_skips_malformed_test() {
        let raw = "crane\n\n  slate  \ncranes\nab1cd\nabc\n";
        let list = WordList::parse(WordMode::Classic, raw).expect("words expected");
        assert_eq!(list.words, ["CRANE", "SLATE"]);
    }

    #[test]
    fn parse_empty_test() {
        assert!(WordList::parse(WordMode::Classic, "cars\nbooks\n").is_err());
        assert!(WordList::parse(WordMode::Long, "").is_err());
    }

    #[test]
    fn draw_word_test() {
        let list = WordList::parse(WordMode::Classic, "crane\nslate\nirate").expect("words");
        for _ in 0..20 {
            let word = list.draw_word().expect("random word expected");
            assert!(list.contains(&word));
        }
    }

    #[test]
    fn mode_test() {
        assert_eq!(WordMode::Classic.word_len(), 5);
        assert_eq!(WordMode::Long.word_len(), 7);
        assert_eq!(WordMode::Classic.toggled(), WordMode::Long);
        assert_eq!(WordMode::Long.toggled(), WordMode::Classic);
        assert_eq!(
            serde_json::to_string(&WordMode::Long).expect("json"),
            "\"long\""
        );
    }
}
