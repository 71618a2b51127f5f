use std::collections::HashMap;

use super::tile::{Tile, TileState};

pub const MAX_GUESSES: usize = 6;

/// Letters that can be typed on top of the base alphabet. The accent key
/// cycles the last letter through its variants.
pub const ACCENT_MAP: [(char, &[char]); 7] = [
    ('E', &['É', 'È', 'Ê', 'Ë']),
    ('O', &['Ó', 'Ò', 'Ô', 'Ö']),
    ('A', &['Á', 'À', 'Â', 'Ä', 'Æ']),
    ('I', &['Í', 'Ì', 'Î', 'Ï']),
    ('U', &['Ú', 'Ù', 'Û', 'Ü']),
    ('N', &['Ñ']),
    ('C', &['Ç']),
];

/// A scored guess, one tile per letter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Word {
    pub letters: Vec<Tile>,
}

impl Word {
    pub fn scored(guess: &str, target: &str) -> Self {
        let letters = guess
            .chars()
            .zip(evaluate(guess, target))
            .map(|(letter, state)| Tile { letter, state })
            .collect();
        Word { letters }
    }
}

/// Scores `guess` against `target`. Both must have the same number of letters.
///
/// Exact matches are taken first and removed from both sides, then every
/// remaining guess letter claims the leftmost unclaimed occurrence in the
/// target. Repeated letters are never marked more often than they occur.
pub fn evaluate(guess: &str, target: &str) -> Vec<TileState> {
    let mut guess_letters: Vec<Option<char>> = guess.chars().map(Some).collect();
    let mut target_letters: Vec<Option<char>> = target.chars().map(Some).collect();
    let mut result = vec![TileState::Absent; guess_letters.len()];

    // First pass: mark correct letters
    for (i, (letter, answer)) in guess_letters
        .iter_mut()
        .zip(target_letters.iter_mut())
        .enumerate()
    {
        if letter.is_some() && letter == answer {
            result[i] = TileState::Correct;
            *answer = None;
            *letter = None;
        }
    }

    // Second pass: mark present letters
    for (i, letter) in guess_letters.iter().enumerate() {
        let Some(letter) = letter else {
            continue;
        };
        if let Some(pos) = target_letters.iter().position(|t| *t == Some(*letter)) {
            result[i] = TileState::Present;
            target_letters[pos] = None;
        }
    }

    result
}

/// Folds every scored guess into the best known state per letter.
pub fn keyboard_states(guesses: &[Word]) -> HashMap<char, TileState> {
    let mut used_chars = HashMap::new();
    for tile in guesses.iter().flat_map(|word| word.letters.iter()) {
        let used_state = used_chars.entry(tile.letter).or_insert(TileState::Unused);
        // states have priorities. The higher the priority, the smaller the value
        if tile.state < *used_state {
            *used_state = tile.state;
        }
    }
    used_chars
}

/// Next accent variant of `letter`, wrapping back to the base letter.
pub fn cycle_accent(letter: char) -> char {
    for (base, variants) in ACCENT_MAP {
        if letter == base {
            return variants[0];
        }
        if let Some(pos) = variants.iter().position(|&v| v == letter) {
            return variants.get(pos + 1).copied().unwrap_or(base);
        }
    }
    letter
}

pub fn is_valid_letter(ch: char) -> bool {
    ch.is_ascii_uppercase()
        || ACCENT_MAP
            .iter()
            .any(|(_, variants)| variants.contains(&ch))
}
