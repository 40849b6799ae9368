use anyhow::{Result, anyhow};
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::Path;

/// Built-in list used when no word file is configured.
pub const DEFAULT_WORDS: &[&str] = &[
    "banana", "computer", "skribbl", "react", "nodejs", "typescript", "socket", "apple",
    "guitar", "house", "jungle", "pizza", "elephant", "airplane", "coffee", "mountain", "beach",
];

#[derive(Debug)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Build a word bank from a newline-separated list. Blank lines and
    /// `#` comments are skipped, duplicates keep their first occurrence.
    pub fn new(word_list: &str) -> Self {
        let mut words: Vec<String> = Vec::new();
        for line in word_list.lines() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            if !words.iter().any(|w| w.eq_ignore_ascii_case(word)) {
                words.push(word.to_string());
            }
        }

        Self { words }
    }

    /// Load a word list file. An empty list is an error since no turn could
    /// ever offer a word.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read word list {}: {}", path.display(), e))?;

        let bank = Self::new(&contents);
        if bank.is_empty() {
            return Err(anyhow!("Word list {} contains no words", path.display()));
        }

        Ok(bank)
    }

    pub fn default_words() -> Self {
        Self::new(&DEFAULT_WORDS.join("\n"))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.eq_ignore_ascii_case(word))
    }

    /// Draw up to `count` distinct words, in random order.
    pub fn draw_candidates<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<String> {
        self.words.choose_multiple(rng, count).cloned().collect()
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::default_words()
    }
}

/// Masked form of a word: one `_ ` per character, so "cat" becomes `"_ _ _ "`.
pub fn word_blanks(word: &str) -> String {
    word.chars().map(|_| "_ ").collect()
}

/// Case-insensitive exact match. An empty secret never matches.
pub fn is_correct_guess(guess: &str, word: &str) -> bool {
    !word.is_empty() && guess.to_lowercase() == word.to_lowercase()
}
