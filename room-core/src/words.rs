use anyhow::{Result, bail};
use rand::Rng;

/// Supplies the secret for a round when the host does not choose one.
///
/// Implementations must only hand out non-empty lowercase words.
pub trait WordSource: Send + Sync {
    fn pick(&self) -> String;
}

/// Vocabulary parsed from a flat word-list file: one word per line,
/// trimmed and lowercased, blank lines and `#` comments skipped.
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn parse(raw: &str) -> Result<Self> {
        let words: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();

        if words.is_empty() {
            bail!("word list contains no usable words");
        }

        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        self.words.iter().any(|w| *w == word)
    }
}

impl WordSource for WordList {
    fn pick(&self) -> String {
        let index = rand::rng().random_range(0..self.words.len());
        self.words[index].clone()
    }
}
