// Dictionary and autocorrection capability for the text normalizer
//
// Loaded once at process start from a newline-separated word list. Membership
// is case-insensitive; suggestions are scored with Jaro-Winkler over entries
// sharing the word's initial. Read-only after construction.

use crate::core::errors::LexiconError;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use strsim::jaro_winkler;
use tracing::{debug, info};

/// Minimum similarity for an autocorrection suggestion to be accepted
const SUGGESTION_FLOOR: f64 = 0.8;

/// Words shorter than this are never corrected
const MIN_SUGGESTION_LEN: usize = 3;

/// Candidate entries may differ from the word's length by at most this much
const LEN_WINDOW: usize = 2;

pub struct Lexicon {
    words: HashSet<String>,
    by_initial: HashMap<char, Vec<String>>,
}

impl Lexicon {
    /// Load the word list backing both dictionary checks and suggestions.
    /// A missing or empty list is fatal; there is no fallback.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let content = fs::read_to_string(path).map_err(|source| LexiconError::Unavailable {
            path: path.display().to_string(),
            source,
        })?;
        let lexicon = Self::from_words(content.lines());
        if lexicon.words.is_empty() {
            return Err(LexiconError::Empty(path.display().to_string()));
        }
        info!(
            "Loaded {} dictionary entries from {}",
            lexicon.words.len(),
            path.display()
        );
        Ok(lexicon)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        let mut by_initial: HashMap<char, Vec<String>> = HashMap::new();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            if set.insert(word.clone()) {
                if let Some(initial) = word.chars().next() {
                    by_initial.entry(initial).or_default().push(word);
                }
            }
        }
        Self { words: set, by_initial }
    }

    /// Case-insensitive membership check.
    pub fn check(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Best dictionary suggestion for a lowercase word, or `None` when no
    /// entry clears the similarity floor.
    pub fn suggest(&self, word: &str) -> Option<String> {
        let len = word.chars().count();
        if len < MIN_SUGGESTION_LEN {
            return None;
        }
        if self.words.contains(word) {
            return None;
        }
        let initial = word.chars().next()?;
        let candidates = self.by_initial.get(&initial)?;

        let mut best: Option<(&String, f64)> = None;
        for entry in candidates {
            if entry.chars().count().abs_diff(len) > LEN_WINDOW {
                continue;
            }
            let similarity = jaro_winkler(word, entry);
            if similarity < SUGGESTION_FLOOR {
                continue;
            }
            match best {
                Some((_, score)) if score >= similarity => {}
                _ => best = Some((entry, similarity)),
            }
        }

        best.map(|(entry, score)| {
            debug!("Autocorrect: '{}' -> '{}' ({:.3})", word, entry, score);
            entry.clone()
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture() -> Lexicon {
        Lexicon::from_words(["hello", "there", "help", "a", "i", "no", "ok"])
    }

    #[test]
    fn check_is_case_insensitive() {
        let lexicon = fixture();
        assert!(lexicon.check("hello"));
        assert!(lexicon.check("HELLO"));
        assert!(lexicon.check("Hello"));
        assert!(!lexicon.check("helo"));
    }

    #[test]
    fn suggests_closest_entry() {
        let lexicon = fixture();
        assert_eq!(lexicon.suggest("helo"), Some("hello".to_string()));
    }

    #[test]
    fn no_suggestion_for_short_words() {
        let lexicon = fixture();
        assert_eq!(lexicon.suggest("xy"), None);
    }

    #[test]
    fn no_suggestion_for_known_words() {
        let lexicon = fixture();
        assert_eq!(lexicon.suggest("hello"), None);
    }

    #[test]
    fn no_suggestion_below_floor() {
        let lexicon = fixture();
        assert_eq!(lexicon.suggest("zzz"), None);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hello\nworld").unwrap();
        let lexicon = Lexicon::load(file.path()).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert!(lexicon.check("WORLD"));
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            Lexicon::load(file.path()),
            Err(LexiconError::Empty(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            Lexicon::load(Path::new("/nonexistent/words")),
            Err(LexiconError::Unavailable { .. })
        ));
    }
}
