// Text normalization rules applied to raw OCR output
//
// The rules are order-sensitive: each one operates on the previous rule's
// output. Comic dialogue is upper-case, so everything outside a small
// character set is treated as recognition noise.

use crate::core::config::NormalizeConfig;
use crate::services::lexicon::Lexicon;
use regex::Regex;
use std::sync::Arc;

/// Branding marker found on some cover pages; lines containing it carry no dialogue
const WATERMARK: &str = "COMICS.COM";

/// Punctuation accepted in dialogue besides letters, spaces and hyphens
const ALLOWED_PUNCTUATION: &str = ",.?!\"'’";

/// One-letter words that are legitimate English
const KEEP_SINGLE: [&str; 2] = ["I", "A"];

/// Two-letter lines that are legitimate dialogue
const KEEP_TWO: [&str; 2] = ["NO", "OK"];

pub struct TextNormalizer {
    lexicon: Arc<Lexicon>,
    allow_digits: bool,
    hyphen_break: Regex,
}

impl TextNormalizer {
    pub fn new(lexicon: Arc<Lexicon>, config: &NormalizeConfig) -> Self {
        // Guarded form of the lookbehind `(?<!-)- `: the captured character
        // is kept, so only the hyphen-space pair is removed
        let hyphen_break = Regex::new(r"(^|[^-])- ").expect("valid hyphen pattern");
        Self {
            lexicon,
            allow_digits: config.allow_digits,
            hyphen_break,
        }
    }

    fn is_allowed(&self, c: char) -> bool {
        c == ' '
            || c == '-'
            || c.is_ascii_uppercase()
            || (self.allow_digits && c.is_ascii_digit())
            || ALLOWED_PUNCTUATION.contains(c)
    }

    /// Clean one raw recognized string. Returns an empty string when the line
    /// carries no usable text.
    pub fn normalize(&self, raw: &str) -> String {
        // The watermark check runs on the unmodified raw text
        if raw.contains(WATERMARK) {
            return String::new();
        }

        // '|' is a common misread of 'I'; a multi-line bubble is one utterance
        let text = raw.replace('|', "I").replace('\n', " ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        // Strip everything outside the dialogue character set
        let text: String = text.chars().filter(|&c| self.is_allowed(c)).collect();

        // Rejoin words split across lines on a single trailing hyphen
        let text = self.hyphen_break.replace_all(&text, "$1").to_string();

        let mut words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        for word in &mut words {
            // Spellcheck, trying the bare alphabetic form before correcting
            if !self.lexicon.check(word) {
                let alpha: String = word.chars().filter(|c| c.is_alphabetic()).collect();
                if !alpha.is_empty() && !self.lexicon.check(&alpha) {
                    if let Some(suggestion) = self.lexicon.suggest(&word.to_lowercase()) {
                        *word = suggestion.to_uppercase();
                    }
                }
            }
            // Stray single characters are OCR noise
            if word.chars().count() == 1 && !KEEP_SINGLE.contains(&word.as_str()) {
                word.clear();
            }
        }

        let joined = words.join(" ");
        let cleaned = joined.split_whitespace().collect::<Vec<_>>().join(" ");

        // Suppress two-character noise fragments. The comparison runs against
        // the pre-collapse join, not the final string; see DESIGN.md.
        if cleaned.chars().count() == 2 && !KEEP_TWO.contains(&joined.as_str()) {
            return String::new();
        }

        cleaned
    }
}
