//! Review text cleaning ahead of vectorization.
//!
//! Reviews arrive as raw user text. Cleaning lower-cases them, drops URLs,
//! mentions and hashtags, keeps ASCII letters only, collapses whitespace and
//! removes stop words and very short tokens. The output is whitespace
//! tokenizable, which is all the vectorizer assumes.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\S+").expect("Invalid regex"));

static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+|#\w+").expect("Invalid regex"));

static NON_LETTER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("Invalid regex"));

/// Indonesian stop words plus common chat abbreviations seen in reviews.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "yang", "untuk", "pada", "ke", "para", "namun", "menurut", "antara", "dia", "dua", "ia",
    "seperti", "jika", "sehingga", "kembali", "dan", "tidak", "ini", "karena", "oleh", "itu",
    "dalam", "dari", "tersebut", "bahwa", "akan", "dengan", "di", "ada", "adalah", "atau",
    "juga", "sudah", "bisa", "dapat", "saya", "kita", "kami", "mereka", "anda", "nya", "kok",
    "sih", "deh", "dong", "aja", "yg", "dgn", "utk", "gak", "ga", "si", "dr", "sama",
];

/// Configurable review cleaner.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    stop_words: HashSet<String>,
    min_token_len: usize,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new::<&str>(&[], 3)
    }
}

impl Preprocessor {
    /// Builds a cleaner with the default stop words plus `extra_stop_words`.
    ///
    /// Tokens shorter than `min_token_len` characters are dropped.
    pub fn new<S: AsRef<str>>(extra_stop_words: &[S], min_token_len: usize) -> Self {
        let stop_words = DEFAULT_STOP_WORDS
            .iter()
            .map(|w| (*w).to_string())
            .chain(extra_stop_words.iter().map(|w| w.as_ref().to_lowercase()))
            .collect();
        Self {
            stop_words,
            min_token_len,
        }
    }

    #[must_use]
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Cleans one review.
    pub fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let without_urls = URL_PATTERN.replace_all(&lowered, " ");
        let without_mentions = MENTION_PATTERN.replace_all(&without_urls, " ");
        let letters_only = NON_LETTER_PATTERN.replace_all(&without_mentions, " ");

        letters_only
            .split_whitespace()
            .filter(|word| word.len() >= self.min_token_len && !self.is_stop_word(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
