//! CISTEM stemmer for German.
//!
//! Implements the algorithm of Weissweiler & Fraser, "Developing a Stemmer
//! for German Based on a Comparative Analysis of Publicly Available
//! Stemmers" (GSCL 2017). The stemmer works on characters after replacing
//! umlauts and `ß`, encodes the multi-letter units `sch`, `ei`, `ie` and
//! doubled letters as single placeholder characters, strips suffixes while
//! the word is long enough, and finally restores the placeholders.
//!
//! # Examples
//!
//! ```
//! use scaphra::analysis::stemmer::{CistemStemmer, Stemmer};
//!
//! let stemmer = CistemStemmer::new();
//! assert_eq!(stemmer.stem("Speicherbehältern"), "speicherbehalt");
//! assert_eq!(stemmer.stem("druckt"), "druck");
//! ```

use crate::analysis::stemmer::Stemmer;

/// The CISTEM German stemmer.
#[derive(Debug, Clone, Default)]
pub struct CistemStemmer {
    /// Strip a trailing `t` even from capitalized words (nouns).
    case_insensitive: bool,
}

const SCH: char = '$';
const EI: char = '%';
const IE: char = '&';
const DOUBLE: char = '*';

impl CistemStemmer {
    /// Create a new case-sensitive CISTEM stemmer.
    pub fn new() -> Self {
        CistemStemmer {
            case_insensitive: false,
        }
    }

    /// Create a stemmer that treats capitalized words like lowercase ones.
    pub fn case_insensitive() -> Self {
        CistemStemmer {
            case_insensitive: true,
        }
    }

    fn encode(word: &str) -> Vec<char> {
        let mut chars = Vec::with_capacity(word.len());
        for c in word.to_lowercase().chars() {
            match c {
                'ü' => chars.push('u'),
                'ö' => chars.push('o'),
                'ä' => chars.push('a'),
                'ß' => chars.extend(['s', 's']),
                _ => chars.push(c),
            }
        }

        if chars.len() >= 6 && chars.starts_with(&['g', 'e']) {
            chars.drain(..2);
        }

        let chars = replace_all(&chars, &['s', 'c', 'h'], SCH);
        let chars = replace_all(&chars, &['e', 'i'], EI);
        let mut chars = replace_all(&chars, &['i', 'e'], IE);

        let mut i = 1;
        while i < chars.len() {
            if chars[i] == chars[i - 1] {
                chars[i] = DOUBLE;
                i += 2;
            } else {
                i += 1;
            }
        }

        chars
    }

    fn decode(chars: &[char]) -> String {
        let mut word = String::with_capacity(chars.len() + 4);
        let mut previous: Option<char> = None;
        for &c in chars {
            let c = match (c, previous) {
                (DOUBLE, Some(p)) => p,
                _ => c,
            };
            match c {
                SCH => word.push_str("sch"),
                EI => word.push_str("ei"),
                IE => word.push_str("ie"),
                _ => word.push(c),
            }
            previous = Some(c);
        }
        word
    }
}

fn replace_all(chars: &[char], pattern: &[char], replacement: char) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i..].starts_with(pattern) {
            out.push(replacement);
            i += pattern.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

impl Stemmer for CistemStemmer {
    fn stem(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }

        let upper = word.chars().next().is_some_and(char::is_uppercase);
        let strip_t = !upper || self.case_insensitive;
        let mut chars = Self::encode(word);

        while chars.len() > 3 {
            let n = chars.len();
            if n > 5 {
                if chars[n - 2] == 'e' && matches!(chars[n - 1], 'm' | 'r') {
                    chars.truncate(n - 2);
                    continue;
                }
                if chars.ends_with(&['n', 'd']) {
                    chars.truncate(n - 2);
                    continue;
                }
            }
            if strip_t && chars[n - 1] == 't' {
                chars.truncate(n - 1);
                continue;
            }
            if matches!(chars[n - 1], 'e' | 's' | 'n') {
                chars.truncate(n - 1);
                continue;
            }
            break;
        }

        Self::decode(&chars)
    }

    fn name(&self) -> &'static str {
        "cistem"
    }
}
