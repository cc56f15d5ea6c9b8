//! Sentence segmentation.
//!
//! PDF text arrives with hard line breaks inside sentences, so single
//! newlines are folded into spaces and only blank lines are kept as
//! paragraph breaks. Paragraphs are then split on Unicode sentence
//! boundaries (UAX #29), re-joining fragments that end in a known
//! abbreviation ("Art.", "Sig.", "S.p.A." ...).

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Splits raw text into an ordered, finite list of sentences.
///
/// Calling it twice on the same text yields the same sentences.
pub trait SentenceSegmenter: Send + Sync {
    fn sentences(&self, text: &str) -> Vec<String>;
}

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t\r]*\n\s*").unwrap());
static INLINE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Abbreviations common in Italian contracts. Lower-case, no trailing dot.
const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "art", "artt", "sig", "sigg", "sig.ra", "dott", "dott.ssa", "avv", "prof", "ing", "rag",
    "geom", "pag", "pagg", "cap", "co", "lett", "n", "nn", "num", "es", "ecc", "cfr", "rif",
    "s.p.a", "s.r.l", "s.a.s", "s.n.c", "c.c", "c.p.c", "d.lgs", "d.l", "l", "reg", "tel",
    "inc", "ltd", "e.g", "i.e", "etc", "vs",
];

/// Rule-based segmenter over Unicode sentence boundaries.
pub struct RuleSegmenter {
    abbreviations: HashSet<String>,
}

impl RuleSegmenter {
    pub fn new() -> Self {
        Self {
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn with_custom_abbreviations(mut self, abbreviations: &[&str]) -> Self {
        for abbrev in abbreviations {
            self.abbreviations
                .insert(abbrev.trim_end_matches('.').to_lowercase());
        }
        self
    }

    /// Whether `fragment` ends with an abbreviation rather than a sentence stop.
    fn ends_with_abbreviation(&self, fragment: &str) -> bool {
        let Some(stripped) = fragment.strip_suffix('.') else {
            return false;
        };
        let last_word = stripped
            .rsplit(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or("");
        !last_word.is_empty() && self.abbreviations.contains(&last_word.to_lowercase())
    }

    fn split_paragraph(&self, paragraph: &str, out: &mut Vec<String>) {
        let mut pending = String::new();
        for raw in paragraph.split_sentence_bounds() {
            pending.push_str(raw);
            let trimmed = pending.trim();
            if trimmed.is_empty() || self.ends_with_abbreviation(trimmed) {
                continue;
            }
            out.push(trimmed.to_string());
            pending.clear();
        }
        let rest = pending.trim();
        if !rest.is_empty() {
            out.push(rest.to_string());
        }
    }
}

impl Default for RuleSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceSegmenter for RuleSegmenter {
    fn sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        for paragraph in PARAGRAPH_BREAK.split(text) {
            let flat = INLINE_WHITESPACE.replace_all(paragraph.trim(), " ");
            if flat.is_empty() {
                continue;
            }
            self.split_paragraph(&flat, &mut sentences);
        }
        sentences
    }
}
