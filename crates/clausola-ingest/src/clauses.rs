//! Keyword-based clause finding.

use tracing::debug;

use crate::segment::SentenceSegmenter;

/// Keywords that flag a sentence as a legal clause.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "garanzia",
    "responsabilità",
    "indennizzo",
    "penale",
    "risoluzione",
    "limite di responsabilità",
    "compenso",
    "recesso",
    "penalità",
    "forza maggiore",
    "confidenzialità",
];

/// A sentence must have strictly more words than this to count as a clause.
pub const DEFAULT_MIN_WORDS: usize = 6;

/// Filters segmented sentences down to clause candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseFinder {
    keywords: Vec<String>,
    min_words: usize,
}

impl ClauseFinder {
    pub fn new<S: AsRef<str>>(keywords: impl IntoIterator<Item = S>, min_words: usize) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            min_words,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Keyword present (case-insensitive) and word count above the minimum.
    pub fn is_clause(&self, sentence: &str) -> bool {
        let lowered = sentence.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
            && sentence.split_whitespace().count() > self.min_words
    }

    /// Segment `text` and keep the clause sentences, in document order.
    pub fn find(&self, segmenter: &dyn SentenceSegmenter, text: &str) -> Vec<String> {
        let sentences = segmenter.sentences(text);
        let total = sentences.len();
        let clauses: Vec<String> = sentences
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| self.is_clause(s))
            .collect();
        debug!("{} of {} sentences kept as clauses", clauses.len(), total);
        clauses
    }
}

impl Default for ClauseFinder {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied(), DEFAULT_MIN_WORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::RuleSegmenter;

    #[test]
    fn test_short_sentence_excluded() {
        let finder = ClauseFinder::default();
        assert!(!finder.is_clause("La garanzia è valida."));
    }

    #[test]
    fn test_word_count_boundary() {
        let finder = ClauseFinder::default();
        // 6 words: excluded
        assert!(!finder.is_clause("La garanzia vale per dodici mesi."));
        // 7 words: kept
        assert!(finder.is_clause("La garanzia vale per dodici mesi pieni."));
    }

    #[test]
    fn test_keyword_required() {
        let finder = ClauseFinder::default();
        assert!(!finder.is_clause("Il presente documento è redatto in due copie originali."));
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let finder = ClauseFinder::default();
        assert!(finder.is_clause("In caso di FORZA MAGGIORE le parti sono sollevate dagli obblighi."));
    }

    #[test]
    fn test_find_preserves_order() {
        let finder = ClauseFinder::default();
        let text = "La garanzia è valida. \
            Il cliente può esercitare il diritto di recesso entro trenta giorni. \
            Il documento è redatto in italiano e firmato dalle parti. \
            La penale per il ritardo è pari al dieci per cento del prezzo.";
        let clauses = finder.find(&RuleSegmenter::new(), text);
        assert_eq!(
            clauses,
            vec![
                "Il cliente può esercitare il diritto di recesso entro trenta giorni.",
                "La penale per il ritardo è pari al dieci per cento del prezzo.",
            ]
        );
    }

    #[test]
    fn test_empty_text_yields_no_clauses() {
        let finder = ClauseFinder::default();
        assert!(finder.find(&RuleSegmenter::new(), "").is_empty());
    }

    #[test]
    fn test_custom_keywords() {
        let finder = ClauseFinder::new(["Esclusiva"], 3);
        assert_eq!(finder.keywords(), ["esclusiva"]);
        assert!(finder.is_clause("Patto di esclusiva territoriale."));
    }
}
