//! Clausola Ingest: PDF text extraction, sentence segmentation, keyword
//! clause finding and rule-based risk scoring.

pub mod clauses;
pub mod pdf;
pub mod profile;
pub mod scoring;
pub mod segment;

pub use clauses::{ClauseFinder, DEFAULT_KEYWORDS, DEFAULT_MIN_WORDS};
pub use pdf::{PdfExtractor, TextExtractor};
pub use profile::HeuristicProfile;
pub use scoring::RiskRuleSet;
pub use segment::{RuleSegmenter, SentenceSegmenter};
