//! Entity extraction strategies (regex-based).
//!
//! The matching policy is deliberately pluggable: the rebuild engine only
//! depends on the [`EntityExtractor`] contract, and [`SubstringExtractor`]
//! is the default, replaceable implementation.

use regex::Regex;

use crate::config::ExtractionConfig;
use crate::mentions::{EntityInfo, Mention};

/// Pluggable text-to-entity matching strategy.
///
/// Implementations must be pure (same text + same catalog yields the same
/// mentions, in the same order), must not mutate their inputs, and must not
/// accumulate state across calls. Multiple matches for the same entity
/// within one text are reported individually; the rebuild engine
/// deduplicates at edge-creation time.
pub trait EntityExtractor {
    fn extract(&self, text: &str, catalog: &[EntityInfo]) -> Vec<Mention>;
}

/// Default matching policy: case-insensitive exact name/alias matching on
/// word boundaries, confidence 1.0.
///
/// Word boundaries rather than bare substring search, so "Alexandra" does
/// not register a mention of "Alex". Names and aliases shorter than
/// `min_name_len` are skipped to avoid one-letter noise.
pub struct SubstringExtractor {
    case_sensitive: bool,
    min_name_len: usize,
}

impl SubstringExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            case_sensitive: config.case_sensitive,
            min_name_len: config.min_name_len,
        }
    }

    fn name_pattern(&self, name: &str) -> Option<Regex> {
        let name = name.trim();
        if name.chars().count() < self.min_name_len {
            return None;
        }
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        // \b only anchors against word characters; a name starting or ending
        // with punctuation ("Device (Prototype)") anchors on text edges alone
        let lead = if name.chars().next().map(is_word).unwrap_or(false) {
            r"\b"
        } else {
            ""
        };
        let trail = if name.chars().last().map(is_word).unwrap_or(false) {
            r"\b"
        } else {
            ""
        };
        let prefix = if self.case_sensitive { "" } else { "(?i)" };
        let pattern = format!("{}{}{}{}", prefix, lead, regex::escape(name), trail);
        // Escaped literal patterns always compile
        Regex::new(&pattern).ok()
    }
}

impl Default for SubstringExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl EntityExtractor for SubstringExtractor {
    fn extract(&self, text: &str, catalog: &[EntityInfo]) -> Vec<Mention> {
        let mut mentions = Vec::new();
        for entity in catalog {
            for name in std::iter::once(&entity.name).chain(entity.aliases.iter()) {
                let Some(pattern) = self.name_pattern(name) else {
                    continue;
                };
                for found in pattern.find_iter(text) {
                    mentions.push(Mention {
                        entity_id: entity.id.clone(),
                        confidence: 1.0,
                        matched_text: found.as_str().to_string(),
                    });
                }
            }
        }
        mentions
    }
}
