//! Advisory text classification: keyword-gated entity extraction plus
//! sentiment. Results are logged by the pipeline and never change a reply.

use crate::error::ClassificationError;
use crate::sentiment::{analyze_sentiment, SentimentLabel};
use serde::Serialize;
use tracing::warn;

/// The recognizer only runs when one of these appears (case-insensitive).
const TRIGGER_KEYWORDS: &[&str] = &["crypto", "blockchain", "$"];

const COINS: &[&str] = &[
    "bitcoin", "btc", "doge", "dogecoin", "eth", "ether", "ethereum", "paimp", "pepe", "sol",
    "solana", "usdc", "usdt", "xrp",
];

const ORGS: &[&str] = &[
    "binance", "coinbase", "kraken", "metamask", "opensea", "phantom", "raydium", "uniswap",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityExtraction {
    pub entities: Vec<Entity>,
}

pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, ClassificationError>;
}

/// Rule-based recognizer: known coin and exchange names, `$TICKER` symbols,
/// percentages and plain numbers.
pub struct GazetteerRecognizer {
    patterns: Vec<(regex_lite::Regex, &'static str)>,
}

impl GazetteerRecognizer {
    pub fn new() -> Self {
        let table: [(&str, &'static str); 3] = [
            (r"\$[A-Za-z][A-Za-z0-9]{1,9}\b", "TICKER"),
            (r"\b\d+(?:\.\d+)?\s?(?:%|percent\b)", "PERCENT"),
            (r"\b\d+(?:\.\d+)?\b", "CARDINAL"),
        ];

        let patterns = table
            .into_iter()
            .filter_map(|(pattern, label)| match regex_lite::Regex::new(pattern) {
                Ok(re) => Some((re, label)),
                Err(e) => {
                    warn!("Classifier: skipping entity pattern {}: {}", label, e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }
}

impl Default for GazetteerRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRecognizer for GazetteerRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, ClassificationError> {
        let mut entities = Vec::new();
        let mut claimed: Vec<(usize, usize)> = Vec::new();

        for (re, label) in &self.patterns {
            for m in re.find_iter(text) {
                let overlaps = claimed
                    .iter()
                    .any(|&(start, end)| m.start() < end && start < m.end());
                if overlaps {
                    continue;
                }
                claimed.push((m.start(), m.end()));
                entities.push(Entity {
                    text: m.as_str().trim().to_string(),
                    label: label.to_string(),
                });
            }
        }

        for word in text.split_whitespace() {
            let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
            let lower = bare.to_lowercase();
            let label = if COINS.contains(&lower.as_str()) {
                "CRYPTO"
            } else if ORGS.contains(&lower.as_str()) {
                "ORG"
            } else {
                continue;
            };
            entities.push(Entity {
                text: bare.to_string(),
                label: label.to_string(),
            });
        }

        Ok(entities)
    }
}

/// Runs `recognizer` only when `text` mentions a trigger keyword.
/// Recognizer failures are logged and yield an empty extraction.
pub fn extract_entities(recognizer: &dyn EntityRecognizer, text: &str) -> EntityExtraction {
    let lower = text.to_lowercase();
    if !TRIGGER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return EntityExtraction::default();
    }

    match recognizer.recognize(text) {
        Ok(entities) => EntityExtraction { entities },
        Err(e) => {
            warn!("Classifier: {}", e);
            EntityExtraction::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub entities: EntityExtraction,
    pub sentiment: SentimentLabel,
}

pub struct Classifier {
    recognizer: Box<dyn EntityRecognizer>,
}

impl Classifier {
    pub fn new(recognizer: Box<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }

    pub fn classify(&self, text: &str) -> Classification {
        Classification {
            entities: extract_entities(self.recognizer.as_ref(), text),
            sentiment: analyze_sentiment(text),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Box::new(GazetteerRecognizer::new()))
    }
}
