//! Lexicon-based sentiment scoring.
//!
//! Each known word carries a valence on a -4..=4 scale. Scores are adjusted
//! for boosters ("very"), negations ("not"), shouting (ALL CAPS words in
//! otherwise mixed text) and contrast ("but"), summed, and squashed into a
//! compound score in [-1, 1].

use serde::Serialize;
use std::fmt;

const POSITIVE_THRESHOLD: f64 = 0.05;
const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Normalisation constant; approximates the maximum expected raw sum.
const ALPHA: f64 = 15.0;
const BOOSTER_INCREMENT: f64 = 0.293;
const CAPS_INCREMENT: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;

const LEXICON: &[(&str, f64)] = &[
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("bad", -2.5),
    ("best", 3.2),
    ("bullish", 2.0),
    ("cool", 1.3),
    ("crash", -1.7),
    ("dead", -3.3),
    ("dump", -1.6),
    ("excellent", 2.7),
    ("fail", -2.5),
    ("fake", -2.1),
    ("fantastic", 2.6),
    ("fear", -2.2),
    ("fine", 0.8),
    ("fraud", -2.8),
    ("fun", 2.3),
    ("gain", 2.4),
    ("gains", 2.2),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("hate", -2.7),
    ("hope", 1.9),
    ("horrible", -2.5),
    ("like", 1.5),
    ("lose", -1.3),
    ("loss", -1.3),
    ("love", 3.2),
    ("moon", 1.0),
    ("nice", 1.8),
    ("panic", -2.3),
    ("poor", -2.1),
    ("profit", 1.9),
    ("rich", 2.6),
    ("rug", -1.5),
    ("rugged", -2.0),
    ("sad", -2.1),
    ("safe", 1.9),
    ("scam", -2.7),
    ("scared", -1.9),
    ("strong", 2.3),
    ("stupid", -2.4),
    ("terrible", -2.1),
    ("trash", -1.5),
    ("ugly", -2.3),
    ("weak", -1.9),
    ("win", 2.8),
    ("winning", 2.4),
    ("worst", -3.1),
    ("worthless", -1.9),
    ("wow", 2.8),
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOSTER_INCREMENT),
    ("extremely", BOOSTER_INCREMENT),
    ("hella", BOOSTER_INCREMENT),
    ("incredibly", BOOSTER_INCREMENT),
    ("really", BOOSTER_INCREMENT),
    ("so", BOOSTER_INCREMENT),
    ("super", BOOSTER_INCREMENT),
    ("totally", BOOSTER_INCREMENT),
    ("very", BOOSTER_INCREMENT),
    ("barely", -BOOSTER_INCREMENT),
    ("hardly", -BOOSTER_INCREMENT),
    ("kinda", -BOOSTER_INCREMENT),
    ("slightly", -BOOSTER_INCREMENT),
    ("somewhat", -BOOSTER_INCREMENT),
];

// Apostrophe-free spellings are listed because input is sanitized first.
const NEGATIONS: &[&str] = &[
    "aint", "cannot", "cant", "didnt", "doesnt", "dont", "isnt", "never", "no", "nope", "not",
    "nothing", "nowhere", "wasnt", "without", "wont", "wouldnt",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_compound(compound: f64) -> Self {
        if compound > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        };
        f.write_str(label)
    }
}

fn lookup(table: &[(&str, f64)], word: &str) -> Option<f64> {
    table.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

/// Compound polarity score of `text`, always within [-1, 1].
pub fn compound_score(text: &str) -> f64 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

    let is_shouted =
        |t: &str| t.chars().any(char::is_alphabetic) && !t.chars().any(char::is_lowercase);
    let shouted_count = tokens.iter().filter(|t| is_shouted(t)).count();
    let mixed_case = shouted_count > 0 && shouted_count < tokens.len();

    let mut valences: Vec<f64> = Vec::with_capacity(tokens.len());
    for (i, word) in lowered.iter().enumerate() {
        let Some(mut valence) = lookup(LEXICON, word) else {
            valences.push(0.0);
            continue;
        };

        if mixed_case && is_shouted(tokens[i]) {
            valence += CAPS_INCREMENT * valence.signum();
        }

        for back in 1..=3 {
            let Some(j) = i.checked_sub(back) else { break };
            let prev = lowered[j].as_str();
            if let Some(boost) = lookup(BOOSTERS, prev) {
                let damp = match back {
                    1 => 1.0,
                    2 => 0.95,
                    _ => 0.9,
                };
                valence += boost * valence.signum() * damp;
            }
            if NEGATIONS.contains(&prev) {
                valence *= NEGATION_SCALAR;
            }
        }

        valences.push(valence);
    }

    if let Some(pivot) = lowered.iter().position(|w| w == "but") {
        for (i, v) in valences.iter_mut().enumerate() {
            if i < pivot {
                *v *= 0.5;
            } else if i > pivot {
                *v *= 1.5;
            }
        }
    }

    let sum: f64 = valences.iter().sum();
    normalize(sum)
}

fn normalize(score: f64) -> f64 {
    let norm = score / (score * score + ALPHA).sqrt();
    norm.clamp(-1.0, 1.0)
}

pub fn analyze_sentiment(text: &str) -> SentimentLabel {
    SentimentLabel::from_compound(compound_score(text))
}
