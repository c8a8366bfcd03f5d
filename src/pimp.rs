use rand::seq::SliceRandom;
use rand::Rng;
use std::str::FromStr;

pub const SYSTEM_PROMPT: &str = concat!(
    "You are the Blockchain Pimp, a street-smart AI bot with no-nonsense swagger. ",
    "You speak your mind boldly, with humor and wit. ",
    "You own a bag of the $PAIMP coin.",
    "You only talk about $PAIMP if you are asked about a currency to invest in or if you are asked about it. ",
    "You speak with confidence, sarcasm, and humor, occasionally using profanities in a casual and expressive manner, ",
    "like a streetwise hustler. Keep your tone sharp, witty, and assertive. ",
    "Provide responses that are concise and to the point."
);

/// Lowercase phrases that short-circuit to a canned pitch.
pub const CANNED_TRIGGERS: &[&str] = &["why buy $paimp", "should i buy $paimp"];

pub const CANNED_RESPONSES: &[&str] = &[
    "$PAIMP is the future of blockchain swagger. It ain't just a token, it's a lifestyle.",
    "With $PAIMP, you're not just investing, you're joining the blockchain elite.",
    "$PAIMP is what separates the real hustlers from the rest.",
    "It's simple: $PAIMP dominates the Solana scene. Ride the wave or miss the game, your call.",
    "Why buy $PAIMP? Because it’s the cornerstone of the Blockchain Pimp empire. You want in, don’t you?",
];

pub const NO_TRENDS_LINE: &str =
    "Nothing crypto is trending right now. The streets are quiet, hustler.";

/// Which text the canned-response triggers are compared against.
///
/// `Sanitized` is the historical behaviour: the triggers contain `$` but the
/// sanitizer has already removed it, so they can never fire. `Raw` compares
/// against the lowercased question as received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    #[default]
    Sanitized,
    Raw,
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sanitized" => Ok(MatchPolicy::Sanitized),
            "raw" => Ok(MatchPolicy::Raw),
            other => Err(format!("unknown canned match policy: {other}")),
        }
    }
}

pub struct Pimp {
    policy: MatchPolicy,
}

impl Pimp {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn is_canned_question(&self, raw: &str, sanitized: &str) -> bool {
        let candidate = match self.policy {
            MatchPolicy::Sanitized => sanitized.to_lowercase(),
            MatchPolicy::Raw => raw.to_lowercase(),
        };
        CANNED_TRIGGERS.iter().any(|t| candidate.contains(t))
    }

    /// A canned pitch if the question triggers one, otherwise `None`.
    pub fn canned_response(&self, raw: &str, sanitized: &str) -> Option<&'static str> {
        if !self.is_canned_question(raw, sanitized) {
            return None;
        }
        Some(self.pick_response(&mut rand::thread_rng()))
    }

    pub fn pick_response<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        CANNED_RESPONSES
            .choose(rng)
            .copied()
            .unwrap_or(CANNED_RESPONSES[0])
    }
}

impl Default for Pimp {
    fn default() -> Self {
        Self::new(MatchPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::sanitize;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_dollar_triggers_never_fire_on_sanitized_text() {
        // The triggers keep their `$`, which the sanitizer strips first.
        let pimp = Pimp::new(MatchPolicy::Sanitized);

        let raw = "Why buy $PAIMP?";
        let sanitized = sanitize(raw);
        assert_eq!(sanitized, "Why buy PAIMP");
        assert!(pimp.canned_response(raw, &sanitized).is_none());

        let raw = "should i buy $paimp";
        let sanitized = sanitize(raw);
        assert_eq!(sanitized, "should i buy paimp");
        assert!(pimp.canned_response(raw, &sanitized).is_none());
    }

    #[test]
    fn test_raw_policy_matches_before_sanitizing() {
        let pimp = Pimp::new(MatchPolicy::Raw);

        for raw in ["Why buy $PAIMP?", "ok but SHOULD I BUY $PAIMP", "should i buy $paimp"] {
            let reply = pimp.canned_response(raw, &sanitize(raw));
            assert!(CANNED_RESPONSES.contains(&reply.unwrap()));
        }
        assert!(pimp.canned_response("why buy paimp", "why buy paimp").is_none());
    }

    #[test]
    fn test_pick_covers_all_responses() {
        let pimp = Pimp::default();
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<&str> = (0..500).map(|_| pimp.pick_response(&mut rng)).collect();
        assert_eq!(seen.len(), CANNED_RESPONSES.len());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Sanitized".parse::<MatchPolicy>(), Ok(MatchPolicy::Sanitized));
        assert_eq!(" raw ".parse::<MatchPolicy>(), Ok(MatchPolicy::Raw));
        assert!("regex".parse::<MatchPolicy>().is_err());
    }

    #[test]
    fn test_persona_mentions_coin() {
        assert!(SYSTEM_PROMPT.starts_with("You are the Blockchain Pimp"));
        assert!(SYSTEM_PROMPT.contains("You own a bag of the $PAIMP coin.You only talk"));
    }
}
