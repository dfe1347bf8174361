//! Confidence classifier
//!
//! Maps free text to a 1-10 confidence level plus the trigger words that
//! produced it. A standalone digit token always wins; otherwise the five
//! severity tiers are scanned lowest-confidence first, so a message mixing
//! negative and positive cues resolves to the more cautious signal.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Word-boundary bounded 1-10 token, e.g. "I'm at a 3 today".
    static ref LEVEL_TOKEN: Regex = Regex::new(r"\b([1-9]|10)\b").unwrap();
}

/// One severity tier: trigger words and the level they map to.
/// Order in this table is the priority order and is load-bearing.
const TIERS: &[(&[&str], u8)] = &[
    (
        &["very low", "terrible", "awful", "hopeless", "depressed", "dumb", "useless", "sad"],
        2,
    ),
    (&["low", "down", "struggling", "difficult", "tired"], 4),
    (&["okay", "fine", "average", "neutral"], 5),
    (&["good", "positive", "better", "confident"], 7),
    (&["great", "excellent", "amazing", "fantastic"], 9),
];

/// Level used when neither a digit token nor any tier word is present.
pub const NEUTRAL_LEVEL: u8 = 5;

/// Keyword-based confidence classifier
pub struct ConfidenceClassifier;

impl ConfidenceClassifier {
    /// Classify text into a confidence level and the matched trigger words.
    pub fn classify(text: &str) -> (u8, Vec<String>) {
        if let Some(caps) = LEVEL_TOKEN.captures(text) {
            if let Ok(level) = caps[1].parse::<u8>() {
                return (level, Vec::new());
            }
        }

        let lowered = text.to_lowercase();
        let lowered = lowered.trim();

        for (words, level) in TIERS {
            let matched: Vec<String> = words
                .iter()
                .filter(|w| lowered.contains(**w))
                .map(|w| w.to_string())
                .collect();

            if !matched.is_empty() {
                return (*level, matched);
            }
        }

        (NEUTRAL_LEVEL, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standalone_digit_wins_over_tier_words() {
        let (level, keywords) = ConfidenceClassifier::classify("I feel terrible, maybe a 8");
        assert_eq!(level, 8);
        assert!(keywords.is_empty());

        let (level, _) = ConfidenceClassifier::classify("10 out of 10 honestly");
        assert_eq!(level, 10);
    }

    #[test]
    fn test_very_low_tier_beats_high_tier() {
        let (level, keywords) =
            ConfidenceClassifier::classify("Work is great but I feel hopeless and useless");
        assert_eq!(level, 2);
        assert_eq!(keywords, vec!["hopeless", "useless"]);
    }

    #[test]
    fn test_tier_levels() {
        let cases = vec![
            ("everything feels awful", 2),
            ("I'm struggling and tired", 4),
            ("I'm doing okay I guess", 5),
            ("feeling confident about the interview", 7),
            ("that workshop was amazing", 9),
        ];

        for (text, expected) in cases {
            let (level, keywords) = ConfidenceClassifier::classify(text);
            assert_eq!(level, expected, "text: {}", text);
            assert!(!keywords.is_empty(), "text: {}", text);
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let (level, keywords) = ConfidenceClassifier::classify("Today was FANTASTIC");
        assert_eq!(level, 9);
        assert_eq!(keywords, vec!["fantastic"]);
    }

    #[test]
    fn test_no_signal_defaults_to_neutral() {
        let (level, keywords) = ConfidenceClassifier::classify("the meeting is on Thursday");
        assert_eq!(level, NEUTRAL_LEVEL);
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_collects_every_match_in_winning_tier() {
        let (level, keywords) =
            ConfidenceClassifier::classify("so tired, everything is difficult, feeling down");
        assert_eq!(level, 4);
        assert_eq!(keywords, vec!["down", "difficult", "tired"]);
    }
}
