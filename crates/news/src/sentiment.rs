use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static BULLISH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(surg(e|es|ed|ing)|rall(y|ies|ied|ying)|gain(s|ed|ing)?|ris(e|es|ing)|rose|soar(s|ed|ing)?|jump(s|ed|ing)?|climb(s|ed|ing)?|high(s|er)?|record|up)\b",
    )
    .expect("bullish keyword pattern is valid")
});

static BEARISH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(fall(s|ing)?|fell|drop(s|ped|ping)?|slump(s|ed|ing)?|declin(e|es|ed|ing)|loss(es)?|los(e|es|ing)|low(s|er)?|plung(e|es|ed|ing)|slid(e|es|ing)?|tumbl(e|es|ed|ing)|down)\b",
    )
    .expect("bearish keyword pattern is valid")
});

/// Market tone of a headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Bullish => "Bullish",
            Sentiment::Bearish => "Bearish",
            Sentiment::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

/// Tags `text` by counting bullish and bearish keywords. Ties are neutral.
pub fn classify(text: &str) -> Sentiment {
    let bullish = BULLISH.find_iter(text).count();
    let bearish = BEARISH.find_iter(text).count();
    match bullish.cmp(&bearish) {
        std::cmp::Ordering::Greater => Sentiment::Bullish,
        std::cmp::Ordering::Less => Sentiment::Bearish,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Gold rallies to record high", Sentiment::Bullish)]
    #[case("Silver prices SURGE on industrial demand", Sentiment::Bullish)]
    #[case("Gold slides as dollar firms", Sentiment::Bearish)]
    #[case("Precious metals plunge after Fed minutes", Sentiment::Bearish)]
    #[case("Gold rises early, then falls back", Sentiment::Neutral)]
    #[case("Central banks publish quarterly reserve data", Sentiment::Neutral)]
    fn test_classify(#[case] text: &str, #[case] expected: Sentiment) {
        assert_eq!(classify(text), expected);
    }

    #[rstest]
    fn test_classify_matches_whole_words_only() {
        // "upstream" and "download" must not count as "up" and "down".
        assert_eq!(classify("Upstream miners download new reports"), Sentiment::Neutral);
    }
}
