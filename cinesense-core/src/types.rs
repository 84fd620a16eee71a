//! Core type definitions for CineSense.
//!
//! Defines the shared vocabulary used by every other component: the
//! sentiment scale, the review record, and grounding citations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Overall reception of a movie, ordered from most positive to most negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "Very Positive")]
    VeryPositive,
    #[serde(rename = "Positive")]
    Positive,
    #[serde(rename = "Mixed")]
    Mixed,
    #[serde(rename = "Negative")]
    Negative,
    #[serde(rename = "Very Negative")]
    VeryNegative,
}

impl Sentiment {
    /// All sentiments, most positive first.
    pub const ALL: [Sentiment; 5] = [
        Sentiment::VeryPositive,
        Sentiment::Positive,
        Sentiment::Mixed,
        Sentiment::Negative,
        Sentiment::VeryNegative,
    ];

    /// The display label, identical to the wire value.
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::VeryPositive => "Very Positive",
            Sentiment::Positive => "Positive",
            Sentiment::Mixed => "Mixed",
            Sentiment::Negative => "Negative",
            Sentiment::VeryNegative => "Very Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a label is not one of the five sentiments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized sentiment label '{0}'")]
pub struct UnknownSentiment(pub String);

impl FromStr for Sentiment {
    type Err = UnknownSentiment;

    /// Accepts the display labels regardless of case, and tolerates `_` or `-`
    /// in place of the space (`VERY_POSITIVE`, `very-negative`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        match normalized.as_str() {
            "very positive" => Ok(Sentiment::VeryPositive),
            "positive" => Ok(Sentiment::Positive),
            "mixed" => Ok(Sentiment::Mixed),
            "negative" => Ok(Sentiment::Negative),
            "very negative" => Ok(Sentiment::VeryNegative),
            _ => Err(UnknownSentiment(s.to_string())),
        }
    }
}

/// The validated result of analyzing one movie title.
///
/// Serialized with the same field names the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "movieName")]
    pub title: String,
    #[serde(rename = "overallSentiment")]
    pub sentiment: Sentiment,
    pub emotions: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    #[serde(rename = "reviewText")]
    pub narrative: String,
    /// Expected on a 0-5 scale; the model's value is passed through as is.
    pub rating: f64,
    #[serde(rename = "releaseYear", default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

/// A web citation returned alongside a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// Everything one successful analysis produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub review: Review,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_review() -> Review {
        Review {
            title: "Interstellar".into(),
            sentiment: Sentiment::Positive,
            emotions: vec!["wonder".into(), "awe".into()],
            strengths: vec!["visuals".into(), "score".into()],
            weaknesses: vec!["pacing".into()],
            narrative: "A sweeping space epic.".into(),
            rating: 4.2,
            release_year: Some("2014".into()),
            genre: Some("Sci-Fi".into()),
        }
    }

    #[test]
    fn test_sentiment_labels() {
        assert_eq!(Sentiment::VeryPositive.label(), "Very Positive");
        assert_eq!(Sentiment::Mixed.to_string(), "Mixed");
        assert_eq!(Sentiment::VeryNegative.label(), "Very Negative");
    }

    #[test]
    fn test_sentiment_parse_display_labels() {
        for sentiment in Sentiment::ALL {
            assert_eq!(sentiment.label().parse::<Sentiment>(), Ok(sentiment));
        }
    }

    #[test]
    fn test_sentiment_parse_lenient() {
        assert_eq!("VERY_POSITIVE".parse(), Ok(Sentiment::VeryPositive));
        assert_eq!("  very-negative ".parse(), Ok(Sentiment::VeryNegative));
        assert_eq!("Very   Positive".parse(), Ok(Sentiment::VeryPositive));
        assert_eq!("mixed".parse(), Ok(Sentiment::Mixed));
    }

    #[test]
    fn test_sentiment_parse_unknown() {
        let err = "Ecstatic".parse::<Sentiment>().unwrap_err();
        assert_eq!(err, UnknownSentiment("Ecstatic".into()));
        assert!("".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_sentiment_serde_uses_labels() {
        let json = serde_json::to_string(&Sentiment::VeryNegative).unwrap();
        assert_eq!(json, "\"Very Negative\"");
        let back: Sentiment = serde_json::from_str("\"Positive\"").unwrap();
        assert_eq!(back, Sentiment::Positive);
    }

    #[test]
    fn test_review_wire_field_names() {
        let json = serde_json::to_value(sample_review()).unwrap();
        assert_eq!(json["movieName"], "Interstellar");
        assert_eq!(json["overallSentiment"], "Positive");
        assert_eq!(json["reviewText"], "A sweeping space epic.");
        assert_eq!(json["releaseYear"], "2014");
        assert_eq!(json["rating"], 4.2);
    }

    #[test]
    fn test_review_omits_missing_optionals() {
        let mut review = sample_review();
        review.release_year = None;
        review.genre = None;
        let json = serde_json::to_value(review).unwrap();
        assert!(json.get("releaseYear").is_none());
        assert!(json.get("genre").is_none());
    }
}
