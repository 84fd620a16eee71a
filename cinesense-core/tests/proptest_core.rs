//! Property-based tests for core components using proptest.

use proptest::prelude::*;

use cinesense_core::analysis::parse_review;
use cinesense_core::present::{BadgeTone, badge_tone, sentiment_distribution};
use cinesense_core::shell::{Command, HISTORY_LIMIT, ShellEvent, ShellState};
use cinesense_core::types::{Analysis, Review, Sentiment};
use std::sync::Arc;

fn analysis(title: &str) -> Analysis {
    Analysis {
        review: Review {
            title: title.to_string(),
            sentiment: Sentiment::Mixed,
            emotions: vec![],
            strengths: vec![],
            weaknesses: vec![],
            narrative: "n".to_string(),
            rating: 2.5,
            release_year: None,
            genre: None,
        },
        sources: vec![],
    }
}

/// Run one successful analysis for `title` through the reducer.
fn analyze(state: &mut ShellState, title: &str) {
    state.apply(ShellEvent::QueryChanged(title.to_string()));
    if let Some(Command::Analyze { request_id, .. }) = state.apply(ShellEvent::Submit) {
        state.apply(ShellEvent::AnalysisSucceeded {
            request_id,
            analysis: analysis(title),
        });
    }
}

// --- History properties ---

proptest! {
    #[test]
    fn history_is_capped_and_most_recent_first(count in 0usize..30) {
        let mut state = ShellState::new();
        for i in 0..count {
            analyze(&mut state, &format!("Movie {}", i));
        }
        let history = state.history();
        prop_assert_eq!(history.len(), count.min(HISTORY_LIMIT));
        for (pos, entry) in history.iter().enumerate() {
            let expected = format!("Movie {}", count - 1 - pos);
            prop_assert_eq!(&entry.review.title, &expected);
        }
    }

    #[test]
    fn select_history_never_reorders(count in 1usize..15, pick in 0usize..20) {
        let mut state = ShellState::new();
        for i in 0..count {
            analyze(&mut state, &format!("Movie {}", i));
        }
        let before: Vec<String> = state.history().iter().map(|e| e.review.title.clone()).collect();
        state.apply(ShellEvent::SelectHistory(pick));
        let after: Vec<String> = state.history().iter().map(|e| e.review.title.clone()).collect();
        prop_assert_eq!(&before, &after);

        if let Some(entry) = state.history().get(pick) {
            prop_assert!(Arc::ptr_eq(state.current().unwrap(), &entry.review));
            prop_assert_eq!(state.query(), entry.review.title.as_str());
        }
    }
}

// --- Submit guard properties ---

proptest! {
    #[test]
    fn whitespace_query_never_submits(query in "[ \t\n\r]{0,20}") {
        let mut state = ShellState::new();
        state.apply(ShellEvent::QueryChanged(query));
        prop_assert!(state.apply(ShellEvent::Submit).is_none());
        prop_assert!(!state.in_flight());
    }

    #[test]
    fn pending_blocks_further_submits(title in "[A-Za-z][A-Za-z0-9 ]{0,30}", repeats in 1usize..5) {
        let mut state = ShellState::new();
        state.apply(ShellEvent::QueryChanged(title));
        prop_assert!(state.apply(ShellEvent::Submit).is_some());
        for _ in 0..repeats {
            prop_assert!(state.apply(ShellEvent::Submit).is_none());
        }
    }
}

// --- Presentation and parsing properties ---

proptest! {
    #[test]
    fn unknown_labels_fall_back(label in "[a-z]{1,12}") {
        prop_assume!(label.parse::<Sentiment>().is_err());
        prop_assert_eq!(badge_tone(&label), BadgeTone::Slate);
        prop_assert!(sentiment_distribution(&label).is_empty());
    }

    #[test]
    fn sentiment_parse_is_case_insensitive(idx in 0usize..5, upper in any::<bool>()) {
        let sentiment = Sentiment::ALL[idx];
        let label = if upper {
            sentiment.label().to_uppercase()
        } else {
            sentiment.label().to_lowercase()
        };
        prop_assert_eq!(label.parse::<Sentiment>().unwrap(), sentiment);
    }

    #[test]
    fn parse_review_never_panics(text in ".{0,200}") {
        let _ = parse_review(&text);
    }

    #[test]
    fn rating_passes_through(rating in -10.0f64..10.0) {
        let payload = serde_json::json!({
            "movieName": "Heat",
            "overallSentiment": "Mixed",
            "emotions": [],
            "strengths": [],
            "weaknesses": [],
            "reviewText": "ok",
            "rating": rating
        });
        let review = parse_review(&payload.to_string()).unwrap();
        prop_assert_eq!(review.rating, rating);
    }
}
