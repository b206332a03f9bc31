//! Deterministic lexical-cue classifier.

use async_trait::async_trait;
use regex::RegexSet;

use cinequery_core::{CineError, ClassificationResult, Query, Result, Route};
use cinequery_session::ConversationState;

use crate::classify::Classifier;

/// Cues indicating quantitative or tabular intent.
const STRUCTURED_CUES: &[&str] = &[
    r"(?i)\bmost (rented|popular|watched|frequent)\b",
    r"(?i)\btop \d+\b",
    r"(?i)\bhow many\b",
    r"(?i)\brentals?\b",
    r"(?i)\brental counts?\b",
    r"(?i)\bratings?\b",
    r"(?i)\breleased?\b",
    r"(?i)\brelease year\b",
    r"(?i)\bcounts?\b",
    r"(?i)\brank(ed|ing)?\b",
    r"(?i)\b(longest|shortest|newest|oldest)\b",
    r"(?i)\binventory\b",
    r"(?i)\blanguage\b",
    r"(?i)\bwhen was\b",
    r"(?i)\bpopularity\b",
];

/// Cues indicating descriptive or content intent.
const SEMANTIC_CUES: &[&str] = &[
    r"(?i)\bplots?\b",
    r"(?i)\babout\b",
    r"(?i)\bsimilar to\b",
    r"(?i)\bthemes?\b",
    r"(?i)\bdescribe\b",
    r"(?i)\bstory\b",
    r"(?i)\binvolving\b",
    r"(?i)\bcharacters?\b",
    r"(?i)\brecommend\b",
    r"(?i)\bwho play(s|ed)\b",
    r"(?i)\bsummary\b",
];

/// The default confidence floor below which a decision routes both ways.
const DEFAULT_AMBIGUITY_THRESHOLD: f32 = 0.4;

/// A deterministic classifier over lexical cue sets.
///
/// Quantitative cues (counts, rankings, dates, ratings) pull toward the
/// structured backend, descriptive cues (plot, themes, "similar to") toward
/// the semantic one. Both cue classes present, no cues at all, or a
/// confidence below the ambiguity threshold all route both ways.
///
/// When a query carries no cues of its own but the conversation has prior
/// turns, the previous question's cues are consulted so short follow-ups
/// ("and the second most?") stay on the established route.
pub struct KeywordClassifier {
    structured: RegexSet,
    semantic: RegexSet,
    threshold: f32,
}

impl KeywordClassifier {
    /// Create a classifier with the built-in cue sets.
    ///
    /// # Errors
    ///
    /// Returns [`CineError::Config`] if a cue pattern fails to compile.
    pub fn new() -> Result<Self> {
        let structured = RegexSet::new(STRUCTURED_CUES)
            .map_err(|e| CineError::Config(format!("structured cue set: {e}")))?;
        let semantic = RegexSet::new(SEMANTIC_CUES)
            .map_err(|e| CineError::Config(format!("semantic cue set: {e}")))?;
        Ok(Self { structured, semantic, threshold: DEFAULT_AMBIGUITY_THRESHOLD })
    }

    /// Set the ambiguity threshold (clamped to `[0.0, 1.0]`).
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    fn cue_counts(&self, text: &str) -> (usize, usize) {
        (self.structured.matches(text).iter().count(), self.semantic.matches(text).iter().count())
    }

    fn decide(&self, text: &str) -> Option<ClassificationResult> {
        let (s, m) = self.cue_counts(text);
        match (s, m) {
            (0, 0) => None,
            (s, m) if s > 0 && m > 0 => {
                let hits = (s + m) as f32;
                Some(ClassificationResult::new(
                    Route::Both,
                    hits / (hits + 1.0),
                    format!("{s} quantitative and {m} descriptive cue(s)"),
                ))
            }
            (s, 0) => {
                let confidence = s as f32 / (s as f32 + 1.0);
                if confidence < self.threshold {
                    Some(ClassificationResult::new(
                        Route::Both,
                        confidence,
                        format!("{s} quantitative cue(s), below threshold"),
                    ))
                } else {
                    Some(ClassificationResult::new(
                        Route::Structured,
                        confidence,
                        format!("{s} quantitative cue(s)"),
                    ))
                }
            }
            (_, m) => {
                let confidence = m as f32 / (m as f32 + 1.0);
                if confidence < self.threshold {
                    Some(ClassificationResult::new(
                        Route::Both,
                        confidence,
                        format!("{m} descriptive cue(s), below threshold"),
                    ))
                } else {
                    Some(ClassificationResult::new(
                        Route::Semantic,
                        confidence,
                        format!("{m} descriptive cue(s)"),
                    ))
                }
            }
        }
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, query: &Query, history: &ConversationState) -> ClassificationResult {
        if let Some(result) = self.decide(query.trimmed()) {
            return result;
        }

        // Cue-less query: a follow-up inherits the previous question's route.
        if let Some(previous) = history.recent(1).next() {
            if let Some(inherited) = self.decide(previous.query.trimmed()) {
                if inherited.route != Route::Both {
                    return ClassificationResult::new(
                        inherited.route,
                        0.35,
                        "no cues; inherited route from previous turn",
                    );
                }
            }
        }

        ClassificationResult::new(Route::Both, 0.0, "no routing cues")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> ConversationState {
        ConversationState::default()
    }

    async fn route_of(text: &str) -> ClassificationResult {
        let classifier = KeywordClassifier::new().unwrap();
        classifier.classify(&Query::new(text, 0), &history()).await
    }

    #[tokio::test]
    async fn rental_ranking_routes_structured() {
        let result = route_of("What are the top 5 most rented comedy movies?").await;
        assert_eq!(result.route, Route::Structured);
        assert!(result.confidence >= 0.5, "confidence {}", result.confidence);
    }

    #[tokio::test]
    async fn plot_question_routes_semantic() {
        let result = route_of("Tell me about movies involving time travel").await;
        assert_eq!(result.route, Route::Semantic);
        assert!(result.confidence >= 0.5);
    }

    #[tokio::test]
    async fn mixed_cues_route_both() {
        let result =
            route_of("Find horror movies with high rental counts and describe their plots").await;
        assert_eq!(result.route, Route::Both);
    }

    #[tokio::test]
    async fn no_cues_route_both_with_zero_confidence() {
        let result = route_of("okay then").await;
        assert_eq!(result.route, Route::Both);
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn cueless_follow_up_inherits_previous_route() {
        use cinequery_session::Turn;

        let classifier = KeywordClassifier::new().unwrap();
        let mut history = ConversationState::default();
        history.append(Turn {
            query: Query::new("What are the most rented movies?", 0),
            answer: "Bucket Brotherhood leads with 34 rentals.".to_string(),
        });

        let result = classifier.classify(&Query::new("and in French?", 1), &history).await;
        assert_eq!(result.route, Route::Structured);
        assert!(result.reasoning.contains("previous turn"));
    }
}
