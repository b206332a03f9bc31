//! Composer fallback and grounding tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use cinequery_chat::{Composer, ComposerConfig, INSUFFICIENT_ANSWER};
use cinequery_core::{
    BackendKind, CompositeRecord, MergedResult, MockGenerator, Query, ResultItem, SemanticRecord,
    StructuredRecord,
};
use cinequery_session::ConversationState;

fn structured(title: &str, rentals: u64) -> StructuredRecord {
    StructuredRecord {
        title: title.to_string(),
        rental_count: Some(rentals),
        rating: Some("R".to_string()),
        release_year: Some(2006),
        language: Some("English".to_string()),
    }
}

fn semantic(title: &str, excerpt: &str) -> SemanticRecord {
    SemanticRecord {
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        similarity_score: 0.8,
        release_year: Some(2006),
        genres: Some("Horror".to_string()),
        actors: None,
    }
}

fn merged_with(items: Vec<ResultItem>) -> MergedResult {
    let mut sources_used = BTreeSet::new();
    for item in &items {
        sources_used.extend(item.sources().iter().copied());
    }
    MergedResult { items, sources_used, degraded: false }
}

fn query(text: &str) -> Query {
    Query::new(text, 0)
}

#[tokio::test]
async fn empty_results_get_the_fixed_insufficiency_answer() {
    let composer = Composer::new(Arc::new(MockGenerator::replying("ignored")));
    let answer = composer
        .compose(&query("anything"), &MergedResult::total_failure(), &ConversationState::default())
        .await;

    assert_eq!(answer.text, INSUFFICIENT_ANSWER);
    assert!(answer.degraded);
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn generator_reply_becomes_the_answer() {
    let generator = Arc::new(MockGenerator::replying("Zombie Halloween leads with 31 rentals."));
    let composer = Composer::new(Arc::clone(&generator) as _);

    let merged = merged_with(vec![ResultItem::Structured(structured("Zombie Halloween", 31))]);
    let answer = composer
        .compose(&query("most rented horror?"), &merged, &ConversationState::default())
        .await;

    assert_eq!(answer.text, "Zombie Halloween leads with 31 rentals.");
    assert!(answer.sources.contains(&BackendKind::Structured));

    // The grounding prompt carried the digest and the original question.
    let prompt = &generator.prompts()[0];
    assert!(prompt.contains("Zombie Halloween"));
    assert!(prompt.contains("31 rentals"));
    assert!(prompt.contains("most rented horror?"));
}

#[tokio::test]
async fn generator_failure_falls_back_to_the_templated_listing() {
    let composer = Composer::new(Arc::new(MockGenerator::failing("rate limited")));

    let merged = merged_with(vec![
        ResultItem::Structured(structured("Zombie Halloween", 31)),
        ResultItem::Semantic(semantic("Chamber Italian", "time travel and regret")),
    ]);
    let answer =
        composer.compose(&query("tell me things"), &merged, &ConversationState::default()).await;

    assert!(answer.text.contains("Zombie Halloween"));
    assert!(answer.text.contains("31 rentals"));
    assert!(answer.text.contains("Chamber Italian"));
    assert!(answer.text.contains("time travel and regret"));
}

#[tokio::test]
async fn blank_reply_fails_validation_and_falls_back() {
    let composer = Composer::new(Arc::new(MockGenerator::replying("   ")));

    let merged = merged_with(vec![ResultItem::Structured(structured("Zombie Halloween", 31))]);
    let answer =
        composer.compose(&query("most rented?"), &merged, &ConversationState::default()).await;

    assert!(answer.text.starts_with("Here is what the movie catalog shows"));
}

#[tokio::test]
async fn overlong_reply_fails_validation_and_falls_back() {
    let generator = Arc::new(MockGenerator::replying("x".repeat(100)));
    let composer = Composer::new(generator)
        .with_config(ComposerConfig { max_reply_chars: 10, ..ComposerConfig::default() });

    let merged = merged_with(vec![ResultItem::Structured(structured("Zombie Halloween", 31))]);
    let answer =
        composer.compose(&query("most rented?"), &merged, &ConversationState::default()).await;

    assert!(answer.text.starts_with("Here is what the movie catalog shows"));
}

#[tokio::test]
async fn composite_items_surface_both_halves_in_the_digest() {
    let generator = Arc::new(MockGenerator::failing("down"));
    let composer = Composer::new(generator);

    let merged = merged_with(vec![ResultItem::Composite(CompositeRecord {
        structured: structured("Zombie Halloween", 31),
        semantic: semantic("Zombie Halloween", "a small town fends off the undead"),
    })]);
    let answer =
        composer.compose(&query("horror rentals?"), &merged, &ConversationState::default()).await;

    assert!(answer.text.contains("31 rentals"));
    assert!(answer.text.contains("a small town fends off the undead"));
}
