//! Merge policy over adapter responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use cinequery_core::{
    AdapterResponse, CompositeRecord, MergedResult, ResponseStatus, ResultItem,
};

/// How titles present in both sources are handled during a dual merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Collapse a cross-source title match into one composite item carrying
    /// the structured record's quantitative fields and the semantic
    /// record's descriptive fields.
    #[default]
    CombineByTitle,
    /// List the structured and semantic records separately.
    KeepSeparate,
}

/// Fold a title into its cross-reference key: lowercased alphanumeric words
/// joined by single spaces, so "The  Bucket Brotherhood!" and "the bucket
/// brotherhood" match.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Merge for a single-backend route: items verbatim, degraded only on error.
///
/// An `Empty` response here is a clean no-result, not degradation — nothing
/// failed, the backend just had nothing relevant.
pub fn merge_single(response: AdapterResponse) -> MergedResult {
    let mut result = MergedResult {
        items: response.items,
        sources_used: Default::default(),
        degraded: response.status == ResponseStatus::Error,
    };
    if response.status == ResponseStatus::Ok {
        result.sources_used.insert(response.backend);
    }
    result
}

/// Merge for a dual-backend route.
///
/// Concatenates items preserving each source's internal order (structured
/// first), records every backend that returned `Ok` in `sources_used`, and
/// marks the result degraded whenever either response was not `Ok`. Both
/// backends erroring is the total-failure outcome: empty items, no sources,
/// degraded — never silently treated as success.
pub fn merge_dual(
    structured: AdapterResponse,
    semantic: AdapterResponse,
    policy: MergePolicy,
) -> MergedResult {
    let degraded =
        structured.status != ResponseStatus::Ok || semantic.status != ResponseStatus::Ok;

    let mut result = MergedResult { items: Vec::new(), sources_used: Default::default(), degraded };
    if structured.status == ResponseStatus::Ok {
        result.sources_used.insert(structured.backend);
    }
    if semantic.status == ResponseStatus::Ok {
        result.sources_used.insert(semantic.backend);
    }

    match policy {
        MergePolicy::KeepSeparate => {
            result.items = structured.items;
            result.items.extend(semantic.items);
        }
        MergePolicy::CombineByTitle => {
            result.items = combine_by_title(structured.items, semantic.items);
        }
    }
    result
}

/// Collapse cross-source title matches into composite items.
///
/// Composites take the structured item's position; unmatched semantic items
/// follow in their own order. Each semantic item is consumed at most once
/// (first matching structured row wins), and matching is cross-source only:
/// duplicates within one source pass through untouched.
fn combine_by_title(
    structured_items: Vec<ResultItem>,
    semantic_items: Vec<ResultItem>,
) -> Vec<ResultItem> {
    let mut semantic_slots: Vec<Option<ResultItem>> =
        semantic_items.into_iter().map(Some).collect();

    // First occurrence wins when the semantic set repeats a title.
    let mut by_title: HashMap<String, usize> = HashMap::new();
    for (i, slot) in semantic_slots.iter().enumerate() {
        if let Some(ResultItem::Semantic(rec)) = slot {
            by_title.entry(normalize_title(&rec.title)).or_insert(i);
        }
    }

    let mut merged = Vec::with_capacity(structured_items.len() + semantic_slots.len());

    for item in structured_items {
        let row = match item {
            ResultItem::Structured(row) => row,
            other => {
                merged.push(other);
                continue;
            }
        };
        if let Some(&i) = by_title.get(&normalize_title(&row.title)) {
            // An already-taken slot means the title matched a previous row;
            // further duplicates within the structured set pass through.
            if let Some(ResultItem::Semantic(sem)) = semantic_slots[i].take() {
                merged.push(ResultItem::Composite(CompositeRecord {
                    structured: row,
                    semantic: sem,
                }));
                continue;
            }
        }
        merged.push(ResultItem::Structured(row));
    }

    merged.extend(semantic_slots.into_iter().flatten());
    merged
}
