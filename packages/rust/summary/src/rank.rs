//! Per-category ranking: best score per model, sorted descending, top N.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::HashMap;

use benchbrief_shared::{Category, CategorySummary, RankedEntry, Record};

/// Rank one category's working set.
///
/// Each model keeps its best score (first encounter wins ties), the result
/// is stable-sorted non-increasing by score, then truncated to `top_n`.
pub fn rank(records: &[Record], top_n: usize) -> Vec<RankedEntry> {
    // Best score per model, preserving first-encounter order.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<RankedEntry> = Vec::new();

    for record in records {
        match index.get(record.model.as_str()) {
            Some(&i) => {
                if record.score > entries[i].score {
                    entries[i].score = record.score;
                }
            }
            None => {
                index.insert(record.model.as_str(), entries.len());
                entries.push(RankedEntry {
                    model: record.model.clone(),
                    score: record.score,
                });
            }
        }
    }

    // Stable sort keeps encounter order for equal scores.
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    entries.truncate(top_n);
    entries
}

/// Rank every category bucket into report-ordered summaries.
///
/// Empty categories are kept so the report can render a placeholder.
pub fn summarize(
    buckets: &BTreeMap<Category, Vec<Record>>,
    top_n: usize,
) -> Vec<CategorySummary> {
    Category::ALL
        .into_iter()
        .map(|category| CategorySummary {
            category,
            entries: buckets.get(&category).map_or_else(Vec::new, |records| {
                rank(records, top_n)
            }),
        })
        .collect()
}
