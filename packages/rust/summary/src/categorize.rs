//! Keyword-based categorization of extracted records.

use std::collections::BTreeMap;

use benchbrief_shared::{Category, Record, SummaryConfig};

/// Lowercased keyword lists per category, resolved once per run.
#[derive(Debug, Clone)]
pub struct CategoryKeywords {
    keywords: BTreeMap<Category, Vec<String>>,
}

impl CategoryKeywords {
    /// Resolve keyword lists from config (built-ins where not overridden).
    pub fn from_config(config: &SummaryConfig) -> Self {
        let keywords = Category::ALL
            .into_iter()
            .map(|cat| {
                let kws = config
                    .keywords_for(cat)
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .collect();
                (cat, kws)
            })
            .collect();
        Self { keywords }
    }

    /// Categories whose keywords match the benchmark identifier
    /// (case-insensitive substring match).
    pub fn matches(&self, benchmark: &str) -> Vec<Category> {
        let haystack = benchmark.to_lowercase();
        self.keywords
            .iter()
            .filter(|(_, kws)| kws.iter().any(|kw| haystack.contains(kw.as_str())))
            .map(|(cat, _)| *cat)
            .collect()
    }
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        Self::from_config(&SummaryConfig::default())
    }
}

/// Bucket records into category working sets, preserving encounter order.
///
/// A record may land in several categories or in none. Every category is
/// present in the result, empty or not.
pub fn categorize(records: &[Record], keywords: &CategoryKeywords) -> BTreeMap<Category, Vec<Record>> {
    let mut buckets: BTreeMap<Category, Vec<Record>> =
        Category::ALL.into_iter().map(|c| (c, Vec::new())).collect();

    for record in records {
        for cat in keywords.matches(&record.benchmark) {
            buckets
                .entry(cat)
                .or_default()
                .push(record.clone());
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(model: &str, benchmark: &str, score: f64) -> Record {
        Record {
            model: model.into(),
            benchmark: benchmark.into(),
            score,
        }
    }

    #[test]
    fn matches_are_case_insensitive() {
        let kw = CategoryKeywords::default();
        assert_eq!(kw.matches("benchmarks.HumanEval.pass@1"), [Category::Coding]);
        assert_eq!(kw.matches("AIME 2024"), [Category::Math]);
        assert_eq!(kw.matches("GPQA Diamond"), [Category::Reasoning]);
    }

    #[test]
    fn unknown_benchmarks_match_nothing() {
        let kw = CategoryKeywords::default();
        assert!(kw.matches("context window").is_empty());
    }

    #[test]
    fn a_record_can_land_in_two_categories() {
        // "math" keyword and "mmlu" keyword both appear in the key path
        let kw = CategoryKeywords::default();
        let cats = kw.matches("benchmarks.mmlu.math.acc");
        assert!(cats.contains(&Category::Math));
        assert!(cats.contains(&Category::Reasoning));
    }

    #[test]
    fn every_category_is_present_even_when_empty() {
        let kw = CategoryKeywords::default();
        let records = vec![record("A", "humaneval", 0.9)];
        let buckets = categorize(&records, &kw);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[&Category::Coding].len(), 1);
        assert!(buckets[&Category::Math].is_empty());
        assert!(buckets[&Category::Reasoning].is_empty());
    }

    #[test]
    fn encounter_order_is_preserved() {
        let kw = CategoryKeywords::default();
        let records = vec![
            record("B", "humaneval", 0.87),
            record("A", "mbpp", 0.93),
        ];
        let buckets = categorize(&records, &kw);
        let coding = &buckets[&Category::Coding];
        assert_eq!(coding[0].model, "B");
        assert_eq!(coding[1].model, "A");
    }

    #[test]
    fn configured_keywords_replace_builtins() {
        let mut config = SummaryConfig::default();
        config.keywords.coding = vec!["SWE-Bench".into()];
        let kw = CategoryKeywords::from_config(&config);
        assert_eq!(kw.matches("swe-bench verified"), [Category::Coding]);
        assert!(kw.matches("humaneval").is_empty());
    }
}
