//! Core domain types for benchbrief summaries.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A benchmark category, assigned by keyword match against benchmark names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Coding,
    Math,
    Reasoning,
}

impl Category {
    /// All categories, in report order.
    pub const ALL: [Category; 3] = [Category::Coding, Category::Math, Category::Reasoning];

    /// Display label used in report sections.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Coding => "Coding",
            Category::Math => "Math",
            Category::Reasoning => "Reasoning",
        }
    }

    /// Built-in keyword list, used when the config does not override it.
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Coding => &[
                "humaneval",
                "livecodebench",
                "mbpp",
                "apps",
                "leetcode",
                "codeforces",
            ],
            Category::Math => &["aime", "gsm8k", "amc", "olympiad", "math"],
            Category::Reasoning => &[
                "gpqa",
                "mmlu",
                "mmlu-pro",
                "bbh",
                "mmmu",
                "ifeval",
                "arc-c",
                "hellaswag",
            ],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One loosely structured row from the data source.
///
/// The field shape is not contractually stable: field names are markdown
/// column headers or flattened JSON key paths, values are whatever the
/// source held in that position. Extraction decides what is usable.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// Resolved model display name.
    pub model: String,
    /// Candidate score fields, in source order.
    pub fields: Vec<(String, serde_json::Value)>,
}

/// One usable benchmark result after extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Model display name.
    pub model: String,
    /// Benchmark identifier the score came from (column header or key path).
    pub benchmark: String,
    /// Score normalized to the unit interval.
    pub score: f64,
}

/// A ranked (model, score) pair within one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub model: String,
    pub score: f64,
}

/// A category together with its top-N ranked entries (possibly empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub entries: Vec<RankedEntry>,
}
