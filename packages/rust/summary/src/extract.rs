//! Best-effort score extraction from loosely structured source fields.
//!
//! The upstream schema is not stable, so extraction is a policy, not a
//! contract: find the first decimal number in a field, accept both
//! fractional (0–1) and percentage representations, and normalize to the
//! unit interval. Fields that yield nothing usable are skipped silently.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use benchbrief_shared::{RawRecord, Record};

/// Matches the first decimal number in a cell or JSON string.
static NUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)").expect("number regex"));

/// Parse a numeric score out of a raw field value.
///
/// Numbers pass through directly. Strings are scanned after stripping `%`
/// and thousands separators. Everything else yields `None`.
pub fn parse_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let cleaned = s.trim().replace(['%', ','], "");
            let caps = NUM_RE.captures(&cleaned)?;
            caps[1].parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Normalize a score to the unit interval.
///
/// Values in `(1, 100]` are treated as percentages.
pub fn normalize_unit(value: f64) -> f64 {
    if value > 1.0 && value <= 100.0 {
        value / 100.0
    } else {
        value
    }
}

/// Extract all usable records from one raw source row.
///
/// A row with an empty model name produces nothing. Fields without a
/// numeric value, or with a normalized score outside `0..=1`, are dropped
/// as absent data rather than errors.
pub fn extract_records(raw: &RawRecord) -> Vec<Record> {
    if raw.model.trim().is_empty() {
        debug!("skipping raw record with empty model name");
        return Vec::new();
    }

    let mut records = Vec::new();
    for (benchmark, value) in &raw.fields {
        let Some(parsed) = parse_score(value) else {
            continue;
        };
        let score = normalize_unit(parsed);
        if !(0.0..=1.0).contains(&score) {
            debug!(
                model = %raw.model,
                benchmark = %benchmark,
                score,
                "dropping implausible score"
            );
            continue;
        }
        records.push(Record {
            model: raw.model.trim().to_string(),
            benchmark: benchmark.clone(),
            score,
        });
    }
    records
}

/// Extract records from every raw row, applying the optional model-name
/// exclusion filter first.
pub fn extract_all(raws: &[RawRecord], exclude: Option<&Regex>) -> Vec<Record> {
    let mut records = Vec::new();
    for raw in raws {
        if let Some(re) = exclude {
            if re.is_match(&raw.model) {
                debug!(model = %raw.model, "excluded by pattern");
                continue;
            }
        }
        records.extend(extract_records(raw));
    }
    records
}
