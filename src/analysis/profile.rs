//! Per-column profiling for the "Individual Column Stats" tab.
//!
//! Continuous columns get the usual `describe()` record plus a histogram;
//! categorical columns get a frequency table in which missing cells are
//! counted under a literal label. The fill happens on a derived copy of
//! the column so the session's dataset is never touched.

use std::collections::HashMap;

use serde::Serialize;

use super::classify::ColumnClassification;
use super::missing::fraction;
use crate::data::model::{Column, Dataset, Value};
use crate::error::{ColumnKind, EdaError, EdaResult};

/// Descriptive statistics of a continuous column, over non-missing cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuousStats {
    pub column: String,
    pub count: usize,
    pub missing_count: usize,
    pub missing_fraction: f64,
    pub mean: f64,
    /// Sample standard deviation (n − 1).
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

/// Distinct value → occurrence count, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrequencyTable {
    pub entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalProfile {
    pub column: String,
    pub count: usize,
    pub missing_count: usize,
    pub missing_fraction: f64,
    pub frequencies: FrequencyTable,
}

/// Equal-width bins; `edges` has one more entry than `counts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

/// Linear-interpolation quantile of an ascending slice; NaN when empty.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (mean, f64::NAN);
    }
    let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (mean, var.sqrt())
}

fn continuous_column<'a>(
    dataset: &'a Dataset,
    classification: &ColumnClassification,
    column: &str,
) -> EdaResult<&'a Column> {
    classification.require(dataset, column, ColumnKind::Continuous)?;
    dataset
        .column(column)
        .ok_or_else(|| EdaError::unknown_column(column))
}

// ---------------------------------------------------------------------------
// Continuous columns
// ---------------------------------------------------------------------------

pub fn describe_continuous(
    dataset: &Dataset,
    classification: &ColumnClassification,
    column: &str,
) -> EdaResult<ContinuousStats> {
    let col = continuous_column(dataset, classification, column)?;

    let mut values = col.numeric_values();
    values.sort_by(f64::total_cmp);

    let missing_count = dataset.row_count() - values.len();
    let (mean, std) = mean_and_std(&values);

    Ok(ContinuousStats {
        column: col.name.clone(),
        count: values.len(),
        missing_count,
        missing_fraction: fraction(missing_count, dataset.row_count()),
        mean,
        std,
        min: values.first().copied().unwrap_or(f64::NAN),
        max: values.last().copied().unwrap_or(f64::NAN),
        p25: quantile(&values, 0.25),
        p50: quantile(&values, 0.50),
        p75: quantile(&values, 0.75),
    })
}

pub fn histogram(
    dataset: &Dataset,
    classification: &ColumnClassification,
    column: &str,
    bins: usize,
) -> EdaResult<Histogram> {
    let col = continuous_column(dataset, classification, column)?;
    let values = col.numeric_values();
    if values.is_empty() || bins == 0 {
        return Ok(Histogram::default());
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // A constant column still gets a bin of unit width around its value.
    let (lo, hi) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    let width = (hi - lo) / bins as f64;

    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(Histogram { edges, counts })
}

// ---------------------------------------------------------------------------
// Categorical columns
// ---------------------------------------------------------------------------

/// Derived copy of `column` with every missing cell replaced by `label`.
pub fn fill_missing(column: &Column, label: &str) -> Vec<Value> {
    column
        .values
        .iter()
        .map(|v| {
            if v.is_missing() {
                Value::Text(label.to_string())
            } else {
                v.clone()
            }
        })
        .collect()
}

pub fn frequency_table(values: &[Value]) -> FrequencyTable {
    let mut index: HashMap<&Value, usize> = HashMap::new();
    let mut entries: Vec<(String, usize)> = Vec::new();
    for v in values {
        match index.get(v) {
            Some(&i) => entries[i].1 += 1,
            None => {
                index.insert(v, entries.len());
                entries.push((v.to_string(), 1));
            }
        }
    }
    FrequencyTable { entries }
}

pub fn describe_categorical(
    dataset: &Dataset,
    classification: &ColumnClassification,
    column: &str,
    missing_label: &str,
) -> EdaResult<CategoricalProfile> {
    classification.require(dataset, column, ColumnKind::Categorical)?;
    let col = dataset
        .column(column)
        .ok_or_else(|| EdaError::unknown_column(column))?;

    let missing_count = col.missing_count();
    let filled = fill_missing(col, missing_label);

    Ok(CategoricalProfile {
        column: col.name.clone(),
        count: dataset.row_count() - missing_count,
        missing_count,
        missing_fraction: fraction(missing_count, dataset.row_count()),
        frequencies: frequency_table(&filled),
    })
}
