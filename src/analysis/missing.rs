use serde::Serialize;

use crate::data::model::Dataset;

/// Missing-cell count for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEntry {
    pub column: String,
    pub missing: usize,
    pub fraction: f64,
}

/// Missing counts for every column, in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissingProfile {
    pub row_count: usize,
    pub entries: Vec<MissingEntry>,
}

impl MissingProfile {
    pub fn get(&self, column: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| e.missing)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.missing).sum()
    }
}

pub(crate) fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

pub fn profile_missing(dataset: &Dataset) -> MissingProfile {
    let row_count = dataset.row_count();
    let entries = dataset
        .columns()
        .iter()
        .map(|col| {
            let missing = col.missing_count();
            MissingEntry {
                column: col.name.clone(),
                missing,
                fraction: fraction(missing, row_count),
            }
        })
        .collect();

    MissingProfile { row_count, entries }
}
