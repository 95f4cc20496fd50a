use std::collections::HashSet;

use serde::Serialize;

use super::classify::ColumnClassification;
use crate::data::model::Dataset;

/// Shape of the dataset as shown on the overview tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub feature_count: usize,
    pub duplicate_row_count: usize,
    pub continuous_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
}

/// Rows minus distinct rows; a row is a duplicate only when every cell matches.
pub fn duplicate_row_count(dataset: &Dataset) -> usize {
    let mut seen = HashSet::with_capacity(dataset.row_count());
    let distinct = (0..dataset.row_count())
        .filter(|&i| seen.insert(dataset.row(i)))
        .count();
    dataset.row_count() - distinct
}

pub fn summarize(dataset: &Dataset, classification: &ColumnClassification) -> DatasetSummary {
    DatasetSummary {
        row_count: dataset.row_count(),
        feature_count: dataset.column_count(),
        duplicate_row_count: duplicate_row_count(dataset),
        continuous_columns: classification.continuous.clone(),
        categorical_columns: classification.categorical.clone(),
    }
}
