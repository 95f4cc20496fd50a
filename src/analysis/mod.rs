/// Analysis layer: everything the dashboard computes from a loaded dataset.
///
/// Architecture:
/// ```text
///   Dataset ──► classify ──► ColumnClassification
///      │                          │
///      ├──────────────┬───────────┼──────────────┬───────────────┐
///      ▼              ▼           ▼              ▼               ▼
///   summary      correlation   profile     relationship      missing
///   (shape,      (Pearson on   (describe,   (x/y/group       (per-column
///   duplicates)  continuous)   frequencies) scatter series)  NA counts)
/// ```
///
/// [`EdaSession`] binds one dataset to its classification and config and
/// exposes every component as a request/response call.

pub mod classify;
pub mod correlation;
pub mod missing;
pub mod profile;
pub mod relationship;
pub mod summary;

use serde::Serialize;

use crate::data::model::Dataset;
use crate::error::EdaResult;
use classify::ColumnClassification;
use correlation::CorrelationMatrix;
use missing::MissingProfile;
use profile::{CategoricalProfile, ContinuousStats, Histogram};
use relationship::Relationship;
use summary::DatasetSummary;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// A numeric column needs more distinct values than this to be continuous.
    pub cardinality_threshold: usize,
    pub histogram_bins: usize,
    /// Category used for missing cells in frequency tables.
    pub missing_label: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cardinality_threshold: 25,
            histogram_bins: 50,
            missing_label: "Missing".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session context
// ---------------------------------------------------------------------------

/// Everything exported from the overview tab.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub summary: DatasetSummary,
    pub correlation: CorrelationMatrix,
    pub missing: MissingProfile,
}

/// One uploaded dataset and its classification. Never mutated after
/// construction; every method only borrows.
#[derive(Debug, Clone)]
pub struct EdaSession {
    dataset: Dataset,
    classification: ColumnClassification,
    config: AnalysisConfig,
}

impl EdaSession {
    pub fn new(dataset: Dataset, config: AnalysisConfig) -> Self {
        let classification = classify::classify(&dataset, config.cardinality_threshold);
        Self {
            dataset,
            classification,
            config,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn classification(&self) -> &ColumnClassification {
        &self.classification
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn summarize(&self) -> DatasetSummary {
        summary::summarize(&self.dataset, &self.classification)
    }

    pub fn correlate(&self) -> CorrelationMatrix {
        correlation::correlate(&self.dataset, &self.classification.continuous)
    }

    pub fn profile_missing(&self) -> MissingProfile {
        missing::profile_missing(&self.dataset)
    }

    pub fn overview(&self) -> OverviewReport {
        OverviewReport {
            summary: self.summarize(),
            correlation: self.correlate(),
            missing: self.profile_missing(),
        }
    }

    pub fn describe_continuous(&self, column: &str) -> EdaResult<ContinuousStats> {
        profile::describe_continuous(&self.dataset, &self.classification, column)
    }

    pub fn histogram(&self, column: &str) -> EdaResult<Histogram> {
        profile::histogram(
            &self.dataset,
            &self.classification,
            column,
            self.config.histogram_bins,
        )
    }

    pub fn describe_categorical(&self, column: &str) -> EdaResult<CategoricalProfile> {
        profile::describe_categorical(
            &self.dataset,
            &self.classification,
            column,
            &self.config.missing_label,
        )
    }

    pub fn extract_relationship(
        &self,
        x_column: &str,
        y_column: &str,
        group_column: Option<&str>,
    ) -> EdaResult<Relationship> {
        relationship::extract_relationship(
            &self.dataset,
            &self.classification,
            x_column,
            y_column,
            group_column,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn session() -> EdaSession {
        let mut csv = String::from("passenger,age,sex,survived\n");
        for i in 0..40 {
            let sex = match i % 4 {
                0 | 3 => "M",
                1 => "F",
                _ => "",
            };
            csv.push_str(&format!("{i},{},{sex},{}\n", 18 + i, i % 2));
        }
        // Exact copy of the first row.
        csv.push_str("0,18,M,0\n");
        EdaSession::new(read_csv(csv.as_bytes()).unwrap(), AnalysisConfig::default())
    }

    #[test]
    fn test_session_end_to_end() {
        let s = session();
        assert_eq!(s.classification().continuous, vec!["passenger", "age"]);
        assert_eq!(s.classification().categorical, vec!["sex", "survived"]);

        let summary = s.summarize();
        assert_eq!(summary.row_count, 41);
        assert_eq!(summary.feature_count, 4);
        assert_eq!(summary.duplicate_row_count, 1);

        let corr = s.correlate();
        assert!((corr.get("passenger", "age").unwrap() - 1.0).abs() < 1e-12);

        assert_eq!(s.profile_missing().get("sex"), Some(10));

        let sex = s.describe_categorical("sex").unwrap();
        assert_eq!(sex.frequencies.get("Missing"), Some(10));
        assert_eq!(sex.frequencies.total(), 41);

        let hist = s.histogram("age").unwrap();
        assert_eq!(hist.counts.len(), 50);

        let rel = s.extract_relationship("age", "passenger", Some("survived")).unwrap();
        assert_eq!(rel.points.len(), 41);
        assert_eq!(rel.groups(), vec!["0", "1"]);
    }

    #[test]
    fn test_repeated_categorical_profiles_do_not_alias() {
        let s = session();
        let first = s.describe_categorical("sex").unwrap();
        let _ = s.describe_categorical("survived").unwrap();
        let again = s.describe_categorical("sex").unwrap();
        assert_eq!(first, again);
        assert_eq!(s.dataset().column("sex").unwrap().missing_count(), 10);
    }

    #[test]
    fn test_overview_serializes() {
        let report = session().overview();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"duplicate_row_count\":1"));
    }
}
