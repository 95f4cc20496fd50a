use serde::Serialize;

use crate::data::model::{Column, Dataset};
use crate::error::{ColumnKind, EdaError, EdaResult};

// ---------------------------------------------------------------------------
// Column classification: continuous vs categorical
// ---------------------------------------------------------------------------

/// Partition of a dataset's column names. Both lists keep dataset order,
/// and every column lands in exactly one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnClassification {
    pub continuous: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnClassification {
    pub fn is_continuous(&self, column: &str) -> bool {
        self.continuous.iter().any(|c| c == column)
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|c| c == column)
    }

    /// Default selector entry; errors when there is nothing to select.
    pub fn first(&self, kind: ColumnKind) -> EdaResult<&str> {
        let names = match kind {
            ColumnKind::Continuous => &self.continuous,
            ColumnKind::Categorical => &self.categorical,
        };
        names
            .first()
            .map(String::as_str)
            .ok_or(EdaError::EmptySelection { kind })
    }

    /// Check `column` exists and belongs to the `kind` set.
    pub fn require(&self, dataset: &Dataset, column: &str, kind: ColumnKind) -> EdaResult<()> {
        if dataset.column(column).is_none() {
            return Err(EdaError::unknown_column(column));
        }
        let member = match kind {
            ColumnKind::Continuous => self.is_continuous(column),
            ColumnKind::Categorical => self.is_categorical(column),
        };
        if member {
            Ok(())
        } else {
            Err(EdaError::wrong_kind(column, kind))
        }
    }
}

/// A numeric column is continuous once it holds more than `threshold`
/// distinct values; low-cardinality numerics behave like categories.
pub fn is_continuous(column: &Column, threshold: usize) -> bool {
    column.dtype.is_numeric() && column.distinct_count() > threshold
}

pub fn classify(dataset: &Dataset, threshold: usize) -> ColumnClassification {
    let mut out = ColumnClassification::default();
    for column in dataset.columns() {
        let name = column.name.clone();
        if is_continuous(column, threshold) {
            out.continuous.push(name);
        } else {
            out.categorical.push(name);
        }
    }
    log::debug!(
        "classified {} continuous / {} categorical columns",
        out.continuous.len(),
        out.categorical.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ColumnType, Value};

    fn numeric(name: &str, n_distinct: usize) -> Column {
        let values = (0..n_distinct as i64).map(Value::Integer).collect();
        Column::new(name, ColumnType::Integer, values)
    }

    #[test]
    fn test_classify_partitions_every_column() {
        let ds = Dataset::new(vec![
            numeric("a", 40),
            Column::new("b", ColumnType::Text, (0..40).map(|i| Value::Text(i.to_string())).collect()),
            numeric("c", 40),
        ])
        .unwrap();
        let cls = classify(&ds, 25);

        for name in ds.column_names() {
            assert!(cls.is_continuous(name) ^ cls.is_categorical(name), "{name}");
        }
        assert_eq!(cls.continuous.len() + cls.categorical.len(), ds.column_count());
        assert_eq!(cls.continuous, vec!["a", "c"]);
    }

    #[test]
    fn test_threshold_boundary() {
        assert!(!is_continuous(&numeric("x", 25), 25));
        assert!(is_continuous(&numeric("x", 26), 25));
    }

    #[test]
    fn test_high_cardinality_text_is_categorical() {
        let col = Column::new(
            "name",
            ColumnType::Text,
            (0..100).map(|i| Value::Text(format!("p{i}"))).collect(),
        );
        assert!(!is_continuous(&col, 25));
    }

    #[test]
    fn test_titanic_like_scenario() {
        let rows = 150;
        let age: Vec<Value> = (0..rows).map(|i| Value::Float(22.0 + i as f64 * 0.5)).collect();
        let gender_cycle = [Some("M"), Some("F"), None, Some("M")];
        let gender: Vec<Value> = (0..rows)
            .map(|i| match gender_cycle[i % 4] {
                Some(s) => Value::Text(s.to_string()),
                None => Value::Missing,
            })
            .collect();
        let survived: Vec<Value> = (0..rows).map(|i| Value::Integer((i % 2) as i64)).collect();

        let ds = Dataset::new(vec![
            Column::new("age", ColumnType::Float, age),
            Column::new("gender", ColumnType::Text, gender),
            Column::new("survived", ColumnType::Integer, survived),
        ])
        .unwrap();

        let cls = classify(&ds, 25);
        assert_eq!(cls.continuous, vec!["age"]);
        assert_eq!(cls.categorical, vec!["gender", "survived"]);
    }

    #[test]
    fn test_first_reports_empty_selection() {
        let cls = ColumnClassification {
            continuous: vec![],
            categorical: vec!["sex".into()],
        };
        assert_eq!(
            cls.first(ColumnKind::Continuous),
            Err(EdaError::EmptySelection { kind: ColumnKind::Continuous })
        );
        assert_eq!(cls.first(ColumnKind::Categorical), Ok("sex"));
    }

    #[test]
    fn test_require_rejects_unknown_and_wrong_kind() {
        let ds = Dataset::new(vec![numeric("a", 30), numeric("flag", 2)]).unwrap();
        let cls = classify(&ds, 25);

        assert!(cls.require(&ds, "a", ColumnKind::Continuous).is_ok());
        assert!(matches!(
            cls.require(&ds, "flag", ColumnKind::Continuous),
            Err(EdaError::InvalidColumn { .. })
        ));
        assert!(matches!(
            cls.require(&ds, "nope", ColumnKind::Categorical),
            Err(EdaError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn test_padded_column_name_stays_in_partition() {
        let ds = Dataset::new(vec![numeric(" age", 30), numeric("fare ", 30)]).unwrap();
        let cls = classify(&ds, 25);

        for name in ds.column_names() {
            assert!(cls.is_continuous(name) ^ cls.is_categorical(name), "{name}");
        }
        assert_eq!(cls.continuous, vec!["age", "fare"]);
        assert!(cls.require(&ds, "age", ColumnKind::Continuous).is_ok());

        let matrix = crate::analysis::correlation::correlate(&ds, &cls.continuous);
        assert_eq!(matrix.len(), 2);
        assert!((matrix.get("age", "fare").unwrap() - 1.0).abs() < 1e-12);
    }
}
