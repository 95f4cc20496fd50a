use serde::Serialize;

use super::classify::ColumnClassification;
use crate::data::model::Dataset;
use crate::error::{ColumnKind, EdaError, EdaResult};

/// Selector value meaning "do not colour by any column".
pub const NO_GROUPING: &str = "none";

/// Label given to rows whose grouping cell is missing.
pub const UNGROUPED_LABEL: &str = "(ungrouped)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipPoint {
    pub x: f64,
    pub y: f64,
    pub group: Option<String>,
}

/// Aligned (x, y[, group]) series for a scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub x_column: String,
    pub y_column: String,
    pub group_column: Option<String>,
    pub points: Vec<RelationshipPoint>,
}

impl Relationship {
    /// Distinct group labels in first-occurrence order.
    pub fn groups(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for label in self.points.iter().filter_map(|p| p.group.as_deref()) {
            if !out.contains(&label) {
                out.push(label);
            }
        }
        out
    }
}

/// Resolve the "Color by" selection. A real categorical column named
/// like the sentinel wins over the sentinel.
fn resolve_group<'a>(
    dataset: &Dataset,
    classification: &ColumnClassification,
    group: Option<&'a str>,
) -> EdaResult<Option<&'a str>> {
    match group {
        None => Ok(None),
        Some(name) if name == NO_GROUPING && !classification.is_categorical(name) => Ok(None),
        Some(name) => {
            classification.require(dataset, name, ColumnKind::Categorical)?;
            Ok(Some(name))
        }
    }
}

/// Rows with a missing x or y are dropped; rows with a missing group
/// cell are kept under [`UNGROUPED_LABEL`].
pub fn extract_relationship(
    dataset: &Dataset,
    classification: &ColumnClassification,
    x_column: &str,
    y_column: &str,
    group_column: Option<&str>,
) -> EdaResult<Relationship> {
    classification.require(dataset, x_column, ColumnKind::Continuous)?;
    classification.require(dataset, y_column, ColumnKind::Continuous)?;
    let group_column = resolve_group(dataset, classification, group_column)?;

    let (Some(xs), Some(ys)) = (dataset.column(x_column), dataset.column(y_column)) else {
        return Err(EdaError::unknown_column(x_column));
    };
    let groups = group_column.and_then(|g| dataset.column(g));

    let points = (0..dataset.row_count())
        .filter_map(|row| {
            let x = xs.values[row].as_f64()?;
            let y = ys.values[row].as_f64()?;
            let group = groups.map(|col| {
                let cell = &col.values[row];
                if cell.is_missing() {
                    UNGROUPED_LABEL.to_string()
                } else {
                    cell.to_string()
                }
            });
            Some(RelationshipPoint { x, y, group })
        })
        .collect();

    Ok(Relationship {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        group_column: group_column.map(str::to_string),
        points,
    })
}
