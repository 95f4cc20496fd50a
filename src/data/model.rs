use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::{EdaError, EdaResult};

// ---------------------------------------------------------------------------
// Value – a single cell of the dataset
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common Pandas dtypes.
/// Must be `Eq + Hash` so rows and categories can be counted exactly.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Missing,
}

// -- Manual Eq/Ord/Hash: floats compare by total order, -0.0 equals 0.0 --

/// Fold -0.0 onto 0.0 so equality, ordering and hashing agree.
fn canonical(f: f64) -> f64 {
    if f == 0.0 {
        0.0
    } else {
        f
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Missing => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => canonical(*f).to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Missing => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Missing => write!(f, "<missing>"),
        }
    }
}

impl Value {
    /// Numeric view of the cell; `None` for text, booleans and missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if !v.is_nan() => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// A float NaN read from a binary source counts as missing too.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Column – a named, uniformly typed sequence of cells
// ---------------------------------------------------------------------------

/// Declared type of a column, assigned once at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Boolean => "bool",
            ColumnType::Text => "object",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ColumnType, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Number of distinct cells, counting "missing" once if present.
    pub fn distinct_count(&self) -> usize {
        let mut seen: HashSet<&Value> = HashSet::new();
        let mut has_missing = false;
        for v in &self.values {
            if v.is_missing() {
                has_missing = true;
            } else {
                seen.insert(v);
            }
        }
        seen.len() + usize::from(has_missing)
    }

    /// Non-missing numeric cells in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered set of equally long, uniquely named columns.
/// Immutable once loaded; analysis only ever borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Trim column names, then validate lengths and name uniqueness.
    pub fn new(mut columns: Vec<Column>) -> EdaResult<Self> {
        for col in &mut columns {
            col.name = col.name.trim().to_string();
        }
        let row_count = columns.first().map_or(0, |c| c.values.len());

        let mut names: HashSet<&str> = HashSet::new();
        for col in &columns {
            if !names.insert(col.name.as_str()) {
                return Err(EdaError::Parse(format!("duplicate column name '{}'", col.name)));
            }
            if col.values.len() != row_count {
                return Err(EdaError::Parse(format!(
                    "column '{}' has {} rows, expected {row_count}",
                    col.name,
                    col.values.len()
                )));
            }
        }

        Ok(Dataset { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Borrow row `index` across all columns.
    pub fn row(&self, index: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[index]).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(vals: &[i64]) -> Vec<Value> {
        vals.iter().map(|&v| Value::Integer(v)).collect()
    }

    #[test]
    fn test_dataset_rejects_duplicate_names() {
        let a = Column::new("a", ColumnType::Integer, ints(&[1, 2]));
        let b = Column::new("a", ColumnType::Integer, ints(&[3, 4]));
        assert!(matches!(Dataset::new(vec![a, b]), Err(EdaError::Parse(_))));
    }

    #[test]
    fn test_dataset_rejects_ragged_columns() {
        let a = Column::new("a", ColumnType::Integer, ints(&[1, 2]));
        let b = Column::new("b", ColumnType::Integer, ints(&[3]));
        assert!(matches!(Dataset::new(vec![a, b]), Err(EdaError::Parse(_))));
    }

    #[test]
    fn test_distinct_count_counts_missing_once() {
        let col = Column::new(
            "g",
            ColumnType::Text,
            vec![
                Value::Text("M".into()),
                Value::Missing,
                Value::Text("F".into()),
                Value::Missing,
                Value::Text("M".into()),
            ],
        );
        assert_eq!(col.distinct_count(), 3);
        assert_eq!(col.missing_count(), 2);
    }

    #[test]
    fn test_nan_float_is_missing() {
        assert!(Value::Float(f64::NAN).is_missing());
        assert_eq!(Value::Float(f64::NAN).as_f64(), None);
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Text("3".into()).as_f64(), None);
    }

    #[test]
    fn test_row_borrows_every_column() {
        let a = Column::new("a", ColumnType::Integer, ints(&[1, 2]));
        let b = Column::new("b", ColumnType::Text, vec![Value::Text("x".into()), Value::Missing]);
        let ds = Dataset::new(vec![a, b]).unwrap();
        assert_eq!(ds.row(1), vec![&Value::Integer(2), &Value::Missing]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_dataset_trims_names_before_uniqueness_check() {
        let ds = Dataset::new(vec![Column::new(" age ", ColumnType::Integer, ints(&[1, 2]))]).unwrap();
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["age"]);
        assert!(ds.column("age").is_some());

        let a = Column::new(" a", ColumnType::Integer, ints(&[1, 2]));
        let b = Column::new("a", ColumnType::Integer, ints(&[3, 4]));
        assert!(matches!(Dataset::new(vec![a, b]), Err(EdaError::Parse(_))));
    }

    #[test]
    fn test_signed_zero_is_one_value() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        fn hash_of(v: &Value) -> u64 {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        }

        let pos = Value::Float(0.0);
        let neg = Value::Float(-0.0);
        assert_eq!(pos, neg);
        assert_eq!(pos.cmp(&neg), std::cmp::Ordering::Equal);
        assert_eq!(hash_of(&pos), hash_of(&neg));

        let col = Column::new(
            "a",
            ColumnType::Float,
            vec![Value::Float(0.5), Value::Float(0.0), Value::Float(-0.0)],
        );
        assert_eq!(col.distinct_count(), 2);
    }

    #[test]
    fn test_nan_floats_compare_equal() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(1.0), Value::Integer(1));
    }
}
