use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, ColumnType, Dataset, Value};
use crate::error::{EdaError, EdaResult};

/// Cell spellings read as missing, following the Pandas CSV defaults.
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "<NA>",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-delimited text with a header row (the usual upload)
/// * `.parquet` – flat Parquet file with scalar columns
/// * `.json`    – `[{ "col": value, ... }, ...]` records
pub fn load_file(path: &Path) -> EdaResult<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "csv" => std::fs::File::open(path)
            .context("opening CSV file")
            .and_then(load_csv),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => Err(anyhow::anyhow!("Unsupported file extension: .{other}")),
    };

    let dataset = loaded.map_err(|e| EdaError::Parse(format!("{e:#}")))?;
    log::debug!(
        "parsed {} rows x {} columns from {}",
        dataset.row_count(),
        dataset.column_count(),
        path.display()
    );
    Ok(dataset)
}

/// Decode an uploaded CSV byte stream.
pub fn read_csv<R: Read>(reader: R) -> EdaResult<Dataset> {
    load_csv(reader).map_err(|e| EdaError::Parse(format!("{e:#}")))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.
/// Every cell is read as text first; each column's type is inferred
/// once the whole column has been seen.
fn load_csv<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(source);

    let raw_headers = reader.headers().context("reading CSV header row")?.clone();
    if raw_headers.is_empty() {
        bail!("CSV header row is missing");
    }
    let headers = normalise_headers(raw_headers.iter());

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(value.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| infer_column(name, raw))
        .collect();

    assemble(columns)
}

/// Validate the parsed columns without nesting the parse error twice.
fn assemble(columns: Vec<Column>) -> Result<Dataset> {
    Dataset::new(columns).map_err(|e| match e {
        EdaError::Parse(msg) => anyhow::anyhow!(msg),
        other => anyhow::Error::from(other),
    })
}

/// Trim header names and give blank ones a positional name.
fn normalise_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    raw.enumerate()
        .map(|(i, h)| {
            let name = h.trim();
            if name.is_empty() {
                format!("Unnamed: {i}")
            } else {
                name.to_string()
            }
        })
        .collect()
}

fn guess_cell_type(s: &str) -> Value {
    let s = s.trim();
    if MISSING_TOKENS.contains(&s) {
        return Value::Missing;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
        return Value::Bool(s.eq_ignore_ascii_case("true"));
    }
    Value::Text(s.to_string())
}

/// Build a uniformly typed column from raw cell text.
///
/// * only integers        → `Integer`
/// * integers and floats  → `Float` (integers widened)
/// * only booleans        → `Boolean`
/// * anything else        → `Text`, keeping the original spelling
/// * nothing but missing  → `Float`
fn infer_column(name: String, raw: Vec<String>) -> Column {
    let parsed: Vec<Value> = raw.iter().map(|s| guess_cell_type(s)).collect();

    let present = || parsed.iter().filter(|v| !v.is_missing());
    let dtype = if present().all(|v| matches!(v, Value::Integer(_))) {
        if present().next().is_none() {
            ColumnType::Float
        } else {
            ColumnType::Integer
        }
    } else if present().all(|v| matches!(v, Value::Integer(_) | Value::Float(_))) {
        ColumnType::Float
    } else if present().all(|v| matches!(v, Value::Bool(_))) {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    };

    let values = match dtype {
        ColumnType::Integer | ColumnType::Boolean => parsed,
        ColumnType::Float => parsed
            .into_iter()
            .map(|v| match v {
                Value::Integer(i) => Value::Float(i as f64),
                Value::Float(f) => float_cell(f),
                other => other,
            })
            .collect(),
        ColumnType::Text => parsed
            .into_iter()
            .zip(raw)
            .map(|(v, s)| match v {
                Value::Missing => Value::Missing,
                _ => Value::Text(s),
            })
            .collect(),
    };

    Column::new(name, dtype, values)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "age": 22.0, "sex": "male", "survived": 0 },
///   ...
/// ]
/// ```
///
/// A key absent from a record is a missing cell in that row.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut raw: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for key in obj.keys() {
            let name = key.trim();
            if name.is_empty() {
                bail!("Row {i}: empty column name");
            }
            raw.entry(name.to_string())
                .or_insert_with(|| vec![String::new(); i]);
        }
        for (name, cells) in raw.iter_mut() {
            let cell = obj
                .iter()
                .find(|(k, _)| k.trim() == name)
                .map(|(_, v)| json_cell_text(v))
                .unwrap_or_default();
            cells.push(cell);
        }
    }

    let columns = raw
        .into_iter()
        .map(|(name, cells)| infer_column(name, cells))
        .collect();

    assemble(columns)
}

fn json_cell_text(val: &JsonValue) -> String {
    match val {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file.
///
/// Integer, float, boolean and string columns map onto the matching
/// [`ColumnType`]. Dictionary columns (Pandas/Polars categoricals) are
/// unpacked to their values; dates, timestamps and any other Arrow type
/// are read as their display text.
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let mut columns: Vec<Column> = schema
        .fields()
        .iter()
        .map(|f| Column::new(f.name().trim(), arrow_column_type(f.data_type()), Vec::new()))
        .collect();

    let reader = builder.build().context("building parquet reader")?;
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let array = widen(batch.column(col_idx))?;
            for row in 0..batch.num_rows() {
                column.values.push(extract_value(&array, row)?);
            }
        }
    }

    assemble(columns)
}

fn arrow_column_type(dt: &DataType) -> ColumnType {
    match dt {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => ColumnType::Integer,
        DataType::UInt64 | DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            ColumnType::Float
        }
        DataType::Boolean => ColumnType::Boolean,
        DataType::Dictionary(_, value_type) => arrow_column_type(value_type),
        _ => ColumnType::Text,
    }
}

/// Cast the narrower numeric Arrow types to Int64 / Float64 and unpack
/// dictionaries so [`extract_value`] only has to know the wide ones.
fn widen(col: &Arc<dyn Array>) -> Result<Arc<dyn Array>> {
    let target = match col.data_type() {
        DataType::Dictionary(_, value_type) => {
            let values = arrow::compute::cast(col, value_type)
                .with_context(|| format!("unpacking {:?}", col.data_type()))?;
            return widen(&values);
        }
        DataType::Utf8View => DataType::Utf8,
        DataType::Int8 | DataType::Int16 | DataType::UInt8 | DataType::UInt16 | DataType::UInt32 => {
            DataType::Int64
        }
        DataType::UInt64 | DataType::Float16 => DataType::Float64,
        _ => return Ok(Arc::clone(col)),
    };
    arrow::compute::cast(col, &target)
        .with_context(|| format!("casting {:?} to {target:?}", col.data_type()))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Missing);
    }
    let value = match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Value::Text(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Value::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Value::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Value::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            float_cell(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            float_cell(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            Value::Bool(arr.value(row))
        }
        other => Value::Text(
            array_value_to_string(col.as_ref(), row)
                .with_context(|| format!("formatting {other:?} cell"))?,
        ),
    };
    Ok(value)
}

fn float_cell(v: f64) -> Value {
    if v.is_nan() {
        Value::Missing
    } else {
        Value::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(text: &str) -> EdaResult<Dataset> {
        read_csv(text.as_bytes())
    }

    #[test]
    fn test_csv_infers_column_types() {
        let ds = parse("id,fare,name,alive\n1,7.25,Braund,true\n2,71,Cumings,false\n3,,Heikkinen,TRUE\n")
            .unwrap();

        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.column("id").unwrap().dtype, ColumnType::Integer);
        let fare = ds.column("fare").unwrap();
        assert_eq!(fare.dtype, ColumnType::Float);
        assert_eq!(fare.values[1], Value::Float(71.0));
        assert_eq!(fare.values[2], Value::Missing);
        assert_eq!(ds.column("name").unwrap().dtype, ColumnType::Text);
        assert_eq!(ds.column("alive").unwrap().dtype, ColumnType::Boolean);
    }

    #[test]
    fn test_csv_mixed_column_keeps_original_text() {
        let ds = parse("cabin\nC85\n12\nNA\n").unwrap();
        let cabin = ds.column("cabin").unwrap();
        assert_eq!(cabin.dtype, ColumnType::Text);
        assert_eq!(
            cabin.values,
            vec![Value::Text("C85".into()), Value::Text("12".into()), Value::Missing]
        );
    }

    #[test]
    fn test_csv_trims_header_names() {
        let ds = parse(" age , sex\n22,male\n").unwrap();
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["age", "sex"]);
    }

    #[test]
    fn test_csv_names_blank_headers() {
        let ds = parse(",value\n0,1\n").unwrap();
        assert!(ds.column("Unnamed: 0").is_some());
    }

    #[test]
    fn test_csv_duplicate_header_is_parse_error() {
        assert!(matches!(parse("a, a\n1,2\n"), Err(EdaError::Parse(_))));
    }

    #[test]
    fn test_csv_missing_header_is_parse_error() {
        assert!(matches!(parse(""), Err(EdaError::Parse(_))));
    }

    #[test]
    fn test_csv_ragged_rows_are_parse_error() {
        assert!(matches!(parse("a,b\n1,2\n3\n"), Err(EdaError::Parse(_))));
    }

    #[test]
    fn test_csv_all_missing_column_is_float() {
        let ds = parse("a,b\n1,\n2,\n").unwrap();
        assert_eq!(ds.column("b").unwrap().dtype, ColumnType::Float);
    }

    #[test]
    fn test_load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("data.csv");
        std::fs::write(&csv_path, "x,y\n1,a\n2,b\n").unwrap();
        assert_eq!(load_file(&csv_path).unwrap().row_count(), 2);

        let txt_path = dir.path().join("data.txt");
        std::fs::write(&txt_path, "x\n1\n").unwrap();
        assert!(matches!(load_file(&txt_path), Err(EdaError::Parse(_))));
    }

    #[test]
    fn test_load_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            r#"[{{"age": 22, "sex": "male"}}, {{"age": 38.5, "sex": null}}, {{"sex": "female"}}]"#
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.row_count(), 3);
        let age = ds.column("age").unwrap();
        assert_eq!(age.dtype, ColumnType::Float);
        assert_eq!(age.values[2], Value::Missing);
        assert_eq!(ds.column("sex").unwrap().missing_count(), 1);
    }

    #[test]
    fn test_csv_nan_spellings_are_missing() {
        let ds = parse("a,b\nNAN,1\nNAN,1\n2.5,3\n").unwrap();
        let a = ds.column("a").unwrap();
        assert_eq!(a.dtype, ColumnType::Float);
        assert_eq!(a.values[0], Value::Missing);
        assert_eq!(a.missing_count(), 2);
        assert_eq!(crate::analysis::summary::duplicate_row_count(&ds), 1);
    }

    #[test]
    fn test_load_parquet_unpacks_dictionaries_and_formats_dates() {
        use arrow::array::{Date32Array, DictionaryArray};
        use arrow::datatypes::{Field, Int32Type, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let embarked: DictionaryArray<Int32Type> = ["S", "C", "Q", "S"].into_iter().collect();
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("fare", DataType::Float64, true),
            Field::new(" sex", DataType::Utf8, true),
            Field::new("embarked", embarked.data_type().clone(), false),
            Field::new("boarded", DataType::Date32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3, 4])),
                Arc::new(Float64Array::from(vec![Some(7.25), None, Some(f64::NAN), Some(8.05)])),
                Arc::new(StringArray::from(vec![Some("male"), Some("female"), None, Some("male")])),
                Arc::new(embarked),
                Arc::new(Date32Array::from(vec![19723, 19723, 19724, 19725])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passengers.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.row_count(), 4);
        assert_eq!(ds.column("id").unwrap().dtype, ColumnType::Integer);

        let fare = ds.column("fare").unwrap();
        assert_eq!(fare.values[0], Value::Float(7.25));
        assert_eq!(fare.missing_count(), 2);

        assert_eq!(ds.column("sex").unwrap().values[2], Value::Missing);

        let embarked = ds.column("embarked").unwrap();
        assert_eq!(embarked.dtype, ColumnType::Text);
        let letters = ["S", "C", "Q", "S"].map(|s| Value::Text(s.to_string()));
        assert_eq!(embarked.values, letters.to_vec());
        assert_eq!(embarked.distinct_count(), 3);

        let boarded = ds.column("boarded").unwrap();
        assert_eq!(boarded.values[0], Value::Text("2024-01-01".into()));
        assert_eq!(boarded.distinct_count(), 3);
    }
}
