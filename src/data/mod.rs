/// Data layer: core types and loading.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (types inferred per column)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Column>, each a uniformly typed Vec<Value>
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
