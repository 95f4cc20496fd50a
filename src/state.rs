use std::path::Path;

use crate::analysis::classify::ColumnClassification;
use crate::analysis::profile::{CategoricalProfile, ContinuousStats, Histogram};
use crate::analysis::relationship::Relationship;
use crate::analysis::{AnalysisConfig, EdaSession, OverviewReport};
use crate::color::ColorMap;
use crate::data::model::Dataset;
use crate::error::{ColumnKind, EdaError, EdaResult};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Columns,
    Relationships,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Columns, Tab::Relationships];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Dataset Overview",
            Tab::Columns => "Individual Column Stats",
            Tab::Relationships => "Explore Relationships between Features",
        }
    }
}

/// Rendering knobs that never affect the analysis itself.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Rows shown in the dataset preview table.
    pub preview_rows: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self { preview_rows: 1000 }
    }
}

/// Results for the current selections, recomputed only when a
/// selection changes.
#[derive(Debug, Default)]
pub struct Derived {
    pub overview: Option<OverviewReport>,
    pub continuous: Option<EdaResult<(ContinuousStats, Histogram)>>,
    pub categorical: Option<EdaResult<CategoricalProfile>>,
    pub relationship: Option<EdaResult<Relationship>>,
    pub group_colors: Option<ColorMap>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded session (None until the user loads a file).
    pub session: Option<EdaSession>,

    pub config: AnalysisConfig,
    pub view: ViewOptions,
    pub tab: Tab,

    pub continuous_column: Option<String>,
    pub categorical_column: Option<String>,
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    /// `None` means "do not colour".
    pub color_by: Option<String>,

    pub derived: Derived,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: None,
            config: AnalysisConfig::default(),
            view: ViewOptions::default(),
            tab: Tab::default(),
            continuous_column: None,
            categorical_column: None,
            x_column: None,
            y_column: None,
            color_by: None,
            derived: Derived::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset every selection.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let session = EdaSession::new(dataset, self.config.clone());
        let cls = session.classification();

        self.continuous_column = first_or_log(cls, ColumnKind::Continuous);
        self.categorical_column = first_or_log(cls, ColumnKind::Categorical);
        self.x_column = self.continuous_column.clone();
        self.y_column = self.continuous_column.clone();
        self.color_by = None;

        self.derived = Derived {
            overview: Some(session.overview()),
            ..Derived::default()
        };
        self.session = Some(session);
        self.refresh_continuous();
        self.refresh_categorical();
        self.refresh_relationship();

        self.status_message = None;
    }

    /// Load a file into a fresh session. On failure the current session stays.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.row_count(),
                    dataset.column_names().collect::<Vec<_>>()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn classification(&self) -> Option<&ColumnClassification> {
        self.session.as_ref().map(EdaSession::classification)
    }

    pub fn set_continuous_column(&mut self, col: String) {
        self.continuous_column = Some(col);
        self.refresh_continuous();
    }

    pub fn set_categorical_column(&mut self, col: String) {
        self.categorical_column = Some(col);
        self.refresh_categorical();
    }

    pub fn set_axes(&mut self, x: Option<String>, y: Option<String>) {
        self.x_column = x;
        self.y_column = y;
        self.refresh_relationship();
    }

    pub fn set_color_by(&mut self, col: Option<String>) {
        self.color_by = col;
        self.refresh_relationship();
    }

    fn refresh_continuous(&mut self) {
        let (Some(session), Some(col)) = (&self.session, &self.continuous_column) else {
            self.derived.continuous = None;
            return;
        };
        self.derived.continuous = Some(
            session
                .describe_continuous(col)
                .and_then(|stats| Ok((stats, session.histogram(col)?))),
        );
    }

    fn refresh_categorical(&mut self) {
        let (Some(session), Some(col)) = (&self.session, &self.categorical_column) else {
            self.derived.categorical = None;
            return;
        };
        self.derived.categorical = Some(session.describe_categorical(col));
    }

    fn refresh_relationship(&mut self) {
        let (Some(session), Some(x), Some(y)) = (&self.session, &self.x_column, &self.y_column)
        else {
            self.derived.relationship = None;
            self.derived.group_colors = None;
            return;
        };
        let rel = session.extract_relationship(x, y, self.color_by.as_deref());
        self.derived.group_colors = rel
            .as_ref()
            .ok()
            .filter(|r| r.group_column.is_some())
            .map(|r| ColorMap::new(r.groups()));
        self.derived.relationship = Some(rel);
    }

    /// Serialize the overview to pretty JSON at `path`.
    pub fn export_overview(&self, path: &Path) -> EdaResult<()> {
        let report = self
            .derived
            .overview
            .as_ref()
            .ok_or_else(|| EdaError::Io("no dataset loaded".to_string()))?;
        let json =
            serde_json::to_string_pretty(report).map_err(|e| EdaError::Io(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| EdaError::Io(format!("{}: {e}", path.display())))?;
        log::info!("Exported overview report to {}", path.display());
        Ok(())
    }
}

fn first_or_log(cls: &ColumnClassification, kind: ColumnKind) -> Option<String> {
    match cls.first(kind) {
        Ok(name) => Some(name.to_string()),
        Err(e) => {
            log::warn!("{e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn load(state: &mut AppState, csv: &str) {
        state.set_dataset(read_csv(csv.as_bytes()).unwrap());
    }

    fn wide_csv() -> String {
        let mut csv = String::from("fare,age,class\n");
        for i in 0..30 {
            csv.push_str(&format!("{},{},{}\n", i * 3, 50 - i, ["A", "B", ""][i % 3]));
        }
        csv
    }

    #[test]
    fn test_set_dataset_selects_defaults() {
        let mut state = AppState::default();
        load(&mut state, &wide_csv());

        assert_eq!(state.continuous_column.as_deref(), Some("fare"));
        assert_eq!(state.categorical_column.as_deref(), Some("class"));
        assert!(matches!(state.derived.continuous, Some(Ok(_))));
        assert!(matches!(state.derived.categorical, Some(Ok(_))));
        assert!(matches!(state.derived.relationship, Some(Ok(_))));
        assert!(state.derived.overview.is_some());
    }

    #[test]
    fn test_no_continuous_columns_degrades_to_empty() {
        let mut state = AppState::default();
        load(&mut state, "flag,label\n0,a\n1,b\n");

        assert_eq!(state.continuous_column, None);
        assert!(state.derived.continuous.is_none());
        assert!(state.derived.relationship.is_none());
        let overview = state.derived.overview.as_ref().unwrap();
        assert!(overview.correlation.is_empty());
    }

    #[test]
    fn test_color_by_builds_color_map() {
        let mut state = AppState::default();
        load(&mut state, &wide_csv());

        state.set_color_by(Some("class".into()));
        assert!(state.derived.group_colors.is_some());

        state.set_color_by(Some("fare".into()));
        assert!(matches!(
            state.derived.relationship,
            Some(Err(EdaError::InvalidColumn { .. }))
        ));
        assert!(state.derived.group_colors.is_none());
    }

    #[test]
    fn test_failed_load_keeps_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.csv");
        std::fs::write(&bad, "a,a\n1,2\n").unwrap();

        let mut state = AppState::default();
        load(&mut state, &wide_csv());
        state.load_path(&bad);

        assert!(state.status_message.is_some());
        assert!(state.session.is_some());
    }

    #[test]
    fn test_export_overview_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.json");

        let mut state = AppState::default();
        assert!(matches!(state.export_overview(&out), Err(EdaError::Io(_))));

        load(&mut state, &wide_csv());
        state.export_overview(&out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("\"row_count\": 30"));
    }
}
