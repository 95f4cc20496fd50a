use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use super::panels::stat_line;
use super::plot;
use crate::data::model::Dataset;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// "Dataset Overview" tab
// ---------------------------------------------------------------------------

pub fn overview_tab(ui: &mut Ui, state: &AppState) {
    let (Some(session), Some(report)) = (&state.session, &state.derived.overview) else {
        return;
    };

    ScrollArea::vertical()
        .id_salt("overview_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("1. Dataset");
            dataset_table(ui, session.dataset(), state.view.preview_rows);
            ui.separator();

            ui.heading("2. Dataset Overview");
            let summary = &report.summary;
            stat_line(ui, "Rows", summary.row_count);
            stat_line(ui, "Features", summary.feature_count);
            stat_line(ui, "Duplicates", summary.duplicate_row_count);
            stat_line(ui, "Categorical Columns", summary.categorical_columns.len());
            ui.label(summary.categorical_columns.join(", "));
            stat_line(ui, "Continuous Columns", summary.continuous_columns.len());
            ui.label(summary.continuous_columns.join(", "));
            ui.separator();

            ui.heading("3. Correlation Chart");
            plot::correlation_heatmap(ui, &report.correlation);
            ui.separator();

            ui.heading("4. Missing Values Distribution");
            stat_line(ui, "Missing Values", report.missing.total());
            for entry in &report.missing.entries {
                ui.monospace(format!("{:<24} {}", entry.column, entry.missing));
            }
            plot::missing_values_chart(ui, &report.missing);
        });
}

/// Scrollable preview of the first `max_rows` rows.
fn dataset_table(ui: &mut Ui, dataset: &Dataset, max_rows: usize) {
    if dataset.is_empty() {
        ui.label("The dataset has a header but no rows.");
        return;
    }
    let shown = dataset.row_count().min(max_rows);
    if shown < dataset.row_count() {
        ui.label(format!("Showing the first {shown} of {} rows", dataset.row_count()));
    }

    ScrollArea::horizontal()
        .id_salt("dataset_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(320.0)
                .column(TableColumn::auto().at_least(40.0))
                .columns(TableColumn::auto().at_least(60.0), dataset.column_count())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    for col in dataset.columns() {
                        header.col(|ui| {
                            ui.strong(&col.name).on_hover_text(col.dtype.to_string());
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, shown, |mut row| {
                        let idx = row.index();
                        row.col(|ui| {
                            ui.label(idx.to_string());
                        });
                        for col in dataset.columns() {
                            row.col(|ui| {
                                let cell = &col.values[idx];
                                if cell.is_missing() {
                                    ui.weak("NaN");
                                } else {
                                    ui.label(cell.to_string());
                                }
                            });
                        }
                    });
                });
        });
}
