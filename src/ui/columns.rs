use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use super::panels::{column_selector, stat_line};
use super::plot;
use crate::error::EdaResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// "Individual Column Stats" tab
// ---------------------------------------------------------------------------

pub fn columns_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(cls) = state.classification().cloned() else {
        return;
    };
    let bins = state
        .session
        .as_ref()
        .map_or(0, |s| s.config().histogram_bins);

    ScrollArea::vertical()
        .id_salt("columns_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Analyze Individual Feature Distributions");

            // ---- Continuous features ----
            ui.add_space(6.0);
            ui.strong("1. Understand Continuous Features");
            if cls.continuous.is_empty() {
                ui.label("The dataset has no continuous columns.");
            } else if let Some(col) = column_selector(
                ui,
                "continuous_feature",
                "Select Continuous Feature",
                state.continuous_column.as_deref(),
                &cls.continuous,
            ) {
                state.set_continuous_column(col);
            }

            if let Some(result) = &state.derived.continuous {
                show_or_error(ui, result, |ui, (stats, hist)| {
                    stat_line(ui, "Count", stats.count);
                    stat_line(
                        ui,
                        "Missing Values Count",
                        format!("{} / ({:.2} %)", stats.missing_count, stats.missing_fraction * 100.0),
                    );
                    stat_line(ui, "Mean", format!("{:.2}", stats.mean));
                    stat_line(ui, "Standard Deviation", format!("{:.2}", stats.std));
                    stat_line(ui, "Minimum", stats.min);
                    stat_line(ui, "Maximum", stats.max);
                    stat_line(
                        ui,
                        "Quantiles",
                        format!("25%: {}   50%: {}   75%: {}", stats.p25, stats.p50, stats.p75),
                    );
                    ui.label(format!("Distribution ({bins} bins)"));
                    plot::histogram_chart(ui, "continuous_hist", hist);
                });
            }

            ui.separator();

            // ---- Categorical features ----
            ui.strong("2. Understand Categorical Features");
            if cls.categorical.is_empty() {
                ui.label("The dataset has no categorical columns.");
            } else if let Some(col) = column_selector(
                ui,
                "categorical_feature",
                "Select Categorical Feature",
                state.categorical_column.as_deref(),
                &cls.categorical,
            ) {
                state.set_categorical_column(col);
            }

            if let Some(result) = &state.derived.categorical {
                show_or_error(ui, result, |ui, profile| {
                    stat_line(ui, "Count", profile.count);
                    stat_line(
                        ui,
                        "Missing Values Count",
                        format!(
                            "{} / ({:.2} %)",
                            profile.missing_count,
                            profile.missing_fraction * 100.0
                        ),
                    );
                    stat_line(ui, "Distinct Values", profile.frequencies.len());
                    plot::frequency_chart(ui, "categorical_freq", &profile.frequencies);
                });
            }
        });
}

pub(crate) fn show_or_error<T>(ui: &mut Ui, result: &EdaResult<T>, show: impl FnOnce(&mut Ui, &T)) {
    match result {
        Ok(value) => show(ui, value),
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
        }
    }
}
