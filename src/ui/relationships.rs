use eframe::egui::{self, Ui};

use super::columns::show_or_error;
use super::panels::column_selector;
use super::plot;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// "Explore Relationships between Features" tab
// ---------------------------------------------------------------------------

pub fn relationships_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(cls) = state.classification().cloned() else {
        return;
    };

    ui.heading("Explore Relationships between Features");
    if cls.continuous.is_empty() {
        ui.label("The dataset has no continuous columns to plot against each other.");
        return;
    }

    ui.columns(2, |cols| {
        if let Some(x) = column_selector(
            &mut cols[0],
            "x_axis",
            "X_axis",
            state.x_column.as_deref(),
            &cls.continuous,
        ) {
            let y = state.y_column.clone();
            state.set_axes(Some(x), y);
        }
        if let Some(y) = column_selector(
            &mut cols[1],
            "y_axis",
            "Y_axis",
            state.y_column.as_deref(),
            &cls.continuous,
        ) {
            let x = state.x_column.clone();
            state.set_axes(x, Some(y));
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Color by");
        let current = state.color_by.clone();
        egui::ComboBox::from_id_salt("color_by")
            .selected_text(current.as_deref().unwrap_or("None"))
            .show_ui(ui, |ui: &mut Ui| {
                if ui.selectable_label(current.is_none(), "None").clicked() {
                    state.set_color_by(None);
                }
                for col in &cls.categorical {
                    if ui
                        .selectable_label(current.as_deref() == Some(col.as_str()), col)
                        .clicked()
                    {
                        state.set_color_by(Some(col.clone()));
                    }
                }
            });
    });

    if let Some(result) = &state.derived.relationship {
        show_or_error(ui, result, |ui, rel| {
            ui.label(format!(
                "{} vs {}  ({} points)",
                rel.x_column,
                rel.y_column,
                rel.points.len()
            ));
            plot::scatter_plot(ui, rel, state.derived.group_colors.as_ref());
        });
    }
}
