use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.derived.overview.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export report…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            let ds = session.dataset();
            ui.label(format!(
                "{} rows × {} columns loaded",
                ds.row_count(),
                ds.column_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    if state.session.is_none() {
        return;
    }
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }
    });
    ui.add_space(2.0);
}

pub fn welcome(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("Open a CSV file to generate the EDA report  (File → Open…)");
    });
}

/// Label + key/value line, used for the summary records.
pub fn stat_line(ui: &mut Ui, label: &str, value: impl std::fmt::Display) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!("{label}:"));
        ui.label(value.to_string());
    });
}

/// Combo box over `options`; returns the newly picked entry, if any.
pub fn column_selector(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: Option<&str>,
    options: &[String],
) -> Option<String> {
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.unwrap_or("—"))
            .show_ui(ui, |ui: &mut Ui| {
                for col in options {
                    if ui
                        .selectable_label(current == Some(col.as_str()), col)
                        .clicked()
                    {
                        picked = Some(col.clone());
                    }
                }
            });
    });
    picked
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export EDA report")
        .set_file_name("eda_report.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_overview(&path) {
            log::error!("Failed to export report: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
