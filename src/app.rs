use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{columns, overview, panels, relationships};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AutoEdaApp {
    pub state: AppState,
}

impl eframe::App for AutoEdaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
            panels::tab_bar(ui, &mut self.state);
        });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.session.is_none() {
                panels::welcome(ui);
                return;
            }
            match self.state.tab {
                Tab::Overview => overview::overview_tab(ui, &self.state),
                Tab::Columns => columns::columns_tab(ui, &mut self.state),
                Tab::Relationships => relationships::relationships_tab(ui, &mut self.state),
            }
        });
    }
}
