use std::path::Path;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustyTrendsApp {
    pub state: AppState,
}

impl RustyTrendsApp {
    /// Start with a dataset already loaded (from the command line).
    pub fn with_file(path: &Path) -> Self {
        let mut app = Self::default();
        app.state.load_path(path);
        app
    }
}

impl eframe::App for RustyTrendsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls + results ----
        egui::SidePanel::left("analysis_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::series_plot(ui, &self.state);
        });
    }
}
