use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::analysis::params::Statistic;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – analysis controls and results
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Analysis");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let categories: Vec<String> = dataset.categories.iter().cloned().collect();
    let bounds = dataset.year_bounds();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Dataset info ----
            if let Some((min, max)) = bounds {
                ui.label(format!("Years available: {min} – {max}"));
            }
            ui.separator();

            // ---- Category ----
            ui.strong("Category");
            ui.add(
                egui::TextEdit::singleline(&mut state.category_input)
                    .hint_text("all / male / female / …"),
            );
            ui.horizontal_wrapped(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.category_input = "all".to_string();
                }
                for cat in &categories {
                    if ui.small_button(cat.as_str()).clicked() {
                        state.category_input = cat.clone();
                    }
                }
            });
            ui.separator();

            // ---- Year range ----
            ui.strong("Years");
            match state.category_year_bounds() {
                Some((min, max)) => ui.label(format!("Available for this category: {min} – {max}")),
                None => ui.label("No years match this category"),
            };
            let (min_hint, max_hint) = bounds
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .unwrap_or_default();
            ui.horizontal(|ui: &mut Ui| {
                ui.label("From");
                ui.add(
                    egui::TextEdit::singleline(&mut state.start_year_input)
                        .hint_text(min_hint)
                        .desired_width(60.0),
                );
                ui.label("to");
                ui.add(
                    egui::TextEdit::singleline(&mut state.end_year_input)
                        .hint_text(max_hint)
                        .desired_width(60.0),
                );
            });
            ui.separator();

            // ---- Statistics ----
            ui.strong("Statistics");
            for stat in Statistic::ALL {
                let mut checked = state.selected_stats.contains(&stat);
                if ui.checkbox(&mut checked, stat.keyword()).changed() {
                    state.toggle_stat(stat);
                }
            }
            ui.add_space(4.0);
            if ui.button("Run").clicked() {
                state.run_analysis();
            }
            ui.separator();

            results_table(ui, state);
        });
}

/// Label / value table for the last analysis.
fn results_table(ui: &mut Ui, state: &AppState) {
    let Some(analysis) = &state.analysis else {
        return;
    };
    ui.strong("Results");
    ui.label(format!(
        "{} records, {} years",
        analysis.matched_records,
        analysis.series.len()
    ));

    let entries = analysis.statistics.entries();
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .column(Column::remainder())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("Statistic");
            });
            header.col(|ui| {
                ui.strong("Value");
            });
        })
        .body(|mut body| {
            for entry in &entries {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(entry.label.as_str());
                    });
                    row.col(|ui| {
                        ui.label(entry.value.to_string());
                    });
                });
            }
        });
}

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
            if ui
                .add_enabled(state.analysis.is_some(), egui::Button::new("Export report…"))
                .clicked()
            {
                save_report_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} categories",
                ds.len(),
                ds.categories.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::YELLOW
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open yearly data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn save_report_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export analysis report")
        .add_filter("JSON", &["json"])
        .set_file_name("report.json")
        .save_file();

    if let Some(path) = file {
        state.export_report(&path);
    }
}
