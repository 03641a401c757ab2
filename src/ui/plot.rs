use eframe::egui::Ui;
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, Points};

use crate::analysis::params::Statistic;
use crate::analysis::stats::StatOutcome;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Yearly series chart (central panel)
// ---------------------------------------------------------------------------

/// Render the aggregated series and any requested overlays.
pub fn series_plot(ui: &mut Ui, state: &AppState) {
    let message = match (&state.dataset, &state.analysis) {
        (None, _) => Some("Open a file to start  (File → Open…)"),
        (Some(_), None) => Some("Choose a category and years, then press Run"),
        (Some(_), Some(a)) if a.series.is_empty() => Some("No data after filtering"),
        _ => None,
    };
    if let Some(text) = message {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(text);
        });
        return;
    }
    let Some(analysis) = &state.analysis else {
        return;
    };

    let colors = state.colors;
    let data_points = analysis.series.to_plot_points();

    Plot::new("series_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Value (aggregated)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(data_points.clone()))
                    .name("Data")
                    .color(colors.data)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(data_points))
                    .name("Data")
                    .color(colors.data)
                    .radius(3.0),
            );

            if let Some(trend) = &analysis.trend {
                let name = match analysis.statistics.get(Statistic::Trend) {
                    Some(StatOutcome::Trend(fit)) => format!("{} ({:+.2}/yr)", trend.name, fit.slope),
                    _ => trend.name.clone(),
                };
                plot_ui.line(
                    Line::new(PlotPoints::from(trend.to_plot_points()))
                        .name(name)
                        .color(colors.trend)
                        .style(LineStyle::dashed_loose())
                        .width(1.5),
                );
            }

            if let Some(ma) = &analysis.moving_average {
                plot_ui.line(
                    Line::new(PlotPoints::from(ma.to_plot_points()))
                        .name(&ma.name)
                        .color(colors.moving_average)
                        .width(1.5),
                );
            }
        });
}
