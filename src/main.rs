mod analysis;
mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use analysis::params::parse_statistics;
use app::RustyTrendsApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // rusty-trends [FILE] [STATS], e.g. `data.csv "average,trend"`
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);
    let initial_stats = std::env::args_os()
        .nth(2)
        .and_then(|s| s.into_string().ok())
        .map(|s| parse_statistics(&s));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Trends – Yearly Series Explorer",
        options,
        Box::new(move |_cc| {
            let mut app = match &initial_file {
                Some(path) => RustyTrendsApp::with_file(path),
                None => RustyTrendsApp::default(),
            };
            if let Some(stats) = initial_stats {
                app.state.selected_stats = stats;
            }
            Ok(Box::new(app))
        }),
    )
}
