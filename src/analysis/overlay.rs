use serde::Serialize;

use super::stats::linear_fit;
use crate::data::model::YearlySeries;

/// Trailing window used for the moving-average overlay.
pub const MOVING_AVERAGE_WINDOW: usize = 3;

/// A derived series drawn alongside the aggregated one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub name: String,
    /// `(year, value)` pairs, one per year of the source series.
    pub points: Vec<(i32, f64)>,
}

impl Overlay {
    pub fn to_plot_points(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|&(y, v)| [y as f64, v]).collect()
    }
}

/// Fitted trend values at every year. `None` below two points.
pub fn trend_overlay(series: &YearlySeries) -> Option<Overlay> {
    let fit = linear_fit(series)?;
    Some(Overlay {
        name: "Trend Line".to_string(),
        points: series
            .years()
            .map(|year| (year, fit.at(f64::from(year))))
            .collect(),
    })
}

/// Trailing moving average; the first points use the shorter window available.
pub fn moving_average_overlay(series: &YearlySeries, window: usize) -> Overlay {
    let window = window.max(1);
    let totals: Vec<f64> = series.totals().collect();
    let points = series
        .years()
        .enumerate()
        .map(|(i, year)| {
            let slice = &totals[(i + 1).saturating_sub(window)..=i];
            (year, slice.iter().sum::<f64>() / slice.len() as f64)
        })
        .collect();
    Overlay {
        name: format!("Moving Average ({window}-Year)"),
        points,
    }
}
