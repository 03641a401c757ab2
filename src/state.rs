use std::collections::BTreeSet;
use std::path::Path;

use crate::analysis::params::{AnalysisParams, InputError, Statistic, parse_year_bound};
use crate::analysis::report::AnalysisReport;
use crate::analysis::{self, Analysis};
use crate::color::SeriesColors;
use crate::data::filter::filter_category;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Category expression as typed by the user.
    pub category_input: String,

    /// Year bound fields; empty means "dataset bound".
    pub start_year_input: String,
    pub end_year_input: String,

    /// Statistics ticked in the side panel.
    pub selected_stats: BTreeSet<Statistic>,

    /// Result of the last successful run.
    pub analysis: Option<Analysis>,

    pub colors: SeriesColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            category_input: "all".to_string(),
            start_year_input: String::new(),
            end_year_input: String::new(),
            selected_stats: [Statistic::Average, Statistic::Trend].into(),
            analysis: None,
            colors: SeriesColors::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the previous results.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.status_message = if dataset.is_empty() {
            Some("Error: file contains no usable rows".to_string())
        } else if dataset.dropped_rows > 0 {
            Some(format!("{} rows skipped (unusable year or value)", dataset.dropped_rows))
        } else {
            None
        };
        self.start_year_input.clear();
        self.end_year_input.clear();
        self.analysis = None;
        self.dataset = Some(dataset);
    }

    /// Load a file and ingest it, reporting failures in the status line.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn toggle_stat(&mut self, stat: Statistic) {
        if !self.selected_stats.remove(&stat) {
            self.selected_stats.insert(stat);
        }
    }

    /// Year span left after applying the current category expression.
    pub fn category_year_bounds(&self) -> Option<(i32, i32)> {
        let dataset = self.dataset.as_ref()?;
        let matched = filter_category(&dataset.records, &self.category_input);
        let min = matched.iter().map(|r| r.year).min()?;
        let max = matched.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Turn the input fields into explicit parameters.
    ///
    /// Empty year fields fall back to the dataset's min/max year; any other
    /// text must parse as a year.
    pub fn params(&self) -> Result<AnalysisParams, InputError> {
        let (min_year, max_year) = self
            .dataset
            .as_ref()
            .and_then(Dataset::year_bounds)
            .unwrap_or((i32::MIN, i32::MAX));

        let bound = |input: &str, default: i32| {
            if input.trim().is_empty() {
                Ok(default)
            } else {
                parse_year_bound(input)
            }
        };

        Ok(AnalysisParams {
            category: self.category_input.clone(),
            start_year: bound(&self.start_year_input, min_year)?,
            end_year: bound(&self.end_year_input, max_year)?,
            statistics: self.selected_stats.clone(),
        })
    }

    /// Run the pipeline on the loaded dataset with the current inputs.
    pub fn run_analysis(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.status_message = Some("No dataset loaded.".to_string());
            return;
        };
        match self.params() {
            Ok(params) => {
                let result = analysis::run(&dataset.records, &params);
                self.status_message = result
                    .series
                    .is_empty()
                    .then(|| "No data after filtering.".to_string());
                self.analysis = Some(result);
            }
            Err(e) => {
                self.analysis = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Write the last analysis as JSON.
    pub fn export_report(&mut self, path: &Path) {
        let Some(analysis) = &self.analysis else {
            self.status_message = Some("Nothing to export yet.".to_string());
            return;
        };
        match AnalysisReport::new(analysis).write_json(path) {
            Ok(()) => {
                log::info!("Wrote report to {}", path.display());
                self.status_message = Some(format!("Report saved to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export report: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
