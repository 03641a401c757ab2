/// Analysis layer: the filter → aggregate → statistics pipeline.
///
/// ```text
///   &[Record]
///      │  filter_category / filter_year_range   (data::filter)
///      ▼
///   ┌───────────┐
///   │ aggregate │  per-year sums → YearlySeries
///   └───────────┘
///      │
///      ├──────────────► stats::compute   → StatisticsResult
///      └──────────────► overlay::*       → trend / moving-average lines
/// ```

pub mod aggregate;
pub mod overlay;
pub mod params;
pub mod report;
pub mod stats;

use crate::data::filter::{filter_category, filter_year_range};
use crate::data::model::{Record, YearlySeries};

use overlay::{Overlay, MOVING_AVERAGE_WINDOW};
use params::{AnalysisParams, Statistic};
use stats::StatisticsResult;

/// Everything one run produces for the caller and the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub params: AnalysisParams,
    /// Number of records left after both filters.
    pub matched_records: usize,
    pub series: YearlySeries,
    pub statistics: StatisticsResult,
    pub trend: Option<Overlay>,
    pub moving_average: Option<Overlay>,
}

/// Run the whole pipeline for one parameter set.
pub fn run(records: &[Record], params: &AnalysisParams) -> Analysis {
    let by_category = filter_category(records, &params.category);
    let filtered = filter_year_range(&by_category, params.start_year, params.end_year);
    let series = aggregate::aggregate(&filtered);
    let statistics = stats::compute(&series, &params.statistics);

    let trend = if params.wants(Statistic::Trend) {
        overlay::trend_overlay(&series)
    } else {
        None
    };
    let moving_average = params
        .wants(Statistic::MovingAverage)
        .then(|| overlay::moving_average_overlay(&series, MOVING_AVERAGE_WINDOW));

    log::info!(
        "Analysis for {:?} {}..={}: {} records, {} years",
        params.category,
        params.start_year,
        params.end_year,
        filtered.len(),
        series.len()
    );

    Analysis {
        params: params.clone(),
        matched_records: filtered.len(),
        series,
        statistics,
        trend,
        moving_average,
    }
}
