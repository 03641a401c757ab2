use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::params::Statistic;
use crate::data::model::YearlySeries;

pub const NO_DATA_MESSAGE: &str = "No data available after filtering/aggregation.";
pub const ZERO_BASELINE_NOTE: &str = "First value is 0; percent change undefined.";
pub const TREND_TOO_SHORT_NOTE: &str = "Not enough points to compute trend.";
pub const STDDEV_TOO_SHORT_NOTE: &str = "At least two points are needed for a sample standard deviation.";

// ---------------------------------------------------------------------------
// Linear fit
// ---------------------------------------------------------------------------

/// Least-squares line `total = slope * year + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    /// Change in value per year.
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, year: f64) -> f64 {
        self.slope * year + self.intercept
    }
}

/// Ordinary least-squares fit of total against year. `None` below two points.
///
/// Years are centred on their mean before accumulating, which keeps the sums
/// small for calendar-sized x values.
pub fn linear_fit(series: &YearlySeries) -> Option<LinearFit> {
    let n = series.len();
    if n < 2 {
        return None;
    }
    let mean_x = series.years().map(f64::from).sum::<f64>() / n as f64;
    let mean_y = series.totals().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for p in series.points() {
        let dx = f64::from(p.year) - mean_x;
        sxy += dx * (p.total - mean_y);
        sxx += dx * dx;
    }
    // Distinct years guarantee sxx > 0.
    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a single statistic.
#[derive(Debug, Clone, PartialEq)]
pub enum StatOutcome {
    Value(f64),
    Trend(LinearFit),
    /// Not computable for this series; the note says why.
    Undefined(String),
}

/// What [`compute`] returns for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum StatisticsResult {
    /// The series was empty; nothing was computed.
    NoData(String),
    Computed(BTreeMap<Statistic, StatOutcome>),
}

impl StatisticsResult {
    pub fn get(&self, stat: Statistic) -> Option<&StatOutcome> {
        match self {
            StatisticsResult::NoData(_) => None,
            StatisticsResult::Computed(map) => map.get(&stat),
        }
    }

    /// Numeric value of a statistic, if it was computed as a plain number.
    #[cfg(test)]
    pub fn value(&self, stat: Statistic) -> Option<f64> {
        match self.get(stat)? {
            StatOutcome::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Flatten into human-readable label / value pairs.
    pub fn entries(&self) -> Vec<LabelledValue> {
        let map = match self {
            StatisticsResult::NoData(msg) => {
                return vec![LabelledValue::new("Error", DisplayValue::Text(msg.clone()))];
            }
            StatisticsResult::Computed(map) => map,
        };

        let mut out = Vec::with_capacity(map.len());
        for (stat, outcome) in map {
            match (stat, outcome) {
                (_, StatOutcome::Trend(fit)) => {
                    out.push(LabelledValue::new(
                        "Trend Slope (value per year)",
                        DisplayValue::Number(fit.slope),
                    ));
                    out.push(LabelledValue::new("Trend Intercept", DisplayValue::Number(fit.intercept)));
                }
                (Statistic::Trend, StatOutcome::Undefined(note)) => {
                    out.push(LabelledValue::new("Trend", DisplayValue::Text(note.clone())));
                }
                (stat, StatOutcome::Undefined(note)) => {
                    let label = value_label(*stat);
                    out.push(LabelledValue::new(label, DisplayValue::Null));
                    out.push(LabelledValue::new(note_label(*stat), DisplayValue::Text(note.clone())));
                }
                (stat, StatOutcome::Value(v)) => {
                    out.push(LabelledValue::new(value_label(*stat), DisplayValue::Number(*v)));
                }
            }
        }
        out
    }
}

fn value_label(stat: Statistic) -> &'static str {
    match stat {
        Statistic::Average => "Average",
        Statistic::Max => "Max",
        Statistic::Min => "Min",
        Statistic::Median => "Median",
        Statistic::StdDev => "Std Dev",
        Statistic::PercentChange => "Percent Change (%)",
        Statistic::Trend => "Trend",
        Statistic::MovingAverage => "Moving Average",
    }
}

fn note_label(stat: Statistic) -> &'static str {
    match stat {
        Statistic::StdDev => "Std Dev Note",
        Statistic::PercentChange => "Percent Change Note",
        _ => "Note",
    }
}

/// A value as shown to the user: number, null, or an explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(f64),
    Null,
    Text(String),
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Number(v) => write!(f, "{v:.4}"),
            DisplayValue::Null => write!(f, "null"),
            DisplayValue::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledValue {
    pub label: String,
    pub value: DisplayValue,
}

impl LabelledValue {
    fn new(label: &str, value: DisplayValue) -> Self {
        LabelledValue {
            label: label.to_string(),
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compute the requested statistics over the series totals.
///
/// An empty series short-circuits to [`StatisticsResult::NoData`]. Each
/// statistic is otherwise independent: one being undefined never affects the
/// others.
pub fn compute(series: &YearlySeries, requested: &BTreeSet<Statistic>) -> StatisticsResult {
    if series.is_empty() {
        return StatisticsResult::NoData(NO_DATA_MESSAGE.to_string());
    }
    let totals: Vec<f64> = series.totals().collect();

    let mut results = BTreeMap::new();
    for &stat in requested {
        let outcome = match stat {
            Statistic::Average => StatOutcome::Value(mean(&totals)),
            Statistic::Max => StatOutcome::Value(totals.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            Statistic::Min => StatOutcome::Value(totals.iter().copied().fold(f64::INFINITY, f64::min)),
            Statistic::Median => StatOutcome::Value(median(&totals)),
            Statistic::StdDev => match sample_std_dev(&totals) {
                Some(sd) => StatOutcome::Value(sd),
                None => StatOutcome::Undefined(STDDEV_TOO_SHORT_NOTE.to_string()),
            },
            Statistic::PercentChange => percent_change(&totals),
            Statistic::Trend => match linear_fit(series) {
                Some(fit) => StatOutcome::Trend(fit),
                None => StatOutcome::Undefined(TREND_TOO_SHORT_NOTE.to_string()),
            },
            Statistic::MovingAverage => continue,
        };
        results.insert(stat, outcome);
    }
    StatisticsResult::Computed(results)
}

fn mean(vals: &[f64]) -> f64 {
    vals.iter().sum::<f64>() / vals.len() as f64
}

fn median(vals: &[f64]) -> f64 {
    let mut sorted = vals.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Bessel-corrected (N - 1) standard deviation.
fn sample_std_dev(vals: &[f64]) -> Option<f64> {
    if vals.len() < 2 {
        return None;
    }
    let m = mean(vals);
    let ss: f64 = vals.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (vals.len() - 1) as f64).sqrt())
}

fn percent_change(vals: &[f64]) -> StatOutcome {
    let (Some(&first), Some(&last)) = (vals.first(), vals.last()) else {
        return StatOutcome::Undefined(NO_DATA_MESSAGE.to_string());
    };
    if first == 0.0 {
        return StatOutcome::Undefined(ZERO_BASELINE_NOTE.to_string());
    }
    StatOutcome::Value((last - first) / first.abs() * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::YearTotal;

    fn series(points: &[(i32, f64)]) -> YearlySeries {
        YearlySeries::from_sorted(
            points
                .iter()
                .map(|&(year, total)| YearTotal { year, total })
                .collect(),
        )
    }

    fn request(stats: &[Statistic]) -> BTreeSet<Statistic> {
        stats.iter().copied().collect()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn average_of_three_years() {
        let s = series(&[(2000, 10.0), (2001, 20.0), (2002, 30.0)]);
        let res = compute(&s, &request(&[Statistic::Average]));
        assert_eq!(res.value(Statistic::Average), Some(20.0));
        assert_eq!(res.get(Statistic::Max), None);
    }

    #[test]
    fn basic_statistics() {
        let s = series(&[(2000, 4.0), (2001, 1.0), (2002, 3.0), (2003, 8.0)]);
        let res = compute(
            &s,
            &request(&[Statistic::Max, Statistic::Min, Statistic::Median, Statistic::StdDev]),
        );
        assert_eq!(res.value(Statistic::Max), Some(8.0));
        assert_eq!(res.value(Statistic::Min), Some(1.0));
        assert_eq!(res.value(Statistic::Median), Some(3.5));
        // mean 4, squared deviations 0 + 9 + 1 + 16 = 26, / 3
        assert_close(res.value(Statistic::StdDev).unwrap(), (26.0f64 / 3.0).sqrt());
    }

    #[test]
    fn odd_median_takes_middle() {
        let s = series(&[(2000, 9.0), (2001, 1.0), (2002, 5.0)]);
        let res = compute(&s, &request(&[Statistic::Median]));
        assert_eq!(res.value(Statistic::Median), Some(5.0));
    }

    #[test]
    fn percent_change_uses_first_and_last() {
        let s = series(&[(2000, -50.0), (2001, 10.0), (2002, -25.0)]);
        let res = compute(&s, &request(&[Statistic::PercentChange]));
        assert_close(res.value(Statistic::PercentChange).unwrap(), 50.0);
    }

    #[test]
    fn percent_change_from_zero_is_undefined_with_note() {
        let s = series(&[(2000, 0.0), (2001, 5.0)]);
        let res = compute(&s, &request(&[Statistic::PercentChange, Statistic::Average]));
        assert!(matches!(
            res.get(Statistic::PercentChange),
            Some(StatOutcome::Undefined(note)) if !note.is_empty()
        ));
        assert_eq!(res.value(Statistic::Average), Some(2.5));

        let entries = res.entries();
        let pct = entries.iter().find(|e| e.label == "Percent Change (%)").unwrap();
        assert_eq!(pct.value, DisplayValue::Null);
        let note = entries.iter().find(|e| e.label == "Percent Change Note").unwrap();
        assert!(matches!(&note.value, DisplayValue::Text(t) if !t.is_empty()));
    }

    #[test]
    fn trend_through_collinear_points() {
        let s = series(&[(2000, 5.0), (2001, 7.0), (2002, 9.0)]);
        let res = compute(&s, &request(&[Statistic::Trend]));
        let Some(StatOutcome::Trend(fit)) = res.get(Statistic::Trend) else {
            panic!("expected a fit, got {res:?}");
        };
        assert_eq!(fit.slope, 2.0);
        assert_eq!(fit.intercept, -3995.0);
        assert_close(fit.at(2003.0), 11.0);
    }

    #[test]
    fn single_point_trend_and_stddev_are_undefined() {
        let s = series(&[(2010, 42.0)]);
        let res = compute(&s, &request(&[Statistic::Trend, Statistic::StdDev, Statistic::Max]));
        assert_eq!(
            res.get(Statistic::Trend),
            Some(&StatOutcome::Undefined(TREND_TOO_SHORT_NOTE.to_string()))
        );
        assert!(matches!(res.get(Statistic::StdDev), Some(StatOutcome::Undefined(_))));
        assert_eq!(res.value(Statistic::Max), Some(42.0));

        let labels: Vec<String> = res.entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Max", "Std Dev", "Std Dev Note", "Trend"]);
    }

    #[test]
    fn empty_series_yields_only_error() {
        let res = compute(&YearlySeries::default(), &request(&[Statistic::Average]));
        let entries = res.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Error");
        assert!(matches!(&entries[0].value, DisplayValue::Text(t) if !t.is_empty()));
    }

    #[test]
    fn moving_average_produces_no_entry() {
        let s = series(&[(2000, 1.0), (2001, 2.0)]);
        let res = compute(&s, &request(&[Statistic::MovingAverage]));
        assert_eq!(res, StatisticsResult::Computed(BTreeMap::new()));
    }

    #[test]
    fn entries_follow_vocabulary_order() {
        let s = series(&[(2000, 5.0), (2001, 7.0), (2002, 9.0)]);
        let res = compute(&s, &Statistic::ALL.into_iter().collect());
        let labels: Vec<String> = res.entries().into_iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                "Average",
                "Max",
                "Min",
                "Median",
                "Std Dev",
                "Percent Change (%)",
                "Trend Slope (value per year)",
                "Trend Intercept",
            ]
        );
    }
}
