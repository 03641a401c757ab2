use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::overlay::Overlay;
use super::params::AnalysisParams;
use super::stats::LabelledValue;
use super::Analysis;
use crate::data::model::YearTotal;

/// Serializable snapshot of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport<'a> {
    pub params: &'a AnalysisParams,
    pub matched_records: usize,
    pub series: &'a [YearTotal],
    pub statistics: Vec<LabelledValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<&'a Overlay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_average: Option<&'a Overlay>,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        AnalysisReport {
            params: &analysis.params,
            matched_records: analysis.matched_records,
            series: analysis.series.points(),
            statistics: analysis.statistics.entries(),
            trend: analysis.trend.as_ref(),
            moving_average: analysis.moving_average.as_ref(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing report")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let text = self.to_json()?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value as JsonValue;

    use super::*;
    use crate::analysis::params::Statistic;
    use crate::analysis::run;
    use crate::data::model::Record;

    fn analysis(stats: &[Statistic]) -> Analysis {
        let records = vec![
            Record::new("Females", 2000, 0.0),
            Record::new("Females", 2001, 4.0),
        ];
        run(
            &records,
            &AnalysisParams {
                category: "female".into(),
                start_year: 2000,
                end_year: 2001,
                statistics: stats.iter().copied().collect(),
            },
        )
    }

    #[test]
    fn report_contains_null_percent_change_and_note() {
        let a = analysis(&[Statistic::PercentChange, Statistic::MovingAverage]);
        let json: JsonValue =
            serde_json::from_str(&AnalysisReport::new(&a).to_json().unwrap()).unwrap();

        assert_eq!(json["params"]["statistics"][0], "percent_change");
        assert_eq!(json["series"][1]["total"], 4.0);
        assert_eq!(json["statistics"][0]["label"], "Percent Change (%)");
        assert!(json["statistics"][0]["value"].is_null());
        assert!(json["statistics"][1]["value"].is_string());
        assert!(json.get("trend").is_none());
        assert_eq!(json["moving_average"]["points"][1][1], 2.0);
    }

    #[test]
    fn report_is_written_to_disk() {
        let a = analysis(&[Statistic::Average]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        AnalysisReport::new(&a).write_json(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"Average\""));
    }
}
