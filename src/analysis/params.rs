use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Errors in user-supplied analysis parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid year {input:?}: expected a whole number")]
    InvalidYearBound { input: String },
    #[error("unknown statistic {name:?}")]
    UnknownStatistic { name: String },
}

// ---------------------------------------------------------------------------
// Statistic vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Average,
    Max,
    Min,
    Median,
    StdDev,
    PercentChange,
    Trend,
    /// Chart overlay only; produces no entry in the statistics result.
    MovingAverage,
}

impl Statistic {
    pub const ALL: [Statistic; 8] = [
        Statistic::Average,
        Statistic::Max,
        Statistic::Min,
        Statistic::Median,
        Statistic::StdDev,
        Statistic::PercentChange,
        Statistic::Trend,
        Statistic::MovingAverage,
    ];

    /// Canonical user-facing keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Statistic::Average => "average",
            Statistic::Max => "max",
            Statistic::Min => "min",
            Statistic::Median => "median",
            Statistic::StdDev => "stddev",
            Statistic::PercentChange => "percent change",
            Statistic::Trend => "trend",
            Statistic::MovingAverage => "moving average",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Statistic {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase().replace('_', " ");
        if norm == "std dev" {
            return Ok(Statistic::StdDev);
        }
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.keyword() == norm)
            .ok_or_else(|| InputError::UnknownStatistic { name: s.trim().to_string() })
    }
}

/// Parse a comma-separated statistic list. Unknown names are logged and skipped.
pub fn parse_statistics(list: &str) -> BTreeSet<Statistic> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<Statistic>() {
            Ok(stat) => Some(stat),
            Err(e) => {
                log::warn!("Ignoring {e}");
                None
            }
        })
        .collect()
}

/// Parse a year bound. Non-numeric text is a hard error, never defaulted.
pub fn parse_year_bound(input: &str) -> Result<i32, InputError> {
    input
        .trim()
        .parse::<i32>()
        .map_err(|_| InputError::InvalidYearBound { input: input.to_string() })
}

// ---------------------------------------------------------------------------
// AnalysisParams
// ---------------------------------------------------------------------------

/// Everything one pipeline run needs besides the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisParams {
    pub category: String,
    pub start_year: i32,
    pub end_year: i32,
    pub statistics: BTreeSet<Statistic>,
}

impl AnalysisParams {
    pub fn wants(&self, stat: Statistic) -> bool {
        self.statistics.contains(&stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip() {
        for stat in Statistic::ALL {
            assert_eq!(stat.keyword().parse::<Statistic>(), Ok(stat));
        }
    }

    #[test]
    fn parsing_is_lenient_about_case_and_separators() {
        assert_eq!(" Percent_Change ".parse::<Statistic>(), Ok(Statistic::PercentChange));
        assert_eq!("STD DEV".parse::<Statistic>(), Ok(Statistic::StdDev));
        assert_eq!(
            "mode".parse::<Statistic>(),
            Err(InputError::UnknownStatistic { name: "mode".into() })
        );
    }

    #[test]
    fn statistic_list_skips_unknown_and_blank() {
        let stats = parse_statistics("average, , trend,bogus,Moving Average,average");
        let expected: BTreeSet<Statistic> =
            [Statistic::Average, Statistic::Trend, Statistic::MovingAverage].into();
        assert_eq!(stats, expected);
    }

    #[test]
    fn year_bounds_must_be_numeric() {
        assert_eq!(parse_year_bound(" 2010 "), Ok(2010));
        assert_eq!(
            parse_year_bound("twenty"),
            Err(InputError::InvalidYearBound { input: "twenty".into() })
        );
        assert!(parse_year_bound("").is_err());
    }
}
