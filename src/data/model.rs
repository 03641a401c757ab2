use std::collections::BTreeSet;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RawRow – one untyped input row as surfaced by the loader
// ---------------------------------------------------------------------------

/// The three textual fields the core needs from an input row.
///
/// Loaders never interpret these; coercion happens in [`Record::from_raw`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub category: String,
    pub year: String,
    pub value: String,
}

impl RawRow {
    pub fn new(category: impl Into<String>, year: impl Into<String>, value: impl Into<String>) -> Self {
        RawRow {
            category: category.into(),
            year: year.into(),
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one validated row
// ---------------------------------------------------------------------------

/// A single validated observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Category label exactly as found in the input (e.g. "Males").
    pub category: String,
    /// Calendar year, taken from a 4-digit token.
    pub year: i32,
    pub value: f64,
}

impl Record {
    pub fn new(category: impl Into<String>, year: i32, value: f64) -> Self {
        Record {
            category: category.into(),
            year,
            value,
        }
    }

    /// Coerce a raw row. Returns `None` when the year or value is unusable.
    pub fn from_raw(raw: &RawRow) -> Option<Self> {
        let year = parse_year_token(&raw.year)?;
        let value = parse_value_token(&raw.value)?;
        Some(Record::new(raw.category.trim(), year, value))
    }
}

/// Accepts exactly four ASCII digits (surrounding whitespace allowed).
pub fn parse_year_token(token: &str) -> Option<i32> {
    let token = token.trim();
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parses a numeric value; NaN is treated as missing.
pub fn parse_value_token(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded record set
// ---------------------------------------------------------------------------

/// All valid records plus the derived category set.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Distinct category labels, sorted.
    pub categories: BTreeSet<String>,
    /// Number of input rows rejected by [`Record::from_raw`].
    pub dropped_rows: usize,
}

impl Dataset {
    /// Validate raw rows, dropping the ones that fail coercion.
    pub fn from_raw_rows(rows: impl IntoIterator<Item = RawRow>) -> Self {
        let mut records = Vec::new();
        let mut dropped_rows = 0;
        for row in rows {
            match Record::from_raw(&row) {
                Some(rec) => records.push(rec),
                None => dropped_rows += 1,
            }
        }
        if dropped_rows > 0 {
            log::debug!("Dropped {dropped_rows} rows with unusable year or value");
        }
        let mut dataset = Dataset::from_records(records);
        dataset.dropped_rows = dropped_rows;
        dataset
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let categories = records.iter().map(|r| r.category.clone()).collect();
        Dataset {
            records,
            categories,
            dropped_rows: 0,
        }
    }

    /// Smallest and largest year present, if any.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// YearlySeries – aggregated output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearTotal {
    pub year: i32,
    pub total: f64,
}

/// One total per distinct year, strictly ascending by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearlySeries {
    points: Vec<YearTotal>,
}

impl YearlySeries {
    /// Callers must supply points already sorted by year without duplicates;
    /// `analysis::aggregate` is the only producer outside tests.
    pub(crate) fn from_sorted(points: Vec<YearTotal>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].year < w[1].year));
        YearlySeries { points }
    }

    pub fn points(&self) -> &[YearTotal] {
        &self.points
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.points.iter().map(|p| p.year)
    }

    pub fn totals(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.total)
    }

    /// `[year, total]` pairs ready for plotting.
    pub fn to_plot_points(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.year as f64, p.total]).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
