use std::collections::BTreeMap;

use crate::data::model::{Record, YearTotal, YearlySeries};

/// Sum record values per year.
///
/// Values are added in encounter order within each year, so the result is
/// bit-identical for identically ordered input. The `BTreeMap` keeps years
/// ascending.
pub fn aggregate(records: &[Record]) -> YearlySeries {
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for rec in records {
        *totals.entry(rec.year).or_insert(0.0) += rec.value;
    }
    YearlySeries::from_sorted(
        totals
            .into_iter()
            .map(|(year, total)| YearTotal { year, total })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_per_year_in_ascending_order() {
        let records = vec![
            Record::new("Males", 2002, 1.0),
            Record::new("Females", 2000, 2.0),
            Record::new("Males", 2000, 3.0),
            Record::new("Females", 2002, 4.5),
        ];
        let series = aggregate(&records);
        assert_eq!(
            series.points(),
            &[
                YearTotal { year: 2000, total: 5.0 },
                YearTotal { year: 2002, total: 5.5 },
            ]
        );
    }

    #[test]
    fn years_strictly_increase_and_totals_match() {
        let records: Vec<Record> = (0..40)
            .map(|i| Record::new("Males", 1990 + (i * 7) % 11, i as f64))
            .collect();
        let series = aggregate(&records);
        let years: Vec<i32> = series.years().collect();
        assert!(years.windows(2).all(|w| w[0] < w[1]));
        for point in series.points() {
            let expected: f64 = records
                .iter()
                .filter(|r| r.year == point.year)
                .map(|r| r.value)
                .sum();
            assert_eq!(point.total, expected);
        }
    }

    #[test]
    fn missing_years_are_not_filled() {
        let records = vec![Record::new("Males", 2000, 1.0), Record::new("Males", 2005, 1.0)];
        let years: Vec<i32> = aggregate(&records).years().collect();
        assert_eq!(years, vec![2000, 2005]);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(aggregate(&[]).is_empty());
    }
}
