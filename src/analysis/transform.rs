//! Per-question reshaping: yearly sums and means, top-N ranking and the
//! latest-year slice. Everything here is plain data in, plain data out.

use std::collections::BTreeMap;

use super::registry::View;
use crate::data::filter::TableView;
use crate::data::model::IndicatorRecord;

/// Output of the transform step, ready for the presentation layer.
#[derive(Debug, Clone)]
pub enum Transformed<'a> {
    /// The selected rows, unchanged.
    Rows(TableView<'a>),
    /// `(year, total)` in year order.
    YearTotals(Vec<(i32, f64)>),
    /// Per-year means, one entry per requested column.
    YearMeans(Vec<YearMeans>),
    /// Highest values in `year`, descending.
    Ranked(Ranked<'a>),
    /// Rows from a single year.
    Slice { year: i32, rows: TableView<'a> },
    /// Nothing to show.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearMeans {
    pub year: i32,
    pub means: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct Ranked<'a> {
    pub year: i32,
    pub rows: Vec<(&'a IndicatorRecord, f64)>,
}

/// Dispatch on the question's view.
///
/// `filtered` is the user's selection; global views read `filtered.table`
/// in full instead.
pub fn transform<'a>(view: &View, filtered: &TableView<'a>) -> Transformed<'a> {
    let full = TableView::full(filtered.table);
    match view {
        View::GlobalSum { series } => {
            Transformed::YearTotals(sum_by_year(full.records(), series.column))
        }
        View::CountryLines { .. } | View::Scatter { .. } => Transformed::Rows(filtered.clone()),
        View::MeanLines { series } => {
            let columns: Vec<&str> = series.iter().map(|s| s.column).collect();
            Transformed::YearMeans(mean_by_year(filtered.records(), &columns))
        }
        View::LatestScatter { x, y, .. } => match latest_year_slice(filtered, &[*x, *y]) {
            Some((year, rows)) => Transformed::Slice { year, rows },
            None => Transformed::Empty,
        },
        View::TopN { value, n } => match top_n(full.records(), value, *n) {
            Some(ranked) => Transformed::Ranked(ranked),
            None => Transformed::Empty,
        },
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Sum `column` per year. Missing values are skipped, so a year where every
/// value is missing totals `0.0`.
pub fn sum_by_year<'r, I>(records: I, column: &str) -> Vec<(i32, f64)>
where
    I: IntoIterator<Item = &'r IndicatorRecord>,
{
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for record in records {
        let total = totals.entry(record.year).or_insert(0.0);
        if let Some(v) = record.value(column) {
            *total += v;
        }
    }
    totals.into_iter().collect()
}

/// Mean of each column per year over the defined values only.
pub fn mean_by_year<'r, I>(records: I, columns: &[&str]) -> Vec<YearMeans>
where
    I: IntoIterator<Item = &'r IndicatorRecord>,
{
    let mut acc: BTreeMap<i32, Vec<(f64, usize)>> = BTreeMap::new();
    for record in records {
        let sums = acc
            .entry(record.year)
            .or_insert_with(|| vec![(0.0, 0); columns.len()]);
        for (slot, column) in sums.iter_mut().zip(columns) {
            if let Some(v) = record.value(column) {
                slot.0 += v;
                slot.1 += 1;
            }
        }
    }

    acc.into_iter()
        .map(|(year, sums)| YearMeans {
            year,
            means: sums
                .into_iter()
                .map(|(sum, n)| (n > 0).then(|| sum / n as f64))
                .collect(),
        })
        .collect()
}

/// The `n` largest values of `column` in the latest year that has any.
///
/// Ties keep their original order.
pub fn top_n<'a, I>(records: I, column: &str, n: usize) -> Option<Ranked<'a>>
where
    I: IntoIterator<Item = &'a IndicatorRecord>,
{
    let defined: Vec<(&'a IndicatorRecord, f64)> = records
        .into_iter()
        .filter_map(|r| r.value(column).map(|v| (r, v)))
        .collect();
    let year = defined.iter().map(|(r, _)| r.year).max()?;

    let mut rows: Vec<_> = defined.into_iter().filter(|(r, _)| r.year == year).collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows.truncate(n);
    Some(Ranked { year, rows })
}

/// Rows with every column defined, restricted to the latest such year.
pub fn latest_year_slice<'a>(view: &TableView<'a>, columns: &[&str]) -> Option<(i32, TableView<'a>)> {
    let complete: Vec<usize> = view
        .rows
        .iter()
        .copied()
        .filter(|&i| {
            let record = &view.table.records[i];
            columns.iter().all(|c| record.value(c).is_some())
        })
        .collect();
    let year = complete.iter().map(|&i| view.table.records[i].year).max()?;

    let rows: Vec<usize> = complete
        .into_iter()
        .filter(|&i| view.table.records[i].year == year)
        .collect();
    Some((year, TableView::from_rows(view.table, rows)))
}
