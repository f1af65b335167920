use std::borrow::Cow;
use std::collections::BTreeSet;

use super::model::{IndicatorRecord, IndicatorTable};

// ---------------------------------------------------------------------------
// Filter selection: which countries and which years
// ---------------------------------------------------------------------------

/// The user's current country set and inclusive year interval.
///
/// An empty country set selects nothing, and so does `lo > hi`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub countries: BTreeSet<String>,
    pub years: (i32, i32),
}

impl FilterSelection {
    pub fn new<I, S>(countries: I, years: (i32, i32)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterSelection {
            countries: countries.into_iter().map(Into::into).collect(),
            years,
        }
    }

    /// Whether a single record passes the selection.
    pub fn matches(&self, record: &IndicatorRecord) -> bool {
        let (lo, hi) = self.years;
        lo <= record.year
            && record.year <= hi
            && record.has_country()
            && self.countries.contains(&record.country)
    }

    /// Apply the selection, borrowing the table.
    pub fn apply<'a>(&self, table: &'a IndicatorTable) -> TableView<'a> {
        TableView {
            table,
            rows: Cow::Owned(filtered_indices(table, self)),
        }
    }
}

/// Return indices of records that pass the selection, in table order.
pub fn filtered_indices(table: &IndicatorTable, selection: &FilterSelection) -> Vec<usize> {
    if selection.countries.is_empty() || selection.years.0 > selection.years.1 {
        return Vec::new();
    }
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| selection.matches(record))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// TableView – non-owning subset of the table
// ---------------------------------------------------------------------------

/// A row subset of an [`IndicatorTable`]. Never copies or mutates records.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub table: &'a IndicatorTable,
    pub rows: Cow<'a, [usize]>,
}

impl<'a> TableView<'a> {
    /// View over every record.
    pub fn full(table: &'a IndicatorTable) -> Self {
        TableView {
            table,
            rows: Cow::Owned((0..table.len()).collect()),
        }
    }

    /// View over precomputed row indices, owned or borrowed.
    pub fn from_rows(table: &'a IndicatorTable, rows: impl Into<Cow<'a, [usize]>>) -> Self {
        TableView {
            table,
            rows: rows.into(),
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &'a IndicatorRecord> + '_ {
        self.rows.iter().map(move |&i| &self.table.records[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
