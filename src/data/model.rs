use std::collections::{BTreeMap, BTreeSet};

/// Canonical name of the country column.
pub const COUNTRY_COLUMN: &str = "country";
/// Canonical name of the raw date column the year is derived from.
pub const DATE_COLUMN: &str = "date";
/// Canonical name of the derived year column.
pub const YEAR_COLUMN: &str = "year";

// ---------------------------------------------------------------------------
// Cell – one raw value read from the source file
// ---------------------------------------------------------------------------

/// A loosely typed source value, before the table schema is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Null,
}

impl Cell {
    /// Numeric interpretation: numbers as-is, text if it parses, otherwise `None`.
    /// Non-finite values count as missing.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Textual interpretation; `None` for nulls and blank text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Cell::Number(v) if v.is_finite() => Some(v.to_string()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// IndicatorRecord – one (country, year) observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct IndicatorRecord {
    /// Empty when the source row had no country name.
    pub country: String,
    /// Raw date text as found in the source.
    pub date: String,
    pub year: i32,
    /// Indicator values keyed by canonical column name; absent means missing.
    pub values: BTreeMap<String, f64>,
}

impl IndicatorRecord {
    pub fn has_country(&self) -> bool {
        !self.country.is_empty()
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        if column == YEAR_COLUMN {
            return Some(self.year as f64);
        }
        self.values.get(column).copied()
    }
}

// ---------------------------------------------------------------------------
// IndicatorTable – the complete normalized dataset
// ---------------------------------------------------------------------------

/// The normalized table. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct IndicatorTable {
    /// All records in source order.
    pub records: Vec<IndicatorRecord>,
    /// Value columns in source order (derived columns appended).
    pub columns: Vec<String>,
    /// Sorted distinct country names.
    pub countries: BTreeSet<String>,
}

impl IndicatorTable {
    /// Build the country index from the records. Unnamed records are kept
    /// but never indexed.
    pub fn from_records(records: Vec<IndicatorRecord>, columns: Vec<String>) -> Self {
        let countries = records
            .iter()
            .filter(|r| r.has_country())
            .map(|r| r.country.clone())
            .collect();
        IndicatorTable {
            records,
            columns,
            countries,
        }
    }

    /// Whether a column can be referenced, key columns included.
    pub fn has_column(&self, column: &str) -> bool {
        matches!(column, COUNTRY_COLUMN | DATE_COLUMN | YEAR_COLUMN)
            || self.columns.iter().any(|c| c == column)
    }

    /// Smallest and largest year present, `None` for an empty table.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, year: i32, values: &[(&str, f64)]) -> IndicatorRecord {
        IndicatorRecord {
            country: country.to_string(),
            date: format!("{year}-01-01"),
            year,
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn cell_numeric_interpretation() {
        assert_eq!(Cell::Text(" 12.5 ".into()).as_f64(), Some(12.5));
        assert_eq!(Cell::Text("n/a".into()).as_f64(), None);
        assert_eq!(Cell::Number(f64::NAN).as_f64(), None);
        assert_eq!(Cell::Null.as_f64(), None);
        assert_eq!(Cell::Text("  ".into()).as_text(), None);
    }

    #[test]
    fn table_indexes_countries_and_years() {
        let table = IndicatorTable::from_records(
            vec![
                record("Chile", 2001, &[("population", 1.0)]),
                record("Austria", 1999, &[]),
                record("Chile", 2003, &[]),
            ],
            vec!["population".to_string()],
        );
        assert_eq!(
            table.countries.iter().cloned().collect::<Vec<_>>(),
            vec!["Austria".to_string(), "Chile".to_string()]
        );
        assert_eq!(table.year_bounds(), Some((1999, 2003)));
        assert!(table.has_column("population"));
        assert!(table.has_column("year"));
        assert!(!table.has_column("GDP_per_capita"));
        assert_eq!(table.records[0].value("year"), Some(2001.0));
        assert_eq!(table.records[1].value("population"), None);
    }

    #[test]
    fn unnamed_records_are_kept_but_not_indexed() {
        let table = IndicatorTable::from_records(
            vec![record("", 2000, &[("population", 5.0)]), record("Chile", 2000, &[])],
            vec!["population".to_string()],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.countries.len(), 1);
        assert!(table.countries.contains("Chile"));
    }

    #[test]
    fn empty_table_has_no_year_bounds() {
        assert_eq!(IndicatorTable::default().year_bounds(), None);
    }
}
