use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::model::IndicatorTable;

/// Source column holding GDP in current US$.
pub const GDP_COLUMN: &str = "GDP_current_US";
/// Source column holding total population.
pub const POPULATION_COLUMN: &str = "population";
/// Derived column: GDP divided by population.
pub const GDP_PER_CAPITA_COLUMN: &str = "GDP_per_capita";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

// ---------------------------------------------------------------------------
// Year extraction
// ---------------------------------------------------------------------------

/// Extract the calendar year from a free-form date string.
///
/// Returns `None` for anything that is not recognisably a date; callers drop
/// such records.
pub fn parse_year(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d.year());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.year());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.year());
    }
    // Year-month, e.g. "1990-07".
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(d.year());
    }
    bare_year(s)
}

/// `"1990"` or `"1990.0"`.
fn bare_year(s: &str) -> Option<i32> {
    let v: f64 = s.parse().ok()?;
    if v.fract() != 0.0 || !(1000.0..=9999.0).contains(&v) {
        return None;
    }
    Some(v as i32)
}

// ---------------------------------------------------------------------------
// GDP per capita
// ---------------------------------------------------------------------------

/// GDP / population; `None` when either input is missing or population is zero.
pub fn gdp_per_capita(gdp: Option<f64>, population: Option<f64>) -> Option<f64> {
    let (gdp, population) = (gdp?, population?);
    if population == 0.0 {
        return None;
    }
    let v = gdp / population;
    v.is_finite().then_some(v)
}

/// Add every derived value column the table can support.
///
/// `GDP_per_capita` is only created when both source columns exist; a table
/// lacking either gets no column at all.
pub fn derive_fields(table: &mut IndicatorTable) {
    if !(table.has_column(GDP_COLUMN) && table.has_column(POPULATION_COLUMN)) {
        log::info!("'{GDP_COLUMN}' or '{POPULATION_COLUMN}' missing, skipping {GDP_PER_CAPITA_COLUMN}");
        return;
    }
    if table.has_column(GDP_PER_CAPITA_COLUMN) {
        log::warn!("Source already has a '{GDP_PER_CAPITA_COLUMN}' column, recomputing it");
    } else {
        table.columns.push(GDP_PER_CAPITA_COLUMN.to_string());
    }

    for record in &mut table.records {
        match gdp_per_capita(record.value(GDP_COLUMN), record.value(POPULATION_COLUMN)) {
            Some(v) => {
                record.values.insert(GDP_PER_CAPITA_COLUMN.to_string(), v);
            }
            None => {
                record.values.remove(GDP_PER_CAPITA_COLUMN);
            }
        }
    }
}
