use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array, StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::derive::{derive_fields, parse_year};
use super::model::{COUNTRY_COLUMN, Cell, DATE_COLUMN, IndicatorRecord, IndicatorTable};
use super::normalize::normalize_headers;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an indicator table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one observation per line (the World Bank export)
/// * `.json`    – `[{ "country": "...", "date": "...", ...indicators }, ...]`
/// * `.parquet` – flat columns of strings, numbers or dates
///
/// The result is fully prepared: headers normalized, years derived (rows
/// without one dropped) and `GDP_per_capita` added when possible.
pub fn load_file(path: &Path) -> Result<IndicatorTable> {
    if !path.exists() {
        return Err(LoadError::Missing(path.to_path_buf()).into());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    let table = build_table(raw)?;
    log::info!(
        "Loaded {} rows, {} countries, {} value columns from {}",
        table.len(),
        table.countries.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

static NULL_CELL: Cell = Cell::Null;

// ---------------------------------------------------------------------------
// RawTable – headers + cells, straight from the file
// ---------------------------------------------------------------------------

/// Un-normalized rows as read from any source format.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Normalize headers, type the cells and derive the year and per-capita fields.
pub fn build_table(raw: RawTable) -> Result<IndicatorTable> {
    let columns = normalize_headers(raw.headers.iter().map(String::as_str));

    let position = |name: &str| {
        columns
            .iter()
            .find(|(_, canonical)| canonical == name)
            .map(|(idx, _)| *idx)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let country_idx = position(COUNTRY_COLUMN)?;
    let date_idx = position(DATE_COLUMN)?;

    let value_columns: Vec<(usize, String)> = columns
        .into_iter()
        .filter(|(idx, _)| *idx != country_idx && *idx != date_idx)
        .collect();

    let mut records = Vec::with_capacity(raw.rows.len());
    let mut undated = 0usize;
    let mut unnamed = 0usize;

    for row in &raw.rows {
        let cell = |idx: usize| row.get(idx).unwrap_or(&NULL_CELL);

        let date = cell(date_idx).as_text().unwrap_or_default();
        let Some(year) = parse_year(&date) else {
            undated += 1;
            continue;
        };
        // Unnamed rows still count towards the global views.
        let country = cell(country_idx).as_text().unwrap_or_else(|| {
            unnamed += 1;
            String::new()
        });

        let values: BTreeMap<String, f64> = value_columns
            .iter()
            .filter_map(|(idx, name)| cell(*idx).as_f64().map(|v| (name.clone(), v)))
            .collect();

        records.push(IndicatorRecord {
            country,
            date,
            year,
            values,
        });
    }

    if undated > 0 {
        log::debug!("Dropped {undated} rows with an unparseable date");
    }
    if unnamed > 0 {
        log::warn!("{unnamed} rows have no country name and can only appear in global views");
    }

    let mut table = IndicatorTable::from_records(
        records,
        value_columns.into_iter().map(|(_, name)| name).collect(),
    );
    derive_fields(&mut table);
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RawTable { headers, rows })
}

fn guess_cell_type(s: &str) -> Cell {
    let s = s.trim();
    if s.is_empty() {
        return Cell::Null;
    }
    match s.parse::<f64>() {
        Ok(v) => Cell::Number(v),
        Err(_) => Cell::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "country": "Chile", "date": "2001-01-01", "population": 15.5e6 },
///   ...
/// ]
/// ```
///
/// The header set is the union of keys, in first-seen order.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(Cell::Null))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => guess_cell_type(s),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per indicator.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Dates may be strings, `Date32`,
/// `Date64` or timestamps (pandas' default for datetime columns).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .map(as_date32)
            .collect::<Result<Vec<ArrayRef>>>()?;
        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| extract_cell(col, row)).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

/// Narrow `Timestamp` and `Date64` columns to `Date32`; only the calendar
/// date is ever read.
fn as_date32(col: &ArrayRef) -> Result<ArrayRef> {
    match col.data_type() {
        DataType::Timestamp(..) | DataType::Date64 => cast(col.as_ref(), &DataType::Date32)
            .with_context(|| format!("casting {} column to Date32", col.data_type())),
        _ => Ok(Arc::clone(col)),
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|s| Cell::Text(s.value(row).to_string()))
            .unwrap_or(Cell::Null),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| Cell::Number(a.value(row) as f64))
            .unwrap_or(Cell::Null),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| Cell::Number(a.value(row) as f64))
            .unwrap_or(Cell::Null),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| Cell::Number(a.value(row) as f64))
            .unwrap_or(Cell::Null),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| Cell::Number(a.value(row)))
            .unwrap_or(Cell::Null),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| Cell::Number(if a.value(row) { 1.0 } else { 0.0 }))
            .unwrap_or(Cell::Null),
        DataType::Date32 => any
            .downcast_ref::<Date32Array>()
            .and_then(|a| a.value_as_date(row))
            .map(|d| Cell::Text(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Cell::Null),
        other => {
            log::debug!("Unsupported parquet column type {other:?}, treating as missing");
            Cell::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn raw(headers: &[&str], rows: &[&[Cell]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows.iter().map(|r| r.to_vec()).collect(),
        }
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn build_table_normalizes_and_drops_undated_rows() {
        let table = build_table(raw(
            &[" country", "date ", "access_to_electricity%", "GDP_current_US", "population"],
            &[
                &[text("Chile"), text("2001-01-01"), Cell::Number(90.0), Cell::Number(100.0), Cell::Number(4.0)],
                &[text("Chile"), text("someday"), Cell::Number(91.0), Cell::Null, Cell::Null],
                &[text("Peru"), Cell::Number(2003.0), text(".."), Cell::Number(5.0), Cell::Null],
            ],
        ))
        .unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_column("access_to_electricitypct"));
        assert!(table.has_column("GDP_per_capita"));
        assert_eq!(table.records[0].value("access_to_electricitypct"), Some(90.0));
        assert_eq!(table.records[0].value("GDP_per_capita"), Some(25.0));
        assert_eq!(table.records[1].year, 2003);
        assert_eq!(table.records[1].value("access_to_electricitypct"), None);
        assert_eq!(table.records[1].value("GDP_per_capita"), None);
    }

    #[test]
    fn rows_without_a_country_are_kept_out_of_the_index() {
        let table = build_table(raw(
            &["country", "date", "GDP_current_US"],
            &[
                &[text("A"), text("2000-01-01"), Cell::Number(100.0)],
                &[Cell::Null, text("2000-01-01"), Cell::Number(50.0)],
                &[text("  "), text("2001-01-01"), Cell::Number(25.0)],
            ],
        ))
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.countries.iter().collect::<Vec<_>>(), vec!["A"]);
        assert!(!table.records[1].has_country());
        assert!(!table.records[2].has_country());
    }

    #[test]
    fn missing_key_column_is_an_error() {
        let err = build_table(raw(&["country", "population"], &[])).unwrap_err();
        assert!(format!("{err:#}").contains("'date'"), "{err:#}");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_file(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err.downcast_ref::<LoadError>(), Some(LoadError::Missing(_))));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(file, "country,date").unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }

    #[test]
    fn loads_csv_with_blank_cells() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "country,date,birth_rate,death_rate").unwrap();
        writeln!(file, "Chile,1990-01-01,22.5,").unwrap();
        writeln!(file, "Chile,,21.0,6.0").unwrap();
        writeln!(file, "Peru,1991-01-01,,7.5").unwrap();
        file.flush().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].value("birth_rate"), Some(22.5));
        assert_eq!(table.records[0].value("death_rate"), None);
        assert_eq!(table.records[1].value("death_rate"), Some(7.5));
        assert!(!table.has_column("GDP_per_capita"));
    }

    #[test]
    fn loads_json_records() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{"country": "Chile", "date": "2000-01-01", "inflation_annual%": 3.8}},
                {{"country": "Peru", "date": 2001, "inflation_annual%": null, "population": 26.0}}
            ]"#
        )
        .unwrap();
        file.flush().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].value("inflation_annualpct"), Some(3.8));
        assert_eq!(table.records[1].year, 2001);
        assert_eq!(table.records[1].value("inflation_annualpct"), None);
        assert_eq!(table.records[1].value("population"), Some(26.0));
    }

    #[test]
    fn loads_parquet_columns() {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("date", DataType::Utf8, true),
            Field::new("CO2_emisions", DataType::Float64, true),
            Field::new("population", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Chile", "Peru"])),
                Arc::new(StringArray::from(vec![Some("2010-01-01"), None])),
                Arc::new(Float64Array::from(vec![Some(80.5), Some(60.0)])),
                Arc::new(Int64Array::from(vec![Some(17), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].country, "Chile");
        assert_eq!(table.records[0].year, 2010);
        assert_eq!(table.records[0].value("CO2_emisions"), Some(80.5));
        assert_eq!(table.records[0].value("population"), Some(17.0));
    }

    #[test]
    fn loads_parquet_timestamp_and_date64_dates() {
        use arrow::array::{Date64Array, TimestampNanosecondArray};
        use arrow::datatypes::{Field, Schema, TimeUnit};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        // 2000-01-01 and 2001-01-01 at midnight UTC.
        let millis = [946_684_800_000_i64, 978_307_200_000];
        let schema = Arc::new(Schema::new(vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("date", DataType::Timestamp(TimeUnit::Nanosecond, None), true),
            Field::new("recorded", DataType::Date64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Chile", "Peru"])),
                Arc::new(TimestampNanosecondArray::from(
                    millis.iter().map(|ms| ms * 1_000_000).collect::<Vec<_>>(),
                )),
                Arc::new(Date64Array::from(millis.to_vec())),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let raw = load_parquet(file.path()).unwrap();
        assert_eq!(raw.rows[0][1], text("2000-01-01"));
        assert_eq!(raw.rows[1][2], text("2001-01-01"));

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].year, 2000);
        assert_eq!(table.records[1].year, 2001);
    }
}
