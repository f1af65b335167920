use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::analysis::pipeline::{Rendered, render_view};
use crate::analysis::registry::{Question, questions, validate_questions};
use crate::color::ColorMap;
use crate::config::{DashboardConfig, Layout};
use crate::data::filter::{FilterSelection, TableView, filtered_indices};
use crate::data::loader::load_file;
use crate::data::model::IndicatorTable;

// ---------------------------------------------------------------------------
// Table loading
// ---------------------------------------------------------------------------

/// Load a table and check it against the question catalog.
pub fn load_table(path: &Path) -> Result<Arc<IndicatorTable>> {
    let table = load_file(path)?;
    validate_questions(&table)?;
    Ok(Arc::new(table))
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table, shared read-only.
    pub table: Option<Arc<IndicatorTable>>,

    /// Current country / year selection.
    pub selection: FilterSelection,

    /// Rows passing the current selection (cached).
    pub visible_rows: Vec<usize>,

    /// Question shown in single layout.
    pub question: &'static Question,

    pub layout: Layout,

    /// Colour per country, rebuilt with the table.
    pub color_map: ColorMap,

    /// Text typed in the country search box.
    pub country_search: String,

    /// Startup failure; when set, nothing else is shown.
    pub fatal_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    pub config: DashboardConfig,
}

impl AppState {
    /// Build the state and load the configured data file.
    pub fn from_config(config: DashboardConfig) -> Self {
        let mut state = Self::empty(config);
        match load_table(&state.config.data_path) {
            Ok(table) => state.set_table(table),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", state.config.data_path.display());
                state.fatal_error = Some(format!("Error loading data: {e:#}"));
            }
        }
        state
    }

    /// State without a table.
    pub fn empty(config: DashboardConfig) -> Self {
        Self {
            table: None,
            selection: FilterSelection::default(),
            visible_rows: Vec::new(),
            question: &questions()[0],
            layout: config.layout,
            color_map: ColorMap::default(),
            country_search: String::new(),
            fatal_error: None,
            status_message: None,
            config,
        }
    }

    /// Ingest a newly loaded table, initialise the selection and colours.
    pub fn set_table(&mut self, table: Arc<IndicatorTable>) {
        let countries = self
            .config
            .default_countries
            .iter()
            .filter(|c| table.countries.contains(*c))
            .cloned();
        let years = match table.year_bounds() {
            Some((min, max)) => (self.config.start_year.clamp(min, max), max),
            None => (self.config.start_year, self.config.start_year),
        };
        self.selection = FilterSelection::new(countries, years);
        self.color_map = ColorMap::new(&table.countries);
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Load another file from the UI. Failures keep the current table.
    pub fn open_file(&mut self, path: &Path) {
        match load_table(path) {
            Ok(table) => {
                log::info!("Switched to {}", path.display());
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute `visible_rows` after a selection change.
    pub fn refilter(&mut self) {
        self.visible_rows = match &self.table {
            Some(table) => filtered_indices(table, &self.selection),
            None => Vec::new(),
        };
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.selection.countries.remove(country) {
            self.selection.countries.insert(country.to_string());
        }
        self.refilter();
    }

    /// Select every country.
    pub fn select_all(&mut self) {
        if let Some(table) = &self.table {
            self.selection.countries = table.countries.clone();
            self.refilter();
        }
    }

    /// Deselect every country.
    pub fn select_none(&mut self) {
        self.selection.countries.clear();
        self.refilter();
    }

    pub fn set_years(&mut self, lo: i32, hi: i32) {
        if self.selection.years != (lo, hi) {
            self.selection.years = (lo, hi);
            self.refilter();
        }
    }

    /// Render one question against the cached selection.
    pub fn render(&self, question: &Question) -> Option<Rendered> {
        let table = self.table.as_deref()?;
        let view = TableView::from_rows(table, self.visible_rows.as_slice());
        Some(render_view(&view, question))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::analysis::registry::lookup;
    use crate::data::model::IndicatorRecord;

    fn table() -> Arc<IndicatorTable> {
        let records = [("China", 1985), ("China", 1995), ("Chile", 2000), ("India", 2010)]
            .into_iter()
            .map(|(c, y)| IndicatorRecord {
                country: c.to_string(),
                date: format!("{y}-01-01"),
                year: y,
                values: BTreeMap::from([("inflation_annualpct".to_string(), 2.0)]),
            })
            .collect();
        Arc::new(IndicatorTable::from_records(
            records,
            vec!["inflation_annualpct".to_string()],
        ))
    }

    #[test]
    fn defaults_keep_present_countries_and_clamp_years() {
        let mut state = AppState::empty(DashboardConfig::default());
        state.set_table(table());

        let selected: Vec<&str> = state.selection.countries.iter().map(String::as_str).collect();
        assert_eq!(selected, vec!["China", "India"]);
        assert_eq!(state.selection.years, (1990, 2010));
        assert_eq!(state.visible_rows, vec![1, 3]);
    }

    #[test]
    fn start_year_below_data_is_clamped() {
        let config = DashboardConfig {
            start_year: 1900,
            ..DashboardConfig::default()
        };
        let mut state = AppState::empty(config);
        state.set_table(table());
        assert_eq!(state.selection.years, (1985, 2010));
    }

    #[test]
    fn selection_changes_refilter() {
        let mut state = AppState::empty(DashboardConfig::default());
        state.set_table(table());

        state.toggle_country("India");
        assert_eq!(state.visible_rows, vec![1]);
        state.select_all();
        assert_eq!(state.visible_rows, vec![1, 2, 3]);
        state.set_years(2005, 1990);
        assert!(state.visible_rows.is_empty());
        state.set_years(1980, 2020);
        state.select_none();
        assert!(state.visible_rows.is_empty());
        assert_eq!(
            state.render(lookup("Q12").unwrap()),
            Some(Rendered::NoData)
        );
    }

    #[test]
    fn missing_data_file_is_fatal() {
        let config = DashboardConfig {
            data_path: "does/not/exist.csv".into(),
            ..DashboardConfig::default()
        };
        let state = AppState::from_config(config);
        assert!(state.table.is_none());
        assert!(state.fatal_error.as_deref().unwrap().contains("not found"));
    }

    #[test]
    fn failed_open_keeps_current_table() {
        let mut state = AppState::empty(DashboardConfig::default());
        state.set_table(table());
        state.open_file(Path::new("does/not/exist.csv"));
        assert!(state.table.is_some());
        assert!(state.status_message.is_some());
    }
}
