use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::analysis::registry::questions;
use crate::config::Layout;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Global Filters");
    ui.separator();

    let Some(table) = state.table.as_ref().map(Arc::clone) else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Countries ----
    let n_selected = state.selection.countries.len();
    let n_total = table.countries.len();
    ui.strong(format!("Select Countries  ({n_selected}/{n_total})"));
    ui.add(
        egui::TextEdit::singleline(&mut state.country_search)
            .hint_text("Search…")
            .desired_width(f32::INFINITY),
    );
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    let needle = state.country_search.trim().to_lowercase();
    ScrollArea::vertical()
        .id_salt("countries")
        .max_height(280.0)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for country in &table.countries {
                if !needle.is_empty() && !country.to_lowercase().contains(&needle) {
                    continue;
                }
                let mut checked = state.selection.countries.contains(country);
                let text = RichText::new(country).color(state.color_map.color_for(country));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_country(country);
                }
            }
        });
    ui.separator();

    // ---- Year range ----
    if let Some((min_year, max_year)) = table.year_bounds() {
        ui.strong("Year Range");
        let (mut lo, mut hi) = state.selection.years;
        ui.add(egui::Slider::new(&mut lo, min_year..=max_year).text("from"));
        ui.add(egui::Slider::new(&mut hi, min_year..=max_year).text("to"));
        state.set_years(lo, hi);
        if lo > hi {
            ui.colored_label(Color32::RED, "Start year is after end year.");
        }
        ui.separator();
    }

    // ---- Question selector ----
    if state.layout == Layout::Single {
        ui.strong("Choose a Research Question");
        egui::ComboBox::from_id_salt("question")
            .selected_text(state.question.label)
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for question in questions() {
                    if ui
                        .selectable_label(state.question.id == question.id, question.label)
                        .clicked()
                    {
                        state.question = question;
                    }
                }
            });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} rows loaded, {} visible",
                table.len(),
                state.visible_rows.len()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.layout == Layout::Single, "One question")
            .clicked()
        {
            state.layout = Layout::Single;
        }
        if ui
            .selectable_label(state.layout == Layout::All, "All questions")
            .clicked()
        {
            state.layout = Layout::All;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open indicator data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}
