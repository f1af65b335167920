use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::analysis::registry::questions;
use crate::config::{DashboardConfig, Layout};
use crate::insights::INSIGHTS;
use crate::state::AppState;
use crate::ui::{panels, plot};

const SINGLE_PLOT_HEIGHT: f32 = 480.0;
const LIST_PLOT_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Load the configured data file once; every frame reuses it.
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::from_config(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Startup failure: show only the error ----
        if let Some(err) = &self.state.fatal_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("🌍 World Bank Development Indicators");
                ui.separator();
                ui.label(RichText::new(err).color(Color32::RED).size(16.0));
            });
            return;
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("🌍 World Bank Development Indicators");
            ui.separator();
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    match self.state.layout {
                        Layout::Single => plot::question_block(
                            ui,
                            &self.state,
                            self.state.question,
                            SINGLE_PLOT_HEIGHT,
                            true,
                        ),
                        Layout::All => {
                            for question in questions() {
                                egui::CollapsingHeader::new(RichText::new(question.label).strong())
                                    .id_salt(question.id)
                                    .default_open(false)
                                    .show(ui, |ui: &mut Ui| {
                                        plot::question_block(
                                            ui,
                                            &self.state,
                                            question,
                                            LIST_PLOT_HEIGHT,
                                            false,
                                        );
                                    });
                            }
                        }
                    }
                    ui.add_space(12.0);
                    insights(ui);
                });
        });
    }
}

/// Static findings footer.
fn insights(ui: &mut Ui) {
    egui::CollapsingHeader::new("📌 Summary of Insights")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for (topic, text) in INSIGHTS {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.label(RichText::new(format!("• {topic}:")).strong());
                    ui.label(text);
                });
            }
        });
}
