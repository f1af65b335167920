use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::analysis::chart::{ChartSpec, format_log_tick, format_value_tick, format_year_tick};
use crate::analysis::pipeline::Rendered;
use crate::analysis::registry::{ChartKind, Question};
use crate::color::{ColorMap, rgb};
use crate::state::AppState;

const NO_DATA_COLOR: Color32 = Color32::from_rgb(204, 136, 0);

// ---------------------------------------------------------------------------
// Question block (subheader + chart or warning)
// ---------------------------------------------------------------------------

/// Render one question: its subheader, then the chart or a "no data" warning.
pub fn question_block(ui: &mut Ui, state: &AppState, question: &Question, height: f32, interactive: bool) {
    ui.heading(question.subheader);
    if !question.view.uses_filter() {
        ui.weak("All countries and years; the filters do not apply.");
    }

    match state.render(question) {
        Some(Rendered::Chart(spec)) => chart(ui, &spec, &state.color_map, height, interactive),
        Some(Rendered::NoData) => {
            ui.colored_label(NO_DATA_COLOR, "⚠ No data available for this selection.");
        }
        None => {
            ui.label("No dataset loaded.");
        }
    }
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

/// Draw a [`ChartSpec`]. Log axes plot `log10` of the value; non-positive
/// values cannot be placed and are skipped.
pub fn chart(ui: &mut Ui, spec: &ChartSpec, colors: &ColorMap, height: f32, interactive: bool) {
    ui.label(RichText::new(&spec.title).strong().size(16.0));

    let mut plot = Plot::new(spec.question_id)
        .legend(Legend::default())
        .x_axis_label(spec.x_label)
        .y_axis_label(spec.y_label)
        .height(height)
        .allow_boxed_zoom(interactive)
        .allow_drag(interactive)
        .allow_scroll(interactive)
        .allow_zoom(interactive);

    let (year_axis, log_x, log_y) = (spec.year_axis, spec.log_x, spec.log_y);
    plot = plot.x_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
        if year_axis {
            format_year_tick(mark.value)
        } else if log_x {
            format_log_tick(mark.value)
        } else {
            format_value_tick(mark.value)
        }
    });

    if spec.kind == ChartKind::Bar {
        let labels: Vec<String> = spec.bars.iter().map(|b| b.label.clone()).collect();
        plot = plot.y_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            bar_label(&labels, mark.value)
        });
    } else {
        plot = plot.y_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            if log_y {
                format_log_tick(mark.value)
            } else {
                format_value_tick(mark.value)
            }
        });
    }

    plot.show(ui, |plot_ui| {
        if spec.kind == ChartKind::Bar {
            let n = spec.bars.len();
            let bars: Vec<Bar> = spec
                .bars
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    let shade = 220 - (i * 140 / n.max(1)) as u8;
                    Bar::new((n - 1 - i) as f64, b.value)
                        .name(&b.label)
                        .width(0.7)
                        .fill(Color32::from_rgb(shade, 40, 40))
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name(spec.x_label));
            return;
        }

        for series in &spec.series {
            let color = series
                .color
                .map(rgb)
                .unwrap_or_else(|| colors.color_for(&series.name));
            let points: Vec<[f64; 2]> = series
                .points
                .iter()
                .filter_map(|&[x, y]| Some([axis_value(x, log_x)?, axis_value(y, log_y)?]))
                .collect();

            match spec.kind {
                ChartKind::Scatter => {
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .name(&series.name)
                            .color(color)
                            .radius(4.0),
                    );
                }
                _ => {
                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .name(&series.name)
                            .color(color)
                            .width(2.0),
                    );
                    if spec.series.len() == 1 {
                        plot_ui.points(
                            Points::new(PlotPoints::from(points))
                                .name(&series.name)
                                .color(color)
                                .radius(3.0),
                        );
                    }
                }
            }
        }
    });
}

/// Position on the axis, `None` when a log axis cannot show the value.
fn axis_value(v: f64, log: bool) -> Option<f64> {
    if !log {
        return Some(v);
    }
    (v > 0.0).then(|| v.log10())
}

/// Country name for a bar position; bars are laid out largest on top.
fn bar_label(labels: &[String], position: f64) -> String {
    if (position - position.round()).abs() > 1e-6 || position < 0.0 {
        return String::new();
    }
    let pos = position.round() as usize;
    labels
        .len()
        .checked_sub(pos + 1)
        .and_then(|i| labels.get(i))
        .cloned()
        .unwrap_or_default()
}
