use std::collections::BTreeMap;

use super::registry::{ChartKind, LogAxis, Question, View};
use super::transform::Transformed;
use crate::data::filter::TableView;
use crate::data::model::IndicatorRecord;

// ---------------------------------------------------------------------------
// ChartSpec – everything the plot widget needs, nothing it has to compute
// ---------------------------------------------------------------------------

/// One named line or point group.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub name: String,
    /// Fixed colour; `None` means "colour by country name".
    pub color: Option<[u8; 3]>,
    pub points: Vec<[f64; 2]>,
}

/// One horizontal bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarData {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub question_id: &'static str,
    pub subheader: &'static str,
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub kind: ChartKind,
    pub log_x: bool,
    pub log_y: bool,
    /// X values are calendar years: integer ticks only.
    pub year_axis: bool,
    pub series: Vec<SeriesData>,
    /// Bars in display order, largest first.
    pub bars: Vec<BarData>,
}

impl ChartSpec {
    /// No point and no bar to draw.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty() && self.series.iter().all(|s| s.points.is_empty())
    }
}

/// Attach labels, title and chart shape to a transformed result.
pub fn build(question: &Question, data: &Transformed<'_>) -> ChartSpec {
    let log = question.view.log_axis();
    let mut spec = ChartSpec {
        question_id: question.id,
        subheader: question.subheader,
        title: question.title.to_string(),
        x_label: question.x_label,
        y_label: question.y_label,
        kind: question.view.chart_kind(),
        log_x: log == LogAxis::X,
        log_y: log == LogAxis::Y,
        year_axis: matches!(
            question.view,
            View::GlobalSum { .. } | View::CountryLines { .. } | View::MeanLines { .. }
        ),
        series: Vec::new(),
        bars: Vec::new(),
    };

    match (&question.view, data) {
        (View::GlobalSum { series }, Transformed::YearTotals(totals)) => {
            spec.series.push(SeriesData {
                name: series.label.to_string(),
                color: Some(series.color),
                points: totals.iter().map(|&(y, v)| [y as f64, v]).collect(),
            });
        }
        (View::CountryLines { value }, Transformed::Rows(rows)) => {
            spec.series = by_country(rows, |r| Some([r.year as f64, r.value(value)?]));
            for s in &mut spec.series {
                s.points.sort_by(|a, b| a[0].total_cmp(&b[0]));
            }
        }
        (View::MeanLines { series }, Transformed::YearMeans(means)) => {
            spec.series = series
                .iter()
                .enumerate()
                .map(|(i, s)| SeriesData {
                    name: s.label.to_string(),
                    color: Some(s.color),
                    points: means
                        .iter()
                        .filter_map(|m| Some([m.year as f64, m.means.get(i).copied().flatten()?]))
                        .collect(),
                })
                .collect();
        }
        (View::Scatter { x, y, .. }, Transformed::Rows(rows)) => {
            spec.series = by_country(rows, |r| Some([r.value(x)?, r.value(y)?]));
        }
        (View::LatestScatter { x, y, .. }, Transformed::Slice { year, rows }) => {
            spec.title = title_for(question, *year);
            spec.series = by_country(rows, |r| Some([r.value(x)?, r.value(y)?]));
        }
        (View::TopN { .. }, Transformed::Ranked(ranked)) => {
            spec.title = title_for(question, ranked.year);
            spec.bars = ranked
                .rows
                .iter()
                .map(|(r, v)| BarData {
                    label: if r.has_country() {
                        r.country.clone()
                    } else {
                        UNNAMED_LABEL.to_string()
                    },
                    value: *v,
                })
                .collect();
        }
        (_, Transformed::Empty) => {}
        (view, other) => {
            log::error!("{}: transform produced {other:?} for {view:?}", question.id);
        }
    }

    spec
}

/// Bar label for rows whose source had no country name.
const UNNAMED_LABEL: &str = "(unnamed)";

fn title_for(question: &Question, year: i32) -> String {
    question.title.replace("{year}", &year.to_string())
}

/// Group points by country, sorted by country name.
fn by_country<F>(rows: &TableView<'_>, point: F) -> Vec<SeriesData>
where
    F: Fn(&IndicatorRecord) -> Option<[f64; 2]>,
{
    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for record in rows.records() {
        if let Some(p) = point(record) {
            groups.entry(record.country.as_str()).or_default().push(p);
        }
    }
    groups
        .into_iter()
        .map(|(country, points)| SeriesData {
            name: country.to_string(),
            color: None,
            points,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tick formatting
// ---------------------------------------------------------------------------

/// Integer year tick, or nothing between years.
pub fn format_year_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-6 {
        format!("{:.0}", v)
    } else {
        String::new()
    }
}

/// Compact value tick: `1.5T`, `320M`, `12.5`.
pub fn format_value_tick(v: f64) -> String {
    let abs = v.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (v / 1e12, "T")
    } else if abs >= 1e9 {
        (v / 1e9, "B")
    } else if abs >= 1e6 {
        (v / 1e6, "M")
    } else if abs >= 1e4 {
        (v / 1e3, "k")
    } else {
        (v, "")
    };
    let text = format!("{scaled:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    let text = if text == "-0" { "0" } else { text };
    format!("{text}{suffix}")
}

/// Tick on a log10 axis: the plotted value is the exponent.
pub fn format_log_tick(exponent: f64) -> String {
    if (exponent - exponent.round()).abs() < 1e-6 {
        format_value_tick(10f64.powf(exponent.round()))
    } else {
        String::new()
    }
}
