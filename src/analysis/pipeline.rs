use super::chart::{self, ChartSpec};
use super::registry::{Question, lookup};
use super::transform::transform;
use crate::data::filter::{FilterSelection, TableView};
use crate::data::model::IndicatorTable;

/// What the dashboard shows for one question.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Chart(ChartSpec),
    /// The selection left nothing to plot.
    NoData,
}

impl Rendered {
    pub fn chart(&self) -> Option<&ChartSpec> {
        match self {
            Rendered::Chart(spec) => Some(spec),
            Rendered::NoData => None,
        }
    }
}

/// Filter, transform and describe one question's chart.
pub fn render(table: &IndicatorTable, selection: &FilterSelection, question: &Question) -> Rendered {
    render_view(&selection.apply(table), question)
}

/// [`render`] by question identifier; `None` for an unknown id.
pub fn render_by_id(table: &IndicatorTable, selection: &FilterSelection, id: &str) -> Option<Rendered> {
    lookup(id).map(|q| render(table, selection, q))
}

/// Same as [`render`] with an already filtered view.
pub fn render_view(filtered: &TableView<'_>, question: &Question) -> Rendered {
    if question.view.uses_filter() && filtered.is_empty() {
        log::debug!("{}: selection is empty", question.id);
        return Rendered::NoData;
    }

    let spec = chart::build(question, &transform(&question.view, filtered));
    if spec.is_empty() {
        log::debug!("{}: nothing to plot", question.id);
        Rendered::NoData
    } else {
        Rendered::Chart(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::IndicatorRecord;

    fn table() -> IndicatorTable {
        let rows: &[(&str, i32, &[(&str, f64)])] = &[
            ("A", 2000, &[("GDP_current_US", 100.0), ("CO2_emisions", 5.0)]),
            ("B", 2000, &[("GDP_current_US", 50.0), ("CO2_emisions", 9.0)]),
            ("A", 2001, &[("GDP_current_US", 200.0)]),
        ];
        IndicatorTable::from_records(
            rows.iter()
                .map(|(c, y, vals)| IndicatorRecord {
                    country: c.to_string(),
                    date: format!("{y}-01-01"),
                    year: *y,
                    values: vals.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                })
                .collect(),
            vec!["GDP_current_US".into(), "CO2_emisions".into()],
        )
    }

    #[test]
    fn empty_selection_is_no_data_for_filtered_views() {
        let t = table();
        let nobody = FilterSelection::new(Vec::<String>::new(), (2000, 2001));
        assert_eq!(render_by_id(&t, &nobody, "Q4"), Some(Rendered::NoData));
        assert_eq!(render_by_id(&t, &nobody, "Q7"), Some(Rendered::NoData));
    }

    #[test]
    fn global_views_render_without_a_selection() {
        let t = table();
        let nobody = FilterSelection::new(Vec::<String>::new(), (2005, 2000));

        let q1 = render_by_id(&t, &nobody, "Q1").unwrap();
        let spec = q1.chart().unwrap();
        assert_eq!(spec.series[0].points, vec![[2000.0, 150.0], [2001.0, 200.0]]);

        let q3 = render_by_id(&t, &nobody, "Q3").unwrap();
        let spec = q3.chart().unwrap();
        assert_eq!(spec.title, "Top Emitters in 2000");
        assert_eq!(spec.bars[0].label, "B");
    }

    #[test]
    fn rows_without_values_render_as_no_data() {
        let t = table();
        let everyone = FilterSelection::new(["A", "B"], (2000, 2001));
        // No life expectancy anywhere.
        assert_eq!(render_by_id(&t, &everyone, "Q2"), Some(Rendered::NoData));
    }

    #[test]
    fn unknown_question_id() {
        let t = table();
        assert!(render_by_id(&t, &FilterSelection::default(), "Q99").is_none());
    }
}
