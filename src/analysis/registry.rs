use crate::data::model::IndicatorTable;
use crate::error::{MissingColumn, SchemaError};

/// Bars shown by the top-N view.
pub const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// View – what a question computes and how it is drawn
// ---------------------------------------------------------------------------

/// Chart shape handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    MultiLine,
    Scatter,
    Bar,
}

/// Data reshaping applied before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    None,
    SumByYear,
    MeanByYear,
    TopN,
    LatestYearSlice,
}

/// Which axis, if any, is drawn on a log scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogAxis {
    #[default]
    Neither,
    X,
    Y,
}

/// A named value column with a fixed line colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Series {
    pub column: &'static str,
    pub label: &'static str,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Yearly total over the whole table; the country filter does not apply.
    GlobalSum { series: Series },
    /// One line per selected country.
    CountryLines { value: &'static str },
    /// Yearly mean over the selected rows, one line per series.
    MeanLines { series: &'static [Series] },
    /// Every selected observation, coloured by country.
    Scatter {
        x: &'static str,
        y: &'static str,
        log: LogAxis,
    },
    /// Selected observations from the latest year having both values.
    LatestScatter {
        x: &'static str,
        y: &'static str,
        log: LogAxis,
    },
    /// Largest values in the latest year with data, whole table.
    TopN { value: &'static str, n: usize },
}

impl View {
    pub fn aggregation(&self) -> Aggregation {
        match self {
            View::GlobalSum { .. } => Aggregation::SumByYear,
            View::CountryLines { .. } | View::Scatter { .. } => Aggregation::None,
            View::MeanLines { .. } => Aggregation::MeanByYear,
            View::LatestScatter { .. } => Aggregation::LatestYearSlice,
            View::TopN { .. } => Aggregation::TopN,
        }
    }

    pub fn chart_kind(&self) -> ChartKind {
        match self {
            View::GlobalSum { .. } | View::CountryLines { .. } => ChartKind::Line,
            View::MeanLines { .. } => ChartKind::MultiLine,
            View::Scatter { .. } | View::LatestScatter { .. } => ChartKind::Scatter,
            View::TopN { .. } => ChartKind::Bar,
        }
    }

    pub fn log_axis(&self) -> LogAxis {
        match self {
            View::Scatter { log, .. } | View::LatestScatter { log, .. } => *log,
            _ => LogAxis::Neither,
        }
    }

    /// Whether the country/year selection feeds this view.
    pub fn uses_filter(&self) -> bool {
        !matches!(self, View::GlobalSum { .. } | View::TopN { .. })
    }

    /// Every table column the view reads.
    pub fn columns(&self) -> Vec<&'static str> {
        match self {
            View::GlobalSum { series } => vec![series.column],
            View::CountryLines { value } | View::TopN { value, .. } => vec![*value],
            View::MeanLines { series } => series.iter().map(|s| s.column).collect(),
            View::Scatter { x, y, .. } | View::LatestScatter { x, y, .. } => vec![*x, *y],
        }
    }
}

// ---------------------------------------------------------------------------
// Question – one research question
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    /// Text shown in the question selector.
    pub label: &'static str,
    pub subheader: &'static str,
    /// Chart title; `{year}` is replaced with the year the data was sliced at.
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub view: View,
}

const BIRTH_DEATH: &[Series] = &[
    Series {
        column: "birth_rate",
        label: "Birth Rate",
        color: [31, 119, 180],
    },
    Series {
        column: "death_rate",
        label: "Death Rate",
        color: [214, 39, 40],
    },
];

const LAND_USE: &[Series] = &[
    Series {
        column: "forest_landpct",
        label: "Forest %",
        color: [44, 160, 44],
    },
    Series {
        column: "agricultural_landpct",
        label: "Agri %",
        color: [255, 127, 14],
    },
];

pub static QUESTIONS: [Question; 15] = [
    Question {
        id: "Q1",
        label: "Q1 Global GDP Growth",
        subheader: "Total Global GDP (Current US$) Over Time",
        title: "Total Global GDP Evolution",
        x_label: "Year",
        y_label: "GDP (US$)",
        view: View::GlobalSum {
            series: Series {
                column: "GDP_current_US",
                label: "Global GDP",
                color: [31, 119, 180],
            },
        },
    },
    Question {
        id: "Q2",
        label: "Q2 Wealth vs. Health",
        subheader: "GDP per Capita vs. Life Expectancy",
        title: "Wealth vs Health in {year}",
        x_label: "GDP per Capita (Log Scale)",
        y_label: "Life Expectancy",
        view: View::LatestScatter {
            x: "GDP_per_capita",
            y: "life_expectancy_at_birth",
            log: LogAxis::X,
        },
    },
    Question {
        id: "Q3",
        label: "Q3 Top CO₂ Emitters",
        subheader: "Top 10 CO₂ Emitters (Most Recent Year)",
        title: "Top Emitters in {year}",
        x_label: "CO2 Emissions (kt)",
        y_label: "Country",
        view: View::TopN {
            value: "CO2_emisions",
            n: TOP_N,
        },
    },
    Question {
        id: "Q4",
        label: "Q4 Renewable Energy Transition",
        subheader: "Renewable Energy Consumption Over Time",
        title: "Renewable Energy % of Total Consumption",
        x_label: "Year",
        y_label: "% Renewable",
        view: View::CountryLines {
            value: "renewvable_energy_consumptionpct",
        },
    },
    Question {
        id: "Q5",
        label: "Q5 Infrastructure & Electricity",
        subheader: "Rural Population Share vs. Electricity Access",
        title: "Impact of Rurality on Infrastructure",
        x_label: "Rural Population",
        y_label: "Access to Electricity (%)",
        view: View::Scatter {
            x: "rural_population",
            y: "access_to_electricitypct",
            log: LogAxis::Neither,
        },
    },
    Question {
        id: "Q6",
        label: "Q6 Education & Human Capital",
        subheader: "Education Spending vs. Human Capital Index",
        title: "Investment in Education vs Outcomes",
        x_label: "Gov. Education Spending (% of GDP)",
        y_label: "Human Capital Index",
        view: View::Scatter {
            x: "government_expenditure_on_educationpct",
            y: "human_capital_index",
            log: LogAxis::Neither,
        },
    },
    Question {
        id: "Q7",
        label: "Q7 Birth & Death Rates",
        subheader: "Average Global Birth vs. Death Rates",
        title: "Demographic Transition",
        x_label: "Year",
        y_label: "Rate per 1,000 People",
        view: View::MeanLines {
            series: BIRTH_DEATH,
        },
    },
    Question {
        id: "Q8",
        label: "Q8 The Digital Divide",
        subheader: "Internet Penetration vs. Economic Level",
        title: "The Link Between Wealth and Internet Access",
        x_label: "GDP per Capita (Log)",
        y_label: "Internet Usage (%)",
        view: View::Scatter {
            x: "GDP_per_capita",
            y: "individuals_using_internetpct",
            log: LogAxis::X,
        },
    },
    Question {
        id: "Q9",
        label: "Q9 Governance & Stability",
        subheader: "Corruption Control vs. Political Stability",
        title: "Governance Quality",
        x_label: "Control of Corruption",
        y_label: "Political Stability",
        view: View::Scatter {
            x: "control_of_corruption_estimate",
            y: "political_stability_estimate",
            log: LogAxis::Neither,
        },
    },
    Question {
        id: "Q10",
        label: "Q10 Land Use Change",
        subheader: "Agricultural vs. Forest Land Evolution",
        title: "Global Land Use Trend",
        x_label: "Year",
        y_label: "% of Land Area",
        view: View::MeanLines { series: LAND_USE },
    },
    Question {
        id: "Q11",
        label: "Q11 Military Spending",
        subheader: "Military Expenditure (% of GDP)",
        title: "Defense Spending Trends",
        x_label: "Year",
        y_label: "% of GDP",
        view: View::CountryLines {
            value: "military_expenditurepct",
        },
    },
    Question {
        id: "Q12",
        label: "Q12 Economic Volatility (Inflation)",
        subheader: "Annual Inflation Rates",
        title: "Consumer Price Inflation",
        x_label: "Year",
        y_label: "% Annual",
        view: View::CountryLines {
            value: "inflation_annualpct",
        },
    },
    Question {
        id: "Q13",
        label: "Q13 Health Spending Outcomes",
        subheader: "Health Spending vs. Life Expectancy",
        title: "Health Investment Efficiency",
        x_label: "Health Spending (% of GDP)",
        y_label: "Life Expectancy",
        view: View::Scatter {
            x: "government_health_expenditurepct",
            y: "life_expectancy_at_birth",
            log: LogAxis::Neither,
        },
    },
    Question {
        id: "Q14",
        label: "Q14 Safety & Wealth",
        subheader: "Homicide Rates vs. GDP",
        title: "Safety and Economic Development",
        x_label: "GDP per Capita (Log)",
        y_label: "Homicides per 100k",
        view: View::Scatter {
            x: "GDP_per_capita",
            y: "intentional_homicides",
            log: LogAxis::X,
        },
    },
    Question {
        id: "Q15",
        label: "Q15 Research & Innovation",
        subheader: "R&D Investment vs. National GDP",
        title: "Innovation vs Economic Size",
        x_label: "R&D Spending (% of GDP)",
        y_label: "Total GDP (Log Scale)",
        view: View::Scatter {
            x: "research_and_development_expenditurepct",
            y: "GDP_current_US",
            log: LogAxis::Y,
        },
    },
];

/// All questions in display order.
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

/// Exact-match lookup by identifier (`"Q1"` .. `"Q15"`).
pub fn lookup(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Check every column every question reads against the table schema.
pub fn validate_questions(table: &IndicatorTable) -> Result<(), SchemaError> {
    let missing: Vec<MissingColumn> = QUESTIONS
        .iter()
        .flat_map(|q| {
            q.view
                .columns()
                .into_iter()
                .filter(|c| !table.has_column(c))
                .map(move |column| MissingColumn {
                    question: q.label,
                    column,
                })
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { missing })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn mean_line_questions_are_titled_as_global_averages() {
        let q7 = lookup("Q7").unwrap();
        assert_eq!(q7.subheader, "Average Global Birth vs. Death Rates");
        assert_eq!(q7.title, "Demographic Transition");
        let q10 = lookup("Q10").unwrap();
        assert_eq!(q10.title, "Global Land Use Trend");
    }

    #[test]
    fn catalog_has_fifteen_unique_questions() {
        assert_eq!(questions().len(), 15);
        let ids: BTreeSet<&str> = questions().iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 15);
        for (i, q) in questions().iter().enumerate() {
            assert_eq!(q.id, format!("Q{}", i + 1));
            assert!(q.label.starts_with(&format!("{} ", q.id)), "{}", q.label);
        }
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(lookup("Q3").map(|q| q.view.chart_kind()), Some(ChartKind::Bar));
        assert!(lookup("q3").is_none());
        assert!(lookup("Q16").is_none());
        assert!(lookup("Q1 Global GDP Growth").is_none());
    }

    #[test]
    fn only_global_views_ignore_the_filter() {
        let global: Vec<&str> = questions()
            .iter()
            .filter(|q| !q.view.uses_filter())
            .map(|q| q.id)
            .collect();
        assert_eq!(global, vec!["Q1", "Q3"]);
    }

    #[test]
    fn view_metadata_is_consistent() {
        let q2 = lookup("Q2").unwrap();
        assert_eq!(q2.view.aggregation(), Aggregation::LatestYearSlice);
        assert_eq!(q2.view.log_axis(), LogAxis::X);
        assert_eq!(q2.view.columns(), vec!["GDP_per_capita", "life_expectancy_at_birth"]);

        let q7 = lookup("Q7").unwrap();
        assert_eq!(q7.view.aggregation(), Aggregation::MeanByYear);
        assert_eq!(q7.view.chart_kind(), ChartKind::MultiLine);
        assert_eq!(q7.view.columns(), vec!["birth_rate", "death_rate"]);

        assert_eq!(lookup("Q15").unwrap().view.log_axis(), LogAxis::Y);
        assert_eq!(lookup("Q1").unwrap().view.aggregation(), Aggregation::SumByYear);
    }

    #[test]
    fn validation_reports_each_missing_column() {
        let table = IndicatorTable::from_records(Vec::new(), vec!["GDP_current_US".to_string()]);
        let err = validate_questions(&table).unwrap_err();

        assert!(!err.missing.iter().any(|m| m.column == "GDP_current_US"));
        assert!(err.missing.contains(&MissingColumn {
            question: "Q2 Wealth vs. Health",
            column: "GDP_per_capita",
        }));
        assert!(err.missing.contains(&MissingColumn {
            question: "Q10 Land Use Change",
            column: "agricultural_landpct",
        }));
    }

    #[test]
    fn validation_passes_with_full_schema() {
        let columns: BTreeSet<&str> = questions().iter().flat_map(|q| q.view.columns()).collect();
        let table = IndicatorTable::from_records(
            Vec::new(),
            columns.into_iter().map(String::from).collect(),
        );
        assert!(validate_questions(&table).is_ok());
    }
}
