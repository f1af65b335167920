use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Structural problems with the input file. Always fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("required column '{0}' not found in the data file")]
    MissingColumn(String),
}

/// A question referencing a column the loaded table does not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn {
    pub question: &'static str,
    pub column: &'static str,
}

impl fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} needs column '{}'", self.question, self.column)
    }
}

/// Question definitions that do not match the table schema.
#[derive(Debug, Error)]
#[error("{} question column(s) missing from the data: {}", .missing.len(), join(.missing))]
pub struct SchemaError {
    pub missing: Vec<MissingColumn>,
}

fn join(missing: &[MissingColumn]) -> String {
    missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_every_miss() {
        let err = SchemaError {
            missing: vec![
                MissingColumn {
                    question: "Q2 Wealth vs. Health",
                    column: "GDP_per_capita",
                },
                MissingColumn {
                    question: "Q9 Governance & Stability",
                    column: "control_of_corruption_estimate",
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "2 question column(s) missing from the data: Q2 Wealth vs. Health needs column \
             'GDP_per_capita'; Q9 Governance & Stability needs column \
             'control_of_corruption_estimate'"
        );
    }

    #[test]
    fn load_error_messages() {
        assert_eq!(
            LoadError::MissingColumn("date".into()).to_string(),
            "required column 'date' not found in the data file"
        );
        assert_eq!(
            LoadError::Missing(PathBuf::from("wdi.csv")).to_string(),
            "data file not found: wdi.csv"
        );
    }
}
