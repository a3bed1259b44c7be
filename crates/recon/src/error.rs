use std::fmt;

use crate::model::Snapshot;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (zero top_n, duplicate column names, etc.).
    ConfigValidation(String),
    /// Source could not be parsed as tabular data.
    Load { snapshot: Snapshot, message: String },
    /// Source parsed but holds no rows at all.
    EmptyInput { snapshot: Snapshot },
    /// Required field absent from the header row.
    MissingField { snapshot: Snapshot, field: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl ReconError {
    /// Snapshot the failure belongs to, if it concerns a single input.
    pub fn snapshot(&self) -> Option<Snapshot> {
        match self {
            Self::Load { snapshot, .. }
            | Self::EmptyInput { snapshot }
            | Self::MissingField { snapshot, .. } => Some(*snapshot),
            Self::ConfigParse(_) | Self::ConfigValidation(_) | Self::Io(_) => None,
        }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Load { snapshot, message } => {
                write!(f, "{snapshot} file: cannot load table: {message}")
            }
            Self::EmptyInput { snapshot } => write!(f, "{snapshot} file: no rows found"),
            Self::MissingField { snapshot, field } => {
                write!(f, "required column '{field}' not found in {snapshot} file")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_field_and_snapshot() {
        let err = ReconError::MissingField {
            snapshot: Snapshot::New,
            field: "Grade".into(),
        };
        assert_eq!(err.to_string(), "required column 'Grade' not found in NEW file");
        assert_eq!(err.snapshot(), Some(Snapshot::New));
    }

    #[test]
    fn config_errors_have_no_snapshot() {
        assert_eq!(ReconError::ConfigParse("x".into()).snapshot(), None);
    }
}
