//! Error types for loading the dataset and answering queries.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures while reading the source table.
///
/// Row- and field-level problems never surface here; they degrade to skipped
/// rows or null values inside the loader.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Neither the configured path nor any fallback exists.
    #[error("could not find CSV file {requested:?} (also tried {tried:?})")]
    NotFound {
        requested: PathBuf,
        tried: Vec<PathBuf>,
    },

    /// The source has no header row at all.
    #[error("CSV file {path:?} is empty")]
    Empty { path: PathBuf },

    /// One or more required columns are absent from the header.
    #[error("CSV missing required columns: {missing:?}. Found: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV header")]
    Csv(#[from] csv::Error),
}

/// Broad category of a [`QueryError`], for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Argument of the wrong type.
    Type,
    /// Argument of the right type but an invalid value.
    Value,
    /// The dataset could not be loaded.
    Load,
}

/// Query-boundary error.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{func}() requires {expected} for '{param}', got {got}")]
    Type {
        func: &'static str,
        param: &'static str,
        expected: &'static str,
        got: String,
    },

    #[error("{func}(): {message}")]
    Value { func: &'static str, message: String },

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Type { .. } | QueryError::UnknownOperation(_) => ErrorKind::Type,
            QueryError::Value { .. } => ErrorKind::Value,
            QueryError::Load(_) => ErrorKind::Load,
        }
    }

    pub(crate) fn value(func: &'static str, message: impl Into<String>) -> Self {
        QueryError::Value {
            func,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_function_and_parameter() {
        let err = QueryError::Type {
            func: "getMissionsByYear",
            param: "year",
            expected: "an integer",
            got: "bool (true)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "getMissionsByYear() requires an integer for 'year', got bool (true)"
        );
        assert_eq!(err.kind(), ErrorKind::Type);

        let err = QueryError::value("getMissionsByYear", "'year' must be >= 1, got 0.");
        assert_eq!(err.to_string(), "getMissionsByYear(): 'year' must be >= 1, got 0.");
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn missing_columns_lists_both_sides() {
        let err = LoadError::MissingColumns {
            missing: vec!["Rocket".into()],
            found: vec!["Company".into(), "Date".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"Rocket\""));
        assert!(msg.contains("\"Company\", \"Date\""));
        assert_eq!(QueryError::from(err).kind(), ErrorKind::Load);
    }
}
