use thiserror::Error;

/// Classifies table loading errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableErrorKind {
    /// Required path or format not configured
    NotConfigured,
    /// File open/read failure
    FileError,
    /// Data format or decoding error (corrupt file, unknown format, etc.)
    InvalidData,
    /// Download or verification failure
    DownloadFailed,
}

/// TLD automaton error types
#[derive(Error, Debug)]
pub enum TldError {
    #[error("Parse error at line {line}: {message}")]
    ParseErrorAtLine { line: usize, message: String },

    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    #[error("Invalid usage: {0}")]
    InvalidUsage(String),

    #[error("Invalid alphabet symbol: {0:?}")]
    InvalidSymbol(char),

    #[error("Duplicate alphabet symbol: {0:?}")]
    DuplicateSymbol(char),

    #[error("Too many alphabet symbols: {0} (maximum 256)")]
    TooManySymbols(usize),

    #[error("Transition table has no states")]
    EmptyTable,

    #[error("Too many states: {0}")]
    TooManyStates(usize),

    #[error("State {state} has {actual} transitions, expected {expected}")]
    TransitionCountMismatch {
        state: usize,
        expected: usize,
        actual: usize,
    },

    #[error("State {state} token {token} targets state {target}, but only {len} states exist")]
    TransitionOutOfRange {
        state: usize,
        token: usize,
        target: usize,
        len: usize,
    },

    #[error("State {state} token {token} has invalid transition value {value}")]
    InvalidTransition { state: usize, token: usize, value: i64 },

    #[error("State {state} has invalid accept flags {flags:#04x}")]
    InvalidFlags { state: usize, flags: u8 },

    #[error("Transition table contains a cycle through state {0}")]
    CyclicTable(usize),

    #[error("Transition table accepts more than {limit} labels")]
    LanguageTooLarge { limit: usize },

    #[error("Table error: {message}")]
    TableError {
        kind: TableErrorKind,
        message: String,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TldError {
    pub(crate) fn table(kind: TableErrorKind, message: impl Into<String>) -> Self {
        TldError::TableError {
            kind,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_error_kind_is_matchable() {
        let err = TldError::table(TableErrorKind::NotConfigured, "table path not configured");
        match &err {
            TldError::TableError { kind, .. } => {
                assert!(matches!(kind, TableErrorKind::NotConfigured));
            }
            _ => panic!("expected TableError"),
        }
    }

    #[test]
    fn test_table_error_display_includes_message() {
        let err = TldError::table(TableErrorKind::DownloadFailed, "connection refused");
        let display = format!("{}", err);
        assert!(display.contains("connection refused"), "got: {}", display);
    }

    #[test]
    fn test_language_too_large_display() {
        let err = TldError::LanguageTooLarge { limit: 1024 };
        assert_eq!(
            err.to_string(),
            "Transition table accepts more than 1024 labels"
        );
    }

    #[test]
    fn test_out_of_range_display() {
        let err = TldError::TransitionOutOfRange {
            state: 3,
            token: 1,
            target: 99,
            len: 10,
        };
        assert_eq!(
            err.to_string(),
            "State 3 token 1 targets state 99, but only 10 states exist"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TldError = io.into();
        assert!(matches!(err, TldError::IoError(_)));
    }
}
