use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Market data error: {0}")]
    MarketDataError(String),

    #[error("Indicator calculation error: {0}")]
    IndicatorError(String),

    #[error("Internal processing error: {0}")]
    ProcessingError(String),

    // Loader messages with no typed root cause (dates out of order, bad JSON values).
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// Unwraps an anyhow chain into the most specific variant available.
    pub fn from_loader(err: anyhow::Error) -> Self {
        let err = match err.downcast::<std::io::Error>() {
            Ok(source) => return EngineError::IoError { source },
            Err(err) => err,
        };
        let err = match err.downcast::<csv::Error>() {
            Ok(source) => return EngineError::CsvSystemError { source },
            Err(err) => err,
        };
        let err = match err.downcast::<serde_json::Error>() {
            Ok(source) => return EngineError::JsonError { source },
            Err(err) => err,
        };
        EngineError::AnyhowError(err)
    }

    /// Same as `from_loader`, with untyped CSV content errors reported as `CsvDataFormatError`.
    pub fn from_csv_loader(err: anyhow::Error) -> Self {
        match Self::from_loader(err) {
            EngineError::AnyhowError(err) => EngineError::CsvDataFormatError(format!("{:#}", err)),
            other => other,
        }
    }
}
