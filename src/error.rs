// Error taxonomy for the report engine.
//
// Messy sheet content is never an error: the loader always has a fallback.
// What ends up here are transport failures, configuration problems, output
// failures and caller bugs such as asking about a site that was never loaded.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("unknown site '{0}'")]
    UnknownSite(String),

    #[error("invalid month key '{0}' (expected T<month>/<year>)")]
    InvalidMonthKey(String),

    #[error("sheet '{site}' returned HTTP {status}")]
    HttpStatus { site: String, status: u16 },

    #[error("request for sheet '{site}' failed: {source}")]
    Transport {
        site: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to load data, please retry")]
    NoData,

    #[error("configuration error in {path}: {message}")]
    Config { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
