//! Domain error types.
//!
//! Structural absence (a missing row, a short category table) is never an
//! error: those cases degrade to `None` or an omitted category. Only the
//! conditions below surface as [`CotError`].

/// Top-level error type for cotreport.
#[derive(Debug, thiserror::Error)]
pub enum CotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to load symbols config {file}: {reason}")]
    SymbolsConfig { file: String, reason: String },

    #[error("no report mapping for symbol {0}")]
    UnknownSymbol(String),

    #[error("malformed {kind} token '{token}'")]
    MalformedNumber { token: String, kind: &'static str },

    #[error("{field} overflows: {left} - {right}")]
    Overflow {
        field: &'static str,
        left: i64,
        right: i64,
    },

    #[error("source {source_id}: {reason}")]
    Source { source_id: String, reason: String },

    #[error("failed to write {path}: {reason}")]
    Output { path: String, reason: String },

    #[error("download of {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CotError> for std::process::ExitCode {
    fn from(err: &CotError) -> Self {
        let code: u8 = match err {
            CotError::Io(_) | CotError::Output { .. } | CotError::Fetch { .. } => 1,
            CotError::ConfigParse { .. }
            | CotError::ConfigMissing { .. }
            | CotError::ConfigInvalid { .. }
            | CotError::SymbolsConfig { .. } => 2,
            CotError::Source { .. } => 3,
            CotError::MalformedNumber { .. }
            | CotError::Overflow { .. }
            | CotError::Json(_) => 4,
            CotError::UnknownSymbol(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
