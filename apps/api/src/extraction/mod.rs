//! Structured extraction — recovers a JSON value from free-form model output.
//!
//! Models are prompted to answer with JSON only, but routinely wrap the payload
//! in prose or markdown fences. `extract` tries a direct parse first and then
//! falls back to the span between the first `{` and the last `}`.
//!
//! The brace-pair fallback assumes a single top-level object. Output holding
//! two independent objects, or a stray `{` in prose before the real payload,
//! yields `ExtractionError::ParseError`. Callers treat that as a failed analysis.

use serde_json::Value;
use thiserror::Error;

pub mod validation;

/// Stable, loggable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionErrorKind {
    NoJsonFound,
    ParseError,
}

impl ExtractionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionErrorKind::NoJsonFound => "no-json-found",
            ExtractionErrorKind::ParseError => "parse-error",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in model output")]
    NoJsonFound { raw: String },

    #[error("model output is not valid JSON: {source}")]
    ParseError {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ExtractionError {
    pub fn kind(&self) -> ExtractionErrorKind {
        match self {
            ExtractionError::NoJsonFound { .. } => ExtractionErrorKind::NoJsonFound,
            ExtractionError::ParseError { .. } => ExtractionErrorKind::ParseError,
        }
    }

    /// The model text that failed extraction, kept for diagnostics.
    pub fn raw(&self) -> &str {
        match self {
            ExtractionError::NoJsonFound { raw } | ExtractionError::ParseError { raw, .. } => raw,
        }
    }
}

/// Parses `raw` as JSON, falling back to the first-`{`-to-last-`}` slice.
pub fn extract(raw: &str) -> Result<Value, ExtractionError> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Ok(value);
    }

    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(ExtractionError::NoJsonFound {
            raw: raw.to_string(),
        });
    };

    // "} ... {" has both characters but no enclosed span.
    if end < start {
        return Err(ExtractionError::NoJsonFound {
            raw: raw.to_string(),
        });
    }

    serde_json::from_str(&raw[start..=end]).map_err(|source| ExtractionError::ParseError {
        raw: raw.to_string(),
        source,
    })
}
