//! Typed failures of the parsing pipeline.
//!
//! Every stage maps onto one variant so callers can tell a caller fault
//! (unknown parser, bad URI) from a bad file (decode, transform, schema)
//! or an infrastructure problem (source unreachable, key store down).
//! Per-file failures are wrapped in [`ParseError::File`] so the file id
//! travels with the error into server-side diagnostics.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unknown parser '{0}'")]
    UnknownParser(String),

    #[error("invalid file URI: {0}")]
    InvalidUri(String),

    #[error("source unavailable: {url}: {reason}")]
    SourceUnavailable { url: String, reason: String },

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("transform failed at row {row}: {reason}")]
    Transform { row: usize, reason: String },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("persisted key store failed: {0}")]
    PersistedStore(String),

    #[error("parse task failed: {0}")]
    Task(String),

    #[error("file '{file_id}': {source}")]
    File {
        file_id: String,
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach the id of the file being parsed.
    ///
    /// Already-tagged errors are returned unchanged.
    pub fn for_file(self, file_id: &str) -> Self {
        match self {
            ParseError::File { .. } => self,
            other => ParseError::File {
                file_id: file_id.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying stage error, with any file tagging removed.
    pub fn root(&self) -> &ParseError {
        match self {
            ParseError::File { source, .. } => source.root(),
            other => other,
        }
    }

    /// The file id this error is tagged with, if any.
    pub fn file_id(&self) -> Option<&str> {
        match self {
            ParseError::File { file_id, .. } => Some(file_id),
            _ => None,
        }
    }

    /// Short machine-readable stage name, used as a structured log field.
    pub fn stage(&self) -> &'static str {
        match self.root() {
            ParseError::UnknownParser(_) => "registry",
            ParseError::InvalidUri(_) | ParseError::SourceUnavailable { .. } => "source",
            ParseError::Decode(_) => "decode",
            ParseError::Transform { .. } => "transform",
            ParseError::SchemaMismatch(_) => "validate",
            ParseError::PersistedStore(_) => "dedup",
            ParseError::Task(_) => "task",
            ParseError::File { .. } => unreachable!("root() never returns File"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_file_wraps_once() {
        let err = ParseError::Decode("bad header".into())
            .for_file("a")
            .for_file("b");
        assert_eq!(err.file_id(), Some("a"));
        assert!(matches!(err.root(), ParseError::Decode(_)));
        assert_eq!(err.stage(), "decode");
    }

    #[test]
    fn test_display_includes_file_and_stage_detail() {
        let err = ParseError::Transform {
            row: 3,
            reason: "invalid amount 'x'".into(),
        }
        .for_file("statement-1");
        let msg = err.to_string();
        assert!(msg.contains("statement-1"));
        assert!(msg.contains("row 3"));
    }
}
