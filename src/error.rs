//! Error types for the transcript generation pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`LedgerError`] - ledger ingestion errors (files, encoding, CSV, join)
//! - [`TransformError`] - key decoding and record building errors
//! - [`EnrichmentError`] - report assembly errors (theme lookup, grade words)
//! - [`RenderError`] - document and ranking-sheet writing errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. The orchestrator
//! collapses any of these into a coarse [`RunStatus`].

use thiserror::Error;

// =============================================================================
// Ledger Ingestion Errors
// =============================================================================

/// Errors during ledger ingestion.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Failed to read file.
    #[error("Failed to read ledger file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode file content.
    #[error("Failed to decode ledger content: {0}")]
    Encoding(String),

    /// Invalid CSV content.
    #[error("Invalid ledger CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file.
    #[error("Ledger file is empty")]
    EmptyFile,

    /// Key column missing from a ledger.
    #[error("Ledger #{ledger} has no '{column}' column")]
    MissingKeyColumn { ledger: usize, column: String },

    /// Join produced no rows.
    #[error("No student appears in every ledger")]
    EmptyJoin,
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors while decoding keys and building discipline records.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Encoded key does not match the `<term>.<name>/<hours>:<credits>:<form>` grammar.
    #[error("Malformed discipline key '{0}'")]
    MalformedKey(String),

    /// Numeric field of an encoded key failed to parse.
    #[error("Non-numeric {field} in discipline key '{key}'")]
    NonNumericField { key: String, field: &'static str },

    /// Mark cell is neither an integer grade nor the credited token.
    #[error("Invalid mark '{value}' for '{student}'")]
    InvalidMark { student: String, value: String },
}

// =============================================================================
// Enrichment Errors
// =============================================================================

/// Errors while assembling per-student reports.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// Failed to load the diploma-theme table.
    #[error("Theme table error: {0}")]
    Ledger(#[from] LedgerError),

    /// Student present in the ledgers but absent from the theme table.
    #[error("No diploma theme for '{0}'")]
    MissingTheme(String),

    /// Grade has no word form in the fixed grade table.
    #[error("Grade {0} has no word form")]
    UnknownGrade(u8),
}

// =============================================================================
// Render Errors
// =============================================================================

/// Errors while writing output documents.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to write a document or the ranking sheet.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write the ranking CSV.
    #[error("Ranking sheet error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type behind [`crate::transform::pipeline::run`].
/// It wraps all lower-level errors; the orchestrator reduces it to a
/// [`RunStatus`] and keeps no further detail.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Ledger ingestion error.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Enrichment error.
    #[error("Enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),

    /// Render error.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// No ledger files given.
    #[error("No ledger files to process")]
    EmptyInput,
}

// =============================================================================
// Run Status
// =============================================================================

/// Terminal state of one pipeline run.
///
/// A deliberately blunt classification: callers needing diagnostics must
/// re-run with `RUST_LOG=debug` tracing enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// All documents and the ranking sheet were written.
    Success,
    /// Ingestion, decoding, grouping, summarizing or ranking failed.
    AbortedOnTransform,
    /// Theme lookup or report assembly failed; nothing was written.
    AbortedOnEnrichment,
    /// Document or ranking-sheet writing failed; earlier files may remain.
    AbortedOnRender,
}

impl RunStatus {
    /// Numeric code reported at the CLI boundary.
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::AbortedOnTransform => 1,
            RunStatus::AbortedOnEnrichment => 2,
            RunStatus::AbortedOnRender => 3,
        }
    }

    pub fn is_success(self) -> bool {
        self == RunStatus::Success
    }
}

impl From<&PipelineError> for RunStatus {
    fn from(err: &PipelineError) -> Self {
        match err {
            PipelineError::Ledger(_)
            | PipelineError::Transform(_)
            | PipelineError::EmptyInput => RunStatus::AbortedOnTransform,
            PipelineError::Enrichment(_) => RunStatus::AbortedOnEnrichment,
            PipelineError::Render(_) => RunStatus::AbortedOnRender,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for enrichment operations.
pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // LedgerError -> PipelineError
        let ledger_err = LedgerError::EmptyFile;
        let pipeline_err: PipelineError = ledger_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // TransformError -> PipelineError
        let transform_err = TransformError::MalformedKey("1.Math".into());
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("1.Math"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(RunStatus::Success.code(), 0);
        assert_eq!(RunStatus::AbortedOnTransform.code(), 1);
        assert_eq!(RunStatus::AbortedOnEnrichment.code(), 2);
        assert_eq!(RunStatus::AbortedOnRender.code(), 3);
    }

    #[test]
    fn test_status_from_error() {
        let err: PipelineError = TransformError::MalformedKey("x".into()).into();
        assert_eq!(RunStatus::from(&err), RunStatus::AbortedOnTransform);

        let err: PipelineError = EnrichmentError::MissingTheme("Иванов Иван".into()).into();
        assert_eq!(RunStatus::from(&err), RunStatus::AbortedOnEnrichment);

        let err: PipelineError = RenderError::Io(std::io::Error::other("disk full")).into();
        assert_eq!(RunStatus::from(&err), RunStatus::AbortedOnRender);
    }
}
