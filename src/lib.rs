//! # Transcriptgen - semester ledgers to academic statements
//!
//! Transcriptgen reconciles per-semester grade ledgers (CSV exports of
//! the faculty spreadsheets) into one academic record per student,
//! summarizes coursework by category and renders a statement document
//! per student plus an aggregate ranking sheet.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Ledger CSVs │────▶│   Ledger    │────▶│  Transform   │────▶│  Statements │
//! │ (per term)  │     │ (join, ФИО) │     │ decode/group │     │  + ranking  │
//! └─────────────┘     └─────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use transcriptgen::{run, GenerateOptions};
//!
//! let status = run(&options);
//! std::process::exit(status.code() as i32);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types and the coarse run status
//! - [`models`] - Domain models (DisciplineRecord, Mark, StudentReport)
//! - [`ledger`] - CSV ingestion with encoding auto-detection and joining
//! - [`transform`] - Decoding, grouping, summarizing, ranking, pipeline
//! - [`render`] - Statement templating and the ranking sheet

// Core modules
pub mod error;
pub mod models;

// Ingestion
pub mod ledger;

// Transformation
pub mod transform;

// Rendering
pub mod render;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    EnrichmentError, LedgerError, PipelineError, RenderError, RunStatus, TransformError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Category, DisciplineRecord, FormattedDiscipline, Mark, MarkValue, RankingEntry,
    StatementMetadata, StudentReport,
};

// =============================================================================
// Re-exports - Ledger
// =============================================================================

pub use ledger::{
    detect_delimiter, detect_encoding, join_ledgers, parse_ledger_bytes, prefix_term_columns,
    read_ledger, to_student_rows, LedgerTable, StudentRow, KEY_COLUMN,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::builder::{build_student_records, parse_raw_mark, StudentRecords};
pub use transform::decoder::decode_key;
pub use transform::formatter::{format_disciplines, hours_and_credits_label, mark_label};
pub use transform::grouper::{group_by_category, group_students, CategorizedRecords};
pub use transform::ranker::rank_students;
pub use transform::summarizer::{summarize, summarize_students};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    assemble_reports, load_diploma_themes, run, transform_ledgers, GenerateOptions,
    TransformOutcome, THEME_COLUMN,
};

// =============================================================================
// Re-exports - Render
// =============================================================================

pub use render::{
    render_statement, write_ranking, write_statements, DEFAULT_TEMPLATE, RANKING_FILE_NAME,
    STATEMENT_FILE_PREFIX,
};
