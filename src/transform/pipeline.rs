//! Pipeline orchestrator: ledgers in, statements and ranking sheet out.
//!
//! One linear pass with three abortable stages:
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────────┐   ┌───────────┐
//! │ ledgers  │──▶│  transform    │──▶│  enrichment  │──▶│  render   │
//! │ (CSV)    │   │ join, decode, │   │ themes,      │   │ documents,│
//! └──────────┘   │ group, rank   │   │ word labels  │   │ ranking   │
//!                └───────────────┘   └──────────────┘   └───────────┘
//!                 AbortedOnTransform  AbortedOnEnrichment AbortedOnRender
//! ```
//!
//! The first error abandons the run; there is no retry and no
//! partial-result mode. Whatever documents were flushed before a render
//! failure stay on disk. The terminal [`RunStatus`] carries no error
//! detail; run with `RUST_LOG=debug` for diagnostics.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::{
    EnrichmentError, EnrichmentResult, PipelineError, PipelineResult, RenderError, RunStatus,
};
use crate::ledger;
use crate::models::{RankingEntry, StatementMetadata, StudentReport};
use crate::render;
use crate::transform::builder::build_student_records;
use crate::transform::formatter::format_disciplines;
use crate::transform::grouper::{group_students, CategorizedRecords};
use crate::transform::ranker::rank_students;
use crate::transform::summarizer::summarize_students;

/// Column holding the diploma theme in the theme table.
pub const THEME_COLUMN: &str = "Тема дипломного проекта";

/// Everything one run needs; there is no other configuration channel.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Per-semester ledger files, in semester order.
    pub ledger_paths: Vec<PathBuf>,
    /// CSV with the `ФИО` and diploma-theme columns.
    pub themes_path: PathBuf,
    /// Statement template; the built-in one when absent.
    pub template_path: Option<PathBuf>,
    /// Directory receiving the documents and the ranking sheet.
    pub save_dir: PathBuf,
    /// Dates and specialty details, passed through to the renderer.
    pub metadata: StatementMetadata,
}

/// Output of the transform stage.
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    /// Per-student summarized records, student order preserved.
    pub summarized: Vec<(String, CategorizedRecords)>,
    /// Descending ranking computed before summarization.
    pub ranking: Vec<RankingEntry>,
}

/// Transform stage: ingest, join, decode, rank, group, summarize.
pub fn transform_ledgers(paths: &[PathBuf]) -> PipelineResult<TransformOutcome> {
    if paths.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        let table = ledger::read_ledger(path).map_err(PipelineError::Ledger)?;
        debug!(
            path = %path.display(),
            encoding = %table.encoding,
            rows = table.rows.len(),
            "ledger read"
        );
        tables.push(table);
    }

    let tables = ledger::prefix_term_columns(tables);
    let joined = ledger::join_ledgers(&tables).map_err(PipelineError::Ledger)?;
    info!(students = joined.rows.len(), "ledgers joined");

    let rows = ledger::to_student_rows(&joined).map_err(PipelineError::Ledger)?;
    let students = build_student_records(&rows)?;

    // Ranking runs on the unsummarized records.
    let ranking = rank_students(&students);

    let grouped = group_students(&students);
    let summarized = summarize_students(grouped);
    info!(students = summarized.len(), "records grouped and summarized");

    Ok(TransformOutcome {
        summarized,
        ranking,
    })
}

/// Load the diploma-theme lookup.
pub fn load_diploma_themes(path: &Path) -> EnrichmentResult<HashMap<String, String>> {
    let table = ledger::read_ledger(path)?;

    let name_pos = table
        .headers
        .iter()
        .position(|h| h == ledger::KEY_COLUMN)
        .ok_or_else(|| {
            EnrichmentError::Ledger(crate::error::LedgerError::MissingKeyColumn {
                ledger: 1,
                column: ledger::KEY_COLUMN.to_string(),
            })
        })?;
    let theme_pos = table
        .headers
        .iter()
        .position(|h| h == THEME_COLUMN)
        .ok_or_else(|| {
            EnrichmentError::Ledger(crate::error::LedgerError::MissingKeyColumn {
                ledger: 1,
                column: THEME_COLUMN.to_string(),
            })
        })?;

    Ok(table
        .rows
        .iter()
        .map(|row| (row[name_pos].clone(), row[theme_pos].clone()))
        .collect())
}

/// Enrichment stage: theme lookup plus word-form projection.
///
/// A student present in the ledgers but absent from the theme table
/// aborts the whole run before anything is written.
pub fn assemble_reports(
    summarized: &[(String, CategorizedRecords)],
    themes: &HashMap<String, String>,
) -> EnrichmentResult<Vec<StudentReport>> {
    summarized
        .iter()
        .map(|(full_name, categorized)| {
            let diploma_theme = themes
                .get(full_name)
                .ok_or_else(|| EnrichmentError::MissingTheme(full_name.clone()))?
                .clone();

            Ok(StudentReport {
                full_name: full_name.clone(),
                diploma_theme,
                regular: format_disciplines(&categorized.regular)?,
                course_work: format_disciplines(&categorized.course_work)?,
                course_project: format_disciplines(&categorized.course_project)?,
                practice: format_disciplines(&categorized.practice)?,
            })
        })
        .collect()
}

/// Run the whole pipeline, reducing any failure to a coarse status.
pub fn run(options: &GenerateOptions) -> RunStatus {
    match run_stages(options) {
        Ok(written) => {
            info!(documents = written, "run complete");
            RunStatus::Success
        }
        Err(err) => {
            let status = RunStatus::from(&err);
            error!(code = status.code(), "pipeline aborted: {err}");
            status
        }
    }
}

fn run_stages(options: &GenerateOptions) -> PipelineResult<usize> {
    info!(ledgers = options.ledger_paths.len(), "starting run");
    let outcome = transform_ledgers(&options.ledger_paths)?;

    let themes = load_diploma_themes(&options.themes_path)?;
    let reports = assemble_reports(&outcome.summarized, &themes)?;
    info!(reports = reports.len(), "reports assembled");

    let template = match &options.template_path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(RenderError::from)
            .map_err(PipelineError::Render)?,
        None => render::DEFAULT_TEMPLATE.to_string(),
    };

    let paths = render::write_statements(&options.save_dir, &reports, &options.metadata, &template)?;
    render::write_ranking(&options.save_dir, &outcome.ranking)?;

    Ok(paths.len())
}
