//! Domain models for the transcript generation pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`MarkValue`] / [`Mark`] - a single grade, the credited token, or a merged sequence
//! - [`Category`] - the four fixed discipline categories
//! - [`DisciplineRecord`] - one discipline instance for one student in one term
//! - [`FormattedDiscipline`] - display-ready (name, hours/credits, mark) triple
//! - [`StudentReport`] - per-student projection handed to the renderer
//! - [`RankingEntry`] - (name, average mark) pair for the ranking sheet
//! - [`StatementMetadata`] - shared dates and specialty details

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Control-form abbreviation marking a practice discipline.
pub const PRACTICE_ABBREVIATION: &str = "ПР";
/// Control-form abbreviation marking a course project.
pub const COURSE_PROJECT_ABBREVIATION: &str = "КП";
/// Control-form abbreviation marking a course work.
pub const COURSE_WORK_ABBREVIATION: &str = "КР";
/// Control form assigned to records produced by the summarizer.
pub const SUMMARIZED_ABBREVIATION: &str = "СФ";

/// Raw ledger token for a credited (pass/fail) mark.
pub const CREDITED_TOKEN: &str = "зч";

// =============================================================================
// Marks
// =============================================================================

/// A single mark value as it appears in a ledger cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MarkValue {
    /// Numeric grade on the ten-point scale.
    Grade(u8),
    /// Credited (зачтено) - pass without a numeric grade.
    Credited,
}

impl MarkValue {
    /// The numeric grade, if this is one.
    pub fn grade(self) -> Option<u8> {
        match self {
            MarkValue::Grade(g) => Some(g),
            MarkValue::Credited => None,
        }
    }
}

/// The mark attribute of a [`DisciplineRecord`].
///
/// Starts life as a single value; the summarizer replaces merged regular
/// records' marks with the ordered sequence of the group members' values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Mark {
    Single(MarkValue),
    Sequence(Vec<MarkValue>),
}

impl Mark {
    /// The underlying values in order, regardless of shape.
    pub fn values(&self) -> &[MarkValue] {
        match self {
            Mark::Single(v) => std::slice::from_ref(v),
            Mark::Sequence(vs) => vs,
        }
    }
}

// =============================================================================
// Categories
// =============================================================================

/// Discipline category, frozen when the record is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Regular,
    CourseWork,
    CourseProject,
    Practice,
}

impl Category {
    /// Classify a control-form abbreviation.
    ///
    /// Total: the three special abbreviations map to their categories,
    /// every other code is [`Category::Regular`].
    pub fn from_control_form(code: &str) -> Self {
        match code {
            PRACTICE_ABBREVIATION => Category::Practice,
            COURSE_PROJECT_ABBREVIATION => Category::CourseProject,
            COURSE_WORK_ABBREVIATION => Category::CourseWork,
            _ => Category::Regular,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Regular => "regular",
            Category::CourseWork => "course_work",
            Category::CourseProject => "course_project",
            Category::Practice => "practice",
        }
    }
}

// =============================================================================
// Discipline Records
// =============================================================================

/// One discipline instance for one student in one term.
///
/// Created by the record builder from a decoded key and a raw mark.
/// Only the summarizer replaces records after that (merging regular
/// disciplines that repeat across terms); nothing mutates them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisciplineRecord {
    /// Control-form code (exam, test, ...); `СФ` once summarized.
    pub control_form: String,
    /// Discipline name as it appears in the ledger column.
    pub name: String,
    /// Term number, 1-based.
    pub term: u32,
    /// The mark; a sequence after summarization.
    pub mark: Mark,
    /// Total study hours.
    pub study_hours: u32,
    /// Credit units; fractional values occur in real curricula.
    pub credit_units: f64,
    /// Category, frozen at creation.
    pub category: Category,
}

// =============================================================================
// Report Projections
// =============================================================================

/// Display-ready projection of one discipline line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedDiscipline {
    /// Discipline name.
    pub name: String,
    /// `"<hours>"` or `"<hours> (<credits> з.е.)"`.
    pub hours_and_credits: String,
    /// Word form of the mark(s).
    pub mark: String,
}

impl FormattedDiscipline {
    pub fn new(
        name: impl Into<String>,
        hours_and_credits: impl Into<String>,
        mark: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            hours_and_credits: hours_and_credits.into(),
            mark: mark.into(),
        }
    }
}

/// Final per-student projection, one-to-one with a rendered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentReport {
    pub full_name: String,
    pub diploma_theme: String,
    pub regular: Vec<FormattedDiscipline>,
    pub course_work: Vec<FormattedDiscipline>,
    pub course_project: Vec<FormattedDiscipline>,
    pub practice: Vec<FormattedDiscipline>,
}

/// One row of the aggregate ranking sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub full_name: String,
    /// Arithmetic mean over numeric grades only; 0.0 when there are none.
    pub average: f64,
}

// =============================================================================
// Statement Metadata
// =============================================================================

/// Shared metadata for every rendered statement.
///
/// Collected once per run and passed through unchanged to the renderer;
/// the core pipeline does not process it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementMetadata {
    /// First day of the study period.
    pub start_date: NaiveDate,
    /// Last day of the study period.
    pub end_date: NaiveDate,
    /// Date the statements are issued.
    pub statement_date: NaiveDate,
    pub specialty_code: String,
    pub specialty_name: String,
    pub specialty_area_code: String,
    pub specialty_area_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_control_form() {
        assert_eq!(Category::from_control_form("ПР"), Category::Practice);
        assert_eq!(Category::from_control_form("КП"), Category::CourseProject);
        assert_eq!(Category::from_control_form("КР"), Category::CourseWork);
        assert_eq!(Category::from_control_form("ЭК"), Category::Regular);
        assert_eq!(Category::from_control_form(""), Category::Regular);
    }

    #[test]
    fn test_mark_values_shapes() {
        let single = Mark::Single(MarkValue::Grade(7));
        assert_eq!(single.values(), &[MarkValue::Grade(7)]);

        let seq = Mark::Sequence(vec![MarkValue::Grade(5), MarkValue::Credited]);
        assert_eq!(seq.values().len(), 2);
        assert_eq!(seq.values()[1].grade(), None);
    }

    #[test]
    fn test_mark_value_serde_shape() {
        let json = serde_json::to_value(MarkValue::Grade(9)).unwrap();
        assert_eq!(json["type"], "grade");
        assert_eq!(json["value"], 9);

        let json = serde_json::to_value(MarkValue::Credited).unwrap();
        assert_eq!(json["type"], "credited");
    }
}
