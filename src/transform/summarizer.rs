//! Merge repeated regular disciplines across terms.
//!
//! A discipline that runs for several semesters appears once per term in
//! the regular category. The transcript prints it as a single line, so
//! the groups collapse: one record per name with the mark sequence in
//! encounter order, summed hours and credits, and the minimum term.
//!
//! ```text
//! Математика  term 1  mark 5  120h  5.0 кр ┐
//! Математика  term 2  mark 4  120h  5.0 кр ┴▶ Математика term 1 marks [5,4] 240h 10.0 кр
//! ```
//!
//! Course work, course projects and practice pass through unchanged.

use crate::models::{Category, DisciplineRecord, Mark, SUMMARIZED_ABBREVIATION};
use crate::transform::grouper::CategorizedRecords;

/// Merge one group of same-name regular records into a single record.
fn merge_group(group: &[DisciplineRecord]) -> DisciplineRecord {
    let mut marks = Vec::new();
    let mut study_hours = 0u32;
    let mut credit_units = 0.0f64;
    let mut term = u32::MAX;

    for record in group {
        marks.extend_from_slice(record.mark.values());
        study_hours += record.study_hours;
        credit_units += record.credit_units;
        term = term.min(record.term);
    }

    DisciplineRecord {
        control_form: SUMMARIZED_ABBREVIATION.to_string(),
        name: group[0].name.clone(),
        term,
        mark: Mark::Sequence(marks),
        study_hours,
        credit_units,
        category: Category::Regular,
    }
}

/// Summarize one student's categorized records.
///
/// Groups the regular category by exact name in insertion order and
/// merges each group; re-running on the output is a no-op because each
/// name then appears exactly once.
pub fn summarize(categorized: CategorizedRecords) -> CategorizedRecords {
    let mut groups: Vec<(String, Vec<DisciplineRecord>)> = Vec::new();
    for record in categorized.regular {
        match groups.iter_mut().find(|(name, _)| name == &record.name) {
            Some((_, group)) => group.push(record),
            None => groups.push((record.name.clone(), vec![record])),
        }
    }

    let mut regular: Vec<DisciplineRecord> =
        groups.iter().map(|(_, group)| merge_group(group)).collect();
    regular.sort_by_key(|r| r.term);

    CategorizedRecords {
        regular,
        course_work: categorized.course_work,
        course_project: categorized.course_project,
        practice: categorized.practice,
    }
}

/// Summarize every student, preserving student order.
pub fn summarize_students(
    students: Vec<(String, CategorizedRecords)>,
) -> Vec<(String, CategorizedRecords)> {
    students
        .into_iter()
        .map(|(name, categorized)| (name, summarize(categorized)))
        .collect()
}
