//! Record builder: raw joined rows → per-student discipline records.
//!
//! Walks every student row, parses the raw mark cell, decodes the
//! encoded column key and assembles [`DisciplineRecord`]s. The output
//! keeps first-encounter order of student names; a duplicated full name
//! (which a correct upstream join should not produce) is last-write-wins,
//! mirroring the source system's dictionary assignment.

use crate::error::{TransformError, TransformResult};
use crate::ledger::StudentRow;
use crate::models::{DisciplineRecord, Mark, MarkValue, CREDITED_TOKEN};
use crate::transform::decoder::decode_key;

/// Per-student academic records in first-encounter order.
pub type StudentRecords = Vec<(String, Vec<DisciplineRecord>)>;

/// Parse one raw mark cell: an integer grade or the credited token.
pub fn parse_raw_mark(student: &str, value: &str) -> TransformResult<MarkValue> {
    let trimmed = value.trim();
    if trimmed == CREDITED_TOKEN {
        return Ok(MarkValue::Credited);
    }
    trimmed
        .parse::<u8>()
        .map(MarkValue::Grade)
        .map_err(|_| TransformError::InvalidMark {
            student: student.to_string(),
            value: value.to_string(),
        })
}

/// Build the per-student academic record from raw joined rows.
pub fn build_student_records(rows: &[StudentRow]) -> TransformResult<StudentRecords> {
    let mut students: StudentRecords = Vec::new();

    for row in rows {
        let mut records = Vec::with_capacity(row.disciplines.len());
        for (key, raw_mark) in &row.disciplines {
            let mark = Mark::Single(parse_raw_mark(&row.full_name, raw_mark)?);
            records.push(decode_key(key, mark)?);
        }

        match students.iter_mut().find(|(name, _)| name == &row.full_name) {
            // Last write wins, original position kept.
            Some((_, existing)) => *existing = records,
            None => students.push((row.full_name.clone(), records)),
        }
    }

    Ok(students)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn row(name: &str, disciplines: &[(&str, &str)]) -> StudentRow {
        StudentRow {
            full_name: name.to_string(),
            disciplines: disciplines
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_parse_raw_mark() {
        assert_eq!(parse_raw_mark("x", "7").unwrap(), MarkValue::Grade(7));
        assert_eq!(parse_raw_mark("x", " зч ").unwrap(), MarkValue::Credited);
        assert!(matches!(
            parse_raw_mark("x", "отлично"),
            Err(TransformError::InvalidMark { .. })
        ));
        assert!(matches!(
            parse_raw_mark("x", ""),
            Err(TransformError::InvalidMark { .. })
        ));
    }

    #[test]
    fn test_build_student_records() {
        let rows = vec![
            row(
                "Иванов Иван",
                &[
                    ("1.Математика/120:5:ЭК", "5"),
                    ("1.Физика/80:4:ЭК", "4"),
                    ("2.Практика/60:3:ПР", "зч"),
                ],
            ),
            row("Петров Петр", &[("1.Математика/120:5:ЭК", "9")]),
        ];

        let students = build_student_records(&rows).unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].0, "Иванов Иван");
        assert_eq!(students[0].1.len(), 3);
        assert_eq!(students[0].1[2].category, Category::Practice);
        assert_eq!(students[0].1[2].mark, Mark::Single(MarkValue::Credited));
        assert_eq!(students[1].1[0].mark, Mark::Single(MarkValue::Grade(9)));
    }

    #[test]
    fn test_duplicate_name_last_write_wins() {
        let rows = vec![
            row("Иванов Иван", &[("1.Математика/120:5:ЭК", "5")]),
            row("Петров Петр", &[("1.Математика/120:5:ЭК", "6")]),
            row("Иванов Иван", &[("1.Химия/60:3:ЭК", "8")]),
        ];

        let students = build_student_records(&rows).unwrap();

        assert_eq!(students.len(), 2);
        // position of the first encounter is kept, records are replaced
        assert_eq!(students[0].0, "Иванов Иван");
        assert_eq!(students[0].1.len(), 1);
        assert_eq!(students[0].1[0].name, "Химия");
    }

    #[test]
    fn test_malformed_key_aborts() {
        let rows = vec![row("Иванов Иван", &[("Математика", "5")])];
        assert!(matches!(
            build_student_records(&rows),
            Err(TransformError::MalformedKey(_))
        ));
    }
}
