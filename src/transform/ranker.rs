//! Per-student average mark and descending ranking.
//!
//! Runs on the unsummarized records: only plain numeric grades count,
//! credited entries are excluded, and a student with no numeric marks
//! ranks with average 0.

use crate::models::RankingEntry;
use crate::transform::builder::StudentRecords;

/// Compute every student's average and sort descending (stable on ties).
pub fn rank_students(students: &StudentRecords) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = students
        .iter()
        .map(|(name, records)| {
            let grades: Vec<u8> = records
                .iter()
                .flat_map(|r| r.mark.values())
                .filter_map(|v| v.grade())
                .collect();

            let average = if grades.is_empty() {
                0.0
            } else {
                grades.iter().map(|&g| f64::from(g)).sum::<f64>() / grades.len() as f64
            };

            RankingEntry {
                full_name: name.clone(),
                average,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, DisciplineRecord, Mark, MarkValue};

    fn record(mark: MarkValue) -> DisciplineRecord {
        DisciplineRecord {
            control_form: "ЭК".to_string(),
            name: "Дисциплина".to_string(),
            term: 1,
            mark: Mark::Single(mark),
            study_hours: 60,
            credit_units: 3.0,
            category: Category::Regular,
        }
    }

    fn student(name: &str, marks: &[MarkValue]) -> (String, Vec<DisciplineRecord>) {
        (name.to_string(), marks.iter().map(|&m| record(m)).collect())
    }

    #[test]
    fn test_average_and_descending_order() {
        let students = vec![
            student("Петров Петр", &[MarkValue::Grade(4), MarkValue::Grade(5)]),
            student("Иванов Иван", &[MarkValue::Grade(9), MarkValue::Grade(10)]),
        ];

        let ranking = rank_students(&students);
        assert_eq!(ranking[0].full_name, "Иванов Иван");
        assert_eq!(ranking[0].average, 9.5);
        assert_eq!(ranking[1].average, 4.5);
    }

    #[test]
    fn test_credited_excluded_from_average() {
        let students = vec![student(
            "Иванов Иван",
            &[MarkValue::Grade(8), MarkValue::Credited, MarkValue::Grade(6)],
        )];

        let ranking = rank_students(&students);
        assert_eq!(ranking[0].average, 7.0);
    }

    #[test]
    fn test_only_credited_is_zero() {
        let students = vec![
            student("Иванов Иван", &[MarkValue::Credited, MarkValue::Credited]),
            student("Петров Петр", &[MarkValue::Grade(4)]),
        ];

        let ranking = rank_students(&students);
        assert_eq!(ranking[0].full_name, "Петров Петр");
        assert_eq!(ranking[1].average, 0.0);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let students = vec![
            student("Первый", &[MarkValue::Grade(7)]),
            student("Второй", &[MarkValue::Grade(7)]),
            student("Третий", &[MarkValue::Grade(7)]),
        ];

        let ranking = rank_students(&students);
        let names: Vec<&str> = ranking.iter().map(|e| e.full_name.as_str()).collect();
        assert_eq!(names, vec!["Первый", "Второй", "Третий"]);
    }

    #[test]
    fn test_no_students() {
        assert!(rank_students(&Vec::new()).is_empty());
    }
}
