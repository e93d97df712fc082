//! Partition each student's records into the four fixed categories.
//!
//! ```text
//! [Math ЭК, Практика ПР, Физика ЭК]      regular:        [Math, Физика]
//!                                    →   course_work:    []
//!                                        course_project: []
//!                                        practice:       [Практика]
//! ```
//!
//! Every category is always present, even when empty, and each category
//! vector is stably sorted by term ascending (ties keep input order).

use serde::{Deserialize, Serialize};

use crate::models::{Category, DisciplineRecord};
use crate::transform::builder::StudentRecords;

/// A student's records split by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedRecords {
    pub regular: Vec<DisciplineRecord>,
    pub course_work: Vec<DisciplineRecord>,
    pub course_project: Vec<DisciplineRecord>,
    pub practice: Vec<DisciplineRecord>,
}

impl CategorizedRecords {
    /// The vector backing one category.
    pub fn get(&self, category: Category) -> &[DisciplineRecord] {
        match category {
            Category::Regular => &self.regular,
            Category::CourseWork => &self.course_work,
            Category::CourseProject => &self.course_project,
            Category::Practice => &self.practice,
        }
    }

    /// Total number of records across the four categories.
    pub fn len(&self) -> usize {
        self.regular.len() + self.course_work.len() + self.course_project.len() + self.practice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition one record sequence by category and sort each part by term.
pub fn group_by_category(records: &[DisciplineRecord]) -> CategorizedRecords {
    let mut grouped = CategorizedRecords::default();

    for record in records {
        let bucket = match record.category {
            Category::Regular => &mut grouped.regular,
            Category::CourseWork => &mut grouped.course_work,
            Category::CourseProject => &mut grouped.course_project,
            Category::Practice => &mut grouped.practice,
        };
        bucket.push(record.clone());
    }

    grouped.regular.sort_by_key(|r| r.term);
    grouped.course_work.sort_by_key(|r| r.term);
    grouped.course_project.sort_by_key(|r| r.term);
    grouped.practice.sort_by_key(|r| r.term);

    grouped
}

/// Group every student's records, preserving student order.
pub fn group_students(students: &StudentRecords) -> Vec<(String, CategorizedRecords)> {
    students
        .iter()
        .map(|(name, records)| (name.clone(), group_by_category(records)))
        .collect()
}
