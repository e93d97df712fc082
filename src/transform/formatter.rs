//! Turn summarized records into display-ready transcript lines.
//!
//! Two label rules:
//!
//! - hours/credits: `"120 (5 з.е.)"`, credits omitted when zero,
//!   fractional credits printed with a decimal comma (`"36 (1,5 з.е.)"`);
//! - marks: word forms from the fixed ten-point table, `зачтено` for
//!   credited; a merged sequence joins the words with `", "` unless every
//!   element is credited, which collapses to the single word.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::{EnrichmentError, EnrichmentResult};
use crate::models::{DisciplineRecord, FormattedDiscipline, Mark, MarkValue};

/// Word form of the credited mark.
pub const CREDITED_WORD: &str = "зачтено";

const CREDITS_SUFFIX_TEMPLATE: &str = " ({} з.е.)";

/// Fixed word forms of the ten-point scale grades.
static GRADE_WORDS: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (4, "четыре"),
        (5, "пять"),
        (6, "шесть"),
        (7, "семь"),
        (8, "восемь"),
        (9, "девять"),
        (10, "десять"),
    ])
});

fn grade_word(value: MarkValue) -> EnrichmentResult<&'static str> {
    match value {
        MarkValue::Credited => Ok(CREDITED_WORD),
        MarkValue::Grade(grade) => GRADE_WORDS
            .get(&grade)
            .copied()
            .ok_or(EnrichmentError::UnknownGrade(grade)),
    }
}

/// Render the hours-and-credits label for one record.
pub fn hours_and_credits_label(study_hours: u32, credit_units: f64) -> String {
    let credits = if credit_units.fract() == 0.0 {
        let whole = credit_units as i64;
        if whole == 0 {
            String::new()
        } else {
            whole.to_string()
        }
    } else {
        credit_units.to_string().replace('.', ",")
    };

    if credits.is_empty() {
        study_hours.to_string()
    } else {
        format!(
            "{}{}",
            study_hours,
            CREDITS_SUFFIX_TEMPLATE.replacen("{}", &credits, 1)
        )
    }
}

/// Render the word form of one mark.
pub fn mark_label(mark: &Mark) -> EnrichmentResult<String> {
    match mark {
        Mark::Single(value) => Ok(grade_word(*value)?.to_string()),
        Mark::Sequence(values) => {
            if !values.is_empty() && values.iter().all(|v| *v == MarkValue::Credited) {
                return Ok(CREDITED_WORD.to_string());
            }
            let words: Vec<&str> = values
                .iter()
                .map(|v| grade_word(*v))
                .collect::<EnrichmentResult<_>>()?;
            Ok(words.join(", "))
        }
    }
}

/// Project one category's ordered records into display triples.
pub fn format_disciplines(
    records: &[DisciplineRecord],
) -> EnrichmentResult<Vec<FormattedDiscipline>> {
    records
        .iter()
        .map(|record| {
            Ok(FormattedDiscipline::new(
                record.name.clone(),
                hours_and_credits_label(record.study_hours, record.credit_units),
                mark_label(&record.mark)?,
            ))
        })
        .collect()
}
