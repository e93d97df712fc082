//! Encoded discipline key decoder.
//!
//! Joined ledger columns carry an ad-hoc encoding:
//!
//! ```text
//! <term>.<name>/<hours>:<credits>:<controlForm>
//! 1.Математика/120:5:ЭК
//! ```
//!
//! The term is the text before the first `.` (added by the column
//! prefixing step, one per semester file); the name runs to the `/`; the
//! two numeric fields follow, and the control form is everything after
//! the final `:`. The control form also decides the record's category,
//! see [`Category::from_control_form`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{TransformError, TransformResult};
use crate::models::{Category, DisciplineRecord, Mark};

/// Splits a key into its five fields without constraining their content;
/// numeric fields are validated separately for precise errors.
static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^.]*)\.([^/]*)/([^:]*):([^:]*):([^:]*)$").expect("key regex"));

/// Decode one encoded key and its mark into a [`DisciplineRecord`].
///
/// Malformed keys (missing delimiters, non-numeric term/hours/credits)
/// abort the run; there is no partial-result mode.
pub fn decode_key(key: &str, mark: Mark) -> TransformResult<DisciplineRecord> {
    let captures = KEY_RE
        .captures(key)
        .ok_or_else(|| TransformError::MalformedKey(key.to_string()))?;

    let term: u32 = captures[1]
        .parse()
        .map_err(|_| TransformError::NonNumericField {
            key: key.to_string(),
            field: "term",
        })?;

    let name = captures[2].to_string();

    let study_hours: u32 = captures[3]
        .parse()
        .map_err(|_| TransformError::NonNumericField {
            key: key.to_string(),
            field: "hours",
        })?;

    let credit_units: f64 = captures[4]
        .parse()
        .ok()
        .filter(|c: &f64| c.is_finite() && *c >= 0.0)
        .ok_or_else(|| TransformError::NonNumericField {
            key: key.to_string(),
            field: "credits",
        })?;

    let control_form = captures[5].to_string();
    let category = Category::from_control_form(&control_form);

    Ok(DisciplineRecord {
        control_form,
        name,
        term,
        mark,
        study_hours,
        credit_units,
        category,
    })
}
