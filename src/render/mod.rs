//! Statement rendering: one text document per student plus the ranking sheet.
//!
//! Documents come from a placeholder template (`{{FULL_NAME}}`,
//! `{{DIPLOMA_THEME}}`, the discipline sections and the date parts); a
//! built-in template is used when the caller supplies none. The printed
//! form spells dates as a zero-padded day, the Russian genitive month
//! name and the year, with two-digit years inside the pre-printed
//! `20__ г.` of the study period line.
//!
//! Course works and course projects share one section, matching the
//! printed form's second table.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use crate::error::RenderResult;
use crate::models::{RankingEntry, StatementMetadata, StudentReport};

/// File name pattern for one student's document.
pub const STATEMENT_FILE_PREFIX: &str = "Transcript_";

/// Fixed name of the aggregate ranking sheet.
pub const RANKING_FILE_NAME: &str = "ranking.csv";

/// Built-in statement template.
pub const DEFAULT_TEMPLATE: &str = "\
ВЫПИСКА
из зачетно-экзаменационных ведомостей

{{FULL_NAME}}

за период обучения с {{START_DAY}} {{START_MONTH}} 20{{START_YY}} г. по {{END_DAY}} {{END_MONTH}} 20{{END_YY}} г.
по специальности {{SPECIALTY_CODE}} «{{SPECIALTY_NAME}}»
направлению специальности {{AREA_CODE}} «{{AREA_NAME}}»

Выполнил(а) дипломный проект на тему: «{{DIPLOMA_THEME}}»

Дисциплины:
{{REGULAR_DISCIPLINES}}

Курсовые работы и проекты:
{{COURSE_DISCIPLINES}}

Практики:
{{PRACTICE_DISCIPLINES}}

г. Могилев «{{STATEMENT_DAY}}» {{STATEMENT_MONTH}} {{STATEMENT_YEAR}} г.\tРегистрационный № ____
";

fn month_genitive(month: u32) -> &'static str {
    match month {
        1 => "января",
        2 => "февраля",
        3 => "марта",
        4 => "апреля",
        5 => "мая",
        6 => "июня",
        7 => "июля",
        8 => "августа",
        9 => "сентября",
        10 => "октября",
        11 => "ноября",
        _ => "декабря",
    }
}

/// Split a date into its printed parts: zero-padded day, genitive month
/// name, full year.
pub fn date_parts(date: NaiveDate) -> (String, String, String) {
    (
        format!("{:02}", date.day()),
        month_genitive(date.month()).to_string(),
        date.year().to_string(),
    )
}

fn two_digit_year(year: &str) -> &str {
    if year.len() >= 2 {
        &year[year.len() - 2..]
    } else {
        year
    }
}

fn discipline_section(lines: &[crate::models::FormattedDiscipline]) -> String {
    lines
        .iter()
        .map(|d| format!("{}\t{}\t{}", d.name, d.hours_and_credits, d.mark))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one student's statement from a template.
pub fn render_statement(
    report: &StudentReport,
    metadata: &StatementMetadata,
    template: &str,
) -> String {
    let (start_day, start_month, start_year) = date_parts(metadata.start_date);
    let (end_day, end_month, end_year) = date_parts(metadata.end_date);
    let (statement_day, statement_month, statement_year) = date_parts(metadata.statement_date);

    // Course works and course projects share the second table.
    let mut course_lines = report.course_work.clone();
    course_lines.extend(report.course_project.iter().cloned());

    template
        .replace("{{FULL_NAME}}", &report.full_name)
        .replace("{{DIPLOMA_THEME}}", &report.diploma_theme)
        .replace("{{START_DAY}}", &start_day)
        .replace("{{START_MONTH}}", &start_month)
        .replace("{{START_YY}}", two_digit_year(&start_year))
        .replace("{{END_DAY}}", &end_day)
        .replace("{{END_MONTH}}", &end_month)
        .replace("{{END_YY}}", two_digit_year(&end_year))
        .replace("{{SPECIALTY_CODE}}", &metadata.specialty_code)
        .replace("{{SPECIALTY_NAME}}", &metadata.specialty_name)
        .replace("{{AREA_CODE}}", &metadata.specialty_area_code)
        .replace("{{AREA_NAME}}", &metadata.specialty_area_name)
        .replace("{{STATEMENT_DAY}}", &statement_day)
        .replace("{{STATEMENT_MONTH}}", &statement_month)
        .replace("{{STATEMENT_YEAR}}", &statement_year)
        .replace("{{REGULAR_DISCIPLINES}}", &discipline_section(&report.regular))
        .replace("{{COURSE_DISCIPLINES}}", &discipline_section(&course_lines))
        .replace("{{PRACTICE_DISCIPLINES}}", &discipline_section(&report.practice))
}

/// Write one statement per report into `save_dir`.
///
/// Returns the written paths in report order.
pub fn write_statements(
    save_dir: &Path,
    reports: &[StudentReport],
    metadata: &StatementMetadata,
    template: &str,
) -> RenderResult<Vec<PathBuf>> {
    fs::create_dir_all(save_dir)?;

    let mut paths = Vec::with_capacity(reports.len());
    for report in reports {
        let file_name = format!("{}{}.txt", STATEMENT_FILE_PREFIX, report.full_name);
        let path = save_dir.join(file_name);
        fs::write(&path, render_statement(report, metadata, template))?;
        paths.push(path);
    }
    Ok(paths)
}

/// Write the two-column ranking sheet into `save_dir`.
pub fn write_ranking(save_dir: &Path, entries: &[RankingEntry]) -> RenderResult<PathBuf> {
    fs::create_dir_all(save_dir)?;
    let path = save_dir.join(RANKING_FILE_NAME);

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["ФИО", "Средний балл"])?;
    for entry in entries {
        writer.write_record([entry.full_name.as_str(), &entry.average.to_string()])?;
    }
    writer.flush()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormattedDiscipline;

    fn metadata() -> StatementMetadata {
        StatementMetadata {
            start_date: NaiveDate::from_ymd_opt(2020, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            statement_date: NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
            specialty_code: "1-40 01 01".to_string(),
            specialty_name: "Программное обеспечение".to_string(),
            specialty_area_code: "1-40 01 01-01".to_string(),
            specialty_area_name: "Веб-технологии".to_string(),
        }
    }

    fn report() -> StudentReport {
        StudentReport {
            full_name: "Иванов Иван".to_string(),
            diploma_theme: "Система учёта".to_string(),
            regular: vec![FormattedDiscipline::new("Математика", "240 (10 з.е.)", "пять, четыре")],
            course_work: vec![FormattedDiscipline::new("Курсовая", "40", "восемь")],
            course_project: vec![FormattedDiscipline::new("Проект", "60 (2 з.е.)", "девять")],
            practice: vec![FormattedDiscipline::new("Практика", "120 (6 з.е.)", "зачтено")],
        }
    }

    #[test]
    fn test_date_parts() {
        let (day, month, year) = date_parts(NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
        assert_eq!(day, "03");
        assert_eq!(month, "июля");
        assert_eq!(year, "2025");
    }

    #[test]
    fn test_render_statement_substitutions() {
        let rendered = render_statement(&report(), &metadata(), DEFAULT_TEMPLATE);

        assert!(rendered.contains("Иванов Иван"));
        assert!(rendered.contains("«Система учёта»"));
        assert!(rendered.contains("с 01 сентября 2020 г. по 30 июня 2025 г."));
        assert!(rendered.contains("«03» июля 2025 г."));
        assert!(rendered.contains("Математика\t240 (10 з.е.)\tпять, четыре"));
        // course work and course project land in the same section
        let work_pos = rendered.find("Курсовая").unwrap();
        let project_pos = rendered.find("Проект").unwrap();
        assert!(work_pos < project_pos);
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_write_statements() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_statements(dir.path(), &[report()], &metadata(), DEFAULT_TEMPLATE).unwrap();

        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("Transcript_Иванов Иван.txt"));
        let content = fs::read_to_string(&paths[0]).unwrap();
        assert!(content.contains("Практика\t120 (6 з.е.)\tзачтено"));
    }

    #[test]
    fn test_write_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![
            RankingEntry { full_name: "Иванов Иван".to_string(), average: 9.5 },
            RankingEntry { full_name: "Петров Петр".to_string(), average: 0.0 },
        ];

        let path = write_ranking(dir.path(), &entries).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "ФИО,Средний балл");
        assert_eq!(lines[1], "Иванов Иван,9.5");
        assert_eq!(lines[2], "Петров Петр,0");
    }
}
