//! Grade ledger ingestion: CSV with encoding and delimiter auto-detection.
//!
//! Semester ledgers come from spreadsheet exports in the wild: UTF-8,
//! windows-1251 or KOI8-R, with `;`, `,` or tab separators. This module
//! normalizes them into [`LedgerTable`]s, prefixes every discipline column
//! with its semester number, inner-joins the tables on the student name
//! column and splits the joined table into per-student raw rows.
//!
//! ```text
//! semester1.csv ─┐
//! semester2.csv ─┼─▶ prefix "1."/"2." ─▶ join on ФИО ─▶ StudentRow per student
//! semester3.csv ─┘
//! ```
//!
//! No discipline-specific logic here; keys and marks stay raw strings.

use crate::error::{LedgerError, LedgerResult};
use std::path::Path;

/// Column holding the student full name in every ledger.
pub const KEY_COLUMN: &str = "ФИО";

/// One normalized ledger (or the join of several).
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerTable {
    /// Column headers, key column included.
    pub headers: Vec<String>,
    /// Data rows, cell order matching `headers`.
    pub rows: Vec<Vec<String>>,
    /// Detected encoding of the source file.
    pub encoding: String,
    /// Detected delimiter of the source file.
    pub delimiter: char,
}

/// One input row of the joined table: a student and their raw
/// (encoded key, mark cell) pairs in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRow {
    pub full_name: String,
    pub disciplines: Vec<(String, String)>,
}

// =============================================================================
// Encoding / delimiter detection
// =============================================================================

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "windows-1251" | "cp1251" => "windows-1251".to_string(),
        "koi8-r" => "koi8-r".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the detected encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LedgerResult<String> {
    let decoded = match encoding {
        "utf-8" => String::from_utf8_lossy(bytes).into_owned(),
        "windows-1251" => encoding_rs::WINDOWS_1251.decode(bytes).0.into_owned(),
        "koi8-r" => encoding_rs::KOI8_R.decode(bytes).0.into_owned(),
        "iso-8859-1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        // Fallback: lossy UTF-8
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    if decoded.trim().is_empty() {
        return Err(LedgerError::EmptyFile);
    }
    Ok(decoded)
}

/// Detect the delimiter by counting occurrences in the header line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ';';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

// =============================================================================
// Reading
// =============================================================================

/// Read a ledger file with auto-detection of encoding and delimiter.
pub fn read_ledger<P: AsRef<Path>>(path: P) -> LedgerResult<LedgerTable> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_ledger_bytes(&bytes)
}

/// Parse raw ledger bytes with auto-detection of encoding and delimiter.
pub fn parse_ledger_bytes(bytes: &[u8]) -> LedgerResult<LedgerTable> {
    if bytes.is_empty() {
        return Err(LedgerError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LedgerError::EmptyFile);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        // Pad short rows so cell order always matches the headers.
        let mut row: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        row.resize(headers.len(), String::new());
        row.truncate(headers.len());
        rows.push(row);
    }

    Ok(LedgerTable {
        headers,
        rows,
        encoding,
        delimiter,
    })
}

// =============================================================================
// Column prefixing and joining
// =============================================================================

/// Prefix every non-key column of ledger *i* with `"<i+1>."`.
///
/// The prefix becomes the term number of the encoded discipline key, so
/// the decoder downstream can tell which semester a column came from.
pub fn prefix_term_columns(tables: Vec<LedgerTable>) -> Vec<LedgerTable> {
    tables
        .into_iter()
        .enumerate()
        .map(|(i, mut table)| {
            for header in &mut table.headers {
                if header != KEY_COLUMN {
                    *header = format!("{}.{}", i + 1, header);
                }
            }
            table
        })
        .collect()
}

/// Inner-join ledgers on [`KEY_COLUMN`].
///
/// Row order follows the first ledger; a student missing from any ledger
/// is dropped. Within the lookup side, a duplicated name keeps its last
/// row, matching the builder's last-write-wins policy.
pub fn join_ledgers(tables: &[LedgerTable]) -> LedgerResult<LedgerTable> {
    let key_positions: Vec<usize> = tables
        .iter()
        .enumerate()
        .map(|(i, table)| {
            table
                .headers
                .iter()
                .position(|h| h == KEY_COLUMN)
                .ok_or_else(|| LedgerError::MissingKeyColumn {
                    ledger: i + 1,
                    column: KEY_COLUMN.to_string(),
                })
        })
        .collect::<LedgerResult<_>>()?;

    let mut headers = vec![KEY_COLUMN.to_string()];
    for (table, &key_pos) in tables.iter().zip(&key_positions) {
        for (i, header) in table.headers.iter().enumerate() {
            if i != key_pos {
                headers.push(header.clone());
            }
        }
    }

    // name -> non-key cells, last occurrence wins
    let lookups: Vec<std::collections::HashMap<&str, Vec<&String>>> = tables
        .iter()
        .zip(&key_positions)
        .skip(1)
        .map(|(table, &key_pos)| {
            let mut map = std::collections::HashMap::new();
            for row in &table.rows {
                let name = row[key_pos].as_str();
                let cells: Vec<&String> =
                    row.iter().enumerate().filter(|(i, _)| *i != key_pos).map(|(_, c)| c).collect();
                map.insert(name, cells);
            }
            map
        })
        .collect();

    let first = &tables[0];
    let first_key = key_positions[0];
    let mut rows = Vec::new();

    'next_row: for row in &first.rows {
        let name = &row[first_key];
        let mut joined: Vec<String> = vec![name.clone()];
        joined.extend(
            row.iter()
                .enumerate()
                .filter(|(i, _)| *i != first_key)
                .map(|(_, c)| c.clone()),
        );
        for lookup in &lookups {
            match lookup.get(name.as_str()) {
                Some(cells) => joined.extend(cells.iter().map(|c| (*c).clone())),
                None => continue 'next_row,
            }
        }
        rows.push(joined);
    }

    if rows.is_empty() {
        return Err(LedgerError::EmptyJoin);
    }

    Ok(LedgerTable {
        headers,
        rows,
        encoding: first.encoding.clone(),
        delimiter: first.delimiter,
    })
}

/// Split the joined table into ordered per-student raw rows.
pub fn to_student_rows(joined: &LedgerTable) -> LedgerResult<Vec<StudentRow>> {
    let key_pos = joined
        .headers
        .iter()
        .position(|h| h == KEY_COLUMN)
        .ok_or_else(|| LedgerError::MissingKeyColumn {
            ledger: 1,
            column: KEY_COLUMN.to_string(),
        })?;

    Ok(joined
        .rows
        .iter()
        .map(|row| StudentRow {
            full_name: row[key_pos].clone(),
            disciplines: joined
                .headers
                .iter()
                .zip(row)
                .enumerate()
                .filter(|(i, _)| *i != key_pos)
                .map(|(_, (h, c))| (h.clone(), c.clone()))
                .collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> LedgerTable {
        LedgerTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            encoding: "utf-8".to_string(),
            delimiter: ';',
        }
    }

    #[test]
    fn test_parse_simple_ledger() {
        let csv = "ФИО;Математика/120:5:ЭК\nИванов Иван;5\nПетров Петр;9";
        let result = parse_ledger_bytes(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.headers, vec!["ФИО", "Математика/120:5:ЭК"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0], vec!["Иванов Иван", "5"]);
    }

    #[test]
    fn test_parse_comma_delimiter() {
        let csv = "ФИО,A,B\nx,1,2";
        let result = parse_ledger_bytes(csv.as_bytes()).unwrap();
        assert_eq!(result.delimiter, ',');
        assert_eq!(result.rows[0], vec!["x", "1", "2"]);
    }

    #[test]
    fn test_parse_empty_lines_and_short_rows() {
        let csv = "ФИО;A;B\nx;1\n\ny;2;3\n";
        let result = parse_ledger_bytes(csv.as_bytes()).unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0], vec!["x", "1", ""]);
    }

    #[test]
    fn test_empty_file_error() {
        assert!(matches!(
            parse_ledger_bytes(b""),
            Err(LedgerError::EmptyFile)
        ));
    }

    #[test]
    fn test_windows_1251_decoding() {
        // "ФИО" in windows-1251
        let bytes: &[u8] = &[0xD4, 0xC8, 0xCE];
        let decoded = decode_content(bytes, "windows-1251").unwrap();
        assert_eq!(decoded, "ФИО");
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_prefix_term_columns() {
        let tables = vec![
            table(&["ФИО", "Математика", "Физика"], &[]),
            table(&["ФИО", "Химия"], &[]),
        ];
        let prefixed = prefix_term_columns(tables);

        assert_eq!(prefixed[0].headers, vec!["ФИО", "1.Математика", "1.Физика"]);
        assert_eq!(prefixed[1].headers, vec!["ФИО", "2.Химия"]);
    }

    #[test]
    fn test_join_ledgers_inner() {
        let t1 = table(
            &["ФИО", "1.Математика"],
            &[&["Иванов Иван", "5"], &["Петров Петр", "4"], &["Сидоров Саша", "6"]],
        );
        let t2 = table(
            &["ФИО", "2.Химия"],
            &[&["Петров Петр", "7"], &["Иванов Иван", "8"]],
        );

        let joined = join_ledgers(&[t1, t2]).unwrap();
        assert_eq!(joined.headers, vec!["ФИО", "1.Математика", "2.Химия"]);
        // Сидоров is absent from the second ledger and is dropped
        assert_eq!(joined.rows.len(), 2);
        assert_eq!(joined.rows[0], vec!["Иванов Иван", "5", "8"]);
        assert_eq!(joined.rows[1], vec!["Петров Петр", "4", "7"]);
    }

    #[test]
    fn test_join_missing_key_column() {
        let t1 = table(&["ФИО", "A"], &[&["x", "1"]]);
        let t2 = table(&["Имя", "B"], &[&["x", "2"]]);
        assert!(matches!(
            join_ledgers(&[t1, t2]),
            Err(LedgerError::MissingKeyColumn { ledger: 2, .. })
        ));
    }

    #[test]
    fn test_join_no_common_students() {
        let t1 = table(&["ФИО", "A"], &[&["x", "1"]]);
        let t2 = table(&["ФИО", "B"], &[&["y", "2"]]);
        assert!(matches!(join_ledgers(&[t1, t2]), Err(LedgerError::EmptyJoin)));
    }

    #[test]
    fn test_to_student_rows() {
        let joined = table(
            &["ФИО", "1.Математика/120:5:ЭК", "2.Химия/60:3:ЭК"],
            &[&["Иванов Иван", "5", "зч"]],
        );
        let rows = to_student_rows(&joined).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].full_name, "Иванов Иван");
        assert_eq!(
            rows[0].disciplines,
            vec![
                ("1.Математика/120:5:ЭК".to_string(), "5".to_string()),
                ("2.Химия/60:3:ЭК".to_string(), "зч".to_string()),
            ]
        );
    }
}
