// In: src/pipeline/loader.rs

//! Load & Transform: the single pass over the source lines.

use std::io::{self, BufRead};

use crate::config::{ExtractConfig, MalformedRowPolicy};
use crate::error::{DimsplitError, Result};
use crate::registry::CategoryRegistry;
use crate::row::Row;

/// A lazy, consume-once sequence of lines that keep their terminators.
///
/// Yields `(line_number, text)` where `line_number` is 1-based.
pub struct SourceLines<R> {
    reader: R,
    line_number: usize,
}

impl<R: BufRead> SourceLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for SourceLines<R> {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut text = String::new();
        match self.reader.read_line(&mut text) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                Some(Ok((self.line_number, text)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Everything the pass produces: the registry plus the rewritten rows in input order.
#[derive(Debug, Default)]
pub struct Extraction {
    pub registry: CategoryRegistry,
    pub rows: Vec<Row>,
    /// Data lines seen, header excluded, skipped lines included.
    pub rows_read: usize,
    pub rows_skipped: usize,
}

/// Reads every data line from `reader` and rewrites its category field.
///
/// The first line is discarded as a header. An empty reader produces an empty
/// `Extraction`.
pub fn transform<R: BufRead>(reader: R, config: &ExtractConfig) -> Result<Extraction> {
    let mut extraction = Extraction::default();
    let mut lines = SourceLines::new(reader);

    // Header. Read through `?` rather than `skip(1)` so a read error here is not lost.
    if lines.next().transpose()?.is_none() {
        log::info!("Source is empty, nothing to extract");
        return Ok(extraction);
    }

    let column = config.category_column;
    for line in lines {
        let (line_number, text) = line?;
        extraction.rows_read += 1;

        let mut row = Row::split(&text, config.delimiter);
        let id = match row.field(column) {
            Some(name) => extraction.registry.get_or_assign(name),
            None => match config.malformed_rows {
                MalformedRowPolicy::Fail => {
                    return Err(DimsplitError::MalformedRow {
                        line: line_number,
                        expected: config.min_fields(),
                        found: row.len(),
                    });
                }
                MalformedRowPolicy::Skip => {
                    log::warn!(
                        "Skipping line {}: expected at least {} fields, found {}",
                        line_number,
                        config.min_fields(),
                        row.len()
                    );
                    extraction.rows_skipped += 1;
                    continue;
                }
            },
        };

        row.replace_field(column, id.to_string());
        extraction.rows.push(row);
    }

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str, config: &ExtractConfig) -> Result<Extraction> {
        transform(Cursor::new(input.as_bytes()), config)
    }

    #[test]
    fn test_source_lines_keep_terminators() {
        let lines: Vec<(usize, String)> = SourceLines::new(Cursor::new("a\nb\r\nc"))
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![
                (1, "a\n".to_string()),
                (2, "b\r\n".to_string()),
                (3, "c".to_string())
            ]
        );
    }

    #[test]
    fn test_only_newline_ends_a_line() {
        let text = "a,b\rc\x0bd\u{2028}e\n";
        let lines: Vec<(usize, String)> = SourceLines::new(Cursor::new(text))
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec![(1, text.to_string())]);
    }

    #[test]
    fn test_reference_example() {
        let input = "header,ignored\n\
                     job1,ParksDept,extra\n\
                     job2,ParksDept,extra2\n\
                     job3,FireDept,extra3\n";
        let extraction = run(input, &ExtractConfig::default()).unwrap();

        assert_eq!(extraction.rows_read, 3);
        assert_eq!(extraction.rows_skipped, 0);
        let fields: Vec<&[String]> = extraction.rows.iter().map(Row::fields).collect();
        assert_eq!(fields[0], ["job1", "1", "extra\n"]);
        assert_eq!(fields[1], ["job2", "1", "extra2\n"]);
        assert_eq!(fields[2], ["job3", "2", "extra3\n"]);

        let entries: Vec<(&str, u64)> = extraction.registry.iter().collect();
        assert_eq!(entries, vec![("ParksDept", 1), ("FireDept", 2)]);
    }

    #[test]
    fn test_empty_and_header_only() {
        let extraction = run("", &ExtractConfig::default()).unwrap();
        assert!(extraction.rows.is_empty());
        assert!(extraction.registry.is_empty());

        let extraction = run("title,agency,salary\n", &ExtractConfig::default()).unwrap();
        assert!(extraction.rows.is_empty());
        assert!(extraction.registry.is_empty());
        assert_eq!(extraction.rows_read, 0);
    }

    #[test]
    fn test_header_is_never_categorized() {
        // The header carries a perfectly valid category field; it must still be dropped.
        let input = "id,ParksDept\nj1,FireDept\n";
        let extraction = run(input, &ExtractConfig::default()).unwrap();
        assert_eq!(extraction.registry.get("ParksDept"), None);
        assert_eq!(extraction.registry.get("FireDept"), Some(1));
    }

    #[test]
    fn test_malformed_row_fails_with_line_number() {
        let input = "h,h\nj1,Parks\nno-delimiter-here\nj3,Fire\n";
        let err = run(input, &ExtractConfig::default()).unwrap_err();
        match err {
            DimsplitError::MalformedRow {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_row_skip_policy() {
        let config = ExtractConfig {
            malformed_rows: MalformedRowPolicy::Skip,
            ..Default::default()
        };
        let input = "h,h\nj1,Parks\n\nj3,Fire\n";
        let extraction = run(input, &config).unwrap();
        assert_eq!(extraction.rows_read, 3);
        assert_eq!(extraction.rows_skipped, 1);
        assert_eq!(extraction.rows.len(), 2);
        assert_eq!(extraction.registry.len(), 2);
    }

    #[test]
    fn test_category_in_last_column_keeps_terminator_in_name() {
        let input = "id,agency\nj1,Parks\nj2,Parks\n";
        let extraction = run(input, &ExtractConfig::default()).unwrap();
        assert_eq!(extraction.registry.get("Parks\n"), Some(1));
        assert_eq!(extraction.rows[1].fields(), ["j2", "1"]);
    }

    #[test]
    fn test_custom_column_and_delimiter() {
        let config = ExtractConfig {
            category_column: 2,
            delimiter: '\t',
            ..Default::default()
        };
        let input = "id\ttitle\tagency\tsalary\n\
                     1\tAnalyst\tDOT\t50000\n\
                     2\tClerk\tDOF\t40000\n\
                     3\tEngineer\tDOT\t90000\n";
        let extraction = run(input, &config).unwrap();
        assert_eq!(extraction.rows[2].fields(), ["3", "Engineer", "1", "90000\n"]);
        assert_eq!(extraction.registry.get("DOF"), Some(2));
    }

    #[test]
    fn test_invalid_utf8_is_an_io_error() {
        let bytes: &[u8] = b"h,h\nj1,\xff\xfe\n";
        let err = transform(Cursor::new(bytes), &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, DimsplitError::Io(ref e) if e.kind() == io::ErrorKind::InvalidData));
    }
}
