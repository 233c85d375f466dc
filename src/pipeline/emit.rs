// In: src/pipeline/emit.rs

//! Serializers for the two output files.
//!
//! Both functions write to any `io::Write`; the caller decides whether that is
//! a staged temp file, a plain file, or an in-memory buffer.

use std::io::{self, Write};

use crate::registry::CategoryRegistry;
use crate::row::Row;

/// Writes every row joined by `delimiter`, back to back.
///
/// No terminator is inserted between rows: each row's last field still carries
/// the terminator of the source line it came from. Returns the number of rows written.
pub fn write_fact<W: Write + ?Sized>(rows: &[Row], delimiter: char, out: &mut W) -> io::Result<usize> {
    for row in rows {
        row.write_joined(delimiter, out)?;
    }
    Ok(rows.len())
}

/// Writes one `name<delimiter>id\n` line per registry entry, in assignment order.
/// Returns the number of entries written.
pub fn write_dimension<W: Write + ?Sized>(
    registry: &CategoryRegistry,
    delimiter: char,
    out: &mut W,
) -> io::Result<usize> {
    for (name, id) in registry.iter() {
        writeln!(out, "{name}{delimiter}{id}")?;
    }
    Ok(registry.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_rows_are_concatenated_verbatim() {
        let rows = vec![
            Row::split("job1,1,extra\n", ','),
            Row::split("job2,1,extra2\r\n", ','),
            Row::split("job3,2,extra3", ','),
        ];
        let mut out = Vec::new();
        assert_eq!(write_fact(&rows, ',', &mut out).unwrap(), 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "job1,1,extra\njob2,1,extra2\r\njob3,2,extra3"
        );
    }

    #[test]
    fn test_dimension_lines() {
        let mut registry = CategoryRegistry::new();
        registry.get_or_assign("ParksDept");
        registry.get_or_assign("FireDept");
        registry.get_or_assign("ParksDept");

        let mut out = Vec::new();
        assert_eq!(write_dimension(&registry, ',', &mut out).unwrap(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "ParksDept,1\nFireDept,2\n");
    }

    #[test]
    fn test_empty_outputs() {
        let mut fact = Vec::new();
        let mut dimension = Vec::new();
        assert_eq!(write_fact(&[], ',', &mut fact).unwrap(), 0);
        assert_eq!(
            write_dimension(&CategoryRegistry::new(), ',', &mut dimension).unwrap(),
            0
        );
        assert!(fact.is_empty());
        assert!(dimension.is_empty());
    }
}
