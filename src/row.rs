// In: src/row.rs

//! A single data line split into fields.
//!
//! Splitting is deliberately naive: the line is cut at every occurrence of the
//! delimiter and nothing else. Quotes carry no meaning, and the line terminator
//! is not stripped, so it stays attached to the last field and is written back
//! out verbatim when the row is joined.

use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    /// Splits `line` at every `delimiter`. Always yields at least one field.
    pub fn split(line: &str, delimiter: char) -> Self {
        Self {
            fields: line.split(delimiter).map(str::to_owned).collect(),
        }
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Overwrites the field at `index`, returning the previous value.
    /// Returns `None` and leaves the row untouched if the field does not exist.
    pub fn replace_field(&mut self, index: usize, value: String) -> Option<String> {
        self.fields
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Writes the fields joined by `delimiter`. No terminator is added.
    pub fn write_joined<W: Write + ?Sized>(&self, delimiter: char, out: &mut W) -> io::Result<()> {
        let mut buf = [0u8; 4];
        let delimiter = delimiter.encode_utf8(&mut buf).as_bytes();
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                out.write_all(delimiter)?;
            }
            out.write_all(field.as_bytes())?;
        }
        Ok(())
    }
}
