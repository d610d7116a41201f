use std::io;

use tracing::debug;

use crate::error::{Error, Result};

pub const LABEL_COLUMN: &str = "tag";
pub const CONTENT_COLUMN: &str = "content";

/// Positions of the label and content fields within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub label: usize,
    pub content: usize,
}

impl Columns {
    /// Locate the `tag` and `content` columns among the header fields.
    ///
    /// Names must match exactly. When a name repeats, the last occurrence wins.
    pub fn from_header<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut label = None;
        let mut content = None;

        for (index, field) in fields.into_iter().enumerate() {
            match field {
                LABEL_COLUMN => label = Some(index),
                CONTENT_COLUMN => content = Some(index),
                _ => {}
            }
        }

        Ok(Self {
            label: label.ok_or(Error::MissingColumn { name: LABEL_COLUMN })?,
            content: content.ok_or(Error::MissingColumn {
                name: CONTENT_COLUMN,
            })?,
        })
    }

    pub fn from_header_line(line: &str) -> Result<Self> {
        Self::from_header(split(line))
    }
}

/// Split a line on commas. Quotes carry no meaning, so a comma inside the
/// content always starts a new field.
pub fn split(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

/// One data row of a corpus file.
#[derive(Debug, Clone)]
pub struct Row {
    fields: Vec<String>,
    columns: Columns,
}

impl Row {
    /// An empty line carries no fields at all.
    fn parse(line: &str, columns: Columns) -> Self {
        let fields = if line.is_empty() {
            Vec::new()
        } else {
            split(line).into_iter().map(str::to_owned).collect()
        };

        Self { fields, columns }
    }

    pub fn label(&self) -> Option<&str> {
        self.fields.get(self.columns.label).map(String::as_str)
    }

    pub fn content(&self) -> Option<&str> {
        self.fields.get(self.columns.content).map(String::as_str)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Streams the rows of a `tag`/`content` file, one row per line.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// stray Latin-1 post does not stop the run.
pub struct RowReader<R> {
    input: R,
    columns: Columns,
    buf: Vec<u8>,
}

impl<R: io::BufRead> RowReader<R> {
    /// Read the header line and locate the columns.
    pub fn new(mut input: R) -> Result<Self> {
        let mut buf = Vec::new();
        if !read_line(&mut input, &mut buf)? {
            return Err(Error::MissingHeader);
        }

        let columns = Columns::from_header_line(&String::from_utf8_lossy(&buf))?;
        debug!(
            label = columns.label,
            content = columns.content,
            "located corpus columns"
        );

        Ok(Self {
            input,
            columns,
            buf,
        })
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    /// Read the next data row, `None` at end of input.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if !read_line(&mut self.input, &mut self.buf)? {
            return Ok(None);
        }

        Ok(Some(Row::parse(
            &String::from_utf8_lossy(&self.buf),
            self.columns,
        )))
    }

    /// Iterate over the data rows following the header.
    pub fn rows(&mut self) -> impl Iterator<Item = Result<Row>> + '_ {
        std::iter::from_fn(move || self.next_row().transpose())
    }
}

/// Read one line into `buf` without its `\n` or `\r\n` terminator.
/// Returns `false` once the input is exhausted.
fn read_line<R: io::BufRead>(input: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if input.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    Ok(true)
}
