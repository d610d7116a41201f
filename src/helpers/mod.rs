// Corpus reading and report formatting helpers

pub mod format;
pub mod reader;

pub use reader::{Columns, Row, RowReader};
