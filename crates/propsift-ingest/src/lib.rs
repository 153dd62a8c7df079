#![deny(unsafe_code)]

//! CSV ingestion: a normalization pre-pass for array-valued columns and a
//! naive quote-aware parser producing a column-major table.
//!
//! The parser deliberately does not handle embedded newlines inside quoted
//! fields or doubled (`""`) escape quotes; the normalizer exists precisely
//! to make this splitter safe for embedded commas in tag/list columns.

pub mod normalize;
pub mod parse;

pub use normalize::{array_column_indexes, normalize_csv_text, split_line};
pub use parse::{ParseError, ParsedCsv, parse_csv_file, parse_csv_text};
