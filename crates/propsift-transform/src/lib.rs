#![deny(unsafe_code)]

//! Record transformation: applies a column mapping to parsed CSV data,
//! encodes array-type fields as canonical JSON text, and stamps each record
//! with its import batch.

pub mod json;
pub mod transform;

pub use json::{from_json_array_string, string_items, to_json_array_string};
pub use transform::{
    TransformError, encode_array_value, filter_supported_mappings, is_array_field,
    transform_records,
};
