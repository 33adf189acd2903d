//! Sales Parser - Turns delimited sales extracts into canonical rows
//!
//! Responsibilities:
//! - Decode raw bytes (UTF-8, Windows-1252 fallback)
//! - Parse delimited text into untyped records with type inference
//! - Normalize each record into a fixed-schema `CanonicalRow`
//! - Resolve a year from heterogeneous date encodings
//!
//! Normalization is TOTAL: every record yields a row, bad fields default.

pub mod delimited;
pub mod normalize;
pub mod record;
pub mod year;

pub use delimited::{clean_header, decode_text, parse_delimited, ParseOptions};
pub use normalize::{coerce_number, normalize, normalize_all, CanonicalRow};
pub use record::{FieldValue, RawRecord};
pub use year::{resolve_year, year_from_date_str, DEFAULT_YEAR};
