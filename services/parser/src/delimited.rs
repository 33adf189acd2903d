//! Delimited-text parsing into [`RawRecord`]s.

use crate::record::{FieldValue, RawRecord};

/// Options for [`parse_delimited`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub has_headers: bool,
    pub infer_types: bool,
    pub skip_blank_lines: bool,
    pub delimiter: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            infer_types: true,
            skip_blank_lines: true,
            delimiter: b',',
        }
    }
}

/// Trim a header and drop a leading byte-order mark (either byte order).
pub fn clean_header(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(['\u{feff}', '\u{fffe}'])
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Decode raw bytes: UTF-8 when valid, otherwise Windows-1252.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Parse delimited text into records, in source order.
///
/// Malformed rows are skipped with a warning; only an unreadable header row
/// is an error.
pub fn parse_delimited(content: &str, options: &ParseOptions) -> Result<Vec<RawRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = reader.records();

    let headers: Vec<String> = if options.has_headers {
        match rows.next() {
            Some(first) => first?.iter().map(clean_header).collect(),
            None => return Ok(Vec::new()),
        }
    } else {
        Vec::new()
    };

    let mut records = Vec::new();

    for (line_idx, result) in rows.enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(
                    line = line_idx + if options.has_headers { 2 } else { 1 },
                    error = %e,
                    "skipping malformed row"
                );
                continue;
            }
        };

        if options.skip_blank_lines && row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut record = RawRecord::new();
        for (idx, cell) in row.iter().enumerate() {
            let key = if options.has_headers {
                match headers.get(idx) {
                    Some(h) => h.clone(),
                    None => continue,
                }
            } else {
                format!("field{}", idx + 1)
            };

            let value = if options.infer_types {
                FieldValue::infer(cell)
            } else {
                FieldValue::Text(cell.to_string())
            };
            record.insert(key, value);
        }

        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_headers_and_inference() {
        let csv = "Order ID,Sales,Order Date\nCA-1,261.96,2016-11-08\n";
        let records = parse_delimited(csv, &ParseOptions::default()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get("Order ID"),
            Some(&FieldValue::Text("CA-1".to_string()))
        );
        assert_eq!(records[0].get("Sales"), Some(&FieldValue::Number(261.96)));
        assert_eq!(
            records[0].get("Order Date"),
            Some(&FieldValue::Text("2016-11-08".to_string()))
        );
    }

    #[test]
    fn test_header_bom_and_whitespace_stripped() {
        let csv = "\u{feff} Region ,  Sales \nWest,10\n";
        let records = parse_delimited(csv, &ParseOptions::default()).unwrap();

        assert_eq!(
            records[0].get("Region"),
            Some(&FieldValue::Text("West".to_string()))
        );
        assert_eq!(records[0].get("Sales"), Some(&FieldValue::Number(10.0)));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = "Region,Sales\nWest,10\n\n,\nEast,20\n";
        let records = parse_delimited(csv, &ParseOptions::default()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_blank_lines_kept_when_disabled() {
        let options = ParseOptions {
            skip_blank_lines: false,
            ..ParseOptions::default()
        };
        let csv = "Region,Sales\nWest,10\n,\nEast,20\n";
        let records = parse_delimited(csv, &options).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].get("Region"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_short_rows_lack_trailing_fields() {
        let csv = "Region,Sales,Profit\nWest,10\n";
        let records = parse_delimited(csv, &ParseOptions::default()).unwrap();
        assert_eq!(records[0].get("Profit"), None);
    }

    #[test]
    fn test_without_inference_everything_is_text() {
        let options = ParseOptions {
            infer_types: false,
            ..ParseOptions::default()
        };
        let csv = "Sales\n12.5\n";
        let records = parse_delimited(csv, &options).unwrap();
        assert_eq!(
            records[0].get("Sales"),
            Some(&FieldValue::Text("12.5".to_string()))
        );
    }

    #[test]
    fn test_without_headers_uses_positional_names() {
        let options = ParseOptions {
            has_headers: false,
            ..ParseOptions::default()
        };
        let records = parse_delimited("West,10\n", &options).unwrap();
        assert_eq!(
            records[0].get("field1"),
            Some(&FieldValue::Text("West".to_string()))
        );
        assert_eq!(records[0].get("field2"), Some(&FieldValue::Number(10.0)));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let options = ParseOptions {
            delimiter: b';',
            ..ParseOptions::default()
        };
        let records = parse_delimited("Region;Sales\nSouth;5\n", &options).unwrap();
        assert_eq!(records[0].get("Sales"), Some(&FieldValue::Number(5.0)));
    }

    #[test]
    fn test_empty_content() {
        let records = parse_delimited("", &ParseOptions::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "Caf\xe9" is not valid UTF-8
        let decoded = decode_text(b"Caf\xe9");
        assert_eq!(decoded, "Café");
        assert_eq!(decode_text("Zoë".as_bytes()), "Zoë");
    }
}
