//! Untyped records as they come out of a delimited-text source.
//!
//! A `RawRecord` never outlives normalization: it is produced by
//! [`crate::parse_delimited`] and consumed immediately by
//! [`crate::normalize`].

use std::collections::HashMap;

/// A single scalar cell after (optional) type inference.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Infer the type of a raw cell the way the dashboard feeds expect:
    /// empty -> Null, true/false -> Bool, plain decimal -> Number, else Text.
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return FieldValue::Null;
        }
        match raw {
            "true" | "TRUE" | "True" => return FieldValue::Bool(true),
            "false" | "FALSE" | "False" => return FieldValue::Bool(false),
            _ => {}
        }
        if looks_numeric(raw) {
            if let Ok(n) = raw.trim().parse::<f64>() {
                if n.is_finite() {
                    return FieldValue::Number(n);
                }
            }
        }
        FieldValue::Text(raw.to_string())
    }

    /// Falsy values: Null, false, 0, NaN and the empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
        }
    }

    /// Text rendering of a truthy value; `None` for falsy ones.
    pub fn as_text(&self) -> Option<String> {
        if !self.is_truthy() {
            return None;
        }
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Number(n) => Some(format!("{}", n)),
            FieldValue::Text(s) => Some(s.clone()),
        }
    }
}

/// Digits with an optional sign, fraction and exponent. Rejects `inf`, `nan`
/// and anything with letters other than the exponent marker.
fn looks_numeric(raw: &str) -> bool {
    let s = raw.trim();
    let body = s.strip_prefix('-').unwrap_or(s);
    if body.is_empty() {
        return false;
    }

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };

    let mut digits = 0;
    let mut dots = 0;
    for c in mantissa.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    if digits == 0 || dots > 1 {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && exp.chars().all(|c| c.is_ascii_digit())
        }
    }
}

/// Mapping from (trimmed) source column name to cell value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, FieldValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// First truthy value among `keys`, tried in order.
    pub fn first_truthy(&self, keys: &[&str]) -> Option<&FieldValue> {
        keys.iter()
            .filter_map(|k| self.fields.get(*k))
            .find(|v| v.is_truthy())
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_numbers() {
        assert_eq!(FieldValue::infer("42"), FieldValue::Number(42.0));
        assert_eq!(FieldValue::infer("-3.5"), FieldValue::Number(-3.5));
        assert_eq!(FieldValue::infer(".25"), FieldValue::Number(0.25));
        assert_eq!(FieldValue::infer("1e3"), FieldValue::Number(1000.0));
    }

    #[test]
    fn test_infer_keeps_dates_and_ids_as_text() {
        assert_eq!(
            FieldValue::infer("2016-11-08"),
            FieldValue::Text("2016-11-08".to_string())
        );
        assert_eq!(
            FieldValue::infer("01/03/2015"),
            FieldValue::Text("01/03/2015".to_string())
        );
        assert_eq!(
            FieldValue::infer("CA-2016-152156"),
            FieldValue::Text("CA-2016-152156".to_string())
        );
        assert_eq!(FieldValue::infer("inf"), FieldValue::Text("inf".to_string()));
        assert_eq!(FieldValue::infer("NaN"), FieldValue::Text("NaN".to_string()));
    }

    #[test]
    fn test_infer_empty_and_bool() {
        assert_eq!(FieldValue::infer(""), FieldValue::Null);
        assert_eq!(FieldValue::infer("TRUE"), FieldValue::Bool(true));
        assert_eq!(FieldValue::infer("false"), FieldValue::Bool(false));
    }

    #[test]
    fn test_truthiness() {
        assert!(!FieldValue::Null.is_truthy());
        assert!(!FieldValue::Number(0.0).is_truthy());
        assert!(!FieldValue::Text(String::new()).is_truthy());
        assert!(!FieldValue::Bool(false).is_truthy());
        assert!(FieldValue::Number(-1.0).is_truthy());
        assert!(FieldValue::Text("x".to_string()).is_truthy());
    }

    #[test]
    fn test_as_text_renders_numbers_compactly() {
        assert_eq!(FieldValue::Number(5.0).as_text().as_deref(), Some("5"));
        assert_eq!(FieldValue::Number(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(FieldValue::Number(0.0).as_text(), None);
    }

    #[test]
    fn test_first_truthy_respects_order() {
        let record: RawRecord = [
            ("OrderID", FieldValue::Text("B".to_string())),
            ("Order ID", FieldValue::Text(String::new())),
        ]
        .into_iter()
        .collect();

        let found = record.first_truthy(&["Order ID", "OrderID"]);
        assert_eq!(found, Some(&FieldValue::Text("B".to_string())));
    }
}
