//! Row normalization: one [`RawRecord`] in, one [`CanonicalRow`] out.
//!
//! Normalization is total. Missing or malformed fields fall back to the
//! per-field defaults declared below; nothing is logged and no row is
//! rejected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{FieldValue, RawRecord};
use crate::year::{resolve_year, DATE_COLUMNS};

/// The fixed-schema sales row every aggregate is computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRow {
    pub year: i32,
    pub date: Option<String>,
    pub order_id: String,
    pub region: String,
    pub segment: String,
    pub category: String,
    pub sub_category: String,
    pub sales_value: f64,
    pub profit: f64,
    pub quantity: f64,
    pub discount_rate: f64,
    pub customer_name: String,
}

/// A canonical text field: candidate source columns in priority order and
/// the value used when none of them is truthy.
pub struct TextField {
    pub aliases: &'static [&'static str],
    pub default: &'static str,
}

/// A canonical numeric field.
pub struct NumberField {
    pub aliases: &'static [&'static str],
    pub default: f64,
}

pub const ORDER_ID: &[&str] = &["Order ID", "OrderID"];

pub const REGION: TextField = TextField { aliases: &["Region"], default: "Unknown" };
pub const SEGMENT: TextField = TextField { aliases: &["Segment"], default: "Consumer" };
pub const CATEGORY: TextField = TextField { aliases: &["Category"], default: "Other" };
pub const SUB_CATEGORY: TextField = TextField {
    aliases: &["Sub-Category", "SubCategory"],
    default: "Other",
};
pub const CUSTOMER_NAME: TextField = TextField {
    aliases: &["Customer Name", "Customer"],
    default: "Unknown",
};

pub const SALES: NumberField = NumberField { aliases: &["Sales"], default: 0.0 };
pub const PROFIT: NumberField = NumberField { aliases: &["Profit"], default: 0.0 };
pub const QUANTITY: NumberField = NumberField { aliases: &["Quantity"], default: 1.0 };
pub const DISCOUNT: NumberField = NumberField { aliases: &["Discount"], default: 0.0 };

impl TextField {
    pub fn read(&self, record: &RawRecord) -> String {
        record
            .first_truthy(self.aliases)
            .and_then(FieldValue::as_text)
            .unwrap_or_else(|| self.default.to_string())
    }
}

impl NumberField {
    pub fn read(&self, record: &RawRecord) -> f64 {
        let value = record.first_truthy(self.aliases).unwrap_or(&FieldValue::Null);
        coerce_number(value, self.default)
    }
}

/// Parse-or-default. Absent, zero, non-numeric and non-finite values all
/// collapse to `default`.
pub fn coerce_number(value: &FieldValue, default: f64) -> f64 {
    let n = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        FieldValue::Bool(true) => 1.0,
        FieldValue::Bool(false) | FieldValue::Null => return default,
    };
    if n.is_finite() && n != 0.0 {
        n
    } else {
        default
    }
}

/// Placeholder id for rows without an order id: `ORD-<0..10000>`.
fn placeholder_order_id() -> String {
    let n = Uuid::new_v4().as_u128() % 10_000;
    format!("ORD-{}", n)
}

pub fn normalize(record: &RawRecord) -> CanonicalRow {
    CanonicalRow {
        year: resolve_year(record),
        date: record.first_truthy(DATE_COLUMNS).and_then(FieldValue::as_text),
        order_id: record
            .first_truthy(ORDER_ID)
            .and_then(FieldValue::as_text)
            .unwrap_or_else(placeholder_order_id),
        region: REGION.read(record),
        segment: SEGMENT.read(record),
        category: CATEGORY.read(record),
        sub_category: SUB_CATEGORY.read(record),
        sales_value: SALES.read(record),
        profit: PROFIT.read(record),
        quantity: QUANTITY.read(record),
        discount_rate: DISCOUNT.read(record),
        customer_name: CUSTOMER_NAME.read(record),
    }
}

pub fn normalize_all(records: &[RawRecord]) -> Vec<CanonicalRow> {
    records.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimited::{parse_delimited, ParseOptions};
    use crate::year::DEFAULT_YEAR;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    // -------------------------------------------------------------------------
    // DEFAULTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_record_gets_every_default() {
        let row = normalize(&RawRecord::new());

        assert_eq!(row.year, DEFAULT_YEAR);
        assert_eq!(row.date, None);
        assert!(row.order_id.starts_with("ORD-"));
        assert_eq!(row.region, "Unknown");
        assert_eq!(row.segment, "Consumer");
        assert_eq!(row.category, "Other");
        assert_eq!(row.sub_category, "Other");
        assert_eq!(row.sales_value, 0.0);
        assert_eq!(row.profit, 0.0);
        assert_eq!(row.quantity, 1.0);
        assert_eq!(row.discount_rate, 0.0);
        assert_eq!(row.customer_name, "Unknown");
    }

    #[test]
    fn test_unrecognized_fields_only() {
        let record: RawRecord = [("Foo", text("bar")), ("Baz", FieldValue::Number(3.0))]
            .into_iter()
            .collect();
        let row = normalize(&record);
        assert_eq!(row.region, "Unknown");
        assert_eq!(row.quantity, 1.0);
    }

    #[test]
    fn test_placeholder_id_range() {
        for _ in 0..50 {
            let id = normalize(&RawRecord::new()).order_id;
            let n: u32 = id.trim_start_matches("ORD-").parse().unwrap();
            assert!(n < 10_000);
        }
    }

    // -------------------------------------------------------------------------
    // NUMERIC COERCION
    // -------------------------------------------------------------------------

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&FieldValue::Number(12.5), 0.0), 12.5);
        assert_eq!(coerce_number(&text(" 7 "), 0.0), 7.0);
        assert_eq!(coerce_number(&text("1,234"), 0.0), 0.0);
        assert_eq!(coerce_number(&text("abc"), 1.0), 1.0);
        assert_eq!(coerce_number(&FieldValue::Null, 1.0), 1.0);
        assert_eq!(coerce_number(&FieldValue::Bool(true), 0.0), 1.0);
        assert_eq!(coerce_number(&text("inf"), 0.0), 0.0);
    }

    #[test]
    fn test_zero_quantity_collapses_to_default() {
        let record: RawRecord = [("Quantity", FieldValue::Number(0.0))].into_iter().collect();
        assert_eq!(normalize(&record).quantity, 1.0);
    }

    #[test]
    fn test_negative_profit_kept() {
        let record: RawRecord = [("Profit", FieldValue::Number(-383.03))].into_iter().collect();
        assert_eq!(normalize(&record).profit, -383.03);
    }

    // -------------------------------------------------------------------------
    // ALIASES
    // -------------------------------------------------------------------------

    #[test]
    fn test_alias_columns() {
        let record: RawRecord = [
            ("OrderID", text("US-2015-1")),
            ("OrderDate", text("01/03/2015")),
            ("SubCategory", text("Chairs")),
            ("Customer", text("Claire Gute")),
        ]
        .into_iter()
        .collect();

        let row = normalize(&record);
        assert_eq!(row.order_id, "US-2015-1");
        assert_eq!(row.date.as_deref(), Some("01/03/2015"));
        assert_eq!(row.year, 2015);
        assert_eq!(row.sub_category, "Chairs");
        assert_eq!(row.customer_name, "Claire Gute");
    }

    #[test]
    fn test_primary_alias_preferred() {
        let record: RawRecord = [
            ("Order ID", text("A")),
            ("OrderID", text("B")),
            ("Sub-Category", text("Phones")),
            ("SubCategory", text("Tables")),
        ]
        .into_iter()
        .collect();

        let row = normalize(&record);
        assert_eq!(row.order_id, "A");
        assert_eq!(row.sub_category, "Phones");
    }

    #[test]
    fn test_numeric_text_fields_rendered() {
        let record: RawRecord = [("Order ID", FieldValue::Number(1042.0))].into_iter().collect();
        assert_eq!(normalize(&record).order_id, "1042");
    }

    // -------------------------------------------------------------------------
    // FULL ROWS
    // -------------------------------------------------------------------------

    #[test]
    fn test_superstore_row() {
        let csv = "\u{feff}Row ID,Order ID,Order Date,Segment,Region,Category,Sub-Category,Customer Name,Sales,Quantity,Discount,Profit\n\
                   1,CA-2016-152156,2016-11-08,Consumer,South,Furniture,Bookcases,Claire Gute,261.96,2,0,41.9136\n";
        let records = parse_delimited(csv, &ParseOptions::default()).unwrap();
        let rows = normalize_all(&records);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.year, 2016);
        assert_eq!(row.order_id, "CA-2016-152156");
        assert_eq!(row.region, "South");
        assert_eq!(row.segment, "Consumer");
        assert_eq!(row.category, "Furniture");
        assert_eq!(row.sub_category, "Bookcases");
        assert_eq!(row.customer_name, "Claire Gute");
        assert_eq!(row.sales_value, 261.96);
        assert_eq!(row.quantity, 2.0);
        assert_eq!(row.discount_rate, 0.0);
        assert_eq!(row.profit, 41.9136);
    }

    #[test]
    fn test_serializes_camel_case() {
        let row = normalize(&RawRecord::new());
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("subCategory").is_some());
        assert!(json.get("salesValue").is_some());
        assert!(json.get("discountRate").is_some());
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let records: Vec<RawRecord> = (1..=3)
            .map(|i| [("Sales", FieldValue::Number(i as f64))].into_iter().collect())
            .collect();
        let values: Vec<f64> = normalize_all(&records).iter().map(|r| r.sales_value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}
