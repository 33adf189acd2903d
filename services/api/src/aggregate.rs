//! Aggregation engine over a filtered view.
//!
//! Every function here is pure and recomputes from scratch. Grouped outputs
//! keep first-seen order unless documented otherwise, and every ranking uses
//! a stable sort so ties keep that order too.

use sales_parser::CanonicalRow;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const REGIONS: [&str; 4] = ["East", "West", "Central", "South"];
pub const SEGMENTS: [&str; 3] = ["Consumer", "Corporate", "Home Office"];
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_quantity: f64,
    /// Mean discount as a percentage (0-100).
    pub avg_discount_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTotal {
    pub name: String,
    pub sales: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMargin {
    pub region: String,
    pub sales: f64,
    pub profit: f64,
    /// profit / sales * 100, 0 when sales is 0
    pub margin_pct: f64,
}

/// Sales per (region, segment) for the canonical regions and segments.
/// `values[segment][region]`, aligned with [`SEGMENTS`] and [`REGIONS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSegmentMatrix {
    pub regions: Vec<String>,
    pub segments: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Insertion-ordered group accumulator.
struct Grouped<T> {
    index: HashMap<String, usize>,
    groups: Vec<(String, T)>,
}

impl<T: Default> Grouped<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.groups.push((key.to_string(), T::default()));
                self.index.insert(key.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx].1
    }

    fn into_vec(self) -> Vec<(String, T)> {
        self.groups
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn kpis(rows: &[&CanonicalRow]) -> Kpis {
    let total_sales: f64 = rows.iter().map(|r| r.sales_value).sum();
    let total_profit: f64 = rows.iter().map(|r| r.profit).sum();
    let total_quantity: f64 = rows.iter().map(|r| r.quantity).sum();
    let total_discount: f64 = rows.iter().map(|r| r.discount_rate).sum();

    Kpis {
        total_sales,
        total_profit,
        total_quantity,
        avg_discount_pct: ratio(total_discount, rows.len() as f64) * 100.0,
    }
}

/// Sales per year, ascending by year.
pub fn sales_by_year(rows: &[&CanonicalRow]) -> Vec<(i32, f64)> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for row in rows {
        *by_year.entry(row.year).or_insert(0.0) += row.sales_value;
    }
    by_year.into_iter().collect()
}

pub fn sales_by_category(rows: &[&CanonicalRow]) -> Vec<GroupTotal> {
    let mut grouped: Grouped<f64> = Grouped::new();
    for row in rows {
        *grouped.entry(&row.category) += row.sales_value;
    }
    grouped
        .into_vec()
        .into_iter()
        .map(|(key, value)| GroupTotal { key, value })
        .collect()
}

pub fn segment_counts(rows: &[&CanonicalRow]) -> Vec<(String, usize)> {
    let mut grouped: Grouped<usize> = Grouped::new();
    for row in rows {
        *grouped.entry(&row.segment) += 1;
    }
    grouped.into_vec()
}

pub fn region_segment_matrix(rows: &[&CanonicalRow]) -> RegionSegmentMatrix {
    let values: Vec<Vec<f64>> = SEGMENTS
        .iter()
        .map(|segment| {
            REGIONS
                .iter()
                .map(|region| {
                    rows.iter()
                        .filter(|r| r.region == *region && r.segment == *segment)
                        .map(|r| r.sales_value)
                        .sum::<f64>()
                })
                .collect()
        })
        .collect();

    RegionSegmentMatrix {
        regions: REGIONS.iter().map(|r| r.to_string()).collect(),
        segments: SEGMENTS.iter().map(|s| s.to_string()).collect(),
        values,
    }
}

/// Highest summed profit per sub-category, descending, at most `n`.
pub fn top_subcategories_by_profit(rows: &[&CanonicalRow], n: usize) -> Vec<GroupTotal> {
    let mut grouped: Grouped<f64> = Grouped::new();
    for row in rows {
        *grouped.entry(&row.sub_category) += row.profit;
    }

    let mut ranked = grouped.into_vec();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(n)
        .map(|(key, value)| GroupTotal { key, value })
        .collect()
}

/// Highest summed sales per customer, descending, at most `n`.
pub fn top_customers_by_sales(rows: &[&CanonicalRow], n: usize) -> Vec<CustomerTotal> {
    let mut grouped: Grouped<(f64, f64)> = Grouped::new();
    for row in rows {
        let totals = grouped.entry(&row.customer_name);
        totals.0 += row.sales_value;
        totals.1 += row.profit;
    }

    let mut ranked = grouped.into_vec();
    ranked.sort_by(|a, b| b.1 .0.total_cmp(&a.1 .0));
    ranked
        .into_iter()
        .take(n)
        .map(|(name, (sales, profit))| CustomerTotal {
            name,
            sales,
            profit,
        })
        .collect()
}

pub fn region_margins(rows: &[&CanonicalRow]) -> Vec<RegionMargin> {
    REGIONS
        .iter()
        .map(|region| {
            let (sales, profit) = rows
                .iter()
                .filter(|r| r.region == *region)
                .fold((0.0, 0.0), |(s, p), r| (s + r.sales_value, p + r.profit));

            RegionMargin {
                region: region.to_string(),
                sales,
                profit,
                margin_pct: ratio(profit, sales) * 100.0,
            }
        })
        .collect()
}

/// The last `n` rows of the view, newest first.
pub fn most_recent<'a>(rows: &[&'a CanonicalRow], n: usize) -> Vec<&'a CanonicalRow> {
    let start = rows.len().saturating_sub(n);
    rows[start..].iter().rev().copied().collect()
}

/// Every dashboard aggregate for one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub kpis: Kpis,
    pub sales_by_year: Vec<(i32, f64)>,
    pub sales_by_category: Vec<GroupTotal>,
    pub segment_counts: Vec<(String, usize)>,
    pub region_segment: RegionSegmentMatrix,
    pub top_subcategories: Vec<GroupTotal>,
    pub top_customers: Vec<CustomerTotal>,
    pub region_margins: Vec<RegionMargin>,
    pub recent: Vec<CanonicalRow>,
}

impl Aggregates {
    pub fn compute(rows: &[&CanonicalRow]) -> Self {
        Self {
            kpis: kpis(rows),
            sales_by_year: sales_by_year(rows),
            sales_by_category: sales_by_category(rows),
            segment_counts: segment_counts(rows),
            region_segment: region_segment_matrix(rows),
            top_subcategories: top_subcategories_by_profit(rows, TOP_N),
            top_customers: top_customers_by_sales(rows, TOP_N),
            region_margins: region_margins(rows),
            recent: most_recent(rows, TOP_N).into_iter().cloned().collect(),
        }
    }
}
