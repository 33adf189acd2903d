//! Filter engine: a conjunction of categorical and range predicates.

use sales_parser::CanonicalRow;
use serde::Deserialize;

/// A categorical criterion: wildcard or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// `all` (any case) and the empty token are the wildcard.
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            None | Some("") => Selection::All,
            Some(t) if t.eq_ignore_ascii_case("all") => Selection::All,
            Some(t) => Selection::Only(t.to_string()),
        }
    }

    fn matches_text(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    /// Loose year match: the token is compared numerically with the row year.
    fn matches_year(&self, year: i32) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted.trim().parse::<i32>().map_or(false, |y| y == year),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub year: Selection,
    pub region: Selection,
    pub segment: Selection,
    pub min_sales: f64,
    pub max_sales: f64,
    pub min_quantity: f64,
    /// Fraction, not percent.
    pub max_discount_rate: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            year: Selection::All,
            region: Selection::All,
            segment: Selection::All,
            min_sales: 0.0,
            max_sales: f64::INFINITY,
            min_quantity: 0.0,
            max_discount_rate: 1.0,
        }
    }
}

impl FilterCriteria {
    pub fn matches(&self, row: &CanonicalRow) -> bool {
        self.year.matches_year(row.year)
            && self.region.matches_text(&row.region)
            && self.segment.matches_text(&row.segment)
            && row.sales_value >= self.min_sales
            && row.sales_value <= self.max_sales
            && row.quantity >= self.min_quantity
            && row.discount_rate <= self.max_discount_rate
    }
}

/// Control state as the dashboard sends it. The discount slider is in percent.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub year: Option<String>,
    pub region: Option<String>,
    pub segment: Option<String>,
    pub min_sales: Option<f64>,
    pub max_sales: Option<f64>,
    pub min_quantity: Option<f64>,
    pub max_discount_pct: Option<f64>,
}

impl From<&FilterQuery> for FilterCriteria {
    fn from(q: &FilterQuery) -> Self {
        let defaults = FilterCriteria::default();
        Self {
            year: Selection::from_token(q.year.as_deref()),
            region: Selection::from_token(q.region.as_deref()),
            segment: Selection::from_token(q.segment.as_deref()),
            min_sales: q.min_sales.unwrap_or(defaults.min_sales),
            max_sales: q.max_sales.unwrap_or(defaults.max_sales),
            min_quantity: q.min_quantity.unwrap_or(defaults.min_quantity),
            max_discount_rate: q
                .max_discount_pct
                .map(|pct| pct / 100.0)
                .unwrap_or(defaults.max_discount_rate),
        }
    }
}

/// Rows satisfying every criterion, in their original order.
pub fn apply<'a>(rows: &'a [CanonicalRow], criteria: &FilterCriteria) -> Vec<&'a CanonicalRow> {
    rows.iter().filter(|row| criteria.matches(row)).collect()
}
