//! Dashboard view: chart series and formatted table rows for one refresh.
//!
//! This is the boundary with the rendering side. Nothing here draws; it only
//! shapes aggregates into labels, aligned value sequences and display rows.

use sales_parser::CanonicalRow;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::aggregate::Aggregates;
use crate::filter::{apply, FilterCriteria};
use crate::format::{format_count, format_currency, format_percent};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiView {
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_quantity: f64,
    pub avg_discount_pct: f64,
    pub total_sales_formatted: String,
    pub total_profit_formatted: String,
    pub total_quantity_formatted: String,
    pub avg_discount_formatted: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Series {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Series>,
}

/// Ranked bar data; `positive` carries the sign used for colouring.
#[derive(Debug, Clone, Serialize)]
pub struct RankedChart {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub positive: Vec<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Charts {
    pub trend: ChartData,
    pub category: ChartData,
    pub segment: ChartData,
    pub stacked: ChartData,
    pub profit: RankedChart,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarginRow {
    pub cells: [String; 3],
    pub negative: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tables {
    pub top_customers: Vec<[String; 3]>,
    pub region_margins: Vec<MarginRow>,
    pub recent: Vec<[String; 3]>,
}

/// Distinct values offered by the dropdown controls.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub regions: Vec<String>,
    pub segments: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub kpis: KpiView,
    pub charts: Charts,
    pub tables: Tables,
    pub available_years: Vec<i32>,
    pub available_regions: Vec<String>,
    pub available_segments: Vec<String>,
}

pub fn filter_options(rows: &[CanonicalRow]) -> FilterOptions {
    let years: BTreeSet<i32> = rows.iter().map(|r| r.year).collect();

    let mut regions: Vec<String> = Vec::new();
    let mut segments: Vec<String> = Vec::new();
    for row in rows {
        if !regions.contains(&row.region) {
            regions.push(row.region.clone());
        }
        if !segments.contains(&row.segment) {
            segments.push(row.segment.clone());
        }
    }

    FilterOptions {
        years: years.into_iter().collect(),
        regions,
        segments,
    }
}

fn kpi_view(agg: &Aggregates) -> KpiView {
    let k = agg.kpis;
    KpiView {
        total_sales: k.total_sales,
        total_profit: k.total_profit,
        total_quantity: k.total_quantity,
        avg_discount_pct: k.avg_discount_pct,
        total_sales_formatted: format_currency(k.total_sales),
        total_profit_formatted: format_currency(k.total_profit),
        total_quantity_formatted: format_count(k.total_quantity),
        avg_discount_formatted: format_percent(k.avg_discount_pct),
    }
}

fn charts(agg: &Aggregates) -> Charts {
    let trend = ChartData {
        labels: agg.sales_by_year.iter().map(|(y, _)| y.to_string()).collect(),
        datasets: vec![Series {
            label: Some("Revenue".to_string()),
            data: agg.sales_by_year.iter().map(|(_, v)| *v).collect(),
        }],
    };

    let category = ChartData {
        labels: agg.sales_by_category.iter().map(|g| g.key.clone()).collect(),
        datasets: vec![Series {
            label: None,
            data: agg.sales_by_category.iter().map(|g| g.value).collect(),
        }],
    };

    let segment = ChartData {
        labels: agg.segment_counts.iter().map(|(s, _)| s.clone()).collect(),
        datasets: vec![Series {
            label: None,
            data: agg.segment_counts.iter().map(|(_, c)| *c as f64).collect(),
        }],
    };

    let matrix = &agg.region_segment;
    let stacked = ChartData {
        labels: matrix.regions.clone(),
        datasets: matrix
            .segments
            .iter()
            .zip(&matrix.values)
            .map(|(segment, values)| Series {
                label: Some(segment.clone()),
                data: values.clone(),
            })
            .collect(),
    };

    let profit = RankedChart {
        labels: agg.top_subcategories.iter().map(|g| g.key.clone()).collect(),
        data: agg.top_subcategories.iter().map(|g| g.value).collect(),
        positive: agg.top_subcategories.iter().map(|g| g.value > 0.0).collect(),
    };

    Charts {
        trend,
        category,
        segment,
        stacked,
        profit,
    }
}

fn tables(agg: &Aggregates) -> Tables {
    let top_customers = agg
        .top_customers
        .iter()
        .map(|c| [c.name.clone(), format_currency(c.sales), format_currency(c.profit)])
        .collect();

    let region_margins = agg
        .region_margins
        .iter()
        .map(|m| MarginRow {
            cells: [
                m.region.clone(),
                format_currency(m.sales),
                format_percent(m.margin_pct),
            ],
            negative: m.margin_pct < 0.0,
        })
        .collect();

    let recent = agg
        .recent
        .iter()
        .map(|r| {
            [
                r.date.clone().unwrap_or_else(|| r.year.to_string()),
                r.order_id.clone(),
                format_currency(r.sales_value),
            ]
        })
        .collect();

    Tables {
        top_customers,
        region_margins,
        recent,
    }
}

/// One full refresh: filter, aggregate, shape.
pub fn build_dashboard(rows: &[CanonicalRow], criteria: &FilterCriteria) -> DashboardView {
    let filtered = apply(rows, criteria);
    let agg = Aggregates::compute(&filtered);
    let options = filter_options(rows);

    DashboardView {
        total_rows: rows.len(),
        filtered_rows: filtered.len(),
        kpis: kpi_view(&agg),
        charts: charts(&agg),
        tables: tables(&agg),
        available_years: options.years,
        available_regions: options.regions,
        available_segments: options.segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::row;
    use crate::filter::Selection;

    fn sample() -> Vec<CanonicalRow> {
        let mut a = row(2015, "East", "Consumer", 1200.4);
        a.profit = 300.0;
        a.sub_category = "Phones".to_string();
        a.customer_name = "Ann".to_string();
        a.date = Some("01/03/2015".to_string());
        a.order_id = "A-1".to_string();

        let mut b = row(2016, "West", "Corporate", 80.0);
        b.profit = -40.0;
        b.sub_category = "Tables".to_string();
        b.customer_name = "Bob".to_string();
        b.order_id = "B-1".to_string();

        vec![a, b]
    }

    #[test]
    fn test_dashboard_unfiltered() {
        let rows = sample();
        let view = build_dashboard(&rows, &FilterCriteria::default());

        assert_eq!(view.total_rows, 2);
        assert_eq!(view.filtered_rows, 2);
        assert_eq!(view.kpis.total_sales_formatted, "$1,280");
        assert_eq!(view.kpis.total_profit_formatted, "$260");
        assert_eq!(view.kpis.total_quantity_formatted, "2");
        assert_eq!(view.kpis.avg_discount_formatted, "0.0%");
        assert_eq!(view.available_years, vec![2015, 2016]);

        assert_eq!(view.charts.trend.labels, vec!["2015", "2016"]);
        assert_eq!(view.charts.trend.datasets[0].data, vec![1200.4, 80.0]);
        assert_eq!(view.charts.stacked.labels, vec!["East", "West", "Central", "South"]);
        assert_eq!(view.charts.stacked.datasets.len(), 3);
        assert_eq!(view.charts.profit.labels, vec!["Phones", "Tables"]);
        assert_eq!(view.charts.profit.positive, vec![true, false]);
    }

    #[test]
    fn test_dashboard_tables() {
        let rows = sample();
        let view = build_dashboard(&rows, &FilterCriteria::default());

        assert_eq!(
            view.tables.top_customers[0],
            ["Ann".to_string(), "$1,200".to_string(), "$300".to_string()]
        );
        assert_eq!(view.tables.region_margins.len(), 4);
        assert_eq!(view.tables.region_margins[0].cells[2], "25.0%");
        assert_eq!(view.tables.region_margins[1].cells[2], "-50.0%");
        assert!(view.tables.region_margins[1].negative);
        assert_eq!(view.tables.region_margins[2].cells[2], "0.0%");

        // newest first; rows without a date show their year
        assert_eq!(view.tables.recent[0][0], "2016");
        assert_eq!(view.tables.recent[0][1], "B-1");
        assert_eq!(view.tables.recent[1][0], "01/03/2015");
    }

    #[test]
    fn test_dashboard_empty_selection() {
        let rows = sample();
        let criteria = FilterCriteria {
            year: Selection::Only("2099".to_string()),
            ..FilterCriteria::default()
        };
        let view = build_dashboard(&rows, &criteria);

        assert_eq!(view.filtered_rows, 0);
        assert_eq!(view.kpis.total_sales_formatted, "$0");
        assert_eq!(view.kpis.avg_discount_formatted, "0.0%");
        assert!(view.charts.trend.labels.is_empty());
        assert!(view.charts.profit.labels.is_empty());
        assert!(view.tables.top_customers.is_empty());
        assert!(view.tables.recent.is_empty());
        assert_eq!(view.tables.region_margins.len(), 4);
        // dropdowns still list every year of the dataset
        assert_eq!(view.available_years, vec![2015, 2016]);
        assert_eq!(view.available_regions, vec!["East", "West"]);
    }

    #[test]
    fn test_filter_options() {
        let mut rows = sample();
        rows.push(row(2015, "East", "Home Office", 1.0));
        let options = filter_options(&rows);

        assert_eq!(options.years, vec![2015, 2016]);
        assert_eq!(options.regions, vec!["East", "West"]);
        assert_eq!(options.segments, vec!["Consumer", "Corporate", "Home Office"]);
    }
}
