//! Console rendering of an [`AnalysisReport`]: key metrics, the filtered rows
//! and text versions of the three charts. The analysis itself never formats.

use crate::core::aggregate::{CATEGORY_CHART, DATE_CHART, PRICE_QUANTITY_CHART};
use crate::domain::model::{AnalysisReport, ChartLabels, CrossTab, FilterOutcome, Metrics};
use crate::utils::error::Result;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Heat levels from lowest to highest. Cells without transactions render blank.
const HEAT_SHADES: [char; 9] = ['.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

pub fn render(report: &AnalysisReport, format: OutputFormat, chart_width: usize) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report, chart_width)),
        OutputFormat::Json => render_json(report),
    }
}

pub fn render_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_text(report: &AnalysisReport, chart_width: usize) -> String {
    let mut out = render_metrics(&report.metrics);

    if let Some(filtered) = render_filter(&report.filter) {
        out.push('\n');
        out.push_str(&filtered);
    }

    let by_category: Vec<(String, Decimal)> = report
        .aggregations
        .by_category
        .iter()
        .map(|(category, total)| (category.clone(), *total))
        .collect();
    let by_date: Vec<(String, Decimal)> = report
        .aggregations
        .by_date
        .iter()
        .map(|(date, total)| (date.format("%Y-%m-%d").to_string(), *total))
        .collect();

    out.push('\n');
    out.push_str(&render_bar_chart(&CATEGORY_CHART, &by_category, chart_width));
    out.push('\n');
    out.push_str(&render_bar_chart(&DATE_CHART, &by_date, chart_width));
    out.push('\n');
    out.push_str(&render_heatmap(&PRICE_QUANTITY_CHART, &report.aggregations.by_price_quantity));
    out
}

pub fn render_metrics(metrics: &Metrics) -> String {
    format!(
        "Key Metrics\nTotal Revenue: ₹{}\nAverage Sale Value: ₹{:.2}\nTop-Selling Product: {}\n",
        metrics.total_revenue.normalize(),
        metrics.average_sale,
        metrics.top_product
    )
}

/// `None` when filtering was skipped.
pub fn render_filter(outcome: &FilterOutcome) -> Option<String> {
    let records = match outcome {
        FilterOutcome::Skipped => return None,
        FilterOutcome::Empty => return Some("No data found for this category.\n".to_string()),
        FilterOutcome::Matches(records) => records,
    };

    let header = [
        "Date",
        "Product",
        "Category",
        "Price",
        "Quantity Sold",
        "Total Sales",
    ];
    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|r| {
            [
                r.date.format("%Y-%m-%d").to_string(),
                r.product.clone(),
                r.category.clone(),
                r.price.to_string(),
                r.quantity_sold.to_string(),
                r.total_sales.to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    Some(out)
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Horizontal bars scaled so the largest value spans `width` characters.
pub fn render_bar_chart(labels: &ChartLabels, series: &[(String, Decimal)], width: usize) -> String {
    let mut out = format!("{}\n{} vs {}\n", labels.title, labels.x_label, labels.y_label);
    if series.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let label_width = series
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let max = series
        .iter()
        .map(|(_, value)| *value)
        .max()
        .unwrap_or(Decimal::ZERO);

    for (label, value) in series {
        let bar = "█".repeat(scale(*value, max, width));
        out.push_str(&format!(
            "{:<label_width$} | {} {}\n",
            label,
            bar,
            value.normalize(),
            label_width = label_width
        ));
    }
    out
}

/// Prices down, quantities across; each cell shaded by its share of the largest cell.
pub fn render_heatmap(labels: &ChartLabels, table: &CrossTab) -> String {
    let mut out = format!("{}\nrows: {}, columns: {}\n", labels.title, labels.y_label, labels.x_label);
    if table.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let max = table
        .cells
        .iter()
        .flatten()
        .flatten()
        .copied()
        .max()
        .unwrap_or(Decimal::ZERO);
    let price_labels: Vec<String> = table.prices.iter().map(|p| p.normalize().to_string()).collect();
    let row_label_width = price_labels.iter().map(|p| p.len()).max().unwrap_or(0);
    let col_width = table
        .quantities
        .iter()
        .map(|q| q.to_string().len())
        .max()
        .unwrap_or(1);

    out.push_str(&format!("{:>row_label_width$} |", "", row_label_width = row_label_width));
    for quantity in &table.quantities {
        out.push_str(&format!(" {:>col_width$}", quantity, col_width = col_width));
    }
    out.push('\n');

    for (price, row) in price_labels.iter().zip(&table.cells) {
        out.push_str(&format!("{:>row_label_width$} |", price, row_label_width = row_label_width));
        for cell in row {
            let shade = match cell {
                Some(value) => {
                    HEAT_SHADES[scale(*value, max, HEAT_SHADES.len() - 1)].to_string()
                }
                None => " ".to_string(),
            };
            out.push_str(&format!(" {:>col_width$}", shade, col_width = col_width));
        }
        out.push('\n');
    }
    out
}

fn scale(value: Decimal, max: Decimal, steps: usize) -> usize {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return 0;
    }
    // value <= max, so dividing first keeps the product in range
    (value / max * Decimal::from(steps))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(steps)
}
