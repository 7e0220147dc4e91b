use crate::core::metrics::checked_add;
use crate::domain::model::{Aggregations, ChartLabels, CrossTab, SalesTable};
use crate::utils::error::MetricsError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

pub const CATEGORY_CHART: ChartLabels = ChartLabels {
    title: "Total Sales by Category",
    x_label: "Category",
    y_label: "Total Sales",
};

pub const DATE_CHART: ChartLabels = ChartLabels {
    title: "Sales Trend Over Time",
    x_label: "Date",
    y_label: "Total Sales",
};

pub const PRICE_QUANTITY_CHART: ChartLabels = ChartLabels {
    title: "Heatmap: Price vs Quantity Sold",
    x_label: "Quantity Sold",
    y_label: "Price",
};

pub fn sales_by_category(table: &SalesTable) -> Result<BTreeMap<String, Decimal>, MetricsError> {
    let mut totals = BTreeMap::new();
    for record in table {
        let total = totals
            .entry(record.category.clone())
            .or_insert(Decimal::ZERO);
        *total = checked_add(*total, record.total_sales, "sales by category")?;
    }
    Ok(totals)
}

pub fn sales_by_date(table: &SalesTable) -> Result<BTreeMap<NaiveDate, Decimal>, MetricsError> {
    let mut totals = BTreeMap::new();
    for record in table {
        let total = totals.entry(record.date).or_insert(Decimal::ZERO);
        *total = checked_add(*total, record.total_sales, "sales by date")?;
    }
    Ok(totals)
}

/// Pivots sales into a price × quantity grid. Pairs with no records stay `None`.
pub fn sales_by_price_quantity(table: &SalesTable) -> Result<CrossTab, MetricsError> {
    let mut sums: BTreeMap<(Decimal, u32), Decimal> = BTreeMap::new();
    let mut prices = BTreeSet::new();
    let mut quantities = BTreeSet::new();

    for record in table {
        // 10 與 10.00 視為同一列
        let price = record.price.normalize();
        prices.insert(price);
        quantities.insert(record.quantity_sold);
        let cell = sums
            .entry((price, record.quantity_sold))
            .or_insert(Decimal::ZERO);
        *cell = checked_add(*cell, record.total_sales, "price/quantity grid")?;
    }

    let prices: Vec<Decimal> = prices.into_iter().collect();
    let quantities: Vec<u32> = quantities.into_iter().collect();
    let cells: Vec<Vec<Option<Decimal>>> = prices
        .iter()
        .map(|price| {
            quantities
                .iter()
                .map(|quantity| sums.get(&(*price, *quantity)).copied())
                .collect()
        })
        .collect();

    Ok(CrossTab {
        prices,
        quantities,
        cells,
    })
}

pub fn build_aggregations(table: &SalesTable) -> Result<Aggregations, MetricsError> {
    let aggregations = Aggregations {
        by_category: sales_by_category(table)?,
        by_date: sales_by_date(table)?,
        by_price_quantity: sales_by_price_quantity(table)?,
    };

    tracing::debug!(
        "Built aggregations: {} categories, {} dates, {}x{} price/quantity grid",
        aggregations.by_category.len(),
        aggregations.by_date.len(),
        aggregations.by_price_quantity.prices.len(),
        aggregations.by_price_quantity.quantities.len()
    );
    Ok(aggregations)
}
