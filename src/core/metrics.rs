use crate::domain::model::{Metrics, SalesTable};
use crate::utils::error::MetricsError;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// `a + b`, or `MetricsError::Overflow` naming the reduction that overflowed.
pub(crate) fn checked_add(
    a: Decimal,
    b: Decimal,
    metric: &'static str,
) -> Result<Decimal, MetricsError> {
    a.checked_add(b).ok_or(MetricsError::Overflow { metric })
}

/// Sum of `total_sales`; zero for an empty table.
pub fn total_revenue(table: &SalesTable) -> Result<Decimal, MetricsError> {
    table.iter().try_fold(Decimal::ZERO, |sum, record| {
        checked_add(sum, record.total_sales, "total revenue")
    })
}

/// Mean of `total_sales`. An empty table has no mean.
pub fn average_sale(table: &SalesTable) -> Result<Decimal, MetricsError> {
    if table.is_empty() {
        return Err(MetricsError::EmptyTable {
            metric: "average sale",
        });
    }
    Ok(total_revenue(table)? / Decimal::from(table.len()))
}

/// Per-product sums in order of each product's first appearance.
pub fn sales_by_product(table: &SalesTable) -> Result<Vec<(String, Decimal)>, MetricsError> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, Decimal)> = Vec::new();

    for record in table {
        match index.get(record.product.as_str()) {
            Some(&position) => {
                totals[position].1 =
                    checked_add(totals[position].1, record.total_sales, "sales by product")?;
            }
            None => {
                index.insert(record.product.as_str(), totals.len());
                totals.push((record.product.clone(), record.total_sales));
            }
        }
    }

    Ok(totals)
}

/// Product with the largest summed sales. Ties go to the product seen first.
pub fn top_product(table: &SalesTable) -> Result<String, MetricsError> {
    let mut best: Option<(String, Decimal)> = None;
    for (product, total) in sales_by_product(table)? {
        let is_better = best
            .as_ref()
            .map_or(true, |(_, best_total)| total > *best_total);
        if is_better {
            best = Some((product, total));
        }
    }

    best.map(|(product, _)| product)
        .ok_or(MetricsError::EmptyTable {
            metric: "top-selling product",
        })
}

pub fn compute_metrics(table: &SalesTable) -> Result<Metrics, MetricsError> {
    let metrics = Metrics {
        total_revenue: total_revenue(table)?,
        average_sale: average_sale(table)?,
        top_product: top_product(table)?,
    };

    tracing::debug!(
        "Metrics: revenue={}, average={}, top={}",
        metrics.total_revenue,
        metrics.average_sale,
        metrics.top_product
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SalesRecord;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn sale(day: u32, product: &str, price: i64, quantity: u32) -> SalesRecord {
        let price = Decimal::from(price);
        SalesRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            product: product.to_string(),
            category: "X".to_string(),
            price,
            quantity_sold: quantity,
            total_sales: price * Decimal::from(quantity),
        }
    }

    fn scenario() -> SalesTable {
        SalesTable::new(vec![
            sale(1, "A", 10, 2),
            sale(1, "B", 5, 1),
            sale(2, "A", 10, 3),
        ])
    }

    #[test]
    fn test_metrics_for_reference_scenario() {
        let metrics = compute_metrics(&scenario()).unwrap();

        assert_eq!(metrics.total_revenue, Decimal::from(55));
        assert_eq!(
            metrics.average_sale.round_dp(2),
            Decimal::from_str("18.33").unwrap()
        );
        assert_eq!(metrics.top_product, "A");
    }

    #[test]
    fn test_average_is_revenue_over_row_count() {
        let table = scenario();
        assert_eq!(
            average_sale(&table).unwrap(),
            total_revenue(&table).unwrap() / Decimal::from(3)
        );
    }

    #[test]
    fn test_empty_table() {
        let table = SalesTable::default();
        assert_eq!(total_revenue(&table), Ok(Decimal::ZERO));
        assert_eq!(
            compute_metrics(&table),
            Err(MetricsError::EmptyTable {
                metric: "average sale"
            })
        );
        assert!(top_product(&table).is_err());
    }

    #[test]
    fn test_top_product_tie_goes_to_first_seen() {
        let table = SalesTable::new(vec![
            sale(1, "Lamp", 5, 2),
            sale(1, "Desk", 10, 1),
            sale(2, "Lamp", 1, 0),
        ]);
        assert_eq!(top_product(&table).unwrap(), "Lamp");

        let reversed = SalesTable::new(vec![sale(1, "Desk", 10, 1), sale(1, "Lamp", 5, 2)]);
        assert_eq!(top_product(&reversed).unwrap(), "Desk");
    }

    #[test]
    fn test_sales_by_product_keeps_first_seen_order() {
        let totals = sales_by_product(&SalesTable::new(vec![
            sale(1, "B", 1, 1),
            sale(1, "A", 2, 1),
            sale(2, "B", 3, 1),
        ]))
        .unwrap();
        assert_eq!(
            totals,
            vec![
                ("B".to_string(), Decimal::from(4)),
                ("A".to_string(), Decimal::from(2)),
            ]
        );
    }

    #[test]
    fn test_sums_past_decimal_max_fail_instead_of_panicking() {
        let mut huge = sale(1, "A", 1, 1);
        huge.price = Decimal::MAX;
        huge.total_sales = Decimal::MAX;
        let table = SalesTable::new(vec![huge.clone(), huge]);

        assert_eq!(
            total_revenue(&table),
            Err(MetricsError::Overflow {
                metric: "total revenue"
            })
        );
        assert!(matches!(
            compute_metrics(&table),
            Err(MetricsError::Overflow { .. })
        ));
        assert_eq!(
            top_product(&table),
            Err(MetricsError::Overflow {
                metric: "sales by product"
            })
        );
    }
}
