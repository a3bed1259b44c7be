//! Significance filtering and top-N ranking.
//!
//! Rankings sort by a single metric and break ties by configuration key
//! ascending, so equal values always come out in the same order. Rows whose
//! metric is undefined are left out of that ranking.

use ordered_float::OrderedFloat;

use crate::model::{ChangeMetrics, ComparisonRow, InsightSet, Status};

/// Matching rows whose absolute quantity change is at least `threshold`.
pub fn filter_significant(rows: &[ComparisonRow], threshold: f64) -> Vec<ComparisonRow> {
    rows.iter()
        .filter(|row| is_significant(row, threshold))
        .cloned()
        .collect()
}

pub fn is_significant(row: &ComparisonRow, threshold: f64) -> bool {
    row.status == Status::Matching
        && row
            .changes
            .as_ref()
            .is_some_and(|c| c.qty_change.is_finite() && c.qty_change.abs() >= threshold)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Largest,
    Smallest,
}

/// Derive the ranked views from an already-filtered significant set.
pub fn select_insights(significant: &[ComparisonRow], top_n: usize, detail_limit: usize) -> InsightSet {
    InsightSet {
        price_increases: top_by(significant, top_n, Order::Largest, |c| {
            c.list_price_change_pct.filter(|p| *p > 0.0)
        }),
        price_decreases: top_by(significant, top_n, Order::Smallest, |c| {
            c.list_price_change_pct.filter(|p| *p < 0.0)
        }),
        qty_increases: top_by(significant, top_n, Order::Largest, |c| {
            c.qty_change_pct.filter(|_| c.qty_change > 0.0)
        }),
        qty_decreases: top_by(significant, top_n, Order::Smallest, |c| {
            c.qty_change_pct.filter(|_| c.qty_change < 0.0)
        }),
        largest_movers: top_by(significant, detail_limit, Order::Largest, |c| {
            Some(c.qty_change.abs())
        }),
    }
}

/// First `limit` rows ordered by `metric`. Rows where `metric` yields `None`
/// (or that carry no change metrics) are skipped.
fn top_by<F>(rows: &[ComparisonRow], limit: usize, order: Order, metric: F) -> Vec<ComparisonRow>
where
    F: Fn(&ChangeMetrics) -> Option<f64>,
{
    let mut ranked: Vec<(OrderedFloat<f64>, &ComparisonRow)> = rows
        .iter()
        .filter(|row| row.status == Status::Matching)
        .filter_map(|row| {
            let value = row.changes.as_ref().and_then(&metric)?;
            value.is_finite().then_some((OrderedFloat(value), row))
        })
        .collect();

    ranked.sort_by(|(a_val, a_row), (b_val, b_row)| {
        let by_value = match order {
            Order::Largest => b_val.cmp(a_val),
            Order::Smallest => a_val.cmp(b_val),
        };
        by_value.then_with(|| a_row.key.cmp(&b_row.key))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, row)| row.clone())
        .collect()
}
