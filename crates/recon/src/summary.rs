use crate::model::{ComparisonRow, ComparisonSummary, ConfigurationAggregate, SnapshotStats, Status};
use crate::normalize::NormalizedSnapshot;

/// Per-snapshot row, identity and quantity counters.
pub fn snapshot_stats(normalized: &NormalizedSnapshot, aggregates: &[ConfigurationAggregate]) -> SnapshotStats {
    SnapshotStats {
        snapshot: normalized.snapshot,
        rows: normalized.records.len(),
        unique_items: normalized.unique_items,
        duplicate_items: normalized.duplicate_items,
        configurations: aggregates.len(),
        total_quantity: total_quantity(aggregates),
    }
}

/// Compute summary statistics from the comparison.
pub fn compute_summary(
    old: &[ConfigurationAggregate],
    new: &[ConfigurationAggregate],
    rows: &[ComparisonRow],
    significant: &[ComparisonRow],
) -> ComparisonSummary {
    let mut matching = 0;
    let mut removed = 0;
    let mut added = 0;
    let mut net_quantity_change = 0.0;

    for r in rows {
        match r.status {
            Status::Matching => {
                matching += 1;
                if let Some(c) = &r.changes {
                    net_quantity_change += c.qty_change;
                }
            }
            Status::Removed => removed += 1,
            Status::New => added += 1,
        }
    }

    let matching_rows = || rows.iter().filter(|r| r.status == Status::Matching);
    let average_old_list_price =
        mean_positive(matching_rows().filter_map(|r| r.old.as_ref()?.list_price));
    let average_new_list_price =
        mean_positive(matching_rows().filter_map(|r| r.new.as_ref()?.list_price));
    let average_list_price_change = match (average_old_list_price, average_new_list_price) {
        (Some(o), Some(n)) => Some(n - o),
        _ => None,
    };

    ComparisonSummary {
        old_configurations: old.len(),
        new_configurations: new.len(),
        matching,
        removed,
        new: added,
        significant: significant.len(),
        total_old_quantity: total_quantity(old),
        total_new_quantity: total_quantity(new),
        net_quantity_change,
        average_old_list_price,
        average_new_list_price,
        average_list_price_change,
    }
}

fn total_quantity(aggregates: &[ConfigurationAggregate]) -> f64 {
    aggregates.iter().map(|a| a.quantity).sum()
}

/// Arithmetic mean of the strictly positive values, `None` if there are none.
fn mean_positive(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .filter(|v| *v > 0.0)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
