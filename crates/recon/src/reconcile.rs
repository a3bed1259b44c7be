use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ChangeMetrics, ComparisonRow, ConfigurationAggregate, ConfigurationKey, Status};

/// Full outer join of OLD and NEW aggregates on configuration key.
///
/// Every key from either side yields exactly one row, ordered by key.
/// Change metrics are attached to matching rows only.
pub fn reconcile(old: &[ConfigurationAggregate], new: &[ConfigurationAggregate]) -> Vec<ComparisonRow> {
    let old_map: BTreeMap<&ConfigurationKey, &ConfigurationAggregate> =
        old.iter().map(|a| (&a.key, a)).collect();
    let new_map: BTreeMap<&ConfigurationKey, &ConfigurationAggregate> =
        new.iter().map(|a| (&a.key, a)).collect();

    let keys: BTreeSet<&ConfigurationKey> = old_map.keys().chain(new_map.keys()).copied().collect();

    keys.into_iter()
        .map(|key| {
            let old_agg = old_map.get(key).copied();
            let new_agg = new_map.get(key).copied();
            let (status, changes) = match (old_agg, new_agg) {
                (Some(o), Some(n)) => (Status::Matching, Some(change_metrics(o, n))),
                (Some(_), None) => (Status::Removed, None),
                // The key came from one of the two maps.
                (None, _) => (Status::New, None),
            };
            ComparisonRow {
                key: key.clone(),
                status,
                old: old_agg.cloned(),
                new: new_agg.cloned(),
                changes,
            }
        })
        .collect()
}

/// Change metrics between the OLD and NEW aggregate of one configuration.
pub fn change_metrics(old: &ConfigurationAggregate, new: &ConfigurationAggregate) -> ChangeMetrics {
    let qty_change = new.quantity - old.quantity;
    let list_price_change = difference(new.list_price, old.list_price);
    let offer_to_list_change = difference(new.list_price, old.offer_price);

    ChangeMetrics {
        qty_change,
        qty_change_pct: percent_change(Some(qty_change), Some(old.quantity)),
        list_price_change,
        list_price_change_pct: percent_change(list_price_change, old.list_price),
        offer_to_list_change,
        offer_to_list_change_pct: percent_change(offer_to_list_change, old.offer_price),
    }
}

/// `delta / base × 100`, or `None` when either side is unknown or `base` is 0.
pub fn percent_change(delta: Option<f64>, base: Option<f64>) -> Option<f64> {
    match (delta, base) {
        (Some(d), Some(b)) if b != 0.0 => {
            let pct = d / b * 100.0;
            pct.is_finite().then_some(pct)
        }
        _ => None,
    }
}

fn difference(minuend: Option<f64>, subtrahend: Option<f64>) -> Option<f64> {
    Some(minuend? - subtrahend?)
}
