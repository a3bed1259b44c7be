use std::collections::BTreeMap;

use crate::model::{ConfigurationAggregate, ConfigurationKey, RawRecord, Snapshot};

/// Running Σ(value·weight) and Σ(weight) over pairs where both are known.
#[derive(Debug, Clone, Copy, Default)]
struct WeightedMean {
    weighted_sum: f64,
    weight: f64,
}

impl WeightedMean {
    fn add(&mut self, value: Option<f64>, weight: Option<f64>) {
        if let (Some(v), Some(w)) = (value, weight) {
            self.weighted_sum += v * w;
            self.weight += w;
        }
    }

    /// `None` when no weight backs the mean.
    fn value(&self) -> Option<f64> {
        if self.weight == 0.0 {
            return None;
        }
        let mean = self.weighted_sum / self.weight;
        mean.is_finite().then_some(mean)
    }
}

#[derive(Default)]
struct Group {
    count: usize,
    quantity: f64,
    list_price: WeightedMean,
    offer_price: WeightedMean,
}

/// Group records by configuration and compute quantity-weighted prices.
///
/// Unknown quantities add 0 to the total but still count as records. Offer
/// prices are only aggregated for the OLD snapshot.
pub fn aggregate_records(snapshot: Snapshot, records: &[RawRecord]) -> Vec<ConfigurationAggregate> {
    let mut groups: BTreeMap<&ConfigurationKey, Group> = BTreeMap::new();

    for record in records {
        let group = groups.entry(&record.key).or_default();
        group.count += 1;
        group.quantity += record.quantity.unwrap_or(0.0);
        group.list_price.add(record.list_price, record.quantity);
        if snapshot == Snapshot::Old {
            group.offer_price.add(record.offer_price, record.quantity);
        }
    }

    groups
        .into_iter()
        .map(|(key, group)| ConfigurationAggregate {
            snapshot,
            key: key.clone(),
            record_count: group.count,
            quantity: group.quantity,
            list_price: group.list_price.value(),
            offer_price: match snapshot {
                Snapshot::Old => group.offer_price.value(),
                Snapshot::New => None,
            },
        })
        .collect()
}
