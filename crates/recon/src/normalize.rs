use std::collections::HashSet;

use crate::config::ColumnMapping;
use crate::error::ReconError;
use crate::model::{ConfigurationKey, RawRecord, Snapshot};
use crate::table::{Cell, RawTable};

/// Typed records of one snapshot plus identity bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSnapshot {
    pub snapshot: Snapshot,
    pub records: Vec<RawRecord>,
    pub unique_items: usize,
    /// Rows whose `Item #` repeats an earlier row. Kept, not deduplicated.
    pub duplicate_items: usize,
}

/// Validate required columns and coerce every row into a `RawRecord`.
///
/// Missing columns fail fast with the first absent name. Unparseable numbers
/// become `None`; they never abort a row.
pub fn normalize(
    snapshot: Snapshot,
    table: &RawTable,
    columns: &ColumnMapping,
) -> Result<NormalizedSnapshot, ReconError> {
    let idx = |name: &str| -> Result<usize, ReconError> {
        table.column_index(name).ok_or_else(|| ReconError::MissingField {
            snapshot,
            field: name.into(),
        })
    };

    let item_idx = idx(&columns.item_id)?;
    let model_idx = idx(&columns.model)?;
    let capacity_idx = idx(&columns.capacity)?;
    let color_idx = idx(&columns.color)?;
    let lock_idx = idx(&columns.lock_status)?;
    let grade_idx = idx(&columns.grade)?;
    let qty_idx = idx(&columns.quantity)?;
    let price_idx = idx(&columns.list_price)?;

    let offer_idx = match snapshot {
        Snapshot::Old => {
            let i = table.column_index(&columns.offer_price);
            if i.is_none() {
                log::warn!(
                    "{snapshot}: no '{}' column, offer prices will be unknown",
                    columns.offer_price
                );
            }
            i
        }
        Snapshot::New => None,
    };

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let attr = |i: usize| attribute(RawTable::cell(row, i));
        records.push(RawRecord {
            item_id: RawTable::cell(row, item_idx).to_text(),
            key: ConfigurationKey {
                model: attr(model_idx),
                capacity: attr(capacity_idx),
                color: attr(color_idx),
                lock_status: attr(lock_idx),
                grade: attr(grade_idx),
            },
            quantity: RawTable::cell(row, qty_idx).to_number(),
            list_price: RawTable::cell(row, price_idx).to_number(),
            offer_price: offer_idx.and_then(|i| RawTable::cell(row, i).to_number()),
        });
    }

    let unique_items = records
        .iter()
        .map(|r| r.item_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let duplicate_items = records.len() - unique_items;

    log::info!(
        "{snapshot} file: {} rows, {unique_items} unique items, {duplicate_items} duplicates",
        records.len()
    );

    Ok(NormalizedSnapshot {
        snapshot,
        records,
        unique_items,
        duplicate_items,
    })
}

/// Grouping attribute. Empty cells are absent; everything else keeps its
/// exact text.
fn attribute(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        other => {
            let text = other.to_text();
            (!text.is_empty()).then_some(text)
        }
    }
}
