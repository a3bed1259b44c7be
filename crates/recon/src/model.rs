use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Which of the two inventory lists a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Snapshot {
    Old,
    New,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => write!(f, "OLD"),
            Self::New => write!(f, "NEW"),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Grouping attributes shared by every unit of one product configuration.
///
/// Field order is the comparison order: the derived `Ord` sorts by model,
/// then capacity, color, lock status and grade, with absent values first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConfigurationKey {
    pub model: Option<String>,
    pub capacity: Option<String>,
    pub color: Option<String>,
    pub lock_status: Option<String>,
    pub grade: Option<String>,
}

impl ConfigurationKey {
    pub fn new(model: &str, capacity: &str, color: &str, lock_status: &str, grade: &str) -> Self {
        let part = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            model: part(model),
            capacity: part(capacity),
            color: part(color),
            lock_status: part(lock_status),
            grade: part(grade),
        }
    }
}

/// Item name as shown in reports: `iPhone 12 64GB Black (Unlocked) (DLS A)`.
impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(5);
        parts.extend(self.model.iter().cloned());
        parts.extend(self.capacity.iter().cloned());
        parts.extend(self.color.iter().cloned());
        parts.extend(self.lock_status.iter().map(|s| format!("({s})")));
        parts.extend(self.grade.iter().map(|s| format!("(DLS {s})")));

        if parts.is_empty() {
            write!(f, "Unknown Item")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

/// A single normalized inventory row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub item_id: String,
    pub key: ConfigurationKey,
    pub quantity: Option<f64>,
    pub list_price: Option<f64>,
    /// Always `None` for the NEW snapshot.
    pub offer_price: Option<f64>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Per-configuration totals for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationAggregate {
    pub snapshot: Snapshot,
    pub key: ConfigurationKey,
    pub record_count: usize,
    pub quantity: f64,
    /// Quantity-weighted list price. `None` when no quantity backs a price.
    pub list_price: Option<f64>,
    /// Quantity-weighted offer price (OLD only).
    pub offer_price: Option<f64>,
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Matching,
    Removed,
    New,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matching => write!(f, "Matching"),
            Self::Removed => write!(f, "Removed"),
            Self::New => write!(f, "New"),
        }
    }
}

/// Change metrics of a matching configuration. `None` marks a metric whose
/// denominator was zero or unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeMetrics {
    pub qty_change: f64,
    pub qty_change_pct: Option<f64>,
    pub list_price_change: Option<f64>,
    pub list_price_change_pct: Option<f64>,
    pub offer_to_list_change: Option<f64>,
    pub offer_to_list_change_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub key: ConfigurationKey,
    pub status: Status,
    pub old: Option<ConfigurationAggregate>,
    pub new: Option<ConfigurationAggregate>,
    /// Present only for `Status::Matching`.
    pub changes: Option<ChangeMetrics>,
}

/// Ranked views over the significant rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightSet {
    pub price_increases: Vec<ComparisonRow>,
    pub price_decreases: Vec<ComparisonRow>,
    pub qty_increases: Vec<ComparisonRow>,
    pub qty_decreases: Vec<ComparisonRow>,
    /// Significant rows by absolute quantity change, largest first.
    pub largest_movers: Vec<ComparisonRow>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotStats {
    pub snapshot: Snapshot,
    pub rows: usize,
    pub unique_items: usize,
    pub duplicate_items: usize,
    pub configurations: usize,
    pub total_quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub old_configurations: usize,
    pub new_configurations: usize,
    pub matching: usize,
    pub removed: usize,
    pub new: usize,
    pub significant: usize,
    pub total_old_quantity: f64,
    pub total_new_quantity: f64,
    pub net_quantity_change: f64,
    pub average_old_list_price: Option<f64>,
    pub average_new_list_price: Option<f64>,
    pub average_list_price_change: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonMeta {
    pub engine_version: String,
    pub run_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_source: Option<String>,
    pub significance_threshold: f64,
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub meta: ComparisonMeta,
    pub old_stats: SnapshotStats,
    pub new_stats: SnapshotStats,
    pub summary: ComparisonSummary,
    pub rows: Vec<ComparisonRow>,
    pub significant: Vec<ComparisonRow>,
    pub insights: InsightSet,
}

impl ComparisonResult {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn rows_with_status(&self, status: Status) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(move |r| r.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_name_formats_all_parts() {
        let key = ConfigurationKey::new("iPhone 12", "64GB", "Black", "Unlocked", "A");
        assert_eq!(key.to_string(), "iPhone 12 64GB Black (Unlocked) (DLS A)");
    }

    #[test]
    fn item_name_skips_absent_parts() {
        let key = ConfigurationKey::new("iPhone 13", "", "Blue", "", "B");
        assert_eq!(key.to_string(), "iPhone 13 Blue (DLS B)");
        assert_eq!(ConfigurationKey::default().to_string(), "Unknown Item");
    }

    #[test]
    fn absent_sorts_before_present() {
        let absent = ConfigurationKey::new("iPhone 12", "", "Black", "Unlocked", "A");
        let present = ConfigurationKey::new("iPhone 12", "128GB", "Black", "Unlocked", "A");
        assert!(absent < present);
    }
}
