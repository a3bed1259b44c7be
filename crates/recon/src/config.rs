use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Comparison settings. Every field has a default, so an empty TOML document
/// yields the stock behavior.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    /// First-cell text that marks the header row.
    pub header_marker: String,
    /// How many leading rows are searched for `header_marker`.
    pub header_scan_rows: usize,
    /// Minimum absolute quantity change for a matching row to be significant.
    pub significance_threshold: f64,
    /// Length of each ranked insight view.
    pub top_n: usize,
    /// Length of the largest-movers view.
    pub detail_limit: usize,
    pub columns: ColumnMapping,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            header_marker: "Item #".into(),
            header_scan_rows: 20,
            significance_threshold: 100.0,
            top_n: 10,
            detail_limit: 50,
            columns: ColumnMapping::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMapping {
    pub item_id: String,
    pub model: String,
    pub capacity: String,
    pub color: String,
    pub lock_status: String,
    pub grade: String,
    pub quantity: String,
    pub list_price: String,
    /// Read from the OLD snapshot only; optional in the header.
    pub offer_price: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            item_id: "Item #".into(),
            model: "Model".into(),
            capacity: "Capacity".into(),
            color: "Color".into(),
            lock_status: "Lock Status".into(),
            grade: "Grade".into(),
            quantity: "Available Quantity".into(),
            list_price: "List Price".into(),
            offer_price: "New Offer Price".into(),
        }
    }
}

impl ColumnMapping {
    /// Columns every snapshot must carry, in validation order.
    pub fn required(&self) -> [&str; 8] {
        [
            self.item_id.as_str(),
            self.model.as_str(),
            self.capacity.as_str(),
            self.color.as_str(),
            self.lock_status.as_str(),
            self.grade.as_str(),
            self.quantity.as_str(),
            self.list_price.as_str(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CompareConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.header_marker.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "header_marker must not be empty".into(),
            ));
        }

        if self.header_scan_rows == 0 {
            return Err(ReconError::ConfigValidation(
                "header_scan_rows must be at least 1".into(),
            ));
        }

        if !self.significance_threshold.is_finite() || self.significance_threshold < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "significance_threshold must be a non-negative number, got {}",
                self.significance_threshold
            )));
        }

        if self.top_n == 0 {
            return Err(ReconError::ConfigValidation(
                "top_n must be at least 1".into(),
            ));
        }

        let mut seen = HashSet::new();
        let all = self
            .columns
            .required()
            .into_iter()
            .chain(std::iter::once(self.columns.offer_price.as_str()));
        for name in all {
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "column names must not be empty".into(),
                ));
            }
            if !seen.insert(name) {
                return Err(ReconError::ConfigValidation(format!(
                    "column '{name}' is mapped more than once"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
