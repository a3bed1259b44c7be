use crate::aggregate::aggregate_records;
use crate::config::CompareConfig;
use crate::error::ReconError;
use crate::insight::{filter_significant, select_insights};
use crate::model::{ComparisonMeta, ComparisonResult, Snapshot};
use crate::normalize::normalize;
use crate::reconcile::reconcile;
use crate::summary::{compute_summary, snapshot_stats};
use crate::table::RawTable;

/// Run the comparison of two loaded tables. Returns every comparison row,
/// the ranked insights and summary counters.
///
/// OLD is validated before NEW; the first schema error aborts the run.
pub fn run(config: &CompareConfig, old: &RawTable, new: &RawTable) -> Result<ComparisonResult, ReconError> {
    config.validate()?;

    let old_records = normalize(Snapshot::Old, old, &config.columns)?;
    let new_records = normalize(Snapshot::New, new, &config.columns)?;

    let old_aggs = aggregate_records(Snapshot::Old, &old_records.records);
    let new_aggs = aggregate_records(Snapshot::New, &new_records.records);
    log::info!(
        "configurations: {} OLD, {} NEW",
        old_aggs.len(),
        new_aggs.len()
    );

    let rows = reconcile(&old_aggs, &new_aggs);
    let significant = filter_significant(&rows, config.significance_threshold);
    let insights = select_insights(&significant, config.top_n, config.detail_limit);
    let summary = compute_summary(&old_aggs, &new_aggs, &rows, &significant);

    log::info!(
        "{} matching, {} removed, {} new; {} with qty change >= {}",
        summary.matching,
        summary.removed,
        summary.new,
        summary.significant,
        config.significance_threshold
    );
    log::debug!(
        "insights: {} price up, {} price down, {} qty up, {} qty down",
        insights.price_increases.len(),
        insights.price_decreases.len(),
        insights.qty_increases.len(),
        insights.qty_decreases.len()
    );

    Ok(ComparisonResult {
        meta: ComparisonMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            old_source: old.source.clone(),
            new_source: new.source.clone(),
            significance_threshold: config.significance_threshold,
            top_n: config.top_n,
        },
        old_stats: snapshot_stats(&old_records, &old_aggs),
        new_stats: snapshot_stats(&new_records, &new_aggs),
        summary,
        rows,
        significant,
        insights,
    })
}
