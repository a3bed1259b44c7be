use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

use stockdiff_io::load_table;
use stockdiff_recon::{run, CompareConfig, ComparisonResult, ReconError, Snapshot, Status};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn compare(old: &Path, new: &Path) -> Result<ComparisonResult, ReconError> {
    let config = CompareConfig::default();
    let old = load_table(old, Snapshot::Old, &config)?;
    let new = load_table(new, Snapshot::New, &config)?;
    run(&config, &old, &new)
}

fn model_capacity(row: &stockdiff_recon::ComparisonRow) -> String {
    format!(
        "{} {}",
        row.key.model.as_deref().unwrap_or(""),
        row.key.capacity.as_deref().unwrap_or("")
    )
}

// -------------------------------------------------------------------------
// CSV
// -------------------------------------------------------------------------

#[test]
fn csv_fixtures_end_to_end() {
    let dir = fixtures_dir();
    let result = compare(&dir.join("old_stock.csv"), &dir.join("new_stock.csv")).unwrap();

    assert!(result.meta.old_source.as_deref().unwrap().ends_with("old_stock.csv"));

    assert_eq!(result.old_stats.rows, 6);
    assert_eq!(result.old_stats.unique_items, 5);
    assert_eq!(result.old_stats.duplicate_items, 1);
    assert_eq!(result.new_stats.rows, 5);

    let s = &result.summary;
    assert_eq!(s.old_configurations, 5);
    assert_eq!(s.new_configurations, 5);
    assert_eq!(s.matching, 4);
    assert_eq!(s.removed, 1);
    assert_eq!(s.new, 1);
    assert_eq!(s.significant, 2);
    assert_eq!(s.total_old_quantity, 830.0);
    assert_eq!(s.total_new_quantity, 820.0);
    assert_eq!(s.net_quantity_change, 10.0);
    assert_eq!(s.average_old_list_price, Some(380.0));
    assert_eq!(s.average_new_list_price, Some(465.0));
    assert_eq!(s.average_list_price_change, Some(85.0));

    // Rows come out in key order
    let order: Vec<String> = result.rows.iter().map(model_capacity).collect();
    assert_eq!(
        order,
        vec![
            "iPhone 11 64GB",
            "iPhone 12 128GB",
            "iPhone 12 64GB",
            "iPhone 13 128GB",
            "iPhone 14 256GB",
            "iPhone 15 128GB",
        ]
    );
    assert_eq!(result.rows[0].status, Status::Removed);
    assert_eq!(result.rows[5].status, Status::New);

    // Duplicate Item # 1003 units both weigh into the iPhone 13 price
    let iphone13 = result.rows[3].old.as_ref().unwrap();
    assert_eq!(iphone13.record_count, 2);
    assert_eq!(iphone13.list_price, Some(490.0));
    assert_eq!(iphone13.offer_price, Some(460.0));

    // Zero OLD stock: price undefined, pct undefined
    let iphone14 = &result.rows[4];
    assert_eq!(iphone14.old.as_ref().unwrap().list_price, None);
    assert_eq!(iphone14.changes.as_ref().unwrap().qty_change_pct, None);

    let insights = &result.insights;
    assert_eq!(insights.price_increases.len(), 1);
    assert_eq!(model_capacity(&insights.price_increases[0]), "iPhone 12 64GB");
    assert_eq!(insights.qty_increases.len(), 1);
    assert_eq!(model_capacity(&insights.qty_increases[0]), "iPhone 12 64GB");
    assert_eq!(insights.price_decreases.len(), 1);
    assert_eq!(model_capacity(&insights.price_decreases[0]), "iPhone 12 128GB");
    assert_eq!(insights.qty_decreases.len(), 1);
    assert_eq!(
        insights.qty_decreases[0].changes.as_ref().unwrap().qty_change_pct,
        Some(-62.5)
    );

    let movers: Vec<String> = insights.largest_movers.iter().map(model_capacity).collect();
    assert_eq!(movers, vec!["iPhone 12 128GB", "iPhone 12 64GB"]);
}

#[test]
fn missing_column_in_new_file() {
    let dir = fixtures_dir();
    let err = compare(&dir.join("old_stock.csv"), &dir.join("new_missing_grade.csv")).unwrap_err();
    assert_eq!(
        err,
        ReconError::MissingField {
            snapshot: Snapshot::New,
            field: "Grade".into()
        }
    );
}

#[test]
fn empty_file_is_rejected() {
    let dir = fixtures_dir();
    let err = compare(&dir.join("empty.csv"), &dir.join("new_stock.csv")).unwrap_err();
    assert_eq!(err, ReconError::EmptyInput { snapshot: Snapshot::Old });
}

#[test]
fn tsv_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.tsv");
    std::fs::write(
        &path,
        "Item #\tModel\tCapacity\tColor\tLock Status\tGrade\tAvailable Quantity\tList Price\n\
         2001\tiPhone 12\t64GB\tBlack\tUnlocked\tA\t200\t350\n",
    )
    .unwrap();

    let table = load_table(&path, Snapshot::New, &CompareConfig::default()).unwrap();
    assert_eq!(table.headers.len(), 8);
    assert_eq!(table.rows.len(), 1);
}

// -------------------------------------------------------------------------
// Excel
// -------------------------------------------------------------------------

fn write_workbook(path: &Path, metadata_rows: u32, header: &[&str], rows: &[(&str, f64, f64, Option<f64>)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for r in 0..metadata_rows {
        sheet.write_string(r, 0, format!("Report line {r}")).unwrap();
    }
    for (c, h) in header.iter().enumerate() {
        sheet.write_string(metadata_rows, c as u16, *h).unwrap();
    }
    for (i, (id, qty, price, offer)) in rows.iter().enumerate() {
        let r = metadata_rows + 1 + i as u32;
        sheet.write_string(r, 0, *id).unwrap();
        sheet.write_string(r, 1, "iPhone 12").unwrap();
        sheet.write_string(r, 2, "64GB").unwrap();
        sheet.write_string(r, 3, "Black").unwrap();
        sheet.write_string(r, 4, "Unlocked").unwrap();
        sheet.write_string(r, 5, "A").unwrap();
        sheet.write_number(r, 6, *qty).unwrap();
        sheet.write_number(r, 7, *price).unwrap();
        if let Some(offer) = offer {
            sheet.write_number(r, 8, *offer).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

const HEADER: [&str; 9] = [
    "Item #",
    "Model",
    "Capacity",
    "Color",
    "Lock Status",
    "Grade",
    "Available Quantity",
    "List Price",
    "New Offer Price",
];

#[test]
fn xlsx_single_configuration_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let old_path = dir.path().join("old.xlsx");
    let new_path = dir.path().join("new.xlsx");
    write_workbook(&old_path, 3, &HEADER, &[("1001", 50.0, 300.0, Some(280.0))]);
    write_workbook(&new_path, 0, &HEADER[..8], &[("2001", 200.0, 350.0, None)]);

    let result = compare(&old_path, &new_path).unwrap();
    assert_eq!(result.rows.len(), 1);

    let row = &result.rows[0];
    assert_eq!(row.status, Status::Matching);
    assert_eq!(row.key.to_string(), "iPhone 12 64GB Black (Unlocked) (DLS A)");

    let c = row.changes.as_ref().unwrap();
    assert_eq!(c.qty_change, 150.0);
    assert_eq!(c.qty_change_pct, Some(300.0));
    assert_eq!(c.list_price_change, Some(50.0));
    assert!((c.list_price_change_pct.unwrap() - 16.666_666).abs() < 1e-4);
    assert_eq!(c.offer_to_list_change, Some(70.0));
    assert_eq!(c.offer_to_list_change_pct, Some(25.0));

    assert_eq!(result.insights.price_increases.len(), 1);
    assert_eq!(result.insights.qty_increases.len(), 1);
}

#[test]
fn xlsx_numeric_item_ids_match_text_form() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ids.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, h) in HEADER[..8].iter().enumerate() {
        sheet.write_string(0, c as u16, *h).unwrap();
    }
    sheet.write_number(1, 0, 1001.0).unwrap();
    sheet.write_number(2, 0, 1001.0).unwrap();
    workbook.save(&path).unwrap();

    let config = CompareConfig::default();
    let table = load_table(&path, Snapshot::New, &config).unwrap();
    let result = run(&config, &table, &table).unwrap();
    assert_eq!(result.new_stats.unique_items, 1);
    assert_eq!(result.new_stats.duplicate_items, 1);
}
