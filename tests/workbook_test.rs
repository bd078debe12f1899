//! Integration tests for workbook export/import round-tripping.
//!
//! These exercise the full path: seed a store, write the .xlsx, read it
//! back, and compare table contents. Import is destructive by contract,
//! so several tests check exactly what survives.

use govledger::models::*;
use govledger::{sample, GovernanceDb};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn fresh_db(dir: &TempDir, name: &str) -> GovernanceDb {
    GovernanceDb::open(dir.path().join(name)).unwrap()
}

#[test]
fn export_then_import_reproduces_every_table() {
    let dir = tempfile::tempdir().unwrap();
    let db = fresh_db(&dir, "source.db");
    sample::seed_example_data(&db).unwrap();

    let assets_before = db.get_assets().unwrap();
    let risks_before = db.get_risks().unwrap();
    let controls_before = db.get_controls().unwrap();
    let incidents_before = db.get_incidents().unwrap();
    let audits_before = db.get_audits().unwrap();

    let xlsx = dir.path().join("export.xlsx");
    db.export_workbook(&xlsx).unwrap();
    db.import_workbook(&xlsx).unwrap();

    // Ids survive the trip, so the joined asset_name resolves identically.
    assert_eq!(db.get_assets().unwrap(), assets_before);
    assert_eq!(db.get_risks().unwrap(), risks_before);
    assert_eq!(db.get_controls().unwrap(), controls_before);
    assert_eq!(db.get_incidents().unwrap(), incidents_before);
    assert_eq!(db.get_audits().unwrap(), audits_before);
}

#[test]
fn import_into_separate_store_copies_everything() {
    let dir = tempfile::tempdir().unwrap();
    let source = fresh_db(&dir, "source.db");
    sample::seed_example_data(&source).unwrap();

    let xlsx = dir.path().join("transfer.xlsx");
    source.export_workbook(&xlsx).unwrap();

    let target = fresh_db(&dir, "target.db");
    target.import_workbook(&xlsx).unwrap();

    assert_eq!(target.get_assets().unwrap(), source.get_assets().unwrap());
    assert_eq!(target.get_risks().unwrap(), source.get_risks().unwrap());
    assert_eq!(
        target.dashboard_stats().unwrap(),
        source.dashboard_stats().unwrap()
    );
}

#[test]
fn import_replaces_preexisting_rows() {
    let dir = tempfile::tempdir().unwrap();
    let source = fresh_db(&dir, "source.db");
    source
        .add_asset(&NewAsset {
            name: "Imported Asset".into(),
            asset_type: "AI System".into(),
            ..Default::default()
        })
        .unwrap();

    let xlsx = dir.path().join("replace.xlsx");
    source.export_workbook(&xlsx).unwrap();

    let target = fresh_db(&dir, "target.db");
    target
        .add_asset(&NewAsset {
            name: "Doomed Local Asset".into(),
            asset_type: "Dataset".into(),
            ..Default::default()
        })
        .unwrap();
    target
        .add_incident(&NewIncident {
            incident_title: "Doomed Local Incident".into(),
            ..Default::default()
        })
        .unwrap();

    target.import_workbook(&xlsx).unwrap();

    let assets = target.get_assets().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].name, "Imported Asset");
    // The Incidents sheet was present but empty, and local rows are gone.
    assert!(target.get_incidents().unwrap().is_empty());
}

#[test]
fn absent_sheets_leave_tables_empty() {
    let dir = tempfile::tempdir().unwrap();

    // A workbook carrying only an Assets sheet.
    let xlsx = dir.path().join("assets_only.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("Assets").unwrap();
    for (col, header) in ["name", "type", "criticality", "status"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    sheet.write_string(1, 0, "Hand-made Asset").unwrap();
    sheet.write_string(1, 1, "ML Model").unwrap();
    sheet.write_string(1, 2, "High").unwrap();
    sheet.write_string(1, 3, "Active").unwrap();
    workbook.save(&xlsx).unwrap();

    let db = fresh_db(&dir, "partial.db");
    sample::seed_example_data(&db).unwrap();
    db.import_workbook(&xlsx).unwrap();

    let assets = db.get_assets().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].name, "Hand-made Asset");
    assert_eq!(assets[0].criticality, Some(Criticality::High));
    // id was not in the sheet: the store assigned one.
    assert!(assets[0].id >= 1);

    assert!(db.get_risks().unwrap().is_empty());
    assert!(db.get_controls().unwrap().is_empty());
    assert!(db.get_incidents().unwrap().is_empty());
    assert!(db.get_audits().unwrap().is_empty());
}

#[test]
fn failed_import_rolls_back_to_previous_contents() {
    let dir = tempfile::tempdir().unwrap();

    // "Urgent" violates the criticality CHECK constraint.
    let xlsx = dir.path().join("bad.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("Assets").unwrap();
    sheet.write_string(0, 0, "name").unwrap();
    sheet.write_string(0, 1, "type").unwrap();
    sheet.write_string(0, 2, "criticality").unwrap();
    sheet.write_string(1, 0, "Bad Asset").unwrap();
    sheet.write_string(1, 1, "ML Model").unwrap();
    sheet.write_string(1, 2, "Urgent").unwrap();
    workbook.save(&xlsx).unwrap();

    let db = fresh_db(&dir, "rollback.db");
    sample::seed_example_data(&db).unwrap();
    let before = db.dashboard_stats().unwrap();

    assert!(db.import_workbook(&xlsx).is_err());
    assert_eq!(db.dashboard_stats().unwrap(), before);
}

#[test]
fn unknown_column_fails_the_import() {
    let dir = tempfile::tempdir().unwrap();

    let xlsx = dir.path().join("unknown_col.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("Controls").unwrap();
    sheet.write_string(0, 0, "control_id").unwrap();
    sheet.write_string(0, 1, "control_name").unwrap();
    sheet.write_string(0, 2, "no_such_column").unwrap();
    sheet.write_string(1, 0, "X-1").unwrap();
    sheet.write_string(1, 1, "Mystery").unwrap();
    sheet.write_string(1, 2, "value").unwrap();
    workbook.save(&xlsx).unwrap();

    let db = fresh_db(&dir, "unknown.db");
    assert!(db.import_workbook(&xlsx).is_err());
}

#[test]
fn missing_file_reports_failure_and_leaves_store_intact() {
    let dir = tempfile::tempdir().unwrap();
    let db = fresh_db(&dir, "intact.db");
    sample::seed_example_data(&db).unwrap();
    let before = db.dashboard_stats().unwrap();

    let missing = dir.path().join("nope.xlsx");
    assert!(db.import_workbook(&missing).is_err());
    assert_eq!(db.dashboard_stats().unwrap(), before);
}

#[test]
fn empty_store_round_trips_to_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let db = fresh_db(&dir, "empty.db");

    let xlsx = dir.path().join("empty.xlsx");
    db.export_workbook(&xlsx).unwrap();
    db.import_workbook(&xlsx).unwrap();

    assert!(db.get_assets().unwrap().is_empty());
    assert!(db.get_risks().unwrap().is_empty());
    assert_eq!(db.dashboard_stats().unwrap().total_assets, 0);
}

#[test]
fn dangling_asset_reference_survives_the_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db = fresh_db(&dir, "dangling.db");

    let asset_id = db
        .add_asset(&NewAsset {
            name: "Short-lived".into(),
            asset_type: "AI Service".into(),
            ..Default::default()
        })
        .unwrap();
    db.add_risk(&NewRisk {
        asset_id: Some(asset_id),
        risk_title: "Orphaned".into(),
        ..Default::default()
    })
    .unwrap();
    db.delete_asset(asset_id).unwrap();

    let xlsx = dir.path().join("dangling.xlsx");
    db.export_workbook(&xlsx).unwrap();
    db.import_workbook(&xlsx).unwrap();

    let risks = db.get_risks().unwrap();
    assert_eq!(risks.len(), 1);
    assert_eq!(risks[0].asset_id, Some(asset_id));
    assert_eq!(risks[0].asset_name, None);
}
