//! Bulk export/import between the store and an Excel workbook.
//!
//! The workbook carries one sheet per entity table. Export writes each
//! table's `get_*` projection verbatim, so the Risks sheet ends with the
//! joined `asset_name` column; import drops that column again because it
//! is not a native column. Import is destructive: it replaces the entire
//! store contents with whatever sheets the workbook provides.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use rusqlite::types::Value;
use rusqlite::Transaction;
use rust_xlsxwriter::Workbook;

use crate::db::models::{AssetRow, AuditRow, ControlRow, IncidentRow, RiskRow};
use crate::db::GovernanceDb;

/// Sheet name → backing table, in export order.
const SHEETS: &[(&str, &str)] = &[
    ("Assets", "ai_assets"),
    ("Risks", "risks"),
    ("Controls", "controls"),
    ("Incidents", "incidents"),
    ("Audits", "audits"),
];

const ASSET_COLUMNS: &[&str] = &[
    "id", "name", "type", "description", "criticality", "owner", "status", "last_reviewed",
    "created_date", "updated_date",
];

const RISK_COLUMNS: &[&str] = &[
    "id", "asset_id", "risk_title", "risk_description", "risk_category", "likelihood", "impact",
    "risk_level", "mitigation_strategy", "owner", "status", "review_date", "created_date",
    "updated_date", "asset_name",
];

const CONTROL_COLUMNS: &[&str] = &[
    "id", "control_id", "control_name", "control_description", "control_type",
    "implementation_status", "effectiveness", "owner", "last_tested", "next_review",
    "created_date", "updated_date",
];

const INCIDENT_COLUMNS: &[&str] = &[
    "id", "incident_title", "incident_description", "severity", "affected_assets", "root_cause",
    "corrective_actions", "status", "reported_by", "assigned_to", "incident_date",
    "resolution_date", "created_date", "updated_date",
];

const AUDIT_COLUMNS: &[&str] = &[
    "id", "audit_title", "audit_type", "audit_scope", "auditor", "audit_date", "findings",
    "recommendations", "compliance_score", "status", "next_audit_date", "created_date",
    "updated_date",
];

enum CellValue {
    Text(String),
    Number(f64),
    Blank,
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn opt_display<T: fmt::Display>(v: &Option<T>) -> CellValue {
    match v {
        Some(x) => CellValue::Text(x.to_string()),
        None => CellValue::Blank,
    }
}

fn opt_number(v: &Option<i64>) -> CellValue {
    match v {
        Some(n) => CellValue::Number(*n as f64),
        None => CellValue::Blank,
    }
}

fn asset_cells(a: &AssetRow) -> Vec<CellValue> {
    vec![
        CellValue::Number(a.id as f64),
        text(&a.name),
        text(&a.asset_type),
        opt_display(&a.description),
        opt_display(&a.criticality),
        opt_display(&a.owner),
        opt_display(&a.status),
        opt_display(&a.last_reviewed),
        text(&a.created_date),
        text(&a.updated_date),
    ]
}

fn risk_cells(r: &RiskRow) -> Vec<CellValue> {
    vec![
        CellValue::Number(r.id as f64),
        opt_number(&r.asset_id),
        text(&r.risk_title),
        opt_display(&r.risk_description),
        opt_display(&r.risk_category),
        opt_display(&r.likelihood),
        opt_display(&r.impact),
        opt_display(&r.risk_level),
        opt_display(&r.mitigation_strategy),
        opt_display(&r.owner),
        opt_display(&r.status),
        opt_display(&r.review_date),
        text(&r.created_date),
        text(&r.updated_date),
        opt_display(&r.asset_name),
    ]
}

fn control_cells(c: &ControlRow) -> Vec<CellValue> {
    vec![
        CellValue::Number(c.id as f64),
        text(&c.control_id),
        text(&c.control_name),
        opt_display(&c.control_description),
        opt_display(&c.control_type),
        opt_display(&c.implementation_status),
        opt_display(&c.effectiveness),
        opt_display(&c.owner),
        opt_display(&c.last_tested),
        opt_display(&c.next_review),
        text(&c.created_date),
        text(&c.updated_date),
    ]
}

fn incident_cells(i: &IncidentRow) -> Vec<CellValue> {
    vec![
        CellValue::Number(i.id as f64),
        text(&i.incident_title),
        opt_display(&i.incident_description),
        opt_display(&i.severity),
        opt_display(&i.affected_assets),
        opt_display(&i.root_cause),
        opt_display(&i.corrective_actions),
        opt_display(&i.status),
        opt_display(&i.reported_by),
        opt_display(&i.assigned_to),
        opt_display(&i.incident_date),
        opt_display(&i.resolution_date),
        text(&i.created_date),
        text(&i.updated_date),
    ]
}

fn audit_cells(a: &AuditRow) -> Vec<CellValue> {
    vec![
        CellValue::Number(a.id as f64),
        text(&a.audit_title),
        opt_display(&a.audit_type),
        opt_display(&a.audit_scope),
        opt_display(&a.auditor),
        opt_display(&a.audit_date),
        opt_display(&a.findings),
        opt_display(&a.recommendations),
        opt_number(&a.compliance_score),
        opt_display(&a.status),
        opt_display(&a.next_audit_date),
        text(&a.created_date),
        text(&a.updated_date),
    ]
}

fn write_sheet(
    workbook: &mut Workbook,
    name: &str,
    headers: &[&str],
    rows: Vec<Vec<CellValue>>,
) -> anyhow::Result<()> {
    let sheet = workbook
        .add_worksheet()
        .set_name(name)
        .with_context(|| format!("Failed to create sheet {name}"))?;

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            match cell {
                CellValue::Text(s) => {
                    sheet.write_string((row_idx + 1) as u32, col as u16, s)?;
                }
                CellValue::Number(n) => {
                    sheet.write_number((row_idx + 1) as u32, col as u16, *n)?;
                }
                CellValue::Blank => {}
            }
        }
    }
    Ok(())
}

impl GovernanceDb {
    /// Write every table to `path` as an Excel workbook, one sheet per
    /// entity, headers equal to the native column names.
    pub fn export_workbook(&self, path: &Path) -> anyhow::Result<()> {
        let mut workbook = Workbook::new();

        write_sheet(
            &mut workbook,
            "Assets",
            ASSET_COLUMNS,
            self.get_assets()?.iter().map(asset_cells).collect(),
        )?;
        write_sheet(
            &mut workbook,
            "Risks",
            RISK_COLUMNS,
            self.get_risks()?.iter().map(risk_cells).collect(),
        )?;
        write_sheet(
            &mut workbook,
            "Controls",
            CONTROL_COLUMNS,
            self.get_controls()?.iter().map(control_cells).collect(),
        )?;
        write_sheet(
            &mut workbook,
            "Incidents",
            INCIDENT_COLUMNS,
            self.get_incidents()?.iter().map(incident_cells).collect(),
        )?;
        write_sheet(
            &mut workbook,
            "Audits",
            AUDIT_COLUMNS,
            self.get_audits()?.iter().map(audit_cells).collect(),
        )?;

        workbook
            .save(path)
            .with_context(|| format!("Failed to save workbook to {path:?}"))?;

        log::info!("Exported governance records to {:?}", path);
        Ok(())
    }

    /// Replace the entire store contents with the workbook at `path`.
    ///
    /// All five tables are cleared, then every sheet present in the
    /// workbook is loaded back into its table; absent sheets leave their
    /// table empty. The whole operation runs in one transaction, so a
    /// failure (unreadable file, unknown column, constraint violation)
    /// rolls back to the pre-import state.
    pub fn import_workbook(&self, path: &Path) -> anyhow::Result<()> {
        let mut workbook: Xlsx<_> =
            open_workbook(path).with_context(|| format!("Failed to open workbook {path:?}"))?;
        let sheet_names = workbook.sheet_names().to_owned();

        let mut conn = self.connection()?;
        let tx = conn
            .transaction()
            .context("Failed to begin import transaction")?;

        for (_, table) in SHEETS {
            tx.execute(&format!("DELETE FROM {table}"), [])
                .with_context(|| format!("Failed to clear table {table}"))?;
        }

        for (sheet, table) in SHEETS {
            if !sheet_names.iter().any(|n| n == sheet) {
                continue;
            }
            let range = workbook
                .worksheet_range(sheet)
                .with_context(|| format!("Failed to read sheet {sheet}"))?;
            // asset_name on the Risks sheet is an export-only join artifact.
            let dropped: &[&str] = if *sheet == "Risks" { &["asset_name"] } else { &[] };
            load_sheet(&tx, table, &range, dropped)?;
        }

        tx.commit().context("Failed to commit import")?;

        log::info!("Imported governance records from {:?}", path);
        Ok(())
    }
}

fn load_sheet(
    tx: &Transaction<'_>,
    table: &str,
    range: &Range<Data>,
    dropped: &[&str],
) -> anyhow::Result<()> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(());
    };

    // Keep (sheet column index, column name) for every usable header.
    // Unrecognized names are passed through; the INSERT rejects them if
    // they don't match the table schema.
    let mut columns: Vec<(usize, String)> = Vec::new();
    for (idx, cell) in header_row.iter().enumerate() {
        let name = match cell {
            Data::String(s) => s.trim().to_string(),
            Data::Empty => continue,
            other => other.to_string(),
        };
        if name.is_empty() || dropped.iter().any(|d| d.eq_ignore_ascii_case(&name)) {
            continue;
        }
        columns.push((idx, name));
    }
    if columns.is_empty() {
        return Ok(());
    }

    let col_list = columns
        .iter()
        .map(|(_, name)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("INSERT INTO {table} ({col_list}) VALUES ({placeholders})");
    let mut stmt = tx
        .prepare(&sql)
        .with_context(|| format!("Failed to prepare insert for {table}"))?;

    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let values: Vec<Value> = columns
            .iter()
            .map(|(idx, _)| cell_to_value(row.get(*idx).unwrap_or(&Data::Empty)))
            .collect();
        stmt.execute(rusqlite::params_from_iter(values))
            .with_context(|| format!("Failed to insert row into {table}"))?;
    }

    Ok(())
}

/// Map a workbook cell onto a SQLite value. Whole floats become integers
/// so id columns survive the float representation Excel gives numbers.
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Value::Integer(*f as i64),
        Data::Float(f) => Value::Real(*f),
        Data::Bool(b) => Value::Integer(*b as i64),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) if ndt.time() == chrono::NaiveTime::MIN => {
                Value::Text(ndt.format("%Y-%m-%d").to_string())
            }
            Some(ndt) => Value::Text(ndt.format("%Y-%m-%d %H:%M:%S%.6f").to_string()),
            None => Value::Null,
        },
        Data::DateTimeIso(s) => Value::Text(s.clone()),
        Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_collapse_to_integers() {
        assert_eq!(cell_to_value(&Data::Float(3.0)), Value::Integer(3));
        assert_eq!(cell_to_value(&Data::Float(3.5)), Value::Real(3.5));
        assert_eq!(cell_to_value(&Data::Int(7)), Value::Integer(7));
    }

    #[test]
    fn empty_and_error_cells_are_null() {
        assert_eq!(cell_to_value(&Data::Empty), Value::Null);
        assert_eq!(
            cell_to_value(&Data::Error(calamine::CellErrorType::NA)),
            Value::Null
        );
    }

    #[test]
    fn strings_pass_through() {
        assert_eq!(
            cell_to_value(&Data::String("Under Review".into())),
            Value::Text("Under Review".into())
        );
    }
}
