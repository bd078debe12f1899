use anyhow::Context;
use rusqlite::types::ToSql;

use super::models::{AuditPatch, AuditRow, NewAudit};
use super::{now_timestamp, today, GovernanceDb};

impl GovernanceDb {
    /// Insert a new audit. `audit_date` defaults to today;
    /// `next_audit_date` starts null. A `compliance_score` outside 0-100
    /// fails the schema CHECK and inserts nothing.
    pub fn add_audit(&self, new: &NewAudit) -> anyhow::Result<i64> {
        let conn = self.connection()?;
        let now = now_timestamp();
        conn.execute(
            "INSERT INTO audits \
             (audit_title, audit_type, audit_scope, auditor, findings, recommendations, \
              compliance_score, status, audit_date, created_date, updated_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                new.audit_title,
                new.audit_type,
                new.audit_scope,
                new.auditor,
                new.findings,
                new.recommendations,
                new.compliance_score,
                new.status,
                today(),
                now,
                now,
            ],
        )
        .context("Failed to insert audit")?;
        Ok(conn.last_insert_rowid())
    }

    /// All audits, newest-created first.
    pub fn get_audits(&self) -> anyhow::Result<Vec<AuditRow>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, audit_title, audit_type, audit_scope, auditor, audit_date, \
                 findings, recommendations, compliance_score, status, next_audit_date, \
                 created_date, updated_date \
                 FROM audits ORDER BY created_date DESC",
            )
            .context("Failed to prepare audits query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(AuditRow {
                    id: row.get(0)?,
                    audit_title: row.get(1)?,
                    audit_type: row.get(2)?,
                    audit_scope: row.get(3)?,
                    auditor: row.get(4)?,
                    audit_date: row.get(5)?,
                    findings: row.get(6)?,
                    recommendations: row.get(7)?,
                    compliance_score: row.get(8)?,
                    status: row.get(9)?,
                    next_audit_date: row.get(10)?,
                    created_date: row.get(11)?,
                    updated_date: row.get(12)?,
                })
            })
            .context("Failed to query audits")?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    pub fn update_audit(&self, audit_id: i64, patch: &AuditPatch) -> anyhow::Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref audit_title) = patch.audit_title {
            sets.push("audit_title = ?");
            values.push(Box::new(audit_title.clone()));
        }
        if let Some(audit_type) = patch.audit_type {
            sets.push("audit_type = ?");
            values.push(Box::new(audit_type));
        }
        if let Some(ref audit_scope) = patch.audit_scope {
            sets.push("audit_scope = ?");
            values.push(Box::new(audit_scope.clone()));
        }
        if let Some(ref auditor) = patch.auditor {
            sets.push("auditor = ?");
            values.push(Box::new(auditor.clone()));
        }
        if let Some(ref findings) = patch.findings {
            sets.push("findings = ?");
            values.push(Box::new(findings.clone()));
        }
        if let Some(ref recommendations) = patch.recommendations {
            sets.push("recommendations = ?");
            values.push(Box::new(recommendations.clone()));
        }
        if let Some(compliance_score) = patch.compliance_score {
            sets.push("compliance_score = ?");
            values.push(Box::new(compliance_score));
        }
        if let Some(status) = patch.status {
            sets.push("status = ?");
            values.push(Box::new(status));
        }

        sets.push("updated_date = ?");
        values.push(Box::new(now_timestamp()));
        values.push(Box::new(audit_id));

        let sql = format!("UPDATE audits SET {} WHERE id = ?", sets.join(", "));
        let conn = self.connection()?;
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        conn.execute(&sql, params.as_slice())
            .context("Failed to update audit")?;

        Ok(())
    }

    pub fn delete_audit(&self, audit_id: i64) -> anyhow::Result<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM audits WHERE id = ?1", rusqlite::params![audit_id])
            .context("Failed to delete audit")?;
        Ok(())
    }
}
