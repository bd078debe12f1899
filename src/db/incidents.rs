use anyhow::Context;
use rusqlite::types::ToSql;

use super::models::{IncidentPatch, IncidentRow, NewIncident};
use super::{now_timestamp, today, GovernanceDb};

impl GovernanceDb {
    /// Insert a new incident. `incident_date` defaults to today;
    /// `resolution_date` starts null.
    pub fn add_incident(&self, new: &NewIncident) -> anyhow::Result<i64> {
        let conn = self.connection()?;
        let now = now_timestamp();
        conn.execute(
            "INSERT INTO incidents \
             (incident_title, incident_description, severity, affected_assets, root_cause, \
              corrective_actions, status, reported_by, assigned_to, incident_date, created_date, updated_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                new.incident_title,
                new.incident_description,
                new.severity,
                new.affected_assets,
                new.root_cause,
                new.corrective_actions,
                new.status,
                new.reported_by,
                new.assigned_to,
                today(),
                now,
                now,
            ],
        )
        .context("Failed to insert incident")?;
        Ok(conn.last_insert_rowid())
    }

    /// All incidents, newest-created first.
    pub fn get_incidents(&self) -> anyhow::Result<Vec<IncidentRow>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, incident_title, incident_description, severity, affected_assets, \
                 root_cause, corrective_actions, status, reported_by, assigned_to, \
                 incident_date, resolution_date, created_date, updated_date \
                 FROM incidents ORDER BY created_date DESC",
            )
            .context("Failed to prepare incidents query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(IncidentRow {
                    id: row.get(0)?,
                    incident_title: row.get(1)?,
                    incident_description: row.get(2)?,
                    severity: row.get(3)?,
                    affected_assets: row.get(4)?,
                    root_cause: row.get(5)?,
                    corrective_actions: row.get(6)?,
                    status: row.get(7)?,
                    reported_by: row.get(8)?,
                    assigned_to: row.get(9)?,
                    incident_date: row.get(10)?,
                    resolution_date: row.get(11)?,
                    created_date: row.get(12)?,
                    updated_date: row.get(13)?,
                })
            })
            .context("Failed to query incidents")?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    pub fn update_incident(&self, incident_id: i64, patch: &IncidentPatch) -> anyhow::Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref incident_title) = patch.incident_title {
            sets.push("incident_title = ?");
            values.push(Box::new(incident_title.clone()));
        }
        if let Some(ref incident_description) = patch.incident_description {
            sets.push("incident_description = ?");
            values.push(Box::new(incident_description.clone()));
        }
        if let Some(severity) = patch.severity {
            sets.push("severity = ?");
            values.push(Box::new(severity));
        }
        if let Some(ref affected_assets) = patch.affected_assets {
            sets.push("affected_assets = ?");
            values.push(Box::new(affected_assets.clone()));
        }
        if let Some(ref root_cause) = patch.root_cause {
            sets.push("root_cause = ?");
            values.push(Box::new(root_cause.clone()));
        }
        if let Some(ref corrective_actions) = patch.corrective_actions {
            sets.push("corrective_actions = ?");
            values.push(Box::new(corrective_actions.clone()));
        }
        if let Some(status) = patch.status {
            sets.push("status = ?");
            values.push(Box::new(status));
        }
        if let Some(ref reported_by) = patch.reported_by {
            sets.push("reported_by = ?");
            values.push(Box::new(reported_by.clone()));
        }
        if let Some(ref assigned_to) = patch.assigned_to {
            sets.push("assigned_to = ?");
            values.push(Box::new(assigned_to.clone()));
        }

        sets.push("updated_date = ?");
        values.push(Box::new(now_timestamp()));
        values.push(Box::new(incident_id));

        let sql = format!("UPDATE incidents SET {} WHERE id = ?", sets.join(", "));
        let conn = self.connection()?;
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        conn.execute(&sql, params.as_slice())
            .context("Failed to update incident")?;

        Ok(())
    }

    pub fn delete_incident(&self, incident_id: i64) -> anyhow::Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "DELETE FROM incidents WHERE id = ?1",
            rusqlite::params![incident_id],
        )
        .context("Failed to delete incident")?;
        Ok(())
    }
}
