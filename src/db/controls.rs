use anyhow::Context;
use rusqlite::types::ToSql;

use super::models::{ControlPatch, ControlRow, NewControl};
use super::{now_timestamp, today, GovernanceDb};

impl GovernanceDb {
    /// Insert a new control. Fails if `control_id` already exists (UNIQUE
    /// constraint). `next_review` defaults to today; `last_tested` starts
    /// null. Returns the generated row id, not the human `control_id`.
    pub fn add_control(&self, new: &NewControl) -> anyhow::Result<i64> {
        let conn = self.connection()?;
        let now = now_timestamp();
        conn.execute(
            "INSERT INTO controls \
             (control_id, control_name, control_description, control_type, \
              implementation_status, effectiveness, owner, next_review, created_date, updated_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                new.control_id,
                new.control_name,
                new.control_description,
                new.control_type,
                new.implementation_status,
                new.effectiveness,
                new.owner,
                today(),
                now,
                now,
            ],
        )
        .context("Failed to insert control")?;
        Ok(conn.last_insert_rowid())
    }

    /// All controls, newest-created first.
    pub fn get_controls(&self) -> anyhow::Result<Vec<ControlRow>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, control_id, control_name, control_description, control_type, \
                 implementation_status, effectiveness, owner, last_tested, next_review, \
                 created_date, updated_date \
                 FROM controls ORDER BY created_date DESC",
            )
            .context("Failed to prepare controls query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ControlRow {
                    id: row.get(0)?,
                    control_id: row.get(1)?,
                    control_name: row.get(2)?,
                    control_description: row.get(3)?,
                    control_type: row.get(4)?,
                    implementation_status: row.get(5)?,
                    effectiveness: row.get(6)?,
                    owner: row.get(7)?,
                    last_tested: row.get(8)?,
                    next_review: row.get(9)?,
                    created_date: row.get(10)?,
                    updated_date: row.get(11)?,
                })
            })
            .context("Failed to query controls")?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    /// Partial update by row id. Renaming `control_id` onto an existing
    /// value fails with the same UNIQUE violation as an insert.
    pub fn update_control(&self, control_db_id: i64, patch: &ControlPatch) -> anyhow::Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref control_id) = patch.control_id {
            sets.push("control_id = ?");
            values.push(Box::new(control_id.clone()));
        }
        if let Some(ref control_name) = patch.control_name {
            sets.push("control_name = ?");
            values.push(Box::new(control_name.clone()));
        }
        if let Some(ref control_description) = patch.control_description {
            sets.push("control_description = ?");
            values.push(Box::new(control_description.clone()));
        }
        if let Some(control_type) = patch.control_type {
            sets.push("control_type = ?");
            values.push(Box::new(control_type));
        }
        if let Some(implementation_status) = patch.implementation_status {
            sets.push("implementation_status = ?");
            values.push(Box::new(implementation_status));
        }
        if let Some(effectiveness) = patch.effectiveness {
            sets.push("effectiveness = ?");
            values.push(Box::new(effectiveness));
        }
        if let Some(ref owner) = patch.owner {
            sets.push("owner = ?");
            values.push(Box::new(owner.clone()));
        }

        sets.push("updated_date = ?");
        values.push(Box::new(now_timestamp()));
        values.push(Box::new(control_db_id));

        let sql = format!("UPDATE controls SET {} WHERE id = ?", sets.join(", "));
        let conn = self.connection()?;
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        conn.execute(&sql, params.as_slice())
            .context("Failed to update control")?;

        Ok(())
    }

    pub fn delete_control(&self, control_db_id: i64) -> anyhow::Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "DELETE FROM controls WHERE id = ?1",
            rusqlite::params![control_db_id],
        )
        .context("Failed to delete control")?;
        Ok(())
    }
}
