use anyhow::Context;
use rusqlite::types::ToSql;

use super::models::{AssetPatch, AssetRow, NewAsset};
use super::{now_timestamp, today, GovernanceDb};

impl GovernanceDb {
    /// Insert a new asset. `last_reviewed` defaults to today; timestamps
    /// are server-generated. Returns the generated id.
    pub fn add_asset(&self, new: &NewAsset) -> anyhow::Result<i64> {
        let conn = self.connection()?;
        let now = now_timestamp();
        conn.execute(
            "INSERT INTO ai_assets \
             (name, type, description, criticality, owner, status, last_reviewed, created_date, updated_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                new.name,
                new.asset_type,
                new.description,
                new.criticality,
                new.owner,
                new.status,
                today(),
                now,
                now,
            ],
        )
        .context("Failed to insert asset")?;
        Ok(conn.last_insert_rowid())
    }

    /// All assets, newest-created first.
    pub fn get_assets(&self) -> anyhow::Result<Vec<AssetRow>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, type, description, criticality, owner, status, \
                 last_reviewed, created_date, updated_date \
                 FROM ai_assets ORDER BY created_date DESC",
            )
            .context("Failed to prepare assets query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(AssetRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    asset_type: row.get(2)?,
                    description: row.get(3)?,
                    criticality: row.get(4)?,
                    owner: row.get(5)?,
                    status: row.get(6)?,
                    last_reviewed: row.get(7)?,
                    created_date: row.get(8)?,
                    updated_date: row.get(9)?,
                })
            })
            .context("Failed to query assets")?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    /// Apply the non-empty fields of `patch` to the asset. An empty patch
    /// is a no-op; an unknown id affects no rows. Both report success.
    pub fn update_asset(&self, asset_id: i64, patch: &AssetPatch) -> anyhow::Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref name) = patch.name {
            sets.push("name = ?");
            values.push(Box::new(name.clone()));
        }
        if let Some(ref asset_type) = patch.asset_type {
            sets.push("type = ?");
            values.push(Box::new(asset_type.clone()));
        }
        if let Some(ref description) = patch.description {
            sets.push("description = ?");
            values.push(Box::new(description.clone()));
        }
        if let Some(criticality) = patch.criticality {
            sets.push("criticality = ?");
            values.push(Box::new(criticality));
        }
        if let Some(ref owner) = patch.owner {
            sets.push("owner = ?");
            values.push(Box::new(owner.clone()));
        }
        if let Some(status) = patch.status {
            sets.push("status = ?");
            values.push(Box::new(status));
        }

        sets.push("updated_date = ?");
        values.push(Box::new(now_timestamp()));
        values.push(Box::new(asset_id));

        let sql = format!("UPDATE ai_assets SET {} WHERE id = ?", sets.join(", "));
        let conn = self.connection()?;
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        conn.execute(&sql, params.as_slice())
            .context("Failed to update asset")?;

        Ok(())
    }

    /// Delete by id. No error if the id does not exist, and no cascade:
    /// risks referencing the asset keep their now-dangling reference.
    pub fn delete_asset(&self, asset_id: i64) -> anyhow::Result<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM ai_assets WHERE id = ?1", rusqlite::params![asset_id])
            .context("Failed to delete asset")?;
        Ok(())
    }
}
