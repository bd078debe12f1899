use anyhow::Context;
use rusqlite::types::ToSql;

use super::models::{NewRisk, RiskPatch, RiskRow};
use super::{now_timestamp, today, GovernanceDb};

impl GovernanceDb {
    /// Insert a new risk. The asset reference is stored as given, with no
    /// existence check: a stale id is permitted and simply won't resolve
    /// in the join. `review_date` defaults to today.
    pub fn add_risk(&self, new: &NewRisk) -> anyhow::Result<i64> {
        let conn = self.connection()?;
        let now = now_timestamp();
        conn.execute(
            "INSERT INTO risks \
             (asset_id, risk_title, risk_description, risk_category, likelihood, impact, \
              risk_level, mitigation_strategy, owner, status, review_date, created_date, updated_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            rusqlite::params![
                new.asset_id,
                new.risk_title,
                new.risk_description,
                new.risk_category,
                new.likelihood,
                new.impact,
                new.risk_level,
                new.mitigation_strategy,
                new.owner,
                new.status,
                today(),
                now,
                now,
            ],
        )
        .context("Failed to insert risk")?;
        Ok(conn.last_insert_rowid())
    }

    /// All risks, newest-created first, left-joined to assets so each row
    /// carries the asset display name (`None` when unlinked or dangling).
    pub fn get_risks(&self) -> anyhow::Result<Vec<RiskRow>> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT r.id, r.asset_id, r.risk_title, r.risk_description, r.risk_category, \
                 r.likelihood, r.impact, r.risk_level, r.mitigation_strategy, r.owner, \
                 r.status, r.review_date, r.created_date, r.updated_date, a.name AS asset_name \
                 FROM risks r \
                 LEFT JOIN ai_assets a ON r.asset_id = a.id \
                 ORDER BY r.created_date DESC",
            )
            .context("Failed to prepare risks query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RiskRow {
                    id: row.get(0)?,
                    asset_id: row.get(1)?,
                    risk_title: row.get(2)?,
                    risk_description: row.get(3)?,
                    risk_category: row.get(4)?,
                    likelihood: row.get(5)?,
                    impact: row.get(6)?,
                    risk_level: row.get(7)?,
                    mitigation_strategy: row.get(8)?,
                    owner: row.get(9)?,
                    status: row.get(10)?,
                    review_date: row.get(11)?,
                    created_date: row.get(12)?,
                    updated_date: row.get(13)?,
                    asset_name: row.get(14)?,
                })
            })
            .context("Failed to query risks")?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    pub fn update_risk(&self, risk_id: i64, patch: &RiskPatch) -> anyhow::Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(asset_id) = patch.asset_id {
            sets.push("asset_id = ?");
            values.push(Box::new(asset_id));
        }
        if let Some(ref risk_title) = patch.risk_title {
            sets.push("risk_title = ?");
            values.push(Box::new(risk_title.clone()));
        }
        if let Some(ref risk_description) = patch.risk_description {
            sets.push("risk_description = ?");
            values.push(Box::new(risk_description.clone()));
        }
        if let Some(ref risk_category) = patch.risk_category {
            sets.push("risk_category = ?");
            values.push(Box::new(risk_category.clone()));
        }
        if let Some(likelihood) = patch.likelihood {
            sets.push("likelihood = ?");
            values.push(Box::new(likelihood));
        }
        if let Some(impact) = patch.impact {
            sets.push("impact = ?");
            values.push(Box::new(impact));
        }
        if let Some(risk_level) = patch.risk_level {
            sets.push("risk_level = ?");
            values.push(Box::new(risk_level));
        }
        if let Some(ref mitigation_strategy) = patch.mitigation_strategy {
            sets.push("mitigation_strategy = ?");
            values.push(Box::new(mitigation_strategy.clone()));
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
        values.push(Box::new(risk_id));

        let sql = format!("UPDATE risks SET {} WHERE id = ?", sets.join(", "));
        let conn = self.connection()?;
        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        conn.execute(&sql, params.as_slice())
            .context("Failed to update risk")?;

        Ok(())
    }

    pub fn delete_risk(&self, risk_id: i64) -> anyhow::Result<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM risks WHERE id = ?1", rusqlite::params![risk_id])
            .context("Failed to delete risk")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::models::*;
    use super::super::test_db;

    #[test]
    fn add_then_get_exposes_joined_asset_name() {
        let (_dir, db) = test_db();
        let asset_id = db
            .add_asset(&NewAsset {
                name: "MolGen Platform".into(),
                asset_type: "AI System".into(),
                ..Default::default()
            })
            .unwrap();

        let risk_id = db
            .add_risk(&NewRisk {
                asset_id: Some(asset_id),
                risk_title: "IP Exposure".into(),
                likelihood: Likelihood::Low,
                impact: Impact::VeryHigh,
                risk_level: RiskLevel::Critical,
                ..Default::default()
            })
            .unwrap();

        let risks = db.get_risks().unwrap();
        assert_eq!(risks.len(), 1);
        let row = &risks[0];
        assert_eq!(row.id, risk_id);
        assert_eq!(row.asset_id, Some(asset_id));
        assert_eq!(row.asset_name.as_deref(), Some("MolGen Platform"));
        assert_eq!(row.risk_level, Some(RiskLevel::Critical));
    }

    #[test]
    fn unlinked_risk_has_no_asset_name() {
        let (_dir, db) = test_db();
        db.add_risk(&NewRisk {
            asset_id: None,
            risk_title: "Model Interpretability".into(),
            ..Default::default()
        })
        .unwrap();

        let risks = db.get_risks().unwrap();
        assert_eq!(risks[0].asset_id, None);
        assert_eq!(risks[0].asset_name, None);
    }

    #[test]
    fn deleting_asset_leaves_dangling_reference() {
        let (_dir, db) = test_db();
        let asset_id = db
            .add_asset(&NewAsset {
                name: "Doomed".into(),
                asset_type: "AI Service".into(),
                ..Default::default()
            })
            .unwrap();
        db.add_risk(&NewRisk {
            asset_id: Some(asset_id),
            risk_title: "Orphan-to-be".into(),
            ..Default::default()
        })
        .unwrap();

        db.delete_asset(asset_id).unwrap();

        let risks = db.get_risks().unwrap();
        assert_eq!(risks.len(), 1, "no cascade: risk row survives");
        assert_eq!(risks[0].asset_id, Some(asset_id), "reference dangles");
        assert_eq!(risks[0].asset_name, None, "join no longer resolves");
    }

    #[test]
    fn insert_does_not_check_asset_existence() {
        let (_dir, db) = test_db();
        db.add_risk(&NewRisk {
            asset_id: Some(424242),
            risk_title: "Pre-dangled".into(),
            ..Default::default()
        })
        .unwrap();

        let risks = db.get_risks().unwrap();
        assert_eq!(risks[0].asset_id, Some(424242));
        assert_eq!(risks[0].asset_name, None);
    }

    #[test]
    fn patch_can_clear_the_asset_link() {
        let (_dir, db) = test_db();
        let asset_id = db
            .add_asset(&NewAsset {
                name: "Linked".into(),
                asset_type: "Dataset".into(),
                ..Default::default()
            })
            .unwrap();
        let risk_id = db
            .add_risk(&NewRisk {
                asset_id: Some(asset_id),
                risk_title: "Link test".into(),
                ..Default::default()
            })
            .unwrap();

        db.update_risk(
            risk_id,
            &RiskPatch {
                asset_id: Some(None),
                ..Default::default()
            },
        )
        .unwrap();

        let risks = db.get_risks().unwrap();
        assert_eq!(risks[0].asset_id, None);
        assert_eq!(risks[0].asset_name, None);
    }

    #[test]
    fn update_status_bumps_timestamp() {
        let (_dir, db) = test_db();
        let risk_id = db
            .add_risk(&NewRisk {
                risk_title: "Drift".into(),
                ..Default::default()
            })
            .unwrap();
        let before = db.get_risks().unwrap().remove(0);

        std::thread::sleep(std::time::Duration::from_millis(2));
        db.update_risk(
            risk_id,
            &RiskPatch {
                status: Some(RiskStatus::Mitigated),
                ..Default::default()
            },
        )
        .unwrap();

        let after = db.get_risks().unwrap().remove(0);
        assert_eq!(after.status, Some(RiskStatus::Mitigated));
        assert!(after.updated_date > before.updated_date);
    }

    #[test]
    fn delete_risk_is_idempotent() {
        let (_dir, db) = test_db();
        let id = db
            .add_risk(&NewRisk {
                risk_title: "Short-lived".into(),
                ..Default::default()
            })
            .unwrap();
        db.delete_risk(id).unwrap();
        db.delete_risk(id).unwrap();
        assert!(db.get_risks().unwrap().is_empty());
    }
}
