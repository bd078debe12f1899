use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::GovernanceDb;

/// Summary counters for the dashboard view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_assets: i64,
    /// Risks whose status is anything but Closed.
    pub active_risks: i64,
    pub implemented_controls: i64,
    /// Incidents still Open or Investigating.
    pub open_incidents: i64,
    /// Audits with status "Complete" (canonical spelling).
    pub completed_audits: i64,
}

impl GovernanceDb {
    /// Five independent counts over the current table contents.
    pub fn dashboard_stats(&self) -> anyhow::Result<DashboardStats> {
        let conn = self.connection()?;

        let count = |sql: &str| -> anyhow::Result<i64> {
            conn.query_row(sql, [], |row| row.get(0))
                .context("Failed to compute dashboard count")
        };

        Ok(DashboardStats {
            total_assets: count("SELECT COUNT(*) FROM ai_assets")?,
            active_risks: count("SELECT COUNT(*) FROM risks WHERE status != 'Closed'")?,
            implemented_controls: count(
                "SELECT COUNT(*) FROM controls WHERE implementation_status = 'Implemented'",
            )?,
            open_incidents: count(
                "SELECT COUNT(*) FROM incidents WHERE status IN ('Open', 'Investigating')",
            )?,
            completed_audits: count("SELECT COUNT(*) FROM audits WHERE status = 'Complete'")?,
        })
    }
}
