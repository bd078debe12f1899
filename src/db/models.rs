use serde::{Deserialize, Serialize};

/// Rejected value for a closed enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} value: {value:?}")]
pub struct InvalidValue {
    pub field: &'static str,
    pub value: String,
}

/// Defines a closed string-backed enum with the exact spellings stored in
/// the database, plus the conversions every constrained column needs.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $( #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(InvalidValue {
                        field: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl rusqlite::types::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: InvalidValue| rusqlite::types::FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

string_enum! {
    /// Asset criticality classification.
    Criticality {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

string_enum! {
    /// Lifecycle status of a tracked asset.
    AssetStatus {
        Active => "Active",
        Inactive => "Inactive",
        UnderReview => "Under Review",
        Deprecated => "Deprecated",
    }
}

string_enum! {
    /// Likelihood rating of a risk materializing.
    Likelihood {
        VeryLow => "Very Low",
        Low => "Low",
        Medium => "Medium",
        High => "High",
        VeryHigh => "Very High",
    }
}

string_enum! {
    /// Impact rating of a risk if it materializes.
    Impact {
        VeryLow => "Very Low",
        Low => "Low",
        Medium => "Medium",
        High => "High",
        VeryHigh => "Very High",
    }
}

string_enum! {
    /// Overall triage level assigned to a risk.
    RiskLevel {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

string_enum! {
    RiskStatus {
        Open => "Open",
        InProgress => "In Progress",
        Mitigated => "Mitigated",
        Accepted => "Accepted",
        Closed => "Closed",
    }
}

string_enum! {
    ControlType {
        Preventive => "Preventive",
        Detective => "Detective",
        Corrective => "Corrective",
        Administrative => "Administrative",
    }
}

string_enum! {
    ImplementationStatus {
        NotStarted => "Not Started",
        InProgress => "In Progress",
        Implemented => "Implemented",
        NeedsReview => "Needs Review",
    }
}

string_enum! {
    /// Assessed effectiveness of an implemented control.
    Effectiveness {
        NotAssessed => "Not Assessed",
        Ineffective => "Ineffective",
        PartiallyEffective => "Partially Effective",
        Effective => "Effective",
    }
}

string_enum! {
    Severity {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

string_enum! {
    IncidentStatus {
        Open => "Open",
        Investigating => "Investigating",
        Resolved => "Resolved",
        Closed => "Closed",
    }
}

string_enum! {
    AuditType {
        Internal => "Internal",
        External => "External",
        SelfAssessment => "Self Assessment",
    }
}

string_enum! {
    /// Audit lifecycle status. "Complete" is the canonical spelling used
    /// both in storage and in the dashboard counter.
    AuditStatus {
        Planned => "Planned",
        InProgress => "In Progress",
        Complete => "Complete",
        FollowUpRequired => "Follow-up Required",
    }
}

// ── Rows ────────────────────────────────────────────────────────────────
//
// Field names mirror the column names; they double as the workbook
// export headers.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRow {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub description: Option<String>,
    pub criticality: Option<Criticality>,
    pub owner: Option<String>,
    pub status: Option<AssetStatus>,
    pub last_reviewed: Option<String>,
    pub created_date: String,
    pub updated_date: String,
}

/// Risk row as returned by `get_risks`: the raw columns plus the joined
/// asset display name (`None` when unlinked or the asset was deleted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRow {
    pub id: i64,
    pub asset_id: Option<i64>,
    pub risk_title: String,
    pub risk_description: Option<String>,
    pub risk_category: Option<String>,
    pub likelihood: Option<Likelihood>,
    pub impact: Option<Impact>,
    pub risk_level: Option<RiskLevel>,
    pub mitigation_strategy: Option<String>,
    pub owner: Option<String>,
    pub status: Option<RiskStatus>,
    pub review_date: Option<String>,
    pub created_date: String,
    pub updated_date: String,
    pub asset_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRow {
    pub id: i64,
    pub control_id: String,
    pub control_name: String,
    pub control_description: Option<String>,
    pub control_type: Option<ControlType>,
    pub implementation_status: Option<ImplementationStatus>,
    pub effectiveness: Option<Effectiveness>,
    pub owner: Option<String>,
    pub last_tested: Option<String>,
    pub next_review: Option<String>,
    pub created_date: String,
    pub updated_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRow {
    pub id: i64,
    pub incident_title: String,
    pub incident_description: Option<String>,
    pub severity: Option<Severity>,
    pub affected_assets: Option<String>,
    pub root_cause: Option<String>,
    pub corrective_actions: Option<String>,
    pub status: Option<IncidentStatus>,
    pub reported_by: Option<String>,
    pub assigned_to: Option<String>,
    pub incident_date: Option<String>,
    pub resolution_date: Option<String>,
    pub created_date: String,
    pub updated_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRow {
    pub id: i64,
    pub audit_title: String,
    pub audit_type: Option<AuditType>,
    pub audit_scope: Option<String>,
    pub auditor: Option<String>,
    pub audit_date: Option<String>,
    pub findings: Option<String>,
    pub recommendations: Option<String>,
    pub compliance_score: Option<i64>,
    pub status: Option<AuditStatus>,
    pub next_audit_date: Option<String>,
    pub created_date: String,
    pub updated_date: String,
}

// ── Insert payloads ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub description: String,
    pub criticality: Criticality,
    pub owner: String,
    pub status: AssetStatus,
}

impl Default for NewAsset {
    fn default() -> Self {
        Self {
            name: String::new(),
            asset_type: String::new(),
            description: String::new(),
            criticality: Criticality::Medium,
            owner: String::new(),
            status: AssetStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRisk {
    pub asset_id: Option<i64>,
    pub risk_title: String,
    pub risk_description: String,
    pub risk_category: String,
    pub likelihood: Likelihood,
    pub impact: Impact,
    pub risk_level: RiskLevel,
    pub mitigation_strategy: String,
    pub owner: String,
    pub status: RiskStatus,
}

impl Default for NewRisk {
    fn default() -> Self {
        Self {
            asset_id: None,
            risk_title: String::new(),
            risk_description: String::new(),
            risk_category: String::new(),
            likelihood: Likelihood::Medium,
            impact: Impact::Medium,
            risk_level: RiskLevel::Medium,
            mitigation_strategy: String::new(),
            owner: String::new(),
            status: RiskStatus::Open,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewControl {
    /// Human-assigned identifier, unique across the table.
    pub control_id: String,
    pub control_name: String,
    pub control_description: String,
    pub control_type: ControlType,
    pub implementation_status: ImplementationStatus,
    pub effectiveness: Effectiveness,
    pub owner: String,
}

impl Default for NewControl {
    fn default() -> Self {
        Self {
            control_id: String::new(),
            control_name: String::new(),
            control_description: String::new(),
            control_type: ControlType::Preventive,
            implementation_status: ImplementationStatus::NotStarted,
            effectiveness: Effectiveness::NotAssessed,
            owner: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIncident {
    pub incident_title: String,
    pub incident_description: String,
    pub severity: Severity,
    pub affected_assets: String,
    pub root_cause: String,
    pub corrective_actions: String,
    pub status: IncidentStatus,
    pub reported_by: String,
    pub assigned_to: String,
}

impl Default for NewIncident {
    fn default() -> Self {
        Self {
            incident_title: String::new(),
            incident_description: String::new(),
            severity: Severity::Medium,
            affected_assets: String::new(),
            root_cause: String::new(),
            corrective_actions: String::new(),
            status: IncidentStatus::Open,
            reported_by: String::new(),
            assigned_to: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAudit {
    pub audit_title: String,
    pub audit_type: AuditType,
    pub audit_scope: String,
    pub auditor: String,
    pub findings: String,
    pub recommendations: String,
    /// 0-100; range is enforced by the schema.
    pub compliance_score: i64,
    pub status: AuditStatus,
}

impl Default for NewAudit {
    fn default() -> Self {
        Self {
            audit_title: String::new(),
            audit_type: AuditType::Internal,
            audit_scope: String::new(),
            auditor: String::new(),
            findings: String::new(),
            recommendations: String::new(),
            compliance_score: 0,
            status: AuditStatus::Planned,
        }
    }
}

// ── Partial-update payloads ─────────────────────────────────────────────
//
// One optional field per updatable column. The field set IS the update
// whitelist: anything else simply has no way in.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub description: Option<String>,
    pub criticality: Option<Criticality>,
    pub owner: Option<String>,
    pub status: Option<AssetStatus>,
}

impl AssetPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.asset_type.is_none()
            && self.description.is_none()
            && self.criticality.is_none()
            && self.owner.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskPatch {
    /// `Some(None)` clears the asset link; `None` leaves it untouched.
    pub asset_id: Option<Option<i64>>,
    pub risk_title: Option<String>,
    pub risk_description: Option<String>,
    pub risk_category: Option<String>,
    pub likelihood: Option<Likelihood>,
    pub impact: Option<Impact>,
    pub risk_level: Option<RiskLevel>,
    pub mitigation_strategy: Option<String>,
    pub owner: Option<String>,
    pub status: Option<RiskStatus>,
}

impl RiskPatch {
    pub fn is_empty(&self) -> bool {
        self.asset_id.is_none()
            && self.risk_title.is_none()
            && self.risk_description.is_none()
            && self.risk_category.is_none()
            && self.likelihood.is_none()
            && self.impact.is_none()
            && self.risk_level.is_none()
            && self.mitigation_strategy.is_none()
            && self.owner.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlPatch {
    pub control_id: Option<String>,
    pub control_name: Option<String>,
    pub control_description: Option<String>,
    pub control_type: Option<ControlType>,
    pub implementation_status: Option<ImplementationStatus>,
    pub effectiveness: Option<Effectiveness>,
    pub owner: Option<String>,
}

impl ControlPatch {
    pub fn is_empty(&self) -> bool {
        self.control_id.is_none()
            && self.control_name.is_none()
            && self.control_description.is_none()
            && self.control_type.is_none()
            && self.implementation_status.is_none()
            && self.effectiveness.is_none()
            && self.owner.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentPatch {
    pub incident_title: Option<String>,
    pub incident_description: Option<String>,
    pub severity: Option<Severity>,
    pub affected_assets: Option<String>,
    pub root_cause: Option<String>,
    pub corrective_actions: Option<String>,
    pub status: Option<IncidentStatus>,
    pub reported_by: Option<String>,
    pub assigned_to: Option<String>,
}

impl IncidentPatch {
    pub fn is_empty(&self) -> bool {
        self.incident_title.is_none()
            && self.incident_description.is_none()
            && self.severity.is_none()
            && self.affected_assets.is_none()
            && self.root_cause.is_none()
            && self.corrective_actions.is_none()
            && self.status.is_none()
            && self.reported_by.is_none()
            && self.assigned_to.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditPatch {
    pub audit_title: Option<String>,
    pub audit_type: Option<AuditType>,
    pub audit_scope: Option<String>,
    pub auditor: Option<String>,
    pub findings: Option<String>,
    pub recommendations: Option<String>,
    pub compliance_score: Option<i64>,
    pub status: Option<AuditStatus>,
}

impl AuditPatch {
    pub fn is_empty(&self) -> bool {
        self.audit_title.is_none()
            && self.audit_type.is_none()
            && self.audit_scope.is_none()
            && self.auditor.is_none()
            && self.findings.is_none()
            && self.recommendations.is_none()
            && self.compliance_score.is_none()
            && self.status.is_none()
    }
}
