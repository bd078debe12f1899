//! Example dataset for demos and manual testing: an SME chemical company
//! running AI systems across R&D, operations, and back office.

use crate::db::models::*;
use crate::db::GovernanceDb;

/// Populate all five tables with a realistic example dataset. Intended
/// for a fresh store; repeated runs append duplicates (except controls,
/// whose identifiers collide).
pub fn seed_example_data(db: &GovernanceDb) -> anyhow::Result<()> {
    let assets = [
        (
            "ChemSynth AI",
            "ML Model",
            "Predicts optimal chemical synthesis pathways and reaction conditions",
            Criticality::Critical,
            "Dr. Sarah Chen",
            AssetStatus::Active,
        ),
        (
            "MolGen Discovery Platform",
            "AI System",
            "Molecular generation and optimization platform for new compound discovery",
            Criticality::Critical,
            "Dr. Michael Rodriguez",
            AssetStatus::Active,
        ),
        (
            "Distillation Predictive Maintenance",
            "ML Model",
            "Predictive maintenance for distillation column equipment using sensor data",
            Criticality::High,
            "Mark Thompson",
            AssetStatus::Active,
        ),
        (
            "Quality Control Vision System",
            "AI Service",
            "Computer vision for automated quality inspection of chemical products",
            Criticality::High,
            "James Miller",
            AssetStatus::Active,
        ),
        (
            "Safety Document Analyzer",
            "AI System",
            "NLP analysis of safety data sheets and regulatory compliance documents",
            Criticality::High,
            "Safety Team",
            AssetStatus::UnderReview,
        ),
        (
            "Chemical Reaction Database",
            "Dataset",
            "Historical reaction data used to train synthesis prediction models",
            Criticality::Critical,
            "Data Science Team",
            AssetStatus::Active,
        ),
    ];

    let mut asset_ids = Vec::new();
    for (name, asset_type, description, criticality, owner, status) in assets {
        let id = db.add_asset(&NewAsset {
            name: name.into(),
            asset_type: asset_type.into(),
            description: description.into(),
            criticality,
            owner: owner.into(),
            status,
        })?;
        asset_ids.push(id);
    }

    let risks = [
        (
            Some(asset_ids[0]),
            "Synthesis Prediction Errors",
            "May recommend dangerous or inefficient synthesis pathways",
            "Safety & Performance",
            Likelihood::Medium,
            Impact::VeryHigh,
            RiskLevel::Critical,
            "Safety validation layers and expert review",
            "Dr. Sarah Chen",
            RiskStatus::Open,
        ),
        (
            Some(asset_ids[2]),
            "Predictive Maintenance False Alarms",
            "False positives cause unnecessary downtime and cost",
            "Operational Efficiency",
            Likelihood::High,
            Impact::Medium,
            RiskLevel::High,
            "Tune model sensitivity, cost-benefit analysis",
            "Mark Thompson",
            RiskStatus::InProgress,
        ),
        (
            Some(asset_ids[5]),
            "Chemical Data Contamination",
            "Training data may carry incorrect or outdated reaction information",
            "Data Quality",
            Likelihood::High,
            Impact::High,
            RiskLevel::High,
            "Data validation and chemical expert review",
            "Data Science Team",
            RiskStatus::Open,
        ),
        (
            None,
            "Model Interpretability",
            "Critical AI systems lack explainability for regulatory compliance",
            "Regulatory Compliance",
            Likelihood::High,
            Impact::High,
            RiskLevel::High,
            "Explainable AI frameworks for critical systems",
            "CTO Office",
            RiskStatus::InProgress,
        ),
        (
            Some(asset_ids[3]),
            "Quality Control System Failure",
            "Vision system failure could let defective products reach customers",
            "Product Quality",
            Likelihood::Low,
            Impact::VeryHigh,
            RiskLevel::Critical,
            "Redundant quality checks and human oversight",
            "James Miller",
            RiskStatus::Mitigated,
        ),
    ];

    for (
        asset_id,
        risk_title,
        risk_description,
        risk_category,
        likelihood,
        impact,
        risk_level,
        mitigation_strategy,
        owner,
        status,
    ) in risks
    {
        db.add_risk(&NewRisk {
            asset_id,
            risk_title: risk_title.into(),
            risk_description: risk_description.into(),
            risk_category: risk_category.into(),
            likelihood,
            impact,
            risk_level,
            mitigation_strategy: mitigation_strategy.into(),
            owner: owner.into(),
            status,
        })?;
    }

    let controls = [
        (
            "CHM-001",
            "Chemical AI Safety Review Board",
            "Cross-functional review board for AI systems in chemical processes",
            ControlType::Administrative,
            ImplementationStatus::Implemented,
            Effectiveness::Effective,
            "Chief Technology Officer",
        ),
        (
            "CHM-002",
            "Synthesis AI Validation Protocol",
            "Multi-stage validation of AI synthesis recommendations by chemical experts",
            ControlType::Preventive,
            ImplementationStatus::Implemented,
            Effectiveness::Effective,
            "Dr. Sarah Chen",
        ),
        (
            "CHM-005",
            "Chemical Data Validation",
            "Automated and manual validation of chemical training data quality",
            ControlType::Preventive,
            ImplementationStatus::InProgress,
            Effectiveness::PartiallyEffective,
            "Data Science Team",
        ),
        (
            "CHM-006",
            "AI Model Performance Monitoring",
            "Continuous monitoring of model accuracy and drift",
            ControlType::Detective,
            ImplementationStatus::Implemented,
            Effectiveness::Effective,
            "ML Operations Team",
        ),
        (
            "CHM-010",
            "AI Incident Response Plan",
            "Procedures for AI-related incidents in chemical operations",
            ControlType::Corrective,
            ImplementationStatus::NotStarted,
            Effectiveness::NotAssessed,
            "Crisis Management Team",
        ),
    ];

    for (
        control_id,
        control_name,
        control_description,
        control_type,
        implementation_status,
        effectiveness,
        owner,
    ) in controls
    {
        db.add_control(&NewControl {
            control_id: control_id.into(),
            control_name: control_name.into(),
            control_description: control_description.into(),
            control_type,
            implementation_status,
            effectiveness,
            owner: owner.into(),
        })?;
    }

    let incidents = [
        (
            "Synthesis AI Unsafe Recommendation",
            "Recommended reaction conditions that could produce hazardous byproducts",
            Severity::Critical,
            "ChemSynth AI",
            "Training data lacked safety information for rare reaction types",
            "Model shutdown, safety review, enhanced data validation",
            IncidentStatus::Resolved,
            "Lab Safety Officer",
            "Dr. Sarah Chen",
        ),
        (
            "Quality Control System Malfunction",
            "Vision system failed to detect contamination in batch #2024-0847",
            Severity::Critical,
            "Quality Control Vision System",
            "Lighting changes in production area degraded recognition accuracy",
            "Lighting controls, model retraining under varied lighting",
            IncidentStatus::Investigating,
            "QC Supervisor",
            "James Miller",
        ),
        (
            "Distillation Column False Alarm",
            "Predictive maintenance triggered an unnecessary emergency shutdown",
            Severity::High,
            "Distillation Predictive Maintenance",
            "Sensor calibration drift",
            "Recalibrated sensors, adjusted sensitivity thresholds",
            IncidentStatus::Resolved,
            "Operations Manager",
            "Mark Thompson",
        ),
        (
            "Molecular IP Potential Breach",
            "Unauthorized access to molecular discovery training data",
            Severity::High,
            "MolGen Discovery Platform",
            "Weak authentication on research collaboration system",
            "Strengthened access controls, additional encryption",
            IncidentStatus::Closed,
            "IT Security Team",
            "Dr. Michael Rodriguez",
        ),
    ];

    for (
        incident_title,
        incident_description,
        severity,
        affected_assets,
        root_cause,
        corrective_actions,
        status,
        reported_by,
        assigned_to,
    ) in incidents
    {
        db.add_incident(&NewIncident {
            incident_title: incident_title.into(),
            incident_description: incident_description.into(),
            severity,
            affected_assets: affected_assets.into(),
            root_cause: root_cause.into(),
            corrective_actions: corrective_actions.into(),
            status,
            reported_by: reported_by.into(),
            assigned_to: assigned_to.into(),
        })?;
    }

    let audits = [
        (
            "Q3 2024 Chemical AI Safety Audit",
            AuditType::Internal,
            "Safety review of AI systems in chemical processes",
            "Process Safety Team",
            "Adequate controls overall; gaps in molecular discovery oversight",
            "Enhanced oversight for R&D AI systems",
            78,
            AuditStatus::Complete,
        ),
        (
            "ISO 42001 Pre-Certification Assessment",
            AuditType::External,
            "Third-party pre-certification audit",
            "ChemTech Auditors Ltd.",
            "Strong technical controls; documentation needs better traceability",
            "Improve AI system documentation and change management",
            84,
            AuditStatus::Complete,
        ),
        (
            "AI Ethics Assessment",
            AuditType::SelfAssessment,
            "Evaluation of AI ethics practices in chemical industry applications",
            "Ethics Committee",
            "Good data protection; fairness evaluation missing for supplier AI",
            "Supplier fairness metrics and bias testing",
            72,
            AuditStatus::FollowUpRequired,
        ),
        (
            "Q1 2025 Comprehensive AI Review",
            AuditType::Internal,
            "Annual review of all AI systems and ISO 42001 compliance",
            "Internal Audit Team",
            "Scheduled for January 2025",
            "Full system inventory and compliance gap analysis",
            0,
            AuditStatus::Planned,
        ),
    ];

    for (
        audit_title,
        audit_type,
        audit_scope,
        auditor,
        findings,
        recommendations,
        compliance_score,
        status,
    ) in audits
    {
        db.add_audit(&NewAudit {
            audit_title: audit_title.into(),
            audit_type,
            audit_scope: audit_scope.into(),
            auditor: auditor.into(),
            findings: findings.into(),
            recommendations: recommendations.into(),
            compliance_score,
            status,
        })?;
    }

    log::info!("Seeded example governance records");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;

    #[test]
    fn seed_populates_every_table_and_counter() {
        let (_dir, db) = test_db();
        seed_example_data(&db).unwrap();

        assert_eq!(db.get_assets().unwrap().len(), 6);
        assert_eq!(db.get_risks().unwrap().len(), 5);
        assert_eq!(db.get_controls().unwrap().len(), 5);
        assert_eq!(db.get_incidents().unwrap().len(), 4);
        assert_eq!(db.get_audits().unwrap().len(), 4);

        let stats = db.dashboard_stats().unwrap();
        assert_eq!(stats.total_assets, 6);
        assert_eq!(stats.active_risks, 5);
        assert_eq!(stats.implemented_controls, 3);
        assert_eq!(stats.open_incidents, 1);
        assert_eq!(stats.completed_audits, 2);
    }

    #[test]
    fn seed_includes_an_unlinked_risk() {
        let (_dir, db) = test_db();
        seed_example_data(&db).unwrap();
        let risks = db.get_risks().unwrap();
        assert!(risks.iter().any(|r| r.asset_id.is_none()));
        assert!(risks.iter().any(|r| r.asset_name.is_some()));
    }
}
