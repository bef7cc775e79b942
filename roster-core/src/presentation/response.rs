use chrono::NaiveDate;
use serde::Serialize;
use shared::{PlanStatus, Team};

use crate::domain::entities::{
    AnalysisReport, AssignmentCell, CellRecommendation, DaySummary, NurseRecord, NurseRules,
    NurseSummary, Violation, ViolationCell,
};

/// Nurse record echoed back with every rule default resolved.
#[derive(Debug, Clone, Serialize)]
pub struct NurseMeta {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub team: Team,
    pub leader_ok: bool,
    pub rules: NurseRules,
}

impl From<&NurseRecord> for NurseMeta {
    fn from(nurse: &NurseRecord) -> Self {
        Self {
            id: nurse.id.clone(),
            name: nurse.name.clone(),
            team: nurse.team,
            leader_ok: nurse.leader_ok,
            rules: nurse.rules.clone(),
        }
    }
}

/// Fill counts and per-nurse counters for one plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub per_day: Vec<DaySummary>,
    pub per_nurse: Vec<NurseSummary>,
}

/// One emitted plan with everything the grid view needs.
#[derive(Debug, Clone, Serialize)]
pub struct PlanPayload {
    pub plan_id: String,
    pub label: String,
    pub objective: f64,
    pub assignments: Vec<AssignmentCell>,
    pub summary: PlanSummary,
    pub warnings: Vec<String>,
    pub violations: Vec<Violation>,
    pub violation_cells: Vec<ViolationCell>,
    pub recommendations: Vec<CellRecommendation>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub status: PlanStatus,
    pub year: i32,
    pub month: u32,
    pub days: Vec<NaiveDate>,
    pub nurses: Vec<NurseMeta>,
    pub solutions: Vec<PlanPayload>,
    /// Populated on infeasible outcomes: the closest feasible relaxation
    /// for fresh solves, the submitted grid for pinned re-solves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisReport>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub ok: bool,
    pub violations_detail: Vec<Violation>,
    pub violation_cells: Vec<ViolationCell>,
    pub recommendations: Vec<CellRecommendation>,
    pub warnings: Vec<String>,
}

impl From<AnalysisReport> for RecommendResponse {
    fn from(report: AnalysisReport) -> Self {
        Self {
            ok: report.ok,
            violations_detail: report.violations,
            violation_cells: report.violation_cells,
            recommendations: report.recommendations,
            warnings: report.warnings,
        }
    }
}
