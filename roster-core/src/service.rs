use std::sync::Arc;

use shared::{DomainError, DomainResult, PlanStatus, Team};

use crate::config::OptimizerConfig;
use crate::domain::entities::{Assignment, NurseInput, ProblemInstance, Solution};
use crate::domain::services::{Analyzer, HolidayCalendar, Recommender, RosterPlanner, RuleCompiler};
use crate::presentation::{
    NurseMeta, OptimizeRequest, OptimizeResponse, PlanPayload, PlanSummary, RecommendRequest,
    RecommendResponse, ReoptimizeRequest,
};
use crate::solver::CancelToken;

/// Facade over the optimization core, implementing the three stable
/// operations the transport layer above builds on.
pub struct RosterService {
    holidays: Arc<dyn HolidayCalendar>,
    config: OptimizerConfig,
}

impl RosterService {
    pub fn new(holidays: Arc<dyn HolidayCalendar>, config: OptimizerConfig) -> Self {
        Self { holidays, config }
    }

    pub fn optimize(&self, request: &OptimizeRequest) -> DomainResult<OptimizeResponse> {
        self.optimize_with_cancel(request, &CancelToken::new())
    }

    pub fn optimize_with_cancel(
        &self,
        request: &OptimizeRequest,
        cancel: &CancelToken,
    ) -> DomainResult<OptimizeResponse> {
        validate_month(request.year, request.month)?;
        validate_alternatives(request.alternatives)?;

        let instance = self.compile(
            request.year,
            request.month,
            &request.nurses,
            &request.demand_overrides,
            &request.policy,
        )?;
        tracing::info!(
            year = request.year,
            month = request.month,
            nurses = instance.nurse_count(),
            alternatives = request.alternatives,
            "optimize requested"
        );
        let outcome = RosterPlanner::optimize(&instance, request.alternatives, cancel);
        Ok(self.to_response(
            &instance,
            outcome.status,
            outcome.solutions,
            outcome.analysis,
            outcome.warnings,
        ))
    }

    pub fn reoptimize(&self, request: &ReoptimizeRequest) -> DomainResult<OptimizeResponse> {
        self.reoptimize_with_cancel(request, &CancelToken::new())
    }

    pub fn reoptimize_with_cancel(
        &self,
        request: &ReoptimizeRequest,
        cancel: &CancelToken,
    ) -> DomainResult<OptimizeResponse> {
        validate_month(request.year, request.month)?;
        validate_alternatives(request.alternatives)?;

        let instance = self.compile(
            request.year,
            request.month,
            &request.nurses,
            &request.demand_overrides,
            &request.policy,
        )?;
        let base = Assignment::from_cells(&request.assignments, &instance)?;
        tracing::info!(
            year = request.year,
            month = request.month,
            pinned = request.fixed.len(),
            "reoptimize requested"
        );
        let outcome =
            RosterPlanner::reoptimize(&base, &request.fixed, &instance, request.alternatives, cancel)?;
        Ok(self.to_response(
            &instance,
            outcome.status,
            outcome.solutions,
            outcome.analysis,
            outcome.warnings,
        ))
    }

    pub fn recommend(&self, request: &RecommendRequest) -> DomainResult<RecommendResponse> {
        validate_month(request.year, request.month)?;

        let nurses = match &request.nurses {
            Some(nurses) => nurses.clone(),
            None => infer_nurses(request),
        };
        let instance = self.compile(
            request.year,
            request.month,
            &nurses,
            &request.demand_overrides,
            &request.policy,
        )?;
        let assignment = Assignment::from_cells(&request.assignments, &instance)?;
        let report = RosterPlanner::recheck(&assignment, &instance);
        Ok(report.into())
    }

    fn compile(
        &self,
        year: i32,
        month: u32,
        nurses: &[NurseInput],
        overrides: &[crate::domain::entities::DemandOverride],
        policy: &Option<crate::presentation::PolicyOverride>,
    ) -> DomainResult<ProblemInstance> {
        let config = match policy {
            Some(policy) => policy.apply(&self.config),
            None => self.config.clone(),
        };
        let compiler = RuleCompiler::new(&config, self.holidays.as_ref());
        Ok(compiler.compile(year, month, nurses, overrides)?)
    }

    fn to_response(
        &self,
        instance: &ProblemInstance,
        status: PlanStatus,
        solutions: Vec<Solution>,
        analysis: Option<crate::domain::entities::AnalysisReport>,
        warnings: Vec<String>,
    ) -> OptimizeResponse {
        let payloads = solutions
            .into_iter()
            .map(|solution| self.to_payload(solution, instance))
            .collect();
        OptimizeResponse {
            status,
            year: instance.year,
            month: instance.month,
            days: instance.dates.clone(),
            nurses: instance.nurses.iter().map(NurseMeta::from).collect(),
            solutions: payloads,
            analysis,
            warnings,
        }
    }

    fn to_payload(&self, solution: Solution, instance: &ProblemInstance) -> PlanPayload {
        let mut report = Analyzer::analyze(&solution.assignment, instance);
        if !report.violations.is_empty() {
            let recommendations = Recommender::recommend(&report, &solution.assignment, instance);
            report.recommendations = recommendations;
        }
        let label = format!("Plan {}", solution.plan_id.trim_start_matches("plan-"));
        PlanPayload {
            plan_id: solution.plan_id,
            label,
            objective: solution.objective,
            assignments: solution.assignment.to_cells(instance),
            summary: PlanSummary {
                per_day: report.per_day,
                per_nurse: report.per_nurse,
            },
            warnings: report.warnings,
            violations: report.violations,
            violation_cells: report.violation_cells,
            recommendations: report.recommendations,
        }
    }
}

fn validate_month(year: i32, month: u32) -> DomainResult<()> {
    if !(2000..=2100).contains(&year) {
        return Err(DomainError::Validation(format!(
            "year: must be between 2000 and 2100, got {}",
            year
        )));
    }
    if !(1..=12).contains(&month) {
        return Err(DomainError::Validation(format!(
            "month: must be between 1 and 12, got {}",
            month
        )));
    }
    Ok(())
}

fn validate_alternatives(alternatives: usize) -> DomainResult<()> {
    if !(1..=10).contains(&alternatives) {
        return Err(DomainError::Validation(format!(
            "alternatives: must be between 1 and 10, got {}",
            alternatives
        )));
    }
    Ok(())
}

/// Without nurse records, rebuild a minimal roster from the grid itself:
/// ids in order of first appearance, teams alternating so the team mix
/// checks stay meaningful, everyone cleared to lead.
fn infer_nurses(request: &RecommendRequest) -> Vec<NurseInput> {
    let mut nurses: Vec<NurseInput> = Vec::new();
    for cell in &request.assignments {
        if nurses.iter().any(|nurse| nurse.id == cell.nurse_id) {
            continue;
        }
        let team = if nurses.len() % 2 == 0 { Team::A } else { Team::B };
        nurses.push(NurseInput::new(cell.nurse_id.clone(), team, true));
    }
    nurses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::NoHolidays;
    use shared::Shift;

    fn service() -> RosterService {
        RosterService::new(Arc::new(NoHolidays), OptimizerConfig::default())
    }

    fn empty_optimize_request(year: i32, month: u32, alternatives: usize) -> OptimizeRequest {
        OptimizeRequest {
            year,
            month,
            alternatives,
            nurses: vec![NurseInput::new("n1", Team::A, true)],
            demand_overrides: Vec::new(),
            policy: None,
        }
    }

    #[test]
    fn test_year_out_of_range_rejected() {
        let result = service().optimize(&empty_optimize_request(1999, 6, 1));
        assert!(matches!(result, Err(DomainError::Validation(message)) if message.contains("year")));
    }

    #[test]
    fn test_alternatives_out_of_range_rejected() {
        let result = service().optimize(&empty_optimize_request(2026, 6, 11));
        assert!(matches!(
            result,
            Err(DomainError::Validation(message)) if message.contains("alternatives")
        ));
    }

    #[test]
    fn test_infer_nurses_alternates_teams() {
        use crate::domain::entities::AssignmentCell;
        use chrono::NaiveDate;

        let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let request = RecommendRequest {
            year: 2026,
            month: 6,
            nurses: None,
            demand_overrides: Vec::new(),
            policy: None,
            assignments: ["a", "b", "c"]
                .iter()
                .map(|id| AssignmentCell {
                    nurse_id: id.to_string(),
                    date,
                    shift: Shift::Off,
                })
                .collect(),
        };
        let nurses = infer_nurses(&request);
        assert_eq!(nurses.len(), 3);
        assert_eq!(nurses[0].team, Team::A);
        assert_eq!(nurses[1].team, Team::B);
        assert!(nurses.iter().all(|nurse| nurse.leader_ok));
    }
}
