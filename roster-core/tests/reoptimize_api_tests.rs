#[path = "common/mod.rs"]
mod common;

use chrono::NaiveDate;
use common::{service, small_ward, to_grid, uniform_demand};
use roster_core::domain::entities::{AssignmentCell, ViolationKind};
use roster_core::presentation::{OptimizeRequest, ReoptimizeRequest};
use shared::{CompileError, DomainError, PlanStatus, Shift};

fn base_plan_cells() -> Vec<AssignmentCell> {
    let request = OptimizeRequest {
        year: 2026,
        month: 2,
        alternatives: 1,
        nurses: small_ward(),
        demand_overrides: uniform_demand(2026, 2, 2, 3, 0, 1),
        policy: None,
    };
    let mut response = service().optimize(&request).unwrap();
    assert_eq!(response.status, PlanStatus::Ok);
    response.solutions.remove(0).assignments
}

fn reoptimize_request(
    assignments: Vec<AssignmentCell>,
    fixed: Vec<AssignmentCell>,
) -> ReoptimizeRequest {
    ReoptimizeRequest {
        year: 2026,
        month: 2,
        alternatives: 1,
        nurses: small_ward(),
        demand_overrides: uniform_demand(2026, 2, 2, 3, 0, 1),
        policy: None,
        assignments,
        fixed,
    }
}

#[test]
fn test_pinned_cell_survives_into_the_new_plan() {
    let base = base_plan_cells();
    let date = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
    let pin = AssignmentCell {
        nurse_id: "n2".to_string(),
        date,
        shift: Shift::Night,
    };

    let response = service()
        .reoptimize(&reoptimize_request(base, vec![pin]))
        .unwrap();
    assert_eq!(response.status, PlanStatus::Ok);

    let grid = to_grid(&response.solutions[0].assignments);
    assert_eq!(grid[&("n2".to_string(), date)], Shift::Night);
    assert!(response.solutions[0].violations.is_empty());
}

#[test]
fn test_pinning_every_cell_reproduces_the_base_plan() {
    let base = base_plan_cells();
    let response = service()
        .reoptimize(&reoptimize_request(base.clone(), base.clone()))
        .unwrap();

    assert_eq!(response.status, PlanStatus::Ok);
    assert_eq!(response.solutions.len(), 1);
    assert_eq!(to_grid(&response.solutions[0].assignments), to_grid(&base));
}

#[test]
fn test_pin_conflicting_with_an_exclusion_is_rejected() {
    let base = base_plan_cells();
    let date = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();

    let mut request = reoptimize_request(
        base,
        vec![AssignmentCell {
            nurse_id: "n1".to_string(),
            date,
            shift: Shift::Night,
        }],
    );
    request.nurses[0].forbidden_shifts.push(
        roster_core::domain::entities::ShiftOnDate {
            date,
            shift: Shift::Night,
        },
    );

    let result = service().reoptimize(&request);
    assert!(matches!(
        result,
        Err(DomainError::Compile(CompileError::ConflictingFixed { .. }))
    ));
}

#[test]
fn test_unknown_nurse_in_pins_is_rejected() {
    let base = base_plan_cells();
    let pin = AssignmentCell {
        nurse_id: "ghost".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
        shift: Shift::Night,
    };
    let result = service().reoptimize(&reoptimize_request(base, vec![pin]));
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[test]
fn test_overconstraining_pins_reports_infeasible_with_base_analysis() {
    let base = base_plan_cells();
    let date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();

    // Resting three of four nurses leaves too few hands for the day.
    let pins: Vec<AssignmentCell> = ["n1", "n2", "n3"]
        .iter()
        .map(|id| AssignmentCell {
            nurse_id: id.to_string(),
            date,
            shift: Shift::Off,
        })
        .collect();
    let response = service()
        .reoptimize(&reoptimize_request(base, pins))
        .unwrap();

    assert_eq!(response.status, PlanStatus::Infeasible);
    assert!(response.solutions.is_empty());

    // The analysis reflects the submitted grid against the pinned rules.
    let analysis = response.analysis.expect("analysis of the base grid");
    assert!(!analysis.ok);
    assert!(analysis
        .violations
        .iter()
        .any(|violation| violation.kind == ViolationKind::FixedViolated));
}

#[test]
fn test_malformed_base_grid_is_rejected() {
    let mut base = base_plan_cells();
    base.pop();
    let result = service().reoptimize(&reoptimize_request(base, Vec::new()));
    assert!(matches!(result, Err(DomainError::Validation(_))));
}
