#[path = "common/mod.rs"]
mod common;

use common::{month_dates, service, small_ward, uniform_demand};
use roster_core::domain::entities::{AssignmentCell, ViolationKind};
use roster_core::presentation::{OptimizeRequest, RecommendRequest};
use shared::{DomainError, PlanStatus, Shift};

fn solved_cells() -> Vec<AssignmentCell> {
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

fn recommend_request(assignments: Vec<AssignmentCell>) -> RecommendRequest {
    RecommendRequest {
        year: 2026,
        month: 2,
        nurses: Some(small_ward()),
        demand_overrides: uniform_demand(2026, 2, 2, 3, 0, 1),
        policy: None,
        assignments,
    }
}

#[test]
fn test_solver_output_rechecks_clean() {
    let cells = solved_cells();
    let response = service().recommend(&recommend_request(cells)).unwrap();

    assert!(response.ok);
    assert!(response.violations_detail.is_empty());
    assert!(response.violation_cells.is_empty());
    assert!(response.recommendations.is_empty());
}

/// Swapping one day duty to night on a date whose night cover was already
/// complete must surface the excess and the shortage, with the repair
/// pointing back at day duty.
#[test]
fn test_manual_swap_is_flagged_with_reversal_on_top() {
    let mut cells = solved_cells();

    // Pick a date staffed at the day-duty minimum and flip one of its
    // day duties to night.
    let response = service()
        .recommend(&recommend_request(cells.clone()))
        .unwrap();
    assert!(response.ok);
    let swapped = {
        let mut chosen = None;
        for date in month_dates(2026, 2) {
            let day_count = cells
                .iter()
                .filter(|cell| cell.date == date && cell.shift == Shift::Day)
                .count();
            if day_count == 2 {
                chosen = Some(
                    cells
                        .iter()
                        .position(|cell| cell.date == date && cell.shift == Shift::Day)
                        .unwrap(),
                );
                break;
            }
        }
        chosen.expect("some date is staffed at the minimum")
    };
    let swapped_nurse = cells[swapped].nurse_id.clone();
    let swapped_date = cells[swapped].date;
    cells[swapped].shift = Shift::Night;

    let response = service().recommend(&recommend_request(cells)).unwrap();
    assert!(!response.ok);

    let excess = response
        .violation_cells
        .iter()
        .find(|cell| cell.kind == ViolationKind::Excess)
        .expect("night excess");
    assert_eq!(excess.date, swapped_date);
    assert_eq!(excess.shift, Shift::Night);

    let shortage = response
        .violation_cells
        .iter()
        .find(|cell| cell.kind == ViolationKind::Shortage)
        .expect("day shortage");
    assert_eq!(shortage.date, swapped_date);
    assert_eq!(shortage.shift, Shift::Day);

    // Undoing the swap is proposed: the swapped nurse goes back to the
    // deficient day duty.
    let excess_repairs = response
        .recommendations
        .iter()
        .find(|recommendation| recommendation.kind == ViolationKind::Excess)
        .expect("repairs for the excess");
    assert!(!excess_repairs.suggestions.is_empty());
    let undo = excess_repairs
        .suggestions
        .iter()
        .find(|suggestion| suggestion.nurse_id == swapped_nurse)
        .expect("undo proposal for the swapped nurse");
    assert_eq!(undo.suggested_shift, Shift::Day);

    let shortage_repairs = response
        .recommendations
        .iter()
        .find(|recommendation| recommendation.kind == ViolationKind::Shortage)
        .expect("repairs for the shortage");
    assert!(shortage_repairs
        .suggestions
        .iter()
        .any(|suggestion| suggestion.nurse_id == swapped_nurse
            && suggestion.suggested_shift == Shift::Day));
}

#[test]
fn test_roster_is_inferred_when_nurse_records_are_missing() {
    let cells = solved_cells();
    let mut request = recommend_request(cells);
    request.nurses = None;

    let response = service().recommend(&request).unwrap();
    // Inferred nurses carry default rules; the check itself must run
    // without errors, whatever it finds.
    assert!(response.violations_detail.iter().all(|violation| {
        violation.kind != ViolationKind::ForbiddenAssigned
            && violation.kind != ViolationKind::FixedViolated
    }));
}

#[test]
fn test_incomplete_grid_is_rejected() {
    let mut cells = solved_cells();
    cells.truncate(cells.len() - 3);
    let result = service().recommend(&recommend_request(cells));
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[test]
fn test_unknown_nurse_in_grid_is_rejected() {
    let mut cells = solved_cells();
    cells[0].nurse_id = "ghost".to_string();
    let result = service().recommend(&recommend_request(cells));
    assert!(matches!(result, Err(DomainError::Validation(_))));
}
