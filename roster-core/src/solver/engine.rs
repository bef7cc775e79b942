//! Driver loop around the `selen` constraint solver.
//!
//! `selen` answers one question per model: find a solution or prove there
//! is none. Minimization happens here, by re-solving freshly built models
//! under a tightening objective cap until the cap proves unreachable, the
//! improvement allowance runs out, or the wall clock does. The solver call
//! itself is one opaque blocking step; budgets and cancellation are
//! checked between rounds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use selen::prelude::*;

/// Cooperative cancellation flag, polled between solve rounds.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One freshly built model plus the handles the caller needs back: the
/// objective variable and the variables whose values make up the result.
pub struct PreparedModel {
    pub model: Model,
    pub objective: VarId,
    pub outputs: Vec<VarId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The cap below the incumbent proved unreachable: proven best.
    Optimal,
    /// Stopped with an incumbent, optimality not proven.
    Feasible,
    /// The unbounded model itself has no solution.
    Infeasible,
    /// Stopped before any solution was found.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct SolveParams {
    pub time_limit: Duration,
    /// Capped number of re-solve rounds spent improving an incumbent
    /// before it is accepted as settled.
    pub improvement_rounds: u32,
    pub cancel: CancelToken,
}

impl Default for SolveParams {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
            improvement_rounds: 16,
            cancel: CancelToken::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    pub rounds: u32,
    pub elapsed: Duration,
    /// True when the improvement allowance ran out with an incumbent.
    pub converged: bool,
    pub timed_out: bool,
    pub cancelled: bool,
}

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub values: Option<Vec<i64>>,
    pub objective: Option<i64>,
    pub stats: SolveStats,
}

pub struct CpSolver {
    params: SolveParams,
}

impl CpSolver {
    pub fn new(params: SolveParams) -> Self {
        Self { params }
    }

    /// Minimizes over models produced by `build`. The first round runs
    /// unbounded; every later round rebuilds with the cap one below the
    /// incumbent, so an unsatisfiable round is an optimality proof.
    pub fn minimize<B>(&self, build: B) -> SolveOutcome
    where
        B: Fn(Option<i64>) -> PreparedModel,
    {
        let started = Instant::now();
        let mut best: Option<(Vec<i64>, i64)> = None;
        let mut rounds = 0u32;
        let mut cap: Option<i64> = None;
        let mut timed_out = false;
        let mut cancelled = false;
        let mut converged = false;

        let proven = loop {
            if self.params.cancel.is_cancelled() {
                cancelled = true;
                break false;
            }
            if started.elapsed() >= self.params.time_limit {
                timed_out = true;
                break false;
            }
            if best.is_some() && rounds > self.params.improvement_rounds {
                converged = true;
                break false;
            }

            let PreparedModel {
                mut model,
                objective,
                outputs,
            } = build(cap);
            rounds += 1;
            match model.solve() {
                Ok(solution) => {
                    let value = solution.get::<i32>(objective) as i64;
                    let values = outputs
                        .iter()
                        .map(|&var| solution.get::<i32>(var) as i64)
                        .collect();
                    best = Some((values, value));
                    if value == 0 {
                        // Nothing is cheaper than zero.
                        break true;
                    }
                    cap = Some(value - 1);
                }
                // Unsatisfiable: without a cap the model itself is
                // infeasible, under a cap the incumbent is proven best.
                Err(_) => break best.is_some(),
            }
        };

        let status = match (&best, proven) {
            (Some(_), true) => SolveStatus::Optimal,
            (Some(_), false) => SolveStatus::Feasible,
            (None, _) if rounds > 0 => SolveStatus::Infeasible,
            (None, _) => SolveStatus::Unknown,
        };
        let stats = SolveStats {
            rounds,
            elapsed: started.elapsed(),
            converged,
            timed_out,
            cancelled,
        };
        let (values, objective) = match best {
            Some((values, objective)) => (Some(values), Some(objective)),
            None => (None, None),
        };
        SolveOutcome {
            status,
            values,
            objective,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver() -> CpSolver {
        CpSolver::new(SolveParams::default())
    }

    /// Cover with x or y, x is cheaper: the loop should close at cost 1.
    #[test]
    fn test_minimizes_over_a_covering_choice() {
        let outcome = solver().minimize(|cap| {
            let mut model = Model::default();
            let x = model.int(0, 1);
            let y = model.int(0, 1);
            let cover = model.sum(&[x, y]);
            model.c(cover).ge(int(1));
            // y costs double: it appears twice in the objective.
            let objective = model.sum(&[x, y, y]);
            if let Some(cap) = cap {
                model.c(objective).le(int(cap as i32));
            }
            PreparedModel {
                model,
                objective,
                outputs: vec![x, y],
            }
        });

        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.objective, Some(1));
        assert_eq!(outcome.values.unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_detects_infeasibility() {
        let outcome = solver().minimize(|cap| {
            let mut model = Model::default();
            let x = model.int(0, 1);
            let y = model.int(0, 1);
            let total = model.sum(&[x, y]);
            model.c(total).eq(int(3));
            let objective = model.sum(&[x, y]);
            if let Some(cap) = cap {
                model.c(objective).le(int(cap as i32));
            }
            PreparedModel {
                model,
                objective,
                outputs: vec![x, y],
            }
        });

        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.values.is_none());
        assert_eq!(outcome.stats.rounds, 1);
    }

    /// dev must absorb the gap between a fixed value and a target band;
    /// the minus side of the deviation enters through its complement.
    #[test]
    fn test_deviation_settles_at_its_minimum() {
        let outcome = solver().minimize(|cap| {
            let mut model = Model::default();
            let x = model.int(4, 4);
            let dev = model.int(0, 10);
            // dev >= 2 - x (trivial here) and dev >= x - 2.
            let floor_side = model.sum(&[x, dev]);
            model.c(floor_side).ge(int(2));
            let dev_c = model.int(0, 10);
            let paired = model.sum(&[dev, dev_c]);
            model.c(paired).eq(int(10));
            let ceil_side = model.sum(&[x, dev_c]);
            model.c(ceil_side).le(int(2 + 10));
            let objective = model.sum(&[dev]);
            if let Some(cap) = cap {
                model.c(objective).le(int(cap as i32));
            }
            PreparedModel {
                model,
                objective,
                outputs: vec![dev],
            }
        });

        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.objective, Some(2));
        assert_eq!(outcome.values.unwrap(), vec![2]);
    }

    #[test]
    fn test_zero_objective_is_proven_immediately() {
        let outcome = solver().minimize(|cap| {
            let mut model = Model::default();
            let x = model.int(0, 1);
            let objective = model.sum(&[x]);
            if let Some(cap) = cap {
                model.c(objective).le(int(cap as i32));
            }
            PreparedModel {
                model,
                objective,
                outputs: vec![x],
            }
        });

        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.objective, Some(0));
    }

    #[test]
    fn test_fixed_domain_survives_into_the_solution() {
        let outcome = solver().minimize(|cap| {
            let mut model = Model::default();
            let x = model.int(1, 1);
            let y = model.int(0, 1);
            let total = model.sum(&[x, y]);
            model.c(total).le(int(1));
            let objective = model.sum(&[y]);
            if let Some(cap) = cap {
                model.c(objective).le(int(cap as i32));
            }
            PreparedModel {
                model,
                objective,
                outputs: vec![x, y],
            }
        });

        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.values.unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_cancellation_before_the_first_round_returns_unknown() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = CpSolver::new(SolveParams {
            cancel,
            ..SolveParams::default()
        })
        .minimize(|_cap| {
            let mut model = Model::default();
            let x = model.int(0, 1);
            let objective = model.sum(&[x]);
            PreparedModel {
                model,
                objective,
                outputs: vec![x],
            }
        });

        assert_eq!(outcome.status, SolveStatus::Unknown);
        assert!(outcome.stats.cancelled);
        assert_eq!(outcome.stats.rounds, 0);
    }
}
