use serde::Deserialize;

/// Objective weights, descending priority. `slack` is only active when a
/// relaxed model is solved to explain an infeasible instance.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObjectiveWeights {
    pub requested_off: i64,
    pub weekend_fairness: i64,
    pub night_fairness: i64,
    pub pattern: i64,
    pub slack: i64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            requested_off: 1,
            weekend_fairness: 5,
            night_fairness: 10,
            pattern: 3,
            slack: 10_000,
        }
    }
}

/// Per-shift staffing defaults applied to dates without an explicit override.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DayDemandDefaults {
    pub day_min: u32,
    pub day_max: u32,
    pub late: u32,
    pub night: u32,
}

impl Default for DayDemandDefaults {
    fn default() -> Self {
        Self {
            day_min: 4,
            day_max: 8,
            late: 2,
            night: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DemandDefaults {
    pub weekday: DayDemandDefaults,
    /// Applied to weekend and holiday dates.
    pub weekend: DayDemandDefaults,
}

impl Default for DemandDefaults {
    fn default() -> Self {
        Self {
            weekday: DayDemandDefaults::default(),
            weekend: DayDemandDefaults {
                day_min: 3,
                day_max: 6,
                late: 2,
                night: 2,
            },
        }
    }
}

/// Default per-nurse limits, used when a nurse record leaves them unset.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuleDefaults {
    pub night_min: u32,
    pub night_max: u32,
    pub weekly_work_max: u32,
    pub weekend_holiday_max: u32,
}

impl Default for RuleDefaults {
    fn default() -> Self {
        Self {
            night_min: 0,
            night_max: 9,
            weekly_work_max: 5,
            weekend_holiday_max: 8,
        }
    }
}

/// One immutable bundle of solver policy, threaded through every call.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    pub weights: ObjectiveWeights,
    /// Wall-clock budget for a single solve, in milliseconds.
    pub solve_budget_ms: u64,
    /// Wall-clock budget for a whole enumeration loop, in milliseconds.
    pub total_budget_ms: u64,
    /// Later plans must stay within `(1 + objective_band)` of the best objective.
    pub objective_band: f64,
    /// Floor for the pairwise cell distance between emitted plans.
    pub min_cell_distance: usize,
    /// Re-solve rounds one solve may spend tightening its incumbent
    /// before it settles for the best solution found so far.
    pub improvement_rounds: u32,
    pub seed: u64,
    pub default_rules: RuleDefaults,
    pub default_demand: DemandDefaults,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            weights: ObjectiveWeights::default(),
            solve_budget_ms: 30_000,
            total_budget_ms: 60_000,
            objective_band: 0.15,
            min_cell_distance: 3,
            improvement_rounds: 16,
            seed: 1,
            default_rules: RuleDefaults::default(),
            default_demand: DemandDefaults::default(),
        }
    }
}

impl OptimizerConfig {
    /// Minimum cell distance between two emitted plans for a roster of
    /// `nurses * days` cells: at least the configured floor, at least 5%
    /// of the grid.
    pub fn cell_distance(&self, nurses: usize, days: usize) -> usize {
        let grid = nurses * days;
        self.min_cell_distance.max((grid * 5 + 99) / 100)
    }
}
