use serde::Deserialize;

use crate::config::{ObjectiveWeights, OptimizerConfig};
use crate::domain::entities::{AssignmentCell, DemandOverride, NurseInput};

fn default_alternatives() -> usize {
    1
}

/// Per-request policy adjustments layered over the service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyOverride {
    pub weights: Option<ObjectiveWeights>,
    pub solve_budget_ms: Option<u64>,
    pub total_budget_ms: Option<u64>,
    pub seed: Option<u64>,
}

impl PolicyOverride {
    pub fn apply(&self, base: &OptimizerConfig) -> OptimizerConfig {
        let mut config = base.clone();
        if let Some(weights) = self.weights {
            config.weights = weights;
        }
        if let Some(solve_budget_ms) = self.solve_budget_ms {
            config.solve_budget_ms = solve_budget_ms;
        }
        if let Some(total_budget_ms) = self.total_budget_ms {
            config.total_budget_ms = total_budget_ms;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config
    }
}

/// Request for a fresh monthly roster.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeRequest {
    pub year: i32,
    pub month: u32,
    #[serde(default = "default_alternatives")]
    pub alternatives: usize,
    pub nurses: Vec<NurseInput>,
    #[serde(default)]
    pub demand_overrides: Vec<DemandOverride>,
    #[serde(default)]
    pub policy: Option<PolicyOverride>,
}

/// Request to re-solve an existing grid with some cells pinned.
#[derive(Debug, Clone, Deserialize)]
pub struct ReoptimizeRequest {
    pub year: i32,
    pub month: u32,
    #[serde(default = "default_alternatives")]
    pub alternatives: usize,
    pub nurses: Vec<NurseInput>,
    #[serde(default)]
    pub demand_overrides: Vec<DemandOverride>,
    #[serde(default)]
    pub policy: Option<PolicyOverride>,
    /// The grid the user is editing.
    pub assignments: Vec<AssignmentCell>,
    /// Cells that must survive into every returned plan.
    #[serde(default)]
    pub fixed: Vec<AssignmentCell>,
}

/// Request to validate a grid and propose repairs, without solving.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    pub year: i32,
    pub month: u32,
    /// Optional: without nurse records the roster is inferred from the
    /// assignment cells with default rules.
    #[serde(default)]
    pub nurses: Option<Vec<NurseInput>>,
    #[serde(default)]
    pub demand_overrides: Vec<DemandOverride>,
    #[serde(default)]
    pub policy: Option<PolicyOverride>,
    pub assignments: Vec<AssignmentCell>,
}
