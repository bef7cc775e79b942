use serde::{Deserialize, Serialize};

/// Duty assigned to one nurse on one day. `Off` is the only value
/// consistent with not working; enum order is the reporting order.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
    Day,
    Late,
    Night,
    #[default]
    Off,
}

impl Shift {
    pub const ALL: [Shift; 4] = [Shift::Day, Shift::Late, Shift::Night, Shift::Off];
    pub const WORKING: [Shift; 3] = [Shift::Day, Shift::Late, Shift::Night];

    /// Position within [`Shift::ALL`].
    pub fn index(self) -> usize {
        match self {
            Shift::Day => 0,
            Shift::Late => 1,
            Shift::Night => 2,
            Shift::Off => 3,
        }
    }

    pub fn is_working(self) -> bool {
        self != Shift::Off
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Shift::Day => "DAY",
            Shift::Late => "LATE",
            Shift::Night => "NIGHT",
            Shift::Off => "OFF",
        };
        f.write_str(label)
    }
}

/// Ward team a nurse belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    A,
    B,
    Emg,
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Team::A => "A",
            Team::B => "B",
            Team::Emg => "EMG",
        };
        f.write_str(label)
    }
}

/// Outcome of one optimize or reoptimize call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Ok,
    Infeasible,
    TimeLimit,
    Cancelled,
}
