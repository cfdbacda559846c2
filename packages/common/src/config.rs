use serde::Deserialize;

/// Points granted for each completed assignment.
pub const DEFAULT_REWARD_POINTS: i64 = 20;

/// Assignment workflow configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowConfig {
    /// When true, the first submission locks the assignment for everybody
    /// else. Set to false to track submissions per user. Default: true.
    #[serde(default = "default_exclusive_submission")]
    pub exclusive_submission: bool,
    /// Points granted on completion. Default: 20.
    #[serde(default = "default_reward_points")]
    pub reward_points: i64,
}

fn default_exclusive_submission() -> bool {
    true
}

fn default_reward_points() -> i64 {
    DEFAULT_REWARD_POINTS
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            exclusive_submission: default_exclusive_submission(),
            reward_points: default_reward_points(),
        }
    }
}
