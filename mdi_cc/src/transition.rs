use serde::{Deserialize, Serialize};

pub const DEFAULT_STATE_TRANSITIONS: [StateTransition; 2] = [
    StateTransition::LinkParams,
    StateTransition::RowAssignment,
];

/// MCMC transitions in the `State`
#[derive(Deserialize, Serialize, Clone, Copy, Eq, PartialEq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum StateTransition {
    /// Metropolis update of every pairwise concordance parameter
    LinkParams,
    /// Reassign items to components in every view, each view conditioned on
    /// the others' current allocations. Also resamples the weights and the
    /// component parameters.
    RowAssignment,
    /// Update the parameters in the feature components without reassigning.
    /// This is done automatically during the row assignment; it is here for
    /// runs that skip the assignment. Note: this is not a default state
    /// transition.
    ComponentParams,
}

impl std::fmt::Display for StateTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::LinkParams => "link_params",
            Self::RowAssignment => "row_assignment",
            Self::ComponentParams => "component_params",
        };
        write!(f, "{}", s)
    }
}
