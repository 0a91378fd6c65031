use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::StateUpdateConfig;
use crate::error::StateError;
use crate::link::{LinkConstrainer, ViewLinks};
use crate::transition::StateTransition;
use crate::view::View;

/// Stores some diagnostic info in the `State` at every iteration
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(default)]
pub struct StateDiagnostics {
    /// Joint log likelihood
    pub loglike: Vec<f64>,
    /// Concordance parameters, one trace per view pair
    pub phis: Vec<Vec<f64>>,
    /// The number of occupied components in the view with the fewest
    pub n_occupied_min: Vec<usize>,
    /// The number of occupied components in the view with the most
    pub n_occupied_max: Vec<usize>,
}

/// One MDI sampler state: the per-view mixtures plus the concordance
/// parameters linking them
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct State {
    /// The views of the data
    pub views: Vec<View>,
    /// The pairwise concordance parameters
    pub links: ViewLinks,
    /// The joint log likelihood after the last step
    pub loglike: f64,
    pub diagnostics: StateDiagnostics,
}

impl State {
    pub fn new(views: Vec<View>, links: ViewLinks) -> Self {
        let mut state = State {
            views,
            links,
            loglike: 0.0,
            diagnostics: StateDiagnostics::default(),
        };
        state.loglike = state.score();
        state
    }

    /// The number of views
    #[inline]
    pub fn n_views(&self) -> usize {
        self.views.len()
    }

    /// The number of items, shared by every view
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.views.first().map_or(0, |view| view.n_rows())
    }

    /// The joint log likelihood of the data under the current state
    pub fn score(&self) -> f64 {
        self.views.iter().map(|view| view.score()).sum()
    }

    /// The current allocation vector of every view
    pub fn allocations(&self) -> Vec<Vec<usize>> {
        self.views
            .iter()
            .map(|view| view.asgn.asgn.clone())
            .collect()
    }

    /// The current phi of every view pair, in upper-triangle order
    pub fn phis(&self) -> Vec<f64> {
        self.links.phis().to_vec()
    }

    /// Perform MCMC transitions on the state
    pub fn step<R: Rng>(
        &mut self,
        transitions: &[StateTransition],
        rng: &mut R,
    ) -> Result<(), StateError> {
        for transition in transitions {
            match transition {
                StateTransition::LinkParams => {
                    self.links.update(&self.views, rng);
                }
                StateTransition::RowAssignment => {
                    self.reassign_rows(rng)?;
                }
                StateTransition::ComponentParams => {
                    self.update_component_params(rng);
                }
            }
        }

        self.loglike = self.score();
        if !self.loglike.is_finite() {
            return Err(StateError::NonFiniteLoglike);
        }

        Ok(())
    }

    // Each view conditions on the other views' just-updated allocations, so
    // the sweep over views is sequential.
    fn reassign_rows<R: Rng>(
        &mut self,
        mut rng: &mut R,
    ) -> Result<(), StateError> {
        for view_ix in 0..self.n_views() {
            let constrainer =
                LinkConstrainer::new(&self.links, view_ix, &self.views);
            self.views[view_ix]
                .reassign(&constrainer, &mut rng)
                .map_err(|_| StateError::NonFiniteScore { view_ix })?;
        }
        Ok(())
    }

    #[inline]
    fn update_component_params<R: Rng>(&mut self, mut rng: &mut R) {
        self.views
            .iter_mut()
            .for_each(|view| view.update_components(&mut rng));
    }

    /// Update the state by running the MCMC transitions `n_iters` times
    pub fn update<R: Rng>(
        &mut self,
        config: StateUpdateConfig,
        rng: &mut R,
    ) -> Result<(), StateError> {
        for _ in 0..config.n_iters {
            self.step(&config.transitions, rng)?;
            self.push_diagnostics();
        }
        Ok(())
    }

    pub fn push_diagnostics(&mut self) {
        self.diagnostics.loglike.push(self.loglike);

        let phis = self.links.phis();
        if self.diagnostics.phis.len() != phis.len() {
            self.diagnostics.phis = vec![Vec::new(); phis.len()];
        }
        self.diagnostics
            .phis
            .iter_mut()
            .zip(phis.iter())
            .for_each(|(trace, &phi)| trace.push(phi));

        let occupied: Vec<usize> =
            self.views.iter().map(|view| view.n_occupied()).collect();
        self.diagnostics
            .n_occupied_min
            .push(occupied.iter().copied().min().unwrap_or(0));
        self.diagnostics
            .n_occupied_max
            .push(occupied.iter().copied().max().unwrap_or(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::builders::{StateBuilder, ViewConfig};
    use crate::data::ViewData;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn two_view_state(seed: u64) -> (State, Xoshiro256Plus) {
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);

        let col_a: Vec<f64> = (0..30)
            .map(|i| if i < 15 { -2.0 + 0.01 * i as f64 } else { 2.0 })
            .collect();
        let col_b: Vec<u8> = (0..30).map(|i| (i < 15) as u8).collect();

        let state = StateBuilder::new()
            .view(ViewConfig::new(ViewData::Continuous(vec![col_a]), 4))
            .view(ViewConfig::new(ViewData::Categorical(vec![col_b]), 4))
            .seed_from_rng(&mut rng)
            .build()
            .unwrap();

        (state, rng)
    }

    #[test]
    fn step_keeps_allocations_in_bounds() {
        let (mut state, mut rng) = two_view_state(1337);
        let transitions = crate::transition::DEFAULT_STATE_TRANSITIONS;

        for _ in 0..50 {
            state.step(&transitions, &mut rng).unwrap();
            for view in &state.views {
                assert!(view.asgn.iter().all(|&z| z < view.k()));
                assert!(view.asgn.validate().is_valid());
            }
        }
    }

    #[test]
    fn step_keeps_phis_non_negative() {
        let (mut state, mut rng) = two_view_state(1337);
        let transitions = crate::transition::DEFAULT_STATE_TRANSITIONS;

        for _ in 0..50 {
            state.step(&transitions, &mut rng).unwrap();
            assert!(state.phis().iter().all(|&phi| phi >= 0.0));
        }
    }

    #[test]
    fn update_pushes_diagnostics_every_iteration() {
        let (mut state, mut rng) = two_view_state(1337);
        let config = StateUpdateConfig {
            n_iters: 25,
            ..Default::default()
        };

        state.update(config, &mut rng).unwrap();

        assert_eq!(state.diagnostics.loglike.len(), 25);
        assert_eq!(state.diagnostics.phis.len(), 1);
        assert_eq!(state.diagnostics.phis[0].len(), 25);
        assert!(state.diagnostics.loglike.iter().all(|ll| ll.is_finite()));
    }

    #[test]
    fn component_params_transition_leaves_allocations_alone() {
        let (mut state, mut rng) = two_view_state(1337);
        let asgn_before = state.allocations();

        state
            .step(&[StateTransition::ComponentParams], &mut rng)
            .unwrap();

        assert_eq!(state.allocations(), asgn_before);
    }

    #[test]
    fn seeded_states_evolve_identically() {
        let (mut state_1, mut rng_1) = two_view_state(271);
        let (mut state_2, mut rng_2) = two_view_state(271);
        let transitions = crate::transition::DEFAULT_STATE_TRANSITIONS;

        for _ in 0..10 {
            state_1.step(&transitions, &mut rng_1).unwrap();
            state_2.step(&transitions, &mut rng_2).unwrap();
        }

        assert_eq!(state_1.allocations(), state_2.allocations());
        assert_eq!(state_1.phis(), state_2.phis());
    }
}
