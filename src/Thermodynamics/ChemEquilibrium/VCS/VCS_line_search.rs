use super::VCS_deltaG::delta_g_recalc_rxn;
use super::VCS_observer::{LineSearchEvent, VcsObserver};
use super::VCS_rxn_adj::ReactionAdjuster;
use super::VCS_state::EquilibriumState;

/// mole numbers at extent `dx` of reaction `irxn`; only the noncomponent species and the
/// components move
fn fill_trial_moles(state: &EquilibriumState, irxn: usize, dx: f64, trial: &mut [f64]) {
    let kspec = state.rxn_species[irxn];
    trial[kspec] = state.moles[kspec] + dx;
    for c in 0..state.n_components {
        trial[c] = state.moles[c] + state.stoich[(irxn, c)] * dx;
    }
}

impl<O: VcsObserver> ReactionAdjuster<O> {
    /// Rough line search along reaction `irxn` making sure dG does not switch sign prematurely.
    ///
    /// Returns the accepted step, `dx_orig` itself or a shorter one in the same direction:
    /// * zero if dG or `dx_orig` is zero, or if `dx_orig` goes uphill
    /// * `dx_orig` if dG keeps its sign over the full step
    /// * the linearly interpolated zero crossing of dG if the full step overshoots but reduces |dG|
    ///   below `line_search_accept_fraction` of its initial value
    /// * otherwise the step is halved up to `line_search_max_its` times until dG keeps its sign or
    ///   |dG| has decayed enough, and the last (shortest) trial step is returned if that never
    ///   happens
    pub fn line_search(&mut self, state: &EquilibriumState, irxn: usize, dx_orig: f64) -> f64 {
        let max_its = self.settings.line_search_max_its;
        let accept = self.settings.line_search_accept_fraction;
        let ws = &mut self.workspace;
        let dg_orig = delta_g_recalc_rxn(
            state,
            irxn,
            state.moles.as_slice(),
            &mut ws.act_coeff_base,
            &mut ws.fe_species_old,
        );
        let forig = dg_orig.abs() + 1.0e-15;
        if (dg_orig > 0.0 && dx_orig > 0.0) || (dg_orig < 0.0 && dx_orig < 0.0) {
            self.observer.on_line_search(
                irxn,
                &LineSearchEvent::WrongDirection {
                    dg0: dg_orig,
                    dx: dx_orig,
                },
            );
            return 0.0;
        }
        if dg_orig == 0.0 || dx_orig == 0.0 {
            self.observer.on_line_search(irxn, &LineSearchEvent::ZeroStep);
            return 0.0;
        }

        ws.trial_moles.copy_from_slice(state.moles.as_slice());
        fill_trial_moles(state, irxn, dx_orig, &mut ws.trial_moles);
        let dg1 = delta_g_recalc_rxn(
            state,
            irxn,
            &ws.trial_moles,
            &mut ws.act_coeff,
            &mut ws.fe_species_new,
        );
        // no sign change over the full step, we are heading in the right direction
        if dg1 * dg_orig > 0.0 {
            self.observer.on_line_search(
                irxn,
                &LineSearchEvent::FullStep {
                    dg0: dg_orig,
                    dg1,
                },
            );
            return dx_orig;
        }
        if dg1.abs() < accept * forig {
            if dg1 * dg_orig < 0.0 {
                let slope = (dg1 - dg_orig) / dx_orig;
                let dx = -dg_orig / slope;
                self.observer
                    .on_line_search(irxn, &LineSearchEvent::Interpolated { dx_orig, dx });
                return dx;
            }
            self.observer.on_line_search(
                irxn,
                &LineSearchEvent::FullStep {
                    dg0: dg_orig,
                    dg1,
                },
            );
            return dx_orig;
        }

        let mut dx = dx_orig;
        for its in 1..=max_its {
            dx *= 0.5;
            fill_trial_moles(state, irxn, dx, &mut ws.trial_moles);
            let dg = delta_g_recalc_rxn(
                state,
                irxn,
                &ws.trial_moles,
                &mut ws.act_coeff,
                &mut ws.fe_species_new,
            );
            if dg * dg_orig > 0.0 {
                self.observer
                    .on_line_search(irxn, &LineSearchEvent::Bisected { dx_orig, dx, its });
                return dx;
            }
            if dg.abs() / forig < 1.0 - 0.1 * dx / dx_orig {
                if dg * dg_orig < 0.0 {
                    let slope = (dg - dg_orig) / dx;
                    dx = -dg_orig / slope;
                }
                self.observer
                    .on_line_search(irxn, &LineSearchEvent::Bisected { dx_orig, dx, its });
                return dx;
            }
        }
        self.observer
            .on_line_search(irxn, &LineSearchEvent::Exhausted { dx_orig, dx });
        dx
    }
}
