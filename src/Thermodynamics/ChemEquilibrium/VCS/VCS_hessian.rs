//! Diagonal of the Hessian of the total Gibbs free energy with respect to the extent of one
//! formation reaction.
//!
//! The ideal part comes from the mixing entropy terms n ln(n/N) of the species taking part in the
//! reaction. The nonideal part comes from the dependence of the activity coefficients on the mole
//! numbers and is a quadratic form of the Jacobian d ln(gamma)/d n restricted to the noncomponent
//! species and the components of the reaction.
use super::VCS_observer::VcsObserver;
use super::VCS_phase_models::PhaseModel;
use super::VCS_rxn_adj::ReactionAdjuster;
use super::VCS_state::EquilibriumState;
use log::error;

/// Ideal solution estimate of the Hessian diagonal of reaction `irxn`:
///
/// s = 1/n_k + SUM_c sc_c^2/n_c - SUM_p dnPhase_p^2/N_p
///
/// where single species phases contribute nothing to the first two terms and only multispecies
/// phases with positive total moles enter the last one. A zero result means the reaction runs
/// entirely among single species phases.
pub fn ideal_hessian_diag(state: &EquilibriumState, irxn: usize) -> f64 {
    let kspec = state.rxn_species[irxn];
    let mut s = if state.single_species[kspec] {
        0.0
    } else {
        1.0 / state.moles[kspec]
    };
    for c in 0..state.n_components {
        let sc = state.stoich[(irxn, c)];
        // components outside the reaction may sit at zero moles
        if sc != 0.0 && !state.single_species[c] {
            s += sc * sc / state.moles[c];
        }
    }
    for (iphase, phase) in state.phases.iter().enumerate() {
        if !phase.is_single_species() && state.phase_moles[iphase] > 0.0 {
            let dn = state.dn_phase[(irxn, iphase)];
            s -= dn * dn / state.phase_moles[iphase];
        }
    }
    s
}

/// Activity coefficient contribution to the Hessian diagonal of reaction `irxn`:
///
/// d ln(gamma_k)/d n_k + SUM_{l,c same phase} sc_c sc_l d ln(gamma_c)/d n_l
///   + SUM_{l in phase of k} sc_l (d ln(gamma_k)/d n_l + d ln(gamma_l)/d n_k)
///
/// Only components of multispecies phases take part, the work is O(n_components^2) per reaction.
pub fn hessian_act_coeff_diag(state: &EquilibriumState, irxn: usize) -> f64 {
    let kspec = state.rxn_species[irxn];
    let kph = state.species_phase[kspec];
    let jac = &state.dln_act_coeff_dn;
    let mut s = jac[(kspec, kspec)];
    for l in 0..state.n_components {
        if state.single_species[l] {
            continue;
        }
        let lph = state.species_phase[l];
        let sc_l = state.stoich[(irxn, l)];
        for c in 0..state.n_components {
            if state.species_phase[c] == lph {
                s += state.stoich[(irxn, c)] * sc_l * jac[(c, l)];
            }
        }
        if kph == lph {
            s += sc_l * (jac[(kspec, l)] + jac[(l, kspec)]);
        }
    }
    s
}

/// Adds the activity coefficient correction to an ideal Hessian diagonal without letting it lose
/// positive curvature: a positive correction is always added, a negative one is added while it
/// removes less than `clamp` of the ideal value, otherwise exactly `clamp * ideal` is removed.
///
/// # Panics
/// if `hessian_diag_ideal <= 0`: the caller built a corrupt curvature estimate and the
/// calculation cannot go on
pub fn hessian_diag_adj_with(hessian_diag_ideal: f64, hess_act_coef: f64, clamp: f64) -> f64 {
    if !(hessian_diag_ideal > 0.0) {
        error!(
            "ideal Hessian diagonal must be positive, got {}",
            hessian_diag_ideal
        );
        panic!(
            "ideal Hessian diagonal must be positive, got {}",
            hessian_diag_ideal
        );
    }
    let mut diag = hessian_diag_ideal;
    if hess_act_coef >= 0.0 {
        diag += hess_act_coef;
    } else if hess_act_coef.abs() < clamp * hessian_diag_ideal {
        diag += hess_act_coef;
    } else {
        diag -= clamp * hessian_diag_ideal;
    }
    diag
}

impl<O: VcsObserver> ReactionAdjuster<O> {
    /// Hessian diagonal of reaction `irxn` corrected for nonideality, see
    /// [`hessian_diag_adj_with`]. Uses the Jacobian stored in `state`, which must be refreshed
    /// by the caller.
    pub fn hessian_diag_adj(
        &self,
        state: &EquilibriumState,
        irxn: usize,
        hessian_diag_ideal: f64,
    ) -> f64 {
        let hess_act_coef = hessian_act_coeff_diag(state, irxn);
        hessian_diag_adj_with(hessian_diag_ideal, hess_act_coef, self.settings.hessian_clamp)
    }
}
