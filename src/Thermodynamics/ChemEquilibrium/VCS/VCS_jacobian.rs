use super::VCS_phase_models::{PhaseModel, VolPhase};
use super::VCS_state::EquilibriumState;
use nalgebra::DMatrix;

/// Rebuilds the global matrix d ln(gamma_i)/d n_j at mole numbers `moles`: every multispecies phase
/// updates its local block and scatters it to the rows and columns of its species. Single species
/// phases are skipped, their rows and columns stay zero.
pub fn calc_ln_act_coeff_jac(phases: &mut [VolPhase], moles: &[f64], jac: &mut DMatrix<f64>) {
    jac.fill(0.0);
    for phase in phases.iter_mut() {
        if !phase.is_single_species() {
            phase.update_ln_act_coeff_jac(moles);
            phase.send_to_ln_act_coeff_jac(jac);
        }
    }
}

impl EquilibriumState {
    /// refreshes `dln_act_coeff_dn` at the current mole numbers
    pub fn update_ln_act_coeff_jac(&mut self) {
        calc_ln_act_coeff_jac(
            &mut self.phases,
            self.moles.as_slice(),
            &mut self.dln_act_coeff_dn,
        );
    }
}
