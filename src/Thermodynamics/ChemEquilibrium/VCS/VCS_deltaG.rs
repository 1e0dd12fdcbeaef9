use super::VCS_observer::VcsObserver;
use super::VCS_rxn_adj::ReactionAdjuster;
use super::VCS_state::EquilibriumState;

/// dG of reaction `irxn` at mole numbers `mol_num`.
///
/// Chemical potentials are recalculated only for the phases taking part in the reaction, with
/// `ac` and `mu` as scratch space (indexed by species). The state itself is not touched.
pub fn delta_g_recalc_rxn(
    state: &EquilibriumState,
    irxn: usize,
    mol_num: &[f64],
    ac: &mut [f64],
    mu: &mut [f64],
) -> f64 {
    let kspec = state.rxn_species[irxn];
    for (iphase, &takes_part) in state.phase_participation[irxn].iter().enumerate() {
        if takes_part {
            state.chem_pot_phase(iphase, mol_num, ac, mu);
        }
    }
    let mut delta_g = mu[kspec];
    for c in 0..state.n_components {
        delta_g += state.stoich[(irxn, c)] * mu[c];
    }
    delta_g
}

impl<O: VcsObserver> ReactionAdjuster<O> {
    /// recalculates dG of every reaction at the current mole numbers of `state`
    pub fn refresh_delta_g(&mut self, state: &mut EquilibriumState) {
        let ws = &mut self.workspace;
        for iphase in 0..state.n_phases() {
            state.chem_pot_phase(
                iphase,
                state.moles.as_slice(),
                &mut ws.act_coeff_base,
                &mut ws.fe_species_old,
            );
        }
        for irxn in 0..state.n_rxn {
            let kspec = state.rxn_species[irxn];
            let mut dg = ws.fe_species_old[kspec];
            for c in 0..state.n_components {
                dg += state.stoich[(irxn, c)] * ws.fe_species_old[c];
            }
            state.delta_g[irxn] = dg;
        }
    }

    /// dG of reaction `irxn` at `mol_num`, using the scratch buffers of the adjuster
    pub fn delta_g_recalc_rxn(
        &mut self,
        state: &EquilibriumState,
        irxn: usize,
        mol_num: &[f64],
    ) -> f64 {
        let ws = &mut self.workspace;
        delta_g_recalc_rxn(
            state,
            irxn,
            mol_num,
            &mut ws.act_coeff,
            &mut ws.fe_species_new,
        )
    }
}
