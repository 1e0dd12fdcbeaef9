use crate::Thermodynamics::ChemEquilibrium::VCS::VCS_observer::{LogObserver, VcsObserver};
use crate::Thermodynamics::ChemEquilibrium::VCS::VCS_phase_models::{
    IdealSolution, PureSubstance, RegularSolution, VolPhase,
};
use crate::Thermodynamics::ChemEquilibrium::VCS::VCS_rxn_adj::{ReactionAdjuster, RxnAdjOutcome};
use crate::Thermodynamics::ChemEquilibrium::VCS::VCS_settings::VcsSettings;
use crate::Thermodynamics::ChemEquilibrium::VCS::VCS_state::EquilibriumState;
use log::{info, warn};
use nalgebra::DMatrix;
use prettytable::{Table, row};

/// largest fraction of `dx` that keeps every species of reaction `irxn` at positive moles
fn feasible_fraction(state: &EquilibriumState, irxn: usize, dx: f64) -> f64 {
    let mut fraction: f64 = 1.0;
    let kspec = state.rxn_species[irxn];
    let mut limit = |n: f64, dn: f64| {
        if dn < 0.0 && n + dn <= 0.0 {
            fraction = fraction.min(0.99 * n / -dn);
        }
    };
    limit(state.moles[kspec], dx);
    for c in 0..state.n_components {
        limit(state.moles[c], state.stoich[(irxn, c)] * dx);
    }
    fraction
}

fn print_state(state: &EquilibriumState, names: &[&str]) {
    let mut table = Table::new();
    table.add_row(row!["Reaction", "Species", "dG/RT", "Step", "Moles"]);
    for irxn in 0..state.n_rxn {
        let kspec = state.rxn_species[irxn];
        table.add_row(row![
            irxn,
            names[kspec],
            format!("{:.4e}", state.delta_g[irxn]),
            format!("{:.4e}", state.step[kspec]),
            format!("{:.6}", state.moles[kspec])
        ]);
    }
    for c in 0..state.n_components {
        table.add_row(row!["component", names[c], "", "", format!("{:.6}", state.moles[c])]);
    }
    table.printstd();
}

/// A crude outer loop around the reaction adjustment: refresh the nonideal data and dG, compute
/// the adjustments, apply them one reaction at a time. Stops when the basis has to be recomputed,
/// that is out of the scope of this demonstration.
fn run_outer_loop<O: VcsObserver>(
    state: &mut EquilibriumState,
    adjuster: &mut ReactionAdjuster<O>,
    max_iterations: usize,
    tolerance: f64,
) -> usize {
    for iteration in 0..max_iterations {
        if adjuster.settings.use_act_coeff_jac {
            state.update_ln_act_coeff_jac();
        }
        adjuster.refresh_delta_g(state);
        let max_dg = state
            .delta_g
            .iter()
            .zip(state.rxn_species.iter())
            .filter(|(_, k)| state.moles[**k] > 0.0)
            .map(|(dg, _)| dg.abs())
            .fold(0.0, f64::max);
        if max_dg < tolerance {
            info!("converged after {} iterations, max |dG| = {:e}", iteration, max_dg);
            return iteration;
        }
        state.step.fill(0.0);
        let outcome = adjuster.rxn_adj(state);
        if let RxnAdjOutcome::BasisDisrupted { kind, species } = outcome {
            warn!(
                "species {} deleted ({:?}), the component basis must be recomputed",
                species, kind
            );
            return iteration;
        }
        for irxn in 0..state.n_rxn {
            let kspec = state.rxn_species[irxn];
            let dx = state.step[kspec];
            let dx = dx * feasible_fraction(state, irxn, dx);
            state.apply_step(irxn, dx);
        }
    }
    max_iterations
}

pub fn vcs_examples(task: usize) {
    match task {
        0 => {
            // graphite combustion: C(s) and O2 are the components, CO2 and CO are formed from them
            let names = ["C(s)", "O2", "CO2", "CO"];
            let phases: Vec<VolPhase> = vec![
                PureSubstance::new(0).into(),
                IdealSolution::new(vec![1, 2, 3]).into(),
            ];
            // CO2 = C + O2, CO = C + 1/2 O2
            let stoich = DMatrix::from_row_slice(2, 2, &[-1.0, -1.0, -1.0, -0.5]);
            // G0/RT at 1000 K
            let mu0 = vec![0.0, 0.0, -47.6, -24.1];
            let mut state =
                EquilibriumState::new(phases, mu0, stoich, 2, vec![2.0, 1.0, 1e-3, 1e-3])
                    .expect("valid state");
            let settings = VcsSettings {
                use_line_search: true,
                ..VcsSettings::default()
            };
            let mut adjuster =
                ReactionAdjuster::new(settings, &state, LogObserver).expect("valid settings");
            let g0 = state.total_gibbs();
            let iterations = run_outer_loop(&mut state, &mut adjuster, 200, 1e-8);
            println!(
                "G/RT: {:.6} -> {:.6} in {} iterations",
                g0,
                state.total_gibbs(),
                iterations
            );
            print_state(&state, &names);
        }
        1 => {
            // nonideal liquid: A and its isomer B in a regular solution,
            // A also crystallizes as a pure solid
            let names = ["A(l)", "B(l)", "A(s)"];
            let phases: Vec<VolPhase> = vec![
                RegularSolution::binary([0, 1], 1.5).into(),
                PureSubstance::new(2).into(),
            ];
            let stoich = DMatrix::from_row_slice(2, 1, &[-1.0, -1.0]);
            let mu0 = vec![0.0, 0.3, 0.2];
            let mut state = EquilibriumState::new(phases, mu0, stoich, 1, vec![1.0, 0.5, 0.5])
                .expect("valid state");
            let mut adjuster = ReactionAdjuster::new(VcsSettings::nonideal(), &state, LogObserver)
                .expect("valid settings");
            let g0 = state.total_gibbs();
            let iterations = run_outer_loop(&mut state, &mut adjuster, 200, 1e-8);
            println!(
                "G/RT: {:.6} -> {:.6} in {} iterations",
                g0,
                state.total_gibbs(),
                iterations
            );
            print_state(&state, &names);
        }
        _ => {
            println!("no such task: {}", task);
        }
    }
}
