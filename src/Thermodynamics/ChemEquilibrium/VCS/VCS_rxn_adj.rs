//! # Reaction adjustments
//!
//! For every formation reaction of a noncomponent species a step along the reaction is computed
//! from a diagonal model of the Hessian of the Gibbs free energy (equation 6.4-16 of Smith and
//! Missen). Reactions that run entirely among single species phases have no curvature; they are
//! followed exactly until the first participating species runs out, that species is deleted and
//! the pass stops, because the component basis has to be selected anew.
//!
//! The step never goes against the steepest descent direction of the reaction: dG > 0 always gives
//! a negative extent and dG < 0 a positive one.
use super::VCS_errors::VcsResult;
use super::VCS_hessian::ideal_hessian_diag;
use super::VCS_observer::{LogObserver, RxnEvent, VcsObserver};
use super::VCS_settings::VcsSettings;
use super::VCS_state::{EquilibriumState, SpeciesStatus};
use log::info;

/// which kind of species was deleted by the single species phase branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisDisruption {
    NoncomponentZeroed,
    ComponentZeroed,
}

/// result of adjusting one reaction or a whole pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxnAdjOutcome {
    Continue,
    /// species `species` was zeroed out, the component basis must be recomputed before the next
    /// iteration
    BasisDisrupted { kind: BasisDisruption, species: usize },
}

impl RxnAdjOutcome {
    /// 0 - normal return, 1 - a noncomponent single species phase species was zeroed,
    /// 2 - a component was zeroed
    pub fn code(&self) -> i32 {
        match self {
            RxnAdjOutcome::Continue => 0,
            RxnAdjOutcome::BasisDisrupted {
                kind: BasisDisruption::NoncomponentZeroed,
                ..
            } => 1,
            RxnAdjOutcome::BasisDisrupted {
                kind: BasisDisruption::ComponentZeroed,
                ..
            } => 2,
        }
    }
    pub fn is_disrupted(&self) -> bool {
        matches!(self, RxnAdjOutcome::BasisDisrupted { .. })
    }
}

/// scratch space sized once for the problem
#[derive(Debug, Clone)]
pub struct VcsWorkspace {
    /// activity coefficients at the base point
    pub act_coeff_base: Vec<f64>,
    /// activity coefficients at trial points
    pub act_coeff: Vec<f64>,
    /// trial mole numbers of the line search
    pub trial_moles: Vec<f64>,
    /// chemical potentials at the base point
    pub fe_species_old: Vec<f64>,
    /// chemical potentials at trial points
    pub fe_species_new: Vec<f64>,
}

impl VcsWorkspace {
    pub fn new(n_species: usize) -> Self {
        Self {
            act_coeff_base: vec![1.0; n_species],
            act_coeff: vec![1.0; n_species],
            trial_moles: vec![0.0; n_species],
            fe_species_old: vec![0.0; n_species],
            fe_species_new: vec![0.0; n_species],
        }
    }
}

/// Reaction adjustment step of the VCS method: holds the settings, the observer of decisions and
/// the scratch buffers; the equilibrium state is passed into every call.
#[derive(Debug, Clone)]
pub struct ReactionAdjuster<O: VcsObserver = LogObserver> {
    pub settings: VcsSettings,
    pub observer: O,
    pub(crate) workspace: VcsWorkspace,
}

impl ReactionAdjuster<LogObserver> {
    /// default settings, decisions go to the log
    pub fn with_defaults(state: &EquilibriumState) -> Self {
        Self {
            settings: VcsSettings::default(),
            observer: LogObserver,
            workspace: VcsWorkspace::new(state.n_species),
        }
    }
}

impl<O: VcsObserver> ReactionAdjuster<O> {
    pub fn new(settings: VcsSettings, state: &EquilibriumState, observer: O) -> VcsResult<Self> {
        settings.validate()?;
        info!(
            "reaction adjuster for {} species, {} components, {} phases",
            state.n_species,
            state.n_components,
            state.n_phases()
        );
        Ok(Self {
            settings,
            observer,
            workspace: VcsWorkspace::new(state.n_species),
        })
    }

    /// Calculates the adjustments of all reactions in index order and stores them in
    /// `state.step`. Stops at the first reaction that deletes a single species phase species.
    pub fn rxn_adj(&mut self, state: &mut EquilibriumState) -> RxnAdjOutcome {
        for irxn in 0..state.n_rxn {
            let outcome = self.adjust_reaction(state, irxn);
            if outcome.is_disrupted() {
                return outcome;
            }
        }
        RxnAdjOutcome::Continue
    }

    /// adjustment of reaction `irxn`, written to `state.step[kspec]`
    pub fn adjust_reaction(&mut self, state: &mut EquilibriumState, irxn: usize) -> RxnAdjOutcome {
        let kspec = state.rxn_species[irxn];
        let dg = state.delta_g[irxn];

        if state.moles[kspec] == 0.0 && !state.single_species[kspec] {
            // multispecies phase species with zero moles
            if dg < self.settings.revival_threshold {
                let seed = self.settings.revival_seed;
                state.step[kspec] = seed;
                if state.status[irxn].is_minor_or_zeroed() {
                    state.num_rxn_minor_zeroed = state.num_rxn_minor_zeroed.saturating_sub(1);
                }
                state.status[irxn] = SpeciesStatus::Major;
                self.observer
                    .on_reaction(irxn, kspec, &RxnEvent::Revived { dg, seed });
            } else {
                state.step[kspec] = 0.0;
                self.observer
                    .on_reaction(irxn, kspec, &RxnEvent::StillDead { dg });
            }
            return RxnAdjOutcome::Continue;
        }
        if dg.abs() <= self.settings.tol_major {
            state.step[kspec] = 0.0;
            self.observer
                .on_reaction(irxn, kspec, &RxnEvent::Converged { dg });
            return RxnAdjOutcome::Continue;
        }
        // minor or nonexistent species would only go further down
        if state.status[irxn].is_minor_or_zeroed() && dg >= 0.0 {
            state.step[kspec] = 0.0;
            let status = state.status[irxn];
            self.observer
                .on_reaction(irxn, kspec, &RxnEvent::SkippedMinor { status, dg });
            return RxnAdjOutcome::Continue;
        }

        let s = ideal_hessian_diag(state, irxn);
        if s != 0.0 {
            let mut s = s;
            if self.settings.use_act_coeff_jac && s > 0.0 {
                s = self.hessian_diag_adj(state, irxn, s);
            }
            let mut ds = -dg / s;
            if self.settings.use_line_search {
                ds = self.line_search(state, irxn, ds);
            }
            state.step[kspec] = ds;
            self.observer.on_reaction(
                irxn,
                kspec,
                &RxnEvent::NewtonStep {
                    hessian_diag: s,
                    step: ds,
                },
            );
            return RxnAdjOutcome::Continue;
        }
        self.eliminate_single_species_phase(state, irxn)
    }

    /// The reaction runs entirely among single species phases. Either its own species or one of
    /// the component phases disappears; the sign of dG gives the direction and the reaction is
    /// followed until the first species runs out.
    fn eliminate_single_species_phase(
        &mut self,
        state: &mut EquilibriumState,
        irxn: usize,
    ) -> RxnAdjOutcome {
        let kspec = state.rxn_species[irxn];
        let dg = state.delta_g[irxn];
        state.step[kspec] = 0.0;

        let mut bound: Option<(f64, usize)> = None;
        if dg > 0.0 {
            let mut dss = state.moles[kspec];
            let mut k = kspec;
            for c in 0..state.n_components {
                let sc = state.stoich[(irxn, c)];
                if sc > 0.0 {
                    let xx = state.moles[c] / sc;
                    if xx < dss {
                        dss = xx;
                        k = c;
                    }
                }
            }
            bound = Some((-dss, k));
        } else {
            for c in 0..state.n_components {
                let sc = state.stoich[(irxn, c)];
                if sc < 0.0 {
                    let xx = -state.moles[c] / sc;
                    match bound {
                        Some((dss, _)) if xx >= dss => {}
                        _ => bound = Some((xx, c)),
                    }
                }
            }
        }
        let Some((dss, k)) = bound else {
            self.observer
                .on_reaction(irxn, kspec, &RxnEvent::DegenerateUnbounded { dg });
            return RxnAdjOutcome::Continue;
        };
        if dss == 0.0 {
            self.observer.on_reaction(
                irxn,
                kspec,
                &RxnEvent::DegenerateZeroBound { dg, limiting: k },
            );
            return RxnAdjOutcome::Continue;
        }

        state.moles[kspec] += dss;
        state.phase_moles[state.species_phase[kspec]] += dss;
        for c in 0..state.n_components {
            let dn = dss * state.stoich[(irxn, c)];
            state.moles[c] += dn;
            state.phase_moles[state.species_phase[c]] += dn;
        }
        // remove whatever rounding left of the limiting species from its phase as well
        let residual = state.moles[k];
        state.moles[k] = 0.0;
        state.phase_moles[state.species_phase[k]] -= residual;
        self.observer.on_reaction(
            irxn,
            kspec,
            &RxnEvent::PhaseEliminated {
                zeroed: k,
                extent: dss,
            },
        );
        let kind = if k != kspec {
            BasisDisruption::ComponentZeroed
        } else {
            BasisDisruption::NoncomponentZeroed
        };
        RxnAdjOutcome::BasisDisrupted { kind, species: k }
    }
}
