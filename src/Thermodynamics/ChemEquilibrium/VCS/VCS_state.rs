//! # Equilibrium state
//!
//! The mutable state of a VCS equilibrium calculation: mole numbers of all species, phase totals,
//! the stoichiometric description of the formation reactions of noncomponent species in terms of
//! the component basis, the dG residuals and reaction adjustments, and the activity coefficient
//! Jacobian. The outer solver owns one value of this type for the whole run and passes it by
//! reference into every entry point of the reaction adjustment core; nothing here is resized
//! after construction.
//!
//! ## Indexing
//! * species `0..n_components` are the components, species `n_components..n_species` are the
//!   noncomponents
//! * reaction `irxn` forms noncomponent species `rxn_species[irxn] = irxn + n_components`
//! * `stoich[(irxn, c)]` is the coefficient of component `c` in reaction `irxn`, so that
//!   dG_irxn = mu_k + SUM_c stoich[(irxn, c)] * mu_c
//!
//! All chemical potentials are dimensionless (divided by RT).
use super::VCS_errors::{VcsError, VcsResult};
use super::VCS_phase_models::{PhaseModel, VolPhase};
use nalgebra::{DMatrix, DVector};
use std::fmt;

/// mole fraction used in ln(x) for species with (practically) zero moles
pub const VCS_DELETE_MINORSPECIES_CUTOFF: f64 = 1.0e-140;

/// status of a noncomponent species, decides whether its reaction is worth adjusting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesStatus {
    Major,
    Minor,
    Zeroed,
}

impl SpeciesStatus {
    pub fn is_minor_or_zeroed(&self) -> bool {
        matches!(self, SpeciesStatus::Minor | SpeciesStatus::Zeroed)
    }
}

impl fmt::Display for SpeciesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeciesStatus::Major => write!(f, "MAJOR"),
            SpeciesStatus::Minor => write!(f, "MINOR"),
            SpeciesStatus::Zeroed => write!(f, "ZEROED"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EquilibriumState {
    pub n_species: usize,
    pub n_components: usize,
    /// number of formation reactions = number of noncomponent species
    pub n_rxn: usize,
    pub phases: Vec<VolPhase>,
    /// standard chemical potentials mu0/RT
    pub standard_chem_pot: DVector<f64>,
    /// mole numbers of species
    pub moles: DVector<f64>,
    /// total moles of every phase
    pub phase_moles: DVector<f64>,
    /// phase of every species
    pub species_phase: Vec<usize>,
    /// true if the species is alone in its phase
    pub single_species: Vec<bool>,
    /// stoichiometric coefficients of components, rows are reactions
    pub stoich: DMatrix<f64>,
    /// noncomponent species formed by every reaction
    pub rxn_species: Vec<usize>,
    /// dG of every reaction
    pub delta_g: DVector<f64>,
    /// reaction adjustments, indexed by species
    pub step: DVector<f64>,
    /// net change of phase moles per unit extent of reaction, rows are reactions
    pub dn_phase: DMatrix<f64>,
    /// phases that contain species taking part in a reaction, rows are reactions
    pub phase_participation: Vec<Vec<bool>>,
    /// status of every noncomponent species, indexed by reaction
    pub status: Vec<SpeciesStatus>,
    /// number of reactions whose species are minor or zeroed
    pub num_rxn_minor_zeroed: usize,
    /// d ln(gamma_i)/d n_j
    pub dln_act_coeff_dn: DMatrix<f64>,
}

impl EquilibriumState {
    /// builds a validated state and derives the stoichiometric bookkeeping from the phase list
    ///
    /// # Arguments
    /// * `phases` - phase models, every species must belong to exactly one of them
    /// * `standard_chem_pot` - mu0/RT of every species
    /// * `stoich` - (n_species - n_components) x n_components matrix of component coefficients
    /// * `n_components` - size of the component basis, the first species of the problem
    /// * `moles` - initial mole numbers
    pub fn new(
        phases: Vec<VolPhase>,
        standard_chem_pot: Vec<f64>,
        stoich: DMatrix<f64>,
        n_components: usize,
        moles: Vec<f64>,
    ) -> VcsResult<Self> {
        let n_species = moles.len();
        if standard_chem_pot.len() != n_species {
            return Err(VcsError::DimensionMismatch(format!(
                "{} standard chemical potentials for {} species",
                standard_chem_pot.len(),
                n_species
            )));
        }
        if n_components > n_species {
            return Err(VcsError::DimensionMismatch(format!(
                "{} components for {} species",
                n_components, n_species
            )));
        }
        let n_rxn = n_species - n_components;
        if stoich.nrows() != n_rxn || stoich.ncols() != n_components {
            return Err(VcsError::DimensionMismatch(format!(
                "stoichiometric matrix is {}x{}, expected {}x{}",
                stoich.nrows(),
                stoich.ncols(),
                n_rxn,
                n_components
            )));
        }
        if let Some((k, n)) = moles
            .iter()
            .enumerate()
            .find(|(_, n)| !n.is_finite() || **n < 0.0)
        {
            return Err(VcsError::InvalidComposition(format!(
                "species {} has mole number {}",
                k, n
            )));
        }
        // species -> phase map, every species exactly once
        let mut species_phase: Vec<Option<usize>> = vec![None; n_species];
        for (iphase, phase) in phases.iter().enumerate() {
            if phase.species().is_empty() {
                return Err(VcsError::InvalidComposition(format!(
                    "phase {} has no species",
                    iphase
                )));
            }
            for &k in phase.species() {
                if k >= n_species {
                    return Err(VcsError::DimensionMismatch(format!(
                        "phase {} refers to species {} of {}",
                        iphase, k, n_species
                    )));
                }
                if let Some(other) = species_phase[k] {
                    return Err(VcsError::InvalidComposition(format!(
                        "species {} belongs to phases {} and {}",
                        k, other, iphase
                    )));
                }
                species_phase[k] = Some(iphase);
            }
        }
        let species_phase: Vec<usize> = species_phase
            .into_iter()
            .enumerate()
            .map(|(k, p)| {
                p.ok_or_else(|| {
                    VcsError::InvalidComposition(format!("species {} belongs to no phase", k))
                })
            })
            .collect::<VcsResult<_>>()?;
        let single_species: Vec<bool> = species_phase
            .iter()
            .map(|&p| phases[p].is_single_species())
            .collect();

        let n_phases = phases.len();
        let rxn_species: Vec<usize> = (0..n_rxn).map(|irxn| irxn + n_components).collect();
        let mut dn_phase: DMatrix<f64> = DMatrix::zeros(n_rxn, n_phases);
        let mut phase_participation = vec![vec![false; n_phases]; n_rxn];
        for irxn in 0..n_rxn {
            let kspec = rxn_species[irxn];
            let kph = species_phase[kspec];
            dn_phase[(irxn, kph)] += 1.0;
            phase_participation[irxn][kph] = true;
            for c in 0..n_components {
                let coeff = stoich[(irxn, c)];
                if coeff != 0.0 {
                    let cph = species_phase[c];
                    dn_phase[(irxn, cph)] += coeff;
                    phase_participation[irxn][cph] = true;
                }
            }
        }
        let status: Vec<SpeciesStatus> = rxn_species
            .iter()
            .map(|&k| {
                if moles[k] > 0.0 {
                    SpeciesStatus::Major
                } else {
                    SpeciesStatus::Zeroed
                }
            })
            .collect();
        let num_rxn_minor_zeroed = status.iter().filter(|s| s.is_minor_or_zeroed()).count();

        let mut state = Self {
            n_species,
            n_components,
            n_rxn,
            phases,
            standard_chem_pot: DVector::from_vec(standard_chem_pot),
            moles: DVector::from_vec(moles),
            phase_moles: DVector::zeros(n_phases),
            species_phase,
            single_species,
            stoich,
            rxn_species,
            delta_g: DVector::zeros(n_rxn),
            step: DVector::zeros(n_species),
            dn_phase,
            phase_participation,
            status,
            num_rxn_minor_zeroed,
            dln_act_coeff_dn: DMatrix::zeros(n_species, n_species),
        };
        state.recompute_phase_moles();
        Ok(state)
    }

    pub fn n_phases(&self) -> usize {
        self.phases.len()
    }
    /// phase totals from the member species
    pub fn recompute_phase_moles(&mut self) {
        for (iphase, phase) in self.phases.iter().enumerate() {
            self.phase_moles[iphase] = phase.species().iter().map(|&k| self.moles[k]).sum();
        }
    }
    /// true if every phase total equals the sum of moles of its species within `tol`
    pub fn phase_moles_consistent(&self, tol: f64) -> bool {
        self.phases.iter().enumerate().all(|(iphase, phase)| {
            let sum: f64 = phase.species().iter().map(|&k| self.moles[k]).sum();
            (sum - self.phase_moles[iphase]).abs() <= tol
        })
    }

    /// Chemical potentials (mu/RT) of the species of phase `iphase` at mole numbers `moles`.
    ///
    /// Single species phases get mu = mu0. Species of multispecies phases get
    /// mu = mu0 + ln(gamma) + ln(x), the phase total is recomputed from `moles`.
    /// Activity coefficients go to `ac`, potentials to `mu`; both are indexed by species
    /// and only the entries of this phase are written.
    pub fn chem_pot_phase(&self, iphase: usize, moles: &[f64], ac: &mut [f64], mu: &mut [f64]) {
        let phase = &self.phases[iphase];
        if phase.is_single_species() {
            for &k in phase.species() {
                ac[k] = 1.0;
                mu[k] = self.standard_chem_pot[k];
            }
            return;
        }
        phase.ln_act_coeffs(moles, ac);
        let total: f64 = phase.species().iter().map(|&k| moles[k]).sum();
        for &k in phase.species() {
            let ln_ac = ac[k];
            let x = if total > 0.0 {
                moles[k].max(VCS_DELETE_MINORSPECIES_CUTOFF) / total
            } else {
                VCS_DELETE_MINORSPECIES_CUTOFF
            };
            mu[k] = self.standard_chem_pot[k] + ln_ac + x.ln();
            ac[k] = ln_ac.exp();
        }
    }

    /// Total Gibbs free energy G/RT = SUM_i n_i mu_i at the current mole numbers.
    /// Allocates its own buffers, meant for diagnostics and tests rather than the inner loop.
    pub fn total_gibbs(&self) -> f64 {
        let mut ac = vec![1.0; self.n_species];
        let mut mu = vec![0.0; self.n_species];
        let moles = self.moles.as_slice();
        for iphase in 0..self.n_phases() {
            self.chem_pot_phase(iphase, moles, &mut ac, &mut mu);
        }
        moles
            .iter()
            .zip(mu.iter())
            .filter(|(n, _)| **n > 0.0)
            .map(|(n, m)| n * m)
            .sum()
    }

    /// Applies an accepted extent `dx` of reaction `irxn` to the mole numbers of the noncomponent
    /// species and of the components, keeping the phase totals in step.
    pub fn apply_step(&mut self, irxn: usize, dx: f64) {
        if dx == 0.0 {
            return;
        }
        let kspec = self.rxn_species[irxn];
        self.moles[kspec] += dx;
        self.phase_moles[self.species_phase[kspec]] += dx;
        for c in 0..self.n_components {
            let dn = dx * self.stoich[(irxn, c)];
            self.moles[c] += dn;
            self.phase_moles[self.species_phase[c]] += dn;
        }
    }
}
