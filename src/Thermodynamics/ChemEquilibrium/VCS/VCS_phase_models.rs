//! Thermodynamic models of the phases taking part in the equilibrium problem.
//!
//! The reaction adjustment core only consumes what a phase model exposes: the logarithms of the
//! activity coefficients of its species and the derivatives of those logarithms with respect to the
//! species mole numbers. Every model works with global species indices, so a phase knows where its
//! species live in the full mole number vector and scatters its local Jacobian block there.
use super::VCS_errors::{VcsError, VcsResult};
use enum_dispatch::enum_dispatch;
use nalgebra::DMatrix;

/// interface of a phase as seen from the VCS core
#[enum_dispatch]
pub trait PhaseModel {
    /// global indices of the species of the phase
    fn species(&self) -> &[usize];
    /// single species phases have an activity coefficient identically equal to 1
    fn is_single_species(&self) -> bool;
    /// writes ln(gamma) of the species of the phase into `ln_ac` (global indexing)
    fn ln_act_coeffs(&self, moles: &[f64], ln_ac: &mut [f64]);
    /// recalculates the local block d ln(gamma_i)/d n_j for the species of the phase
    fn update_ln_act_coeff_jac(&mut self, moles: &[f64]);
    /// scatters the local block into the global species-by-species matrix
    fn send_to_ln_act_coeff_jac(&self, jac: &mut DMatrix<f64>);
}

/// phase model: pure substance, solid or liquid, or any other single species phase
#[derive(Debug, Clone)]
#[enum_dispatch(PhaseModel)]
pub enum VolPhase {
    PureSubstance(PureSubstance),
    IdealSolution(IdealSolution),
    RegularSolution(RegularSolution),
}

/// total moles of the given species
fn phase_total(species: &[usize], moles: &[f64]) -> f64 {
    species.iter().map(|&k| moles[k]).sum()
}

fn scatter_block(species: &[usize], block: &DMatrix<f64>, jac: &mut DMatrix<f64>) {
    for (i, &k) in species.iter().enumerate() {
        for (j, &l) in species.iter().enumerate() {
            jac[(k, l)] = block[(i, j)];
        }
    }
}
////////////////////////////////////////////////////////////////////////////////////////////
#[derive(Debug, Clone)]
pub struct PureSubstance {
    species: [usize; 1],
}

impl PureSubstance {
    pub fn new(species: usize) -> Self {
        Self { species: [species] }
    }
}

impl PhaseModel for PureSubstance {
    fn species(&self) -> &[usize] {
        &self.species
    }
    fn is_single_species(&self) -> bool {
        true
    }
    fn ln_act_coeffs(&self, _moles: &[f64], ln_ac: &mut [f64]) {
        ln_ac[self.species[0]] = 0.0;
    }
    fn update_ln_act_coeff_jac(&mut self, _moles: &[f64]) {}
    fn send_to_ln_act_coeff_jac(&self, _jac: &mut DMatrix<f64>) {}
}
////////////////////////////////////////////////////////////////////////////////////////////
/// ideal mixture of several species (gas or ideal solution)
#[derive(Debug, Clone)]
pub struct IdealSolution {
    species: Vec<usize>,
    jac: DMatrix<f64>,
}

impl IdealSolution {
    pub fn new(species: Vec<usize>) -> Self {
        let n = species.len();
        Self {
            species,
            jac: DMatrix::zeros(n, n),
        }
    }
}

impl PhaseModel for IdealSolution {
    fn species(&self) -> &[usize] {
        &self.species
    }
    fn is_single_species(&self) -> bool {
        false
    }
    fn ln_act_coeffs(&self, _moles: &[f64], ln_ac: &mut [f64]) {
        for &k in &self.species {
            ln_ac[k] = 0.0;
        }
    }
    fn update_ln_act_coeff_jac(&mut self, _moles: &[f64]) {
        self.jac.fill(0.0);
    }
    fn send_to_ln_act_coeff_jac(&self, jac: &mut DMatrix<f64>) {
        scatter_block(&self.species, &self.jac, jac);
    }
}
////////////////////////////////////////////////////////////////////////////////////////////
/// Symmetric regular (Margules type) solution. With mole fractions x, the dimensionless
/// interaction matrix W (W_ii = 0), a_i = SUM_j W_ij x_j and q = 1/2 SUM_j x_j a_j:
///
/// ln(gamma_i) = a_i - q
///
/// d ln(gamma_i)/d n_l = (W_il - a_i - a_l + 2q)/N
///
/// for a binary mixture this is ln(gamma_1) = W_12 x_2^2, ln(gamma_2) = W_12 x_1^2
#[derive(Debug, Clone)]
pub struct RegularSolution {
    species: Vec<usize>,
    /// interaction parameters divided by RT
    pub interaction: DMatrix<f64>,
    jac: DMatrix<f64>,
}

impl RegularSolution {
    pub fn new(species: Vec<usize>, interaction: DMatrix<f64>) -> VcsResult<Self> {
        let n = species.len();
        if interaction.nrows() != n || interaction.ncols() != n {
            return Err(VcsError::DimensionMismatch(format!(
                "interaction matrix of a {}-species regular solution is {}x{}",
                n,
                interaction.nrows(),
                interaction.ncols()
            )));
        }
        for i in 0..n {
            if interaction[(i, i)] != 0.0 {
                return Err(VcsError::InvalidComposition(format!(
                    "diagonal of the interaction matrix must be zero, W[{},{}] = {}",
                    i,
                    i,
                    interaction[(i, i)]
                )));
            }
            for j in 0..i {
                if (interaction[(i, j)] - interaction[(j, i)]).abs() > 1e-12 {
                    return Err(VcsError::InvalidComposition(format!(
                        "interaction matrix is not symmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }
        Ok(Self {
            species,
            interaction,
            jac: DMatrix::zeros(n, n),
        })
    }
    /// binary solution with a single Margules parameter
    pub fn binary(species: [usize; 2], w12: f64) -> Self {
        let interaction = DMatrix::from_row_slice(2, 2, &[0.0, w12, w12, 0.0]);
        Self {
            species: species.to_vec(),
            interaction,
            jac: DMatrix::zeros(2, 2),
        }
    }
    /// a_i, without allocation
    fn a(&self, i: usize, moles: &[f64], total: f64) -> f64 {
        self.species
            .iter()
            .enumerate()
            .map(|(j, &l)| self.interaction[(i, j)] * moles[l] / total)
            .sum()
    }
    fn q(&self, moles: &[f64], total: f64) -> f64 {
        0.5 * self
            .species
            .iter()
            .enumerate()
            .map(|(j, &l)| moles[l] / total * self.a(j, moles, total))
            .sum::<f64>()
    }
}

impl PhaseModel for RegularSolution {
    fn species(&self) -> &[usize] {
        &self.species
    }
    fn is_single_species(&self) -> bool {
        false
    }
    fn ln_act_coeffs(&self, moles: &[f64], ln_ac: &mut [f64]) {
        let total = phase_total(&self.species, moles);
        if total <= 0.0 {
            for &k in &self.species {
                ln_ac[k] = 0.0;
            }
            return;
        }
        let q = self.q(moles, total);
        for (i, &k) in self.species.iter().enumerate() {
            ln_ac[k] = self.a(i, moles, total) - q;
        }
    }
    fn update_ln_act_coeff_jac(&mut self, moles: &[f64]) {
        let total = phase_total(&self.species, moles);
        if total <= 0.0 {
            self.jac.fill(0.0);
            return;
        }
        let q = self.q(moles, total);
        let n = self.species.len();
        for i in 0..n {
            let a_i = self.a(i, moles, total);
            for l in 0..n {
                let a_l = self.a(l, moles, total);
                self.jac[(i, l)] = (self.interaction[(i, l)] - a_i - a_l + 2.0 * q) / total;
            }
        }
    }
    fn send_to_ln_act_coeff_jac(&self, jac: &mut DMatrix<f64>) {
        scatter_block(&self.species, &self.jac, jac);
    }
}
