/// module for classical thermodynamics and chemical equilibrium
pub mod ChemEquilibrium;
