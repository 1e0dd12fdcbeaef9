/// error types of the VCS core
pub mod VCS_errors;
/// numerical constants, JSON configuration
pub mod VCS_settings;
/// observers of the decisions taken by the reaction adjustment and the line search
pub mod VCS_observer;
/// activity coefficient models of phases
pub mod VCS_phase_models;
/// mole numbers, phases, stoichiometry: the state passed into every call
pub mod VCS_state;
/// activity coefficient Jacobian assembly
pub mod VCS_jacobian;
/// dG of one reaction at arbitrary mole numbers
pub mod VCS_deltaG;
/// Hessian diagonal, ideal part and nonideal correction
pub mod VCS_hessian;
/// reaction adjustment step of the VCS method
/// # Examples
/// ```
/// use vcs_equilibrium::Thermodynamics::ChemEquilibrium::VCS::VCS_phase_models::{
///     IdealSolution, PureSubstance, VolPhase,
/// };
/// use vcs_equilibrium::Thermodynamics::ChemEquilibrium::VCS::VCS_state::EquilibriumState;
/// use vcs_equilibrium::Thermodynamics::ChemEquilibrium::VCS::VCS_rxn_adj::ReactionAdjuster;
/// use nalgebra::DMatrix;
/// // species: 0 - C(s) (component), 1 - O2 (component), 2 - CO2 (noncomponent)
/// // CO2 = C + O2, so the component coefficients of its formation reaction are -1, -1
/// let phases: Vec<VolPhase> = vec![
///     PureSubstance::new(0).into(),
///     IdealSolution::new(vec![1, 2]).into(),
/// ];
/// let stoich = DMatrix::from_row_slice(1, 2, &[-1.0, -1.0]);
/// let mut state =
///     EquilibriumState::new(phases, vec![0.0, 0.0, -160.0], stoich, 2, vec![1.0, 1.0, 0.1])
///         .unwrap();
/// let mut adjuster = ReactionAdjuster::with_defaults(&state);
/// adjuster.refresh_delta_g(&mut state);
/// assert!(state.delta_g[0] < 0.0);
/// let outcome = adjuster.rxn_adj(&mut state);
/// assert_eq!(outcome.code(), 0);
/// // CO2 should be formed
/// assert!(state.step[2] > 0.0);
/// ```
pub mod VCS_rxn_adj;
/// line search safeguarding the sign of dG along a reaction
pub mod VCS_line_search;
