/// VCS (Villars-Cruise-Smith) stoichiometric method of multiphase chemical equilibrium: the
/// reaction adjustment step, nonideal Hessian corrections and line search
pub mod VCS;
