//! Decision points of the reaction adjustment and of the line search, reported to an observer.
//! Observers see what happened and why; they never change control flow or numbers.
use super::VCS_state::SpeciesStatus;
use log::debug;

/// what the reaction adjustment decided for one reaction
#[derive(Debug, Clone, PartialEq)]
pub enum RxnEvent {
    /// zeroed species of a multispecies phase brought back with a seed mole number
    Revived { dg: f64, seed: f64 },
    /// zeroed species of a multispecies phase left at zero
    StillDead { dg: f64 },
    /// |dG| already below the tolerance
    Converged { dg: f64 },
    /// minor or zeroed species which would only decrease further
    SkippedMinor { status: SpeciesStatus, dg: f64 },
    /// Newton step on the diagonal Hessian model
    NewtonStep { hessian_diag: f64, step: f64 },
    /// reaction among single species phases, species `zeroed` driven to zero moles
    PhaseEliminated { zeroed: usize, extent: f64 },
    /// reaction among single species phases with nothing limiting its extent
    DegenerateUnbounded { dg: f64 },
    /// reaction among single species phases whose `limiting` species is already at zero moles
    DegenerateZeroBound { dg: f64, limiting: usize },
}

/// how the line search ended
#[derive(Debug, Clone, PartialEq)]
pub enum LineSearchEvent {
    /// dG or the proposed step is exactly zero
    ZeroStep,
    /// the proposed step goes uphill
    WrongDirection { dg0: f64, dx: f64 },
    /// dG keeps its sign over the full step
    FullStep { dg0: f64, dg1: f64 },
    /// zero crossing of dG located by linear interpolation
    Interpolated { dx_orig: f64, dx: f64 },
    /// step accepted after `its` halvings
    Bisected { dx_orig: f64, dx: f64, its: usize },
    /// all halvings used, the smallest trial step is returned
    Exhausted { dx_orig: f64, dx: f64 },
}

pub trait VcsObserver {
    fn on_reaction(&mut self, _irxn: usize, _kspec: usize, _event: &RxnEvent) {}
    fn on_line_search(&mut self, _irxn: usize, _event: &LineSearchEvent) {}
}

/// does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObserver;

impl VcsObserver for NoObserver {}

/// forwards every decision to `log::debug!`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl VcsObserver for LogObserver {
    fn on_reaction(&mut self, irxn: usize, kspec: usize, event: &RxnEvent) {
        match event {
            RxnEvent::Revived { dg, seed } => debug!(
                "rxn {} (species {}): MultSpec: come alive DG = {:11.3E}, seed {:E}",
                irxn, kspec, dg, seed
            ),
            RxnEvent::StillDead { dg } => debug!(
                "rxn {} (species {}): MultSpec: still dead DG = {:11.3E}",
                irxn, kspec, dg
            ),
            RxnEvent::Converged { dg } => debug!(
                "rxn {} (species {}): skipped, converged DG = {:11.3E}",
                irxn, kspec, dg
            ),
            RxnEvent::SkippedMinor { status, dg } => debug!(
                "rxn {} (species {}): skipped, status {} and DG = {:11.3E} >= 0",
                irxn, kspec, status, dg
            ),
            RxnEvent::NewtonStep { hessian_diag, step } => debug!(
                "rxn {} (species {}): normal calc, s = {:12.4E}, ds = {:12.4E}",
                irxn, kspec, hessian_diag, step
            ),
            RxnEvent::PhaseEliminated { zeroed, extent } => debug!(
                "rxn {} (species {}): single species phases only, species {} deleted \
                 with extent {:12.4E}, basis must be recomputed",
                irxn, kspec, zeroed, extent
            ),
            RxnEvent::DegenerateUnbounded { dg } => debug!(
                "rxn {} (species {}): single species phases only, no bound on the extent, \
                 DG = {:11.3E}",
                irxn, kspec, dg
            ),
            RxnEvent::DegenerateZeroBound { dg, limiting } => debug!(
                "rxn {} (species {}): single species phases only, species {} already \
                 exhausted, DG = {:11.3E}",
                irxn, kspec, limiting, dg
            ),
        }
    }
    fn on_line_search(&mut self, irxn: usize, event: &LineSearchEvent) {
        match event {
            LineSearchEvent::ZeroStep => debug!("rxn {}: line search, zero step", irxn),
            LineSearchEvent::WrongDirection { dg0, dx } => debug!(
                "rxn {}: step reduced to zero in line search, dx = {:E}, dg = {:E}",
                irxn, dx, dg0
            ),
            LineSearchEvent::FullStep { dg0, dg1 } => {
                debug!("rxn {}: full step accepted, dg {:E} -> {:E}", irxn, dg0, dg1)
            }
            LineSearchEvent::Interpolated { dx_orig, dx }
            | LineSearchEvent::Bisected { dx_orig, dx, .. } => debug!(
                "rxn {}: line search reduced step size from {:E} to {:E}",
                irxn, dx_orig, dx
            ),
            LineSearchEvent::Exhausted { dx_orig, dx } => debug!(
                "rxn {}: line search reduced step size from {:E} to {:E} (MAXITS)",
                irxn, dx_orig, dx
            ),
        }
    }
}

/// keeps every event, used to inspect decisions after a pass
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub reactions: Vec<(usize, RxnEvent)>,
    pub line_searches: Vec<(usize, LineSearchEvent)>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn clear(&mut self) {
        self.reactions.clear();
        self.line_searches.clear();
    }
}

impl VcsObserver for RecordingObserver {
    fn on_reaction(&mut self, irxn: usize, _kspec: usize, event: &RxnEvent) {
        self.reactions.push((irxn, event.clone()));
    }
    fn on_line_search(&mut self, irxn: usize, event: &LineSearchEvent) {
        self.line_searches.push((irxn, event.clone()));
    }
}
