//! # VCS Settings
//!
//! Numerical constants of the reaction adjustment step. Several of them (the revival threshold of
//! dead multispecies species and their seed mole number) presuppose a unit convention for the
//! dimensionless free energies, so they are kept configurable instead of being hardcoded.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "tol_major": 1e-13,
//!   "revival_threshold": -1e-4,
//!   "revival_seed": 1e-10,
//!   "hessian_clamp": 0.6666,
//!   "line_search_max_its": 10,
//!   "line_search_accept_fraction": 0.8,
//!   "use_act_coeff_jac": false,
//!   "use_line_search": false
//! }
//! ```
use super::VCS_errors::{VcsError, VcsResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// the corrected Hessian diagonal keeps at least a third of the ideal one
pub const MAX_HESSIAN_CLAMP: f64 = 2.0 / 3.0;

/// Settings of the reaction adjustment step.
///
/// # Fields
/// * `tol_major` - reactions with |dG| below this value are considered converged and skipped
/// * `revival_threshold` - a zeroed species of a multispecies phase comes alive if its dG is below
///   this value
/// * `revival_seed` - mole number given to a revived species
/// * `hessian_clamp` - the largest fraction of the ideal Hessian diagonal the activity coefficient
///   correction may remove, at most 2/3 so that a third of the ideal curvature always survives
/// * `line_search_max_its` - number of step halvings in the line search
/// * `line_search_accept_fraction` - a full step whose |dG| dropped below this fraction of the
///   initial |dG| is trusted
/// * `use_act_coeff_jac` - correct the Newton diagonal with activity coefficient derivatives
/// * `use_line_search` - pass Newton steps through the line search before storing them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VcsSettings {
    pub tol_major: f64,
    pub revival_threshold: f64,
    pub revival_seed: f64,
    pub hessian_clamp: f64,
    pub line_search_max_its: usize,
    pub line_search_accept_fraction: f64,
    pub use_act_coeff_jac: bool,
    pub use_line_search: bool,
}

impl Default for VcsSettings {
    fn default() -> Self {
        Self {
            tol_major: 1.0e-13,
            revival_threshold: -1.0e-4,
            revival_seed: 1.0e-10,
            hessian_clamp: 0.6666,
            line_search_max_its: 10,
            line_search_accept_fraction: 0.8,
            use_act_coeff_jac: false,
            use_line_search: false,
        }
    }
}

impl VcsSettings {
    pub fn new() -> Self {
        Self::default()
    }
    /// settings with the nonideal Hessian correction and the line search switched on
    pub fn nonideal() -> Self {
        Self {
            use_act_coeff_jac: true,
            use_line_search: true,
            ..Self::default()
        }
    }
    /// checks that the constants keep the step well defined
    pub fn validate(&self) -> VcsResult<()> {
        if !(self.tol_major >= 0.0) {
            return Err(VcsError::InvalidSettings(format!(
                "tol_major must be non-negative, got {}",
                self.tol_major
            )));
        }
        if !(self.revival_threshold < 0.0) {
            return Err(VcsError::InvalidSettings(format!(
                "revival_threshold must be negative, got {}",
                self.revival_threshold
            )));
        }
        if !(self.revival_seed > 0.0) {
            return Err(VcsError::InvalidSettings(format!(
                "revival_seed must be positive, got {}",
                self.revival_seed
            )));
        }
        if !(self.hessian_clamp > 0.0 && self.hessian_clamp <= MAX_HESSIAN_CLAMP) {
            return Err(VcsError::InvalidSettings(format!(
                "hessian_clamp must lie in (0, 2/3], got {}",
                self.hessian_clamp
            )));
        }
        if self.line_search_max_its == 0 {
            return Err(VcsError::InvalidSettings(
                "line_search_max_its must be at least 1".to_string(),
            ));
        }
        if !(self.line_search_accept_fraction > 0.0 && self.line_search_accept_fraction <= 1.0) {
            return Err(VcsError::InvalidSettings(format!(
                "line_search_accept_fraction must lie in (0, 1], got {}",
                self.line_search_accept_fraction
            )));
        }
        Ok(())
    }
    /// loads settings from a JSON file; missing fields take their default values
    pub fn from_file<P: AsRef<Path>>(path: P) -> VcsResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings: VcsSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        info!("VCS settings loaded from {}", path.as_ref().display());
        Ok(settings)
    }
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> VcsResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = VcsSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.line_search_max_its, 10);
        assert_eq!(settings.revival_seed, 1.0e-10);
        assert_eq!(settings.revival_threshold, -1.0e-4);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = VcsSettings::default();
        settings.revival_threshold = 1.0e-4;
        assert!(matches!(
            settings.validate(),
            Err(VcsError::InvalidSettings(_))
        ));
        let mut settings = VcsSettings::default();
        settings.hessian_clamp = 1.5;
        assert!(settings.validate().is_err());
        // removing more than 2/3 of the ideal curvature is not allowed
        settings.hessian_clamp = 0.95;
        assert!(settings.validate().is_err());
        settings.hessian_clamp = MAX_HESSIAN_CLAMP;
        assert!(settings.validate().is_ok());
        let mut settings = VcsSettings::default();
        settings.line_search_max_its = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let mut settings = VcsSettings::nonideal();
        settings.revival_seed = 1.0e-12;
        settings.save_to_file(file.path()).unwrap();
        let loaded = VcsSettings::from_file(file.path()).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"revival_threshold\": -1e-3}}").unwrap();
        let loaded = VcsSettings::from_file(file.path()).unwrap();
        assert_eq!(loaded.revival_threshold, -1.0e-3);
        assert_eq!(loaded.tol_major, VcsSettings::default().tol_major);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            VcsSettings::from_file(file.path()),
            Err(VcsError::Parse(_))
        ));
    }
}
