// src/progress/markers.rs

use std::collections::HashSet;
use std::sync::OnceLock;

/// Trailing keywords MESA prints on a step line when that quantity limited
/// the timestep. The first token of such a line is the model age in years.
const MARKERS: &[&str] = &[
    "burn steps",
    "Lnuc",
    "Lnuc_cat",
    "Lnuc_H",
    "Lnuc_He",
    "lgL_power_phot",
    "Lnuc_z",
    "bad_X_sum",
    "dH",
    "dH/H",
    "dHe",
    "dHe/He",
    "dHe3",
    "dHe3/He3",
    "dL/L",
    "dX",
    "dX/X",
    "dX_nuc_drop",
    "delta mdot",
    "delta total J",
    "delta_HR",
    "delta_mstar",
    "diff iters",
    "diff steps",
    "min_dr_div_cs",
    "dt_collapse",
    "eps_nuc_cntr",
    "error rate",
    "highT del Ye",
    "hold",
    "lgL",
    "lgP",
    "lgP_cntr",
    "lgR",
    "lgRho",
    "lgRho_cntr",
    "lgT",
    "lgT_cntr",
    "lgT_max",
    "lgT_max_hi_T",
    "lgTeff",
    "dX_div_X_cntr",
    "lg_XC_cntr",
    "lg_XH_cntr",
    "lg_XHe_cntr",
    "lg_XNe_cntr",
    "lg_XO_cntr",
    "lg_XSi_cntr",
    "XC_cntr",
    "XH_cntr",
    "XHe_cntr",
    "XNe_cntr",
    "XO_cntr",
    "XSi_cntr",
    "log_eps_nuc",
    "max_dt",
    "neg_mass_frac",
    "adjust_J_q",
    "solver iters",
    "rel_E_err",
    "varcontrol",
    "max increase",
    "max decrease",
    "retry",
    "b_****",
];

static MARKER_SET: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// The shared, read-only marker set.
pub fn progress_markers() -> &'static HashSet<&'static str> {
    MARKER_SET.get_or_init(|| MARKERS.iter().copied().collect())
}

pub fn is_progress_marker(key: &str) -> bool {
    progress_markers().contains(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_no_duplicates() {
        assert_eq!(progress_markers().len(), MARKERS.len());
    }

    #[test]
    fn multi_token_markers_are_space_joined() {
        assert!(is_progress_marker("burn steps"));
        assert!(is_progress_marker("delta total J"));
        assert!(is_progress_marker("highT del Ye"));
        assert!(!is_progress_marker("burn  steps"));
        assert!(!is_progress_marker("lnuc"));
    }
}
