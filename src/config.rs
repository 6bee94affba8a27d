// Policy switches steering which reaction classes the kernel enumerates.

use serde::{Deserialize, Serialize};

/// Which 2 -> 2 (and elastic) reaction classes are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncludedReactions {
    pub elastic: bool,
    pub nn_to_nr: bool,
    pub nn_to_dr: bool,
    pub kn_to_kn: bool,
    pub kn_to_kdelta: bool,
    pub strangeness_exchange: bool,
}

impl IncludedReactions {
    pub fn all() -> Self {
        IncludedReactions {
            elastic: true,
            nn_to_nr: true,
            nn_to_dr: true,
            kn_to_kn: true,
            kn_to_kdelta: true,
            strangeness_exchange: true,
        }
    }

    pub fn none() -> Self {
        IncludedReactions::default()
    }

    /// True if any inelastic 2 -> 2 class is enabled.
    pub fn any(&self) -> bool {
        self.nn_to_nr
            || self.nn_to_dr
            || self.kn_to_kn
            || self.kn_to_kdelta
            || self.strangeness_exchange
    }
}

/// How nucleon-antinucleon annihilation is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NNbarTreatment {
    /// No annihilation channel at all.
    NoAnnihilation,
    /// Annihilation through the rho h1(1170) intermediate state, with the
    /// detailed-balance reverse. Only sensible where detailed balance must
    /// hold, e.g. in a box calculation.
    Resonances,
    /// Annihilation handed to the string generator.
    Strings,
}

/// Per-call policy of the channel builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPolicy {
    /// Fixed elastic cross section in mb; negative means use the
    /// parametrization for the pair.
    pub elastic_parameter: f64,
    /// Enable resonance formation (2 -> 1).
    pub two_to_one: bool,
    /// Enabled 2 -> 2 classes.
    pub included_2to2: IncludedReactions,
    /// Elastic NN collisions below this sqrt(s) are dropped.
    pub low_snn_cut: f64,
    /// Master switch for string excitation.
    pub strings_switch: bool,
    pub nnbar_treatment: NNbarTreatment,
}

impl Default for ScatterPolicy {
    fn default() -> Self {
        ScatterPolicy {
            elastic_parameter: -1.0,
            two_to_one: true,
            included_2to2: IncludedReactions::all(),
            low_snn_cut: 1.98,
            strings_switch: true,
            nnbar_treatment: NNbarTreatment::NoAnnihilation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_reflects_inelastic_bits_only() {
        let mut r = IncludedReactions::none();
        assert!(!r.any());
        r.elastic = true;
        assert!(!r.any(), "elastic alone is not an inelastic 2->2 class");
        r.kn_to_kdelta = true;
        assert!(r.any());
    }

    #[test]
    fn test_default_policy_uses_parametrized_elastic() {
        let policy = ScatterPolicy::default();
        assert!(policy.elastic_parameter < 0.0);
        assert!(policy.included_2to2.elastic);
    }
}
