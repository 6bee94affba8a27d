// Parametrized elastic and inelastic hadron-hadron cross sections.
//
// These are fits in the lab momentum of the projectile (CERN-HERA style) or
// in sqrt(s), taken over from standard compilations of pp, np, pion-nucleon
// and kaon-nucleon data. The dispatcher treats every function here as given
// data: it only checks positivity at the call site.
//
// All cross sections in mb, all energies in GeV.

use crate::clebsch_gordan::isospin_clebsch_gordan_sqr_2to2;
use crate::constants::{KAON_MASS, NUCLEON_MASS, PION_MASS};
use crate::kinematics::{plab_from_s, plab_from_s_ab};
use crate::particle::ParticleType;
use crate::registry::ParticleTable;
use crate::utilities::interpolate_linear;

/// pp elastic cross section, piecewise fit in p_lab.
pub fn pp_elastic(mandelstam_s: f64) -> f64 {
    let p_lab = plab_from_s(mandelstam_s);
    if p_lab < 0.435 {
        5.12 * NUCLEON_MASS / (mandelstam_s - 4.0 * NUCLEON_MASS * NUCLEON_MASS) + 1.67
    } else if p_lab < 0.8 {
        23.5 + 1000.0 * (p_lab - 0.7).powi(4)
    } else if p_lab < 2.0 {
        1250.0 / (p_lab + 50.0) - 4.0 * (p_lab - 1.3).powi(2)
    } else if p_lab < 2.776 {
        77.0 / (p_lab + 1.5)
    } else {
        let logp = p_lab.ln();
        11.9 + 26.9 * p_lab.powf(-1.21) + 0.169 * logp * logp - 1.85 * logp
    }
}

/// np elastic cross section, piecewise fit in p_lab.
pub fn np_elastic(mandelstam_s: f64) -> f64 {
    let p_lab = plab_from_s(mandelstam_s);
    if p_lab < 0.525 {
        17.05 * NUCLEON_MASS / (mandelstam_s - 4.0 * NUCLEON_MASS * NUCLEON_MASS) - 6.83
    } else if p_lab < 0.8 {
        33.0 + 196.0 * (p_lab - 0.95).abs().powf(2.5)
    } else if p_lab < 2.0 {
        31.0 / p_lab.sqrt()
    } else if p_lab < 2.776 {
        77.0 / (p_lab + 1.5)
    } else {
        let logp = p_lab.ln();
        11.9 + 26.9 * p_lab.powf(-1.21) + 0.169 * logp * logp - 1.85 * logp
    }
}

/// ppbar elastic cross section, piecewise fit in p_lab.
pub fn ppbar_elastic(mandelstam_s: f64) -> f64 {
    let p_lab = plab_from_s(mandelstam_s);
    if p_lab < 0.3 {
        78.6
    } else if p_lab < 5.0 {
        31.6 + 18.3 / p_lab - 1.1 / (p_lab * p_lab) - 3.8 * p_lab
    } else {
        let logp = p_lab.ln();
        10.2 + 52.7 * p_lab.powf(-1.16) + 0.125 * logp * logp - 1.28 * logp
    }
}

/// ppbar total cross section, piecewise fit in p_lab.
pub fn ppbar_total(mandelstam_s: f64) -> f64 {
    let p_lab = plab_from_s(mandelstam_s);
    if p_lab < 0.3 {
        271.6 * (-1.1 * p_lab * p_lab).exp()
    } else if p_lab < 5.0 {
        75.0 + 43.1 / p_lab + 2.6 / (p_lab * p_lab) - 3.9 * p_lab
    } else {
        let logp = p_lab.ln();
        38.4 + 77.6 * p_lab.powf(-0.64) + 0.26 * logp * logp - 1.2 * logp
    }
}

/// pp total at high energies (CERN-HERA fit), used as the string budget.
pub fn pp_high_energy(mandelstam_s: f64) -> f64 {
    let logp = plab_from_s(mandelstam_s).ln();
    48.0 + 0.522 * logp * logp - 4.51 * logp
}

/// np total at high energies (CERN-HERA fit).
pub fn np_high_energy(mandelstam_s: f64) -> f64 {
    let logp = plab_from_s(mandelstam_s).ln();
    47.3 + 0.513 * logp * logp - 4.27 * logp
}

/// ppbar total at high energies (CERN-HERA fit).
pub fn ppbar_high_energy(mandelstam_s: f64) -> f64 {
    let p_lab = plab_from_s(mandelstam_s);
    let logp = p_lab.ln();
    38.4 + 77.6 * p_lab.powf(-0.64) + 0.26 * logp * logp - 1.2 * logp
}

/// npbar total at high energies (CERN-HERA fit).
pub fn npbar_high_energy(mandelstam_s: f64) -> f64 {
    let p_lab = plab_from_s(mandelstam_s);
    let logp = p_lab.ln();
    36.5 + 42.8 * p_lab.powf(-0.45) + 0.304 * logp * logp - 1.87 * logp
}

fn plab_pi_n(mandelstam_s: f64) -> f64 {
    plab_from_s_ab(mandelstam_s, PION_MASS, NUCLEON_MASS)
}

/// pi+ p elastic cross section (CERN-HERA fit).
pub fn piplusp_elastic(mandelstam_s: f64) -> f64 {
    let p_lab = plab_pi_n(mandelstam_s);
    let logp = p_lab.ln();
    11.4 * p_lab.powf(-0.4) + 0.079 * logp * logp
}

/// pi- p elastic cross section (CERN-HERA fit).
pub fn piminusp_elastic(mandelstam_s: f64) -> f64 {
    let p_lab = plab_pi_n(mandelstam_s);
    let logp = p_lab.ln();
    1.76 + 11.2 * p_lab.powf(-0.64) + 0.043 * logp * logp
}

/// pi+ p total at high energies (CERN-HERA fit); also pi- n.
pub fn piplusp_high_energy(mandelstam_s: f64) -> f64 {
    let p_lab = plab_pi_n(mandelstam_s);
    let logp = p_lab.ln();
    16.4 + 19.3 * p_lab.powf(-0.42) + 0.19 * logp * logp - 0.25 * logp
}

/// pi- p total at high energies (CERN-HERA fit); also pi+ n.
pub fn piminusp_high_energy(mandelstam_s: f64) -> f64 {
    let p_lab = plab_pi_n(mandelstam_s);
    let logp = p_lab.ln();
    33.0 + 14.0 * p_lab.powf(-1.36) + 0.456 * logp * logp - 4.03 * logp
}

fn plab_k_n(mandelstam_s: f64) -> f64 {
    plab_from_s_ab(mandelstam_s, KAON_MASS, NUCLEON_MASS)
}

/// K+ p elastic background, rational fit in p_lab. Numerator and
/// denominator are positive-definite over the whole momentum range.
pub fn kplusp_elastic_background(mandelstam_s: f64) -> f64 {
    const A0: f64 = 10.508;
    const A1: f64 = -3.716;
    const A2: f64 = 1.845;
    const A3: f64 = -0.764;
    const A4: f64 = 0.508;
    let p_lab = plab_k_n(mandelstam_s);
    let p2 = p_lab * p_lab;
    (A0 + A1 * p_lab + A2 * p2) / (1.0 + A3 * p_lab + A4 * p2)
}

/// K+ n elastic background, isospin-reduced from K+ p.
pub fn kplusn_elastic_background(mandelstam_s: f64) -> f64 {
    0.25 * kplusp_elastic_background(mandelstam_s)
}

/// K0 p elastic: mirror of K+ n.
pub fn k0p_elastic_background(mandelstam_s: f64) -> f64 {
    kplusn_elastic_background(mandelstam_s)
}

/// K0 n elastic: mirror of K+ p.
pub fn k0n_elastic_background(mandelstam_s: f64) -> f64 {
    kplusp_elastic_background(mandelstam_s)
}

// K- p elastic data vs p_lab, interpolated; the resonance region makes a
// closed-form fit poor.
const KMINUSP_ELASTIC_P_LAB: [f64; 16] = [
    0.25, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.2, 1.5, 2.0, 3.0, 5.0, 10.0, 30.0,
];
const KMINUSP_ELASTIC_SIG: [f64; 16] = [
    55.0, 46.0, 35.5, 30.0, 28.0, 25.5, 23.0, 20.5, 18.5, 15.8, 13.0, 10.7, 8.4, 6.3, 4.8, 3.6,
];

/// K- p elastic background, interpolated from data.
pub fn kminusp_elastic_background(mandelstam_s: f64) -> f64 {
    let p_lab = plab_k_n(mandelstam_s);
    interpolate_linear(&KMINUSP_ELASTIC_P_LAB, &KMINUSP_ELASTIC_SIG, p_lab)
}

/// K- n elastic background, flat fit.
pub fn kminusn_elastic_background(_mandelstam_s: f64) -> f64 {
    4.0
}

/// Kbar0 p elastic: mirror of K- n.
pub fn kbar0p_elastic_background(mandelstam_s: f64) -> f64 {
    kminusn_elastic_background(mandelstam_s)
}

/// Kbar0 n elastic: mirror of K- p.
pub fn kbar0n_elastic_background(mandelstam_s: f64) -> f64 {
    kminusp_elastic_background(mandelstam_s)
}

/// K+ p inelastic background (total minus elastic minus charge exchange),
/// saturating fit above the single-pion production threshold.
pub fn kplusp_inelastic_background(mandelstam_s: f64) -> f64 {
    let p_lab = plab_k_n(mandelstam_s);
    if p_lab <= 0.8 {
        0.0
    } else {
        12.5 * (1.0 - (-(p_lab - 0.8) / 0.9).exp())
    }
}

/// K+ n inelastic background; taken equal to K+ p by isospin symmetry of
/// the dominant K Delta channels.
pub fn kplusn_inelastic_background(mandelstam_s: f64) -> f64 {
    kplusp_inelastic_background(mandelstam_s)
}

/// K+ n -> K0 p charge exchange, isospin-reduced from K+ p elastic.
pub fn kplusn_k0p(mandelstam_s: f64) -> f64 {
    0.25 * kplusp_elastic_background(mandelstam_s)
}

/// K- p -> Kbar0 n charge exchange, fit to data.
pub fn kminusp_kbar0n(mandelstam_s: f64) -> f64 {
    let p_lab = plab_k_n(mandelstam_s);
    (2.0 * p_lab.powf(-1.6)).min(40.0)
}

// Strangeness exchange K- p -> pi Y, pole fits in sqrt(s).

pub fn kminusp_piminussigmaplus(sqrt_s: f64) -> f64 {
    0.0788265 / (sqrt_s - 1.38841).powi(2)
}

pub fn kminusp_piplussigmaminus(sqrt_s: f64) -> f64 {
    0.0196741 / (sqrt_s - 1.42318).powi(2)
}

pub fn kminusp_pi0sigma0(sqrt_s: f64) -> f64 {
    0.0403364 / (sqrt_s - 1.39830305).powi(2)
}

pub fn kminusp_pi0lambda(sqrt_s: f64) -> f64 {
    0.05932562 / (sqrt_s - 1.38786692).powi(2)
}

/// K- n -> pi- Sigma0: the pure I=1 combination of the K- p fits.
pub fn kminusn_piminussigma0(sqrt_s: f64) -> f64 {
    kminusp_piminussigmaplus(sqrt_s) + kminusp_piplussigmaminus(sqrt_s)
        - 2.0 * kminusp_pi0sigma0(sqrt_s)
}

/// K- n -> pi0 Sigma-: equal to pi- Sigma0 by isospin.
pub fn kminusn_pi0sigmaminus(sqrt_s: f64) -> f64 {
    kminusn_piminussigma0(sqrt_s)
}

/// K- n -> pi- Lambda: twice the K- p -> pi0 Lambda fit (pi Lambda is
/// pure I=1).
pub fn kminusn_piminuslambda(sqrt_s: f64) -> f64 {
    2.0 * kminusp_pi0lambda(sqrt_s)
}

fn xs_string_hard(mandelstam_s: f64, xs_0: f64, e_0: f64, lambda_pow: f64) -> f64 {
    let sqrts = mandelstam_s.sqrt();
    if sqrts < e_0 {
        0.0
    } else {
        xs_0 * (sqrts / e_0).ln().powf(lambda_pow)
    }
}

/// Hard (partonic) contribution to the NN string cross section.
pub fn nn_string_hard(mandelstam_s: f64) -> f64 {
    xs_string_hard(mandelstam_s, 0.087, 4.1, 4.8)
}

/// Hard contribution for nucleon-pion.
pub fn npi_string_hard(mandelstam_s: f64) -> f64 {
    xs_string_hard(mandelstam_s, 0.042, 5.5, 1.6)
}

/// Hard contribution for pion-pion.
pub fn pipi_string_hard(mandelstam_s: f64) -> f64 {
    xs_string_hard(mandelstam_s, 0.013, 2.3, 4.7)
}

/// Isospin share of one K N (or K Delta) outgoing charge channel within its
/// multiplet family.
///
/// The KN inelastic backgrounds are fits to the summed final states; each
/// concrete channel a b -> c d gets the fraction of the summed Clebsch-Gordan
/// weight its charge state carries among all charge-conserving (c', d') pairs
/// drawn from the same outgoing multiplets.
pub fn kaon_nucleon_ratio(
    table: &ParticleTable,
    type_a: &ParticleType,
    type_b: &ParticleType,
    type_c: &ParticleType,
    type_d: &ParticleType,
) -> f64 {
    let numerator = isospin_clebsch_gordan_sqr_2to2(type_a, type_b, type_c, type_d, -1);
    if numerator == 0.0 {
        return 0.0;
    }
    let charge = type_a.charge() + type_b.charge();
    let mut denominator = 0.0;
    for c_state in table.list_all().filter(|t| t.multiplet() == type_c.multiplet()) {
        for d_state in table.list_all().filter(|t| t.multiplet() == type_d.multiplet()) {
            if c_state.charge() + d_state.charge() != charge {
                continue;
            }
            denominator += isospin_clebsch_gordan_sqr_2to2(type_a, type_b, c_state, d_state, -1);
        }
    }
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdg::{codes, PdgCode};

    #[test]
    fn test_nn_elastic_nonnegative() {
        for sqrts in [1.9, 2.0, 2.2, 2.5, 3.0, 4.0, 6.0, 10.0, 30.0] {
            let s = sqrts * sqrts;
            assert!(pp_elastic(s) >= 0.0, "pp at sqrts={}", sqrts);
            assert!(np_elastic(s) >= 0.0, "np at sqrts={}", sqrts);
            assert!(ppbar_elastic(s) >= 0.0, "ppbar at sqrts={}", sqrts);
        }
    }

    #[test]
    fn test_ppbar_total_exceeds_elastic() {
        for sqrts in [1.9, 2.2, 2.5, 3.0, 5.0, 10.0] {
            let s = sqrts * sqrts;
            assert!(
                ppbar_total(s) > ppbar_elastic(s),
                "total <= elastic at sqrts={}",
                sqrts
            );
        }
    }

    #[test]
    fn test_pion_nucleon_elastic_positive() {
        for sqrts in [1.2, 1.5, 2.0, 3.0, 5.0] {
            let s = sqrts * sqrts;
            assert!(piplusp_elastic(s) > 0.0);
            assert!(piminusp_elastic(s) > 0.0);
        }
    }

    #[test]
    fn test_kaon_backgrounds_positive() {
        for sqrts in [1.45, 1.6, 1.8, 2.2, 3.0, 6.0] {
            let s = sqrts * sqrts;
            assert!(kplusp_elastic_background(s) > 0.0);
            assert!(kplusn_elastic_background(s) > 0.0);
            assert!(kminusp_elastic_background(s) > 0.0);
            assert!(kplusp_inelastic_background(s) >= 0.0);
        }
    }

    #[test]
    fn test_strangeness_exchange_positive_above_threshold() {
        for sqrts in [1.45, 1.5, 1.7, 2.0, 2.5] {
            assert!(kminusp_piminussigmaplus(sqrts) > 0.0);
            assert!(kminusp_piplussigmaminus(sqrts) > 0.0);
            assert!(kminusp_pi0sigma0(sqrts) > 0.0);
            assert!(kminusp_pi0lambda(sqrts) > 0.0);
            // The derived I=1 combination must stay positive too.
            assert!(kminusn_piminussigma0(sqrts) > 0.0, "at sqrts={}", sqrts);
        }
    }

    #[test]
    fn test_string_hard_zero_below_onset() {
        assert_eq!(nn_string_hard(3.9 * 3.9), 0.0);
        assert!(nn_string_hard(6.0 * 6.0) > 0.0);
        assert_eq!(npi_string_hard(5.0 * 5.0), 0.0);
        assert!(pipi_string_hard(3.0 * 3.0) > 0.0);
    }

    #[test]
    fn test_kaon_nucleon_ratio_kplusp() {
        // K+ p -> K0 Delta++ : K+ Delta+ share the inelastic background 3:1.
        let table = ParticleTable::with_default_types();
        let k_p = table.find(PdgCode(codes::K_P));
        let p = table.find(PdgCode(codes::P));
        let k_z = table.find(PdgCode(codes::K_Z));
        let delta_pp = table.find(PdgCode(codes::DELTA_PP));
        let delta_p = table.find(PdgCode(codes::DELTA_P));

        let r1 = kaon_nucleon_ratio(&table, k_p, p, k_z, delta_pp);
        let r2 = kaon_nucleon_ratio(&table, k_p, p, k_p, delta_p);
        assert!((r1 - 0.75).abs() < 1e-12, "r1 = {}", r1);
        assert!((r2 - 0.25).abs() < 1e-12, "r2 = {}", r2);
        assert!((r1 + r2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kaon_nucleon_ratio_mirror_symmetry() {
        // The anti-reaction carries the same ratio.
        let table = ParticleTable::with_default_types();
        let k_m = table.find(PdgCode(codes::K_M));
        let pbar = table.find(PdgCode(-codes::P));
        let kbar_z = table.find(PdgCode(codes::KBAR_Z));
        let delta_pp_bar = table.find(PdgCode(-codes::DELTA_PP));

        let r = kaon_nucleon_ratio(&table, k_m, pbar, kbar_z, delta_pp_bar);
        assert!((r - 0.75).abs() < 1e-12, "r = {}", r);
    }
}
