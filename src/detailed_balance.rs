// Detailed-balance factors relating a forward inelastic cross section to
// its reverse. Each returns R = sigma(AB -> CD) / sigma(CD -> AB); the
// dispatcher synthesizes a reverse cross section only through one of these
// three, never by rearranging a different formula.

use crate::kinematics::p_cm_sqr_from_s;
use crate::particle::ParticleType;
use crate::registry::ParticleTable;

fn spin_factor(a: &ParticleType, b: &ParticleType, c: &ParticleType, d: &ParticleType) -> f64 {
    ((c.spin() + 1) * (d.spin() + 1)) as f64 / ((a.spin() + 1) * (b.spin() + 1)) as f64
}

fn symmetry_factor(a: &ParticleType, b: &ParticleType, c: &ParticleType, d: &ParticleType) -> f64 {
    let in_fac = if a == b { 2.0 } else { 1.0 };
    let out_fac = if c == d { 2.0 } else { 1.0 };
    in_fac / out_fac
}

/// All four species stable: the momentum factor is the ratio of on-shell
/// c.m. momenta squared.
pub fn detailed_balance_factor_stable(
    s: f64,
    a: &ParticleType,
    b: &ParticleType,
    c: &ParticleType,
    d: &ParticleType,
) -> f64 {
    let momentum_factor =
        p_cm_sqr_from_s(s, c.mass(), d.mass()) / p_cm_sqr_from_s(s, a.mass(), b.mass());
    spin_factor(a, b, c, d) * symmetry_factor(a, b, c, d) * momentum_factor
}

/// A is a broad resonance, B a kaon, C and D stable. The incoming phase
/// space is the c.m. momentum times the mass integral of A against a kaon
/// partner.
pub fn detailed_balance_factor_rk(
    sqrt_s: f64,
    pcm: f64,
    table: &ParticleTable,
    a: &ParticleType,
    b: &ParticleType,
    c: &ParticleType,
    d: &ParticleType,
) -> f64 {
    debug_assert!(!a.is_stable());
    debug_assert!(b.is_kaon());
    let s = sqrt_s * sqrt_s;
    let momentum_factor =
        p_cm_sqr_from_s(s, c.mass(), d.mass()) / (pcm * table.integral_rk(a, sqrt_s));
    spin_factor(a, b, c, d) * symmetry_factor(a, b, c, d) * momentum_factor
}

/// A and B both broad, C and D stable. The incoming phase space is the c.m.
/// momentum times the double mass integral over both spectral functions.
pub fn detailed_balance_factor_rr(
    sqrt_s: f64,
    pcm: f64,
    table: &ParticleTable,
    a: &ParticleType,
    b: &ParticleType,
    c: &ParticleType,
    d: &ParticleType,
) -> f64 {
    debug_assert!(!a.is_stable());
    debug_assert!(!b.is_stable());
    let s = sqrt_s * sqrt_s;
    let momentum_factor =
        p_cm_sqr_from_s(s, c.mass(), d.mass()) / (pcm * table.integral_rr(a, b, sqrt_s));
    spin_factor(a, b, c, d) * symmetry_factor(a, b, c, d) * momentum_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::p_cm;
    use crate::pdg::{codes, PdgCode};

    #[test]
    fn test_stable_factor_is_reciprocal_under_swap() {
        let table = ParticleTable::with_default_types();
        let k_m = table.find(PdgCode(codes::K_M));
        let p = table.find(PdgCode(codes::P));
        let pi_z = table.find(PdgCode(codes::PI_Z));
        let lambda = table.find(PdgCode(codes::LAMBDA));

        let s = 1.7 * 1.7;
        let forward = detailed_balance_factor_stable(s, k_m, p, pi_z, lambda);
        let reverse = detailed_balance_factor_stable(s, pi_z, lambda, k_m, p);
        assert!((forward * reverse - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stable_factor_identity_channel() {
        let table = ParticleTable::with_default_types();
        let p = table.find(PdgCode(codes::P));
        let n = table.find(PdgCode(codes::N));
        let s = 2.3 * 2.3;
        assert!((detailed_balance_factor_stable(s, p, n, p, n) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rk_factor_positive_above_threshold() {
        let table = ParticleTable::with_default_types();
        let delta_pp = table.find(PdgCode(codes::DELTA_PP));
        let k_z = table.find(PdgCode(codes::K_Z));
        let p = table.find(PdgCode(codes::P));
        let k_p = table.find(PdgCode(codes::K_P));

        let sqrt_s = 2.2;
        let pcm = p_cm(sqrt_s, delta_pp.mass(), k_z.mass());
        let r = detailed_balance_factor_rk(sqrt_s, pcm, &table, delta_pp, k_z, p, k_p);
        assert!(r.is_finite() && r > 0.0, "r = {}", r);
    }

    #[test]
    fn test_rr_factor_positive_above_threshold() {
        let table = ParticleTable::with_default_types();
        let rho = table.find(PdgCode(codes::RHO_Z));
        let h1 = table.find(PdgCode(codes::H1));
        let p = table.find(PdgCode(codes::P));
        let pbar = table.find(PdgCode(-codes::P));

        let sqrt_s = 2.5;
        let pcm = p_cm(sqrt_s, rho.mass(), h1.mass());
        let r = detailed_balance_factor_rr(sqrt_s, pcm, &table, rho, h1, p, pbar);
        assert!(r.is_finite() && r > 0.0, "r = {}", r);
    }
}
