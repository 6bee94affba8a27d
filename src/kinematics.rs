// Two-body relativistic kinematics in the center-of-momentum frame.

use crate::constants::NUCLEON_MASS;

/// Squared c.m. momentum of either particle for a two-body system with
/// invariant mass squared `s` and masses `m1`, `m2`.
///
/// Returns a negative value below threshold; callers gate on
/// `sqrt_s > m1 + m2` before taking a square root.
pub fn p_cm_sqr_from_s(s: f64, m1: f64, m2: f64) -> f64 {
    let sum = m1 + m2;
    let dif = m1 - m2;
    (s - sum * sum) * (s - dif * dif) / (4.0 * s)
}

/// Squared c.m. momentum as a function of `sqrt_s`.
pub fn p_cm_sqr(sqrt_s: f64, m1: f64, m2: f64) -> f64 {
    p_cm_sqr_from_s(sqrt_s * sqrt_s, m1, m2)
}

/// C.m. momentum magnitude; zero below threshold.
pub fn p_cm(sqrt_s: f64, m1: f64, m2: f64) -> f64 {
    p_cm_sqr(sqrt_s, m1, m2).max(0.0).sqrt()
}

/// C.m. momentum magnitude from `s`; zero below threshold.
pub fn p_cm_from_s(s: f64, m1: f64, m2: f64) -> f64 {
    p_cm_sqr_from_s(s, m1, m2).max(0.0).sqrt()
}

/// Lab-frame projectile momentum for a nucleon beam on a nucleon target
/// with invariant mass squared `s`. Used by the NN parametrizations, which
/// are fits in p_lab.
pub fn plab_from_s(s: f64) -> f64 {
    plab_from_s_ab(s, NUCLEON_MASS, NUCLEON_MASS)
}

/// Lab-frame projectile momentum for projectile mass `m_a` on a target of
/// mass `m_b` at rest.
pub fn plab_from_s_ab(s: f64, m_a: f64, m_b: f64) -> f64 {
    let radicand = (s - m_a * m_a - m_b * m_b).powi(2) - 4.0 * m_a * m_a * m_b * m_b;
    radicand.max(0.0).sqrt() / (2.0 * m_b)
}
