// Isospin coupling coefficients.
//
// All angular-momentum arguments are doubled (2j, 2m) so half-integer
// isospins stay integral. The Wigner 3j symbol is evaluated with the Racah
// sum over factorials; hadronic isospins are small, so plain f64 factorials
// are exact here.

use once_cell::sync::Lazy;

use crate::particle::ParticleType;

static FACTORIAL: Lazy<[f64; 40]> = Lazy::new(|| {
    let mut f = [1.0; 40];
    for i in 1..40 {
        f[i] = f[i - 1] * i as f64;
    }
    f
});

fn fact(n: i32) -> f64 {
    FACTORIAL[n as usize]
}

/// Wigner 3j symbol with doubled arguments. Returns 0 for any combination
/// violating the selection rules.
pub fn wigner_3j(
    two_j1: i32,
    two_j2: i32,
    two_j3: i32,
    two_m1: i32,
    two_m2: i32,
    two_m3: i32,
) -> f64 {
    if two_m1 + two_m2 + two_m3 != 0 {
        return 0.0;
    }
    if two_j3 < (two_j1 - two_j2).abs() || two_j3 > two_j1 + two_j2 {
        return 0.0;
    }
    if (two_j1 + two_j2 + two_j3) % 2 != 0 {
        return 0.0;
    }
    if two_m1.abs() > two_j1 || two_m2.abs() > two_j2 || two_m3.abs() > two_j3 {
        return 0.0;
    }
    if (two_j1 + two_m1) % 2 != 0 || (two_j2 + two_m2) % 2 != 0 || (two_j3 + two_m3) % 2 != 0 {
        return 0.0;
    }

    // Undoubled integer combinations entering the factorials.
    let jpm1 = (two_j1 + two_m1) / 2;
    let jmm1 = (two_j1 - two_m1) / 2;
    let jpm2 = (two_j2 + two_m2) / 2;
    let jmm2 = (two_j2 - two_m2) / 2;
    let jpm3 = (two_j3 + two_m3) / 2;
    let jmm3 = (two_j3 - two_m3) / 2;
    let j12m3 = (two_j1 + two_j2 - two_j3) / 2;
    let j13m2 = (two_j1 - two_j2 + two_j3) / 2;
    let j23m1 = (-two_j1 + two_j2 + two_j3) / 2;
    let jsum = (two_j1 + two_j2 + two_j3) / 2;

    let delta = fact(j12m3) * fact(j13m2) * fact(j23m1) / fact(jsum + 1);
    let norm = (delta
        * fact(jpm1)
        * fact(jmm1)
        * fact(jpm2)
        * fact(jmm2)
        * fact(jpm3)
        * fact(jmm3))
    .sqrt();

    let t1 = (two_j3 - two_j2 + two_m1) / 2;
    let t2 = (two_j3 - two_j1 - two_m2) / 2;
    let k_min = 0.max(-t1).max(-t2);
    let k_max = j12m3.min(jmm1).min(jpm2);

    let mut sum = 0.0;
    for k in k_min..=k_max {
        let term = fact(k)
            * fact(j12m3 - k)
            * fact(jmm1 - k)
            * fact(jpm2 - k)
            * fact(t1 + k)
            * fact(t2 + k);
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        sum += sign / term;
    }

    let phase_exp = (two_j1 - two_j2 - two_m3) / 2;
    let phase = if phase_exp.rem_euclid(2) == 0 { 1.0 } else { -1.0 };
    phase * norm * sum
}

/// Clebsch-Gordan coefficient <j1 m1 j2 m2 | j3 m3> with doubled arguments.
pub fn clebsch_gordan(
    two_j1: i32,
    two_j2: i32,
    two_j3: i32,
    two_m1: i32,
    two_m2: i32,
    two_m3: i32,
) -> f64 {
    let w3j = wigner_3j(two_j1, two_j2, two_j3, two_m1, two_m2, -two_m3);
    if w3j == 0.0 {
        return 0.0;
    }
    let phase_exp = (two_j1 - two_j2 + two_m3) / 2;
    let phase = if phase_exp.rem_euclid(2) == 0 { 1.0 } else { -1.0 };
    phase * ((two_j3 + 1) as f64).sqrt() * w3j
}

fn isospin_clebsch_gordan_2to1(
    p_a: &ParticleType,
    p_b: &ParticleType,
    two_i_tot: i32,
    two_i_z: i32,
) -> f64 {
    clebsch_gordan(
        p_a.isospin() as i32,
        p_b.isospin() as i32,
        two_i_tot,
        p_a.isospin3(),
        p_b.isospin3(),
        two_i_z,
    )
}

/// Squared isospin coefficient for a 2 -> 1 coupling a b -> Res.
pub fn isospin_clebsch_gordan_sqr_2to1(
    p_a: &ParticleType,
    p_b: &ParticleType,
    res: &ParticleType,
) -> f64 {
    if res.isospin3() != p_a.isospin3() + p_b.isospin3() {
        return 0.0;
    }
    let cg = isospin_clebsch_gordan_2to1(p_a, p_b, res.isospin() as i32, res.isospin3());
    cg * cg
}

/// Squared isospin coefficient for a b -> c d, restricted to total isospin
/// `two_i` when `two_i >= 0` and summed over the allowed range otherwise.
pub fn isospin_clebsch_gordan_sqr_2to2(
    p_a: &ParticleType,
    p_b: &ParticleType,
    p_c: &ParticleType,
    p_d: &ParticleType,
    two_i: i32,
) -> f64 {
    let i_z = p_a.isospin3() + p_b.isospin3();
    if i_z != p_c.isospin3() + p_d.isospin3() {
        return 0.0;
    }
    let mut factor = 0.0;
    for i_tot in ITotRange::combined(p_a, p_b, p_c, p_d) {
        if two_i < 0 || i_tot == two_i {
            let cg_in = isospin_clebsch_gordan_2to1(p_a, p_b, i_tot, i_z);
            let cg_out = isospin_clebsch_gordan_2to1(p_c, p_d, i_tot, i_z);
            factor += cg_in * cg_in * cg_out * cg_out;
        }
    }
    factor
}

/// Range of total isospin (doubled) reachable by a two-particle state,
/// iterated from the largest value downward in steps of 2.
pub struct ITotRange {
    current: i32,
    min: i32,
}

impl ITotRange {
    pub fn new(p_a: &ParticleType, p_b: &ParticleType) -> Self {
        let i_a = p_a.isospin() as i32;
        let i_b = p_b.isospin() as i32;
        let i_z_abs = (p_a.isospin3() + p_b.isospin3()).abs();
        ITotRange {
            current: i_a + i_b,
            min: (i_a - i_b).abs().max(i_z_abs),
        }
    }

    /// Intersection of the ranges of the incoming and outgoing pairs; empty
    /// when the isospin projections do not match.
    pub fn combined(
        p_a: &ParticleType,
        p_b: &ParticleType,
        p_c: &ParticleType,
        p_d: &ParticleType,
    ) -> Self {
        let i_z = p_a.isospin3() + p_b.isospin3();
        if i_z != p_c.isospin3() + p_d.isospin3() {
            return ITotRange { current: -1, min: 0 };
        }
        let range_in = ITotRange::new(p_a, p_b);
        let range_out = ITotRange::new(p_c, p_d);
        ITotRange {
            current: range_in.current.min(range_out.current),
            min: range_in.min.max(range_out.min),
        }
    }
}

impl Iterator for ITotRange {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.current < self.min {
            return None;
        }
        let value = self.current;
        self.current -= 2;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdg::codes;

    fn ptype(pdg: i32, isospin: u32, isospin3: i32) -> ParticleType {
        ParticleType::new(
            "t", pdg, 1.0, 0.0, 1.0, 1, isospin, isospin3, 0, 0, "t", vec![],
        )
    }

    #[test]
    fn test_two_spin_half_coupling() {
        // <1/2 1/2 1/2 -1/2 | 1 0> = 1/sqrt(2)
        let cg = clebsch_gordan(1, 1, 2, 1, -1, 0);
        assert!((cg - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12, "cg = {}", cg);
        // <1/2 1/2 1/2 -1/2 | 0 0> = 1/sqrt(2)
        let cg0 = clebsch_gordan(1, 1, 0, 1, -1, 0);
        assert!((cg0.abs() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        // stretched state is unity
        assert!((clebsch_gordan(1, 1, 2, 1, 1, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pion_nucleon_to_delta() {
        // pi+ p -> Delta++: stretched 1 x 1/2 -> 3/2 coupling, CG^2 = 1.
        let pi_p = ptype(codes::PI_P, 2, 2);
        let p = ptype(codes::P, 1, 1);
        let delta_pp = ptype(codes::DELTA_PP, 3, 3);
        let sqr = isospin_clebsch_gordan_sqr_2to1(&pi_p, &p, &delta_pp);
        assert!((sqr - 1.0).abs() < 1e-12, "sqr = {}", sqr);

        // pi0 p -> Delta+: CG^2 = 2/3.
        let pi_z = ptype(codes::PI_Z, 2, 0);
        let delta_p = ptype(codes::DELTA_P, 3, 1);
        let sqr = isospin_clebsch_gordan_sqr_2to1(&pi_z, &p, &delta_p);
        assert!((sqr - 2.0 / 3.0).abs() < 1e-12, "sqr = {}", sqr);
    }

    #[test]
    fn test_completeness_over_final_states() {
        // Summing CG^2 over all final charge states of fixed multiplets and
        // all total isospins recovers 1 (here: N N -> N N, I_z = 0).
        let p = ptype(codes::P, 1, 1);
        let n = ptype(codes::N, 1, -1);
        let mut sum = 0.0;
        for (c3, d3) in [(1, -1), (-1, 1)] {
            let c = ptype(codes::P, 1, c3);
            let d = ptype(codes::N, 1, d3);
            sum += isospin_clebsch_gordan_sqr_2to2(&p, &n, &c, &d, -1);
        }
        assert!((sum - 1.0).abs() < 1e-12, "sum = {}", sum);
    }

    #[test]
    fn test_itot_range_is_descending() {
        let pi = ptype(codes::PI_P, 2, 2);
        let nuc = ptype(codes::P, 1, 1);
        let values: Vec<i32> = ITotRange::new(&pi, &nuc).collect();
        assert_eq!(values, vec![3]);

        let pi0 = ptype(codes::PI_Z, 2, 0);
        let values: Vec<i32> = ITotRange::new(&pi0, &nuc).collect();
        assert_eq!(values, vec![3, 1]);
    }

    #[test]
    fn test_combined_range_empty_on_iz_mismatch() {
        let pi_p = ptype(codes::PI_P, 2, 2);
        let p = ptype(codes::P, 1, 1);
        let pi_m = ptype(codes::PI_M, 2, -2);
        let values: Vec<i32> = ITotRange::combined(&pi_p, &p, &pi_m, &p).collect();
        assert!(values.is_empty());
    }
}
