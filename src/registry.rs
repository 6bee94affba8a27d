// The particle registry: a read-only table of species, their isospin
// multiplets and the mass integrals over unstable final states.
//
// The table is a capability handle passed into the kernel by reference, so
// tests can run against stub tables with a handful of species.

use std::collections::HashMap;

use crate::constants::{KAON_MASS, NUCLEON_MASS, PION_MASS};
use crate::clebsch_gordan::isospin_clebsch_gordan_sqr_2to1;
use crate::kinematics::p_cm;
use crate::particle::{DecayMode, ParticleData, ParticleType};
use crate::pdg::{codes, PdgCode};
use crate::utilities::integrate_simpson;

/// Subintervals for the one-dimensional mass integrals.
const MASS_INTEGRAL_STEPS: usize = 72;
/// Subintervals per dimension for the two-resonance integral.
const MASS_INTEGRAL_STEPS_2D: usize = 48;

pub struct ParticleTable {
    types: Vec<ParticleType>,
    by_pdg: HashMap<i32, usize>,
    nucleons: Vec<usize>,
    anti_nucleons: Vec<usize>,
    deltas: Vec<usize>,
    anti_deltas: Vec<usize>,
    baryon_resonances: Vec<usize>,
    light_nuclei: Vec<usize>,
}

impl ParticleTable {
    /// Build a table from an explicit species list. Enumeration order of the
    /// input is preserved; the channel lists the kernel emits inherit it.
    pub fn new(types: Vec<ParticleType>) -> Self {
        let mut by_pdg = HashMap::new();
        let mut nucleons = Vec::new();
        let mut anti_nucleons = Vec::new();
        let mut deltas = Vec::new();
        let mut anti_deltas = Vec::new();
        let mut baryon_resonances = Vec::new();
        let mut light_nuclei = Vec::new();

        for (i, ty) in types.iter().enumerate() {
            by_pdg.insert(ty.pdgcode().code(), i);
            if ty.is_nucleon() {
                if ty.antiparticle_sign() == 1 {
                    nucleons.push(i);
                } else {
                    anti_nucleons.push(i);
                }
            }
            if ty.is_delta() {
                if ty.antiparticle_sign() == 1 {
                    deltas.push(i);
                } else {
                    anti_deltas.push(i);
                }
            }
            if ty.is_baryon() && !ty.is_stable() {
                baryon_resonances.push(i);
            }
            if ty.is_nucleus() {
                light_nuclei.push(i);
            }
        }

        ParticleTable {
            types,
            by_pdg,
            nucleons,
            anti_nucleons,
            deltas,
            anti_deltas,
            baryon_resonances,
            light_nuclei,
        }
    }

    pub fn list_all(&self) -> impl Iterator<Item = &ParticleType> {
        self.types.iter()
    }

    fn collect(&self, indices: &[usize]) -> Vec<&ParticleType> {
        indices.iter().map(|&i| &self.types[i]).collect()
    }

    pub fn list_nucleons(&self) -> Vec<&ParticleType> {
        self.collect(&self.nucleons)
    }
    pub fn list_anti_nucleons(&self) -> Vec<&ParticleType> {
        self.collect(&self.anti_nucleons)
    }
    pub fn list_deltas(&self) -> Vec<&ParticleType> {
        self.collect(&self.deltas)
    }
    pub fn list_anti_deltas(&self) -> Vec<&ParticleType> {
        self.collect(&self.anti_deltas)
    }
    /// All unstable baryons, particles and antiparticles alike.
    pub fn list_baryon_resonances(&self) -> Vec<&ParticleType> {
        self.collect(&self.baryon_resonances)
    }
    pub fn list_light_nuclei(&self) -> Vec<&ParticleType> {
        self.collect(&self.light_nuclei)
    }

    /// Look up a species by PDG code. Panics on an unknown code: the
    /// hard-coded channel tables only name species the table must carry, so
    /// a miss is a table-configuration bug.
    pub fn find(&self, pdg: PdgCode) -> &ParticleType {
        self.try_find(pdg)
            .unwrap_or_else(|| panic!("particle table has no species with PDG code {}", pdg))
    }

    pub fn try_find(&self, pdg: PdgCode) -> Option<&ParticleType> {
        self.by_pdg.get(&pdg.code()).map(|&i| &self.types[i])
    }

    /// Integral of the spectral function of `res` against the final-state
    /// momentum with a nucleon partner:
    /// int dm A_res(m) p_cm(sqrt_s; m_N, m).
    pub fn integral_nr(&self, res: &ParticleType, sqrt_s: f64) -> f64 {
        self.integral_with_partner(res, NUCLEON_MASS, sqrt_s)
    }

    /// Same integral with a kaon partner.
    pub fn integral_rk(&self, res: &ParticleType, sqrt_s: f64) -> f64 {
        self.integral_with_partner(res, KAON_MASS, sqrt_s)
    }

    /// Same integral with a pion partner.
    pub fn integral_pi_r(&self, res: &ParticleType, sqrt_s: f64) -> f64 {
        self.integral_with_partner(res, PION_MASS, sqrt_s)
    }

    fn integral_with_partner(&self, res: &ParticleType, m_partner: f64, sqrt_s: f64) -> f64 {
        let lower = res.min_mass_spectral();
        let upper = sqrt_s - m_partner;
        integrate_simpson(
            |m| res.spectral_function(m) * p_cm(sqrt_s, m_partner, m),
            lower,
            upper,
            MASS_INTEGRAL_STEPS,
        )
    }

    /// Double mass integral for two broad products:
    /// int dm1 dm2 A_a(m1) A_b(m2) p_cm(sqrt_s; m1, m2) over m1 + m2 < sqrt_s.
    pub fn integral_rr(&self, res_a: &ParticleType, res_b: &ParticleType, sqrt_s: f64) -> f64 {
        let lower_b = res_b.min_mass_spectral();
        integrate_simpson(
            |m1| {
                res_a.spectral_function(m1)
                    * integrate_simpson(
                        |m2| res_b.spectral_function(m2) * p_cm(sqrt_s, m1, m2),
                        lower_b,
                        sqrt_s - m1,
                        MASS_INTEGRAL_STEPS_2D,
                    )
            },
            res_a.min_mass_spectral(),
            sqrt_s - lower_b,
            MASS_INTEGRAL_STEPS_2D,
        )
    }

    /// Partial width for forming the resonance `res` out of the incoming
    /// pair (a, b) at total energy `sqrt_s`.
    ///
    /// The width is the pole width scaled by the branching ratio of the
    /// matching decay mode, the isospin coupling of the concrete charge
    /// states, and the s-wave momentum ratio relative to the pole.
    pub fn partial_in_width(
        &self,
        res: &ParticleType,
        sqrt_s: f64,
        a: &ParticleData,
        b: &ParticleData,
    ) -> f64 {
        let mode = res.decay_modes().iter().find(|m| {
            (m.multiplet_a == a.ty().multiplet() && m.multiplet_b == b.ty().multiplet())
                || (m.multiplet_a == b.ty().multiplet() && m.multiplet_b == a.ty().multiplet())
        });
        let mode = match mode {
            Some(m) => m,
            None => return 0.0,
        };

        let m_a = a.effective_mass();
        let m_b = b.effective_mass();
        if sqrt_s <= m_a + m_b {
            return 0.0;
        }
        let cg_sqr = isospin_clebsch_gordan_sqr_2to1(a.ty(), b.ty(), res);
        if cg_sqr == 0.0 {
            return 0.0;
        }
        let p = p_cm(sqrt_s, m_a, m_b);
        let p_pole = if res.mass() > m_a + m_b {
            p_cm(res.mass(), m_a, m_b)
        } else {
            p
        };
        res.width_at_pole() * mode.branching * cg_sqr * (p / p_pole)
    }

    /// The default hadron table: nucleons, the pion triplet, the Delta
    /// quartet, the low-lying N* and Delta* resonances, kaons, the ground
    /// state hyperons, rho, h1(1170), the deuteron and its d' partner, with
    /// all distinct antiparticles.
    pub fn with_default_types() -> Self {
        let mut t = Vec::new();

        let n_pi = |b| {
            vec![DecayMode {
                multiplet_a: "N",
                multiplet_b: "π",
                branching: b,
            }]
        };
        let nbar_pi = |b| {
            vec![DecayMode {
                multiplet_a: "anti-N",
                multiplet_b: "π",
                branching: b,
            }]
        };

        // Nucleons. The isospin-averaged mass is shared by p and n so that
        // isospin relations close exactly.
        t.push(ParticleType::new(
            "p", codes::P, NUCLEON_MASS, 0.0, NUCLEON_MASS, 1, 1, 1, 1, 0, "N", vec![],
        ));
        t.push(ParticleType::new(
            "n", codes::N, NUCLEON_MASS, 0.0, NUCLEON_MASS, 1, 1, -1, 0, 0, "N", vec![],
        ));
        t.push(ParticleType::new(
            "pbar", -codes::P, NUCLEON_MASS, 0.0, NUCLEON_MASS, 1, 1, -1, -1, 0, "anti-N", vec![],
        ));
        t.push(ParticleType::new(
            "nbar", -codes::N, NUCLEON_MASS, 0.0, NUCLEON_MASS, 1, 1, 1, 0, 0, "anti-N", vec![],
        ));

        // Pions.
        t.push(ParticleType::new(
            "pi+", codes::PI_P, PION_MASS, 0.0, PION_MASS, 0, 2, 2, 1, 0, "π", vec![],
        ));
        t.push(ParticleType::new(
            "pi0", codes::PI_Z, PION_MASS, 0.0, PION_MASS, 0, 2, 0, 0, 0, "π", vec![],
        ));
        t.push(ParticleType::new(
            "pi-", codes::PI_M, PION_MASS, 0.0, PION_MASS, 0, 2, -2, -1, 0, "π", vec![],
        ));

        // Delta(1232) quartet.
        let d_min = NUCLEON_MASS + PION_MASS;
        for (name, pdg, iz, q) in [
            ("Delta++", codes::DELTA_PP, 3, 2),
            ("Delta+", codes::DELTA_P, 1, 1),
            ("Delta0", codes::DELTA_Z, -1, 0),
            ("Delta-", codes::DELTA_M, -3, -1),
        ] {
            t.push(ParticleType::new(
                name, pdg, 1.232, 0.117, d_min, 3, 3, iz, q, 0, "Δ", n_pi(1.0),
            ));
        }
        for (name, pdg, iz, q) in [
            ("Delta++bar", -codes::DELTA_PP, -3, -2),
            ("Delta+bar", -codes::DELTA_P, -1, -1),
            ("Delta0bar", -codes::DELTA_Z, 1, 0),
            ("Delta-bar", -codes::DELTA_M, 3, 1),
        ] {
            t.push(ParticleType::new(
                name, pdg, 1.232, 0.117, d_min, 3, 3, iz, q, 0, "anti-Δ", nbar_pi(1.0),
            ));
        }

        // N* resonances: N(1440), N(1520), N(1535).
        for (base, pdg_p, pdg_n, mass, width, spin, br) in [
            ("N(1440)", 12212, 12112, 1.440, 0.350, 1, 0.65),
            ("N(1520)", 2124, 1214, 1.515, 0.110, 3, 0.60),
            ("N(1535)", 22212, 22112, 1.535, 0.150, 1, 0.45),
        ] {
            let names: [&'static str; 4] = match base {
                "N(1440)" => ["N(1440)+", "N(1440)0", "N(1440)+bar", "N(1440)0bar"],
                "N(1520)" => ["N(1520)+", "N(1520)0", "N(1520)+bar", "N(1520)0bar"],
                _ => ["N(1535)+", "N(1535)0", "N(1535)+bar", "N(1535)0bar"],
            };
            let mult: &'static str = base;
            let anti_mult: &'static str = match base {
                "N(1440)" => "anti-N(1440)",
                "N(1520)" => "anti-N(1520)",
                _ => "anti-N(1535)",
            };
            t.push(ParticleType::new(
                names[0], pdg_p, mass, width, d_min, spin, 1, 1, 1, 0, mult, n_pi(br),
            ));
            t.push(ParticleType::new(
                names[1], pdg_n, mass, width, d_min, spin, 1, -1, 0, 0, mult, n_pi(br),
            ));
            t.push(ParticleType::new(
                names[2], -pdg_p, mass, width, d_min, spin, 1, -1, -1, 0, anti_mult, nbar_pi(br),
            ));
            t.push(ParticleType::new(
                names[3], -pdg_n, mass, width, d_min, spin, 1, 1, 0, 0, anti_mult, nbar_pi(br),
            ));
        }

        // Delta(1600) quartet.
        for (name, pdg, iz, q) in [
            ("Delta(1600)++", 32224, 3, 2),
            ("Delta(1600)+", 32214, 1, 1),
            ("Delta(1600)0", 32114, -1, 0),
            ("Delta(1600)-", 31114, -3, -1),
        ] {
            t.push(ParticleType::new(
                name, pdg, 1.600, 0.320, d_min, 3, 3, iz, q, 0, "Δ(1600)", n_pi(0.18),
            ));
        }
        for (name, pdg, iz, q) in [
            ("Delta(1600)++bar", -32224, -3, -2),
            ("Delta(1600)+bar", -32214, -1, -1),
            ("Delta(1600)0bar", -32114, 1, 0),
            ("Delta(1600)-bar", -31114, 3, 1),
        ] {
            t.push(ParticleType::new(
                name, pdg, 1.600, 0.320, d_min, 3, 3, iz, q, 0, "anti-Δ(1600)", nbar_pi(0.18),
            ));
        }

        // Kaons.
        t.push(ParticleType::new(
            "K+", codes::K_P, KAON_MASS, 0.0, KAON_MASS, 0, 1, 1, 1, 1, "K", vec![],
        ));
        t.push(ParticleType::new(
            "K0", codes::K_Z, KAON_MASS, 0.0, KAON_MASS, 0, 1, -1, 0, 1, "K", vec![],
        ));
        t.push(ParticleType::new(
            "Kbar0", codes::KBAR_Z, KAON_MASS, 0.0, KAON_MASS, 0, 1, 1, 0, -1, "Kbar", vec![],
        ));
        t.push(ParticleType::new(
            "K-", codes::K_M, KAON_MASS, 0.0, KAON_MASS, 0, 1, -1, -1, -1, "Kbar", vec![],
        ));

        // Ground-state hyperons (weak decays only: stable here).
        t.push(ParticleType::new(
            "Sigma+", codes::SIGMA_P, 1.189, 0.0, 1.189, 1, 2, 2, 1, -1, "Σ", vec![],
        ));
        t.push(ParticleType::new(
            "Sigma0", codes::SIGMA_Z, 1.193, 0.0, 1.193, 1, 2, 0, 0, -1, "Σ", vec![],
        ));
        t.push(ParticleType::new(
            "Sigma-", codes::SIGMA_M, 1.197, 0.0, 1.197, 1, 2, -2, -1, -1, "Σ", vec![],
        ));
        t.push(ParticleType::new(
            "Lambda", codes::LAMBDA, 1.116, 0.0, 1.116, 1, 0, 0, 0, -1, "Λ", vec![],
        ));
        t.push(ParticleType::new(
            "Sigma+bar", -codes::SIGMA_P, 1.189, 0.0, 1.189, 1, 2, -2, -1, 1, "anti-Σ", vec![],
        ));
        t.push(ParticleType::new(
            "Sigma0bar", -codes::SIGMA_Z, 1.193, 0.0, 1.193, 1, 2, 0, 0, 1, "anti-Σ", vec![],
        ));
        t.push(ParticleType::new(
            "Sigma-bar", -codes::SIGMA_M, 1.197, 0.0, 1.197, 1, 2, 2, 1, 1, "anti-Σ", vec![],
        ));
        t.push(ParticleType::new(
            "Lambdabar", -codes::LAMBDA, 1.116, 0.0, 1.116, 1, 0, 0, 0, 1, "anti-Λ", vec![],
        ));

        // Light unflavored mesons entering the NNbar closure.
        let pi_pi = vec![DecayMode {
            multiplet_a: "π",
            multiplet_b: "π",
            branching: 1.0,
        }];
        t.push(ParticleType::new(
            "rho+", 213, 0.776, 0.149, 2.0 * PION_MASS, 2, 2, 2, 1, 0, "ρ", pi_pi.clone(),
        ));
        t.push(ParticleType::new(
            "rho0", codes::RHO_Z, 0.776, 0.149, 2.0 * PION_MASS, 2, 2, 0, 0, 0, "ρ", pi_pi.clone(),
        ));
        t.push(ParticleType::new(
            "rho-", -213, 0.776, 0.149, 2.0 * PION_MASS, 2, 2, -2, -1, 0, "ρ", pi_pi,
        ));
        t.push(ParticleType::new(
            "h1(1170)",
            codes::H1,
            1.170,
            0.360,
            3.0 * PION_MASS,
            2,
            0,
            0,
            0,
            0,
            "h1",
            vec![DecayMode {
                multiplet_a: "π",
                multiplet_b: "ρ",
                branching: 1.0,
            }],
        ));

        // Light nuclei: deuteron and its unstable d' partner.
        t.push(ParticleType::new(
            "d",
            codes::DEUTERON,
            crate::constants::DEUTERON_MASS,
            0.0,
            crate::constants::DEUTERON_MASS,
            2,
            0,
            0,
            1,
            0,
            "d",
            vec![],
        ));
        t.push(ParticleType::new(
            "d'",
            codes::DPRIME,
            1.886,
            0.086,
            2.0 * NUCLEON_MASS,
            0,
            0,
            0,
            1,
            0,
            "d'",
            vec![DecayMode {
                multiplet_a: "N",
                multiplet_b: "N",
                branching: 1.0,
            }],
        ));
        t.push(ParticleType::new(
            "dbar",
            -codes::DEUTERON,
            crate::constants::DEUTERON_MASS,
            0.0,
            crate::constants::DEUTERON_MASS,
            2,
            0,
            0,
            -1,
            0,
            "anti-d",
            vec![],
        ));
        t.push(ParticleType::new(
            "d'bar",
            -codes::DPRIME,
            1.886,
            0.086,
            2.0 * NUCLEON_MASS,
            0,
            0,
            0,
            -1,
            0,
            "anti-d'",
            vec![DecayMode {
                multiplet_a: "anti-N",
                multiplet_b: "anti-N",
                branching: 1.0,
            }],
        ));

        ParticleTable::new(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_lists() {
        let table = ParticleTable::with_default_types();
        assert_eq!(table.list_nucleons().len(), 2);
        assert_eq!(table.list_anti_nucleons().len(), 2);
        assert_eq!(table.list_deltas().len(), 4);
        assert_eq!(table.list_anti_deltas().len(), 4);
        assert_eq!(table.list_light_nuclei().len(), 4);
        // Delta x8, N* x12, Delta(1600) x8; d' counts as a nucleus, not here
        assert_eq!(table.list_baryon_resonances().len(), 28);
    }

    #[test]
    fn test_find_and_try_find() {
        let table = ParticleTable::with_default_types();
        assert_eq!(table.find(PdgCode(codes::P)).name(), "p");
        assert!(table.try_find(PdgCode(99999)).is_none());
    }

    #[test]
    fn test_charge_strangeness_bookkeeping() {
        let table = ParticleTable::with_default_types();
        for ty in table.list_all() {
            // Gell-Mann-Nishijima: Q = I_z + (B + S) / 2, in doubled units
            // 2Q = 2I_z + B + S.
            assert_eq!(
                2 * ty.charge(),
                ty.isospin3() + ty.baryon_number() + ty.strangeness(),
                "GMN violated for {}",
                ty.name()
            );
        }
    }

    #[test]
    fn test_integral_nr_positive_above_threshold() {
        let table = ParticleTable::with_default_types();
        let delta = table.find(PdgCode(codes::DELTA_PP));
        assert_eq!(table.integral_nr(delta, 1.9), 0.0); // below N + min spectral
        let val = table.integral_nr(delta, 2.6);
        assert!(val > 0.0, "integral = {}", val);
    }

    #[test]
    fn test_integral_rr_positive_and_symmetric_shape() {
        let table = ParticleTable::with_default_types();
        let rho = table.find(PdgCode(codes::RHO_Z));
        let h1 = table.find(PdgCode(codes::H1));
        let val = table.integral_rr(rho, h1, 2.5);
        assert!(val > 0.0);
        // Swapping the resonances changes only the integration order.
        let swapped = table.integral_rr(h1, rho, 2.5);
        assert!((val - swapped).abs() < 1e-2 * val.max(swapped));
    }

    #[test]
    fn test_partial_in_width_pi_n_to_delta() {
        let table = ParticleTable::with_default_types();
        let pi_p = ParticleData::new(table.find(PdgCode(codes::PI_P)));
        let p = ParticleData::new(table.find(PdgCode(codes::P)));
        let delta_pp = table.find(PdgCode(codes::DELTA_PP));
        let w = table.partial_in_width(delta_pp, 1.232, &pi_p, &p);
        // Stretched isospin state at the pole: in-width equals the pole width.
        assert!((w - 0.117).abs() < 1e-12, "w = {}", w);
        // No matching decay mode: zero.
        let k_p = ParticleData::new(table.find(PdgCode(codes::K_P)));
        assert_eq!(table.partial_in_width(delta_pp, 1.8, &k_p, &p), 0.0);
    }
}
