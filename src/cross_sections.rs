// The reaction-channel builder: given an incoming pair and sqrt(s), it
// enumerates every two-body channel the model allows and assigns each an
// exclusive partial cross section in mb.
//
// One builder is constructed per pair, consumed once and discarded. The
// only mutation anywhere in a call is the single uniform draw selecting the
// soft string subprocess, which goes through the caller's rng.

use rand::Rng;

use crate::clebsch_gordan::{isospin_clebsch_gordan_sqr_2to2, ITotRange};
use crate::collision_branch::{sum_xs_of, CollisionBranch, ProcessType};
use crate::config::{IncludedReactions, NNbarTreatment, ScatterPolicy};
use crate::constants::{FM2_MB, HBARC, NUCLEON_MASS, REALLY_SMALL};
use crate::detailed_balance::{
    detailed_balance_factor_rk, detailed_balance_factor_rr, detailed_balance_factor_stable,
};
use crate::error::{ReactionError, Result};
use crate::kinematics::{p_cm, p_cm_from_s, p_cm_sqr};
use crate::parametrizations as param;
use crate::particle::{ParticleData, ParticleType};
use crate::pdg::{codes, PdgCode};
use crate::registry::ParticleTable;
use crate::string_process::{StringProcess, StringSoftType};

/// Single entry point of the kernel: pair + policy -> ordered branch list.
///
/// The list order is elastic, then 2->1, then 2->2, then strings, then the
/// NNbar closure; the closure arithmetic relies on it. Safe to call
/// concurrently for disjoint rngs and providers.
pub fn build_channels<'a, R: Rng + ?Sized>(
    pair: (ParticleData<'a>, ParticleData<'a>),
    sqrt_s: f64,
    policy: &ScatterPolicy,
    table: &'a ParticleTable,
    string_process: Option<&mut dyn StringProcess>,
    rng: &mut R,
) -> Result<Vec<CollisionBranch>> {
    CrossSections::new([pair.0, pair.1], sqrt_s, table)
        .generate_collision_list(policy, string_process, rng)
}

/// Helper: add a 2->2 channel given a lazily evaluated cross section.
///
/// The cross section closure only runs when there is enough energy for the
/// final state; small results are dropped.
fn add_channel<F>(
    list: &mut Vec<CollisionBranch>,
    get_xs: F,
    sqrt_s: f64,
    type_a: &ParticleType,
    type_b: &ParticleType,
) where
    F: FnOnce() -> f64,
{
    let sqrt_s_min = type_a.min_mass_spectral() + type_b.min_mass_spectral();
    if sqrt_s <= sqrt_s_min {
        return;
    }
    let xs = get_xs();
    if xs > REALLY_SMALL {
        list.push(CollisionBranch::two(type_a, type_b, xs, ProcessType::TwoToTwo));
    }
}

/// Per-pair channel builder.
pub struct CrossSections<'a> {
    incoming: [ParticleData<'a>; 2],
    sqrt_s: f64,
    table: &'a ParticleTable,
}

impl<'a> CrossSections<'a> {
    pub fn new(incoming: [ParticleData<'a>; 2], sqrt_s: f64, table: &'a ParticleTable) -> Self {
        CrossSections {
            incoming,
            sqrt_s,
            table,
        }
    }

    fn mandelstam_s(&self) -> f64 {
        self.sqrt_s * self.sqrt_s
    }

    /// C.m. momentum of the incoming pair at its effective masses.
    fn cm_momentum(&self) -> f64 {
        p_cm(
            self.sqrt_s,
            self.incoming[0].effective_mass(),
            self.incoming[1].effective_mass(),
        )
    }

    pub fn generate_collision_list<R: Rng + ?Sized>(
        &self,
        policy: &ScatterPolicy,
        string_process: Option<&mut dyn StringProcess>,
        rng: &mut R,
    ) -> Result<Vec<CollisionBranch>> {
        let t1 = self.incoming[0].ty();
        let t2 = self.incoming[1].ty();
        let both_are_nucleons = t1.is_nucleon() && t2.is_nucleon();

        let use_strings = self.decide_string(policy.strings_switch, both_are_nucleons, rng);

        let mut process_list = Vec::new();

        // Elastic NN collisions below low_snn_cut can not happen.
        let reject_by_nucleon_elastic_cutoff = both_are_nucleons
            && t1.antiparticle_sign() == t2.antiparticle_sign()
            && self.sqrt_s < policy.low_snn_cut;
        if policy.included_2to2.elastic && !reject_by_nucleon_elastic_cutoff {
            let branch = self.elastic(policy.elastic_parameter)?;
            // Pairs without an elastic parametrization (e.g. N d) come back
            // with zero weight and are dropped here.
            if branch.weight() > REALLY_SMALL {
                process_list.push(branch);
            }
        }

        if use_strings {
            process_list.append(&mut self.string_excitation(string_process, rng)?);
        } else {
            if policy.two_to_one {
                process_list.append(&mut self.two_to_one());
            }
            if policy.included_2to2.any() {
                process_list.append(&mut self.two_to_two(policy.included_2to2));
            }
        }

        // NNbar annihilation through rho h1(1170); combined with the decays
        // rho -> pi pi and h1(1170) -> pi rho this yields five pions. The
        // annihilation weight closes the parametrized total, so it must be
        // computed after every other channel.
        if policy.nnbar_treatment == NNbarTreatment::Resonances {
            if t1.is_nucleon() && t2.pdgcode() == t1.pdgcode().anti() {
                let residual = self.nnbar_annihilation(sum_xs_of(&process_list));
                if let Some(branch) = residual {
                    process_list.push(branch);
                }
            }
            let rho_z = PdgCode(codes::RHO_Z);
            let h1 = PdgCode(codes::H1);
            if (t1.pdgcode() == rho_z && t2.pdgcode() == h1)
                || (t1.pdgcode() == h1 && t2.pdgcode() == rho_z)
            {
                process_list.append(&mut self.nnbar_creation());
            }
        }
        Ok(process_list)
    }

    // ---------------------------------------------------------------
    // Elastic
    // ---------------------------------------------------------------

    fn elastic(&self, elastic_parameter: f64) -> Result<CollisionBranch> {
        let elastic_xs = if elastic_parameter >= 0.0 {
            // constant cross section from the configuration
            elastic_parameter
        } else {
            self.elastic_parametrization()?
        };
        Ok(CollisionBranch::two(
            self.incoming[0].ty(),
            self.incoming[1].ty(),
            elastic_xs,
            ProcessType::Elastic,
        ))
    }

    fn elastic_parametrization(&self) -> Result<f64> {
        let pdg_a = self.incoming[0].pdgcode();
        let pdg_b = self.incoming[1].pdgcode();
        if (pdg_a.is_nucleon() && pdg_b.is_pion()) || (pdg_b.is_nucleon() && pdg_a.is_pion()) {
            self.npi_el()
        } else if (pdg_a.is_nucleon() && pdg_b.is_kaon())
            || (pdg_b.is_nucleon() && pdg_a.is_kaon())
        {
            self.nk_el()
        } else if pdg_a.is_nucleon()
            && pdg_b.is_nucleon()
            && pdg_a.antiparticle_sign() == pdg_b.antiparticle_sign()
        {
            self.nn_el()
        } else {
            Ok(0.0)
        }
    }

    fn invalid_parametrization(&self, sigma: f64) -> ReactionError {
        ReactionError::InvalidParametrization {
            name_a: self.incoming[0].ty().name(),
            name_b: self.incoming[1].ty().name(),
            spin_a: self.incoming[0].ty().spin(),
            spin_b: self.incoming[1].ty().spin(),
            sigma,
            mandelstam_s: self.mandelstam_s(),
        }
    }

    /// Nucleon-nucleon elastic. Identical PDG codes use the pp fit, which
    /// by isospin symmetry also covers pbar pbar.
    fn nn_el(&self) -> Result<f64> {
        let pdg_a = self.incoming[0].pdgcode();
        let pdg_b = self.incoming[1].pdgcode();
        let s = self.mandelstam_s();

        let sig_el = if pdg_a == pdg_b {
            param::pp_elastic(s)
        } else if pdg_a.is_antiparticle_of(pdg_b) {
            param::ppbar_elastic(s)
        } else {
            param::np_elastic(s)
        };
        if sig_el > 0.0 {
            Ok(sig_el)
        } else {
            Err(self.invalid_parametrization(sig_el))
        }
    }

    fn npi_el(&self) -> Result<f64> {
        let pdg_a = self.incoming[0].pdgcode();
        let pdg_b = self.incoming[1].pdgcode();
        let nucleon = if pdg_a.is_nucleon() { pdg_a } else { pdg_b };
        let pion = if pdg_a.is_nucleon() { pdg_b } else { pdg_a };
        let s = self.mandelstam_s();

        let sig_el = match (nucleon.code(), pion.code()) {
            (codes::P, codes::PI_P) => param::piplusp_elastic(s),
            (codes::P, codes::PI_M) => param::piminusp_elastic(s),
            (codes::N, codes::PI_P) => param::piminusp_elastic(s),
            (codes::N, codes::PI_M) => param::piplusp_elastic(s),
            (codes::P_BAR, codes::PI_P) => param::piminusp_elastic(s),
            (codes::P_BAR, codes::PI_M) => param::piplusp_elastic(s),
            (codes::N_BAR, codes::PI_P) => param::piplusp_elastic(s),
            (codes::N_BAR, codes::PI_M) => param::piminusp_elastic(s),
            // pi0 scatters with the charge-averaged cross section
            (_, codes::PI_Z) => 0.5 * (param::piplusp_elastic(s) + param::piminusp_elastic(s)),
            _ => 0.0,
        };
        if sig_el > 0.0 {
            Ok(sig_el)
        } else {
            Err(self.invalid_parametrization(sig_el))
        }
    }

    fn nk_el(&self) -> Result<f64> {
        let pdg_a = self.incoming[0].pdgcode();
        let pdg_b = self.incoming[1].pdgcode();
        let nucleon = if pdg_a.is_nucleon() { pdg_a } else { pdg_b };
        let kaon = if pdg_a.is_nucleon() { pdg_b } else { pdg_a };
        let s = self.mandelstam_s();

        let sig_el = match (nucleon.code(), kaon.code()) {
            (codes::P, codes::K_P) => param::kplusp_elastic_background(s),
            (codes::P, codes::K_M) => param::kminusp_elastic_background(s),
            (codes::P, codes::K_Z) => param::k0p_elastic_background(s),
            (codes::P, codes::KBAR_Z) => param::kbar0p_elastic_background(s),
            (codes::N, codes::K_P) => param::kplusn_elastic_background(s),
            (codes::N, codes::K_M) => param::kminusn_elastic_background(s),
            (codes::N, codes::K_Z) => param::k0n_elastic_background(s),
            (codes::N, codes::KBAR_Z) => param::kbar0n_elastic_background(s),
            (codes::P_BAR, codes::K_P) => param::kminusp_elastic_background(s),
            (codes::P_BAR, codes::K_M) => param::kplusp_elastic_background(s),
            (codes::P_BAR, codes::K_Z) => param::kbar0p_elastic_background(s),
            (codes::P_BAR, codes::KBAR_Z) => param::k0p_elastic_background(s),
            (codes::N_BAR, codes::K_P) => param::kminusn_elastic_background(s),
            (codes::N_BAR, codes::K_M) => param::kplusn_elastic_background(s),
            (codes::N_BAR, codes::K_Z) => param::kbar0n_elastic_background(s),
            (codes::N_BAR, codes::KBAR_Z) => param::k0n_elastic_background(s),
            _ => 0.0,
        };
        if sig_el > 0.0 {
            Ok(sig_el)
        } else {
            Err(self.invalid_parametrization(sig_el))
        }
    }

    // ---------------------------------------------------------------
    // Resonance formation (2 -> 1)
    // ---------------------------------------------------------------

    fn two_to_one(&self) -> Vec<CollisionBranch> {
        let mut resonance_process_list = Vec::new();
        let type_a = self.incoming[0].ty();
        let type_b = self.incoming[1].ty();

        let m1 = self.incoming[0].effective_mass();
        let m2 = self.incoming[1].effective_mass();
        let p_cm_sqr_in = p_cm_sqr(self.sqrt_s, m1, m2);

        for type_resonance in self.table.list_all() {
            if type_resonance.is_stable() {
                continue;
            }
            // Same resonance as in the beginning, ignore
            if (!type_a.is_stable() && type_resonance.pdgcode() == type_a.pdgcode())
                || (!type_b.is_stable() && type_resonance.pdgcode() == type_b.pdgcode())
            {
                continue;
            }
            let xs = self.formation(type_resonance, p_cm_sqr_in);
            if xs > REALLY_SMALL {
                resonance_process_list.push(CollisionBranch::one(
                    type_resonance,
                    xs,
                    ProcessType::TwoToOne,
                ));
            }
        }
        resonance_process_list
    }

    /// Resonance production cross section with the Breit-Wigner spectral
    /// function as probability amplitude.
    fn formation(&self, type_resonance: &ParticleType, cm_momentum_sqr: f64) -> f64 {
        let type_a = self.incoming[0].ty();
        let type_b = self.incoming[1].ty();

        if type_resonance.charge() != type_a.charge() + type_b.charge() {
            return 0.0;
        }
        if type_resonance.baryon_number() != type_a.baryon_number() + type_b.baryon_number() {
            return 0.0;
        }

        let partial_width = self.table.partial_in_width(
            type_resonance,
            self.sqrt_s,
            &self.incoming[0],
            &self.incoming[1],
        );
        if partial_width <= 0.0 {
            return 0.0;
        }

        let spin_factor = (type_resonance.spin() + 1) as f64
            / ((type_a.spin() + 1) * (type_b.spin() + 1)) as f64;
        let sym_factor = if type_a.pdgcode() == type_b.pdgcode() {
            2.0
        } else {
            1.0
        };
        spin_factor * sym_factor * 2.0 * std::f64::consts::PI * std::f64::consts::PI
            / cm_momentum_sqr
            * type_resonance.spectral_function(self.sqrt_s)
            * partial_width
            * HBARC
            * HBARC
            / FM2_MB
    }

    // ---------------------------------------------------------------
    // 2 -> 2 routing
    // ---------------------------------------------------------------

    fn two_to_two(&self, included_2to2: IncludedReactions) -> Vec<CollisionBranch> {
        let data_a = &self.incoming[0];
        let data_b = &self.incoming[1];
        let type_a = data_a.ty();
        let type_b = data_b.ty();
        let pdg_a = data_a.pdgcode();
        let pdg_b = data_b.pdgcode();

        if data_a.is_baryon() && data_b.is_baryon() {
            if pdg_a.is_nucleon()
                && pdg_b.is_nucleon()
                && pdg_a.antiparticle_sign() == pdg_b.antiparticle_sign()
            {
                self.nn_xx(included_2to2)
            } else {
                self.bb_xx_except_nn(included_2to2)
            }
        } else if (type_a.is_baryon() && type_b.is_meson())
            || (type_a.is_meson() && type_b.is_baryon())
        {
            if (pdg_a.is_nucleon() && pdg_b.is_kaon()) || (pdg_b.is_nucleon() && pdg_a.is_kaon())
            {
                self.nk_xx(included_2to2)
            } else if (pdg_a.is_hyperon() && pdg_b.is_pion())
                || (pdg_b.is_hyperon() && pdg_a.is_pion())
            {
                self.ypi_xx(included_2to2)
            } else if (pdg_a.is_delta() && pdg_b.is_kaon())
                || (pdg_b.is_delta() && pdg_a.is_kaon())
            {
                self.deltak_xx(included_2to2)
            } else {
                Vec::new()
            }
        } else if type_a.is_nucleus() || type_b.is_nucleus() {
            if (type_a.is_nucleon() && type_b.is_nucleus())
                || (type_b.is_nucleon() && type_a.is_nucleus())
            {
                self.dn_xx()
            } else if ((type_a.is_deuteron() || type_a.is_dprime()) && pdg_b.is_pion())
                || ((type_b.is_deuteron() || type_b.is_dprime()) && pdg_a.is_pion())
            {
                self.dpi_xx()
            } else {
                Vec::new()
            }
        } else {
            Vec::new()
        }
    }

    /// Baryon-baryon except NN: resonance absorption R N -> N N and
    /// R Delta -> N N via the reverse matrix elements.
    fn bb_xx_except_nn(&self, included_2to2: IncludedReactions) -> Vec<CollisionBranch> {
        let type_a = self.incoming[0].ty();
        let type_b = self.incoming[1].ty();

        let same_sign = type_a.antiparticle_sign() == type_b.antiparticle_sign();
        let any_nucleus = type_a.is_nucleus() || type_b.is_nucleus();
        if !same_sign && !any_nucleus {
            return Vec::new();
        }
        let anti_particles = type_a.antiparticle_sign() == -1;
        if type_a.is_nucleon() || type_b.is_nucleon() {
            // N R -> N N and the mirrored antiparticle reaction
            if included_2to2.nn_to_nr {
                return self.bar_bar_to_nuc_nuc(anti_particles);
            }
        } else if type_a.is_delta() || type_b.is_delta() {
            // Delta R -> N N and the mirrored antiparticle reaction
            if included_2to2.nn_to_dr {
                return self.bar_bar_to_nuc_nuc(anti_particles);
            }
        }
        Vec::new()
    }

    /// Nucleon-nucleon inelastic channels: N N -> N R, N N -> Delta R and
    /// N N -> d pi, with antiparticle mirroring through the product lists.
    fn nn_xx(&self, included_2to2: IncludedReactions) -> Vec<CollisionBranch> {
        let mut process_list = Vec::new();
        let sqrts = self.sqrt_s;

        let both_antinucleons = self.incoming[0].ty().antiparticle_sign() == -1
            && self.incoming[1].ty().antiparticle_sign() == -1;
        let nuc_or_anti_nuc = if both_antinucleons {
            self.table.list_anti_nucleons()
        } else {
            self.table.list_nucleons()
        };
        let delta_or_anti_delta = if both_antinucleons {
            self.table.list_anti_deltas()
        } else {
            self.table.list_deltas()
        };

        // N N -> N R
        if included_2to2.nn_to_nr {
            let mut channels = self.find_nn_xsection_from_type(
                &self.table.list_baryon_resonances(),
                &nuc_or_anti_nuc,
                |type_res_1: &ParticleType, _type_res_2: &ParticleType| {
                    self.table.integral_nr(type_res_1, sqrts)
                },
            );
            process_list.append(&mut channels);
        }

        // N N -> Delta R
        if included_2to2.nn_to_dr {
            let mut channels = self.find_nn_xsection_from_type(
                &self.table.list_baryon_resonances(),
                &delta_or_anti_delta,
                |type_res_1: &ParticleType, type_res_2: &ParticleType| {
                    self.table.integral_rr(type_res_1, type_res_2, sqrts)
                },
            );
            process_list.append(&mut channels);
        }

        // N N -> d pi and the antiparticle mirror
        let deuteron = self.table.try_find(PdgCode(codes::DEUTERON));
        let antideuteron = self.table.try_find(PdgCode(-codes::DEUTERON));
        let pim = self.table.try_find(PdgCode(codes::PI_M));
        let pi0 = self.table.try_find(PdgCode(codes::PI_Z));
        let pip = self.table.try_find(PdgCode(codes::PI_P));
        if let (Some(d), Some(dbar), Some(pim), Some(pi0), Some(pip)) =
            (deuteron, antideuteron, pim, pi0, pip)
        {
            let nucleus_list = if both_antinucleons { vec![dbar] } else { vec![d] };
            let pion_list = vec![pim, pi0, pip];
            let mut channels = self.find_nn_xsection_from_type(
                &nucleus_list,
                &pion_list,
                |type_res_1: &ParticleType, type_res_2: &ParticleType| {
                    p_cm(sqrts, type_res_1.mass(), type_res_2.mass())
                },
            );
            process_list.append(&mut channels);
        }

        process_list
    }

    /// Kaon-nucleon inelastic channels, hard-coded per species pair.
    fn nk_xx(&self, included_2to2: IncludedReactions) -> Vec<CollisionBranch> {
        let a = self.incoming[0].ty();
        let b = self.incoming[1].ty();
        let type_nucleon = if a.pdgcode().is_nucleon() { a } else { b };
        let type_kaon = if a.pdgcode().is_nucleon() { b } else { a };

        let pdg_nucleon = type_nucleon.pdgcode().code();
        let pdg_kaon = type_kaon.pdgcode().code();

        let s = self.mandelstam_s();
        let sqrt_s = self.sqrt_s;
        let table = self.table;

        let sigma_kplusp = param::kplusp_inelastic_background(s);
        let sigma_kplusn = param::kplusn_inelastic_background(s);

        let incl_kn_to_kn = included_2to2.kn_to_kn;
        let incl_kn_to_kdelta = included_2to2.kn_to_kdelta;
        let incl_strangeness_exchange = included_2to2.strangeness_exchange;

        let find = |pdg: i32| table.find(PdgCode(pdg));

        let mut process_list = Vec::new();
        match pdg_kaon {
            codes::K_M => {
                // All inelastic K- N channels are strangeness exchange, plus
                // one charge exchange.
                match pdg_nucleon {
                    codes::P => {
                        if incl_strangeness_exchange {
                            let type_pi_z = find(codes::PI_Z);
                            let type_pi_m = find(codes::PI_M);
                            let type_pi_p = find(codes::PI_P);
                            let type_sigma_p = find(codes::SIGMA_P);
                            let type_sigma_m = find(codes::SIGMA_M);
                            let type_sigma_z = find(codes::SIGMA_Z);
                            let type_lambda = find(codes::LAMBDA);
                            add_channel(
                                &mut process_list,
                                || param::kminusp_piminussigmaplus(sqrt_s),
                                sqrt_s,
                                type_pi_m,
                                type_sigma_p,
                            );
                            add_channel(
                                &mut process_list,
                                || param::kminusp_piplussigmaminus(sqrt_s),
                                sqrt_s,
                                type_pi_p,
                                type_sigma_m,
                            );
                            add_channel(
                                &mut process_list,
                                || param::kminusp_pi0sigma0(sqrt_s),
                                sqrt_s,
                                type_pi_z,
                                type_sigma_z,
                            );
                            add_channel(
                                &mut process_list,
                                || param::kminusp_pi0lambda(sqrt_s),
                                sqrt_s,
                                type_pi_z,
                                type_lambda,
                            );
                        }
                        if incl_kn_to_kn {
                            let type_n = find(codes::N);
                            let type_kbar_z = find(codes::KBAR_Z);
                            add_channel(
                                &mut process_list,
                                || param::kminusp_kbar0n(s),
                                sqrt_s,
                                type_kbar_z,
                                type_n,
                            );
                        }
                    }
                    codes::N => {
                        if incl_strangeness_exchange {
                            let type_pi_z = find(codes::PI_Z);
                            let type_pi_m = find(codes::PI_M);
                            let type_sigma_m = find(codes::SIGMA_M);
                            let type_sigma_z = find(codes::SIGMA_Z);
                            let type_lambda = find(codes::LAMBDA);
                            add_channel(
                                &mut process_list,
                                || param::kminusn_piminussigma0(sqrt_s),
                                sqrt_s,
                                type_pi_m,
                                type_sigma_z,
                            );
                            add_channel(
                                &mut process_list,
                                || param::kminusn_pi0sigmaminus(sqrt_s),
                                sqrt_s,
                                type_pi_z,
                                type_sigma_m,
                            );
                            add_channel(
                                &mut process_list,
                                || param::kminusn_piminuslambda(sqrt_s),
                                sqrt_s,
                                type_pi_m,
                                type_lambda,
                            );
                        }
                    }
                    codes::P_BAR => {
                        if incl_kn_to_kdelta {
                            let type_k_m = find(codes::K_M);
                            let type_kbar_z = find(codes::KBAR_Z);
                            let type_delta_pp_bar = find(-codes::DELTA_PP);
                            let type_delta_p_bar = find(-codes::DELTA_P);
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusp
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_kbar_z,
                                            type_delta_pp_bar,
                                        )
                                },
                                sqrt_s,
                                type_kbar_z,
                                type_delta_pp_bar,
                            );
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusp
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_m,
                                            type_delta_p_bar,
                                        )
                                },
                                sqrt_s,
                                type_k_m,
                                type_delta_p_bar,
                            );
                        }
                    }
                    codes::N_BAR => {
                        if incl_kn_to_kdelta {
                            let type_k_m = find(codes::K_M);
                            let type_kbar_z = find(codes::KBAR_Z);
                            let type_delta_p_bar = find(-codes::DELTA_P);
                            let type_delta_z_bar = find(-codes::DELTA_Z);
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusn
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_kbar_z,
                                            type_delta_p_bar,
                                        )
                                },
                                sqrt_s,
                                type_kbar_z,
                                type_delta_p_bar,
                            );
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusn
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_m,
                                            type_delta_z_bar,
                                        )
                                },
                                sqrt_s,
                                type_k_m,
                                type_delta_z_bar,
                            );
                        }
                        if incl_kn_to_kn {
                            let type_kbar_z = find(codes::KBAR_Z);
                            let type_p_bar = find(-codes::P);
                            add_channel(
                                &mut process_list,
                                || param::kplusn_k0p(s),
                                sqrt_s,
                                type_kbar_z,
                                type_p_bar,
                            );
                        }
                    }
                    _ => {}
                }
            }
            codes::K_P => {
                // All inelastic channels are K+ N -> K Delta -> K pi N,
                // with identical cross section weighted by the isospin
                // factor.
                match pdg_nucleon {
                    codes::P => {
                        if incl_kn_to_kdelta {
                            let type_k_p = find(codes::K_P);
                            let type_k_z = find(codes::K_Z);
                            let type_delta_pp = find(codes::DELTA_PP);
                            let type_delta_p = find(codes::DELTA_P);
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusp
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_z,
                                            type_delta_pp,
                                        )
                                },
                                sqrt_s,
                                type_k_z,
                                type_delta_pp,
                            );
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusp
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_p,
                                            type_delta_p,
                                        )
                                },
                                sqrt_s,
                                type_k_p,
                                type_delta_p,
                            );
                        }
                    }
                    codes::N => {
                        if incl_kn_to_kdelta {
                            let type_k_p = find(codes::K_P);
                            let type_k_z = find(codes::K_Z);
                            let type_delta_p = find(codes::DELTA_P);
                            let type_delta_z = find(codes::DELTA_Z);
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusn
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_z,
                                            type_delta_p,
                                        )
                                },
                                sqrt_s,
                                type_k_z,
                                type_delta_p,
                            );
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusn
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_p,
                                            type_delta_z,
                                        )
                                },
                                sqrt_s,
                                type_k_p,
                                type_delta_z,
                            );
                        }
                        if incl_kn_to_kn {
                            let type_k_z = find(codes::K_Z);
                            let type_p = find(codes::P);
                            add_channel(
                                &mut process_list,
                                || param::kplusn_k0p(s),
                                sqrt_s,
                                type_k_z,
                                type_p,
                            );
                        }
                    }
                    codes::P_BAR => {
                        if incl_strangeness_exchange {
                            let type_pi_z = find(codes::PI_Z);
                            let type_pi_m = find(codes::PI_M);
                            let type_pi_p = find(codes::PI_P);
                            let type_sigma_p_bar = find(-codes::SIGMA_P);
                            let type_sigma_m_bar = find(-codes::SIGMA_M);
                            let type_sigma_z_bar = find(-codes::SIGMA_Z);
                            let type_lambda_bar = find(-codes::LAMBDA);
                            add_channel(
                                &mut process_list,
                                || param::kminusp_piminussigmaplus(sqrt_s),
                                sqrt_s,
                                type_pi_p,
                                type_sigma_p_bar,
                            );
                            add_channel(
                                &mut process_list,
                                || param::kminusp_piplussigmaminus(sqrt_s),
                                sqrt_s,
                                type_pi_m,
                                type_sigma_m_bar,
                            );
                            add_channel(
                                &mut process_list,
                                || param::kminusp_pi0sigma0(sqrt_s),
                                sqrt_s,
                                type_pi_z,
                                type_sigma_z_bar,
                            );
                            add_channel(
                                &mut process_list,
                                || param::kminusp_pi0lambda(sqrt_s),
                                sqrt_s,
                                type_pi_z,
                                type_lambda_bar,
                            );
                        }
                        if incl_kn_to_kn {
                            let type_n_bar = find(-codes::N);
                            let type_k_z = find(codes::K_Z);
                            add_channel(
                                &mut process_list,
                                || param::kminusp_kbar0n(s),
                                sqrt_s,
                                type_k_z,
                                type_n_bar,
                            );
                        }
                    }
                    codes::N_BAR => {
                        if incl_strangeness_exchange {
                            let type_pi_z = find(codes::PI_Z);
                            let type_pi_p = find(codes::PI_P);
                            let type_sigma_m_bar = find(-codes::SIGMA_M);
                            let type_sigma_z_bar = find(-codes::SIGMA_Z);
                            let type_lambda_bar = find(-codes::LAMBDA);
                            add_channel(
                                &mut process_list,
                                || param::kminusn_piminussigma0(sqrt_s),
                                sqrt_s,
                                type_pi_p,
                                type_sigma_z_bar,
                            );
                            add_channel(
                                &mut process_list,
                                || param::kminusn_pi0sigmaminus(sqrt_s),
                                sqrt_s,
                                type_pi_z,
                                type_sigma_m_bar,
                            );
                            add_channel(
                                &mut process_list,
                                || param::kminusn_piminuslambda(sqrt_s),
                                sqrt_s,
                                type_pi_p,
                                type_lambda_bar,
                            );
                        }
                    }
                    _ => {}
                }
            }
            codes::K_Z => {
                // K+ and K0 share the isospin projection pattern, so they
                // are assumed to have the same cross sections here.
                match pdg_nucleon {
                    codes::P => {
                        if incl_kn_to_kdelta {
                            let type_k_p = find(codes::K_P);
                            let type_k_z = find(codes::K_Z);
                            let type_delta_p = find(codes::DELTA_P);
                            let type_delta_z = find(codes::DELTA_Z);
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusp
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_z,
                                            type_delta_p,
                                        )
                                },
                                sqrt_s,
                                type_k_z,
                                type_delta_p,
                            );
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusp
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_p,
                                            type_delta_z,
                                        )
                                },
                                sqrt_s,
                                type_k_p,
                                type_delta_z,
                            );
                        }
                        if incl_kn_to_kn {
                            let type_k_p = find(codes::K_P);
                            let type_n = find(codes::N);
                            add_channel(
                                &mut process_list,
                                || {
                                    param::kplusn_k0p(s)
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_p,
                                            type_n,
                                        )
                                },
                                sqrt_s,
                                type_k_p,
                                type_n,
                            );
                        }
                    }
                    codes::N => {
                        if incl_kn_to_kdelta {
                            let type_k_p = find(codes::K_P);
                            let type_k_z = find(codes::K_Z);
                            let type_delta_z = find(codes::DELTA_Z);
                            let type_delta_m = find(codes::DELTA_M);
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusn
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_z,
                                            type_delta_z,
                                        )
                                },
                                sqrt_s,
                                type_k_z,
                                type_delta_z,
                            );
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusn
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_p,
                                            type_delta_m,
                                        )
                                },
                                sqrt_s,
                                type_k_p,
                                type_delta_m,
                            );
                        }
                    }
                    codes::N_BAR => {
                        if incl_kn_to_kn {
                            let type_k_p = find(codes::K_P);
                            let type_p_bar = find(-codes::P);
                            add_channel(
                                &mut process_list,
                                || param::kminusp_kbar0n(s),
                                sqrt_s,
                                type_k_p,
                                type_p_bar,
                            );
                        }
                    }
                    _ => {}
                }
            }
            codes::KBAR_Z => {
                match pdg_nucleon {
                    codes::N => {
                        if incl_kn_to_kn {
                            let type_p = find(codes::P);
                            let type_k_m = find(codes::K_M);
                            add_channel(
                                &mut process_list,
                                || param::kminusp_kbar0n(s),
                                sqrt_s,
                                type_k_m,
                                type_p,
                            );
                        }
                    }
                    codes::P_BAR => {
                        if incl_kn_to_kdelta {
                            let type_k_m = find(codes::K_M);
                            let type_kbar_z = find(codes::KBAR_Z);
                            let type_delta_p_bar = find(-codes::DELTA_P);
                            let type_delta_z_bar = find(-codes::DELTA_Z);
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusp
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_kbar_z,
                                            type_delta_p_bar,
                                        )
                                },
                                sqrt_s,
                                type_kbar_z,
                                type_delta_p_bar,
                            );
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusp
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_m,
                                            type_delta_z_bar,
                                        )
                                },
                                sqrt_s,
                                type_k_m,
                                type_delta_z_bar,
                            );
                        }
                        if incl_kn_to_kn {
                            let type_k_m = find(codes::K_M);
                            let type_n_bar = find(-codes::N);
                            add_channel(
                                &mut process_list,
                                || {
                                    param::kplusn_k0p(s)
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_m,
                                            type_n_bar,
                                        )
                                },
                                sqrt_s,
                                type_k_m,
                                type_n_bar,
                            );
                        }
                    }
                    codes::N_BAR => {
                        if incl_kn_to_kdelta {
                            let type_k_m = find(codes::K_M);
                            let type_kbar_z = find(codes::KBAR_Z);
                            let type_delta_z_bar = find(-codes::DELTA_Z);
                            let type_delta_m_bar = find(-codes::DELTA_M);
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusn
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_kbar_z,
                                            type_delta_z_bar,
                                        )
                                },
                                sqrt_s,
                                type_kbar_z,
                                type_delta_z_bar,
                            );
                            add_channel(
                                &mut process_list,
                                || {
                                    sigma_kplusn
                                        * param::kaon_nucleon_ratio(
                                            table,
                                            type_nucleon,
                                            type_kaon,
                                            type_k_m,
                                            type_delta_m_bar,
                                        )
                                },
                                sqrt_s,
                                type_k_m,
                                type_delta_m_bar,
                            );
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        process_list
    }

    /// Delta-kaon absorption, obtained from the K N -> K Delta channels via
    /// detailed balance with the same isospin ratios.
    fn deltak_xx(&self, included_2to2: IncludedReactions) -> Vec<CollisionBranch> {
        let mut process_list = Vec::new();
        if !included_2to2.kn_to_kdelta {
            return process_list;
        }
        let a = self.incoming[0].ty();
        let b = self.incoming[1].ty();
        let type_delta = if a.pdgcode().is_delta() { a } else { b };
        let type_kaon = if a.pdgcode().is_delta() { b } else { a };

        let pdg_delta = type_delta.pdgcode().code();
        let pdg_kaon = type_kaon.pdgcode().code();

        let s = self.mandelstam_s();
        let sqrt_s = self.sqrt_s;
        let pcm = self.cm_momentum();
        let table = self.table;
        let find = |pdg: i32| table.find(PdgCode(pdg));

        match (pdg_delta, pdg_kaon) {
            (codes::DELTA_PP, codes::K_Z) | (codes::DELTA_P, codes::K_P) => {
                let type_p = find(codes::P);
                let type_k_p = find(codes::K_P);
                add_channel(
                    &mut process_list,
                    || {
                        detailed_balance_factor_rk(
                            sqrt_s, pcm, table, type_delta, type_kaon, type_p, type_k_p,
                        ) * param::kaon_nucleon_ratio(table, type_p, type_k_p, type_kaon, type_delta)
                            * param::kplusp_inelastic_background(s)
                    },
                    sqrt_s,
                    type_p,
                    type_k_p,
                );
            }
            (codes::DELTA_PP_BAR, codes::KBAR_Z) | (codes::DELTA_P_BAR, codes::K_M) => {
                let type_p_bar = find(codes::P_BAR);
                let type_k_m = find(codes::K_M);
                add_channel(
                    &mut process_list,
                    || {
                        detailed_balance_factor_rk(
                            sqrt_s, pcm, table, type_delta, type_kaon, type_p_bar, type_k_m,
                        ) * param::kaon_nucleon_ratio(
                            table, type_p_bar, type_k_m, type_kaon, type_delta,
                        ) * param::kplusp_inelastic_background(s)
                    },
                    sqrt_s,
                    type_p_bar,
                    type_k_m,
                );
            }
            (codes::DELTA_P, codes::K_Z) | (codes::DELTA_Z, codes::K_P) => {
                let type_n = find(codes::N);
                let type_p = find(codes::P);
                let type_k_p = find(codes::K_P);
                let type_k_z = find(codes::K_Z);
                add_channel(
                    &mut process_list,
                    || {
                        detailed_balance_factor_rk(
                            sqrt_s, pcm, table, type_delta, type_kaon, type_n, type_k_p,
                        ) * param::kaon_nucleon_ratio(table, type_n, type_k_p, type_kaon, type_delta)
                            * param::kplusn_inelastic_background(s)
                    },
                    sqrt_s,
                    type_n,
                    type_k_p,
                );
                add_channel(
                    &mut process_list,
                    || {
                        detailed_balance_factor_rk(
                            sqrt_s, pcm, table, type_delta, type_kaon, type_p, type_k_z,
                        ) * param::kaon_nucleon_ratio(table, type_p, type_k_z, type_kaon, type_delta)
                            * param::kplusp_inelastic_background(s)
                    },
                    sqrt_s,
                    type_p,
                    type_k_z,
                );
            }
            (codes::DELTA_P_BAR, codes::KBAR_Z) | (codes::DELTA_Z_BAR, codes::K_M) => {
                let type_n_bar = find(codes::N_BAR);
                let type_p_bar = find(codes::P_BAR);
                let type_k_m = find(codes::K_M);
                let type_kbar_z = find(codes::KBAR_Z);
                add_channel(
                    &mut process_list,
                    || {
                        detailed_balance_factor_rk(
                            sqrt_s, pcm, table, type_delta, type_kaon, type_n_bar, type_k_m,
                        ) * param::kaon_nucleon_ratio(
                            table, type_n_bar, type_k_m, type_kaon, type_delta,
                        ) * param::kplusn_inelastic_background(s)
                    },
                    sqrt_s,
                    type_n_bar,
                    type_k_m,
                );
                add_channel(
                    &mut process_list,
                    || {
                        detailed_balance_factor_rk(
                            sqrt_s, pcm, table, type_delta, type_kaon, type_p_bar, type_kbar_z,
                        ) * param::kaon_nucleon_ratio(
                            table, type_p_bar, type_kbar_z, type_kaon, type_delta,
                        ) * param::kplusp_inelastic_background(s)
                    },
                    sqrt_s,
                    type_p_bar,
                    type_kbar_z,
                );
            }
            (codes::DELTA_Z, codes::K_Z) | (codes::DELTA_M, codes::K_P) => {
                let type_n = find(codes::N);
                let type_k_z = find(codes::K_Z);
                add_channel(
                    &mut process_list,
                    || {
                        detailed_balance_factor_rk(
                            sqrt_s, pcm, table, type_delta, type_kaon, type_n, type_k_z,
                        ) * param::kaon_nucleon_ratio(table, type_n, type_k_z, type_kaon, type_delta)
                            * param::kplusn_inelastic_background(s)
                    },
                    sqrt_s,
                    type_n,
                    type_k_z,
                );
            }
            (codes::DELTA_Z_BAR, codes::KBAR_Z) | (codes::DELTA_M_BAR, codes::K_M) => {
                let type_n_bar = find(codes::N_BAR);
                let type_kbar_z = find(codes::KBAR_Z);
                add_channel(
                    &mut process_list,
                    || {
                        detailed_balance_factor_rk(
                            sqrt_s, pcm, table, type_delta, type_kaon, type_n_bar, type_kbar_z,
                        ) * param::kaon_nucleon_ratio(
                            table, type_n_bar, type_kbar_z, type_kaon, type_delta,
                        ) * param::kplusn_inelastic_background(s)
                    },
                    sqrt_s,
                    type_n_bar,
                    type_kbar_z,
                );
            }
            _ => {}
        }

        process_list
    }

    /// Hyperon-pion strangeness exchange: the reverse of the K- N channels
    /// via the stable-stable detailed balance factor.
    fn ypi_xx(&self, included_2to2: IncludedReactions) -> Vec<CollisionBranch> {
        let mut process_list = Vec::new();
        if !included_2to2.strangeness_exchange {
            return process_list;
        }
        let a = self.incoming[0].ty();
        let b = self.incoming[1].ty();
        let type_hyperon = if a.pdgcode().is_hyperon() { a } else { b };
        let type_pion = if a.pdgcode().is_hyperon() { b } else { a };

        let pdg_hyperon = type_hyperon.pdgcode().code();
        let pdg_pion = type_pion.pdgcode().code();

        let s = self.mandelstam_s();
        let sqrt_s = self.sqrt_s;
        let table = self.table;
        let find = |pdg: i32| table.find(PdgCode(pdg));

        // Outgoing nucleon/kaon pair and forward K N fit per hyperon-pion
        // state; the cases not listed have no channel.
        type Forward = fn(f64) -> f64;
        let entry: Option<(i32, i32, Forward)> = match (pdg_hyperon, pdg_pion) {
            (codes::SIGMA_Z, codes::PI_M) => {
                Some((codes::N, codes::K_M, param::kminusn_piminussigma0 as Forward))
            }
            (codes::SIGMA_Z_BAR, codes::PI_P) => {
                Some((codes::N_BAR, codes::K_P, param::kminusn_piminussigma0 as Forward))
            }
            (codes::SIGMA_M, codes::PI_Z) => {
                Some((codes::N, codes::K_M, param::kminusn_pi0sigmaminus as Forward))
            }
            (codes::SIGMA_M_BAR, codes::PI_Z) => {
                Some((codes::N_BAR, codes::K_P, param::kminusn_pi0sigmaminus as Forward))
            }
            (codes::LAMBDA, codes::PI_M) => {
                Some((codes::N, codes::K_M, param::kminusn_piminuslambda as Forward))
            }
            (codes::LAMBDA_BAR, codes::PI_P) => {
                Some((codes::N_BAR, codes::K_P, param::kminusn_piminuslambda as Forward))
            }
            (codes::SIGMA_Z, codes::PI_Z) => {
                Some((codes::P, codes::K_M, param::kminusp_pi0sigma0 as Forward))
            }
            (codes::SIGMA_Z_BAR, codes::PI_Z) => {
                Some((codes::P_BAR, codes::K_P, param::kminusp_pi0sigma0 as Forward))
            }
            (codes::SIGMA_M, codes::PI_P) => {
                Some((codes::P, codes::K_M, param::kminusp_piplussigmaminus as Forward))
            }
            (codes::SIGMA_M_BAR, codes::PI_M) => {
                Some((codes::P_BAR, codes::K_P, param::kminusp_piplussigmaminus as Forward))
            }
            (codes::LAMBDA, codes::PI_Z) => {
                Some((codes::P, codes::K_M, param::kminusp_pi0lambda as Forward))
            }
            (codes::LAMBDA_BAR, codes::PI_Z) => {
                Some((codes::P_BAR, codes::K_P, param::kminusp_pi0lambda as Forward))
            }
            (codes::SIGMA_P, codes::PI_M) => {
                Some((codes::P, codes::K_M, param::kminusp_piminussigmaplus as Forward))
            }
            (codes::SIGMA_P_BAR, codes::PI_P) => {
                Some((codes::P_BAR, codes::K_P, param::kminusp_piminussigmaplus as Forward))
            }
            _ => None,
        };

        if let Some((nucleon, kaon, forward)) = entry {
            let type_nucleon = find(nucleon);
            let type_kaon = find(kaon);
            add_channel(
                &mut process_list,
                || {
                    detailed_balance_factor_stable(
                        s, type_hyperon, type_pion, type_nucleon, type_kaon,
                    ) * forward(sqrt_s)
                },
                sqrt_s,
                type_nucleon,
                type_kaon,
            );
        }

        process_list
    }

    /// pi d -> N N, pi d <-> pi d' channels.
    ///
    /// These deuteron channels deliberately ignore the 2->2 bitset: they are
    /// required for detailed balance of the light-nucleus sector whenever a
    /// nucleus species is present at all.
    fn dpi_xx(&self) -> Vec<CollisionBranch> {
        let mut process_list = Vec::new();
        let sqrts = self.sqrt_s;
        let type_a = self.incoming[0].ty();
        let type_b = self.incoming[1].ty();

        // pi d -> N N
        if (type_a.is_deuteron() && type_b.pdgcode().is_pion())
            || (type_b.is_deuteron() && type_a.pdgcode().is_pion())
        {
            let baryon_number = type_a.baryon_number() + type_b.baryon_number();
            let nuc = if baryon_number > 0 {
                self.table.list_nucleons()
            } else {
                self.table.list_anti_nucleons()
            };
            let s = self.mandelstam_s();
            for &nuc_a in &nuc {
                for &nuc_b in &nuc {
                    if type_a.charge() + type_b.charge() != nuc_a.charge() + nuc_b.charge() {
                        continue;
                    }
                    for two_i in ITotRange::new(nuc_a, nuc_b) {
                        let isospin_factor = isospin_clebsch_gordan_sqr_2to2(
                            type_a, type_b, nuc_a, nuc_b, two_i,
                        );
                        if isospin_factor.abs() < REALLY_SMALL {
                            continue;
                        }
                        let matrix_element =
                            nn_to_resonance_matrix_element(sqrts, type_a, type_b, two_i);
                        if matrix_element <= 0.0 {
                            continue;
                        }
                        let spin_factor = ((nuc_a.spin() + 1) * (nuc_b.spin() + 1)) as f64;
                        let sym_fac_in = if type_a.multiplet() == type_b.multiplet() {
                            2.0
                        } else {
                            1.0
                        };
                        let sym_fac_out = if nuc_a.multiplet() == nuc_b.multiplet() {
                            2.0
                        } else {
                            1.0
                        };
                        let p_cm_final = p_cm_from_s(s, nuc_a.mass(), nuc_b.mass());
                        let xsection = isospin_factor * spin_factor * sym_fac_in / sym_fac_out
                            * p_cm_final
                            * matrix_element
                            / (s * self.cm_momentum());
                        if xsection > REALLY_SMALL {
                            process_list.push(CollisionBranch::two(
                                nuc_a,
                                nuc_b,
                                xsection,
                                ProcessType::TwoToTwo,
                            ));
                        }
                    }
                }
            }
        }

        // pi d -> pi d' (effectively pi d -> pi p n) and the reverse
        if ((type_a.is_deuteron() || type_a.is_dprime()) && type_b.pdgcode().is_pion())
            || ((type_b.is_deuteron() || type_b.is_dprime()) && type_a.pdgcode().is_pion())
        {
            let type_pi = if type_a.pdgcode().is_pion() { type_a } else { type_b };
            let type_nucleus = if type_a.is_nucleus() { type_a } else { type_b };
            let s = self.mandelstam_s();
            for produced_nucleus in self.table.list_light_nuclei() {
                // No elastic nucleus collisions here; conservation laws
                if produced_nucleus.pdgcode() == type_nucleus.pdgcode()
                    || produced_nucleus.charge() != type_nucleus.charge()
                    || produced_nucleus.baryon_number() != type_nucleus.baryon_number()
                {
                    continue;
                }
                let tmp = sqrts - type_a.min_mass_kinematic() - type_b.min_mass_kinematic();
                if tmp <= 0.0 {
                    continue;
                }
                // Fit to the inelastic pi+ d -> pi+ n p cross section.
                let matrix_element = 295.5 + 2.862 / (0.00283735 + (sqrts - 2.181).powi(2))
                    + 0.0672 / (tmp * tmp)
                    - 6.61753 / tmp;
                let spin_factor = ((produced_nucleus.spin() + 1) * (type_pi.spin() + 1)) as f64;
                // Isospin factor is the same for every channel and already
                // absorbed into the matrix element, as is (hbarc)^2/16 pi.
                // The symmetry factor is 1 here.
                let mut xsection = matrix_element * spin_factor / (s * self.cm_momentum());
                if produced_nucleus.is_stable() {
                    xsection *= p_cm_from_s(s, type_pi.mass(), produced_nucleus.mass());
                } else {
                    xsection *= self.table.integral_pi_r(produced_nucleus, sqrts);
                }
                if xsection > REALLY_SMALL {
                    process_list.push(CollisionBranch::two(
                        type_pi,
                        produced_nucleus,
                        xsection,
                        ProcessType::TwoToTwo,
                    ));
                }
            }
        }
        process_list
    }

    /// N d <-> N d' conversion (and the antiparticle variants).
    ///
    /// Like `dpi_xx`, these channels ignore the 2->2 bitset.
    fn dn_xx(&self) -> Vec<CollisionBranch> {
        let type_a = self.incoming[0].ty();
        let type_b = self.incoming[1].ty();
        let type_n = if type_a.is_nucleon() { type_a } else { type_b };
        let type_nucleus = if type_a.is_nucleus() { type_a } else { type_b };
        let mut process_list = Vec::new();
        let s = self.mandelstam_s();
        let sqrts = self.sqrt_s;

        for produced_nucleus in self.table.list_light_nuclei() {
            // No elastic nucleus collisions here; conservation laws
            if produced_nucleus.pdgcode() == type_nucleus.pdgcode()
                || produced_nucleus.charge() != type_nucleus.charge()
                || produced_nucleus.baryon_number() != type_nucleus.baryon_number()
            {
                continue;
            }
            let matrix_element = if (type_n.baryon_number() < 0)
                == (type_nucleus.baryon_number() < 0)
            {
                // N d -> N d' and the antiparticle mirror
                let tmp =
                    sqrts - type_n.min_mass_kinematic() - type_nucleus.min_mass_kinematic();
                if tmp <= 0.0 {
                    continue;
                }
                // Fit to the experimental N d -> N n p cross section
                79.0474 / tmp.powf(0.7897) + 654.596 * tmp
            } else {
                // Nbar d -> Nbar d' and mirror: roughly constant fit to the
                // antiproton-deuteron breakup data
                681.4
            };
            let spin_factor = ((produced_nucleus.spin() + 1) * (type_n.spin() + 1)) as f64;
            // Isospin factor is the same for every channel and absorbed into
            // the matrix element, as is (hbarc)^2/16 pi. Symmetry factor 1.
            let mut xsection = matrix_element * spin_factor / (s * self.cm_momentum());
            if produced_nucleus.is_stable() {
                xsection *= p_cm_from_s(s, type_n.mass(), produced_nucleus.mass());
            } else {
                xsection *= self.table.integral_nr(produced_nucleus, sqrts);
            }
            if xsection > REALLY_SMALL {
                process_list.push(CollisionBranch::two(
                    type_n,
                    produced_nucleus,
                    xsection,
                    ProcessType::TwoToTwo,
                ));
            }
        }
        process_list
    }

    /// Resonance absorption R N -> N N / R Delta -> N N, via detailed
    /// balance from the production matrix element.
    fn bar_bar_to_nuc_nuc(&self, is_anti_particles: bool) -> Vec<CollisionBranch> {
        let type_a = self.incoming[0].ty();
        let type_b = self.incoming[1].ty();
        let mut process_list = Vec::new();

        let s = self.mandelstam_s();
        // c.m. momentum of the outgoing nucleon pair
        let p_cm_final = p_cm_from_s(s, NUCLEON_MASS, NUCLEON_MASS);

        let nuc_or_anti_nuc = if is_anti_particles {
            self.table.list_anti_nucleons()
        } else {
            self.table.list_nucleons()
        };

        for &nuc_a in &nuc_or_anti_nuc {
            for &nuc_b in &nuc_or_anti_nuc {
                if type_a.charge() + type_b.charge() != nuc_a.charge() + nuc_b.charge() {
                    continue;
                }
                for two_i in ITotRange::new(nuc_a, nuc_b) {
                    let isospin_factor =
                        isospin_clebsch_gordan_sqr_2to2(type_a, type_b, nuc_a, nuc_b, two_i);
                    if isospin_factor.abs() < REALLY_SMALL {
                        continue;
                    }
                    // matrix element of the inverse (production) process
                    let matrix_element =
                        nn_to_resonance_matrix_element(self.sqrt_s, type_a, type_b, two_i);
                    if matrix_element <= 0.0 {
                        continue;
                    }

                    let spin_factor = ((nuc_a.spin() + 1) * (nuc_b.spin() + 1)) as f64;
                    let sym_fac_in = if type_a.multiplet() == type_b.multiplet() {
                        2.0
                    } else {
                        1.0
                    };
                    let sym_fac_out = if nuc_a.multiplet() == nuc_b.multiplet() {
                        2.0
                    } else {
                        1.0
                    };
                    let xsection = isospin_factor * spin_factor * sym_fac_in / sym_fac_out
                        * p_cm_final
                        * matrix_element
                        / (s * self.cm_momentum());

                    if xsection > REALLY_SMALL {
                        process_list.push(CollisionBranch::two(
                            nuc_a,
                            nuc_b,
                            xsection,
                            ProcessType::TwoToTwo,
                        ));
                    }
                }
            }
        }
        process_list
    }

    /// Shared loop of the N N -> (resonance) (partner) channels: for every
    /// product pair, every allowed total isospin contributes a channel whose
    /// weight combines the isospin factor, the matrix element and the mass
    /// integral supplied by `integrator`.
    fn find_nn_xsection_from_type<F>(
        &self,
        list_res_1: &[&'a ParticleType],
        list_res_2: &[&'a ParticleType],
        integrator: F,
    ) -> Vec<CollisionBranch>
    where
        F: Fn(&ParticleType, &ParticleType) -> f64,
    {
        let type_a = self.incoming[0].ty();
        let type_b = self.incoming[1].ty();
        let mut channel_list = Vec::new();
        let s = self.mandelstam_s();

        for &type_res_1 in list_res_1 {
            for &type_res_2 in list_res_2 {
                if type_res_1.charge() + type_res_2.charge()
                    != type_a.charge() + type_b.charge()
                {
                    continue;
                }
                for two_i in ITotRange::new(type_a, type_b) {
                    let isospin_factor = isospin_clebsch_gordan_sqr_2to2(
                        type_a, type_b, type_res_1, type_res_2, two_i,
                    );
                    if isospin_factor.abs() < REALLY_SMALL {
                        continue;
                    }

                    // Integration limits; the integration needs a little
                    // room above threshold.
                    let lower_limit = type_res_1.min_mass_kinematic();
                    let upper_limit = self.sqrt_s - type_res_2.mass();
                    if upper_limit - lower_limit < 1e-3 {
                        continue;
                    }

                    let matrix_element = nn_to_resonance_matrix_element(
                        self.sqrt_s,
                        type_res_1,
                        type_res_2,
                        two_i,
                    );
                    if matrix_element <= 0.0 {
                        continue;
                    }

                    let resonance_integral = integrator(type_res_1, type_res_2);
                    let spin_factor =
                        ((type_res_1.spin() + 1) * (type_res_2.spin() + 1)) as f64;
                    let xsection = isospin_factor * spin_factor * matrix_element
                        * resonance_integral
                        / (s * self.cm_momentum());

                    if xsection > REALLY_SMALL {
                        channel_list.push(CollisionBranch::two(
                            type_res_1,
                            type_res_2,
                            xsection,
                            ProcessType::TwoToTwo,
                        ));
                    }
                }
            }
        }
        channel_list
    }

    // ---------------------------------------------------------------
    // String excitation
    // ---------------------------------------------------------------

    /// Partition the string budget into diffractive and soft/hard
    /// non-diffractive pieces, draw the soft subprocess, and emit the
    /// StringSoft / StringHard branches.
    fn string_excitation<R: Rng + ?Sized>(
        &self,
        string_process: Option<&mut dyn StringProcess>,
        rng: &mut R,
    ) -> Result<Vec<CollisionBranch>> {
        // String budget: parametrized total minus all non-string channels.
        let sig_string_all = (self.high_energy() - self.elastic_parametrization()?).max(0.0);

        // PDG ids for the diffractive parametrization: (anti)protons stand
        // in for (anti)baryons, pi+ for mesons, after de-excitation.
        let mut pdgid = [0i32; 2];
        for i in 0..2 {
            let pdg = self.incoming[i].pdgcode().deexcite();
            pdgid[i] = match pdg.baryon_number() {
                1 => 2212,
                -1 => -2212,
                _ => 211,
            };
        }

        let mut channel_list = Vec::new();
        if sig_string_all <= 0.0 {
            return Ok(channel_list);
        }
        // The parametrized total (I) and the generator's partial cross
        // sections (II) need not coincide. If I > II the non-diffractive
        // part is reinforced until I == II; if I < II the partial cross
        // sections are drained, first double-diffractive, then the two
        // single-diffractive pieces in proportion.
        let string_process = match string_process {
            Some(sp) => sp,
            None => return Err(ReactionError::MissingStringProcess),
        };
        let xs = string_process.cross_sections_diffractive(pdgid[0], pdgid[1], self.sqrt_s);
        let mut single_diffr_ax = xs[0];
        let mut single_diffr_xb = xs[1];
        let mut double_diffr = xs[2];
        let single_diffr = single_diffr_ax + single_diffr_xb;
        let mut diffractive = single_diffr + double_diffr;

        let nondiffractive_all = (sig_string_all - diffractive).max(0.0);
        diffractive = sig_string_all - nondiffractive_all;
        double_diffr = (diffractive - single_diffr).max(0.0);
        if single_diffr > 0.0 {
            let a = (diffractive - double_diffr) / single_diffr;
            single_diffr_ax *= a;
            single_diffr_xb *= a;
        }
        debug_assert!(
            (single_diffr_ax + single_diffr_xb + double_diffr + nondiffractive_all
                - sig_string_all)
                .abs()
                < 1e-6
        );

        // Hard split of the non-diffractive part.
        let hard_xsec = self.string_hard_cross_section();
        let nondiffractive_soft = if nondiffractive_all > 0.0 {
            nondiffractive_all * (-hard_xsec / nondiffractive_all).exp()
        } else {
            0.0
        };
        let nondiffractive_hard = nondiffractive_all - nondiffractive_soft;

        let sig_string_soft = sig_string_all - nondiffractive_hard;

        // Cumulative weights over the five sub-channels; only the first
        // four (the soft ones) take part in the draw, the hard bucket at
        // index 4 is emitted unconditionally alongside.
        let string_sub_cross_sections = [
            single_diffr_ax,
            single_diffr_xb,
            double_diffr,
            nondiffractive_soft,
            nondiffractive_hard,
        ];
        let mut string_sub_cross_sections_sum = [0.0f64; 6];
        for i in 0..5 {
            string_sub_cross_sections_sum[i + 1] =
                string_sub_cross_sections_sum[i] + string_sub_cross_sections[i];
        }

        let r_xsec = string_sub_cross_sections_sum[4] * rng.gen::<f64>();
        let mut subproc = None;
        for (i, proc) in [
            StringSoftType::SingleDiffAx,
            StringSoftType::SingleDiffXb,
            StringSoftType::DoubleDiff,
            StringSoftType::NonDiff,
        ]
        .iter()
        .enumerate()
        {
            if r_xsec >= string_sub_cross_sections_sum[i]
                && r_xsec < string_sub_cross_sections_sum[i + 1]
            {
                subproc = Some(*proc);
                break;
            }
        }
        let subproc = subproc.ok_or(ReactionError::SoftSubprocessUnresolved {
            weights: string_sub_cross_sections,
        })?;
        string_process.set_subproc(subproc);

        if sig_string_soft > 0.0 {
            channel_list.push(CollisionBranch::string(
                sig_string_soft,
                ProcessType::StringSoft,
            ));
        }
        if nondiffractive_hard > 0.0 {
            channel_list.push(CollisionBranch::string(
                nondiffractive_hard,
                ProcessType::StringHard,
            ));
        }
        Ok(channel_list)
    }

    /// Parametrized total cross section at high energy for the pair.
    fn high_energy(&self) -> f64 {
        let pdg_a = self.incoming[0].pdgcode();
        let pdg_b = self.incoming[1].pdgcode();
        let s = self.mandelstam_s();

        // All baryon-baryon collisions use the nucleon-nucleon fits.
        if pdg_a.is_baryon() && pdg_b.is_baryon() {
            if pdg_a == pdg_b {
                return param::pp_high_energy(s); // pp, nn
            } else if pdg_a.is_antiparticle_of(pdg_b) {
                return param::ppbar_high_energy(s); // ppbar, nnbar
            } else if pdg_a.antiparticle_sign() * pdg_b.antiparticle_sign() == 1 {
                return param::np_high_energy(s); // np, nbarpbar
            } else {
                return param::npbar_high_energy(s); // npbar, nbarp
            }
        }

        // Pion-nucleon interactions.
        let pair = (pdg_a.code(), pdg_b.code());
        let matches_any = |a: i32, b: i32| pair == (a, b) || pair == (b, a);
        if matches_any(codes::PI_P, codes::P) || matches_any(codes::PI_M, codes::N) {
            param::piplusp_high_energy(s) // pi+ p, pi- n
        } else if matches_any(codes::PI_M, codes::P) || matches_any(codes::PI_P, codes::N) {
            param::piminusp_high_energy(s) // pi- p, pi+ n
        } else {
            0.0
        }
    }

    /// Hard string cross section: nucleon-nucleon, nucleon-pion or
    /// pion-pion fit depending on the species classes.
    fn string_hard_cross_section(&self) -> f64 {
        let s = self.mandelstam_s();
        let a_baryon = self.incoming[0].is_baryon();
        let b_baryon = self.incoming[1].is_baryon();
        if a_baryon && b_baryon {
            param::nn_string_hard(s)
        } else if a_baryon || b_baryon {
            param::npi_string_hard(s)
        } else {
            param::pipi_string_hard(s)
        }
    }

    // ---------------------------------------------------------------
    // NNbar closure
    // ---------------------------------------------------------------

    /// Annihilation residual: parametrized ppbar total minus everything
    /// already in the list, into h1(1170) rho0.
    fn nnbar_annihilation(&self, current_xs: f64) -> Option<CollisionBranch> {
        let s = self.mandelstam_s();
        let nnbar_xsec = (param::ppbar_total(s) - current_xs).max(0.0);
        if nnbar_xsec <= REALLY_SMALL {
            return None;
        }
        let h1 = self.table.find(PdgCode(codes::H1));
        let rho_z = self.table.find(PdgCode(codes::RHO_Z));
        Some(CollisionBranch::two(
            h1,
            rho_z,
            nnbar_xsec,
            ProcessType::TwoToTwo,
        ))
    }

    /// Reverse of the annihilation channel: rho0 h1 -> p pbar and n nbar
    /// with the broad-broad detailed balance factor.
    fn nnbar_creation(&self) -> Vec<CollisionBranch> {
        let mut channel_list = Vec::new();
        let s = self.mandelstam_s();
        let pcm = self.cm_momentum();

        let type_n = self.table.find(PdgCode(codes::P));
        let type_nbar = self.table.find(PdgCode(-codes::P));

        // Check available energy
        if self.sqrt_s - 2.0 * type_n.mass() < 0.0 {
            return channel_list;
        }

        let xsection = detailed_balance_factor_rr(
            self.sqrt_s,
            pcm,
            self.table,
            self.incoming[0].ty(),
            self.incoming[1].ty(),
            type_n,
            type_nbar,
        ) * (param::ppbar_total(s) - param::ppbar_elastic(s)).max(0.0);

        if xsection > REALLY_SMALL {
            channel_list.push(CollisionBranch::two(
                type_n,
                type_nbar,
                xsection,
                ProcessType::TwoToTwo,
            ));
            channel_list.push(CollisionBranch::two(
                self.table.find(PdgCode(codes::N)),
                self.table.find(PdgCode(-codes::N)),
                xsection,
                ProcessType::TwoToTwo,
            ));
        }
        channel_list
    }

    // ---------------------------------------------------------------
    // Regime selection
    // ---------------------------------------------------------------

    /// Decide whether this pair scatters through string excitation. NN and
    /// pi N pairs cross over probabilistically inside a finite window; all
    /// other species never form strings.
    fn decide_string<R: Rng + ?Sized>(
        &self,
        strings_switch: bool,
        both_are_nucleons: bool,
        rng: &mut R,
    ) -> bool {
        let t1 = self.incoming[0].ty();
        let t2 = self.incoming[1].ty();

        let (include_strings, center, half_width) = if both_are_nucleons {
            (true, 4.5, 0.5)
        } else if (t1.pdgcode().is_pion() && t2.is_nucleon())
            || (t1.is_nucleon() && t2.pdgcode().is_pion())
        {
            (true, 2.7, 0.4)
        } else {
            (false, 0.0, 0.0)
        };

        if !(strings_switch && include_strings) {
            return false;
        }
        if self.sqrt_s > center + half_width {
            true
        } else if self.sqrt_s > center - half_width {
            let probability = (self.sqrt_s - center + half_width) / (2.0 * half_width);
            rng.gen::<f64>() < probability
        } else {
            false
        }
    }
}

/// Matrix elements |M|^2 for N N -> X production (and their inverses),
/// constant or simply parametrized per final-state class. States not listed
/// are zero.
pub fn nn_to_resonance_matrix_element(
    sqrts: f64,
    type_a: &ParticleType,
    type_b: &ParticleType,
    two_i: i32,
) -> f64 {
    let m_a = type_a.mass();
    let m_b = type_b.mass();
    let msqr = 2.0 * (m_a * m_a + m_b * m_b);
    // Far above the pole masses plus widths the collision is neglected.
    let w_a = type_a.width_at_pole();
    let w_b = type_b.width_at_pole();
    let uplmt = m_a + m_b + 3.0 * (w_a + w_b) + 3.0;
    if sqrts > uplmt {
        return 0.0;
    }

    let same_sign = type_a.antiparticle_sign() == type_b.antiparticle_sign();
    let is_nd = (type_a.is_delta() && type_b.is_nucleon())
        || (type_b.is_delta() && type_a.is_nucleon());
    let is_nnstar = (type_a.is_nstar() && type_b.is_nucleon())
        || (type_b.is_nstar() && type_a.is_nucleon());
    let is_ndstar = (type_a.is_deltastar() && type_b.is_nucleon())
        || (type_b.is_deltastar() && type_a.is_nucleon());
    let is_dd = type_a.is_delta() && type_b.is_delta();
    let is_nstar_d = (type_a.is_nstar() && type_b.is_delta())
        || (type_b.is_nstar() && type_a.is_delta());
    let is_dstar_d = (type_a.is_deltastar() && type_b.is_delta())
        || (type_b.is_deltastar() && type_a.is_delta());
    let is_dpi = (type_a.is_deuteron() && type_b.pdgcode().is_pion())
        || (type_b.is_deuteron() && type_a.pdgcode().is_pion());

    if is_nd && same_sign {
        // N N -> N Delta: sqrt(s) dependence fit to a one-boson-exchange
        // calculation
        68.0 / (sqrts - 1.104).powf(1.951)
    } else if is_nnstar && same_sign {
        // N N -> N N*
        if two_i == 2 {
            7.0 / msqr
        } else if two_i == 0 {
            let parametrization = 14.0 / msqr;
            // The pn -> pn eta cross section exceeds pp -> pp eta by a
            // factor 6.5; since the eta comes from an intermediate N*(1535),
            // its production in pn carries an explicit isospin asymmetry.
            if type_a.is_nstar1535() || type_b.is_nstar1535() {
                6.5 * parametrization
            } else {
                parametrization
            }
        } else {
            0.0
        }
    } else if is_ndstar && same_sign {
        // N N -> N Delta*
        15.0 / msqr
    } else if is_dd && same_sign {
        // N N -> Delta Delta
        if two_i == 2 {
            45.0 / msqr
        } else if two_i == 0 {
            120.0 / msqr
        } else {
            0.0
        }
    } else if is_nstar_d && same_sign {
        // N N -> Delta N*
        7.0 / msqr
    } else if is_dstar_d && same_sign {
        // N N -> Delta Delta*
        if two_i == 2 {
            15.0 / msqr
        } else if two_i == 0 {
            25.0 / msqr
        } else {
            0.0
        }
    } else if is_dpi {
        // Fit to the d pi -> N N cross section: a Breit-Wigner-like part
        // with an exponential fixing the behavior near threshold.
        0.055 / ((sqrts - 2.145).powi(2) + 0.065f64.powi(2))
            * (1.0 - (-(sqrts - 2.0) * 20.0).exp())
    } else {
        // all cases not listed: zero
        0.0
    }
}
