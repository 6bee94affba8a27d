// Conservation laws, detailed-balance round trips, antiparticle mirroring
// and branch ordering, checked over a grid of pairs and energies.

use rand::rngs::StdRng;
use rand::SeedableRng;

use hadron_reactions::parametrization;
use hadron_reactions::{
    build_channels, codes, detailed_balance_factor_rk, nn_to_resonance_matrix_element, p_cm,
    CollisionBranch, IncludedReactions, NNbarTreatment, ParticleData, ParticleTable, PdgCode,
    ProcessType, ScatterPolicy,
};

fn data(table: &ParticleTable, pdg: i32) -> ParticleData<'_> {
    ParticleData::new(table.find(PdgCode(pdg)))
}

fn all_on_no_strings() -> ScatterPolicy {
    ScatterPolicy {
        elastic_parameter: -1.0,
        two_to_one: true,
        included_2to2: IncludedReactions::all(),
        low_snn_cut: 1.98,
        strings_switch: false,
        nnbar_treatment: NNbarTreatment::NoAnnihilation,
    }
}

fn run(table: &ParticleTable, a: i32, b: i32, sqrt_s: f64) -> Vec<CollisionBranch> {
    let mut rng = StdRng::seed_from_u64(99);
    build_channels(
        (data(table, a), data(table, b)),
        sqrt_s,
        &all_on_no_strings(),
        table,
        None,
        &mut rng,
    )
    .unwrap()
}

fn charge_of(table: &ParticleTable, pdg: PdgCode) -> i32 {
    table.find(pdg).charge()
}

#[test]
fn charge_and_baryon_number_conserved_on_every_branch() {
    let table = ParticleTable::with_default_types();
    let pairs = [
        (codes::P, codes::P, 2.2),
        (codes::P, codes::N, 2.3),
        (codes::P_BAR, codes::N_BAR, 2.3),
        (codes::PI_P, codes::P, 1.6),
        (codes::K_M, codes::P, 1.8),
        (codes::K_P, codes::N, 1.9),
        (codes::DELTA_PP, codes::K_Z, 2.2),
        (codes::SIGMA_P, codes::PI_M, 1.8),
        (codes::N, codes::DEUTERON, 3.0),
        (codes::PI_M, codes::DEUTERON, 2.2),
        (codes::DELTA_P, codes::N, 2.4),
    ];
    for (a, b, sqrt_s) in pairs {
        let charge_in = charge_of(&table, PdgCode(a)) + charge_of(&table, PdgCode(b));
        let baryon_in = PdgCode(a).baryon_number() + PdgCode(b).baryon_number();
        for branch in run(&table, a, b, sqrt_s) {
            // String branches carry no fixed products.
            if branch.products().is_empty() {
                continue;
            }
            let charge_out: i32 = branch
                .products()
                .iter()
                .map(|&p| charge_of(&table, p))
                .sum();
            let baryon_out: i32 = branch.products().iter().map(|&p| p.baryon_number()).sum();
            assert_eq!(charge_in, charge_out, "charge violated: {:?}", branch);
            assert_eq!(baryon_in, baryon_out, "baryon number violated: {:?}", branch);
            assert!(branch.weight().is_finite() && branch.weight() > 0.0);
        }
    }
}

#[test]
fn every_two_body_branch_is_above_threshold() {
    let table = ParticleTable::with_default_types();
    for (a, b, sqrt_s) in [
        (codes::P, codes::N, 2.3),
        (codes::K_M, codes::P, 1.8),
        (codes::PI_P, codes::DEUTERON, 2.2),
    ] {
        for branch in run(&table, a, b, sqrt_s) {
            if branch.products().len() == 2 {
                let m_min: f64 = branch
                    .products()
                    .iter()
                    .map(|&p| table.find(p).min_mass_spectral())
                    .sum();
                assert!(
                    sqrt_s > m_min,
                    "branch {:?} below threshold at sqrt_s = {}",
                    branch,
                    sqrt_s
                );
            }
        }
    }
}

#[test]
fn antiparticle_mirroring_gives_identical_weights() {
    let table = ParticleTable::with_default_types();
    let pairs = [
        (codes::K_M, codes::P, codes::K_P, codes::P_BAR, 1.8),
        (codes::PI_P, codes::P, codes::PI_M, codes::P_BAR, 1.6),
        (codes::P, codes::N, codes::P_BAR, codes::N_BAR, 2.3),
    ];
    for (a, b, abar, bbar, sqrt_s) in pairs {
        let forward = run(&table, a, b, sqrt_s);
        let mirrored = run(&table, abar, bbar, sqrt_s);
        assert_eq!(forward.len(), mirrored.len(), "at sqrt_s = {}", sqrt_s);
        for branch in &forward {
            let anti_products: Vec<PdgCode> =
                branch.products().iter().map(|p| p.anti()).collect();
            let partner = mirrored
                .iter()
                .find(|m| {
                    let mut lhs = anti_products.clone();
                    let mut rhs = m.products().to_vec();
                    lhs.sort_by_key(|p| p.code());
                    rhs.sort_by_key(|p| p.code());
                    lhs == rhs && m.kind() == branch.kind()
                })
                .unwrap_or_else(|| panic!("no mirror for {:?}", branch));
            assert!(
                (partner.weight() - branch.weight()).abs() <= 1e-9 * branch.weight(),
                "weights differ: {:?} vs {:?}",
                branch,
                partner
            );
        }
    }
}

#[test]
fn branch_ordering_is_elastic_then_formation_then_two_to_two() {
    let table = ParticleTable::with_default_types();
    let list = run(&table, codes::P, codes::N, 2.3);
    let rank = |k: ProcessType| match k {
        ProcessType::Elastic => 0,
        ProcessType::TwoToOne => 1,
        ProcessType::TwoToTwo => 2,
        ProcessType::StringSoft | ProcessType::StringHard => 3,
    };
    let ranks: Vec<i32> = list.iter().map(|b| rank(b.kind())).collect();
    let mut sorted = ranks.clone();
    sorted.sort_unstable();
    assert_eq!(ranks, sorted, "branch buckets out of order: {:?}", ranks);
    // All three buckets are populated for np at this energy.
    assert!(ranks.contains(&0) && ranks.contains(&1) && ranks.contains(&2));
}

#[test]
fn delta_kaon_reverse_matches_forward_through_balance_factor() {
    // K+ p -> K0 Delta++ forward versus Delta++ K0 -> p K+ reverse.
    let table = ParticleTable::with_default_types();
    let sqrt_s = 2.2;
    let s = sqrt_s * sqrt_s;

    let forward = run(&table, codes::K_P, codes::P, sqrt_s);
    let forward_branch = forward
        .iter()
        .find(|b| {
            b.products() == [PdgCode(codes::K_Z), PdgCode(codes::DELTA_PP)].as_slice()
        })
        .expect("no K0 Delta++ channel");

    let reverse = run(&table, codes::DELTA_PP, codes::K_Z, sqrt_s);
    let reverse_branch = reverse
        .iter()
        .find(|b| b.products() == [PdgCode(codes::P), PdgCode(codes::K_P)].as_slice())
        .expect("no p K+ channel");

    let delta = table.find(PdgCode(codes::DELTA_PP));
    let k_z = table.find(PdgCode(codes::K_Z));
    let p = table.find(PdgCode(codes::P));
    let k_p = table.find(PdgCode(codes::K_P));
    let pcm = p_cm(sqrt_s, delta.mass(), k_z.mass());
    let factor = detailed_balance_factor_rk(sqrt_s, pcm, &table, delta, k_z, p, k_p);

    // sigma_reverse = R * sigma_forward with the forward fit evaluated at
    // the same s; the shared isospin ratio cancels.
    let ratio_forward = forward_branch.weight() / parametrization::kplusp_inelastic_background(s);
    let expected = factor * ratio_forward * parametrization::kplusp_inelastic_background(s);
    assert!(
        (reverse_branch.weight() - expected).abs() <= 1e-9 * expected,
        "reverse {} expected {}",
        reverse_branch.weight(),
        expected
    );
}

#[test]
fn isospin_closure_for_nn_to_n_delta() {
    // Summing the N Delta weights over final charge states reproduces the
    // single isospin-summed expression, because the per-channel CG^2 add
    // up to one.
    let table = ParticleTable::with_default_types();
    let sqrt_s = 2.2;
    let s = sqrt_s * sqrt_s;

    let policy = ScatterPolicy {
        two_to_one: false,
        included_2to2: IncludedReactions {
            nn_to_nr: true,
            ..IncludedReactions::none()
        },
        strings_switch: false,
        ..all_on_no_strings()
    };
    let mut rng = StdRng::seed_from_u64(7);
    let list = build_channels(
        (data(&table, codes::P), data(&table, codes::P)),
        sqrt_s,
        &policy,
        &table,
        None,
        &mut rng,
    )
    .unwrap();

    let delta_sum: f64 = list
        .iter()
        .filter(|b| {
            b.products()
                .iter()
                .any(|&p| table.find(p).is_delta())
        })
        .map(|b| b.weight())
        .sum();

    let delta = table.find(PdgCode(codes::DELTA_PP));
    let n = table.find(PdgCode(codes::N));
    let spin_factor = ((delta.spin() + 1) * (n.spin() + 1)) as f64;
    let matrix_element = nn_to_resonance_matrix_element(sqrt_s, delta, n, 2);
    let pcm = p_cm(sqrt_s, 0.938, 0.938);
    let summed =
        spin_factor * matrix_element * table.integral_nr(delta, sqrt_s) / (s * pcm);

    assert!(
        (delta_sum - summed).abs() <= 1e-9 * summed,
        "sum over channels {} vs isospin-summed {}",
        delta_sum,
        summed
    );
}

#[test]
fn rho_h1_creates_nnbar_pairs() {
    let table = ParticleTable::with_default_types();
    let sqrt_s = 2.5;
    let policy = ScatterPolicy {
        nnbar_treatment: NNbarTreatment::Resonances,
        two_to_one: false,
        included_2to2: IncludedReactions::none(),
        strings_switch: false,
        ..all_on_no_strings()
    };
    let mut rng = StdRng::seed_from_u64(8);
    let list = build_channels(
        (data(&table, codes::RHO_Z), data(&table, codes::H1)),
        sqrt_s,
        &policy,
        &table,
        None,
        &mut rng,
    )
    .unwrap();

    // Two reverse branches, p pbar and n nbar, with equal weights.
    assert_eq!(list.len(), 2, "{:?}", list);
    assert_eq!(
        list[0].products(),
        &[PdgCode(codes::P), PdgCode(codes::P_BAR)]
    );
    assert_eq!(
        list[1].products(),
        &[PdgCode(codes::N), PdgCode(codes::N_BAR)]
    );
    assert_eq!(list[0].weight(), list[1].weight());
    assert!(list[0].weight() > 0.0);

    // Order of the incoming pair does not matter.
    let mut rng = StdRng::seed_from_u64(8);
    let swapped = build_channels(
        (data(&table, codes::H1), data(&table, codes::RHO_Z)),
        sqrt_s,
        &policy,
        &table,
        None,
        &mut rng,
    )
    .unwrap();
    assert_eq!(swapped.len(), 2);
    // The double mass integral is evaluated in swapped order, so the two
    // values agree only to integration accuracy.
    assert!((swapped[0].weight() - list[0].weight()).abs() < 1e-2 * list[0].weight());
}
