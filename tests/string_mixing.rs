// The soft/hard string budget: partition arithmetic, crossover window and
// subprocess recording.

use rand::rngs::StdRng;
use rand::SeedableRng;

use hadron_reactions::parametrization;
use hadron_reactions::{
    build_channels, codes, DiffractiveFits, IncludedReactions, NNbarTreatment, ParticleData,
    ParticleTable, PdgCode, ProcessType, ReactionError, ScatterPolicy, StringProcess,
};

fn data(table: &ParticleTable, pdg: i32) -> ParticleData<'_> {
    ParticleData::new(table.find(PdgCode(pdg)))
}

fn string_policy() -> ScatterPolicy {
    ScatterPolicy {
        elastic_parameter: -1.0,
        two_to_one: false,
        included_2to2: IncludedReactions {
            elastic: true,
            ..IncludedReactions::none()
        },
        low_snn_cut: 1.98,
        strings_switch: true,
        nnbar_treatment: NNbarTreatment::NoAnnihilation,
    }
}

#[test]
fn nn_string_budget_closes_against_high_energy_total() {
    let table = ParticleTable::with_default_types();
    let mut rng = StdRng::seed_from_u64(21);
    let mut fits = DiffractiveFits::new();
    let sqrt_s = 6.0;
    let s = sqrt_s * sqrt_s;

    let list = build_channels(
        (data(&table, codes::P), data(&table, codes::P)),
        sqrt_s,
        &string_policy(),
        &table,
        Some(&mut fits),
        &mut rng,
    )
    .unwrap();

    let elastic: f64 = list
        .iter()
        .filter(|b| b.kind() == ProcessType::Elastic)
        .map(|b| b.weight())
        .sum();
    assert!((elastic - parametrization::pp_elastic(s)).abs() < 1e-12);

    let string_total: f64 = list
        .iter()
        .filter(|b| matches!(b.kind(), ProcessType::StringSoft | ProcessType::StringHard))
        .map(|b| b.weight())
        .sum();
    let budget =
        (parametrization::pp_high_energy(s) - parametrization::pp_elastic(s)).max(0.0);
    assert!(
        (string_total - budget).abs() < 1e-9 * budget,
        "strings {} vs budget {}",
        string_total,
        budget
    );

    // Both soft and hard branches appear at this energy, soft before hard.
    let kinds: Vec<ProcessType> = list.iter().map(|b| b.kind()).collect();
    let soft_idx = kinds.iter().position(|&k| k == ProcessType::StringSoft);
    let hard_idx = kinds.iter().position(|&k| k == ProcessType::StringHard);
    assert!(soft_idx.is_some() && hard_idx.is_some(), "{:?}", kinds);
    assert!(soft_idx < hard_idx);

    // The draw recorded a soft subprocess on the provider.
    assert!(fits.subproc().is_some());
}

#[test]
fn below_the_window_no_strings_above_always_strings() {
    let table = ParticleTable::with_default_types();
    let mut fits = DiffractiveFits::new();

    // Below the NN window (4.5 +- 0.5) minus the width: never strings.
    let mut rng = StdRng::seed_from_u64(22);
    let list = build_channels(
        (data(&table, codes::P), data(&table, codes::N)),
        3.5,
        &string_policy(),
        &table,
        Some(&mut fits),
        &mut rng,
    )
    .unwrap();
    assert!(list
        .iter()
        .all(|b| !matches!(b.kind(), ProcessType::StringSoft | ProcessType::StringHard)));

    // Above the window: always strings.
    let list = build_channels(
        (data(&table, codes::P), data(&table, codes::N)),
        5.5,
        &string_policy(),
        &table,
        Some(&mut fits),
        &mut rng,
    )
    .unwrap();
    assert!(list
        .iter()
        .any(|b| matches!(b.kind(), ProcessType::StringSoft | ProcessType::StringHard)));
}

#[test]
fn mixed_window_uses_strings_with_finite_probability() {
    let table = ParticleTable::with_default_types();
    let mut fits = DiffractiveFits::new();
    let mut rng = StdRng::seed_from_u64(23);

    // In the middle of the pi N window (2.7 +- 0.4) roughly half the calls
    // should pick strings.
    let mut string_calls = 0;
    let n = 2000;
    for _ in 0..n {
        let list = build_channels(
            (data(&table, codes::PI_P), data(&table, codes::P)),
            2.7,
            &string_policy(),
            &table,
            Some(&mut fits),
            &mut rng,
        )
        .unwrap();
        if list
            .iter()
            .any(|b| matches!(b.kind(), ProcessType::StringSoft | ProcessType::StringHard))
        {
            string_calls += 1;
        }
    }
    let fraction = string_calls as f64 / n as f64;
    assert!(
        (fraction - 0.5).abs() < 0.05,
        "string fraction {} far from 1/2",
        fraction
    );
}

#[test]
fn pi_n_strings_need_a_provider() {
    let table = ParticleTable::with_default_types();
    let mut rng = StdRng::seed_from_u64(24);
    let err = build_channels(
        (data(&table, codes::PI_M), data(&table, codes::P)),
        4.0,
        &string_policy(),
        &table,
        None,
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(err, ReactionError::MissingStringProcess);
}

/// Provider stub reporting fixed diffractive cross sections, to pin down
/// the drain-and-rescale arithmetic.
struct FixedDiffractive {
    xs: [f64; 3],
    subproc_set: bool,
}

impl StringProcess for FixedDiffractive {
    fn cross_sections_diffractive(&self, _pdg_a: i32, _pdg_b: i32, _sqrt_s: f64) -> [f64; 3] {
        self.xs
    }
    fn set_subproc(&mut self, _subproc: hadron_reactions::StringSoftType) {
        self.subproc_set = true;
    }
}

#[test]
fn oversized_diffractive_cross_sections_are_drained_to_the_budget() {
    let table = ParticleTable::with_default_types();
    let mut rng = StdRng::seed_from_u64(25);
    let sqrt_s = 6.0;
    let s = sqrt_s * sqrt_s;

    // Make the generator report far more diffraction than the budget.
    let mut provider = FixedDiffractive {
        xs: [100.0, 100.0, 100.0],
        subproc_set: false,
    };
    let list = build_channels(
        (data(&table, codes::P), data(&table, codes::P)),
        sqrt_s,
        &string_policy(),
        &table,
        Some(&mut provider),
        &mut rng,
    )
    .unwrap();

    let budget =
        (parametrization::pp_high_energy(s) - parametrization::pp_elastic(s)).max(0.0);
    let string_total: f64 = list
        .iter()
        .filter(|b| matches!(b.kind(), ProcessType::StringSoft | ProcessType::StringHard))
        .map(|b| b.weight())
        .sum();
    // Everything is diffractive now, so the whole budget is soft.
    assert!(
        (string_total - budget).abs() < 1e-9 * budget,
        "total {} vs budget {}",
        string_total,
        budget
    );
    assert!(list
        .iter()
        .all(|b| b.kind() != ProcessType::StringHard));
    assert!(provider.subproc_set);
}
