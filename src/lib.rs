// Reaction-channel kernel for a hadronic transport engine.
//
// Given the species and kinematics of two incoming hadrons, the kernel
// enumerates every two-body reaction channel the model allows (elastic,
// resonance formation, 2->2 production and absorption, string excitation,
// NNbar annihilation) and returns a weighted list of candidate outcomes for
// the surrounding transport code to sample from.

mod clebsch_gordan;
mod collision_branch;
mod config;
pub mod constants;
mod cross_sections;
mod detailed_balance;
mod distributions;
mod error;
mod kinematics;
mod parametrizations;
mod particle;
mod pdg;
mod registry;
mod special_functions;
mod string_process;
mod utilities;

pub use collision_branch::{sum_xs_of, CollisionBranch, ProcessType};
pub use config::{IncludedReactions, NNbarTreatment, ScatterPolicy};
pub use cross_sections::{build_channels, nn_to_resonance_matrix_element, CrossSections};
pub use error::{ReactionError, Result};
pub use particle::{DecayMode, ParticleData, ParticleType};
pub use pdg::{codes, PdgCode};
pub use registry::ParticleTable;
pub use string_process::{DiffractiveFits, StringProcess, StringSoftType};

// Lower-level building blocks, exposed for the surrounding engine (thermal
// initial conditions, decay sampling) and for tests.
pub use clebsch_gordan::{
    clebsch_gordan, isospin_clebsch_gordan_sqr_2to1, isospin_clebsch_gordan_sqr_2to2, wigner_3j,
    ITotRange,
};
pub use detailed_balance::{
    detailed_balance_factor_rk, detailed_balance_factor_rr, detailed_balance_factor_stable,
};
pub use distributions::{
    breit_wigner, cauchy, density_integrand, juttner_mean_energy, sample_momenta,
    sample_momenta_3d,
};
pub use kinematics::{p_cm, p_cm_from_s, p_cm_sqr, p_cm_sqr_from_s, plab_from_s, plab_from_s_ab};
pub use special_functions::{bessel_k0, bessel_k1, bessel_k2};

pub mod parametrization {
    //! The flat registry of parametrized cross sections, re-exported for
    //! callers that need the raw fits (e.g. total cross-section output).
    pub use crate::parametrizations::*;
}
