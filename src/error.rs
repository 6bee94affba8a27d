use thiserror::Error;

/// Fatal conditions that abort a single kernel call.
///
/// Everything here is a model or wiring bug, not a physics outcome:
/// below-threshold channels, vanishing Clebsch-Gordan weights and tiny
/// cross sections are skipped silently and never reach this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReactionError {
    /// A parametrization returned a non-positive cross section for a
    /// reaction the dispatcher committed to evaluating. Clamping to zero
    /// would hide a broken fit, so this surfaces with all inputs.
    #[error(
        "invalid parametrization: a={name_a} b={name_b} 2j_a={spin_a} 2j_b={spin_b} \
         sigma={sigma} s={mandelstam_s}"
    )]
    InvalidParametrization {
        name_a: &'static str,
        name_b: &'static str,
        spin_a: u32,
        spin_b: u32,
        sigma: f64,
        mandelstam_s: f64,
    },

    /// The string regime was selected but no string process was passed in.
    #[error("string process should be initialized")]
    MissingStringProcess,

    /// The cumulative draw over the soft string sub-channels landed in no
    /// bucket, which means the weights upstream are corrupt.
    #[error("soft string subprocess is not specified (weights {weights:?})")]
    SoftSubprocessUnresolved { weights: [f64; 5] },

    /// The thermal momentum sampler exhausted its iteration budget.
    #[error(
        "thermal sampler did not converge after {iterations} iterations \
         (T={temperature}, m={mass})"
    )]
    SamplerNotConverged {
        temperature: f64,
        mass: f64,
        iterations: usize,
    },
}

pub type Result<T> = std::result::Result<T, ReactionError>;
