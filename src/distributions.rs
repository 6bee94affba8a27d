// Spectral profiles and the thermal momentum sampler used by the
// initial-state routines that feed the reaction kernel.

use nalgebra::Vector3;
use rand::Rng;

use crate::error::{ReactionError, Result};
use crate::special_functions::{bessel_k1, bessel_k2};

/// Iteration budget for the rejection sampler. The acceptance rate is a few
/// percent at worst, so hitting this bound means the inputs are broken.
const MAX_REJECTION_STEPS: usize = 1_000_000;

/// Relativistic Breit-Wigner amplitude squared of a resonance with pole mass
/// `resonance_mass` and width `resonance_width`, evaluated at invariant mass
/// `srts`:
///
/// BW = 2 s Gamma / (pi ((s - M^2)^2 + s Gamma^2))
pub fn breit_wigner(srts: f64, resonance_mass: f64, resonance_width: f64) -> f64 {
    let s = srts * srts;
    let a = s * resonance_width * resonance_width;
    let b = s - resonance_mass * resonance_mass;
    2.0 * s * resonance_width / (std::f64::consts::PI * (b * b + a))
}

/// Non-relativistic Cauchy profile with pole `pole` and half-width `width`.
pub fn cauchy(x: f64, pole: f64, width: f64) -> f64 {
    let dm = x - pole;
    width / (std::f64::consts::PI * (dm * dm + width * width))
}

/// Boltzmann density in energy: p^2 exp(-E/T) up to the angular factor.
pub fn density_integrand(energy: f64, momentum_sqr: f64, temperature: f64) -> f64 {
    4.0 * std::f64::consts::PI * momentum_sqr * (-energy / temperature).exp()
}

/// Mean energy of the Maxwell-Juttner distribution,
/// <E> = 3T + m K1(m/T) / K2(m/T).
pub fn juttner_mean_energy(temperature: f64, mass: f64) -> f64 {
    let m_over_t = mass / temperature;
    3.0 * temperature + mass * bessel_k1(m_over_t) / bessel_k2(m_over_t)
}

/// Draw a momentum magnitude from the thermal (Maxwell-Juttner) distribution
/// p^2 exp(-E/T) with E = sqrt(p^2 + m^2).
///
/// Rejection sampling on energy in [m, 50 T]. The proposal ceiling is twice
/// the density at the analytic mean energy; the factor 2 keeps the ceiling
/// above the distribution's maximum over the whole window.
pub fn sample_momenta<R: Rng + ?Sized>(
    temperature: f64,
    mass: f64,
    rng: &mut R,
) -> Result<f64> {
    let energy_average = juttner_mean_energy(temperature, mass);
    let momentum_average_sqr = (energy_average - mass) * (energy_average + mass);

    let energy_min = mass;
    let energy_max = 50.0 * temperature;
    let probability_max =
        2.0 * density_integrand(energy_average, momentum_average_sqr, temperature);

    for _ in 0..MAX_REJECTION_STEPS {
        let energy = rng.gen_range(energy_min..energy_max);
        let momentum_radial_sqr = (energy - mass) * (energy + mass);
        let probability = density_integrand(energy, momentum_radial_sqr, temperature);
        if rng.gen_range(0.0..probability_max) <= probability {
            return Ok(momentum_radial_sqr.sqrt());
        }
    }
    Err(ReactionError::SamplerNotConverged {
        temperature,
        mass,
        iterations: MAX_REJECTION_STEPS,
    })
}

/// Thermal 3-momentum: magnitude from [`sample_momenta`], direction uniform
/// on the sphere.
pub fn sample_momenta_3d<R: Rng + ?Sized>(
    temperature: f64,
    mass: f64,
    rng: &mut R,
) -> Result<Vector3<f64>> {
    let p = sample_momenta(temperature, mass, rng)?;
    let mu = 2.0 * rng.gen::<f64>() - 1.0;
    let phi = 2.0 * std::f64::consts::PI * rng.gen::<f64>();
    let sin_theta = (1.0 - mu * mu).sqrt();
    Ok(Vector3::new(
        p * sin_theta * phi.cos(),
        p * sin_theta * phi.sin(),
        p * mu,
    ))
}

// =====================
//        TESTS
// =====================
