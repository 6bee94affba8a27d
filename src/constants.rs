// Physical constants and unit conversions shared across the kernel.
//
// Energies and masses are in GeV, cross sections in mb. Squared amplitudes
// come out of the formulas in GeV^-2 and are converted with
// HBARC * HBARC / FM2_MB.

/// hbar * c in GeV * fm.
pub const HBARC: f64 = 0.197327053;

/// Conversion factor fm^2 per mb (1 mb = 0.1 fm^2).
pub const FM2_MB: f64 = 0.1;

/// Cutoff below which cross sections and Clebsch-Gordan weights are
/// treated as zero and the channel is dropped.
pub const REALLY_SMALL: f64 = 1.0e-6;

/// Resonances with a pole width below this value are treated as stable.
pub const WIDTH_CUTOFF: f64 = 1.0e-5;

/// Nucleon pole mass in GeV (isospin-averaged, shared by p and n).
pub const NUCLEON_MASS: f64 = 0.938;

/// Pion mass in GeV (isospin-averaged).
pub const PION_MASS: f64 = 0.138;

/// Kaon mass in GeV (isospin-averaged).
pub const KAON_MASS: f64 = 0.494;

/// Deuteron mass in GeV.
pub const DEUTERON_MASS: f64 = 1.8756;
