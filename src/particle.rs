use crate::constants::WIDTH_CUTOFF;
use crate::distributions::breit_wigner;
use crate::pdg::{codes, PdgCode};

/// A two-body decay mode of a resonance, identified by the multiplet labels
/// of its products. The branching ratios of one resonance sum to at most 1.
#[derive(Debug, Clone)]
pub struct DecayMode {
    pub multiplet_a: &'static str,
    pub multiplet_b: &'static str,
    pub branching: f64,
}

/// Static properties of one particle species.
///
/// Read-only once the table is built; all isospin quantum numbers are stored
/// doubled (2J, 2I, 2I_z) so that half-integer spins stay integral.
#[derive(Debug, Clone)]
pub struct ParticleType {
    name: &'static str,
    pdg: PdgCode,
    mass: f64,
    width: f64,
    min_mass_kinematic: f64,
    min_mass_spectral: f64,
    spin: u32,
    isospin: u32,
    isospin3: i32,
    charge: i32,
    strangeness: i32,
    multiplet: &'static str,
    decay_modes: Vec<DecayMode>,
}

impl PartialEq for ParticleType {
    fn eq(&self, other: &Self) -> bool {
        self.pdg == other.pdg
    }
}

impl ParticleType {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &'static str,
        pdg: i32,
        mass: f64,
        width: f64,
        min_mass_kinematic: f64,
        spin: u32,
        isospin: u32,
        isospin3: i32,
        charge: i32,
        strangeness: i32,
        multiplet: &'static str,
        decay_modes: Vec<DecayMode>,
    ) -> Self {
        ParticleType {
            name,
            pdg: PdgCode(pdg),
            mass,
            width,
            min_mass_kinematic,
            min_mass_spectral: min_mass_kinematic,
            spin,
            isospin,
            isospin3,
            charge,
            strangeness,
            multiplet,
            decay_modes,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn pdgcode(&self) -> PdgCode {
        self.pdg
    }
    /// Pole mass in GeV.
    pub fn mass(&self) -> f64 {
        self.mass
    }
    /// Total width at the pole in GeV.
    pub fn width_at_pole(&self) -> f64 {
        self.width
    }
    /// Minimum mass allowed by the lightest decay channel.
    pub fn min_mass_kinematic(&self) -> f64 {
        self.min_mass_kinematic
    }
    /// Minimum mass at which the spectral function is nonzero. For stable
    /// species this is the pole mass.
    pub fn min_mass_spectral(&self) -> f64 {
        if self.is_stable() {
            self.mass
        } else {
            self.min_mass_spectral
        }
    }
    /// 2J.
    pub fn spin(&self) -> u32 {
        self.spin
    }
    /// 2I.
    pub fn isospin(&self) -> u32 {
        self.isospin
    }
    /// 2I_z.
    pub fn isospin3(&self) -> i32 {
        self.isospin3
    }
    pub fn charge(&self) -> i32 {
        self.charge
    }
    pub fn strangeness(&self) -> i32 {
        self.strangeness
    }
    /// Label shared by all charge states of one isospin multiplet.
    pub fn multiplet(&self) -> &'static str {
        self.multiplet
    }
    pub fn decay_modes(&self) -> &[DecayMode] {
        &self.decay_modes
    }

    pub fn baryon_number(&self) -> i32 {
        self.pdg.baryon_number()
    }
    pub fn antiparticle_sign(&self) -> i32 {
        self.pdg.antiparticle_sign()
    }

    pub fn is_stable(&self) -> bool {
        self.width < WIDTH_CUTOFF
    }
    pub fn is_nucleon(&self) -> bool {
        self.pdg.is_nucleon()
    }
    pub fn is_pion(&self) -> bool {
        self.pdg.is_pion()
    }
    pub fn is_kaon(&self) -> bool {
        self.pdg.is_kaon()
    }
    pub fn is_delta(&self) -> bool {
        self.pdg.is_delta()
    }
    pub fn is_hyperon(&self) -> bool {
        self.pdg.is_hyperon()
    }
    pub fn is_baryon(&self) -> bool {
        self.pdg.is_baryon()
    }
    pub fn is_meson(&self) -> bool {
        self.pdg.is_meson()
    }
    pub fn is_nucleus(&self) -> bool {
        self.pdg.is_nucleus()
    }
    pub fn is_deuteron(&self) -> bool {
        self.pdg.code().abs() == codes::DEUTERON
    }
    pub fn is_dprime(&self) -> bool {
        self.pdg.code().abs() == codes::DPRIME
    }

    /// Excited nucleon states (isospin 1/2 baryon resonances).
    pub fn is_nstar(&self) -> bool {
        self.is_baryon()
            && self.isospin == 1
            && self.strangeness == 0
            && !self.is_nucleon()
            && !self.is_stable()
    }

    /// The N*(1535), singled out because of its anomalous pn production.
    pub fn is_nstar1535(&self) -> bool {
        self.pdg.code().abs() == 22212 || self.pdg.code().abs() == 22112
    }

    /// Excited Delta states (isospin 3/2 resonances above the Delta(1232)).
    pub fn is_deltastar(&self) -> bool {
        self.is_baryon() && self.isospin == 3 && !self.is_delta() && !self.is_stable()
    }

    /// Spectral function of the species at invariant mass `m`: a relativistic
    /// Breit-Wigner, zero below the spectral threshold.
    pub fn spectral_function(&self, m: f64) -> f64 {
        if m <= self.min_mass_spectral() {
            0.0
        } else {
            breit_wigner(m, self.mass, self.width)
        }
    }
}

/// One incoming particle of a collision: its species plus the (possibly
/// off-shell) mass the transport engine assigned to it.
#[derive(Debug, Clone, Copy)]
pub struct ParticleData<'a> {
    ty: &'a ParticleType,
    effective_mass: f64,
}

impl<'a> ParticleData<'a> {
    /// On-shell particle at the pole mass.
    pub fn new(ty: &'a ParticleType) -> Self {
        ParticleData {
            ty,
            effective_mass: ty.mass(),
        }
    }

    /// Off-shell particle, e.g. a broad resonance sampled away from its pole.
    pub fn with_mass(ty: &'a ParticleType, effective_mass: f64) -> Self {
        ParticleData { ty, effective_mass }
    }

    pub fn ty(&self) -> &'a ParticleType {
        self.ty
    }

    pub fn effective_mass(&self) -> f64 {
        self.effective_mass
    }

    pub fn pdgcode(&self) -> PdgCode {
        self.ty.pdgcode()
    }

    pub fn is_baryon(&self) -> bool {
        self.ty.is_baryon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_pp() -> ParticleType {
        ParticleType::new(
            "Δ++",
            codes::DELTA_PP,
            1.232,
            0.117,
            1.076,
            3,
            3,
            3,
            2,
            0,
            "Δ",
            vec![DecayMode {
                multiplet_a: "N",
                multiplet_b: "π",
                branching: 1.0,
            }],
        )
    }

    #[test]
    fn test_classification() {
        let d = delta_pp();
        assert!(d.is_delta());
        assert!(!d.is_stable());
        assert!(!d.is_nstar());
        assert!(!d.is_deltastar());
        assert_eq!(d.baryon_number(), 1);
        assert_eq!(d.min_mass_spectral(), 1.076);
    }

    #[test]
    fn test_spectral_function_vanishes_below_threshold() {
        let d = delta_pp();
        assert_eq!(d.spectral_function(1.0), 0.0);
        assert!(d.spectral_function(1.232) > 0.0);
    }

    #[test]
    fn test_particle_data_effective_mass() {
        let d = delta_pp();
        let on_shell = ParticleData::new(&d);
        assert_eq!(on_shell.effective_mass(), 1.232);
        let off_shell = ParticleData::with_mass(&d, 1.18);
        assert_eq!(off_shell.effective_mass(), 1.18);
        assert_eq!(off_shell.pdgcode(), PdgCode(codes::DELTA_PP));
    }
}
