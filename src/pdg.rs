use serde::{Deserialize, Serialize};

/// PDG Monte-Carlo particle code.
///
/// The kernel dispatches on a small set of hadron codes; everything it needs
/// to know about a code (antiparticle sign, coarse species class, baryon
/// number) is derivable from the digits. Light nuclei use the 10-digit
/// nuclear codes (10LZZZAAAI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PdgCode(pub i32);

/// Named codes for every species the kernel hard-codes a table for.
pub mod codes {
    pub const P: i32 = 2212;
    pub const N: i32 = 2112;
    pub const P_BAR: i32 = -P;
    pub const N_BAR: i32 = -N;
    pub const PI_P: i32 = 211;
    pub const PI_Z: i32 = 111;
    pub const PI_M: i32 = -211;
    pub const K_P: i32 = 321;
    pub const K_Z: i32 = 311;
    pub const K_M: i32 = -321;
    pub const KBAR_Z: i32 = -311;
    pub const SIGMA_P: i32 = 3222;
    pub const SIGMA_Z: i32 = 3212;
    pub const SIGMA_M: i32 = 3112;
    pub const LAMBDA: i32 = 3122;
    pub const DELTA_PP: i32 = 2224;
    pub const DELTA_P: i32 = 2214;
    pub const DELTA_Z: i32 = 2114;
    pub const DELTA_M: i32 = 1114;
    pub const DELTA_PP_BAR: i32 = -DELTA_PP;
    pub const DELTA_P_BAR: i32 = -DELTA_P;
    pub const DELTA_Z_BAR: i32 = -DELTA_Z;
    pub const DELTA_M_BAR: i32 = -DELTA_M;
    pub const SIGMA_P_BAR: i32 = -SIGMA_P;
    pub const SIGMA_Z_BAR: i32 = -SIGMA_Z;
    pub const SIGMA_M_BAR: i32 = -SIGMA_M;
    pub const LAMBDA_BAR: i32 = -LAMBDA;
    pub const RHO_Z: i32 = 113;
    pub const H1: i32 = 10223;
    /// Deuteron, nuclear code.
    pub const DEUTERON: i32 = 1_000_010_020;
    /// d', the unstable deuteron partner used for pi d -> pi n p kinematics.
    pub const DPRIME: i32 = 1_000_010_021;
}

impl PdgCode {
    pub fn code(self) -> i32 {
        self.0
    }

    /// The antiparticle's code. Self-conjugate mesons (pi0, rho0, h1) map
    /// onto themselves.
    pub fn anti(self) -> PdgCode {
        if self.is_self_conjugate() {
            self
        } else {
            PdgCode(-self.0)
        }
    }

    fn is_self_conjugate(self) -> bool {
        matches!(self.0, codes::PI_Z | codes::RHO_Z | codes::H1)
    }

    /// -1 for an antiparticle code, +1 otherwise.
    pub fn antiparticle_sign(self) -> i32 {
        if self.0 < 0 {
            -1
        } else {
            1
        }
    }

    pub fn is_antiparticle_of(self, other: PdgCode) -> bool {
        !self.is_self_conjugate() && self.0 == -other.0
    }

    pub fn is_nucleon(self) -> bool {
        matches!(self.0.abs(), codes::P | codes::N)
    }

    pub fn is_pion(self) -> bool {
        matches!(self.0, codes::PI_P | codes::PI_Z | codes::PI_M)
    }

    pub fn is_kaon(self) -> bool {
        matches!(self.0.abs(), codes::K_P | codes::K_Z)
    }

    pub fn is_delta(self) -> bool {
        matches!(
            self.0.abs(),
            codes::DELTA_PP | codes::DELTA_P | codes::DELTA_Z | codes::DELTA_M
        )
    }

    pub fn is_hyperon(self) -> bool {
        matches!(
            self.0.abs(),
            codes::SIGMA_P | codes::SIGMA_Z | codes::SIGMA_M | codes::LAMBDA
        )
    }

    pub fn is_nucleus(self) -> bool {
        self.0.abs() >= 1_000_000_000
    }

    pub fn is_baryon(self) -> bool {
        !self.is_nucleus() && (self.0.abs() % 10_000) / 1000 != 0
    }

    pub fn is_meson(self) -> bool {
        !self.is_nucleus() && !self.is_baryon() && self.0.abs() > 100
    }

    /// Baryon number: +-1 for (anti)baryons, A for nuclei, 0 for mesons.
    pub fn baryon_number(self) -> i32 {
        if self.is_nucleus() {
            let a = (self.0.abs() / 10) % 1000;
            a * self.0.signum()
        } else if self.is_baryon() {
            self.0.signum()
        } else {
            0
        }
    }

    /// Strip the excitation digits, mapping an excited hadron onto its
    /// ground-state multiplet (N(1440) -> N, Delta(1600) -> Delta).
    /// Nuclei are left untouched.
    pub fn deexcite(self) -> PdgCode {
        if self.is_nucleus() {
            self
        } else {
            PdgCode(self.0.signum() * (self.0.abs() % 10_000))
        }
    }
}

impl std::fmt::Display for PdgCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_classes() {
        assert!(PdgCode(codes::P).is_nucleon());
        assert!(PdgCode(-codes::N).is_nucleon());
        assert!(PdgCode(codes::PI_M).is_pion());
        assert!(PdgCode(codes::KBAR_Z).is_kaon());
        assert!(PdgCode(-codes::DELTA_PP).is_delta());
        assert!(PdgCode(codes::LAMBDA).is_hyperon());
        assert!(PdgCode(codes::DEUTERON).is_nucleus());
        assert!(PdgCode(codes::H1).is_meson());
        assert!(PdgCode(22212).is_baryon()); // N(1535)+
        assert!(!PdgCode(codes::RHO_Z).is_baryon());
    }

    #[test]
    fn test_baryon_number() {
        assert_eq!(PdgCode(codes::P).baryon_number(), 1);
        assert_eq!(PdgCode(-codes::P).baryon_number(), -1);
        assert_eq!(PdgCode(codes::PI_P).baryon_number(), 0);
        assert_eq!(PdgCode(codes::DEUTERON).baryon_number(), 2);
        assert_eq!(PdgCode(-codes::DEUTERON).baryon_number(), -2);
    }

    #[test]
    fn test_antiparticle_mapping() {
        assert_eq!(PdgCode(codes::P).anti(), PdgCode(-codes::P));
        // pi0 is its own antiparticle
        assert_eq!(PdgCode(codes::PI_Z).anti(), PdgCode(codes::PI_Z));
        assert!(PdgCode(codes::K_P).is_antiparticle_of(PdgCode(codes::K_M)));
        assert!(!PdgCode(codes::PI_Z).is_antiparticle_of(PdgCode(codes::PI_Z)));
    }

    #[test]
    fn test_deexcite() {
        assert_eq!(PdgCode(12212).deexcite(), PdgCode(codes::P)); // N(1440)+
        assert_eq!(PdgCode(-32224).deexcite(), PdgCode(-codes::DELTA_PP));
        assert_eq!(PdgCode(codes::DEUTERON).deexcite(), PdgCode(codes::DEUTERON));
    }
}
