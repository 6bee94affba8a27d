use serde::{Deserialize, Serialize};

use crate::particle::ParticleType;
use crate::pdg::PdgCode;

/// How a branch came about; the surrounding engine dispatches its final
/// state sampling on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessType {
    Elastic,
    TwoToOne,
    TwoToTwo,
    StringSoft,
    StringHard,
}

/// One candidate reaction channel: the outgoing species and its exclusive
/// partial cross section in mb. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionBranch {
    products: Vec<PdgCode>,
    weight: f64,
    kind: ProcessType,
}

impl CollisionBranch {
    /// Two-body final state.
    pub fn two(type_a: &ParticleType, type_b: &ParticleType, weight: f64, kind: ProcessType) -> Self {
        CollisionBranch {
            products: vec![type_a.pdgcode(), type_b.pdgcode()],
            weight,
            kind,
        }
    }

    /// Single-resonance final state (2 -> 1 formation).
    pub fn one(resonance: &ParticleType, weight: f64, kind: ProcessType) -> Self {
        CollisionBranch {
            products: vec![resonance.pdgcode()],
            weight,
            kind,
        }
    }

    /// String branch: the final state is produced by the string generator,
    /// so no products are fixed here.
    pub fn string(weight: f64, kind: ProcessType) -> Self {
        CollisionBranch {
            products: Vec::new(),
            weight,
            kind,
        }
    }

    pub fn products(&self) -> &[PdgCode] {
        &self.products
    }

    /// Partial cross section in mb.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn kind(&self) -> ProcessType {
        self.kind
    }
}

/// Sum of the weights of a branch list: the total cross section of the pair
/// under the current policy.
pub fn sum_xs_of(list: &[CollisionBranch]) -> f64 {
    list.iter().map(|b| b.weight()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdg::codes;

    fn nucleon() -> ParticleType {
        ParticleType::new("p", codes::P, 0.938, 0.0, 0.938, 1, 1, 1, 1, 0, "N", vec![])
    }

    #[test]
    fn test_branch_accessors() {
        let p = nucleon();
        let b = CollisionBranch::two(&p, &p, 12.5, ProcessType::Elastic);
        assert_eq!(b.products().len(), 2);
        assert_eq!(b.weight(), 12.5);
        assert_eq!(b.kind(), ProcessType::Elastic);
    }

    #[test]
    fn test_sum_xs() {
        let p = nucleon();
        let list = vec![
            CollisionBranch::two(&p, &p, 10.0, ProcessType::Elastic),
            CollisionBranch::string(2.5, ProcessType::StringSoft),
        ];
        assert_eq!(sum_xs_of(&list), 12.5);
    }
}
