use dalitz_core::{DalitzResult, FourBodyDecay, Real, ThreeBodyDecay, ThreeBodyEvent};
use num::Complex;
use serde::{Deserialize, Serialize};

use crate::{
    BreitWigner, BreitWignerOnly, Flat, FlatFourBody, Flatte, FourBodyAmplitude,
    FourBodyKinematics, FourBodyPoint, SequentialChain, ThreeBodyAmplitude, VectorPair,
};

/// Every supported three-body amplitude.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ThreeBodyResonance {
    Flat(Flat),
    BreitWigner(BreitWigner),
    BreitWignerOnly(BreitWignerOnly),
    Flatte(Flatte),
}

impl ThreeBodyResonance {
    /// Re-check construction invariants, e.g. after deserialization.
    pub fn validate(&self) -> DalitzResult<()> {
        match self {
            Self::BreitWigner(bw) => bw.validate(),
            Self::BreitWignerOnly(bw) => bw.validate(),
            Self::Flatte(flatte) => flatte.validate(),
            Self::Flat(_) => Ok(()),
        }
    }
}

impl ThreeBodyAmplitude for ThreeBodyResonance {
    fn name(&self) -> &str {
        match self {
            Self::Flat(a) => a.name(),
            Self::BreitWigner(a) => a.name(),
            Self::BreitWignerOnly(a) => a.name(),
            Self::Flatte(a) => a.name(),
        }
    }

    fn value<T: Real>(&self, decay: &ThreeBodyDecay, event: &ThreeBodyEvent<T>) -> Complex<T> {
        match self {
            Self::Flat(a) => a.value(decay, event),
            Self::BreitWigner(a) => a.value(decay, event),
            Self::BreitWignerOnly(a) => a.value(decay, event),
            Self::Flatte(a) => a.value(decay, event),
        }
    }

    fn value_symmetrized<T: Real>(
        &self,
        decay: &ThreeBodyDecay,
        event: &ThreeBodyEvent<T>,
    ) -> Complex<T> {
        match self {
            Self::Flat(a) => a.value_symmetrized(decay, event),
            Self::BreitWigner(a) => a.value_symmetrized(decay, event),
            Self::BreitWignerOnly(a) => a.value_symmetrized(decay, event),
            Self::Flatte(a) => a.value_symmetrized(decay, event),
        }
    }
}

impl From<Flat> for ThreeBodyResonance {
    fn from(value: Flat) -> Self {
        Self::Flat(value)
    }
}

impl From<BreitWigner> for ThreeBodyResonance {
    fn from(value: BreitWigner) -> Self {
        Self::BreitWigner(value)
    }
}

impl From<BreitWignerOnly> for ThreeBodyResonance {
    fn from(value: BreitWignerOnly) -> Self {
        Self::BreitWignerOnly(value)
    }
}

impl From<Flatte> for ThreeBodyResonance {
    fn from(value: Flatte) -> Self {
        Self::Flatte(value)
    }
}

/// Every supported four-body amplitude.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FourBodyResonance {
    Flat(FlatFourBody),
    Chain(SequentialChain),
    VectorPair(VectorPair),
}

impl FourBodyResonance {
    /// Re-check construction invariants against the decay the amplitude is attached to.
    pub fn validate(&self, decay: &FourBodyDecay) -> DalitzResult<()> {
        match self {
            Self::Flat(_) => Ok(()),
            Self::Chain(chain) => chain.validate(decay),
            Self::VectorPair(pair) => pair.validate(),
        }
    }
}

impl FourBodyAmplitude for FourBodyResonance {
    fn name(&self) -> &str {
        match self {
            Self::Flat(a) => a.name(),
            Self::Chain(a) => a.name(),
            Self::VectorPair(a) => a.name(),
        }
    }

    fn value<T: Real>(&self, decay: &FourBodyDecay, point: &FourBodyPoint<T>) -> Complex<T> {
        match self {
            Self::Flat(a) => a.value(decay, point),
            Self::Chain(a) => a.value(decay, point),
            Self::VectorPair(a) => a.value(decay, point),
        }
    }

    fn value_symmetrized<T: Real>(
        &self,
        decay: &FourBodyDecay,
        kinematics: &FourBodyKinematics<T>,
    ) -> Complex<T> {
        match self {
            Self::Flat(a) => a.value_symmetrized(decay, kinematics),
            Self::Chain(a) => a.value_symmetrized(decay, kinematics),
            Self::VectorPair(a) => a.value_symmetrized(decay, kinematics),
        }
    }
}

impl From<FlatFourBody> for FourBodyResonance {
    fn from(value: FlatFourBody) -> Self {
        Self::Flat(value)
    }
}

impl From<SequentialChain> for FourBodyResonance {
    fn from(value: SequentialChain) -> Self {
        Self::Chain(value)
    }
}

impl From<VectorPair> for FourBodyResonance {
    fn from(value: VectorPair) -> Self {
        Self::VectorPair(value)
    }
}

/// A resonance of either topology.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Resonance {
    ThreeBody(ThreeBodyResonance),
    FourBody(FourBodyResonance),
}

impl Resonance {
    pub fn name(&self) -> &str {
        match self {
            Self::ThreeBody(r) => r.name(),
            Self::FourBody(r) => r.name(),
        }
    }

    /// The number of final-state particles of the decay this resonance describes.
    pub fn n_daughters(&self) -> usize {
        match self {
            Self::ThreeBody(_) => 3,
            Self::FourBody(_) => 4,
        }
    }
}

impl From<ThreeBodyResonance> for Resonance {
    fn from(value: ThreeBodyResonance) -> Self {
        Self::ThreeBody(value)
    }
}

impl From<FourBodyResonance> for Resonance {
    fn from(value: FourBodyResonance) -> Self {
        Self::FourBody(value)
    }
}
