use dalitz_core::{FourBodyDecay, Real, ThreeBodyDecay, ThreeBodyEvent};
use num::Complex;
use serde::{Deserialize, Serialize};

use crate::{FourBodyAmplitude, FourBodyKinematics, FourBodyPoint, ThreeBodyAmplitude};

/// A non-resonant three-body amplitude, equal to one inside the Dalitz plot and zero outside.
///
/// A constant is already symmetric under relabeling, so its symmetrized value is its plain
/// value rather than the sum over both labelings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flat {
    name: String,
}

impl Flat {
    /// Construct a [`Flat`] amplitude registered under `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl ThreeBodyAmplitude for Flat {
    fn name(&self) -> &str {
        &self.name
    }

    fn value<T: Real>(&self, decay: &ThreeBodyDecay, event: &ThreeBodyEvent<T>) -> Complex<T> {
        if decay.is_valid(event) {
            Complex::new(T::one(), T::zero())
        } else {
            Complex::new(T::zero(), T::zero())
        }
    }

    fn value_symmetrized<T: Real>(
        &self,
        decay: &ThreeBodyDecay,
        event: &ThreeBodyEvent<T>,
    ) -> Complex<T> {
        self.value(decay, event)
    }
}

/// A non-resonant four-body amplitude, equal to one inside the physical region and zero
/// outside. Like [`Flat`], it is not summed over relabelings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatFourBody {
    name: String,
}

impl FlatFourBody {
    /// Construct a [`FlatFourBody`] amplitude registered under `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl FourBodyAmplitude for FlatFourBody {
    fn name(&self) -> &str {
        &self.name
    }

    fn value<T: Real>(&self, _decay: &FourBodyDecay, _point: &FourBodyPoint<T>) -> Complex<T> {
        Complex::new(T::one(), T::zero())
    }

    fn value_symmetrized<T: Real>(
        &self,
        decay: &FourBodyDecay,
        kinematics: &FourBodyKinematics<T>,
    ) -> Complex<T> {
        self.value_unsymmetrized(decay, kinematics)
    }
}
