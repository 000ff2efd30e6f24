//! # dalitz-amplitudes
//!
//! Resonance amplitudes for three- and four-body decays. Every amplitude is a stateless
//! descriptor evaluated against a decay topology and a single event, and every amplitude can be
//! summed over identical-particle permutations through [`symmetrize`].
#![warn(clippy::perf, clippy::style)]
#![allow(clippy::excessive_precision)]

use dalitz_core::{FourBodyDecay, Real, Symmetrization, ThreeBodyDecay, ThreeBodyEvent};
use num::Complex;

/// Breit-Wigner amplitudes.
pub mod breit_wigner;
/// Phase-space (flat) amplitudes.
pub mod common;
/// The Flatté amplitude.
pub mod flatte;
/// Four-body kinematics and composite four-body amplitudes.
pub mod four_body;
/// Tagged unions over every supported amplitude.
pub mod resonance;
/// The identical-particle symmetrization combinator.
pub mod symmetrize;

pub use breit_wigner::{BreitWigner, BreitWignerOnly};
pub use common::{Flat, FlatFourBody};
pub use flatte::Flatte;
pub use four_body::{FourBodyKinematics, FourBodyPoint, SequentialChain, VectorPair};
pub use resonance::{FourBodyResonance, Resonance, ThreeBodyResonance};

/// An amplitude for the three-body decay $`P \to abc`$.
pub trait ThreeBodyAmplitude {
    /// The name this amplitude was registered under.
    fn name(&self) -> &str;

    /// Evaluate the amplitude at a single point of the Dalitz plot.
    fn value<T: Real>(&self, decay: &ThreeBodyDecay, event: &ThreeBodyEvent<T>) -> Complex<T>;

    /// Evaluate the amplitude summed over the $`a \leftrightarrow c`$ exchange.
    fn value_symmetrized<T: Real>(
        &self,
        decay: &ThreeBodyDecay,
        event: &ThreeBodyEvent<T>,
    ) -> Complex<T> {
        symmetrize::symmetrize(event.permutations(), |permuted| {
            self.value(decay, &permuted)
        })
    }

    /// Evaluate the amplitude with or without symmetrization.
    fn evaluate<T: Real>(
        &self,
        decay: &ThreeBodyDecay,
        event: &ThreeBodyEvent<T>,
        symmetrization: Symmetrization,
    ) -> Complex<T> {
        if symmetrization.is_symmetrized() {
            self.value_symmetrized(decay, event)
        } else {
            self.value(decay, event)
        }
    }
}

/// An amplitude for the four-body decay $`P \to abcd`$.
///
/// Four-body amplitudes are evaluated on a [`FourBodyPoint`], which bundles a (possibly
/// relabeled) event with its angular variables, so the angles are computed once per event and
/// shared between all amplitudes of a model.
pub trait FourBodyAmplitude {
    /// The name this amplitude was registered under.
    fn name(&self) -> &str;

    /// Evaluate the amplitude at a single labeling of the final state.
    fn value<T: Real>(&self, decay: &FourBodyDecay, point: &FourBodyPoint<T>) -> Complex<T>;

    /// Evaluate the amplitude at the event as given, or zero outside the physical region.
    fn value_unsymmetrized<T: Real>(
        &self,
        decay: &FourBodyDecay,
        kinematics: &FourBodyKinematics<T>,
    ) -> Complex<T> {
        kinematics
            .identity()
            .map(|point| self.value(decay, point))
            .unwrap_or_else(|| Complex::new(T::zero(), T::zero()))
    }

    /// Evaluate the amplitude summed over the four relabelings of two identical pairs, or zero
    /// outside the physical region.
    fn value_symmetrized<T: Real>(
        &self,
        decay: &FourBodyDecay,
        kinematics: &FourBodyKinematics<T>,
    ) -> Complex<T> {
        symmetrize::symmetrize(kinematics.points(), |point| self.value(decay, point))
    }

    /// Evaluate the amplitude with or without symmetrization.
    fn evaluate<T: Real>(
        &self,
        decay: &FourBodyDecay,
        kinematics: &FourBodyKinematics<T>,
        symmetrization: Symmetrization,
    ) -> Complex<T> {
        if symmetrization.is_symmetrized() {
            self.value_symmetrized(decay, kinematics)
        } else {
            self.value_unsymmetrized(decay, kinematics)
        }
    }
}
