use dalitz_core::{
    flatte_propagator_with_channels, DalitzResult, DalitzSpin, FlatteChannel, Particle, Real,
    ThreeBodyDecay, ThreeBodyEvent,
};
use num::Complex;
use serde::{Deserialize, Serialize};

use crate::{
    breit_wigner::{barriers_and_spin, check_dalitz_spin, check_spin_matches},
    ThreeBodyAmplitude,
};

/// A Flatté resonance in the $`ab`$ channel of $`P \to abc`$, for states like the
/// $`f_0(980)`$ which sit on a coupled-channel threshold:
/// ```math
/// A(m^2_{ab}, m^2_{bc}) = F_P F_R Z_J \frac{1}{M_R^2 - m^2_{ab} - \frac{2i}{m_{ab}} \sum_k g_k^2 q_k(m^2_{ab})}
/// ```
/// The barrier and spin factors are the same as in [`BreitWigner`](crate::BreitWigner). By
/// default the width runs over the $`\pi\pi`$ and $`K\bar{K}`$ channels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flatte {
    name: String,
    resonance: Particle,
    spin: DalitzSpin,
    channels: Vec<FlatteChannel<f64>>,
}

impl Flatte {
    /// Construct a [`Flatte`] with $`\pi\pi`$ and $`K\bar{K}`$ couplings.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::UnsupportedZemach`](dalitz_core::DalitzError::UnsupportedZemach) if
    /// the resonance spin exceeds 2.
    pub fn new(name: &str, resonance: Particle, g_pp: f64, g_kk: f64) -> DalitzResult<Self> {
        Self::with_channels(
            name,
            resonance,
            vec![
                FlatteChannel::pion_pair(g_pp),
                FlatteChannel::kaon_pair(g_kk),
            ],
        )
    }

    /// Construct a [`Flatte`] over an arbitrary list of channels.
    pub fn with_channels(
        name: &str,
        resonance: Particle,
        channels: Vec<FlatteChannel<f64>>,
    ) -> DalitzResult<Self> {
        Ok(Self {
            name: name.to_string(),
            spin: check_dalitz_spin(&resonance)?,
            resonance,
            channels,
        })
    }

    pub fn resonance(&self) -> &Particle {
        &self.resonance
    }

    pub fn channels(&self) -> &[FlatteChannel<f64>] {
        &self.channels
    }

    /// Re-check the construction invariants, e.g. after deserialization.
    pub fn validate(&self) -> DalitzResult<()> {
        check_spin_matches(&self.name, &self.resonance, self.spin)
    }
}

impl ThreeBodyAmplitude for Flatte {
    fn name(&self) -> &str {
        &self.name
    }

    fn value<T: Real>(&self, decay: &ThreeBodyDecay, event: &ThreeBodyEvent<T>) -> Complex<T> {
        if !decay.is_valid(event) {
            return Complex::new(T::zero(), T::zero());
        }
        let propagator = flatte_propagator_with_channels(
            self.resonance.m(),
            event.m2_ab,
            self.channels.iter().map(FlatteChannel::lift),
        );
        propagator * barriers_and_spin(&self.resonance, self.spin, decay, event)
    }
}
