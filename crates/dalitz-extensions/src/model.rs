use accurate::{sum::Klein, traits::*};
use dalitz_amplitudes::{
    FourBodyAmplitude, FourBodyKinematics, FourBodyResonance, Resonance, ThreeBodyAmplitude,
    ThreeBodyResonance,
};
use dalitz_core::{
    utils::vectors::AmplitudeVector, ComplexVector, DalitzError, DalitzResult, Dataset, Decay,
    Event, FourBodyDecay, Real, Symmetrization, ThreeBodyDecay,
};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::intensity::fit_statistic_with_background;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
enum Channels {
    ThreeBody {
        decay: ThreeBodyDecay,
        resonances: Vec<ThreeBodyResonance>,
        background: Vec<ThreeBodyResonance>,
    },
    FourBody {
        decay: FourBodyDecay,
        resonances: Vec<FourBodyResonance>,
        background: Vec<FourBodyResonance>,
    },
}

fn three_body(decay: &Decay, resonances: Vec<Resonance>) -> DalitzResult<Vec<ThreeBodyResonance>> {
    resonances
        .into_iter()
        .map(|resonance| match resonance {
            Resonance::ThreeBody(r) => Ok(r),
            Resonance::FourBody(r) => Err(DalitzError::TopologyMismatch {
                resonance: r.name().to_string(),
                expected: decay.n_daughters(),
                found: 4,
            }),
        })
        .collect()
}

fn four_body(decay: &Decay, resonances: Vec<Resonance>) -> DalitzResult<Vec<FourBodyResonance>> {
    resonances
        .into_iter()
        .map(|resonance| match resonance {
            Resonance::FourBody(r) => Ok(r),
            Resonance::ThreeBody(r) => Err(DalitzError::TopologyMismatch {
                resonance: r.name().to_string(),
                expected: decay.n_daughters(),
                found: 3,
            }),
        })
        .collect()
}

/// A decay model: an ordered list of coherent resonances and incoherent background channels
/// attached to one decay topology.
///
/// A [`Model`] turns events into amplitude vectors. Combining those with fit coefficients is
/// left to [`fit_statistic`](crate::fit_statistic) and the normalization functions, so a model
/// can be evaluated once and fitted many times.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    channels: Channels,
    symmetrization: Symmetrization,
}

impl Model {
    /// Attach `resonances` and `background` to `decay`.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::TopologyMismatch`] if any resonance was built for a different
    /// number of final-state particles, or the construction error of any resonance whose
    /// invariants do not hold for this decay.
    pub fn new(
        decay: Decay,
        resonances: Vec<Resonance>,
        background: Vec<Resonance>,
        symmetrization: Symmetrization,
    ) -> DalitzResult<Self> {
        let channels = match decay {
            Decay::ThreeBody(three) => Channels::ThreeBody {
                decay: three,
                resonances: three_body(&decay, resonances)?,
                background: three_body(&decay, background)?,
            },
            Decay::FourBody(four) => Channels::FourBody {
                decay: four,
                resonances: four_body(&decay, resonances)?,
                background: four_body(&decay, background)?,
            },
        };
        let model = Self {
            channels,
            symmetrization,
        };
        model.validate()?;
        debug!(
            n_daughters = decay.n_daughters(),
            n_resonances = model.n_resonances(),
            n_background = model.n_background(),
            symmetrization = %symmetrization,
            "built model"
        );
        Ok(model)
    }

    /// Re-check every resonance against the decay, e.g. after deserialization.
    pub fn validate(&self) -> DalitzResult<()> {
        match &self.channels {
            Channels::ThreeBody {
                resonances,
                background,
                ..
            } => resonances
                .iter()
                .chain(background)
                .try_for_each(ThreeBodyResonance::validate),
            Channels::FourBody {
                decay,
                resonances,
                background,
            } => resonances
                .iter()
                .chain(background)
                .try_for_each(|r| r.validate(decay)),
        }
    }

    pub fn decay(&self) -> Decay {
        match &self.channels {
            Channels::ThreeBody { decay, .. } => Decay::ThreeBody(*decay),
            Channels::FourBody { decay, .. } => Decay::FourBody(*decay),
        }
    }

    pub fn symmetrization(&self) -> Symmetrization {
        self.symmetrization
    }

    /// The number of coherent resonances, which is also the length of every amplitude vector.
    pub fn n_resonances(&self) -> usize {
        match &self.channels {
            Channels::ThreeBody { resonances, .. } => resonances.len(),
            Channels::FourBody { resonances, .. } => resonances.len(),
        }
    }

    pub fn n_background(&self) -> usize {
        match &self.channels {
            Channels::ThreeBody { background, .. } => background.len(),
            Channels::FourBody { background, .. } => background.len(),
        }
    }

    /// Names of the coherent resonances in amplitude-vector order.
    pub fn resonance_names(&self) -> Vec<&str> {
        match &self.channels {
            Channels::ThreeBody { resonances, .. } => resonances.iter().map(|r| r.name()).collect(),
            Channels::FourBody { resonances, .. } => resonances.iter().map(|r| r.name()).collect(),
        }
    }

    /// Names of the background channels in order.
    pub fn background_names(&self) -> Vec<&str> {
        match &self.channels {
            Channels::ThreeBody { background, .. } => background.iter().map(|r| r.name()).collect(),
            Channels::FourBody { background, .. } => background.iter().map(|r| r.name()).collect(),
        }
    }

    // (coherent amplitudes, background amplitudes) of one event
    fn evaluate<T: Real>(
        &self,
        event: &Event<T>,
    ) -> DalitzResult<(ComplexVector<T>, ComplexVector<T>)> {
        let symmetrization = self.symmetrization;
        match (&self.channels, event) {
            (
                Channels::ThreeBody {
                    decay,
                    resonances,
                    background,
                },
                Event::ThreeBody(event),
            ) => {
                let eval = |list: &[ThreeBodyResonance]| {
                    ComplexVector::from_iterator(
                        list.len(),
                        list.iter()
                            .map(|r| r.evaluate(decay, event, symmetrization)),
                    )
                };
                Ok((eval(resonances.as_slice()), eval(background.as_slice())))
            }
            (
                Channels::FourBody {
                    decay,
                    resonances,
                    background,
                },
                Event::FourBody(event),
            ) => {
                let kinematics = FourBodyKinematics::new(decay, event);
                let eval = |list: &[FourBodyResonance]| {
                    ComplexVector::from_iterator(
                        list.len(),
                        list.iter()
                            .map(|r| r.evaluate(decay, &kinematics, symmetrization)),
                    )
                };
                Ok((eval(resonances.as_slice()), eval(background.as_slice())))
            }
            (_, event) => Err(DalitzError::InvalidEvent {
                expected: self.decay().n_invariants(),
                found: event.to_vec().len(),
            }),
        }
    }

    /// The amplitude of every coherent resonance at `event`, symmetrized according to the
    /// model's [`Symmetrization`]. Events outside the physical region give a zero vector.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::InvalidEvent`] if `event` belongs to the other topology.
    pub fn amplitude_vector<T: Real>(&self, event: &Event<T>) -> DalitzResult<ComplexVector<T>> {
        self.evaluate(event).map(|(amplitudes, _)| amplitudes)
    }

    /// [`Model::amplitude_vector`] for an event given as a slice of invariants.
    pub fn amplitude_vector_from_slice<T: Real>(
        &self,
        values: &[T],
    ) -> DalitzResult<ComplexVector<T>> {
        self.amplitude_vector(&self.decay().event(values)?)
    }

    /// $`|B_k|^2`$ for every background channel at `event`.
    pub fn background_abs2<T: Real>(&self, event: &Event<T>) -> DalitzResult<Vec<T>> {
        self.evaluate(event)
            .map(|(_, background)| AmplitudeVector::abs2(&background))
    }

    /// The coherent intensity plus background at `event`; see
    /// [`fit_statistic_with_background`].
    pub fn intensity<T: Real>(
        &self,
        event: &Event<T>,
        coefficients: &ComplexVector<T>,
        background_coefficients: &[T],
    ) -> DalitzResult<T> {
        let (amplitudes, background) = self.evaluate(event)?;
        fit_statistic_with_background(
            &amplitudes,
            coefficients,
            &AmplitudeVector::abs2(&background),
            background_coefficients,
        )
    }

    /// The amplitude vector of every event in `dataset`.
    #[cfg(feature = "rayon")]
    pub fn amplitude_vectors<T: Real>(
        &self,
        dataset: &Dataset<T>,
    ) -> DalitzResult<Vec<ComplexVector<T>>> {
        dataset
            .par_iter()
            .map(|event| self.amplitude_vector(event))
            .collect()
    }

    /// The amplitude vector of every event in `dataset`.
    #[cfg(not(feature = "rayon"))]
    pub fn amplitude_vectors<T: Real>(
        &self,
        dataset: &Dataset<T>,
    ) -> DalitzResult<Vec<ComplexVector<T>>> {
        dataset
            .iter()
            .map(|event| self.amplitude_vector(event))
            .collect()
    }

    /// The amplitude vector and the background magnitudes $`|B_k|^2`$ of every event in
    /// `dataset`, computed in a single pass.
    #[cfg(feature = "rayon")]
    pub fn amplitude_and_background_vectors<T: Real>(
        &self,
        dataset: &Dataset<T>,
    ) -> DalitzResult<Vec<(ComplexVector<T>, Vec<T>)>> {
        dataset
            .par_iter()
            .map(|event| {
                let (amplitudes, background) = self.evaluate(event)?;
                Ok((amplitudes, AmplitudeVector::abs2(&background)))
            })
            .collect()
    }

    /// The amplitude vector and the background magnitudes $`|B_k|^2`$ of every event in
    /// `dataset`, computed in a single pass.
    #[cfg(not(feature = "rayon"))]
    pub fn amplitude_and_background_vectors<T: Real>(
        &self,
        dataset: &Dataset<T>,
    ) -> DalitzResult<Vec<(ComplexVector<T>, Vec<T>)>> {
        dataset
            .iter()
            .map(|event| {
                let (amplitudes, background) = self.evaluate(event)?;
                Ok((amplitudes, AmplitudeVector::abs2(&background)))
            })
            .collect()
    }

    /// The weighted sum of [`Model::intensity`] over `dataset`:
    /// ```math
    /// \sum_{e} w_e \left(\left|\sum_i A_i(e) \theta_i\right|^2 + \sum_k |B_k(e)|^2 \theta^{\text{bkg}}_k\right)
    /// ```
    #[cfg(feature = "rayon")]
    pub fn weighted_intensity(
        &self,
        dataset: &Dataset<f64>,
        coefficients: &ComplexVector<f64>,
        background_coefficients: &[f64],
    ) -> DalitzResult<f64> {
        let terms = dataset
            .par_iter()
            .zip(dataset.weights().par_iter())
            .map(|(event, weight)| {
                Ok(weight * self.intensity(event, coefficients, background_coefficients)?)
            })
            .collect::<DalitzResult<Vec<f64>>>()?;
        Ok(terms
            .into_par_iter()
            .parallel_sum_with_accumulator::<Klein<f64>>())
    }

    /// The weighted sum of [`Model::intensity`] over `dataset`:
    /// ```math
    /// \sum_{e} w_e \left(\left|\sum_i A_i(e) \theta_i\right|^2 + \sum_k |B_k(e)|^2 \theta^{\text{bkg}}_k\right)
    /// ```
    #[cfg(not(feature = "rayon"))]
    pub fn weighted_intensity(
        &self,
        dataset: &Dataset<f64>,
        coefficients: &ComplexVector<f64>,
        background_coefficients: &[f64],
    ) -> DalitzResult<f64> {
        let terms = dataset
            .iter()
            .zip(dataset.weights())
            .map(|(event, weight)| {
                Ok(weight * self.intensity(event, coefficients, background_coefficients)?)
            })
            .collect::<DalitzResult<Vec<f64>>>()?;
        Ok(terms.into_iter().sum_with_accumulator::<Klein<f64>>())
    }

    /// Serialize the model for shipping to another process.
    pub fn to_bytes(&self) -> DalitzResult<Vec<u8>> {
        Ok(bincode::serde::encode_to_vec(
            self,
            bincode::config::standard(),
        )?)
    }

    /// Deserialize a model written by [`Model::to_bytes`], re-checking every resonance.
    pub fn from_bytes(bytes: &[u8]) -> DalitzResult<Self> {
        let (model, _): (Self, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use dalitz_amplitudes::{BreitWigner, Flat, FlatFourBody, SequentialChain, VectorPair};
    use dalitz_core::{
        particles::{A1_1260, D0, D_PLUS, PION, RHO_770, TOY0_1000},
        Projection, ThreeBodyEvent,
    };
    use num::Complex;

    use super::*;

    fn three_pion() -> Decay {
        Decay::new(D_PLUS, &[PION, PION, PION]).unwrap()
    }

    fn four_pion() -> Decay {
        Decay::new(D0, &[PION, PION, PION, PION]).unwrap()
    }

    fn flat(name: &str) -> Resonance {
        ThreeBodyResonance::from(Flat::new(name)).into()
    }

    #[test]
    fn test_flat_model() {
        let model = Model::new(three_pion(), vec![flat("flat")], vec![], Symmetrization::Identical)
            .unwrap();
        let inside = model.amplitude_vector_from_slice(&[1.0, 1.0]).unwrap();
        assert_eq!(inside.as_slice(), &[Complex::new(1.0, 0.0)]);
        let below = model.amplitude_vector_from_slice(&[0.05, 1.0]).unwrap();
        assert_eq!(below.as_slice(), &[Complex::new(0.0, 0.0)]);
    }

    #[test]
    fn test_symmetrization_flag() {
        let bw: Resonance =
            ThreeBodyResonance::from(BreitWigner::new("toy", TOY0_1000, 0.1).unwrap()).into();
        let event = Event::ThreeBody(ThreeBodyEvent::new(0.8, 1.3));
        let symmetric =
            Model::new(three_pion(), vec![bw.clone()], vec![], Symmetrization::Identical).unwrap();
        let plain = Model::new(three_pion(), vec![bw], vec![], Symmetrization::None).unwrap();
        let swapped = Event::ThreeBody(ThreeBodyEvent::new(1.3, 0.8));
        let expected = plain.amplitude_vector(&event).unwrap()[0]
            + plain.amplitude_vector(&swapped).unwrap()[0];
        let value = symmetric.amplitude_vector(&event).unwrap()[0];
        assert_relative_eq!(value.re, expected.re);
        assert_relative_eq!(value.im, expected.im);
    }

    #[test]
    fn test_background_and_intensity() {
        let model = Model::new(
            three_pion(),
            vec![flat("a"), flat("b")],
            vec![flat("bkg")],
            Symmetrization::None,
        )
        .unwrap();
        assert_eq!(model.resonance_names(), vec!["a", "b"]);
        assert_eq!(model.background_names(), vec!["bkg"]);
        let event = Event::ThreeBody(ThreeBodyEvent::new(1.0, 1.0));
        assert_eq!(model.background_abs2(&event).unwrap(), vec![1.0]);
        let coefficients =
            ComplexVector::from_vec(vec![Complex::new(1.0, 0.0), Complex::new(1.0, 0.0)]);
        assert_relative_eq!(model.intensity(&event, &coefficients, &[0.5]).unwrap(), 4.5);
        let dataset = Dataset::new_weighted(
            vec![event, Event::ThreeBody(ThreeBodyEvent::new(0.05, 1.0))],
            vec![2.0, 3.0],
        )
        .unwrap();
        assert_relative_eq!(
            model
                .weighted_intensity(&dataset, &coefficients, &[0.5])
                .unwrap(),
            9.0
        );
    }

    #[test]
    fn test_single_pass_batch_evaluation() {
        let rho: Resonance =
            ThreeBodyResonance::from(BreitWigner::new("rho", RHO_770, 0.1491).unwrap()).into();
        let model = Model::new(
            three_pion(),
            vec![flat("flat"), rho.clone()],
            vec![rho],
            Symmetrization::Identical,
        )
        .unwrap();
        let dataset = Dataset::new(vec![
            Event::ThreeBody(ThreeBodyEvent::new(0.6, 1.4)),
            Event::ThreeBody(ThreeBodyEvent::new(1.0, 1.0)),
            Event::ThreeBody(ThreeBodyEvent::new(0.05, 1.0)),
        ]);
        let batch = model.amplitude_and_background_vectors(&dataset).unwrap();
        assert_eq!(batch.len(), 3);
        for (event, (amplitudes, background)) in dataset.iter().zip(&batch) {
            assert_eq!(amplitudes, &model.amplitude_vector(event).unwrap());
            assert_eq!(background, &model.background_abs2(event).unwrap());
        }
    }

    #[test]
    fn test_topology_mismatch() {
        let result = Model::new(
            four_pion(),
            vec![flat("flat")],
            vec![],
            Symmetrization::Identical,
        );
        assert!(matches!(
            result,
            Err(DalitzError::TopologyMismatch {
                expected: 4,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_wrong_event_topology() {
        let model = Model::new(three_pion(), vec![flat("flat")], vec![], Symmetrization::None)
            .unwrap();
        assert!(matches!(
            model.amplitude_vector_from_slice(&[0.6, 0.7, 0.8, 0.9, 0.5]),
            Err(DalitzError::InvalidEvent { .. })
        ));
        let event = Event::FourBody(dalitz_core::FourBodyEvent::new(0.6, 0.7, 0.8, 0.9, 0.5));
        assert!(matches!(
            model.amplitude_vector(&event),
            Err(DalitzError::InvalidEvent {
                expected: 2,
                found: 5
            })
        ));
    }

    #[test]
    fn test_four_body_model() {
        let Decay::FourBody(decay) = four_pion() else {
            unreachable!()
        };
        let chain =
            SequentialChain::new("D_a_rho_S", &decay, A1_1260, 0.1, RHO_770, 0.1491, [1, 0, 1])
                .unwrap();
        let pair = VectorPair::new(
            "D_rho_rho_Longitudinal",
            RHO_770,
            0.1491,
            RHO_770,
            0.1491,
            [1, 1, 1],
            Projection::Longitudinal,
        )
        .unwrap();
        let model = Model::new(
            four_pion(),
            vec![
                Resonance::FourBody(chain.into()),
                Resonance::FourBody(pair.into()),
                Resonance::FourBody(FlatFourBody::new("flat").into()),
            ],
            vec![],
            Symmetrization::Identical,
        )
        .unwrap();
        let amplitudes = model
            .amplitude_vector_from_slice(&[0.6, 0.7, 0.8, 0.9, 0.5])
            .unwrap();
        assert_eq!(amplitudes.len(), 3);
        assert_relative_eq!(amplitudes[0].re, 0.7079209087041514, max_relative = 1e-8);
        assert_relative_eq!(amplitudes[0].im, -18.592738555287305, max_relative = 1e-8);
        assert_eq!(amplitudes[2], Complex::new(1.0, 0.0));
        let outside = model
            .amplitude_vector_from_slice(&[0.01, 0.7, 0.8, 0.9, 0.5])
            .unwrap();
        assert!(outside.iter().all(|z| *z == Complex::new(0.0, 0.0)));
    }

    #[test]
    fn test_bytes() {
        let bw: Resonance =
            ThreeBodyResonance::from(BreitWigner::new("rho", RHO_770, 0.1491).unwrap()).into();
        let model =
            Model::new(three_pion(), vec![bw, flat("flat")], vec![flat("bkg")], Symmetrization::Identical)
                .unwrap();
        let bytes = model.to_bytes().unwrap();
        let restored = Model::from_bytes(&bytes).unwrap();
        assert_eq!(restored, model);
        assert!(Model::from_bytes(&bytes[..bytes.len() / 2]).is_err());
    }
}
