use accurate::{sum::Klein, traits::*};
use dalitz_core::{ComplexMatrix, ComplexVector, DalitzError, DalitzResult, Dataset, Decay};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{intensity::normalization_with_background, Model};

/// A Monte Carlo estimate of the interference integrals of a [`Model`] over phase space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizationIntegral {
    /// $`I_{ij} = \int \bar{A}_i A_j`$
    pub value: ComplexMatrix<f64>,
    /// Half the absolute difference between the two independent estimates of each entry
    pub error: DMatrix<f64>,
    /// $`\int |B_k|^2`$ for every background channel
    pub background: Vec<f64>,
    /// Error estimate of each background integral, as for [`NormalizationIntegral::error`]
    pub background_error: Vec<f64>,
}

impl NormalizationIntegral {
    /// The integral of the full intensity for the given fit coefficients; see
    /// [`normalization_with_background`].
    pub fn normalization(
        &self,
        coefficients: &ComplexVector<f64>,
        background_coefficients: &[f64],
    ) -> DalitzResult<f64> {
        normalization_with_background(
            coefficients,
            &self.value,
            background_coefficients,
            &self.background,
        )
    }
}

/// Uniform Monte Carlo integration over the box returned by [`Decay::bounds`].
///
/// Two independent estimates are made from `samples` points each. The integral is their mean
/// and the error is half their difference. Points outside the physical region contribute zero
/// because every amplitude vanishes there. Sampling is deterministic for a given `seed`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationIntegrator {
    /// The number of points in each of the two estimates
    pub samples: usize,
    pub seed: u64,
}

impl Default for NormalizationIntegrator {
    fn default() -> Self {
        Self {
            samples: 500_000,
            seed: 0,
        }
    }
}

impl NormalizationIntegrator {
    pub fn new(samples: usize, seed: u64) -> Self {
        Self { samples, seed }
    }

    /// Draw the `2 * samples` points used by [`NormalizationIntegrator::integrate`]. The first
    /// half feeds the first estimate and the second half the other.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::InvalidConfiguration`] if `samples` is zero.
    pub fn sample(&self, decay: &Decay) -> DalitzResult<Dataset<f64>> {
        if self.samples == 0 {
            return Err(DalitzError::InvalidConfiguration(
                "the normalization integral needs at least one sample".to_string(),
            ));
        }
        let bounds = decay.bounds();
        let mut rng = fastrand::Rng::with_seed(self.seed);
        let mut point = vec![0.0; bounds.len()];
        let events = (0..2 * self.samples)
            .map(|_| {
                for (x, (min, max)) in point.iter_mut().zip(&bounds) {
                    *x = min + (max - min) * rng.f64();
                }
                decay.event(&point)
            })
            .collect::<DalitzResult<Vec<_>>>()?;
        Ok(Dataset::new(events))
    }

    /// Estimate the interference and background integrals of `model`.
    pub fn integrate(&self, model: &Model) -> DalitzResult<NormalizationIntegral> {
        let decay = model.decay();
        let volume = decay.bounds_volume();
        info!(
            samples = self.samples,
            seed = self.seed,
            volume,
            n_resonances = model.n_resonances(),
            "computing normalization integral"
        );
        let dataset = self.sample(&decay)?;
        let (amplitudes, background): (Vec<_>, Vec<_>) = model
            .amplitude_and_background_vectors(&dataset)?
            .into_iter()
            .unzip();

        let scale = volume / self.samples as f64;
        let n = model.n_resonances();
        let (first, second) = amplitudes.split_at(self.samples);
        let (m1, m2) = (
            interference(first, n, scale),
            interference(second, n, scale),
        );
        let value = (&m1 + &m2).map(|z| z * 0.5);
        let error = (&m1 - &m2).map(|z| z.norm() * 0.5);

        let (first, second) = background.split_at(self.samples);
        let (b1, b2): (Vec<f64>, Vec<f64>) = (0..model.n_background())
            .map(|k| {
                let half = |rows: &[Vec<f64>]| {
                    rows.iter()
                        .map(|row| row[k])
                        .sum_with_accumulator::<Klein<f64>>()
                        * scale
                };
                (half(first), half(second))
            })
            .unzip();
        let background = b1.iter().zip(&b2).map(|(x, y)| (x + y) * 0.5).collect();
        let background_error = b1.iter().zip(&b2).map(|(x, y)| (x - y).abs() * 0.5).collect();

        debug!(
            max_error = error.iter().copied().fold(0.0, f64::max),
            "normalization integral done"
        );
        Ok(NormalizationIntegral {
            value,
            error,
            background,
            background_error,
        })
    }
}

// V/N sum over events of conj(A_i) A_j
fn interference(amplitudes: &[ComplexVector<f64>], n: usize, scale: f64) -> ComplexMatrix<f64> {
    amplitudes
        .iter()
        .fold(ComplexMatrix::zeros(n, n), |total, a| {
            total + a.conjugate() * a.transpose()
        })
        .map(|z| z * scale)
}
