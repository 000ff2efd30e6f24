use dalitz_core::{DalitzError, DalitzResult, FourBodyDecay, Particle, Projection, Real};
use num::Complex;
use serde::{Deserialize, Serialize};

use super::{barrier_ratio, production_barrier, resonance_propagator};
use crate::{FourBodyAmplitude, FourBodyPoint};

/// The decay of a spinless parent into two vector mesons, $`P \to V_1 V_2`$,
/// $`V_1 \to ab`$, $`V_2 \to cd`$, in one helicity projection:
/// ```math
/// A = F_P F_{V_1} F_{V_2}\, \text{BW}_{V_1}(m^2_{ab})\, \text{BW}_{V_2}(m^2_{cd})\, \Omega
/// ```
/// with the angular factor $`\Omega`$ given by the [`Projection`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorPair {
    name: String,
    first: Particle,
    first_width: f64,
    second: Particle,
    second_width: f64,
    orbital: [u32; 3],
    projection: Projection,
}

impl VectorPair {
    /// Construct one projection of the vector pair `first` ($`V_1 \to ab`$) and `second`
    /// ($`V_2 \to cd`$).
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::InvalidConfiguration`] unless both states have spin 1.
    pub fn new(
        name: &str,
        first: Particle,
        first_width: f64,
        second: Particle,
        second_width: f64,
        orbital: [u32; 3],
        projection: Projection,
    ) -> DalitzResult<Self> {
        let pair = Self {
            name: name.to_string(),
            first,
            first_width,
            second,
            second_width,
            orbital,
            projection,
        };
        pair.validate()?;
        Ok(pair)
    }

    /// All three projections of the same pair, named `"{name}_{projection}"`.
    pub fn projections(
        name: &str,
        first: Particle,
        first_width: f64,
        second: Particle,
        second_width: f64,
        orbital: [u32; 3],
    ) -> DalitzResult<[Self; 3]> {
        let [parallel, perpendicular, longitudinal] = Projection::ALL;
        let build = |projection: Projection| {
            Self::new(
                &format!("{name}_{projection}"),
                first,
                first_width,
                second,
                second_width,
                orbital,
                projection,
            )
        };
        Ok([build(parallel)?, build(perpendicular)?, build(longitudinal)?])
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn orbital(&self) -> [u32; 3] {
        self.orbital
    }

    pub fn resonances(&self) -> (&Particle, &Particle) {
        (&self.first, &self.second)
    }

    /// Check that both states are vectors.
    pub fn validate(&self) -> DalitzResult<()> {
        if self.first.spin != 1 || self.second.spin != 1 {
            return Err(DalitzError::InvalidConfiguration(format!(
                "\"{}\" needs two spin-1 states, found spins {} and {}",
                self.name, self.first.spin, self.second.spin
            )));
        }
        Ok(())
    }

    fn angular_factor<T: Real>(&self, point: &FourBodyPoint<T>) -> Complex<T> {
        let angles = &point.helicity;
        let transverse = angles.theta_1.sin() * angles.theta_2.sin() * T::FRAC_1_SQRT_2();
        match self.projection {
            Projection::Parallel => Complex::new(angles.chi.cos() * transverse, T::zero()),
            Projection::Perpendicular => Complex::new(T::zero(), angles.chi.sin() * transverse),
            Projection::Longitudinal => Complex::new(
                angles.theta_1.cos() * angles.theta_2.cos(),
                T::zero(),
            ),
        }
    }
}

impl FourBodyAmplitude for VectorPair {
    fn name(&self) -> &str {
        &self.name
    }

    fn value<T: Real>(&self, decay: &FourBodyDecay, point: &FourBodyPoint<T>) -> Complex<T> {
        let [_, m_a, m_b, m_c, m_d] = decay.masses::<T>();
        let [l1, l2, l3] = self.orbital;
        let (v1, v2) = (&self.first, &self.second);
        let (m2_ab, m2_cd) = (point.event.m2_12, point.event.m2_34);

        let f_p = production_barrier(
            l1,
            &decay.parent,
            (m2_ab.sqrt(), m2_cd.sqrt()),
            (v1.m(), v2.m()),
        );
        let f_v1 = barrier_ratio(l2, v1.r2(), m2_ab, v1.m2(), m_a, m_b);
        let f_v2 = barrier_ratio(l3, v2.r2(), m2_cd, v2.m2(), m_c, m_d);
        let bw_1 = resonance_propagator(v1, self.first_width, l2, m2_ab, m_a, m_b);
        let bw_2 = resonance_propagator(v2, self.second_width, l3, m2_cd, m_c, m_d);
        bw_1 * bw_2 * self.angular_factor(point) * (f_p * f_v1 * f_v2)
    }
}
