use dalitz_core::{DalitzError, DalitzResult, FourBodyDecay, Particle, Real, ZemachFactor};
use num::Complex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{barrier_ratio, production_barrier, resonance_propagator};
use crate::{FourBodyAmplitude, FourBodyPoint};

/// The sequential cascade $`P \to R_1 d`$, $`R_1 \to R_2 c`$, $`R_2 \to ab`$:
/// ```math
/// A = F_P F_{R_1} F_{R_2}\, \text{BW}_{R_1}(m^2_{abc})\, \text{BW}_{R_2}(m^2_{ab})\,
///     Z(J_P, J_{R_1}, l_1; z_1^2, \cos^2\theta_1)\, Z(J_{R_1}, J_{R_2}, l_2; z_2^2, \cos^2\theta_2)
/// ```
/// The orbital angular momenta $`(l_1, l_2, l_3)`$ belong to the three decay vertices in
/// order. Barrier factors use $`l`$ of their vertex and are normalized to the nominal masses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequentialChain {
    name: String,
    first: Particle,
    first_width: f64,
    second: Particle,
    second_width: f64,
    orbital: [u32; 3],
    production: ZemachFactor,
    cascade: ZemachFactor,
}

impl SequentialChain {
    /// Construct a [`SequentialChain`] with intermediate states `first` ($`R_1`$) and
    /// `second` ($`R_2`$) and vertex orbital angular momenta `orbital`.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::UnsupportedZemach`]
    /// if either vertex has no entry in the Zemach table.
    pub fn new(
        name: &str,
        decay: &FourBodyDecay,
        first: Particle,
        first_width: f64,
        second: Particle,
        second_width: f64,
        orbital: [u32; 3],
    ) -> DalitzResult<Self> {
        let [l1, l2, _] = orbital;
        Ok(Self {
            name: name.to_string(),
            first,
            first_width,
            second,
            second_width,
            orbital,
            production: ZemachFactor::new(decay.parent.spin, first.spin, l1)?,
            cascade: ZemachFactor::new(first.spin, second.spin, l2)?,
        })
    }

    pub fn orbital(&self) -> [u32; 3] {
        self.orbital
    }

    pub fn resonances(&self) -> (&Particle, &Particle) {
        (&self.first, &self.second)
    }

    /// Check that the stored angular factors agree with `decay`, e.g. after deserialization.
    pub fn validate(&self, decay: &FourBodyDecay) -> DalitzResult<()> {
        let rebuilt = Self::new(
            &self.name,
            decay,
            self.first,
            self.first_width,
            self.second,
            self.second_width,
            self.orbital,
        )?;
        if rebuilt != *self {
            return Err(DalitzError::InvalidConfiguration(format!(
                "stored Zemach factors of \"{}\" do not match its quantum numbers",
                self.name
            )));
        }
        Ok(())
    }
}

impl FourBodyAmplitude for SequentialChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn value<T: Real>(&self, decay: &FourBodyDecay, point: &FourBodyPoint<T>) -> Complex<T> {
        let angles = &point.sequential;
        if !angles.is_physical() {
            trace!(
                amplitude = %self.name,
                cos2_theta_1 = ?angles.cos2_theta_1,
                cos2_theta_2 = ?angles.cos2_theta_2,
                "sequential angles left the physical range"
            );
            return Complex::new(T::zero(), T::zero());
        }
        let [_, m_a, m_b, m_c, m_d] = decay.masses::<T>();
        let [l1, l2, l3] = self.orbital;
        let event = &point.event;
        let m2_abc = event.m2_12 + event.m2_13 + event.m2_23 - m_a * m_a - m_b * m_b - m_c * m_c;
        let m2_ab = event.m2_12;
        let (r1, r2) = (&self.first, &self.second);
        let m_r2 = r2.m::<T>();

        let f_p = production_barrier(l1, &decay.parent, (m2_abc.sqrt(), m_d), (r1.m(), m_d));
        let f_r1 = barrier_ratio(l2, r1.r2(), m2_abc, r1.m2(), m_r2, m_c);
        let f_r2 = barrier_ratio(l3, r2.r2(), m2_ab, r2.m2(), m_a, m_b);
        let bw_1 = resonance_propagator(r1, self.first_width, l2, m2_abc, m_r2, m_c);
        let bw_2 = resonance_propagator(r2, self.second_width, l3, m2_ab, m_a, m_b);
        let z = self.production.value(angles.z2_1, angles.cos2_theta_1)
            * self.cascade.value(angles.z2_2, angles.cos2_theta_2);
        bw_1 * bw_2 * (f_p * f_r1 * f_r2 * z)
    }
}
