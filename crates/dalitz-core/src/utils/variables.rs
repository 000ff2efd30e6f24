use serde::{Deserialize, Serialize};

use crate::{
    data::FourBodyEvent,
    utils::functions::{breakup_momentum_squared, fourth_pair_invariant},
    Real,
};

/// Helicity angles of the topology $`P \to R_1 R_2`$, $`R_1 \to 12`$, $`R_2 \to 34`$.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HelicityAngles<T> {
    /// Helicity angle of particle 2 in the rest frame of $`R_1`$
    pub theta_1: T,
    /// Helicity angle of particle 4 in the rest frame of $`R_2`$
    pub theta_2: T,
    /// Acoplanarity angle between the decay planes of $`R_1`$ and $`R_2`$
    pub chi: T,
}

/// Transformed variables of the sequential topology $`P \to R_1 d`$, $`R_1 \to R_2 c`$,
/// $`R_2 \to ab`$, as consumed by the Zemach factors.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequentialAngles<T> {
    /// $`\cos^2`$ of the angle between $`c`$ and $`d`$ in the rest frame of $`R_1`$
    pub cos2_theta_1: T,
    /// $`|\vec{p}_d|^2 / s`$ in the rest frame of $`R_1`$
    pub z2_1: T,
    /// $`\cos^2`$ of the angle between $`b`$ and $`c`$ in the rest frame of $`R_2`$
    pub cos2_theta_2: T,
    /// $`|\vec{p}_c|^2 / s`$ for the $`R_1 \to R_2 c`$ step
    pub z2_2: T,
}

impl<T: Real> SequentialAngles<T> {
    /// Returns `true` if both squared cosines lie in $`[0, 1]`$.
    pub fn is_physical(&self) -> bool {
        let unit = |x: T| x >= T::zero() && x <= T::one();
        unit(self.cos2_theta_1) && unit(self.cos2_theta_2)
    }
}

// Magnitude of a momentum of size sqrt(p2) after boosting it by velocity v along its direction.
fn boosted_momentum<T: Real>(p2: T, mass2: T, v: T) -> T {
    let gamma = T::one() / (T::one() - v * v).sqrt();
    gamma * (p2.sqrt() + v * (mass2 + p2).sqrt())
}

/// Compute the helicity angles $`\theta_1`$, $`\theta_2`$ and the acoplanarity angle
/// $`\chi`$ of `event`, with `masses` ordered $`(M, m_1, m_2, m_3, m_4)`$.
///
/// Everything is expressed through invariants: the momenta of the resonances in the parent
/// rest frame are boosted into each resonance frame to obtain the polar angles, then the
/// daughter momenta are boosted back into the parent frame where $`\cos\chi`$ follows from
/// ```math
/// \cos\chi = \frac{(\vec{p}_1\times\vec{p}_2)\cdot(\vec{p}_3\times\vec{p}_4)}
///     {|\vec{p}_1\times\vec{p}_2||\vec{p}_3\times\vec{p}_4|}
/// ```
/// All boosts keep their signed velocities.
pub fn helicity_angles<T: Real>(event: &FourBodyEvent<T>, masses: [T; 5]) -> HelicityAngles<T> {
    let [parent, m1, m2, m3, m4] = masses;
    let (pm2, a2, b2, c2, d2) = (parent * parent, m1 * m1, m2 * m2, m3 * m3, m4 * m4);
    let half = T::lit(0.5);
    let one = T::one();
    let FourBodyEvent {
        m2_12,
        m2_14,
        m2_23,
        m2_34,
        m2_13,
    } = *event;
    let m2_24 = fourth_pair_invariant(event.invariants(), masses);

    // theta_1: particle 2 against the R_2 direction, in the R_1 frame
    let m2_234 = m2_23 + m2_24 + m2_34 - (b2 + c2 + d2);
    let p2_2 = breakup_momentum_squared(m2_12, m1, m2);
    let e_2 = (b2 + p2_2).sqrt();
    let p2_pair = breakup_momentum_squared(pm2, m2_12.sqrt(), m2_34.sqrt());
    let v2_r1 = p2_pair / (m2_12 + p2_pair);
    let v_r1 = v2_r1.sqrt();
    let gamma_r1 = one / (one - v2_r1).sqrt();
    let p_34_in_r1 = boosted_momentum(p2_pair, m2_34, v_r1);
    let p2_34_in_r1 = p_34_in_r1 * p_34_in_r1;
    let e_34_in_r1 = (m2_34 + p2_34_in_r1).sqrt();
    let dot_2_34 = e_2 * e_34_in_r1 - half * (m2_234 - b2 - m2_34);
    let cos_theta_1 = dot_2_34 / (p2_2 * p2_34_in_r1).sqrt();

    // theta_2: the same construction with 1 <-> 3 and 2 <-> 4
    let m2_124 = m2_14 + m2_24 + m2_12 - (a2 + b2 + d2);
    let p2_4 = breakup_momentum_squared(m2_34, m3, m4);
    let e_4 = (d2 + p2_4).sqrt();
    let v2_r2 = p2_pair / (m2_34 + p2_pair);
    let v_r2 = v2_r2.sqrt();
    let gamma_r2 = one / (one - v2_r2).sqrt();
    let p_12_in_r2 = boosted_momentum(p2_pair, m2_12, v_r2);
    let p2_12_in_r2 = p_12_in_r2 * p_12_in_r2;
    let e_12_in_r2 = (m2_12 + p2_12_in_r2).sqrt();
    let dot_4_12 = e_4 * e_12_in_r2 - half * (m2_124 - d2 - m2_12);
    let cos_theta_2 = dot_4_12 / (p2_4 * p2_12_in_r2).sqrt();

    // chi: boost all four daughters back into the parent frame
    let sin2_theta_1 = one - cos_theta_1 * cos_theta_1;
    let sin2_theta_2 = one - cos_theta_2 * cos_theta_2;
    let sq = |x: T| x * x;

    let p2_1 = p2_2;
    let e_1 = (a2 + p2_1).sqrt();
    let p2_1_in_p = sq(gamma_r1 * (-cos_theta_1 * p2_1.sqrt() - e_1 * v_r1)) + sin2_theta_1 * p2_1;
    let p2_2_in_p = sq(gamma_r1 * (cos_theta_1 * p2_2.sqrt() - e_2 * v_r1)) + sin2_theta_1 * p2_2;

    let p2_3 = p2_4;
    let e_3 = (c2 + p2_3).sqrt();
    let p2_3_in_p = sq(gamma_r2 * (-cos_theta_2 * p2_3.sqrt() - e_3 * v_r2)) + sin2_theta_2 * p2_3;
    let p2_4_in_p = sq(gamma_r2 * (cos_theta_2 * p2_4.sqrt() - e_4 * v_r2)) + sin2_theta_2 * p2_4;

    let e_1_in_p = (a2 + p2_1_in_p).sqrt();
    let e_2_in_p = (b2 + p2_2_in_p).sqrt();
    let e_3_in_p = (c2 + p2_3_in_p).sqrt();
    let e_4_in_p = (d2 + p2_4_in_p).sqrt();

    // three-momentum dot products from E_i E_j - (m_ij^2 - m_i^2 - m_j^2) / 2
    let dot = |e_i: T, e_j: T, m2_ij: T, m2_i: T, m2_j: T| e_i * e_j - half * (m2_ij - m2_i - m2_j);
    let dot_12 = dot(e_1_in_p, e_2_in_p, m2_12, a2, b2);
    let dot_13 = dot(e_1_in_p, e_3_in_p, m2_13, a2, c2);
    let dot_14 = dot(e_1_in_p, e_4_in_p, m2_14, a2, d2);
    let dot_23 = dot(e_2_in_p, e_3_in_p, m2_23, b2, c2);
    let dot_24 = dot(e_2_in_p, e_4_in_p, m2_24, b2, d2);
    let dot_34 = dot(e_3_in_p, e_4_in_p, m2_34, c2, d2);

    let cross_dot_cross = dot_13 * dot_24 - dot_23 * dot_14;
    let cross_12_abs2 = p2_1_in_p * p2_2_in_p - dot_12 * dot_12;
    let cross_34_abs2 = p2_3_in_p * p2_4_in_p - dot_34 * dot_34;
    let cos_chi = cross_dot_cross / (cross_12_abs2 * cross_34_abs2).sqrt();

    HelicityAngles {
        theta_1: cos_theta_1.acos(),
        theta_2: cos_theta_2.acos(),
        chi: cos_chi.acos(),
    }
}

/// Compute the [`SequentialAngles`] of `event`, with `masses` ordered
/// $`(M, m_a, m_b, m_c, m_d)`$.
///
/// The momentum of $`d`$ is boosted from the parent frame into the $`R_1`$ frame (where
/// $`R_1 = abc`$), and the momentum of $`c`$ from the $`R_1`$ frame into the $`R_2`$ frame
/// (where $`R_2 = ab`$). $`z_2^2`$ keeps the $`R_1`$-frame momentum of $`c`$ in its
/// numerator.
pub fn sequential_angular_variables<T: Real>(
    event: &FourBodyEvent<T>,
    masses: [T; 5],
) -> SequentialAngles<T> {
    let [parent, m_a, m_b, m_c, m_d] = masses;
    let (a2, b2, c2, d2) = (m_a * m_a, m_b * m_b, m_c * m_c, m_d * m_d);
    let (one, two, half) = (T::one(), T::lit(2.0), T::lit(0.5));
    let FourBodyEvent {
        m2_12,
        m2_23,
        m2_34,
        m2_13,
        ..
    } = *event;

    let m2_123 = m2_12 + m2_13 + m2_23 - a2 - b2 - c2;
    let m_123 = m2_123.sqrt();
    let m_12 = m2_12.sqrt();

    // P -> R_1 d, viewed from R_1
    let p2_c = breakup_momentum_squared(m2_123, m_12, m_c);
    let e_c = (c2 + p2_c).sqrt();
    let p2_d_in_p = breakup_momentum_squared(parent * parent, m_123, m_d);
    let p_d_in_p = p2_d_in_p.sqrt();
    let e_d_in_p = (d2 + p2_d_in_p).sqrt();
    let e_r1_in_p = (m2_123 + p2_d_in_p).sqrt();
    let v_r1 = p_d_in_p / e_r1_in_p;
    let gamma_r1 = one / (one - v_r1 * v_r1).sqrt();
    let p_d = gamma_r1 * (p_d_in_p + e_d_in_p * v_r1);
    let p2_d = p_d * p_d;
    let e_d = (d2 + p2_d).sqrt();

    let dot_cd = -half * (m2_34 - c2 - d2 - two * e_c * e_d);
    let cos2_theta_1 = dot_cd * dot_cd / p2_c / p2_d;
    let s_1 = m2_123 + d2 + two * m_123 * e_d;
    let z2_1 = p2_d / s_1;

    // R_1 -> R_2 c, viewed from R_2
    let p_c = p2_c.sqrt();
    let e_r2 = (m2_12 + p2_c).sqrt();
    let v_r2 = p_c / e_r2;
    let gamma_r2 = one / (one - v_r2 * v_r2).sqrt();
    let p_c_in_r2 = gamma_r2 * (p_c + e_c * v_r2);
    let p2_c_in_r2 = p_c_in_r2 * p_c_in_r2;
    let e_c_in_r2 = (c2 + p2_c_in_r2).sqrt();

    let p2_b = breakup_momentum_squared(m2_12, m_a, m_b);
    let e_b = (b2 + p2_b).sqrt();
    let dot_bc = -half * (m2_23 - b2 - c2 - two * e_b * e_c_in_r2);
    let cos2_theta_2 = dot_bc * dot_bc / p2_b / p2_c_in_r2;
    let s_2 = m2_12 + c2 + two * m_12 * e_c_in_r2;
    let z2_2 = p2_c / s_2;

    SequentialAngles {
        cos2_theta_1,
        z2_1,
        cos2_theta_2,
        z2_2,
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;
    use crate::particles::{D0, PION};

    fn masses() -> [f64; 5] {
        [D0.mass, PION.mass, PION.mass, PION.mass, PION.mass]
    }

    // four pions with equal energies on the vertices of a regular tetrahedron
    fn tetrahedral_event() -> FourBodyEvent<f64> {
        let s = (D0.mass2() + 8.0 * PION.mass2()) / 6.0;
        FourBodyEvent::new(s, s, s, s, s)
    }

    #[test]
    fn test_helicity_angles_symmetric_point() {
        let angles = helicity_angles(&tetrahedral_event(), masses());
        assert_relative_eq!(angles.theta_1, FRAC_PI_2, epsilon = 1e-8);
        assert_relative_eq!(angles.theta_2, FRAC_PI_2, epsilon = 1e-8);
        assert_relative_eq!(angles.chi, FRAC_PI_2, epsilon = 1e-8);
    }

    #[test]
    fn test_helicity_angles() {
        let event = FourBodyEvent::new(0.6, 0.7, 0.8, 0.9, 0.5);
        let angles = helicity_angles(&event, masses());
        assert_relative_eq!(angles.theta_1, 1.3719423319636603, epsilon = 1e-9);
        assert_relative_eq!(angles.theta_2, 1.2155207491727045, epsilon = 1e-9);
        assert_relative_eq!(angles.chi, 2.5086642588952883, epsilon = 1e-9);
    }

    #[test]
    fn test_sequential_angles() {
        let event = FourBodyEvent::new(0.6, 0.7, 0.8, 0.9, 0.5);
        let values = sequential_angular_variables(&event, masses());
        assert!(values.is_physical());
        assert_relative_eq!(values.cos2_theta_1, 0.33707882883806, epsilon = 1e-9);
        assert_relative_eq!(values.z2_1, 0.09817258961066111, epsilon = 1e-9);
        assert_relative_eq!(values.cos2_theta_2, 0.07149387020402355, epsilon = 1e-9);
        assert_relative_eq!(values.z2_2, 0.10664865342918514, epsilon = 1e-9);

        let values = sequential_angular_variables(&tetrahedral_event(), masses());
        assert_relative_eq!(values.cos2_theta_1, 0.0, epsilon = 1e-12);
        assert_relative_eq!(values.cos2_theta_2, 0.0, epsilon = 1e-12);
        assert_relative_eq!(values.z2_1, 0.11259913594441055, epsilon = 1e-9);
        assert_relative_eq!(values.z2_2, 0.10008812083947614, epsilon = 1e-9);
    }

    #[test]
    fn test_unphysical_cosines() {
        let values = SequentialAngles {
            cos2_theta_1: 1.2,
            z2_1: 0.1,
            cos2_theta_2: 0.5,
            z2_2: 0.1,
        };
        assert!(!values.is_physical());
    }
}
