use dalitz_core::{
    blatt_weisskopf, breit_wigner_propagator, relativistic_breit_wigner_width, DalitzError,
    DalitzResult, DalitzSpin, Particle, Real, ThreeBodyDecay, ThreeBodyEvent,
};
use num::Complex;
use serde::{Deserialize, Serialize};

use crate::ThreeBodyAmplitude;

/// Look up the spin factor of a three-body resonance, failing for spins above 2.
pub(crate) fn check_dalitz_spin(resonance: &Particle) -> DalitzResult<DalitzSpin> {
    DalitzSpin::new(resonance.spin)
}

/// Check that a stored spin factor still belongs to the stored resonance.
pub(crate) fn check_spin_matches(
    name: &str,
    resonance: &Particle,
    spin: DalitzSpin,
) -> DalitzResult<()> {
    if check_dalitz_spin(resonance)? != spin {
        return Err(DalitzError::InvalidConfiguration(format!(
            "resonance \"{name}\" has spin {} but carries the spin-{} Zemach factor",
            resonance.spin,
            spin.spin()
        )));
    }
    Ok(())
}

/// $`F_R`$, the barrier factor of $`R \to ab`$ normalized to the nominal resonance mass.
fn resonance_barrier<T: Real>(resonance: &Particle, m2_ab: T, m_a: T, m_b: T) -> T {
    let j = resonance.spin;
    let r2 = resonance.r2();
    blatt_weisskopf(j, r2, m2_ab, m_a, m_b) / blatt_weisskopf(j, r2, resonance.m2(), m_a, m_b)
}

/// $`F_R Z`$, the decay barrier times the spin factor.
fn barrier_and_spin<T: Real>(
    resonance: &Particle,
    spin: DalitzSpin,
    decay: &ThreeBodyDecay,
    event: &ThreeBodyEvent<T>,
) -> T {
    let [_, m_a, m_b, m_c] = decay.masses::<T>();
    let f_r = resonance_barrier(resonance, event.m2_ab, m_a, m_b);
    let z = spin.value(event.m2_ab, event.m2_bc, decay.parent.m2(), m_a, m_b, m_c);
    f_r * z
}

/// $`F_P F_R Z`$, the real prefactor shared by every full three-body resonance shape.
pub(crate) fn barriers_and_spin<T: Real>(
    resonance: &Particle,
    spin: DalitzSpin,
    decay: &ThreeBodyDecay,
    event: &ThreeBodyEvent<T>,
) -> T {
    let m_c = decay.c.m::<T>();
    let parent = &decay.parent;
    let j = resonance.spin;
    let (p_r2, p_m2) = (parent.r2::<T>(), parent.m2::<T>());
    let f_p = blatt_weisskopf(j, p_r2, p_m2, event.m2_ab.sqrt(), m_c)
        / blatt_weisskopf(j, p_r2, p_m2, resonance.m(), m_c);
    f_p * barrier_and_spin(resonance, spin, decay, event)
}

fn mass_dependent_propagator<T: Real>(
    resonance: &Particle,
    width: f64,
    decay: &ThreeBodyDecay,
    m2_ab: T,
) -> Complex<T> {
    let mass = resonance.m::<T>();
    let gamma = relativistic_breit_wigner_width(
        mass,
        T::lit(width),
        resonance.spin,
        T::lit(resonance.radius),
        m2_ab,
        decay.a.m(),
        decay.b.m(),
    );
    breit_wigner_propagator(mass, m2_ab, gamma)
}

/// A relativistic Breit-Wigner resonance $`R`$ in the $`ab`$ channel of $`P \to abc`$:
/// ```math
/// A(m^2_{ab}, m^2_{bc}) = F_P F_R Z_J \frac{1}{M_R^2 - m^2_{ab} - i M_R \Gamma(m^2_{ab})}
/// ```
/// where $`F_P`$ and $`F_R`$ are Blatt-Weisskopf factors of $`P \to Rc`$ and $`R \to ab`$
/// normalized to the nominal mass, $`Z_J`$ is the Zemach spin factor in Dalitz variables and
/// $`\Gamma`$ is the [`relativistic_breit_wigner_width`]. The amplitude vanishes outside the
/// Dalitz plot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreitWigner {
    name: String,
    resonance: Particle,
    spin: DalitzSpin,
    width: f64,
}

impl BreitWigner {
    /// Construct a [`BreitWigner`] for the given resonance and nominal width.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::UnsupportedZemach`] if the resonance spin exceeds 2.
    pub fn new(name: &str, resonance: Particle, width: f64) -> DalitzResult<Self> {
        Ok(Self {
            name: name.to_string(),
            spin: check_dalitz_spin(&resonance)?,
            resonance,
            width,
        })
    }

    /// The resonance in the $`ab`$ channel.
    pub fn resonance(&self) -> &Particle {
        &self.resonance
    }

    /// The nominal width in GeV.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Re-check the construction invariants, e.g. after deserialization.
    pub fn validate(&self) -> DalitzResult<()> {
        check_spin_matches(&self.name, &self.resonance, self.spin)
    }
}

impl ThreeBodyAmplitude for BreitWigner {
    fn name(&self) -> &str {
        &self.name
    }

    fn value<T: Real>(&self, decay: &ThreeBodyDecay, event: &ThreeBodyEvent<T>) -> Complex<T> {
        if !decay.is_valid(event) {
            return Complex::new(T::zero(), T::zero());
        }
        mass_dependent_propagator(&self.resonance, self.width, decay, event.m2_ab)
            * barriers_and_spin(&self.resonance, self.spin, decay, event)
    }
}

/// A [`BreitWigner`] without the production barrier:
/// ```math
/// A(m^2_{ab}, m^2_{bc}) = F_R Z_J \frac{1}{M_R^2 - m^2_{ab} - i M_R \Gamma(m^2_{ab})}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreitWignerOnly {
    name: String,
    resonance: Particle,
    spin: DalitzSpin,
    width: f64,
}

impl BreitWignerOnly {
    /// Construct a [`BreitWignerOnly`] for the given resonance and nominal width.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::UnsupportedZemach`] if the resonance spin exceeds 2.
    pub fn new(name: &str, resonance: Particle, width: f64) -> DalitzResult<Self> {
        Ok(Self {
            name: name.to_string(),
            spin: check_dalitz_spin(&resonance)?,
            resonance,
            width,
        })
    }

    /// The resonance in the $`ab`$ channel.
    pub fn resonance(&self) -> &Particle {
        &self.resonance
    }

    /// The nominal width in GeV.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Re-check the construction invariants, e.g. after deserialization.
    pub fn validate(&self) -> DalitzResult<()> {
        check_spin_matches(&self.name, &self.resonance, self.spin)
    }
}

impl ThreeBodyAmplitude for BreitWignerOnly {
    fn name(&self) -> &str {
        &self.name
    }

    fn value<T: Real>(&self, decay: &ThreeBodyDecay, event: &ThreeBodyEvent<T>) -> Complex<T> {
        if !decay.is_valid(event) {
            return Complex::new(T::zero(), T::zero());
        }
        mass_dependent_propagator(&self.resonance, self.width, decay, event.m2_ab)
            * barrier_and_spin(&self.resonance, self.spin, decay, event)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use dalitz_core::{
        particles::{D_PLUS, F2_1270, PION, RHO_770, TOY0_1000},
        Symmetrization,
    };

    use super::*;

    fn decay() -> ThreeBodyDecay {
        ThreeBodyDecay::new(D_PLUS, PION, PION, PION)
    }

    #[test]
    fn test_scalar_at_nominal_mass() {
        let bw = BreitWigner::new("toy0_1000", TOY0_1000, 0.1).unwrap();
        let value = bw.value(&decay(), &ThreeBodyEvent::new(1.0, 1.0));
        assert_relative_eq!(value.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(value.im, 10.0, epsilon = 1e-10);
    }

    #[test]
    fn test_outside_dalitz_plot() {
        let bw = BreitWigner::new("rho", RHO_770, 0.1491).unwrap();
        let value = bw.value(&decay(), &ThreeBodyEvent::new(0.05, 1.0));
        assert_eq!(value, Complex::new(0.0, 0.0));
        let value = bw.value_symmetrized(&decay(), &ThreeBodyEvent::new(3.2, 3.2));
        assert_eq!(value, Complex::new(0.0, 0.0));
    }

    #[test]
    fn test_symmetrization() {
        let decay = decay();
        for bw in [
            BreitWigner::new("rho", RHO_770, 0.1491).unwrap(),
            BreitWigner::new("f2", F2_1270, 0.1852).unwrap(),
        ] {
            for (x, y) in [(0.6, 1.4), (1.0, 1.0), (0.3, 2.0), (2.2, 0.9)] {
                let forward = bw.value(&decay, &ThreeBodyEvent::new(x, y));
                let backward = bw.value(&decay, &ThreeBodyEvent::new(y, x));
                let symmetrized =
                    bw.evaluate(&decay, &ThreeBodyEvent::new(x, y), Symmetrization::Identical);
                assert_relative_eq!(symmetrized.re, (forward + backward).re);
                assert_relative_eq!(symmetrized.im, (forward + backward).im);
            }
        }
    }

    #[test]
    fn test_vector_spin_factor() {
        let decay = decay();
        let bw = BreitWigner::new("rho", RHO_770, 0.1491).unwrap();
        let m2 = RHO_770.mass2();
        // equal pion masses make Z_1 linear in m2_bc, vanishing at the middle of the band
        let zero_point = (D_PLUS.mass2() + 3.0 * PION.mass2() - m2) / 2.0;
        let value = bw.value(&decay, &ThreeBodyEvent::new(m2, zero_point));
        assert_relative_eq!(value.norm(), 0.0, epsilon = 1e-9);
        let value = bw.value(&decay, &ThreeBodyEvent::new(m2, zero_point + 0.5));
        assert!(value.norm() > 0.0);
    }

    #[test]
    fn test_unsupported_spin() {
        let spin_three = Particle::new(1.69, 5.0, 3);
        assert!(matches!(
            BreitWigner::new("rho3", spin_three, 0.16),
            Err(DalitzError::UnsupportedZemach { child: 3, .. })
        ));
    }

    #[test]
    fn test_breit_wigner_only() {
        let decay = decay();
        let bw = BreitWignerOnly::new("toy0_1000", TOY0_1000, 0.1).unwrap();
        let value = bw.value(&decay, &ThreeBodyEvent::new(1.0, 1.0));
        assert_relative_eq!(value.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(value.im, 1.0 / (TOY0_1000.mass * 0.1), max_relative = 1e-10);
        // at the nominal mass F_P = 1, so both shapes agree across the band
        let full = BreitWigner::new("rho", RHO_770, 0.1491).unwrap();
        let only = BreitWignerOnly::new("rho", RHO_770, 0.1491).unwrap();
        let m2 = RHO_770.mass2();
        for m2_bc in [0.6, 1.0, 1.5, 2.0] {
            let event = ThreeBodyEvent::new(m2, m2_bc);
            let (a, b) = (full.value(&decay, &event), only.value(&decay, &event));
            assert_relative_eq!(a.re, b.re, epsilon = 1e-12, max_relative = 1e-10);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-12, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_vector_spin_factor_without_production_barrier() {
        let decay = decay();
        let bw = BreitWignerOnly::new("rho", RHO_770, 0.1491).unwrap();
        let m2 = RHO_770.mass2();
        let zero_point = (D_PLUS.mass2() + 3.0 * PION.mass2() - m2) / 2.0;
        let value = bw.value(&decay, &ThreeBodyEvent::new(m2, zero_point));
        assert_relative_eq!(value.norm(), 0.0, epsilon = 1e-9);
        let value = bw.value(&decay, &ThreeBodyEvent::new(m2, zero_point + 0.5));
        assert!(value.norm() > 0.0);
        assert!(matches!(
            BreitWignerOnly::new("rho3", Particle::new(1.69, 5.0, 3), 0.16),
            Err(DalitzError::UnsupportedZemach { child: 3, .. })
        ));
    }

    #[test]
    fn test_validate_spin_mismatch() {
        let mut bw = BreitWigner::new("rho", RHO_770, 0.1491).unwrap();
        assert!(bw.validate().is_ok());
        bw.resonance = F2_1270;
        assert!(matches!(
            bw.validate(),
            Err(DalitzError::InvalidConfiguration(_))
        ));
        bw.resonance = Particle::new(1.69, 5.0, 3);
        assert!(matches!(
            bw.validate(),
            Err(DalitzError::UnsupportedZemach { child: 3, .. })
        ));
    }
}
