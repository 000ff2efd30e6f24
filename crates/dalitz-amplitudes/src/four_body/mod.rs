/// The sequential $`P \to R_1 d \to (R_2 c) d \to ((ab) c) d`$ composite amplitude.
pub mod chain;
/// Per-event angular variables shared by all four-body amplitudes.
pub mod kinematics;
/// The $`P \to V_1 V_2`$ composite amplitude in its helicity projections.
pub mod vector_pair;

pub use chain::SequentialChain;
pub use kinematics::{FourBodyKinematics, FourBodyPoint};
pub use vector_pair::VectorPair;

use dalitz_core::{
    blatt_weisskopf, breit_wigner_propagator, relativistic_breit_wigner_width, Particle, Real,
};
use num::Complex;

// B_l(m^2) / B_l(M^2) for a barrier whose daughters keep their masses
fn barrier_ratio<T: Real>(l: u32, r2: T, m2: T, nominal_m2: T, m_a: T, m_b: T) -> T {
    blatt_weisskopf(l, r2, m2, m_a, m_b) / blatt_weisskopf(l, r2, nominal_m2, m_a, m_b)
}

// F_P for the production vertex, where the daughter masses run and the parent mass is fixed
fn production_barrier<T: Real>(l: u32, parent: &Particle, running: (T, T), nominal: (T, T)) -> T {
    let (r2, m2) = (parent.r2::<T>(), parent.m2::<T>());
    blatt_weisskopf(l, r2, m2, running.0, running.1)
        / blatt_weisskopf(l, r2, m2, nominal.0, nominal.1)
}

// A relativistic Breit-Wigner for a resonance decaying with orbital angular momentum `l`
fn resonance_propagator<T: Real>(
    resonance: &Particle,
    width: f64,
    l: u32,
    m2: T,
    m_a: T,
    m_b: T,
) -> Complex<T> {
    let mass = resonance.m::<T>();
    let gamma = relativistic_breit_wigner_width(
        mass,
        T::lit(width),
        l,
        T::lit(resonance.radius),
        m2,
        m_a,
        m_b,
    );
    breit_wigner_propagator(mass, m2, gamma)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use dalitz_core::{
        particles::{D0, PION},
        FourBodyDecay, FourBodyEvent,
    };

    pub fn four_pion_decay() -> FourBodyDecay {
        FourBodyDecay::new(D0, PION, PION, PION, PION)
    }

    pub fn test_event() -> FourBodyEvent<f64> {
        FourBodyEvent::new(0.6, 0.7, 0.8, 0.9, 0.5)
    }
}
