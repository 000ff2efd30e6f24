use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{DalitzError, DalitzResult, Real};

/// The interaction radius (in GeV⁻¹) used for every standard particle.
pub const DEFAULT_RADIUS: f64 = 5.0;

/// An immutable particle record.
///
/// Masses are in GeV, radii in GeV⁻¹. The record is [`Copy`] so every resonance can carry its
/// own copy without any shared ownership.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Nominal mass
    pub mass: f64,
    /// Interaction radius used in the Blatt-Weisskopf barrier factors
    pub radius: f64,
    /// Spin quantum number
    pub spin: u32,
}

impl Particle {
    /// Create a new particle from its mass, interaction radius and spin.
    pub const fn new(mass: f64, radius: f64, spin: u32) -> Self {
        Self { mass, radius, spin }
    }
    /// The squared mass $`m^2`$.
    pub fn mass2(&self) -> f64 {
        self.mass * self.mass
    }
    /// The squared radius $`r^2`$.
    pub fn radius2(&self) -> f64 {
        self.radius * self.radius
    }
    /// The mass lifted into the evaluation scalar.
    pub fn m<T: Real>(&self) -> T {
        T::lit(self.mass)
    }
    /// The squared mass lifted into the evaluation scalar.
    pub fn m2<T: Real>(&self) -> T {
        T::lit(self.mass2())
    }
    /// The squared radius lifted into the evaluation scalar.
    pub fn r2<T: Real>(&self) -> T {
        T::lit(self.radius2())
    }
}

/// $`\pi^\pm`$
pub const PION: Particle = Particle::new(0.13957018, DEFAULT_RADIUS, 0);
/// $`K^\pm`$
pub const KAON: Particle = Particle::new(0.493677, DEFAULT_RADIUS, 0);
/// $`D^\pm`$
pub const D_PLUS: Particle = Particle::new(1.86484, DEFAULT_RADIUS, 0);
/// $`D^0`$
pub const D0: Particle = Particle::new(1.86961, DEFAULT_RADIUS, 0);
/// A scalar toy resonance at 1 GeV
pub const TOY0_1000: Particle = Particle::new(1.0, DEFAULT_RADIUS, 0);
/// A scalar toy resonance at 1.2 GeV
pub const TOY0_1200: Particle = Particle::new(1.2, DEFAULT_RADIUS, 0);
/// $`f_0(500)`$, also known as $`\sigma`$
pub const F0_500: Particle = Particle::new(0.475, DEFAULT_RADIUS, 0);
/// $`f_0(980)`$
pub const F0_980: Particle = Particle::new(0.990, DEFAULT_RADIUS, 0);
/// $`f_0(1370)`$
pub const F0_1370: Particle = Particle::new(1.350, DEFAULT_RADIUS, 0);
/// $`f_0(1500)`$
pub const F0_1500: Particle = Particle::new(1.505, DEFAULT_RADIUS, 0);
/// $`a_1(1260)`$
pub const A1_1260: Particle = Particle::new(1.230, DEFAULT_RADIUS, 1);
/// $`\rho(770)`$
pub const RHO_770: Particle = Particle::new(0.77526, DEFAULT_RADIUS, 1);
/// $`\omega(782)`$
pub const OMEGA_782: Particle = Particle::new(0.78265, DEFAULT_RADIUS, 1);
/// $`f_2(1270)`$
pub const F2_1270: Particle = Particle::new(1.2751, DEFAULT_RADIUS, 2);

/// A name-indexed collection of [`Particle`]s, kept in insertion order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParticleRegistry {
    particles: IndexMap<String, Particle>,
}

impl ParticleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every particle constant defined in this module.
    pub fn standard() -> Self {
        let particles = [
            ("pi", PION),
            ("K", KAON),
            ("D+", D_PLUS),
            ("D0", D0),
            ("toy0_1000", TOY0_1000),
            ("toy0_1200", TOY0_1200),
            ("f0_500", F0_500),
            ("f0_980", F0_980),
            ("f0_1370", F0_1370),
            ("f0_1500", F0_1500),
            ("a1_1260", A1_1260),
            ("rho_770", RHO_770),
            ("omega_782", OMEGA_782),
            ("f2_1270", F2_1270),
        ]
        .into_iter()
        .map(|(name, particle)| (name.to_string(), particle))
        .collect();
        Self { particles }
    }

    /// Add a particle under a new name.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::RegistrationError`] if the name is already taken.
    pub fn register(&mut self, name: &str, particle: Particle) -> DalitzResult<()> {
        if self.particles.contains_key(name) {
            return Err(DalitzError::RegistrationError {
                name: name.to_string(),
            });
        }
        self.particles.insert(name.to_string(), particle);
        Ok(())
    }

    /// Look up a particle by name.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::UnknownParticle`] if no particle was registered under `name`.
    pub fn get(&self, name: &str) -> DalitzResult<Particle> {
        self.particles
            .get(name)
            .copied()
            .ok_or_else(|| DalitzError::UnknownParticle {
                name: name.to_string(),
            })
    }

    /// Returns `true` if a particle is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.particles.contains_key(name)
    }

    /// The registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.particles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
