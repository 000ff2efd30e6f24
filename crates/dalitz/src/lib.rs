//! `dalitz` evaluates resonance amplitudes of three- and four-body particle decays for
//! partial-wave analyses. Events are points in the space of pairwise invariant masses, every
//! resonance is a stateless descriptor, and a model turns an event into a vector of complex
//! amplitudes, one per resonance. Fitting those vectors (and normalizing the result with a
//! phase-space integral) is the job of an external optimizer.
//!
//! # Key Features
//! * Blatt-Weisskopf barriers, relativistic Breit-Wigner and Flatté propagators, Zemach spin
//!   factors, and exact three- and four-body phase-space boundaries.
//! * Three-body Breit-Wigner and Flatté resonances in the Dalitz plot, and four-body
//!   sequential cascades and vector pairs.
//! * Identical-particle symmetrization as a model-level switch.
//! * Every kinematic function is generic over a [`Real`] scalar, so `f32`, `f64` or an
//!   automatic-differentiation type can flow through the same code.
//! * Batch evaluation over a [`Dataset`] using [`rayon`](https://github.com/rayon-rs/rayon).
//!
//! # Quick Start
//! A $`D^+ \to \pi^+\pi^-\pi^+`$ model with a non-resonant term and a $`\rho(770)`$:
//! ```rust
//! use dalitz::prelude::*;
//! use num::Complex;
//!
//! let model = ModelConfig::new("D+", &["pi", "pi", "pi"])
//!     .with_resonance(ResonanceConfig::Flat { name: "flat".to_string() })
//!     .with_resonance(ResonanceConfig::BreitWigner {
//!         name: "rho".to_string(),
//!         resonance: "rho_770".to_string(),
//!         width: 0.1491,
//!     })
//!     .build(&ParticleRegistry::standard())?;
//!
//! let amplitudes = model.amplitude_vector_from_slice(&[0.6, 1.4])?;
//! let coefficients = ComplexVector::from_vec(vec![Complex::new(1.0, 0.0), Complex::new(0.5, 0.2)]);
//! let intensity = fit_statistic(&amplitudes, &coefficients)?;
//! assert!(intensity > 0.0);
//! # Ok::<(), DalitzError>(())
//! ```
//!
//! The intensity is normalized with the interference integrals of the model:
//! ```rust,no_run
//! # use dalitz::prelude::*;
//! # use num::Complex;
//! # let model = ModelConfig::new("D+", &["pi", "pi", "pi"])
//! #     .with_resonance(ResonanceConfig::Flat { name: "flat".to_string() })
//! #     .build(&ParticleRegistry::standard())?;
//! let integral = NormalizationIntegrator::new(1_000_000, 0).integrate(&model)?;
//! let coefficients = ComplexVector::from_vec(vec![Complex::new(1.0, 0.0)]);
//! let norm = integral.normalization(&coefficients, &[])?;
//! # Ok::<(), DalitzError>(())
//! ```
//!
//! # Event Format
//! A three-body event $`P \to abc`$ is the pair $`(m^2_{ab}, m^2_{bc})`$. A four-body event
//! $`P \to abcd`$ is the five-tuple $`(m^2_{12}, m^2_{14}, m^2_{23}, m^2_{34}, m^2_{13})`$, with
//! $`m^2_{24}`$ fixed by the others. Events outside the physical region are not errors: every
//! amplitude simply vanishes there.
#![warn(clippy::perf, clippy::style)]

pub mod data {
    pub use dalitz_core::data::{
        Dataset, Decay, Event, FourBodyDecay, FourBodyEvent, ThreeBodyDecay, ThreeBodyEvent,
    };
}

pub mod particles {
    pub use dalitz_core::particles::*;
}

pub mod utils {
    pub use dalitz_core::utils::*;
}

pub mod traits {
    pub use dalitz_amplitudes::{FourBodyAmplitude, ThreeBodyAmplitude};
    pub use dalitz_core::utils::vectors::AmplitudeVector;
    pub use dalitz_core::Real;
}

pub mod amplitudes {
    pub use dalitz_amplitudes::*;
}

pub mod extensions {
    pub use dalitz_extensions::*;
}

/// The types needed to configure and evaluate a model.
pub mod prelude {
    pub use crate::traits::*;
    pub use dalitz_core::{
        ComplexMatrix, ComplexVector, DalitzError, DalitzResult, Dataset, Decay, Event,
        ParticleRegistry, Projection, Symmetrization,
    };
    pub use dalitz_extensions::{
        fit_statistic, fit_statistic_with_background, normalization,
        normalization_with_background, Model, ModelConfig, NormalizationIntegral,
        NormalizationIntegrator, ResonanceConfig,
    };
}

pub use dalitz_amplitudes::*;
pub use dalitz_core::{
    blatt_weisskopf, breakup_momentum_squared, breit_wigner_propagator, flatte_propagator,
    phase_space_valid_3, phase_space_valid_5, relativistic_breit_wigner_width, zemach,
    ComplexMatrix, ComplexVector, DalitzError, DalitzResult, Dataset, Decay, Event,
    FourBodyDecay, FourBodyEvent, Particle, ParticleRegistry, Projection, Real,
    Symmetrization, ThreeBodyDecay, ThreeBodyEvent,
};
pub use dalitz_extensions::*;
pub use serde::{Deserialize, Serialize};
