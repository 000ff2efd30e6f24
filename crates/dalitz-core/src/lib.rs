//! # dalitz-core
//!
//! This is an internal crate used by `dalitz`. It holds the particle registry, the event and
//! dataset types, and the kinematic functions every resonance is built from.
#![warn(clippy::perf, clippy::style)]
#![allow(clippy::excessive_precision)]

use std::fmt::Debug;

use num::{traits::FloatConst, Float, NumCast};
use thiserror::Error;

/// Methods for constructing three- and four-body events, decay topologies and [`Dataset`]s.
pub mod data;
/// Named [`Particle`](crate::particles::Particle) records and the [`ParticleRegistry`].
pub mod particles;
/// Utility functions, enums, and traits
pub mod utils;
/// Useful traits for all crate structs
pub mod traits {
    pub use crate::Real;
}

pub use crate::data::{
    Dataset, Decay, Event, FourBodyDecay, FourBodyEvent, ThreeBodyDecay, ThreeBodyEvent,
};
pub use crate::particles::{Particle, ParticleRegistry};
pub use crate::utils::enums::{Projection, Symmetrization};
pub use crate::utils::functions::{
    blatt_weisskopf, breakup_momentum_ratio, breakup_momentum_squared, breit_wigner_propagator,
    complex_breakup_momentum, flatte_propagator, flatte_propagator_with_channels,
    fourth_pair_invariant, phase_space_valid_3, phase_space_valid_5,
    relativistic_breit_wigner_width, zemach, zemach_dalitz, DalitzSpin, FlatteChannel,
    ZemachFactor,
};
pub use crate::utils::variables::{
    helicity_angles, sequential_angular_variables, HelicityAngles, SequentialAngles,
};
pub use crate::utils::vectors::{ComplexMatrix, ComplexVector};

/// The real scalar every kinematic function is generic over.
///
/// Anything that behaves like a floating point number under [`num::Float`] can flow through the
/// amplitude engine, which lets an automatic-differentiation type stand in for [`f64`] without
/// touching the physics code. Configuration constants (masses, widths, radii) are stored as
/// [`f64`] and lifted with [`Real::lit`] at evaluation time.
pub trait Real: Float + FloatConst + Debug + Send + Sync + 'static {
    /// Lift an [`f64`] literal into this scalar type.
    fn lit(x: f64) -> Self {
        <Self as NumCast>::from(x).unwrap_or_else(Self::nan)
    }
}

impl Real for f64 {
    fn lit(x: f64) -> Self {
        x
    }
}

impl Real for f32 {
    fn lit(x: f64) -> Self {
        x as f32
    }
}

pub type DalitzResult<T> = Result<T, DalitzError>;

/// The error type used by all `dalitz` internal methods
#[derive(Error, Debug)]
pub enum DalitzError {
    /// An error which occurs when a resonance asks for an angular factor with no entry in the
    /// Zemach table.
    #[error(
        "No Zemach factor for parent spin {parent}, child spin {child}, orbital angular momentum {orbital}!"
    )]
    UnsupportedZemach {
        /// Spin of the decaying state
        parent: u32,
        /// Spin of the intermediate state
        child: u32,
        /// Orbital angular momentum between the decay products
        orbital: u32,
    },
    /// An error which occurs when the user tries to use a particle that was never registered.
    #[error("No registered particle with name \"{name}\"!")]
    UnknownParticle {
        /// Name of particle which failed lookup
        name: String,
    },
    /// An error which occurs when the user tries to register two particles by the same name to
    /// the same [`ParticleRegistry`].
    #[error("A particle by the name \"{name}\" is already registered!")]
    RegistrationError {
        /// Name of particle which is already registered
        name: String,
    },
    /// An error which occurs when two operands of a vector or matrix operation disagree in size.
    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// The operation which was attempted
        context: String,
        /// The size required by the operation
        expected: usize,
        /// The size which was supplied
        found: usize,
    },
    /// An error which occurs when an event is built from a slice of the wrong length.
    #[error("Events must hold {expected} invariant masses, found {found}")]
    InvalidEvent {
        /// The number of invariants the decay topology requires
        expected: usize,
        /// The number of invariants supplied
        found: usize,
    },
    /// An error which occurs when a resonance is attached to a decay with a different number of
    /// final-state particles.
    #[error("Resonance \"{resonance}\" describes a {found}-body decay, but the model is {expected}-body")]
    TopologyMismatch {
        /// Name of the offending resonance
        resonance: String,
        /// The number of final-state particles of the model
        expected: usize,
        /// The number of final-state particles the resonance was built for
        found: usize,
    },
    /// An error which occurs when a model or integrator is configured with values that cannot be
    /// evaluated.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// An error which occurs when the user tries to parse an invalid string of text, typically
    /// into an enum variant.
    #[error("Failed to parse string: \"{name}\" does not correspond to a valid \"{object}\"!")]
    ParseError {
        /// The string which was parsed
        name: String,
        /// The name of the object it failed to parse into
        object: String,
    },
    /// An error returned by the Rust encoder
    #[error("Encoder error: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),
    /// An error returned by the Rust decoder
    #[error("Decoder error: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),
    /// A custom fallback error for errors too complex or too infrequent to warrant their own error
    /// category.
    #[error("{0}")]
    Custom(String),
}

impl Clone for DalitzError {
    // Encoder and decoder errors are not cloneable, so everything collapses into its message
    fn clone(&self) -> Self {
        let err_string = self.to_string();
        DalitzError::Custom(err_string)
    }
}
