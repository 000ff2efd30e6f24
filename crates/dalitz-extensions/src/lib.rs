//! # dalitz-extensions
//!
//! Model composition on top of `dalitz-amplitudes`: a [`Model`] evaluates an ordered list of
//! resonances into amplitude vectors, the functions in [`intensity`] combine those with fit
//! coefficients, and a [`NormalizationIntegrator`] estimates the phase-space integrals needed to
//! normalize the intensity. [`ModelConfig`] describes a model by particle names so it can be
//! stored or shipped as plain data.
#![warn(clippy::perf, clippy::style)]

/// Name-based model descriptions.
pub mod config;
/// Monte Carlo normalization integrals.
pub mod integrals;
/// Fit statistics and normalizations built from amplitude vectors.
pub mod intensity;
/// The [`Model`] type.
pub mod model;

pub use config::{ChannelConfig, ModelConfig, ResonanceConfig};
pub use integrals::{NormalizationIntegral, NormalizationIntegrator};
pub use intensity::{
    fit_statistic, fit_statistic_with_background, normalization, normalization_parts,
    normalization_with_background,
};
pub use model::Model;
