/// Useful enumerations for symmetrization and angular projections.
pub mod enums;
/// Standard special functions like breakup momenta, barrier factors, propagators and
/// phase-space boundaries.
pub mod functions;
/// Angular variables extracted from four-body [`FourBodyEvent`](crate::data::FourBodyEvent)s.
pub mod variables;
/// Complex vector and matrix helpers built on [`nalgebra`] storage.
pub mod vectors;
