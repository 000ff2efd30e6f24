use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::DalitzError;

/// Whether resonance amplitudes are summed over identical-particle permutations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symmetrization {
    /// Evaluate every resonance at the event as given.
    None,
    /// Sum every resonance over the permutations of identical final-state particles: the
    /// $`a \leftrightarrow c`$ exchange for three-body decays and the four relabelings
    /// (identity, $`1 \leftrightarrow 3`$, $`2 \leftrightarrow 4`$, both) for four-body decays.
    #[default]
    Identical,
}

impl Symmetrization {
    /// Returns `true` if amplitudes are summed over permutations.
    pub fn is_symmetrized(&self) -> bool {
        matches!(self, Symmetrization::Identical)
    }
}

impl Display for Symmetrization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symmetrization::None => write!(f, "None"),
            Symmetrization::Identical => write!(f, "Identical"),
        }
    }
}

impl FromStr for Symmetrization {
    type Err = DalitzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "off" | "false" | "unsymmetrized" => Ok(Self::None),
            "identical" | "on" | "true" | "sym" | "symmetrized" => Ok(Self::Identical),
            _ => Err(DalitzError::ParseError {
                name: s.to_string(),
                object: "Symmetrization".to_string(),
            }),
        }
    }
}

/// Helicity projections of a decay into two vector mesons.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Projection {
    /// $`\frac{1}{\sqrt{2}}\cos\chi\sin\theta_1\sin\theta_2`$
    Parallel,
    /// $`\frac{i}{\sqrt{2}}\sin\chi\sin\theta_1\sin\theta_2`$
    Perpendicular,
    /// $`\cos\theta_1\cos\theta_2`$
    Longitudinal,
}

impl Projection {
    /// All projections in the order they are usually listed in a fit.
    pub const ALL: [Projection; 3] = [
        Projection::Parallel,
        Projection::Perpendicular,
        Projection::Longitudinal,
    ];
}

impl Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Projection::Parallel => write!(f, "Parallel"),
            Projection::Perpendicular => write!(f, "Perpendicular"),
            Projection::Longitudinal => write!(f, "Longitudinal"),
        }
    }
}

impl FromStr for Projection {
    type Err = DalitzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parallel" | "par" | "||" => Ok(Self::Parallel),
            "perpendicular" | "perp" | "⊥" => Ok(Self::Perpendicular),
            "longitudinal" | "long" | "0" => Ok(Self::Longitudinal),
            _ => Err(DalitzError::ParseError {
                name: s.to_string(),
                object: "Projection".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_parsing() {
        assert_eq!("perp".parse::<Projection>().unwrap(), Projection::Perpendicular);
        assert_eq!("Longitudinal".parse::<Projection>().unwrap(), Projection::Longitudinal);
        for projection in Projection::ALL {
            assert_eq!(
                projection.to_string().parse::<Projection>().unwrap(),
                projection
            );
        }
        assert!("transverse".parse::<Projection>().is_err());
    }

    #[test]
    fn test_symmetrization_parsing() {
        assert_eq!(
            "off".parse::<Symmetrization>().unwrap(),
            Symmetrization::None
        );
        assert!("identical"
            .parse::<Symmetrization>()
            .unwrap()
            .is_symmetrized());
        assert!(matches!(
            "maybe".parse::<Symmetrization>(),
            Err(DalitzError::ParseError { .. })
        ));
    }
}
