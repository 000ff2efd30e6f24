use dalitz_amplitudes::{
    BreitWigner, BreitWignerOnly, Flat, FlatFourBody, Flatte, FourBodyResonance, Resonance,
    SequentialChain, ThreeBodyResonance, VectorPair,
};
use dalitz_core::{
    DalitzError, DalitzResult, Decay, FlatteChannel, ParticleRegistry, Projection,
    Symmetrization,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Model;

/// A Flatté channel whose particles are looked up by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub coupling: f64,
    pub particles: (String, String),
}

/// A resonance descriptor that refers to particles by their [`ParticleRegistry`] names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ResonanceConfig {
    Flat {
        name: String,
    },
    BreitWigner {
        name: String,
        resonance: String,
        width: f64,
    },
    BreitWignerOnly {
        name: String,
        resonance: String,
        width: f64,
    },
    /// A Flatté over the $`\pi\pi`$ and $`K\bar{K}`$ channels
    Flatte {
        name: String,
        resonance: String,
        g_pp: f64,
        g_kk: f64,
    },
    /// A Flatté over an explicit channel list
    FlatteChannels {
        name: String,
        resonance: String,
        channels: Vec<ChannelConfig>,
    },
    FlatFourBody {
        name: String,
    },
    Chain {
        name: String,
        first: String,
        first_width: f64,
        second: String,
        second_width: f64,
        orbital: [u32; 3],
    },
    VectorPair {
        name: String,
        first: String,
        first_width: f64,
        second: String,
        second_width: f64,
        orbital: [u32; 3],
        projection: Projection,
    },
}

impl ResonanceConfig {
    pub fn name(&self) -> &str {
        match self {
            Self::Flat { name }
            | Self::BreitWigner { name, .. }
            | Self::BreitWignerOnly { name, .. }
            | Self::Flatte { name, .. }
            | Self::FlatteChannels { name, .. }
            | Self::FlatFourBody { name }
            | Self::Chain { name, .. }
            | Self::VectorPair { name, .. } => name,
        }
    }

    /// The number of final-state particles of the decay this descriptor applies to.
    pub fn n_daughters(&self) -> usize {
        match self {
            Self::Flat { .. }
            | Self::BreitWigner { .. }
            | Self::BreitWignerOnly { .. }
            | Self::Flatte { .. }
            | Self::FlatteChannels { .. } => 3,
            Self::FlatFourBody { .. } | Self::Chain { .. } | Self::VectorPair { .. } => 4,
        }
    }

    /// Resolve particle names and construct the resonance for `decay`.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::TopologyMismatch`] if the descriptor belongs to the other
    /// topology, [`DalitzError::UnknownParticle`] for unregistered names, and any construction
    /// error of the resonance itself.
    pub fn build(&self, decay: &Decay, registry: &ParticleRegistry) -> DalitzResult<Resonance> {
        if self.n_daughters() != decay.n_daughters() {
            return Err(DalitzError::TopologyMismatch {
                resonance: self.name().to_string(),
                expected: decay.n_daughters(),
                found: self.n_daughters(),
            });
        }
        let three = |resonance: ThreeBodyResonance| -> DalitzResult<Resonance> {
            Ok(Resonance::ThreeBody(resonance))
        };
        let four = |resonance: FourBodyResonance| -> DalitzResult<Resonance> {
            Ok(Resonance::FourBody(resonance))
        };
        match self {
            Self::Flat { name } => three(Flat::new(name).into()),
            Self::BreitWigner {
                name,
                resonance,
                width,
            } => three(BreitWigner::new(name, registry.get(resonance)?, *width)?.into()),
            Self::BreitWignerOnly {
                name,
                resonance,
                width,
            } => three(BreitWignerOnly::new(name, registry.get(resonance)?, *width)?.into()),
            Self::Flatte {
                name,
                resonance,
                g_pp,
                g_kk,
            } => three(Flatte::new(name, registry.get(resonance)?, *g_pp, *g_kk)?.into()),
            Self::FlatteChannels {
                name,
                resonance,
                channels,
            } => {
                let channels = channels
                    .iter()
                    .map(|channel| {
                        let (a, b) = &channel.particles;
                        Ok(FlatteChannel::new(
                            channel.coupling,
                            registry.get(a)?.mass,
                            registry.get(b)?.mass,
                        ))
                    })
                    .collect::<DalitzResult<Vec<_>>>()?;
                three(Flatte::with_channels(name, registry.get(resonance)?, channels)?.into())
            }
            Self::FlatFourBody { name } => four(FlatFourBody::new(name).into()),
            Self::Chain {
                name,
                first,
                first_width,
                second,
                second_width,
                orbital,
            } => {
                let Decay::FourBody(decay) = decay else {
                    return Err(DalitzError::InvalidConfiguration(format!(
                        "\"{name}\" needs a four-body decay"
                    )));
                };
                four(
                    SequentialChain::new(
                        name,
                        decay,
                        registry.get(first)?,
                        *first_width,
                        registry.get(second)?,
                        *second_width,
                        *orbital,
                    )?
                    .into(),
                )
            }
            Self::VectorPair {
                name,
                first,
                first_width,
                second,
                second_width,
                orbital,
                projection,
            } => four(
                VectorPair::new(
                    name,
                    registry.get(first)?,
                    *first_width,
                    registry.get(second)?,
                    *second_width,
                    *orbital,
                    *projection,
                )?
                .into(),
            ),
        }
    }
}

/// A complete, name-based model description.
///
/// Everything is plain data, so a configuration can be written by hand, stored, and turned
/// into a [`Model`] against any [`ParticleRegistry`] with [`ModelConfig::build`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub parent: String,
    pub daughters: Vec<String>,
    pub resonances: Vec<ResonanceConfig>,
    pub background: Vec<ResonanceConfig>,
    pub symmetrization: Symmetrization,
}

impl ModelConfig {
    /// An empty, symmetrized model of the decay `parent -> daughters`.
    pub fn new<S: AsRef<str>>(parent: &str, daughters: &[S]) -> Self {
        Self {
            parent: parent.to_string(),
            daughters: daughters.iter().map(|d| d.as_ref().to_string()).collect(),
            resonances: Vec::new(),
            background: Vec::new(),
            symmetrization: Symmetrization::default(),
        }
    }

    pub fn with_resonance(mut self, resonance: ResonanceConfig) -> Self {
        self.resonances.push(resonance);
        self
    }

    pub fn with_background(mut self, background: ResonanceConfig) -> Self {
        self.background.push(background);
        self
    }

    pub fn with_symmetrization(mut self, symmetrization: Symmetrization) -> Self {
        self.symmetrization = symmetrization;
        self
    }

    /// Resolve every name against `registry` and build the [`Model`].
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::InvalidConfiguration`] unless there are three or four daughters,
    /// and otherwise the first error of [`ResonanceConfig::build`].
    pub fn build(&self, registry: &ParticleRegistry) -> DalitzResult<Model> {
        let parent = registry.get(&self.parent)?;
        let daughters = self
            .daughters
            .iter()
            .map(|name| registry.get(name))
            .collect::<DalitzResult<Vec<_>>>()?;
        let decay = Decay::new(parent, &daughters)?;
        let build_all = |configs: &[ResonanceConfig]| {
            configs
                .iter()
                .map(|config| config.build(&decay, registry))
                .collect::<DalitzResult<Vec<_>>>()
        };
        let resonances = build_all(&self.resonances)?;
        let background = build_all(&self.background)?;
        debug!(
            parent = %self.parent,
            daughters = ?self.daughters,
            "resolved model configuration"
        );
        Model::new(decay, resonances, background, self.symmetrization)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use dalitz_core::{particles::DEFAULT_RADIUS, Particle};

    use super::*;

    fn d_to_three_pions() -> ModelConfig {
        ModelConfig::new("D+", &["pi", "pi", "pi"])
            .with_resonance(ResonanceConfig::Flat {
                name: "flat".to_string(),
            })
            .with_resonance(ResonanceConfig::BreitWigner {
                name: "rho".to_string(),
                resonance: "rho_770".to_string(),
                width: 0.1491,
            })
            .with_resonance(ResonanceConfig::Flatte {
                name: "f0_980".to_string(),
                resonance: "f0_980".to_string(),
                g_pp: 0.329,
                g_kk: 0.658,
            })
            .with_background(ResonanceConfig::Flat {
                name: "bkg".to_string(),
            })
    }

    #[test]
    fn test_build_three_body() {
        let model = d_to_three_pions()
            .build(&ParticleRegistry::standard())
            .unwrap();
        assert_eq!(model.resonance_names(), vec!["flat", "rho", "f0_980"]);
        assert_eq!(model.n_background(), 1);
        assert_eq!(model.symmetrization(), Symmetrization::Identical);
        let amplitudes = model.amplitude_vector_from_slice(&[1.0, 1.0]).unwrap();
        assert_eq!(amplitudes.len(), 3);
    }

    #[test]
    fn test_build_four_body() {
        let mut config = ModelConfig::new("D0", &["pi", "pi", "pi", "pi"]).with_resonance(
            ResonanceConfig::Chain {
                name: "D_a_rho_S".to_string(),
                first: "a1_1260".to_string(),
                first_width: 0.1,
                second: "rho_770".to_string(),
                second_width: 0.1491,
                orbital: [1, 0, 1],
            },
        );
        for projection in Projection::ALL {
            config = config.with_resonance(ResonanceConfig::VectorPair {
                name: format!("D_rho_omega_{projection}"),
                first: "rho_770".to_string(),
                first_width: 0.1491,
                second: "omega_782".to_string(),
                second_width: 0.00849,
                orbital: [1, 1, 1],
                projection,
            });
        }
        let model = config.build(&ParticleRegistry::standard()).unwrap();
        assert_eq!(model.n_resonances(), 4);
        let amplitudes = model
            .amplitude_vector_from_slice(&[0.6, 0.7, 0.8, 0.9, 0.5])
            .unwrap();
        assert_relative_eq!(amplitudes[0].re, 0.7079209087041514, max_relative = 1e-8);
    }

    #[test]
    fn test_unsupported_zemach() {
        let config = ModelConfig::new("D0", &["pi", "pi", "pi", "pi"]).with_resonance(
            ResonanceConfig::Chain {
                name: "D_a_sigma".to_string(),
                first: "a1_1260".to_string(),
                first_width: 0.1,
                second: "f0_500".to_string(),
                second_width: 0.550,
                orbital: [1, 1, 0],
            },
        );
        assert!(matches!(
            config.build(&ParticleRegistry::standard()),
            Err(DalitzError::UnsupportedZemach { .. })
        ));
    }

    #[test]
    fn test_unknown_particle() {
        let config = d_to_three_pions().with_resonance(ResonanceConfig::BreitWigner {
            name: "X".to_string(),
            resonance: "X(3872)".to_string(),
            width: 0.001,
        });
        assert!(matches!(
            config.build(&ParticleRegistry::standard()),
            Err(DalitzError::UnknownParticle { name }) if name == "X(3872)"
        ));
    }

    #[test]
    fn test_topology_mismatch() {
        let config = d_to_three_pions().with_resonance(ResonanceConfig::FlatFourBody {
            name: "flat4".to_string(),
        });
        assert!(matches!(
            config.build(&ParticleRegistry::standard()),
            Err(DalitzError::TopologyMismatch {
                expected: 3,
                found: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_wrong_daughter_count() {
        let config = ModelConfig::new("D0", &["pi", "pi"]);
        assert!(matches!(
            config.build(&ParticleRegistry::standard()),
            Err(DalitzError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_custom_registry_and_channels() {
        let mut registry = ParticleRegistry::standard();
        registry
            .register("eta", Particle::new(0.547862, DEFAULT_RADIUS, 0))
            .unwrap();
        let config = ModelConfig::new("D+", &["pi", "pi", "pi"])
            .with_resonance(ResonanceConfig::FlatteChannels {
                name: "f0_980".to_string(),
                resonance: "f0_980".to_string(),
                channels: vec![
                    ChannelConfig {
                        coupling: 0.329,
                        particles: ("pi".to_string(), "pi".to_string()),
                    },
                    ChannelConfig {
                        coupling: 0.1,
                        particles: ("eta".to_string(), "eta".to_string()),
                    },
                ],
            })
            .with_symmetrization(Symmetrization::None);
        let model = config.build(&registry).unwrap();
        assert_eq!(model.symmetrization(), Symmetrization::None);
        assert!(config.build(&ParticleRegistry::standard()).is_err());
    }
}
