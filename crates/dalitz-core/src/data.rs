use accurate::{sum::Klein, traits::*};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    particles::Particle,
    utils::functions::{fourth_pair_invariant, phase_space_valid_3, phase_space_valid_5},
    DalitzError, DalitzResult, Real,
};

/// A point in the Dalitz plot of a three-body decay $`P \to abc`$.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThreeBodyEvent<T> {
    /// Invariant mass squared of $`a`$ and $`b`$
    pub m2_ab: T,
    /// Invariant mass squared of $`b`$ and $`c`$
    pub m2_bc: T,
}

impl<T: Real> ThreeBodyEvent<T> {
    pub const N_INVARIANTS: usize = 2;

    pub fn new(m2_ab: T, m2_bc: T) -> Self {
        Self { m2_ab, m2_bc }
    }

    /// Build an event from `[m²_ab, m²_bc]`.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::InvalidEvent`] unless `values` holds exactly two entries.
    pub fn from_slice(values: &[T]) -> DalitzResult<Self> {
        match values {
            &[m2_ab, m2_bc] => Ok(Self::new(m2_ab, m2_bc)),
            _ => Err(DalitzError::InvalidEvent {
                expected: Self::N_INVARIANTS,
                found: values.len(),
            }),
        }
    }

    /// The same event with the outer particles $`a`$ and $`c`$ exchanged.
    pub fn swapped(&self) -> Self {
        Self::new(self.m2_bc, self.m2_ab)
    }

    /// The event followed by its $`a \leftrightarrow c`$ image.
    pub fn permutations(&self) -> [Self; 2] {
        [*self, self.swapped()]
    }

    pub fn to_array(&self) -> [T; 2] {
        [self.m2_ab, self.m2_bc]
    }
}

/// A point in the five-dimensional phase space of a four-body decay $`P \to abcd`$, where
/// particles are numbered $`a = 1`$, $`b = 2`$, $`c = 3`$, $`d = 4`$.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FourBodyEvent<T> {
    pub m2_12: T,
    pub m2_14: T,
    pub m2_23: T,
    pub m2_34: T,
    pub m2_13: T,
}

impl<T: Real> FourBodyEvent<T> {
    pub const N_INVARIANTS: usize = 5;

    pub fn new(m2_12: T, m2_14: T, m2_23: T, m2_34: T, m2_13: T) -> Self {
        Self {
            m2_12,
            m2_14,
            m2_23,
            m2_34,
            m2_13,
        }
    }

    /// Build an event from `[m²_12, m²_14, m²_23, m²_34, m²_13]`.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::InvalidEvent`] unless `values` holds exactly five entries.
    pub fn from_slice(values: &[T]) -> DalitzResult<Self> {
        match values {
            &[m2_12, m2_14, m2_23, m2_34, m2_13] => {
                Ok(Self::new(m2_12, m2_14, m2_23, m2_34, m2_13))
            }
            _ => Err(DalitzError::InvalidEvent {
                expected: Self::N_INVARIANTS,
                found: values.len(),
            }),
        }
    }

    /// The invariants in canonical order `[m²_12, m²_14, m²_23, m²_34, m²_13]`.
    pub fn invariants(&self) -> [T; 5] {
        [self.m2_12, self.m2_14, self.m2_23, self.m2_34, self.m2_13]
    }

    /// The event relabeled by exchanging particles 1 and 3.
    pub fn swap_13(&self) -> Self {
        Self::new(self.m2_23, self.m2_34, self.m2_12, self.m2_14, self.m2_13)
    }

    /// The event relabeled by exchanging particles 2 and 4.
    pub fn swap_24(&self) -> Self {
        Self::new(self.m2_14, self.m2_12, self.m2_34, self.m2_23, self.m2_13)
    }

    /// The four relabelings of two identical pairs: identity, $`1 \leftrightarrow 3`$,
    /// $`2 \leftrightarrow 4`$ and both exchanges together.
    pub fn permutations(&self) -> [Self; 4] {
        [*self, self.swap_13(), self.swap_24(), self.swap_13().swap_24()]
    }
}

/// A single event of either topology.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event<T> {
    ThreeBody(ThreeBodyEvent<T>),
    FourBody(FourBodyEvent<T>),
}

impl<T: Real> Event<T> {
    /// Build an event, choosing the topology from the length of `values`.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::InvalidEvent`] if `values` holds neither two nor five entries.
    pub fn from_slice(values: &[T]) -> DalitzResult<Self> {
        let three = ThreeBodyEvent::<T>::N_INVARIANTS;
        let four = FourBodyEvent::<T>::N_INVARIANTS;
        match values.len() {
            n if n == three => ThreeBodyEvent::from_slice(values).map(Event::ThreeBody),
            n if n == four => FourBodyEvent::from_slice(values).map(Event::FourBody),
            found => Err(DalitzError::InvalidEvent {
                expected: if found < four { three } else { four },
                found,
            }),
        }
    }

    /// The number of final-state particles.
    pub fn n_daughters(&self) -> usize {
        match self {
            Event::ThreeBody(_) => 3,
            Event::FourBody(_) => 4,
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        match self {
            Event::ThreeBody(event) => event.to_array().to_vec(),
            Event::FourBody(event) => event.invariants().to_vec(),
        }
    }
}

impl<T> From<ThreeBodyEvent<T>> for Event<T> {
    fn from(value: ThreeBodyEvent<T>) -> Self {
        Event::ThreeBody(value)
    }
}

impl<T> From<FourBodyEvent<T>> for Event<T> {
    fn from(value: FourBodyEvent<T>) -> Self {
        Event::FourBody(value)
    }
}

/// The decay $`P \to abc`$.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThreeBodyDecay {
    pub parent: Particle,
    pub a: Particle,
    pub b: Particle,
    pub c: Particle,
}

impl ThreeBodyDecay {
    pub fn new(parent: Particle, a: Particle, b: Particle, c: Particle) -> Self {
        Self { parent, a, b, c }
    }

    /// The masses `[M, m_a, m_b, m_c]` lifted into the evaluation scalar.
    pub fn masses<T: Real>(&self) -> [T; 4] {
        [self.parent.m(), self.a.m(), self.b.m(), self.c.m()]
    }

    /// See [`phase_space_valid_3`].
    pub fn is_valid<T: Real>(&self, event: &ThreeBodyEvent<T>) -> bool {
        let [parent, a, b, c] = self.masses();
        phase_space_valid_3(event.m2_ab, event.m2_bc, parent, a, b, c)
    }

    /// The rectangle enclosing the Dalitz plot, as `[(min, max); 2]` over `(m²_ab, m²_bc)`.
    pub fn bounds(&self) -> [(f64, f64); 2] {
        let sq = |x: f64| x * x;
        let (p, a, b, c) = (self.parent.mass, self.a.mass, self.b.mass, self.c.mass);
        [(sq(a + b), sq(p - c)), (sq(b + c), sq(p - a))]
    }
}

/// The decay $`P \to abcd`$.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FourBodyDecay {
    pub parent: Particle,
    pub a: Particle,
    pub b: Particle,
    pub c: Particle,
    pub d: Particle,
}

impl FourBodyDecay {
    pub fn new(parent: Particle, a: Particle, b: Particle, c: Particle, d: Particle) -> Self {
        Self {
            parent,
            a,
            b,
            c,
            d,
        }
    }

    /// The masses `[M, m_a, m_b, m_c, m_d]` lifted into the evaluation scalar.
    pub fn masses<T: Real>(&self) -> [T; 5] {
        [
            self.parent.m(),
            self.a.m(),
            self.b.m(),
            self.c.m(),
            self.d.m(),
        ]
    }

    /// See [`phase_space_valid_5`].
    pub fn is_valid<T: Real>(&self, event: &FourBodyEvent<T>) -> bool {
        phase_space_valid_5(event.invariants(), self.masses())
    }

    /// The dependent invariant $`m^2_{24}`$ of `event`.
    pub fn m2_24<T: Real>(&self, event: &FourBodyEvent<T>) -> T {
        fourth_pair_invariant(event.invariants(), self.masses())
    }

    /// The hypercube enclosing the physical region, as `[(min, max); 5]` over
    /// `(m²_12, m²_14, m²_23, m²_34, m²_13)`.
    pub fn bounds(&self) -> [(f64, f64); 5] {
        let sq = |x: f64| x * x;
        let (p, a, b, c, d) = (
            self.parent.mass,
            self.a.mass,
            self.b.mass,
            self.c.mass,
            self.d.mass,
        );
        [
            (sq(a + b), sq(p - c - d)),
            (sq(a + d), sq(p - b - c)),
            (sq(b + c), sq(p - a - d)),
            (sq(c + d), sq(p - a - b)),
            (sq(a + c), sq(p - b - d)),
        ]
    }
}

/// A decay topology with three or four final-state particles.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Decay {
    ThreeBody(ThreeBodyDecay),
    FourBody(FourBodyDecay),
}

impl Decay {
    /// Build the decay of `parent` into the given daughters.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::InvalidConfiguration`] unless there are three or four daughters.
    pub fn new(parent: Particle, daughters: &[Particle]) -> DalitzResult<Self> {
        match daughters {
            &[a, b, c] => Ok(Decay::ThreeBody(ThreeBodyDecay::new(parent, a, b, c))),
            &[a, b, c, d] => Ok(Decay::FourBody(FourBodyDecay::new(parent, a, b, c, d))),
            _ => Err(DalitzError::InvalidConfiguration(format!(
                "a decay needs three or four daughters, found {}",
                daughters.len()
            ))),
        }
    }

    pub fn parent(&self) -> Particle {
        match self {
            Decay::ThreeBody(decay) => decay.parent,
            Decay::FourBody(decay) => decay.parent,
        }
    }

    pub fn n_daughters(&self) -> usize {
        match self {
            Decay::ThreeBody(_) => 3,
            Decay::FourBody(_) => 4,
        }
    }

    /// The number of invariants needed to specify an event.
    pub fn n_invariants(&self) -> usize {
        match self {
            Decay::ThreeBody(_) => ThreeBodyEvent::<f64>::N_INVARIANTS,
            Decay::FourBody(_) => FourBodyEvent::<f64>::N_INVARIANTS,
        }
    }

    /// Build an event of this topology.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::InvalidEvent`] if `values` has the wrong length.
    pub fn event<T: Real>(&self, values: &[T]) -> DalitzResult<Event<T>> {
        match self {
            Decay::ThreeBody(_) => ThreeBodyEvent::from_slice(values).map(Event::ThreeBody),
            Decay::FourBody(_) => FourBodyEvent::from_slice(values).map(Event::FourBody),
        }
    }

    /// Returns `true` if `event` matches this topology and lies in the physical region.
    pub fn is_valid<T: Real>(&self, event: &Event<T>) -> bool {
        match (self, event) {
            (Decay::ThreeBody(decay), Event::ThreeBody(event)) => decay.is_valid(event),
            (Decay::FourBody(decay), Event::FourBody(event)) => decay.is_valid(event),
            _ => false,
        }
    }

    /// The box enclosing the physical region, one `(min, max)` pair per invariant.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        match self {
            Decay::ThreeBody(decay) => decay.bounds().to_vec(),
            Decay::FourBody(decay) => decay.bounds().to_vec(),
        }
    }

    /// The volume of [`Decay::bounds`].
    pub fn bounds_volume(&self) -> f64 {
        self.bounds()
            .iter()
            .map(|(min, max)| (max - min).max(0.0))
            .product()
    }
}

/// A collection of (optionally weighted) [`Event`]s of a single topology.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dataset<T> {
    events: Vec<Event<T>>,
    weights: Vec<f64>,
}

impl<T: Real> Dataset<T> {
    /// A dataset where every event carries unit weight.
    pub fn new(events: Vec<Event<T>>) -> Self {
        let weights = vec![1.0; events.len()];
        Self { events, weights }
    }

    /// # Errors
    ///
    /// Returns [`DalitzError::DimensionMismatch`] if there is not exactly one weight per event.
    pub fn new_weighted(events: Vec<Event<T>>, weights: Vec<f64>) -> DalitzResult<Self> {
        if events.len() != weights.len() {
            return Err(DalitzError::DimensionMismatch {
                context: "dataset weights".to_string(),
                expected: events.len(),
                found: weights.len(),
            });
        }
        Ok(Self { events, weights })
    }

    /// Split a flat buffer of invariants into events of the topology of `decay`.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::InvalidEvent`] if the buffer length is not a multiple of the number
    /// of invariants per event.
    pub fn from_flat(decay: &Decay, values: &[T]) -> DalitzResult<Self> {
        let stride = decay.n_invariants();
        if values.len() % stride != 0 {
            return Err(DalitzError::InvalidEvent {
                expected: stride,
                found: values.len() % stride,
            });
        }
        let events = values
            .chunks_exact(stride)
            .map(|chunk| decay.event(chunk))
            .collect::<DalitzResult<Vec<_>>>()?;
        Ok(Self::new(events))
    }

    pub fn events(&self) -> &[Event<T>] {
        &self.events
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event<T>> {
        self.events.iter()
    }

    #[cfg(feature = "rayon")]
    pub fn par_iter(&self) -> rayon::slice::Iter<'_, Event<T>> {
        self.events.par_iter()
    }

    /// The sum of all event weights.
    #[cfg(feature = "rayon")]
    pub fn weighted_len(&self) -> f64 {
        self.weights
            .par_iter()
            .copied()
            .parallel_sum_with_accumulator::<Klein<f64>>()
    }

    /// The sum of all event weights.
    #[cfg(not(feature = "rayon"))]
    pub fn weighted_len(&self) -> f64 {
        self.weights
            .iter()
            .copied()
            .sum_with_accumulator::<Klein<f64>>()
    }
}
