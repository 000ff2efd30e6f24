use dalitz_core::{
    helicity_angles, sequential_angular_variables, FourBodyDecay, FourBodyEvent,
    HelicityAngles, Real, SequentialAngles,
};
use serde::{Deserialize, Serialize};

/// One labeling of a four-body event together with both sets of angular variables.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FourBodyPoint<T> {
    /// The (possibly relabeled) event
    pub event: FourBodyEvent<T>,
    /// Angles of the $`P \to R_1 R_2`$ topology
    pub helicity: HelicityAngles<T>,
    /// Variables of the $`P \to R_1 d`$, $`R_1 \to R_2 c`$ topology
    pub sequential: SequentialAngles<T>,
}

impl<T: Real> FourBodyPoint<T> {
    pub fn new(event: FourBodyEvent<T>, masses: [T; 5]) -> Self {
        Self {
            event,
            helicity: helicity_angles(&event, masses),
            sequential: sequential_angular_variables(&event, masses),
        }
    }
}

/// The angular variables of an event under all four relabelings of two identical pairs.
///
/// Events outside the physical region (as judged by
/// [`phase_space_valid_5`](dalitz_core::phase_space_valid_5)) carry no points at all, so every
/// amplitude evaluated on them vanishes.
#[derive(Clone, Debug, PartialEq)]
pub struct FourBodyKinematics<T> {
    points: Option<[FourBodyPoint<T>; 4]>,
}

impl<T: Real> FourBodyKinematics<T> {
    pub fn new(decay: &FourBodyDecay, event: &FourBodyEvent<T>) -> Self {
        if !decay.is_valid(event) {
            return Self { points: None };
        }
        let masses = decay.masses::<T>();
        Self {
            points: Some(
                event
                    .permutations()
                    .map(|permuted| FourBodyPoint::new(permuted, masses)),
            ),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.points.is_some()
    }

    /// The event as given, if it is physical.
    pub fn identity(&self) -> Option<&FourBodyPoint<T>> {
        self.points.as_ref().map(|points| &points[0])
    }

    /// Every relabeling, starting with the identity, or nothing if the event is unphysical.
    pub fn points(&self) -> &[FourBodyPoint<T>] {
        match &self.points {
            Some(points) => points.as_slice(),
            None => &[],
        }
    }
}
