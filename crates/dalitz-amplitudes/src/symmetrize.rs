use dalitz_core::Real;
use num::Complex;

/// Sum an amplitude over a fixed set of relabelings of the final state, without weights.
///
/// `relabelings` are the permuted events (or precomputed points) and `amplitude` evaluates a
/// single one of them. An empty set yields zero.
pub fn symmetrize<T, I, F>(relabelings: I, mut amplitude: F) -> Complex<T>
where
    T: Real,
    I: IntoIterator,
    F: FnMut(I::Item) -> Complex<T>,
{
    relabelings
        .into_iter()
        .fold(Complex::new(T::zero(), T::zero()), |acc, item| {
            acc + amplitude(item)
        })
}

#[cfg(test)]
mod tests {
    use dalitz_core::{FourBodyEvent, ThreeBodyEvent};

    use super::*;

    #[test]
    fn test_three_body_symmetrization() {
        let event = ThreeBodyEvent::new(0.5, 1.5);
        let value = symmetrize(event.permutations(), |e| Complex::new(e.m2_ab, 2.0 * e.m2_bc));
        assert_eq!(value, Complex::new(2.0, 4.0));
    }

    #[test]
    fn test_four_body_symmetrization() {
        let event = FourBodyEvent::new(1.0, 2.0, 3.0, 4.0, 5.0);
        let value = symmetrize(event.permutations(), |e| Complex::new(e.m2_12, e.m2_13));
        assert_eq!(value, Complex::new(10.0, 20.0));
        let empty: [FourBodyEvent<f64>; 0] = [];
        assert_eq!(symmetrize(empty, |e| Complex::new(e.m2_12, 0.0)), Complex::new(0.0, 0.0));
    }
}
