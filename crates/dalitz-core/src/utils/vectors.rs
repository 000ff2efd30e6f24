use nalgebra::{DMatrix, DVector};
use num::{Complex, Zero};

use crate::{DalitzError, DalitzResult, Real};

/// A column of complex values, one entry per resonance.
pub type ComplexVector<T> = DVector<Complex<T>>;
/// A square complex matrix, typically an interference (normalization) integral.
pub type ComplexMatrix<T> = DMatrix<Complex<T>>;

fn check_len(context: &str, expected: usize, found: usize) -> DalitzResult<()> {
    if expected != found {
        return Err(DalitzError::DimensionMismatch {
            context: context.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

/// The squared magnitude $`|z|^2`$.
pub fn abs2<T: Real>(z: Complex<T>) -> T {
    z.re * z.re + z.im * z.im
}

/// The sum of all entries of a complex vector.
pub fn sum<T: Real>(v: &ComplexVector<T>) -> Complex<T> {
    v.iter().fold(Complex::zero(), |acc, z| acc + z)
}

/// Element-wise complex product of two vectors of equal length.
pub fn mult<T: Real>(a: &ComplexVector<T>, b: &ComplexVector<T>) -> DalitzResult<ComplexVector<T>> {
    check_len("element-wise product", a.len(), b.len())?;
    Ok(ComplexVector::from_iterator(
        a.len(),
        a.iter().zip(b.iter()).map(|(x, y)| x * y),
    ))
}

/// The conjugate transpose $`M^\dagger`$ of a complex matrix.
pub fn conjugate_transpose<T: Real>(m: &ComplexMatrix<T>) -> ComplexMatrix<T> {
    ComplexMatrix::from_fn(m.ncols(), m.nrows(), |i, j| m[(j, i)].conj())
}

/// The real dot product $`\sum_i a_i b_i`$.
pub fn real_dot<T: Real>(a: &[T], b: &[T]) -> DalitzResult<T> {
    check_len("real dot product", a.len(), b.len())?;
    Ok(a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y))
}

/// Split a complex vector into its real and imaginary parts.
pub fn split<T: Real>(v: &ComplexVector<T>) -> (Vec<T>, Vec<T>) {
    v.iter().map(|z| (z.re, z.im)).unzip()
}

/// Flatten a complex vector into `[Re₀, Im₀, Re₁, Im₁, ...]`.
pub fn interleave<T: Real>(v: &ComplexVector<T>) -> Vec<T> {
    v.iter().flat_map(|z| [z.re, z.im]).collect()
}

/// Assemble a complex vector from parallel real and imaginary sequences.
pub fn from_parts<T: Real>(re: &[T], im: &[T]) -> DalitzResult<ComplexVector<T>> {
    check_len("complex vector assembly", re.len(), im.len())?;
    Ok(ComplexVector::from_iterator(
        re.len(),
        re.iter().zip(im).map(|(&r, &i)| Complex::new(r, i)),
    ))
}

/// Assemble a complex vector from an interleaved `[Re₀, Im₀, Re₁, Im₁, ...]` sequence.
pub fn from_interleaved<T: Real>(values: &[T]) -> DalitzResult<ComplexVector<T>> {
    if values.len() % 2 != 0 {
        return Err(DalitzError::DimensionMismatch {
            context: "interleaved complex vector".to_string(),
            expected: values.len() + 1,
            found: values.len(),
        });
    }
    Ok(ComplexVector::from_iterator(
        values.len() / 2,
        values.chunks_exact(2).map(|c| Complex::new(c[0], c[1])),
    ))
}

/// Extension methods for complex vectors of amplitudes.
pub trait AmplitudeVector<T: Real> {
    /// The coherent sum $`\sum_i A_i \theta_i`$.
    fn coherent_sum(&self, coefficients: &ComplexVector<T>) -> DalitzResult<Complex<T>>;
    /// The squared magnitude of every entry.
    fn abs2(&self) -> Vec<T>;
}

impl<T: Real> AmplitudeVector<T> for ComplexVector<T> {
    fn coherent_sum(&self, coefficients: &ComplexVector<T>) -> DalitzResult<Complex<T>> {
        Ok(sum(&mult(self, coefficients)?))
    }

    fn abs2(&self) -> Vec<T> {
        self.iter().map(|z| abs2(*z)).collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_interleave_and_split() {
        let v = ComplexVector::from_vec(vec![Complex::new(1.0, 2.0), Complex::new(-3.0, 0.5)]);
        assert_eq!(interleave(&v), vec![1.0, 2.0, -3.0, 0.5]);
        let (re, im) = split(&v);
        assert_eq!(re, vec![1.0, -3.0]);
        assert_eq!(im, vec![2.0, 0.5]);
        assert_eq!(from_parts(&re, &im).unwrap(), v);
        assert_eq!(from_interleaved(&interleave(&v)).unwrap(), v);
    }

    #[test]
    fn test_dimension_checks() {
        let a = ComplexVector::from_vec(vec![Complex::new(1.0, 0.0)]);
        let b = ComplexVector::from_vec(vec![Complex::new(1.0, 0.0), Complex::new(0.0, 1.0)]);
        assert!(matches!(
            mult(&a, &b),
            Err(DalitzError::DimensionMismatch {
                expected: 1,
                found: 2,
                ..
            })
        ));
        assert!(real_dot(&[1.0, 2.0], &[1.0]).is_err());
        assert!(from_interleaved(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_products() {
        let a = ComplexVector::from_vec(vec![Complex::new(1.0, 1.0), Complex::new(0.0, 2.0)]);
        let b = ComplexVector::from_vec(vec![Complex::new(2.0, 0.0), Complex::new(0.0, 1.0)]);
        let s = a.coherent_sum(&b).unwrap();
        assert_relative_eq!(s.re, 0.0);
        assert_relative_eq!(s.im, 2.0);
        assert_eq!(a.abs2(), vec![2.0, 4.0]);
        assert_relative_eq!(real_dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap(), 32.0);
    }

    #[test]
    fn test_conjugate_transpose() {
        let m = ComplexMatrix::from_row_slice(
            2,
            2,
            &[
                Complex::new(1.0, 0.0),
                Complex::new(2.0, 1.0),
                Complex::new(3.0, -1.0),
                Complex::new(4.0, 0.0),
            ],
        );
        let h = conjugate_transpose(&m);
        assert_eq!(h[(0, 1)], Complex::new(3.0, 1.0));
        assert_eq!(h[(1, 0)], Complex::new(2.0, -1.0));
        assert_eq!(conjugate_transpose(&h), m);
    }
}
