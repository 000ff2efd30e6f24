use dalitz_core::{
    utils::vectors::{abs2, real_dot, AmplitudeVector},
    ComplexMatrix, ComplexVector, DalitzError, DalitzResult, Real,
};
use num::Complex;

fn check_square<T: Real>(integral: &ComplexMatrix<T>, n: usize) -> DalitzResult<()> {
    for (context, found) in [
        ("normalization integral rows", integral.nrows()),
        ("normalization integral columns", integral.ncols()),
    ] {
        if found != n {
            return Err(DalitzError::DimensionMismatch {
                context: context.to_string(),
                expected: n,
                found,
            });
        }
    }
    Ok(())
}

/// The coherent intensity $`\left|\sum_i A_i \theta_i\right|^2`$.
///
/// # Errors
///
/// Returns [`DalitzError::DimensionMismatch`] if there is not one coefficient per amplitude.
pub fn fit_statistic<T: Real>(
    amplitudes: &ComplexVector<T>,
    coefficients: &ComplexVector<T>,
) -> DalitzResult<T> {
    Ok(abs2(amplitudes.coherent_sum(coefficients)?))
}

/// The coherent intensity plus incoherent background channels,
/// ```math
/// \left|\sum_i A_i \theta_i\right|^2 + \sum_k |B_k|^2 \theta^{\text{bkg}}_k
/// ```
/// where `background_abs2` holds $`|B_k|^2`$.
pub fn fit_statistic_with_background<T: Real>(
    amplitudes: &ComplexVector<T>,
    coefficients: &ComplexVector<T>,
    background_abs2: &[T],
    background_coefficients: &[T],
) -> DalitzResult<T> {
    Ok(fit_statistic(amplitudes, coefficients)?
        + real_dot(background_abs2, background_coefficients)?)
}

/// The full quadratic form $`\theta^\dagger I \theta`$.
///
/// For a Hermitian integral the imaginary part vanishes up to rounding, which makes it a useful
/// consistency check on an integral estimate. [`normalization`] keeps only the real part.
pub fn normalization_parts<T: Real>(
    coefficients: &ComplexVector<T>,
    integral: &ComplexMatrix<T>,
) -> DalitzResult<Complex<T>> {
    let n = coefficients.len();
    check_square(integral, n)?;
    let mut real = T::zero();
    let mut imag = T::zero();
    for i in 0..n {
        let tmp = (0..n).fold(Complex::new(T::zero(), T::zero()), |acc, j| {
            acc + integral[(i, j)] * coefficients[j]
        });
        let theta = coefficients[i];
        real = real + theta.re * tmp.re + theta.im * tmp.im;
        imag = imag + theta.re * tmp.im - theta.im * tmp.re;
    }
    Ok(Complex::new(real, imag))
}

/// The normalization $`\text{Re}(\theta^\dagger I \theta)`$ of the coherent intensity.
///
/// With $`I_{ij} = \int \bar{A}_i A_j`$ over phase space this is the integral of
/// [`fit_statistic`].
///
/// # Errors
///
/// Returns [`DalitzError::DimensionMismatch`] unless `integral` is square with one row per
/// coefficient.
pub fn normalization<T: Real>(
    coefficients: &ComplexVector<T>,
    integral: &ComplexMatrix<T>,
) -> DalitzResult<T> {
    normalization_parts(coefficients, integral).map(|z| z.re)
}

/// [`normalization`] plus the background term $`\sum_k \theta^{\text{bkg}}_k I^{\text{bkg}}_k`$.
pub fn normalization_with_background<T: Real>(
    coefficients: &ComplexVector<T>,
    integral: &ComplexMatrix<T>,
    background_coefficients: &[T],
    background_integral: &[T],
) -> DalitzResult<T> {
    Ok(normalization(coefficients, integral)?
        + real_dot(background_coefficients, background_integral)?)
}
