use num::Complex;
use serde::{Deserialize, Serialize};

use crate::{
    particles::{KAON, PION},
    DalitzError, DalitzResult, Real,
};

/// The squared breakup momentum of a state with squared mass $`m^2`$ decaying into two
/// particles with masses $`m_a`$ and $`m_b`$.
///
/// ```math
/// q^2(m^2) = \frac{(m^2 - (m_a + m_b)^2)(m^2 - (m_a - m_b)^2)}{4m^2}
/// ```
/// which reduces to $`m^2/4 - m_a^2`$ for equal daughter masses. The result is negative below
/// threshold.
pub fn breakup_momentum_squared<T: Real>(m2: T, m_a: T, m_b: T) -> T {
    let four = T::lit(4.0);
    if m_a == m_b {
        return m2 / four - m_a * m_a;
    }
    let sum = m_a + m_b;
    let diff = m_a - m_b;
    (m2 - sum * sum) * (m2 - diff * diff) / m2 / four
}

/// The breakup momentum continued into the complex plane: real above threshold and purely
/// imaginary below it.
pub fn complex_breakup_momentum<T: Real>(m2: T, m_a: T, m_b: T) -> Complex<T> {
    let q2 = breakup_momentum_squared(m2, m_a, m_b);
    if q2 >= T::zero() {
        Complex::new(q2.sqrt(), T::zero())
    } else {
        Complex::new(T::zero(), (-q2).sqrt())
    }
}

/// The ratio of squared breakup momenta $`q^2(m^2_N) / q^2(m^2_D)`$ for the same pair of
/// daughters.
pub fn breakup_momentum_ratio<T: Real>(m2_num: T, m2_den: T, m_a: T, m_b: T) -> T {
    breakup_momentum_squared(m2_num, m_a, m_b) / breakup_momentum_squared(m2_den, m_a, m_b)
}

/// The Blatt-Weisskopf centrifugal barrier factor for a state of spin $`J`$ and squared
/// interaction radius $`r^2`$.
///
/// With $`z = q^2(m^2) r^2`$,
/// ```math
/// B_1 = \sqrt{\frac{1}{1 + z}}\qquad B_2 = \sqrt{\frac{1}{9 + 3z + z^2}}
/// ```
/// and $`B_J = 1`$ for $`J = 0`$ as well as for every $`J > 2`$.
pub fn blatt_weisskopf<T: Real>(j: u32, r2: T, m2: T, m_a: T, m_b: T) -> T {
    if j == 0 || j > 2 {
        return T::one();
    }
    let z = breakup_momentum_squared(m2, m_a, m_b) * r2;
    if j == 1 {
        (T::one() / (T::one() + z)).sqrt()
    } else {
        (T::one() / (T::lit(9.0) + T::lit(3.0) * z + z * z)).sqrt()
    }
}

/// The mass-dependent width of a relativistic Breit-Wigner of nominal mass $`M`$, nominal
/// width $`\Gamma_0`$, spin $`J`$ and radius $`r`$:
///
/// ```math
/// \Gamma(m^2) = \Gamma_0 \frac{M}{\sqrt{m^2}}
///     \left(\frac{q^2(m^2)}{q^2(M^2)}\right)^{J + \frac{1}{2}}
///     \frac{B_J^2(m^2)}{B_J^2(M^2)}
/// ```
pub fn relativistic_breit_wigner_width<T: Real>(
    mass: T,
    width: T,
    j: u32,
    radius: T,
    m2: T,
    m_a: T,
    m_b: T,
) -> T {
    let mass2 = mass * mass;
    let r2 = radius * radius;
    let exponent = T::lit(j as f64 + 0.5);
    let barrier_ratio =
        blatt_weisskopf(j, r2, m2, m_a, m_b) / blatt_weisskopf(j, r2, mass2, m_a, m_b);
    width * mass / m2.sqrt()
        * breakup_momentum_ratio(m2, mass2, m_a, m_b).powf(exponent)
        * barrier_ratio
        * barrier_ratio
}

/// The Breit-Wigner propagator
/// ```math
/// \frac{1}{M^2 - m^2 - i M \Gamma}
/// ```
pub fn breit_wigner_propagator<T: Real>(mass: T, m2: T, width: T) -> Complex<T> {
    Complex::new(mass * mass - m2, -mass * width).inv()
}

/// A decay channel contributing to the width of a [`flatte_propagator`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatteChannel<T> {
    /// The coupling $`g`$ of the resonance to this channel
    pub coupling: T,
    /// Mass of the first channel particle
    pub mass_a: T,
    /// Mass of the second channel particle
    pub mass_b: T,
}

impl<T: Real> FlatteChannel<T> {
    /// Create a new channel from a coupling and the two particle masses.
    pub fn new(coupling: T, mass_a: T, mass_b: T) -> Self {
        Self {
            coupling,
            mass_a,
            mass_b,
        }
    }

    /// The $`\pi^+\pi^-`$ channel with the given coupling.
    pub fn pion_pair(coupling: T) -> Self {
        let m = T::lit(PION.mass);
        Self::new(coupling, m, m)
    }

    /// The $`K^+K^-`$ channel with the given coupling.
    pub fn kaon_pair(coupling: T) -> Self {
        let m = T::lit(KAON.mass);
        Self::new(coupling, m, m)
    }

    /// The term $`g^2 q(m^2)`$ this channel contributes to the width.
    pub fn width_term(&self, m2: T) -> Complex<T> {
        complex_breakup_momentum(m2, self.mass_a, self.mass_b) * (self.coupling * self.coupling)
    }
}

impl FlatteChannel<f64> {
    /// Convert a configured channel into the evaluation scalar.
    pub fn lift<T: Real>(&self) -> FlatteChannel<T> {
        FlatteChannel::new(T::lit(self.coupling), T::lit(self.mass_a), T::lit(self.mass_b))
    }
}

/// The Flatté propagator for an arbitrary set of channels:
/// ```math
/// \frac{1}{M^2 - m^2 - \frac{2i}{\sqrt{m^2}} \sum_k g_k^2 q_k(m^2)}
/// ```
/// where $`q_k`$ is the [`complex_breakup_momentum`] of channel $`k`$, so closed channels
/// contribute to the real part of the denominator.
pub fn flatte_propagator_with_channels<T: Real, I>(mass: T, m2: T, channels: I) -> Complex<T>
where
    I: IntoIterator<Item = FlatteChannel<T>>,
{
    let total = channels
        .into_iter()
        .fold(Complex::new(T::zero(), T::zero()), |acc, channel| {
            acc + channel.width_term(m2)
        });
    let scale = T::lit(2.0) / m2.sqrt();
    let denominator =
        Complex::new(mass * mass - m2, T::zero()) - Complex::<T>::i() * total * scale;
    denominator.inv()
}

/// The Flatté propagator with the usual $`\pi\pi`$ and $`K\bar{K}`$ channels and couplings
/// $`g_{\pi\pi}`$ and $`g_{KK}`$.
///
/// See [`flatte_propagator_with_channels`] for other channel choices.
pub fn flatte_propagator<T: Real>(mass: T, m2: T, g_pp: T, g_kk: T) -> Complex<T> {
    flatte_propagator_with_channels(
        mass,
        m2,
        [
            FlatteChannel::pion_pair(g_pp),
            FlatteChannel::kaon_pair(g_kk),
        ],
    )
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ZemachTerm {
    S0S0L0,
    S0P1L1,
    P1S1L0,
    P1P1L1,
    P1D1L2,
    P1P2L1,
    D2P1L1,
    D2D1L2,
    D2P2L1,
    D2S2L0,
}

/// An angular factor from the four-body Zemach table, indexed by the spin of the decaying
/// state, the spin of the intermediate state and their relative orbital angular momentum.
///
/// Only the combinations listed in the table can be constructed, so evaluation never fails.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32, u32)", into = "(u32, u32, u32)")]
pub struct ZemachFactor {
    term: ZemachTerm,
}

impl ZemachFactor {
    /// Look up the Zemach factor for parent spin `parent`, child spin `child`, and orbital
    /// angular momentum `orbital`.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::UnsupportedZemach`] if the combination is not in the table.
    pub fn new(parent: u32, child: u32, orbital: u32) -> DalitzResult<Self> {
        let term = match (parent, child, orbital) {
            (0, 0, 0) => ZemachTerm::S0S0L0,
            (0, 1, 1) => ZemachTerm::S0P1L1,
            (1, 1, 0) => ZemachTerm::P1S1L0,
            (1, 1, 1) => ZemachTerm::P1P1L1,
            (1, 1, 2) => ZemachTerm::P1D1L2,
            (1, 2, 1) => ZemachTerm::P1P2L1,
            (2, 1, 1) => ZemachTerm::D2P1L1,
            (2, 1, 2) => ZemachTerm::D2D1L2,
            (2, 2, 1) => ZemachTerm::D2P2L1,
            (2, 2, 0) => ZemachTerm::D2S2L0,
            _ => {
                return Err(DalitzError::UnsupportedZemach {
                    parent,
                    child,
                    orbital,
                })
            }
        };
        Ok(Self { term })
    }

    /// The `(parent, child, orbital)` quantum numbers of this factor.
    pub fn quantum_numbers(&self) -> (u32, u32, u32) {
        match self.term {
            ZemachTerm::S0S0L0 => (0, 0, 0),
            ZemachTerm::S0P1L1 => (0, 1, 1),
            ZemachTerm::P1S1L0 => (1, 1, 0),
            ZemachTerm::P1P1L1 => (1, 1, 1),
            ZemachTerm::P1D1L2 => (1, 1, 2),
            ZemachTerm::P1P2L1 => (1, 2, 1),
            ZemachTerm::D2P1L1 => (2, 1, 1),
            ZemachTerm::D2D1L2 => (2, 1, 2),
            ZemachTerm::D2P2L1 => (2, 2, 1),
            ZemachTerm::D2S2L0 => (2, 2, 0),
        }
    }

    /// Evaluate the factor at the transformed momentum $`z^2`$ and squared decay angle
    /// $`\cos^2\theta`$.
    pub fn value<T: Real>(&self, z2: T, cos2: T) -> T {
        let one = T::one();
        let third = T::lit(1.0 / 3.0);
        let three = T::lit(3.0);
        let four = T::lit(4.0);
        let nine = T::lit(9.0);
        let shifted = cos2 - third;
        match self.term {
            ZemachTerm::S0S0L0 => one,
            ZemachTerm::S0P1L1 => (one + z2) * cos2,
            ZemachTerm::P1S1L0 => one + z2 * cos2,
            ZemachTerm::P1P1L1 => one - cos2,
            ZemachTerm::P1D1L2 => one + (three + four * z2) * cos2,
            ZemachTerm::P1P2L1 => {
                (one + z2) * (one + three * cos2 + nine * z2 * shifted * shifted)
            }
            ZemachTerm::D2P1L1 => three + (one + four * z2) * cos2,
            ZemachTerm::D2D1L2 => one - cos2,
            ZemachTerm::D2P2L1 => {
                one + z2 / nine + (z2 / three - one) * cos2 - z2 * shifted * shifted
            }
            ZemachTerm::D2S2L0 => {
                one + z2 / three + z2 * cos2 + z2 * z2 * shifted * shifted
            }
        }
    }
}

impl TryFrom<(u32, u32, u32)> for ZemachFactor {
    type Error = DalitzError;

    fn try_from(value: (u32, u32, u32)) -> Result<Self, Self::Error> {
        ZemachFactor::new(value.0, value.1, value.2)
    }
}

impl From<ZemachFactor> for (u32, u32, u32) {
    fn from(value: ZemachFactor) -> Self {
        value.quantum_numbers()
    }
}

/// Evaluate the four-body Zemach factor for parent spin $`J`$, child spin $`j`$ and orbital
/// angular momentum $`l`$ in one step.
///
/// # Errors
///
/// Returns [`DalitzError::UnsupportedZemach`] if the combination is not in the table.
pub fn zemach<T: Real>(parent: u32, child: u32, orbital: u32, z2: T, cos2: T) -> DalitzResult<T> {
    Ok(ZemachFactor::new(parent, child, orbital)?.value(z2, cos2))
}

/// The spin of a three-body resonance for which a Zemach factor in Dalitz variables exists.
///
/// Deserialization goes through [`DalitzSpin::new`], so an unsupported spin can never reach
/// [`DalitzSpin::value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DalitzSpin {
    /// $`J = 0`$
    Scalar,
    /// $`J = 1`$
    Vector,
    /// $`J = 2`$
    Tensor,
}

impl DalitzSpin {
    /// Look up the Dalitz-variable spin factor for resonance spin `j`.
    ///
    /// # Errors
    ///
    /// Returns [`DalitzError::UnsupportedZemach`] for $`J > 2`$.
    pub fn new(j: u32) -> DalitzResult<Self> {
        match j {
            0 => Ok(Self::Scalar),
            1 => Ok(Self::Vector),
            2 => Ok(Self::Tensor),
            _ => Err(DalitzError::UnsupportedZemach {
                parent: 0,
                child: j,
                orbital: j,
            }),
        }
    }

    pub fn spin(&self) -> u32 {
        match self {
            Self::Scalar => 0,
            Self::Vector => 1,
            Self::Tensor => 2,
        }
    }

    /// The Zemach spin factor of a three-body decay $`P \to R c`$, $`R \to ab`$ in Dalitz
    /// variables:
    ///
    /// ```math
    /// Z_1 = M^2 + m_a^2 + m_b^2 + m_c^2 - m^2_{ab} - 2m^2_{bc}
    ///     - \frac{(M^2 - m_c^2)(m_a^2 - m_b^2)}{m^2_{ab}}
    /// ```
    /// ```math
    /// Z_2 = Z_1^2 - \frac{1}{3}
    ///     \left(m^2_{ab} - 2M^2 - 2m_c^2 + \frac{(M^2 - m_c^2)^2}{m^2_{ab}}\right)
    ///     \left(m^2_{ab} - 2m_a^2 - 2m_b^2 + \frac{(m_a^2 - m_b^2)^2}{m^2_{ab}}\right)
    /// ```
    /// where $`M^2`$ is `m2_parent`, and $`Z_0 = 1`$.
    pub fn value<T: Real>(&self, m2_ab: T, m2_bc: T, m2_parent: T, m_a: T, m_b: T, m_c: T) -> T {
        let (a2, b2, c2) = (m_a * m_a, m_b * m_b, m_c * m_c);
        let two = T::lit(2.0);
        let z1 = || {
            m2_parent + a2 + b2 + c2 - m2_ab - two * m2_bc - (m2_parent - c2) * (a2 - b2) / m2_ab
        };
        match self {
            Self::Scalar => T::one(),
            Self::Vector => z1(),
            Self::Tensor => {
                let z = z1();
                let parent_term = m2_ab - two * m2_parent - two * c2
                    + (m2_parent - c2) * (m2_parent - c2) / m2_ab;
                let pair_term = m2_ab - two * a2 - two * b2 + (a2 - b2) * (a2 - b2) / m2_ab;
                z * z - parent_term * pair_term / T::lit(3.0)
            }
        }
    }
}

impl TryFrom<u32> for DalitzSpin {
    type Error = DalitzError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        DalitzSpin::new(value)
    }
}

impl From<DalitzSpin> for u32 {
    fn from(value: DalitzSpin) -> Self {
        value.spin()
    }
}

/// Evaluate the three-body Zemach factor of [`DalitzSpin::value`] for resonance spin $`J`$ in
/// one step.
///
/// # Errors
///
/// Returns [`DalitzError::UnsupportedZemach`] for $`J > 2`$.
pub fn zemach_dalitz<T: Real>(
    j: u32,
    m2_ab: T,
    m2_bc: T,
    m2_parent: T,
    m_a: T,
    m_b: T,
    m_c: T,
) -> DalitzResult<T> {
    Ok(DalitzSpin::new(j)?.value(m2_ab, m2_bc, m2_parent, m_a, m_b, m_c))
}

/// Determines whether $`(m^2_{ab}, m^2_{bc})`$ lies inside the Dalitz plot of
/// $`P \to abc`$.
///
/// First $`m^2_{ab}`$ is checked against $`[(m_a + m_b)^2, (M - m_c)^2]`$, then
/// $`m^2_{bc}`$ against the kinematic ellipse
/// ```math
/// |m^2_{bc} - m_b^2 - m_c^2 - 2E_bE_c| \le 2|\vec{p}_b||\vec{p}_c|
/// ```
/// with energies and momenta of $`b`$ and $`c`$ evaluated in the $`ab`$ rest frame.
pub fn phase_space_valid_3<T: Real>(m2_ab: T, m2_bc: T, parent: T, m_a: T, m_b: T, m_c: T) -> bool {
    let two = T::lit(2.0);
    let (p2, a2, b2, c2) = (parent * parent, m_a * m_a, m_b * m_b, m_c * m_c);
    if m2_ab < a2 + b2 + two * (a2 * b2).sqrt() || m2_ab > p2 + c2 - two * (p2 * c2).sqrt() {
        return false;
    }
    let m_ab = m2_ab.sqrt();
    let e_b = (m2_ab - a2 + b2) / two / m_ab;
    let e_c = (p2 - m2_ab - c2) / two / m_ab;
    let p_b = (e_b * e_b - b2).sqrt();
    let p_c = (e_c * e_c - c2).sqrt();
    (m2_bc - b2 - c2 - two * e_b * e_c).abs() <= two * p_b * p_c
}

/// The sixth invariant $`m^2_{24}`$ of a four-body decay, fixed by
/// ```math
/// \sum_{i<j} m^2_{ij} = M^2 + 2\sum_i m_i^2
/// ```
/// `invariants` holds $`(m^2_{12}, m^2_{14}, m^2_{23}, m^2_{34}, m^2_{13})`$ and `masses` holds
/// $`(M, m_a, m_b, m_c, m_d)`$.
pub fn fourth_pair_invariant<T: Real>(invariants: [T; 5], masses: [T; 5]) -> T {
    let [parent, a, b, c, d] = masses;
    let sum = invariants.iter().fold(T::zero(), |acc, &m2| acc + m2);
    parent * parent + T::lit(2.0) * (a * a + b * b + c * c + d * d) - sum
}

/// Determines whether the invariants $`(m^2_{12}, m^2_{14}, m^2_{23}, m^2_{34}, m^2_{13})`$
/// describe a physical configuration of $`P \to abcd`$ (with `masses` ordered
/// $`(M, m_a, m_b, m_c, m_d)`$).
///
/// The point is first tested against the bounding hypercube and the requirement that each pair
/// of complementary invariant masses fits inside $`M`$. The exact boundary is then given by the
/// sign of the Gram-type discriminant $`B`$, with the point inside iff $`B < 0`$.
pub fn phase_space_valid_5<T: Real>(invariants: [T; 5], masses: [T; 5]) -> bool {
    let [m2_12, m2_14, m2_23, m2_34, m2_13] = invariants;
    let [parent, a, b, c, d] = masses;
    let sq = |x: T| x * x;

    if m2_12 < sq(a + b)
        || m2_14 < sq(a + d)
        || m2_23 < sq(b + c)
        || m2_34 < sq(c + d)
        || m2_13 < sq(a + c)
    {
        return false;
    }
    if m2_12 > sq(parent - c - d)
        || m2_14 > sq(parent - b - c)
        || m2_23 > sq(parent - a - d)
        || m2_34 > sq(parent - a - b)
        || m2_13 > sq(parent - b - d)
    {
        return false;
    }

    let m2_24 = fourth_pair_invariant(invariants, masses);
    if m2_12.sqrt() + m2_34.sqrt() > parent
        || m2_14.sqrt() + m2_23.sqrt() > parent
        || m2_13.sqrt() + m2_24.sqrt() > parent
    {
        return false;
    }

    let two = T::lit(2.0);
    // bp is m²_124 and bq is m²_134
    let bm = m2_12;
    let bn = m2_34;
    let bp = m2_12 + m2_14 + m2_24 - sq(a) - sq(b) - sq(d);
    let bq = m2_13 + m2_14 + m2_34 - sq(a) - sq(c) - sq(d);
    let br = m2_14;
    let (m, n, p, q, r) = (sq(c), sq(b), sq(a), sq(d), sq(parent));
    let (mm, nn, pp, qq, rr) = (sq(bm), sq(bn), sq(bp), sq(bq), sq(br));
    let (m_2, n_2, p_2, q_2, r_2) = (sq(m), sq(n), sq(p), sq(q), sq(r));

    let quartic = (mm * qq + nn * pp + mm * rr + nn * rr + pp * qq)
        - two * (mm * bq * br + nn * bp * br + bm * bn * rr + bm * bp * qq + bn * pp * bq)
        + two
            * (bm * bn * bp * bq
                + bm * bn * bp * br
                + bm * bn * bq * br
                + bm * bp * bq * br
                + bn * bp * bq * br);
    let cubic = -two
        * (mm * bq * m
            + nn * bp * n
            + mm * br * m
            + nn * br * n
            + bm * qq * q
            + bn * pp * p
            + bm * rr * r
            + bn * rr * r
            + pp * bq * p
            + bp * qq * q)
        - two
            * (bm * bn * bp * m
                + bm * bn * bq * n
                + bm * bp * br * p
                + bn * bq * br * q
                + bp * bq * br * r)
        + two
            * (bm * bn * br * (m + n - two * r)
                + bm * bp * bq * (m + p - two * q)
                + bn * bq * bp * (n + q - two * p)
                + bq * br * bm * (q + r - two * m)
                + bp * br * bn * (p + r - two * n));
    let quadratic = (mm * m_2 + nn * n_2 + pp * p_2 + qq * q_2 + rr * r_2)
        + two * (bm * bn * m * n + bm * bp * m * p + bn * bq * n * q + bp * br * p * r + bq * br * q * r)
        + two
            * (bm * bq * (m * q + m * n + q * n + m * p + q * r - p * r)
                + bn * bp * (n * p + n * m + p * m + p * r + n * q - q * r)
                + bm * br * (m * r + m * p + r * p + m * n + r * q - n * q)
                + bn * br * (n * r + n * q + r * q + n * m + r * p - m * p)
                + bp * bq * (p * q + p * r + q * r + p * m + q * n - m * n));
    let linear = -two
        * (bm * m * (m * p + m * n + q * r - p * r - n * q + two * n * p)
            + bn * n * (n * m + n * q + p * r - p * m - q * r + two * m * q)
            + bp * p * (p * m + p * r + n * q - m * n - q * r + two * m * r)
            + bq * q * (q * n + q * r + m * p - m * n - p * r + two * n * r)
            + br * r * (r * p + r * q + m * n - m * p - n * q + two * p * q));
    let constant = (m_2 * n_2 + m_2 * p_2 + n_2 * q_2 + p_2 * r_2 + q_2 * r_2)
        - two * (m_2 * n * p + m * n_2 * q + m * p_2 * r + n * q_2 * r + p * q * r_2)
        + two * (m * n * p * q + m * n * p * r + m * n * q * r + m * p * q * r + n * p * q * r);

    quartic + cubic + quadratic + linear + constant < T::zero()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::particles::{D0, D_PLUS, F0_980, RHO_770};

    const PI: f64 = 0.13957018;

    #[test]
    fn test_breakup_momentum() {
        assert_relative_eq!(breakup_momentum_squared(1.0, 0.25, 0.25), 0.1875);
        // unequal masses reduce to the same expression when m_b -> m_a
        let unequal = breakup_momentum_squared(1.0, 0.25, 0.25 + 1e-9);
        assert_relative_eq!(unequal, 0.1875, epsilon = 1e-7);
        let below = breakup_momentum_squared(0.04, PI, PI);
        assert!(below < 0.0);
        let q = complex_breakup_momentum(0.04, PI, PI);
        assert_relative_eq!(q.re, 0.0);
        assert_relative_eq!(q.im, (-below).sqrt());
        let q = complex_breakup_momentum(1.0, PI, PI);
        assert_relative_eq!(q.re, (0.25 - PI * PI).sqrt());
        assert_relative_eq!(q.im, 0.0);
        assert_relative_eq!(breakup_momentum_ratio(1.0, 1.0, PI, 0.5), 1.0);
    }

    #[test]
    fn test_blatt_weisskopf() {
        for m2 in [0.3, 0.6, 1.2, 2.5] {
            assert_eq!(blatt_weisskopf(0, 25.0, m2, PI, PI), 1.0);
            assert_eq!(blatt_weisskopf(3, 25.0, m2, PI, PI), 1.0);
        }
        let z = breakup_momentum_squared(0.6, PI, PI) * 25.0;
        assert_relative_eq!(
            blatt_weisskopf(1, 25.0, 0.6, PI, PI),
            (1.0 / (1.0 + z)).sqrt()
        );
        assert_relative_eq!(
            blatt_weisskopf(2, 25.0, 0.6, PI, PI),
            (1.0 / (9.0 + 3.0 * z + z * z)).sqrt()
        );
    }

    #[test]
    fn test_width_at_nominal_mass() {
        let m = RHO_770.mass;
        let width = relativistic_breit_wigner_width(m, 0.1491, 1, RHO_770.radius, m * m, PI, PI);
        assert_relative_eq!(width, 0.1491, epsilon = 1e-12);
    }

    #[test]
    fn test_breit_wigner_peak() {
        let (mass, width) = (RHO_770.mass, 0.1491);
        let peak = breit_wigner_propagator(mass, mass * mass, width).norm_sqr();
        assert_relative_eq!(peak, 1.0 / (mass * width).powi(2), max_relative = 1e-12);
        let mut last = peak;
        for step in 1..20 {
            let m2 = mass * mass + 0.02 * step as f64;
            let value = breit_wigner_propagator(mass, m2, width).norm_sqr();
            assert!(value < last);
            last = value;
        }
        let mut last = peak;
        for step in 1..20 {
            let m2 = mass * mass - 0.02 * step as f64;
            let value = breit_wigner_propagator(mass, m2, width).norm_sqr();
            assert!(value < last);
            last = value;
        }
    }

    #[test]
    fn test_flatte() {
        let mass = F0_980.mass;
        let (g_pp, g_kk) = (0.329, 2.0 * 0.329);
        let m2 = 1.1f64;
        let value = flatte_propagator(mass, m2, g_pp, g_kk);
        let rho_pp = (m2 / 4.0 - PI * PI).sqrt();
        let rho_kk = (m2 / 4.0 - KAON.mass * KAON.mass).sqrt();
        let im = 2.0 / m2.sqrt() * (g_pp * g_pp * rho_pp + g_kk * g_kk * rho_kk);
        let expected = Complex::new(mass * mass - m2, -im).inv();
        assert_relative_eq!(value.re, expected.re, max_relative = 1e-12);
        assert_relative_eq!(value.im, expected.im, max_relative = 1e-12);
        // below the KK threshold that channel only shifts the real part
        let m2 = 0.8f64;
        let value = flatte_propagator(mass, m2, g_pp, g_kk);
        let rho_pp = (m2 / 4.0 - PI * PI).sqrt();
        let kappa_kk = (KAON.mass * KAON.mass - m2 / 4.0).sqrt();
        let scale = 2.0 / m2.sqrt();
        let expected = Complex::new(
            mass * mass - m2 + scale * g_kk * g_kk * kappa_kk,
            -scale * g_pp * g_pp * rho_pp,
        )
        .inv();
        assert_relative_eq!(value.re, expected.re, max_relative = 1e-12);
        assert_relative_eq!(value.im, expected.im, max_relative = 1e-12);
        let only_pions =
            flatte_propagator_with_channels(mass, m2, [FlatteChannel::pion_pair(g_pp)]);
        assert!(only_pions != value);
    }

    #[test]
    fn test_zemach_table() {
        let (z2, cos2) = (0.3, 0.4);
        assert_eq!(zemach(0, 0, 0, z2, cos2).unwrap(), 1.0);
        assert_relative_eq!(zemach(1, 1, 1, z2, cos2).unwrap(), 0.6);
        assert_relative_eq!(zemach(1, 1, 0, z2, cos2).unwrap(), 1.12);
        assert_relative_eq!(zemach(1, 1, 2, z2, cos2).unwrap(), 1.0 + (3.0 + 1.2) * 0.4);
        assert_relative_eq!(
            zemach(2, 2, 0, z2, cos2).unwrap(),
            1.0 + 0.1 + 0.12 + 0.09 * (0.4f64 - 1.0 / 3.0).powi(2)
        );
        assert!(matches!(
            zemach(1, 0, 1, z2, cos2),
            Err(DalitzError::UnsupportedZemach {
                parent: 1,
                child: 0,
                orbital: 1
            })
        ));
        assert!(zemach(3, 1, 2, z2, cos2).is_err());
        let factor = ZemachFactor::new(2, 1, 2).unwrap();
        assert_eq!(factor.quantum_numbers(), (2, 1, 2));
        assert_eq!(ZemachFactor::try_from((2, 1, 2)).unwrap(), factor);
    }

    #[test]
    fn test_zemach_dalitz() {
        let (m2_parent, m_c) = (D_PLUS.mass2(), PI);
        assert_eq!(zemach_dalitz(0, 0.6, 1.2, m2_parent, PI, PI, m_c).unwrap(), 1.0);
        // equal daughter masses drop the asymmetry term
        let z1 = zemach_dalitz(1, 0.6, 1.2, m2_parent, PI, PI, m_c).unwrap();
        assert_relative_eq!(z1, m2_parent + 3.0 * PI * PI - 0.6 - 2.4);
        let z2 = zemach_dalitz(2, 0.6, 1.2, m2_parent, PI, PI, m_c).unwrap();
        let parent_term = 0.6 - 2.0 * m2_parent - 2.0 * PI * PI
            + (m2_parent - PI * PI).powi(2) / 0.6;
        let pair_term = 0.6 - 4.0 * PI * PI;
        assert_relative_eq!(z2, z1 * z1 - parent_term * pair_term / 3.0);
        assert!(zemach_dalitz(3, 0.6, 1.2, m2_parent, PI, PI, m_c).is_err());
    }

    #[test]
    fn test_dalitz_spin_rejects_unsupported_on_decode() {
        let config = bincode::config::standard();
        let bytes = bincode::serde::encode_to_vec(DalitzSpin::Tensor, config).unwrap();
        let (spin, _): (DalitzSpin, usize) =
            bincode::serde::decode_from_slice(&bytes, config).unwrap();
        assert_eq!(spin, DalitzSpin::Tensor);
        assert_eq!(DalitzSpin::try_from(1).unwrap().spin(), 1);
        let bytes = bincode::serde::encode_to_vec(3u32, config).unwrap();
        let decoded: Result<(DalitzSpin, usize), _> =
            bincode::serde::decode_from_slice(&bytes, config);
        assert!(decoded.is_err());
    }

    #[test]
    fn test_valid_3() {
        let parent = D_PLUS.mass;
        assert!(phase_space_valid_3(1.0, 1.0, parent, PI, PI, PI));
        assert!(!phase_space_valid_3(0.05, 1.0, parent, PI, PI, PI));
        assert!(!phase_space_valid_3(3.5, 0.1, parent, PI, PI, PI));
        assert!(!phase_space_valid_3(1.0, 3.0, parent, PI, PI, PI));
    }

    #[test]
    fn test_valid_3_relabeling_symmetry() {
        let (parent, a, b, c) = (D_PLUS.mass, PI, KAON.mass, 0.3);
        let mut inside = 0;
        for i in 0..40 {
            for j in 0..40 {
                let m2_ab = 0.1 + 0.08 * i as f64;
                let m2_bc = 0.1 + 0.08 * j as f64;
                let forward = phase_space_valid_3(m2_ab, m2_bc, parent, a, b, c);
                let reversed = phase_space_valid_3(m2_bc, m2_ab, parent, c, b, a);
                assert_eq!(forward, reversed, "({m2_ab}, {m2_bc})");
                inside += forward as usize;
            }
        }
        assert!(inside > 0);
    }

    #[test]
    fn test_valid_5() {
        let masses = [D0.mass, PI, PI, PI, PI];
        // pions at rest would sit on the boundary, so start from a symmetric point well inside
        let s = 0.5;
        let invariants = [s, s, s, s, s];
        let m2_24 = fourth_pair_invariant(invariants, masses);
        assert_relative_eq!(m2_24, D0.mass2() + 8.0 * PI * PI - 2.5);
        assert!(phase_space_valid_5(invariants, masses));
        assert!(!phase_space_valid_5([0.01, s, s, s, s], masses));
        assert!(!phase_space_valid_5([s, s, s, 3.4, s], masses));
        assert!(!phase_space_valid_5([1.5, s, s, 1.5, s], masses));
    }
}
