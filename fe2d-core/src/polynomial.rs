//! One-dimensional polynomials parametrized on [0, 1].
//!
//! Boundary values that vary along a line are given as p(t) with t = 0 at the
//! first node and t = 1 at the last. Refinement splits a line in two, so the
//! polynomial is re-expressed on each half:
//!
//! ```text
//! p₁(t) = p(t/2)          first half
//! p₂(t) = p((1 + t)/2)    second half
//! ```
//!
//! Both are computed with the Taylor expansion of p about the left end of
//! the sub-interval, q(t) = Σₖ p⁽ᵏ⁾(a)/k! (b t)ᵏ.

use std::fmt;

/// Polynomial p(t) = Σ cₖ tᵏ with coefficients in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Create from ascending coefficients [c₀, c₁, ...]. An empty slice is
    /// the zero polynomial.
    pub fn new(coeffs: impl Into<Vec<f64>>) -> Self {
        let mut coeffs = coeffs.into();
        if coeffs.is_empty() {
            coeffs.push(0.0);
        }
        Self { coeffs }
    }

    pub fn constant(c: f64) -> Self {
        Self { coeffs: vec![c] }
    }

    /// Linear polynomial through p(0) = `start` and p(1) = `end`.
    pub fn linear(start: f64, end: f64) -> Self {
        Self {
            coeffs: vec![start, end - start],
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Nominal degree (number of coefficients minus one).
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Evaluate by Horner's scheme.
    pub fn evaluate(&self, t: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }

    /// First derivative.
    pub fn derivative(&self) -> Self {
        if self.coeffs.len() == 1 {
            return Self::constant(0.0);
        }
        Self {
            coeffs: self
                .coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, &c)| k as f64 * c)
                .collect(),
        }
    }

    /// q(t) = p(a + b t).
    pub fn compose_affine(&self, a: f64, b: f64) -> Self {
        let mut coeffs = Vec::with_capacity(self.coeffs.len());
        let mut derivative = self.clone();
        let mut factorial = 1.0;
        let mut scale = 1.0;
        for k in 0..self.coeffs.len() {
            if k > 0 {
                derivative = derivative.derivative();
                factorial *= k as f64;
                scale *= b;
            }
            coeffs.push(derivative.evaluate(a) / factorial * scale);
        }
        Self { coeffs }
    }

    /// Split into the halves [0, ½] and [½, 1], each re-parametrized on [0, 1].
    pub fn split(&self) -> (Self, Self) {
        (self.compose_affine(0.0, 0.5), self.compose_affine(0.5, 0.5))
    }

    /// p(1 − t), the same values traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        self.compose_affine(1.0, -1.0)
    }

    /// ∫₀¹ p(t) dt.
    pub fn integral(&self) -> f64 {
        self.coeffs
            .iter()
            .enumerate()
            .map(|(k, c)| c / (k as f64 + 1.0))
            .sum()
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, c) in self.coeffs.iter().enumerate() {
            if k > 0 {
                write!(f, " + ")?;
            }
            match k {
                0 => write!(f, "{}", c)?,
                1 => write!(f, "{}·t", c)?,
                _ => write!(f, "{}·t^{}", c, k)?,
            }
        }
        Ok(())
    }
}

impl From<f64> for Polynomial {
    fn from(c: f64) -> Self {
        Self::constant(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_evaluate() {
        // 1 + 2t + 3t²
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert_relative_eq!(p.evaluate(0.0), 1.0);
        assert_relative_eq!(p.evaluate(2.0), 17.0);
        assert_eq!(p.degree(), 2);
    }

    #[test]
    fn test_derivative() {
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.derivative().coefficients(), &[2.0, 6.0]);
        assert_eq!(Polynomial::constant(4.0).derivative().coefficients(), &[0.0]);
    }

    #[test]
    fn test_linear_split_midpoint() {
        let p = Polynomial::linear(10.0, 20.0);
        let (a, b) = p.split();
        assert_relative_eq!(a.evaluate(0.0), 10.0);
        assert_relative_eq!(a.evaluate(1.0), 15.0);
        assert_relative_eq!(b.evaluate(0.0), 15.0);
        assert_relative_eq!(b.evaluate(1.0), 20.0);
    }

    #[test]
    fn test_reversed_and_integral() {
        let p = Polynomial::new(vec![0.0, 0.0, 3.0]); // 3t²
        assert_relative_eq!(p.integral(), 1.0);
        let r = p.reversed();
        assert_relative_eq!(r.evaluate(0.0), 3.0);
        assert_relative_eq!(r.evaluate(1.0), 0.0);
        assert_relative_eq!(r.integral(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_relative_eq!(Polynomial::new(Vec::new()).evaluate(0.7), 0.0);
    }

    proptest! {
        #[test]
        fn split_reproduces_halves(
            coeffs in prop::collection::vec(-10.0..10.0f64, 1..6),
            t in 0.0..1.0f64,
        ) {
            let p = Polynomial::new(coeffs);
            let (p1, p2) = p.split();
            prop_assert!((p1.evaluate(t) - p.evaluate(0.5 * t)).abs() < 1e-9);
            prop_assert!((p2.evaluate(t) - p.evaluate(0.5 * (1.0 + t))).abs() < 1e-9);
        }
    }
}
