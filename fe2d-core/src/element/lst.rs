//! 6-node linear-strain triangle (LST).
//!
//! The LST is the quadratic member of the triangle family:
//! - 6 nodes: 3 corner nodes + 3 mid-edge nodes
//! - Linear strain variation within the element
//! - Straight or curved edges (isoparametric)
//!
//! # Node Numbering
//!
//! ```text
//!  3
//!  |\
//!  | \
//!  5  4
//!  |   \
//!  |    \
//!  1--6--2
//! ```
//!
//! - Corner nodes: 1, 2, 3 (local indices 0, 1, 2)
//! - Mid-edge node i+3 lies opposite corner i: 4 (edge 2-3), 5 (edge 3-1),
//!   6 (edge 1-2) (local indices 3, 4, 5)
//!
//! # Shape Functions
//!
//! On the unit triangle with ζ = 1 − ξ − η:
//!
//! ```text
//! ψ1 = ζ(2ζ − 1) = 1 − 3ξ − 3η + 2ξ² + 4ξη + 2η²
//! ψ2 = ξ(2ξ − 1)
//! ψ3 = η(2η − 1)
//! ψ4 = 4ξη
//! ψ5 = 4ηζ
//! ψ6 = 4ξζ
//! ```

use crate::element::ShapeFunctions;
use crate::physics::PhysicsMode;
use crate::quadrature::QuadratureDomain;
use nalgebra::Vector2;

/// Quadratic triangle shape functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lst;

const NODES: [[f64; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [0.5, 0.5],
    [0.0, 0.5],
    [0.5, 0.0],
];

impl ShapeFunctions for Lst {
    fn n_nodes(&self) -> usize {
        6
    }

    fn values(&self, xi: f64, eta: f64) -> Vec<f64> {
        let zeta = 1.0 - xi - eta;
        vec![
            zeta * (2.0 * zeta - 1.0),
            xi * (2.0 * xi - 1.0),
            eta * (2.0 * eta - 1.0),
            4.0 * xi * eta,
            4.0 * eta * zeta,
            4.0 * xi * zeta,
        ]
    }

    fn derivatives(&self, xi: f64, eta: f64) -> Vec<Vector2<f64>> {
        let c = -3.0 + 4.0 * xi + 4.0 * eta;
        vec![
            Vector2::new(c, c),
            Vector2::new(4.0 * xi - 1.0, 0.0),
            Vector2::new(0.0, 4.0 * eta - 1.0),
            Vector2::new(4.0 * eta, 4.0 * xi),
            Vector2::new(-4.0 * eta, 4.0 - 4.0 * xi - 8.0 * eta),
            Vector2::new(4.0 - 8.0 * xi - 4.0 * eta, -4.0 * xi),
        ]
    }

    fn reference_nodes(&self) -> &'static [[f64; 2]] {
        &NODES
    }

    fn centroid(&self) -> (f64, f64) {
        (1.0 / 3.0, 1.0 / 3.0)
    }

    fn quadrature_domain(&self) -> QuadratureDomain {
        QuadratureDomain::Triangle
    }

    fn contains(&self, xi: f64, eta: f64, tol: f64) -> bool {
        xi >= -tol && eta >= -tol && xi + eta <= 1.0 + tol
    }

    /// BᵀDB is quadratic for straight-sided planar elements, so precision 2
    /// is exact there. Axisymmetric integrands carry r and 1/r and need more.
    fn default_precision(&self, mode: PhysicsMode) -> usize {
        match mode {
            PhysicsMode::Axisymmetric => 4,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_expanded_corner_function() {
        let (xi, eta) = (0.2, 0.35);
        let expanded = 1.0 - 3.0 * xi - 3.0 * eta
            + 2.0 * xi * xi
            + 4.0 * xi * eta
            + 2.0 * eta * eta;
        assert_relative_eq!(Lst.values(xi, eta)[0], expanded, epsilon = 1e-14);
    }

    #[test]
    fn test_centroid_values() {
        let v = Lst.values(1.0 / 3.0, 1.0 / 3.0);
        // Corners: (1/3)(-1/3) = -1/9; midpoints: 4/9
        for &c in &v[..3] {
            assert_relative_eq!(c, -1.0 / 9.0, epsilon = 1e-14);
        }
        for &m in &v[3..] {
            assert_relative_eq!(m, 4.0 / 9.0, epsilon = 1e-14);
        }
    }
}
