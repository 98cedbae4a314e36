//! 4-node bilinear quadrilateral (Q4).
//!
//! ```text
//!  4-------3
//!  |       |
//!  |       |
//!  1-------2
//! ```
//!
//! Reference domain [-1, 1]² with nodes at (−1,−1), (1,−1), (1,1), (−1,1):
//! ψᵢ = (1 + ξξᵢ)(1 + ηηᵢ) / 4.

use crate::element::ShapeFunctions;
use crate::physics::PhysicsMode;
use crate::quadrature::QuadratureDomain;
use nalgebra::Vector2;

/// Bilinear quadrilateral shape functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Q4;

const NODES: [[f64; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

impl ShapeFunctions for Q4 {
    fn n_nodes(&self) -> usize {
        4
    }

    fn values(&self, xi: f64, eta: f64) -> Vec<f64> {
        NODES
            .iter()
            .map(|[xi_i, eta_i]| 0.25 * (1.0 + xi * xi_i) * (1.0 + eta * eta_i))
            .collect()
    }

    fn derivatives(&self, xi: f64, eta: f64) -> Vec<Vector2<f64>> {
        NODES
            .iter()
            .map(|[xi_i, eta_i]| {
                Vector2::new(
                    0.25 * xi_i * (1.0 + eta * eta_i),
                    0.25 * eta_i * (1.0 + xi * xi_i),
                )
            })
            .collect()
    }

    fn reference_nodes(&self) -> &'static [[f64; 2]] {
        &NODES
    }

    fn centroid(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    fn quadrature_domain(&self) -> QuadratureDomain {
        QuadratureDomain::Quadrilateral
    }

    fn contains(&self, xi: f64, eta: f64, tol: f64) -> bool {
        xi.abs() <= 1.0 + tol && eta.abs() <= 1.0 + tol
    }

    /// 2×2 Gauss points (line precision 3) for planar physics, 3×3 for
    /// axisymmetric.
    fn default_precision(&self, mode: PhysicsMode) -> usize {
        match mode {
            PhysicsMode::Axisymmetric => 5,
            _ => 3,
        }
    }
}
