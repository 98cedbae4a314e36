//! 3-node constant-strain triangle (CST).
//!
//! ```text
//!  3
//!  |\
//!  | \
//!  |  \
//!  1---2
//! ```
//!
//! Linear basis on the unit triangle: ψ1 = 1 − ξ − η, ψ2 = ξ, ψ3 = η. The
//! derivatives are constant, so the Jacobian and the B-matrix are constant
//! over the element for planar physics.

use crate::element::ShapeFunctions;
use crate::physics::PhysicsMode;
use crate::quadrature::QuadratureDomain;
use nalgebra::Vector2;

/// Linear triangle shape functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cst;

const NODES: [[f64; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

impl ShapeFunctions for Cst {
    fn n_nodes(&self) -> usize {
        3
    }

    fn values(&self, xi: f64, eta: f64) -> Vec<f64> {
        vec![1.0 - xi - eta, xi, eta]
    }

    fn derivatives(&self, _xi: f64, _eta: f64) -> Vec<Vector2<f64>> {
        vec![
            Vector2::new(-1.0, -1.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
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

    /// The CST kernel is closed form at the centroid in every mode.
    fn default_precision(&self, _mode: PhysicsMode) -> usize {
        1
    }
}
