//! Element families and their shape functions.
//!
//! The [`ShapeFunctions`] trait is the interface between the element families
//! and everything that integrates over them: geometry mapping, the
//! strain-displacement operator, the stiffness kernel and boundary
//! integrals all work with any family through it.
//!
//! # Submodules
//!
//! - [`cst`] - 3-node constant-strain triangle
//! - [`lst`] - 6-node linear-strain (quadratic) triangle
//! - [`q4`] - 4-node bilinear quadrilateral
//! - [`mapping`] - Jacobian, local/physical coordinate maps, areas
//! - [`strain_operator`] - B-matrix construction per physics mode

use crate::error::{Error, Result};
use crate::physics::PhysicsMode;
use crate::quadrature::QuadratureDomain;
use nalgebra::Vector2;
use std::fmt;

pub mod cst;
pub mod lst;
pub mod mapping;
pub mod q4;
pub mod strain_operator;

pub use cst::Cst;
pub use lst::Lst;
pub use mapping::{area, jacobian, map_to_local, map_to_physical, Jacobian};
pub use q4::Q4;
pub use strain_operator::{strain_displacement, StrainOperator};

/// Closed-form shape-function basis of one element family.
///
/// Implementations are stateless, so a single static instance per family is
/// shared by every element (see [`ElementType::family`]). They must be
/// thread-safe (Send + Sync) to enable parallel recovery.
pub trait ShapeFunctions: Send + Sync {
    /// Number of nodes (and shape functions).
    fn n_nodes(&self) -> usize;

    /// Shape-function values ψₖ(ξ, η), one per node.
    fn values(&self, xi: f64, eta: f64) -> Vec<f64>;

    /// Parametric derivatives (∂ψₖ/∂ξ, ∂ψₖ/∂η), one per node.
    fn derivatives(&self, xi: f64, eta: f64) -> Vec<Vector2<f64>>;

    /// Reference coordinates of the nodes, in node order.
    fn reference_nodes(&self) -> &'static [[f64; 2]];

    /// Reference coordinates of the element centroid.
    fn centroid(&self) -> (f64, f64);

    /// Reference domain used for quadrature.
    fn quadrature_domain(&self) -> QuadratureDomain;

    /// Whether (ξ, η) lies in the reference domain, within `tol`.
    fn contains(&self, xi: f64, eta: f64, tol: f64) -> bool;

    /// Quadrature precision used for stiffness integration in `mode`.
    fn default_precision(&self, mode: PhysicsMode) -> usize;
}

/// Element family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 3-node linear triangle.
    Cst,
    /// 6-node quadratic triangle.
    Lst,
    /// 4-node bilinear quadrilateral.
    Q4,
}

static CST: Cst = Cst;
static LST: Lst = Lst;
static Q4_FAMILY: Q4 = Q4;

const TRIANGLE_EDGES: [[usize; 2]; 3] = [[1, 2], [2, 0], [0, 1]];
const QUAD_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];

impl ElementType {
    /// Number of nodes per element.
    pub fn n_nodes(self) -> usize {
        match self {
            ElementType::Cst => 3,
            ElementType::Lst => 6,
            ElementType::Q4 => 4,
        }
    }

    /// Number of corner (vertex) nodes. Corners always come first.
    pub fn corner_count(self) -> usize {
        match self {
            ElementType::Cst | ElementType::Lst => 3,
            ElementType::Q4 => 4,
        }
    }

    /// Infer the family from a node count (3, 6 or 4).
    pub fn from_node_count(n: usize) -> Result<Self> {
        match n {
            3 => Ok(ElementType::Cst),
            6 => Ok(ElementType::Lst),
            4 => Ok(ElementType::Q4),
            _ => Err(Error::Configuration(format!(
                "elements must have 3, 4 or 6 nodes, got {}",
                n
            ))),
        }
    }

    /// Shared shape-function implementation of the family.
    pub fn family(self) -> &'static dyn ShapeFunctions {
        match self {
            ElementType::Cst => &CST,
            ElementType::Lst => &LST,
            ElementType::Q4 => &Q4_FAMILY,
        }
    }

    /// Local corner pairs of each edge.
    ///
    /// Triangles list the edge opposite each corner: (1,2), (2,0), (0,1). For
    /// the LST, the midpoint of edge `e` is local node `3 + e`.
    pub fn edges(self) -> &'static [[usize; 2]] {
        match self {
            ElementType::Cst | ElementType::Lst => &TRIANGLE_EDGES,
            ElementType::Q4 => &QUAD_EDGES,
        }
    }

    pub fn is_triangle(self) -> bool {
        !matches!(self, ElementType::Q4)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Cst => "CST",
            ElementType::Lst => "LST",
            ElementType::Q4 => "Q4",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const ALL: [ElementType; 3] = [ElementType::Cst, ElementType::Lst, ElementType::Q4];

    /// Map a point of the unit square into the family's reference domain.
    fn in_domain(ty: ElementType, s: f64, t: f64) -> (f64, f64) {
        match ty {
            ElementType::Q4 => (2.0 * s - 1.0, 2.0 * t - 1.0),
            _ => (s * (1.0 - t), t),
        }
    }

    #[test]
    fn test_node_counts() {
        for ty in ALL {
            assert_eq!(ElementType::from_node_count(ty.n_nodes()).unwrap(), ty);
            assert_eq!(ty.family().n_nodes(), ty.n_nodes());
            assert_eq!(ty.family().reference_nodes().len(), ty.n_nodes());
        }
        assert!(ElementType::from_node_count(8).is_err());
    }

    #[test]
    fn test_kronecker_delta_at_nodes() {
        for ty in ALL {
            let family = ty.family();
            for (i, node) in family.reference_nodes().iter().enumerate() {
                let n = family.values(node[0], node[1]);
                for (j, &v) in n.iter().enumerate() {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_relative_eq!(v, expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        let h = 1e-6;
        for ty in ALL {
            let family = ty.family();
            let (xi, eta) = in_domain(ty, 0.3, 0.2);
            let d = family.derivatives(xi, eta);
            let fx = family.values(xi + h, eta);
            let bx = family.values(xi - h, eta);
            let fy = family.values(xi, eta + h);
            let by = family.values(xi, eta - h);
            for k in 0..ty.n_nodes() {
                assert_relative_eq!(d[k][0], (fx[k] - bx[k]) / (2.0 * h), epsilon = 1e-6);
                assert_relative_eq!(d[k][1], (fy[k] - by[k]) / (2.0 * h), epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_lst_midpoints_between_corners() {
        let nodes = ElementType::Lst.family().reference_nodes();
        for (e, [a, b]) in ElementType::Lst.edges().iter().enumerate() {
            let mid = nodes[3 + e];
            assert_relative_eq!(mid[0], 0.5 * (nodes[*a][0] + nodes[*b][0]));
            assert_relative_eq!(mid[1], 0.5 * (nodes[*a][1] + nodes[*b][1]));
        }
    }

    proptest! {
        #[test]
        fn partition_of_unity(s in 0.0..1.0f64, t in 0.0..1.0f64) {
            for ty in ALL {
                let (xi, eta) = in_domain(ty, s, t);
                let family = ty.family();
                let sum: f64 = family.values(xi, eta).iter().sum();
                prop_assert!((sum - 1.0).abs() < 1e-10);

                let dsum = family
                    .derivatives(xi, eta)
                    .iter()
                    .fold(Vector2::zeros(), |acc, d| acc + d);
                prop_assert!(dsum.norm() < 1e-10);
            }
        }
    }
}
