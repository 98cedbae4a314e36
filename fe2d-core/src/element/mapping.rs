//! Isoparametric geometry mapping.
//!
//! The Jacobian follows the row convention
//!
//! ```text
//! J = [ ∂x/∂ξ  ∂y/∂ξ ]
//!     [ ∂x/∂η  ∂y/∂η ]
//! ```
//!
//! so parametric derivatives transform to physical ones through
//! `[∂ψ/∂x, ∂ψ/∂y]ᵀ = J⁻¹ [∂ψ/∂ξ, ∂ψ/∂η]ᵀ`.

use crate::element::ElementType;
use crate::error::{Error, Result};
use crate::types::Point2;
use nalgebra::{Matrix2, Vector2};

/// Relative determinant tolerance: det J ≤ DEGENERATE_TOL · max|Jᵢⱼ|² is degenerate.
const DEGENERATE_TOL: f64 = 1e-12;

const NEWTON_MAX_ITER: usize = 50;
const NEWTON_TOL: f64 = 1e-12;

/// Jacobian matrix at one reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jacobian {
    pub matrix: Matrix2<f64>,
    pub determinant: f64,
}

impl Jacobian {
    fn new(matrix: Matrix2<f64>) -> Self {
        Self {
            matrix,
            determinant: matrix.determinant(),
        }
    }

    /// Inverse of J, refusing inverted or degenerate geometry.
    ///
    /// # Errors
    ///
    /// `Error::Geometry` when det J < 0 (clockwise node order) or when det J is
    /// negligible relative to the squared magnitude of J.
    pub fn checked_inverse(&self) -> Result<Matrix2<f64>> {
        let det = self.determinant;
        if det < 0.0 {
            return Err(Error::Geometry(format!(
                "inverted element: Jacobian determinant {:.6e} is negative",
                det
            )));
        }
        let scale = self.matrix.amax().powi(2);
        if scale == 0.0 || det <= DEGENERATE_TOL * scale {
            return Err(Error::Geometry(format!(
                "degenerate element: Jacobian determinant {:.6e}",
                det
            )));
        }
        self.matrix
            .try_inverse()
            .ok_or_else(|| Error::Geometry("singular Jacobian".into()))
    }
}

#[inline]
pub(crate) fn check_coords(ty: ElementType, coords: &[Point2]) {
    assert_eq!(
        coords.len(),
        ty.n_nodes(),
        "{} element requires {} nodes",
        ty,
        ty.n_nodes()
    );
}

/// Jacobian of the isoparametric map at (ξ, η).
pub fn jacobian(ty: ElementType, coords: &[Point2], xi: f64, eta: f64) -> Jacobian {
    check_coords(ty, coords);
    let dn = ty.family().derivatives(xi, eta);
    let mut j = Matrix2::zeros();
    for (d, p) in dn.iter().zip(coords) {
        j[(0, 0)] += d[0] * p[0]; // dx/dξ
        j[(0, 1)] += d[0] * p[1]; // dy/dξ
        j[(1, 0)] += d[1] * p[0]; // dx/dη
        j[(1, 1)] += d[1] * p[1]; // dy/dη
    }
    Jacobian::new(j)
}

/// Physical position Σ ψₖ(ξ, η) xₖ.
pub fn map_to_physical(ty: ElementType, coords: &[Point2], xi: f64, eta: f64) -> Point2 {
    check_coords(ty, coords);
    ty.family()
        .values(xi, eta)
        .iter()
        .zip(coords)
        .fold(Point2::zeros(), |acc, (n, p)| acc + p * *n)
}

/// Reference coordinates (ξ, η) of a physical point.
///
/// Closed form for the CST. LST and Q4 use Newton iteration from the
/// reference centroid. The returned point need not lie inside the element;
/// check with [`ShapeFunctions::contains`](crate::element::ShapeFunctions::contains).
///
/// # Errors
///
/// `Error::Geometry` for a degenerate Jacobian or when Newton iteration does
/// not converge.
pub fn map_to_local(ty: ElementType, coords: &[Point2], p: &Point2) -> Result<(f64, f64)> {
    check_coords(ty, coords);

    if ty == ElementType::Cst {
        let j_inv_t = jacobian(ty, coords, 0.0, 0.0).checked_inverse()?.transpose();
        let local = j_inv_t * (p - coords[0]);
        return Ok((local[0], local[1]));
    }

    let (mut xi, mut eta) = ty.family().centroid();
    for _ in 0..NEWTON_MAX_ITER {
        let residual = map_to_physical(ty, coords, xi, eta) - p;
        // dx = Jᵀ dξ
        let j_inv_t = jacobian(ty, coords, xi, eta).checked_inverse()?.transpose();
        let step: Vector2<f64> = j_inv_t * residual;
        xi -= step[0];
        eta -= step[1];
        if step.amax() < NEWTON_TOL {
            return Ok((xi, eta));
        }
    }
    Err(Error::Geometry(format!(
        "inverse mapping of ({}, {}) did not converge in {} iterations",
        p[0], p[1], NEWTON_MAX_ITER
    )))
}

/// Signed area of a polygon by the shoelace formula. Positive for
/// counter-clockwise vertex order.
pub fn signed_area(corners: &[Point2]) -> f64 {
    let n = corners.len();
    0.5 * (0..n)
        .map(|i| {
            let a = corners[i];
            let b = corners[(i + 1) % n];
            a[0] * b[1] - b[0] * a[1]
        })
        .sum::<f64>()
}

#[inline]
fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a[0] * b[1] - a[1] * b[0]
}

/// Element area in closed form.
///
/// Triangles (CST, and LST through its corners): half the cross product of
/// two edge vectors. Q4: half the cross product of the diagonals.
pub fn area(ty: ElementType, coords: &[Point2]) -> f64 {
    check_coords(ty, coords);
    match ty {
        ElementType::Cst | ElementType::Lst => {
            0.5 * cross(coords[1] - coords[0], coords[2] - coords[0]).abs()
        }
        ElementType::Q4 => 0.5 * cross(coords[2] - coords[0], coords[3] - coords[1]).abs(),
    }
}

/// Straight-line distance between two nodes.
pub fn line_length(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Diagonal of the bounding box of the nodes, a scale for tolerances.
pub fn characteristic_length(coords: &[Point2]) -> f64 {
    let (min, max) = coords.iter().fold(
        (
            Point2::repeat(f64::INFINITY),
            Point2::repeat(f64::NEG_INFINITY),
        ),
        |(lo, hi), p| (lo.inf(p), hi.sup(p)),
    );
    (max - min).norm()
}
