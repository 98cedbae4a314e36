//! Strain-displacement (B) matrix construction.
//!
//! # Layout
//!
//! For node k with physical derivatives (ψₖ,ₓ, ψₖ,ᵧ):
//!
//! Plane stress / plane strain (3 × 2n):
//! ```text
//! [ ψₖ,ₓ   0    ]   ε_x
//! [ 0      ψₖ,ᵧ ]   ε_y
//! [ ψₖ,ᵧ   ψₖ,ₓ ]   γ_xy
//! ```
//!
//! Axisymmetric (4 × 2n), x = r and y = z:
//! ```text
//! [ ψₖ,ᵣ   0    ]   ε_r
//! [ 0      ψₖ,z ]   ε_z
//! [ ψₖ/r   0    ]   ε_θ
//! [ ψₖ,z   ψₖ,ᵣ ]   γ_rz
//! ```
//!
//! Diffusion (2 × n): the gradient rows ψₖ,ₓ and ψₖ,ᵧ.
//!
//! # Symmetry axis
//!
//! The hoop strain u_r/r is singular where r = 0. A point with r below
//! −tol lies on the wrong side of the axis and is a geometry error. For
//! |r| ≤ tol the analytic limit u_r/r → ∂u_r/∂r is used instead, which is
//! finite for any admissible field (u_r = 0 on the axis). The tolerance is
//! `AXIS_TOL` times the element's characteristic length.

use crate::element::mapping::{characteristic_length, check_coords, jacobian};
use crate::element::ElementType;
use crate::error::{Error, Result};
use crate::physics::PhysicsMode;
use crate::types::Point2;
use log::warn;
use nalgebra::{DMatrix, Vector2};

const AXIS_TOL: f64 = 1e-10;

/// B-matrix at one reference point, with the geometric quantities that
/// integration needs alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct StrainOperator {
    /// Strain-displacement matrix.
    pub b: DMatrix<f64>,
    /// Jacobian determinant at the point.
    pub det_j: f64,
    /// Shape-function values at the point.
    pub shape: Vec<f64>,
    /// Physical radius (x coordinate) for axisymmetric evaluations.
    pub radius: Option<f64>,
}

/// Build the B-matrix at (ξ, η).
///
/// # Errors
///
/// `Error::Geometry` for inverted or degenerate elements, and for
/// axisymmetric points at negative radius.
pub fn strain_displacement(
    ty: ElementType,
    coords: &[Point2],
    xi: f64,
    eta: f64,
    mode: PhysicsMode,
) -> Result<StrainOperator> {
    check_coords(ty, coords);
    let family = ty.family();
    let n = ty.n_nodes();

    let jac = jacobian(ty, coords, xi, eta);
    let j_inv = jac.checked_inverse()?;
    let dn_dxy: Vec<Vector2<f64>> = family
        .derivatives(xi, eta)
        .iter()
        .map(|d| j_inv * d)
        .collect();
    let shape = family.values(xi, eta);

    let mut radius = None;
    let b = match mode {
        PhysicsMode::PlaneStress | PhysicsMode::PlaneStrain => {
            let mut b = DMatrix::zeros(3, 2 * n);
            for (k, d) in dn_dxy.iter().enumerate() {
                let col = 2 * k;
                b[(0, col)] = d[0]; // ε_x = ∂u/∂x
                b[(1, col + 1)] = d[1]; // ε_y = ∂v/∂y
                b[(2, col)] = d[1]; // γ_xy = ∂u/∂y + ∂v/∂x
                b[(2, col + 1)] = d[0];
            }
            b
        }
        PhysicsMode::Axisymmetric => {
            let r: f64 = shape.iter().zip(coords).map(|(s, p)| s * p[0]).sum();
            let tol = AXIS_TOL * characteristic_length(coords);
            if r < -tol {
                return Err(Error::Geometry(format!(
                    "axisymmetric element reaches negative radius r = {:.6e}",
                    r
                )));
            }
            let on_axis = r.abs() <= tol;
            if on_axis {
                warn!(
                    "hoop strain evaluated on the symmetry axis at (ξ, η) = ({}, {}); using ∂u_r/∂r limit",
                    xi, eta
                );
            }

            let mut b = DMatrix::zeros(4, 2 * n);
            for (k, d) in dn_dxy.iter().enumerate() {
                let col = 2 * k;
                b[(0, col)] = d[0]; // ε_r
                b[(1, col + 1)] = d[1]; // ε_z
                b[(2, col)] = if on_axis { d[0] } else { shape[k] / r }; // ε_θ
                b[(3, col)] = d[1]; // γ_rz
                b[(3, col + 1)] = d[0];
            }
            radius = Some(r);
            b
        }
        PhysicsMode::Diffusion => {
            let mut b = DMatrix::zeros(2, n);
            for (k, d) in dn_dxy.iter().enumerate() {
                b[(0, k)] = d[0];
                b[(1, k)] = d[1];
            }
            b
        }
    };

    Ok(StrainOperator {
        b,
        det_j: jac.determinant,
        shape,
        radius,
    })
}
