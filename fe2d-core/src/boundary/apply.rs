//! Diffusion boundary conditions on the global system.
//!
//! Line entities are parametrized by t ∈ [0, 1] from the first node to the
//! last, with linear (2-node) or quadratic (3-node, `[end, mid, end]`) shape
//! functions:
//!
//! ```text
//! 2 nodes:  ψ = [1 − t, t]
//! 3 nodes:  ψ = [(1 − t)(1 − 2t), 4t(1 − t), t(2t − 1)]
//! ```
//!
//! Faces reuse the element families (3 nodes CST, 6 LST, 4 Q4).

use crate::boundary::{BoundaryCondition, BoundaryKind, Geometry};
use crate::element::{jacobian, ElementType};
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::physics::PhysicsMode;
use crate::quadrature::{quadrature, QuadratureDomain};
use crate::types::Point2;
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};

/// Quadrature precision on boundary lines and faces.
pub const BOUNDARY_PRECISION: usize = 5;

/// Line shape functions and their t-derivatives.
pub(crate) fn line_shape_functions(n: usize, t: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    match n {
        2 => Ok((vec![1.0 - t, t], vec![-1.0, 1.0])),
        3 => Ok((
            vec![(1.0 - t) * (1.0 - 2.0 * t), 4.0 * t * (1.0 - t), t * (2.0 * t - 1.0)],
            vec![4.0 * t - 3.0, 4.0 - 8.0 * t, 4.0 * t - 1.0],
        )),
        _ => Err(Error::Configuration(format!(
            "boundary lines have 2 or 3 nodes, got {}",
            n
        ))),
    }
}

/// One integration point on a boundary entity.
pub(crate) struct BoundarySample {
    pub shape: Vec<f64>,
    /// Line parameter (0 on faces).
    pub t: f64,
    pub point: Point2,
    /// Quadrature weight times the length or area element.
    pub weight: f64,
}

/// Integration points along a 2- or 3-node line.
pub(crate) fn line_samples(coords: &[Point2]) -> Result<Vec<BoundarySample>> {
    let rule = quadrature(QuadratureDomain::Line, BOUNDARY_PRECISION)?;
    let mut samples = Vec::with_capacity(rule.len());
    for gp in &rule {
        let t = gp.xi();
        let (shape, dshape) = line_shape_functions(coords.len(), t)?;
        let tangent: Point2 = dshape.iter().zip(coords).map(|(d, x)| x * *d).sum();
        let ds = tangent.norm();
        if ds <= 0.0 {
            return Err(Error::Geometry(format!(
                "zero-length boundary line at t = {}",
                t
            )));
        }
        let point: Point2 = shape.iter().zip(coords).map(|(s, x)| x * *s).sum();
        samples.push(BoundarySample {
            shape,
            t,
            point,
            weight: rule.reference_measure() * gp.weight * ds,
        });
    }
    Ok(samples)
}

fn face_samples(coords: &[Point2]) -> Result<Vec<BoundarySample>> {
    let ty = ElementType::from_node_count(coords.len())?;
    let family = ty.family();
    let rule = quadrature(family.quadrature_domain(), BOUNDARY_PRECISION)?;
    let mut samples = Vec::with_capacity(rule.len());
    for gp in &rule {
        let jac = jacobian(ty, coords, gp.xi(), gp.eta());
        jac.checked_inverse()?;
        let shape = family.values(gp.xi(), gp.eta());
        let point: Point2 = shape.iter().zip(coords).map(|(s, x)| x * *s).sum();
        samples.push(BoundarySample {
            shape,
            t: 0.0,
            point,
            weight: rule.reference_measure() * gp.weight * jac.determinant,
        });
    }
    Ok(samples)
}

fn node_coords(bc: &BoundaryCondition, mesh: &Mesh) -> Result<Vec<Point2>> {
    bc.nodes().iter().map(|&id| mesh.node(id).copied()).collect()
}

/// Samples and the thickness factor of a line or face condition.
fn entity_samples(bc: &BoundaryCondition, mesh: &Mesh, thickness: f64) -> Result<(Vec<BoundarySample>, f64)> {
    let coords = node_coords(bc, mesh)?;
    match bc.geometry() {
        Geometry::Line => Ok((line_samples(&coords)?, thickness)),
        Geometry::Face => Ok((face_samples(&coords)?, 1.0)),
        Geometry::Point => Err(Error::Configuration(format!(
            "{} cannot be integrated over a point",
            bc.kind()
        ))),
    }
}

/// Local convection matrix and vector: K_ij = ∫ h ψᵢ ψⱼ, F_i = ∫ h T∞ ψᵢ.
///
/// Line integrals are scaled by `thickness`; face integrals are not.
pub fn element_convection(
    bc: &BoundaryCondition,
    mesh: &Mesh,
    thickness: f64,
) -> Result<(DMatrix<f64>, DVector<f64>)> {
    let (samples, scale) = entity_samples(bc, mesh, thickness)?;
    let n = bc.nodes().len();
    let mut k = DMatrix::zeros(n, n);
    let mut f = DVector::zeros(n);
    for s in &samples {
        let h = bc.coefficient().evaluate(s.t, &s.point);
        let t_inf = bc.value().evaluate(s.t, &s.point);
        let psi = DVector::from_column_slice(&s.shape);
        let w = s.weight * scale;
        k += &psi * psi.transpose() * (h * w);
        f += &psi * (h * t_inf * w);
    }
    Ok((k, f))
}

/// Local flux vector F_i = ∫ q ψᵢ.
pub fn element_flux(bc: &BoundaryCondition, mesh: &Mesh, thickness: f64) -> Result<DVector<f64>> {
    let (samples, scale) = entity_samples(bc, mesh, thickness)?;
    let mut f = DVector::zeros(bc.nodes().len());
    for s in &samples {
        let q = bc.value().evaluate(s.t, &s.point);
        f += DVector::from_column_slice(&s.shape) * (q * s.weight * scale);
    }
    Ok(f)
}

/// Local flow vector: the total Q split as Q·∫ψᵢ / ∫1. A point receives Q.
pub fn element_flow(bc: &BoundaryCondition, mesh: &Mesh) -> Result<DVector<f64>> {
    let q = bc.value().as_constant().ok_or_else(|| {
        Error::Configuration("flow boundary conditions need a constant value".into())
    })?;
    if bc.geometry() == Geometry::Point {
        return Ok(DVector::from_element(1, q));
    }
    let (samples, _) = entity_samples(bc, mesh, 1.0)?;
    let mut f = DVector::zeros(bc.nodes().len());
    let mut measure = 0.0;
    for s in &samples {
        f += DVector::from_column_slice(&s.shape) * s.weight;
        measure += s.weight;
    }
    Ok(f * (q / measure))
}

/// Apply diffusion boundary conditions to a global conductivity matrix.
///
/// Returns modified copies of `k` and a new load vector. Convection, flux and
/// flow are accumulated first; temperature rows are then replaced by identity
/// rows with F = prescribed value.
///
/// # Errors
///
/// - `Error::Configuration` for a structural mode ("not implemented"), a
///   non-diffusion kind, or a `k` that is not `n_nodes × n_nodes`
/// - `Error::Topology` for a node id not in the mesh
/// - `Error::Geometry` for a degenerate line or face
pub fn apply_boundary_conditions(
    k: &DMatrix<f64>,
    bcs: &[BoundaryCondition],
    mesh: &Mesh,
    thickness: f64,
    mode: PhysicsMode,
) -> Result<(DMatrix<f64>, DVector<f64>)> {
    if mode != PhysicsMode::Diffusion {
        return Err(Error::Configuration(format!(
            "boundary conditions in {} mode are not implemented",
            mode
        )));
    }
    let n = mesh.n_nodes();
    if k.shape() != (n, n) {
        return Err(Error::Configuration(format!(
            "conductivity matrix is {}x{}, mesh has {} nodes",
            k.nrows(),
            k.ncols(),
            n
        )));
    }
    if let Some(bc) = bcs.iter().find(|bc| !bc.kind().is_diffusion()) {
        return Err(Error::Configuration(format!(
            "{} boundary condition is not valid in diffusion mode",
            bc.kind()
        )));
    }

    let mut k = k.clone();
    let mut f = DVector::zeros(n);

    for bc in bcs {
        let dofs = bc
            .nodes()
            .iter()
            .map(|&id| mesh.local(id))
            .collect::<Result<Vec<_>>>()?;
        debug!("applying {}", bc);
        match bc.kind() {
            BoundaryKind::Convection => {
                let (ke, fe) = element_convection(bc, mesh, thickness)?;
                for (a, &i) in dofs.iter().enumerate() {
                    f[i] += fe[a];
                    for (b, &j) in dofs.iter().enumerate() {
                        k[(i, j)] += ke[(a, b)];
                    }
                }
            }
            BoundaryKind::Flux => {
                let fe = element_flux(bc, mesh, thickness)?;
                for (a, &i) in dofs.iter().enumerate() {
                    f[i] += fe[a];
                }
            }
            BoundaryKind::Flow => {
                let fe = element_flow(bc, mesh)?;
                for (a, &i) in dofs.iter().enumerate() {
                    f[i] += fe[a];
                }
            }
            _ => {}
        }
    }

    for bc in bcs.iter().filter(|bc| bc.kind() == BoundaryKind::Temperature) {
        let count = bc.nodes().len();
        for (i, &id) in bc.nodes().iter().enumerate() {
            let dof = mesh.local(id)?;
            let t = if count > 1 {
                i as f64 / (count - 1) as f64
            } else {
                0.0
            };
            let value = bc.value().evaluate(t, mesh.node(id)?);
            trace!("node {}: T = {}", id, value);
            k.row_mut(dof).fill(0.0);
            k[(dof, dof)] = 1.0;
            f[dof] = value;
        }
    }

    Ok((k, f))
}
