//! Consistent nodal forces for structural analyses.
//!
//! Line loads are given per unit length along an element edge. An edge owned
//! by an LST element is integrated with its midpoint node, any other edge
//! with linear shape functions.

use crate::boundary::apply::line_samples;
use crate::boundary::Direction;
use crate::element::mapping::line_length;
use crate::error::{Error, Result};
use crate::mesh::{element_lies_left, find_edge_element, find_midpoint, Mesh};
use crate::types::Point2;
use log::debug;
use nalgebra::DVector;

/// Concentrated force on a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLoad {
    pub node: usize,
    pub fx: f64,
    pub fy: f64,
}

impl PointLoad {
    pub fn new(node: usize, fx: f64, fy: f64) -> Self {
        Self { node, fx, fy }
    }
}

/// Distribution of a line load along its edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadProfile {
    Uniform(f64),
    /// Linear from q0 at the first node to q1 at the last.
    Linear(f64, f64),
}

impl LoadProfile {
    /// Intensity at t ∈ [0, 1].
    pub fn at(&self, t: f64) -> f64 {
        match *self {
            LoadProfile::Uniform(q) => q,
            LoadProfile::Linear(q0, q1) => q0 + (q1 - q0) * t,
        }
    }

    /// Profiles on the halves [0, ½] and [½, 1].
    pub fn split(&self) -> (Self, Self) {
        match *self {
            LoadProfile::Uniform(q) => (LoadProfile::Uniform(q), LoadProfile::Uniform(q)),
            LoadProfile::Linear(q0, q1) => {
                let qm = 0.5 * (q0 + q1);
                (LoadProfile::Linear(q0, qm), LoadProfile::Linear(qm, q1))
            }
        }
    }
}

/// Distributed load on the edge from `nodes[0]` to `nodes[1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLoad {
    pub nodes: [usize; 2],
    pub direction: Direction,
    pub profile: LoadProfile,
}

impl LineLoad {
    pub fn new(a: usize, b: usize, direction: Direction, profile: LoadProfile) -> Self {
        Self {
            nodes: [a, b],
            direction,
            profile,
        }
    }
}

/// Unit load direction on the edge a → b of `element`.
fn unit_direction(mesh: &Mesh, load: &LineLoad, element: usize) -> Result<Point2> {
    let [a, b] = load.nodes;
    let (pa, pb) = (mesh.node(a)?, mesh.node(b)?);
    let d = pb - pa;
    let length = line_length(pa, pb);
    if length == 0.0 {
        return Err(Error::Geometry(format!("line load on zero-length edge {}-{}", a, b)));
    }
    Ok(match load.direction {
        Direction::X => Point2::new(1.0, 0.0),
        Direction::Y => Point2::new(0.0, 1.0),
        Direction::Tangent => d / length,
        Direction::Normal => {
            let left = element_lies_left(mesh, element, a, b)
                .ok_or_else(|| Error::Topology(format!("element {} does not exist", element)))?;
            if left {
                Point2::new(d[1], -d[0]) / length
            } else {
                Point2::new(-d[1], d[0]) / length
            }
        }
    })
}

/// Global force vector `[fx₀, fy₀, fx₁, fy₁, ...]` from point and line loads.
///
/// # Errors
///
/// `Error::Topology` for an unknown node or a line load on a pair of nodes
/// that is not an element edge.
pub fn structural_forces(
    mesh: &Mesh,
    point_loads: &[PointLoad],
    line_loads: &[LineLoad],
) -> Result<DVector<f64>> {
    let mut f = DVector::zeros(2 * mesh.n_nodes());

    for load in point_loads {
        let i = mesh.local(load.node)?;
        f[2 * i] += load.fx;
        f[2 * i + 1] += load.fy;
    }

    for load in line_loads {
        let [a, b] = load.nodes;
        let (nodes, element) = match find_midpoint(mesh, a, b) {
            Some((m, e)) => (vec![a, m, b], e),
            None => {
                let e = find_edge_element(mesh, a, b).ok_or_else(|| {
                    Error::Topology(format!("no element has an edge between nodes {} and {}", a, b))
                })?;
                (vec![a, b], e)
            }
        };
        debug!("line load on {:?} (element {})", nodes, element);

        let dir = unit_direction(mesh, load, element)?;
        let coords = nodes
            .iter()
            .map(|&id| mesh.node(id).copied())
            .collect::<Result<Vec<_>>>()?;
        for s in line_samples(&coords)? {
            let q = load.profile.at(s.t) * s.weight;
            for (psi, &id) in s.shape.iter().zip(&nodes) {
                let i = mesh.local(id)?;
                f[2 * i] += psi * q * dir[0];
                f[2 * i + 1] += psi * q * dir[1];
            }
        }
    }

    Ok(f)
}
