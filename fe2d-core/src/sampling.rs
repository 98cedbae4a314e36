//! Field sampling for plotting.
//!
//! Each element is sampled on a regular grid in its reference domain and the
//! grid is split into triangles, giving a renderer everything it needs for a
//! filled contour plot:
//!
//! ```text
//!   triangle, n = 4          quadrilateral, n = 3
//!
//!   9                        6 --- 7 --- 8
//!   | \                      |  /  |  /  |
//!   7 - 8                    3 --- 4 --- 5
//!   | \ | \                  |  /  |  /  |
//!   4 - 5 - 6                0 --- 1 --- 2
//!   | \ | \ | \
//!   0 - 1 - 2 - 3
//! ```
//!
//! Structural results can be drawn on the deformed shape, with displacements
//! magnified by a scaling factor.

use crate::element::{map_to_physical, ElementType};
use crate::error::{Error, Result};
use crate::kernel::{ElementKernel, FieldOutput, KernelOptions};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::physics::PhysicsMode;
use crate::types::Point2;
use log::debug;
use rayon::prelude::*;

/// Sampling configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOptions {
    /// Grid points along each reference edge (at least 2).
    pub points_per_edge: usize,
    /// Draw structural results on the deformed shape.
    pub deformed: bool,
    /// Displacement magnification; [`auto_scaling`] if None.
    pub scaling: Option<f64>,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            points_per_edge: 10,
            deformed: false,
            scaling: None,
        }
    }
}

/// Samples of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSamples {
    pub points: Vec<Point2>,
    pub values: Vec<f64>,
    /// Counter-clockwise triangles indexing `points`.
    pub triangles: Vec<[usize; 3]>,
}

/// Samples of every element with the global value range.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSamples {
    pub elements: Vec<ElementSamples>,
    pub min: f64,
    pub max: f64,
    /// Displacement magnification used for the deformed shape.
    pub scaling: f64,
}

/// Default magnification: max(⌊r_max / (25 u_max)⌋, 1), where r_max is the
/// bounding-box diagonal and u_max the largest displacement component.
pub fn auto_scaling(mesh: &Mesh, u: &[f64]) -> f64 {
    let u_max = u.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let r_max = match mesh.bounds() {
        Some((lo, hi)) => (hi - lo).norm(),
        None => return 1.0,
    };
    if u_max == 0.0 {
        return 1.0;
    }
    (r_max / (25.0 * u_max)).floor().max(1.0)
}

/// Reference grid of an element family and its triangulation.
fn reference_grid(ty: ElementType, n: usize) -> (Vec<(f64, f64)>, Vec<[usize; 3]>) {
    let step = 1.0 / (n - 1) as f64;
    let mut points = Vec::new();
    let mut triangles = Vec::new();

    if ty.is_triangle() {
        let offset = |j: usize| j * n - j * j.saturating_sub(1) / 2;
        let idx = |i: usize, j: usize| offset(j) + i;
        for j in 0..n {
            for i in 0..n - j {
                points.push((i as f64 * step, j as f64 * step));
            }
        }
        for j in 0..n - 1 {
            for i in 0..n - 1 - j {
                triangles.push([idx(i, j), idx(i + 1, j), idx(i, j + 1)]);
                if i + 1 < n - 1 - j {
                    triangles.push([idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1)]);
                }
            }
        }
    } else {
        let idx = |i: usize, j: usize| j * n + i;
        for j in 0..n {
            for i in 0..n {
                points.push((-1.0 + 2.0 * i as f64 * step, -1.0 + 2.0 * j as f64 * step));
            }
        }
        for j in 0..n - 1 {
            for i in 0..n - 1 {
                triangles.push([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
                triangles.push([idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
            }
        }
    }
    (points, triangles)
}

/// Sample `output` over every element.
///
/// With `output = None` the primary field is sampled instead: the
/// interpolated temperature in diffusion mode, the displacement magnitude in
/// structural modes.
///
/// # Errors
///
/// - `Error::Configuration` for `points_per_edge < 2` or a `u` of the wrong
///   length
/// - `Error::OutputRequest` for an output not defined in `mode`
/// - `Error::Geometry` for a degenerate element
pub fn sample_field(
    mesh: &Mesh,
    u: &[f64],
    material: Option<&Material>,
    mode: PhysicsMode,
    output: Option<FieldOutput>,
    options: &SampleOptions,
) -> Result<FieldSamples> {
    let n = options.points_per_edge;
    if n < 2 {
        return Err(Error::Configuration(format!(
            "points_per_edge must be at least 2, got {}",
            n
        )));
    }
    let ndof = mode.dofs_per_node();
    let deformed = options.deformed && mode.is_structural();
    let scaling = match options.scaling {
        Some(s) => s,
        None if deformed => auto_scaling(mesh, u),
        None => 1.0,
    };

    let elements = mesh
        .elements()
        .par_iter()
        .enumerate()
        .map(|(e, connectivity)| -> Result<ElementSamples> {
            let ty = connectivity.element_type;
            let kernel = ElementKernel::new(ty, mode, KernelOptions::default())?;
            let family = ty.family();
            let coords: Vec<_> = connectivity
                .nodes
                .iter()
                .map(|&id| mesh.node(id).copied())
                .collect::<Result<_>>()?;
            let ue = mesh.gather(e, u, ndof)?;
            let (grid, triangles) = reference_grid(ty, n);

            let mut points = Vec::with_capacity(grid.len());
            let mut values = Vec::with_capacity(grid.len());
            for (xi, eta) in grid {
                let psi = family.values(xi, eta);
                let interpolated: Vec<f64> = (0..ndof)
                    .map(|d| psi.iter().enumerate().map(|(k, s)| s * ue[k * ndof + d]).sum())
                    .collect();

                let mut point = map_to_physical(ty, &coords, xi, eta);
                if deformed {
                    point += Point2::new(interpolated[0], interpolated[1]) * scaling;
                }
                points.push(point);

                values.push(match output {
                    Some(output) => kernel.output(&coords, &ue, xi, eta, material, output)?,
                    None if ndof == 1 => interpolated[0],
                    None => interpolated[0].hypot(interpolated[1]),
                });
            }
            Ok(ElementSamples {
                points,
                values,
                triangles,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let (min, max) = elements
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    debug!(
        "sampled {} elements, range [{}, {}], scaling {}",
        elements.len(),
        min,
        max,
        scaling
    );

    Ok(FieldSamples {
        elements,
        min,
        max,
        scaling,
    })
}
