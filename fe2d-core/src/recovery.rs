//! Mesh-wide element evaluation.
//!
//! Elements are independent, so both passes run as parallel maps over the
//! element list. Global assembly of the stiffness matrices is left to the
//! caller.

use crate::element::ElementType;
use crate::error::Result;
use crate::kernel::{ElementKernel, FieldOutput, KernelOptions};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::physics::PhysicsMode;
use log::debug;
use nalgebra::DMatrix;
use rayon::prelude::*;

fn kernels(mode: PhysicsMode, options: KernelOptions) -> Result<[ElementKernel; 3]> {
    Ok([
        ElementKernel::new(ElementType::Cst, mode, options)?,
        ElementKernel::new(ElementType::Lst, mode, options)?,
        ElementKernel::new(ElementType::Q4, mode, options)?,
    ])
}

fn kernel_for(kernels: &[ElementKernel; 3], ty: ElementType) -> &ElementKernel {
    match ty {
        ElementType::Cst => &kernels[0],
        ElementType::Lst => &kernels[1],
        ElementType::Q4 => &kernels[2],
    }
}

/// Stiffness (or conductivity) matrix of every element, in element order.
///
/// # Errors
///
/// The first error raised by any element: `Error::Configuration` for a
/// material that does not match `mode`, `Error::Geometry` for a degenerate
/// or inverted element.
pub fn element_stiffnesses(
    mesh: &Mesh,
    material: &Material,
    mode: PhysicsMode,
    options: KernelOptions,
) -> Result<Vec<DMatrix<f64>>> {
    let d = material.constitutive(mode)?;
    let kernels = kernels(mode, options)?;
    debug!("computing {} element matrices ({})", mesh.n_elements(), mode);

    mesh.elements()
        .par_iter()
        .enumerate()
        .map(|(e, connectivity)| {
            let coords: Vec<_> = connectivity
                .nodes
                .iter()
                .map(|&id| mesh.node(id).copied())
                .collect::<Result<_>>()?;
            kernel_for(&kernels, connectivity.element_type)
                .stiffness(&coords, &d)
                .map_err(|err| {
                    debug!("element {} failed: {}", e, err);
                    err
                })
        })
        .collect()
}

fn sample_elements<F>(
    mesh: &Mesh,
    u: &[f64],
    material: Option<&Material>,
    mode: PhysicsMode,
    output: FieldOutput,
    point: F,
) -> Result<Vec<f64>>
where
    F: Fn(ElementType) -> (f64, f64) + Sync,
{
    let kernels = kernels(mode, KernelOptions::default())?;
    let ndof = mode.dofs_per_node();

    mesh.elements()
        .par_iter()
        .enumerate()
        .map(|(e, connectivity)| {
            let coords: Vec<_> = connectivity
                .nodes
                .iter()
                .map(|&id| mesh.node(id).copied())
                .collect::<Result<_>>()?;
            let ue = mesh.gather(e, u, ndof)?;
            let (xi, eta) = point(connectivity.element_type);
            kernel_for(&kernels, connectivity.element_type)
                .output(&coords, &ue, xi, eta, material, output)
        })
        .collect()
}

/// One scalar output per element at the reference point `(ξ, η)`.
///
/// `u` is the global nodal vector (`dofs_per_node` values per node).
pub fn element_field(
    mesh: &Mesh,
    u: &[f64],
    material: Option<&Material>,
    mode: PhysicsMode,
    output: FieldOutput,
    at: (f64, f64),
) -> Result<Vec<f64>> {
    sample_elements(mesh, u, material, mode, output, |_| at)
}

/// [`element_field`] at each element's centroid.
pub fn centroid_field(
    mesh: &Mesh,
    u: &[f64],
    material: Option<&Material>,
    mode: PhysicsMode,
    output: FieldOutput,
) -> Result<Vec<f64>> {
    sample_elements(mesh, u, material, mode, output, |ty| ty.family().centroid())
}
