//! FE2D Core - element kernels for 2D finite element analysis
//!
//! Library building blocks for plane stress, plane strain, axisymmetric and
//! steady diffusion problems:
//! - CST, LST and Q4 element families with Gauss quadrature
//! - Element stiffness and stress/strain/flux recovery
//! - CST mesh refinement (LST promotion and quadrisection)
//! - Diffusion boundary conditions and structural load vectors
//! - Field sampling for plotting
//!
//! Global assembly and the linear solve are left to the caller.
//!
//! # Architecture
//!
//! - [`ElementType`] / [`ShapeFunctions`]: element families and shape functions
//! - [`ElementKernel`]: per-element stiffness and field recovery
//! - [`Mesh`]: connectivity and nodal coordinates with an index base
//! - [`BoundaryCondition`]: point, line and face conditions
//! - [`Material`]: elastic and diffusive material definitions

pub mod types;
pub mod error;
pub mod physics;
pub mod material;
pub mod quadrature;
pub mod element;
pub mod kernel;
pub mod polynomial;
pub mod mesh;
pub mod boundary;
pub mod refine;
pub mod recovery;
pub mod sampling;

pub use types::{PlaneStressState, Point2};
pub use error::{Error, Result};
pub use physics::PhysicsMode;
pub use material::{constitutive_matrix, Material};
pub use quadrature::{quadrature, QuadratureDomain, QuadraturePoint, QuadratureRule};
pub use element::{ElementType, ShapeFunctions, StrainOperator};
pub use kernel::{ElementKernel, FieldOutput, KernelOptions};
pub use polynomial::Polynomial;
pub use mesh::{Mesh, MeshTopology};
pub use boundary::{
    apply_boundary_conditions, structural_forces, BoundaryCondition, BoundaryKind, Constraint,
    ConstraintAxis, Direction, Geometry, LineLoad, LoadProfile, PointLoad, Variation,
};
pub use refine::{promote_to_lst, quadrisect, Promotion, Quadrisection};
pub use recovery::{centroid_field, element_field, element_stiffnesses};
pub use sampling::{auto_scaling, sample_field, FieldSamples, SampleOptions};
