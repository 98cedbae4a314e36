//! Physics modes supported by the 2D kernels.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Simplifying assumption used to reduce a 3D problem to the analysis plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicsMode {
    /// σ_z = 0 (thin plates).
    PlaneStress,
    /// ε_z = 0 (thick bodies).
    PlaneStrain,
    /// Body of revolution about the y (z) axis; x is the radius.
    Axisymmetric,
    /// Steady-state scalar diffusion (heat conduction, concentration).
    Diffusion,
}

impl PhysicsMode {
    /// Degrees of freedom per node: 2 displacements, or 1 scalar for diffusion.
    pub fn dofs_per_node(self) -> usize {
        match self {
            PhysicsMode::Diffusion => 1,
            _ => 2,
        }
    }

    /// Number of rows of the B-matrix (strain components).
    pub fn strain_components(self) -> usize {
        match self {
            PhysicsMode::PlaneStress | PhysicsMode::PlaneStrain => 3,
            PhysicsMode::Axisymmetric => 4,
            PhysicsMode::Diffusion => 2,
        }
    }

    /// True for the elasticity modes.
    pub fn is_structural(self) -> bool {
        !matches!(self, PhysicsMode::Diffusion)
    }

    /// Tag used by the string interface.
    pub fn as_str(self) -> &'static str {
        match self {
            PhysicsMode::PlaneStress => "planeStress",
            PhysicsMode::PlaneStrain => "planeStrain",
            PhysicsMode::Axisymmetric => "axisymmetric",
            PhysicsMode::Diffusion => "diffusion",
        }
    }
}

impl fmt::Display for PhysicsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhysicsMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "planeStress" => Ok(PhysicsMode::PlaneStress),
            "planeStrain" => Ok(PhysicsMode::PlaneStrain),
            "axisymmetric" => Ok(PhysicsMode::Axisymmetric),
            "diffusion" => Ok(PhysicsMode::Diffusion),
            other => Err(Error::Configuration(format!(
                "physics mode must be \"planeStress\", \"planeStrain\", \"axisymmetric\" or \"diffusion\", got \"{}\"",
                other
            ))),
        }
    }
}
