//! Material property definitions and constitutive matrices.
//!
//! Supports isotropic linear elastic solids and isotropic diffusion.

use crate::error::{Error, Result};
use crate::physics::PhysicsMode;
use nalgebra::DMatrix;

/// Material properties for structural or diffusion analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Isotropic linear elastic solid.
    Elastic {
        /// Young's modulus E.
        youngs_modulus: f64,
        /// Poisson's ratio ν.
        poissons_ratio: f64,
    },
    /// Isotropic diffusion with diffusivity (conductivity) k.
    Diffusive { diffusivity: f64 },
}

impl Material {
    /// Create a new isotropic linear elastic material.
    ///
    /// # Arguments
    ///
    /// * `youngs_modulus` - Young's modulus E
    /// * `poissons_ratio` - Poisson's ratio ν (dimensionless, -1 < ν < 0.5)
    ///
    /// # Errors
    ///
    /// Returns error if material properties are physically invalid.
    pub fn elastic(youngs_modulus: f64, poissons_ratio: f64) -> Result<Self> {
        if !(youngs_modulus > 0.0) {
            return Err(Error::InvalidMaterial(
                "Young's modulus must be positive".into(),
            ));
        }
        if poissons_ratio <= -1.0 || poissons_ratio >= 0.5 {
            return Err(Error::InvalidMaterial(
                "Poisson's ratio must be in range (-1, 0.5)".into(),
            ));
        }
        Ok(Material::Elastic {
            youngs_modulus,
            poissons_ratio,
        })
    }

    /// Create an isotropic diffusive material.
    pub fn diffusive(diffusivity: f64) -> Result<Self> {
        if !(diffusivity > 0.0) {
            return Err(Error::InvalidMaterial("diffusivity must be positive".into()));
        }
        Ok(Material::Diffusive { diffusivity })
    }

    /// (E, ν) for elastic materials.
    pub fn elastic_constants(&self) -> Option<(f64, f64)> {
        match *self {
            Material::Elastic {
                youngs_modulus,
                poissons_ratio,
            } => Some((youngs_modulus, poissons_ratio)),
            Material::Diffusive { .. } => None,
        }
    }

    /// Shear modulus G = E / (2(1 + ν)).
    pub fn shear_modulus(&self) -> Option<f64> {
        self.elastic_constants().map(|(e, nu)| e / (2.0 * (1.0 + nu)))
    }

    /// Lamé's first parameter λ = Eν / ((1+ν)(1-2ν)).
    ///
    /// This is the factor relating σ_z to ε_x + ε_y under plane strain.
    pub fn lame_lambda(&self) -> Option<f64> {
        self.elastic_constants()
            .map(|(e, nu)| e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu)))
    }

    /// Constitutive matrix D for the given physics mode.
    ///
    /// - plane stress: 3x3 for [σ_x, σ_y, τ_xy] = D [ε_x, ε_y, γ_xy]
    /// - plane strain: 3x3
    /// - axisymmetric: 4x4 for [σ_r, σ_z, σ_θ, τ_rz]
    /// - diffusion: k I₂
    ///
    /// # Errors
    ///
    /// `Error::Configuration` when the material kind does not match the mode.
    pub fn constitutive(&self, mode: PhysicsMode) -> Result<DMatrix<f64>> {
        match (*self, mode) {
            (Material::Elastic { youngs_modulus: e, poissons_ratio: nu }, PhysicsMode::PlaneStress) => {
                let factor = e / (1.0 - nu * nu);
                Ok(DMatrix::from_row_slice(3, 3, &[
                    factor,      factor * nu, 0.0,
                    factor * nu, factor,      0.0,
                    0.0,         0.0,         factor * (1.0 - nu) / 2.0,
                ]))
            }
            (Material::Elastic { youngs_modulus: e, poissons_ratio: nu }, PhysicsMode::PlaneStrain) => {
                let factor = e / ((1.0 + nu) * (1.0 - 2.0 * nu));
                let c11 = factor * (1.0 - nu);
                let c12 = factor * nu;
                let c44 = factor * (1.0 - 2.0 * nu) / 2.0;
                Ok(DMatrix::from_row_slice(3, 3, &[
                    c11, c12, 0.0,
                    c12, c11, 0.0,
                    0.0, 0.0, c44,
                ]))
            }
            (Material::Elastic { youngs_modulus: e, poissons_ratio: nu }, PhysicsMode::Axisymmetric) => {
                let factor = e / ((1.0 + nu) * (1.0 - 2.0 * nu));
                let c11 = factor * (1.0 - nu);
                let c12 = factor * nu;
                let c44 = factor * (1.0 - 2.0 * nu) / 2.0;

                // [σ_r ]   [c11 c12 c12  0 ] [ε_r ]
                // [σ_z ] = [c12 c11 c12  0 ] [ε_z ]
                // [σ_θ ]   [c12 c12 c11  0 ] [ε_θ ]
                // [τ_rz]   [ 0   0   0  c44] [γ_rz]
                Ok(DMatrix::from_row_slice(4, 4, &[
                    c11, c12, c12, 0.0,
                    c12, c11, c12, 0.0,
                    c12, c12, c11, 0.0,
                    0.0, 0.0, 0.0, c44,
                ]))
            }
            (Material::Diffusive { diffusivity }, PhysicsMode::Diffusion) => {
                Ok(DMatrix::identity(2, 2) * diffusivity)
            }
            (Material::Elastic { .. }, PhysicsMode::Diffusion) => Err(Error::Configuration(
                "diffusion mode requires a diffusive material".into(),
            )),
            (Material::Diffusive { .. }, mode) => Err(Error::Configuration(format!(
                "{} mode requires an elastic material",
                mode
            ))),
        }
    }
}

/// String-tagged entry point: `constitutive_matrix(&material, "planeStrain")`.
///
/// Unrecognized tags fail with `Error::Configuration`.
pub fn constitutive_matrix(material: &Material, mode: &str) -> Result<DMatrix<f64>> {
    material.constitutive(mode.parse()?)
}
