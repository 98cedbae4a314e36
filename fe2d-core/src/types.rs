//! Core data types for 2D element computations.
//!
//! This module defines:
//! - Geometric primitives (points in the x-y or r-z plane)
//! - The in-plane stress state with its derived scalar measures

use nalgebra::{Matrix2, Vector2};

/// A point in the analysis plane. For axisymmetric models x is the radius r
/// and y is the axial coordinate z.
pub type Point2 = Vector2<f64>;

/// Stress state at a point of a 2D model.
///
/// `sigma_z` is the out-of-plane normal stress: zero for plane stress,
/// λ(ε_x + ε_y) for plane strain, and the hoop stress σ_θ for axisymmetric
/// models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneStressState {
    pub sigma_x: f64,
    pub sigma_y: f64,
    pub tau_xy: f64,
    pub sigma_z: f64,
}

impl PlaneStressState {
    /// Create a new stress state.
    pub fn new(sigma_x: f64, sigma_y: f64, tau_xy: f64, sigma_z: f64) -> Self {
        Self {
            sigma_x,
            sigma_y,
            tau_xy,
            sigma_z,
        }
    }

    /// Zero stress state.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// In-plane principal stresses (σ1, σ2) with σ1 ≥ σ2.
    ///
    /// σ1,2 = (σx+σy)/2 ± √(((σx−σy)/2)² + τxy²)
    pub fn principal(&self) -> (f64, f64) {
        let center = 0.5 * (self.sigma_x + self.sigma_y);
        let radius = (0.25 * (self.sigma_x - self.sigma_y).powi(2) + self.tau_xy.powi(2)).sqrt();
        (center + radius, center - radius)
    }

    /// Maximum principal stress.
    pub fn sigma_1(&self) -> f64 {
        self.principal().0
    }

    /// Minimum principal stress.
    pub fn sigma_2(&self) -> f64 {
        self.principal().1
    }

    /// Von Mises equivalent stress from the principal stresses and σ3 = σ_z.
    pub fn von_mises(&self) -> f64 {
        let (s1, s2) = self.principal();
        let s3 = self.sigma_z;
        (0.5 * ((s1 - s2).powi(2) + (s2 - s3).powi(2) + (s3 - s1).powi(2))).sqrt()
    }

    /// In-plane 2x2 stress matrix.
    pub fn to_matrix(&self) -> Matrix2<f64> {
        Matrix2::new(self.sigma_x, self.tau_xy, self.tau_xy, self.sigma_y)
    }
}
