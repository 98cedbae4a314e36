//! Element kernel: stiffness integration and field recovery.
//!
//! The kernel evaluates one element at a time:
//! 1. Build B at a reference point (see [`strain_displacement`])
//! 2. Strain ε = B uₑ
//! 3. Stress σ = D ε (flux-like D∇T for diffusion)
//! 4. Stiffness K = ∫ Bᵀ D B t dA
//!
//! For the CST the integrand is constant in planar modes and K is evaluated
//! in closed form at the centroid. LST and Q4 integrate numerically with
//! the family's default precision, overridable through [`KernelOptions`].
//! In axisymmetric mode the thickness is replaced by 2πr at each point.

use crate::element::mapping::check_coords;
use crate::element::{strain_displacement, ElementType, StrainOperator};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::physics::PhysicsMode;
use crate::quadrature::quadrature;
use crate::types::{PlaneStressState, Point2};
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Kernel configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelOptions {
    /// Out-of-plane thickness. Ignored in axisymmetric mode.
    pub thickness: f64,
    /// Quadrature precision for stiffness integration (family default if None).
    pub precision: Option<usize>,
}

impl Default for KernelOptions {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            precision: None,
        }
    }
}

/// Scalar field that can be recovered at a point of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOutput {
    /// σ_x (σ_r in axisymmetric mode).
    SigmaX,
    /// σ_y (σ_z in axisymmetric mode).
    SigmaY,
    /// τ_xy (τ_rz).
    TauXY,
    /// Maximum in-plane principal stress.
    Sigma1,
    /// Minimum in-plane principal stress.
    Sigma2,
    /// Von Mises equivalent stress.
    VonMises,
    /// Hoop stress σ_θ (axisymmetric only).
    SigmaTheta,
    EpsilonX,
    EpsilonY,
    GammaXY,
    /// Hoop strain ε_θ (axisymmetric only).
    EpsilonTheta,
    /// Diffusive flux q = −D∇T, x component.
    FluxX,
    /// Diffusive flux, y component.
    FluxY,
    /// ∂T/∂x.
    GradX,
    /// ∂T/∂y.
    GradY,
    /// Jacobian determinant (any mode).
    JacobianDet,
}

impl FieldOutput {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldOutput::SigmaX => "sigx",
            FieldOutput::SigmaY => "sigy",
            FieldOutput::TauXY => "tauxy",
            FieldOutput::Sigma1 => "sig1",
            FieldOutput::Sigma2 => "sig2",
            FieldOutput::VonMises => "VM",
            FieldOutput::SigmaTheta => "sigtheta",
            FieldOutput::EpsilonX => "epsx",
            FieldOutput::EpsilonY => "epsy",
            FieldOutput::GammaXY => "gammaxy",
            FieldOutput::EpsilonTheta => "epstheta",
            FieldOutput::FluxX => "qx",
            FieldOutput::FluxY => "qy",
            FieldOutput::GradX => "gradx",
            FieldOutput::GradY => "grady",
            FieldOutput::JacobianDet => "J",
        }
    }

    /// Whether the output is defined for `mode`.
    pub fn is_defined_for(self, mode: PhysicsMode) -> bool {
        use FieldOutput::*;
        match self {
            JacobianDet => true,
            FluxX | FluxY | GradX | GradY => mode == PhysicsMode::Diffusion,
            SigmaTheta | EpsilonTheta => mode == PhysicsMode::Axisymmetric,
            _ => mode.is_structural(),
        }
    }

    fn needs_material(self) -> bool {
        !matches!(
            self,
            FieldOutput::EpsilonX
                | FieldOutput::EpsilonY
                | FieldOutput::GammaXY
                | FieldOutput::EpsilonTheta
                | FieldOutput::GradX
                | FieldOutput::GradY
                | FieldOutput::JacobianDet
        )
    }
}

impl fmt::Display for FieldOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldOutput {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        use FieldOutput::*;
        Ok(match s {
            "sigx" => SigmaX,
            "sigy" => SigmaY,
            "tauxy" => TauXY,
            "sig1" => Sigma1,
            "sig2" => Sigma2,
            "VM" => VonMises,
            "sigtheta" => SigmaTheta,
            "epsx" => EpsilonX,
            "epsy" => EpsilonY,
            "gammaxy" => GammaXY,
            "epstheta" => EpsilonTheta,
            "qx" => FluxX,
            "qy" => FluxY,
            "gradx" => GradX,
            "grady" => GradY,
            "J" => JacobianDet,
            other => {
                return Err(Error::OutputRequest(format!(
                    "unknown output \"{}\"",
                    other
                )))
            }
        })
    }
}

/// Element-level kernel for one family and physics mode.
#[derive(Debug, Clone, Copy)]
pub struct ElementKernel {
    ty: ElementType,
    mode: PhysicsMode,
    options: KernelOptions,
}

impl ElementKernel {
    /// Create a kernel.
    ///
    /// # Errors
    ///
    /// `Error::Configuration` if the thickness is not positive in a planar mode.
    pub fn new(ty: ElementType, mode: PhysicsMode, options: KernelOptions) -> Result<Self> {
        if mode != PhysicsMode::Axisymmetric && !(options.thickness > 0.0) {
            return Err(Error::Configuration(format!(
                "thickness must be positive, got {}",
                options.thickness
            )));
        }
        Ok(Self { ty, mode, options })
    }

    pub fn element_type(&self) -> ElementType {
        self.ty
    }

    pub fn mode(&self) -> PhysicsMode {
        self.mode
    }

    pub fn options(&self) -> &KernelOptions {
        &self.options
    }

    /// Degrees of freedom of one element.
    pub fn n_dofs(&self) -> usize {
        self.ty.n_nodes() * self.mode.dofs_per_node()
    }

    fn operator(&self, coords: &[Point2], xi: f64, eta: f64) -> Result<StrainOperator> {
        strain_displacement(self.ty, coords, xi, eta, self.mode)
    }

    /// Thickness (or 2πr) at an evaluated point.
    fn thickness_at(&self, op: &StrainOperator) -> f64 {
        match op.radius {
            Some(r) => 2.0 * PI * r,
            None => self.options.thickness,
        }
    }

    fn check_d(&self, d: &DMatrix<f64>) -> Result<()> {
        let n = self.mode.strain_components();
        if d.shape() != (n, n) {
            return Err(Error::Configuration(format!(
                "{} mode needs a {}x{} constitutive matrix, got {}x{}",
                self.mode,
                n,
                n,
                d.nrows(),
                d.ncols()
            )));
        }
        Ok(())
    }

    fn check_u(&self, u: &[f64]) -> Result<()> {
        if u.len() != self.n_dofs() {
            return Err(Error::Configuration(format!(
                "{} element in {} mode has {} DOFs, got {} values",
                self.ty,
                self.mode,
                self.n_dofs(),
                u.len()
            )));
        }
        Ok(())
    }

    fn precision(&self) -> usize {
        self.options
            .precision
            .unwrap_or_else(|| self.ty.family().default_precision(self.mode))
    }

    /// Element stiffness matrix K = ∫ Bᵀ D B t dA.
    ///
    /// # Errors
    ///
    /// - `Error::Configuration` if D does not match the mode or the precision
    ///   is not tabulated
    /// - `Error::Geometry` if the element is degenerate or inverted at any
    ///   integration point
    pub fn stiffness(&self, coords: &[Point2], d: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        check_coords(self.ty, coords);
        self.check_d(d)?;

        if self.ty == ElementType::Cst {
            let (xi, eta) = self.ty.family().centroid();
            let op = self.operator(coords, xi, eta)?;
            let area = 0.5 * op.det_j;
            return Ok(op.b.transpose() * d * &op.b * (area * self.thickness_at(&op)));
        }

        let rule = quadrature(self.ty.family().quadrature_domain(), self.precision())?;
        let measure = rule.reference_measure();
        let mut k = DMatrix::zeros(self.n_dofs(), self.n_dofs());
        for gp in &rule {
            let op = self.operator(coords, gp.xi(), gp.eta())?;
            let factor = measure * gp.weight * op.det_j * self.thickness_at(&op);
            k += op.b.transpose() * d * &op.b * factor;
        }
        Ok(k)
    }

    /// Strain vector ε = B u at (ξ, η). For diffusion this is ∇T.
    pub fn strain(&self, coords: &[Point2], u: &[f64], xi: f64, eta: f64) -> Result<DVector<f64>> {
        self.check_u(u)?;
        let op = self.operator(coords, xi, eta)?;
        Ok(&op.b * DVector::from_column_slice(u))
    }

    /// Stress vector σ = D B u at (ξ, η). For diffusion this is D∇T.
    pub fn stress(
        &self,
        coords: &[Point2],
        u: &[f64],
        xi: f64,
        eta: f64,
        d: &DMatrix<f64>,
    ) -> Result<DVector<f64>> {
        self.check_d(d)?;
        Ok(d * self.strain(coords, u, xi, eta)?)
    }

    /// Stress state with principal stresses and von Mises.
    ///
    /// The out-of-plane stress is zero in plane stress, λ(ε_x + ε_y) in plane
    /// strain, and the hoop stress in axisymmetric mode. Using σ_θ there
    /// departs from the planar rule (σ_3 = 0 outside plane strain) so that
    /// von Mises and the principal stresses include the hoop component.
    pub fn stress_state(
        &self,
        coords: &[Point2],
        u: &[f64],
        xi: f64,
        eta: f64,
        material: &Material,
    ) -> Result<PlaneStressState> {
        if !self.mode.is_structural() {
            return Err(Error::OutputRequest(
                "stress state is not defined in diffusion mode".into(),
            ));
        }
        let d = material.constitutive(self.mode)?;
        let eps = self.strain(coords, u, xi, eta)?;
        let sig = &d * &eps;
        Ok(match self.mode {
            PhysicsMode::Axisymmetric => PlaneStressState::new(sig[0], sig[1], sig[3], sig[2]),
            PhysicsMode::PlaneStrain => {
                let lambda = material.lame_lambda().unwrap_or(0.0);
                PlaneStressState::new(sig[0], sig[1], sig[2], lambda * (eps[0] + eps[1]))
            }
            _ => PlaneStressState::new(sig[0], sig[1], sig[2], 0.0),
        })
    }

    /// Recover one scalar output at (ξ, η).
    ///
    /// `material` may be `None` for outputs that need no constitutive data
    /// (strains, gradients, the Jacobian determinant).
    ///
    /// # Errors
    ///
    /// `Error::OutputRequest` if `output` is not defined in this mode, or if
    /// it needs a material and none was given.
    pub fn output(
        &self,
        coords: &[Point2],
        u: &[f64],
        xi: f64,
        eta: f64,
        material: Option<&Material>,
        output: FieldOutput,
    ) -> Result<f64> {
        if !output.is_defined_for(self.mode) {
            return Err(Error::OutputRequest(format!(
                "output \"{}\" is not defined in {} mode",
                output, self.mode
            )));
        }
        if output == FieldOutput::JacobianDet {
            return Ok(crate::element::jacobian(self.ty, coords, xi, eta).determinant);
        }

        let axisym = self.mode == PhysicsMode::Axisymmetric;
        let shear = if axisym { 3 } else { 2 };
        if !output.needs_material() {
            let eps = self.strain(coords, u, xi, eta)?;
            return Ok(match output {
                FieldOutput::EpsilonX | FieldOutput::GradX => eps[0],
                FieldOutput::EpsilonY | FieldOutput::GradY => eps[1],
                FieldOutput::GammaXY => eps[shear],
                _ => eps[2], // EpsilonTheta
            });
        }

        let material = material.ok_or_else(|| {
            Error::OutputRequest(format!("output \"{}\" requires a material", output))
        })?;

        if self.mode == PhysicsMode::Diffusion {
            let d = material.constitutive(self.mode)?;
            let q = -(d * self.strain(coords, u, xi, eta)?);
            return Ok(if output == FieldOutput::FluxX { q[0] } else { q[1] });
        }

        let s = self.stress_state(coords, u, xi, eta, material)?;
        Ok(match output {
            FieldOutput::SigmaX => s.sigma_x,
            FieldOutput::SigmaY => s.sigma_y,
            FieldOutput::TauXY => s.tau_xy,
            FieldOutput::Sigma1 => s.sigma_1(),
            FieldOutput::Sigma2 => s.sigma_2(),
            FieldOutput::VonMises => s.von_mises(),
            _ => s.sigma_z, // SigmaTheta
        })
    }

    /// Element volume: area·t, or 2π∫r dA for axisymmetric elements.
    pub fn volume(&self, coords: &[Point2]) -> Result<f64> {
        check_coords(self.ty, coords);
        let family = self.ty.family();
        // exact for r · det J on straight-sided elements
        let precision = family.default_precision(PhysicsMode::Axisymmetric);
        let rule = quadrature(family.quadrature_domain(), precision)?;
        let mut v = 0.0;
        for gp in &rule {
            let jac = crate::element::jacobian(self.ty, coords, gp.xi(), gp.eta());
            jac.checked_inverse()?;
            let t = match self.mode {
                PhysicsMode::Axisymmetric => {
                    2.0 * PI * crate::element::map_to_physical(self.ty, coords, gp.xi(), gp.eta())[0]
                }
                _ => self.options.thickness,
            };
            v += rule.reference_measure() * gp.weight * jac.determinant * t;
        }
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]
    }

    fn lst_from(c: &[Point2]) -> Vec<Point2> {
        vec![
            c[0],
            c[1],
            c[2],
            (c[1] + c[2]) * 0.5,
            (c[2] + c[0]) * 0.5,
            (c[0] + c[1]) * 0.5,
        ]
    }

    fn rectangle() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    fn kernel(ty: ElementType, mode: PhysicsMode) -> ElementKernel {
        ElementKernel::new(ty, mode, KernelOptions::default()).unwrap()
    }

    fn assert_symmetric(k: &DMatrix<f64>) {
        for i in 0..k.nrows() {
            for j in 0..k.ncols() {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-10, max_relative = 1e-10);
            }
        }
    }

    #[test]
    fn test_cst_golden_stiffness() {
        let mat = Material::elastic(1.0, 0.0).unwrap();
        let d = mat.constitutive(PhysicsMode::PlaneStress).unwrap();
        let k = kernel(ElementType::Cst, PhysicsMode::PlaneStress)
            .stiffness(&unit_triangle(), &d)
            .unwrap();

        #[rustfmt::skip]
        let expected = DMatrix::from_row_slice(6, 6, &[
             0.75,  0.25, -0.5, -0.25, -0.25,  0.0,
             0.25,  0.75,  0.0, -0.25, -0.25, -0.5,
            -0.5,   0.0,   0.5,  0.0,   0.0,   0.0,
            -0.25, -0.25,  0.0,  0.25,  0.25,  0.0,
            -0.25, -0.25,  0.0,  0.25,  0.25,  0.0,
             0.0,  -0.5,   0.0,  0.0,   0.0,   0.5,
        ]);
        assert_relative_eq!(k, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_stiffness_symmetric_with_rigid_modes() {
        let mat = Material::elastic(210e3, 0.3).unwrap();
        let tri = vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.5),
            Point2::new(1.0, 2.0),
        ];
        for (ty, coords) in [
            (ElementType::Cst, tri.clone()),
            (ElementType::Lst, lst_from(&tri)),
            (ElementType::Q4, rectangle()),
        ] {
            for mode in [PhysicsMode::PlaneStress, PhysicsMode::PlaneStrain] {
                let d = mat.constitutive(mode).unwrap();
                let k = kernel(ty, mode).stiffness(&coords, &d).unwrap();
                assert_symmetric(&k);

                // Translations and rotation produce no forces.
                let n = coords.len();
                let tx = DVector::from_fn(2 * n, |i, _| if i % 2 == 0 { 1.0 } else { 0.0 });
                let ty_ = DVector::from_fn(2 * n, |i, _| if i % 2 == 1 { 1.0 } else { 0.0 });
                let rot = DVector::from_fn(2 * n, |i, _| {
                    let p = coords[i / 2];
                    if i % 2 == 0 { -p[1] } else { p[0] }
                });
                for mode_vec in [tx, ty_, rot] {
                    let f = &k * mode_vec;
                    assert!(f.amax() < 1e-6 * k.amax(), "{} {}: rigid mode loaded", ty, mode);
                }
            }
        }
    }

    #[test]
    fn test_lst_reduces_to_cst_energy_for_linear_field() {
        let tri = unit_triangle();
        let mat = Material::elastic(1.0, 0.25).unwrap();
        let d = mat.constitutive(PhysicsMode::PlaneStress).unwrap();
        let k3 = kernel(ElementType::Cst, PhysicsMode::PlaneStress).stiffness(&tri, &d).unwrap();
        let lst = lst_from(&tri);
        let k6 = kernel(ElementType::Lst, PhysicsMode::PlaneStress).stiffness(&lst, &d).unwrap();

        let u3 = DVector::from_iterator(6, tri.iter().flat_map(|p| [0.1 * p[0] + 0.02 * p[1], -0.05 * p[1]]));
        let u6 = DVector::from_iterator(12, lst.iter().flat_map(|p| [0.1 * p[0] + 0.02 * p[1], -0.05 * p[1]]));
        let e3 = u3.dot(&(&k3 * &u3));
        let e6 = u6.dot(&(&k6 * &u6));
        assert_relative_eq!(e3, e6, epsilon = 1e-12);
    }

    #[test]
    fn test_q4_stiffness_scales_with_thickness() {
        let mat = Material::elastic(1.0, 0.3).unwrap();
        let d = mat.constitutive(PhysicsMode::PlaneStress).unwrap();
        let k1 = kernel(ElementType::Q4, PhysicsMode::PlaneStress).stiffness(&rectangle(), &d).unwrap();
        let opts = KernelOptions { thickness: 2.5, precision: None };
        let k2 = ElementKernel::new(ElementType::Q4, PhysicsMode::PlaneStress, opts)
            .unwrap()
            .stiffness(&rectangle(), &d)
            .unwrap();
        assert_relative_eq!(k2, k1 * 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_diffusion_stiffness_row_sums_vanish() {
        let mat = Material::diffusive(4.0).unwrap();
        let d = mat.constitutive(PhysicsMode::Diffusion).unwrap();
        for (ty, coords) in [
            (ElementType::Cst, unit_triangle()),
            (ElementType::Lst, lst_from(&unit_triangle())),
            (ElementType::Q4, rectangle()),
        ] {
            let k = kernel(ty, PhysicsMode::Diffusion).stiffness(&coords, &d).unwrap();
            assert_eq!(k.nrows(), ty.n_nodes());
            for row in k.row_iter() {
                assert_relative_eq!(row.sum(), 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_axisymmetric_stiffness_symmetric() {
        let mat = Material::elastic(1.0, 0.3).unwrap();
        let d = mat.constitutive(PhysicsMode::Axisymmetric).unwrap();
        let coords: Vec<Point2> = rectangle().iter().map(|p| p + Point2::new(1.0, 0.0)).collect();
        let k = kernel(ElementType::Q4, PhysicsMode::Axisymmetric).stiffness(&coords, &d).unwrap();
        assert_eq!(k.shape(), (8, 8));
        assert_symmetric(&k);
        // Axial translation is rigid; radial translation is not (hoop strain).
        let uz = DVector::from_fn(8, |i, _| if i % 2 == 1 { 1.0 } else { 0.0 });
        let ur = DVector::from_fn(8, |i, _| if i % 2 == 0 { 1.0 } else { 0.0 });
        assert!((&k * uz).amax() < 1e-10);
        assert!((&k * ur).amax() > 1e-3);
    }

    #[test]
    fn test_axisymmetric_cst_closed_form() {
        // r̄ = 4/3, A = 1/2, ψ/r = 1/4 at the centroid
        let coords = vec![
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 1.0),
        ];
        let d = Material::elastic(1.0, 0.0).unwrap().constitutive(PhysicsMode::Axisymmetric).unwrap();
        let k = kernel(ElementType::Cst, PhysicsMode::Axisymmetric).stiffness(&coords, &d).unwrap();

        #[rustfmt::skip]
        let b = DMatrix::from_row_slice(4, 6, &[
            -1.0,   0.0, 1.0,  0.0, 0.0,  0.0,
             0.0,  -1.0, 0.0,  0.0, 0.0,  1.0,
             0.25,  0.0, 0.25, 0.0, 0.25, 0.0,
            -1.0,  -1.0, 0.0,  1.0, 1.0,  0.0,
        ]);
        let expected = b.transpose() * &d * &b * (2.0 * PI * (4.0 / 3.0) * 0.5);
        assert_relative_eq!(k, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_axisymmetric_triangles_rigid_axial_translation() {
        let mat = Material::elastic(1.0, 0.3).unwrap();
        let d = mat.constitutive(PhysicsMode::Axisymmetric).unwrap();
        let shifted = vec![
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 1.0),
        ];
        for (ty, coords) in [
            (ElementType::Cst, shifted.clone()),
            (ElementType::Lst, lst_from(&shifted)),
            // touches the axis at r = 0
            (ElementType::Lst, lst_from(&unit_triangle())),
        ] {
            let k = kernel(ty, PhysicsMode::Axisymmetric).stiffness(&coords, &d).unwrap();
            let n = coords.len();
            assert_eq!(k.shape(), (2 * n, 2 * n));
            assert_symmetric(&k);
            let uz = DVector::from_fn(2 * n, |i, _| if i % 2 == 1 { 1.0 } else { 0.0 });
            let ur = DVector::from_fn(2 * n, |i, _| if i % 2 == 0 { 1.0 } else { 0.0 });
            assert!((&k * uz).amax() < 1e-10 * k.amax(), "{}: axial translation loaded", ty);
            assert!((&k * ur).amax() > 1e-3, "{}: radial translation unloaded", ty);
        }
    }

    #[test]
    fn test_mismatched_d_rejected() {
        let d = Material::elastic(1.0, 0.3).unwrap().constitutive(PhysicsMode::PlaneStress).unwrap();
        let err = kernel(ElementType::Cst, PhysicsMode::Axisymmetric)
            .stiffness(&unit_triangle(), &d)
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_inverted_element_reported() {
        let mut coords = rectangle();
        coords.swap(1, 3);
        let d = Material::elastic(1.0, 0.3).unwrap().constitutive(PhysicsMode::PlaneStress).unwrap();
        let err = kernel(ElementType::Q4, PhysicsMode::PlaneStress)
            .stiffness(&coords, &d)
            .unwrap_err();
        assert!(matches!(err, Error::Geometry(_)));
    }

    #[test]
    fn test_nonpositive_thickness_rejected() {
        let opts = KernelOptions { thickness: 0.0, precision: None };
        assert!(ElementKernel::new(ElementType::Cst, PhysicsMode::PlaneStress, opts).is_err());
        assert!(ElementKernel::new(ElementType::Cst, PhysicsMode::Axisymmetric, opts).is_ok());
    }

    #[test]
    fn test_uniaxial_stress_outputs() {
        // u = 0.001 x on a unit square, plane stress, ν = 0.25
        let mat = Material::elastic(1000.0, 0.25).unwrap();
        let coords = rectangle();
        let u: Vec<f64> = coords.iter().flat_map(|p| [0.001 * p[0], -0.00025 * p[1]]).collect();
        let k = kernel(ElementType::Q4, PhysicsMode::PlaneStress);
        let out = |o: FieldOutput| k.output(&coords, &u, 0.2, -0.3, Some(&mat), o).unwrap();
        assert_relative_eq!(out(FieldOutput::SigmaX), 1.0, epsilon = 1e-12);
        assert_relative_eq!(out(FieldOutput::SigmaY), 0.0, epsilon = 1e-12);
        assert_relative_eq!(out(FieldOutput::Sigma1), 1.0, epsilon = 1e-12);
        assert_relative_eq!(out(FieldOutput::VonMises), 1.0, epsilon = 1e-12);
        assert_relative_eq!(out(FieldOutput::EpsilonX), 0.001, epsilon = 1e-15);
        assert_relative_eq!(out(FieldOutput::JacobianDet), 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_plane_strain_out_of_plane_stress() {
        let mat = Material::elastic(1.0, 0.25).unwrap();
        let tri = unit_triangle();
        let u: Vec<f64> = tri.iter().flat_map(|p| [0.01 * p[0], 0.01 * p[1]]).collect();
        let s = kernel(ElementType::Cst, PhysicsMode::PlaneStrain)
            .stress_state(&tri, &u, 0.3, 0.3, &mat)
            .unwrap();
        // λ = 0.4, ε_x + ε_y = 0.02
        assert_relative_eq!(s.sigma_z, 0.008, epsilon = 1e-14);
    }

    #[test]
    fn test_diffusion_flux_opposes_gradient() {
        let mat = Material::diffusive(2.0).unwrap();
        let tri = unit_triangle();
        let t: Vec<f64> = tri.iter().map(|p| 5.0 * p[0]).collect();
        let k = kernel(ElementType::Cst, PhysicsMode::Diffusion);
        assert_relative_eq!(k.output(&tri, &t, 0.2, 0.2, None, FieldOutput::GradX).unwrap(), 5.0);
        assert_relative_eq!(k.output(&tri, &t, 0.2, 0.2, Some(&mat), FieldOutput::FluxX).unwrap(), -10.0);
    }

    #[test]
    fn test_output_not_defined_for_mode() {
        let tri = unit_triangle();
        let k = kernel(ElementType::Cst, PhysicsMode::Diffusion);
        let err = k.output(&tri, &[0.0; 3], 0.2, 0.2, None, FieldOutput::SigmaX).unwrap_err();
        assert!(matches!(err, Error::OutputRequest(_)));

        let k = kernel(ElementType::Cst, PhysicsMode::PlaneStress);
        let err = k.output(&tri, &[0.0; 6], 0.2, 0.2, None, FieldOutput::SigmaTheta).unwrap_err();
        assert!(matches!(err, Error::OutputRequest(_)));

        assert!(matches!("sigma".parse::<FieldOutput>(), Err(Error::OutputRequest(_))));
        assert_eq!("VM".parse::<FieldOutput>().unwrap(), FieldOutput::VonMises);
    }

    #[test]
    fn test_axisymmetric_volume_is_ring() {
        // Rectangle r in [1, 3], z in [0, 1]: V = π (3² − 1²) · 1
        let coords: Vec<Point2> = rectangle().iter().map(|p| p + Point2::new(1.0, 0.0)).collect();
        let v = kernel(ElementType::Q4, PhysicsMode::Axisymmetric).volume(&coords).unwrap();
        assert_relative_eq!(v, 8.0 * PI, epsilon = 1e-10);
        let a = kernel(ElementType::Cst, PhysicsMode::PlaneStress).volume(&unit_triangle()).unwrap();
        assert_relative_eq!(a, 0.5, epsilon = 1e-14);
    }
}
