//! Boundary conditions, nodal constraints and structural loads.
//!
//! A [`BoundaryCondition`] attaches a kind (temperature, convection, ...) to a
//! point, line or face of the mesh. Its value and coefficient are each a
//! [`Variation`]: constant, a polynomial in the line parameter t ∈ [0, 1], or
//! a function of the physical position (x, y).
//!
//! # Submodules
//!
//! - [`apply`] - diffusion boundary integrals and Dirichlet rows
//! - [`loads`] - consistent nodal forces from point and line loads

use crate::error::{Error, Result};
use crate::polynomial::Polynomial;
use crate::types::Point2;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod apply;
pub mod loads;

pub use apply::{apply_boundary_conditions, element_convection, element_flow, element_flux};
pub use loads::{structural_forces, LineLoad, LoadProfile, PointLoad};

/// Where a boundary condition acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Geometry {
    /// A single node.
    Point,
    /// A mesh edge, from its first node to its last.
    Line,
    /// An element face.
    Face,
}

impl FromStr for Geometry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "point" => Ok(Geometry::Point),
            "line" => Ok(Geometry::Line),
            "face" => Ok(Geometry::Face),
            other => Err(Error::Configuration(format!(
                "geometry must be \"point\", \"line\" or \"face\", got \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Geometry::Point => "point",
            Geometry::Line => "line",
            Geometry::Face => "face",
        })
    }
}

/// Physical meaning of a boundary condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Prescribed temperature (Dirichlet).
    Temperature,
    /// Convection to an ambient temperature: value T∞, coefficient h.
    Convection,
    /// Distributed flux per unit length or area.
    Flux,
    /// Total flow, distributed over the entity.
    Flow,
    /// Prescribed x displacement.
    DisplacementX,
    /// Prescribed y displacement.
    DisplacementY,
    /// Applied force along a [`Direction`].
    Force,
}

impl BoundaryKind {
    pub fn is_diffusion(self) -> bool {
        matches!(
            self,
            BoundaryKind::Temperature
                | BoundaryKind::Convection
                | BoundaryKind::Flux
                | BoundaryKind::Flow
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryKind::Temperature => "temperature",
            BoundaryKind::Convection => "convection",
            BoundaryKind::Flux => "flux",
            BoundaryKind::Flow => "flow",
            BoundaryKind::DisplacementX => "displacementX",
            BoundaryKind::DisplacementY => "displacementY",
            BoundaryKind::Force => "force",
        }
    }
}

impl FromStr for BoundaryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "temperature" => Ok(BoundaryKind::Temperature),
            "convection" => Ok(BoundaryKind::Convection),
            "flux" => Ok(BoundaryKind::Flux),
            "flow" => Ok(BoundaryKind::Flow),
            "displacementX" => Ok(BoundaryKind::DisplacementX),
            "displacementY" => Ok(BoundaryKind::DisplacementY),
            "force" => Ok(BoundaryKind::Force),
            other => Err(Error::Configuration(format!(
                "unknown boundary condition kind \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a structural load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    X,
    Y,
    /// Tangential, from the first node to the last.
    Tangent,
    /// Normal, pointing out of the element that owns the edge.
    #[default]
    Normal,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(Direction::X),
            "y" => Ok(Direction::Y),
            "t" => Ok(Direction::Tangent),
            "n" => Ok(Direction::Normal),
            other => Err(Error::Configuration(format!(
                "direction must be \"x\", \"y\", \"t\" or \"n\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Spatial variation of a boundary value or coefficient.
#[derive(Clone)]
pub enum Variation {
    Constant(f64),
    /// Polynomial in the line parameter t ∈ [0, 1] (lines only).
    Polynomial(Polynomial),
    /// Function of the physical position (x, y).
    Function(Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>),
}

impl Variation {
    /// Wrap a function of (x, y).
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Variation::Function(Arc::new(f))
    }

    /// Evaluate at line parameter `t` and physical position `point`.
    pub fn evaluate(&self, t: f64, point: &Point2) -> f64 {
        match self {
            Variation::Constant(c) => *c,
            Variation::Polynomial(p) => p.evaluate(t),
            Variation::Function(f) => f(point[0], point[1]),
        }
    }

    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Variation::Constant(c) => Some(*c),
            _ => None,
        }
    }
}

impl Default for Variation {
    fn default() -> Self {
        Variation::Constant(0.0)
    }
}

impl fmt::Debug for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variation::Constant(c) => f.debug_tuple("Constant").field(c).finish(),
            Variation::Polynomial(p) => f.debug_tuple("Polynomial").field(p).finish(),
            Variation::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<f64> for Variation {
    fn from(c: f64) -> Self {
        Variation::Constant(c)
    }
}

impl From<Polynomial> for Variation {
    fn from(p: Polynomial) -> Self {
        Variation::Polynomial(p)
    }
}

/// A boundary condition on a point, line or face.
#[derive(Debug, Clone)]
pub struct BoundaryCondition {
    geometry: Geometry,
    nodes: Vec<usize>,
    kind: BoundaryKind,
    value: Variation,
    coefficient: Variation,
    direction: Direction,
}

impl BoundaryCondition {
    /// Create a validated boundary condition.
    ///
    /// # Errors
    ///
    /// `Error::Configuration` when
    /// - a point does not have exactly 1 node, a line exactly 2, or a face at
    ///   least 3
    /// - a polynomial value or coefficient is given on a point or a face
    /// - a flow value is not constant
    pub fn new(
        geometry: Geometry,
        nodes: Vec<usize>,
        kind: BoundaryKind,
        value: Variation,
        coefficient: Variation,
        direction: Direction,
    ) -> Result<Self> {
        let count_ok = match geometry {
            Geometry::Point => nodes.len() == 1,
            Geometry::Line => nodes.len() == 2,
            Geometry::Face => nodes.len() >= 3,
        };
        if !count_ok {
            let expected = match geometry {
                Geometry::Point => "exactly 1 node",
                Geometry::Line => "exactly 2 nodes",
                Geometry::Face => "at least 3 nodes",
            };
            return Err(Error::Configuration(format!(
                "a {} boundary condition needs {}, got {}",
                geometry,
                expected,
                nodes.len()
            )));
        }
        Self::validated(geometry, nodes, kind, value, coefficient, direction)
    }

    fn validated(
        geometry: Geometry,
        nodes: Vec<usize>,
        kind: BoundaryKind,
        value: Variation,
        coefficient: Variation,
        direction: Direction,
    ) -> Result<Self> {
        if geometry != Geometry::Line {
            for (name, v) in [("value", &value), ("coefficient", &coefficient)] {
                if matches!(v, Variation::Polynomial(_)) {
                    return Err(Error::Configuration(format!(
                        "polynomial {} is only allowed on lines, not on a {}",
                        name, geometry
                    )));
                }
            }
        }
        if kind == BoundaryKind::Flow && value.as_constant().is_none() {
            return Err(Error::Configuration(
                "flow boundary conditions need a constant value".into(),
            ));
        }
        Ok(Self {
            geometry,
            nodes,
            kind,
            value,
            coefficient,
            direction,
        })
    }

    /// Point condition with zero coefficient.
    pub fn point(node: usize, kind: BoundaryKind, value: impl Into<Variation>) -> Result<Self> {
        Self::new(
            Geometry::Point,
            vec![node],
            kind,
            value.into(),
            Variation::default(),
            Direction::default(),
        )
    }

    /// Line condition with zero coefficient.
    pub fn line(a: usize, b: usize, kind: BoundaryKind, value: impl Into<Variation>) -> Result<Self> {
        Self::new(
            Geometry::Line,
            vec![a, b],
            kind,
            value.into(),
            Variation::default(),
            Direction::default(),
        )
    }

    /// Face condition with zero coefficient.
    ///
    /// Nodes follow the element ordering (3, 4 or 6 nodes) and must run
    /// counter-clockwise. A clockwise face fails with `Error::Geometry` when
    /// it is integrated.
    pub fn face(nodes: Vec<usize>, kind: BoundaryKind, value: impl Into<Variation>) -> Result<Self> {
        Self::new(
            Geometry::Face,
            nodes,
            kind,
            value.into(),
            Variation::default(),
            Direction::default(),
        )
    }

    /// Replace the coefficient (e.g. h for convection).
    pub fn with_coefficient(mut self, coefficient: impl Into<Variation>) -> Result<Self> {
        let coefficient = coefficient.into();
        if self.geometry != Geometry::Line && matches!(coefficient, Variation::Polynomial(_)) {
            return Err(Error::Configuration(format!(
                "polynomial coefficient is only allowed on lines, not on a {}",
                self.geometry
            )));
        }
        self.coefficient = coefficient;
        Ok(self)
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Copy onto refined nodes with new value and coefficient. Refined lines
    /// carry 2 or 3 nodes and refined faces 3 or 6, so only the variation
    /// rules are checked.
    pub(crate) fn refined(&self, nodes: Vec<usize>, value: Variation, coefficient: Variation) -> Result<Self> {
        Self::validated(self.geometry, nodes, self.kind, value, coefficient, self.direction)
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }

    pub fn value(&self) -> &Variation {
        &self.value
    }

    pub fn coefficient(&self) -> &Variation {
        &self.coefficient
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} (nodes {:?}): value={:?}, coefficient={:?}",
            self.kind, self.geometry, self.nodes, self.value, self.coefficient
        )
    }
}

/// Constrained axes of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintAxis {
    X,
    Y,
    XY,
}

impl FromStr for ConstraintAxis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(ConstraintAxis::X),
            "y" => Ok(ConstraintAxis::Y),
            "xy" => Ok(ConstraintAxis::XY),
            other => Err(Error::Configuration(format!(
                "constraint axis must be \"x\", \"y\" or \"xy\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Prescribed nodal displacement on one or both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    node: usize,
    x: Option<f64>,
    y: Option<f64>,
}

impl Constraint {
    /// Constraint on the given axis. `values` holds one value for `X` and
    /// `Y`, two (x then y) for `XY`.
    pub fn new(node: usize, axis: ConstraintAxis, values: &[f64]) -> Result<Self> {
        match (axis, values) {
            (ConstraintAxis::X, &[dx]) => Ok(Self::x(node, dx)),
            (ConstraintAxis::Y, &[dy]) => Ok(Self::y(node, dy)),
            (ConstraintAxis::XY, &[dx, dy]) => Ok(Self::xy(node, dx, dy)),
            _ => Err(Error::Configuration(format!(
                "constraint on {:?} got {} values",
                axis,
                values.len()
            ))),
        }
    }

    pub fn x(node: usize, dx: f64) -> Self {
        Self { node, x: Some(dx), y: None }
    }

    pub fn y(node: usize, dy: f64) -> Self {
        Self { node, x: None, y: Some(dy) }
    }

    pub fn xy(node: usize, dx: f64, dy: f64) -> Self {
        Self { node, x: Some(dx), y: Some(dy) }
    }

    pub fn node(&self) -> usize {
        self.node
    }

    pub fn axis(&self) -> ConstraintAxis {
        match (self.x, self.y) {
            (Some(_), Some(_)) => ConstraintAxis::XY,
            (Some(_), None) => ConstraintAxis::X,
            _ => ConstraintAxis::Y,
        }
    }

    /// Prescribed x displacement, if x is constrained.
    pub fn dx(&self) -> Option<f64> {
        self.x
    }

    /// Prescribed y displacement, if y is constrained.
    pub fn dy(&self) -> Option<f64> {
        self.y
    }

    /// Merge another constraint on the same node; `other` wins on shared axes.
    pub(crate) fn merge(&self, other: &Constraint) -> Self {
        Self {
            node: self.node,
            x: other.x.or(self.x),
            y: other.y.or(self.y),
        }
    }

    /// Constraint for the midpoint `node` of a line between two constrained
    /// endpoints: the axes both share, each with the mean of the two values.
    /// `None` if the endpoints share no axis.
    pub fn midpoint(a: &Constraint, b: &Constraint, node: usize) -> Option<Self> {
        let mean = |p: Option<f64>, q: Option<f64>| Some(0.5 * (p? + q?));
        let x = mean(a.x, b.x);
        let y = mean(a.y, b.y);
        if x.is_none() && y.is_none() {
            return None;
        }
        Some(Self { node, x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_count_validation() {
        assert!(BoundaryCondition::point(1, BoundaryKind::Temperature, 0.0).is_ok());
        assert!(BoundaryCondition::line(1, 2, BoundaryKind::Flux, 5.0).is_ok());
        assert!(BoundaryCondition::face(vec![1, 2, 3], BoundaryKind::Flow, 1.0).is_ok());

        for (geometry, nodes) in [
            (Geometry::Point, vec![1, 2]),
            (Geometry::Line, vec![1]),
            (Geometry::Line, vec![1, 2, 3]),
            (Geometry::Face, vec![1, 2]),
        ] {
            let result = BoundaryCondition::new(
                geometry,
                nodes,
                BoundaryKind::Temperature,
                0.0.into(),
                Variation::default(),
                Direction::Normal,
            );
            assert!(matches!(result, Err(Error::Configuration(_))));
        }
    }

    #[test]
    fn test_polynomial_only_on_lines() {
        let p = Polynomial::linear(0.0, 1.0);
        assert!(BoundaryCondition::line(1, 2, BoundaryKind::Temperature, p.clone()).is_ok());
        assert!(matches!(
            BoundaryCondition::face(vec![1, 2, 3], BoundaryKind::Flux, p.clone()),
            Err(Error::Configuration(_))
        ));
        assert!(BoundaryCondition::point(1, BoundaryKind::Temperature, p.clone()).is_err());

        let bc = BoundaryCondition::face(vec![1, 2, 3], BoundaryKind::Convection, 20.0).unwrap();
        assert!(bc.with_coefficient(p).is_err());
    }

    #[test]
    fn test_flow_must_be_constant() {
        let f = Variation::function(|x, _| x);
        let result = BoundaryCondition::line(1, 2, BoundaryKind::Flow, f);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!("line".parse::<Geometry>().unwrap(), Geometry::Line);
        assert!("node".parse::<Geometry>().is_err());
        assert_eq!("convection".parse::<BoundaryKind>().unwrap(), BoundaryKind::Convection);
        assert!("heat".parse::<BoundaryKind>().is_err());
        assert_eq!("t".parse::<Direction>().unwrap(), Direction::Tangent);
        assert_eq!("xy".parse::<ConstraintAxis>().unwrap(), ConstraintAxis::XY);
    }

    #[test]
    fn test_variation_evaluate() {
        let p = Point2::new(2.0, 3.0);
        assert_eq!(Variation::Constant(4.0).evaluate(0.5, &p), 4.0);
        assert_eq!(Variation::from(Polynomial::linear(0.0, 2.0)).evaluate(0.25, &p), 0.5);
        assert_eq!(Variation::function(|x, y| x * y).evaluate(0.0, &p), 6.0);
    }

    #[test]
    fn test_midpoint_constraint() {
        let a = Constraint::xy(1, 0.0, 2.0);
        let b = Constraint::y(2, 4.0);
        let m = Constraint::midpoint(&a, &b, 7).unwrap();
        assert_eq!(m.node(), 7);
        assert_eq!(m.axis(), ConstraintAxis::Y);
        assert_eq!(m.dy(), Some(3.0));
        assert_eq!(m.dx(), None);

        assert!(Constraint::midpoint(&Constraint::x(1, 0.0), &Constraint::y(2, 0.0), 7).is_none());
    }

    #[test]
    fn test_constraint_new() {
        assert_eq!(
            Constraint::new(3, ConstraintAxis::XY, &[1.0, 2.0]).unwrap(),
            Constraint::xy(3, 1.0, 2.0)
        );
        assert!(Constraint::new(3, ConstraintAxis::X, &[1.0, 2.0]).is_err());
    }
}
