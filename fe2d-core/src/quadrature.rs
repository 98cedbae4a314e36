//! Quadrature rules for numerical integration over reference domains.
//!
//! This module provides static point/weight tables for:
//! - Line integration on [0, 1] (Gauss-Legendre, odd precisions 1..=9)
//! - Triangle integration on the unit triangle (precisions 1..=7)
//! - Quadrilateral integration on [-1, 1]² (tensor products of the line rules)
//!
//! Line and triangle weights sum to 1. The integral of f over the reference
//! domain is `reference_measure() * Σ wᵢ f(pᵢ)`, so a triangle rule integrates
//! over an area of 0.5. Quadrilateral weights already include the domain
//! measure and sum to 4.
//!
//! # Usage
//!
//! ```
//! use fe2d_core::quadrature::{quadrature, QuadratureDomain};
//!
//! let rule = quadrature(QuadratureDomain::Triangle, 2).unwrap();
//! let area = rule.integrate(|_, _| 1.0);
//! assert!((area - 0.5).abs() < 1e-14);
//! ```

use crate::error::{Error, Result};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Reference domain of a quadrature rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadratureDomain {
    /// The unit interval [0, 1]; only `coords[0]` is meaningful.
    Line,
    /// The unit triangle with vertices (0,0), (1,0), (0,1).
    Triangle,
    /// The bi-unit square [-1, 1]².
    Quadrilateral,
}

impl fmt::Display for QuadratureDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuadratureDomain::Line => "line",
            QuadratureDomain::Triangle => "triangle",
            QuadratureDomain::Quadrilateral => "quadrilateral",
        })
    }
}

impl FromStr for QuadratureDomain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "line" => Ok(QuadratureDomain::Line),
            "triangle" => Ok(QuadratureDomain::Triangle),
            "quadrilateral" | "quad" => Ok(QuadratureDomain::Quadrilateral),
            other => Err(Error::Configuration(format!(
                "unknown quadrature domain \"{}\"",
                other
            ))),
        }
    }
}

/// A quadrature point with reference coordinates and weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraturePoint {
    /// Reference coordinates.
    /// - Line: [t, 0] with t in [0, 1]
    /// - Triangle: [ξ, η] with ξ, η ≥ 0 and ξ + η ≤ 1
    /// - Quadrilateral: [ξ, η] in [-1, 1]²
    pub coords: [f64; 2],
    /// Integration weight.
    pub weight: f64,
}

impl QuadraturePoint {
    /// Create a new quadrature point.
    pub const fn new(coords: [f64; 2], weight: f64) -> Self {
        Self { coords, weight }
    }

    /// First reference coordinate (t on lines).
    #[inline]
    pub fn xi(&self) -> f64 {
        self.coords[0]
    }

    /// Second reference coordinate.
    #[inline]
    pub fn eta(&self) -> f64 {
        self.coords[1]
    }
}

/// A validated quadrature rule.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    domain: QuadratureDomain,
    precision: usize,
    points: Cow<'static, [QuadraturePoint]>,
}

impl QuadratureRule {
    pub fn domain(&self) -> QuadratureDomain {
        self.domain
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn points(&self) -> &[QuadraturePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuadraturePoint> {
        self.points.iter()
    }

    /// Factor converting `Σ wᵢ f(pᵢ)` into the integral over the reference domain.
    pub fn reference_measure(&self) -> f64 {
        match self.domain {
            QuadratureDomain::Line => 1.0,
            QuadratureDomain::Triangle => 0.5,
            QuadratureDomain::Quadrilateral => 1.0,
        }
    }

    /// Integrate `f(ξ, η)` over the reference domain.
    pub fn integrate<F: Fn(f64, f64) -> f64>(&self, f: F) -> f64 {
        self.reference_measure()
            * self
                .points
                .iter()
                .map(|p| p.weight * f(p.coords[0], p.coords[1]))
                .sum::<f64>()
    }
}

impl<'a> IntoIterator for &'a QuadratureRule {
    type Item = &'a QuadraturePoint;
    type IntoIter = std::slice::Iter<'a, QuadraturePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Look up the quadrature rule for a domain and precision.
///
/// # Errors
///
/// `Error::Configuration` for any precision outside the tabulated set:
/// 1..=7 for triangles, 1, 3, 5, 7, 9 for lines and quadrilaterals.
///
/// Triangle precision p is exact for polynomials of degree p, except the
/// 9-point rule at precision 6 which is exact through degree 5.
pub fn quadrature(domain: QuadratureDomain, precision: usize) -> Result<QuadratureRule> {
    let points: Cow<'static, [QuadraturePoint]> = match domain {
        QuadratureDomain::Line => Cow::Borrowed(line_table(precision)?),
        QuadratureDomain::Triangle => Cow::Borrowed(triangle_table(precision)?),
        QuadratureDomain::Quadrilateral => {
            let line = line_table(precision)?;
            let mut points = Vec::with_capacity(line.len() * line.len());
            for pj in line {
                for pi in line {
                    points.push(QuadraturePoint::new(
                        [2.0 * pi.coords[0] - 1.0, 2.0 * pj.coords[0] - 1.0],
                        4.0 * pi.weight * pj.weight,
                    ));
                }
            }
            Cow::Owned(points)
        }
    };
    Ok(QuadratureRule {
        domain,
        precision,
        points,
    })
}

fn line_table(precision: usize) -> Result<&'static [QuadraturePoint]> {
    match precision {
        1 => Ok(&LINE_P1),
        3 => Ok(&LINE_P3),
        5 => Ok(&LINE_P5),
        7 => Ok(&LINE_P7),
        9 => Ok(&LINE_P9),
        _ => Err(Error::Configuration(format!(
            "line quadrature precision must be 1, 3, 5, 7 or 9, got {}",
            precision
        ))),
    }
}

fn triangle_table(precision: usize) -> Result<&'static [QuadraturePoint]> {
    match precision {
        1 => Ok(&TRI_P1),
        2 => Ok(&TRI_P2),
        3 => Ok(&TRI_P3),
        4 => Ok(&TRI_P4),
        5 => Ok(&TRI_P5),
        6 => Ok(&TRI_P6),
        7 => Ok(&TRI_P7),
        _ => Err(Error::Configuration(format!(
            "triangle quadrature precision must be in 1..=7, got {}",
            precision
        ))),
    }
}

const fn lp(t: f64, w: f64) -> QuadraturePoint {
    QuadraturePoint::new([t, 0.0], w)
}

const fn tp(xi: f64, eta: f64, w: f64) -> QuadraturePoint {
    QuadraturePoint::new([xi, eta], w)
}

// Gauss-Legendre on [0, 1].

static LINE_P1: [QuadraturePoint; 1] = [lp(0.5, 1.0)];

static LINE_P3: [QuadraturePoint; 2] = [
    lp(0.21132486540518713, 0.5),
    lp(0.7886751345948129, 0.5),
];

static LINE_P5: [QuadraturePoint; 3] = [
    lp(0.1127016653792583, 0.2777777777777778),
    lp(0.5, 0.4444444444444444),
    lp(0.8872983346207417, 0.2777777777777778),
];

static LINE_P7: [QuadraturePoint; 4] = [
    lp(0.06943184420297371, 0.17392742256872692),
    lp(0.33000947820757187, 0.32607257743127307),
    lp(0.6699905217924281, 0.32607257743127307),
    lp(0.9305681557970263, 0.17392742256872692),
];

static LINE_P9: [QuadraturePoint; 5] = [
    lp(0.046910077030668, 0.11846344252809454),
    lp(0.23076534494715845, 0.23931433524968326),
    lp(0.5, 0.28444444444444444),
    lp(0.7692346550528415, 0.23931433524968326),
    lp(0.953089922969332, 0.11846344252809454),
];

// Symmetric triangle rules on the unit triangle.

static TRI_P1: [QuadraturePoint; 1] = [tp(1.0 / 3.0, 1.0 / 3.0, 1.0)];

static TRI_P2: [QuadraturePoint; 3] = [
    tp(0.5, 0.0, 1.0 / 3.0),
    tp(0.0, 0.5, 1.0 / 3.0),
    tp(0.5, 0.5, 1.0 / 3.0),
];

static TRI_P3: [QuadraturePoint; 4] = [
    tp(1.0 / 3.0, 1.0 / 3.0, -27.0 / 48.0),
    tp(0.6, 0.2, 25.0 / 48.0),
    tp(0.2, 0.6, 25.0 / 48.0),
    tp(0.2, 0.2, 25.0 / 48.0),
];

static TRI_P4: [QuadraturePoint; 6] = {
    const A: f64 = 0.816847572980459;
    const B: f64 = 0.091576213509771;
    const C: f64 = 0.108103018168070;
    const D: f64 = 0.445948490915965;
    const V: f64 = 0.109951743655322;
    const W: f64 = 0.223381589678011;
    [
        tp(A, B, V),
        tp(B, A, V),
        tp(B, B, V),
        tp(C, D, W),
        tp(D, C, W),
        tp(D, D, W),
    ]
};

static TRI_P5: [QuadraturePoint; 7] = {
    const A: f64 = 1.0 / 3.0;
    const B: f64 = 0.7974269853530873;
    const C: f64 = 0.10128650732345633;
    const D: f64 = 0.05971587178976981;
    const E: f64 = 0.47014206410511505;
    const U: f64 = 0.225;
    const V: f64 = 0.12593918054482715;
    const W: f64 = 0.13239415278850618;
    [
        tp(A, A, U),
        tp(B, C, V),
        tp(C, B, V),
        tp(C, C, V),
        tp(D, E, W),
        tp(E, D, W),
        tp(E, E, W),
    ]
};

static TRI_P6: [QuadraturePoint; 9] = {
    const A: f64 = 0.124949503233232;
    const B: f64 = 0.437525248383384;
    const C: f64 = 0.797112651860071;
    const D: f64 = 0.165409927389841;
    const E: f64 = 0.037477420750088;
    const U: f64 = 0.205950504760887;
    const V: f64 = 0.063691414286223;
    [
        tp(A, B, U),
        tp(B, A, U),
        tp(B, B, U),
        tp(C, D, V),
        tp(C, E, V),
        tp(D, C, V),
        tp(D, E, V),
        tp(E, C, V),
        tp(E, D, V),
    ]
};

static TRI_P7: [QuadraturePoint; 13] = {
    const H: f64 = 1.0 / 3.0;
    const A: f64 = 0.479308067841923;
    const B: f64 = 0.260345966079038;
    const C: f64 = 0.869739794195568;
    const D: f64 = 0.065130102902216;
    const E: f64 = 0.638444188569809;
    const F: f64 = 0.312865496004875;
    const G: f64 = 0.048690315425316;
    const W: f64 = -0.149570044467670;
    const T: f64 = 0.175615257433204;
    const U: f64 = 0.053347235608839;
    const V: f64 = 0.077113760890257;
    [
        tp(H, H, W),
        tp(A, B, T),
        tp(B, A, T),
        tp(B, B, T),
        tp(C, D, U),
        tp(D, C, U),
        tp(D, D, U),
        tp(E, F, V),
        tp(E, G, V),
        tp(F, E, V),
        tp(F, G, V),
        tp(G, E, V),
        tp(G, F, V),
    ]
};
