//! Mesh refinement of CST meshes.
//!
//! Both operations insert one midpoint node per distinct edge, numbered
//! `n_nodes + line + base` in edge-registration order:
//!
//! ```text
//!         c2                        c2
//!        /  \                      /  \
//!       /    \                  m20 -- m12
//!      /      \                /  \    /  \
//!    c0 ------ c1            c0 -- m01 --- c1
//!
//!   promote_to_lst: [c0, c1, c2, m12, m20, m01]
//!   quadrisect:     [c0, m01, m20], [c1, m12, m01],
//!                   [c2, m20, m12], [m12, m20, m01]
//! ```
//!
//! Boundary conditions, constraints and line loads are carried onto the new
//! mesh. An edge whose two endpoints are constrained on a common axis gets a
//! midpoint constraint with the mean of the endpoint values.

use crate::boundary::{
    BoundaryCondition, BoundaryKind, Constraint, Geometry, LineLoad, Variation,
};
use crate::element::ElementType;
use crate::error::{Error, Result};
use crate::mesh::{find_cell, Mesh, MeshTopology};
use crate::types::Point2;
use log::{debug, trace};
use std::collections::HashMap;

/// Result of [`promote_to_lst`].
#[derive(Debug, Clone)]
pub struct Promotion {
    pub mesh: Mesh,
    /// `[a, midpoint, b]` for every edge, in registration order.
    pub line_nodes: Vec<[usize; 3]>,
    pub boundary_conditions: Vec<BoundaryCondition>,
    pub constraints: Vec<Constraint>,
}

/// Result of [`quadrisect`].
#[derive(Debug, Clone)]
pub struct Quadrisection {
    pub mesh: Mesh,
    pub boundary_conditions: Vec<BoundaryCondition>,
    pub constraints: Vec<Constraint>,
    pub line_loads: Vec<LineLoad>,
}

/// Refinement state for one call: the source mesh and its edges.
struct Refiner<'a> {
    mesh: &'a Mesh,
    topology: MeshTopology,
}

impl<'a> Refiner<'a> {
    fn new(mesh: &'a Mesh) -> Result<Self> {
        if !mesh.is_uniform(ElementType::Cst) {
            return Err(Error::Configuration(
                "refinement needs a mesh of CST elements only".into(),
            ));
        }
        let topology = MeshTopology::build(mesh);
        debug!(
            "refining {} elements with {} distinct edges",
            mesh.n_elements(),
            topology.registry.len()
        );
        Ok(Self { mesh, topology })
    }

    fn midpoint_id(&self, line: usize) -> usize {
        self.mesh.n_nodes() + line + self.mesh.index_base()
    }

    /// Midpoint node of the edge a-b.
    fn midpoint_of(&self, a: usize, b: usize) -> Result<usize> {
        self.topology
            .registry
            .find(a, b)
            .map(|line| self.midpoint_id(line))
            .ok_or_else(|| {
                Error::Topology(format!("nodes {} and {} do not share an element edge", a, b))
            })
    }

    /// Element midpoints in edge order: [m12, m20, m01].
    fn element_midpoints(&self, element: usize) -> [usize; 3] {
        let lines = &self.topology.element_lines[element];
        [
            self.midpoint_id(lines[0]),
            self.midpoint_id(lines[1]),
            self.midpoint_id(lines[2]),
        ]
    }

    /// Old nodes followed by one midpoint per edge.
    fn nodes(&self) -> Result<Vec<Point2>> {
        let mut nodes = self.mesh.nodes().to_vec();
        nodes.reserve(self.topology.registry.len());
        for &[a, b] in self.topology.registry.iter() {
            nodes.push(0.5 * (self.mesh.node(a)? + self.mesh.node(b)?));
        }
        Ok(nodes)
    }

    fn cell_of(&self, nodes: &[usize]) -> Result<usize> {
        find_cell(self.mesh, nodes)
            .ok_or_else(|| Error::Topology(format!("no element has nodes {:?}", nodes)))
    }

    /// Original constraints merged per node, then one midpoint constraint per
    /// edge with two constrained endpoints.
    fn constraints(&self, constraints: &[Constraint]) -> Result<Vec<Constraint>> {
        let mut merged: Vec<Constraint> = Vec::with_capacity(constraints.len());
        let mut by_node: HashMap<usize, usize> = HashMap::new();
        for c in constraints {
            self.mesh.local(c.node())?;
            match by_node.get(&c.node()) {
                Some(&i) => merged[i] = merged[i].merge(c),
                None => {
                    by_node.insert(c.node(), merged.len());
                    merged.push(*c);
                }
            }
        }

        let mut out = merged.clone();
        for (line, &[a, b]) in self.topology.registry.iter().enumerate() {
            if let (Some(&i), Some(&j)) = (by_node.get(&a), by_node.get(&b)) {
                if let Some(c) = Constraint::midpoint(&merged[i], &merged[j], self.midpoint_id(line)) {
                    trace!("midpoint constraint {:?}", c);
                    out.push(c);
                }
            }
        }
        Ok(out)
    }
}

fn split_variation(v: &Variation) -> (Variation, Variation) {
    match v {
        Variation::Polynomial(p) => {
            let (p1, p2) = p.split();
            (p1.into(), p2.into())
        }
        other => (other.clone(), other.clone()),
    }
}

fn scaled_flow(bc: &BoundaryCondition, parts: f64) -> Variation {
    match bc.value() {
        Variation::Constant(q) if bc.kind() == BoundaryKind::Flow => Variation::Constant(q / parts),
        other => other.clone(),
    }
}

/// Promote a CST mesh to LST elements.
///
/// # Errors
///
/// - `Error::Configuration` for a mesh with non-CST elements
/// - `Error::Topology` for a condition on an edge, face or node that is not
///   in the mesh
pub fn promote_to_lst(
    mesh: &Mesh,
    bcs: &[BoundaryCondition],
    constraints: &[Constraint],
) -> Result<Promotion> {
    let refiner = Refiner::new(mesh)?;

    let connectivity: Vec<Vec<usize>> = mesh
        .elements()
        .iter()
        .enumerate()
        .map(|(e, elem)| {
            let mut nodes = elem.nodes.clone();
            nodes.extend(refiner.element_midpoints(e));
            nodes
        })
        .collect();
    let new_mesh = Mesh::with_base(refiner.nodes()?, connectivity, mesh.index_base())?;

    let line_nodes = refiner
        .topology
        .registry
        .iter()
        .enumerate()
        .map(|(line, &[a, b])| [a, refiner.midpoint_id(line), b])
        .collect();

    let mut boundary_conditions = Vec::with_capacity(bcs.len());
    for bc in bcs {
        let promoted = match bc.geometry() {
            Geometry::Point => {
                mesh.local(bc.nodes()[0])?;
                bc.clone()
            }
            Geometry::Line => {
                let (a, b) = (bc.nodes()[0], bc.nodes()[1]);
                let m = refiner.midpoint_of(a, b)?;
                bc.refined(vec![a, m, b], bc.value().clone(), bc.coefficient().clone())?
            }
            Geometry::Face => {
                let cell = refiner.cell_of(bc.nodes())?;
                let nodes = new_mesh.elements()[cell].nodes.clone();
                bc.refined(nodes, bc.value().clone(), bc.coefficient().clone())?
            }
        };
        boundary_conditions.push(promoted);
    }

    let constraints = refiner.constraints(constraints)?;
    debug!(
        "promoted to LST: {} nodes, {} constraints",
        new_mesh.n_nodes(),
        constraints.len()
    );

    Ok(Promotion {
        mesh: new_mesh,
        line_nodes,
        boundary_conditions,
        constraints,
    })
}

/// Split every CST into four by connecting its edge midpoints.
///
/// Line conditions and loads are split in two (polynomials re-parametrized on
/// each half, flow halved), face conditions in four (flow quartered).
///
/// # Errors
///
/// Same as [`promote_to_lst`].
pub fn quadrisect(
    mesh: &Mesh,
    bcs: &[BoundaryCondition],
    constraints: &[Constraint],
    line_loads: &[LineLoad],
) -> Result<Quadrisection> {
    let refiner = Refiner::new(mesh)?;

    let children: Vec<[[usize; 3]; 4]> = mesh
        .elements()
        .iter()
        .enumerate()
        .map(|(e, elem)| {
            let [c0, c1, c2] = [elem.nodes[0], elem.nodes[1], elem.nodes[2]];
            let [m12, m20, m01] = refiner.element_midpoints(e);
            [
                [c0, m01, m20],
                [c1, m12, m01],
                [c2, m20, m12],
                [m12, m20, m01],
            ]
        })
        .collect();
    let connectivity = children.iter().flatten().map(|c| c.to_vec()).collect();
    let new_mesh = Mesh::with_base(refiner.nodes()?, connectivity, mesh.index_base())?;

    let mut boundary_conditions = Vec::with_capacity(2 * bcs.len());
    for bc in bcs {
        match bc.geometry() {
            Geometry::Point => {
                mesh.local(bc.nodes()[0])?;
                boundary_conditions.push(bc.clone());
            }
            Geometry::Line => {
                let (a, b) = (bc.nodes()[0], bc.nodes()[1]);
                let m = refiner.midpoint_of(a, b)?;
                let (v1, v2) = match bc.kind() {
                    BoundaryKind::Flow => {
                        let half = scaled_flow(bc, 2.0);
                        (half.clone(), half)
                    }
                    _ => split_variation(bc.value()),
                };
                let (c1, c2) = split_variation(bc.coefficient());
                boundary_conditions.push(bc.refined(vec![a, m], v1, c1)?);
                boundary_conditions.push(bc.refined(vec![m, b], v2, c2)?);
            }
            Geometry::Face => {
                let cell = refiner.cell_of(bc.nodes())?;
                let value = scaled_flow(bc, 4.0);
                for child in &children[cell] {
                    boundary_conditions.push(bc.refined(
                        child.to_vec(),
                        value.clone(),
                        bc.coefficient().clone(),
                    )?);
                }
            }
        }
    }

    let mut loads = Vec::with_capacity(2 * line_loads.len());
    for load in line_loads {
        let [a, b] = load.nodes;
        let m = refiner.midpoint_of(a, b)?;
        let (p1, p2) = load.profile.split();
        loads.push(LineLoad::new(a, m, load.direction, p1));
        loads.push(LineLoad::new(m, b, load.direction, p2));
    }

    let constraints = refiner.constraints(constraints)?;
    debug!(
        "quadrisected: {} elements, {} nodes",
        new_mesh.n_elements(),
        new_mesh.n_nodes()
    );

    Ok(Quadrisection {
        mesh: new_mesh,
        boundary_conditions,
        constraints,
        line_loads: loads,
    })
}
