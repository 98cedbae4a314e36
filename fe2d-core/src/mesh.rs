//! Mesh data structure for 2D analysis.
//!
//! Stores nodal coordinates and element connectivity. Node identifiers in
//! connectivity, boundary conditions and loads are external ids offset by an
//! index base (0 or 1); the node with id `base + i` is `nodes()[i]`.
//!
//! # Submodules
//!
//! - [`topology`] - line registry and edge/element lookups

use crate::element::ElementType;
use crate::error::{Error, Result};
use crate::types::Point2;

pub mod topology;

pub use topology::{
    element_lies_left, find_cell, find_edge_element, find_midpoint, LineRegistry, MeshTopology,
};

/// Element connectivity - node ids for an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementConnectivity {
    /// Element family, inferred from the node count.
    pub element_type: ElementType,
    /// Node ids (offset by the mesh index base), corners first.
    pub nodes: Vec<usize>,
}

impl ElementConnectivity {
    /// Corner node ids.
    pub fn corners(&self) -> &[usize] {
        &self.nodes[..self.element_type.corner_count()]
    }
}

/// Finite element mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    nodes: Vec<Point2>,
    elements: Vec<ElementConnectivity>,
    index_base: usize,
}

impl Mesh {
    /// Create a new empty mesh with the given index base.
    pub fn new(index_base: usize) -> Self {
        Self {
            nodes: Vec::new(),
            elements: Vec::new(),
            index_base,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(index_base: usize, n_nodes: usize, n_elements: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n_nodes),
            elements: Vec::with_capacity(n_elements),
            index_base,
        }
    }

    /// Build a mesh from coordinates and connectivity, inferring the index
    /// base from the smallest id in the connectivity (0 if it is 0, else 1).
    ///
    /// # Errors
    ///
    /// - `Error::Configuration` for an element without 3, 4 or 6 nodes
    /// - `Error::Topology` for an id outside `[base, base + n_nodes)`
    pub fn from_connectivity(nodes: Vec<Point2>, connectivity: Vec<Vec<usize>>) -> Result<Self> {
        let min = connectivity.iter().flatten().copied().min().unwrap_or(0);
        let base = if min == 0 { 0 } else { 1 };
        Self::with_base(nodes, connectivity, base)
    }

    /// Build a mesh with an explicit index base.
    pub fn with_base(
        nodes: Vec<Point2>,
        connectivity: Vec<Vec<usize>>,
        index_base: usize,
    ) -> Result<Self> {
        let mut mesh = Self {
            nodes,
            elements: Vec::with_capacity(connectivity.len()),
            index_base,
        };
        for element in connectivity {
            mesh.add_element(element)?;
        }
        Ok(mesh)
    }

    /// Add a node to the mesh, returning its id.
    pub fn add_node(&mut self, point: Point2) -> usize {
        self.nodes.push(point);
        self.nodes.len() - 1 + self.index_base
    }

    /// Add multiple nodes at once.
    pub fn add_nodes(&mut self, points: impl IntoIterator<Item = Point2>) {
        self.nodes.extend(points);
    }

    /// Add an element, inferring its type from the node count.
    pub fn add_element(&mut self, nodes: Vec<usize>) -> Result<usize> {
        let element_type = ElementType::from_node_count(nodes.len())?;
        for &id in &nodes {
            self.local(id)?;
        }
        self.elements.push(ElementConnectivity {
            element_type,
            nodes,
        });
        Ok(self.elements.len() - 1)
    }

    /// Number of nodes in the mesh.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements in the mesh.
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn index_base(&self) -> usize {
        self.index_base
    }

    /// Get nodal coordinates, in storage order.
    pub fn nodes(&self) -> &[Point2] {
        &self.nodes
    }

    /// Storage position of a node id.
    ///
    /// # Errors
    ///
    /// `Error::Topology` if the id is not in the mesh.
    pub fn local(&self, id: usize) -> Result<usize> {
        id.checked_sub(self.index_base)
            .filter(|&i| i < self.nodes.len())
            .ok_or_else(|| {
                Error::Topology(format!(
                    "node {} out of bounds (ids {}..{})",
                    id,
                    self.index_base,
                    self.index_base + self.nodes.len()
                ))
            })
    }

    /// Coordinates of a node id.
    pub fn node(&self, id: usize) -> Result<&Point2> {
        Ok(&self.nodes[self.local(id)?])
    }

    /// Get element connectivity.
    pub fn elements(&self) -> &[ElementConnectivity] {
        &self.elements
    }

    /// Get a specific element's connectivity.
    pub fn element(&self, idx: usize) -> Option<&ElementConnectivity> {
        self.elements.get(idx)
    }

    /// Whether every element is of type `ty`.
    pub fn is_uniform(&self, ty: ElementType) -> bool {
        self.elements.iter().all(|e| e.element_type == ty)
    }

    /// Get coordinates for an element's nodes.
    pub fn element_coords(&self, elem_idx: usize) -> Option<Vec<Point2>> {
        let elem = self.elements.get(elem_idx)?;
        Some(
            elem.nodes
                .iter()
                .map(|&id| self.nodes[id - self.index_base])
                .collect(),
        )
    }

    /// Global DOF indices of an element, `(id − base)·ndof + d`.
    pub fn element_dofs(&self, elem_idx: usize, dofs_per_node: usize) -> Option<Vec<usize>> {
        let elem = self.elements.get(elem_idx)?;
        Some(
            elem.nodes
                .iter()
                .flat_map(|&id| {
                    let first = (id - self.index_base) * dofs_per_node;
                    first..first + dofs_per_node
                })
                .collect(),
        )
    }

    /// Gather an element's values from a global nodal vector.
    ///
    /// # Errors
    ///
    /// `Error::Configuration` if `global` does not hold `n_nodes · dofs_per_node`
    /// values, `Error::Topology` for an unknown element.
    pub fn gather(&self, elem_idx: usize, global: &[f64], dofs_per_node: usize) -> Result<Vec<f64>> {
        if global.len() != self.nodes.len() * dofs_per_node {
            return Err(Error::Configuration(format!(
                "global vector has {} values, mesh has {} nodes with {} DOFs each",
                global.len(),
                self.nodes.len(),
                dofs_per_node
            )));
        }
        let dofs = self
            .element_dofs(elem_idx, dofs_per_node)
            .ok_or_else(|| Error::Topology(format!("element {} does not exist", elem_idx)))?;
        Ok(dofs.into_iter().map(|i| global[i]).collect())
    }

    /// Compute mesh bounding box.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = *self.nodes.first()?;
        Some(
            self.nodes[1..]
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p))),
        )
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new(0)
    }
}
