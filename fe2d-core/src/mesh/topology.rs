//! Mesh topology: undirected line registry and edge lookups.
//!
//! A line is an unordered pair of node ids. The registry assigns each
//! distinct line one index in first-registration order, so elements that
//! share an edge share its line, and refinement creates exactly one midpoint
//! node per edge.

use crate::element::ElementType;
use crate::mesh::Mesh;
use crate::types::Point2;
use std::collections::{HashMap, HashSet};

#[inline]
fn canonical(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Ordered set of undirected lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineRegistry {
    lines: Vec<[usize; 2]>,
    lookup: HashMap<(usize, usize), usize>,
}

impl LineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the line (a, b) and return its index. A line already
    /// registered in either direction keeps its original index.
    pub fn register(&mut self, a: usize, b: usize) -> usize {
        let key = canonical(a, b);
        if let Some(&idx) = self.lookup.get(&key) {
            return idx;
        }
        let idx = self.lines.len();
        self.lines.push([key.0, key.1]);
        self.lookup.insert(key, idx);
        idx
    }

    /// Index of the line (a, b) in either direction.
    pub fn find(&self, a: usize, b: usize) -> Option<usize> {
        self.lookup.get(&canonical(a, b)).copied()
    }

    /// Endpoints of a line, smaller id first.
    pub fn get(&self, idx: usize) -> Option<[usize; 2]> {
        self.lines.get(idx).copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize; 2]> {
        self.lines.iter()
    }
}

/// Element-to-line and line-to-node maps of a mesh.
#[derive(Debug, Clone)]
pub struct MeshTopology {
    /// Registry of every element edge (corner to corner).
    pub registry: LineRegistry,
    /// Line indices of each element, in [`ElementType::edges`] order.
    pub element_lines: Vec<Vec<usize>>,
}

impl MeshTopology {
    /// Register the edges of every element in element order.
    pub fn build(mesh: &Mesh) -> Self {
        let mut registry = LineRegistry::new();
        let element_lines = mesh
            .elements()
            .iter()
            .map(|elem| {
                elem.element_type
                    .edges()
                    .iter()
                    .map(|&[a, b]| registry.register(elem.nodes[a], elem.nodes[b]))
                    .collect()
            })
            .collect();
        Self {
            registry,
            element_lines,
        }
    }

    /// Node ids of a line.
    pub fn line_nodes(&self, line: usize) -> Option<[usize; 2]> {
        self.registry.get(line)
    }

    /// Elements that have `line` as an edge.
    pub fn elements_on_line(&self, line: usize) -> Vec<usize> {
        self.element_lines
            .iter()
            .enumerate()
            .filter(|(_, lines)| lines.contains(&line))
            .map(|(e, _)| e)
            .collect()
    }

    /// Lines that bound exactly one element.
    pub fn boundary_lines(&self) -> Vec<usize> {
        let mut count = vec![0usize; self.registry.len()];
        for lines in &self.element_lines {
            for &l in lines {
                count[l] += 1;
            }
        }
        (0..count.len()).filter(|&l| count[l] == 1).collect()
    }
}

/// Find the element whose node set equals `nodes`, comparing against either
/// all of its nodes or its corner nodes only.
pub fn find_cell(mesh: &Mesh, nodes: &[usize]) -> Option<usize> {
    let wanted: HashSet<usize> = nodes.iter().copied().collect();
    mesh.elements().iter().position(|elem| {
        let all: HashSet<usize> = elem.nodes.iter().copied().collect();
        let corners: HashSet<usize> = elem.corners().iter().copied().collect();
        wanted == all || wanted == corners
    })
}

/// Midpoint node of the LST edge between corners `a` and `b`, with the index
/// of the element it was found in.
pub fn find_midpoint(mesh: &Mesh, a: usize, b: usize) -> Option<(usize, usize)> {
    mesh.elements().iter().enumerate().find_map(|(e, elem)| {
        if elem.element_type != ElementType::Lst {
            return None;
        }
        elem.element_type
            .edges()
            .iter()
            .position(|&[i, j]| canonical(elem.nodes[i], elem.nodes[j]) == canonical(a, b))
            .map(|edge| (elem.nodes[3 + edge], e))
    })
}

/// Find the element with an edge between corners `a` and `b`.
pub fn find_edge_element(mesh: &Mesh, a: usize, b: usize) -> Option<usize> {
    mesh.elements().iter().position(|elem| {
        elem.element_type
            .edges()
            .iter()
            .any(|&[i, j]| canonical(elem.nodes[i], elem.nodes[j]) == canonical(a, b))
    })
}

/// Whether the element's centroid lies to the left of the directed line a → b.
pub fn element_lies_left(mesh: &Mesh, element: usize, a: usize, b: usize) -> Option<bool> {
    let coords = mesh.element_coords(element)?;
    let centroid = coords.iter().sum::<Point2>() / coords.len() as f64;
    let pa = *mesh.node(a).ok()?;
    let pb = *mesh.node(b).ok()?;
    let d = pb - pa;
    let m = centroid - pa;
    Some(d[0] * m[1] - d[1] * m[0] > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> Mesh {
        // 4---3
        // | / |
        // 1---2
        Mesh::from_connectivity(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            vec![vec![1, 2, 3], vec![1, 3, 4]],
        )
        .unwrap()
    }

    #[test]
    fn test_registry_ignores_direction() {
        let mut reg = LineRegistry::new();
        assert_eq!(reg.register(3, 1), 0);
        assert_eq!(reg.register(1, 2), 1);
        assert_eq!(reg.register(1, 3), 0);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.find(3, 1), Some(0));
        assert_eq!(reg.get(0), Some([1, 3]));
        assert_eq!(reg.find(2, 3), None);
    }

    #[test]
    fn test_shared_edge_registered_once() {
        let topo = MeshTopology::build(&two_triangles());
        assert_eq!(topo.registry.len(), 5);
        let shared = topo.registry.find(1, 3).unwrap();
        assert_eq!(topo.elements_on_line(shared), vec![0, 1]);
        assert_eq!(topo.boundary_lines().len(), 4);
        // First element edges are (2,3), (3,1), (1,2)
        assert_eq!(topo.line_nodes(topo.element_lines[0][0]), Some([2, 3]));
    }

    #[test]
    fn test_find_cell() {
        let mesh = two_triangles();
        assert_eq!(find_cell(&mesh, &[3, 4, 1]), Some(1));
        assert_eq!(find_cell(&mesh, &[2, 4, 1]), None);
    }

    #[test]
    fn test_find_midpoint() {
        let mut mesh = Mesh::new(0);
        mesh.add_nodes([
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.0),
        ]);
        mesh.add_element(vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(find_midpoint(&mesh, 1, 0), Some((5, 0)));
        assert_eq!(find_midpoint(&mesh, 1, 2), Some((3, 0)));
        assert_eq!(find_midpoint(&mesh, 0, 3), None);
        assert_eq!(find_cell(&mesh, &[0, 1, 2]), Some(0));
    }

    #[test]
    fn test_element_lies_left() {
        let mesh = two_triangles();
        // Element 0 lies below the diagonal 1 → 3.
        assert_eq!(element_lies_left(&mesh, 0, 1, 3), Some(false));
        assert_eq!(element_lies_left(&mesh, 1, 1, 3), Some(true));
        assert_eq!(element_lies_left(&mesh, 0, 1, 2), Some(true));
        assert_eq!(find_edge_element(&mesh, 4, 1), Some(1));
    }
}
