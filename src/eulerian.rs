//! Eulerian classification and walk reconstruction.
//!
//! Classification is a single pass over the vertices that counts how each one
//! balances its in- and outdegree. The result is returned as an
//! [`EulerianProperties`] value tied to the graph generation it was computed
//! for; the walk refuses properties that no longer describe the edge set.

use log::debug;

use crate::error::GraphError;
use crate::graph::{Graph, VertexId};

/// Degree-balance summary of a graph at a given generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EulerianProperties {
    balanced: usize,
    semi_balanced: usize,
    generic: usize,
    walk_start: Option<VertexId>,
    walk_end: Option<VertexId>,
    generation: u64,
}

impl EulerianProperties {
    /// Vertices with indegree == outdegree.
    pub fn balanced(&self) -> usize {
        self.balanced
    }

    /// Vertices whose degrees differ by exactly one.
    pub fn semi_balanced(&self) -> usize {
        self.semi_balanced
    }

    /// Vertices whose degrees differ by more than one.
    pub fn generic(&self) -> usize {
        self.generic
    }

    pub fn walk_start(&self) -> Option<VertexId> {
        self.walk_start
    }

    pub fn walk_end(&self) -> Option<VertexId> {
        self.walk_end
    }

    /// Graph generation the counts were taken at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_eulerian_cycle(&self) -> bool {
        self.generic == 0 && self.semi_balanced == 0
    }

    pub fn has_eulerian_path(&self) -> bool {
        self.generic == 0 && self.semi_balanced == 2
    }

    pub fn has_eulerian_properties(&self) -> bool {
        self.has_eulerian_cycle() || self.has_eulerian_path()
    }
}

// Position of an edge inside its source vertex's edge list.
#[derive(Debug, Clone, Copy)]
struct EdgeRef {
    source: VertexId,
    position: usize,
}

impl Graph {
    /// Classify every vertex by degree balance in insertion order.
    ///
    /// A vertex with one more outgoing than incoming edge becomes the walk
    /// start, one with one more incoming edge becomes the walk end. When every
    /// vertex is balanced both ends are the first vertex with an outgoing edge,
    /// or the first vertex at all if the graph has no edges.
    pub fn compute_eulerian_path_properties(&self) -> EulerianProperties {
        let mut properties = EulerianProperties {
            balanced: 0,
            semi_balanced: 0,
            generic: 0,
            walk_start: None,
            walk_end: None,
            generation: self.generation(),
        };
        let mut first = None;
        let mut first_with_edges = None;

        for (index, vertex) in self.vertices().enumerate() {
            let id = VertexId(index);
            first.get_or_insert(id);
            if vertex.outdegree() > 0 {
                first_with_edges.get_or_insert(id);
            }
            match vertex.indegree().abs_diff(vertex.outdegree()) {
                0 => properties.balanced += 1,
                1 => {
                    properties.semi_balanced += 1;
                    if vertex.indegree() > vertex.outdegree() {
                        properties.walk_end = Some(id);
                    } else {
                        properties.walk_start = Some(id);
                    }
                }
                _ => properties.generic += 1,
            }
        }

        if properties.has_eulerian_cycle() {
            let start = first_with_edges.or(first);
            properties.walk_start = start;
            properties.walk_end = start;
        }

        debug!(
            "Classified {} vertices: {} balanced, {} semi-balanced, {} generic",
            self.vertex_count(),
            properties.balanced,
            properties.semi_balanced,
            properties.generic
        );
        properties
    }

    /// Walk every edge once from the classified start vertex and spell the
    /// sequence it covers.
    ///
    /// Edges leave each vertex in creation order, tracked by the vertex
    /// cursor. When the walk strands at a vertex with edges still unused
    /// elsewhere, it backs up to the last vertex with a free edge and splices
    /// the detour in, so the result only differs from a straight greedy walk
    /// when that walk would have stopped short.
    pub fn compute_eulerian_walk(
        &mut self,
        properties: &EulerianProperties,
    ) -> Result<String, GraphError> {
        if properties.generation != self.generation() {
            return Err(GraphError::StaleProperties {
                computed: properties.generation,
                current: self.generation(),
            });
        }
        if !properties.has_eulerian_properties() {
            return Err(GraphError::NotEulerian);
        }
        let start = properties.walk_start.ok_or(GraphError::EmptyGraph)?;
        if self.consumed > 0 {
            return Err(GraphError::EdgesAlreadyConsumed(self.consumed));
        }

        let trail = self.consume_trail(start);
        if trail.len() != self.edge_count() {
            return Err(GraphError::IncompleteWalk {
                consumed: trail.len(),
                total: self.edge_count(),
            });
        }

        let sequence = self.spell(start, &trail);
        debug!(
            "Eulerian walk used {} edges and spelled {} symbols",
            trail.len(),
            sequence.len()
        );
        Ok(sequence)
    }

    fn consume_trail(&mut self, start: VertexId) -> Vec<EdgeRef> {
        // Each frame is a vertex and the edge that led to it.
        let mut stack: Vec<(VertexId, Option<EdgeRef>)> = vec![(start, None)];
        let mut trail = Vec::with_capacity(self.edge_count());

        while let Some(&(current, _)) = stack.last() {
            match self.advance_cursor(current) {
                Some((position, next)) => {
                    let edge = EdgeRef {
                        source: current,
                        position,
                    };
                    stack.push((next, Some(edge)));
                }
                None => {
                    if let Some((_, Some(edge))) = stack.pop() {
                        trail.push(edge);
                    }
                }
            }
        }

        trail.reverse();
        trail
    }

    fn spell(&self, start: VertexId, trail: &[EdgeRef]) -> String {
        let start_key = self.vertex(start).map(|v| v.key()).unwrap_or_default();
        let mut sequence = String::with_capacity(trail.len() + start_key.len());

        match trail.split_last() {
            None => sequence.push_str(start_key),
            Some((last, rest)) => {
                for edge in rest {
                    let label = self.edge_at(edge.source, edge.position).label();
                    if let Some(first) = label.chars().next() {
                        sequence.push(first);
                    }
                }
                sequence.push_str(self.edge_at(last.source, last.position).label());
            }
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from_edges(edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new();
        for (start, end) in edges {
            graph.add_edge(start, end);
        }
        graph
    }

    #[test]
    fn classifies_simple_path() {
        let graph = graph_from_edges(&[("AC", "CG"), ("CG", "GT")]);
        let props = graph.compute_eulerian_path_properties();
        assert_eq!(props.balanced(), 1);
        assert_eq!(props.semi_balanced(), 2);
        assert_eq!(props.generic(), 0);
        assert!(props.has_eulerian_path());
        assert!(!props.has_eulerian_cycle());
        assert_eq!(props.walk_start(), graph.id_of("AC"));
        assert_eq!(props.walk_end(), graph.id_of("GT"));
    }

    #[test]
    fn cycle_starts_at_first_inserted_vertex() {
        let graph = graph_from_edges(&[("GA", "AC"), ("AC", "CG"), ("CG", "GA")]);
        let props = graph.compute_eulerian_path_properties();
        assert!(props.has_eulerian_cycle());
        assert!(!props.has_eulerian_path());
        assert_eq!(props.walk_start(), graph.id_of("GA"));
        assert_eq!(props.walk_end(), graph.id_of("GA"));
    }

    #[test]
    fn cycle_start_skips_isolated_vertices() {
        let mut graph = Graph::new();
        graph.add_vertex("XX");
        graph.add_edge("AC", "CA");
        graph.add_edge("CA", "AC");

        let props = graph.compute_eulerian_path_properties();
        assert!(props.has_eulerian_cycle());
        assert_eq!(props.walk_start(), graph.id_of("AC"));
        assert_eq!(graph.compute_eulerian_walk(&props).unwrap(), "ACAC");
    }

    #[test]
    fn imbalance_of_two_is_generic() {
        let graph = graph_from_edges(&[("A", "B"), ("A", "C")]);
        let props = graph.compute_eulerian_path_properties();
        assert_eq!(props.generic(), 1);
        assert!(!props.has_eulerian_properties());
    }

    #[test]
    fn counts_partition_vertices() {
        let graph = graph_from_edges(&[
            ("A", "B"),
            ("A", "C"),
            ("B", "C"),
            ("C", "A"),
            ("D", "B"),
        ]);
        let props = graph.compute_eulerian_path_properties();
        assert_eq!(
            props.balanced() + props.semi_balanced() + props.generic(),
            graph.vertex_count()
        );
    }

    #[test]
    fn walk_spells_path() {
        let mut graph = graph_from_edges(&[("AC", "CG"), ("CG", "GT"), ("GT", "TA")]);
        let props = graph.compute_eulerian_path_properties();
        assert_eq!(graph.compute_eulerian_walk(&props).unwrap(), "ACGTA");
    }

    #[test]
    fn walk_splices_detour_greedy_would_miss() {
        // From B the first edge leads to the dead end C before the B-D-B loop.
        let mut graph = graph_from_edges(&[("A", "B"), ("B", "C"), ("B", "D"), ("D", "B")]);
        let props = graph.compute_eulerian_path_properties();
        assert!(props.has_eulerian_path());
        assert_eq!(graph.compute_eulerian_walk(&props).unwrap(), "ABDBC");
        assert_eq!(graph.consumed_edges(), graph.edge_count());
    }

    #[test]
    fn walk_consumes_every_cursor() {
        let mut graph = graph_from_edges(&[("A", "B"), ("B", "A"), ("A", "B"), ("B", "A")]);
        let props = graph.compute_eulerian_path_properties();
        let walk = graph.compute_eulerian_walk(&props).unwrap();
        assert_eq!(walk, "ABABA");
        for vertex in graph.vertices() {
            assert_eq!(vertex.cursor(), vertex.outdegree());
        }
    }

    #[test]
    fn walk_rejects_stale_properties() {
        let mut graph = graph_from_edges(&[("A", "B")]);
        let props = graph.compute_eulerian_path_properties();
        graph.add_edge("B", "C");
        assert!(matches!(
            graph.compute_eulerian_walk(&props),
            Err(GraphError::StaleProperties { .. })
        ));
    }

    #[test]
    fn walk_rejects_non_eulerian_graph() {
        let mut graph = graph_from_edges(&[("A", "B"), ("A", "C")]);
        let props = graph.compute_eulerian_path_properties();
        assert_eq!(
            graph.compute_eulerian_walk(&props),
            Err(GraphError::NotEulerian)
        );
        assert_eq!(graph.consumed_edges(), 0);
    }

    #[test]
    fn walk_reports_disconnected_cycles() {
        let mut graph = graph_from_edges(&[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")]);
        let props = graph.compute_eulerian_path_properties();
        assert!(props.has_eulerian_cycle());
        assert_eq!(
            graph.compute_eulerian_walk(&props),
            Err(GraphError::IncompleteWalk {
                consumed: 2,
                total: 4
            })
        );
    }

    #[test]
    fn second_walk_needs_rewind() {
        let mut graph = graph_from_edges(&[("AC", "CG"), ("CG", "GT")]);
        let props = graph.compute_eulerian_path_properties();
        let first = graph.compute_eulerian_walk(&props).unwrap();
        assert_eq!(
            graph.compute_eulerian_walk(&props),
            Err(GraphError::EdgesAlreadyConsumed(2))
        );
        graph.rewind_cursors();
        assert_eq!(graph.compute_eulerian_walk(&props).unwrap(), first);
    }

    #[test]
    fn empty_graph_has_no_walk_start() {
        let mut graph = Graph::new();
        let props = graph.compute_eulerian_path_properties();
        assert!(props.has_eulerian_cycle());
        assert_eq!(graph.compute_eulerian_walk(&props), Err(GraphError::EmptyGraph));
    }

    #[test]
    fn isolated_vertex_spells_its_key() {
        let mut graph = Graph::new();
        graph.add_vertex("ACG");
        let props = graph.compute_eulerian_path_properties();
        assert_eq!(graph.compute_eulerian_walk(&props).unwrap(), "ACG");
    }
}
