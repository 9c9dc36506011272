//! Directed multigraph keyed by string labels.
//!
//! Vertices live in an insertion-ordered map from key to [`Vertex`]; each
//! vertex owns its outgoing [`Edge`]s. An edge names its destination by key
//! and is resolved through the map, so the graph is the single owner of every
//! vertex.

use indexmap::IndexMap;

/// Stable handle to a vertex. Vertices are never removed, so an id stays
/// valid for the lifetime of the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    /// Position of the vertex in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed edge, owned by its source vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    label: String,
    destination: String,
}

impl Edge {
    /// The k-mer this edge stands for: source key plus the last symbol of the
    /// destination key.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Key of the destination vertex.
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

#[derive(Debug, Clone)]
pub struct Vertex {
    key: String,
    indegree: usize,
    outdegree: usize,
    edges: Vec<Edge>,
    // Number of outgoing edges consumed by a walk, in insertion order.
    pub(crate) cursor: usize,
}

impl Vertex {
    fn new(key: &str) -> Self {
        Vertex {
            key: key.to_owned(),
            indegree: 0,
            outdegree: 0,
            edges: Vec::new(),
            cursor: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn indegree(&self) -> usize {
        self.indegree
    }

    pub fn outdegree(&self) -> usize {
        self.outdegree
    }

    /// Outgoing edges in creation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// How many outgoing edges a walk has consumed so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Directed multigraph with string-keyed vertices.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: IndexMap<String, Vertex>,
    edge_count: usize,
    // Bumped on every structural change; classification results record it.
    generation: u64,
    // Edges consumed by walks since the last rewind.
    pub(crate) consumed: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Look up a vertex by key. Absence is a normal result.
    pub fn get_vertex(&self, key: &str) -> Option<&Vertex> {
        self.vertices.get(key)
    }

    pub fn id_of(&self, key: &str) -> Option<VertexId> {
        self.vertices.get_index_of(key).map(VertexId)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get_index(id.0).map(|(_, vertex)| vertex)
    }

    /// Return the vertex for `key`, creating it with zero degrees if absent.
    pub fn add_vertex(&mut self, key: &str) -> VertexId {
        if let Some(index) = self.vertices.get_index_of(key) {
            return VertexId(index);
        }
        let (index, _) = self.vertices.insert_full(key.to_owned(), Vertex::new(key));
        self.generation += 1;
        VertexId(index)
    }

    /// Insert a directed edge `start -> end`, creating either endpoint on
    /// first reference. Parallel edges are kept as distinct entries.
    pub fn add_edge(&mut self, start: &str, end: &str) -> &Edge {
        let start_id = self.add_vertex(start);
        let end_id = self.add_vertex(end);

        let mut label = String::with_capacity(start.len() + 1);
        label.push_str(start);
        if let Some(last) = end.chars().last() {
            label.push(last);
        }

        self.edge_count += 1;
        self.generation += 1;
        self.vertices[end_id.0].indegree += 1;

        let source = &mut self.vertices[start_id.0];
        source.outdegree += 1;
        source.edges.push(Edge {
            label,
            destination: end.to_owned(),
        });
        debug_assert_eq!(source.outdegree, source.edges.len());
        &source.edges[source.edges.len() - 1]
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Every edge paired with its source vertex, vertex by vertex and then in
    /// per-vertex creation order.
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Edge)> {
        self.vertices
            .values()
            .flat_map(|vertex| vertex.edges.iter().map(move |edge| (vertex, edge)))
    }

    /// Total edges consumed by walks since construction or the last rewind.
    pub fn consumed_edges(&self) -> usize {
        self.consumed
    }

    /// Reset every consumption cursor so another walk can run.
    pub fn rewind_cursors(&mut self) {
        for vertex in self.vertices.values_mut() {
            vertex.cursor = 0;
        }
        self.consumed = 0;
    }

    /// Consume the next unused outgoing edge of `id` and return its position
    /// together with the destination vertex.
    pub(crate) fn advance_cursor(&mut self, id: VertexId) -> Option<(usize, VertexId)> {
        let position = {
            let vertex = &mut self.vertices[id.0];
            if vertex.cursor >= vertex.outdegree {
                return None;
            }
            vertex.cursor += 1;
            vertex.cursor - 1
        };
        self.consumed += 1;

        let destination = self.vertices[id.0].edges[position].destination();
        let next = self.vertices.get_index_of(destination)?;
        Some((position, VertexId(next)))
    }

    pub(crate) fn edge_at(&self, source: VertexId, position: usize) -> &Edge {
        &self.vertices[source.0].edges[position]
    }
}
