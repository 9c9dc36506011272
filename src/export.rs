//! Read-only exports of a graph and of reconstructed sequences.

use std::io::{self, Write};

use serde::Serialize;

use crate::graph::Graph;

pub const CSV_HEADER: &str = "Source, Target, Label";

#[derive(Serialize)]
struct NodeRecord<'a> {
    id: usize,
    key: &'a str,
    indegree: usize,
    outdegree: usize,
}

#[derive(Serialize)]
struct EdgeRecord<'a> {
    source: &'a str,
    target: &'a str,
    label: &'a str,
}

#[derive(Serialize)]
struct GraphRecord<'a> {
    nodes: Vec<NodeRecord<'a>>,
    edges: Vec<EdgeRecord<'a>>,
}

/// Write one `source, target, label` row per edge after a header row.
pub fn write_edge_csv<W: Write>(graph: &Graph, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for (vertex, edge) in graph.edges() {
        writeln!(
            writer,
            "{}, {}, {}",
            vertex.key(),
            edge.destination(),
            edge.label()
        )?;
    }
    writer.flush()
}

/// Write the graph as pretty-printed JSON with `nodes` and `edges` arrays.
pub fn write_graph_json<W: Write>(graph: &Graph, mut writer: W) -> io::Result<()> {
    let record = GraphRecord {
        nodes: graph
            .vertices()
            .enumerate()
            .map(|(id, vertex)| NodeRecord {
                id,
                key: vertex.key(),
                indegree: vertex.indegree(),
                outdegree: vertex.outdegree(),
            })
            .collect(),
        edges: graph
            .edges()
            .map(|(vertex, edge)| EdgeRecord {
                source: vertex.key(),
                target: edge.destination(),
                label: edge.label(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut writer, &record)?;
    writeln!(writer)?;
    writer.flush()
}

/// Write a single FASTA record, wrapping at `line_width` (0 = no wrap).
pub fn write_fasta<W: Write>(
    header: &str,
    sequence: &str,
    line_width: usize,
    mut writer: W,
) -> io::Result<()> {
    writeln!(writer, ">{header}")?;
    if line_width == 0 {
        writeln!(writer, "{sequence}")?;
    } else {
        for line in sequence.as_bytes().chunks(line_width) {
            writer.write_all(line)?;
            writeln!(writer)?;
        }
    }
    writer.flush()
}
