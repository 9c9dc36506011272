//! De Bruijn graph construction from raw sequences.

use log::{debug, info};

use crate::error::GraphError;
use crate::graph::Graph;

/// Smallest k for which prefix and suffix vertices are non-empty.
pub const MIN_K: usize = 2;

/// Incremental builder: feed sequences one at a time, then [`finish`].
///
/// Every sequence is checked before any of its k-mers reach the graph, and
/// the graph is only handed out by `finish`, so a rejected input never leaves
/// a partially built graph visible to the caller.
///
/// [`finish`]: DeBruijnBuilder::finish
#[derive(Debug)]
pub struct DeBruijnBuilder {
    k: usize,
    graph: Graph,
    sequences: usize,
}

impl DeBruijnBuilder {
    pub fn new(k: usize) -> Result<Self, GraphError> {
        if k < MIN_K {
            return Err(GraphError::InvalidK(k));
        }
        Ok(DeBruijnBuilder {
            k,
            graph: Graph::new(),
            sequences: 0,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of sequences accepted so far.
    pub fn sequences(&self) -> usize {
        self.sequences
    }

    /// Add one edge per length-k window of `sequence`, from its (k-1)-prefix
    /// to its (k-1)-suffix.
    pub fn push(&mut self, sequence: &str) -> Result<(), GraphError> {
        let index = self.sequences;
        if !sequence.is_ascii() {
            return Err(GraphError::NonAsciiSequence(index));
        }
        if sequence.len() < self.k {
            return Err(GraphError::SequenceTooShort {
                index,
                len: sequence.len(),
                k: self.k,
            });
        }

        let k = self.k;
        for start in 0..=sequence.len() - k {
            let kmer = &sequence[start..start + k];
            self.graph.add_edge(&kmer[..k - 1], &kmer[1..]);
        }
        self.sequences += 1;
        debug!(
            "Sequence {} contributed {} k-mers",
            index,
            sequence.len() - k + 1
        );
        Ok(())
    }

    pub fn finish(self) -> Result<Graph, GraphError> {
        if self.sequences == 0 {
            return Err(GraphError::EmptyInput);
        }
        info!(
            "De Bruijn graph (k = {}) built from {} sequences: {} vertices, {} edges",
            self.k,
            self.sequences,
            self.graph.vertex_count(),
            self.graph.edge_count()
        );
        Ok(self.graph)
    }
}

/// Build the de Bruijn graph of order `k` over all `sequences`.
pub fn create_de_bruijn_graph<I, S>(sequences: I, k: usize) -> Result<Graph, GraphError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = DeBruijnBuilder::new(k)?;
    for sequence in sequences {
        builder.push(sequence.as_ref())?;
    }
    builder.finish()
}
