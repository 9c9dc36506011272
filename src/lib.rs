//! hague: sequence reconstruction over de Bruijn graphs.
//!
//! Reads are cut into overlapping k-mers, each k-mer becomes an edge between
//! its (k-1)-prefix and (k-1)-suffix, and a walk that uses every edge exactly
//! once spells a superstring of all reads.
//!
//! ```
//! use hague::create_de_bruijn_graph;
//!
//! let mut graph = create_de_bruijn_graph(["ACGTACGT"], 3).unwrap();
//! let properties = graph.compute_eulerian_path_properties();
//! assert!(properties.has_eulerian_path());
//! assert_eq!(graph.compute_eulerian_walk(&properties).unwrap(), "ACGTACGT");
//! ```

pub mod debruijn;
pub mod error;
pub mod eulerian;
pub mod export;
pub mod graph;
pub mod read_source;

pub use debruijn::{create_de_bruijn_graph, DeBruijnBuilder, MIN_K};
pub use error::GraphError;
pub use eulerian::EulerianProperties;
pub use export::{write_edge_csv, write_fasta, write_graph_json, CSV_HEADER};
pub use graph::{Edge, Graph, Vertex, VertexId};
pub use read_source::{read_sequences, ReadSourceError, SequenceFormat, SequenceReader};
