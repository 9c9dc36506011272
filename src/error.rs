/// Errors returned by graph construction and Eulerian walk reconstruction.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("k-mer length must be at least 2 (got {0})")]
    InvalidK(usize),
    #[error("sequence {index} has length {len}, shorter than k = {k}")]
    SequenceTooShort { index: usize, len: usize, k: usize },
    #[error("sequence {0} contains non-ASCII symbols")]
    NonAsciiSequence(usize),
    #[error("input contained no sequences")]
    EmptyInput,
    #[error("graph has no vertices to start a walk from")]
    EmptyGraph,
    #[error("graph has neither an Eulerian path nor an Eulerian cycle")]
    NotEulerian,
    #[error("Eulerian properties were computed for generation {computed}, graph is at generation {current}")]
    StaleProperties { computed: u64, current: u64 },
    #[error("{0} edges were already consumed by a previous walk")]
    EdgesAlreadyConsumed(usize),
    #[error("walk consumed {consumed} of {total} edges")]
    IncompleteWalk { consumed: usize, total: usize },
}
