use thiserror::Error;

use crate::grid::Point;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("Malformed grid: {0}")]
    MalformedGrid(#[from] Malformation),
    #[error("Cells {from} and {to} are not one cardinal step apart")]
    InvalidAdjacency { from: Point, to: Point },
}

/// The structural problem that made a grid unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformation {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("no start cell")]
    MissingStart,
    #[error("second start cell at {second}, first at {first}")]
    DuplicateStart { first: Point, second: Point },
    #[error("no end cell")]
    MissingEnd,
    #[error("second end cell at {second}, first at {first}")]
    DuplicateEnd { first: Point, second: Point },
    #[error("unrecognized cell {value:?} at {at}")]
    UnknownCell { at: Point, value: String },
    #[error("weighted cell at {at} must cost at least 1")]
    ZeroWeight { at: Point },
}
