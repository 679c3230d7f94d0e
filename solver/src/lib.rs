//! Shortest routes through character mazes.
//!
//! A maze is parsed into a [`Grid`], turned into a [`Graph`] of its open cells
//! and solved with a [`PathFinder`]; the resulting [`Route`] serializes to a
//! move string such as `"SSEE"`.

pub mod direction;
pub mod error;
pub mod find;
pub mod graph;
pub mod grid;
pub mod util;

pub use direction::{serialize, Direction, Step};
pub use error::{Malformation, MazeError};
pub use find::{
    solve, Distance, DistanceTable, PathFinder, Route, SearchStats, Solution, SolveState,
    SolverOptions, StopAt, Via,
};
pub use graph::{Edge, Graph, Node, NodeId};
pub use grid::{Grid, Point, Terrain};
