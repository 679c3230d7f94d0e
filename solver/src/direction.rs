use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::MazeError;
use crate::grid::Point;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Determine the direction of a single cardinal step from `from` to `to`
    pub fn between(from: Point, to: Point) -> Result<Direction, MazeError> {
        let dx = to.x as isize - from.x as isize;
        let dy = to.y as isize - from.y as isize;

        match (dx, dy) {
            (0, -1) => Ok(Direction::North),
            (0, 1) => Ok(Direction::South),
            (1, 0) => Ok(Direction::East),
            (-1, 0) => Ok(Direction::West),
            _ => Err(MazeError::InvalidAdjacency { from, to }),
        }
    }

    /// The (dx, dy) delta of one step, y grows downwards
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// The move code sent to the maze service
    pub fn symbol(&self) -> char {
        match self {
            Direction::North => 'N',
            Direction::South => 'S',
            Direction::East => 'E',
            Direction::West => 'W',
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Direction::North),
            "S" => Ok(Direction::South),
            "E" => Ok(Direction::East),
            "W" => Ok(Direction::West),
            _ => Err(anyhow::anyhow!("Invalid direction: {}", s)),
        }
    }
}

/// One move of a route: the direction taken and the point it arrives at
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub point: Point,
    pub direction: Direction,
}

/// Concatenate the move codes of `steps` in order, without separators
pub fn serialize(steps: &[Step]) -> String {
    steps.iter().map(|step| step.direction.symbol()).collect()
}
