use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::{Malformation, MazeError};

/// A cell position, `x` counts columns from the left and `y` rows from the top
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The neighbouring point one step in `direction`, if it does not leave the positive quadrant
    pub fn step(self, direction: Direction) -> Option<Point> {
        let (dx, dy) = direction.offset();
        Some(Point {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl From<[usize; 2]> for Point {
    fn from([x, y]: [usize; 2]) -> Self {
        Point { x, y }
    }
}

impl From<Point> for [usize; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Terrain {
    Open,
    Start,
    End,
    Wall,
    // open cell with a declared traversal cost
    Weighted(u32),
}

impl Terrain {
    /// Classify a single cell value found at `at`
    pub fn parse(value: &str, at: Point) -> Result<Self, Malformation> {
        match value {
            " " | "." => Ok(Terrain::Open),
            "A" => Ok(Terrain::Start),
            "B" => Ok(Terrain::End),
            "X" => Ok(Terrain::Wall),
            digits if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                match digits.parse::<u32>() {
                    Ok(0) => Err(Malformation::ZeroWeight { at }),
                    Ok(cost) => Ok(Terrain::Weighted(cost)),
                    Err(_) => Err(Malformation::UnknownCell {
                        at,
                        value: value.to_string(),
                    }),
                }
            }
            _ => Err(Malformation::UnknownCell {
                at,
                value: value.to_string(),
            }),
        }
    }

    pub fn is_traversable(&self) -> bool {
        !matches!(self, Terrain::Wall)
    }

    /// Cost of moving onto a cell of this terrain
    pub fn cost(&self) -> Option<u32> {
        match self {
            Terrain::Wall => None,
            Terrain::Weighted(cost) => Some(*cost),
            Terrain::Open | Terrain::Start | Terrain::End => Some(1),
        }
    }
}

impl Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Terrain::Open => write!(f, " "),
            Terrain::Start => write!(f, "A"),
            Terrain::End => write!(f, "B"),
            Terrain::Wall => write!(f, "X"),
            Terrain::Weighted(cost) => write!(f, "{}", cost),
        }
    }
}

/// A validated rectangular maze with exactly one start and one end cell.
///
/// Cells are stored row-major in a single vec; the grid never changes after parsing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Terrain>,
    start: Point,
    end: Point,
}

impl Grid {
    /// Build a grid from rows of cell values, in the format used by the maze service
    /// (`" "` open, `"A"` start, `"B"` end, `"X"` wall, a positive number for a weighted cell).
    pub fn from_rows<I, R, C>(rows: I) -> Result<Self, MazeError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let mut width = None;
        let mut height = 0;
        let mut cells = Vec::new();
        let mut start = None;
        let mut end = None;

        for (y, row) in rows.into_iter().enumerate() {
            let mut found = 0;
            for (x, value) in row.into_iter().enumerate() {
                let at = Point { x, y };
                let terrain = Terrain::parse(value.as_ref(), at)?;

                match terrain {
                    Terrain::Start => {
                        if let Some(first) = start {
                            return Err(Malformation::DuplicateStart { first, second: at }.into());
                        }
                        start = Some(at);
                    }
                    Terrain::End => {
                        if let Some(first) = end {
                            return Err(Malformation::DuplicateEnd { first, second: at }.into());
                        }
                        end = Some(at);
                    }
                    _ => {}
                }

                cells.push(terrain);
                found += 1;
            }

            let expected = *width.get_or_insert(found);
            if found != expected {
                return Err(Malformation::RaggedRow {
                    row: y,
                    expected,
                    found,
                }
                .into());
            }
            height += 1;
        }

        let width = width.unwrap_or(0);
        if width == 0 {
            return Err(Malformation::Empty.into());
        }

        Ok(Self {
            width,
            height,
            cells,
            start: start.ok_or(Malformation::MissingStart)?,
            end: end.ok_or(Malformation::MissingEnd)?,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x < self.width && p.y < self.height
    }

    /// The terrain at `p`, or `None` when `p` lies outside the grid
    pub fn get(&self, p: Point) -> Option<Terrain> {
        if self.contains(p) {
            Some(self.cells[p.y * self.width + p.x])
        } else {
            None
        }
    }

    /// All points in row-major order
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point { x, y }))
    }

    pub fn cells(&self) -> impl Iterator<Item = (Point, Terrain)> + '_ {
        self.points().zip(self.cells.iter().copied())
    }

    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|t| t.to_string()).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<String>>> for Grid {
    type Error = MazeError;

    fn try_from(rows: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<String>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

/// Parses the text form of a maze: one line per row, one character per cell.
/// Weighted cells can only be single digits here, use [`Grid::from_rows`] for larger costs.
impl FromStr for Grid {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::from_rows(s.lines().map(|line| {
            line.chars()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
        }))
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.width) {
            for cell in row {
                match cell {
                    Terrain::Weighted(cost) if *cost > 9 => write!(f, "#")?,
                    _ => write!(f, "{}", cell)?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
