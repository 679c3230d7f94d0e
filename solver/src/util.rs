use std::{fs, path::Path};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::{Grid, Point, Route};

/// A maze document as served by the maze service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    // where solutions for this maze are posted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maze_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending_position: Option<Point>,
    pub map: Grid,
}

impl MazeDefinition {
    pub fn from_grid(map: Grid) -> Self {
        Self {
            name: None,
            maze_path: None,
            starting_position: None,
            ending_position: None,
            map,
        }
    }

    /// Make sure the declared start and end positions agree with the map
    pub fn check(&self) -> anyhow::Result<()> {
        if let Some(declared) = self.starting_position {
            if declared != self.map.start() {
                return Err(anyhow!(
                    "Declared starting position {} but the map starts at {}",
                    declared,
                    self.map.start()
                ));
            }
        }
        if let Some(declared) = self.ending_position {
            if declared != self.map.end() {
                return Err(anyhow!(
                    "Declared ending position {} but the map ends at {}",
                    declared,
                    self.map.end()
                ));
            }
        }
        Ok(())
    }
}

/// The body posted back to the maze service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub directions: String,
}

impl From<&Route> for Submission {
    fn from(route: &Route) -> Self {
        Self {
            directions: route.moves(),
        }
    }
}

/// Parse a maze from either a JSON maze document or the plain text grid format
pub fn parse_maze(contents: &str, json: bool) -> anyhow::Result<MazeDefinition> {
    let maze = if json {
        serde_json::from_str(contents).context("Invalid maze document")?
    } else {
        MazeDefinition::from_grid(contents.parse()?)
    };

    maze.check()?;
    Ok(maze)
}

/// Load a maze from disk, `.json` files are read as maze documents
pub fn load_maze(path: impl AsRef<Path>) -> anyhow::Result<MazeDefinition> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read maze from {}", path.display()))?;

    let json = path.extension().is_some_and(|ext| ext == "json");
    parse_maze(&contents, json).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{solve, Graph, SolverOptions};

    const DOCUMENT: &str = r#"{
        "name": "Maze #1",
        "mazePath": "/mazebot/mazes/abc",
        "startingPosition": [0, 0],
        "endingPosition": [2, 2],
        "map": [["A", " ", "X"], [" ", "X", " "], [" ", " ", "B"]]
    }"#;

    #[test]
    fn test_parse_document() {
        let maze = parse_maze(DOCUMENT, true).unwrap();

        assert_eq!(maze.name.as_deref(), Some("Maze #1"));
        assert_eq!(maze.maze_path.as_deref(), Some("/mazebot/mazes/abc"));
        assert_eq!(maze.map.start(), Point::new(0, 0));
        assert_eq!(maze.map, "A.X\n.X.\n..B".parse::<Grid>().unwrap());
    }

    #[test]
    fn test_declared_positions_must_match() {
        let document = DOCUMENT.replace("\"endingPosition\": [2, 2]", "\"endingPosition\": [2, 1]");

        let err = parse_maze(&document, true).unwrap_err();
        assert!(err.to_string().contains("ending position"));
    }

    #[test]
    fn test_malformed_document() {
        let document = DOCUMENT.replace("\"X\", \" \"]", "\"A\", \" \"]");

        assert!(parse_maze(&document, true).is_err());
        assert!(parse_maze("A.A\n..B", false).is_err());
    }

    #[test]
    fn test_submission() {
        let maze = parse_maze("A.X\n.X.\n..B", false).unwrap();
        let solution = solve(&Graph::build(&maze.map), &SolverOptions::default());

        let submission = Submission::from(solution.route().unwrap());
        assert_eq!(
            serde_json::to_string(&submission).unwrap(),
            r#"{"directions":"SSEE"}"#
        );
    }

    #[test]
    fn test_load_sample() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample.json");
        let maze = load_maze(&path).unwrap();

        let solution = solve(&Graph::build(&maze.map), &SolverOptions::default());
        assert_eq!(solution.route().map(|r| r.total_cost), Some(28));

        assert!(load_maze(Path::new(env!("CARGO_MANIFEST_DIR")).join("data/missing.json")).is_err());
    }
}
