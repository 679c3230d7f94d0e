use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use mazesolver::{
    solve,
    util::{load_maze, Submission},
    Graph, SolveState, SolverOptions, StopAt,
};

/// Solve a maze and print the moves from A to B
#[derive(Debug, Parser)]
struct CLIArgs {
    /// Maze file: a JSON maze document, or one text line per row
    maze: PathBuf,
    /// Stop as soon as the end cell is first reached
    #[arg(long)]
    early_exit: bool,
    /// Also print the cost of every reached cell
    #[arg(long)]
    heatmap: bool,
    /// Print the solution as the JSON body expected by the maze service
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CLIArgs::parse();

    let maze = load_maze(&args.maze)?;
    info!(
        "Loaded {} ({}x{})",
        maze.name.as_deref().unwrap_or("maze"),
        maze.map.width(),
        maze.map.height()
    );

    let options = SolverOptions {
        stop_at: if args.early_exit {
            StopAt::Discovered
        } else {
            StopAt::Settled
        },
    };

    let graph = Graph::build(&maze.map);
    let solution = solve(&graph, &options);

    if args.heatmap {
        println!("{}", maze.map);
        println!("{}", solution.distances);
    }

    match &solution.state {
        SolveState::Found(route) => {
            info!(
                "Route of {} moves, cost {}, {} nodes settled",
                route.len(),
                route.total_cost,
                solution.stats.settled
            );
            if args.json {
                println!("{}", serde_json::to_string(&Submission::from(route))?);
            } else {
                println!("{}", route);
            }
            Ok(())
        }
        SolveState::NoRoute | SolveState::Searching => bail!(
            "No route from {} to {} in {}",
            maze.map.start(),
            maze.map.end(),
            args.maze.display()
        ),
    }
}
