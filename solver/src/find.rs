use std::{cmp::Ordering, collections::BinaryHeap, fmt::Display};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::direction::{serialize, Direction, Step};
use crate::graph::{Graph, NodeId};
use crate::grid::Point;

/// When the search may stop once the goal has been seen
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopAt {
    /// Stop when the goal is taken off the frontier, its cost is then final
    #[default]
    Settled,
    /// Stop as soon as any relaxation reaches the goal.
    ///
    /// Every edge into a node carries that node's cost, so the first relaxation
    /// reaching the goal already comes from its cheapest neighbour and the
    /// result matches [`StopAt::Settled`], with fewer nodes expanded.
    Discovered,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    pub stop_at: StopAt,
}

/// The objects that we store in the priority queue
#[derive(Debug, Eq, PartialEq)]
struct ToVisit {
    cost: u64,
    // insertion order, ties between equal costs are served first in first out
    seq: u64,
    node: NodeId,
}

impl Ord for ToVisit {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse for BinaryHeap to be a min-heap
        self.cost
            .cmp(&other.cost)
            .then(self.seq.cmp(&other.seq))
            .reverse()
    }
}

impl PartialOrd for ToVisit {
    fn partial_cmp(&self, other: &ToVisit) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The edge a node was last improved through
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Via {
    pub from: NodeId,
    pub direction: Direction,
    pub weight: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Distance {
    pub cost: u64,
    pub via: Option<Via>,
}

/// Best known cost and predecessor of every node touched by one search
#[derive(Clone, Debug)]
pub struct DistanceTable {
    width: usize,
    entries: Vec<Option<Distance>>,
}

impl DistanceTable {
    fn new(graph: &Graph) -> Self {
        Self {
            width: graph.width(),
            entries: vec![None; graph.capacity()],
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Distance> {
        self.entries.get(id.index()).and_then(Option::as_ref)
    }

    pub fn at(&self, p: Point) -> Option<&Distance> {
        if p.x >= self.width {
            return None;
        }
        self.get(NodeId::of(p, self.width))
    }

    pub fn cost_at(&self, p: Point) -> Option<u64> {
        self.at(p).map(|d| d.cost)
    }

    /// Number of nodes that received a finite cost
    pub fn reached(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    fn set(&mut self, id: NodeId, distance: Distance) {
        self.entries[id.index()] = Some(distance);
    }
}

/// Renders the table as a cost heat-map, one row of the grid per line
impl Display for DistanceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.entries.chunks(self.width.max(1)) {
            for entry in row {
                match entry {
                    Some(distance) => write!(f, "{:03} ", distance.cost)?,
                    None => write!(f, "  . ")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// A minimum cost sequence of moves. `steps` starts with the cell after
/// `start` and ends with `end`; it is empty when both are the same cell.
#[derive(Debug, PartialEq, Clone, Eq, Serialize, Deserialize)]
pub struct Route {
    pub start: Point,
    pub end: Point,
    pub total_cost: u64,
    pub steps: Vec<Step>,
}

impl Route {
    /// The move string, e.g. `"SSEE"`
    pub fn moves(&self) -> String {
        serialize(&self.steps)
    }

    /// Every cell visited, start included
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.start).chain(self.steps.iter().map(|s| s.point))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.moves())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveState {
    Searching,
    NoRoute,
    Found(Route),
}

impl SolveState {
    pub fn is_done(&self) -> bool {
        !matches!(self, SolveState::Searching)
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            SolveState::Found(route) => Some(route),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes taken off the frontier and expanded
    pub settled: usize,
    /// Edges relaxed, each at most once
    pub relaxed: usize,
}

/// Incremental shortest path search over a [`Graph`].
///
/// Call [`PathFinder::step`] repeatedly, or [`PathFinder::finish`] to run to the end.
#[derive(Debug)]
pub struct PathFinder<'g> {
    graph: &'g Graph,
    start: NodeId,
    goal: NodeId,
    options: SolverOptions,
    distances: DistanceTable,
    settled: Vec<bool>,
    visit_list: BinaryHeap<ToVisit>,
    next_seq: u64,
    state: SolveState,
    stats: SearchStats,
}

impl<'g> PathFinder<'g> {
    /// Search from the graph's start node to its end node
    pub fn new(graph: &'g Graph, options: SolverOptions) -> Self {
        Self::between(graph, graph.start(), graph.end(), options)
    }

    pub fn between(graph: &'g Graph, start: NodeId, goal: NodeId, options: SolverOptions) -> Self {
        let mut finder = Self {
            graph,
            start,
            goal,
            options,
            distances: DistanceTable::new(graph),
            settled: vec![false; graph.capacity()],
            visit_list: BinaryHeap::new(),
            next_seq: 0,
            state: SolveState::Searching,
            stats: SearchStats::default(),
        };

        // an unknown or wall start leaves the frontier empty
        if graph.node(start).is_some() {
            finder.distances.set(start, Distance { cost: 0, via: None });
            finder.push(start, 0);
        }

        finder
    }

    fn push(&mut self, node: NodeId, cost: u64) {
        self.visit_list.push(ToVisit {
            cost,
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
    }

    /// Run the search to completion, handing back the outcome and the distance table
    pub fn finish(mut self) -> (SolveState, DistanceTable) {
        while !self.step().is_done() {}
        (self.state, self.distances)
    }

    pub fn step(&mut self) -> &SolveState {
        if self.state.is_done() {
            return &self.state;
        }

        let Some(visit) = self.visit_list.pop() else {
            debug!(
                "No route from {} to {}: frontier exhausted after settling {} nodes",
                self.graph.point_of(self.start),
                self.graph.point_of(self.goal),
                self.stats.settled
            );
            self.state = SolveState::NoRoute;
            return &self.state;
        };

        // stale entry, the node was already expanded at a lower cost
        if self.settled[visit.node.index()] {
            return &self.state;
        }
        self.settled[visit.node.index()] = true;
        self.stats.settled += 1;

        if visit.node == self.goal {
            self.state = SolveState::Found(self.trace_route());
            return &self.state;
        }

        let graph = self.graph;
        let Some(node) = graph.node(visit.node) else {
            return &self.state;
        };
        trace!("Expanding {} at cost {}", node.point(), visit.cost);

        for edge in node.edges() {
            if self.settled[edge.to.index()] {
                continue;
            }
            self.stats.relaxed += 1;

            let sum = visit.cost + u64::from(edge.weight);
            let improves = self
                .distances
                .get(edge.to)
                .map_or(true, |known| sum < known.cost);
            if !improves {
                continue;
            }

            self.distances.set(
                edge.to,
                Distance {
                    cost: sum,
                    via: Some(Via {
                        from: visit.node,
                        direction: edge.direction,
                        weight: edge.weight,
                    }),
                },
            );
            self.push(edge.to, sum);

            if edge.to == self.goal && self.options.stop_at == StopAt::Discovered {
                self.state = SolveState::Found(self.trace_route());
                return &self.state;
            }
        }

        &self.state
    }

    /// Follow the recorded predecessors back from the goal and reverse them
    fn trace_route(&self) -> Route {
        let mut steps = Vec::new();
        let mut current = self.goal;

        while let Some(Distance { via: Some(via), .. }) = self.distances.get(current) {
            steps.push(Step {
                point: self.graph.point_of(current),
                direction: via.direction,
            });
            current = via.from;
        }
        steps.reverse();

        let total_cost = self.distances.get(self.goal).map_or(0, |d| d.cost);
        debug!(
            "Found route of {} moves with cost {} after settling {} nodes and relaxing {} edges",
            steps.len(),
            total_cost,
            self.stats.settled,
            self.stats.relaxed
        );

        Route {
            start: self.graph.point_of(self.start),
            end: self.graph.point_of(self.goal),
            total_cost,
            steps,
        }
    }

    pub fn state(&self) -> &SolveState {
        &self.state
    }

    pub fn get_visited(&self) -> &DistanceTable {
        &self.distances
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn goal(&self) -> NodeId {
        self.goal
    }
}

/// The result of solving one maze
#[derive(Debug, Clone)]
pub struct Solution {
    pub state: SolveState,
    pub distances: DistanceTable,
    pub stats: SearchStats,
}

impl Solution {
    pub fn route(&self) -> Option<&Route> {
        self.state.route()
    }
}

/// Find the cheapest route from the graph's start to its end
pub fn solve(graph: &Graph, options: &SolverOptions) -> Solution {
    let mut finder = PathFinder::new(graph, options.clone());
    while !finder.step().is_done() {}

    Solution {
        state: finder.state,
        distances: finder.distances,
        stats: finder.stats,
    }
}
