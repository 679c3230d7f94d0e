use std::fmt::Display;

use log::debug;

use crate::direction::Direction;
use crate::grid::{Grid, Point, Terrain};

/// Order in which the neighbours of a node are probed
const PROBE_ORDER: [Direction; 4] = [
    Direction::West,
    Direction::East,
    Direction::North,
    Direction::South,
];

/// Stable node identity derived from the cell position: `y * width + x`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn of(p: Point, width: usize) -> Self {
        NodeId(p.y * width + p.x)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A directed connection to a cardinal neighbour
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Edge {
    pub to: NodeId,
    pub weight: u32,
    pub direction: Direction,
}

#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    point: Point,
    terrain: Terrain,
    // what it costs to step onto this node
    cost: u32,
    edges: Vec<Edge>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Outgoing edges, in the order they were discovered
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Add an outgoing edge, replacing any existing edge to the same node
    fn connect(&mut self, edge: Edge) {
        match self.edges.iter_mut().find(|e| e.to == edge.to) {
            Some(existing) => *existing = edge,
            None => self.edges.push(edge),
        }
    }
}

/// Arena of nodes for every traversable cell of a [`Grid`].
///
/// Slots are indexed by [`NodeId`]; wall cells leave their slot empty. Edges
/// refer to other nodes by id only, so all lookups go through the graph.
#[derive(Clone, Debug)]
pub struct Graph {
    width: usize,
    height: usize,
    nodes: Vec<Option<Node>>,
    start: NodeId,
    end: NodeId,
}

impl Graph {
    pub fn build(grid: &Grid) -> Self {
        let width = grid.width();

        let nodes = grid
            .cells()
            .map(|(point, terrain)| {
                terrain.cost().map(|cost| Node {
                    id: NodeId::of(point, width),
                    point,
                    terrain,
                    cost,
                    edges: Vec::with_capacity(4),
                })
            })
            .collect();

        let mut graph = Self {
            width,
            height: grid.height(),
            nodes,
            start: NodeId::of(grid.start(), width),
            end: NodeId::of(grid.end(), width),
        };

        for index in 0..graph.nodes.len() {
            graph.discover_neighbors(NodeId(index));
        }

        debug!(
            "Built graph for {}x{} grid: {} nodes, {} edges",
            graph.width,
            graph.height,
            graph.node_count(),
            graph.edge_count()
        );

        graph
    }

    /// Connect `id` with every traversable cardinal neighbour, in both directions
    fn discover_neighbors(&mut self, id: NodeId) {
        let Some(point) = self.node(id).map(Node::point) else {
            return;
        };

        for direction in PROBE_ORDER {
            let Some(to) = point.step(direction).and_then(|next| self.id_of(next)) else {
                continue;
            };
            self.connect(id, to, direction);
        }
    }

    fn connect(&mut self, from: NodeId, to: NodeId, direction: Direction) {
        let (Some(a), Some(b)) = (self.node(from), self.node(to)) else {
            return;
        };
        debug_assert_eq!(Direction::between(a.point, b.point).ok(), Some(direction));

        let forward = Edge {
            to,
            weight: b.cost,
            direction,
        };
        let backward = Edge {
            to: from,
            weight: a.cost,
            direction: direction.opposite(),
        };

        if let Some(node) = self.nodes[from.0].as_mut() {
            node.connect(forward);
        }
        if let Some(node) = self.nodes[to.0].as_mut() {
            node.connect(backward);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    /// Number of id slots, walls included
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_at(&self, p: Point) -> Option<&Node> {
        self.id_of(p).and_then(|id| self.node(id))
    }

    /// The id of the node at `p`, if `p` is inside the grid and not a wall
    pub fn id_of(&self, p: Point) -> Option<NodeId> {
        if p.x >= self.width || p.y >= self.height {
            return None;
        }
        let id = NodeId::of(p, self.width);
        self.node(id).map(|_| id)
    }

    /// The cell position of an id slot, whether or not it holds a node
    pub fn point_of(&self, id: NodeId) -> Point {
        Point {
            x: id.0 % self.width,
            y: id.0 / self.width,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().flatten()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes().map(|n| n.edges.len()).sum()
    }
}

impl From<&Grid> for Graph {
    fn from(grid: &Grid) -> Self {
        Graph::build(grid)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn create_basic_graph() -> (Grid, Graph) {
        let grid: Grid = "A.X\n.X.\n..B".parse().unwrap();
        let graph = Graph::build(&grid);
        (grid, graph)
    }

    #[test]
    fn test_node_per_open_cell() {
        let (grid, graph) = create_basic_graph();

        let open = grid.cells().filter(|(_, t)| t.is_traversable()).count();
        assert_eq!(graph.node_count(), open);
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.capacity(), 9);

        assert!(graph.node_at(Point::new(2, 0)).is_none());
        assert!(graph.node_at(Point::new(1, 1)).is_none());
        assert!(graph.node_at(Point::new(3, 0)).is_none());
    }

    #[test]
    fn test_ids() {
        let (_, graph) = create_basic_graph();

        assert_eq!(graph.start(), NodeId(0));
        assert_eq!(graph.end(), NodeId(8));
        assert_eq!(graph.id_of(Point::new(1, 2)), Some(NodeId(7)));
        assert_eq!(graph.point_of(NodeId(7)), Point::new(1, 2));
        assert_eq!(graph.node(NodeId(5)).map(Node::point), Some(Point::new(2, 1)));
    }

    #[test]
    fn test_edges() {
        let (_, graph) = create_basic_graph();

        let start = graph.node(graph.start()).unwrap();
        assert_eq!(
            start.edges(),
            &[
                Edge {
                    to: NodeId(1),
                    weight: 1,
                    direction: Direction::East
                },
                Edge {
                    to: NodeId(3),
                    weight: 1,
                    direction: Direction::South
                },
            ]
        );

        // (2, 1) is only reachable from the end node below it
        let lonely = graph.node_at(Point::new(2, 1)).unwrap();
        assert_eq!(lonely.edges().len(), 1);
        assert_eq!(lonely.edges()[0].direction, Direction::South);

        // 3 + 2 corridor pairs and the (2,1)-(2,2) pair, both directions
        assert_eq!(graph.edge_count(), 12);
    }

    #[test]
    fn test_edge_invariants() {
        let grid: Grid = "A...X\n.X.X.\n..2..\nX.9.B".parse().unwrap();
        let graph = Graph::build(&grid);

        for node in graph.nodes() {
            assert!(node.edges().len() <= 4);

            for (i, edge) in node.edges().iter().enumerate() {
                let target = graph.node(edge.to).unwrap();
                assert_eq!(
                    Direction::between(node.point(), target.point()),
                    Ok(edge.direction)
                );
                assert_eq!(edge.weight, target.cost());
                assert!(node.edges()[i + 1..].iter().all(|e| e.to != edge.to));

                let reverse = target.edges().iter().find(|e| e.to == node.id()).unwrap();
                assert_eq!(reverse.direction, edge.direction.opposite());
                assert_eq!(reverse.weight, node.cost());
            }
        }
    }

    #[test]
    fn test_symmetric_when_unweighted() {
        let (_, graph) = create_basic_graph();

        for node in graph.nodes() {
            for edge in node.edges() {
                let reverse = graph
                    .node(edge.to)
                    .unwrap()
                    .edges()
                    .iter()
                    .find(|e| e.to == node.id())
                    .unwrap();
                assert_eq!(reverse.weight, edge.weight);
            }
        }
    }

    #[test]
    fn test_weighted_edges() {
        let grid: Grid = "A5B".parse().unwrap();
        let graph = Graph::build(&grid);

        let start = graph.node(graph.start()).unwrap();
        assert_eq!(start.edges()[0].weight, 5);

        let middle = graph.node_at(Point::new(1, 0)).unwrap();
        assert!(middle.edges().iter().all(|e| e.weight == 1));
    }

    #[test]
    fn test_rediscovery_is_idempotent() {
        let (_, mut graph) = create_basic_graph();
        let before: Vec<Vec<Edge>> = graph.nodes().map(|n| n.edges().to_vec()).collect();

        for index in 0..graph.capacity() {
            graph.discover_neighbors(NodeId(index));
        }

        let after: Vec<Vec<Edge>> = graph.nodes().map(|n| n.edges().to_vec()).collect();
        assert_eq!(before, after);
    }
}
