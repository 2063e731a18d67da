use serde::{Deserialize, Serialize};

use crate::edge_set::{EdgeId, EdgeSet};
use crate::{Direction, IllegalMove, InvalidDimensions, InvalidSnapshot, Player};

/// The largest number of rows or columns a board may have.
pub const MAX_DIMENSION: usize = 64;

/// A snapshot of a single box: which of its four edges are drawn, and who
/// owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Cell {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
    /// Set when a move through [`GameState`](crate::GameState) completes the
    /// box. Drawing edges with [`Grid::set_edge()`] never assigns an owner.
    pub owner: Option<Player>,
}

impl Cell {
    pub fn has_edge(self, direction: Direction) -> bool {
        match direction {
            Direction::Top => self.top,
            Direction::Right => self.right,
            Direction::Bottom => self.bottom,
            Direction::Left => self.left,
        }
    }

    pub fn num_edges(self) -> u8 {
        self.top as u8 + self.right as u8 + self.bottom as u8 + self.left as u8
    }

    pub fn is_complete(self) -> bool {
        self.num_edges() == 4
    }
}

/// The edges and box owners of a board with `rows x cols` boxes.
///
/// Each edge is stored once, no matter how many boxes it borders, so the two
/// boxes sharing an edge can never disagree about it. [`Cell`]s are derived
/// views on this.
///
/// The edges are numbered as follows: first the horizontal edges, row by row
/// (`rows + 1` rows of `cols` edges each), then the vertical edges, row by row
/// (`rows` rows of `cols + 1` edges each).
///
/// Deserialization checks that the edges and owners fit the dimensions, and
/// that only complete boxes have an owner.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    rows: usize,
    cols: usize,
    edges: EdgeSet,
    /// Row-major, one entry per box.
    owners: Vec<Option<Player>>,
}

#[derive(Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    edges: EdgeSet,
    owners: Vec<Option<Player>>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = InvalidSnapshot;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let empty = Grid::new(raw.rows, raw.cols)?;
        if raw.edges.capacity() != empty.num_edges() {
            return Err(InvalidSnapshot::EdgeCount {
                expected: empty.num_edges(),
                found: raw.edges.capacity(),
            });
        }
        if raw.owners.len() != empty.owners.len() {
            return Err(InvalidSnapshot::OwnerCount {
                expected: empty.owners.len(),
                found: raw.owners.len(),
            });
        }
        let grid = Grid {
            edges: raw.edges,
            owners: raw.owners,
            ..empty
        };
        if let Some((row, col, _)) = grid
            .iter()
            .find(|(_, _, cell)| cell.owner.is_some() && !cell.is_complete())
        {
            return Err(InvalidSnapshot::OwnerOfIncompleteBox { row, col });
        }
        Ok(grid)
    }
}

impl Grid {
    /// Creates a board with no edges drawn and no boxes owned.
    pub fn new(rows: usize, cols: usize) -> Result<Self, InvalidDimensions> {
        if !(1..=MAX_DIMENSION).contains(&rows) || !(1..=MAX_DIMENSION).contains(&cols) {
            return Err(InvalidDimensions { rows, cols });
        }
        let num_edges = 2 * rows * cols + rows + cols;
        Ok(Self {
            rows,
            cols,
            edges: EdgeSet::new(num_edges),
            owners: vec![None; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// The total number of edges on the board.
    pub fn num_edges(&self) -> usize {
        self.edges.capacity()
    }

    pub fn num_drawn_edges(&self) -> usize {
        self.edges.len()
    }

    /// Are all edges drawn?
    pub fn is_full(&self) -> bool {
        self.edges.is_full()
    }

    /// Is the given edge drawn? Out-of-bounds boxes have no edges.
    pub fn has_edge(&self, row: usize, col: usize, direction: Direction) -> bool {
        self.edge_id(row, col, direction)
            .is_some_and(|id| self.edges.contains(id))
    }

    /// Draws an edge.
    ///
    /// Because shared edges are stored once, the neighboring box sees the
    /// edge as well. Drawing an edge that is already drawn does nothing and
    /// returns `Ok(false)`.
    pub fn set_edge(
        &mut self,
        row: usize,
        col: usize,
        direction: Direction,
    ) -> Result<bool, IllegalMove> {
        let id = self
            .edge_id(row, col, direction)
            .ok_or(IllegalMove::OutOfBounds { row, col })?;
        Ok(self.edges.insert(id))
    }

    /// Returns the box at the given coordinates.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if !self.is_in_bounds(row, col) {
            return None;
        }
        Some(Cell {
            top: self.has_edge(row, col, Direction::Top),
            right: self.has_edge(row, col, Direction::Right),
            bottom: self.has_edge(row, col, Direction::Bottom),
            left: self.has_edge(row, col, Direction::Left),
            owner: self.owners[row * self.cols + col],
        })
    }

    /// Are all four edges of the box drawn?
    pub fn is_complete(&self, row: usize, col: usize) -> bool {
        self.is_in_bounds(row, col)
            && Direction::ALL
                .iter()
                .all(|&direction| self.has_edge(row, col, direction))
    }

    pub fn owner(&self, row: usize, col: usize) -> Option<Player> {
        if !self.is_in_bounds(row, col) {
            return None;
        }
        self.owners[row * self.cols + col]
    }

    /// The number of boxes with all four edges drawn.
    pub fn num_complete(&self) -> usize {
        self.iter().filter(|(_, _, cell)| cell.is_complete()).count()
    }

    pub fn num_owned(&self) -> usize {
        self.owners.iter().filter(|owner| owner.is_some()).count()
    }

    /// All boxes in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).filter_map(move |col| self.cell(row, col).map(|cell| (row, col, cell)))
        })
    }

    pub(crate) fn set_owner(&mut self, row: usize, col: usize, player: Player) {
        debug_assert!(self.is_complete(row, col));
        self.owners[row * self.cols + col] = Some(player);
    }

    pub(crate) fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains(id)
    }

    pub(crate) fn insert_edge(&mut self, id: EdgeId) {
        self.edges.insert(id);
    }

    /// The canonical id of an edge, or `None` if the box is out of bounds.
    pub(crate) fn edge_id(&self, row: usize, col: usize, direction: Direction) -> Option<EdgeId> {
        if !self.is_in_bounds(row, col) {
            return None;
        }
        let num_horizontal = (self.rows + 1) * self.cols;
        let id = match direction {
            Direction::Top => row * self.cols + col,
            Direction::Bottom => (row + 1) * self.cols + col,
            Direction::Left => num_horizontal + row * (self.cols + 1) + col,
            Direction::Right => num_horizontal + row * (self.cols + 1) + col + 1,
        };
        Some(EdgeId(id))
    }

    /// The one or two boxes bordering an edge.
    pub(crate) fn boxes_on_edge(&self, id: EdgeId) -> impl Iterator<Item = (usize, usize)> {
        let num_horizontal = (self.rows + 1) * self.cols;
        let (before, after) = if id.0 < num_horizontal {
            let (row, col) = (id.0 / self.cols, id.0 % self.cols);
            (
                row.checked_sub(1).map(|above| (above, col)),
                (row < self.rows).then_some((row, col)),
            )
        } else {
            let k = id.0 - num_horizontal;
            let (row, col) = (k / (self.cols + 1), k % (self.cols + 1));
            (
                col.checked_sub(1).map(|left| (row, left)),
                (col < self.cols).then_some((row, col)),
            )
        };
        before.into_iter().chain(after)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    #[test]
    fn rejects_empty_and_huge_boards() {
        assert_eq!(Grid::new(0, 3), Err(InvalidDimensions { rows: 0, cols: 3 }));
        assert_eq!(Grid::new(3, 0), Err(InvalidDimensions { rows: 3, cols: 0 }));
        assert!(Grid::new(MAX_DIMENSION + 1, 1).is_err());
        assert!(Grid::new(MAX_DIMENSION, MAX_DIMENSION).is_ok());
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new(3, 4).unwrap();
        assert_eq!(grid.num_edges(), 2 * 3 * 4 + 3 + 4);
        assert_eq!(grid.num_drawn_edges(), 0);
        assert_eq!(grid.num_complete(), 0);
        assert_eq!(grid.num_owned(), 0);
        assert!(grid.iter().all(|(_, _, cell)| cell == Cell::default()));
    }

    #[test]
    fn set_edge_is_seen_by_neighbor() {
        let mut grid = Grid::new(2, 2).unwrap();
        assert_eq!(grid.set_edge(0, 0, Direction::Right), Ok(true));
        assert!(grid.cell(0, 1).unwrap().left);
        assert_eq!(grid.set_edge(1, 1, Direction::Top), Ok(true));
        assert!(grid.cell(0, 1).unwrap().bottom);
        // Same edge, named from the other box
        assert_eq!(grid.set_edge(0, 1, Direction::Left), Ok(false));
        assert_eq!(grid.num_drawn_edges(), 2);
    }

    #[test]
    fn boundary_edge_touches_one_box() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_edge(0, 1, Direction::Right).unwrap();
        assert_eq!(grid.cell(0, 1).unwrap().num_edges(), 1);
        let others = [(0, 0), (1, 0), (1, 1)];
        assert!(others
            .iter()
            .all(|&(r, c)| grid.cell(r, c).unwrap().num_edges() == 0));
    }

    #[test]
    fn set_edge_out_of_bounds() {
        let mut grid = Grid::new(2, 3).unwrap();
        assert_eq!(
            grid.set_edge(2, 0, Direction::Top),
            Err(IllegalMove::OutOfBounds { row: 2, col: 0 })
        );
        assert_eq!(grid.num_drawn_edges(), 0);
        assert!(!grid.has_edge(0, 3, Direction::Left));
    }

    #[test]
    fn complete_box() {
        let mut grid = Grid::new(1, 2).unwrap();
        for direction in [Direction::Top, Direction::Bottom, Direction::Left] {
            grid.set_edge(0, 0, direction).unwrap();
        }
        assert!(!grid.is_complete(0, 0));
        grid.set_edge(0, 1, Direction::Left).unwrap();
        assert!(grid.is_complete(0, 0));
        assert!(!grid.is_complete(0, 1));
        assert_eq!(grid.num_complete(), 1);
    }

    #[test]
    fn deserialize_rejects_malformed_grids() {
        let parse = |json: &str| serde_json::from_str::<Grid>(json).map_err(|e| e.to_string());
        // Edge words missing entirely
        assert!(parse(r#"{"rows":3,"cols":3,"edges":{"words":[],"capacity":24},"owners":[]}"#).is_err());
        // Capacity that does not fit a 1x1 board
        let wrong_capacity =
            parse(r#"{"rows":1,"cols":1,"edges":{"words":[0],"capacity":7},"owners":[null]}"#);
        assert!(wrong_capacity.unwrap_err().contains("Expected 4 edges"));
        // Too few owners
        assert!(parse(r#"{"rows":1,"cols":2,"edges":{"words":[0],"capacity":7},"owners":[null]}"#).is_err());
        // Owner of a box with no edges
        let stray_owner =
            parse(r#"{"rows":1,"cols":1,"edges":{"words":[0],"capacity":4},"owners":["human"]}"#);
        assert!(stray_owner.unwrap_err().contains("not complete"));
        assert!(parse(r#"{"rows":0,"cols":1,"edges":{"words":[],"capacity":0},"owners":[]}"#).is_err());
    }

    #[test]
    fn deserialize_accepts_unowned_complete_box() {
        let mut grid = Grid::new(1, 1).unwrap();
        for direction in Direction::ALL {
            grid.set_edge(0, 0, direction).unwrap();
        }
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);
    }

    quickcheck! {
        fn edge_ids_are_canonical(rows: u8, cols: u8) -> bool {
            let rows = usize::from(rows % 6) + 1;
            let cols = usize::from(cols % 6) + 1;
            let grid = Grid::new(rows, cols).unwrap();
            let mut seen = vec![0u8; grid.num_edges()];
            for (row, col, _) in grid.iter() {
                for direction in Direction::ALL {
                    let id = grid.edge_id(row, col, direction).unwrap();
                    seen[id.0] += 1;
                    // The edge borders the box that named it
                    if !grid.boxes_on_edge(id).any(|b| b == (row, col)) {
                        return false;
                    }
                }
            }
            // Every edge is named by exactly as many boxes as it borders
            (0..grid.num_edges()).all(|id| {
                usize::from(seen[id]) == grid.boxes_on_edge(EdgeId(id)).count()
            })
        }
    }
}
