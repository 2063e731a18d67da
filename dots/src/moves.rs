use crate::{Direction, GameState, Move};

impl GameState {
    /// Returns every edge that has not been drawn yet, each exactly once.
    ///
    /// Boxes are visited in row-major order and their sides in the order of
    /// [`Direction::ALL`]. An interior edge is produced under the name of the
    /// first box that visits it, i.e. as the right edge of the box to its left
    /// or the bottom edge of the box above it.
    ///
    /// The order is stable, which the AI relies on for breaking ties.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        let grid = self.grid();
        (0..grid.rows()).flat_map(move |row| {
            (0..grid.cols()).flat_map(move |col| {
                Direction::ALL
                    .into_iter()
                    .filter(move |&direction| match direction {
                        Direction::Top => row == 0,
                        Direction::Left => col == 0,
                        Direction::Right | Direction::Bottom => true,
                    })
                    .filter(move |&direction| !grid.has_edge(row, col, direction))
                    .map(move |direction| Move::new(row, col, direction))
            })
        })
    }
}
