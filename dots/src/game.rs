use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::edge_set::EdgeId;
use crate::{
    Grid, IllegalMove, InvalidDimensions, InvalidSnapshot, Move, MoveError, Outcome, Player,
};

/// The complete state of a game between moves.
///
/// This is an immutable value: [`Self::apply_move()`] returns a new state
/// and leaves the old one untouched, so keeping old states around is all
/// that is needed for undo or replay.
///
/// Deserialization only accepts states the engine could have produced: every
/// complete box is owned, and each score equals the boxes its side owns.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGameState")]
pub struct GameState {
    grid: Grid,
    human_score: u32,
    computer_score: u32,
    current_player: Player,
}

#[derive(Deserialize)]
struct RawGameState {
    grid: Grid,
    human_score: u32,
    computer_score: u32,
    current_player: Player,
}

impl TryFrom<RawGameState> for GameState {
    type Error = InvalidSnapshot;

    fn try_from(raw: RawGameState) -> Result<Self, Self::Error> {
        let state = GameState {
            grid: raw.grid,
            human_score: raw.human_score,
            computer_score: raw.computer_score,
            current_player: raw.current_player,
        };
        if let Some((row, col, _)) = state
            .grid
            .iter()
            .find(|(_, _, cell)| cell.is_complete() && cell.owner.is_none())
        {
            return Err(InvalidSnapshot::UnownedCompleteBox { row, col });
        }
        for player in [Player::Human, Player::Computer] {
            let boxes_owned = state
                .grid
                .iter()
                .filter(|(_, _, cell)| cell.owner == Some(player))
                .count();
            if state.score(player) as usize != boxes_owned {
                return Err(InvalidSnapshot::ScoreMismatch {
                    player,
                    score: state.score(player),
                    boxes_owned,
                });
            }
        }
        Ok(state)
    }
}

/// The effects that playing a move would have.
///
/// Created by [`GameState::calculate()`]. Nothing has been changed yet at
/// this point, [`Self::execute()`] produces the next state.
pub struct MoveCalculation<'a> {
    /// Ties the calculation to the state it was computed from
    state: &'a GameState,
    edge: EdgeId,
    captured: [Option<(usize, usize)>; 2],
    /// The boxes that are completed by this move, 0 to 2.
    pub boxes_won: u32,
    /// Does the mover get to move again?
    pub extra_turn: bool,
}

impl GameState {
    /// Starts a new game on an empty board. The human side moves first.
    pub fn new(rows: usize, cols: usize) -> Result<Self, InvalidDimensions> {
        Self::with_first_player(rows, cols, Player::Human)
    }

    pub fn with_first_player(
        rows: usize,
        cols: usize,
        first_player: Player,
    ) -> Result<Self, InvalidDimensions> {
        Ok(Self {
            grid: Grid::new(rows, cols)?,
            human_score: 0,
            computer_score: 0,
            current_player: first_player,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// The player whose move it is.
    ///
    /// After the game is over, this is the player who drew the last edge.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// The scores as `(human, computer)`.
    pub fn scores(&self) -> (u32, u32) {
        (self.human_score, self.computer_score)
    }

    pub fn score(&self, player: Player) -> u32 {
        match player {
            Player::Human => self.human_score,
            Player::Computer => self.computer_score,
        }
    }

    /// The game is over once every edge is drawn.
    pub fn is_over(&self) -> bool {
        self.grid.is_full()
    }

    /// The result of the game, or `None` while it is still running.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_over() {
            return None;
        }
        Some(match self.human_score.cmp(&self.computer_score) {
            Ordering::Less => Outcome::ComputerWin,
            Ordering::Equal => Outcome::Draw,
            Ordering::Greater => Outcome::HumanWin,
        })
    }

    /// Calculate playing a move and return the effects that this would have.
    ///
    /// This checks legality and counts the boxes the move would complete,
    /// without building the next state. Call [`MoveCalculation::execute()`]
    /// on the result to get it.
    pub fn calculate(&self, mv: Move) -> Result<MoveCalculation<'_>, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        let Move { row, col, direction } = mv;
        let edge = self
            .grid
            .edge_id(row, col, direction)
            .ok_or(IllegalMove::OutOfBounds { row, col })?;
        if self.grid.contains_edge(edge) {
            return Err(IllegalMove::EdgeAlreadyDrawn { mv }.into());
        }

        // Only the boxes on either side of the new edge can become complete,
        // and they do so exactly when the new edge is their last missing one.
        let mut captured = [None, None];
        let mut boxes_won = 0;
        for (r, c) in self.grid.boxes_on_edge(edge) {
            let missing_one = self
                .grid
                .cell(r, c)
                .is_some_and(|cell| cell.num_edges() == 3);
            if missing_one {
                captured[boxes_won as usize] = Some((r, c));
                boxes_won += 1;
            }
        }

        Ok(MoveCalculation {
            state: self,
            edge,
            captured,
            boxes_won,
            extra_turn: boxes_won > 0,
        })
    }

    /// Plays a move and returns the resulting state.
    ///
    /// A player who completes at least one box moves again, otherwise the
    /// turn passes. Each edge of a chain is a separate move.
    pub fn apply_move(&self, mv: Move) -> Result<GameState, MoveError> {
        Ok(self.calculate(mv)?.execute())
    }
}

impl<'a> MoveCalculation<'a> {
    /// Apply the computed changes and return the next state.
    pub fn execute(self) -> GameState {
        let mover = self.state.current_player;
        let mut grid = self.state.grid.clone();
        grid.insert_edge(self.edge);
        for (row, col) in self.captured.into_iter().flatten() {
            grid.set_owner(row, col, mover);
        }

        let (mut human_score, mut computer_score) = self.state.scores();
        match mover {
            Player::Human => human_score += self.boxes_won,
            Player::Computer => computer_score += self.boxes_won,
        }

        GameState {
            grid,
            human_score,
            computer_score,
            current_player: if self.extra_turn { mover } else { mover.other() },
        }
    }
}
