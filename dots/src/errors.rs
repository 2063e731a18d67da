use crate::{Move, Player, MAX_DIMENSION};

/// The error type for [`Grid::new()`](crate::Grid::new) and
/// [`GameState::new()`](crate::GameState::new).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidDimensions {
    pub rows: usize,
    pub cols: usize,
}

impl std::error::Error for InvalidDimensions {}

impl std::fmt::Display for InvalidDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A board of {}x{} boxes is not allowed, both dimensions must be between 1 and {}",
            self.rows, self.cols, MAX_DIMENSION
        )
    }
}

/// Why a single edge cannot be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    OutOfBounds { row: usize, col: usize },
    EdgeAlreadyDrawn { mv: Move },
}

impl std::error::Error for IllegalMove {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::OutOfBounds { row, col } => {
                write!(f, "Box ({}, {}) is outside of the board", row, col)
            }
            IllegalMove::EdgeAlreadyDrawn { mv } => {
                write!(f, "The {} has already been drawn", mv)
            }
        }
    }
}

/// The error type for [`GameState::apply_move()`](crate::GameState::apply_move).
///
/// A rejected move never changes the state it was submitted against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// The move itself is invalid. The caller should ask for another one.
    IllegalMove(IllegalMove),
    /// Every edge is drawn. The caller should stop offering moves.
    GameAlreadyOver,
}

impl From<IllegalMove> for MoveError {
    fn from(err: IllegalMove) -> Self {
        MoveError::IllegalMove(err)
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoveError::IllegalMove(err) => Some(err),
            MoveError::GameAlreadyOver => None,
        }
    }
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::IllegalMove(_) => write!(f, "Tried to play an illegal move"),
            MoveError::GameAlreadyOver => {
                write!(f, "Tried to play a move after the game has ended")
            }
        }
    }
}

/// Why a deserialized [`Grid`](crate::Grid) or [`GameState`](crate::GameState)
/// was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidSnapshot {
    Dimensions(InvalidDimensions),
    /// The edge bitset has the wrong number of words, or bits past its capacity.
    MalformedEdgeSet,
    /// The edge bitset does not have the size the dimensions call for.
    EdgeCount { expected: usize, found: usize },
    OwnerCount { expected: usize, found: usize },
    OwnerOfIncompleteBox { row: usize, col: usize },
    UnownedCompleteBox { row: usize, col: usize },
    ScoreMismatch { player: Player, score: u32, boxes_owned: usize },
}

impl From<InvalidDimensions> for InvalidSnapshot {
    fn from(err: InvalidDimensions) -> Self {
        InvalidSnapshot::Dimensions(err)
    }
}

impl std::error::Error for InvalidSnapshot {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvalidSnapshot::Dimensions(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvalidSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidSnapshot::Dimensions(err) => write!(f, "{}", err),
            InvalidSnapshot::MalformedEdgeSet => write!(f, "The edge set is malformed"),
            InvalidSnapshot::EdgeCount { expected, found } => {
                write!(f, "Expected {} edges, found {}", expected, found)
            }
            InvalidSnapshot::OwnerCount { expected, found } => {
                write!(f, "Expected {} box owners, found {}", expected, found)
            }
            InvalidSnapshot::OwnerOfIncompleteBox { row, col } => {
                write!(f, "Box ({}, {}) has an owner but is not complete", row, col)
            }
            InvalidSnapshot::UnownedCompleteBox { row, col } => {
                write!(f, "Box ({}, {}) is complete but has no owner", row, col)
            }
            InvalidSnapshot::ScoreMismatch {
                player,
                score,
                boxes_owned,
            } => write!(
                f,
                "The {:?} side has a score of {} but owns {} boxes",
                player, score, boxes_owned
            ),
        }
    }
}
