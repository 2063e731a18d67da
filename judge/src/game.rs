use std::cmp::Ordering;

use dots::{GameState, MoveError, Player as Side};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::player::Player;

/// How a game between two players ended. Player indices are 0 or 1, in the
/// order the players were passed to [`play_game()`].
#[derive(Debug)]
pub enum GameResult {
    /// Every edge was drawn. `boxes[i]` is the number of boxes player `i` owns.
    Finished { boxes: [u32; 2] },
    IllegalMoveByPlayer { player_idx: usize, err: MoveError },
    /// The player had no move to offer although the game was still running.
    NoMoveByPlayer { player_idx: usize },
}

impl GameResult {
    /// The player who forfeited the game, if any.
    pub fn forfeited_by(&self) -> Option<usize> {
        match self {
            GameResult::Finished { .. } => None,
            GameResult::IllegalMoveByPlayer { player_idx, .. }
            | GameResult::NoMoveByPlayer { player_idx } => Some(*player_idx),
        }
    }

    /// The winning player, or `None` for a tie. A forfeit is a win for the
    /// other player.
    pub fn winner(&self) -> Option<usize> {
        match self {
            GameResult::Finished { boxes } => match boxes[0].cmp(&boxes[1]) {
                Ordering::Greater => Some(0),
                Ordering::Less => Some(1),
                Ordering::Equal => None,
            },
            _ => self.forfeited_by().map(|player_idx| 1 - player_idx),
        }
    }
}

/// Plays one game on a fresh `rows` x `cols` board.
///
/// Returns an error only if the board dimensions are invalid, not when a
/// player misbehaves.
pub fn play_game(
    rng: &mut StdRng,
    player_1: &mut Player,
    player_2: &mut Player,
    rows: usize,
    cols: usize,
) -> anyhow::Result<GameResult> {
    // Assign one player the human side and the other the computer side randomly
    let sides = {
        let mut arr = [Side::Human, Side::Computer];
        arr.shuffle(rng);
        arr
    };
    let player_idx_for = |side: Side| if sides[0] == side { 0 } else { 1 };
    let mut players = [player_1, player_2];

    // Randomly pick a starting side
    let first = if rng.gen::<bool>() {
        Side::Human
    } else {
        Side::Computer
    };
    let mut state = GameState::with_first_player(rows, cols, first)?;

    while !state.is_over() {
        let player_idx = player_idx_for(state.current_player());
        let current_player = &mut players[player_idx];
        let Some(mv) = current_player.selector.select_move(&state) else {
            return Ok(GameResult::NoMoveByPlayer { player_idx });
        };
        trace!(player = %current_player.name, %mv, "Move");
        state = match state.apply_move(mv) {
            Ok(state) => state,
            Err(err) => return Ok(GameResult::IllegalMoveByPlayer { player_idx, err }),
        };
    }

    Ok(GameResult::Finished {
        boxes: [state.score(sides[0]), state.score(sides[1])],
    })
}
