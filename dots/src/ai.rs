use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::{GameState, Move};

/// How much a completed box is worth to [`evaluate_move()`].
pub const CAPTURE_WEIGHT: i32 = 10;

/// The boxes the opponent could take right after a move are divided by this
/// before being subtracted.
pub const OPPORTUNITY_DIVISOR: i32 = 2;

/// Something that picks moves for one side of the game.
///
/// Implementations must return `None` exactly when there are no legal moves.
/// A search that can run for a long time will need to take a deadline, which
/// will be added to this trait together with such a search.
pub trait MoveSelector {
    fn select_move(&mut self, state: &GameState) -> Option<Move>;
}

/// The one-ply heuristic: immediate gain minus what the move leaves for the
/// opponent. See [`evaluate_move()`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyEvaluator;

impl MoveSelector for GreedyEvaluator {
    fn select_move(&mut self, state: &GameState) -> Option<Move> {
        select_move(state)
    }
}

/// Picks a legal move uniformly at random.
#[derive(Clone, Debug)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MoveSelector for RandomSelector {
    fn select_move(&mut self, state: &GameState) -> Option<Move> {
        state.legal_moves().choose(&mut self.rng)
    }
}

/// Always plays the first legal move.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstLegalSelector;

impl MoveSelector for FirstLegalSelector {
    fn select_move(&mut self, state: &GameState) -> Option<Move> {
        state.legal_moves().next()
    }
}

/// Scores a move for the player whose turn it is, or returns `None` if the
/// move cannot be played.
///
/// The score is [`CAPTURE_WEIGHT`] per box completed by the move, minus the
/// total number of boxes that all the possible replies could complete right
/// away, divided by [`OPPORTUNITY_DIVISOR`] (rounding down).
///
/// Note that the replies are counted no matter who makes them: when the move
/// completes a box, the "reply" is really the mover's own next move.
pub fn evaluate_move(state: &GameState, mv: Move) -> Option<i32> {
    let calculation = state.calculate(mv).ok()?;
    let gained = calculation.boxes_won as i32;
    let next = calculation.execute();
    let opportunity: u32 = next
        .legal_moves()
        .filter_map(|reply| next.calculate(reply).ok())
        .map(|reply| reply.boxes_won)
        .sum();
    Some(gained * CAPTURE_WEIGHT - opportunity as i32 / OPPORTUNITY_DIVISOR)
}

/// Returns the legal move with the highest [`evaluate_move()`] score.
///
/// Ties go to the move that comes first in [`GameState::legal_moves()`].
/// Returns `None` only when the game is over.
pub fn select_move(state: &GameState) -> Option<Move> {
    let mut best: Option<(Move, i32)> = None;
    for mv in state.legal_moves() {
        let Some(score) = evaluate_move(state, mv) else {
            continue;
        };
        trace!(%mv, score, "Evaluated move");
        if best.map_or(true, |(_, best_score)| score > best_score) {
            debug!(%mv, score, "New best move");
            best = Some((mv, score));
        }
    }
    best.map(|(mv, _)| mv)
}

#[cfg(test)]
mod tests {
    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::arbitrary::ArbitraryGame;
    use crate::Direction;

    fn play(state: GameState, moves: &[(usize, usize, Direction)]) -> GameState {
        moves.iter().fold(state, |state, &(r, c, d)| {
            state.apply_move(Move::new(r, c, d)).unwrap()
        })
    }

    #[test]
    fn fresh_board_takes_first_move() {
        let state = GameState::new(3, 3).unwrap();
        for mv in state.legal_moves() {
            assert_eq!(evaluate_move(&state, mv), Some(0));
        }
        assert_eq!(select_move(&state), Some(Move::new(0, 0, Direction::Top)));
    }

    #[test]
    fn takes_free_box() {
        let state = play(
            GameState::new(1, 2).unwrap(),
            &[
                (0, 0, Direction::Top),
                (0, 0, Direction::Left),
                (0, 0, Direction::Bottom),
            ],
        );
        let take = Move::new(0, 0, Direction::Right);
        assert_eq!(evaluate_move(&state, take), Some(CAPTURE_WEIGHT));
        // Leaves the box for the opponent, but one box halves to nothing
        assert_eq!(
            evaluate_move(&state, Move::new(0, 1, Direction::Top)),
            Some(0)
        );
        assert_eq!(select_move(&state), Some(take));
    }

    #[test]
    fn avoids_opening_two_boxes() {
        let state = play(
            GameState::new(1, 2).unwrap(),
            &[
                (0, 0, Direction::Top),
                (0, 1, Direction::Top),
                (0, 0, Direction::Bottom),
                (0, 1, Direction::Bottom),
            ],
        );
        let moves: Vec<Move> = state.legal_moves().collect();
        assert_eq!(
            moves,
            vec![
                Move::new(0, 0, Direction::Right),
                Move::new(0, 0, Direction::Left),
                Move::new(0, 1, Direction::Right),
            ]
        );
        // The middle edge lets both outer edges take a box
        assert_eq!(evaluate_move(&state, moves[0]), Some(-1));
        assert_eq!(evaluate_move(&state, moves[1]), Some(0));
        assert_eq!(evaluate_move(&state, moves[2]), Some(0));
        // Tie between the outer edges goes to the first one
        assert_eq!(select_move(&state), Some(moves[1]));
    }

    #[test]
    fn odd_opportunity_rounds_down() {
        let state = play(
            GameState::new(1, 3).unwrap(),
            &[
                (0, 0, Direction::Top),
                (0, 1, Direction::Top),
                (0, 2, Direction::Top),
                (0, 0, Direction::Bottom),
                (0, 1, Direction::Bottom),
                (0, 2, Direction::Bottom),
                (0, 0, Direction::Left),
            ],
        );
        let moves: Vec<Move> = state.legal_moves().collect();
        assert_eq!(
            moves,
            vec![
                Move::new(0, 0, Direction::Right),
                Move::new(0, 1, Direction::Right),
                Move::new(0, 2, Direction::Right),
            ]
        );
        // Takes box (0, 0), after which only box (0, 1) is open: 10 - 1 / 2
        assert_eq!(evaluate_move(&state, moves[0]), Some(10));
        // Replies take 2 + 1 boxes: 3 / 2 == 1
        assert_eq!(evaluate_move(&state, moves[1]), Some(-1));
        // Replies take 1 + 1 boxes
        assert_eq!(evaluate_move(&state, moves[2]), Some(-1));
        assert_eq!(select_move(&state), Some(moves[0]));
    }

    #[test]
    fn illegal_move_has_no_score() {
        let state = GameState::new(1, 1)
            .unwrap()
            .apply_move(Move::new(0, 0, Direction::Top))
            .unwrap();
        assert_eq!(evaluate_move(&state, Move::new(0, 0, Direction::Top)), None);
        assert_eq!(evaluate_move(&state, Move::new(1, 0, Direction::Top)), None);
    }

    #[test]
    fn no_move_when_over() {
        let state = play(
            GameState::new(1, 1).unwrap(),
            &[
                (0, 0, Direction::Top),
                (0, 0, Direction::Right),
                (0, 0, Direction::Bottom),
                (0, 0, Direction::Left),
            ],
        );
        assert_eq!(select_move(&state), None);
        assert_eq!(GreedyEvaluator.select_move(&state), None);
        assert_eq!(RandomSelector::new(7).select_move(&state), None);
        assert_eq!(FirstLegalSelector.select_move(&state), None);
    }

    quickcheck! {
        fn selection_is_deterministic(game: ArbitraryGame) -> bool {
            let first = select_move(&game.state);
            let second = GreedyEvaluator.select_move(&game.state);
            first == second && first.is_some() != game.state.is_over()
        }

        fn selected_move_is_best(game: ArbitraryGame) -> TestResult {
            let Some(chosen) = select_move(&game.state) else {
                return TestResult::discard();
            };
            let chosen_score = evaluate_move(&game.state, chosen).unwrap();
            let mut seen_chosen = false;
            for mv in game.state.legal_moves() {
                let score = evaluate_move(&game.state, mv).unwrap();
                // Nothing before the chosen move may tie it, nothing may beat it
                if score > chosen_score || (!seen_chosen && mv != chosen && score == chosen_score) {
                    return TestResult::failed();
                }
                seen_chosen |= mv == chosen;
            }
            TestResult::passed()
        }

        fn random_selector_plays_legal_moves(game: ArbitraryGame, seed: u64) -> bool {
            match RandomSelector::new(seed).select_move(&game.state) {
                Some(mv) => game.state.apply_move(mv).is_ok(),
                None => game.state.is_over(),
            }
        }
    }
}
