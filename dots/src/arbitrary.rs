use crate::{GameState, Move, Player};

/// A game on a small board, advanced by a random number of random moves.
#[derive(Clone, Debug)]
pub struct ArbitraryGame {
    pub state: GameState,
    /// The move that produced `state`, if any.
    pub last_move: Option<Move>,
}

impl quickcheck::Arbitrary for ArbitraryGame {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let rows = usize::from(u8::arbitrary(g) % 4) + 1;
        let cols = usize::from(u8::arbitrary(g) % 4) + 1;
        let first_player = *g.choose(&[Player::Human, Player::Computer]).unwrap();
        let mut state = GameState::with_first_player(rows, cols, first_player).unwrap();

        let num_edges = state.grid().num_edges();
        let num_moves = usize::arbitrary(g) % (num_edges + 1);
        let mut last_move = None;
        for _ in 0..num_moves {
            let legal: Vec<Move> = state.legal_moves().collect();
            let Some(&mv) = g.choose(&legal) else {
                break;
            };
            state = state.apply_move(mv).unwrap();
            last_move = Some(mv);
        }

        ArbitraryGame { state, last_move }
    }
}
