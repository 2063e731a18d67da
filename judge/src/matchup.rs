use std::error::Error;
use std::fmt::Write;

use itertools::Itertools;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::game::{play_game, GameResult};
use crate::player::Player;

/// How each matchup is played.
#[derive(Clone, Copy, Debug)]
pub struct MatchupConfig {
    pub num_games: usize,
    pub rows: usize,
    pub cols: usize,
    /// End the matchup after the first game that is forfeited.
    pub stop_on_forfeit: bool,
}

/// The tally of a matchup. Arrays are indexed like the players of
/// [`play_matchup()`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchScore {
    /// Wins, including the games the other player forfeited.
    pub wins: [usize; 2],
    /// Games lost through an illegal or missing move.
    pub forfeits: [usize; 2],
    pub ties: usize,
    /// Boxes owned at the end of finished games.
    pub boxes: [u64; 2],
    /// Games that were played until every edge was drawn.
    pub finished: usize,
}

impl MatchScore {
    pub fn record(&mut self, result: &GameResult) {
        match result.winner() {
            Some(player_idx) => self.wins[player_idx] += 1,
            None => self.ties += 1,
        }
        if let Some(player_idx) = result.forfeited_by() {
            self.forfeits[player_idx] += 1;
        }
        if let GameResult::Finished { boxes } = result {
            self.finished += 1;
            self.boxes[0] += u64::from(boxes[0]);
            self.boxes[1] += u64::from(boxes[1]);
        }
    }

    pub fn num_games(&self) -> usize {
        self.wins[0] + self.wins[1] + self.ties
    }

    /// How many boxes more than the opponent the player owned per finished
    /// game. `None` if no game was finished.
    pub fn average_margin(&self, player_idx: usize) -> Option<f64> {
        if self.finished == 0 {
            return None;
        }
        let margin = self.boxes[player_idx] as f64 - self.boxes[1 - player_idx] as f64;
        Some(margin / self.finished as f64)
    }

    /// A few lines for the end of a matchup between `names[0]` and `names[1]`.
    pub fn summary(&self, names: [&str; 2]) -> String {
        let mut out = format!(
            "{} vs {}: {}-{}, {} tied, {} of {} games finished",
            names[0],
            names[1],
            self.wins[0],
            self.wins[1],
            self.ties,
            self.finished,
            self.num_games()
        );
        for (player_idx, name) in names.iter().enumerate() {
            let margin = match self.average_margin(player_idx) {
                Some(margin) => format!("{:+.2} boxes per game", margin),
                None => "no finished games".to_string(),
            };
            let _ = write!(
                out,
                "\n- {}: {} wins, {} forfeits, {}",
                name, self.wins[player_idx], self.forfeits[player_idx], margin
            );
        }
        out
    }
}

/// Plays up to `config.num_games` games between the two players.
///
/// A forfeited game counts as a win for the other player.
pub fn play_matchup(
    rng: &mut StdRng,
    player_1: &mut Player,
    player_2: &mut Player,
    config: &MatchupConfig,
) -> anyhow::Result<MatchScore> {
    let names = [player_1.name.clone(), player_2.name.clone()];
    let mut match_score = MatchScore::default();

    for game_idx in 0..config.num_games {
        let result = play_game(rng, player_1, player_2, config.rows, config.cols)?;
        match &result {
            GameResult::Finished { boxes } => {
                debug!(game_idx, boxes_1 = boxes[0], boxes_2 = boxes[1], "Game finished");
            }
            GameResult::IllegalMoveByPlayer { player_idx, err } => {
                info!(
                    player = %names[*player_idx],
                    game_idx,
                    error = %error_chain(err),
                    "Illegal move by player"
                );
            }
            GameResult::NoMoveByPlayer { player_idx } => {
                info!(
                    player = %names[*player_idx],
                    game_idx, "Player gave up during a running game"
                );
            }
        }
        match_score.record(&result);
        if config.stop_on_forfeit && result.forfeited_by().is_some() {
            info!(game_idx, "Stopping the matchup after a forfeit");
            break;
        }
    }

    Ok(match_score)
}

fn error_chain(err: &(dyn Error + 'static)) -> String {
    std::iter::successors(Some(err), |&err| err.source()).join(": ")
}

/// One line of the tournament table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Standing {
    pub player_idx: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub forfeits: usize,
    /// Boxes owned minus boxes conceded, over all finished games.
    pub box_margin: i64,
}

impl Standing {
    /// Two points for a win and one for a tie.
    pub fn points(&self) -> usize {
        2 * self.wins + self.ties
    }
}

/// Ranks `num_players` players by points, then by box margin. Each result is
/// `(player_1_idx, player_2_idx, score)`.
pub fn standings(num_players: usize, results: &[(usize, usize, MatchScore)]) -> Vec<Standing> {
    let mut table: Vec<Standing> = (0..num_players)
        .map(|player_idx| Standing {
            player_idx,
            ..Standing::default()
        })
        .collect();
    for (i1, i2, score) in results {
        for (side, player_idx) in [*i1, *i2].into_iter().enumerate() {
            let standing = &mut table[player_idx];
            standing.wins += score.wins[side];
            standing.losses += score.wins[1 - side];
            standing.ties += score.ties;
            standing.forfeits += score.forfeits[side];
            standing.box_margin += score.boxes[side] as i64 - score.boxes[1 - side] as i64;
        }
    }
    table
        .into_iter()
        .sorted_by(|a, b| {
            b.points()
                .cmp(&a.points())
                .then(b.box_margin.cmp(&a.box_margin))
                .then(a.player_idx.cmp(&b.player_idx))
        })
        .collect()
}
