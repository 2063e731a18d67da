mod game;
mod matchup;
mod player;
#[cfg(test)]
mod selectors;
pub use game::*;
pub use matchup::*;
pub use player::*;
