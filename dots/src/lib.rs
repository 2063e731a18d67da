pub use ai::*;
pub use errors::*;
pub use game::*;
pub use grid::*;
pub use types::*;

mod ai;
#[cfg(test)]
mod arbitrary;
mod edge_set;
mod errors;
mod game;
mod grid;
mod moves;
mod types;
