use std::path::Path;

use dots::{FirstLegalSelector, GreedyEvaluator, MoveSelector, RandomSelector};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which [`MoveSelector`] a player uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Greedy,
    Random,
    First,
}

/// A player description, as stored in a JSON file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub nick: String,
    pub strategy: Strategy,
}

impl PlayerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
            .map_err(|err| anyhow::anyhow!("Invalid player config '{}': {}", path.display(), err))
    }

    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

pub struct Player {
    pub name: String,
    pub selector: Box<dyn MoveSelector>,
}

impl Player {
    pub fn new(name: &str, selector: Box<dyn MoveSelector>) -> Self {
        Self {
            name: String::from(name),
            selector,
        }
    }

    /// Random players get their own seed from `rng`, so that a whole
    /// tournament is reproducible from the judge's seed.
    pub fn from_config(config: &PlayerConfig, rng: &mut StdRng) -> Self {
        let selector: Box<dyn MoveSelector> = match config.strategy {
            Strategy::Greedy => Box::new(GreedyEvaluator),
            Strategy::Random => Box::new(RandomSelector::new(rng.gen())),
            Strategy::First => Box::new(FirstLegalSelector),
        };
        Self::new(&config.nick, selector)
    }
}
