use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use judge::{play_matchup, standings, MatchScore, MatchupConfig, Player, PlayerConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Plays every pair of players against each other on a Dots-and-Boxes board
#[derive(Parser)]
struct Args {
    /// Path to the config JSON files of players
    #[clap(num_args(2..), value_delimiter = ' ')]
    player_configs: Vec<PathBuf>,

    /// How many games to play per matchup
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// Number of box rows on the board
    #[arg(long, default_value_t = 3)]
    rows: usize,

    /// Number of box columns on the board
    #[arg(long, default_value_t = 3)]
    cols: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// End a matchup after the first game a player forfeits through an
    /// illegal or missing move
    #[arg(short, long, default_value_t = false)]
    stop_on_illegal_move: bool,

    /// Default log level among "off", "error", "warn", "info", "debug", "trace".
    /// RUST_LOG directives take precedence.
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(args.log_level)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, rows = args.rows, cols = args.cols, "Starting tournament");
    let mut rng = StdRng::seed_from_u64(seed);

    let player_configs = args
        .player_configs
        .iter()
        .map(|path| PlayerConfig::load(path))
        .collect::<anyhow::Result<Vec<PlayerConfig>>>()?;
    let config = MatchupConfig {
        num_games: args.num_games,
        rows: args.rows,
        cols: args.cols,
        stop_on_forfeit: args.stop_on_illegal_move,
    };

    let mut results: Vec<(usize, usize, MatchScore)> = Vec::new();
    for (i1, i2) in (0..player_configs.len()).tuple_combinations() {
        let mut player_1 = Player::from_config(&player_configs[i1], &mut rng);
        let mut player_2 = Player::from_config(&player_configs[i2], &mut rng);
        let score = play_matchup(&mut rng, &mut player_1, &mut player_2, &config)?;
        println!("{}\n", score.summary([player_1.name.as_str(), player_2.name.as_str()]));
        results.push((i1, i2, score));
    }

    print_standings(&player_configs, &results);
    Ok(())
}

fn print_standings(player_configs: &[PlayerConfig], results: &[(usize, usize, MatchScore)]) {
    println!(
        "{:>4}  {:<20} {:>6} {:>5} {:>5} {:>5} {:>8} {:>10}",
        "rank", "player", "points", "won", "lost", "tied", "forfeits", "box margin"
    );
    for (rank, standing) in standings(player_configs.len(), results).iter().enumerate() {
        println!(
            "{:>4}  {:<20} {:>6} {:>5} {:>5} {:>5} {:>8} {:>+10}",
            rank + 1,
            player_configs[standing.player_idx].nick,
            standing.points(),
            standing.wins,
            standing.losses,
            standing.ties,
            standing.forfeits,
            standing.box_margin
        );
    }
}

fn init_tracing(default_level: LevelFilter) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
    Ok(())
}
