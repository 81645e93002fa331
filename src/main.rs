use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use minesweeper_agent::agent::Agent;
use minesweeper_agent::game_board::GameBoard;
use minesweeper_agent::mine_map::MineMap;

#[derive(Parser)]
#[command(name = "minesweeper-agent", about = "Watch a deduction agent play minesweeper")]
struct Cli {
    #[arg(long, default_value_t = 8)]
    rows: usize,
    #[arg(long, default_value_t = 8)]
    cols: usize,
    #[arg(long, default_value_t = 8)]
    mines: usize,
    /// Seed for mine placement and random probes; entropy-seeded if absent.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut mine_map = MineMap::generate(cli.rows, cli.cols, cli.mines, &mut rng)?;
    let mut agent = Agent::new(cli.rows, cli.cols);
    let mut game_board = GameBoard::new(cli.rows, cli.cols);

    println!("Let's play minesweeper");
    println!("{}", game_board);

    loop {
        let (cell, is_safe) = match agent.next_safe_move() {
            Some(cell) => (cell, true),
            None => match agent.next_unknown_move(&mut rng) {
                Some(cell) => (cell, false),
                None => {
                    println!("No moves left to make");
                    break;
                }
            },
        };
        info!(?cell, is_safe, "probing");

        if mine_map.is_mine(cell) {
            println!("Hit a mine at {:?}! The layout was:\n{}", cell, mine_map);
            break;
        }

        let count = mine_map.neighbor_mine_count(cell);
        game_board.reveal(cell, count);
        agent.record_observation(cell, count);

        // Flag every mine the agent has proven so far.
        for &mine in agent.known_mines() {
            mine_map.flag(mine);
            game_board.flag(mine);
        }

        println!("{}", game_board);
        if mine_map.is_won() {
            println!("All mines flagged - you win!");
            break;
        }
    }
    Ok(())
}
