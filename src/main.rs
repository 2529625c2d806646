// Terminal self-play demo: the engine plays Connect Four against itself.
//
// Usage: gametree [budget_ms_first] [budget_ms_second]
//
// Giving the two sides different budgets is a quick way to watch search
// depth translate into playing strength. RUST_LOG=debug shows the
// per-depth search lines.

use std::time::Duration;

use log::info;

use gametree::games::ConnectFour;
use gametree::{search, Game, Player, SearchConfig, Status};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let first_ms = parse_budget(args.next(), 200);
    let second_ms = parse_budget(args.next(), first_ms);

    let mut game = ConnectFour::new();
    println!("{game}\n");

    loop {
        let side = game.side_to_move();
        let budget = match side {
            Player::First => first_ms,
            Player::Second => second_ms,
        };
        let config = SearchConfig::with_budget(Duration::from_millis(budget));
        let report = search(&mut game, &config);

        let Some(column) = report.best_move else {
            break;
        };
        info!(
            "{:?} plays column {} (depth {}, score {}, {} nodes in {}ms)",
            side,
            column,
            report.depth,
            report.score,
            report.nodes,
            report.elapsed.as_millis()
        );

        game.apply(column);
        println!("{game}\n");
    }

    match game.status() {
        Status::Win(Player::First) => println!("X wins"),
        Status::Win(Player::Second) => println!("O wins"),
        Status::Draw => println!("Draw"),
        Status::Ongoing => unreachable!("self-play only stops on a terminal state"),
    }
}

fn parse_budget(arg: Option<String>, default_ms: u64) -> u64 {
    arg.and_then(|s| s.parse().ok()).unwrap_or(default_ms)
}
