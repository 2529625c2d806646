// Parallel root search
//
// Root parallelization: each legal root move is searched by an
// independent worker on a clone of the game with a private transposition
// table, joined once per deepening iteration. Private tables trade cache
// sharing for zero coordination: a worker's entries are advisory, so
// nothing correctness-critical crosses threads. A shared stop flag lets
// the first worker that notices the deadline pull the others out of the
// next depth.
//
// The sequential controller in `driver` remains the default; this is an
// opt-in for callers with cores to spare and a cloneable game.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::debug;
use rayon::prelude::*;

use crate::game::{Game, MoveList, Status};
use crate::search::driver::{SearchConfig, SearchReport};
use crate::search::negamax::{is_decisive, negamax, INFINITY, WIN_SCORE};
use crate::search::ordering::order_moves;
use crate::search::time::SearchBudget;
use crate::search::transposition::TranspositionTable;

struct WorkerResult {
    score: i32,
    nodes: u64,
    tt_hits: u64,
    tt_misses: u64,
}

/// Parallel counterpart of [`crate::search::driver::search`].
///
/// For a deterministic adapter the chosen move matches the sequential
/// search given the same completed depth; only wall-clock cost differs.
pub fn search_parallel<G>(game: &G, config: &SearchConfig) -> SearchReport<G::Move>
where
    G: Game + Clone + Send + Sync,
    G::Move: Send + Sync,
{
    let start = Instant::now();
    let side = game.side_to_move();

    match game.status() {
        Status::Ongoing => {}
        terminal => {
            let score = match terminal {
                Status::Win(winner) if winner == side => WIN_SCORE,
                Status::Win(_) => -WIN_SCORE,
                _ => 0,
            };
            return SearchReport {
                best_move: None,
                score,
                depth: 0,
                nodes: 0,
                elapsed: start.elapsed(),
                tt_hits: 0,
                tt_misses: 0,
            };
        }
    }

    let mut root_moves = MoveList::new();
    game.legal_moves(&mut root_moves);
    assert!(
        !root_moves.is_empty(),
        "adapter contract violated: ongoing state reports no legal moves"
    );
    order_moves(game, &mut root_moves, None, None);

    let margin = super::driver::safety_margin(config.budget);
    let deadline = start + config.budget.saturating_sub(margin);
    let stopped = AtomicBool::new(false);

    // Splitting one table's worth of memory across the workers keeps the
    // parallel search's footprint comparable to the sequential one.
    let per_worker_capacity = if config.tt_capacity == 0 {
        0
    } else {
        (config.tt_capacity / root_moves.len()).max(1 << 12)
    };

    let mut best_move = root_moves[0];
    let mut best_score = 0;
    let mut completed_depth = 0;
    let mut total_nodes = 0;
    let mut total_hits = 0;
    let mut total_misses = 0;
    let mut pv_move = None;

    for depth in 1..=config.max_depth.max(1) {
        if stopped.load(Ordering::Relaxed) || Instant::now() >= deadline {
            break;
        }

        let mut moves = root_moves.clone();
        order_moves(game, &mut moves, None, pv_move);

        let results: Vec<Option<WorkerResult>> = moves
            .as_slice()
            .par_iter()
            .map(|&mv| {
                if stopped.load(Ordering::Relaxed) {
                    return None;
                }
                let mut worker_game = game.clone();
                let mut tt = TranspositionTable::with_capacity(per_worker_capacity);
                let mut budget = SearchBudget::with_check_interval(
                    deadline.saturating_duration_since(Instant::now()),
                    config.check_interval,
                );

                worker_game.apply(mv);
                let outcome = negamax(
                    &mut worker_game,
                    depth - 1,
                    -INFINITY,
                    INFINITY,
                    &mut tt,
                    &mut budget,
                );

                match outcome {
                    Ok(child_score) => Some(WorkerResult {
                        score: -child_score,
                        nodes: budget.nodes(),
                        tt_hits: tt.hits,
                        tt_misses: tt.misses,
                    }),
                    Err(_) => {
                        stopped.store(true, Ordering::Relaxed);
                        None
                    }
                }
            })
            .collect();

        // An iteration only counts when every root move finished; a
        // partially searched depth is discarded wholesale.
        if results.iter().any(Option::is_none) {
            break;
        }

        let mut depth_best_score = -INFINITY;
        let mut depth_best_move = moves[0];
        for (mv, result) in moves.iter().zip(&results) {
            let result = result.as_ref().unwrap();
            total_nodes += result.nodes;
            total_hits += result.tt_hits;
            total_misses += result.tt_misses;
            if result.score > depth_best_score {
                depth_best_score = result.score;
                depth_best_move = *mv;
            }
        }

        best_move = depth_best_move;
        best_score = depth_best_score;
        completed_depth = depth;
        pv_move = Some(depth_best_move);

        debug!(
            "parallel depth {} score {} nodes {} workers {} best {:?}",
            depth,
            depth_best_score,
            total_nodes,
            moves.len(),
            depth_best_move
        );

        if is_decisive(depth_best_score) {
            break;
        }
    }

    SearchReport {
        best_move: Some(best_move),
        score: best_score,
        depth: completed_depth,
        nodes: total_nodes,
        elapsed: start.elapsed(),
        tt_hits: total_hits,
        tt_misses: total_misses,
    }
}
