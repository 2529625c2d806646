// Iterative deepening controller
//
// Runs the negamax search at depth 1, 2, 3, … under a wall-clock budget,
// seeding each iteration's move ordering from the previous result and
// reusing one transposition table across iterations. The answer of
// record is always the deepest fully completed iteration; a depth the
// budget interrupts is discarded wholesale.

use std::time::{Duration, Instant};

use log::debug;

use crate::game::{Game, MoveList, Status};
use crate::search::negamax::{is_decisive, negamax, AppliedMove, INFINITY, MAX_DEPTH, WIN_SCORE};
use crate::search::ordering::order_moves;
use crate::search::time::{SearchBudget, SearchInterrupted};
use crate::search::transposition::{Bound, TableEntry, TranspositionTable};

/// Tuning knobs for one search invocation.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Wall-clock budget; the search returns strictly before it elapses.
    pub budget: Duration,
    /// Depth ceiling for iterative deepening.
    pub max_depth: u8,
    /// Transposition table capacity in entries; 0 disables caching.
    pub tt_capacity: usize,
    /// Nodes between deadline checks.
    pub check_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget: Duration::from_millis(1000),
            max_depth: MAX_DEPTH,
            tt_capacity: 1 << 20,
            check_interval: 1024,
        }
    }
}

impl SearchConfig {
    /// Deepen as far as `budget` allows.
    pub fn with_budget(budget: Duration) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    /// Search exactly `depth` plies with no practical time pressure.
    /// Useful for tests and benchmarks where determinism matters more
    /// than latency.
    pub fn fixed_depth(depth: u8) -> Self {
        Self {
            budget: Duration::from_secs(3600),
            max_depth: depth,
            ..Self::default()
        }
    }
}

/// Result of a search invocation.
#[derive(Debug, Clone)]
pub struct SearchReport<M> {
    /// Best move of the deepest completed iteration; `None` only when
    /// the root was already terminal.
    pub best_move: Option<M>,
    /// Score of `best_move` from the root side-to-move's perspective.
    pub score: i32,
    /// Deepest fully completed iteration (0 = fallback only).
    pub depth: u8,
    /// Nodes visited across all iterations.
    pub nodes: u64,
    pub elapsed: Duration,
    pub tt_hits: u64,
    pub tt_misses: u64,
}

/// Pick the best move within `budget`.
///
/// Returns `None` only when `game` is already terminal. Under extreme
/// time pressure the result degrades to the statically preferred legal
/// move; it never becomes illegal or absent while legal moves exist.
pub fn best_move<G: Game>(game: &mut G, budget: Duration) -> Option<G::Move> {
    search(game, &SearchConfig::with_budget(budget)).best_move
}

/// Full search entry point with statistics.
pub fn search<G: Game>(game: &mut G, config: &SearchConfig) -> SearchReport<G::Move> {
    let start = Instant::now();
    let side = game.side_to_move();

    match game.status() {
        Status::Ongoing => {}
        terminal => {
            // Nothing to decide; report the terminal value and no move.
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

    // Statically preferred move as the pre-seeded fallback: even a
    // search cancelled during depth 1 returns something legal.
    order_moves(game, &mut root_moves, None, None);
    let mut best_move = root_moves[0];
    let mut best_score = 0;
    let mut completed_depth = 0;

    // Reserve a slice of the budget for the caller's own overhead.
    let margin = safety_margin(config.budget);
    let mut budget = SearchBudget::with_check_interval(
        config.budget.saturating_sub(margin),
        config.check_interval,
    );
    let mut tt = TranspositionTable::with_capacity(config.tt_capacity);
    let mut pv_move = None;

    for depth in 1..=config.max_depth.max(1) {
        if budget.expired() {
            break;
        }

        match search_root(game, depth, &root_moves, pv_move, &mut tt, &mut budget) {
            Ok((score, mv)) => {
                best_move = mv;
                best_score = score;
                completed_depth = depth;
                pv_move = Some(mv);

                let elapsed = start.elapsed();
                let nps = nodes_per_second(budget.nodes(), elapsed);
                debug!(
                    "depth {} score {} nodes {} time {}ms nps {} best {:?}",
                    depth,
                    score,
                    budget.nodes(),
                    elapsed.as_millis(),
                    nps,
                    mv
                );

                // A proven win or loss cannot change with more depth.
                if is_decisive(score) {
                    break;
                }
            }
            Err(SearchInterrupted) => break,
        }
    }

    SearchReport {
        best_move: Some(best_move),
        score: best_score,
        depth: completed_depth,
        nodes: budget.nodes(),
        elapsed: start.elapsed(),
        tt_hits: tt.hits,
        tt_misses: tt.misses,
    }
}

/// One full-window root iteration. The root keeps its own move loop so
/// the controller can order with the previous iteration's best move and
/// report which root move produced the score.
fn search_root<G: Game>(
    game: &mut G,
    depth: u8,
    root_moves: &MoveList<G::Move>,
    pv_move: Option<G::Move>,
    tt: &mut TranspositionTable<G::Move>,
    budget: &mut SearchBudget,
) -> Result<(i32, G::Move), SearchInterrupted> {
    let key = game.key();
    let hash_move = tt.probe(key).and_then(|entry| entry.best_move);

    let mut moves = root_moves.clone();
    order_moves(game, &mut moves, hash_move, pv_move);

    let mut alpha = -INFINITY;
    let beta = INFINITY;
    let mut best = moves[0];

    for &mv in &moves {
        let child = {
            let mut applied = AppliedMove::new(game, mv);
            negamax(applied.game(), depth - 1, -beta, -alpha, tt, budget)
        };
        let score = -child?;
        if score > alpha {
            alpha = score;
            best = mv;
        }
    }

    // The root always searches a full window, so its value is exact.
    tt.store(TableEntry {
        key,
        depth,
        score: alpha,
        bound: Bound::Exact,
        best_move: Some(best),
    });

    Ok((alpha, best))
}

/// Slice of the budget reserved so the caller gets control back strictly
/// before its own deadline.
pub(crate) fn safety_margin(budget: Duration) -> Duration {
    (budget / 20).clamp(Duration::from_millis(1), Duration::from_millis(50))
}

fn nodes_per_second(nodes: u64, elapsed: Duration) -> u64 {
    let ms = elapsed.as_millis() as u64;
    if ms == 0 {
        nodes
    } else {
        nodes * 1000 / ms
    }
}
