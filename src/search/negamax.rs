// Negamax search with alpha-beta pruning
//
// Negamax exploits the zero-sum property: max(a, b) = -min(-a, -b), so a
// single function serves both players by negating the score at each
// level. A recursive call negates and swaps the window:
//
//     child = -search(child_state, depth - 1, -beta, -alpha)
//
// On top of plain alpha-beta, each node consults the transposition table
// before expanding and records what it proved before returning, and the
// whole recursion can be interrupted by the time budget. Cancellation
// unwinds through every return path via `?`; an interrupted subtree
// never contributes a score.

use crate::game::{Game, MoveList, Status};
use crate::search::ordering::order_moves;
use crate::search::time::{SearchBudget, SearchInterrupted};
use crate::search::transposition::{Bound, TableEntry, TranspositionTable};

/// Base magnitude of a proven win. Terminal scores are `WIN_SCORE` plus
/// the remaining depth, so an outcome discovered nearer the root (more
/// depth left) dominates the same outcome found deeper: faster wins score
/// strictly higher, slower losses strictly less negative.
pub const WIN_SCORE: i32 = 1_000_000;

/// Depth ceiling for the deepening controller.
pub const MAX_DEPTH: u8 = 64;

/// Sentinel outside every achievable score; the root window is
/// `(-INFINITY, INFINITY)`.
pub const INFINITY: i32 = WIN_SCORE + MAX_DEPTH as i32 + 1;

/// Whether `score` proves a forced win or loss rather than a heuristic
/// estimate. Requires adapters to keep static evaluations strictly
/// inside `±WIN_SCORE`.
#[inline]
pub fn is_decisive(score: i32) -> bool {
    score.abs() >= WIN_SCORE
}

/// Scoped apply/undo. The move is rewound when the guard drops, so every
/// exit path out of a node (normal return, beta cutoff, cancellation
/// propagating through `?`) leaves the state exactly as it found it.
pub(crate) struct AppliedMove<'a, G: Game> {
    game: &'a mut G,
    mv: G::Move,
    token: Option<G::Undo>,
    key_before: u64,
}

impl<'a, G: Game> AppliedMove<'a, G> {
    pub(crate) fn new(game: &'a mut G, mv: G::Move) -> Self {
        let key_before = game.key();
        let token = Some(game.apply(mv));
        Self {
            game,
            mv,
            token,
            key_before,
        }
    }

    pub(crate) fn game(&mut self) -> &mut G {
        &mut *self.game
    }
}

impl<'a, G: Game> Drop for AppliedMove<'a, G> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            self.game.undo(self.mv, token);
            debug_assert_eq!(
                self.game.key(),
                self.key_before,
                "undo must restore the state key"
            );
        }
    }
}

/// Search `game` to `depth` plies under the window `(alpha, beta)`.
///
/// The returned score is from the perspective of the side to move
/// (negamax convention). Fail-soft: the result may fall outside the
/// window, in which case it is only a bound, and that is what gets
/// recorded in the table.
///
/// # Panics
///
/// Panics when the adapter reports an ongoing state with no legal moves;
/// caching results for an inconsistent game model would poison the table,
/// so this fails fast instead.
pub fn negamax<G: Game>(
    game: &mut G,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    tt: &mut TranspositionTable<G::Move>,
    budget: &mut SearchBudget,
) -> Result<i32, SearchInterrupted> {
    budget.visit()?;

    let side = game.side_to_move();

    match game.status() {
        Status::Win(winner) => {
            let magnitude = WIN_SCORE + i32::from(depth);
            return Ok(if winner == side { magnitude } else { -magnitude });
        }
        Status::Draw => return Ok(0),
        Status::Ongoing => {}
    }

    if depth == 0 {
        return Ok(game.evaluate(side));
    }

    debug_assert!(alpha < beta, "window must be non-empty at node entry");

    let key = game.key();
    let mut hash_move = None;
    if let Some(entry) = tt.probe(key) {
        // The stored move is worth trying first even when the stored
        // depth is too shallow to trust the score.
        hash_move = entry.best_move;
        if entry.depth >= depth {
            match entry.bound {
                Bound::Exact => return Ok(entry.score),
                Bound::Lower => alpha = alpha.max(entry.score),
                Bound::Upper => beta = beta.min(entry.score),
            }
            if alpha >= beta {
                return Ok(entry.score);
            }
        }
    }

    let mut moves = MoveList::new();
    game.legal_moves(&mut moves);
    assert!(
        !moves.is_empty(),
        "adapter contract violated: ongoing state reports no legal moves"
    );

    order_moves(game, &mut moves, hash_move, None);

    let original_alpha = alpha;
    let mut best_score = -INFINITY;
    let mut best_move = None;

    for &mv in &moves {
        let child = {
            let mut applied = AppliedMove::new(game, mv);
            negamax(applied.game(), depth - 1, -beta, -alpha, tt, budget)
        };
        let score = -child?;

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
        alpha = alpha.max(score);
        if alpha >= beta {
            // Beta cutoff: the opponent already has a better option, the
            // remaining siblings cannot change the result.
            break;
        }
    }

    let bound = if best_score >= beta {
        Bound::Lower
    } else if best_score <= original_alpha {
        Bound::Upper
    } else {
        Bound::Exact
    };
    tt.store(TableEntry {
        key,
        depth,
        score: best_score,
        bound,
        best_move,
    });

    Ok(best_score)
}
