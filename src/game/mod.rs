// Game adapter boundary
//
// The search core is game-agnostic: everything it needs from a concrete
// game goes through the `Game` trait. Rule logic (move generation, win
// detection, board geometry) lives behind this seam, the way a player
// implementation sits behind the `Player` trait in a game frontend.

use smallvec::SmallVec;

/// Move buffer used throughout the search.
///
/// 64 inline slots cover every reasonable branching factor without heap
/// allocation; larger games spill transparently.
pub type MoveList<M> = SmallVec<[M; 64]>;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opposite(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

/// Outcome of a position as reported by the game adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The game continues; at least one legal move exists.
    Ongoing,
    /// The given player has won.
    Win(Player),
    /// Neither player can win; no legal moves remain or the rules call it.
    Draw,
}

impl Status {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Status::Ongoing
    }
}

/// Adapter contract between the search core and a concrete game.
///
/// Implementations own all rule logic. The search core holds exactly one
/// `&mut` to the state and always rewinds it: every `apply` is paired
/// with an `undo` before the search returns, so a state borrowed by
/// `search` comes back bit-for-bit identical.
///
/// # Contract
///
/// - `status` and `legal_moves` must agree: an `Ongoing` state has at
///   least one legal move, a terminal state has none. Disagreement is a
///   programmer error and the search panics rather than caching results
///   for an inconsistent game model.
/// - After `undo(mv, token)` the state must equal the state before the
///   matching `apply(mv)`, including `key()`.
/// - `key` must be equal for rule-equivalent states (same cell contents,
///   same side to move) and collision-resistant across inequivalent ones.
///   Computable in time linear in board size; large boards should keep an
///   incrementally updated key rather than rescanning.
/// - `evaluate` scores a non-terminal state from `perspective`'s point of
///   view and must stay strictly inside `±WIN_SCORE` so that heuristic
///   scores never masquerade as proven outcomes.
pub trait Game {
    /// A legal transition. Cheap to copy; the `Ord` bound gives the
    /// search a deterministic tie-break when ordering scores are equal.
    type Move: Copy + Eq + Ord + std::fmt::Debug;

    /// Whatever `apply` needs to remember so `undo` can rewind exactly.
    type Undo;

    /// The player whose turn it is.
    fn side_to_move(&self) -> Player;

    /// Append every legal move to `out`. Called only on `Ongoing` states.
    fn legal_moves(&self, out: &mut MoveList<Self::Move>);

    /// Play `mv`, returning the token `undo` needs to rewind it.
    fn apply(&mut self, mv: Self::Move) -> Self::Undo;

    /// Rewind `mv`, restoring the state before the matching `apply`.
    fn undo(&mut self, mv: Self::Move, token: Self::Undo);

    /// Terminal/winner detection.
    fn status(&self) -> Status;

    /// Static heuristic evaluation from `perspective`'s point of view.
    /// Used only at the depth-0 search frontier.
    fn evaluate(&self, perspective: Player) -> i32;

    /// Transposition key for the current state.
    fn key(&self) -> u64;

    /// Static ordering preference for `mv` (higher = try earlier).
    /// Purely an efficiency hint; it never changes the search value.
    fn order_hint(&self, _mv: Self::Move) -> i32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involutive() {
        assert_eq!(Player::First.opposite(), Player::Second);
        assert_eq!(Player::Second.opposite(), Player::First);
        assert_eq!(Player::First.opposite().opposite(), Player::First);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!Status::Ongoing.is_terminal());
        assert!(Status::Win(Player::First).is_terminal());
        assert!(Status::Win(Player::Second).is_terminal());
        assert!(Status::Draw.is_terminal());
    }
}
