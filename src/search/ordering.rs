// Move ordering for pruning efficiency
//
// Ordering never changes the search value, only how early cutoffs
// arrive. Priority: the previous iteration's best move, then the table
// move, then the adapter's static preference. Equal scores fall back to
// the move's own ordering so a search is deterministic run to run.

use smallvec::SmallVec;

use crate::game::{Game, MoveList};

/// Priority for the best move of the previous deepening iteration.
const PV_MOVE_SCORE: i32 = 2_000_000;

/// Priority for a move remembered by the transposition table.
const HASH_MOVE_SCORE: i32 = 1_000_000;

/// Sort `moves` best-first in place.
pub fn order_moves<G: Game>(
    game: &G,
    moves: &mut MoveList<G::Move>,
    hash_move: Option<G::Move>,
    pv_move: Option<G::Move>,
) {
    let mut scored: SmallVec<[(i32, G::Move); 64]> = moves
        .iter()
        .map(|&mv| {
            let score = if pv_move == Some(mv) {
                PV_MOVE_SCORE
            } else if hash_move == Some(mv) {
                HASH_MOVE_SCORE
            } else {
                game.order_hint(mv)
            };
            (score, mv)
        })
        .collect();

    // Descending score, ascending move as the deterministic tie-break.
    scored.sort_unstable_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    moves.clear();
    moves.extend(scored.into_iter().map(|(_, mv)| mv));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{MoveList, Player, Status};

    /// Minimal adapter: moves 0..5, hints favoring high move numbers.
    struct HintGame;

    impl Game for HintGame {
        type Move = u8;
        type Undo = ();

        fn side_to_move(&self) -> Player {
            Player::First
        }

        fn legal_moves(&self, out: &mut MoveList<u8>) {
            out.extend(0..5);
        }

        fn apply(&mut self, _mv: u8) {}

        fn undo(&mut self, _mv: u8, _token: ()) {}

        fn status(&self) -> Status {
            Status::Ongoing
        }

        fn evaluate(&self, _perspective: Player) -> i32 {
            0
        }

        fn key(&self) -> u64 {
            0
        }

        fn order_hint(&self, mv: u8) -> i32 {
            i32::from(mv) * 10
        }
    }

    fn moves() -> MoveList<u8> {
        let mut out = MoveList::new();
        HintGame.legal_moves(&mut out);
        out
    }

    #[test]
    fn hints_order_descending() {
        let mut m = moves();
        order_moves(&HintGame, &mut m, None, None);
        assert_eq!(m.as_slice(), &[4, 3, 2, 1, 0]);
    }

    #[test]
    fn hash_move_jumps_the_queue() {
        let mut m = moves();
        order_moves(&HintGame, &mut m, Some(1), None);
        assert_eq!(m[0], 1);
        assert_eq!(&m[1..], &[4, 3, 2, 0]);
    }

    #[test]
    fn pv_move_outranks_hash_move() {
        let mut m = moves();
        order_moves(&HintGame, &mut m, Some(1), Some(0));
        assert_eq!(m[0], 0);
        assert_eq!(m[1], 1);
    }

    #[test]
    fn equal_hints_break_ties_by_move_order() {
        struct FlatGame;
        impl Game for FlatGame {
            type Move = u8;
            type Undo = ();
            fn side_to_move(&self) -> Player {
                Player::First
            }
            fn legal_moves(&self, out: &mut MoveList<u8>) {
                out.extend([3, 1, 4, 0, 2]);
            }
            fn apply(&mut self, _mv: u8) {}
            fn undo(&mut self, _mv: u8, _token: ()) {}
            fn status(&self) -> Status {
                Status::Ongoing
            }
            fn evaluate(&self, _perspective: Player) -> i32 {
                0
            }
            fn key(&self) -> u64 {
                0
            }
        }

        let mut m = MoveList::new();
        FlatGame.legal_moves(&mut m);
        order_moves(&FlatGame, &mut m, None, None);
        assert_eq!(m.as_slice(), &[0, 1, 2, 3, 4]);
    }
}
