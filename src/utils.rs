use rand::rngs::SmallRng;
use rand::SeedableRng;

#[cfg(test)]
use crate::attacks::Generation;
#[cfg(test)]
use crate::moves::Move;
#[cfg(test)]
use crate::positions::Position;
#[cfg(test)]
use rand::Rng;

/// Fixed seed for reproducible games, entropy otherwise.
pub fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

// Functions relevant for tests

/// Plays up to `plies` random legal moves from `start`. Returns every position on the
/// way together with the move that produced it, the start paired with None.
/// Stops early when the side to move has no moves left.
#[cfg(test)]
pub fn random_walk(
    start: &Position,
    plies: usize,
    r: &mut impl Rng,
) -> Vec<(Position, Option<Move>)> {
    use rand::seq::SliceRandom;

    let mut res = vec![(start.clone(), None)];
    for _ in 0..plies {
        let current = match res.last() {
            Some((position, _)) => position.clone(),
            None => break,
        };
        let moves = current.legal_moves(Generation::Legal);
        let mv = match moves.choose(r) {
            Some(mv) => *mv,
            None => break,
        };
        res.push((current.apply_move(&mv), Some(mv)));
    }
    res
}
