/// Move scoring: a scorer rates every (from, to) pair of a position, and the best
/// rated legal move is played.
use crate::attacks::Generation;
use crate::chess_errors::*;
use crate::moves::*;
use crate::positions::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use std::cell::RefCell;
use tracing::debug;

/// Something that assigns a preference to every move of a position.
///
/// The returned vector has `MOVE_KEY_SPACE` entries, indexed by
/// `Position::scoring_key`. Higher is better.
pub trait MoveScorer {
    fn score(&self, position: &Position) -> ChessResult<Vec<f32>>;
}

/// Stand-in for a real evaluator: marks one random legal move with 1.0 and
/// everything else with 0.0.
pub struct PlaceholderScorer {
    rng: RefCell<SmallRng>,
}

impl PlaceholderScorer {
    pub fn new(rng: SmallRng) -> Self {
        PlaceholderScorer {
            rng: RefCell::new(rng),
        }
    }
}

impl MoveScorer for PlaceholderScorer {
    fn score(&self, position: &Position) -> ChessResult<Vec<f32>> {
        let moves = position.legal_moves(Generation::Legal);
        let chosen = moves
            .choose(&mut *self.rng.borrow_mut())
            .ok_or(ChessError::NoLegalMoves)?;

        let mut scores = vec![0.0f32; MOVE_KEY_SPACE];
        scores[position.scoring_key(chosen)] = 1.0;
        Ok(scores)
    }
}

/// Picks the legal move with the highest score. Ties go to the move generated
/// first, which puts queen promotions ahead of underpromotions.
pub fn best_move(position: &Position, scores: &[f32]) -> ChessResult<Move> {
    if scores.len() != MOVE_KEY_SPACE {
        return Err(format!(
            "Expected {} move scores, got {}",
            MOVE_KEY_SPACE,
            scores.len()
        )
        .into());
    }

    let mut best: Option<(Move, f32)> = None;
    for mv in position.legal_moves(Generation::Legal) {
        let value = scores[position.scoring_key(&mv)];
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((mv, value)),
        }
    }

    let (mv, value) = best.ok_or(ChessError::NoLegalMoves)?;
    let favourite = (0..MOVE_KEY_SPACE)
        .max_by(|&a, &b| scores[a].total_cmp(&scores[b]))
        .and_then(Move::from_binary);
    if let Some(favourite) = favourite.filter(|f| scores[f.binary()] > value) {
        debug!(%favourite, "highest scored key is not a legal move");
    }
    debug!(%mv, value, "selected best scoring move");
    Ok(mv)
}
