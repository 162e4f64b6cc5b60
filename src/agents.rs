/// Differing kinds of agents that can play the game
use crate::attacks::Generation;
use crate::chess_errors::*;
use crate::game::Agent;
use crate::moves::Move;
use crate::pieces::*;
use crate::positions::Position;
use crate::scorer::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use std::cell::RefCell;
use std::io::{self, stdout, Write};
use text_io::try_read;
use tracing::warn;

/// Reads moves in long algebraic notation from standard input.
pub struct HumanAgent {}

impl HumanAgent {
    pub fn new() -> Self {
        HumanAgent {}
    }

    /// A pawn move onto the last rank without a piece letter promotes to a queen.
    fn resolve(position: &Position, mv: Move, legal: &[Move]) -> Option<Move> {
        if legal.contains(&mv) {
            return Some(mv);
        }
        let queen = PieceType::Queen.to_char(position.side_to_move());
        let promoted = Move::with_promotion(mv.from, mv.to, Some(queen));
        if mv.promotion.is_none() && legal.contains(&promoted) {
            return Some(promoted);
        }
        None
    }
}

impl Agent for HumanAgent {
    fn play_move(&self, position: &Position) -> ChessResult<Move> {
        let legal = position.legal_moves(Generation::Legal);
        println!("{}", position.board().unicode());

        loop {
            print!("Your move ({}): ", position.side_to_move());
            stdout().flush()?;
            let line: String = try_read!("{}\n").map_err(|e| {
                ChessError::Io(io::Error::new(io::ErrorKind::UnexpectedEof, e.to_string()))
            })?;

            let mv = match line.trim().parse::<Move>() {
                Ok(mv) => mv,
                Err(e) => {
                    warn!(input = %line.trim(), "unreadable move");
                    println!("{}", e);
                    continue;
                }
            };
            match HumanAgent::resolve(position, mv, &legal) {
                Some(mv) => return Ok(mv),
                None => println!("Illegal move {}", mv),
            }
        }
    }
}

pub struct RandomAgent {
    rng: RefCell<SmallRng>,
}

impl RandomAgent {
    pub fn new(rng: SmallRng) -> Self {
        RandomAgent {
            rng: RefCell::new(rng),
        }
    }
}

impl Agent for RandomAgent {
    fn play_move(&self, position: &Position) -> ChessResult<Move> {
        position
            .legal_moves(Generation::Legal)
            .choose(&mut *self.rng.borrow_mut())
            .copied()
            .ok_or(ChessError::NoLegalMoves)
    }
}

/// Asks a scorer for its preferences and plays the best rated legal move.
pub struct ScorerAgent<S: MoveScorer> {
    scorer: S,
}

impl<S: MoveScorer> ScorerAgent<S> {
    pub fn new(scorer: S) -> Self {
        ScorerAgent { scorer }
    }
}

impl<S: MoveScorer> Agent for ScorerAgent<S> {
    fn play_move(&self, position: &Position) -> ChessResult<Move> {
        let scores = self.scorer.score(position)?;
        best_move(position, &scores)
    }
}
