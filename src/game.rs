use crate::attacks::Generation;
use crate::chess_errors::*;
use crate::moves::*;
use crate::pieces::*;
use crate::positions::*;
use std::fmt;
use tracing::{debug, info};

/// An agent is an object that can play chess by choosing moves appropriate to a
/// current position.
pub trait Agent {
    fn play_move(&self, position: &Position) -> ChessResult<Move>;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn play_move(&self, position: &Position) -> ChessResult<Move> {
        (**self).play_move(position)
    }
}

/// One entry of a played game: a position and the move that led to it.
/// The first entry of a game has no move.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub position: Position,
    pub last_move: Option<Move>,
}

/// The positions of a game in the order they were reached. Only ever grows, unless
/// cleared for a new game.
#[derive(Debug, Clone, Default)]
pub struct GameHistory {
    states: Vec<GameState>,
}

impl GameHistory {
    pub fn new(start: Position) -> Self {
        GameHistory {
            states: vec![GameState {
                position: start,
                last_move: None,
            }],
        }
    }

    pub fn push(&mut self, position: Position, mv: Move) {
        self.states.push(GameState {
            position,
            last_move: Some(mv),
        });
    }

    pub fn current(&self) -> Option<&Position> {
        self.states.last().map(|s| &s.position)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameState> {
        self.states.iter()
    }

    /// The moves played so far, in long algebraic notation.
    pub fn move_list(&self) -> String {
        self.iter()
            .filter_map(|s| s.last_move.map(|mv| mv.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Replays long algebraic moves from a start position, the way a move list
    /// arrives from a front end. Moves are applied as given, not validated.
    pub fn replay(start: Position, moves: &[&str]) -> ChessResult<GameHistory> {
        let mut history = GameHistory::new(start.clone());
        let mut position = start;
        for text in moves {
            let mv: Move = text.parse()?;
            position = position.apply_move(&mv);
            history.push(position.clone(), mv);
        }
        Ok(history)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    PlyLimit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "Checkmate, {} wins", winner),
            Outcome::Stalemate => write!(f, "Stalemate"),
            Outcome::PlyLimit => write!(f, "Move limit reached"),
        }
    }
}

pub struct Game<A1: Agent, A2: Agent> {
    white: A1,
    black: A2,
    history: GameHistory,
}

impl<A1: Agent, A2: Agent> Game<A1, A2> {
    pub fn new(white: A1, black: A2) -> Game<A1, A2> {
        Game::from_position(white, black, Position::standard_start())
    }

    pub fn from_position(white: A1, black: A2, start: Position) -> Game<A1, A2> {
        Game::from_history(white, black, GameHistory::new(start))
    }

    /// Continues a game whose opening moves were already played.
    pub fn from_history(white: A1, black: A2, history: GameHistory) -> Game<A1, A2> {
        Game {
            white,
            black,
            history,
        }
    }

    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    /// Lets the agents take turns until the game is decided or `max_plies` moves
    /// have been played. A move outside the legal list ends the game with an error.
    pub fn play(&mut self, max_plies: usize) -> ChessResult<Outcome> {
        for _ in 0..max_plies {
            let position = self.history.current().cloned().ok_or(ChessError::NoLegalMoves)?;
            let moves = position.legal_moves(Generation::Legal);
            if moves.is_empty() {
                return Ok(self.finish(&position));
            }

            let mv = match position.side_to_move() {
                Color::White => self.white.play_move(&position)?,
                Color::Black => self.black.play_move(&position)?,
            };
            // movement rules first, then the full list for pins and discovered checks
            if !position.is_legal(&mv) || !moves.contains(&mv) {
                return Err(ChessError::IllegalMove(position.render_move(&mv)));
            }

            let next = position.apply_move(&mv);
            info!(
                ply = self.history.len(),
                side = %position.side_to_move(),
                mv = %position.render_move(&mv),
                "move played"
            );
            debug!(fen = %next.to_fen(), "new position");
            self.history.push(next, mv);
        }

        match self.history.current() {
            Some(position) if position.legal_moves(Generation::Legal).is_empty() => {
                Ok(self.finish(position))
            }
            _ => Ok(Outcome::PlyLimit),
        }
    }

    fn finish(&self, position: &Position) -> Outcome {
        let outcome = if position.is_check() {
            Outcome::Checkmate {
                winner: position.side_to_move().opposite(),
            }
        } else {
            Outcome::Stalemate
        };
        info!(%outcome, plies = self.history.len() - 1, "game over");
        outcome
    }
}
